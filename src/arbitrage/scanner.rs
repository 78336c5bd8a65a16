use std::sync::Arc;
use std::sync::atomic::{ AtomicBool, Ordering };
use std::time::{ Duration, Instant };

use tracing::{ debug, info, warn };

use crate::config::Config;
use crate::enums::direction::Direction;
use crate::exchange::client::ExchangeClient;
use crate::models::triangle::Triangle;
use super::evaluator::ArbitrageEvaluator;
use super::executor::OrderDispatcher;
use super::opportunity::ArbitrageOpportunity;
use super::price_fetcher::pace;
use super::profit::ProfitFilter;

/// Knobs for a scan, usually taken from `Config`
#[derive(Debug, Clone, Copy)]
pub struct ScanSettings {
    pub investment: f64,
    pub brokerage_percent: f64,
    pub min_profit: f64,
    pub pacing: Duration,
    pub dispatch_orders: bool,
}

impl From<&Config> for ScanSettings {
    fn from(config: &Config) -> Self {
        Self {
            investment: config.investment,
            brokerage_percent: config.brokerage_percent,
            min_profit: config.min_profit,
            pacing: config.pacing_delay(),
            dispatch_orders: config.dispatch_orders,
        }
    }
}

/// Counters for one pass over the triangle list
#[derive(Debug, Default)]
pub struct ScanSummary {
    pub triangles: usize,
    pub evaluations: usize,
    pub aborted: usize,
    pub errors: usize,
    pub opportunities: Vec<ArbitrageOpportunity>,
    pub orders_placed: usize,
    pub incomplete_dispatches: usize,
    pub interrupted: bool,
}

/// Sequential scan over every triangle in both directions
pub struct Scanner {
    evaluator: ArbitrageEvaluator,
    filter: ProfitFilter,
    dispatcher: OrderDispatcher,
    pacing: Duration,
}

impl Scanner {
    pub fn new(client: Arc<dyn ExchangeClient>, settings: ScanSettings) -> Self {
        Self {
            evaluator: ArbitrageEvaluator::new(client.clone(), settings.pacing),
            filter: ProfitFilter::new(
                settings.investment,
                settings.brokerage_percent,
                settings.min_profit
            ),
            dispatcher: OrderDispatcher::new(client, settings.dispatch_orders),
            pacing: settings.pacing,
        }
    }

    /// Evaluate every triangle buy-buy-sell then buy-sell-sell, pausing after each.
    /// `shutdown` is checked between triangles.
    pub async fn run_pass(&self, triangles: &[Triangle], shutdown: &AtomicBool) -> ScanSummary {
        let start = Instant::now();
        let mut summary = ScanSummary::default();

        for triangle in triangles {
            if shutdown.load(Ordering::Relaxed) {
                summary.interrupted = true;
                break;
            }

            summary.triangles += 1;

            for direction in [Direction::BuyBuySell, Direction::BuySellSell] {
                self.check(triangle, direction, &mut summary).await;
                pace(self.pacing).await;
            }
        }

        info!(
            triangles = summary.triangles,
            evaluations = summary.evaluations,
            aborted = summary.aborted,
            errors = summary.errors,
            opportunities = summary.opportunities.len(),
            orders_placed = summary.orders_placed,
            "Scan pass finished in {:.2?}",
            start.elapsed()
        );

        summary
    }

    async fn check(&self, triangle: &Triangle, direction: Direction, summary: &mut ScanSummary) {
        summary.evaluations += 1;
        let investment = self.filter.investment();

        let evaluation = match self.evaluator.evaluate(triangle, direction, investment).await {
            Ok(evaluation) => evaluation,
            Err(e) => {
                summary.errors += 1;
                warn!(%triangle, %direction, "Evaluation failed: {}", e);
                return;
            }
        };

        if evaluation.is_aborted() {
            summary.aborted += 1;
            return;
        }

        let assessment = self.filter.assess(evaluation.final_amount);
        debug!(
            %triangle,
            %direction,
            final_amount = evaluation.final_amount,
            estimated_brokerage = assessment.estimated_brokerage,
            minimum_acceptable = assessment.minimum_acceptable,
            net_result = assessment.net_result,
            "Evaluated"
        );

        if !assessment.is_profitable() {
            return;
        }

        let opportunity = ArbitrageOpportunity::new(&evaluation, &assessment);
        info!("{}", opportunity);

        if let Some(report) = self.dispatcher.dispatch(&evaluation, investment).await {
            summary.orders_placed += report.acks.len();
            if !report.is_complete() {
                summary.incomplete_dispatches += 1;
                warn!(
                    %triangle,
                    %direction,
                    "Dispatch incomplete: {}",
                    report.error.as_deref().unwrap_or("unknown error")
                );
            }
        }

        summary.opportunities.push(opportunity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::mock_client::MockExchangeClient;
    use crate::models::symbol_map::SymbolMap;

    fn settings(dispatch_orders: bool) -> ScanSettings {
        ScanSettings {
            investment: 100.0,
            brokerage_percent: 0.2,
            min_profit: 0.5,
            pacing: Duration::ZERO,
            dispatch_orders,
        }
    }

    fn market(eth_usdt: f64) -> MockExchangeClient {
        MockExchangeClient::new()
            .with_symbols(&["BTC/USDT", "ETH/BTC", "ETH/USDT"])
            .with_price("BTC/USDT", 50000.0)
            .with_price("ETH/BTC", 0.05)
            .with_price("ETH/USDT", eth_usdt)
    }

    async fn scan(client: Arc<MockExchangeClient>, dispatch_orders: bool) -> ScanSummary {
        let symbols = client.list_symbols().await.unwrap();
        let triangles = SymbolMap::from_names(symbols).find_triangles("USDT");
        let scanner = Scanner::new(client, settings(dispatch_orders));

        scanner.run_pass(&triangles, &AtomicBool::new(false)).await
    }

    #[tokio::test]
    async fn test_profitable_triangle_is_reported() {
        let summary = scan(Arc::new(market(2600.0)), false).await;

        assert_eq!(summary.triangles, 1);
        assert_eq!(summary.evaluations, 2);
        // buy-sell-sell: 100 / 2600 * 0.05 * 50000 = 96.154
        assert_eq!(summary.opportunities.len(), 1);

        let opportunity = &summary.opportunities[0];
        assert_eq!(opportunity.direction, Direction::BuyBuySell);
        assert_eq!(opportunity.gross_delta, 4.0);
        assert_eq!(opportunity.net_result, 2.9);
        assert_eq!(summary.orders_placed, 0);
    }

    #[tokio::test]
    async fn test_unprofitable_triangle_is_not_reported() {
        let summary = scan(Arc::new(market(100.5)), false).await;

        // buy-buy-sell ends at 4.02
        assert!(summary.opportunities.iter().all(|o| o.direction != Direction::BuyBuySell));
    }

    #[tokio::test]
    async fn test_both_directions_fetch_in_order() {
        let client = Arc::new(market(2600.0));
        scan(client.clone(), false).await;

        assert_eq!(client.price_calls(), vec![
            "BTC/USDT",
            "ETH/BTC",
            "ETH/USDT",
            "ETH/USDT",
            "ETH/BTC",
            "BTC/USDT",
        ]);
    }

    #[tokio::test]
    async fn test_exchange_errors_do_not_stop_the_pass() {
        let client = Arc::new(
            market(2600.0)
                .with_symbols(&["BTC/USDT", "ETH/BTC", "ETH/USDT", "SOL/BTC", "SOL/USDT"])
                .with_failing_symbol("ETH/BTC")
                .with_price("SOL/BTC", 0.002)
                .with_price("SOL/USDT", 104.0)
        );
        let summary = scan(client, false).await;

        assert_eq!(summary.triangles, 2);
        assert_eq!(summary.evaluations, 4);
        assert_eq!(summary.errors, 2);
        // SOL: 100 / 50000 / 0.002 * 104 = 104.0
        assert_eq!(summary.opportunities.len(), 1);
        assert_eq!(summary.opportunities[0].symbols[1], "SOL/BTC");
    }

    #[tokio::test]
    async fn test_missing_prices_are_counted_as_aborted() {
        let summary = scan(Arc::new(market(2600.0).with_missing_price("ETH/BTC")), false).await;

        assert_eq!(summary.aborted, 2);
        assert_eq!(summary.errors, 0);
        assert!(summary.opportunities.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_when_enabled() {
        let client = Arc::new(market(2600.0));
        let summary = scan(client.clone(), true).await;

        assert_eq!(summary.orders_placed, 3);
        assert_eq!(summary.incomplete_dispatches, 0);
        assert_eq!(client.placed_orders().len(), 3);
    }

    #[tokio::test]
    async fn test_shutdown_stops_before_next_triangle() {
        let client = Arc::new(market(2600.0));
        let triangles = SymbolMap::from_names(["BTC/USDT", "ETH/BTC", "ETH/USDT"]).find_triangles(
            "USDT"
        );
        let scanner = Scanner::new(client.clone(), settings(false));

        let summary = scanner.run_pass(&triangles, &AtomicBool::new(true)).await;

        assert!(summary.interrupted);
        assert_eq!(summary.triangles, 0);
        assert!(client.price_calls().is_empty());
    }
}
