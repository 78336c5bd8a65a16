use std::sync::Arc;
use chrono::Utc;
use tracing::{ error, info, warn };

use crate::exchange::client::ExchangeClient;
use crate::models::order::{ OrderAck, OrderRequest };
use super::evaluator::EvaluationResult;

/// Result of sending the legs of one opportunity
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub acks: Vec<OrderAck>,
    /// Zero-based index of the leg that failed, if any
    pub failed_leg: Option<usize>,
    pub error: Option<String>,
}

impl DispatchReport {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.failed_leg.is_none() && self.acks.len() == 3
    }
}

/// Places the three limit orders of a profitable triangle
pub struct OrderDispatcher {
    client: Arc<dyn ExchangeClient>,
    enabled: bool,
}

impl OrderDispatcher {
    pub fn new(client: Arc<dyn ExchangeClient>, enabled: bool) -> Self {
        Self { client, enabled }
    }

    /// Orders for an evaluation, derived from its captured prices
    pub fn build_orders(
        evaluation: &EvaluationResult,
        investment: f64
    ) -> Option<[OrderRequest; 3]> {
        evaluation
            .conversion(investment)
            .map(|conversion| conversion.orders(&evaluation.symbols))
    }

    /// Submit the legs in order. Returns `None` when dispatch is disabled or the
    /// evaluation carries no prices.
    ///
    /// Legs after a failed one are not sent. Legs already placed stay open on the
    /// exchange; they are logged so the position can be unwound by hand.
    pub async fn dispatch(
        &self,
        evaluation: &EvaluationResult,
        investment: f64
    ) -> Option<DispatchReport> {
        if !self.enabled {
            return None;
        }

        let orders = Self::build_orders(evaluation, investment)?;
        let mut report = DispatchReport::default();

        if let Some(oldest) = evaluation.quotes.iter().map(|quote| quote.fetched_at).min() {
            let prices = evaluation.quotes
                .iter()
                .map(|quote| format!("{}@{}", quote.symbol, quote.price))
                .collect::<Vec<_>>()
                .join(", ");
            info!(
                direction = %evaluation.direction,
                quote_age_ms = (Utc::now() - oldest).num_milliseconds(),
                "Dispatching triangle at captured prices [{}]",
                prices
            );
        }

        for (leg, order) in orders.iter().enumerate() {
            match self.client.place_limit_order(order).await {
                Ok(ack) => {
                    info!(
                        leg = leg + 1,
                        order_id = %ack.order_id,
                        status = %ack.status,
                        symbol = %order.symbol,
                        side = %order.side,
                        quantity = order.quantity,
                        price = order.limit_price,
                        "Order submitted"
                    );
                    report.acks.push(ack);
                }
                Err(e) => {
                    if report.acks.is_empty() {
                        warn!(
                            direction = %evaluation.direction,
                            symbol = %order.symbol,
                            "First leg rejected, nothing placed: {}",
                            e
                        );
                    } else {
                        let placed = report.acks
                            .iter()
                            .map(|ack| format!("{} {} ({})", ack.side, ack.symbol, ack.order_id))
                            .collect::<Vec<_>>()
                            .join(", ");
                        error!(
                            direction = %evaluation.direction,
                            failed_leg = leg + 1,
                            symbol = %order.symbol,
                            "Triangle left incomplete, open legs: [{}]: {}",
                            placed,
                            e
                        );
                    }

                    report.failed_leg = Some(leg);
                    report.error = Some(e.to_string());
                    break;
                }
            }
        }

        Some(report)
    }
}
