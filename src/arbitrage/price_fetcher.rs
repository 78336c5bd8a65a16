use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::exchange::client::ExchangeClient;
use crate::exchange::error::Result;
use crate::models::price_quote::PriceQuote;

/// Wait out the rate limit window between exchange calls
#[inline]
pub async fn pace(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// One ticker request per call, followed by the pacing delay
pub struct PriceFetcher {
    client: Arc<dyn ExchangeClient>,
    pacing: Duration,
}

impl PriceFetcher {
    pub fn new(client: Arc<dyn ExchangeClient>, pacing: Duration) -> Self {
        Self { client, pacing }
    }

    /// Current price of `symbol`; `Ok(None)` when the exchange has no usable price.
    /// The pacing delay runs whether or not the call succeeded.
    pub async fn fetch(&self, symbol: &str) -> Result<Option<PriceQuote>> {
        let price = self.client.fetch_price(symbol).await;
        pace(self.pacing).await;

        let quote = price?
            .filter(|price| price.is_finite())
            .map(|price| PriceQuote::new(symbol, price));

        trace!(symbol, price = quote.as_ref().map(|q| q.price), "Price fetched");

        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::mock_client::MockExchangeClient;
    use std::time::Instant;

    #[tokio::test]
    async fn test_fetch_returns_quote() {
        let client = Arc::new(MockExchangeClient::new().with_price("BTC/USDT", 50000.0));
        let fetcher = PriceFetcher::new(client.clone(), Duration::ZERO);

        let quote = fetcher.fetch("BTC/USDT").await.unwrap().unwrap();
        assert_eq!(quote.symbol, "BTC/USDT");
        assert_eq!(quote.price, 50000.0);
        assert_eq!(client.price_calls(), vec!["BTC/USDT".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_and_non_finite_prices_are_absent() {
        let client = Arc::new(
            MockExchangeClient::new().with_missing_price("ETH/BTC").with_price("ETH/USDT", f64::NAN)
        );
        let fetcher = PriceFetcher::new(client, Duration::ZERO);

        assert!(fetcher.fetch("ETH/BTC").await.unwrap().is_none());
        assert!(fetcher.fetch("ETH/USDT").await.unwrap().is_none());
        assert!(fetcher.fetch("UNKNOWN/USDT").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pacing_applies_after_failures() {
        let client = Arc::new(MockExchangeClient::new().with_failing_symbol("BTC/USDT"));
        let fetcher = PriceFetcher::new(client, Duration::from_millis(30));

        let start = Instant::now();
        assert!(fetcher.fetch("BTC/USDT").await.is_err());
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
