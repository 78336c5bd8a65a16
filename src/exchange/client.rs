use async_trait::async_trait;

use crate::models::order::{ OrderAck, OrderRequest };
use super::error::Result;

/// Exchange operations the scanner depends on
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Get the name of the exchange
    fn name(&self) -> &str;

    /// Fetch all tradable symbols as unified `BASE/QUOTE` names
    async fn list_symbols(&self) -> Result<Vec<String>>;

    /// Last price for a symbol, `None` when the exchange has no usable price
    async fn fetch_price(&self, symbol: &str) -> Result<Option<f64>>;

    /// Submit a limit order
    async fn place_limit_order(&self, order: &OrderRequest) -> Result<OrderAck>;
}
