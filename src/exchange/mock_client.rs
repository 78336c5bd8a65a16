// src/exchange/mock_client.rs
use std::collections::{ HashMap, HashSet };

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::models::order::{ OrderAck, OrderRequest };
use super::client::ExchangeClient;
use super::error::{ ExchangeError, Result };

/// In-memory exchange with fixed prices, for tests
#[derive(Default)]
pub struct MockExchangeClient {
    symbols: Vec<String>,
    prices: HashMap<String, Option<f64>>,
    failing_symbols: HashSet<String>,
    rejected_orders: HashSet<String>,
    price_calls: Mutex<Vec<String>>,
    placed_orders: Mutex<Vec<OrderRequest>>,
}

impl MockExchangeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols(mut self, symbols: &[&str]) -> Self {
        self.symbols = symbols
            .iter()
            .map(|s| s.to_string())
            .collect();
        self
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), Some(price));
        self
    }

    /// The exchange answers but reports no price
    pub fn with_missing_price(mut self, symbol: &str) -> Self {
        self.prices.insert(symbol.to_string(), None);
        self
    }

    /// Price requests for `symbol` fail with an API error
    pub fn with_failing_symbol(mut self, symbol: &str) -> Self {
        self.failing_symbols.insert(symbol.to_string());
        self
    }

    /// Orders on `symbol` are rejected
    pub fn with_rejected_order(mut self, symbol: &str) -> Self {
        self.rejected_orders.insert(symbol.to_string());
        self
    }

    pub fn price_calls(&self) -> Vec<String> {
        self.price_calls.lock().clone()
    }

    pub fn placed_orders(&self) -> Vec<OrderRequest> {
        self.placed_orders.lock().clone()
    }
}

#[async_trait]
impl ExchangeClient for MockExchangeClient {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn list_symbols(&self) -> Result<Vec<String>> {
        Ok(self.symbols.clone())
    }

    async fn fetch_price(&self, symbol: &str) -> Result<Option<f64>> {
        self.price_calls.lock().push(symbol.to_string());

        if self.failing_symbols.contains(symbol) {
            return Err(ExchangeError::Api { status: 429, body: "rate limited".into() });
        }

        Ok(self.prices.get(symbol).copied().flatten())
    }

    async fn place_limit_order(&self, order: &OrderRequest) -> Result<OrderAck> {
        if self.rejected_orders.contains(&order.symbol) {
            return Err(ExchangeError::Rejected(format!("{} balance not enough", order.symbol)));
        }

        let mut placed = self.placed_orders.lock();
        placed.push(order.clone());

        Ok(OrderAck {
            order_id: format!("MOCK_ORDER_{}", placed.len()),
            symbol: order.symbol.clone(),
            side: order.side,
            status: "open".into(),
        })
    }
}
