use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::enums::direction::Direction;
use crate::exchange::client::ExchangeClient;
use crate::exchange::error::Result;
use crate::models::price_quote::PriceQuote;
use crate::models::triangle::Triangle;
use super::conversion::{ is_float_zero, Conversion };
use super::price_fetcher::PriceFetcher;

/// Outcome of simulating one triangle in one direction
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub direction: Direction,
    /// Symbols in the order they were traded
    pub symbols: [String; 3],
    pub final_amount: f64,
    /// Quotes used for each leg; empty when the evaluation was aborted
    pub quotes: Vec<PriceQuote>,
}

impl EvaluationResult {
    fn aborted(direction: Direction, symbols: [String; 3]) -> Self {
        Self {
            direction,
            symbols,
            final_amount: 0.0,
            quotes: Vec::new(),
        }
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Captured leg prices, in leg order
    pub fn prices(&self) -> Option<[f64; 3]> {
        match self.quotes.as_slice() {
            [first, second, third] => Some([first.price, second.price, third.price]),
            _ => None,
        }
    }

    /// Replay the conversion from the captured prices
    pub fn conversion(&self, investment: f64) -> Option<Conversion> {
        self.prices().map(|prices| Conversion::simulate(self.direction, investment, prices))
    }
}

/// Walks a fixed investment through the three legs of a triangle
pub struct ArbitrageEvaluator {
    fetcher: PriceFetcher,
}

impl ArbitrageEvaluator {
    pub fn new(client: Arc<dyn ExchangeClient>, pacing: Duration) -> Self {
        Self {
            fetcher: PriceFetcher::new(client, pacing),
        }
    }

    /// Fetch the three leg prices one after another and simulate the trades.
    ///
    /// A leg with no price, or a price within tolerance of zero, stops the evaluation
    /// before the next leg is fetched and yields a zero result. Exchange failures are
    /// returned to the caller.
    pub async fn evaluate(
        &self,
        triangle: &Triangle,
        direction: Direction,
        investment: f64
    ) -> Result<EvaluationResult> {
        let symbols = triangle.symbols(direction);
        let mut quotes = Vec::with_capacity(3);

        for symbol in &symbols {
            match self.fetcher.fetch(symbol).await? {
                Some(quote) if !is_float_zero(quote.price) => quotes.push(quote),
                other => {
                    debug!(
                        %direction,
                        symbol = %symbol,
                        price = other.map(|q| q.price),
                        "No usable price, skipping"
                    );
                    return Ok(EvaluationResult::aborted(direction, symbols.clone()));
                }
            }
        }

        let prices = [quotes[0].price, quotes[1].price, quotes[2].price];
        let conversion = Conversion::simulate(direction, investment, prices);

        Ok(EvaluationResult {
            direction,
            symbols,
            final_amount: conversion.final_amount,
            quotes,
        })
    }
}
