use chrono::{ DateTime, Utc };

/// Last traded price of a symbol at the moment it was fetched
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub symbol: String,
    pub price: f64,
    pub fetched_at: DateTime<Utc>,
}

impl PriceQuote {
    #[inline]
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            fetched_at: Utc::now(),
        }
    }
}
