use std::fmt;
use std::sync::Arc;

use crate::enums::direction::Direction;
use super::symbol::pair_name;

/// A closed three-asset loop that starts and ends at `base`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub base: Arc<str>,
    pub intermediate: Arc<str>,
    pub ticker: Arc<str>,
}

impl Triangle {
    pub fn new(base: Arc<str>, intermediate: Arc<str>, ticker: Arc<str>) -> Self {
        Triangle { base, intermediate, ticker }
    }

    /// `intermediate/base`, e.g. BTC/USDT
    pub fn anchor_leg(&self) -> String {
        pair_name(&self.intermediate, &self.base)
    }

    /// `ticker/intermediate`, e.g. ETH/BTC
    pub fn cross_leg(&self) -> String {
        pair_name(&self.ticker, &self.intermediate)
    }

    /// `ticker/base`, e.g. ETH/USDT
    pub fn closing_leg(&self) -> String {
        pair_name(&self.ticker, &self.base)
    }

    /// Symbols in the order they are traded for the given direction
    pub fn symbols(&self, direction: Direction) -> [String; 3] {
        match direction {
            Direction::BuyBuySell => [self.anchor_leg(), self.cross_leg(), self.closing_leg()],
            Direction::BuySellSell => [self.closing_leg(), self.cross_leg(), self.anchor_leg()],
        }
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {} → {}", self.base, self.intermediate, self.ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_follow_direction() {
        let triangle = Triangle::new("USDT".into(), "BTC".into(), "ETH".into());

        assert_eq!(triangle.symbols(Direction::BuyBuySell), [
            "BTC/USDT".to_string(),
            "ETH/BTC".to_string(),
            "ETH/USDT".to_string(),
        ]);
        assert_eq!(triangle.symbols(Direction::BuySellSell), [
            "ETH/USDT".to_string(),
            "ETH/BTC".to_string(),
            "BTC/USDT".to_string(),
        ]);
    }
}
