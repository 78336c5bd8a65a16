use strum_macros::{ Display, EnumIter, EnumString };

use super::side::OrderSide;

/// Which legs of a triangle are buys and which are sells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// anchor -> intermediate -> ticker -> anchor
    BuyBuySell,
    /// anchor -> ticker -> intermediate -> anchor
    BuySellSell,
}

impl Direction {
    #[inline]
    pub fn sides(self) -> [OrderSide; 3] {
        match self {
            Direction::BuyBuySell => [OrderSide::Buy, OrderSide::Buy, OrderSide::Sell],
            Direction::BuySellSell => [OrderSide::Buy, OrderSide::Sell, OrderSide::Sell],
        }
    }
}
