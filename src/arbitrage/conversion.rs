use crate::enums::direction::Direction;
use crate::models::order::OrderRequest;

/// Prices closer to zero than this are treated as unusable quotes
pub const ZERO_PRICE_TOLERANCE: f64 = 1e-3;

/// Decimal places kept for intermediate order quantities
pub const QUANTITY_DECIMALS: i32 = 8;

/// Decimal places kept for amounts in the anchor asset
pub const AMOUNT_DECIMALS: i32 = 3;

/// Round to `decimals` places, exact ties going to the even digit
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = (10f64).powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// True for prices an order could not be placed at (inactive market, empty ticker)
#[inline]
pub fn is_float_zero(value: f64) -> bool {
    (value - 0.0).abs() <= ZERO_PRICE_TOLERANCE
}

/// Quantities traded on each leg and the amount that comes back to the anchor asset.
///
/// Both the evaluator and the order dispatcher derive their numbers from here, so the
/// orders sent for an opportunity always match what was evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub direction: Direction,
    pub prices: [f64; 3],
    pub quantities: [f64; 3],
    pub final_amount: f64,
}

impl Conversion {
    /// Convert `investment` through three legs at `prices` (all expected to be non-zero)
    pub fn simulate(direction: Direction, investment: f64, prices: [f64; 3]) -> Self {
        let [p1, p2, p3] = prices;

        let bought = round_to(investment / p1, QUANTITY_DECIMALS);

        let (quantities, final_amount) = match direction {
            Direction::BuyBuySell => {
                let bought_again = round_to(bought / p2, QUANTITY_DECIMALS);
                let final_amount = round_to(bought_again * p3, AMOUNT_DECIMALS);
                ([bought, bought_again, bought_again], final_amount)
            }
            Direction::BuySellSell => {
                let sold = round_to(bought * p2, QUANTITY_DECIMALS);
                let final_amount = round_to(sold * p3, AMOUNT_DECIMALS);
                ([bought, bought, sold], final_amount)
            }
        };

        Self { direction, prices, quantities, final_amount }
    }

    /// Limit orders for the three legs at the captured prices
    pub fn orders(&self, symbols: &[String; 3]) -> [OrderRequest; 3] {
        let sides = self.direction.sides();
        std::array::from_fn(|leg| OrderRequest {
            symbol: symbols[leg].clone(),
            side: sides[leg],
            quantity: self.quantities[leg],
            limit_price: self.prices[leg],
        })
    }
}
