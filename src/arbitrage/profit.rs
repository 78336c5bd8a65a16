use super::conversion::{ round_to, AMOUNT_DECIMALS };

/// Number of trades in a triangle, each charged brokerage
const LEGS: f64 = 3.0;

/// Profit/loss figures for one evaluated round trip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitAssessment {
    pub estimated_brokerage: f64,
    pub minimum_acceptable: f64,
    /// Final amount minus investment, brokerage and minimum profit; decides reporting
    pub net_result: f64,
    /// Final amount minus investment only; the figure shown in reports
    pub gross_delta: f64,
}

impl ProfitAssessment {
    #[inline]
    pub fn is_profitable(&self) -> bool {
        self.net_result > 0.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProfitFilter {
    investment: f64,
    brokerage_percent: f64,
    min_profit: f64,
}

impl ProfitFilter {
    pub fn new(investment: f64, brokerage_percent: f64, min_profit: f64) -> Self {
        Self { investment, brokerage_percent, min_profit }
    }

    #[inline]
    pub fn investment(&self) -> f64 {
        self.investment
    }

    /// Brokerage is estimated flatly on the initial investment for each of the three legs
    pub fn assess(&self, final_amount: f64) -> ProfitAssessment {
        let estimated_brokerage = ((self.brokerage_percent * self.investment) / 100.0) * LEGS;
        let minimum_acceptable = self.investment + estimated_brokerage + self.min_profit;

        ProfitAssessment {
            estimated_brokerage,
            minimum_acceptable,
            net_result: round_to(final_amount - minimum_acceptable, AMOUNT_DECIMALS),
            gross_delta: round_to(final_amount - self.investment, AMOUNT_DECIMALS),
        }
    }
}
