use std::fmt;

use chrono::{ DateTime, Local };

use crate::enums::direction::Direction;
use super::evaluator::EvaluationResult;
use super::profit::ProfitAssessment;

/// A round trip that cleared the profit filter
#[derive(Debug, Clone)]
pub struct ArbitrageOpportunity {
    pub detected_at: DateTime<Local>,
    pub direction: Direction,
    pub symbols: [String; 3],
    pub gross_delta: f64,
    pub net_result: f64,
}

impl ArbitrageOpportunity {
    pub fn new(evaluation: &EvaluationResult, assessment: &ProfitAssessment) -> Self {
        Self {
            detected_at: Local::now(),
            direction: evaluation.direction,
            symbols: evaluation.symbols.clone(),
            gross_delta: assessment.gross_delta,
            net_result: assessment.net_result,
        }
    }

}

/// Amounts keep at least one decimal ("4.0", "2.9")
impl fmt::Display for ArbitrageOpportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PROFIT-{}:{}, {},{},{}, Profit/Loss: {:?} (net {:?})",
            self.detected_at.format("%H:%M:%S"),
            self.direction,
            self.symbols[0],
            self.symbols[1],
            self.symbols[2],
            self.gross_delta,
            self.net_result
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::profit::ProfitFilter;
    use chrono::TimeZone;

    #[test]
    fn test_report_line_shows_gross_delta() {
        let evaluation = EvaluationResult {
            direction: Direction::BuyBuySell,
            symbols: ["BTC/USDT".into(), "ETH/BTC".into(), "ETH/USDT".into()],
            final_amount: 104.0,
            quotes: Vec::new(),
        };
        let assessment = ProfitFilter::new(100.0, 0.2, 0.5).assess(104.0);

        let mut opportunity = ArbitrageOpportunity::new(&evaluation, &assessment);
        opportunity.detected_at = Local.with_ymd_and_hms(2024, 3, 3, 10, 10, 54).unwrap();

        assert_eq!(
            opportunity.to_string(),
            "PROFIT-10:10:54:BUY_BUY_SELL, BTC/USDT,ETH/BTC,ETH/USDT, Profit/Loss: 4.0 (net 2.9)"
        );

        let losing = ProfitFilter::new(100.0, 0.2, 0.5).assess(98.75);
        let mut opportunity = ArbitrageOpportunity::new(&evaluation, &losing);
        opportunity.detected_at = Local.with_ymd_and_hms(2024, 3, 3, 10, 10, 54).unwrap();

        let line = opportunity.to_string();
        assert!(line.ends_with("Profit/Loss: -1.25 (net -2.35)"));
        assert!(!line.contains('\u{1b}'));
    }
}
