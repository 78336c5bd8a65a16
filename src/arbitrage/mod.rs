pub mod conversion;
pub mod evaluator;
pub mod executor;
pub mod opportunity;
pub mod price_fetcher;
pub mod profit;
pub mod scanner;
