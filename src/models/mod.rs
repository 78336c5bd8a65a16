pub mod order;
pub mod price_quote;
pub mod symbol;
pub mod symbol_map;
pub mod triangle;
