use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Separator between base and quote asset in a unified symbol ("ETH/USDT")
pub const SYMBOL_DELIMITER: char = '/';

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("symbol `{0}` has no `/` delimiter")] MissingDelimiter(String),
    #[error("symbol `{0}` has more than one `/` delimiter")] ExtraDelimiter(String),
    #[error("symbol `{0}` has an empty base or quote asset")] EmptyAsset(String),
}

/// Lightweight trading symbol representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub symbol: Arc<str>, // Using Arc<str> to reduce clone costs
    pub base_asset: Arc<str>,
    pub quote_asset: Arc<str>,
}

impl Symbol {
    /// Parse a unified `BASE/QUOTE` symbol, rejecting anything without exactly one delimiter
    pub fn parse(raw: &str) -> Result<Self, SymbolError> {
        let mut parts = raw.split(SYMBOL_DELIMITER);

        let base = parts.next().unwrap_or_default();
        let quote = match parts.next() {
            Some(quote) => quote,
            None => {
                return Err(SymbolError::MissingDelimiter(raw.to_string()));
            }
        };

        if parts.next().is_some() {
            return Err(SymbolError::ExtraDelimiter(raw.to_string()));
        }

        if base.is_empty() || quote.is_empty() {
            return Err(SymbolError::EmptyAsset(raw.to_string()));
        }

        Ok(Self {
            symbol: raw.into(),
            base_asset: base.into(),
            quote_asset: quote.into(),
        })
    }
}

/// Formats `base/quote` without going through a `Symbol`
#[inline]
pub fn pair_name(base_asset: &str, quote_asset: &str) -> String {
    format!("{}{}{}", base_asset, SYMBOL_DELIMITER, quote_asset)
}

impl FromStr for Symbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::parse(s)
    }
}

impl fmt::Display for Symbol {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_symbol() {
        let symbol = Symbol::parse("ETH/USDT").unwrap();
        assert_eq!(symbol.base_asset.as_ref(), "ETH");
        assert_eq!(symbol.quote_asset.as_ref(), "USDT");
        assert_eq!(symbol.to_string(), "ETH/USDT");
    }

    #[test]
    fn test_parse_rejects_missing_delimiter() {
        assert_eq!(
            Symbol::parse("ETHUSDT"),
            Err(SymbolError::MissingDelimiter("ETHUSDT".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_extra_delimiter() {
        assert!(matches!(Symbol::parse("ETH/USDT/X"), Err(SymbolError::ExtraDelimiter(_))));
    }

    #[test]
    fn test_parse_rejects_empty_sides() {
        assert!(matches!(Symbol::parse("/USDT"), Err(SymbolError::EmptyAsset(_))));
        assert!(matches!(Symbol::parse("ETH/"), Err(SymbolError::EmptyAsset(_))));
        assert!(matches!(Symbol::parse(""), Err(SymbolError::MissingDelimiter(_))));
    }

    #[test]
    fn test_pair_name_round_trips() {
        let symbol: Symbol = pair_name("BTC", "USDT").parse().unwrap();
        assert_eq!(symbol.base_asset.as_ref(), "BTC");
    }
}
