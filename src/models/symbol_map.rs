use std::sync::Arc;

use ahash::AHashMap;
use tracing::{ debug, info, warn };

use super::{ symbol::Symbol, triangle::Triangle };

/// Market catalog indexed for the triangle join
#[derive(Debug, Clone, Default)]
pub struct SymbolMap {
    /// Symbols in catalog order
    symbols: Vec<Symbol>,
    /// quote asset -> positions in `symbols`, ascending
    by_quote: AHashMap<Arc<str>, Vec<usize>>,
    /// (base, quote) -> number of catalog entries for that pair
    pair_counts: AHashMap<(Arc<str>, Arc<str>), usize>,
    /// Entries dropped because they were not `BASE/QUOTE`
    rejected: usize,
}

impl SymbolMap {
    #[inline]
    pub fn new() -> Self {
        Self {
            symbols: Vec::with_capacity(1000), // Pre-allocate for typical exchange size
            by_quote: AHashMap::with_capacity(50),
            pair_counts: AHashMap::with_capacity(1000),
            rejected: 0,
        }
    }

    /// Build from raw symbol names, skipping malformed ones
    pub fn from_names<I, S>(names: I) -> Self where I: IntoIterator<Item = S>, S: AsRef<str> {
        let mut map = Self::new();
        for name in names {
            match Symbol::parse(name.as_ref()) {
                Ok(symbol) => map.add_symbol(symbol),
                Err(e) => {
                    warn!("Skipping market: {}", e);
                    map.rejected += 1;
                }
            }
        }
        map
    }

    #[inline]
    pub fn add_symbol(&mut self, symbol: Symbol) {
        let position = self.symbols.len();

        self.by_quote.entry(symbol.quote_asset.clone()).or_default().push(position);

        *self.pair_counts
            .entry((symbol.base_asset.clone(), symbol.quote_asset.clone()))
            .or_insert(0) += 1;

        self.symbols.push(symbol);
    }

    /// Number of catalog entries for `base/quote`
    #[inline]
    pub fn pair_count(&self, base_asset: &str, quote_asset: &str) -> usize {
        // Tuple keys of Arc<str> can't be borrowed as (&str, &str)
        self.pair_counts
            .get(&(Arc::from(base_asset), Arc::from(quote_asset)))
            .copied()
            .unwrap_or(0)
    }

    /// Symbols quoted in `quote_asset`, in catalog order
    #[inline]
    pub fn get_by_quote(&self, quote_asset: &str) -> impl Iterator<Item = &Symbol> + '_ {
        self.by_quote
            .get(quote_asset)
            .map(|positions| positions.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&position| &self.symbols[position])
    }

    /// Find every triangle that starts and ends with `base_asset`.
    ///
    /// For each `X/base` the base side becomes the intermediate asset, for each
    /// `Y/X` the base side becomes the ticker, and `Y/base` must close the loop.
    /// Paths are produced in the same order as a nested scan of the catalog, and
    /// repeated catalog entries produce repeated triangles.
    pub fn find_triangles(&self, base_asset: &str) -> Vec<Triangle> {
        let start = std::time::Instant::now();
        let mut triangles = Vec::new();

        let anchor: Arc<str> = base_asset.into();
        let mut anchor_legs = self.get_by_quote(base_asset).peekable();

        if anchor_legs.peek().is_none() {
            warn!("Base asset {} not found as quote in any symbol", base_asset);
            return triangles;
        }

        for first_symbol in anchor_legs {
            let intermediate = &first_symbol.base_asset;

            for second_symbol in self.get_by_quote(intermediate) {
                let ticker = &second_symbol.base_asset;

                let closing_legs = self.pair_count(ticker, base_asset);
                for _ in 0..closing_legs {
                    triangles.push(
                        Triangle::new(anchor.clone(), intermediate.clone(), ticker.clone())
                    );
                }
            }
        }

        info!(
            "Found {} triangular paths starting and ending with {} in {:?}",
            triangles.len(),
            base_asset,
            start.elapsed()
        );
        debug!(rejected = self.rejected, "Catalog symbols rejected during load");

        triangles
    }

    #[inline]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
