// src/stablecoin.rs

use std::collections::HashSet;

pub const DEFAULT_STABLECOINS: &[&str] = &[
    "USDT", "USDC", "FDUSD", "USDE", "BUSD", "DAI", "TUSD", "USDP", "UST", "GUSD", "PAX", "PYUSD",
];

/// Exact-symbol exclusion set for stable assets.
///
/// Matching is on the whole canonical symbol, never a substring: `USDX` or
/// `SUSD` are kept unless listed themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StablecoinFilter {
    symbols: HashSet<String>,
}

impl Default for StablecoinFilter {
    fn default() -> Self {
        StablecoinFilter::new(DEFAULT_STABLECOINS.iter().copied())
    }
}

impl StablecoinFilter {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let symbols = symbols
            .into_iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        StablecoinFilter { symbols }
    }

    pub fn is_stablecoin(&self, symbol: &str) -> bool {
        self.symbols.contains(&symbol.trim().to_uppercase())
    }

    /// True when `symbol` should take part in ranking.
    pub fn allows(&self, symbol: &str) -> bool {
        !self.is_stablecoin(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
