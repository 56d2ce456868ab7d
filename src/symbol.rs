// src/symbol.rs

/// USD-denominated quote currencies, longest first so `FDUSD` wins over `USD`.
pub const USD_QUOTES: &[&str] = &["FDUSD", "USDT", "USDC", "BUSD", "TUSD", "USDE", "USD"];

/// Quotes that are recognised when splitting but never accepted by [`QuoteConvention::resolve`].
pub const OTHER_QUOTES: &[&str] = &["BTC", "ETH", "BNB", "EUR", "TRY", "BRL", "GBP", "JPY", "DAI"];

/// How a venue spells its instrument identifiers.
#[derive(Debug, Clone, Copy)]
pub struct QuoteConvention {
    /// Characters separating base and quote (`BTC-USDT`, `btc_usdt`).
    pub separators: &'static [char],
    /// Accepted quote currencies, longest first when suffix matching.
    pub quotes: &'static [&'static str],
    /// Venue tags trailing the identifier (`BTCUSDT_SPBL`), removed before matching.
    pub tags: &'static [&'static str],
}

impl QuoteConvention {
    /// Concatenated identifiers such as `BTCUSDT`.
    pub const fn concatenated(quotes: &'static [&'static str]) -> Self {
        QuoteConvention {
            separators: &[],
            quotes,
            tags: &[],
        }
    }

    /// Separated identifiers such as `BTC-USDT` or `btc_usdt`.
    pub const fn separated(separators: &'static [char], quotes: &'static [&'static str]) -> Self {
        QuoteConvention {
            separators,
            quotes,
            tags: &[],
        }
    }

    /// Identifiers that already are base assets (aggregators such as CoinMarketCap).
    pub const fn bare() -> Self {
        QuoteConvention {
            separators: &[],
            quotes: &[],
            tags: &[],
        }
    }

    pub const fn with_tags(mut self, tags: &'static [&'static str]) -> Self {
        self.tags = tags;
        self
    }

    /// Splits an identifier into `(base, quote)`. The quote is empty for bare conventions.
    ///
    /// Returns `None` when no base/quote boundary can be found.
    pub fn split(&self, raw: &str) -> Option<(String, String)> {
        let mut ident = raw.trim().to_uppercase();
        for tag in self.tags {
            if let Some(stripped) = ident.strip_suffix(*tag) {
                ident = stripped.to_string();
                break;
            }
        }

        if ident.is_empty() {
            return None;
        }

        if self.separators.is_empty() && self.quotes.is_empty() {
            return Some((ident, String::new()));
        }

        if ident.contains(self.separators) {
            let mut parts = ident.split(self.separators);
            let base = parts.next().unwrap_or_default().trim();
            let quote = parts.next().unwrap_or_default().trim();
            if base.is_empty() || quote.is_empty() {
                return None;
            }
            return Some((base.to_string(), quote.to_string()));
        }

        self.quotes.iter().chain(OTHER_QUOTES).find_map(|quote| {
            ident
                .strip_suffix(*quote)
                .filter(|base| !base.is_empty())
                .map(|base| (base.to_string(), quote.to_string()))
        })
    }

    /// Base asset for instruments quoted in one of this convention's quotes.
    ///
    /// Pairs that split into a quote outside the list (`ETHBTC`, `ETH-EUR`)
    /// resolve to `None`; their volume is not in a USD-like unit and cannot be
    /// summed across venues. Identifiers with no recognisable boundary
    /// (`NEWLISTING`) are passed through like [`normalize`] does.
    pub fn resolve(&self, raw: &str) -> Option<String> {
        match self.split(raw) {
            Some((base, quote)) => {
                (self.quotes.is_empty() || self.quotes.contains(&quote.as_str())).then_some(base)
            }
            None => Some(raw.trim().to_uppercase()).filter(|s| !s.is_empty()),
        }
    }
}

/// Maps a raw instrument identifier to its canonical base-asset symbol.
///
/// Total: identifiers with no recognisable quote are passed through trimmed
/// and uppercased so they remain filterable.
pub fn normalize(raw: &str, convention: &QuoteConvention) -> String {
    convention
        .split(raw)
        .map(|(base, _)| base)
        .unwrap_or_else(|| raw.trim().to_uppercase())
}
