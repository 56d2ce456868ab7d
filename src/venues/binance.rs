// src/venues/binance.rs

use serde_json::Value;

use super::{snapshot, str_field};
use crate::source::{Endpoint, MarketKind, Venue};
use crate::symbol::{QuoteConvention, USD_QUOTES};
use crate::ticker::{parse_f64, MarketSnapshot};

const DEFAULT_BASE_URL: &str = "https://api.binance.com";
const CONVENTION: QuoteConvention = QuoteConvention::concatenated(USD_QUOTES);

/// Binance spot 24h tickers: a top-level list of `{symbol, lastPrice, quoteVolume, priceChangePercent}`.
#[derive(Debug, Clone)]
pub struct Binance {
    base_url: String,
}

impl Default for Binance {
    fn default() -> Self {
        Self::new()
    }
}

impl Binance {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Binance {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Venue for Binance {
    const NAME: &'static str = "binance";

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![Endpoint::new(
            format!("{}/api/v3/ticker/24hr", self.base_url),
            MarketKind::Spot,
        )]
    }

    fn parse(&self, _endpoint: &Endpoint, body: &Value) -> Result<Vec<MarketSnapshot>, String> {
        let rows = match body.as_array() {
            Some(rows) => rows,
            None => {
                let msg = str_field(body, "msg").unwrap_or("expected a list of tickers");
                return Err(msg.to_string());
            }
        };

        Ok(rows
            .iter()
            .filter_map(|item| {
                snapshot(
                    &CONVENTION,
                    str_field(item, "symbol")?,
                    parse_f64(item.get("lastPrice")),
                    parse_f64(item.get("quoteVolume")),
                    parse_f64(item.get("priceChangePercent")) / 100.0,
                )
            })
            .collect())
    }
}
