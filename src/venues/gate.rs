// src/venues/gate.rs

use serde_json::Value;

use super::{snapshot, str_field};
use crate::source::{Endpoint, MarketKind, Venue};
use crate::symbol::{QuoteConvention, USD_QUOTES};
use crate::ticker::{parse_f64, MarketSnapshot};

const DEFAULT_BASE_URL: &str = "https://api.gateio.ws";
const CONVENTION: QuoteConvention = QuoteConvention::separated(&['_'], USD_QUOTES);

/// Gate.io legacy tickers: one object keyed by pair (`btc_usdt`).
#[derive(Debug, Clone)]
pub struct Gate {
    base_url: String,
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

impl Gate {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Gate {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Venue for Gate {
    const NAME: &'static str = "gate";

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![Endpoint::new(
            format!("{}/api2/1/tickers", self.base_url),
            MarketKind::Spot,
        )]
    }

    fn parse(&self, _endpoint: &Endpoint, body: &Value) -> Result<Vec<MarketSnapshot>, String> {
        let pairs = body
            .as_object()
            .ok_or_else(|| "expected an object keyed by pair".to_string())?;

        if str_field(body, "result") == Some("false") {
            let msg = str_field(body, "message").unwrap_or_default();
            return Err(format!("request rejected: {}", msg));
        }

        Ok(pairs
            .iter()
            .filter(|(_, item)| item.is_object())
            .filter_map(|(pair, item)| {
                snapshot(
                    &CONVENTION,
                    pair,
                    parse_f64(item.get("last")),
                    parse_f64(item.get("quoteVolume")),
                    parse_f64(item.get("percentChange")) / 100.0,
                )
            })
            .collect())
    }
}
