// src/venues/bybit.rs

use serde_json::Value;

use super::{rows_at, snapshot, str_field};
use crate::source::{Endpoint, MarketKind, Venue};
use crate::symbol::QuoteConvention;
use crate::ticker::{parse_f64, MarketSnapshot};

const DEFAULT_BASE_URL: &str = "https://api.bybit.com";

// USDC perpetuals are listed as `BTCPERP`.
const QUOTES: &[&str] = &["FDUSD", "USDT", "USDC", "PERP", "USD"];
const CONVENTION: QuoteConvention = QuoteConvention::concatenated(QUOTES);

/// Bybit v5 tickers for spot and linear contracts.
#[derive(Debug, Clone)]
pub struct Bybit {
    base_url: String,
}

impl Default for Bybit {
    fn default() -> Self {
        Self::new()
    }
}

impl Bybit {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Bybit {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Venue for Bybit {
    const NAME: &'static str = "bybit";

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::new(
                format!("{}/v5/market/tickers?category=spot", self.base_url),
                MarketKind::Spot,
            ),
            Endpoint::new(
                format!("{}/v5/market/tickers?category=linear", self.base_url),
                MarketKind::Derivatives,
            ),
        ]
    }

    fn parse(&self, _endpoint: &Endpoint, body: &Value) -> Result<Vec<MarketSnapshot>, String> {
        let ret_code = body.get("retCode").and_then(Value::as_i64);
        if ret_code != Some(0) {
            let msg = str_field(body, "retMsg").unwrap_or_default();
            return Err(format!("retCode {:?}: {}", ret_code, msg));
        }

        Ok(rows_at(body, &["result", "list"])?
            .iter()
            .filter_map(|item| {
                snapshot(
                    &CONVENTION,
                    str_field(item, "symbol")?,
                    parse_f64(item.get("lastPrice")),
                    parse_f64(item.get("turnover24h")),
                    parse_f64(item.get("price24hPcnt")),
                )
            })
            .collect())
    }
}
