// src/venues/bitget.rs

use serde_json::Value;

use super::{rows_at, snapshot, str_field};
use crate::source::{Endpoint, MarketKind, Venue};
use crate::symbol::{QuoteConvention, USD_QUOTES};
use crate::ticker::{parse_f64_any, MarketSnapshot};

const DEFAULT_BASE_URL: &str = "https://api.bitget.com";

// v1 identifiers carry a product-line tag (`BTCUSDT_SPBL`, `BTCUSDT_UMCBL`).
const CONVENTION: QuoteConvention =
    QuoteConvention::concatenated(USD_QUOTES).with_tags(&["_SPBL", "_UMCBL", "_DMCBL", "_CMCBL"]);

/// Bitget v2 spot and USDT-futures tickers, wrapped as `{code: "00000", data: [...]}`.
///
/// Field names drifted between API versions; the v1 spellings are accepted too.
#[derive(Debug, Clone)]
pub struct Bitget {
    base_url: String,
}

impl Default for Bitget {
    fn default() -> Self {
        Self::new()
    }
}

impl Bitget {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Bitget {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Venue for Bitget {
    const NAME: &'static str = "bitget";

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::new(
                format!("{}/api/v2/spot/market/tickers", self.base_url),
                MarketKind::Spot,
            ),
            Endpoint::new(
                format!(
                    "{}/api/v2/mix/market/tickers?productType=USDT-FUTURES",
                    self.base_url
                ),
                MarketKind::Derivatives,
            ),
        ]
    }

    fn parse(&self, _endpoint: &Endpoint, body: &Value) -> Result<Vec<MarketSnapshot>, String> {
        let code = str_field(body, "code").unwrap_or_default();
        if code != "00000" {
            let msg = str_field(body, "msg").unwrap_or_default();
            return Err(format!("error code {:?}: {}", code, msg));
        }

        Ok(rows_at(body, &["data"])?
            .iter()
            .filter_map(|item| {
                snapshot(
                    &CONVENTION,
                    str_field(item, "symbol")?,
                    parse_f64_any(item, &["lastPr", "close", "last"]),
                    parse_f64_any(item, &["quoteVolume", "quoteVol", "usdtVolume"]),
                    parse_f64_any(item, &["change24h", "change"]),
                )
            })
            .collect())
    }
}
