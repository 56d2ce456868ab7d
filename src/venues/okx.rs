// src/venues/okx.rs

use serde_json::Value;

use super::{rows_at, snapshot, str_field};
use crate::source::{Endpoint, MarketKind, Venue};
use crate::symbol::{QuoteConvention, USD_QUOTES};
use crate::ticker::{change_between, parse_f64, MarketSnapshot};

const DEFAULT_BASE_URL: &str = "https://www.okx.com";
const CONVENTION: QuoteConvention = QuoteConvention::separated(&['-'], USD_QUOTES);

/// OKX v5 market tickers for spot and perpetual swaps.
///
/// `volCcy24h` is in quote currency for spot but in base currency for swaps,
/// so swap volume is converted with the last price.
#[derive(Debug, Clone)]
pub struct Okx {
    base_url: String,
}

impl Default for Okx {
    fn default() -> Self {
        Self::new()
    }
}

impl Okx {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Okx {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Venue for Okx {
    const NAME: &'static str = "okx";

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::new(
                format!("{}/api/v5/market/tickers?instType=SPOT", self.base_url),
                MarketKind::Spot,
            ),
            Endpoint::new(
                format!("{}/api/v5/market/tickers?instType=SWAP", self.base_url),
                MarketKind::Derivatives,
            ),
        ]
    }

    fn parse(&self, endpoint: &Endpoint, body: &Value) -> Result<Vec<MarketSnapshot>, String> {
        let code = str_field(body, "code").unwrap_or_default();
        if code != "0" {
            let msg = str_field(body, "msg").unwrap_or_default();
            return Err(format!("error code {:?}: {}", code, msg));
        }

        Ok(rows_at(body, &["data"])?
            .iter()
            .filter_map(|item| {
                let last = parse_f64(item.get("last"));
                let open = parse_f64(item.get("open24h"));
                let vol_ccy = parse_f64(item.get("volCcy24h"));
                let quote_volume = match endpoint.kind {
                    MarketKind::Spot => vol_ccy,
                    MarketKind::Derivatives => vol_ccy * last,
                };
                snapshot(
                    &CONVENTION,
                    str_field(item, "instId")?,
                    last,
                    quote_volume,
                    change_between(open, last),
                )
            })
            .collect())
    }
}
