// src/venues/coinmarketcap.rs

use serde_json::Value;

use super::{rows_at, snapshot, str_field};
use crate::source::{Endpoint, MarketKind, Venue};
use crate::symbol::QuoteConvention;
use crate::ticker::{parse_f64, MarketSnapshot};

const DEFAULT_BASE_URL: &str = "https://pro-api.coinmarketcap.com";
const DEFAULT_LIMIT: u32 = 500;
const CONVENTION: QuoteConvention = QuoteConvention::bare();

/// CoinMarketCap latest listings. Symbols are already base assets; figures
/// come from the `quote.USD` block.
#[derive(Debug, Clone)]
pub struct CoinMarketCap {
    base_url: String,
    api_key: String,
    limit: u32,
}

impl CoinMarketCap {
    pub fn new(api_key: impl Into<String>) -> Self {
        CoinMarketCap {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }
}

impl Venue for CoinMarketCap {
    const NAME: &'static str = "coinmarketcap";

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![Endpoint::new(
            format!(
                "{}/v1/cryptocurrency/listings/latest?start=1&limit={}&convert=USD",
                self.base_url, self.limit
            ),
            MarketKind::Spot,
        )]
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        vec![("X-CMC_PRO_API_KEY", self.api_key.clone())]
    }

    fn parse(&self, _endpoint: &Endpoint, body: &Value) -> Result<Vec<MarketSnapshot>, String> {
        let status = body.get("status");
        let error_code = status
            .and_then(|s| s.get("error_code"))
            .and_then(Value::as_i64)
            .unwrap_or(0);
        if error_code != 0 {
            let msg = status
                .and_then(|s| str_field(s, "error_message"))
                .unwrap_or_default();
            return Err(format!("error code {}: {}", error_code, msg));
        }

        Ok(rows_at(body, &["data"])?
            .iter()
            .filter_map(|coin| {
                let usd = coin.get("quote").and_then(|q| q.get("USD"));
                snapshot(
                    &CONVENTION,
                    str_field(coin, "symbol")?,
                    parse_f64(usd.and_then(|u| u.get("price"))),
                    parse_f64(usd.and_then(|u| u.get("volume_24h"))),
                    parse_f64(usd.and_then(|u| u.get("percent_change_24h"))) / 100.0,
                )
            })
            .collect())
    }
}
