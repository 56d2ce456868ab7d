// src/venues/huobi.rs

use serde_json::Value;

use super::{rows_at, snapshot, str_field};
use crate::source::{Endpoint, MarketKind, Venue};
use crate::symbol::{QuoteConvention, USD_QUOTES};
use crate::ticker::{change_between, parse_f64, MarketSnapshot};

const DEFAULT_SPOT_BASE_URL: &str = "https://api.huobi.pro";
const DEFAULT_SWAP_BASE_URL: &str = "https://api.hbdm.com";

// Spot symbols are concatenated (`btcusdt`), swap contracts separated (`BTC-USDT`).
const CONVENTION: QuoteConvention = QuoteConvention::separated(&['-'], USD_QUOTES);

/// Huobi (HTX) spot tickers plus USDT-margined swap tickers.
///
/// Spot rows live under `data` with quote volume in `vol`; swap rows live under
/// `ticks` with quote turnover in `trade_turnover`.
#[derive(Debug, Clone)]
pub struct Huobi {
    spot_base_url: String,
    swap_base_url: String,
}

impl Default for Huobi {
    fn default() -> Self {
        Self::new()
    }
}

impl Huobi {
    pub fn new() -> Self {
        Huobi {
            spot_base_url: DEFAULT_SPOT_BASE_URL.to_string(),
            swap_base_url: DEFAULT_SWAP_BASE_URL.to_string(),
        }
    }

    /// Serves both spot and swap endpoints from one host (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Huobi {
            spot_base_url: base_url.clone(),
            swap_base_url: base_url,
        }
    }
}

impl Venue for Huobi {
    const NAME: &'static str = "huobi";

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::new(format!("{}/market/tickers", self.spot_base_url), MarketKind::Spot),
            Endpoint::new(
                format!(
                    "{}/linear-swap-ex/market/detail/batch_merged?business_type=swap",
                    self.swap_base_url
                ),
                MarketKind::Derivatives,
            ),
        ]
    }

    fn parse(&self, endpoint: &Endpoint, body: &Value) -> Result<Vec<MarketSnapshot>, String> {
        let status = str_field(body, "status").unwrap_or_default();
        if status != "ok" {
            let msg = str_field(body, "err-msg")
                .or_else(|| str_field(body, "err_msg"))
                .unwrap_or_default();
            return Err(format!("status {:?}: {}", status, msg));
        }

        let (list_key, symbol_key, volume_key) = match endpoint.kind {
            MarketKind::Spot => ("data", "symbol", "vol"),
            MarketKind::Derivatives => ("ticks", "contract_code", "trade_turnover"),
        };

        Ok(rows_at(body, &[list_key])?
            .iter()
            .filter_map(|item| {
                let open = parse_f64(item.get("open"));
                let close = parse_f64(item.get("close"));
                snapshot(
                    &CONVENTION,
                    str_field(item, symbol_key)?,
                    close,
                    parse_f64(item.get(volume_key)),
                    change_between(open, close),
                )
            })
            .collect())
    }
}
