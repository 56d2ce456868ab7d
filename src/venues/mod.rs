// src/venues/mod.rs

//! Built-in venues. Adding one means writing a [`Venue`] impl here and
//! registering it in [`VenueId`].

mod binance;
mod bitget;
mod bybit;
mod coinmarketcap;
mod gate;
mod huobi;
mod okx;

pub use binance::Binance;
pub use bitget::Bitget;
pub use bybit::Bybit;
pub use coinmarketcap::CoinMarketCap;
pub use gate::Gate;
pub use huobi::Huobi;
pub use okx::Okx;

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::source::{MetricMode, PriceDeltaAdapter, SourceAdapter, Venue, VolumeChangeAdapter};
use crate::symbol::QuoteConvention;
use crate::ticker::MarketSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VenueId {
    Binance,
    Okx,
    Bybit,
    Bitget,
    Gate,
    Huobi,
    CoinMarketCap,
}

impl VenueId {
    pub const EXCHANGES: [VenueId; 6] = [
        VenueId::Binance,
        VenueId::Okx,
        VenueId::Bybit,
        VenueId::Bitget,
        VenueId::Gate,
        VenueId::Huobi,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            VenueId::Binance => Binance::NAME,
            VenueId::Okx => Okx::NAME,
            VenueId::Bybit => Bybit::NAME,
            VenueId::Bitget => Bitget::NAME,
            VenueId::Gate => Gate::NAME,
            VenueId::Huobi => Huobi::NAME,
            VenueId::CoinMarketCap => CoinMarketCap::NAME,
        }
    }

    /// Env key overriding this venue's base URL, e.g. `FLOW_BINANCE_BASE_URL`.
    pub fn base_url_key(&self) -> String {
        format!("FLOW_{}_BASE_URL", self.name().to_uppercase())
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VenueId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binance" => Ok(VenueId::Binance),
            "okx" => Ok(VenueId::Okx),
            "bybit" => Ok(VenueId::Bybit),
            "bitget" => Ok(VenueId::Bitget),
            "gate" | "gateio" => Ok(VenueId::Gate),
            "huobi" | "htx" => Ok(VenueId::Huobi),
            "coinmarketcap" | "cmc" => Ok(VenueId::CoinMarketCap),
            other => Err(format!("unknown source {:?}", other)),
        }
    }
}

/// Everything needed to build one configured adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpec {
    pub venue: VenueId,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl SourceSpec {
    pub fn new(venue: VenueId) -> Self {
        SourceSpec {
            venue,
            base_url: None,
            api_key: None,
        }
    }
}

/// Builds the adapter for `spec`, deriving metrics the way `mode` says.
pub fn build_adapter(spec: &SourceSpec, mode: MetricMode) -> Arc<dyn SourceAdapter> {
    let base_url = spec.base_url.clone();
    match spec.venue {
        VenueId::Binance => wrap(base_url.map_or_else(Binance::new, |url| Binance::with_base_url(url)), mode),
        VenueId::Okx => wrap(base_url.map_or_else(Okx::new, |url| Okx::with_base_url(url)), mode),
        VenueId::Bybit => wrap(base_url.map_or_else(Bybit::new, |url| Bybit::with_base_url(url)), mode),
        VenueId::Bitget => wrap(base_url.map_or_else(Bitget::new, |url| Bitget::with_base_url(url)), mode),
        VenueId::Gate => wrap(base_url.map_or_else(Gate::new, |url| Gate::with_base_url(url)), mode),
        VenueId::Huobi => wrap(base_url.map_or_else(Huobi::new, |url| Huobi::with_base_url(url)), mode),
        VenueId::CoinMarketCap => {
            let mut venue = CoinMarketCap::new(spec.api_key.clone().unwrap_or_default());
            if let Some(url) = base_url {
                venue = venue.with_base_url(url);
            }
            wrap(venue, mode)
        }
    }
}

fn wrap<V: Venue>(venue: V, mode: MetricMode) -> Arc<dyn SourceAdapter> {
    match mode {
        MetricMode::VolumeChange => Arc::new(VolumeChangeAdapter::new(venue)),
        MetricMode::PriceDelta => Arc::new(PriceDeltaAdapter::new(venue)),
    }
}

/// Walks `path` through nested objects and expects a list at the end.
pub(crate) fn rows_at<'a>(body: &'a Value, path: &[&str]) -> Result<&'a Vec<Value>, String> {
    let mut node = body;
    for key in path {
        node = node
            .get(*key)
            .ok_or_else(|| format!("missing field {:?}", key))?;
    }
    node.as_array()
        .ok_or_else(|| format!("expected a list at {:?}", path.join(".")))
}

pub(crate) fn str_field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str)
}

/// Builds a snapshot when `raw_symbol` is a USD-like quoted instrument.
pub(crate) fn snapshot(
    convention: &QuoteConvention,
    raw_symbol: &str,
    price: f64,
    quote_volume: f64,
    change_ratio: f64,
) -> Option<MarketSnapshot> {
    convention.resolve(raw_symbol).map(|symbol| MarketSnapshot {
        symbol,
        price,
        quote_volume,
        change_ratio,
    })
}
