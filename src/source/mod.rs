// src/source/mod.rs

//! Source adapters: one venue in, canonical tickers out.
//!
//! A [`Venue`] knows endpoints and payload shapes. An adapter wraps a venue
//! and decides how a flow metric is derived from its snapshots:
//!
//! - [`VolumeChangeAdapter`]: `quote_volume * change_ratio`, stateless.
//! - [`PriceDeltaAdapter`]: `quote_volume * (price - prev) / prev`, keeps the
//!   previous cycle's prices.

mod price_delta;
mod volume_change;

pub use price_delta::PriceDeltaAdapter;
pub use volume_change::VolumeChangeAdapter;

use async_trait::async_trait;
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

use crate::error::{FlowError, Result};
use crate::session::HttpSession;
use crate::ticker::{CanonicalTicker, MarketSnapshot};

/// Produces one cycle's canonical tickers for a single source.
///
/// Implementations report failures as values; they must not panic and never
/// see sibling adapters.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, session: &HttpSession) -> Result<Vec<CanonicalTicker>>;
}

/// How exchange adapters turn snapshots into a signed flow estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricMode {
    /// 24h quote volume times 24h price change ratio.
    #[default]
    VolumeChange,
    /// 24h quote volume times price change since the previous cycle.
    PriceDelta,
}

impl FromStr for MetricMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "change" | "volume_change" => Ok(MetricMode::VolumeChange),
            "delta" | "price_delta" => Ok(MetricMode::PriceDelta),
            other => Err(format!("unknown metric {:?}, expected \"change\" or \"delta\"", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketKind {
    Spot,
    Derivatives,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub kind: MarketKind,
}

impl Endpoint {
    pub fn new(url: impl Into<String>, kind: MarketKind) -> Self {
        Endpoint { url: url.into(), kind }
    }
}

/// Venue-specific knowledge: where to ask and how to read the answer.
pub trait Venue: Send + Sync + 'static {
    const NAME: &'static str;

    fn endpoints(&self) -> Vec<Endpoint>;

    fn headers(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Flattens one endpoint's payload.
    ///
    /// `Err` is reserved for shape failures (error envelope, missing list);
    /// malformed numeric fields coerce to zero instead.
    fn parse(&self, endpoint: &Endpoint, body: &Value) -> std::result::Result<Vec<MarketSnapshot>, String>;
}

/// Fetches and parses every endpoint of `venue` in order.
///
/// Any endpoint failing fails the whole venue, so a cycle never mixes a
/// venue's spot list with a missing derivatives list.
pub async fn fetch_snapshots<V: Venue>(venue: &V, session: &HttpSession) -> Result<Vec<MarketSnapshot>> {
    let headers = venue.headers();
    let mut snapshots = Vec::new();

    for endpoint in venue.endpoints() {
        let body = session.get_json(V::NAME, &endpoint.url, &headers).await?;
        let parsed = venue
            .parse(&endpoint, &body)
            .map_err(|reason| FlowError::parse(V::NAME, reason))?;
        debug!(source = V::NAME, url = %endpoint.url, rows = parsed.len(), "parsed endpoint");
        snapshots.extend(parsed);
    }

    Ok(snapshots)
}
