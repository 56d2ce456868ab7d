// src/source/volume_change.rs

use async_trait::async_trait;

use super::{fetch_snapshots, SourceAdapter, Venue};
use crate::error::Result;
use crate::session::HttpSession;
use crate::ticker::{CanonicalTicker, MarketSnapshot};

/// Stateless adapter: each row's 24h quote volume signed and scaled by its
/// 24h price change.
pub struct VolumeChangeAdapter<V: Venue> {
    venue: V,
}

impl<V: Venue> VolumeChangeAdapter<V> {
    pub fn new(venue: V) -> Self {
        VolumeChangeAdapter { venue }
    }

    pub fn metric(snapshot: &MarketSnapshot) -> f64 {
        snapshot.quote_volume * snapshot.change_ratio
    }

    pub fn tickers_from(&self, snapshots: Vec<MarketSnapshot>) -> Vec<CanonicalTicker> {
        snapshots
            .into_iter()
            .map(|snapshot| {
                let metric = Self::metric(&snapshot);
                CanonicalTicker::new(V::NAME, snapshot.symbol, metric)
            })
            .collect()
    }
}

#[async_trait]
impl<V: Venue> SourceAdapter for VolumeChangeAdapter<V> {
    fn name(&self) -> &str {
        V::NAME
    }

    async fn fetch(&self, session: &HttpSession) -> Result<Vec<CanonicalTicker>> {
        let snapshots = fetch_snapshots(&self.venue, session).await?;
        Ok(self.tickers_from(snapshots))
    }
}
