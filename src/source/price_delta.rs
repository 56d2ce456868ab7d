// src/source/price_delta.rs

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use super::{fetch_snapshots, SourceAdapter, Venue};
use crate::error::Result;
use crate::session::HttpSession;
use crate::ticker::{CanonicalTicker, MarketSnapshot};

/// Stateful adapter for venues that only expose price and 24h volume.
///
/// Remembers the last observed price per symbol. A symbol's first observation
/// contributes `0.0`; later ones contribute `volume * (price - prev) / prev`.
/// The memory is private to the instance and only ever grows.
pub struct PriceDeltaAdapter<V: Venue> {
    venue: V,
    previous: Mutex<HashMap<String, f64>>,
}

impl<V: Venue> PriceDeltaAdapter<V> {
    pub fn new(venue: V) -> Self {
        Self::with_previous(venue, HashMap::new())
    }

    /// Starts from a known set of previous prices.
    pub fn with_previous(venue: V, previous: HashMap<String, f64>) -> Self {
        PriceDeltaAdapter {
            venue,
            previous: Mutex::new(previous),
        }
    }

    pub async fn previous_price(&self, symbol: &str) -> Option<f64> {
        self.previous.lock().await.get(symbol).copied()
    }

    /// Derives metrics against the stored prices, then records the new ones.
    ///
    /// Every row of one batch is compared with the prices stored before the
    /// batch, so a symbol listed on both spot and derivatives endpoints is not
    /// compared against itself.
    pub async fn observe(&self, snapshots: Vec<MarketSnapshot>) -> Vec<CanonicalTicker> {
        let mut previous = self.previous.lock().await;
        let mut latest = HashMap::with_capacity(snapshots.len());

        let tickers = snapshots
            .into_iter()
            .map(|snapshot| {
                let metric = match previous.get(&snapshot.symbol) {
                    Some(&prev) if prev > 0.0 => snapshot.quote_volume * (snapshot.price - prev) / prev,
                    _ => 0.0,
                };
                latest.insert(snapshot.symbol.clone(), snapshot.price);
                CanonicalTicker::new(V::NAME, snapshot.symbol, metric)
            })
            .collect();

        previous.extend(latest);
        tickers
    }
}

#[async_trait]
impl<V: Venue> SourceAdapter for PriceDeltaAdapter<V> {
    fn name(&self) -> &str {
        V::NAME
    }

    async fn fetch(&self, session: &HttpSession) -> Result<Vec<CanonicalTicker>> {
        let snapshots = fetch_snapshots(&self.venue, session).await?;
        Ok(self.observe(snapshots).await)
    }
}
