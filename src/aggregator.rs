// src/aggregator.rs

use futures::future::join_all;
use futures::FutureExt;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{FlowError, Result};
use crate::session::HttpSession;
use crate::source::SourceAdapter;
use crate::stablecoin::StablecoinFilter;
use crate::ticker::CanonicalTicker;

/// Cross-source total for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedEntry {
    pub symbol: String,
    pub metric: f64,
}

/// Symbol → summed metric, at most one entry per symbol, iterated in symbol order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowMap {
    entries: BTreeMap<String, f64>,
}

impl FlowMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `metric` to the symbol's running total. Never replaces.
    pub fn accumulate(&mut self, symbol: &str, metric: f64) {
        *self.entries.entry(symbol.to_string()).or_insert(0.0) += metric;
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries.get(symbol).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = MergedEntry> + '_ {
        self.entries.iter().map(|(symbol, metric)| MergedEntry {
            symbol: symbol.clone(),
            metric: *metric,
        })
    }

    /// Accumulates every ticker that passes `filter` and returns how many did.
    pub fn absorb<'a, I>(&mut self, tickers: I, filter: &StablecoinFilter) -> usize
    where
        I: IntoIterator<Item = &'a CanonicalTicker>,
    {
        let mut kept = 0;
        for ticker in tickers.into_iter().filter(|t| filter.allows(&t.symbol)) {
            self.accumulate(&ticker.symbol, ticker.metric);
            kept += 1;
        }
        kept
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for FlowMap {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut map = FlowMap::new();
        for (symbol, metric) in iter {
            map.accumulate(symbol.as_ref(), metric);
        }
        map
    }
}

/// Result of one aggregation pass where at least one source answered.
#[derive(Debug, Clone, Default)]
pub struct AggregateReport {
    pub flows: FlowMap,
    pub succeeded: Vec<String>,
    pub failures: Vec<FlowError>,
}

/// Fans out to every adapter, waits for all of them, merges what came back.
pub struct Aggregator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    filter: StablecoinFilter,
    source_timeout: Duration,
}

impl Aggregator {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, filter: StablecoinFilter, source_timeout: Duration) -> Self {
        Aggregator {
            adapters,
            filter,
            source_timeout,
        }
    }

    pub fn source_names(&self) -> Vec<String> {
        self.adapters.iter().map(|a| a.name().to_string()).collect()
    }

    /// Fetches all sources concurrently, each under its own timeout.
    ///
    /// Failures are logged and returned in the report; they never fail the
    /// pass unless every source failed, which yields `FlowError::NoData`.
    /// Dropping the returned future cancels all in-flight fetches.
    pub async fn run(&self, session: &HttpSession) -> Result<AggregateReport> {
        let fetches = self.adapters.iter().map(|adapter| {
            let name = adapter.name().to_string();
            let guarded = AssertUnwindSafe(adapter.fetch(session)).catch_unwind();
            async move {
                let outcome = match timeout(self.source_timeout, guarded).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(_panic)) => Err(FlowError::unavailable(&name, "adapter panicked")),
                    Err(_elapsed) => Err(FlowError::SourceTimeout {
                        source_name: name.clone(),
                        after: self.source_timeout,
                    }),
                };
                (name, outcome)
            }
        });

        let outcomes = join_all(fetches).await;
        self.merge(outcomes)
    }

    /// Folds per-source outcomes into one report, in adapter order.
    pub fn merge(&self, outcomes: Vec<(String, Result<Vec<CanonicalTicker>>)>) -> Result<AggregateReport> {
        let attempted = outcomes.len();
        let mut report = AggregateReport::default();

        for (name, outcome) in outcomes {
            match outcome {
                Ok(tickers) => {
                    let kept = report.flows.absorb(&tickers, &self.filter);
                    debug!(
                        source = %name,
                        tickers = tickers.len(),
                        stablecoins = tickers.len() - kept,
                        "merged source"
                    );
                    report.succeeded.push(name);
                }
                Err(error) => {
                    warn!(source = %name, %error, "source failed, skipping");
                    report.failures.push(error);
                }
            }
        }

        if report.succeeded.is_empty() {
            return Err(FlowError::NoData { attempted });
        }

        info!(
            sources_ok = report.succeeded.len(),
            sources_failed = report.failures.len(),
            symbols = report.flows.len(),
            "aggregation complete"
        );
        Ok(report)
    }
}
