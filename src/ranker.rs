// src/ranker.rs

use std::cmp::Ordering;

use crate::aggregator::{FlowMap, MergedEntry};

/// Top inflow and outflow lists for one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    /// Strictly positive metrics, largest first.
    pub inflow: Vec<MergedEntry>,
    /// Strictly negative metrics, most negative first.
    pub outflow: Vec<MergedEntry>,
}

impl Ranking {
    pub fn is_empty(&self) -> bool {
        self.inflow.is_empty() && self.outflow.is_empty()
    }
}

/// Splits `flows` by sign and keeps the `n` strongest of each side.
///
/// Zero and non-finite metrics carry no direction and are dropped. Equal
/// metrics keep symbol order, so the output is fully deterministic.
pub fn rank(flows: &FlowMap, n: usize) -> Ranking {
    let (mut inflow, mut outflow): (Vec<_>, Vec<_>) = flows
        .iter()
        .filter(|entry| entry.metric.is_finite() && entry.metric != 0.0)
        .partition(|entry| entry.metric > 0.0);

    inflow.sort_by(|a, b| by_metric(b, a).then_with(|| a.symbol.cmp(&b.symbol)));
    outflow.sort_by(|a, b| by_metric(a, b).then_with(|| a.symbol.cmp(&b.symbol)));

    inflow.truncate(n);
    outflow.truncate(n);

    Ranking { inflow, outflow }
}

fn by_metric(a: &MergedEntry, b: &MergedEntry) -> Ordering {
    a.metric.partial_cmp(&b.metric).unwrap_or(Ordering::Equal)
}
