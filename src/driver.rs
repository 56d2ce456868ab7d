// src/driver.rs

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::aggregator::Aggregator;
use crate::error::FlowError;
use crate::notifier::Notifier;
use crate::ranker::rank;
use crate::report::ReportFormatter;
use crate::session::HttpSession;

/// What one fetch → merge → rank → report → notify pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleSummary {
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub symbols: usize,
    pub inflow: usize,
    pub outflow: usize,
    /// Every source failed; the no-data message was sent instead of a ranking.
    pub no_data: bool,
    pub delivered: bool,
    pub message: String,
}

/// Runs ranking cycles on a fixed interval, one at a time.
pub struct CycleDriver {
    session: Arc<HttpSession>,
    aggregator: Aggregator,
    formatter: ReportFormatter,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
}

impl CycleDriver {
    pub fn new(
        session: Arc<HttpSession>,
        aggregator: Aggregator,
        formatter: ReportFormatter,
        notifier: Arc<dyn Notifier>,
        interval: Duration,
    ) -> Self {
        CycleDriver {
            session,
            aggregator,
            formatter,
            notifier,
            interval,
        }
    }

    /// One full pass. Never fails: source and delivery problems end up in the summary.
    pub async fn run_cycle(&self) -> CycleSummary {
        let mut summary = CycleSummary::default();

        summary.message = match self.aggregator.run(&self.session).await {
            Ok(report) => {
                let ranking = rank(&report.flows, self.formatter.top_n());
                summary.sources_ok = report.succeeded.len();
                summary.sources_failed = report.failures.len();
                summary.symbols = report.flows.len();
                summary.inflow = ranking.inflow.len();
                summary.outflow = ranking.outflow.len();
                self.formatter.format(&ranking, Utc::now())
            }
            Err(FlowError::NoData { attempted }) => {
                warn!(attempted, "no source returned data this cycle");
                summary.sources_failed = attempted;
                summary.no_data = true;
                let reason = format!("all {} sources failed", attempted);
                self.formatter.no_data(Utc::now(), &reason)
            }
            Err(other) => {
                error!(error = %other, "aggregation failed");
                summary.no_data = true;
                self.formatter.no_data(Utc::now(), &other.to_string())
            }
        };

        match self.notifier.send(&summary.message).await {
            Ok(()) => summary.delivered = true,
            Err(e) => error!(error = %e, "report delivery failed, waiting for next cycle"),
        }

        summary
    }

    /// Runs a cycle now and then every interval until `shutdown_rx` fires or closes.
    ///
    /// Cycles never overlap; a cycle still running at shutdown is dropped,
    /// which cancels its in-flight requests.
    pub async fn run(self, mut shutdown_rx: mpsc::Receiver<()>) {
        info!(
            interval_secs = self.interval.as_secs(),
            sources = ?self.aggregator.source_names(),
            "starting cycle driver"
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.recv() => {
                    info!("cycle driver received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    tokio::select! {
                        biased;

                        _ = shutdown_rx.recv() => {
                            info!("shutdown during cycle, cancelling in-flight fetches");
                            break;
                        }
                        summary = self.run_cycle() => {
                            info!(
                                sources_ok = summary.sources_ok,
                                sources_failed = summary.sources_failed,
                                symbols = summary.symbols,
                                inflow = summary.inflow,
                                outflow = summary.outflow,
                                delivered = summary.delivered,
                                "cycle finished"
                            );
                        }
                    }
                }
            }
        }
    }
}
