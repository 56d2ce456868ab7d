// src/lib.rs

pub mod aggregator;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod ranker;
pub mod report;
pub mod session;
pub mod source;
pub mod stablecoin;
pub mod symbol;
pub mod ticker;
pub mod venues;

pub use aggregator::{AggregateReport, Aggregator, FlowMap, MergedEntry};
pub use config::{FlowConfig, NotifierConfig};
pub use driver::{CycleDriver, CycleSummary};
pub use error::{ConfigError, FlowError, Result};
pub use notifier::{LogNotifier, Notifier, TelegramNotifier};
pub use ranker::{rank, Ranking};
pub use report::{format_magnitude, ReportFormatter};
pub use session::HttpSession;
pub use source::{MetricMode, PriceDeltaAdapter, SourceAdapter, Venue, VolumeChangeAdapter};
pub use stablecoin::StablecoinFilter;
pub use symbol::{normalize, QuoteConvention};
pub use ticker::{CanonicalTicker, MarketSnapshot};
