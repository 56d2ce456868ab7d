// src/config.rs

use chrono_tz::Tz;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;
use crate::source::{MetricMode, SourceAdapter};
use crate::stablecoin::{StablecoinFilter, DEFAULT_STABLECOINS};
use crate::venues::{build_adapter, SourceSpec, VenueId};

pub const DEFAULT_TOP_N: usize = 20;
pub const DEFAULT_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 15;
pub const REQUESTS_PER_SECOND: u32 = 10;
pub const MAX_BURST_REQUESTS: u32 = 20;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub enum NotifierConfig {
    /// Reports go to the log only.
    Log,
    Telegram { bot_token: String, chat_id: String },
}

/// Everything the service needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowConfig {
    pub top_n: usize,
    pub interval: Duration,
    pub source_timeout: Duration,
    pub stablecoins: Vec<String>,
    pub sources: Vec<SourceSpec>,
    pub metric: MetricMode,
    pub requests_per_second: u32,
    pub max_burst: u32,
    pub report_timezone: Tz,
    pub notifier: NotifierConfig,
    pub log_level: String,
}

impl FlowConfig {
    /// Reads the process environment.
    ///
    /// - `FLOW_TOP_N` (default: 20)
    /// - `FLOW_INTERVAL_SECS` (default: 3600)
    /// - `FLOW_SOURCE_TIMEOUT_SECS` (default: 15)
    /// - `FLOW_STABLECOINS` (default: USDT,USDC,FDUSD,USDE,BUSD,DAI,TUSD,USDP,UST,GUSD,PAX,PYUSD)
    /// - `FLOW_SOURCES` (default: binance,okx,bybit,bitget,gate,huobi)
    /// - `FLOW_METRIC` (default: change)
    /// - `FLOW_REQUESTS_PER_SECOND` / `FLOW_MAX_BURST` (default: 10 / 20)
    /// - `FLOW_REPORT_TIMEZONE` (default: UTC)
    /// - `FLOW_<VENUE>_BASE_URL`, `COINMARKETCAP_API_KEY`
    /// - `TELEGRAM_BOT_TOKEN` + `TELEGRAM_CHAT_ID`
    /// - `FLOW_LOG_LEVEL` (default: info)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`FlowConfig::from_env`] but reads through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let top_n: usize = parse_or(&get, "FLOW_TOP_N", DEFAULT_TOP_N)?;
        let interval_secs: u64 = parse_or(&get, "FLOW_INTERVAL_SECS", DEFAULT_INTERVAL_SECS)?;
        let timeout_secs: u64 = parse_or(&get, "FLOW_SOURCE_TIMEOUT_SECS", DEFAULT_SOURCE_TIMEOUT_SECS)?;
        let requests_per_second: u32 = parse_or(&get, "FLOW_REQUESTS_PER_SECOND", REQUESTS_PER_SECOND)?;
        let max_burst: u32 = parse_or(&get, "FLOW_MAX_BURST", MAX_BURST_REQUESTS)?;

        for (key, value) in [
            ("FLOW_TOP_N", top_n as u64),
            ("FLOW_INTERVAL_SECS", interval_secs),
            ("FLOW_SOURCE_TIMEOUT_SECS", timeout_secs),
            ("FLOW_REQUESTS_PER_SECOND", requests_per_second as u64),
            ("FLOW_MAX_BURST", max_burst as u64),
        ] {
            if value == 0 {
                return Err(invalid(key, "0", "must be at least 1"));
            }
        }

        let stablecoins: Vec<String> = match get("FLOW_STABLECOINS") {
            Some(list) => split_list(&list).map(|s| s.to_uppercase()).collect(),
            None => DEFAULT_STABLECOINS.iter().map(|s| s.to_string()).collect(),
        };

        let metric = match get("FLOW_METRIC") {
            Some(value) => MetricMode::from_str(&value).map_err(|reason| invalid("FLOW_METRIC", &value, &reason))?,
            None => MetricMode::default(),
        };

        let report_timezone = match get("FLOW_REPORT_TIMEZONE") {
            Some(value) => Tz::from_str(&value).map_err(|e| invalid("FLOW_REPORT_TIMEZONE", &value, &e.to_string()))?,
            None => Tz::UTC,
        };

        let venue_ids: Vec<VenueId> = match get("FLOW_SOURCES") {
            Some(list) => split_list(&list)
                .map(|name| VenueId::from_str(name).map_err(|reason| invalid("FLOW_SOURCES", &list, &reason)))
                .collect::<Result<_, _>>()?,
            None => VenueId::EXCHANGES.to_vec(),
        };
        let mut sources = Vec::with_capacity(venue_ids.len());
        for venue in venue_ids {
            if sources.iter().any(|s: &SourceSpec| s.venue == venue) {
                continue;
            }
            let mut spec = SourceSpec::new(venue);
            spec.base_url = get(venue.base_url_key().as_str());
            if venue == VenueId::CoinMarketCap {
                spec.api_key = Some(
                    get("COINMARKETCAP_API_KEY")
                        .ok_or_else(|| ConfigError::Missing("COINMARKETCAP_API_KEY".to_string()))?,
                );
            }
            sources.push(spec);
        }
        if sources.is_empty() {
            return Err(invalid("FLOW_SOURCES", "", "at least one source is required"));
        }

        let notifier = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => NotifierConfig::Telegram { bot_token, chat_id },
            (None, None) => NotifierConfig::Log,
            (Some(_), None) => return Err(ConfigError::Missing("TELEGRAM_CHAT_ID".to_string())),
            (None, Some(_)) => return Err(ConfigError::Missing("TELEGRAM_BOT_TOKEN".to_string())),
        };

        Ok(FlowConfig {
            top_n,
            interval: Duration::from_secs(interval_secs),
            source_timeout: Duration::from_secs(timeout_secs),
            stablecoins,
            sources,
            metric,
            requests_per_second,
            max_burst,
            report_timezone,
            notifier,
            log_level: get("FLOW_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    pub fn stablecoin_filter(&self) -> StablecoinFilter {
        StablecoinFilter::new(&self.stablecoins)
    }

    pub fn build_adapters(&self) -> Vec<Arc<dyn SourceAdapter>> {
        self.sources
            .iter()
            .map(|spec| build_adapter(spec, self.metric))
            .collect()
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value.parse().map_err(|e: T::Err| invalid(key, &value, &e.to_string())),
        None => Ok(default),
    }
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
