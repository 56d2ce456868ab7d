// src/ticker.rs

use serde_json::Value;

/// One source's flow estimate for one asset in one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTicker {
    pub source: String,
    /// Canonical base asset, uppercase, no quote suffix.
    pub symbol: String,
    /// Positive is inflow-like, negative is outflow-like.
    pub metric: f64,
}

impl CanonicalTicker {
    pub fn new(source: impl Into<String>, symbol: impl Into<String>, metric: f64) -> Self {
        CanonicalTicker {
            source: source.into(),
            symbol: symbol.into(),
            metric,
        }
    }
}

/// Flattened view of a single venue ticker row, before a metric is derived.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub price: f64,
    /// 24h traded volume in the quote (USD-like) currency.
    pub quote_volume: f64,
    /// 24h price change as a ratio (0.05 == +5%).
    pub change_ratio: f64,
}

/// Coerces a JSON number or numeric string to `f64`.
///
/// Missing, null, non-numeric and non-finite values all become `0.0` so that
/// one malformed row never fails a whole fetch.
pub fn parse_f64(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// First field among `keys` that is present and non-null, coerced with [`parse_f64`].
pub fn parse_f64_any(item: &Value, keys: &[&str]) -> f64 {
    keys.iter()
        .map(|key| item.get(*key))
        .find(|value| matches!(value, Some(v) if !v.is_null()))
        .map(parse_f64)
        .unwrap_or(0.0)
}

/// Relative change from `open` to `last`, or `0.0` when `open` is not positive.
pub fn change_between(open: f64, last: f64) -> f64 {
    if open > 0.0 {
        (last - open) / open
    } else {
        0.0
    }
}
