// src/report.rs

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fmt::Write;

use crate::aggregator::MergedEntry;
use crate::ranker::Ranking;

const UNITS: &[(f64, &str)] = &[(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Dollar amount with two decimals and a K/M/B/T suffix, sign dropped.
///
/// A value that would round up to `1000.00` of one unit is shown in the next
/// unit instead (`999_999` → `$1.00M`).
pub fn format_magnitude(value: f64) -> String {
    let abs = value.abs();
    let Some(idx) = UNITS.iter().position(|(threshold, _)| abs >= *threshold) else {
        let rounded = (abs * 100.0).round() / 100.0;
        if rounded >= 1e3 {
            return format!("${:.2}K", rounded / 1e3);
        }
        return format!("${:.2}", abs);
    };

    let (threshold, suffix) = UNITS[idx];
    let scaled = abs / threshold;
    if idx > 0 && (scaled * 100.0).round() / 100.0 >= 1e3 {
        let (bigger, bigger_suffix) = UNITS[idx - 1];
        return format!("${:.2}{}", abs / bigger, bigger_suffix);
    }
    format!("${:.2}{}", scaled, suffix)
}

/// Renders a ranking as the plain-text message handed to the notifier.
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    top_n: usize,
    timezone: Tz,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        ReportFormatter::new(20, Tz::UTC)
    }
}

impl ReportFormatter {
    pub fn new(top_n: usize, timezone: Tz) -> Self {
        ReportFormatter { top_n, timezone }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Inflow section first, outflow second, ranks starting at 1.
    ///
    /// An empty ranking renders the no-data message, never an empty string.
    pub fn format(&self, ranking: &Ranking, generated_at: DateTime<Utc>) -> String {
        if ranking.is_empty() {
            return self.no_data(generated_at, "no asset showed a net flow this cycle");
        }

        let mut text = self.header(generated_at);
        text.push('\n');
        self.section(&mut text, "Net inflow", &ranking.inflow, '+');
        text.push('\n');
        self.section(&mut text, "Net outflow", &ranking.outflow, '-');
        text
    }

    pub fn no_data(&self, generated_at: DateTime<Utc>, reason: &str) -> String {
        format!("{}No flow data available: {}.\n", self.header(generated_at), reason)
    }

    fn header(&self, generated_at: DateTime<Utc>) -> String {
        format!(
            "Capital flow report {} (top {})\n",
            generated_at.with_timezone(&self.timezone).format("%Y-%m-%d %H:%M %Z"),
            self.top_n
        )
    }

    fn section(&self, text: &mut String, title: &str, entries: &[MergedEntry], sign: char) {
        let _ = writeln!(text, "{} TOP {}", title, self.top_n);
        if entries.is_empty() {
            text.push_str("(none)\n");
            return;
        }
        for (i, entry) in entries.iter().enumerate() {
            let _ = writeln!(
                text,
                "{}. {} {}{}",
                i + 1,
                entry.symbol,
                sign,
                format_magnitude(entry.metric)
            );
        }
    }
}
