// tests/report_tests.rs
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use flowrank::{format_magnitude, rank, FlowMap, ReportFormatter};

#[test]
fn test_format_magnitude_units() {
    assert_eq!(format_magnitude(0.0), "$0.00");
    assert_eq!(format_magnitude(999.0), "$999.00");
    assert_eq!(format_magnitude(1_500.0), "$1.50K");
    assert_eq!(format_magnitude(2_500_000.0), "$2.50M");
    assert_eq!(format_magnitude(3_100_000_000.0), "$3.10B");
    assert_eq!(format_magnitude(4.2e12), "$4.20T");
    assert_eq!(format_magnitude(-2_000_000.0), "$2.00M");
}

#[test]
fn test_format_magnitude_promotes_on_rounding_boundary() {
    assert_eq!(format_magnitude(999.999), "$1.00K");
    assert_eq!(format_magnitude(999_999.0), "$1.00M");
    assert_eq!(format_magnitude(999_999_000.0), "$1.00B");
    assert_eq!(format_magnitude(999_994_000.0), "$999.99M");
}

#[test]
fn test_report_lists_inflow_before_outflow() {
    let formatter = ReportFormatter::new(20, Tz::UTC);
    let ranking = rank(&FlowMap::from_iter([("BTC", 6.0e6), ("ETH", -2.0e6), ("SOL", 1_500.0)]), 20);
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let text = formatter.format(&ranking, at);

    assert!(text.starts_with("Capital flow report 2024-05-01 12:00 UTC (top 20)\n"));
    let inflow_at = text.find("Net inflow TOP 20").unwrap();
    let outflow_at = text.find("Net outflow TOP 20").unwrap();
    assert!(inflow_at < outflow_at);
    assert!(text.contains("1. BTC +$6.00M\n2. SOL +$1.50K\n"));
    assert!(text.contains("1. ETH -$2.00M\n"));
}

#[test]
fn test_empty_side_is_marked() {
    let formatter = ReportFormatter::default();
    let ranking = rank(&FlowMap::from_iter([("BTC", 10.0)]), 20);

    let text = formatter.format(&ranking, Utc::now());

    let outflow = &text[text.find("Net outflow").unwrap()..];
    assert!(outflow.contains("(none)"));
}

#[test]
fn test_header_uses_configured_timezone() {
    let formatter = ReportFormatter::new(5, Tz::Asia__Shanghai);
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 20, 30, 0).unwrap();

    let text = formatter.no_data(at, "all 6 sources failed");

    assert!(text.starts_with("Capital flow report 2024-05-02 04:30 CST (top 5)\n"));
    assert!(text.contains("No flow data available: all 6 sources failed."));
}

#[test]
fn test_empty_ranking_is_never_an_empty_message() {
    let formatter = ReportFormatter::default();
    let text = formatter.format(&rank(&FlowMap::new(), 20), Utc::now());

    assert!(!text.trim().is_empty());
    assert!(text.contains("No flow data available"));
}
