// tests/ranker_tests.rs
use flowrank::{rank, FlowMap};

fn symbols(entries: &[flowrank::MergedEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.symbol.as_str()).collect()
}

#[test]
fn test_inflow_descending_outflow_ascending() {
    let flows = FlowMap::from_iter([
        ("BTC", 6.0e6),
        ("ETH", -2.0e6),
        ("SOL", 1.0e6),
        ("XRP", -5.0e6),
        ("DOGE", 3.0e6),
    ]);

    let ranking = rank(&flows, 20);

    assert_eq!(symbols(&ranking.inflow), vec!["BTC", "DOGE", "SOL"]);
    assert_eq!(symbols(&ranking.outflow), vec!["XRP", "ETH"]);
}

#[test]
fn test_lists_are_truncated_to_n() {
    let flows: FlowMap = (1..=30).map(|i| (format!("IN{:02}", i), i as f64)).collect();

    let ranking = rank(&flows, 5);

    assert_eq!(ranking.inflow.len(), 5);
    assert_eq!(ranking.inflow[0].symbol, "IN30");
    assert_eq!(ranking.inflow[4].symbol, "IN26");
    assert!(ranking.outflow.is_empty());
}

#[test]
fn test_zero_and_non_finite_metrics_are_excluded() {
    let flows = FlowMap::from_iter([("FLAT", 0.0), ("BAD", f64::NAN), ("INF", f64::INFINITY), ("ADA", -1.0)]);

    let ranking = rank(&flows, 10);

    assert!(ranking.inflow.is_empty());
    assert_eq!(symbols(&ranking.outflow), vec!["ADA"]);
}

#[test]
fn test_ties_break_by_symbol() {
    let flows = FlowMap::from_iter([("ZEC", 5.0), ("ATOM", 5.0), ("LTC", -5.0), ("BCH", -5.0)]);

    let ranking = rank(&flows, 10);

    assert_eq!(symbols(&ranking.inflow), vec!["ATOM", "ZEC"]);
    assert_eq!(symbols(&ranking.outflow), vec!["BCH", "LTC"]);
}

#[test]
fn test_ranking_is_deterministic_and_sides_disjoint() {
    let flows = FlowMap::from_iter([("A", 1.0), ("B", -1.0), ("C", 2.0), ("D", -3.0)]);

    let first = rank(&flows, 2);
    let second = rank(&flows, 2);

    assert_eq!(first, second);
    assert!(first.inflow.iter().all(|e| e.metric > 0.0));
    assert!(first.outflow.iter().all(|e| e.metric < 0.0));
    assert!(first
        .inflow
        .iter()
        .all(|i| first.outflow.iter().all(|o| o.symbol != i.symbol)));
}

#[test]
fn test_empty_map_and_zero_n() {
    assert!(rank(&FlowMap::new(), 20).is_empty());
    assert!(rank(&FlowMap::from_iter([("BTC", 1.0)]), 0).is_empty());
}
