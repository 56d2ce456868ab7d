// tests/aggregator_tests.rs
mod common;

use common::{test_session, tickers, FailingAdapter, FixedAdapter, PanickingAdapter, SlowAdapter};
use flowrank::{Aggregator, FlowError, FlowMap, SourceAdapter, StablecoinFilter};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_test::{assert_err, assert_ok};

fn aggregator(adapters: Vec<Arc<dyn SourceAdapter>>) -> Aggregator {
    Aggregator::new(adapters, StablecoinFilter::new(["USDT", "USDC"]), Duration::from_secs(2))
}

#[tokio::test]
async fn test_metrics_are_summed_across_sources() {
    let session = test_session();
    let agg = aggregator(vec![
        Arc::new(FixedAdapter::new("a", &[("BTC", 5_000_000.0), ("USDT", 9_000_000.0)])),
        Arc::new(FixedAdapter::new("b", &[("BTC", 1_000_000.0), ("ETH", -2_000_000.0)])),
    ]);

    let report = assert_ok!(agg.run(&session).await);

    assert_eq!(report.flows.len(), 2);
    assert_eq!(report.flows.get("BTC"), Some(6_000_000.0));
    assert_eq!(report.flows.get("ETH"), Some(-2_000_000.0));
    assert!(!report.flows.contains("USDT"));
    assert_eq!(report.succeeded, vec!["a".to_string(), "b".to_string()]);
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_duplicate_rows_within_one_source_accumulate() {
    let session = test_session();
    let agg = aggregator(vec![Arc::new(FixedAdapter::new(
        "okx",
        &[("BTC", 10.0), ("BTC", 15.0), ("USDC", 3.0)],
    ))]);

    let report = agg.run(&session).await.unwrap();

    assert_eq!(report.flows.get("BTC"), Some(25.0));
    assert_eq!(report.flows.len(), 1);
}

#[tokio::test]
async fn test_failing_source_does_not_affect_others() {
    let session = test_session();
    let healthy = Arc::new(FixedAdapter::new("binance", &[("SOL", 42.0)]));
    let agg = aggregator(vec![Arc::new(FailingAdapter::new("bybit")), healthy.clone() as Arc<dyn SourceAdapter>]);

    let report = agg.run(&session).await.unwrap();

    assert_eq!(report.flows, FlowMap::from_iter([("SOL", 42.0)]));
    assert_eq!(report.succeeded, vec!["binance".to_string()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source_name(), Some("bybit"));
    assert_eq!(healthy.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_slow_source_is_timed_out_individually() {
    let session = test_session();
    let slow = SlowAdapter {
        name: "gate".to_string(),
        delay: Duration::from_secs(10),
        rows: vec![("BTC".to_string(), 1.0)],
    };
    let agg = Aggregator::new(
        vec![Arc::new(slow), Arc::new(FixedAdapter::new("okx", &[("ETH", -7.0)]))],
        StablecoinFilter::default(),
        Duration::from_millis(100),
    );

    let started = Instant::now();
    let report = agg.run(&session).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(report.flows.get("ETH"), Some(-7.0));
    assert!(!report.flows.contains("BTC"));
    assert_eq!(
        report.failures,
        vec![FlowError::SourceTimeout {
            source_name: "gate".to_string(),
            after: Duration::from_millis(100),
        }]
    );
}

#[tokio::test]
async fn test_panicking_adapter_counts_as_failure() {
    let session = test_session();
    let agg = aggregator(vec![
        Arc::new(PanickingAdapter),
        Arc::new(FixedAdapter::new("huobi", &[("DOGE", 3.0)])),
    ]);

    let report = agg.run(&session).await.unwrap();

    assert_eq!(report.flows.get("DOGE"), Some(3.0));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source_name(), Some("panicky"));
}

#[tokio::test]
async fn test_all_sources_failing_is_no_data() {
    let session = test_session();
    let agg = aggregator(vec![
        Arc::new(FailingAdapter::new("binance")),
        Arc::new(FailingAdapter::new("okx")),
        Arc::new(FailingAdapter::new("bybit")),
    ]);

    let err = assert_err!(agg.run(&session).await);

    assert_eq!(err, FlowError::NoData { attempted: 3 });
}

#[tokio::test]
async fn test_no_adapters_is_no_data() {
    let session = test_session();
    let err = aggregator(Vec::new()).run(&session).await.unwrap_err();
    assert_eq!(err, FlowError::NoData { attempted: 0 });
}

#[test]
fn test_source_with_only_stablecoins_still_succeeds() {
    let agg = aggregator(Vec::new());

    let report = agg
        .merge(vec![("cmc".to_string(), Ok(tickers("cmc", &[("USDT", 1.0), ("USDC", -1.0)])))])
        .unwrap();

    assert!(report.flows.is_empty());
    assert_eq!(report.succeeded, vec!["cmc".to_string()]);
}

#[test]
fn test_merge_is_order_independent() {
    let agg = aggregator(Vec::new());
    let a = || ("a".to_string(), Ok(tickers("a", &[("BTC", 1.5), ("ETH", 2.0)])));
    let b = || ("b".to_string(), Ok(tickers("b", &[("BTC", -0.5), ("XRP", 4.0)])));

    let forward = agg.merge(vec![a(), b()]).unwrap();
    let backward = agg.merge(vec![b(), a()]).unwrap();

    assert_eq!(forward.flows, backward.flows);
    assert_eq!(forward.flows.get("BTC"), Some(1.0));
}

#[test]
fn test_flow_map_absorb_applies_filter() {
    let rows = tickers("x", &[("BTC", 2.0), ("USDT", 5.0), ("BTC", 3.0)]);
    let mut map = FlowMap::new();

    assert_eq!(map.absorb(&rows, &StablecoinFilter::default()), 2);

    let entries: Vec<_> = map.iter().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].symbol, "BTC");
    assert_eq!(entries[0].metric, 5.0);
}
