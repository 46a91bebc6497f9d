//! Invalid input, aggregate errors, and retry semantics.

mod support;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use rf_client::SimApi;
use rf_pipeline::{PipelineConfig, PipelineError, PipelineState, ResultsSession};
use support::{MockApi, metric, order, round, sim_type, summary};

fn session_over(api: &Arc<MockApi>) -> ResultsSession {
    ResultsSession::new(
        Arc::clone(api) as Arc<dyn SimApi>,
        PipelineConfig::default(),
    )
}

#[tokio::test]
async fn non_numeric_order_id_short_circuits_without_network() {
    let api = Arc::new(MockApi::new());
    api.set_sim_types(vec![sim_type(1, "Static")]);
    api.set_metrics(vec![metric(1, "Max Stress")]);

    let mut session = session_over(&api);
    session.set_order("abc");
    let snapshot = session.refresh().await;

    assert_eq!(snapshot.state, PipelineState::Invalid);
    assert!(matches!(
        snapshot.error,
        Some(PipelineError::InvalidOrderId { .. })
    ));
    assert_eq!(api.calls.total(), 0);

    // Invalid is terminal: retry changes nothing and stays offline.
    let snapshot = session.retry().await;
    assert_eq!(snapshot.state, PipelineState::Invalid);
    assert_eq!(api.calls.total(), 0);
}

#[tokio::test]
async fn zero_order_id_is_invalid_input() {
    let api = Arc::new(MockApi::new());
    let mut session = session_over(&api);
    session.set_order("0");
    let snapshot = session.refresh().await;

    assert_eq!(snapshot.state, PipelineState::Invalid);
    assert_eq!(api.calls.total(), 0);
}

#[tokio::test]
async fn a_new_order_id_clears_the_invalid_state() {
    let api = Arc::new(MockApi::new());
    api.set_sim_types(vec![sim_type(1, "Static")]);
    api.set_metrics(vec![metric(1, "Max Stress")]);
    api.set_order(order(5, "ORD-100", &[1]));
    api.set_summaries(vec![summary(11, 5, 1)]);
    api.set_rounds(11, vec![round(1, 1, 1.0)]);

    let mut session = session_over(&api);
    session.set_order("abc");
    assert_eq!(session.refresh().await.state, PipelineState::Invalid);

    session.set_order("5");
    let snapshot = session.refresh().await;
    assert_eq!(snapshot.state, PipelineState::Ready);
    assert_eq!(snapshot.display_order, "ORD-100");
}

#[tokio::test]
async fn catalog_failures_aggregate_and_retry_refetches_both() {
    let api = Arc::new(MockApi::new());
    api.fail_sim_types("catalog service down");
    api.fail_metrics("catalog service down");

    let mut session = session_over(&api);
    session.set_order("1");
    api.set_order(order(1, "ORD-101", &[1]));
    api.set_summaries(vec![summary(11, 1, 1)]);
    api.set_rounds(11, vec![round(1, 1, 1.0)]);

    let snapshot = session.refresh().await;
    assert_eq!(snapshot.state, PipelineState::PartialError);
    // Deterministic precedence: the sim-type catalog wins.
    let message = snapshot.error.clone().unwrap().to_string();
    assert!(message.contains("sim-type catalog"), "got: {message}");

    let sim_types_before = api.calls.sim_types.load(Ordering::SeqCst);
    let metrics_before = api.calls.metrics.load(Ordering::SeqCst);

    let snapshot = session.retry().await;
    assert!(snapshot.error.is_some());
    assert!(api.calls.sim_types.load(Ordering::SeqCst) > sim_types_before);
    assert!(api.calls.metrics.load(Ordering::SeqCst) > metrics_before);
}

#[tokio::test]
async fn error_precedence_is_stable_across_stages() {
    let api = Arc::new(MockApi::new());
    api.set_sim_types(vec![sim_type(1, "Static")]);
    api.fail_metrics("metrics down");
    api.fail_order("orders down");
    api.fail_summaries("summaries down");

    let mut session = session_over(&api);
    session.set_order("1");
    let snapshot = session.refresh().await;

    let message = snapshot.error.unwrap().to_string();
    assert!(message.contains("metric catalog"), "got: {message}");
}

#[tokio::test]
async fn retry_refreshes_stale_but_successful_stages() {
    let api = Arc::new(MockApi::new());
    api.set_sim_types(vec![sim_type(1, "Static")]);
    api.set_metrics(vec![metric(1, "Max Stress")]);
    api.set_order(order(1, "ORD-102", &[1]));
    api.set_summaries(vec![summary(11, 1, 1)]);
    api.set_rounds(11, vec![round(1, 1, 1.0)]);

    let mut session = session_over(&api);
    session.set_order("1");
    session.refresh().await;
    let after_first = api.calls.total();

    // A plain refresh inside the freshness window is fully served from
    // cache; retry refetches every enabled stage.
    session.refresh().await;
    assert_eq!(api.calls.total(), after_first);

    session.retry().await;
    assert!(api.calls.sim_types.load(Ordering::SeqCst) >= 2);
    assert!(api.calls.metrics.load(Ordering::SeqCst) >= 2);
    assert!(api.calls.order.load(Ordering::SeqCst) >= 2);
    assert!(api.calls.summaries.load(Ordering::SeqCst) >= 2);
    assert!(api.calls.rounds.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn summaries_failure_disables_rounds_but_not_catalogs() {
    let api = Arc::new(MockApi::new());
    api.set_sim_types(vec![sim_type(1, "Static")]);
    api.set_metrics(vec![metric(1, "Max Stress")]);
    api.set_order(order(1, "ORD-103", &[1]));
    api.fail_summaries("summary store down");

    let mut session = session_over(&api);
    session.set_order("1");
    let snapshot = session.refresh().await;

    assert_eq!(snapshot.state, PipelineState::PartialError);
    assert_eq!(api.calls.rounds.load(Ordering::SeqCst), 0);
    assert_eq!(snapshot.metric_options.len(), 1);
    assert_eq!(snapshot.available_sim_types.len(), 1);
    let message = snapshot.error.unwrap().to_string();
    assert!(message.contains("result summaries"), "got: {message}");
}
