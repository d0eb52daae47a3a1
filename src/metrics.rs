use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Pre-register counters so they appear even before the first increment.
    counter!("analyze_requests_total").absolute(0);
    counter!("fake_verdicts_total").absolute(0);
    counter!("genuine_verdicts_total").absolute(0);
    counter!("inference_failures_total").absolute(0);

    // Histogram is lazily created on first record; force creation.
    histogram!("inference_latency_seconds").record(0.0);

    handle
}
