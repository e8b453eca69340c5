//! Prometheus metrics for observability.
//!
//! - HTTP request metrics (latency, counts)
//! - Acquisition metrics, recorded from the per-request `AcquisitionStats`
//!   once an acquisition finishes

use std::time::Duration;

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use seafarer_core::AcquisitionStats;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "seafarer_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0,
        ]),
        &["method", "path", "status"],
    )
    .expect("valid metric")
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("seafarer_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("valid metric")
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "seafarer_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .expect("valid metric")
});

// =============================================================================
// Acquisition Metrics
// =============================================================================

/// Finished acquisitions by kind (movie/show) and result.
pub static ACQUISITIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("seafarer_acquisitions_total", "Finished acquisitions"),
        &["kind", "result"],
    )
    .expect("valid metric")
});

/// Wall-clock duration of acquisitions.
pub static ACQUISITION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "seafarer_acquisition_duration_seconds",
            "Acquisition duration in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
        &["kind"],
    )
    .expect("valid metric")
});

/// Indexer queries issued.
pub static INDEXER_QUERIES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("seafarer_indexer_queries_total", "Indexer queries issued")
        .expect("valid metric")
});

/// Indexer queries that failed and were treated as empty.
pub static INDEXER_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("seafarer_indexer_errors_total", "Failed indexer queries")
        .expect("valid metric")
});

/// Candidates that passed the title gate and the score threshold.
pub static CANDIDATES_QUALIFIED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "seafarer_candidates_qualified_total",
        "Candidates that passed title gate and score threshold",
    )
    .expect("valid metric")
});

/// Download client submissions by result.
pub static SUBMISSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("seafarer_submissions_total", "Download client submissions"),
        &["result"],
    )
    .expect("valid metric")
});

/// Episodes that could not be acquired.
pub static MISSING_EPISODES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "seafarer_missing_episodes_total",
        "Episodes left missing after show acquisitions",
    )
    .expect("valid metric")
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // HTTP
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()),
        // Acquisitions
        Box::new(ACQUISITIONS_TOTAL.clone()),
        Box::new(ACQUISITION_DURATION.clone()),
        Box::new(INDEXER_QUERIES_TOTAL.clone()),
        Box::new(INDEXER_ERRORS_TOTAL.clone()),
        Box::new(CANDIDATES_QUALIFIED_TOTAL.clone()),
        Box::new(SUBMISSIONS_TOTAL.clone()),
        Box::new(MISSING_EPISODES_TOTAL.clone()),
    ];
    for metric in metrics {
        if let Err(e) = registry.register(metric) {
            tracing::error!(error = %e, "Failed to register metric");
        }
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Fold one finished acquisition into the global counters.
pub fn record_acquisition(
    kind: &str,
    success: bool,
    stats: &AcquisitionStats,
    missing_episodes: usize,
    elapsed: Duration,
) {
    let result = if success { "success" } else { "failure" };
    ACQUISITIONS_TOTAL.with_label_values(&[kind, result]).inc();
    ACQUISITION_DURATION
        .with_label_values(&[kind])
        .observe(elapsed.as_secs_f64());

    INDEXER_QUERIES_TOTAL.inc_by(stats.indexer_queries as u64);
    INDEXER_ERRORS_TOTAL.inc_by(stats.indexer_errors as u64);
    CANDIDATES_QUALIFIED_TOTAL.inc_by(stats.candidates_qualified as u64);
    SUBMISSIONS_TOTAL
        .with_label_values(&["accepted"])
        .inc_by(stats.submissions_accepted as u64);
    SUBMISSIONS_TOTAL
        .with_label_values(&["already_present"])
        .inc_by(stats.submissions_duplicate as u64);
    SUBMISSIONS_TOTAL
        .with_label_values(&["failed"])
        .inc_by(stats.submissions_failed as u64);
    MISSING_EPISODES_TOTAL.inc_by(missing_episodes as u64);
}
