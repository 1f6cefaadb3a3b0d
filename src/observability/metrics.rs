//! Metric definitions and exporter setup.
//!
//! # Metrics
//! - `sql_total` (counter): SQL operations by `outcome`
//! - `sql_time_seconds` (histogram): SQL operation latency by `outcome`
//! - `compact_total` (counter): compaction runs by `result`
//! - `insert_errors_total` (counter): unique-constraint insert failures by `retriable`
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; whichever recorder is
//!   installed (Prometheus by default) owns storage and thread safety
//! - Histogram buckets are fixed; dashboards depend on them

use std::net::SocketAddr;

use metrics::{counter, describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};

pub const SQL_TOTAL: &str = "sql_total";
pub const SQL_TIME_SECONDS: &str = "sql_time_seconds";
pub const COMPACT_TOTAL: &str = "compact_total";
pub const INSERT_ERRORS_TOTAL: &str = "insert_errors_total";

/// Bucket boundaries for `sql_time_seconds`, 5ms to 30s.
pub const SQL_TIME_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.15, 0.2, 0.25, 0.3, 0.35, 0.4, 0.45, 0.5, 0.6, 0.7, 0.8,
    0.9, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 15.0, 20.0, 25.0,
    30.0,
];

/// Outcome label attached to every SQL observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Error => "error",
        }
    }

    /// Classify a finished operation by its result.
    pub fn from_result<T, E>(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Outcome::Success,
            Err(_) => Outcome::Error,
        }
    }
}

/// Result label for `compact_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompactResult {
    Success,
    Error,
}

impl CompactResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompactResult::Success => "success",
            CompactResult::Error => "error",
        }
    }
}

/// Register help text and units with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(SQL_TOTAL, "Total number of SQL operations");
    describe_histogram!(SQL_TIME_SECONDS, Unit::Seconds, "Length of time per SQL operation");
    describe_counter!(COMPACT_TOTAL, "Total number of compactions");
    describe_counter!(
        INSERT_ERRORS_TOTAL,
        "Total number of insert retries due to unique constraint violations"
    );
}

/// Prometheus builder with the SQL latency buckets configured.
pub fn prometheus_builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(SQL_TIME_SECONDS.to_string()), SQL_TIME_BUCKETS)
}

/// Install the Prometheus exporter as the global recorder, serving on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    prometheus_builder()?.with_http_listener(addr).install()?;
    describe_metrics();
    tracing::info!(address = %addr, "Prometheus exporter listening");
    Ok(())
}

/// Count one compaction run.
pub fn record_compaction(result: CompactResult) {
    counter!(COMPACT_TOTAL, "result" => result.as_str()).increment(1);
}

/// Count one insert that failed on a unique-constraint violation.
pub fn record_insert_error(retriable: bool) {
    let label = if retriable { "true" } else { "false" };
    counter!(INSERT_ERRORS_TOTAL, "retriable" => label).increment(1);
}
