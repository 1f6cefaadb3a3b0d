//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the query observer.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ObserverConfig {
    /// Slow-query logging thresholds.
    pub slow_query: SlowQueryConfig,

    /// Periodic connection-pool reporting.
    pub pool_stats: PoolStatsConfig,

    /// Logging and metrics exporter settings.
    pub observability: ObservabilityConfig,
}

/// Slow-query logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SlowQueryConfig {
    /// Operations at or above this duration are logged at INFO.
    /// Zero disables slow-query logging entirely.
    pub slow_threshold_ms: u64,

    /// Operations at or above this duration are logged at WARN instead.
    pub critical_threshold_ms: u64,

    /// Minimum enabled level at which detail args are attached to slow-query
    /// log lines (trace, debug, info, warn, error).
    pub args_level: String,
}

impl Default for SlowQueryConfig {
    fn default() -> Self {
        Self {
            slow_threshold_ms: 1_000,
            critical_threshold_ms: 5_000,
            args_level: "trace".to_string(),
        }
    }
}

/// Connection-pool reporting configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PoolStatsConfig {
    /// Enable the periodic reporter loop.
    pub enabled: bool,

    /// Reporting interval in seconds.
    pub interval_secs: u64,
}

impl Default for PoolStatsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines (default).
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (e.g. "info", "query_observer=trace").
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Install the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Prometheus exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
