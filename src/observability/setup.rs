//! One-call setup from an [`ObserverConfig`].
//!
//! # Responsibilities
//! - Install the logging subscriber
//! - Install the Prometheus exporter when `metrics_enabled` is set
//! - Build the recorder and pool reporter from their config sections
//!
//! Embedders that own their subscriber or recorder call the pieces directly.

use std::net::SocketAddr;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;

use crate::config::{ObservabilityConfig, ObserverConfig};
use crate::observability::logging::{init_logging, LogError};
use crate::observability::metrics::init_metrics;
use crate::observability::pool::PoolStatsReporter;
use crate::observability::recorder::SqlRecorder;

/// Errors that can occur during [`init`].
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Logging(#[from] LogError),
    #[error("Invalid metrics address: {0}")]
    MetricsAddress(String),
    #[error("Failed to install Prometheus exporter: {0}")]
    Exporter(#[from] BuildError),
}

/// Recorder and pool reporter built from one config.
#[derive(Debug)]
pub struct Observer {
    pub recorder: SqlRecorder,
    pub pool_reporter: PoolStatsReporter,
    /// Address the exporter was asked to listen on, if it was installed.
    pub metrics_address: Option<SocketAddr>,
}

impl Observer {
    /// Build the recorder and reporter without touching global state.
    pub fn from_config(config: &ObserverConfig) -> Self {
        Self {
            recorder: SqlRecorder::from_config(&config.slow_query),
            pool_reporter: PoolStatsReporter::new(config.pool_stats.clone()),
            metrics_address: None,
        }
    }
}

/// Install the exporter if `metrics_enabled` is set.
///
/// Returns the listen address when an exporter was installed.
pub fn init_exporter(config: &ObservabilityConfig) -> Result<Option<SocketAddr>, InitError> {
    if !config.metrics_enabled {
        tracing::debug!("Metrics exporter disabled");
        return Ok(None);
    }

    let addr: SocketAddr = config
        .metrics_address
        .parse()
        .map_err(|_| InitError::MetricsAddress(config.metrics_address.clone()))?;
    init_metrics(addr)?;
    Ok(Some(addr))
}

/// Install logging and, if enabled, the exporter; then build the [`Observer`].
///
/// Call once at startup.
pub fn init(config: &ObserverConfig) -> Result<Observer, InitError> {
    init_logging(&config.observability)?;
    let metrics_address = init_exporter(&config.observability)?;

    tracing::info!(
        slow_threshold_ms = config.slow_query.slow_threshold_ms,
        critical_threshold_ms = config.slow_query.critical_threshold_ms,
        pool_stats = config.pool_stats.enabled,
        metrics = metrics_address.is_some(),
        "Query observer initialized"
    );

    Ok(Observer {
        metrics_address,
        ..Observer::from_config(config)
    })
}
