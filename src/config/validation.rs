//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval > 0, addresses and filters parse)
//! - Flag suspicious but legal threshold settings
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ObserverConfig → Result<(), Vec<ValidationError>>
//! - Inverted thresholds (critical below slow) are accepted with a warning;
//!   the recorder keeps its fixed branch order for them

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::schema::ObserverConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),

    #[error("invalid log filter '{0}'")]
    InvalidLogLevel(String),

    #[error("invalid slow-query args level '{0}'")]
    InvalidArgsLevel(String),

    #[error("pool_stats.interval_secs must be greater than zero")]
    ZeroPoolStatsInterval,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ObserverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let obs = &config.observability;
    if obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(obs.metrics_address.clone()));
    }
    if EnvFilter::try_new(&obs.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(obs.log_level.clone()));
    }

    let slow = &config.slow_query;
    if Level::from_str(&slow.args_level).is_err() {
        errors.push(ValidationError::InvalidArgsLevel(slow.args_level.clone()));
    }
    if slow.slow_threshold_ms > 0 && slow.critical_threshold_ms < slow.slow_threshold_ms {
        tracing::warn!(
            slow_threshold_ms = slow.slow_threshold_ms,
            critical_threshold_ms = slow.critical_threshold_ms,
            "Critical threshold is below slow threshold; every slow query will be logged at WARN"
        );
    }

    if config.pool_stats.enabled && config.pool_stats.interval_secs == 0 {
        errors.push(ValidationError::ZeroPoolStatsInterval);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
