//! Query-path instrumentation for storage-backing services.
//!
//! Two entry points sit in the caller's query path:
//! - [`SqlRecorder::record`] counts and times every finished SQL operation and
//!   escalates slow ones to INFO or WARN log lines
//! - [`report_pool_stats`] turns a connection-pool snapshot into one log line,
//!   optionally driven on a timer by [`PoolStatsReporter`]
//!
//! Setup helpers for the ambient stack live next to them:
//! [`config`] (TOML, validation, threshold hot reload),
//! [`observability::logging`] and [`observability::metrics`].
//! [`observability::init`] wires all of them from one [`ObserverConfig`].

pub mod config;
pub mod observability;

pub use config::{ObserverConfig, SlowQuerySettings, ThresholdHandle, Thresholds};
pub use observability::{
    report_pool_stats, Clock, CompactResult, InitError, Observer, Outcome, PoolStats,
    PoolStatsReporter, PoolStatsSource, Severity, SqlRecorder, SystemClock,
};
