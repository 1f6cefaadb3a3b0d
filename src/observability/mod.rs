//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! SQL execution layer (one call per finished operation):
//!     → recorder.rs (count, time, maybe log)
//!         → metrics.rs series (sql_total, sql_time_seconds)
//!         → tracing events (INFO slow / WARN critical)
//!
//! Connection pool (one call per reporting tick):
//!     → pool.rs (format snapshot)
//!         → tracing event (INFO)
//!
//! Startup:
//!     → setup.rs init (logging, exporter if metrics_enabled, recorder + reporter)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//!     → Prometheus exporter (scrape endpoint)
//! ```
//!
//! # Design Decisions
//! - Recording never fails and never blocks on anything but the sinks
//! - Metric thread safety is delegated to the `metrics` facade
//! - Thresholds are read fresh on every observation

pub mod logging;
pub mod metrics;
pub mod pool;
pub mod recorder;
pub mod setup;

pub use self::metrics::{CompactResult, Outcome};
pub use pool::{report_pool_stats, PoolStats, PoolStatsReporter, PoolStatsSource};
pub use recorder::{Clock, Severity, SqlRecorder, SystemClock};
pub use setup::{init, InitError, Observer};
