//! Per-operation SQL recorder.
//!
//! # Responsibilities
//! - Count every operation by outcome
//! - Record operation latency into the `sql_time_seconds` histogram
//! - Log slow operations at INFO and critically slow ones at WARN
//! - Attach the operation's bind args when the args level is enabled
//!
//! # Severity Decision
//! ```text
//! slow == 0 or elapsed < slow   → no log line
//! elapsed < critical            → INFO  "Slow SQL ..."
//! otherwise                     → WARN  "Slow SQL ..."
//! ```
//! The checks run in this order even when `critical < slow`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use tracing::Level;

use crate::config::{SlowQueryConfig, ThresholdHandle, Thresholds};
use crate::observability::metrics::{Outcome, SQL_TIME_SECONDS, SQL_TOTAL};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// `Clock` backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Log tier chosen for a slow operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// At or above the slow threshold, below critical. Logged at INFO.
    Slow,
    /// At or above the critical threshold. Logged at WARN.
    Critical,
}

impl Severity {
    /// Classify an elapsed time. `None` means the operation is not logged.
    pub fn classify(elapsed: Duration, thresholds: Thresholds) -> Option<Self> {
        if thresholds.is_disabled() || elapsed < thresholds.slow {
            return None;
        }
        if elapsed < thresholds.critical {
            Some(Severity::Slow)
        } else {
            Some(Severity::Critical)
        }
    }
}

macro_rules! slow_sql {
    ($level:ident, $start:expr, $elapsed:expr, $sql:expr) => {
        tracing::$level!(
            duration = ?$elapsed,
            "Slow SQL (started: {}) (total time: {:?}): {}",
            $start,
            $elapsed,
            $sql
        )
    };
    ($level:ident, $start:expr, $elapsed:expr, $sql:expr, $args:expr) => {
        tracing::$level!(
            duration = ?$elapsed,
            args = ?$args,
            "Slow SQL (started: {}) (total time: {:?}): {}",
            $start,
            $elapsed,
            $sql
        )
    };
}

/// Records SQL operation outcomes, latencies and slow-query log lines.
///
/// Cheap to clone; clones share the threshold handle, args level included.
#[derive(Debug, Clone)]
pub struct SqlRecorder {
    thresholds: ThresholdHandle,
    clock: Arc<dyn Clock>,
}

impl SqlRecorder {
    /// Recorder reading the system clock.
    pub fn new(thresholds: ThresholdHandle) -> Self {
        Self::with_clock(thresholds, Arc::new(SystemClock))
    }

    /// Recorder reading time from `clock`.
    pub fn with_clock(thresholds: ThresholdHandle, clock: Arc<dyn Clock>) -> Self {
        Self { thresholds, clock }
    }

    /// Recorder with its own threshold handle seeded from `config`.
    pub fn from_config(config: &SlowQueryConfig) -> Self {
        Self::new(ThresholdHandle::from_config(config))
    }

    /// Attach bind args only when `level` is enabled for this module.
    ///
    /// Sets the level on the shared handle, so every clone sees it.
    pub fn with_args_level(self, level: Level) -> Self {
        self.thresholds.set_args_level(level);
        self
    }

    /// The live thresholds and args level. Updates through any clone take
    /// effect on the next call.
    pub fn thresholds(&self) -> &ThresholdHandle {
        &self.thresholds
    }

    /// Record one finished SQL operation that began at `start`.
    pub fn record(&self, start: DateTime<Utc>, outcome: Outcome, sql: &str, args: &[&dyn fmt::Debug]) {
        counter!(SQL_TOTAL, "outcome" => outcome.as_str()).increment(1);

        // A start time in the future counts as zero elapsed.
        let elapsed = self
            .clock
            .now()
            .signed_duration_since(start)
            .to_std()
            .unwrap_or(Duration::ZERO);
        histogram!(SQL_TIME_SECONDS, "outcome" => outcome.as_str()).record(elapsed.as_secs_f64());

        let settings = self.thresholds.settings();
        let Some(severity) = Severity::classify(elapsed, settings.thresholds) else {
            return;
        };

        match (severity, level_enabled(settings.args_level)) {
            (Severity::Slow, false) => slow_sql!(info, start, elapsed, sql),
            (Severity::Slow, true) => slow_sql!(info, start, elapsed, sql, args),
            (Severity::Critical, false) => slow_sql!(warn, start, elapsed, sql),
            (Severity::Critical, true) => slow_sql!(warn, start, elapsed, sql, args),
        }
    }
}

fn level_enabled(level: Level) -> bool {
    if level == Level::TRACE {
        tracing::enabled!(Level::TRACE)
    } else if level == Level::DEBUG {
        tracing::enabled!(Level::DEBUG)
    } else if level == Level::INFO {
        tracing::enabled!(Level::INFO)
    } else if level == Level::WARN {
        tracing::enabled!(Level::WARN)
    } else {
        tracing::enabled!(Level::ERROR)
    }
}
