//! Runtime-mutable slow-query settings.
//!
//! The threshold pair and the args level live behind one `ArcSwap` so they can
//! be replaced at any time by embedding code or the config watcher while
//! recorders read them on every observation. Readers always see a whole
//! update, never half of one.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tracing::Level;

use crate::config::schema::SlowQueryConfig;

/// Default slow threshold.
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_secs(1);

/// Default critical (warning) threshold.
pub const DEFAULT_CRITICAL_THRESHOLD: Duration = Duration::from_secs(5);

/// The two latency thresholds that drive slow-query logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Operations at or above this are slow. `Duration::ZERO` disables logging.
    pub slow: Duration,
    /// Slow operations at or above this are critical.
    pub critical: Duration,
}

impl Thresholds {
    pub const fn new(slow: Duration, critical: Duration) -> Self {
        Self { slow, critical }
    }

    /// Whether slow-query logging is switched off.
    pub fn is_disabled(&self) -> bool {
        self.slow.is_zero()
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(DEFAULT_SLOW_THRESHOLD, DEFAULT_CRITICAL_THRESHOLD)
    }
}

impl From<&SlowQueryConfig> for Thresholds {
    fn from(config: &SlowQueryConfig) -> Self {
        Self::new(
            Duration::from_millis(config.slow_threshold_ms),
            Duration::from_millis(config.critical_threshold_ms),
        )
    }
}

/// Everything a recorder reads per observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlowQuerySettings {
    pub thresholds: Thresholds,
    /// Bind args are attached when this level is enabled.
    pub args_level: Level,
}

impl Default for SlowQuerySettings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            args_level: Level::TRACE,
        }
    }
}

impl From<&SlowQueryConfig> for SlowQuerySettings {
    /// An unparsable `args_level` falls back to TRACE; validation rejects it earlier.
    fn from(config: &SlowQueryConfig) -> Self {
        Self {
            thresholds: Thresholds::from(config),
            args_level: Level::from_str(&config.args_level).unwrap_or(Level::TRACE),
        }
    }
}

/// Shared, cloneable handle to the live slow-query settings.
#[derive(Debug, Clone)]
pub struct ThresholdHandle {
    inner: Arc<ArcSwap<SlowQuerySettings>>,
}

impl ThresholdHandle {
    /// Handle with the given thresholds and the default TRACE args level.
    pub fn new(thresholds: Thresholds) -> Self {
        Self::with_settings(SlowQuerySettings {
            thresholds,
            ..SlowQuerySettings::default()
        })
    }

    pub fn with_settings(settings: SlowQuerySettings) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(settings)),
        }
    }

    pub fn from_config(config: &SlowQueryConfig) -> Self {
        Self::with_settings(SlowQuerySettings::from(config))
    }

    /// Current thresholds and args level, read together.
    pub fn settings(&self) -> SlowQuerySettings {
        **self.inner.load()
    }

    /// Current thresholds.
    pub fn load(&self) -> Thresholds {
        self.settings().thresholds
    }

    /// Current args level.
    pub fn args_level(&self) -> Level {
        self.settings().args_level
    }

    /// Replace thresholds and args level at once.
    pub fn store_settings(&self, settings: SlowQuerySettings) {
        self.inner.store(Arc::new(settings));
    }

    /// Replace both thresholds, keeping the args level.
    pub fn store(&self, thresholds: Thresholds) {
        self.inner.rcu(|current| SlowQuerySettings { thresholds, ..**current });
    }

    /// Replace the slow threshold, keeping the critical one.
    pub fn set_slow(&self, slow: Duration) {
        self.inner.rcu(|current| {
            let mut next = **current;
            next.thresholds.slow = slow;
            next
        });
    }

    /// Replace the critical threshold, keeping the slow one.
    pub fn set_critical(&self, critical: Duration) {
        self.inner.rcu(|current| {
            let mut next = **current;
            next.thresholds.critical = critical;
            next
        });
    }

    pub fn set_args_level(&self, level: Level) {
        self.inner.rcu(|current| SlowQuerySettings { args_level: level, ..**current });
    }

    /// Turn slow-query logging off. Metrics are still recorded.
    pub fn disable(&self) {
        self.set_slow(Duration::ZERO);
    }
}

impl Default for ThresholdHandle {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}
