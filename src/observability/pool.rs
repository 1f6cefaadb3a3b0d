//! Connection-pool statistics reporting.
//!
//! # Responsibilities
//! - Format a pool snapshot into one log line with a fixed field order
//! - Periodically pull snapshots from registered pools and report them
//!
//! # Design Decisions
//! - Log only; pool statistics never touch the metrics recorder
//! - Field order is stable so log parsers can rely on it

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::PoolStatsConfig;

/// Point-in-time statistics of one connection pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Configured maximum number of open connections (0 = unlimited).
    pub max_open_connections: u32,
    /// Connections currently open, in use or idle.
    pub open_connections: u32,
    pub in_use: u32,
    pub idle: u32,
    /// Total number of times a caller waited for a connection.
    pub wait_count: u64,
    /// Total time spent waiting for connections.
    pub wait_duration: Duration,
    /// Connections closed because the idle pool was full.
    pub max_idle_closed: u64,
    /// Connections closed for sitting idle too long.
    pub max_idle_time_closed: u64,
    /// Connections closed for exceeding their maximum lifetime.
    pub max_lifetime_closed: u64,
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "maxOpenConnections: {}, openConnections: {}, inUse: {}, idle: {}, waitCount: {}, \
             waitDuration: {:?}, maxIdleClosed: {}, maxIdleTimeClosed: {}, maxLifetimeClosed: {}",
            self.max_open_connections,
            self.open_connections,
            self.in_use,
            self.idle,
            self.wait_count,
            self.wait_duration,
            self.max_idle_closed,
            self.max_idle_time_closed,
            self.max_lifetime_closed,
        )
    }
}

/// Emit one INFO line describing `stats` for the pool `pool_id` named `name`.
pub fn report_pool_stats(pool_id: u32, name: &str, stats: &PoolStats) {
    tracing::info!(pool_name = %name, "ID: {}, DB stats: {}", pool_id, stats);
}

/// Anything that can produce a snapshot of a connection pool.
pub trait PoolStatsSource: Send + Sync {
    fn pool_stats(&self) -> PoolStats;
}

impl<F> PoolStatsSource for F
where
    F: Fn() -> PoolStats + Send + Sync,
{
    fn pool_stats(&self) -> PoolStats {
        self()
    }
}

struct RegisteredPool {
    id: u32,
    name: String,
    source: Arc<dyn PoolStatsSource>,
}

/// Periodically reports every registered pool.
pub struct PoolStatsReporter {
    pools: Vec<RegisteredPool>,
    config: PoolStatsConfig,
}

impl fmt::Debug for PoolStatsReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pools: Vec<(u32, &str)> = self.pools.iter().map(|p| (p.id, p.name.as_str())).collect();
        f.debug_struct("PoolStatsReporter")
            .field("pools", &pools)
            .field("config", &self.config)
            .finish()
    }
}

impl PoolStatsReporter {
    pub fn new(config: PoolStatsConfig) -> Self {
        Self {
            pools: Vec::new(),
            config,
        }
    }

    /// Add a pool to the report.
    pub fn register(&mut self, id: u32, name: impl Into<String>, source: Arc<dyn PoolStatsSource>) {
        self.pools.push(RegisteredPool {
            id,
            name: name.into(),
            source,
        });
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn config(&self) -> &PoolStatsConfig {
        &self.config
    }

    /// Report every registered pool once.
    pub fn report_all(&self) {
        for pool in &self.pools {
            report_pool_stats(pool.id, &pool.name, &pool.source.pool_stats());
        }
    }

    /// Report on every tick until `shutdown` fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Pool stats reporting disabled");
            return;
        }

        tracing::info!(
            interval = self.config.interval_secs,
            pools = self.pools.len(),
            "Pool stats reporter starting"
        );

        let interval = Duration::from_secs(self.config.interval_secs.max(1));
        let mut ticker = time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.report_all();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Pool stats reporter received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
