//! Configuration file watcher for threshold hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ObserverConfig;
use crate::config::thresholds::{SlowQuerySettings, ThresholdHandle};

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ObserverConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ObserverConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as updates are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    reload(&path, &tx);
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Re-read `path` and forward it. Returns whether a config was sent.
///
/// A file that fails to load or validate is dropped and the live settings stay.
fn reload(path: &Path, tx: &mpsc::UnboundedSender<ObserverConfig>) -> bool {
    match load_config(path) {
        Ok(config) => {
            let slow_query = &config.slow_query;
            tracing::info!(
                path = ?path,
                slow_threshold_ms = slow_query.slow_threshold_ms,
                critical_threshold_ms = slow_query.critical_threshold_ms,
                args_level = %slow_query.args_level,
                "Reloaded slow-query config"
            );
            tx.send(config).is_ok()
        }
        Err(e) => {
            tracing::error!(path = ?path, "Failed to reload config: {}. Keeping current settings.", e);
            false
        }
    }
}

/// Apply reloaded configurations to the live settings until the sender side closes.
///
/// The slow and critical thresholds and the args level are hot-reloadable;
/// other sections of a reloaded file are ignored until restart.
pub async fn apply_reloads(
    mut updates: mpsc::UnboundedReceiver<ObserverConfig>,
    thresholds: ThresholdHandle,
) {
    while let Some(config) = updates.recv().await {
        let next = SlowQuerySettings::from(&config.slow_query);
        if next != thresholds.settings() {
            tracing::info!(
                slow = ?next.thresholds.slow,
                critical = ?next.thresholds.critical,
                args_level = %next.args_level,
                "Slow-query settings updated"
            );
            thresholds.store_settings(next);
        }
    }
    tracing::debug!("Config update channel closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SlowQueryConfig, Thresholds};
    use tracing::Level;

    #[tokio::test]
    async fn test_apply_reloads_swaps_thresholds() {
        let handle = ThresholdHandle::default();
        let (tx, rx) = mpsc::unbounded_channel();

        let config = ObserverConfig {
            slow_query: SlowQueryConfig {
                slow_threshold_ms: 100,
                critical_threshold_ms: 400,
                ..SlowQueryConfig::default()
            },
            ..ObserverConfig::default()
        };
        tx.send(config).unwrap();
        drop(tx);

        apply_reloads(rx, handle.clone()).await;

        assert_eq!(
            handle.load(),
            Thresholds::new(Duration::from_millis(100), Duration::from_millis(400))
        );
    }

    #[tokio::test]
    async fn test_apply_reloads_swaps_args_level() {
        let handle = ThresholdHandle::from_config(&SlowQueryConfig::default());
        assert_eq!(handle.args_level(), Level::TRACE);
        let (tx, rx) = mpsc::unbounded_channel();

        let config = ObserverConfig {
            slow_query: SlowQueryConfig {
                args_level: "info".into(),
                ..SlowQueryConfig::default()
            },
            ..ObserverConfig::default()
        };
        tx.send(config).unwrap();
        drop(tx);

        apply_reloads(rx, handle.clone()).await;

        assert_eq!(handle.args_level(), Level::INFO);
        assert_eq!(handle.load(), Thresholds::default());
    }

    #[test]
    fn test_reload_forwards_valid_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observer.toml");
        let (tx, mut rx) = mpsc::unbounded_channel();

        std::fs::write(&path, "[slow_query]\nslow_threshold_ms = 250\nargs_level = \"debug\"\n").unwrap();
        assert!(reload(&path, &tx));
        let config = rx.try_recv().unwrap();
        assert_eq!(config.slow_query.slow_threshold_ms, 250);
        assert_eq!(config.slow_query.args_level, "debug");

        std::fs::write(&path, "[slow_query]\nargs_level = \"loud\"\n").unwrap();
        assert!(!reload(&path, &tx));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_watcher_delivers_reloaded_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observer.toml");
        std::fs::write(&path, "[slow_query]\nslow_threshold_ms = 1000\n").unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path);
        let _guard = watcher.run().unwrap();

        std::fs::write(&path, "[slow_query]\nslow_threshold_ms = 50\n").unwrap();

        let update = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                match rx.recv().await {
                    Some(config) if config.slow_query.slow_threshold_ms == 50 => return config,
                    Some(_) => continue,
                    None => panic!("watcher channel closed"),
                }
            }
        })
        .await
        .expect("no reload observed");

        assert_eq!(update.slow_query.critical_threshold_ms, 5_000);
    }
}
