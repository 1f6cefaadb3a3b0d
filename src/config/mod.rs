//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ObserverConfig (validated, immutable)
//!     → thresholds.rs (ThresholdHandle shared with every recorder)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → apply_reloads() swaps the threshold pair
//!     → recorders see the new values on their next observation
//! ```
//!
//! # Design Decisions
//! - Only the slow-query thresholds change at runtime; everything else needs a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod thresholds;
pub mod validation;
pub mod watcher;

pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::ObserverConfig;
pub use schema::PoolStatsConfig;
pub use schema::SlowQueryConfig;
pub use thresholds::{SlowQuerySettings, ThresholdHandle, Thresholds};
