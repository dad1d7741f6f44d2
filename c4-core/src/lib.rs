//! c4-core: board representation, rules, and configuration for the Connect
//! Four search stack.

pub mod config;
pub mod position;

pub use config::{Config, ConfigError, EngineConfig, SelfplayConfig};
pub use position::{Position, Side, CELLS, COLS, ROWS};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
