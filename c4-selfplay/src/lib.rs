//! c4-selfplay: Dirichlet-noised, temperature-sampled self-play games.

pub mod driver;

pub use driver::{
    apply_temperature, play_game, GameRecord, MoveRecord, SelfplayError, SelfplayParams,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
