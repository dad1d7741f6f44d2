//! c4-features: network input encoding for the search stack.

pub mod encode;
pub mod schema;

pub use encode::encode_position_v1;
pub use schema::{tensor_index, CHANNELS, CH_O, CH_TO_MOVE, CH_X, F};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
