//! c4-mcts: PUCT tree search for Connect Four.
//!
//! The pieces:
//! - content-addressed node identifiers (`path_key`)
//! - a fixed-capacity open-addressed arena owning all nodes (`arena`)
//! - PUCT statistics per node (`node`)
//! - the playout loop, tree recycling, and probability export (`engine`)
//! - the opaque network interface (`evaluator`)

pub mod arena;
pub mod engine;
pub mod evaluator;
pub mod node;
pub mod path_key;

#[cfg(test)]
mod arena_tests;
#[cfg(test)]
mod engine_tests;

pub use arena::{Arena, ArenaError};
pub use engine::{SearchEngine, SearchError};
pub use evaluator::{Evaluator, UniformEvaluator};
pub use node::{Node, SlotIndex, FORCED_WIN_VALUE};
pub use path_key::PathKey;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
