//! Shared builders for the benches.

use c4_core::Position;
use c4_mcts::Node;

/// A representative midgame position (ten plies in, no winner).
pub fn midgame_position() -> Position {
    let mut pos = Position::new();
    for &c in &[3, 3, 2, 4, 4, 2, 5, 1, 0, 6] {
        pos.play(c);
    }
    pos
}

/// A node with representative priors and visit stats.
pub fn visited_node(col: u8, visits: u64) -> Node {
    Node {
        col,
        prior: 1.0 / 7.0,
        visits,
        value_sum: (visits as f32 * 0.1).sin(),
        active: true,
        ..Node::default()
    }
}
