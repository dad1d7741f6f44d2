//! Search node: PUCT statistics plus non-owning links into the arena.

use crate::path_key::PathKey;

/// Index of a slot in the arena's backing table.
pub type SlotIndex = u32;

/// Selection value of a terminal child that wins for the side moving into
/// it; large enough that it is always preferred over any PUCT score.
pub const FORCED_WIN_VALUE: f32 = 999.0;

/// One arena slot. `active == false` means the slot is free for reuse and
/// its contents are meaningless.
#[derive(Debug, Clone)]
pub struct Node {
    pub key: PathKey,
    pub depth: u32,
    /// Column that led here from the parent.
    pub col: u8,
    pub prior: f32,
    pub visits: u64,
    /// Cumulative backed-up value, from this node's side-to-move view.
    pub value_sum: f32,
    pub terminal: bool,
    /// -1 / 0 / +1 for the side that just moved into this node.
    pub terminal_score: f32,
    pub active: bool,
    pub parent: Option<SlotIndex>,
    pub children: [Option<SlotIndex>; 7],
}

impl Default for Node {
    fn default() -> Self {
        Self {
            key: PathKey::ROOT,
            depth: 0,
            col: 0,
            prior: 0.0,
            visits: 0,
            value_sum: 0.0,
            terminal: false,
            terminal_score: 0.0,
            active: false,
            parent: None,
            children: [None; 7],
        }
    }
}

impl Node {
    /// Mean value; unvisited nodes report the first-play-urgency value of
    /// -1 (assume unexplored moves lose).
    pub fn q(&self) -> f32 {
        if self.visits == 0 {
            -1.0
        } else {
            self.value_sum / self.visits as f32
        }
    }

    /// PUCT selection value seen from the parent, using the AlphaZero
    /// exploration schedule. The 19652/19653 constants widen exploration
    /// logarithmically with the parent's visit count.
    pub fn puct_value(&self, parent_visits: u64, c_puct: f32) -> f32 {
        if self.terminal && self.terminal_score != 0.0 {
            return FORCED_WIN_VALUE;
        }
        let pn = parent_visits as f32;
        let scale = ((pn + 19653.0) / 19652.0).ln() + c_puct;
        let u = scale * self.prior * pn.sqrt() / (1.0 + self.visits as f32);
        self.q() + u
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fpu_is_minus_one() {
        let n = Node::default();
        assert_eq!(n.q(), -1.0);
    }

    #[test]
    fn q_is_mean_value() {
        let n = Node {
            visits: 4,
            value_sum: 2.0,
            ..Node::default()
        };
        assert_eq!(n.q(), 0.5);
    }

    #[test]
    fn winning_terminal_dominates_selection() {
        let win = Node {
            terminal: true,
            terminal_score: 1.0,
            ..Node::default()
        };
        let strong = Node {
            prior: 1.0,
            visits: 1,
            value_sum: 1.0,
            ..Node::default()
        };
        assert_eq!(win.puct_value(10_000, 3.0), FORCED_WIN_VALUE);
        assert!(win.puct_value(10_000, 3.0) > strong.puct_value(10_000, 3.0));
    }

    #[test]
    fn drawn_terminal_is_not_boosted() {
        let draw = Node {
            terminal: true,
            terminal_score: 0.0,
            prior: 0.1,
            ..Node::default()
        };
        assert!(draw.puct_value(100, 3.0) < FORCED_WIN_VALUE);
    }

    #[test]
    fn exploration_grows_with_parent_visits() {
        let n = Node {
            prior: 0.5,
            visits: 10,
            value_sum: 0.0,
            ..Node::default()
        };
        let small = n.puct_value(100, 3.0);
        let large = n.puct_value(100_000, 3.0);
        assert!(large > small);
    }
}
