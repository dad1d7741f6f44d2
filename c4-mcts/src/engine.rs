//! Best-first search engine: playout loop, tree recycling, move-probability
//! export.

use crate::arena::{Arena, ArenaError};
use crate::evaluator::Evaluator;
use crate::node::{Node, SlotIndex};
use c4_core::{Position, COLS};
use c4_features::{encode_position_v1, F};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Arena(#[from] ArenaError),
    #[error("root node missing after rebuild")]
    RootEvicted,
}

/// Single-threaded PUCT searcher. The arena is provisioned once at
/// construction and only reshuffled by rebuilds; a playout allocates
/// nothing beyond its stack-sized working position.
pub struct SearchEngine {
    base: Position,
    arena: Arena,
    root: SlotIndex,
    c_puct: f32,
    playouts: u64,
}

impl SearchEngine {
    /// Arena sized by the empirical `8 * playouts + 1` heuristic.
    pub fn new(base: Position, c_puct: f32, playouts: u64) -> Self {
        Self::with_capacity(base, c_puct, playouts, playouts as usize * 8 + 1)
    }

    /// Arena sized from a memory budget instead of the playout count.
    pub fn with_memory_budget(
        base: Position,
        c_puct: f32,
        playouts: u64,
        megabytes: usize,
    ) -> Self {
        let capacity = megabytes * 1024 * 1024 / std::mem::size_of::<Node>();
        Self::with_capacity(base, c_puct, playouts, capacity)
    }

    pub fn with_capacity(base: Position, c_puct: f32, playouts: u64, capacity: usize) -> Self {
        let mut arena = Arena::with_capacity(capacity);
        // a fresh table always has room for one node
        let root = arena.create_root().expect("empty arena");
        Self {
            base,
            arena,
            root,
            c_puct,
            playouts,
        }
    }

    pub fn base_position(&self) -> &Position {
        &self.base
    }

    pub fn playouts(&self) -> u64 {
        self.playouts
    }

    pub fn set_playouts(&mut self, playouts: u64) {
        self.playouts = playouts;
    }

    pub fn root(&self) -> &Node {
        self.arena.node(self.root)
    }

    pub fn root_child(&self, col: usize) -> Option<&Node> {
        self.arena.node(self.root).children[col].map(|slot| self.arena.node(slot))
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Run playouts until the root has absorbed the full budget. Each
    /// playout copies the base position, descends to a leaf by PUCT,
    /// expands and evaluates it (or scores it directly when terminal), and
    /// backs the value up the path.
    pub fn run_playouts(&mut self, eval: &impl Evaluator, verbose: bool) -> Result<(), SearchError> {
        let mut last_pv: Vec<u8> = Vec::new();
        while self.arena.node(self.root).visits < self.playouts {
            let mut pos = self.base;
            let leaf = self.descend_to_leaf(&mut pos);
            let leaf_node = self.arena.node(leaf);
            if leaf_node.terminal {
                let score = leaf_node.terminal_score;
                self.backpropagate(leaf, score);
            } else {
                let mut features = [0.0f32; F];
                encode_position_v1(&pos, &mut features);
                let (priors, value) = eval.eval(&features);
                self.expand(leaf, &mut pos, &priors)?;
                // the evaluation is from the expanded position's
                // side-to-move; the leaf propagates its own side's view
                self.backpropagate(leaf, -value);
            }

            if verbose && self.arena.node(self.root).visits % 50 == 0 {
                let pv = self.principal_variation();
                if pv != last_pv {
                    let line: Vec<String> = pv.iter().map(|c| c.to_string()).collect();
                    println!(
                        "info playouts {} pv {}",
                        self.arena.node(self.root).visits,
                        line.join(" ")
                    );
                    last_pv = pv;
                }
            }
        }
        if verbose {
            self.print_root_summary();
        }
        Ok(())
    }

    /// Greedy PUCT descent, mutating `pos` along the chosen path. A node
    /// without children is the leaf.
    fn descend_to_leaf(&self, pos: &mut Position) -> SlotIndex {
        let mut current = self.root;
        loop {
            let node = self.arena.node(current);
            let mut best_value = f32::NEG_INFINITY;
            let mut best: Option<(usize, SlotIndex)> = None;
            for (col, child) in node.children.iter().enumerate() {
                let Some(child) = *child else { continue };
                let value = self
                    .arena
                    .node(child)
                    .puct_value(node.visits, self.c_puct);
                if value > best_value {
                    best_value = value;
                    best = Some((col, child));
                }
            }
            let Some((col, child)) = best else {
                return current;
            };
            pos.play(col);
            current = child;
        }
    }

    /// Create one child per legal column, with priors renormalized over the
    /// legal mass and terminal results probed by a play/undo round trip.
    fn expand(
        &mut self,
        leaf: SlotIndex,
        pos: &mut Position,
        priors: &[f32; COLS],
    ) -> Result<(), SearchError> {
        let legal = pos.legal_moves();
        let mut legal_sum = 0.0f32;
        let mut legal_count = 0u32;
        for (col, &ok) in legal.iter().enumerate() {
            if ok {
                legal_sum += priors[col];
                legal_count += 1;
            }
        }
        for (col, &ok) in legal.iter().enumerate() {
            if !ok {
                continue;
            }
            // degenerate prior mass falls back to uniform over legal
            let prior = if legal_sum > 0.0 {
                priors[col] / legal_sum
            } else {
                1.0 / legal_count as f32
            };
            pos.play(col);
            let (terminal, score) = match pos.outcome() {
                Some(s) => (true, s as f32),
                None => (false, 0.0),
            };
            pos.undo();
            self.arena
                .create_child(leaf, col as u8, prior, terminal, score)?;
        }
        Ok(())
    }

    /// Add `value` at the leaf and walk the parent chain, negating at each
    /// step so every node accumulates from its own side-to-move view.
    fn backpropagate(&mut self, leaf: SlotIndex, value: f32) {
        let mut v = value;
        let mut current = Some(leaf);
        while let Some(slot) = current {
            let node = self.arena.node_mut(slot);
            node.visits += 1;
            node.value_sum += v;
            v = -v;
            current = node.parent;
        }
    }

    /// Visit-count move distribution over the root's children. Runs any
    /// remaining playouts first. The divisor is `playouts - 1`: the root's
    /// own expansion playout never passes through a child, so the children
    /// share exactly `root.N - 1` visits.
    pub fn move_probs(&mut self, eval: &impl Evaluator) -> Result<[f32; COLS], SearchError> {
        self.run_playouts(eval, false)?;
        let denom = self.playouts.saturating_sub(1).max(1) as f32;
        let mut probs = [0.0f32; COLS];
        let root = self.arena.node(self.root);
        for (col, child) in root.children.iter().enumerate() {
            if let Some(child) = *child {
                probs[col] = self.arena.node(child).visits as f32 / denom;
            }
        }
        Ok(probs)
    }

    /// Most-visited line from the root; zero-visit children are ignored.
    pub fn principal_variation(&self) -> Vec<u8> {
        let mut pv = Vec::new();
        let mut current = self.root;
        loop {
            let node = self.arena.node(current);
            let mut best_visits = 0u64;
            let mut best: Option<(u8, SlotIndex)> = None;
            for (col, child) in node.children.iter().enumerate() {
                let Some(child) = *child else { continue };
                let visits = self.arena.node(child).visits;
                if visits > best_visits {
                    best_visits = visits;
                    best = Some((col as u8, child));
                }
            }
            let Some((col, child)) = best else { break };
            pv.push(col);
            current = child;
        }
        pv
    }

    /// Commit `col` as the new root: prune every sibling subtree, drop the
    /// old root, compact the arena, and re-locate the surviving subtree by
    /// its key. Rebuilding is what keeps probe chains canonical after the
    /// deactivation storm, and the link repair it runs is required because
    /// compaction relocates every surviving node.
    pub fn recycle_tree(&mut self, col: usize) -> Result<(), SearchError> {
        let root = self.arena.node(self.root);
        let chosen = root.children[col];
        match chosen {
            Some(next) => {
                let siblings = root.children;
                let (root_key, root_depth) = (root.key, root.depth);
                let kept = self.arena.node(next);
                let (key, depth) = (kept.key, kept.depth);

                for (c, sibling) in siblings.into_iter().enumerate() {
                    if c == col {
                        continue;
                    }
                    if let Some(sibling) = sibling {
                        self.arena.deactivate_subtree(sibling);
                    }
                }
                self.arena.deactivate(root_key, root_depth);
                self.arena.rebuild(self.arena.capacity())?;
                self.base.play(col);

                let new_root = self
                    .arena
                    .lookup(key, depth)
                    .ok_or(SearchError::RootEvicted)?;
                self.arena.node_mut(new_root).parent = None;
                self.root = new_root;
            }
            None => {
                // committed a move the tree never expanded: start over
                self.arena.deactivate_subtree(self.root);
                self.arena.rebuild(self.arena.capacity())?;
                self.base.play(col);
                self.root = self.arena.create_root()?;
            }
        }
        Ok(())
    }

    /// Rebuild the arena at a new slot count, keeping the whole tree.
    pub fn set_capacity(&mut self, new_capacity: usize) -> Result<(), SearchError> {
        let root = self.arena.node(self.root);
        let (key, depth) = (root.key, root.depth);
        self.arena.rebuild(new_capacity)?;
        self.root = self
            .arena
            .lookup(key, depth)
            .ok_or(SearchError::RootEvicted)?;
        Ok(())
    }

    pub fn set_capacity_mb(&mut self, megabytes: usize) -> Result<(), SearchError> {
        self.set_capacity(megabytes * 1024 * 1024 / std::mem::size_of::<Node>())
    }

    fn print_root_summary(&self) {
        let root = self.arena.node(self.root);
        for (col, child) in root.children.iter().enumerate() {
            let Some(child) = *child else { continue };
            let node = self.arena.node(child);
            println!(
                "col {} N {} Q {:.3} P {:.3}",
                col,
                node.visits,
                node.q(),
                node.prior
            );
        }
    }
}
