//! Fixed-capacity open-addressed node storage.
//!
//! The arena owns every node; the tree structure on top of it is expressed
//! with slot indices. Slots hash by `(lo + hi) % capacity` with linear
//! probing, and a lookup treats the first inactive slot as a miss. That
//! makes deactivation O(1) at the price of hiding anything that probed past
//! the new gap; the engine tolerates this because every committed move
//! triggers a full rebuild, which compacts the table and restores canonical
//! probe chains.

use crate::node::{Node, SlotIndex};
use crate::path_key::PathKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArenaError {
    /// No inactive slot left for an insert. Sizing is supposed to prevent
    /// this; it is an invariant violation, not a growth request.
    #[error("arena overfull at capacity {capacity}: failed to place node")]
    Overfull { capacity: usize },
}

pub struct Arena {
    slots: Vec<Node>,
}

impl Arena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Node::default(); capacity.max(2)],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn node(&self, slot: SlotIndex) -> &Node {
        &self.slots[slot as usize]
    }

    pub fn node_mut(&mut self, slot: SlotIndex) -> &mut Node {
        &mut self.slots[slot as usize]
    }

    /// Linear-probe insert into `slots`: first inactive slot wins.
    fn place(slots: &mut [Node], node: Node) -> Result<SlotIndex, ArenaError> {
        let capacity = slots.len();
        let start = node.key.slot_hash(capacity);
        for offset in 0..capacity {
            let i = (start + offset) % capacity;
            if !slots[i].active {
                slots[i] = node;
                return Ok(i as SlotIndex);
            }
        }
        Err(ArenaError::Overfull { capacity })
    }

    /// Insert a fresh root with the empty path key.
    pub fn create_root(&mut self) -> Result<SlotIndex, ArenaError> {
        let node = Node {
            active: true,
            ..Node::default()
        };
        Self::place(&mut self.slots, node)
    }

    /// Insert a child of `parent` reached by `col`, deriving its key from
    /// the parent's, and wire the parent's child pointer.
    pub fn create_child(
        &mut self,
        parent: SlotIndex,
        col: u8,
        prior: f32,
        terminal: bool,
        terminal_score: f32,
    ) -> Result<SlotIndex, ArenaError> {
        let p = self.node(parent);
        let depth = p.depth + 1;
        let node = Node {
            key: p.key.child(depth, col),
            depth,
            col,
            prior,
            visits: 0,
            value_sum: 0.0,
            terminal,
            terminal_score,
            active: true,
            parent: Some(parent),
            children: [None; 7],
        };
        let slot = Self::place(&mut self.slots, node)?;
        self.slots[parent as usize].children[col as usize] = Some(slot);
        Ok(slot)
    }

    /// Probe for `(key, depth)`. Stops at the first inactive slot or after
    /// a full wrap.
    pub fn lookup(&self, key: PathKey, depth: u32) -> Option<SlotIndex> {
        let capacity = self.slots.len();
        let start = key.slot_hash(capacity);
        for offset in 0..capacity {
            let i = (start + offset) % capacity;
            let n = &self.slots[i];
            if !n.active {
                return None;
            }
            if n.key == key && n.depth == depth {
                return Some(i as SlotIndex);
            }
        }
        None
    }

    /// Mark a single node inactive, leaving its probe neighbors in place.
    pub fn deactivate(&mut self, key: PathKey, depth: u32) {
        if let Some(slot) = self.lookup(key, depth) {
            self.slots[slot as usize].active = false;
        }
    }

    /// Mark `slot` and every node below it inactive.
    pub fn deactivate_subtree(&mut self, slot: SlotIndex) {
        self.slots[slot as usize].active = false;
        let children = self.slots[slot as usize].children;
        for child in children.into_iter().flatten() {
            self.deactivate_subtree(child);
        }
    }

    pub fn count_active(&self) -> u64 {
        self.slots.iter().filter(|n| n.active).count() as u64
    }

    /// Every live node, in table order.
    pub fn active_nodes(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().filter(|n| n.active)
    }

    /// Re-place every active node into a fresh table of `new_capacity`
    /// slots, then repair all parent/child links top-down from the
    /// minimum-depth survivor. The old table is only replaced once every
    /// node has found a new slot.
    pub fn rebuild(&mut self, new_capacity: usize) -> Result<(), ArenaError> {
        let mut fresh = vec![Node::default(); new_capacity.max(2)];
        let mut top: Option<(PathKey, u32)> = None;
        for node in self.slots.iter().filter(|n| n.active) {
            if top.map_or(true, |(_, depth)| node.depth < depth) {
                top = Some((node.key, node.depth));
            }
            Self::place(&mut fresh, node.clone())?;
        }
        self.slots = fresh;
        if let Some((key, depth)) = top {
            if let Some(root) = self.lookup(key, depth) {
                self.refresh_links(root);
            }
        }
        Ok(())
    }

    /// Recompute the predicted child key for every column of `slot`,
    /// reassign the child pointers from fresh lookups, and recurse,
    /// re-parenting each child on the way down.
    pub fn refresh_links(&mut self, slot: SlotIndex) {
        let (key, depth) = {
            let n = self.node(slot);
            (n.key, n.depth)
        };
        if depth as usize >= c4_core::CELLS {
            // full-board leaf, nothing below
            return;
        }
        let child_depth = depth + 1;
        let mut children = [None; 7];
        for (col, entry) in children.iter_mut().enumerate() {
            *entry = self.lookup(key.child(child_depth, col as u8), child_depth);
        }
        self.slots[slot as usize].children = children;
        for child in children.into_iter().flatten() {
            self.slots[child as usize].parent = Some(slot);
            self.refresh_links(child);
        }
    }
}
