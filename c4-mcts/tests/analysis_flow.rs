//! End-to-end: commit a line of moves, recycling the tree each step.

use c4_core::Position;
use c4_mcts::{PathKey, SearchEngine, UniformEvaluator};

#[test]
fn committed_line_keeps_key_chain_consistent() {
    let mut engine = SearchEngine::new(Position::new(), 3.0, 60);
    let mut expected_key = PathKey::ROOT;

    for ply in 1..=6u32 {
        engine.run_playouts(&UniformEvaluator, false).unwrap();
        let col = engine.principal_variation()[0];
        expected_key = expected_key.child(ply, col);

        engine.recycle_tree(col as usize).unwrap();

        let root = engine.root();
        assert_eq!(root.depth, ply);
        assert_eq!(root.key, expected_key);
        assert_eq!(root.parent, None);
        assert!(engine.arena().active_nodes().all(|n| n.depth >= ply));
        assert_eq!(engine.base_position().move_count(), ply);
    }
}

#[test]
fn analysis_after_commits_matches_fresh_search_shape() {
    // A recycled engine and a fresh engine on the same position agree on
    // which columns exist as root children.
    let mut recycled = SearchEngine::new(Position::new(), 3.0, 80);
    recycled.run_playouts(&UniformEvaluator, false).unwrap();
    recycled.recycle_tree(3).unwrap();
    recycled.run_playouts(&UniformEvaluator, false).unwrap();

    let mut base = Position::new();
    base.play(3);
    let mut fresh = SearchEngine::new(base, 3.0, 80);
    fresh.run_playouts(&UniformEvaluator, false).unwrap();

    for col in 0..7 {
        assert_eq!(
            recycled.root_child(col).is_some(),
            fresh.root_child(col).is_some()
        );
    }
}
