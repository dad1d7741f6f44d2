use crate::engine::{SearchEngine, SearchError};
use crate::evaluator::{Evaluator, UniformEvaluator};
use crate::path_key::PathKey;
use c4_core::{Position, COLS};
use c4_features::F;

/// Deterministic evaluator that pushes all prior mass toward one column.
struct BiasedEvaluator {
    favorite: usize,
}

impl Evaluator for BiasedEvaluator {
    fn eval(&self, _features: &[f32; F]) -> ([f32; COLS], f32) {
        let mut priors = [0.01f32; COLS];
        priors[self.favorite] = 0.94;
        (priors, 0.0)
    }
}

fn x_can_win_in_col_3() -> Position {
    let mut pos = Position::new();
    for &c in &[0, 0, 1, 1, 2, 2] {
        pos.play(c);
    }
    pos
}

#[test]
fn selection_prefers_terminal_win_over_priors() {
    // One playout expands the root; the second must descend into the
    // winning reply no matter how lopsided the priors are.
    let mut engine = SearchEngine::new(x_can_win_in_col_3(), 3.0, 2);
    engine
        .run_playouts(&BiasedEvaluator { favorite: 6 }, false)
        .unwrap();

    let winner = engine.root_child(3).expect("expanded child");
    assert!(winner.terminal);
    assert_eq!(winner.terminal_score, 1.0);
    assert_eq!(winner.visits, 1);
    for col in [0, 1, 2, 4, 5, 6] {
        assert_eq!(engine.root_child(col).unwrap().visits, 0);
    }
}

#[test]
fn move_probs_form_a_distribution() {
    let mut engine = SearchEngine::new(Position::new(), 3.0, 200);
    let probs = engine.move_probs(&UniformEvaluator).unwrap();
    let sum: f32 = probs.iter().sum();
    assert!((sum - 1.0).abs() < 1e-4, "sum={sum}");
    assert!(probs.iter().all(|&p| p >= 0.0));
    assert_eq!(engine.root().visits, 200);
}

#[test]
fn playouts_are_deterministic() {
    let run = || {
        let mut engine = SearchEngine::new(Position::new(), 3.0, 300);
        engine.run_playouts(&UniformEvaluator, false).unwrap();
        let mut nodes: Vec<(u64, u64, u32, u64, u32)> = engine
            .arena()
            .active_nodes()
            .map(|n| (n.key.lo, n.key.hi, n.depth, n.visits, n.value_sum.to_bits()))
            .collect();
        nodes.sort_unstable();
        nodes
    };
    assert_eq!(run(), run());
}

#[test]
fn recycle_preserves_chosen_subtree_statistics() {
    let mut engine = SearchEngine::new(Position::new(), 3.0, 200);
    let probs = engine.move_probs(&UniformEvaluator).unwrap();
    let chosen = probs
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(col, _)| col)
        .unwrap();

    let child = engine.root_child(chosen).unwrap();
    let (visits, value_sum) = (child.visits, child.value_sum);
    let expected_key = PathKey::ROOT.child(1, chosen as u8);

    engine.recycle_tree(chosen).unwrap();

    let root = engine.root();
    assert_eq!(root.depth, 1);
    assert_eq!(root.key, expected_key);
    assert_eq!(root.visits, visits);
    assert_eq!(root.value_sum, value_sum);
    assert_eq!(root.parent, None);
    assert_eq!(engine.base_position().move_count(), 1);

    // nothing at or above the old root survives
    assert!(engine.arena().active_nodes().all(|n| n.depth >= 1));
}

#[test]
fn recycled_tree_keeps_searching() {
    let mut engine = SearchEngine::new(Position::new(), 3.0, 100);
    engine.run_playouts(&UniformEvaluator, false).unwrap();
    engine.recycle_tree(3).unwrap();
    engine.run_playouts(&UniformEvaluator, false).unwrap();
    assert_eq!(engine.root().visits, 100);
    let pv = engine.principal_variation();
    assert!(!pv.is_empty());
}

#[test]
fn recycling_an_unexpanded_column_resets_the_tree() {
    let mut engine = SearchEngine::new(Position::new(), 3.0, 50);
    engine.recycle_tree(4).unwrap();
    assert_eq!(engine.root().depth, 0);
    assert_eq!(engine.root().visits, 0);
    assert_eq!(engine.base_position().move_count(), 1);
    assert_eq!(engine.arena().count_active(), 1);
}

#[test]
fn set_capacity_relocates_the_whole_tree() {
    let mut engine = SearchEngine::new(Position::new(), 3.0, 150);
    engine.run_playouts(&UniformEvaluator, false).unwrap();
    let before = engine.root().visits;

    engine.set_capacity(engine.arena().capacity() * 4).unwrap();
    assert_eq!(engine.root().visits, before);

    // every active node is findable at its key, and links are consistent
    verify_links(&engine);

    // and the tree still works
    engine.set_playouts(300);
    engine.run_playouts(&UniformEvaluator, false).unwrap();
    assert_eq!(engine.root().visits, 300);
}

fn verify_links(engine: &SearchEngine) {
    let arena = engine.arena();
    let mut stack = vec![arena.lookup(engine.root().key, engine.root().depth).unwrap()];
    while let Some(slot) = stack.pop() {
        let node = arena.node(slot);
        assert_eq!(arena.lookup(node.key, node.depth), Some(slot));
        for (col, child) in node.children.iter().enumerate() {
            let Some(child) = *child else { continue };
            let child_node = arena.node(child);
            assert_eq!(child_node.key, node.key.child(node.depth + 1, col as u8));
            assert_eq!(child_node.depth, node.depth + 1);
            assert_eq!(child_node.parent, Some(slot));
            stack.push(child);
        }
    }
}

#[test]
fn principal_variation_follows_visit_counts() {
    let mut engine = SearchEngine::new(x_can_win_in_col_3(), 3.0, 100);
    engine.run_playouts(&UniformEvaluator, false).unwrap();
    let pv = engine.principal_variation();
    assert_eq!(pv.first(), Some(&3u8), "pv={pv:?}");
}

#[test]
fn undersized_arena_overflows_fatally() {
    let mut engine = SearchEngine::with_capacity(Position::new(), 3.0, 400, 16);
    let err = engine.run_playouts(&UniformEvaluator, false);
    assert!(matches!(err, Err(SearchError::Arena(_))));
}
