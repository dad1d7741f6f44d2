use crate::arena::{Arena, ArenaError};
use crate::path_key::PathKey;

/// Root plus one child per column, uniform priors.
fn arena_with_expanded_root(capacity: usize) -> (Arena, u32) {
    let mut arena = Arena::with_capacity(capacity);
    let root = arena.create_root().unwrap();
    for col in 0..7u8 {
        arena
            .create_child(root, col, 1.0 / 7.0, false, 0.0)
            .unwrap();
    }
    (arena, root)
}

fn child_key(col: u8) -> PathKey {
    PathKey::ROOT.child(1, col)
}

#[test]
fn lookup_after_deactivation_and_rebuild() {
    let (mut arena, _root) = arena_with_expanded_root(17);
    assert_eq!(arena.count_active(), 8);

    for col in [1u8, 3, 5] {
        arena.deactivate(child_key(col), 1);
    }
    assert_eq!(arena.count_active(), 5);

    let found = arena.lookup(child_key(4), 1).expect("child 4 survives");
    assert_eq!(arena.node(found).col, 4);

    arena.rebuild(17).unwrap();
    assert_eq!(arena.count_active(), 5);
    for col in [0u8, 2, 4, 6] {
        let slot = arena.lookup(child_key(col), 1).expect("kept child");
        assert_eq!(arena.node(slot).col, col);
    }
    for col in [1u8, 3, 5] {
        assert!(arena.lookup(child_key(col), 1).is_none());
    }
}

#[test]
fn rebuild_repairs_parent_and_child_links() {
    let (mut arena, _root) = arena_with_expanded_root(17);
    arena.rebuild(31).unwrap();

    let root = arena.lookup(PathKey::ROOT, 0).expect("root survives");
    for col in 0..7u8 {
        let child = arena.lookup(child_key(col), 1).expect("child survives");
        assert_eq!(arena.node(root).children[col as usize], Some(child));
        assert_eq!(arena.node(child).parent, Some(root));
        assert_eq!(arena.node(child).key, child_key(col));
    }
}

#[test]
fn inactive_gap_hides_probe_chain_until_rebuild() {
    // Column 0 contributes nothing to the key, so the root and its first
    // child share a primary hash and the child lands one probe further on.
    let mut arena = Arena::with_capacity(5);
    let root = arena.create_root().unwrap();
    let child = arena.create_child(root, 0, 1.0, false, 0.0).unwrap();
    assert_eq!(arena.lookup(child_key(0), 1), Some(child));

    arena.node_mut(root).active = false;
    // the gap now shadows the child
    assert_eq!(arena.lookup(child_key(0), 1), None);
    assert_eq!(arena.count_active(), 1);

    arena.rebuild(5).unwrap();
    assert!(arena.lookup(child_key(0), 1).is_some());
}

#[test]
fn overfull_insert_is_an_error() {
    let mut arena = Arena::with_capacity(4);
    let root = arena.create_root().unwrap();
    for col in 0..3u8 {
        arena.create_child(root, col, 0.25, false, 0.0).unwrap();
    }
    let err = arena.create_child(root, 3, 0.25, false, 0.0);
    assert!(matches!(err, Err(ArenaError::Overfull { capacity: 4 })));
}

#[test]
fn rebuild_into_too_small_table_is_an_error() {
    let (mut arena, _root) = arena_with_expanded_root(17);
    assert!(matches!(
        arena.rebuild(4),
        Err(ArenaError::Overfull { capacity: 4 })
    ));
}

#[test]
fn deactivate_subtree_clears_descendants() {
    let (mut arena, root) = arena_with_expanded_root(63);
    let mid = arena.lookup(child_key(2), 1).unwrap();
    for col in 0..7u8 {
        arena.create_child(mid, col, 1.0 / 7.0, false, 0.0).unwrap();
    }
    assert_eq!(arena.count_active(), 15);

    arena.deactivate_subtree(mid);
    assert_eq!(arena.count_active(), 7);
    assert!(arena.lookup(child_key(2), 1).is_none());
    assert!(arena.lookup(PathKey::ROOT, 0).is_some());
    // untouched siblings still resolve
    assert_eq!(arena.node(root).children[4].is_some(), true);
}
