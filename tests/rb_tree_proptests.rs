use arena_rbtree::{Color, DeleteError, Handle, RbTree};
use proptest::prelude::*;

// Model operations on RbTree and assert the tree stays a valid red-black tree
// whose inorder sequence equals a sorted Vec model.
proptest! {
    #[test]
    fn prop_rb_tree_matches_sorted_vec(ops in proptest::collection::vec((0u8..=2u8, -50i64..50i64), 1..300)) {
        let mut t = RbTree::new();
        let mut model: Vec<i64> = Vec::new();

        for (op, k) in ops {
            match op {
                // Insert keeps duplicates
                0 | 1 => {
                    t.insert(k);
                    let at = model.partition_point(|&m| m <= k);
                    model.insert(at, k);
                }
                // Delete one occurrence if present
                2 => {
                    match model.iter().position(|&m| m == k) {
                        Some(i) => {
                            model.remove(i);
                            prop_assert_eq!(t.delete(k), Ok(k));
                        }
                        None => {
                            prop_assert_eq!(t.delete(k), Err(DeleteError::KeyNotFound(k)));
                        }
                    }
                }
                _ => unreachable!(),
            }

            // Invariants after each step
            prop_assert!(t.validate().is_ok());
            if let Some(root) = t.root() {
                prop_assert_eq!(root.color(), Color::Black);
            }
        }

        prop_assert_eq!(t.len(), model.len());
        prop_assert_eq!(t.inorder(), model);
    }
}

// Handles taken at insert time stay attached to their key for as long as the
// node lives, however much the tree rotates around them.
proptest! {
    #[test]
    fn prop_handles_track_their_node(keys in proptest::collection::hash_set(-1000i64..1000, 1..120), victims in proptest::collection::vec(any::<prop::sample::Index>(), 0..60)) {
        let keys: Vec<i64> = keys.into_iter().collect();
        let mut t = RbTree::new();
        let mut handles: Vec<(i64, Handle)> = keys.iter().map(|&k| (k, t.insert(k))).collect();
        let mut dead: Vec<Handle> = Vec::new();

        for v in victims {
            if handles.is_empty() {
                break;
            }
            let (k, h) = handles.swap_remove(v.index(handles.len()));
            prop_assert_eq!(t.delete(k), Ok(k));
            dead.push(h);

            for &(k, h) in &handles {
                prop_assert_eq!(h.key(&t), Some(k));
                prop_assert_eq!(t.node(h).map(|n| n.key()), Some(k));
            }
            for h in &dead {
                prop_assert!(h.key(&t).is_none());
                prop_assert!(h.color(&t).is_none());
            }
        }
    }
}
