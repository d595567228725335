#![cfg(test)]

// Property tests for RbTree against simple std-collection models, kept in
// the crate next to the unit tests of the layers they drive.

use crate::rb_tree::{DeleteError, Handle, RbTree};
use crate::node::Key;
use proptest::prelude::*;
use std::collections::BTreeMap;

// A small key space keeps duplicates and delete hits frequent.
#[derive(Clone, Debug)]
enum Op {
    Insert(Key),
    Delete(Key),
    Contains(Key),
    Iterate,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let key = -16i64..16;
    let op = prop_oneof![
        4 => key.clone().prop_map(Op::Insert),
        3 => key.clone().prop_map(Op::Delete),
        1 => key.prop_map(Op::Contains),
        1 => Just(Op::Iterate),
    ];
    proptest::collection::vec(op, 1..200)
}

fn expand(model: &BTreeMap<Key, usize>) -> Vec<Key> {
    model
        .iter()
        .flat_map(|(&k, &n)| std::iter::repeat(k).take(n))
        .collect()
}

// Property: state-machine equivalence against a BTreeMap multiset.
// Invariants exercised across random operation sequences:
// - Every red-black invariant holds after each insert and delete.
// - `delete` succeeds iff the model holds the key; a miss changes nothing.
// - `contains` parity with the model; inorder equals the sorted multiset.
// - Handles of deleted nodes never resolve; `len` parity after each op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in arb_ops()) {
        let mut sut = RbTree::new();
        let mut model: BTreeMap<Key, usize> = BTreeMap::new();
        let mut live: Vec<Handle> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(k) => {
                    let h = sut.insert(k);
                    prop_assert_eq!(h.key(&sut), Some(k));
                    *model.entry(k).or_insert(0) += 1;
                    live.push(h);
                }
                Op::Delete(k) => {
                    let before = sut.inorder();
                    match sut.delete(k) {
                        Ok(removed) => {
                            prop_assert_eq!(removed, k);
                            let n = model.get_mut(&k).expect("model holds deleted key");
                            *n -= 1;
                            if *n == 0 {
                                model.remove(&k);
                            }
                        }
                        Err(DeleteError::KeyNotFound(missing)) => {
                            prop_assert_eq!(missing, k);
                            prop_assert!(!model.contains_key(&k));
                            prop_assert_eq!(sut.inorder(), before);
                        }
                    }
                }
                Op::Contains(k) => {
                    prop_assert_eq!(sut.contains(k), model.contains_key(&k));
                    prop_assert_eq!(sut.find(k).is_some(), model.contains_key(&k));
                }
                Op::Iterate => {
                    prop_assert_eq!(sut.inorder(), expand(&model));
                }
            }

            // Post-conditions after each op
            prop_assert!(sut.validate().is_ok(), "{:?}", sut.validate());
            prop_assert_eq!(sut.len(), model.values().sum::<usize>());
            let live_now = live.iter().filter(|h| h.key(&sut).is_some()).count();
            prop_assert_eq!(live_now, sut.len());
        }

        prop_assert_eq!(sut.inorder(), expand(&model));
    }
}

// Property: the red-black height guarantee holds for any insertion order,
// and survives deleting an arbitrary subset of the inserted keys.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_height_bound(
        keys in proptest::collection::vec(any::<i64>(), 0..400),
        drop_mask in proptest::collection::vec(any::<bool>(), 400),
    ) {
        let mut t: RbTree = keys.iter().copied().collect();
        let bound = |n: usize| 2.0 * ((n + 1) as f64).log2();
        prop_assert!(t.height() as f64 <= bound(t.len()));

        for (k, drop) in keys.iter().zip(drop_mask) {
            if drop {
                prop_assert!(t.delete(*k).is_ok());
            }
        }
        prop_assert!(t.validate().is_ok());
        prop_assert!(t.height() as f64 <= bound(t.len()));
        prop_assert_eq!(t.validate().ok(), Some(t.black_height()));
    }
}
