//! Color repair after insert and delete.
//!
//! Both passes are small state machines. Each iteration classifies the
//! local shape into a named case from the colors around the current node,
//! then applies that case's recoloring and rotations. Mirror images are
//! folded into a single branch by carrying the `Side` the current node
//! hangs on.

use crate::arena::NodeArena;
use crate::node::{Color, Link, NodeKey, Side};
use log::trace;

/// Shape around a red node whose parent is also red.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum InsertCase {
    /// Parent and uncle are red: push the blackness down from the grandparent.
    UncleRed,
    /// Uncle is black and the node is an inner grandchild.
    UncleBlackTriangle,
    /// Uncle is black and the node is an outer grandchild.
    UncleBlackLine,
}

impl InsertCase {
    pub(crate) fn classify(uncle: Color, parent_side: Side, node_side: Side) -> InsertCase {
        match (uncle, parent_side == node_side) {
            (Color::Red, _) => InsertCase::UncleRed,
            (Color::Black, false) => InsertCase::UncleBlackTriangle,
            (Color::Black, true) => InsertCase::UncleBlackLine,
        }
    }
}

/// Shape around a doubly black position `x`, named after `x`'s sibling and
/// the sibling's children ("near" is on `x`'s side, "far" opposite).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum DeleteCase {
    SiblingRed,
    NephewsBlack,
    NearNephewRed,
    FarNephewRed,
}

impl DeleteCase {
    pub(crate) fn classify(sibling: Color, near: Color, far: Color) -> DeleteCase {
        match (sibling, near, far) {
            (Color::Red, _, _) => DeleteCase::SiblingRed,
            (Color::Black, _, Color::Red) => DeleteCase::FarNephewRed,
            (Color::Black, Color::Red, Color::Black) => DeleteCase::NearNephewRed,
            (Color::Black, Color::Black, Color::Black) => DeleteCase::NephewsBlack,
        }
    }
}

impl NodeArena {
    /// Restore the invariants after linking the red node `k`.
    pub(crate) fn fixup_after_insert(&mut self, mut k: NodeKey) {
        while let Some(p) = self.parent(k) {
            if self.color(p).is_black() {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let g = self
                .parent(p)
                .expect("red parent must have a parent");
            let parent_side = self.side_in(g, Some(p));
            let uncle = self.child(g, parent_side.opposite());
            let node_side = self.side_in(p, Some(k));

            let case = InsertCase::classify(self.color_of(uncle), parent_side, node_side);
            trace!("insert fixup at key {}: {:?}", self.key(k), case);
            match case {
                InsertCase::UncleRed => {
                    self.set_color(p, Color::Black);
                    if let Some(u) = uncle {
                        self.set_color(u, Color::Black);
                    }
                    self.set_color(g, Color::Red);
                    k = g;
                }
                InsertCase::UncleBlackTriangle | InsertCase::UncleBlackLine => {
                    let mut p = p;
                    if case == InsertCase::UncleBlackTriangle {
                        self.rotate(p, parent_side);
                        k = p;
                        p = self
                            .parent(k)
                            .expect("rotated node must have a parent");
                    }
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate(g, parent_side.opposite());
                }
            }
        }

        if let Some(r) = self.root {
            self.set_color(r, Color::Black);
        }
    }

    /// Restore the invariants after a black node left the position now held
    /// by `x`. `x` may be the sentinel, so its parent is passed alongside.
    pub(crate) fn fixup_after_delete(&mut self, mut x: Link, mut parent: Link) {
        while x != self.root && self.color_of(x).is_black() {
            let Some(p) = parent else { break };
            let side = self.side_in(p, x);
            let s = self
                .child(p, side.opposite())
                .expect("doubly black position must have a sibling");
            let near = self.child(s, side);
            let far = self.child(s, side.opposite());

            let case = DeleteCase::classify(self.color(s), self.color_of(near), self.color_of(far));
            trace!("delete fixup under key {}: {:?}", self.key(p), case);
            match case {
                DeleteCase::SiblingRed => {
                    self.set_color(s, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate(p, side);
                }
                DeleteCase::NephewsBlack => {
                    self.set_color(s, Color::Red);
                    x = Some(p);
                    parent = self.parent(p);
                }
                DeleteCase::NearNephewRed => {
                    if let Some(n) = near {
                        self.set_color(n, Color::Black);
                    }
                    self.set_color(s, Color::Red);
                    self.rotate(s, side.opposite());
                }
                DeleteCase::FarNephewRed => {
                    let pc = self.color(p);
                    self.set_color(s, pc);
                    self.set_color(p, Color::Black);
                    if let Some(f) = far {
                        self.set_color(f, Color::Black);
                    }
                    self.rotate(p, side);
                    x = self.root;
                    parent = None;
                }
            }
        }

        if let Some(x) = x {
            self.set_color(x, Color::Black);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Key;

    fn build(keys: &[Key]) -> NodeArena {
        let mut a = NodeArena::new();
        for &k in keys {
            let (n, is_root) = a.attach(k);
            if is_root {
                a.set_color(n, Color::Black);
            } else {
                a.fixup_after_insert(n);
            }
        }
        a
    }

    fn delete(a: &mut NodeArena, key: Key) {
        let z = a.find(key).expect("key present");
        let (_, departed, x, xp) = a.detach(z);
        if departed.is_black() {
            a.fixup_after_delete(x, xp);
        }
    }

    /// (key, color) of a node reached from the root by a path of sides.
    fn at(a: &NodeArena, path: &[Side]) -> (Key, Color) {
        let mut k = a.root.unwrap();
        for &s in path {
            k = a.child(k, s).unwrap();
        }
        (a.key(k), a.color(k))
    }

    use crate::node::Color::{Black as B, Red as R};
    use crate::node::Side::{Left as L, Right as Rt};

    #[test]
    fn insert_case_table() {
        assert_eq!(InsertCase::classify(R, L, L), InsertCase::UncleRed);
        assert_eq!(InsertCase::classify(R, Rt, L), InsertCase::UncleRed);
        assert_eq!(InsertCase::classify(B, L, Rt), InsertCase::UncleBlackTriangle);
        assert_eq!(InsertCase::classify(B, Rt, L), InsertCase::UncleBlackTriangle);
        assert_eq!(InsertCase::classify(B, L, L), InsertCase::UncleBlackLine);
        assert_eq!(InsertCase::classify(B, Rt, Rt), InsertCase::UncleBlackLine);
    }

    #[test]
    fn delete_case_table() {
        for near in [R, B] {
            for far in [R, B] {
                assert_eq!(DeleteCase::classify(R, near, far), DeleteCase::SiblingRed);
            }
        }
        assert_eq!(DeleteCase::classify(B, B, B), DeleteCase::NephewsBlack);
        assert_eq!(DeleteCase::classify(B, R, B), DeleteCase::NearNephewRed);
        assert_eq!(DeleteCase::classify(B, B, R), DeleteCase::FarNephewRed);
        assert_eq!(DeleteCase::classify(B, R, R), DeleteCase::FarNephewRed);
    }

    /// UncleBlackLine: a right-leaning chain rotates into a balanced triple.
    #[test]
    fn insert_line_rotates_at_grandparent() {
        for keys in [[10, 20, 30], [30, 20, 10]] {
            let a = build(&keys);
            assert_eq!(at(&a, &[]), (20, B));
            assert_eq!(at(&a, &[L]), (10, R));
            assert_eq!(at(&a, &[Rt]), (30, R));
        }
    }

    /// UncleBlackTriangle: the inner grandchild ends up at the top.
    #[test]
    fn insert_triangle_rotates_twice() {
        for keys in [[10, 30, 20], [30, 10, 20]] {
            let a = build(&keys);
            assert_eq!(at(&a, &[]), (20, B));
            assert_eq!(at(&a, &[L]), (10, R));
            assert_eq!(at(&a, &[Rt]), (30, R));
        }
    }

    /// UncleRed: recoloring pushes red up to the root, which is then blackened.
    #[test]
    fn insert_uncle_red_recolors() {
        let a = build(&[20, 10, 30, 15]);
        assert_eq!(at(&a, &[]), (20, B));
        assert_eq!(at(&a, &[L]), (10, B));
        assert_eq!(at(&a, &[Rt]), (30, B));
        assert_eq!(at(&a, &[L, Rt]), (15, R));
    }

    #[test]
    fn delete_far_nephew_red() {
        let mut a = build(&[20, 10, 30, 40]);
        delete(&mut a, 10);
        assert_eq!(at(&a, &[]), (30, B));
        assert_eq!(at(&a, &[L]), (20, B));
        assert_eq!(at(&a, &[Rt]), (40, B));
    }

    #[test]
    fn delete_near_nephew_red() {
        let mut a = build(&[20, 10, 30, 25]);
        delete(&mut a, 10);
        assert_eq!(at(&a, &[]), (25, B));
        assert_eq!(at(&a, &[L]), (20, B));
        assert_eq!(at(&a, &[Rt]), (30, B));
    }

    #[test]
    fn delete_nephews_black_propagates_up() {
        let mut a = build(&[20, 10, 30, 40]);
        delete(&mut a, 40);
        delete(&mut a, 10);
        assert_eq!(at(&a, &[]), (20, B));
        assert_eq!(at(&a, &[Rt]), (30, R));
        assert_eq!(a.child(a.root.unwrap(), L), None);
    }

    #[test]
    fn delete_sibling_red() {
        let mut a = build(&[10, 5, 20, 15, 25, 30]);
        assert_eq!(at(&a, &[Rt]), (20, R));
        delete(&mut a, 5);
        assert_eq!(at(&a, &[]), (20, B));
        assert_eq!(at(&a, &[L]), (10, B));
        assert_eq!(at(&a, &[L, Rt]), (15, R));
        assert_eq!(at(&a, &[Rt]), (25, B));
        assert_eq!(at(&a, &[Rt, Rt]), (30, R));
    }

    /// Mirror of the far-nephew case with `x` on the right.
    #[test]
    fn delete_far_nephew_red_mirrored() {
        let mut a = build(&[20, 30, 10, 5]);
        delete(&mut a, 30);
        assert_eq!(at(&a, &[]), (10, B));
        assert_eq!(at(&a, &[L]), (5, B));
        assert_eq!(at(&a, &[Rt]), (20, B));
    }

    /// Mirror of the near-nephew case: the double rotation runs the other way.
    #[test]
    fn delete_near_nephew_red_mirrored() {
        let mut a = build(&[20, 30, 10, 15]);
        assert_eq!(at(&a, &[L, Rt]), (15, R));
        delete(&mut a, 30);
        assert_eq!(at(&a, &[]), (15, B));
        assert_eq!(at(&a, &[L]), (10, B));
        assert_eq!(at(&a, &[Rt]), (20, B));
    }

    /// Mirror of the black-nephews case: the left sibling turns red.
    #[test]
    fn delete_nephews_black_mirrored() {
        let mut a = build(&[20, 30, 10, 5]);
        delete(&mut a, 5);
        delete(&mut a, 30);
        assert_eq!(at(&a, &[]), (20, B));
        assert_eq!(at(&a, &[L]), (10, R));
        assert_eq!(a.child(a.root.unwrap(), Rt), None);
    }

    /// Mirror of the red-sibling case with `x` on the right.
    #[test]
    fn delete_sibling_red_mirrored() {
        let mut a = build(&[30, 35, 20, 25, 15, 10]);
        assert_eq!(at(&a, &[L]), (20, R));
        delete(&mut a, 35);
        assert_eq!(at(&a, &[]), (20, B));
        assert_eq!(at(&a, &[L]), (15, B));
        assert_eq!(at(&a, &[L, L]), (10, R));
        assert_eq!(at(&a, &[Rt]), (30, B));
        assert_eq!(at(&a, &[Rt, L]), (25, R));
    }

    /// Deleting the black root's only red child leaves a lone black root.
    #[test]
    fn delete_red_leaf_needs_no_repair() {
        let mut a = build(&[1, 2]);
        delete(&mut a, 2);
        assert_eq!(at(&a, &[]), (1, B));
        assert_eq!(a.len(), 1);
    }
}
