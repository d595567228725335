//! NodeArena: structural layer owning every node in a generational slot map.
//!
//! All links are arena indices. The sentinel is the empty link (`None`),
//! which reads as black and is never written to. Everything here is
//! plain binary-search-tree plumbing; color repair lives in `fixup`.

use crate::node::{Color, Key, Link, Node, NodeKey, Side};
use slotmap::SlotMap;

#[derive(Debug)]
pub(crate) struct NodeArena {
    slots: SlotMap<NodeKey, Node>,
    pub(crate) root: Link,
}

impl NodeArena {
    pub(crate) fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            root: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.root = None;
    }

    /// Resolve a possibly stale index.
    pub(crate) fn get(&self, k: NodeKey) -> Option<&Node> {
        self.slots.get(k)
    }

    // Internal links always point at live slots; indexing panics on a broken link.
    #[inline]
    pub(crate) fn node(&self, k: NodeKey) -> &Node {
        &self.slots[k]
    }

    #[inline]
    fn node_mut(&mut self, k: NodeKey) -> &mut Node {
        &mut self.slots[k]
    }

    #[inline]
    pub(crate) fn key(&self, k: NodeKey) -> Key {
        self.node(k).key
    }

    #[inline]
    pub(crate) fn parent(&self, k: NodeKey) -> Link {
        self.node(k).parent
    }

    #[inline]
    pub(crate) fn child(&self, k: NodeKey, side: Side) -> Link {
        self.node(k).child(side)
    }

    #[inline]
    pub(crate) fn color(&self, k: NodeKey) -> Color {
        self.node(k).color
    }

    /// Color of a link; the sentinel is black.
    #[inline]
    pub(crate) fn color_of(&self, link: Link) -> Color {
        link.map_or(Color::Black, |k| self.color(k))
    }

    #[inline]
    pub(crate) fn set_color(&mut self, k: NodeKey, color: Color) {
        self.node_mut(k).color = color;
    }

    /// Side of `parent` on which `child` hangs. `child` may be the sentinel
    /// as long as the other slot of `parent` is occupied.
    #[inline]
    pub(crate) fn side_in(&self, parent: NodeKey, child: Link) -> Side {
        if self.child(parent, Side::Left) == child {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// First node whose key equals `key`, following the same descent as insert.
    pub(crate) fn find(&self, key: Key) -> Link {
        let mut cur = self.root;
        while let Some(k) = cur {
            let n = self.node(k);
            if key == n.key {
                return Some(k);
            }
            cur = if key < n.key { n.left } else { n.right };
        }
        None
    }

    pub(crate) fn minimum(&self, mut k: NodeKey) -> NodeKey {
        while let Some(l) = self.child(k, Side::Left) {
            k = l;
        }
        k
    }

    pub(crate) fn maximum(&self, mut k: NodeKey) -> NodeKey {
        while let Some(r) = self.child(k, Side::Right) {
            k = r;
        }
        k
    }

    /// Point `parent`'s link that currently holds `old` at `new`; a missing
    /// parent means `old` was the root.
    fn replace_child(&mut self, parent: Link, old: NodeKey, new: Link) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let side = self.side_in(p, Some(old));
                self.node_mut(p).set_child(side, new);
            }
        }
    }

    /// Put `v` in `u`'s position under `u`'s parent. Only the parent link of
    /// `v` is rewired; `u` keeps its own links.
    pub(crate) fn transplant(&mut self, u: NodeKey, v: Link) {
        let up = self.parent(u);
        self.replace_child(up, u, v);
        if let Some(v) = v {
            self.node_mut(v).parent = up;
        }
    }

    /// Rotate `x` down toward `side`; its child on the opposite side takes
    /// its place. `rotate(x, Side::Left)` is the classic left rotation.
    pub(crate) fn rotate(&mut self, x: NodeKey, side: Side) {
        let y = self
            .child(x, side.opposite())
            .expect("rotation requires a child on the opposite side");

        let inner = self.child(y, side);
        self.node_mut(x).set_child(side.opposite(), inner);
        if let Some(i) = inner {
            self.node_mut(i).parent = Some(x);
        }

        let xp = self.parent(x);
        self.node_mut(y).parent = xp;
        self.replace_child(xp, x, Some(y));

        self.node_mut(y).set_child(side, Some(x));
        self.node_mut(x).parent = Some(y);
    }

    /// Link a new red node by plain BST descent. Equal keys go right.
    /// Returns the new node and whether it became the root.
    pub(crate) fn attach(&mut self, key: Key) -> (NodeKey, bool) {
        let mut parent = None;
        let mut side = Side::Left;
        let mut cur = self.root;
        while let Some(c) = cur {
            parent = Some(c);
            side = if key < self.key(c) {
                Side::Left
            } else {
                Side::Right
            };
            cur = self.child(c, side);
        }

        let k = self.slots.insert(Node::new(key));
        self.node_mut(k).parent = parent;
        match parent {
            None => {
                self.root = Some(k);
                (k, true)
            }
            Some(p) => {
                self.node_mut(p).set_child(side, Some(k));
                (k, false)
            }
        }
    }

    /// Unlink `z` from the tree and free its slot.
    ///
    /// Returns the removed node, the color of the node that actually left
    /// its position (the successor when `z` has two children), and the link
    /// that moved into that position together with its parent. The caller
    /// repairs colors from there when the departed color was black.
    pub(crate) fn detach(&mut self, z: NodeKey) -> (Node, Color, Link, Link) {
        let zl = self.child(z, Side::Left);
        let zr = self.child(z, Side::Right);

        let (departed, x, x_parent) = match (zl, zr) {
            (None, _) => {
                let xp = self.parent(z);
                self.transplant(z, zr);
                (self.color(z), zr, xp)
            }
            (Some(_), None) => {
                let xp = self.parent(z);
                self.transplant(z, zl);
                (self.color(z), zl, xp)
            }
            (Some(l), Some(r)) => {
                let y = self.minimum(r);
                let departed = self.color(y);
                let x = self.child(y, Side::Right);
                let xp = if self.parent(y) == Some(z) {
                    Some(y)
                } else {
                    let xp = self.parent(y);
                    self.transplant(y, x);
                    self.node_mut(y).right = Some(r);
                    self.node_mut(r).parent = Some(y);
                    xp
                };
                self.transplant(z, Some(y));
                self.node_mut(y).left = Some(l);
                self.node_mut(l).parent = Some(y);
                let zc = self.color(z);
                self.set_color(y, zc);
                (departed, x, xp)
            }
        };

        let node = self
            .slots
            .remove(z)
            .expect("detached node must still be in the arena");
        (node, departed, x, x_parent)
    }
}
