//! RbTree: public API over the node arena.

use crate::arena::NodeArena;
use crate::node::{Color, Key, NodeKey, Side};
use crate::validate::InvariantViolation;
use core::fmt;
use core::iter::FusedIterator;
use core::sync::atomic::{AtomicU64, Ordering};
use log::debug;
use std::io;

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of one `RbTree` instance, stamped into every handle it mints.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct TreeId(u64);

impl TreeId {
    fn next() -> Self {
        TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable name for one node. Stays valid until that node is deleted, even
/// while other nodes are inserted, deleted or rotated around it. A handle
/// only resolves against the tree that minted it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle {
    tree: TreeId,
    node: NodeKey,
}

impl Handle {
    pub fn key(&self, tree: &RbTree) -> Option<Key> {
        tree.resolve(*self).map(|k| tree.arena.key(k))
    }

    pub fn color(&self, tree: &RbTree) -> Option<Color> {
        tree.resolve(*self).map(|k| tree.arena.color(k))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DeleteError {
    KeyNotFound(Key),
}

impl fmt::Display for DeleteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteError::KeyNotFound(key) => write!(f, "key {} not found in the tree", key),
        }
    }
}

impl std::error::Error for DeleteError {}

/// Red-black tree over integer keys.
///
/// Equal keys are kept: a repeated insert adds another node to the right
/// of the existing one, and `delete` removes one occurrence at a time.
#[derive(Debug)]
pub struct RbTree {
    id: TreeId,
    arena: NodeArena,
}

impl RbTree {
    pub fn new() -> Self {
        Self {
            id: TreeId::next(),
            arena: NodeArena::new(),
        }
    }

    fn handle(&self, node: NodeKey) -> Handle {
        Handle {
            tree: self.id,
            node,
        }
    }

    // Foreign and stale handles both resolve to nothing.
    fn resolve(&self, h: Handle) -> Option<NodeKey> {
        if h.tree != self.id {
            return None;
        }
        self.arena.get(h.node).map(|_| h.node)
    }

    fn view(&self, id: NodeKey) -> NodeRef<'_> {
        NodeRef {
            arena: &self.arena,
            tree: self.id,
            id,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    pub fn clear(&mut self) {
        self.arena.clear();
    }

    /// Insert `key` and rebalance. Never fails.
    pub fn insert(&mut self, key: Key) -> Handle {
        let (k, is_root) = self.arena.attach(key);
        if is_root {
            self.arena.set_color(k, Color::Black);
        } else {
            self.arena.fixup_after_insert(k);
        }
        self.self_check();
        self.handle(k)
    }

    /// Remove one node holding `key` and rebalance.
    ///
    /// A missing key is reported as `DeleteError::KeyNotFound` and leaves the
    /// tree untouched.
    pub fn delete(&mut self, key: Key) -> Result<Key, DeleteError> {
        let Some(z) = self.arena.find(key) else {
            debug!("delete({}): key not found", key);
            return Err(DeleteError::KeyNotFound(key));
        };
        let (node, departed, x, x_parent) = self.arena.detach(z);
        if departed.is_black() {
            self.arena.fixup_after_delete(x, x_parent);
        }
        self.self_check();
        Ok(node.key)
    }

    pub fn find(&self, key: Key) -> Option<Handle> {
        self.arena.find(key).map(|k| self.handle(k))
    }

    pub fn contains(&self, key: Key) -> bool {
        self.arena.find(key).is_some()
    }

    pub fn min(&self) -> Option<Key> {
        self.arena.root.map(|r| self.arena.key(self.arena.minimum(r)))
    }

    pub fn max(&self) -> Option<Key> {
        self.arena.root.map(|r| self.arena.key(self.arena.maximum(r)))
    }

    /// Read-only view of the root node; `None` when the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.arena.root.map(|id| self.view(id))
    }

    /// View of the node behind `handle`, if it is still in the tree.
    pub fn node(&self, handle: Handle) -> Option<NodeRef<'_>> {
        self.resolve(handle).map(|id| self.view(id))
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    pub fn height(&self) -> usize {
        fn height_of(arena: &NodeArena, link: Option<NodeKey>) -> usize {
            match link {
                None => 0,
                Some(k) => {
                    let l = height_of(arena, arena.child(k, Side::Left));
                    let r = height_of(arena, arena.child(k, Side::Right));
                    1 + l.max(r)
                }
            }
        }
        height_of(&self.arena, self.arena.root)
    }

    /// Black nodes on any root-to-leaf path, counting the root.
    pub fn black_height(&self) -> usize {
        let mut count = 0;
        let mut cur = self.arena.root;
        while let Some(k) = cur {
            if self.arena.color(k).is_black() {
                count += 1;
            }
            cur = self.arena.child(k, Side::Left);
        }
        count
    }

    /// Walk the whole tree and check every red-black invariant. Returns the
    /// black height on success.
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        self.arena.validate()
    }

    /// Keys in ascending order, computed lazily. Each call starts over.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.arena)
    }

    pub fn inorder(&self) -> Vec<Key> {
        self.iter().collect()
    }

    /// Write the keys in ascending order, separated by single spaces.
    pub fn write_inorder<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "{}", self)
    }

    // Compiled in every build so the feature path cannot rot; only runs
    // with `--features self_check`.
    #[inline]
    fn self_check(&self) {
        if cfg!(feature = "self_check") {
            if let Err(v) = self.arena.validate() {
                panic!("red-black invariant violated: {}", v);
            }
        }
    }
}

impl Default for RbTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RbTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

impl FromIterator<Key> for RbTree {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut tree = RbTree::new();
        tree.extend(iter);
        tree
    }
}

impl Extend<Key> for RbTree {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a> IntoIterator for &'a RbTree {
    type Item = Key;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Read-only observer into one node. The tree keeps ownership; the view
/// borrows it immutably.
#[derive(Copy, Clone)]
pub struct NodeRef<'a> {
    arena: &'a NodeArena,
    tree: TreeId,
    id: NodeKey,
}

impl<'a> NodeRef<'a> {
    pub fn key(&self) -> Key {
        self.arena.key(self.id)
    }

    pub fn color(&self) -> Color {
        self.arena.color(self.id)
    }

    pub fn handle(&self) -> Handle {
        Handle {
            tree: self.tree,
            node: self.id,
        }
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.link(self.arena.child(self.id, Side::Left))
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.link(self.arena.child(self.id, Side::Right))
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.link(self.arena.parent(self.id))
    }

    fn link(&self, link: Option<NodeKey>) -> Option<NodeRef<'a>> {
        link.map(|id| NodeRef {
            arena: self.arena,
            tree: self.tree,
            id,
        })
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.key())
            .field("color", &self.color())
            .finish()
    }
}

/// Inorder iterator over keys, driven by an explicit stack of pending
/// ancestors.
pub struct Iter<'a> {
    arena: &'a NodeArena,
    stack: Vec<NodeKey>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn new(arena: &'a NodeArena) -> Self {
        let mut it = Iter {
            arena,
            stack: Vec::new(),
            remaining: arena.len(),
        };
        it.push_left_spine(arena.root);
        it
    }

    fn push_left_spine(&mut self, mut link: Option<NodeKey>) {
        while let Some(k) = link {
            self.stack.push(k);
            link = self.arena.child(k, Side::Left);
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Key;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.stack.pop()?;
        self.push_left_spine(self.arena.child(k, Side::Right));
        self.remaining -= 1;
        Some(self.arena.key(k))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
