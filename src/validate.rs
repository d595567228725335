//! Exhaustive structural check of the red-black invariants.

use crate::arena::NodeArena;
use crate::node::{Color, Key, Link, NodeKey, Side};
use core::fmt;

/// The first broken invariant found by [`crate::RbTree::validate`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InvariantViolation {
    /// The root is red.
    RedRoot { key: Key },
    /// The root has a parent link.
    RootHasParent { key: Key },
    /// A red node has a red child.
    RedRedEdge { parent: Key, child: Key },
    /// The two subtrees of a node disagree on black height.
    BlackHeightMismatch { key: Key, left: usize, right: usize },
    /// A child's parent link does not point back at its parent.
    BrokenParentLink { key: Key },
    /// A key lies outside the range allowed by its ancestors.
    OrderViolation { key: Key },
    /// The arena holds nodes that are not reachable from the root.
    LenMismatch { reachable: usize, stored: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::RedRoot { key } => write!(f, "root {} is red", key),
            InvariantViolation::RootHasParent { key } => {
                write!(f, "root {} has a parent link", key)
            }
            InvariantViolation::RedRedEdge { parent, child } => {
                write!(f, "red node {} has red child {}", parent, child)
            }
            InvariantViolation::BlackHeightMismatch { key, left, right } => write!(
                f,
                "node {} has black height {} on the left and {} on the right",
                key, left, right
            ),
            InvariantViolation::BrokenParentLink { key } => {
                write!(f, "node {} does not link back to its parent", key)
            }
            InvariantViolation::OrderViolation { key } => {
                write!(f, "node {} is out of order", key)
            }
            InvariantViolation::LenMismatch { reachable, stored } => write!(
                f,
                "{} nodes reachable from the root but {} stored",
                reachable, stored
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

impl NodeArena {
    /// Check every invariant; on success return the number of black nodes
    /// on each root-to-sentinel path (root included, sentinel excluded).
    pub(crate) fn validate(&self) -> Result<usize, InvariantViolation> {
        if let Some(r) = self.root {
            let n = self.node(r);
            if n.color.is_red() {
                return Err(InvariantViolation::RedRoot { key: n.key });
            }
            if n.parent.is_some() {
                return Err(InvariantViolation::RootHasParent { key: n.key });
            }
        }

        let mut reachable = 0;
        let bh = self.check_subtree(self.root, None, None, &mut reachable)?;
        if reachable != self.len() {
            return Err(InvariantViolation::LenMismatch {
                reachable,
                stored: self.len(),
            });
        }
        Ok(bh)
    }

    // Keys may repeat, so both bounds are inclusive.
    fn check_subtree(
        &self,
        link: Link,
        lo: Option<Key>,
        hi: Option<Key>,
        reachable: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        let Some(k) = link else { return Ok(0) };
        *reachable += 1;
        let n = self.node(k);

        if lo.is_some_and(|lo| n.key < lo) || hi.is_some_and(|hi| n.key > hi) {
            return Err(InvariantViolation::OrderViolation { key: n.key });
        }

        for side in [Side::Left, Side::Right] {
            if let Some(c) = n.child(side) {
                self.check_edge(k, c)?;
            }
        }

        let left = self.check_subtree(n.left, lo, Some(n.key), reachable)?;
        let right = self.check_subtree(n.right, Some(n.key), hi, reachable)?;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch {
                key: n.key,
                left,
                right,
            });
        }
        Ok(left + usize::from(n.color == Color::Black))
    }

    fn check_edge(&self, parent: NodeKey, child: NodeKey) -> Result<(), InvariantViolation> {
        let p = self.node(parent);
        let c = self.node(child);
        if c.parent != Some(parent) {
            return Err(InvariantViolation::BrokenParentLink { key: c.key });
        }
        if p.color.is_red() && c.color.is_red() {
            return Err(InvariantViolation::RedRedEdge {
                parent: p.key,
                child: c.key,
            });
        }
        Ok(())
    }
}
