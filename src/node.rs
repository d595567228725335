//! Node storage: colors, sides and the arena node record.

use slotmap::new_key_type;

/// Key type stored in the tree.
pub type Key = i64;

new_key_type! {
    /// Generational arena index of a tree node.
    pub(crate) struct NodeKey;
}

/// A child or parent link. `None` is the sentinel: it has no storage and
/// always reads as `Color::Black`.
pub(crate) type Link = Option<NodeKey>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    #[inline]
    pub fn is_red(self) -> bool {
        matches!(self, Color::Red)
    }

    #[inline]
    pub fn is_black(self) -> bool {
        matches!(self, Color::Black)
    }
}

/// Which child slot of a parent a node occupies.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) key: Key,
    pub(crate) color: Color,
    pub(crate) parent: Link,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    /// Fresh, unlinked node. New nodes always start red.
    pub(crate) fn new(key: Key) -> Self {
        Self {
            key,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, link: Link) {
        match side {
            Side::Left => self.left = link,
            Side::Right => self.right = link,
        }
    }
}
