//! arena-rbtree: a single-threaded red-black tree over integer keys whose
//! nodes live in a generational arena and are named by stable handles.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the pointer-heavy red-black algorithms in safe Rust by
//!   replacing raw parent/child pointers with arena indices.
//! - Layers:
//!   - NodeArena: owns every node in a `SlotMap`; provides BST plumbing
//!     (descent, rotation, transplant, attach/detach) with no notion of
//!     color repair.
//!   - fixup: the insert and delete rebalancing passes, written as small
//!     state machines over named cases (`UncleRed`, `SiblingRed`, ...).
//!   - RbTree: public API; pairs each structural edit with its fixup and
//!     exposes handles, read-only node views and an inorder iterator.
//!
//! Constraints
//! - Single-threaded; callers sharing a tree across threads must wrap it in
//!   one exclusive lock, since rotations rewrite non-local links.
//! - The sentinel is the empty link `None`. It is black, has no storage and
//!   is never written to; the delete fixup carries the parent of an empty
//!   position explicitly instead of parking it on a shared node.
//! - Handles are generational: a handle to a deleted node never resolves,
//!   even after its slot is reused.
//! - Deleting a node with two children relinks its in-order successor into
//!   its place, so handles to all other nodes stay valid.
//!
//! Duplicates
//! - Equal keys descend right on insert and accumulate. `delete` removes the
//!   first match met on the search path, one occurrence per call.
//!
//! Errors and diagnostics
//! - `delete` of a missing key returns `DeleteError::KeyNotFound` and logs
//!   at debug level through the `log` facade; the tree is unchanged.
//! - `validate` walks the whole tree and reports the first
//!   `InvariantViolation`. With the `self_check` feature it runs after
//!   every mutation and panics on failure.

mod arena;
mod fixup;
mod node;
mod rb_tree;
mod rb_tree_proptest;
mod validate;

// Public surface
pub use node::{Color, Key};
pub use rb_tree::{DeleteError, Handle, Iter, NodeRef, RbTree};
pub use validate::InvariantViolation;
