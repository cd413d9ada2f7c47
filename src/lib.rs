//! This crate exposes three self-balancing Binary Search Trees (BSTs) behind one ordered
//! container contract.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to insert, find, and
//! delete stored keys. The most important invariant of a BST is that, for every node, all the
//! keys in its left subtree are smaller than its own key and all the keys in its right subtree
//! are larger. Searching therefore takes `O(height)`, and sorted iteration falls out of
//! visiting the left subtree, then the node, then the right subtree.
//!
//! A plain BST can degrade to a linked list (insert keys in ascending order and see). The
//! trees here restructure themselves after every mutation using local rotations so that
//! doesn't happen:
//!
//! - [`avl::Tree`] caches subtree heights and rotates whenever two siblings' heights differ by
//!   more than one. Its height is at most about `1.44 * lg N`.
//! - [`red_black::Tree`] colors nodes and keeps every root-to-leaf path at the same number of
//!   black nodes. Shallower bounds are traded for fewer rotations per update.
//! - [`splay::Tree`] stores nothing extra and instead moves every accessed key to the root,
//!   which is `O(lg N)` per operation amortized over any sequence of operations.
//!
//! [`OrderedTree`] wraps whichever one is picked at construction time.
//!
//! All three are in-memory and single-threaded. Keys only need a total order (`Ord`).

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
mod container;
mod error;
pub mod red_black;
pub mod splay;

pub use container::{OrderedTree, Strategy};
pub use error::InvariantError;
