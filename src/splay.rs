//! A splay tree. Nodes carry no balance metadata at all; instead every access rotates the node
//! it touched all the way up to the root. Recently used keys stay near the top and any
//! sequence of operations costs `O(lg N)` amortized per operation, although a single operation
//! may walk a path as long as the tree.
//!
//! Because lookups restructure the tree, [`Tree::contains`] and [`Tree::find`] take `&mut self`.
//! [`Tree::traverse`] only reads and leaves the shape alone.
//!
//! # Examples
//!
//! ```
//! use balanced_bst::splay::Tree;
//!
//! let mut tree: Tree<_> = (1..=5).collect();
//!
//! assert!(tree.contains(&1));
//! assert_eq!(tree.root(), Some(&1));
//!
//! assert!(tree.contains(&5));
//! assert_eq!(tree.root(), Some(&5));
//!
//! // A failed lookup still splays the last node it visited.
//! assert!(!tree.contains(&42));
//! assert_eq!(tree.root(), Some(&5));
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::InvariantError;

/// Index of a node in the arena, or `None` for a missing child.
type Link = Option<usize>;

#[derive(Clone)]
struct Node<K> {
    key: K,
    parent: Link,
    left: Link,
    right: Link,
}

/// An ordered set that moves every accessed key to the root.
#[derive(Clone)]
pub struct Tree<K> {
    nodes: Vec<Node<K>>,
    root: Link,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K> Tree<K> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// The number of keys in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every key.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// The key at the root, which is the most recently accessed key.
    pub fn root(&self) -> Option<&K> {
        self.root.map(|r| &self.nodes[r].key)
    }

    /// The number of nodes on the longest path from the root. Nothing bounds this by
    /// `lg N`; ascending inserts, for example, build a path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((n, depth)) = stack.pop() {
            height = height.max(depth);
            for child in [self.nodes[n].left, self.nodes[n].right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        height
    }

    /// Walks the keys in ascending order without splaying. Each call starts a fresh
    /// traversal.
    pub fn traverse(&self) -> Iter<'_, K> {
        Iter::new(&self.nodes, self.root)
    }

    /// Same as [`Tree::traverse`].
    pub fn iter(&self) -> Iter<'_, K> {
        self.traverse()
    }

    /// Searches for `key` and splays the node the search ended on to the root: the key itself
    /// if present, otherwise the last node visited. Returns the key now at the root, or
    /// `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::splay::Tree;
    ///
    /// let mut tree: Tree<_> = [10, 20, 30].into_iter().collect();
    ///
    /// assert_eq!(tree.find(&20), Some(&20));
    /// // 25 is missing; the search stopped on one of its neighbours.
    /// assert!(matches!(tree.find(&25), Some(&20) | Some(&30)));
    /// ```
    pub fn find(&mut self, key: &K) -> Option<&K>
    where
        K: Ord,
    {
        let root = self.access(key)?;
        Some(&self.nodes[root].key)
    }

    /// Returns `true` if the tree contains `key`. The tree is splayed either way.
    pub fn contains(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        self.access(key)
            .is_some_and(|root| self.nodes[root].key == *key)
    }

    /// Inserts `key` as the new root. The old tree is split around `key` and the two halves
    /// become the new root's children. Returns `false` if `key` was already present, in
    /// which case its existing node has been splayed to the root and nothing else changes.
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        let (left, right) = match self.access(&key) {
            None => (None, None),
            Some(root) => match self.nodes[root].key.cmp(&key) {
                Ordering::Equal => return false,
                Ordering::Less => {
                    let right = self.nodes[root].right.take();
                    self.set_parent(right, None);
                    (Some(root), right)
                }
                Ordering::Greater => {
                    let left = self.nodes[root].left.take();
                    self.set_parent(left, None);
                    (left, Some(root))
                }
            },
        };

        let id = self.nodes.len();
        self.nodes.push(Node {
            key,
            parent: None,
            left,
            right,
        });
        self.set_parent(left, Some(id));
        self.set_parent(right, Some(id));
        self.root = Some(id);
        true
    }

    /// Removes `key`. After splaying, a present key sits at the root; its two subtrees are
    /// detached and merged. Returns `false` (the tree is still splayed) if `key` was absent.
    pub fn remove(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        let Some(root) = self.access(key) else {
            return false;
        };
        if self.nodes[root].key != *key {
            return false;
        }

        let left = self.nodes[root].left.take();
        let right = self.nodes[root].right.take();
        self.set_parent(left, None);
        self.set_parent(right, None);
        self.root = self.merge(left, right);

        self.free(root);
        true
    }

    /// Checks the search-tree ordering, every parent link, and that every node in the arena is
    /// reachable from the root.
    pub fn validate(&self) -> Result<(), InvariantError>
    where
        K: Ord,
    {
        if self.iter().zip(self.iter().skip(1)).any(|(a, b)| a >= b) {
            return Err(InvariantError::Unordered);
        }

        let mut counted = 0;
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            if self.nodes[root].parent.is_some() {
                return Err(InvariantError::BrokenParent);
            }
            stack.push(root);
        }
        while let Some(n) = stack.pop() {
            counted += 1;
            for child in [self.nodes[n].left, self.nodes[n].right].into_iter().flatten() {
                if self.nodes[child].parent != Some(n) {
                    return Err(InvariantError::BrokenParent);
                }
                stack.push(child);
            }
        }

        if counted != self.nodes.len() {
            return Err(InvariantError::Length {
                counted,
                recorded: self.nodes.len(),
            });
        }
        Ok(())
    }

    /// Descends toward `key` and splays the node the search ended on to the root.
    fn access(&mut self, key: &K) -> Link
    where
        K: Ord,
    {
        let mut current = self.root?;
        loop {
            let next = match key.cmp(&self.nodes[current].key) {
                Ordering::Less => self.nodes[current].left,
                Ordering::Equal => None,
                Ordering::Greater => self.nodes[current].right,
            };
            match next {
                Some(n) => current = n,
                None => break,
            }
        }

        self.splay(current);
        self.root = Some(current);
        self.root
    }

    /// Joins two detached trees where every key of `left` is smaller than every key of
    /// `right`. The smallest node of `right` is splayed to the top of `right`, which leaves it
    /// without a left child, and `left` hangs there.
    fn merge(&mut self, left: Link, right: Link) -> Link {
        let (Some(left), Some(right)) = (left, right) else {
            return left.or(right);
        };

        let mut min = right;
        while let Some(l) = self.nodes[min].left {
            min = l;
        }
        self.splay(min);

        self.nodes[min].left = Some(left);
        self.nodes[left].parent = Some(min);
        Some(min)
    }

    /// Rotates `node` up until it has no parent, choosing each step by how `node`, its parent
    /// and its grandparent line up. The caller records the new root.
    fn splay(&mut self, node: usize) {
        while let Some(parent) = self.nodes[node].parent {
            let Some(grandparent) = self.nodes[parent].parent else {
                #[cfg(feature = "tracing")]
                tracing::trace!(node, parent, "splay: zig");

                self.rotate(parent, node);
                break;
            };

            let node_is_left = self.nodes[parent].left == Some(node);
            let parent_is_left = self.nodes[grandparent].left == Some(parent);
            if node_is_left == parent_is_left {
                #[cfg(feature = "tracing")]
                tracing::trace!(node, parent, grandparent, "splay: zig-zig");

                self.rotate(grandparent, parent);
                self.rotate(parent, node);
            } else {
                #[cfg(feature = "tracing")]
                tracing::trace!(node, parent, grandparent, "splay: zig-zag");

                self.rotate(parent, node);
                self.rotate(grandparent, node);
            }
        }
    }

    /// Lifts `child` above `parent`, handing `child`'s inner subtree to `parent`.
    ///
    /// ```text
    ///       parent            child
    ///       /    \            /   \
    ///    child    c  rotate-> a   parent
    ///    /   \                    /    \
    ///   a    inner             inner    c
    /// ```
    ///
    /// (Or the mirror image when `child` is a right child.)
    fn rotate(&mut self, parent: usize, child: usize) {
        let grandparent = self.nodes[parent].parent;
        if let Some(g) = grandparent {
            if self.nodes[g].left == Some(parent) {
                self.nodes[g].left = Some(child);
            } else {
                self.nodes[g].right = Some(child);
            }
        }

        if self.nodes[parent].left == Some(child) {
            let inner = self.nodes[child].right;
            self.nodes[parent].left = inner;
            self.nodes[child].right = Some(parent);
            self.set_parent(inner, Some(parent));
        } else {
            let inner = self.nodes[child].left;
            self.nodes[parent].right = inner;
            self.nodes[child].left = Some(parent);
            self.set_parent(inner, Some(parent));
        }

        self.nodes[parent].parent = Some(child);
        self.nodes[child].parent = grandparent;
    }

    fn set_parent(&mut self, child: Link, parent: Link) {
        if let Some(c) = child {
            self.nodes[c].parent = parent;
        }
    }

    /// Removes an already unlinked node from the arena once the rest of the tree is whole
    /// again. The last node of the arena moves into the freed slot and everything pointing at
    /// it is redirected.
    fn free(&mut self, id: usize) -> Node<K> {
        let node = self.nodes.swap_remove(id);
        let moved = self.nodes.len();
        if id < moved {
            let Node {
                parent, left, right, ..
            } = self.nodes[id];
            match parent {
                None => self.root = Some(id),
                Some(p) if self.nodes[p].left == Some(moved) => self.nodes[p].left = Some(id),
                Some(p) => self.nodes[p].right = Some(id),
            }
            self.set_parent(left, Some(id));
            self.set_parent(right, Some(id));
        }
        node
    }
}

impl<K> FromIterator<K> for Tree<K>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K> Extend<K> for Tree<K>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the keys of a [`Tree`].
pub struct Iter<'a, K> {
    nodes: &'a [Node<K>],
    stack: Vec<usize>,
}

impl<'a, K> Iter<'a, K> {
    fn new(nodes: &'a [Node<K>], root: Link) -> Self {
        let mut iter = Self {
            nodes,
            stack: Vec::new(),
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Link) {
        while let Some(n) = node {
            self.stack.push(n);
            node = self.nodes[n].left;
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.stack.pop()?;
        let nodes = self.nodes;
        self.push_left_spine(nodes[n].right);
        Some(&nodes[n].key)
    }
}


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and a `BTreeSet`, checking that both agree on
    /// every answer, that the links stay consistent, and that found keys end up at the root.
    fn do_ops<K>(ops: &[Op<K, ()>], bst: &mut Tree<K>, set: &mut BTreeSet<K>) -> bool
    where
        K: Clone + Ord,
    {
        for op in ops {
            let agrees = match op {
                Op::Insert(k, ()) => bst.insert(k.clone()) == set.insert(k.clone()),
                Op::Remove(k) => bst.remove(k) == set.remove(k),
                Op::Contains(k) => {
                    let found = bst.contains(k);
                    found == set.contains(k) && (!found || bst.root() == Some(k))
                }
                Op::Iter => bst.iter().eq(set.iter()),
            };
            if !agrees || bst.validate().is_err() {
                return false;
            }
        }
        true
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, ()>>) -> bool {
            let mut tree = Tree::new();
            let mut set = BTreeSet::new();

            do_ops(&ops, &mut tree, &mut set) && tree.len() == set.len()
        }
    }
}
