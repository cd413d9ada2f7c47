//! A red-black tree map. Every node is colored red or black and the tree keeps three
//! invariants between operations:
//!
//! 1. The root is black.
//! 2. A red node never has a red child.
//! 3. Every path from a node down to a missing child passes through the same number of
//!    black nodes.
//!
//! Together these bound the height by `2 * lg(N + 1)`.
//!
//! Nodes live in a `Vec` and refer to each other by index. A node's `parent` is only ever used
//! to walk upward during fix-ups; ownership is the arena's alone. When a node is freed the last
//! node of the arena is moved into its slot and its neighbours are relinked, so the arena
//! never holds holes.
//!
//! # Examples
//!
//! ```
//! use balanced_bst::red_black::Tree;
//!
//! let mut tree = Tree::new();
//!
//! tree.insert(1, "one");
//! tree.insert(2, "two");
//! assert_eq!(tree.get(&1), Some(&"one"));
//! assert_eq!(tree.size(), 2);
//!
//! // Inserting an existing key overwrites its value.
//! assert_eq!(tree.insert(1, "uno"), Some("one"));
//! assert_eq!(tree.size(), 2);
//!
//! assert!(tree.remove(&1));
//! assert!(!tree.remove(&1));
//! assert!(!tree.search(&1));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::InvariantError;

/// Index of a node in the arena, or `None` for a missing child.
type Link = Option<usize>;

/// The color of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    /// A red node. Never the root and never the parent of another red node.
    Red,
    /// A black node. Missing children count as black.
    Black,
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    parent: Link,
    left: Link,
    right: Link,
}

/// An ordered map kept balanced by the red-black coloring invariants.
#[derive(Clone)]
pub struct Tree<K, V> {
    nodes: Vec<Node<K, V>>,
    root: Link,
    size: usize,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Tree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Tree<K, V> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            size: 0,
        }
    }

    /// The number of entries in the tree.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Same as [`Tree::size`].
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.size = 0;
    }

    /// The key stored at the root, if any.
    pub fn root(&self) -> Option<&K> {
        self.root.map(|r| &self.nodes[r].key)
    }

    /// The color of the root, if any.
    pub fn root_color(&self) -> Option<Color> {
        self.root.map(|r| self.nodes[r].color)
    }

    /// The number of black nodes on any path from the root to a missing child.
    pub fn black_height(&self) -> usize {
        let mut height = 0;
        let mut node = self.root;
        while let Some(n) = node {
            if self.nodes[n].color == Color::Black {
                height += 1;
            }
            node = self.nodes[n].left;
        }
        height
    }

    /// Walks the entries in ascending key order. Each call starts a fresh traversal.
    pub fn traverse(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.root)
    }

    /// Same as [`Tree::traverse`].
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.traverse()
    }

    /// The keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Returns `true` if the tree holds an entry for `key`.
    pub fn search(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.find(key).is_some()
    }

    /// Returns a reference to the value stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V>
    where
        K: Ord,
    {
        self.find(key).map(|n| &self.nodes[n].value)
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V>
    where
        K: Ord,
    {
        let n = self.find(key)?;
        Some(&mut self.nodes[n].value)
    }

    /// Inserts `value` under `key`. A new key is placed as a red leaf and the tree is then
    /// repaired bottom-up. An existing key keeps its node and color; only its value is
    /// replaced and the old value is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        let mut parent = None;
        let mut current = self.root;
        let mut went_left = false;
        while let Some(n) = current {
            parent = current;
            match key.cmp(&self.nodes[n].key) {
                Ordering::Less => {
                    went_left = true;
                    current = self.nodes[n].left;
                }
                Ordering::Equal => return Some(mem::replace(&mut self.nodes[n].value, value)),
                Ordering::Greater => {
                    went_left = false;
                    current = self.nodes[n].right;
                }
            }
        }

        let id = self.nodes.len();
        self.nodes.push(Node {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        });
        match parent {
            None => self.root = Some(id),
            Some(p) if went_left => self.nodes[p].left = Some(id),
            Some(p) => self.nodes[p].right = Some(id),
        }
        self.size += 1;

        self.insert_fixup(id);
        None
    }

    /// Removes the entry for `key`. Returns `false` (and leaves the tree untouched) if there
    /// is no such entry.
    pub fn remove(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        let Some(mut node) = self.find(key) else {
            return false;
        };

        // With two children, the in-order successor's entry moves into this node and the
        // successor (which has no left child) is spliced out instead.
        if let (Some(_), Some(right)) = (self.nodes[node].left, self.nodes[node].right) {
            let successor = self.minimum(right);
            self.swap_entries(node, successor);
            node = successor;
        }

        let child = self.nodes[node].left.or(self.nodes[node].right);
        let parent = self.nodes[node].parent;
        if let Some(c) = child {
            self.nodes[c].parent = parent;
        }
        self.replace_child(parent, node, child);

        if self.nodes[node].color == Color::Black {
            self.remove_fixup(child, parent);
        }

        self.free(node);
        self.size -= 1;
        true
    }

    /// Checks the search-tree ordering, the three coloring invariants, every parent link, and
    /// the recorded size.
    pub fn validate(&self) -> Result<(), InvariantError>
    where
        K: Ord,
    {
        if self.keys().zip(self.keys().skip(1)).any(|(a, b)| a >= b) {
            return Err(InvariantError::Unordered);
        }
        if let Some(root) = self.root {
            if self.nodes[root].parent.is_some() {
                return Err(InvariantError::BrokenParent);
            }
            if self.nodes[root].color == Color::Red {
                return Err(InvariantError::RedRoot);
            }
            self.validate_node(root)?;
        }
        let counted = self.iter().count();
        if counted != self.size || self.nodes.len() != self.size {
            return Err(InvariantError::Length {
                counted,
                recorded: self.size,
            });
        }
        Ok(())
    }

    fn validate_node(&self, node: usize) -> Result<usize, InvariantError> {
        let n = &self.nodes[node];
        let mut heights = [0; 2];
        for (height, child) in heights.iter_mut().zip([n.left, n.right]) {
            let Some(c) = child else {
                continue;
            };
            if self.nodes[c].parent != Some(node) {
                return Err(InvariantError::BrokenParent);
            }
            if n.color == Color::Red && self.nodes[c].color == Color::Red {
                return Err(InvariantError::RedRed);
            }
            *height = self.validate_node(c)?;
        }

        let [left, right] = heights;
        if left != right {
            return Err(InvariantError::BlackHeight { left, right });
        }
        Ok(left + usize::from(n.color == Color::Black))
    }

    fn find(&self, key: &K) -> Link
    where
        K: Ord,
    {
        let mut current = self.root;
        while let Some(n) = current {
            current = match key.cmp(&self.nodes[n].key) {
                Ordering::Less => self.nodes[n].left,
                Ordering::Equal => return current,
                Ordering::Greater => self.nodes[n].right,
            };
        }
        None
    }

    fn minimum(&self, mut node: usize) -> usize {
        while let Some(left) = self.nodes[node].left {
            node = left;
        }
        node
    }

    /// Missing children are black.
    fn color(&self, link: Link) -> Color {
        link.map_or(Color::Black, |n| self.nodes[n].color)
    }

    fn is_red(&self, link: Link) -> bool {
        self.color(link) == Color::Red
    }

    fn set_color(&mut self, link: Link, color: Color) {
        if let Some(n) = link {
            self.nodes[n].color = color;
        }
    }

    /// Points whatever referred to `old` (its parent, or the root) at `new` instead.
    fn replace_child(&mut self, parent: Link, old: usize, new: Link) {
        match parent {
            None => self.root = new,
            Some(p) if self.nodes[p].left == Some(old) => self.nodes[p].left = new,
            Some(p) => self.nodes[p].right = new,
        }
    }

    /// Swaps the keys and values (but not the links or colors) of two distinct nodes.
    fn swap_entries(&mut self, a: usize, b: usize) {
        let (low, high) = (a.min(b), a.max(b));
        let (head, tail) = self.nodes.split_at_mut(high);
        let (x, y) = (&mut head[low], &mut tail[0]);
        mem::swap(&mut x.key, &mut y.key);
        mem::swap(&mut x.value, &mut y.value);
    }

    /// Rotates the right child of `node` up into its place. It must only be called when there
    /// _is_ a right child.
    ///
    /// ```text
    ///     node                  pivot
    ///    /    \                /     \
    ///   a    pivot   rotate ->  node    c
    ///        /   \            /   \
    ///       b     c          a     b
    /// ```
    fn rotate_left(&mut self, node: usize) {
        let pivot = self.nodes[node]
            .right
            .expect("Rotate left => right child");

        #[cfg(feature = "tracing")]
        tracing::trace!(node, pivot, "red-black: rotate left");

        let inner = self.nodes[pivot].left;
        self.nodes[node].right = inner;
        if let Some(b) = inner {
            self.nodes[b].parent = Some(node);
        }

        let parent = self.nodes[node].parent;
        self.nodes[pivot].parent = parent;
        self.replace_child(parent, node, Some(pivot));

        self.nodes[pivot].left = Some(node);
        self.nodes[node].parent = Some(pivot);
    }

    /// The mirror image of [`Tree::rotate_left`].
    fn rotate_right(&mut self, node: usize) {
        let pivot = self.nodes[node].left.expect("Rotate right => left child");

        #[cfg(feature = "tracing")]
        tracing::trace!(node, pivot, "red-black: rotate right");

        let inner = self.nodes[pivot].right;
        self.nodes[node].left = inner;
        if let Some(b) = inner {
            self.nodes[b].parent = Some(node);
        }

        let parent = self.nodes[node].parent;
        self.nodes[pivot].parent = parent;
        self.replace_child(parent, node, Some(pivot));

        self.nodes[pivot].right = Some(node);
        self.nodes[node].parent = Some(pivot);
    }

    /// Restores the coloring invariants after `node` was added as a red leaf.
    fn insert_fixup(&mut self, mut node: usize) {
        while let Some(parent) = self.nodes[node].parent.filter(|&p| self.is_red(Some(p))) {
            // A red parent is never the root so the grandparent exists.
            let grandparent = self.nodes[parent]
                .parent
                .expect("Red node => not the root");

            if self.nodes[grandparent].left == Some(parent) {
                let uncle = self.nodes[grandparent].right;
                if self.is_red(uncle) {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(node, "red-black insert: red uncle, recolor");

                    self.set_color(Some(parent), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    node = grandparent;
                    continue;
                }

                // Zig-zag: rotate the inner grandchild outward first.
                if self.nodes[parent].right == Some(node) {
                    node = parent;
                    self.rotate_left(node);
                }
                let parent = self.nodes[node].parent.expect("Rotated => parent");
                let grandparent = self.nodes[parent].parent.expect("Red node => not the root");
                self.set_color(Some(parent), Color::Black);
                self.set_color(Some(grandparent), Color::Red);
                self.rotate_right(grandparent);
            } else {
                let uncle = self.nodes[grandparent].left;
                if self.is_red(uncle) {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(node, "red-black insert: red uncle, recolor");

                    self.set_color(Some(parent), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(grandparent), Color::Red);
                    node = grandparent;
                    continue;
                }

                if self.nodes[parent].left == Some(node) {
                    node = parent;
                    self.rotate_right(node);
                }
                let parent = self.nodes[node].parent.expect("Rotated => parent");
                let grandparent = self.nodes[parent].parent.expect("Red node => not the root");
                self.set_color(Some(parent), Color::Black);
                self.set_color(Some(grandparent), Color::Red);
                self.rotate_left(grandparent);
            }
        }

        self.set_color(self.root, Color::Black);
    }

    /// Restores the black height after a black node was spliced out. `node` took the removed
    /// node's place (it may be missing, hence the explicit `parent`) and carries an "extra
    /// black" that is pushed up the tree until it can be absorbed.
    fn remove_fixup(&mut self, mut node: Link, mut parent: Link) {
        while node != self.root && !self.is_red(node) {
            let Some(p) = parent else {
                break;
            };

            if self.nodes[p].left == node {
                // The removed side was black-heavy by one, so the sibling subtree has a black
                // height of at least one and the sibling exists.
                let mut sibling = self.nodes[p].right.expect("Black height => sibling");
                if self.is_red(Some(sibling)) {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(parent = p, "red-black remove: red sibling");

                    self.set_color(Some(sibling), Color::Black);
                    self.set_color(Some(p), Color::Red);
                    self.rotate_left(p);
                    sibling = self.nodes[p].right.expect("Black height => sibling");
                }

                if !self.is_red(self.nodes[sibling].left) && !self.is_red(self.nodes[sibling].right)
                {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(parent = p, "red-black remove: black nephews, recolor");

                    self.set_color(Some(sibling), Color::Red);
                    node = Some(p);
                    parent = self.nodes[p].parent;
                    continue;
                }

                if !self.is_red(self.nodes[sibling].right) {
                    self.set_color(self.nodes[sibling].left, Color::Black);
                    self.set_color(Some(sibling), Color::Red);
                    self.rotate_right(sibling);
                    sibling = self.nodes[p].right.expect("Black height => sibling");
                }

                #[cfg(feature = "tracing")]
                tracing::trace!(parent = p, "red-black remove: red far nephew");

                self.set_color(Some(sibling), self.nodes[p].color);
                self.set_color(Some(p), Color::Black);
                self.set_color(self.nodes[sibling].right, Color::Black);
                self.rotate_left(p);
            } else {
                let mut sibling = self.nodes[p].left.expect("Black height => sibling");
                if self.is_red(Some(sibling)) {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(parent = p, "red-black remove: red sibling");

                    self.set_color(Some(sibling), Color::Black);
                    self.set_color(Some(p), Color::Red);
                    self.rotate_right(p);
                    sibling = self.nodes[p].left.expect("Black height => sibling");
                }

                if !self.is_red(self.nodes[sibling].left) && !self.is_red(self.nodes[sibling].right)
                {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(parent = p, "red-black remove: black nephews, recolor");

                    self.set_color(Some(sibling), Color::Red);
                    node = Some(p);
                    parent = self.nodes[p].parent;
                    continue;
                }

                if !self.is_red(self.nodes[sibling].left) {
                    self.set_color(self.nodes[sibling].right, Color::Black);
                    self.set_color(Some(sibling), Color::Red);
                    self.rotate_left(sibling);
                    sibling = self.nodes[p].left.expect("Black height => sibling");
                }

                #[cfg(feature = "tracing")]
                tracing::trace!(parent = p, "red-black remove: red far nephew");

                self.set_color(Some(sibling), self.nodes[p].color);
                self.set_color(Some(p), Color::Black);
                self.set_color(self.nodes[sibling].left, Color::Black);
                self.rotate_right(p);
            }

            // The extra black was absorbed by the rotation.
            node = self.root;
            parent = None;
        }

        self.set_color(node, Color::Black);
    }

    /// Removes an already unlinked node from the arena. The last node of the arena moves into
    /// the freed slot and everything pointing at it is redirected.
    fn free(&mut self, id: usize) -> Node<K, V> {
        let node = self.nodes.swap_remove(id);
        let moved = self.nodes.len();
        if id < moved {
            let (parent, left, right) = {
                let n = &self.nodes[id];
                (n.parent, n.left, n.right)
            };
            self.replace_child(parent, moved, Some(id));
            for child in [left, right].into_iter().flatten() {
                self.nodes[child].parent = Some(id);
            }
        }
        node
    }
}

impl<K, V> FromIterator<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K, V> Extend<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the entries of a [`Tree`].
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    stack: Vec<usize>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(nodes: &'a [Node<K, V>], root: Link) -> Self {
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

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.stack.pop()?;
        let nodes = self.nodes;
        self.push_left_spine(nodes[n].right);
        Some((&nodes[n].key, &nodes[n].value))
    }
}
