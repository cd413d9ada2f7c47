//! An AVL tree. Every node caches the height of its subtree and, on the way back up from an
//! insertion or deletion, every visited node recomputes that height and rotates itself back
//! into balance when its children's heights differ by more than one.
//!
//! Rotations take ownership of the subtree they restructure and hand back the new subtree
//! root, so there is never a moment where a node is reachable from two places.
//!
//! # Examples
//!
//! ```
//! use balanced_bst::avl::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.search(&1));
//!
//! tree.insert(10);
//! tree.insert(20);
//! tree.insert(30);
//!
//! // The third insert rotated the tree to keep it balanced.
//! assert_eq!(tree.root(), Some(&20));
//! assert!(tree.search(&30));
//!
//! // Inserting an existing key is a no-op.
//! assert!(!tree.insert(20));
//! assert_eq!(tree.traverse().collect::<Vec<_>>(), [&10, &20, &30]);
//!
//! tree.remove(&20);
//! assert!(!tree.search(&20));
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::InvariantError;

type Link<K> = Option<Box<Node<K>>>;

/// An ordered set of keys kept balanced by the AVL height invariant.
#[derive(Clone)]
pub struct Tree<K> {
    root: Link<K>,
    len: usize,
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
        Self { root: None, len: 0 }
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Gets the height of this tree. An empty tree has height 0 and a single node has
    /// height 1.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// The key currently stored at the root, if any.
    pub fn root(&self) -> Option<&K> {
        self.root.as_deref().map(|n| &n.key)
    }

    /// The smallest key in the tree.
    pub fn min(&self) -> Option<&K> {
        self.iter().next()
    }

    /// The largest key in the tree.
    pub fn max(&self) -> Option<&K> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.key)
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Walks the keys in ascending order. Each call starts a fresh traversal.
    pub fn traverse(&self) -> Iter<'_, K> {
        Iter::new(self.root.as_deref())
    }

    /// Same as [`Tree::traverse`].
    pub fn iter(&self) -> Iter<'_, K> {
        self.traverse()
    }

    /// Returns `true` if the tree contains `key`. A missing key is not an error, merely a
    /// negative result.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::avl::Tree;
    ///
    /// let tree: Tree<_> = [3, 1, 2].into_iter().collect();
    ///
    /// assert!(tree.search(&2));
    /// assert!(!tree.search(&42));
    /// ```
    pub fn search(&self, key: &K) -> bool
    where
        K: Ord,
    {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            node = match key.cmp(&n.key) {
                Ordering::Less => n.left.as_deref(),
                Ordering::Equal => return true,
                Ordering::Greater => n.right.as_deref(),
            };
        }
        false
    }

    /// Same as [`Tree::search`].
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.search(key)
    }

    /// Inserts `key` and rebalances every ancestor of the new node. Returns `false` (and
    /// leaves the tree untouched) if the key was already present.
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        let (root, inserted) = match self.root.take() {
            Some(root) => root.insert(key),
            None => (Node::new_boxed(key), true),
        };
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes `key` from the tree, rebalancing every ancestor of the removed node. Returns
    /// `false` (and leaves the tree untouched) if the key was not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::avl::Tree;
    ///
    /// let mut tree: Tree<_> = [10, 5].into_iter().collect();
    ///
    /// assert!(tree.remove(&10));
    /// assert!(!tree.remove(&10));
    /// assert_eq!(tree.root(), Some(&5));
    /// assert_eq!(tree.height(), 1);
    /// ```
    pub fn remove(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        let Some(root) = self.root.take() else {
            return false;
        };
        let (root, removed) = root.remove(key);
        self.root = root;
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Checks the search-tree ordering, every cached height and every balance factor.
    pub fn validate(&self) -> Result<(), InvariantError>
    where
        K: Ord,
    {
        if self.iter().zip(self.iter().skip(1)).any(|(a, b)| a >= b) {
            return Err(InvariantError::Unordered);
        }
        if let Some(root) = self.root.as_deref() {
            root.validate()?;
        }
        let counted = self.iter().count();
        if counted != self.len {
            return Err(InvariantError::Length {
                counted,
                recorded: self.len,
            });
        }
        Ok(())
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
    stack: Vec<&'a Node<K>>,
}

impl<'a, K> Iter<'a, K> {
    fn new(root: Option<&'a Node<K>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.key)
    }
}

/// Gets the height of a possibly-empty subtree.
fn height<K>(link: &Link<K>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

/// A `Node` owns its key and both of its children.
#[derive(Clone)]
struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    height: usize,
}

impl<K> Node<K> {
    fn new_boxed(key: K) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// Adjusts the height of `self` to be the max of its children's heights + 1.
    fn fix_height(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
    }

    /// The height of the left subtree minus the height of the right subtree.
    fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    /// Rotates the right child up to become the root of this subtree. It must only be called
    /// when there _is_ a right child.
    ///
    /// ```text
    ///   old_root                 new_root
    ///    /    \                   /     \
    ///   x   new_root   rotate -> old_root  z
    ///        /   \               /   \
    ///       y     z             x     y
    /// ```
    fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let mut new_root = self
            .right
            .take()
            .expect("`balance` saw right child taller than left child.");

        #[cfg(feature = "tracing")]
        tracing::trace!(height = self.height, "avl: rotate left");

        self.right = new_root.left.take();
        self.fix_height();
        new_root.left = Some(self);
        new_root.fix_height();
        new_root
    }

    /// Rotates the left child up to become the root of this subtree. The mirror image of
    /// [`Node::rotate_left`].
    fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let mut new_root = self
            .left
            .take()
            .expect("`balance` saw left child taller than right child.");

        #[cfg(feature = "tracing")]
        tracing::trace!(height = self.height, "avl: rotate right");

        self.left = new_root.right.take();
        self.fix_height();
        new_root.right = Some(self);
        new_root.fix_height();
        new_root
    }

    /// Recomputes the height of this node and, if its children's heights differ by more than
    /// one, restores the AVL invariant with a single or double rotation.
    ///
    /// See <https://en.wikipedia.org/wiki/AVL_tree#Rebalancing> for terminology.
    fn balance(mut self: Box<Self>) -> Box<Self> {
        self.fix_height();
        let balance = self.balance_factor();

        let node = if balance > 1 {
            // Left-right: the left child leans right, straighten it out first.
            if self.left.as_ref().map_or(0, |n| n.balance_factor()) < 0 {
                self.left = self.left.take().map(Self::rotate_left);
            }
            self.rotate_right()
        } else if balance < -1 {
            if self.right.as_ref().map_or(0, |n| n.balance_factor()) > 0 {
                self.right = self.right.take().map(Self::rotate_right);
            }
            self.rotate_left()
        } else {
            self
        };

        debug_assert!(node.balance_factor().abs() <= 1);
        node
    }

    fn insert(mut self: Box<Self>, key: K) -> (Box<Self>, bool)
    where
        K: Ord,
    {
        let inserted = match key.cmp(&self.key) {
            Ordering::Less => {
                let (left, inserted) = Self::insert_into(self.left.take(), key);
                self.left = Some(left);
                inserted
            }
            Ordering::Equal => return (self, false),
            Ordering::Greater => {
                let (right, inserted) = Self::insert_into(self.right.take(), key);
                self.right = Some(right);
                inserted
            }
        };

        (self.balance(), inserted)
    }

    fn insert_into(link: Link<K>, key: K) -> (Box<Self>, bool)
    where
        K: Ord,
    {
        match link {
            Some(node) => node.insert(key),
            None => (Self::new_boxed(key), true),
        }
    }

    /// Removes `key` from the subtree rooted at `self`, returning the new (possibly empty)
    /// subtree and whether anything was removed.
    fn remove(mut self: Box<Self>, key: &K) -> (Link<K>, bool)
    where
        K: Ord,
    {
        match key.cmp(&self.key) {
            Ordering::Less => {
                let Some(left) = self.left.take() else {
                    return (Some(self), false);
                };
                let (left, removed) = left.remove(key);
                self.left = left;
                (Some(self.balance()), removed)
            }
            Ordering::Greater => {
                let Some(right) = self.right.take() else {
                    return (Some(self), false);
                };
                let (right, removed) = right.remove(key);
                self.right = right;
                (Some(self.balance()), removed)
            }
            Ordering::Equal => match (self.left.take(), self.right.take()) {
                (None, right) => (right, true),
                (left, None) => (left, true),

                // With two children the in-order successor (the smallest key of the right
                // subtree) moves into this node and its old node is unlinked instead.
                (Some(left), Some(right)) => {
                    let (successor, right) = right.remove_min();
                    self.key = successor;
                    self.left = Some(left);
                    self.right = right;
                    (Some(self.balance()), true)
                }
            },
        }
    }

    /// Returns the smallest key of this subtree and the subtree without it.
    fn remove_min(mut self: Box<Self>) -> (K, Link<K>) {
        match self.left.take() {
            None => {
                let Node { key, right, .. } = *self;
                (key, right)
            }
            Some(left) => {
                let (min, left) = left.remove_min();
                self.left = left;
                (min, Some(self.balance()))
            }
        }
    }

    fn validate(&self) -> Result<usize, InvariantError> {
        let left = self.left.as_deref().map_or(Ok(0), Self::validate)?;
        let right = self.right.as_deref().map_or(Ok(0), Self::validate)?;
        let actual = left.max(right) + 1;
        if self.height != actual {
            return Err(InvariantError::StaleHeight {
                cached: self.height,
                actual,
            });
        }
        let balance = left as isize - right as isize;
        if balance.abs() > 1 {
            return Err(InvariantError::Unbalanced(balance));
        }
        Ok(actual)
    }
}
