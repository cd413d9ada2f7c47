//! A single ordered-set type over all three balancing strategies. The strategy is fixed when
//! the container is built; every operation is a `match` on it rather than a call through a
//! trait object.
//!
//! # Examples
//!
//! ```
//! use balanced_bst::{OrderedTree, Strategy};
//!
//! for strategy in Strategy::ALL {
//!     let mut tree = OrderedTree::new(strategy);
//!     tree.insert(3);
//!     tree.insert(1);
//!     tree.insert(2);
//!
//!     assert!(tree.contains(&2));
//!     assert_eq!(tree.traverse(), [&1, &2, &3]);
//!     assert!(tree.remove(&2));
//!     assert!(!tree.contains(&2));
//! }
//! ```

use std::fmt;

use crate::{avl, red_black, splay, InvariantError};

/// Which balancing strategy an [`OrderedTree`] uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Height balanced; the shallowest trees and the most rotations.
    Avl,
    /// Color balanced; fewer rotations on update.
    RedBlack,
    /// Self-adjusting; cheap repeated access to recently used keys.
    Splay,
}

impl Strategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Strategy; 3] = [Strategy::Avl, Strategy::RedBlack, Strategy::Splay];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Avl => "avl",
            Self::RedBlack => "red-black",
            Self::Splay => "splay",
        })
    }
}

/// An ordered set backed by one of the balanced trees in this crate.
#[derive(Clone, Debug)]
pub enum OrderedTree<K> {
    /// Backed by an [`avl::Tree`].
    Avl(avl::Tree<K>),
    /// Backed by a [`red_black::Tree`] with unit values.
    RedBlack(red_black::Tree<K, ()>),
    /// Backed by a [`splay::Tree`].
    Splay(splay::Tree<K>),
}

impl<K> OrderedTree<K> {
    /// Generates a new, empty tree using `strategy`.
    pub fn new(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Avl => Self::Avl(avl::Tree::new()),
            Strategy::RedBlack => Self::RedBlack(red_black::Tree::new()),
            Strategy::Splay => Self::Splay(splay::Tree::new()),
        }
    }

    /// The strategy this tree was built with.
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Avl(_) => Strategy::Avl,
            Self::RedBlack(_) => Strategy::RedBlack,
            Self::Splay(_) => Strategy::Splay,
        }
    }

    /// Inserts `key`. Returns `false` and leaves the key set unchanged if it was already
    /// present.
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        match self {
            Self::Avl(t) => t.insert(key),
            Self::RedBlack(t) => t.insert(key, ()).is_none(),
            Self::Splay(t) => t.insert(key),
        }
    }

    /// Removes `key`. Returns `false` if it was not present.
    pub fn remove(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        match self {
            Self::Avl(t) => t.remove(key),
            Self::RedBlack(t) => t.remove(key),
            Self::Splay(t) => t.remove(key),
        }
    }

    /// Returns `true` if `key` is present. Takes `&mut self` because a splay tree reshapes
    /// itself on every lookup.
    pub fn contains(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        match self {
            Self::Avl(t) => t.search(key),
            Self::RedBlack(t) => t.search(key),
            Self::Splay(t) => t.contains(key),
        }
    }

    /// The keys in ascending order.
    pub fn traverse(&self) -> Vec<&K> {
        match self {
            Self::Avl(t) => t.traverse().collect(),
            Self::RedBlack(t) => t.keys().collect(),
            Self::Splay(t) => t.traverse().collect(),
        }
    }

    /// The number of keys.
    pub fn len(&self) -> usize {
        match self {
            Self::Avl(t) => t.len(),
            Self::RedBlack(t) => t.size(),
            Self::Splay(t) => t.len(),
        }
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every key, keeping the strategy.
    pub fn clear(&mut self) {
        match self {
            Self::Avl(t) => t.clear(),
            Self::RedBlack(t) => t.clear(),
            Self::Splay(t) => t.clear(),
        }
    }

    /// Checks the invariants of the underlying tree.
    pub fn validate(&self) -> Result<(), InvariantError>
    where
        K: Ord,
    {
        match self {
            Self::Avl(t) => t.validate(),
            Self::RedBlack(t) => t.validate(),
            Self::Splay(t) => t.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_round_trips() {
        for strategy in Strategy::ALL {
            assert_eq!(OrderedTree::<u8>::new(strategy).strategy(), strategy);
        }
    }

    #[test]
    fn test_duplicates_are_rejected_everywhere() {
        for strategy in Strategy::ALL {
            let mut tree = OrderedTree::new(strategy);
            assert!(tree.insert(7));
            assert!(!tree.insert(7), "{strategy}");
            assert_eq!(tree.len(), 1, "{strategy}");
        }
    }

    #[test]
    fn test_insert_search_remove() {
        for strategy in Strategy::ALL {
            let mut tree = OrderedTree::new(strategy);
            for k in (0..100).rev() {
                tree.insert(k);
            }
            assert_eq!(tree.len(), 100);
            assert!(tree.contains(&50));

            for k in (0..100).step_by(2) {
                assert!(tree.remove(&k), "{strategy}");
            }
            assert!(!tree.contains(&50));
            assert!(tree.contains(&51));
            assert_eq!(
                tree.traverse(),
                (1..100).step_by(2).collect::<Vec<_>>().iter().collect::<Vec<_>>()
            );
            tree.validate().unwrap();

            tree.clear();
            assert!(tree.is_empty());
            assert_eq!(tree.strategy(), strategy);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Strategy::RedBlack.to_string(), "red-black");
    }
}
