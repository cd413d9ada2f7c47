//! The error produced when a tree's structural invariants do not hold.

/// A broken invariant found by one of the `validate` methods.
///
/// None of the trees ever return this from a mutating operation. It exists so tests and
/// callers poking at the trees can ask "is this still a valid tree?" and get a precise
/// answer instead of a bare `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    /// An in-order walk produced two keys that were not strictly increasing.
    #[error("in-order traversal is not strictly increasing")]
    Unordered,
    /// An AVL node caches a height that does not match its children.
    #[error("cached height {cached} does not match computed height {actual}")]
    StaleHeight {
        /// The height stored in the node.
        cached: usize,
        /// `1 + max(left, right)`.
        actual: usize,
    },
    /// An AVL node whose subtrees differ in height by more than one.
    #[error("balance factor {0} is outside of [-1, 1]")]
    Unbalanced(isize),
    /// A red-black tree whose root is red.
    #[error("root is red")]
    RedRoot,
    /// A red node with a red child.
    #[error("red node has a red child")]
    RedRed,
    /// Two paths from the same node reach a leaf through different numbers of black nodes.
    #[error("black height differs between subtrees ({left} on the left, {right} on the right)")]
    BlackHeight {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// A node's parent link does not point at the node that owns it (or the root has a parent).
    #[error("parent link does not match the owning node")]
    BrokenParent,
    /// The number of reachable nodes differs from the recorded length.
    #[error("tree holds {counted} nodes but records a length of {recorded}")]
    Length {
        /// Nodes reachable from the root.
        counted: usize,
        /// The length the tree believes it has.
        recorded: usize,
    },
}
