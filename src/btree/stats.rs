//! Tree operation statistics.

use std::fmt;

/// Counters for the structural events in a tree's lifetime.
///
/// Every update happens under `&mut BTree`, so plain integers suffice;
/// reading the stats copies them out as a consistent snapshot.
///
/// # Example
/// ```
/// use memindex::BTree;
///
/// let mut tree = BTree::new();
/// for key in 1..=5 {
///     tree.insert(key).unwrap();
/// }
/// let stats = tree.stats();
/// assert_eq!(stats.keys_inserted, 5);
/// assert_eq!(stats.root_splits, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Keys stored by successful insertions.
    pub keys_inserted: u64,

    /// Insert calls that found their key already present.
    pub duplicates_ignored: u64,

    /// Leaf splits below the root.
    pub leaf_splits: u64,

    /// Internal node splits below the root.
    pub branch_splits: u64,

    /// Root splits (leaf or internal); each one grows the tree a level.
    pub root_splits: u64,
}

impl TreeStats {
    /// Create a stats block with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total splits of every kind.
    pub fn splits(&self) -> u64 {
        self.leaf_splits + self.branch_splits + self.root_splits
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ inserted: {}, duplicates: {}, splits: {} (leaf {} / branch {} / root {}) }}",
            self.keys_inserted,
            self.duplicates_ignored,
            self.splits(),
            self.leaf_splits,
            self.branch_splits,
            self.root_splits
        )
    }
}
