//! Configuration constants for memindex.

/// Maximum number of keys a node may hold before it must split.
///
/// Inserting into a full node pushes it to `BRANCH_FACTOR + 1` keys; the
/// pending split then partitions it into halves of `HALF_FACTOR` and
/// `BRANCH_FACTOR + 1 - HALF_FACTOR` keys.
///
/// # Fan-out
/// An internal node holding `k` separators brackets `k + 1` children, so
/// the tree fans out by up to `BRANCH_FACTOR + 1` per level and height
/// grows logarithmically in the key count.
pub const BRANCH_FACTOR: usize = 4;

/// Number of keys the left half keeps when a node splits.
///
/// The split rule is positional: the first `HALF_FACTOR` keys (or, for an
/// internal node, the first `HALF_FACTOR + 1` children) stay in the left
/// sibling and the remainder moves right, so both halves land within size
/// bounds regardless of how the key values are distributed.
pub const HALF_FACTOR: usize = BRANCH_FACTOR / 2;
