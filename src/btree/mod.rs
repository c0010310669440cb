//! B-tree index.
//!
//! An in-memory B-tree over unique `u64` keys with a fixed fan-out of
//! [`BRANCH_FACTOR`](crate::common::config::BRANCH_FACTOR). Lookups and
//! inserts descend by separator keys; an insert that overfills a leaf
//! splits it and threads the new sibling into the parent, cascading
//! upward until a node absorbs the split or the root divides and the
//! tree grows a level.
//!
//! # Components
//! - [`BTree`] - The tree engine: arena, descent, and the split logic
//! - [`TreeStats`] - Counters for inserts, duplicates, and splits
//! - `node` - The node representation shared by leaves and branches

mod node;
mod stats;
mod tree;

pub use stats::TreeStats;
pub use tree::BTree;
