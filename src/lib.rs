//! memindex - An in-memory ordered index over u64 keys backed by a fixed-fanout B-tree.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          memindex                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │                Index Layer (btree/)                 │    │
//! │  │    BTree: descent → leaf insert → split cascade     │    │
//! │  │          Node arena + Display dump + stats          │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! │                             ↓                               │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │            Shared Primitives (common/)              │    │
//! │  │       NodeId + Error/Result + fan-out config        │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`btree`] - The B-tree engine and its statistics
//!
//! # Quick Start
//! ```
//! use memindex::BTree;
//!
//! let mut tree = BTree::new();
//!
//! // Insert a few keys; re-inserting a present key is a no-op.
//! tree.insert(42).unwrap();
//! tree.insert(7).unwrap();
//! tree.insert(42).unwrap();
//!
//! // Search returns the stored key, or an error on a miss.
//! assert_eq!(tree.search(42), Ok(42));
//! assert!(tree.search(9).is_err());
//! assert_eq!(tree.len(), 2);
//! ```

// Core modules
pub mod btree;
pub mod common;

// Re-export commonly used items at crate root for convenience
pub use common::config::{BRANCH_FACTOR, HALF_FACTOR};
pub use common::{Error, NodeId, Result};

pub use btree::{BTree, TreeStats};
