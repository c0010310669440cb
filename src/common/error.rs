//! Error types for memindex.

use thiserror::Error;

use crate::common::config::{BRANCH_FACTOR, HALF_FACTOR};
use crate::common::NodeId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write
/// `Result<T>`. This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in memindex.
///
/// Two classes share this enum. [`Error::KeyNotFound`] is the expected
/// miss a lookup reports; it is part of normal control flow. Every other
/// variant describes a structural invariant violation, which indicates a
/// bug rather than bad input: mutating operations return one instead of
/// continuing on a corrupt tree, and [`check`](crate::BTree::check)
/// returns one for whichever invariant its walk finds broken first.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The searched key is not present in the tree.
    #[error("key {0} not found")]
    KeyNotFound(u64),

    /// A parent rewrite could not locate the child slot it expected to
    /// replace.
    #[error("{parent} has no child slot referencing {child}")]
    ChildNotFound { parent: NodeId, child: NodeId },

    /// A separator key disagrees with the minimum of the subtree it
    /// covers.
    #[error("separator in {node} reads {found}, subtree minimum is {expected}")]
    SeparatorMismatch {
        node: NodeId,
        expected: u64,
        found: u64,
    },

    /// An internal node's key and child counts are inconsistent.
    #[error("{node} holds {keys} keys but {children} children")]
    ArityMismatch {
        node: NodeId,
        keys: usize,
        children: usize,
    },

    /// A non-root node's key count is outside the allowed size bounds.
    #[error(
        "{node} holds {count} keys, outside [{min}, {max}]",
        min = HALF_FACTOR,
        max = BRANCH_FACTOR
    )]
    KeyCountOutOfRange { node: NodeId, count: usize },

    /// A leaf sits at a different depth than the leftmost leaf.
    #[error("leaf {node} at depth {depth}, expected {expected}")]
    DepthMismatch {
        node: NodeId,
        depth: usize,
        expected: usize,
    },

    /// A node's parent reference disagrees with the node that owns it.
    #[error("parent link of {node} is broken")]
    ParentLinkBroken { node: NodeId },

    /// A key breaks the globally ascending key order.
    #[error("key {key} in {node} breaks ascending key order")]
    KeyOrderViolation { node: NodeId, key: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::KeyNotFound(42);
        assert_eq!(format!("{}", err), "key 42 not found");

        let err = Error::ChildNotFound {
            parent: NodeId::new(3),
            child: NodeId::new(7),
        };
        assert_eq!(
            format!("{}", err),
            "Node(3) has no child slot referencing Node(7)"
        );

        let err = Error::SeparatorMismatch {
            node: NodeId::new(1),
            expected: 10,
            found: 12,
        };
        assert_eq!(
            format!("{}", err),
            "separator in Node(1) reads 12, subtree minimum is 10"
        );
    }

    #[test]
    fn test_key_count_message_names_bounds() {
        let err = Error::KeyCountOutOfRange {
            node: NodeId::new(4),
            count: 1,
        };
        assert_eq!(format!("{}", err), "Node(4) holds 1 keys, outside [2, 4]");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(Error::KeyNotFound(5), Error::KeyNotFound(5));
        assert_ne!(Error::KeyNotFound(5), Error::KeyNotFound(6));
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<u64> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
