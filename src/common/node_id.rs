//! Node identifier type.

use std::fmt;

/// Identifies a node slot in a tree's arena.
///
/// Backed by `usize` so an id indexes the arena `Vec` directly:
/// `nodes[node_id.0]`, no casting on access.
///
/// A `NodeId` is only meaningful to the tree that issued it; holding one
/// confers no ownership of the node it names. Parent links and child
/// lists are stored as `NodeId`s for exactly that reason.
///
/// # Example
/// ```
/// use memindex::NodeId;
///
/// let node_id = NodeId::new(5);
/// assert_eq!(node_id.0, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Create a new NodeId.
    #[inline]
    pub fn new(id: usize) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_new() {
        let nid = NodeId::new(10);
        assert_eq!(nid.0, 10);
    }

    #[test]
    fn test_node_id_equality() {
        assert_eq!(NodeId::new(5), NodeId::new(5));
        assert_ne!(NodeId::new(5), NodeId::new(6));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(format!("{}", NodeId::new(42)), "Node(42)");
    }
}
