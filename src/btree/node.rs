//! Node - a vertex in the tree arena.
//!
//! A [`Node`] is either a leaf holding stored keys or an internal node
//! holding separator keys and child references. Nodes are passive data:
//! all structural logic (descent, splitting, separator maintenance) lives
//! on the tree that owns the arena.

use crate::common::config::BRANCH_FACTOR;
use crate::common::NodeId;

/// Discriminates the two node shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Holds the stored keys themselves; never has children.
    Leaf,
    /// Holds separator keys bracketing child subtrees.
    Internal,
}

/// A vertex in the tree arena.
///
/// Nodes never own one another. The arena owns them all; `children` and
/// `parent` are plain slot indexes into it. The parent link exists only
/// so splits can walk upward, and it is absent exactly on the root.
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    keys: Vec<u64>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    /// Create an empty leaf.
    pub fn leaf(parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::Leaf,
            // One past BRANCH_FACTOR: room for the transient overflow
            // between an insert and the split that resolves it.
            keys: Vec::with_capacity(BRANCH_FACTOR + 1),
            children: Vec::new(),
            parent,
        }
    }

    /// Create an empty internal node.
    pub fn internal(parent: Option<NodeId>) -> Self {
        Self {
            kind: NodeKind::Internal,
            keys: Vec::with_capacity(BRANCH_FACTOR + 1),
            children: Vec::with_capacity(BRANCH_FACTOR + 2),
            parent,
        }
    }

    // ========================================================================
    // Shape queries
    // ========================================================================

    /// Which shape this node is.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Whether this node stores keys directly.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    /// Whether this node holds more keys than `BRANCH_FACTOR` allows.
    #[inline]
    pub fn is_overfull(&self) -> bool {
        self.keys.len() > BRANCH_FACTOR
    }

    // ========================================================================
    // Keys
    // ========================================================================

    /// The keys, ascending.
    #[inline]
    pub fn keys(&self) -> &[u64] {
        &self.keys
    }

    /// Number of keys held.
    #[inline]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Position of `key` in this node, scanning left to right.
    pub fn position_of(&self, key: u64) -> Option<usize> {
        self.keys.iter().position(|&k| k == key)
    }

    /// Slot where `key` would have to be placed to keep the keys sorted.
    ///
    /// First index whose key exceeds `key`, or one past the end.
    pub fn insertion_point(&self, key: u64) -> usize {
        self.keys
            .iter()
            .position(|&k| k > key)
            .unwrap_or(self.keys.len())
    }

    /// Place `key` at `idx`, shifting later keys one slot right.
    pub fn insert_key(&mut self, idx: usize, key: u64) {
        self.keys.insert(idx, key);
    }

    /// Append `key` after the current last key.
    pub fn push_key(&mut self, key: u64) {
        self.keys.push(key);
    }

    /// Overwrite the key at `idx`.
    pub fn set_key(&mut self, idx: usize, key: u64) {
        self.keys[idx] = key;
    }

    // ========================================================================
    // Children
    // ========================================================================

    /// The child ids, left to right.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of children held.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// The child at `idx`.
    #[inline]
    pub fn child(&self, idx: usize) -> NodeId {
        self.children[idx]
    }

    /// Child to descend into when looking for `key`.
    ///
    /// The child just left of the first separator exceeding `key`, or the
    /// last child when no separator does. Meaningful only for internal
    /// nodes; a separator equal to `key` routes right, where the subtree
    /// minimum equals the separator.
    pub fn route(&self, key: u64) -> NodeId {
        let idx = self
            .keys
            .iter()
            .position(|&sep| key < sep)
            .unwrap_or(self.keys.len());
        self.children[idx]
    }

    /// Place `child` at `idx`, shifting later children one slot right.
    pub fn insert_child(&mut self, idx: usize, child: NodeId) {
        self.children.insert(idx, child);
    }

    /// Append `child` after the current last child.
    pub fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    /// Overwrite the child slot at `idx`.
    pub fn set_child(&mut self, idx: usize, child: NodeId) {
        self.children[idx] = child;
    }

    // ========================================================================
    // Parent link
    // ========================================================================

    /// The owning ancestor, or `None` on the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Repoint the parent link.
    #[inline]
    pub fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render this node's keys the way the tree dump prints them.
    ///
    /// Leaf keys are bracketed and zero-padded to three digits, separators
    /// are bare; every key is followed by one space, including the last.
    pub fn render_keys(&self) -> String {
        let mut out = String::new();
        for &key in &self.keys {
            if self.is_leaf() {
                out.push_str(&format!("[{:03}] ", key));
            } else {
                out.push_str(&format!("{:03} ", key));
            }
        }
        out
    }
}

impl Default for Node {
    /// An empty leaf with no parent: the shape of a fresh root.
    fn default() -> Self {
        Self::leaf(None)
    }
}
