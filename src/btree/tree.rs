//! BTree - the tree engine.
//!
//! The [`BTree`] owns every node through an arena and drives all
//! structural logic:
//! - Descent for lookups and insert placement
//! - Overflow detection and the split engine
//! - Separator maintenance from subtree minimums
//! - Structural verification and the diagnostic dump

use std::fmt;

use tracing::{debug, trace};

use crate::btree::node::Node;
use crate::btree::stats::TreeStats;
use crate::common::config::{BRANCH_FACTOR, HALF_FACTOR};
use crate::common::{Error, NodeId, Result};

/// An ordered index over unique `u64` keys.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────────┐
/// │                            BTree                             │
/// │  ┌──────────────┐   ┌────────────────────────────────────┐   │
/// │  │ root         │   │         nodes: Vec<Node>           │   │
/// │  │ NodeId       │──▶│  [Node0] [Node1] [Node2] ...       │   │
/// │  └──────────────┘   └────────────────────────────────────┘   │
/// │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐      │
/// │  │ free         │   │ len          │   │ stats        │      │
/// │  │ Vec<NodeId>  │   │ usize        │   │ TreeStats    │      │
/// │  └──────────────┘   └──────────────┘   └──────────────┘      │
/// └──────────────────────────────────────────────────────────────┘
/// ```
///
/// All nodes live in `nodes` and refer to one another by [`NodeId`].
/// Ownership flows strictly downward from `root`; a node's parent field
/// is a plain back index used only to propagate splits. Slots vacated by
/// split-replaced nodes go onto `free` (LIFO) and are handed back out by
/// the next allocation, so the arena stays proportional to the live tree.
///
/// # Concurrency
/// Single-threaded by construction: `insert` takes `&mut self`, so the
/// borrow checker rules out concurrent mutation, and any number of
/// `&self` readers may run while no writer holds the tree.
///
/// # Example
/// ```
/// use memindex::BTree;
///
/// let mut tree = BTree::new();
/// for key in [13, 7, 42] {
///     tree.insert(key).unwrap();
/// }
/// assert_eq!(tree.search(7), Ok(7));
/// assert!(tree.search(8).is_err());
/// assert_eq!(tree.len(), 3);
/// ```
#[derive(Debug)]
pub struct BTree {
    /// Node arena; every node lives here and is addressed by NodeId.
    nodes: Vec<Node>,

    /// Recycled arena slots left behind by split-replaced nodes (LIFO).
    free: Vec<NodeId>,

    /// The root node, the only entry point for descent.
    root: NodeId,

    /// Count of live keys.
    len: usize,

    /// Structural event counters.
    stats: TreeStats,
}

impl BTree {
    /// Create an empty tree: a single leaf root holding no keys.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::leaf(None)],
            free: Vec::new(),
            root: NodeId::new(0),
            len: 0,
            stats: TreeStats::new(),
        }
    }

    // ========================================================================
    // Public API: Lookups
    // ========================================================================

    /// Look up `key`, returning the stored key on a hit.
    ///
    /// Keys double as values, so the returned value equals `key`. A miss
    /// reports [`Error::KeyNotFound`].
    pub fn search(&self, key: u64) -> Result<u64> {
        let (leaf, position) = self.locate(key);
        match position {
            Some(idx) => Ok(self.node(leaf).keys()[idx]),
            None => Err(Error::KeyNotFound(key)),
        }
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: u64) -> bool {
        self.locate(key).1.is_some()
    }

    // ========================================================================
    // Public API: Insertion
    // ========================================================================

    /// Insert `key` if absent; inserting a present key changes nothing.
    ///
    /// Splits the target leaf on overflow and cascades upward as parents
    /// overflow in turn. The error arm only reports structural corruption
    /// and cannot fire on a well-formed tree.
    pub fn insert(&mut self, key: u64) -> Result<()> {
        let (leaf, position) = self.locate(key);
        if position.is_some() {
            self.stats.duplicates_ignored += 1;
            return Ok(());
        }

        let idx = self.node(leaf).insertion_point(key);
        self.node_mut(leaf).insert_key(idx, key);
        self.len += 1;
        self.stats.keys_inserted += 1;

        if self.node(leaf).is_overfull() {
            self.split(leaf)?;
        }
        Ok(())
    }

    // ========================================================================
    // Public API: Introspection
    // ========================================================================

    /// Number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Edge count from the root down to the leaf level.
    ///
    /// A tree whose root is a leaf has height 0. Every leaf sits at this
    /// depth; splits are the only operations that change it.
    pub fn height(&self) -> usize {
        let mut depth = 0;
        let mut current = self.root;
        while !self.node(current).is_leaf() {
            current = self.node(current).child(0);
            depth += 1;
        }
        depth
    }

    /// Collect every stored key in ascending order.
    pub fn keys(&self) -> Vec<u64> {
        let mut out = Vec::with_capacity(self.len);
        self.collect_keys(self.root, &mut out);
        out
    }

    /// Current operation counters.
    ///
    /// Returns a copy; the counters keep advancing inside the tree.
    #[inline]
    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    /// Zero the operation counters, keeping the tree contents.
    pub fn reset_stats(&mut self) {
        self.stats = TreeStats::new();
    }

    // ========================================================================
    // Public API: Structural verification
    // ========================================================================

    /// Walk the whole tree and verify its structural invariants.
    ///
    /// Checks, in walk order:
    /// - the root has no parent and every child points back at its owner
    /// - internal nodes hold exactly one more child than keys
    /// - every non-root node holds between `HALF_FACTOR` and
    ///   `BRANCH_FACTOR` keys
    /// - every separator equals the minimum key of the child to its right
    /// - all leaves sit at the same depth
    /// - the full key sequence is strictly ascending
    ///
    /// Read-only and `O(n)`; returns the first violation found.
    pub fn check(&self) -> Result<()> {
        if self.node(self.root).parent().is_some() {
            return Err(Error::ParentLinkBroken { node: self.root });
        }
        let leaf_depth = self.height();
        let mut last_key = None;
        self.check_node(self.root, 0, leaf_depth, &mut last_key)
    }

    fn check_node(
        &self,
        id: NodeId,
        depth: usize,
        leaf_depth: usize,
        last_key: &mut Option<u64>,
    ) -> Result<()> {
        let node = self.node(id);

        if id != self.root && !(HALF_FACTOR..=BRANCH_FACTOR).contains(&node.key_count()) {
            return Err(Error::KeyCountOutOfRange {
                node: id,
                count: node.key_count(),
            });
        }

        if node.is_leaf() {
            if depth != leaf_depth {
                return Err(Error::DepthMismatch {
                    node: id,
                    depth,
                    expected: leaf_depth,
                });
            }
            for &key in node.keys() {
                if let Some(prev) = *last_key {
                    if prev >= key {
                        return Err(Error::KeyOrderViolation { node: id, key });
                    }
                }
                *last_key = Some(key);
            }
            return Ok(());
        }

        if node.child_count() != node.key_count() + 1 {
            return Err(Error::ArityMismatch {
                node: id,
                keys: node.key_count(),
                children: node.child_count(),
            });
        }
        for (idx, &child) in node.children().iter().enumerate() {
            if self.node(child).parent() != Some(id) {
                return Err(Error::ParentLinkBroken { node: child });
            }
            if idx > 0 {
                let expected = self.least(child);
                let found = node.keys()[idx - 1];
                if found != expected {
                    return Err(Error::SeparatorMismatch {
                        node: id,
                        expected,
                        found,
                    });
                }
            }
            self.check_node(child, depth + 1, leaf_depth, last_key)?;
        }
        Ok(())
    }

    // ========================================================================
    // Internal: Descent
    // ========================================================================

    /// Walk from the root to the leaf that covers `key`.
    ///
    /// Returns that leaf and the position of `key` inside it, if present.
    /// The descent scans separators left to right and takes the child
    /// just before the first separator exceeding `key`, or the last child
    /// when none does.
    fn locate(&self, key: u64) -> (NodeId, Option<usize>) {
        let mut current = self.root;
        loop {
            let node = self.node(current);
            if node.is_leaf() {
                return (current, node.position_of(key));
            }
            current = node.route(key);
        }
    }

    /// Smallest key reachable from `id`: the first key of the leftmost
    /// leaf below it.
    ///
    /// Always derived from the live structure, never cached; separator
    /// maintenance depends on it staying exact. Callers only name nodes
    /// with at least one key (only a fresh root can be empty).
    fn least(&self, id: NodeId) -> u64 {
        let mut current = id;
        loop {
            let node = self.node(current);
            if node.is_leaf() {
                return node.keys()[0];
            }
            current = node.child(0);
        }
    }

    // ========================================================================
    // Internal: Split engine
    // ========================================================================

    /// Split an overfull node, cascading upward as parents overflow.
    fn split(&mut self, id: NodeId) -> Result<()> {
        let parent = match self.node(id).parent() {
            Some(parent) => parent,
            None => {
                self.split_root();
                return Ok(());
            }
        };

        if self.node(id).is_leaf() {
            self.stats.leaf_splits += 1;
        } else {
            self.stats.branch_splits += 1;
        }

        let (left, right) = self.partition(id);
        self.replace_child(parent, id, left)?;
        self.release(id);
        self.thread_sibling(parent, right)
    }

    /// Grow the tree by one level: partition the root and install a new
    /// root holding exactly the two halves and one separator.
    fn split_root(&mut self) {
        self.stats.root_splits += 1;

        let (left, right) = self.partition(self.root);
        let separator = self.least(right);

        let mut root = Node::internal(None);
        root.push_child(left);
        root.push_child(right);
        root.push_key(separator);
        let new_root = self.alloc(root);

        self.node_mut(left).set_parent(Some(new_root));
        self.node_mut(right).set_parent(Some(new_root));

        let old_root = std::mem::replace(&mut self.root, new_root);
        self.release(old_root);

        debug!(root = %new_root, height = self.height(), "root split, tree grew a level");
    }

    /// Partition an overfull node into two fresh siblings (even-even
    /// rule) and return their ids, left then right.
    ///
    /// Leaves hand their first `HALF_FACTOR` keys to the left sibling.
    /// Internal nodes hand over the first child unconditionally plus the
    /// next `HALF_FACTOR` children, then both siblings rebuild their
    /// separators from child minimums and the moved children are
    /// repointed at their new owners. The old node stays in the arena
    /// until the caller releases its slot.
    fn partition(&mut self, id: NodeId) -> (NodeId, NodeId) {
        let parent = self.node(id).parent();

        let (left_id, right_id) = if self.node(id).is_leaf() {
            let keys = self.node(id).keys().to_vec();
            let (lo, hi) = keys.split_at(HALF_FACTOR);

            let mut left = Node::leaf(parent);
            let mut right = Node::leaf(parent);
            for &key in lo {
                left.push_key(key);
            }
            for &key in hi {
                right.push_key(key);
            }

            (self.alloc(left), self.alloc(right))
        } else {
            let children = self.node(id).children().to_vec();
            // First child always stays left; the rest distribute by position.
            let (lo, hi) = children.split_at(HALF_FACTOR + 1);

            let mut left = Node::internal(parent);
            let mut right = Node::internal(parent);
            for &child in lo {
                left.push_child(child);
            }
            for &child in hi {
                right.push_child(child);
            }
            for &child in &lo[1..] {
                let separator = self.least(child);
                left.push_key(separator);
            }
            for &child in &hi[1..] {
                let separator = self.least(child);
                right.push_key(separator);
            }

            let left_id = self.alloc(left);
            let right_id = self.alloc(right);
            for &child in lo {
                self.node_mut(child).set_parent(Some(left_id));
            }
            for &child in hi {
                self.node_mut(child).set_parent(Some(right_id));
            }
            (left_id, right_id)
        };

        trace!(old = %id, left = %left_id, right = %right_id, "partitioned overfull node");
        (left_id, right_id)
    }

    /// Overwrite the parent's slot for `old` with `new`, in place.
    ///
    /// The slot must exist, and unless it is the first child the
    /// separator preceding it must already equal the replacement's
    /// minimum; either failure means the structure is corrupt.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> Result<()> {
        let slot = match self.node(parent).children().iter().position(|&c| c == old) {
            Some(idx) => idx,
            None => {
                return Err(Error::ChildNotFound {
                    parent,
                    child: old,
                })
            }
        };

        if slot > 0 {
            let expected = self.least(new);
            let found = self.node(parent).keys()[slot - 1];
            if found != expected {
                return Err(Error::SeparatorMismatch {
                    node: parent,
                    expected,
                    found,
                });
            }
        }

        self.node_mut(parent).set_child(slot, new);
        Ok(())
    }

    /// Thread a freshly split-off sibling into `parent`, keyed by the
    /// sibling's minimum.
    ///
    /// Scans existing children's minimums for the first one exceeding the
    /// sibling's and inserts before it, rebuilding every separator from
    /// child minimums; when none exceeds it, appends sibling and
    /// separator at the end. Cascades into a parent split on overflow.
    fn thread_sibling(&mut self, parent: NodeId, sibling: NodeId) -> Result<()> {
        let new_key = self.least(sibling);
        trace!(parent = %parent, sibling = %sibling, key = new_key, "threading sibling into parent");

        let slot = self
            .node(parent)
            .children()
            .iter()
            .position(|&child| self.least(child) > new_key);

        match slot {
            Some(idx) => {
                let node = self.node_mut(parent);
                node.insert_child(idx, sibling);
                // Length placeholder; every separator is rebuilt below.
                node.push_key(0);
                self.refresh_separators(parent);
            }
            None => {
                let node = self.node_mut(parent);
                node.push_key(new_key);
                node.push_child(sibling);
            }
        }

        if self.node(parent).is_overfull() {
            return self.split(parent);
        }
        Ok(())
    }

    /// Rebuild every separator in `id` from its children's minimums.
    fn refresh_separators(&mut self, id: NodeId) {
        for idx in 1..self.node(id).child_count() {
            let separator = self.least(self.node(id).child(idx));
            self.node_mut(id).set_key(idx - 1, separator);
        }
    }

    // ========================================================================
    // Internal: Arena
    // ========================================================================

    /// Place a node in the arena, reusing a released slot when one exists.
    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                let id = NodeId::new(self.nodes.len());
                self.nodes.push(node);
                id
            }
        }
    }

    /// Return a node's arena slot to the free list.
    ///
    /// The slot is cleared and handed to the next allocation; the caller
    /// must already have removed every reference to `id`.
    fn release(&mut self, id: NodeId) {
        self.nodes[id.0] = Node::default();
        self.free.push(id);
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn collect_keys(&self, id: NodeId, out: &mut Vec<u64>) {
        let node = self.node(id);
        if node.is_leaf() {
            out.extend_from_slice(node.keys());
            return;
        }
        for &child in node.children() {
            self.collect_keys(child, out);
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let node = self.node(id);
        writeln!(f, "{} {}", "-".repeat(depth + 1), node.render_keys())?;
        for &child in node.children() {
            self.fmt_node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl Default for BTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BTree {
    /// Multi-line structural dump: one line per node, depth-first.
    ///
    /// Depth shows as repeated dashes; leaf keys are bracketed and
    /// separators bare, each zero-padded to three digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0)
    }
}
