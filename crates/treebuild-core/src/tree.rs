//! Binary search tree with positional slot indexing.
//!
//! Nodes own their children outright; no parent links are kept because no
//! operation needs them. Slots number positions in the implicit complete
//! binary tree: root 0, left child of slot `s` is `2s + 1`, right child is
//! `2s + 2`, independent of insertion order.

/// Marker for a node whose slot has not been assigned yet.
const UNASSIGNED: usize = usize::MAX;

/// A single tree node, owning its children.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    value: u8,
    depth: usize,
    slot: usize,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn new(value: u8, depth: usize) -> Self {
        Self {
            value,
            depth,
            slot: UNASSIGNED,
            left: None,
            right: None,
        }
    }

    /// The node's value
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Distance from the root (root = 0)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Position in the implicit complete binary tree
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn left(&self) -> Option<&TreeNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&TreeNode> {
        self.right.as_deref()
    }
}

/// An owning binary search tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    root: Option<Box<TreeNode>>,
}

impl Tree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Build a tree by inserting the values in sequence order.
    ///
    /// Slots are not assigned here; callers accept or reject the tree on
    /// depth first, then call [`Tree::assign_slots`].
    pub fn from_values(values: &[u8]) -> Self {
        let mut tree = Self::new();
        for &value in values {
            tree.insert(value);
        }
        tree
    }

    /// Insert a value using standard BST insertion.
    ///
    /// Values are required to be unique within one tree; an equal value
    /// walks right and would break the ordering invariant.
    pub fn insert(&mut self, value: u8) {
        let mut depth = 0;
        let mut cursor = &mut self.root;
        while let Some(node) = cursor {
            debug_assert_ne!(value, node.value, "duplicate value inserted into tree");
            depth += 1;
            cursor = if value < node.value {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *cursor = Some(Box::new(TreeNode::new(value, depth)));
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        fn count(node: &TreeNode) -> usize {
            1 + node.left().map_or(0, count) + node.right().map_or(0, count)
        }
        self.root().map_or(0, count)
    }

    /// Greatest node depth, or `None` for an empty tree
    pub fn max_depth(&self) -> Option<usize> {
        fn deepest(node: &TreeNode) -> usize {
            let below = node
                .left()
                .map(deepest)
                .into_iter()
                .chain(node.right().map(deepest))
                .max();
            below.unwrap_or(node.depth)
        }
        self.root().map(deepest)
    }

    /// Assign every node its structural slot, pre-order from the root.
    ///
    /// Each node derives its slot from its parent's assigned slot, never
    /// from traversal order. Assigning twice, or walking past the depth the
    /// slot numbering can represent, is a defect and panics.
    pub fn assign_slots(&mut self) {
        fn assign(node: &mut TreeNode, slot: usize) {
            assert_eq!(node.slot, UNASSIGNED, "slot assigned twice");
            node.slot = slot;
            let left_slot = slot
                .checked_mul(2)
                .and_then(|s| s.checked_add(1))
                .expect("tree depth exceeds slot numbering range");
            if let Some(left) = node.left.as_deref_mut() {
                assign(left, left_slot);
            }
            if let Some(right) = node.right.as_deref_mut() {
                assign(right, left_slot + 1);
            }
        }
        if let Some(root) = self.root.as_deref_mut() {
            assign(root, 0);
        }
    }

    /// All nodes in pre-order, for read-only traversal by frontends.
    pub fn nodes(&self) -> Vec<&TreeNode> {
        fn collect<'a>(node: &'a TreeNode, out: &mut Vec<&'a TreeNode>) {
            out.push(node);
            if let Some(left) = node.left() {
                collect(left, out);
            }
            if let Some(right) = node.right() {
                collect(right, out);
            }
        }
        let mut out = Vec::with_capacity(self.node_count());
        if let Some(root) = self.root() {
            collect(root, &mut out);
        }
        out
    }

    /// Node values in in-order traversal order (ascending for a valid BST).
    pub fn in_order_values(&self) -> Vec<u8> {
        fn walk(node: &TreeNode, out: &mut Vec<u8>) {
            if let Some(left) = node.left() {
                walk(left, out);
            }
            out.push(node.value);
            if let Some(right) = node.right() {
                walk(right, out);
            }
        }
        let mut out = Vec::with_capacity(self.node_count());
        if let Some(root) = self.root() {
            walk(root, &mut out);
        }
        out
    }
}
