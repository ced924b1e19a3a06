//! Tree arena: nodes with doubly linked sibling chains.
//!
//! This layer only keeps links consistent. Invalidation on structural
//! changes lives in the engine, which calls these primitives.

use std::sync::Arc;

use slotmap::SlotMap;

use super::declaration::NodeDeclaration;
use super::NodeId;
use crate::style::cache::StyleCache;
use crate::style::change::CssChange;
use crate::style::computed::ComputedStyle;

/// One node of the style tree.
#[derive(Debug)]
pub struct StyleNode {
    pub(crate) declaration: NodeDeclaration,

    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) previous_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,

    pub(crate) visible: bool,

    /// Latest computed style; the shared sentinel until first validated.
    pub(crate) style: Arc<ComputedStyle>,
    /// Styles handed out to children.
    pub(crate) child_cache: StyleCache,

    /// Reasons the style may be stale, not yet acted on.
    pub(crate) pending_changes: CssChange,
    /// This node or a descendant needs validation.
    pub(crate) invalid: bool,
    /// This node's own style must be re-evaluated.
    pub(crate) style_is_invalid: bool,
    /// Children have not yet seen this node's pending changes.
    pub(crate) needs_propagation: bool,
}

impl StyleNode {
    fn new(declaration: NodeDeclaration) -> Self {
        Self {
            declaration,
            parent: None,
            first_child: None,
            last_child: None,
            previous_sibling: None,
            next_sibling: None,
            visible: true,
            style: ComputedStyle::sentinel(),
            child_cache: StyleCache::new(),
            pending_changes: CssChange::empty(),
            invalid: false,
            style_is_invalid: false,
            needs_propagation: false,
        }
    }

    pub fn declaration(&self) -> &NodeDeclaration {
        &self.declaration
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    pub fn previous_sibling(&self) -> Option<NodeId> {
        self.previous_sibling
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The last computed style, without validating.
    pub fn style(&self) -> &Arc<ComputedStyle> {
        &self.style
    }

    pub fn pending_changes(&self) -> CssChange {
        self.pending_changes
    }

    /// This node or a descendant waits for validation.
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn is_style_invalid(&self) -> bool {
        self.style_is_invalid
    }

    pub fn needs_propagation(&self) -> bool {
        self.needs_propagation
    }

    /// Styles this node has handed out to its children.
    pub fn child_cache(&self) -> &StyleCache {
        &self.child_cache
    }
}

/// Arena of style nodes.
#[derive(Debug, Default)]
pub struct StyleTree {
    nodes: SlotMap<NodeId, StyleNode>,
}

impl StyleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node.
    pub fn insert(&mut self, declaration: NodeDeclaration) -> NodeId {
        self.nodes.insert(StyleNode::new(declaration))
    }

    pub fn get(&self, id: NodeId) -> Option<&StyleNode> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut StyleNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes without a parent, in arena order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.first_child)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.last_child)
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.previous_sibling)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.next_sibling)
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.visible)
    }

    /// Children in order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// `node` itself and every ancestor up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(id).filter(|id| self.contains(*id));
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Pre-order walk of the subtree rooted at `id`.
    pub fn walk_depth_first(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if !self.contains(id) {
            return order;
        }
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            order.push(node);
            let mut child = self.last_child(node);
            while let Some(c) = child {
                stack.push(c);
                child = self.previous_sibling(c);
            }
        }
        order
    }

    // ── Visible siblings ─────────────────────────────────────────────

    pub fn previous_visible_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.previous_sibling(id);
        while let Some(node) = current {
            if self.is_visible(node) {
                return Some(node);
            }
            current = self.previous_sibling(node);
        }
        None
    }

    pub fn next_visible_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(id);
        while let Some(node) = current {
            if self.is_visible(node) {
                return Some(node);
            }
            current = self.next_sibling(node);
        }
        None
    }

    /// Whether no visible sibling precedes `id`.
    pub fn is_first_child(&self, id: NodeId) -> bool {
        self.previous_visible_sibling(id).is_none()
    }

    /// Whether no visible sibling follows `id`.
    pub fn is_last_child(&self, id: NodeId) -> bool {
        self.next_visible_sibling(id).is_none()
    }

    /// 1-based position among visible siblings, counted from the start and
    /// from the end.
    pub fn visible_position(&self, id: NodeId) -> (i32, i32) {
        let mut from_start = 1;
        let mut current = self.previous_visible_sibling(id);
        while let Some(node) = current {
            from_start += 1;
            current = self.previous_visible_sibling(node);
        }
        let mut from_end = 1;
        let mut current = self.next_visible_sibling(id);
        while let Some(node) = current {
            from_end += 1;
            current = self.next_visible_sibling(node);
        }
        (from_start, from_end)
    }

    // ── Link primitives ──────────────────────────────────────────────

    /// Detach `id` from its parent and siblings. Its subtree stays attached
    /// to it.
    pub(crate) fn unlink(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let parent = node.parent.take();
        let previous = node.previous_sibling.take();
        let next = node.next_sibling.take();

        match previous.and_then(|p| self.nodes.get_mut(p)) {
            Some(prev) => prev.next_sibling = next,
            None => {
                if let Some(p) = parent.and_then(|p| self.nodes.get_mut(p)) {
                    p.first_child = next;
                }
            }
        }
        match next.and_then(|n| self.nodes.get_mut(n)) {
            Some(next_node) => next_node.previous_sibling = previous,
            None => {
                if let Some(p) = parent.and_then(|p| self.nodes.get_mut(p)) {
                    p.last_child = previous;
                }
            }
        }
    }

    /// Attach detached `id` under `parent`, right after `previous`
    /// (or as first child when `previous` is `None`).
    pub(crate) fn link(&mut self, id: NodeId, parent: NodeId, previous: Option<NodeId>) {
        let next = match previous {
            Some(prev) => self.next_sibling(prev),
            None => self.first_child(parent),
        };

        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Some(parent);
            node.previous_sibling = previous;
            node.next_sibling = next;
        }
        match previous.and_then(|p| self.nodes.get_mut(p)) {
            Some(prev) => prev.next_sibling = Some(id),
            None => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.first_child = Some(id);
                }
            }
        }
        match next.and_then(|n| self.nodes.get_mut(n)) {
            Some(next_node) => next_node.previous_sibling = Some(id),
            None => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.last_child = Some(id);
                }
            }
        }
    }

    /// Free `id` and its whole subtree. Returns the freed ids.
    pub(crate) fn remove_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        self.unlink(id);
        let doomed = self.walk_depth_first(id);
        for node in &doomed {
            self.nodes.remove(*node);
        }
        doomed
    }
}

/// Iterator over a node's children.
pub struct Children<'a> {
    tree: &'a StyleTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::Atom;

    /// Build a tree:
    ///
    /// ```text
    /// root
    /// ├── a
    /// │   └── d
    /// ├── b
    /// └── c
    /// ```
    fn build_tree() -> (StyleTree, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = StyleTree::new();
        let mut node = |tree: &mut StyleTree, name: &str| tree.insert(NodeDeclaration::new(Atom::new(name)));
        let root = node(&mut tree, "root");
        let a = node(&mut tree, "a");
        let b = node(&mut tree, "b");
        let c = node(&mut tree, "c");
        let d = node(&mut tree, "d");
        tree.link(a, root, None);
        tree.link(b, root, Some(a));
        tree.link(c, root, Some(b));
        tree.link(d, a, None);
        (tree, root, a, b, c, d)
    }

    fn assert_links_consistent(tree: &StyleTree, parent: NodeId) {
        let forward: Vec<NodeId> = tree.children(parent).collect();
        let mut backward = Vec::new();
        let mut current = tree.last_child(parent);
        while let Some(node) = current {
            backward.push(node);
            current = tree.previous_sibling(node);
        }
        backward.reverse();
        assert_eq!(forward, backward);
        for child in forward {
            assert_eq!(tree.parent(child), Some(parent));
        }
    }

    #[test]
    fn link_builds_ordered_children() {
        let (tree, root, a, b, c, d) = build_tree();
        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(tree.children(a).collect::<Vec<_>>(), vec![d]);
        assert_eq!(tree.first_child(root), Some(a));
        assert_eq!(tree.last_child(root), Some(c));
        assert_links_consistent(&tree, root);
    }

    #[test]
    fn unlink_middle_and_edges() {
        let (mut tree, root, a, b, c, _) = build_tree();
        tree.unlink(b);
        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(tree.parent(b), None);
        assert_links_consistent(&tree, root);

        tree.unlink(a);
        tree.unlink(c);
        assert_eq!(tree.first_child(root), None);
        assert_eq!(tree.last_child(root), None);
    }

    #[test]
    fn link_first_and_after_last() {
        let (mut tree, root, a, b, c, _) = build_tree();
        tree.unlink(c);
        tree.link(c, root, None);
        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![c, a, b]);
        tree.unlink(c);
        tree.link(c, root, Some(b));
        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![a, b, c]);
        assert_links_consistent(&tree, root);
    }

    #[test]
    fn ancestry() {
        let (tree, root, a, b, _, d) = build_tree();
        assert_eq!(tree.ancestors(d), vec![d, a, root]);
        assert_eq!(tree.root_of(d), root);
        assert!(tree.is_ancestor_or_self(root, d));
        assert!(tree.is_ancestor_or_self(d, d));
        assert!(!tree.is_ancestor_or_self(b, d));
    }

    #[test]
    fn walk_is_preorder() {
        let (tree, root, a, b, c, d) = build_tree();
        assert_eq!(tree.walk_depth_first(root), vec![root, a, d, b, c]);
        assert_eq!(tree.walk_depth_first(a), vec![a, d]);
    }

    #[test]
    fn visible_positions_skip_hidden_siblings() {
        let (mut tree, _, a, b, c, _) = build_tree();
        assert_eq!(tree.visible_position(b), (2, 2));
        tree.get_mut(a).unwrap().visible = false;
        assert_eq!(tree.visible_position(b), (1, 2));
        assert!(tree.is_first_child(b));
        assert!(!tree.is_last_child(b));
        assert_eq!(tree.previous_visible_sibling(c), Some(b));
        assert_eq!(tree.next_visible_sibling(a), Some(b));
    }

    #[test]
    fn remove_subtree_frees_descendants() {
        let (mut tree, root, a, b, c, d) = build_tree();
        let removed = tree.remove_subtree(a);
        assert_eq!(removed, vec![a, d]);
        assert!(!tree.contains(a));
        assert!(!tree.contains(d));
        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![b, c]);
        assert_eq!(tree.len(), 3);
    }
}
