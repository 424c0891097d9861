//! Per-node expanded/collapsed flags for one mind map session.
//!
//! Defaults depend on depth: first-level branches start expanded, second-level branches start
//! collapsed, and anything deeper has no toggle of its own (it is shown whenever its parent is).

use crate::tree::{TreeIndex, TreeNode};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use tracing::debug;

/// Deepest level that owns an independent toggle.
pub const MAX_TOGGLE_DEPTH: usize = 2;

pub fn default_expanded(depth: usize) -> bool {
    depth != 2
}

pub fn is_toggle_depth(depth: usize) -> bool {
    (1..=MAX_TOGGLE_DEPTH).contains(&depth)
}

#[derive(Debug, Clone)]
pub struct ExpansionState {
    index: TreeIndex,
    overrides: FxHashMap<String, bool>,
}

impl ExpansionState {
    pub fn new(index: TreeIndex) -> Self {
        Self {
            index,
            overrides: FxHashMap::default(),
        }
    }

    pub fn index(&self) -> &TreeIndex {
        &self.index
    }

    /// Effective state of `id` when it sits at `depth`.
    pub fn is_expanded(&self, id: &str, depth: usize) -> bool {
        if !is_toggle_depth(depth) {
            return true;
        }
        self.overrides
            .get(id)
            .copied()
            .unwrap_or_else(|| default_expanded(depth))
    }

    /// Effective state using the depth recorded in the tree index.
    pub fn is_node_expanded(&self, id: &str) -> bool {
        match self.index.depth_of(id) {
            Some(depth) => self.is_expanded(id, depth),
            None => false,
        }
    }

    /// Whether `id` exposes a toggle at all: a branch at depth 1 or 2.
    pub fn is_toggleable(&self, id: &str) -> bool {
        self.index
            .get(id)
            .is_some_and(|info| info.has_children && is_toggle_depth(info.depth))
    }

    /// Flips the effective state of `id`. Returns `false` (and changes nothing) for leaves, the
    /// root, nodes below the toggle depth, and ids not in the tree.
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(info) = self.index.get(id) else {
            debug!(node = id, "toggle ignored: unknown node");
            return false;
        };
        if !info.has_children || !is_toggle_depth(info.depth) {
            debug!(node = id, depth = info.depth, "toggle ignored: node has no toggle");
            return false;
        }
        let next = !self.is_expanded(id, info.depth);
        self.overrides.insert(id.to_string(), next);
        true
    }

    /// Records an explicit override. Returns `false` for ids without a toggle.
    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> bool {
        if !self.is_toggleable(id) {
            return false;
        }
        self.overrides.insert(id.to_string(), expanded);
        true
    }

    pub fn reset(&mut self) {
        self.overrides.clear();
    }

    pub fn overrides(&self) -> impl Iterator<Item = (&str, bool)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleNode {
    pub id: String,
    pub depth: usize,
    pub parent: Option<String>,
}

/// Breadth-first list of nodes whose whole ancestor chain is expanded, root first.
pub fn visible_nodes(root: &TreeNode, state: &ExpansionState) -> Vec<VisibleNode> {
    let mut out = vec![VisibleNode {
        id: root.id.clone(),
        depth: 0,
        parent: None,
    }];
    let mut queue: VecDeque<(&TreeNode, usize)> = VecDeque::from([(root, 0)]);
    while let Some((node, depth)) = queue.pop_front() {
        if !node.has_children() || !state.is_expanded(&node.id, depth) {
            continue;
        }
        for child in &node.children {
            out.push(VisibleNode {
                id: child.id.clone(),
                depth: depth + 1,
                parent: Some(node.id.clone()),
            });
            queue.push_back((child, depth + 1));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> TreeNode {
        TreeNode::branch(
            "root",
            "Root",
            [
                TreeNode::branch(
                    "a",
                    "A",
                    [
                        TreeNode::leaf("a1", "A1"),
                        TreeNode::branch(
                            "a2",
                            "A2",
                            [TreeNode::branch("a2a", "A2a", [TreeNode::leaf("deep", "Deep")])],
                        ),
                    ],
                ),
                TreeNode::branch("b", "B", [TreeNode::leaf("b1", "B1")]),
                TreeNode::leaf("c", "C"),
            ],
        )
    }

    fn state() -> ExpansionState {
        ExpansionState::new(TreeIndex::build(&tree()).unwrap())
    }

    #[test]
    fn fresh_store_uses_depth_defaults() {
        let s = state();
        assert!(s.is_expanded("a", 1));
        assert!(s.is_expanded("b", 1));
        assert!(!s.is_expanded("a2", 2));
        assert!(s.is_expanded("a2a", 3));
        assert!(s.is_expanded("root", 0));
        assert!(!s.has_overrides());
    }

    #[test]
    fn toggle_twice_restores_original_value() {
        let mut s = state();
        for (id, depth) in [("a", 1), ("a2", 2)] {
            let before = s.is_expanded(id, depth);
            assert!(s.toggle(id));
            assert_ne!(s.is_expanded(id, depth), before);
            assert!(s.toggle(id));
            assert_eq!(s.is_expanded(id, depth), before);
        }
    }

    #[test]
    fn first_toggle_of_a_default_expanded_branch_collapses_it() {
        let mut s = state();
        assert!(s.toggle("b"));
        assert!(!s.is_expanded("b", 1));
    }

    #[test]
    fn leaves_root_deep_nodes_and_unknown_ids_do_not_toggle() {
        let mut s = state();
        assert!(!s.toggle("c"));
        assert!(!s.toggle("root"));
        assert!(!s.toggle("a2a"));
        assert!(!s.toggle("nope"));
        assert!(!s.has_overrides());
    }

    #[test]
    fn reset_returns_to_defaults() {
        let mut s = state();
        s.toggle("a");
        s.toggle("a2");
        s.reset();
        assert!(s.is_expanded("a", 1));
        assert!(!s.is_expanded("a2", 2));
    }

    #[test]
    fn visible_nodes_follow_expansion() {
        let t = tree();
        let mut s = state();
        let ids: Vec<String> = visible_nodes(&t, &s).into_iter().map(|n| n.id).collect();
        assert_eq!(ids, ["root", "a", "b", "c", "a1", "a2", "b1"]);

        s.set_expanded("a2", true);
        let ids: Vec<String> = visible_nodes(&t, &s).into_iter().map(|n| n.id).collect();
        assert_eq!(ids, ["root", "a", "b", "c", "a1", "a2", "b1", "a2a", "deep"]);

        s.set_expanded("a", false);
        let ids: Vec<String> = visible_nodes(&t, &s).into_iter().map(|n| n.id).collect();
        assert_eq!(ids, ["root", "a", "b", "c", "b1"]);
    }
}
