//! Immutable label tree rendered by the mind map.
//!
//! Node ids are the identity used by the expansion store and by every measured box, so they must
//! be unique across the whole tree (not just among siblings).

use crate::{Error, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(
        id: impl Into<String>,
        label: impl Into<String>,
        children: impl IntoIterator<Item = TreeNode>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: children.into_iter().collect(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Pre-order walk yielding `(node, depth)`; the root has depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(self, 0)],
        }
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.walk().map(|(n, _)| n).find(|n| n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    pub fn max_depth(&self) -> usize {
        self.walk().map(|(_, d)| d).max().unwrap_or(0)
    }

    /// Checks that every id is non-empty and unique across the tree.
    pub fn validate(&self) -> Result<()> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for (node, _) in self.walk() {
            if node.id.trim().is_empty() {
                return Err(Error::EmptyNodeId {
                    label: node.label.clone(),
                });
            }
            if !seen.insert(node.id.as_str()) {
                return Err(Error::DuplicateNodeId {
                    id: node.id.clone(),
                });
            }
        }
        Ok(())
    }
}

pub struct Walk<'a> {
    stack: Vec<(&'a TreeNode, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((node, depth))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub depth: usize,
    pub parent: Option<String>,
    pub has_children: bool,
}

/// Per-session lookup from node id to its structural facts.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    root_id: String,
    nodes: FxHashMap<String, NodeInfo>,
}

impl TreeIndex {
    pub fn build(root: &TreeNode) -> Result<Self> {
        root.validate()?;

        let mut nodes: FxHashMap<String, NodeInfo> =
            FxHashMap::with_capacity_and_hasher(root.node_count(), Default::default());
        nodes.insert(
            root.id.clone(),
            NodeInfo {
                depth: 0,
                parent: None,
                has_children: root.has_children(),
            },
        );

        let mut stack: Vec<(&TreeNode, usize)> = vec![(root, 0)];
        while let Some((parent, depth)) = stack.pop() {
            for child in &parent.children {
                nodes.insert(
                    child.id.clone(),
                    NodeInfo {
                        depth: depth + 1,
                        parent: Some(parent.id.clone()),
                        has_children: child.has_children(),
                    },
                );
                stack.push((child, depth + 1));
            }
        }

        Ok(Self {
            root_id: root.id.clone(),
            nodes,
        })
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn get(&self, id: &str) -> Option<&NodeInfo> {
        self.nodes.get(id)
    }

    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.nodes.get(id).map(|n| n.depth)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::branch(
            "root",
            "Root",
            [
                TreeNode::branch("a", "A", [TreeNode::leaf("a1", "A1")]),
                TreeNode::leaf("b", "B"),
            ],
        )
    }

    #[test]
    fn walk_is_pre_order_with_depths() {
        let tree = sample();
        let got: Vec<(&str, usize)> = tree.walk().map(|(n, d)| (n.id.as_str(), d)).collect();
        assert_eq!(got, vec![("root", 0), ("a", 1), ("a1", 2), ("b", 1)]);
        assert_eq!(tree.max_depth(), 2);
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn validate_rejects_duplicate_ids_in_different_branches() {
        let tree = TreeNode::branch(
            "root",
            "Root",
            [
                TreeNode::branch("a", "A", [TreeNode::leaf("x", "X")]),
                TreeNode::branch("b", "B", [TreeNode::leaf("x", "X again")]),
            ],
        );
        let err = tree.validate().unwrap_err();
        assert!(matches!(err, Error::DuplicateNodeId { id } if id == "x"));
    }

    #[test]
    fn validate_rejects_blank_ids() {
        let tree = TreeNode::branch("root", "Root", [TreeNode::leaf("  ", "Blank")]);
        assert!(matches!(
            tree.validate(),
            Err(Error::EmptyNodeId { .. })
        ));
    }

    #[test]
    fn index_records_depth_parent_and_children() {
        let tree = sample();
        let index = TreeIndex::build(&tree).unwrap();
        assert_eq!(index.root_id(), "root");
        assert_eq!(index.len(), 4);
        let a1 = index.get("a1").unwrap();
        assert_eq!(a1.depth, 2);
        assert_eq!(a1.parent.as_deref(), Some("a"));
        assert!(!a1.has_children);
        assert!(index.get("a").unwrap().has_children);
        assert_eq!(index.depth_of("missing"), None);
    }

    #[test]
    fn children_are_omitted_from_json_for_leaves() {
        let json = serde_json::to_value(TreeNode::leaf("x", "X")).unwrap();
        assert_eq!(json, serde_json::json!({"id": "x", "label": "X"}));
        let back: TreeNode = serde_json::from_value(json).unwrap();
        assert!(back.is_leaf());
    }
}
