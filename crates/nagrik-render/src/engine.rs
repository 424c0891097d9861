//! Connector geometry for the currently visible nodes.
//!
//! A recomputation walks the tree level by level and emits one connector per visible child,
//! from the parent's right-centre to the child's left-centre. Nodes the provider cannot measure
//! are skipped together with their subtree; the next recomputation picks them up again.

use crate::geom::Point;
use crate::measure::{ContentMetrics, MeasurementProvider};
use crate::model::{Connector, LayoutSnapshot, NodeAnchors};
use nagrik_core::{ExpansionState, TreeNode};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Content size never drops below the viewport, so the drawing surface covers the whole
/// scrollable area.
pub fn content_size(metrics: &ContentMetrics) -> (f64, f64) {
    (
        metrics.scroll_width.max(metrics.viewport.width),
        metrics.scroll_height.max(metrics.viewport.height),
    )
}

pub fn recompute(
    root: &TreeNode,
    state: &ExpansionState,
    provider: &dyn MeasurementProvider,
    metrics: &ContentMetrics,
) -> LayoutSnapshot {
    let (content_width, content_height) = content_size(metrics);
    let mut snapshot = LayoutSnapshot {
        content_width,
        content_height,
        connectors: Vec::new(),
    };

    let Some(root_box) = provider.bounding_box(&root.id) else {
        warn!(node = %root.id, "root node is not rendered; no connectors this pass");
        return snapshot;
    };

    // (node, depth, parent's right-centre)
    let mut queue: VecDeque<(&TreeNode, usize, Point)> = VecDeque::new();
    let root_right = NodeAnchors::of(&root_box).right_center;
    if state.is_expanded(&root.id, 0) {
        for child in &root.children {
            queue.push_back((child, 1, root_right));
        }
    }

    while let Some((node, depth, parent_right)) = queue.pop_front() {
        let Some(node_box) = provider.bounding_box(&node.id) else {
            debug!(node = %node.id, depth, "node not measured; skipping it and its subtree");
            continue;
        };
        let anchors = NodeAnchors::of(&node_box);
        snapshot
            .connectors
            .push(Connector::new(parent_right, anchors.left_center));

        if node.has_children() && state.is_expanded(&node.id, depth) {
            for child in &node.children {
                queue.push_back((child, depth + 1, anchors.right_center));
            }
        }
    }

    debug!(
        connectors = snapshot.connectors.len(),
        width = snapshot.content_width,
        height = snapshot.content_height,
        "recomputed mind map geometry"
    );
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{point, rect};
    use crate::measure::{FixedMeasurements, Viewport};
    use nagrik_core::TreeIndex;

    fn scenario() -> TreeNode {
        TreeNode::branch(
            "root",
            "Root",
            [
                TreeNode::branch(
                    "a",
                    "A",
                    [
                        TreeNode::leaf("a1", "A1"),
                        TreeNode::branch("a2", "A2", [TreeNode::leaf("a2a", "A2a")]),
                    ],
                ),
                TreeNode::branch("b", "B", [TreeNode::leaf("b1", "B1")]),
            ],
        )
    }

    fn boxes() -> FixedMeasurements {
        let mut m = FixedMeasurements::new();
        for (i, id) in ["root", "a", "a1", "a2", "a2a", "b", "b1"].into_iter().enumerate() {
            m.insert(id, rect(i as f64 * 100.0, i as f64 * 10.0, 50.0, 20.0));
        }
        m
    }

    fn metrics() -> ContentMetrics {
        ContentMetrics {
            scroll_width: 300.0,
            scroll_height: 900.0,
            viewport: Viewport::new(800.0, 380.0),
        }
    }

    #[test]
    fn connector_endpoints_use_box_centres() {
        let root = scenario();
        let state = ExpansionState::new(TreeIndex::build(&root).unwrap());
        let snap = recompute(&root, &state, &boxes(), &metrics());
        let first = snap.connectors[0];
        assert_eq!(Point::from(first.from), point(50.0, 10.0));
        assert_eq!(Point::from(first.to), point(100.0, 20.0));
    }

    #[test]
    fn content_is_at_least_the_viewport() {
        let root = scenario();
        let state = ExpansionState::new(TreeIndex::build(&root).unwrap());
        let snap = recompute(&root, &state, &boxes(), &metrics());
        assert_eq!(snap.content_width, 800.0);
        assert_eq!(snap.content_height, 900.0);
    }

    #[test]
    fn unmeasured_node_drops_its_subtree_only() {
        let root = scenario();
        let mut state = ExpansionState::new(TreeIndex::build(&root).unwrap());
        state.set_expanded("a2", true);
        let mut m = boxes();
        assert_eq!(recompute(&root, &state, &m, &metrics()).connectors.len(), 6);
        m.remove("a");
        // a, a1, a2 and a2a all disappear; root->b and b->b1 stay.
        assert_eq!(recompute(&root, &state, &m, &metrics()).connectors.len(), 2);
    }

    #[test]
    fn missing_root_yields_no_connectors() {
        let root = scenario();
        let state = ExpansionState::new(TreeIndex::build(&root).unwrap());
        let mut m = boxes();
        m.remove("root");
        let snap = recompute(&root, &state, &m, &metrics());
        assert!(snap.connectors.is_empty());
        assert_eq!(snap.content_height, 900.0);
    }
}
