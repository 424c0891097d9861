//! Retained left-to-right layout of the visible part of a mind map.
//!
//! Each node forms a row `[box] gap [children column]`; children stack top to bottom in
//! insertion order and each row is vertically centred. The root box is stretched to the full
//! height of the first-level column. Collapsed subtrees take no space at all.

use crate::geom::{Rect, Size, rect, size};
use crate::measure::MeasurementProvider;
use crate::text::{TextMeasurer, TextStyle};
use indexmap::IndexMap;
use nagrik_core::{ExpansionState, TreeNode};
use serde::{Deserialize, Serialize};

/// Box and spacing metrics for one depth tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelStyle {
    pub font_size: f64,
    pub font_weight: u16,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub border_width: f64,
    pub corner_radius: f64,
    /// Chevron glyph size, shown only on nodes that can be toggled.
    pub toggle_size: f64,
    pub toggle_gap: f64,
    /// Horizontal gap between this node's box and its children column.
    pub children_gap: f64,
    /// Vertical gap between siblings at this depth.
    pub sibling_gap: f64,
    pub fill: String,
    pub stroke: String,
    pub text_color: String,
}

impl LevelStyle {
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font_family: None,
            font_size: self.font_size,
            font_weight: Some(self.font_weight.to_string()),
            line_height: Some(self.line_height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LayoutStyleDef")]
pub struct LayoutStyle {
    levels: Vec<LevelStyle>,
}

#[derive(Deserialize)]
struct LayoutStyleDef {
    #[serde(default)]
    levels: Vec<LevelStyle>,
}

impl From<LayoutStyleDef> for LayoutStyle {
    fn from(def: LayoutStyleDef) -> Self {
        Self::new(def.levels)
    }
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            levels: default_levels(),
        }
    }
}

fn tier(
    (font_size, font_weight, line_height): (f64, u16, f64),
    (padding_x, padding_y, corner_radius): (f64, f64, f64),
    (toggle_size, toggle_gap): (f64, f64),
    (children_gap, sibling_gap): (f64, f64),
    (fill, stroke, text_color): (&str, &str, &str),
) -> LevelStyle {
    LevelStyle {
        font_size,
        font_weight,
        line_height,
        padding_x,
        padding_y,
        border_width: 1.0,
        corner_radius,
        toggle_size,
        toggle_gap,
        children_gap,
        sibling_gap,
        fill: fill.to_string(),
        stroke: stroke.to_string(),
        text_color: text_color.to_string(),
    }
}

fn default_levels() -> Vec<LevelStyle> {
    vec![
        tier(
            (16.0, 600, 24.0),
            (20.0, 16.0, 12.0),
            (0.0, 0.0),
            (40.0, 0.0),
            ("#1e293b", "#64748b", "#f1f5f9"),
        ),
        tier(
            (14.0, 500, 20.0),
            (16.0, 10.0, 12.0),
            (16.0, 8.0),
            (24.0, 20.0),
            ("#1e293b", "#64748b", "#f1f5f9"),
        ),
        tier(
            (14.0, 400, 20.0),
            (12.0, 8.0, 8.0),
            (14.0, 6.0),
            (16.0, 8.0),
            ("#334155", "#475569", "#e2e8f0"),
        ),
        tier(
            (12.0, 400, 16.0),
            (10.0, 6.0, 6.0),
            (14.0, 6.0),
            (16.0, 6.0),
            ("#334155", "#475569", "#cbd5e1"),
        ),
    ]
}

impl LayoutStyle {
    /// Tiers by depth; an empty list falls back to the defaults.
    pub fn new(levels: Vec<LevelStyle>) -> Self {
        if levels.is_empty() {
            return Self::default();
        }
        Self { levels }
    }

    /// Style for `depth`; depths past the last tier reuse it.
    pub fn level(&self, depth: usize) -> &LevelStyle {
        let i = depth.min(self.levels.len().saturating_sub(1));
        &self.levels[i]
    }

    pub fn levels(&self) -> &[LevelStyle] {
        &self.levels
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedNode {
    pub id: String,
    pub label: String,
    pub depth: usize,
    pub parent: Option<String>,
    #[serde(skip)]
    pub rect: Rect,
    /// `Some(expanded)` when the node shows a toggle.
    pub toggle: Option<bool>,
}

struct Measured<'a> {
    node: &'a TreeNode,
    depth: usize,
    box_size: Size,
    toggle: Option<bool>,
    children: Vec<Measured<'a>>,
    column_height: f64,
    row: Size,
}

#[derive(Debug, Clone, Default)]
pub struct RetainedLayout {
    nodes: IndexMap<String, PlacedNode>,
    scroll_size: Size,
}

impl RetainedLayout {
    pub fn compute(
        root: &TreeNode,
        state: &ExpansionState,
        style: &LayoutStyle,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let measured = measure(root, 0, state, style, measurer);
        let mut out = Self::default();
        let root_height = measured.row.height;
        out.place(&measured, None, 0.0, 0.0, style, Some(root_height));

        let (w, h) = out.nodes.values().fold((0.0_f64, 0.0_f64), |(w, h), n| {
            (w.max(n.rect.max_x()), h.max(n.rect.max_y()))
        });
        out.scroll_size = size(w, h);
        out
    }

    fn place(
        &mut self,
        m: &Measured<'_>,
        parent: Option<&str>,
        x: f64,
        y: f64,
        style: &LayoutStyle,
        stretch_to: Option<f64>,
    ) {
        let row_h = m.row.height;
        let node_rect = match stretch_to {
            Some(h) => rect(x, y, m.box_size.width, h),
            None => rect(
                x,
                y + (row_h - m.box_size.height) / 2.0,
                m.box_size.width,
                m.box_size.height,
            ),
        };
        self.nodes.insert(
            m.node.id.clone(),
            PlacedNode {
                id: m.node.id.clone(),
                label: m.node.label.clone(),
                depth: m.depth,
                parent: parent.map(str::to_string),
                rect: node_rect,
                toggle: m.toggle,
            },
        );

        if m.children.is_empty() {
            return;
        }
        let level = style.level(m.depth);
        let gap = style.level(m.depth + 1).sibling_gap;
        let cx = x + m.box_size.width + level.children_gap;
        let mut cy = y + (row_h - m.column_height) / 2.0;
        for child in &m.children {
            self.place(child, Some(&m.node.id), cx, cy, style, None);
            cy += child.row.height + gap;
        }
    }

    pub fn get(&self, id: &str) -> Option<&PlacedNode> {
        self.nodes.get(id)
    }

    /// Placed nodes in depth-first order, parents before children.
    pub fn nodes(&self) -> impl Iterator<Item = &PlacedNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Extent of the rendered nodes measured from the content origin.
    pub fn scroll_size(&self) -> Size {
        self.scroll_size
    }
}

impl MeasurementProvider for RetainedLayout {
    fn bounding_box(&self, id: &str) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.rect)
    }
}

fn measure<'a>(
    node: &'a TreeNode,
    depth: usize,
    state: &ExpansionState,
    style: &LayoutStyle,
    measurer: &dyn TextMeasurer,
) -> Measured<'a> {
    let level = style.level(depth);
    let toggle = state
        .is_toggleable(&node.id)
        .then(|| state.is_expanded(&node.id, depth));

    let text = measurer.measure(&node.label, &level.text_style());
    let mut inner_w = text.width;
    let mut inner_h = text.height.max(level.line_height);
    if toggle.is_some() {
        inner_w += level.toggle_gap + level.toggle_size;
        inner_h = inner_h.max(level.toggle_size);
    }
    let box_size = size(
        inner_w + 2.0 * (level.padding_x + level.border_width),
        inner_h + 2.0 * (level.padding_y + level.border_width),
    );

    let show_children = node.has_children() && state.is_expanded(&node.id, depth);
    let children: Vec<Measured<'a>> = if show_children {
        node.children
            .iter()
            .map(|c| measure(c, depth + 1, state, style, measurer))
            .collect()
    } else {
        Vec::new()
    };

    let sibling_gap = style.level(depth + 1).sibling_gap;
    let column_height = if children.is_empty() {
        0.0
    } else {
        children.iter().map(|c| c.row.height).sum::<f64>()
            + sibling_gap * (children.len() - 1) as f64
    };
    let column_width = children.iter().map(|c| c.row.width).fold(0.0, f64::max);
    let row = if children.is_empty() {
        box_size
    } else {
        size(
            box_size.width + level.children_gap + column_width,
            box_size.height.max(column_height),
        )
    };

    Measured {
        node,
        depth,
        box_size,
        toggle,
        children,
        column_height,
        row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::DeterministicTextMeasurer;
    use nagrik_core::TreeIndex;

    fn tree() -> TreeNode {
        TreeNode::branch(
            "root",
            "Root",
            vec![
                TreeNode::branch(
                    "a",
                    "A",
                    vec![
                        TreeNode::leaf("a1", "A1"),
                        TreeNode::branch("a2", "A2", vec![TreeNode::leaf("a2a", "A2a")]),
                    ],
                ),
                TreeNode::branch("b", "B", vec![TreeNode::leaf("b1", "B1")]),
            ],
        )
    }

    fn layout(state: &ExpansionState, root: &TreeNode) -> RetainedLayout {
        RetainedLayout::compute(
            root,
            state,
            &LayoutStyle::default(),
            &DeterministicTextMeasurer::default(),
        )
    }

    #[test]
    fn collapsed_subtrees_are_not_placed() {
        let root = tree();
        let state = ExpansionState::new(TreeIndex::build(&root).unwrap());
        let l = layout(&state, &root);
        let ids: Vec<_> = l.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["root", "a", "a1", "a2", "b", "b1"]);
        assert_eq!(l.get("a2").and_then(|n| n.toggle), Some(false));
        assert_eq!(l.get("a1").and_then(|n| n.toggle), None);
        assert!(l.bounding_box("a2a").is_none());
    }

    #[test]
    fn rows_flow_left_to_right_and_stack_in_order() {
        let root = tree();
        let state = ExpansionState::new(TreeIndex::build(&root).unwrap());
        let l = layout(&state, &root);
        let r = l.bounding_box("root").unwrap();
        let a = l.bounding_box("a").unwrap();
        let b = l.bounding_box("b").unwrap();
        let a1 = l.bounding_box("a1").unwrap();
        let a2 = l.bounding_box("a2").unwrap();

        assert!((a.min_x() - (r.max_x() + 40.0)).abs() < 1e-9);
        assert!((a1.min_x() - (a.max_x() + 24.0)).abs() < 1e-9);
        assert!(a.max_y() < b.min_y());
        assert!((a2.min_y() - (a1.max_y() + 8.0)).abs() < 1e-9);
        // Root is stretched over the whole first-level column.
        assert_eq!(r.min_y(), 0.0);
        assert!((r.height() - l.scroll_size().height).abs() < 1e-9);
    }

    #[test]
    fn expanding_grows_the_scroll_size() {
        let root = tree();
        let mut state = ExpansionState::new(TreeIndex::build(&root).unwrap());
        let before = layout(&state, &root).scroll_size();
        state.toggle("a2");
        let after = layout(&state, &root).scroll_size();
        assert!(after.width > before.width);
        assert!(after.height >= before.height);
    }

    #[test]
    fn deep_levels_reuse_last_tier() {
        let style = LayoutStyle::default();
        assert_eq!(style.level(7), style.level(3));
        assert_eq!(LayoutStyle::new(Vec::new()), style);
    }

    #[test]
    fn deserialized_style_without_levels_uses_defaults() {
        let empty: LayoutStyle = serde_json::from_str(r#"{"levels": []}"#).unwrap();
        assert_eq!(empty, LayoutStyle::default());
        assert_eq!(empty.level(5), LayoutStyle::default().level(3));

        let missing: LayoutStyle = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.levels().len(), 4);

        let json = serde_json::to_string(&LayoutStyle::default()).unwrap();
        let back: LayoutStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LayoutStyle::default());
    }
}
