//! Standalone SVG for a mind map view: connector curves underneath, node boxes on top.

use crate::geom::Point;
use crate::layout::PlacedNode;
use crate::model::Connector;
use crate::view::MindMapView;
use std::fmt::Write as _;

pub const STROKE_GRADIENT_FROM: &str = "#a78bfa";
pub const STROKE_GRADIENT_TO: &str = "#c4b5fd";
pub const CONNECTOR_STROKE_WIDTH: f64 = 1.5;
const CANVAS_FILL: &str = "#0f172a";
const CHEVRON_FILL: &str = "#94a3b8";

// 20x20 glyphs: `<` while expanded, `>` while collapsed.
const CHEVRON_EXPANDED: &str = "M12.707 5.293a1 1 0 010 1.414L9.414 10l3.293 3.293a1 1 0 01-1.414 1.414l-4-4a1 1 0 010-1.414l4-4a1 1 0 011.414 0z";
const CHEVRON_COLLAPSED: &str = "M7.293 14.707a1 1 0 010-1.414L10.586 10 7.293 6.707a1 1 0 011.414-1.414l4 4a1 1 0 010 1.414l-4 4a1 1 0 01-1.414 0z";

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Prefix for element ids, so several diagrams can share a document.
    pub diagram_id: String,
    pub title: Option<String>,
    pub background: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: "mindmap".to_string(),
            title: None,
            background: true,
        }
    }
}

fn fmt(v: f64) -> String {
    // Round-trippable decimal, without `-0` or float noise from layout arithmetic.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Horizontal S-curve: both control points sit on the x midpoint, at the start and end heights.
pub fn curve_path(from: Point, to: Point) -> String {
    let mid_x = from.x + (to.x - from.x) * 0.5;
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        fmt(from.x),
        fmt(from.y),
        fmt(mid_x),
        fmt(from.y),
        fmt(mid_x),
        fmt(to.y),
        fmt(to.x),
        fmt(to.y)
    )
}

pub fn connector_path(c: &Connector) -> String {
    curve_path(c.from.into(), c.to.into())
}

pub fn render_mindmap_svg(view: &MindMapView, options: &SvgRenderOptions) -> String {
    let snapshot = view.snapshot();
    let w = fmt(snapshot.content_width);
    let h = fmt(snapshot.content_height);
    let id = escape_xml(&options.diagram_id);

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="{id}" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img""#
    );
    if let Some(title) = &options.title {
        let _ = write!(&mut out, r#" aria-label="{}""#, escape_xml(title));
    }
    out.push('>');
    if let Some(title) = &options.title {
        let _ = write!(&mut out, "<title>{}</title>", escape_xml(title));
    }
    let _ = write!(
        &mut out,
        r#"<defs><linearGradient id="{id}-stroke" x1="0%" y1="0%" x2="100%" y2="0%"><stop offset="0%" stop-color="{STROKE_GRADIENT_FROM}" stop-opacity="0.9"/><stop offset="100%" stop-color="{STROKE_GRADIENT_TO}" stop-opacity="0.9"/></linearGradient></defs>"#
    );
    if options.background {
        let _ = write!(
            &mut out,
            r#"<rect class="canvas" x="0" y="0" width="{w}" height="{h}" fill="{CANVAS_FILL}"/>"#
        );
    }

    let _ = write!(
        &mut out,
        r#"<g class="connectors" fill="none" stroke="url(#{id}-stroke)" stroke-width="{}" stroke-linecap="round">"#,
        fmt(CONNECTOR_STROKE_WIDTH)
    );
    for c in &snapshot.connectors {
        let _ = write!(&mut out, r#"<path d="{}"/>"#, connector_path(c));
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="nodes">"#);
    for node in view.layout().nodes() {
        render_node(&mut out, view, node);
    }
    out.push_str("</g></svg>\n");
    out
}

fn render_node(out: &mut String, view: &MindMapView, node: &PlacedNode) {
    let level = view.style().level(node.depth);
    let r = node.rect;
    let _ = write!(
        out,
        r#"<g class="node depth-{}" data-id="{}""#,
        node.depth,
        escape_xml(&node.id)
    );
    if let Some(expanded) = node.toggle {
        let _ = write!(out, r#" role="button" aria-expanded="{expanded}""#);
    }
    out.push('>');

    let inset = level.border_width / 2.0;
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
        fmt(r.min_x() + inset),
        fmt(r.min_y() + inset),
        fmt(r.width() - level.border_width),
        fmt(r.height() - level.border_width),
        fmt(level.corner_radius),
        escape_xml(&level.fill),
        escape_xml(&level.stroke),
        fmt(level.border_width)
    );

    let mid_y = r.min_y() + r.height() / 2.0;
    let (text_x, anchor) = if node.depth == 0 {
        (r.min_x() + r.width() / 2.0, "middle")
    } else {
        (r.min_x() + level.border_width + level.padding_x, "start")
    };
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" text-anchor="{anchor}" dominant-baseline="central" font-size="{}" font-weight="{}" fill="{}">{}</text>"#,
        fmt(text_x),
        fmt(mid_y),
        fmt(level.font_size),
        level.font_weight,
        escape_xml(&level.text_color),
        escape_xml(&node.label)
    );

    if let Some(expanded) = node.toggle {
        let size = level.toggle_size;
        let x = r.max_x() - level.border_width - level.padding_x - size;
        let d = if expanded {
            CHEVRON_EXPANDED
        } else {
            CHEVRON_COLLAPSED
        };
        let _ = write!(
            out,
            r#"<svg x="{}" y="{}" width="{}" height="{}" viewBox="0 0 20 20"><path fill="{CHEVRON_FILL}" fill-rule="evenodd" clip-rule="evenodd" d="{d}"/></svg>"#,
            fmt(x),
            fmt(mid_y - size / 2.0),
            fmt(size),
            fmt(size)
        );
    }
    out.push_str("</g>");
}
