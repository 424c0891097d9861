#![forbid(unsafe_code)]

//! Headless layout and connector geometry for collapsible mind maps.
//!
//! [`layout::RetainedLayout`] stands in for a rendering surface: it places the visible nodes and
//! answers bounding-box queries. [`engine::recompute`] turns those boxes into connectors, and
//! [`view::MindMapView`] ties both to the expansion state and the frame scheduler.

pub mod engine;
pub mod geom;
pub mod layout;
pub mod measure;
pub mod model;
pub mod schedule;
pub mod svg;
pub mod text;
pub mod view;

pub use layout::{LayoutStyle, LevelStyle, RetainedLayout};
pub use measure::{ContentMetrics, FixedMeasurements, MeasurementProvider, Viewport};
pub use model::{Connector, LayoutSnapshot};
pub use svg::{SvgRenderOptions, render_mindmap_svg};
pub use view::{MindMapOptions, MindMapView};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] nagrik_core::Error),
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The view's current snapshot as JSON.
pub fn snapshot_json(view: &MindMapView, pretty: bool) -> Result<String> {
    let snapshot = view.snapshot();
    Ok(if pretty {
        serde_json::to_string_pretty(snapshot)?
    } else {
        serde_json::to_string(snapshot)?
    })
}
