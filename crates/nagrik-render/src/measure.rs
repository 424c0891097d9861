//! Where node geometry comes from.
//!
//! The engine never lays anything out itself; it asks a [`MeasurementProvider`] for the
//! rendered box of each node, in content-area coordinates (origin at the content's top-left,
//! unaffected by scrolling).

use crate::geom::{Rect, Size};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub trait MeasurementProvider {
    /// The rendered box of `id`, or `None` if the node is not currently rendered.
    fn bounding_box(&self, id: &str) -> Option<Rect>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 380.0)
    }
}

/// Sizes read off the scroll container at recomputation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetrics {
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub viewport: Viewport,
}

impl ContentMetrics {
    pub fn new(scroll: Size, viewport: Viewport) -> Self {
        Self {
            scroll_width: scroll.width,
            scroll_height: scroll.height,
            viewport,
        }
    }
}

/// Map-backed provider; ids without an entry are reported as not rendered.
#[derive(Debug, Clone, Default)]
pub struct FixedMeasurements {
    boxes: FxHashMap<String, Rect>,
}

impl FixedMeasurements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, rect: Rect) -> Self {
        self.insert(id, rect);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, rect: Rect) {
        self.boxes.insert(id.into(), rect);
    }

    pub fn remove(&mut self, id: &str) -> Option<Rect> {
        self.boxes.remove(id)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl MeasurementProvider for FixedMeasurements {
    fn bounding_box(&self, id: &str) -> Option<Rect> {
        self.boxes.get(id).copied()
    }
}

impl<P: MeasurementProvider + ?Sized> MeasurementProvider for &P {
    fn bounding_box(&self, id: &str) -> Option<Rect> {
        (**self).bounding_box(id)
    }
}
