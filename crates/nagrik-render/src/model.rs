use crate::geom::{Point, Rect, point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for LayoutPoint {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<LayoutPoint> for Point {
    fn from(p: LayoutPoint) -> Self {
        point(p.x, p.y)
    }
}

/// A parent-to-child edge, from the parent's right-centre to the child's left-centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub from: LayoutPoint,
    pub to: LayoutPoint,
}

impl Connector {
    pub fn new(from: Point, to: Point) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Output of one recomputation. Replaced wholesale every time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    pub content_width: f64,
    pub content_height: f64,
    pub connectors: Vec<Connector>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn from_rects<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Self> {
        Self::from_points(
            rects
                .into_iter()
                .flat_map(|r| [(r.min_x(), r.min_y()), (r.max_x(), r.max_y())]),
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeAnchors {
    pub left_center: Point,
    pub right_center: Point,
}

impl NodeAnchors {
    pub fn of(rect: &Rect) -> Self {
        let mid_y = rect.min_y() + rect.height() / 2.0;
        Self {
            left_center: point(rect.min_x(), mid_y),
            right_center: point(rect.max_x(), mid_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::rect;

    #[test]
    fn anchors_sit_on_vertical_centre() {
        let a = NodeAnchors::of(&rect(10.0, 20.0, 30.0, 8.0));
        assert_eq!(a.left_center, point(10.0, 24.0));
        assert_eq!(a.right_center, point(40.0, 24.0));
    }

    #[test]
    fn bounds_cover_all_rects() {
        let rects = [rect(0.0, 5.0, 10.0, 10.0), rect(-3.0, 0.0, 2.0, 30.0)];
        let b = Bounds::from_rects(&rects).unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-3.0, 0.0, 10.0, 30.0));
        assert_eq!(b.width(), 13.0);
        assert!(Bounds::from_rects(&[]).is_none());
    }

    #[test]
    fn snapshot_uses_camel_case() {
        let snap = LayoutSnapshot {
            content_width: 1.0,
            content_height: 2.0,
            connectors: vec![Connector::new(point(0.0, 1.0), point(2.0, 3.0))],
        };
        let v = serde_json::to_value(&snap).unwrap();
        assert_eq!(v["contentWidth"], 1.0);
        assert_eq!(v["connectors"][0]["to"]["y"], 3.0);
    }
}
