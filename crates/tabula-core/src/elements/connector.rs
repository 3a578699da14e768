//! Connector element (line or arrow between two points, optionally bound
//! to other elements).

use super::{default_true, point_to_segment_dist, ElementId, ElementStyle, ElementTrait, StrokeStyle};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path style for connectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStyle {
    /// Straight segment.
    #[default]
    Direct,
    /// Smooth bezier curve between endpoints.
    Flowing,
    /// Right-angle connector (elbow).
    Angular,
}

/// A connector between two points. Endpoints may be bound to elements so a
/// host application can re-route the connector when they move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub(crate) id: ElementId,
    /// Start point.
    pub start: Point,
    /// End point (where the arrowhead points, if any).
    pub end: Point,
    /// Element the start point is attached to, if any.
    #[serde(default)]
    pub start_binding: Option<ElementId>,
    /// Element the end point is attached to, if any.
    #[serde(default)]
    pub end_binding: Option<ElementId>,
    /// Arrowhead at the start point.
    #[serde(default)]
    pub arrow_start: bool,
    /// Arrowhead at the end point.
    #[serde(default)]
    pub arrow_end: bool,
    /// Size of the arrowheads.
    #[serde(default = "default_head_size")]
    pub head_size: f64,
    /// Path style (Direct, Flowing, Angular).
    #[serde(default)]
    pub path_style: PathStyle,
    /// Stroke style (Solid, Dashed, Dotted).
    #[serde(default)]
    pub stroke_style: StrokeStyle,
    /// Paint-order index.
    #[serde(default)]
    pub z_index: i64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    /// Style properties.
    pub style: ElementStyle,
}

fn default_head_size() -> f64 {
    15.0
}

impl Connector {
    /// Create a plain line connector.
    pub fn line(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            start_binding: None,
            end_binding: None,
            arrow_start: false,
            arrow_end: false,
            head_size: default_head_size(),
            path_style: PathStyle::Direct,
            stroke_style: StrokeStyle::default(),
            z_index: 0,
            visible: true,
            locked: false,
            style: ElementStyle::default(),
        }
    }

    /// Create an arrow connector (arrowhead at the end point).
    pub fn arrow(start: Point, end: Point) -> Self {
        let mut conn = Self::line(start, end);
        conn.arrow_end = true;
        conn
    }

    /// Get the direction vector (normalized).
    pub fn direction(&self) -> Vec2 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len < f64::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            Vec2::new(dx / len, dy / len)
        }
    }

    /// Get the length of the connector.
    pub fn length(&self) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Get the midpoint of the connector.
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }
}

impl ElementTrait for Connector {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dist = point_to_segment_dist(point, self.start, self.end);
        dist <= tolerance + self.style.stroke_width / 2.0
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        match self.path_style {
            PathStyle::Direct => path.line_to(self.end),
            PathStyle::Flowing => {
                // Ease out horizontally from each endpoint
                let dx = (self.end.x - self.start.x) / 2.0;
                let c1 = Point::new(self.start.x + dx, self.start.y);
                let c2 = Point::new(self.end.x - dx, self.end.y);
                path.curve_to(c1, c2, self.end);
            }
            PathStyle::Angular => {
                let mid_x = (self.start.x + self.end.x) / 2.0;
                path.line_to(Point::new(mid_x, self.start.y));
                path.line_to(Point::new(mid_x, self.end.y));
                path.line_to(self.end);
            }
        }
        path
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ElementStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.start = affine * self.start;
        self.end = affine * self.end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_creation() {
        let line = Connector::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(!line.arrow_start);
        assert!(!line.arrow_end);
        assert!((line.length() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_arrow_creation() {
        let arrow = Connector::arrow(Point::new(0.0, 0.0), Point::new(0.0, 50.0));
        assert!(arrow.arrow_end);
        let dir = arrow.direction();
        assert!((dir.y - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_midpoint() {
        let line = Connector::line(Point::new(0.0, 0.0), Point::new(10.0, 20.0));
        let mid = line.midpoint();
        assert!((mid.x - 5.0).abs() < f64::EPSILON);
        assert!((mid.y - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let line = Connector::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(line.hit_test(Point::new(50.0, 2.0), 2.0));
        assert!(!line.hit_test(Point::new(50.0, 20.0), 2.0));
    }

    #[test]
    fn test_bindings_default_unset() {
        let line = Connector::line(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        assert!(line.start_binding.is_none());
        assert!(line.end_binding.is_none());
    }
}
