//! Vector path element: anchor points with optional Bezier handles.

use super::{default_true, ElementId, ElementStyle, ElementTrait};
use crate::geometry::{ellipse_points, line_points, path_to_bez, rectangle_points, svg_path_data};
use kurbo::{Affine, BezPath, ParamCurveNearest, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An anchor point on a vector path. Handles are offsets from the anchor;
/// a missing handle makes the adjacent segment straight on that side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Anchor position.
    pub position: Point,
    /// Incoming Bezier control offset.
    #[serde(default)]
    pub handle_in: Option<Vec2>,
    /// Outgoing Bezier control offset.
    #[serde(default)]
    pub handle_out: Option<Vec2>,
    /// Vertex rounding radius, applied by the host editor (0 = sharp).
    #[serde(default)]
    pub corner_radius: f64,
}

impl PathPoint {
    /// Create a corner point with no handles.
    pub fn corner(position: Point) -> Self {
        Self {
            position,
            handle_in: None,
            handle_out: None,
            corner_radius: 0.0,
        }
    }

    /// Create a smooth point with symmetric handles.
    pub fn smooth(position: Point, handle_in: Vec2, handle_out: Vec2) -> Self {
        Self {
            position,
            handle_in: Some(handle_in),
            handle_out: Some(handle_out),
            corner_radius: 0.0,
        }
    }
}

/// An editable vector path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPath {
    pub(crate) id: ElementId,
    /// Ordered anchor points.
    pub points: Vec<PathPoint>,
    /// Whether the last point connects back to the first.
    #[serde(default)]
    pub closed: bool,
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

impl VectorPath {
    /// Create a path from existing points.
    pub fn from_points(points: Vec<PathPoint>, closed: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            closed,
            z_index: 0,
            visible: true,
            locked: false,
            style: ElementStyle::default(),
        }
    }

    /// Closed rectangle path from two opposite drag corners.
    pub fn rectangle(a: Point, b: Point) -> Self {
        Self::from_points(rectangle_points(a, b), true)
    }

    /// Closed ellipse approximation inscribed in a bounding box.
    pub fn ellipse(rect: Rect) -> Self {
        Self::from_points(ellipse_points(rect), true)
    }

    /// Open two-point segment.
    pub fn line(a: Point, b: Point) -> Self {
        Self::from_points(line_points(a, b), false)
    }

    /// Append an anchor point.
    pub fn push_point(&mut self, point: PathPoint) {
        self.points.push(point);
    }

    /// First anchor position, if any.
    pub fn first_point(&self) -> Option<Point> {
        self.points.first().map(|p| p.position)
    }

    /// Get the number of anchor points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as a kurbo path.
    pub fn as_bez_path(&self) -> BezPath {
        path_to_bez(&self.points, self.closed)
    }

    /// Serialize to SVG path data ("M ... L ... C ... Z").
    pub fn to_svg(&self) -> String {
        svg_path_data(&self.points, self.closed)
    }
}

impl ElementTrait for VectorPath {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }
        self.as_bez_path().bounding_box()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.points.is_empty() {
            return false;
        }
        let bez = self.as_bez_path();
        if self.closed && self.style.fill_color.is_some() && bez.contains(point) {
            return true;
        }
        if self.points.len() < 2 {
            let anchor = self.points[0].position;
            return (point - anchor).hypot() <= tolerance;
        }
        // Outline: nearest distance to any curve segment
        let tol = tolerance + self.style.stroke_width / 2.0;
        bez.segments()
            .any(|seg| seg.nearest(point, 0.1).distance_sq <= tol * tol)
    }

    fn to_path(&self) -> BezPath {
        self.as_bez_path()
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ElementStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        // Handles are offsets, so they only see the linear part
        let coeffs = affine.as_coeffs();
        let linear = |v: Vec2| Vec2::new(coeffs[0] * v.x + coeffs[2] * v.y, coeffs[1] * v.x + coeffs[3] * v.y);
        for point in &mut self.points {
            point.position = affine * point.position;
            point.handle_in = point.handle_in.map(linear);
            point.handle_out = point.handle_out.map(linear);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> VectorPath {
        VectorPath::from_points(
            vec![
                PathPoint::corner(Point::new(0.0, 0.0)),
                PathPoint::corner(Point::new(100.0, 0.0)),
                PathPoint::corner(Point::new(50.0, 80.0)),
            ],
            true,
        )
    }

    #[test]
    fn test_bounds() {
        let path = triangle();
        let bounds = path.bounds();
        assert!((bounds.x1 - 100.0).abs() < 1e-9);
        assert!((bounds.y1 - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_outline_hit() {
        let path = triangle();
        // On the bottom edge
        assert!(path.hit_test(Point::new(50.0, 0.0), 2.0));
        // Interior of an unfilled path misses
        assert!(!path.hit_test(Point::new(50.0, 30.0), 2.0));
    }

    #[test]
    fn test_filled_hit() {
        let mut path = triangle();
        path.style.fill_color = Some(super::super::SerializableColor::white());
        assert!(path.hit_test(Point::new(50.0, 30.0), 0.0));
        assert!(!path.hit_test(Point::new(200.0, 30.0), 0.0));
    }

    #[test]
    fn test_translate_keeps_handles() {
        let mut path = VectorPath::from_points(
            vec![
                PathPoint::smooth(Point::new(0.0, 0.0), Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0)),
                PathPoint::corner(Point::new(50.0, 0.0)),
            ],
            false,
        );
        path.transform(Affine::translate(Vec2::new(10.0, 10.0)));
        assert_eq!(path.points[0].position, Point::new(10.0, 10.0));
        // Offsets unchanged under pure translation
        assert_eq!(path.points[0].handle_out, Some(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_primitive_constructors() {
        let rect = VectorPath::rectangle(Point::new(10.0, 10.0), Point::new(110.0, 60.0));
        assert!(rect.closed);
        assert_eq!(rect.len(), 4);
        assert_eq!(rect.to_svg(), "M 10 10 L 110 10 L 110 60 L 10 60 Z");

        let ellipse = VectorPath::ellipse(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(ellipse.closed);
        assert!(ellipse.points.iter().all(|p| p.handle_in.is_some()));

        let line = VectorPath::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!(!line.closed);
        assert_eq!(line.len(), 2);
    }

    #[test]
    fn test_scale_scales_handles() {
        let mut path = VectorPath::from_points(
            vec![PathPoint::smooth(
                Point::new(10.0, 0.0),
                Vec2::new(-5.0, 0.0),
                Vec2::new(5.0, 0.0),
            )],
            false,
        );
        path.transform(Affine::scale(2.0));
        assert_eq!(path.points[0].position, Point::new(20.0, 0.0));
        assert_eq!(path.points[0].handle_out, Some(Vec2::new(10.0, 0.0)));
    }
}
