//! Primitive shape element (rectangle, ellipse).

use super::{default_true, ElementId, ElementStyle, ElementTrait};
use kurbo::{Affine, BezPath, Ellipse as KurboEllipse, Point, Rect, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which primitive a [`Shape`] draws inside its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapePrimitive {
    /// Axis-aligned rectangle, optionally with rounded corners.
    #[default]
    Rectangle,
    /// Ellipse inscribed within the bounding box.
    Ellipse,
}

/// A primitive shape positioned by its bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ElementId,
    /// Primitive kind drawn in the bounding box.
    pub primitive: ShapePrimitive,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the bounding box.
    pub width: f64,
    /// Height of the bounding box.
    pub height: f64,
    /// Corner radius for rectangles (0 = sharp corners).
    #[serde(default)]
    pub corner_radius: f64,
    /// Rotation angle in radians (around center).
    #[serde(default)]
    pub rotation: f64,
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

impl Shape {
    /// Create a new shape.
    pub fn new(primitive: ShapePrimitive, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            primitive,
            position,
            width,
            height,
            corner_radius: 0.0,
            rotation: 0.0,
            z_index: 0,
            visible: true,
            locked: false,
            style: ElementStyle::default(),
        }
    }

    /// Create a rectangle.
    pub fn rectangle(position: Point, width: f64, height: f64) -> Self {
        Self::new(ShapePrimitive::Rectangle, position, width, height)
    }

    /// Create an ellipse from its bounding box origin and size.
    pub fn ellipse(position: Point, width: f64, height: f64) -> Self {
        Self::new(ShapePrimitive::Ellipse, position, width, height)
    }

    /// Create a shape from two opposite drag corners.
    pub fn from_corners(primitive: ShapePrimitive, p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let width = (p2.x - p1.x).abs();
        let height = (p2.y - p1.y).abs();
        Self::new(primitive, Point::new(min_x, min_y), width, height)
    }

    /// Get the bounding box as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point {
        self.as_rect().center()
    }

    fn hit_test_rect(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect();
        if self.style.fill_color.is_some() {
            // Filled: hit anywhere inside
            rect.inflate(tolerance, tolerance).contains(point)
        } else {
            // Outline only: hit on the border
            let pad = tolerance + self.style.stroke_width / 2.0;
            let outer = rect.inflate(pad, pad);
            let inner = rect.inflate(-pad, -pad);
            outer.contains(point) && !inner.contains(point)
        }
    }

    fn hit_test_ellipse(&self, point: Point, tolerance: f64) -> bool {
        let center = self.center();
        let rx = self.width / 2.0;
        let ry = self.height / 2.0;
        let half_sw = self.style.stroke_width / 2.0;
        let dx_outer = (point.x - center.x) / (rx + tolerance + half_sw);
        let dy_outer = (point.y - center.y) / (ry + tolerance + half_sw);
        if dx_outer * dx_outer + dy_outer * dy_outer > 1.0 {
            return false;
        }
        if self.style.fill_color.is_some() {
            return true;
        }
        // Outline only: reject if inside inner ellipse
        let inner_rx = (rx - tolerance - half_sw).max(0.0);
        let inner_ry = (ry - tolerance - half_sw).max(0.0);
        if inner_rx < f64::EPSILON || inner_ry < f64::EPSILON {
            return true;
        }
        let dx_inner = (point.x - center.x) / inner_rx;
        let dy_inner = (point.y - center.y) / inner_ry;
        dx_inner * dx_inner + dy_inner * dy_inner > 1.0
    }
}

impl ElementTrait for Shape {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self.primitive {
            ShapePrimitive::Rectangle => self.hit_test_rect(point, tolerance),
            ShapePrimitive::Ellipse => self.hit_test_ellipse(point, tolerance),
        }
    }

    fn to_path(&self) -> BezPath {
        match self.primitive {
            ShapePrimitive::Rectangle => {
                if self.corner_radius > 0.0 {
                    RoundedRect::from_rect(self.as_rect(), self.corner_radius).to_path(0.1)
                } else {
                    self.as_rect().to_path(0.1)
                }
            }
            ShapePrimitive::Ellipse => {
                let center = self.center();
                KurboEllipse::new(center, (self.width / 2.0, self.height / 2.0), 0.0).to_path(0.1)
            }
        }
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ElementStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        // Note: simplified transform that doesn't handle rotation/skew
        let coeffs = affine.as_coeffs();
        self.width *= coeffs[0].abs();
        self.height *= coeffs[3].abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Shape::rectangle(Point::new(10.0, 20.0), 100.0, 50.0);
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_corners() {
        let rect = Shape::from_corners(
            ShapePrimitive::Rectangle,
            Point::new(100.0, 100.0),
            Point::new(50.0, 50.0),
        );
        assert!((rect.position.x - 50.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 50.0).abs() < f64::EPSILON);
        assert!((rect.width - 50.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rect_hit_test() {
        let rect = Shape::rectangle(Point::new(0.0, 0.0), 100.0, 100.0);
        // Outline only: border hits, center misses
        assert!(rect.hit_test(Point::new(0.0, 50.0), 2.0));
        assert!(!rect.hit_test(Point::new(50.0, 50.0), 2.0));

        let mut filled = rect.clone();
        filled.style.fill_color = Some(super::super::SerializableColor::white());
        assert!(filled.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!filled.hit_test(Point::new(150.0, 50.0), 0.0));
    }

    #[test]
    fn test_ellipse_hit_test() {
        let ellipse = Shape::ellipse(Point::new(20.0, 30.0), 60.0, 40.0);
        // Center (50, 50), radii (30, 20); edge hits, center misses for outline
        assert!(ellipse.hit_test(Point::new(80.0, 50.0), 0.0));
        assert!(!ellipse.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!ellipse.hit_test(Point::new(95.0, 50.0), 0.0));
    }

    #[test]
    fn test_bounds() {
        let rect = Shape::rectangle(Point::new(10.0, 20.0), 100.0, 50.0);
        let bounds = rect.bounds();
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }
}
