//! Element definitions for the document model.

mod connector;
mod freehand;
mod path;
mod shape;
mod sticky;
mod text;

pub use connector::{Connector, PathStyle};
pub use freehand::Freehand;
pub use path::{PathPoint, VectorPath};
pub use shape::{Shape, ShapePrimitive};
pub use sticky::StickyNote;
pub use text::{FontFamily, TextBox};

use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

/// Stroke style for connectors and path outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Cycle to the next stroke style.
    pub fn next(self) -> Self {
        match self {
            StrokeStyle::Solid => StrokeStyle::Dashed,
            StrokeStyle::Dashed => StrokeStyle::Dotted,
            StrokeStyle::Dotted => StrokeStyle::Solid,
        }
    }
}

/// Style properties shared by all element kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Overall opacity (0.0 = fully transparent, 1.0 = fully opaque).
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

pub(crate) fn default_true() -> bool {
    true
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            opacity: 1.0,
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Common trait for all element kinds.
pub trait ElementTrait {
    /// Get the unique identifier.
    fn id(&self) -> ElementId;

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in world coordinates) hits this element.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ElementStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ElementStyle;

    /// Apply a transform to this element.
    fn transform(&mut self, affine: Affine);
}

/// Enum wrapper for all element kinds (for serialization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Element {
    Sticky(StickyNote),
    Shape(Shape),
    Text(TextBox),
    Connector(Connector),
    Freehand(Freehand),
    Path(VectorPath),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Sticky(e) => e.id(),
            Element::Shape(e) => e.id(),
            Element::Text(e) => e.id(),
            Element::Connector(e) => e.id(),
            Element::Freehand(e) => e.id(),
            Element::Path(e) => e.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Element::Sticky(e) => e.bounds(),
            Element::Shape(e) => e.bounds(),
            Element::Text(e) => e.bounds(),
            Element::Connector(e) => e.bounds(),
            Element::Freehand(e) => e.bounds(),
            Element::Path(e) => e.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Element::Sticky(e) => e.hit_test(point, tolerance),
            Element::Shape(e) => e.hit_test(point, tolerance),
            Element::Text(e) => e.hit_test(point, tolerance),
            Element::Connector(e) => e.hit_test(point, tolerance),
            Element::Freehand(e) => e.hit_test(point, tolerance),
            Element::Path(e) => e.hit_test(point, tolerance),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Element::Sticky(e) => e.to_path(),
            Element::Shape(e) => e.to_path(),
            Element::Text(e) => e.to_path(),
            Element::Connector(e) => e.to_path(),
            Element::Freehand(e) => e.to_path(),
            Element::Path(e) => e.to_path(),
        }
    }

    pub fn style(&self) -> &ElementStyle {
        match self {
            Element::Sticky(e) => e.style(),
            Element::Shape(e) => e.style(),
            Element::Text(e) => e.style(),
            Element::Connector(e) => e.style(),
            Element::Freehand(e) => e.style(),
            Element::Path(e) => e.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ElementStyle {
        match self {
            Element::Sticky(e) => e.style_mut(),
            Element::Shape(e) => e.style_mut(),
            Element::Text(e) => e.style_mut(),
            Element::Connector(e) => e.style_mut(),
            Element::Freehand(e) => e.style_mut(),
            Element::Path(e) => e.style_mut(),
        }
    }

    pub fn transform(&mut self, affine: Affine) {
        match self {
            Element::Sticky(e) => e.transform(affine),
            Element::Shape(e) => e.transform(affine),
            Element::Text(e) => e.transform(affine),
            Element::Connector(e) => e.transform(affine),
            Element::Freehand(e) => e.transform(affine),
            Element::Path(e) => e.transform(affine),
        }
    }

    /// Translate the element by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.transform(Affine::translate(delta));
    }

    /// Paint-order index. Lower values are drawn beneath higher values.
    pub fn z_index(&self) -> i64 {
        match self {
            Element::Sticky(e) => e.z_index,
            Element::Shape(e) => e.z_index,
            Element::Text(e) => e.z_index,
            Element::Connector(e) => e.z_index,
            Element::Freehand(e) => e.z_index,
            Element::Path(e) => e.z_index,
        }
    }

    pub fn set_z_index(&mut self, z: i64) {
        match self {
            Element::Sticky(e) => e.z_index = z,
            Element::Shape(e) => e.z_index = z,
            Element::Text(e) => e.z_index = z,
            Element::Connector(e) => e.z_index = z,
            Element::Freehand(e) => e.z_index = z,
            Element::Path(e) => e.z_index = z,
        }
    }

    pub fn visible(&self) -> bool {
        match self {
            Element::Sticky(e) => e.visible,
            Element::Shape(e) => e.visible,
            Element::Text(e) => e.visible,
            Element::Connector(e) => e.visible,
            Element::Freehand(e) => e.visible,
            Element::Path(e) => e.visible,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        match self {
            Element::Sticky(e) => e.visible = visible,
            Element::Shape(e) => e.visible = visible,
            Element::Text(e) => e.visible = visible,
            Element::Connector(e) => e.visible = visible,
            Element::Freehand(e) => e.visible = visible,
            Element::Path(e) => e.visible = visible,
        }
    }

    /// Locked elements reject pointer-driven geometry mutation.
    pub fn locked(&self) -> bool {
        match self {
            Element::Sticky(e) => e.locked,
            Element::Shape(e) => e.locked,
            Element::Text(e) => e.locked,
            Element::Connector(e) => e.locked,
            Element::Freehand(e) => e.locked,
            Element::Path(e) => e.locked,
        }
    }

    pub fn set_locked(&mut self, locked: bool) {
        match self {
            Element::Sticky(e) => e.locked = locked,
            Element::Shape(e) => e.locked = locked,
            Element::Text(e) => e.locked = locked,
            Element::Connector(e) => e.locked = locked,
            Element::Freehand(e) => e.locked = locked,
            Element::Path(e) => e.locked = locked,
        }
    }

    /// Get the rotation angle in radians (0 for kinds that don't rotate).
    pub fn rotation(&self) -> f64 {
        match self {
            Element::Sticky(e) => e.rotation,
            Element::Shape(e) => e.rotation,
            Element::Text(e) => e.rotation,
            _ => 0.0,
        }
    }

    /// Set the rotation angle in radians.
    pub fn set_rotation(&mut self, rotation: f64) {
        match self {
            Element::Sticky(e) => e.rotation = rotation,
            Element::Shape(e) => e.rotation = rotation,
            Element::Text(e) => e.rotation = rotation,
            _ => {}
        }
    }

    /// Check if this element kind supports rotation.
    pub fn supports_rotation(&self) -> bool {
        matches!(
            self,
            Element::Sticky(_) | Element::Shape(_) | Element::Text(_)
        )
    }

    /// Resize to an explicit width/height. Returns false for kinds without
    /// a size box (connectors, freehand strokes, vector paths).
    pub fn set_size(&mut self, width: f64, height: f64) -> bool {
        match self {
            Element::Sticky(e) => {
                e.width = width;
                e.height = height;
                true
            }
            Element::Shape(e) => {
                e.width = width;
                e.height = height;
                true
            }
            _ => false,
        }
    }

    /// Regenerate the element's ID with a new unique identifier.
    /// Used when duplicating or pasting elements to keep IDs unique.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Element::Sticky(e) => e.id = new_id,
            Element::Shape(e) => e.id = new_id,
            Element::Text(e) => e.id = new_id,
            Element::Connector(e) => e.id = new_id,
            Element::Freehand(e) => e.id = new_id,
            Element::Path(e) => e.id = new_id,
        }
    }

    /// Check if this element is a vector path.
    pub fn is_path(&self) -> bool {
        matches!(self, Element::Path(_))
    }

    /// Get the vector path if this element is one.
    pub fn as_path(&self) -> Option<&VectorPath> {
        match self {
            Element::Path(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_distance() {
        let d = point_to_segment_dist(
            Point::new(5.0, 5.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_segment_distance_past_endpoint() {
        let d = point_to_segment_dist(
            Point::new(13.0, 4.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_element_common_flags() {
        let mut el = Element::Shape(Shape::rectangle(Point::new(0.0, 0.0), 10.0, 10.0));
        assert!(el.visible());
        assert!(!el.locked());

        el.set_locked(true);
        assert!(el.locked());
        el.set_visible(false);
        assert!(!el.visible());
    }

    #[test]
    fn test_regenerate_id() {
        let mut el = Element::Shape(Shape::rectangle(Point::new(0.0, 0.0), 10.0, 10.0));
        let old = el.id();
        el.regenerate_id();
        assert_ne!(old, el.id());
    }

    #[test]
    fn test_translate() {
        let mut el = Element::Shape(Shape::rectangle(Point::new(0.0, 0.0), 10.0, 10.0));
        el.translate(Vec2::new(5.0, 7.0));
        let bounds = el.bounds();
        assert!((bounds.x0 - 5.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 7.0).abs() < f64::EPSILON);
    }
}
