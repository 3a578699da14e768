//! Text element.

use super::{default_true, ElementId, ElementStyle, ElementTrait};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Mono,
    Hand,
}

/// Average glyph width as a fraction of font size, used for layout
/// estimation. Real text shaping belongs to the embedding renderer.
const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// A free-standing text element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    pub(crate) id: ElementId,
    /// Top-left position of the first line.
    pub position: Point,
    /// Text content (may contain newlines).
    pub content: String,
    /// Font size in world units.
    pub font_size: f64,
    /// Font family.
    #[serde(default)]
    pub font_family: FontFamily,
    /// Line height as a multiple of font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
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

fn default_line_height() -> f64 {
    1.25
}

impl TextBox {
    /// Create a new text element.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content,
            font_size: 20.0,
            font_family: FontFamily::default(),
            line_height: default_line_height(),
            rotation: 0.0,
            z_index: 0,
            visible: true,
            locked: false,
            style: ElementStyle::default(),
        }
    }

    /// Estimated size of the laid-out text.
    pub fn size(&self) -> (f64, f64) {
        let lines: Vec<&str> = self.content.lines().collect();
        let line_count = lines.len().max(1);
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = (longest as f64 * self.font_size * CHAR_WIDTH_FACTOR).max(self.font_size);
        let height = line_count as f64 * self.font_size * self.line_height;
        (width, height)
    }
}

impl ElementTrait for TextBox {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let (width, height) = self.size();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.bounds().to_path(0.1)
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ElementStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        let coeffs = affine.as_coeffs();
        self.font_size *= coeffs[0].abs().max(coeffs[3].abs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_creation() {
        let text = TextBox::new(Point::new(10.0, 10.0), "hello".to_string());
        assert_eq!(text.content, "hello");
        assert!((text.font_size - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_multiline_size() {
        let single = TextBox::new(Point::ZERO, "hello".to_string());
        let double = TextBox::new(Point::ZERO, "hello\nworld!".to_string());
        let (w1, h1) = single.size();
        let (w2, h2) = double.size();
        assert!(h2 > h1);
        assert!(w2 > w1); // "world!" is longer than "hello"
    }

    #[test]
    fn test_hit_test() {
        let text = TextBox::new(Point::new(0.0, 0.0), "hello".to_string());
        assert!(text.hit_test(Point::new(5.0, 5.0), 0.0));
        assert!(!text.hit_test(Point::new(500.0, 5.0), 0.0));
    }
}
