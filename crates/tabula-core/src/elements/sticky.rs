//! Sticky note element.

use super::{default_true, ElementId, ElementStyle, ElementTrait, SerializableColor};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A sticky note with text content and voting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StickyNote {
    pub(crate) id: ElementId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the note.
    pub width: f64,
    /// Height of the note.
    pub height: f64,
    /// Note text.
    pub text: String,
    /// Display name of the author.
    #[serde(default)]
    pub author: String,
    /// Identifiers of users who voted for this note.
    #[serde(default)]
    pub voters: BTreeSet<String>,
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

impl StickyNote {
    /// Create a new sticky note.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        // Classic pale yellow fill
        let style = ElementStyle {
            fill_color: Some(SerializableColor::new(255, 242, 153, 255)),
            ..ElementStyle::default()
        };
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            text: String::new(),
            author: String::new(),
            voters: BTreeSet::new(),
            rotation: 0.0,
            z_index: 0,
            visible: true,
            locked: false,
            style,
        }
    }

    /// Create a sticky note from two opposite drag corners.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        Self::new(
            Point::new(min_x, min_y),
            (p2.x - p1.x).abs(),
            (p2.y - p1.y).abs(),
        )
    }

    /// Number of votes this note has received.
    pub fn votes(&self) -> usize {
        self.voters.len()
    }

    /// Toggle a user's vote. Returns true if the vote is now present.
    pub fn toggle_vote(&mut self, voter: &str) -> bool {
        if self.voters.remove(voter) {
            false
        } else {
            self.voters.insert(voter.to_string());
            true
        }
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
}

impl ElementTrait for StickyNote {
    fn id(&self) -> ElementId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        // Notes are always filled surfaces
        self.as_rect().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
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
        self.width *= coeffs[0].abs();
        self.height *= coeffs[3].abs();
    }
}
