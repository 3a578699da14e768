//! Tool system: the active input-interpretation mode and its drafts.

use crate::elements::{
    Connector, Element, ElementStyle, Freehand, PathPoint, Shape, ShapePrimitive, StickyNote,
    TextBox, VectorPath,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Minimum pointer travel for a drag to commit an element. Anything
/// below is treated as a non-drag click and discarded.
pub const DRAG_THRESHOLD: f64 = 2.0;

/// Clicking within this distance of the first anchor closes a pen path.
pub const PEN_CLOSE_DISTANCE: f64 = 10.0;

/// Tolerance for freehand stroke simplification on commit.
const FREEHAND_SIMPLIFY_TOLERANCE: f64 = 0.5;

/// Available tools. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Rectangle,
    Ellipse,
    Line,
    Sticky,
    Text,
    Draw,
    Pen,
    Eraser,
    Comment,
}

impl ToolKind {
    /// Map a single-letter keyboard shortcut to a tool.
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key {
            "v" => Some(ToolKind::Select),
            "h" => Some(ToolKind::Pan),
            "r" => Some(ToolKind::Rectangle),
            "o" => Some(ToolKind::Ellipse),
            "l" => Some(ToolKind::Line),
            "s" => Some(ToolKind::Sticky),
            "t" => Some(ToolKind::Text),
            "d" => Some(ToolKind::Draw),
            "p" => Some(ToolKind::Pen),
            "e" => Some(ToolKind::Eraser),
            "c" => Some(ToolKind::Comment),
            _ => None,
        }
    }

    /// Whether this tool creates an element from a pointer drag.
    pub fn is_drag_tool(&self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle
                | ToolKind::Ellipse
                | ToolKind::Line
                | ToolKind::Sticky
                | ToolKind::Text
                | ToolKind::Draw
        )
    }
}

/// State of a drag interaction.
#[derive(Debug, Clone, Copy, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// Tool is actively being used (e.g., dragging out a shape).
    Active {
        /// Starting point of the interaction.
        start: Point,
        /// Current point of the interaction.
        current: Point,
    },
}

/// Result of a pen-tool click.
#[derive(Debug, Clone)]
pub enum PenAction {
    /// A new draft was started with its first anchor.
    Started,
    /// An anchor was appended to the draft.
    PointAdded,
    /// The draft was closed and committed.
    Committed(VectorPath),
}

/// Manages the current tool, its drag state, and in-progress drafts.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current drag state.
    pub state: ToolState,
    /// Accumulated points for freehand drawing.
    draw_points: Vec<Point>,
    /// Anchors of the in-progress pen path, if any.
    pen_points: Vec<PathPoint>,
    /// Style applied to newly created elements.
    pub current_style: ElementStyle,
    /// Corner radius for new rectangles (0 = sharp corners).
    pub corner_radius: f64,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            state: ToolState::default(),
            draw_points: Vec::new(),
            pen_points: Vec::new(),
            current_style: ElementStyle::default(),
            corner_radius: 0.0,
        }
    }
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. Switching tools clears any in-progress draft.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.cancel();
    }

    /// Begin a drag interaction.
    pub fn begin(&mut self, point: Point) {
        if self.current_tool == ToolKind::Draw {
            self.draw_points.clear();
            self.draw_points.push(point);
        }
        self.state = ToolState::Active {
            start: point,
            current: point,
        };
    }

    /// Update the current drag interaction.
    pub fn update(&mut self, point: Point) {
        if let ToolState::Active { current, .. } = &mut self.state {
            *current = point;
            if self.current_tool == ToolKind::Draw {
                self.draw_points.push(point);
            }
        }
    }

    /// End the current drag and return any created element. Drags shorter
    /// than [`DRAG_THRESHOLD`] are discarded.
    pub fn end(&mut self, point: Point) -> Option<Element> {
        let ToolState::Active { start, .. } = self.state else {
            return None;
        };
        self.state = ToolState::Idle;

        if (point - start).hypot() < DRAG_THRESHOLD {
            self.draw_points.clear();
            return None;
        }

        let element = self.create_element(start, point);
        self.draw_points.clear();
        element
    }

    /// Cancel any in-progress drag or draft.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
        self.draw_points.clear();
        self.pen_points.clear();
    }

    /// Check if a drag interaction is active.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// Get the preview element for the current drag, if any.
    pub fn preview_element(&self) -> Option<Element> {
        let ToolState::Active { start, current } = self.state else {
            return None;
        };
        self.create_element(start, current)
    }

    /// Handle a pen-tool click: start a draft, append an anchor, or —
    /// when the click lands within [`PEN_CLOSE_DISTANCE`] of the first
    /// anchor and the draft has more than 2 points — close and commit.
    pub fn pen_click(&mut self, point: Point) -> PenAction {
        if self.pen_points.is_empty() {
            self.pen_points.push(PathPoint::corner(point));
            return PenAction::Started;
        }

        let first = self.pen_points[0].position;
        if self.pen_points.len() > 2 && (point - first).hypot() <= PEN_CLOSE_DISTANCE {
            let points = std::mem::take(&mut self.pen_points);
            let mut path = VectorPath::from_points(points, true);
            path.style = self.current_style.clone();
            return PenAction::Committed(path);
        }

        self.pen_points.push(PathPoint::corner(point));
        PenAction::PointAdded
    }

    /// Commit the pen draft open on double-click. Drafts with fewer than
    /// 2 anchors are discarded instead.
    pub fn pen_finish(&mut self) -> Option<VectorPath> {
        if self.pen_points.len() < 2 {
            self.pen_points.clear();
            return None;
        }
        let points = std::mem::take(&mut self.pen_points);
        let mut path = VectorPath::from_points(points, false);
        path.style = self.current_style.clone();
        Some(path)
    }

    /// Check if a pen draft is in progress.
    pub fn has_pen_draft(&self) -> bool {
        !self.pen_points.is_empty()
    }

    /// Anchors of the in-progress pen draft (for preview rendering).
    pub fn pen_draft(&self) -> &[PathPoint] {
        &self.pen_points
    }

    /// Create an element from drag start and end points.
    fn create_element(&self, start: Point, end: Point) -> Option<Element> {
        let mut element = match self.current_tool {
            ToolKind::Rectangle => {
                let mut shape = Shape::from_corners(ShapePrimitive::Rectangle, start, end);
                shape.corner_radius = self.corner_radius;
                Some(Element::Shape(shape))
            }
            ToolKind::Ellipse => Some(Element::Shape(Shape::from_corners(
                ShapePrimitive::Ellipse,
                start,
                end,
            ))),
            ToolKind::Line => Some(Element::Connector(Connector::line(start, end))),
            ToolKind::Sticky => Some(Element::Sticky(StickyNote::from_corners(start, end))),
            ToolKind::Text => {
                // Text is created at the drag origin with empty content
                let origin = Point::new(start.x.min(end.x), start.y.min(end.y));
                Some(Element::Text(TextBox::new(origin, String::new())))
            }
            ToolKind::Draw => {
                if self.draw_points.len() >= 2 {
                    let mut freehand = Freehand::from_points(self.draw_points.clone());
                    freehand.simplify(FREEHAND_SIMPLIFY_TOLERANCE);
                    Some(Element::Freehand(freehand))
                } else {
                    None
                }
            }
            ToolKind::Select
            | ToolKind::Pan
            | ToolKind::Pen
            | ToolKind::Eraser
            | ToolKind::Comment => None,
        };

        if let Some(ref mut el) = element {
            let default_fill = el.style().fill_color;
            *el.style_mut() = self.current_style.clone();
            // Sticky notes keep their paper fill unless one was chosen
            if matches!(el, Element::Sticky(_)) && el.style().fill_color.is_none() {
                el.style_mut().fill_color = default_fill;
            }
        }
        element
    }
}
