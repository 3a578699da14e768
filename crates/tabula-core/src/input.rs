//! Pointer and keyboard input state shared by the editor.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// The platform command modifier: Ctrl, or Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks pointer state across events.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Current pointer position.
    pub pointer_position: Point,
    /// Currently pressed mouse buttons.
    pressed_buttons: HashSet<MouseButton>,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
    /// Whether the pointer is currently dragging.
    pub is_dragging: bool,
    /// Start position of the current drag operation.
    pub drag_start: Option<Point>,
    /// Last click time for double-click detection.
    last_click_time: Option<Instant>,
    /// Last click position for double-click detection.
    last_click_position: Option<Point>,
    /// Whether the most recent press was a double-click.
    double_click_detected: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pointer_position: Point::ZERO,
            pressed_buttons: HashSet::new(),
            modifiers: Modifiers::default(),
            is_dragging: false,
            drag_start: None,
            last_click_time: None,
            last_click_position: None,
            double_click_detected: false,
        }
    }
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.insert(button);

                if button == MouseButton::Left {
                    self.double_click_detected = self.detect_double_click(position);
                    if !self.is_dragging {
                        self.is_dragging = true;
                        self.drag_start = Some(position);
                    }
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.remove(&button);
                if button == MouseButton::Left {
                    self.is_dragging = false;
                    self.drag_start = None;
                }
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
            }
        }
    }

    fn detect_double_click(&mut self, position: Point) -> bool {
        let now = Instant::now();
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position) {
            let elapsed = now.duration_since(last_time).as_millis();
            let distance = (position - last_pos).hypot();
            if elapsed < DOUBLE_CLICK_TIME_MS && distance < DOUBLE_CLICK_DISTANCE {
                // Reset so a triple-click isn't seen as another double
                self.last_click_time = None;
                self.last_click_position = None;
                return true;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
        false
    }

    /// Update modifier keys state.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Check if a button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Whether the most recent left press was a double-click.
    pub fn is_double_click(&self) -> bool {
        self.double_click_detected
    }

    /// Get the drag delta from start position, if dragging.
    pub fn drag_delta(&self) -> Option<Vec2> {
        self.drag_start.map(|start| self.pointer_position - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_press_release() {
        let mut input = InputState::new();

        input.handle_pointer_event(PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        assert!(input.is_button_pressed(MouseButton::Left));
        assert!(!input.is_button_pressed(MouseButton::Right));

        input.handle_pointer_event(PointerEvent::Up {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        assert!(!input.is_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_drag_tracking() {
        let mut input = InputState::new();

        input.handle_pointer_event(PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        assert!(input.is_dragging);

        input.handle_pointer_event(PointerEvent::Move {
            position: Point::new(150.0, 120.0),
        });

        let delta = input.drag_delta().unwrap();
        assert!((delta.x - 50.0).abs() < f64::EPSILON);
        assert!((delta.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::new();
        let pos = Point::new(100.0, 100.0);

        input.handle_pointer_event(PointerEvent::Down {
            position: pos,
            button: MouseButton::Left,
        });
        assert!(!input.is_double_click());
        input.handle_pointer_event(PointerEvent::Up {
            position: pos,
            button: MouseButton::Left,
        });

        input.handle_pointer_event(PointerEvent::Down {
            position: pos,
            button: MouseButton::Left,
        });
        assert!(input.is_double_click());
    }

    #[test]
    fn test_double_click_too_far() {
        let mut input = InputState::new();

        input.handle_pointer_event(PointerEvent::Down {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });
        input.handle_pointer_event(PointerEvent::Up {
            position: Point::new(100.0, 100.0),
            button: MouseButton::Left,
        });

        input.handle_pointer_event(PointerEvent::Down {
            position: Point::new(200.0, 200.0),
            button: MouseButton::Left,
        });
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_command_modifier() {
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        let meta = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        assert!(ctrl.command());
        assert!(meta.command());
        assert!(!Modifiers::default().command());
    }
}
