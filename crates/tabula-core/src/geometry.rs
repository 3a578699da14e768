//! Pure geometry helpers: primitive point-set construction and path
//! serialization. Stateless; degenerate inputs (zero-size drags) are
//! filtered upstream by the interaction layer's drag threshold.

use crate::elements::PathPoint;
use kurbo::{BezPath, Point, Rect, Vec2};
use std::fmt::Write;

/// Circle approximation constant: handle length as a fraction of the
/// radius for a quarter-circle cubic Bezier, 4/3 * (sqrt(2) - 1).
pub const KAPPA: f64 = 0.552_284_749_830_793_4;

/// Four axis-aligned corner points from two opposite drag corners,
/// clockwise from top-left.
pub fn rectangle_points(a: Point, b: Point) -> Vec<PathPoint> {
    let min_x = a.x.min(b.x);
    let min_y = a.y.min(b.y);
    let max_x = a.x.max(b.x);
    let max_y = a.y.max(b.y);
    vec![
        PathPoint::corner(Point::new(min_x, min_y)),
        PathPoint::corner(Point::new(max_x, min_y)),
        PathPoint::corner(Point::new(max_x, max_y)),
        PathPoint::corner(Point::new(min_x, max_y)),
    ]
}

/// Four anchor points approximating the ellipse inscribed in `rect`,
/// clockwise from the top anchor, with symmetric Bezier handles of
/// length [`KAPPA`] times each radius.
pub fn ellipse_points(rect: Rect) -> Vec<PathPoint> {
    let center = rect.center();
    let rx = rect.width() / 2.0;
    let ry = rect.height() / 2.0;
    let hx = KAPPA * rx;
    let hy = KAPPA * ry;
    vec![
        PathPoint::smooth(
            Point::new(center.x, center.y - ry),
            Vec2::new(-hx, 0.0),
            Vec2::new(hx, 0.0),
        ),
        PathPoint::smooth(
            Point::new(center.x + rx, center.y),
            Vec2::new(0.0, -hy),
            Vec2::new(0.0, hy),
        ),
        PathPoint::smooth(
            Point::new(center.x, center.y + ry),
            Vec2::new(hx, 0.0),
            Vec2::new(-hx, 0.0),
        ),
        PathPoint::smooth(
            Point::new(center.x - rx, center.y),
            Vec2::new(0.0, hy),
            Vec2::new(0.0, -hy),
        ),
    ]
}

/// Two handle-less points for a straight segment.
pub fn line_points(a: Point, b: Point) -> Vec<PathPoint> {
    vec![PathPoint::corner(a), PathPoint::corner(b)]
}

/// Whether the segment from `prev` to `curr` is a cubic curve: both the
/// outgoing and the incoming handle must be present.
fn curve_controls(prev: &PathPoint, curr: &PathPoint) -> Option<(Point, Point)> {
    match (prev.handle_out, curr.handle_in) {
        (Some(out), Some(into)) => Some((prev.position + out, curr.position + into)),
        _ => None,
    }
}

/// Serialize an anchor-point list to SVG path data.
///
/// Emits a move to the first point, then per point either a line or a
/// cubic curve (when the surrounding pair of handles is present), and a
/// close instruction for closed paths. The wrap-around segment of a
/// closed path honors handles the same way.
pub fn svg_path_data(points: &[PathPoint], closed: bool) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };

    let mut data = String::new();
    let _ = write!(data, "M {} {}", first.position.x, first.position.y);

    for pair in points.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        match curve_controls(prev, curr) {
            Some((c1, c2)) => {
                let _ = write!(
                    data,
                    " C {} {} {} {} {} {}",
                    c1.x, c1.y, c2.x, c2.y, curr.position.x, curr.position.y
                );
            }
            None => {
                let _ = write!(data, " L {} {}", curr.position.x, curr.position.y);
            }
        }
    }

    if closed {
        if let Some(last) = points.last() {
            if points.len() > 1 {
                if let Some((c1, c2)) = curve_controls(last, first) {
                    let _ = write!(
                        data,
                        " C {} {} {} {} {} {}",
                        c1.x, c1.y, c2.x, c2.y, first.position.x, first.position.y
                    );
                }
            }
        }
        data.push_str(" Z");
    }

    data
}

/// Build a kurbo path from an anchor-point list, mirroring the segment
/// rules of [`svg_path_data`].
pub fn path_to_bez(points: &[PathPoint], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };

    path.move_to(first.position);

    for pair in points.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        match curve_controls(prev, curr) {
            Some((c1, c2)) => path.curve_to(c1, c2, curr.position),
            None => path.line_to(curr.position),
        }
    }

    if closed {
        if let Some(last) = points.last() {
            if points.len() > 1 {
                if let Some((c1, c2)) = curve_controls(last, first) {
                    path.curve_to(c1, c2, first.position);
                }
            }
        }
        path.close_path();
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_points() {
        let pts = rectangle_points(Point::new(10.0, 10.0), Point::new(110.0, 60.0));
        let positions: Vec<(f64, f64)> = pts.iter().map(|p| (p.position.x, p.position.y)).collect();
        assert_eq!(
            positions,
            vec![(10.0, 10.0), (110.0, 10.0), (110.0, 60.0), (10.0, 60.0)]
        );
        assert!(pts.iter().all(|p| p.handle_in.is_none() && p.handle_out.is_none()));
    }

    #[test]
    fn test_rectangle_points_normalizes_corners() {
        // Dragging up-left gives the same corners
        let pts = rectangle_points(Point::new(110.0, 60.0), Point::new(10.0, 10.0));
        assert_eq!(pts[0].position, Point::new(10.0, 10.0));
        assert_eq!(pts[2].position, Point::new(110.0, 60.0));
    }

    #[test]
    fn test_ellipse_points() {
        let pts = ellipse_points(Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(pts.len(), 4);
        // Top anchor at (100, 0) with horizontal handles of KAPPA * rx
        assert_eq!(pts[0].position, Point::new(100.0, 0.0));
        let out = pts[0].handle_out.unwrap();
        assert!((out.x - KAPPA * 100.0).abs() < 1e-9);
        assert!(out.y.abs() < 1e-9);
        // Right anchor handles scale with ry
        let right_in = pts[1].handle_in.unwrap();
        assert!((right_in.y + KAPPA * 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_svg_line() {
        let pts = line_points(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert_eq!(svg_path_data(&pts, false), "M 0 0 L 10 0");
    }

    #[test]
    fn test_svg_closed_polygon() {
        let pts = rectangle_points(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let data = svg_path_data(&pts, true);
        assert!(data.starts_with("M 0 0 L 10 0 L 10 10 L 0 10"));
        assert!(data.ends_with(" Z"));
        assert!(!data.contains('C'));
    }

    #[test]
    fn test_svg_curve_segment() {
        let pts = vec![
            PathPoint::smooth(Point::new(0.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)),
            PathPoint::smooth(Point::new(30.0, 30.0), Vec2::new(0.0, -10.0), Vec2::new(0.0, 10.0)),
        ];
        assert_eq!(svg_path_data(&pts, false), "M 0 0 C 10 0 30 20 30 30");
    }

    #[test]
    fn test_svg_mixed_segments() {
        // Missing in-handle on the second point makes the segment straight
        let pts = vec![
            PathPoint::smooth(Point::new(0.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)),
            PathPoint::corner(Point::new(30.0, 30.0)),
        ];
        assert_eq!(svg_path_data(&pts, false), "M 0 0 L 30 30");
    }

    #[test]
    fn test_svg_closed_curve_wraps() {
        let pts = ellipse_points(Rect::new(0.0, 0.0, 100.0, 100.0));
        let data = svg_path_data(&pts, true);
        // Three inner segments plus the wrap-around segment, all curves
        assert_eq!(data.matches('C').count(), 4);
        assert!(data.ends_with(" Z"));
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(svg_path_data(&[], false), "");
        assert_eq!(path_to_bez(&[], true).elements().len(), 0);
    }

    #[test]
    fn test_bez_matches_svg_segment_rules() {
        let pts = ellipse_points(Rect::new(0.0, 0.0, 100.0, 100.0));
        let bez = path_to_bez(&pts, true);
        // MoveTo + 4 CurveTo + ClosePath
        assert_eq!(bez.elements().len(), 6);
    }
}
