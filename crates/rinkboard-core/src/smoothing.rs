//! Path smoothing for captured arrows.
//!
//! Two passes, both in pixel space: a cheap distance filter while the pointer
//! moves, and a Ramer-Douglas-Peucker simplification once on release.

use kurbo::Point;

/// Recommended capture-time minimum spacing in pixels.
pub const DEFAULT_MIN_POINT_DISTANCE: f64 = 8.0;
/// Recommended release-time simplification tolerance in pixels.
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 2.0;

/// Append `new_point` unless it is closer than `min_distance` to the last
/// point of `path`.
pub fn add_point_to_path(mut path: Vec<Point>, new_point: Point, min_distance: f64) -> Vec<Point> {
    if !new_point.is_finite() {
        return path;
    }
    let keep = match path.last() {
        Some(last) => last.distance(new_point) >= min_distance,
        None => true,
    };
    if keep {
        path.push(new_point);
    }
    path
}

/// Simplify a polyline with the Ramer-Douglas-Peucker algorithm.
///
/// First and last points are always kept. Paths with fewer than three points
/// are returned as-is.
pub fn simplify_path(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_index = 0;

    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance(*point, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }

    if max_dist > tolerance {
        let mut left = simplify_path(&points[..=max_index], tolerance);
        let right = simplify_path(&points[max_index..], tolerance);

        // Junction point appears in both halves.
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Distance from `point` to the infinite line through `line_start` and
/// `line_end`. Falls back to point distance when the line is degenerate.
fn perpendicular_distance(point: Point, line_start: Point, line_end: Point) -> f64 {
    let dx = line_end.x - line_start.x;
    let dy = line_end.y - line_start.y;

    let line_len_sq = dx * dx + dy * dy;
    if line_len_sq < f64::EPSILON {
        return point.distance(line_start);
    }

    let area2 = ((point.x - line_start.x) * dy - (point.y - line_start.y) * dx).abs();
    area2 / line_len_sq.sqrt()
}
