//! Conversions between screen pixels and normalized rink space.
//!
//! Normalized space is `0.0..=1.0` on both axes with the origin at the
//! top-left corner of the rink image. Element geometry is always stored
//! normalized; pixel values only exist for hit testing, smoothing and drawing.

use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::elements::clamp_normalized;

/// Which end of the rink a team is defending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefendingSide {
    /// Left end. Coordinates are used as stored.
    #[default]
    Home,
    /// Right end. Coordinates are mirrored horizontally.
    Away,
}

fn has_area(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

/// Map a screen point into normalized space relative to `canvas_rect`.
///
/// Out-of-bounds points are clamped to the rink edge. A rect without area maps
/// every point to the origin.
pub fn to_normalized(screen: Point, canvas_rect: Rect) -> Point {
    let size = canvas_rect.size();
    if !has_area(size) {
        return Point::ZERO;
    }
    clamp_normalized(Point::new(
        (screen.x - canvas_rect.x0) / size.width,
        (screen.y - canvas_rect.y0) / size.height,
    ))
}

/// Map a normalized point to canvas-local pixels. No clamping.
pub fn to_pixel(point: Point, canvas_size: Size) -> Point {
    Point::new(point.x * canvas_size.width, point.y * canvas_size.height)
}

/// Mirror a normalized point when the team defends the away end.
pub fn flip_if_defending_away(point: Point, side: DefendingSide) -> Point {
    match side {
        DefendingSide::Home => point,
        DefendingSide::Away => Point::new(1.0 - point.x, point.y),
    }
}

/// Canvas-local pixel points back to clamped normalized points.
pub fn path_to_normalized(points: &[Point], canvas_size: Size) -> Vec<Point> {
    let rect = Rect::from_origin_size(Point::ZERO, canvas_size);
    points.iter().map(|p| to_normalized(*p, rect)).collect()
}

/// Normalized points to canvas-local pixels.
pub fn path_to_pixels(points: &[Point], canvas_size: Size) -> Vec<Point> {
    points.iter().map(|p| to_pixel(*p, canvas_size)).collect()
}

/// Transform taking normalized space to canvas-local pixels.
pub fn pixel_transform(canvas_size: Size) -> Affine {
    Affine::scale_non_uniform(canvas_size.width, canvas_size.height)
}
