//! Hit testing and bounds in pixel space.
//!
//! All functions take normalized elements plus the current canvas size and
//! degrade to "no match" on bad input instead of failing.

use kurbo::{Point, Rect, Size};

use crate::coords::to_pixel;
use crate::elements::{DrawingElement, ElementCollection, ElementId, TextLabel};

/// Default pick distance around arrow paths, in pixels.
pub const ARROW_HIT_TOLERANCE: f64 = 6.0;

/// Supplies the pixel size of a text label.
pub trait TextMeasure {
    fn measure(&self, label: &TextLabel) -> Size;
}

/// Character-count estimate, used when no font metrics are available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateTextMeasure;

impl TextMeasure for ApproximateTextMeasure {
    fn measure(&self, label: &TextLabel) -> Size {
        label.approximate_size()
    }
}

/// Distance from a point to a line segment.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + t * seg;
    point.distance(proj)
}

/// Minimum distance from a point to a polyline. A single-point polyline is
/// treated as a dot.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Hit test tuning: arrow pick tolerance and text metrics.
#[derive(Clone, Copy)]
pub struct HitOptions<'a> {
    pub arrow_tolerance: f64,
    pub text_measure: &'a dyn TextMeasure,
}

impl Default for HitOptions<'_> {
    fn default() -> Self {
        Self {
            arrow_tolerance: ARROW_HIT_TOLERANCE,
            text_measure: &ApproximateTextMeasure,
        }
    }
}

impl std::fmt::Debug for HitOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitOptions")
            .field("arrow_tolerance", &self.arrow_tolerance)
            .finish_non_exhaustive()
    }
}

/// Whether `point` (canvas-local pixels) touches `element`.
pub fn hit_test(element: &DrawingElement, point: Point, canvas_size: Size) -> bool {
    hit_test_with(element, point, canvas_size, &HitOptions::default())
}

pub fn hit_test_with(
    element: &DrawingElement,
    point: Point,
    canvas_size: Size,
    options: &HitOptions<'_>,
) -> bool {
    if !point.is_finite() {
        return false;
    }
    match element {
        DrawingElement::Marker(m) => {
            let center = to_pixel(m.position, canvas_size);
            center.distance(point) <= m.radius
        }
        DrawingElement::Arrow(a) => {
            let pixels: Vec<Point> = a.path.iter().map(|p| to_pixel(*p, canvas_size)).collect();
            point_to_polyline_dist(point, &pixels) <= options.arrow_tolerance
        }
        DrawingElement::TextLabel(t) => text_rect(t, canvas_size, options.text_measure)
            .is_some_and(|r| contains_inclusive(r, point)),
    }
}

/// Like `Rect::contains`, but the far edges count as inside.
fn contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

fn text_rect(label: &TextLabel, canvas_size: Size, measure: &dyn TextMeasure) -> Option<Rect> {
    let size = measure.measure(label);
    if !(size.width.is_finite() && size.height.is_finite()) || size.is_zero_area() {
        return None;
    }
    Some(Rect::from_origin_size(to_pixel(label.position, canvas_size), size))
}

/// Pixel-space bounding box, or `None` for elements with no visual extent.
pub fn bounding_rect(element: &DrawingElement, canvas_size: Size) -> Option<Rect> {
    bounding_rect_with(element, canvas_size, &ApproximateTextMeasure)
}

pub fn bounding_rect_with(
    element: &DrawingElement,
    canvas_size: Size,
    measure: &dyn TextMeasure,
) -> Option<Rect> {
    match element {
        DrawingElement::Marker(m) => {
            if m.radius <= 0.0 || !m.radius.is_finite() {
                return None;
            }
            let center = to_pixel(m.position, canvas_size);
            Some(Rect::from_center_size(center, Size::new(m.radius * 2.0, m.radius * 2.0)))
        }
        DrawingElement::Arrow(a) => {
            let mut points = a.path.iter().map(|p| to_pixel(*p, canvas_size));
            let first = points.next()?;
            Some(points.fold(Rect::from_points(first, first), |r, p| r.union_pt(p)))
        }
        DrawingElement::TextLabel(t) => text_rect(t, canvas_size, measure),
    }
}

/// Topmost element under `point`. Later elements win.
pub fn topmost_hit(
    elements: &ElementCollection,
    point: Point,
    canvas_size: Size,
    options: &HitOptions<'_>,
) -> Option<ElementId> {
    elements
        .iter()
        .rev()
        .find(|e| hit_test_with(e, point, canvas_size, options))
        .map(|e| e.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Arrow, ArrowKind, Marker, MarkerKind, RinkColor};
    use kurbo::Vec2;

    const CANVAS: Size = Size::new(800.0, 400.0);

    fn marker_at(x: f64, y: f64) -> DrawingElement {
        Marker::new(MarkerKind::Defense, Point::new(x, y), RinkColor::black()).into()
    }

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-9);
        assert!((point_to_segment_dist(Point::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-9);
        assert!((point_to_segment_dist(Point::new(2.0, 2.0), a, a) - 8f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_marker_hit_radius() {
        let marker = marker_at(0.5, 0.5);
        let center = Point::new(400.0, 200.0);
        assert!(hit_test(&marker, center, CANVAS));
        assert!(hit_test(&marker, center + Vec2::new(14.0, 0.0), CANVAS));
        assert!(!hit_test(&marker, center + Vec2::new(14.01, 0.0), CANVAS));
    }

    #[test]
    fn test_arrow_hit_tolerance() {
        let arrow = Arrow::new(ArrowKind::Pass, Point::new(0.0, 0.5), RinkColor::black())
            .append_point(Point::new(0.5, 0.5))
            .finalize()
            .unwrap();
        let arrow = DrawingElement::Arrow(arrow);
        assert!(hit_test(&arrow, Point::new(200.0, 205.0), CANVAS));
        assert!(hit_test(&arrow, Point::new(200.0, 206.0), CANVAS));
        assert!(!hit_test(&arrow, Point::new(200.0, 207.0), CANVAS));
        assert!(!hit_test(&arrow, Point::new(420.0, 200.0), CANVAS));
    }

    #[test]
    fn test_text_hit_uses_measured_box() {
        let label = TextLabel::new(Point::new(0.25, 0.25), "Go", 20.0, RinkColor::black());
        let element = DrawingElement::TextLabel(label);
        // Box spans x 200..224, y 100..124.
        assert!(hit_test(&element, Point::new(210.0, 110.0), CANVAS));
        assert!(hit_test(&element, Point::new(223.5, 123.5), CANVAS));
        assert!(!hit_test(&element, Point::new(230.0, 110.0), CANVAS));
    }

    #[test]
    fn test_non_finite_point_never_hits() {
        let marker = marker_at(0.5, 0.5);
        assert!(!hit_test(&marker, Point::new(f64::NAN, 200.0), CANVAS));
    }

    #[test]
    fn test_topmost_wins() {
        let below = marker_at(0.5, 0.5);
        let above = marker_at(0.505, 0.5);
        let collection: ElementCollection = vec![below, above.clone()].into();
        let hit = topmost_hit(&collection, Point::new(402.0, 200.0), CANVAS, &HitOptions::default());
        assert_eq!(hit, Some(above.id()));
    }

    #[test]
    fn test_bounding_rects() {
        let marker = marker_at(0.5, 0.5);
        assert_eq!(
            bounding_rect(&marker, CANVAS),
            Some(Rect::new(386.0, 186.0, 414.0, 214.0))
        );

        let arrow = Arrow::new(ArrowKind::Movement, Point::new(0.1, 0.1), RinkColor::black())
            .append_point(Point::new(0.3, 0.4))
            .append_point(Point::new(0.2, 0.2));
        assert_eq!(
            bounding_rect(&arrow.into(), CANVAS),
            Some(Rect::new(80.0, 40.0, 240.0, 160.0))
        );
    }

    #[test]
    fn test_custom_text_measure() {
        struct Fixed;
        impl TextMeasure for Fixed {
            fn measure(&self, _label: &TextLabel) -> Size {
                Size::new(100.0, 10.0)
            }
        }
        let label = TextLabel::new(Point::ZERO, "x", 12.0, RinkColor::black());
        let element = DrawingElement::TextLabel(label);
        let options = HitOptions {
            arrow_tolerance: ARROW_HIT_TOLERANCE,
            text_measure: &Fixed,
        };
        assert!(hit_test_with(&element, Point::new(90.0, 5.0), CANVAS, &options));
        assert!(!hit_test(&element, Point::new(90.0, 5.0), CANVAS));
    }
}
