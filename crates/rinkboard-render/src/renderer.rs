//! Renderer trait and the pure frame builder.

use kurbo::{BezPath, Circle, Point, Rect, Shape, Size, Stroke, Vec2};
use rinkboard_core::coords::{path_to_pixels, to_pixel};
use rinkboard_core::elements::{CHAR_WIDTH_FACTOR, LINE_HEIGHT_FACTOR};
use rinkboard_core::geometry::{ApproximateTextMeasure, TextMeasure, bounding_rect_with};
use rinkboard_core::{
    Arrow, ArrowKind, Canvas, DrawingElement, ElementCollection, Marker, MarkerKind, RinkColor,
    SelectionSet, TextLabel,
};
use thiserror::Error;

use crate::background::RinkBackground;
use crate::frame::{DrawCommand, Frame};

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Opacity of the arrow still being drawn.
pub const PREVIEW_ALPHA: f64 = 0.5;
/// Arrow shaft width in pixels.
pub const ARROW_STROKE_WIDTH: f64 = 2.0;
/// Length of the arrowhead in pixels.
pub const ARROW_HEAD_SIZE: f64 = 12.0;
/// Dash pattern for pass arrows.
pub const PASS_DASHES: [f64; 2] = [8.0, 6.0];
/// Distance of each shoot line from the drawn path.
pub const SHOOT_OFFSET: f64 = 3.0;
/// Zigzag wavelength and amplitude for backward skating.
pub const ZIGZAG_STEP: f64 = 6.0;
pub const ZIGZAG_AMPLITUDE: f64 = 4.0;
/// Gap between an element and its selection outline.
pub const SELECTION_PADDING: f64 = 4.0;

/// Everything needed to draw one frame.
pub struct RenderContext<'a> {
    pub elements: &'a ElementCollection,
    pub selection: Option<&'a SelectionSet>,
    /// Arrow being drawn, kept outside the committed elements.
    pub in_progress: Option<DrawingElement>,
    /// Canvas size in pixels.
    pub canvas_size: Size,
    pub background: Option<&'a RinkBackground>,
    pub background_color: RinkColor,
    pub selection_color: RinkColor,
    pub text_measure: &'a dyn TextMeasure,
}

impl<'a> RenderContext<'a> {
    pub fn new(elements: &'a ElementCollection, canvas_size: Size) -> Self {
        Self {
            elements,
            selection: None,
            in_progress: None,
            canvas_size,
            background: None,
            background_color: RinkColor::new(250, 250, 250, 255),
            selection_color: RinkColor::new(59, 130, 246, 255),
            text_measure: &ApproximateTextMeasure,
        }
    }

    /// Context mirroring the controller's current state.
    pub fn from_canvas(canvas: &'a Canvas) -> Self {
        Self::new(canvas.elements(), canvas.canvas_size())
            .with_selection(canvas.selection())
            .with_in_progress(canvas.in_progress())
            .with_text_measure(canvas.text_measure().as_ref())
    }

    pub fn with_selection(mut self, selection: &'a SelectionSet) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_in_progress(mut self, element: Option<DrawingElement>) -> Self {
        self.in_progress = element;
        self
    }

    pub fn with_background(mut self, background: &'a RinkBackground) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_background_color(mut self, color: RinkColor) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_selection_color(mut self, color: RinkColor) -> Self {
        self.selection_color = color;
        self
    }

    pub fn with_text_measure(mut self, measure: &'a dyn TextMeasure) -> Self {
        self.text_measure = measure;
        self
    }
}

/// Trait for rendering backends.
///
/// Backends only consume [`Frame`]s, so every backend draws the same thing.
pub trait Renderer {
    /// Encode one frame into the backend's scene or command buffer.
    fn draw_frame(&mut self, frame: &Frame);

    /// Build and encode the frame for `ctx`.
    fn build_scene(&mut self, ctx: &RenderContext<'_>) {
        let frame = render(ctx);
        self.draw_frame(&frame);
    }
}

/// Turn board state into a display list. Pure: same context, same frame.
///
/// Paint order is background, committed elements in z-order, the in-progress
/// preview, then selection outlines.
pub fn render(ctx: &RenderContext<'_>) -> Frame {
    let size = ctx.canvas_size;
    let mut frame = Frame::new(size);
    frame.push(DrawCommand::Clear(ctx.background_color));

    if let Some(image) = ctx.background.and_then(RinkBackground::image) {
        frame.push(DrawCommand::Background {
            image: image.clone(),
            rect: Rect::from_origin_size(Point::ZERO, size),
        });
    }

    for element in ctx.elements {
        draw_element(&mut frame, element, size, 1.0);
        if let DrawingElement::TextLabel(label) = element
            && label.is_editing
        {
            draw_edit_box(&mut frame, element, ctx);
        }
    }

    if let Some(element) = &ctx.in_progress {
        draw_element(&mut frame, element, size, PREVIEW_ALPHA);
    }

    if let Some(selection) = ctx.selection {
        for element in ctx.elements.iter().filter(|e| selection.contains(e.id())) {
            draw_selection(&mut frame, element, ctx);
        }
    }

    frame
}

fn draw_element(frame: &mut Frame, element: &DrawingElement, size: Size, alpha: f64) {
    match element {
        DrawingElement::Marker(marker) => draw_marker(frame, marker, size, alpha),
        DrawingElement::Arrow(arrow) => draw_arrow(frame, arrow, size, alpha),
        DrawingElement::TextLabel(label) => draw_label(frame, label, size, alpha),
    }
}

fn draw_marker(frame: &mut Frame, marker: &Marker, size: Size, alpha: f64) {
    let center = to_pixel(marker.position, size);
    let r = marker.radius;
    let color = marker.color.with_alpha_factor(alpha);

    match marker.kind {
        MarkerKind::Puck => frame.fill(Circle::new(center, r).to_path(0.1), color),
        MarkerKind::Cone => {
            let mut path = BezPath::new();
            path.move_to(Point::new(center.x, center.y - r));
            path.line_to(Point::new(center.x + r, center.y + r));
            path.line_to(Point::new(center.x - r, center.y + r));
            path.close_path();
            frame.fill(path, color);
        }
        MarkerKind::Offense | MarkerKind::Defense | MarkerKind::Opponent | MarkerKind::Goalie => {
            let circle = Circle::new(center, r).to_path(0.1);
            frame.fill(circle.clone(), RinkColor::white().with_alpha_factor(alpha));
            frame.stroke(circle, Stroke::new(2.0), color);

            if let Some(glyph) = marker.kind.glyph() {
                let font_size = r * 1.1;
                let origin = Point::new(
                    center.x - font_size * CHAR_WIDTH_FACTOR / 2.0,
                    center.y - font_size * LINE_HEIGHT_FACTOR / 2.0,
                );
                frame.text(origin, glyph, font_size, color);
            }
        }
    }
}

fn draw_arrow(frame: &mut Frame, arrow: &Arrow, size: Size, alpha: f64) {
    let color = arrow.color.with_alpha_factor(alpha);
    let points = path_to_pixels(&arrow.path, size);

    let Some(&tip) = points.last() else {
        return;
    };
    let Some(&tail) = points.iter().rev().find(|p| p.distance(tip) > f64::EPSILON) else {
        // Nothing drawn yet beyond the press point.
        frame.fill(Circle::new(tip, ARROW_STROKE_WIDTH).to_path(0.1), color);
        return;
    };

    let style = Stroke::new(ARROW_STROKE_WIDTH);
    match arrow.kind {
        ArrowKind::Movement => frame.stroke(polyline(&points), style, color),
        ArrowKind::Pass => frame.stroke(
            polyline(&points),
            style.with_dashes(0.0, PASS_DASHES),
            color,
        ),
        ArrowKind::Shoot => {
            frame.stroke(polyline(&offset_polyline(&points, SHOOT_OFFSET)), style.clone(), color);
            frame.stroke(polyline(&offset_polyline(&points, -SHOOT_OFFSET)), style, color);
        }
        ArrowKind::Backward => frame.stroke(polyline(&zigzag(&points)), style, color),
    }

    frame.fill(arrow_head(tail, tip, ARROW_HEAD_SIZE), color);
}

fn draw_label(frame: &mut Frame, label: &TextLabel, size: Size, alpha: f64) {
    frame.text(
        to_pixel(label.position, size),
        label.label.clone(),
        label.font_size,
        label.color.with_alpha_factor(alpha),
    );
}

fn draw_selection(frame: &mut Frame, element: &DrawingElement, ctx: &RenderContext<'_>) {
    let Some(bounds) = bounding_rect_with(element, ctx.canvas_size, ctx.text_measure) else {
        return;
    };
    let outline = bounds.inflate(SELECTION_PADDING, SELECTION_PADDING).to_path(0.1);
    frame.stroke(
        outline,
        Stroke::new(1.5).with_dashes(0.0, [4.0, 4.0]),
        ctx.selection_color,
    );
}

fn draw_edit_box(frame: &mut Frame, element: &DrawingElement, ctx: &RenderContext<'_>) {
    let Some(bounds) = bounding_rect_with(element, ctx.canvas_size, ctx.text_measure) else {
        return;
    };
    let outline = bounds.inflate(2.0, 2.0).to_path(0.1);
    frame.stroke(outline, Stroke::new(1.0), ctx.selection_color);
}

fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
    }
    path
}

/// Unit normal of the path around `points[i]`, or zero where it has no direction.
fn normal_at(points: &[Point], i: usize) -> Vec2 {
    let prev = points[i.saturating_sub(1)];
    let next = points[(i + 1).min(points.len() - 1)];
    let dir = next - prev;
    let len = dir.hypot();
    if len < f64::EPSILON {
        return Vec2::ZERO;
    }
    Vec2::new(-dir.y / len, dir.x / len)
}

/// The path shifted sideways by `distance` pixels.
fn offset_polyline(points: &[Point], distance: f64) -> Vec<Point> {
    (0..points.len())
        .map(|i| points[i] + normal_at(points, i) * distance)
        .collect()
}

/// Sawtooth along the path, starting and ending on it.
fn zigzag(points: &[Point]) -> Vec<Point> {
    let mut out = Vec::with_capacity(points.len() * 4);
    let Some(&first) = points.first() else {
        return out;
    };
    out.push(first);

    let mut side = 1.0;
    let mut carried = 0.0;
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let seg = b - a;
        let len = seg.hypot();
        if len < f64::EPSILON {
            continue;
        }
        let dir = seg / len;
        let normal = Vec2::new(-dir.y, dir.x);

        let mut t = ZIGZAG_STEP - carried;
        while t < len {
            out.push(a + dir * t + normal * (ZIGZAG_AMPLITUDE * side));
            side = -side;
            t += ZIGZAG_STEP;
        }
        carried = len - (t - ZIGZAG_STEP);
    }

    if let Some(&last) = points.last() {
        out.push(last);
    }
    out
}

/// Filled triangle whose point sits on `tip`, aimed away from `tail`.
fn arrow_head(tail: Point, tip: Point, head_size: f64) -> BezPath {
    let mut path = BezPath::new();
    let delta = tip - tail;
    let len = delta.hypot();
    if len < f64::EPSILON {
        return path;
    }
    let dir = delta / len;
    let perp = Vec2::new(-dir.y, dir.x);

    let head_back = tip - dir * head_size;
    let left = head_back + perp * head_size * 0.5;
    let right = head_back - perp * head_size * 0.5;

    path.move_to(tip);
    path.line_to(left);
    path.line_to(right);
    path.close_path();
    path
}
