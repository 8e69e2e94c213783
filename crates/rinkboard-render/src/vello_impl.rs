//! Vello-based renderer implementation.

use std::sync::Arc;

use kurbo::{Affine, Point, Rect};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use rinkboard_core::RinkColor;
use rinkboard_core::elements::{CHAR_WIDTH_FACTOR, LINE_HEIGHT_FACTOR};
use vello::Scene;

use crate::background::BackgroundImage;
use crate::frame::{DrawCommand, Frame};
use crate::renderer::Renderer;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text rendering (system fonts, loaded once).
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
    /// Last uploaded background, keyed by its pixel buffer.
    background: Option<(Arc<Vec<u8>>, peniko::ImageData)>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            background: None,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn image_data(&mut self, image: &BackgroundImage) -> peniko::ImageData {
        if let Some((pixels, data)) = &self.background
            && Arc::ptr_eq(pixels, image.pixels())
        {
            return data.clone();
        }
        let data = peniko::ImageData {
            data: peniko::Blob::new(image.pixels().clone()),
            format: peniko::ImageFormat::Rgba8,
            width: image.width(),
            height: image.height(),
            alpha_type: peniko::ImageAlphaType::Alpha,
        };
        self.background = Some((image.pixels().clone(), data.clone()));
        data
    }

    fn render_background(&mut self, image: &BackgroundImage, rect: Rect) {
        let data = self.image_data(image);
        let transform = Affine::translate((rect.x0, rect.y0))
            * Affine::scale_non_uniform(
                rect.width() / image.width() as f64,
                rect.height() / image.height() as f64,
            );
        self.scene.draw_image(&data.into(), transform);
    }

    /// Lay out and draw text with Parley, top-left at `origin`.
    fn render_text(&mut self, origin: Point, text: &str, font_size: f64, color: RinkColor) {
        if text.is_empty() {
            return;
        }
        let brush = Brush::Solid(Color::from(color));

        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Single(
            parley::FontFamily::Generic(parley::GenericFamily::SansSerif),
        )));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let transform = Affine::translate((origin.x, origin.y));
        let mut glyph_count = 0;

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph { id: glyph.id, x: gx, y: gy }
                    })
                    .collect();
                glyph_count += glyphs.len();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(run.font())
                        .brush(&brush)
                        .hint(true)
                        .transform(transform)
                        .glyph_transform(glyph_xform)
                        .font_size(run.font_size())
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        // No usable system font: mark where the text would be.
        if glyph_count == 0 {
            let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(1).max(1);
            let lines = text.lines().count().max(1);
            let rect = Rect::from_origin_size(
                origin,
                (
                    longest as f64 * font_size * CHAR_WIDTH_FACTOR,
                    lines as f64 * font_size * LINE_HEIGHT_FACTOR,
                ),
            );
            let fallback = Color::from(color.with_alpha_factor(0.3));
            self.scene.fill(Fill::NonZero, Affine::IDENTITY, fallback, None, &rect);
        }
    }
}

impl Renderer for VelloRenderer {
    fn draw_frame(&mut self, frame: &Frame) {
        self.scene.reset();
        let bounds = Rect::from_origin_size(Point::ZERO, frame.size());

        for command in frame {
            match command {
                DrawCommand::Clear(color) => {
                    self.scene
                        .fill(Fill::NonZero, Affine::IDENTITY, Color::from(*color), None, &bounds);
                }
                DrawCommand::Background { image, rect } => self.render_background(image, *rect),
                DrawCommand::Fill { path, color } => {
                    self.scene
                        .fill(Fill::NonZero, Affine::IDENTITY, Color::from(*color), None, path);
                }
                DrawCommand::Stroke { path, style, color } => {
                    self.scene
                        .stroke(style, Affine::IDENTITY, Color::from(*color), None, path);
                }
                DrawCommand::Text {
                    origin,
                    text,
                    font_size,
                    color,
                } => self.render_text(*origin, text, *font_size, *color),
            }
        }
    }
}
