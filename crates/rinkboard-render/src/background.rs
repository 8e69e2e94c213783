//! Rink background image.

use std::fmt;
use std::sync::Arc;

use crate::renderer::{RenderResult, RendererError};

/// Decoded RGBA8 pixels, shared between frames.
#[derive(Clone, PartialEq, Eq)]
pub struct BackgroundImage {
    width: u32,
    height: u32,
    pixels: Arc<Vec<u8>>,
}

impl BackgroundImage {
    /// Wrap raw RGBA8 pixels. Fails when the buffer does not match the size.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> RenderResult<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(RendererError::Decode(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: Arc::new(pixels),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &Arc<Vec<u8>> {
        &self.pixels
    }
}

impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// What sits under the drawing layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RinkBackground {
    /// Plain background color only.
    #[default]
    Blank,
    Image(BackgroundImage),
}

impl RinkBackground {
    /// Decode a PNG, JPEG or WebP rink image.
    pub fn decode(bytes: &[u8]) -> RenderResult<Self> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| RendererError::Decode(e.to_string()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::Image(BackgroundImage::from_rgba8(
            width,
            height,
            rgba.into_raw(),
        )?))
    }

    /// Decode, or fall back to a blank background so drawing keeps working.
    pub fn decode_or_blank(bytes: &[u8]) -> Self {
        match Self::decode(bytes) {
            Ok(background) => background,
            Err(err) => {
                log::warn!("Rink background unavailable, using blank: {err}");
                Self::Blank
            }
        }
    }

    pub fn image(&self) -> Option<&BackgroundImage> {
        match self {
            RinkBackground::Blank => None,
            RinkBackground::Image(image) => Some(image),
        }
    }
}
