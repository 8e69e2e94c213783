//! RinkBoard Render Library
//!
//! Turns board state into a backend-neutral [`Frame`] and, with the
//! `vello-renderer` feature, encodes frames into a Vello scene.

mod background;
mod frame;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use background::{BackgroundImage, RinkBackground};
pub use frame::{DrawCommand, Frame};
pub use renderer::{
    ARROW_HEAD_SIZE, PASS_DASHES, PREVIEW_ALPHA, RenderContext, RenderResult, Renderer,
    RendererError, render,
};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
