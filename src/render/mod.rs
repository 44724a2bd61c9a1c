//! Render pipeline.
//!
//! Turns a finished [`CanvasState`] into a PNG file:
//! - `Surface` - paints layers in order onto an RGBA buffer
//! - `raster` - signed-distance shape tests and source-over blending
//! - `text` - glyph layout and coverage via `ab_glyph`
//! - `save_image` - encodes and writes the buffer

mod png;
pub mod raster;
mod surface;
mod text;

use std::path::Path;

use image::RgbaImage;

use crate::canvas::CanvasState;
use crate::error::Result;

pub use png::{save_image, ImageEncoding};
pub use surface::Surface;

/// Rasterise the canvas without writing anything.
pub fn render_image(canvas: &CanvasState) -> Result<RgbaImage> {
    let mut surface = Surface::new(canvas.width(), canvas.height());
    surface.load_fonts(canvas.fonts())?;
    surface.add_layers(canvas.layers().iter().cloned());
    surface.render_image()
}

/// Rasterise the canvas, write it to `path` as PNG and mark it rendered.
#[tracing::instrument(skip(canvas), fields(canvas = %canvas.id(), layers = canvas.layers().len()))]
pub fn render_canvas(canvas: &mut CanvasState, path: &Path) -> Result<()> {
    let image = render_image(canvas)?;
    save_image(&image, ImageEncoding::Png, path)?;
    canvas.mark_rendered();
    Ok(())
}
