//! Module for rendering SVG icons to a 1-bit ink bitmap.
//!
//! This module uses `usvg` (re-exported by `resvg`) for SVG parsing and
//! `resvg` for rendering. The output is a 1-bit per pixel bitmap, blitted
//! onto the canvas by `icons::MonoBitmap`.

use resvg::{
    render,
    usvg::{
        Tree as ResvgTree,
        Options as ResvgUsvgOptions,
        Transform,
    }
};

use tiny_skia::Pixmap;
use log::{debug, error};
use thiserror::Error;

/// Alpha and luminance cut-off for deciding a pixel is ink.
const THRESHOLD: u8 = 128;

/// Error type for SVG rendering operations.
#[derive(Debug, Error)]
pub enum SvgImageError {
    #[error("SVG parse error: {0}")]
    SvgParseError(String),
    #[error("Pixmap creation error: {0}")]
    PixmapCreationError(String),
    #[error("Provided buffer is too small for SVG rendering.")]
    BufferTooSmall,
}

/// Renders SVG data to a monochrome pixel buffer.
#[derive(Debug)]
pub struct SvgImageRenderer {
    tree: ResvgTree,
    target_width: u32,
    target_height: u32,
}

impl SvgImageRenderer {
    /// Creates a new `SvgImageRenderer` from SVG string data and target dimensions.
    ///
    /// The SVG will be scaled to fit `target_width` and `target_height`.
    pub fn new(
        svg_data: &str,
        target_width: u32,
        target_height: u32,
    ) -> Result<Self, SvgImageError> {
        let usvg_options = ResvgUsvgOptions::default();
        let tree = ResvgTree::from_str(svg_data, &usvg_options)
            .map_err(|e| SvgImageError::SvgParseError(format!("Failed to parse SVG: {:?}", e)))?;
        Ok(SvgImageRenderer {
            tree,
            target_width,
            target_height,
        })
    }

    /// Bytes needed for one rendered frame (rows padded to a whole byte).
    pub fn buffer_len(&self) -> usize {
        self.target_height as usize * ((self.target_width + 7) / 8) as usize
    }

    /// Renders the SVG into `buffer` as 1-bit ink: a set bit is a dark,
    /// opaque pixel. Row-major, MSB-first within each byte.
    pub fn render_to_buffer(&self, buffer: &mut [u8]) -> Result<(), SvgImageError> {
        let padded_width = (self.target_width + 7) / 8;
        let buffer_len_needed = self.buffer_len();
        if buffer.len() < buffer_len_needed {
            error!(
                "Buffer too small. Needed: {} bytes, Got: {} bytes",
                buffer_len_needed,
                buffer.len()
            );
            return Err(SvgImageError::BufferTooSmall);
        }

        buffer.fill(0);

        let mut pixmap = Pixmap::new(self.target_width, self.target_height)
            .ok_or_else(|| {
                SvgImageError::PixmapCreationError("Failed to create pixmap".to_string())
            })?;

        // scale from the document size to the target box
        let svg_size = self.tree.size();
        let scale_x = self.target_width as f32 / svg_size.width();
        let scale_y = self.target_height as f32 / svg_size.height();
        let transform = Transform::from_scale(scale_x, scale_y);

        render(&self.tree, transform, &mut pixmap.as_mut());

        pixmap
            .pixels()
            .chunks(self.target_width as usize)
            .take(self.target_height as usize)
            .enumerate()
            .for_each(|(y, row)| {
                row.iter().enumerate().for_each(|(x, p)| {
                    // pixels are premultiplied, so un-premultiply before judging darkness
                    let c = p.demultiply();
                    if is_ink(c.red(), c.green(), c.blue(), c.alpha()) {
                        let byte_idx = y * padded_width as usize + (x / 8);
                        buffer[byte_idx] |= 0x80 >> (x % 8);
                    }
                });
            });

        debug!("SVG rendered to {}x{} buffer", self.target_width, self.target_height);
        Ok(())
    }
}

/// Dark and opaque enough to print.
pub fn is_ink(r: u8, g: u8, b: u8, a: u8) -> bool {
    let luminance = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    a > THRESHOLD && luminance < THRESHOLD as f32
}
