/*
 *  canvas.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use core::convert::Infallible;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use image::{GrayImage, Luma};
use log::debug;

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::display::error::{DashboardError, Result};

/// Background (white paper).
pub const PAPER: BinaryColor = BinaryColor::Off;
/// Foreground (black ink).
pub const INK: BinaryColor = BinaryColor::On;

/// A runtime-sized 1-bit canvas for embedded-graphics.
///
/// Pixels outside the canvas are silently dropped, which is how content
/// running past the bottom edge gets clipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    buf: Vec<BinaryColor>,
    w: usize,
    h: usize,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![PAPER; w * h], w, h }
    }

    /// The fixed 600x800 dashboard surface, all paper.
    pub fn dashboard() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    pub fn width(&self) -> u32 { self.w as u32 }
    pub fn height(&self) -> u32 { self.h as u32 }

    /// Pixel at position, None when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<BinaryColor> {
        self.idx(Point::new(x as i32, y as i32)).map(|i| self.buf[i])
    }

    /// Count of inked pixels
    pub fn count_ink(&self) -> usize {
        self.buf.iter().filter(|&&p| p == INK).count()
    }

    /// Count of inked pixels inside a region (clipped to the canvas)
    pub fn count_ink_in(&self, region: &Rectangle) -> usize {
        region
            .points()
            .filter_map(|p| self.idx(p))
            .filter(|&i| self.buf[i] == INK)
            .count()
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }

    /// Pack to 1 bpp, MSB first, rows padded to a whole byte, ink = 1.
    ///
    /// This is the layout e-paper controllers and PBM (P4) both expect.
    pub fn to_packed_bytes(&self) -> Vec<u8> {
        let stride = (self.w + 7) / 8;
        let mut bytes = vec![0u8; stride * self.h];
        for (i, &pixel) in self.buf.iter().enumerate() {
            if pixel == INK {
                let (x, y) = (i % self.w, i / self.w);
                bytes[y * stride + x / 8] |= 0x80 >> (x % 8);
            }
        }
        bytes
    }

    /// Grayscale image, paper = 255, ink = 0
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            let i = y as usize * self.w + x as usize;
            Luma([if self.buf[i] == INK { 0 } else { 255 }])
        })
    }

    /// Persist the canvas. `.pbm` writes a true 1-bit P4 file, anything
    /// else is handed to the `image` encoder chosen by extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        let is_pbm = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pbm"))
            .unwrap_or(false);

        if is_pbm {
            let mut out = BufWriter::new(File::create(path)?);
            write!(out, "P4\n{} {}\n", self.w, self.h)?;
            out.write_all(&self.to_packed_bytes())?;
            out.flush()?;
        } else {
            self.to_gray_image().save(path).map_err(|e| {
                DashboardError::Drawing(format!("failed to encode {}: {}", path.display(), e))
            })?;
        }
        debug!("canvas saved to {}", path.display());
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> core::result::Result<(), Self::Error> {
        // fast path for the header band and rules
        let clipped = area.intersection(&self.bounding_box());
        if clipped.size.width == 0 || clipped.size.height == 0 {
            return Ok(());
        }
        let x0 = clipped.top_left.x as usize;
        let w = clipped.size.width as usize;
        for row in 0..clipped.size.height as usize {
            let base = (clipped.top_left.y as usize + row) * self.w + x0;
            self.buf[base..base + w].fill(color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> core::result::Result<(), Self::Error> {
        self.buf.fill(color);
        Ok(())
    }
}
