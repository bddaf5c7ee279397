/*
 *  icons.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *	(c) 2020-26 Stuart Hunter
 *
 *	Icon assets: weather icons by id, the three UI icons, emoji glyphs.
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

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
};
use image::imageops::FilterType;
use log::debug;

use crate::display::error::{DashboardError, Result};
use crate::svgimage::{is_ink, SvgImageRenderer};

/// Extensions probed, in order, when resolving an icon name.
const ICON_EXTENSIONS: [&str; 2] = ["svg", "png"];

/// The fixed UI icons of the current conditions block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiIcon {
    TempLow,
    TempHigh,
    Precipitation,
}

impl UiIcon {
    pub fn file_stem(self) -> &'static str {
        match self {
            UiIcon::TempLow => "temp_low",
            UiIcon::TempHigh => "temp_high",
            UiIcon::Precipitation => "precipitation",
        }
    }
}

/// Reference to an icon asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconRef {
    /// Weather icon by provider id, e.g. "10d"
    Weather(String),
    Ui(UiIcon),
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconRef::Weather(id) => write!(f, "weather icon '{}'", id),
            IconRef::Ui(icon) => write!(f, "UI icon '{}'", icon.file_stem()),
        }
    }
}

/// A 1-bit bitmap, MSB first, rows padded to a whole byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoBitmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl MonoBitmap {
    /// Rasterise an SVG or PNG file to `width` x `height`.
    pub fn load(path: &Path, width: u32, height: u32) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "svg" => Self::load_svg(path, width, height),
            _ => Self::load_raster(path, width, height),
        }
    }

    fn load_svg(path: &Path, width: u32, height: u32) -> Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| DashboardError::asset_missing(path, e.to_string()))?;
        let renderer = SvgImageRenderer::new(&data, width, height)
            .map_err(|e| DashboardError::asset_missing(path, e.to_string()))?;
        let mut buffer = vec![0u8; renderer.buffer_len()];
        renderer
            .render_to_buffer(&mut buffer)
            .map_err(|e| DashboardError::asset_missing(path, e.to_string()))?;
        Ok(Self { width, height, data: buffer })
    }

    fn load_raster(path: &Path, width: u32, height: u32) -> Result<Self> {
        let img = image::open(path)
            .map_err(|e| DashboardError::asset_missing(path, e.to_string()))?
            .to_rgba8();
        let scaled = if img.dimensions() == (width, height) {
            img
        } else {
            image::imageops::resize(&img, width, height, FilterType::Triangle)
        };
        let stride = ((width + 7) / 8) as usize;
        let mut data = vec![0u8; stride * height as usize];
        for (x, y, p) in scaled.enumerate_pixels() {
            let [r, g, b, a] = p.0;
            if is_ink(r, g, b, a) {
                data[y as usize * stride + x as usize / 8] |= 0x80 >> (x % 8);
            }
        }
        Ok(Self { width, height, data })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Blit ink pixels at `top_left`; clear pixels leave the target untouched.
    pub fn draw<D>(&self, target: &mut D, top_left: Point) -> core::result::Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let stride = ((self.width + 7) / 8) as usize;
        let ink = (0..self.height).flat_map(|y| {
            (0..self.width).filter_map(move |x| {
                let byte = self.data[y as usize * stride + x as usize / 8];
                (byte & (0x80 >> (x % 8)) != 0)
                    .then(|| Pixel(top_left + Point::new(x as i32, y as i32), BinaryColor::On))
            })
        });
        target.draw_iter(ink)
    }
}

/// Resolves icon references against the asset directory.
#[derive(Debug, Clone)]
pub struct IconStore {
    dir: PathBuf,
}

impl IconStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// First existing `<stem>.svg` / `<stem>.png` under the directory.
    pub fn resolve(&self, icon: &IconRef) -> Result<PathBuf> {
        let stem = match icon {
            IconRef::Weather(id) => {
                if id.is_empty() || id.contains(['/', '\\', '.']) {
                    return Err(DashboardError::malformed(format!(
                        "invalid weather icon id '{}'",
                        id
                    )));
                }
                id.as_str()
            }
            IconRef::Ui(ui) => ui.file_stem(),
        };
        ICON_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", stem, ext)))
            .find(|p| p.is_file())
            .ok_or_else(|| {
                DashboardError::asset_missing(self.dir.join(stem), format!("no file for {}", icon))
            })
    }

    /// Load and rasterise an icon; a missing file aborts the render.
    pub fn load(&self, icon: &IconRef, size: Size) -> Result<MonoBitmap> {
        let path = self.resolve(icon)?;
        debug!("loading {} from {}", icon, path.display());
        MonoBitmap::load(&path, size.width, size.height)
    }
}
