/*
 *  typeset.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *	(c) 2020-26 Stuart Hunter
 *
 *	Text measurement and drawing on the canvas
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

use std::path::{Path, PathBuf};

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{renderer::TextRenderer, Baseline, Text},
};
use log::debug;
use profont::{PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT};

use crate::canvas::Canvas;
use crate::constants::EMOJI_SIZE;
use crate::display::error::{DashboardError, Result};
use crate::icons::MonoBitmap;

/// Font roles used by the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    /// Header date and section labels
    Title,
    /// The large current temperature
    Display,
    /// Forecast strip and sub-values
    Label,
    /// Agenda rows
    Body,
    /// Emoji glyphs
    Symbol,
}

/// Pixel size of a string in a given font.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: Font) -> Size;
}

/// Measures and draws text on the canvas.
pub trait Typesetter: TextMeasurer {
    fn draw_text(
        &self,
        canvas: &mut Canvas,
        text: &str,
        font: Font,
        top_left: Point,
        color: BinaryColor,
    ) -> Result<()>;
}

/// A mono bitmap face drawn at an integer magnification.
#[derive(Clone, Copy)]
struct Face {
    font: &'static MonoFont<'static>,
    scale: u32,
}

impl Face {
    fn style(&self, color: BinaryColor) -> MonoTextStyle<'static, BinaryColor> {
        MonoTextStyle::new(self.font, color)
    }

    fn measure(&self, text: &str) -> Size {
        let metrics =
            self.style(BinaryColor::On).measure_string(text, Point::zero(), Baseline::Top);
        metrics.bounding_box.size * self.scale
    }
}

/// Forwards each pixel as a `scale` x `scale` block.
struct Magnified<'a, D> {
    target: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<D> OriginDimensions for Magnified<'_, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    fn size(&self) -> Size {
        self.target.bounding_box().size / self.scale
    }
}

impl<D> DrawTarget for Magnified<'_, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    type Color = BinaryColor;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new_equal(self.scale);
        for Pixel(p, c) in pixels {
            let area = Rectangle::new(self.origin + p * self.scale as i32, block);
            self.target.fill_solid(&area, c)?;
        }
        Ok(())
    }
}

/// Emoji glyphs stored as `emoji_u<hex>.svg` files.
#[derive(Debug, Clone)]
pub struct EmojiFace {
    dir: PathBuf,
}

impl EmojiFace {
    /// The directory itself must exist; individual glyphs may be missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DashboardError::asset_missing(dir, "emoji glyph directory not found"));
        }
        Ok(Self { dir })
    }

    pub fn glyph_path(&self, ch: char) -> PathBuf {
        self.dir.join(format!("emoji_u{:x}.svg", ch as u32))
    }

    fn draw(&self, canvas: &mut Canvas, ch: char, top_left: Point) -> Result<()> {
        let path = self.glyph_path(ch);
        if path.is_file() {
            let glyph = MonoBitmap::load(&path, EMOJI_SIZE, EMOJI_SIZE)?;
            glyph.draw(canvas, top_left)?;
        } else {
            debug!("no glyph for U+{:X}, drawing placeholder", ch as u32);
            draw_notdef(canvas, top_left)?;
        }
        Ok(())
    }
}

/// Outlined box drawn for a glyph that cannot be found, like a font's notdef.
fn draw_notdef(canvas: &mut Canvas, top_left: Point) -> Result<()> {
    Rectangle::new(top_left + Point::new(2, 2), Size::new_equal(EMOJI_SIZE - 4))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 2))
        .draw(canvas)?;
    Ok(())
}

/// The default typesetter: ProFont bitmap faces plus an SVG emoji face.
#[derive(Debug, Clone)]
pub struct BitmapTypesetter {
    emoji: Option<EmojiFace>,
}

impl BitmapTypesetter {
    /// Text faces only; symbol text renders as placeholder boxes.
    pub fn new() -> Self {
        Self { emoji: None }
    }

    pub fn with_emoji_dir(dir: &Path) -> Result<Self> {
        Ok(Self { emoji: Some(EmojiFace::open(dir)?) })
    }

    fn face(font: Font) -> Face {
        match font {
            Font::Title => Face { font: &PROFONT_24_POINT, scale: 1 },
            Font::Display => Face { font: &PROFONT_24_POINT, scale: 3 },
            Font::Label => Face { font: &PROFONT_18_POINT, scale: 1 },
            Font::Body | Font::Symbol => Face { font: &PROFONT_14_POINT, scale: 1 },
        }
    }
}

impl Default for BitmapTypesetter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for BitmapTypesetter {
    fn measure(&self, text: &str, font: Font) -> Size {
        match font {
            Font::Symbol => Size::new(EMOJI_SIZE * text.chars().count() as u32, EMOJI_SIZE),
            _ => Self::face(font).measure(text),
        }
    }
}

impl Typesetter for BitmapTypesetter {
    fn draw_text(
        &self,
        canvas: &mut Canvas,
        text: &str,
        font: Font,
        top_left: Point,
        color: BinaryColor,
    ) -> Result<()> {
        if font == Font::Symbol {
            for (i, ch) in text.chars().enumerate() {
                let at = top_left + Point::new(i as i32 * EMOJI_SIZE as i32, 0);
                match &self.emoji {
                    Some(face) => face.draw(canvas, ch, at)?,
                    None => draw_notdef(canvas, at)?,
                }
            }
            return Ok(());
        }

        let face = Self::face(font);
        let style = face.style(color);
        if face.scale == 1 {
            Text::with_baseline(text, top_left, style, Baseline::Top).draw(canvas)?;
        } else {
            let mut target = Magnified { target: canvas, origin: top_left, scale: face.scale };
            Text::with_baseline(text, Point::zero(), style, Baseline::Top)
                .draw(&mut target)?;
        }
        Ok(())
    }
}
