/*
 *  display/layout.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Layout regions, draw instructions and the centering rule
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::Rectangle,
};

use crate::icons::IconRef;
use crate::typeset::Font;

/// Offset that centers `content` inside `container` starting at `start`.
///
/// Integer division truncates toward zero, so odd slack leans left/up.
pub fn center_offset(start: i32, container: u32, content: u32) -> i32 {
    start + (container as i32 - content as i32) / 2
}

/// A rectangle computed by a builder for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl LayoutRegion {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// First row below the region
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn rect(&self) -> Rectangle {
        Rectangle::new(self.top_left(), self.size())
    }

    /// Top-left that centers `content` in this region on both axes.
    pub fn center(&self, content: Size) -> Point {
        Point::new(
            center_offset(self.x, self.width, content.width),
            center_offset(self.y, self.height, content.height),
        )
    }
}

/// One positioned drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill {
        region: LayoutRegion,
        color: BinaryColor,
    },
    Line {
        from: Point,
        to: Point,
        color: BinaryColor,
        width: u32,
    },
    Text {
        text: String,
        font: Font,
        /// top-left of the measured box
        origin: Point,
        color: BinaryColor,
    },
    Icon {
        icon: IconRef,
        region: LayoutRegion,
    },
}

impl DrawOp {
    /// Text content, if this is a text op.
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_offset() {
        assert_eq!(center_offset(0, 600, 100), 250);
        assert_eq!(center_offset(120, 120, 50), 155);
        // odd slack truncates
        assert_eq!(center_offset(0, 10, 3), 3);
        // content wider than the container goes negative
        assert_eq!(center_offset(0, 100, 120), -10);
    }

    #[test]
    fn test_region_center() {
        let r = LayoutRegion::new(0, 56, 300, 219);
        assert_eq!(r.center(Size::new(150, 150)), Point::new(75, 90));
        assert_eq!(r.bottom(), 275);
    }
}
