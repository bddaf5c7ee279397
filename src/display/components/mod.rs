/*
 *  display/components/mod.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Builders for each band of the dashboard
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

pub mod header;
pub mod conditions;
pub mod forecast;
pub mod agenda;

// Re-exports
pub use header::build_header;
pub use conditions::build_conditions;
pub use forecast::build_forecast;
pub use agenda::{build_section, AgendaDayWindow, SectionLayout};

#[cfg(test)]
pub(crate) mod testing {
    use embedded_graphics::prelude::Size;

    use crate::display::layout::DrawOp;
    use crate::typeset::{Font, TextMeasurer};

    /// 10px per char, 20px tall; symbols 32px square.
    pub struct FixedMeasurer;

    impl TextMeasurer for FixedMeasurer {
        fn measure(&self, text: &str, font: Font) -> Size {
            let n = text.chars().count() as u32;
            match font {
                Font::Symbol => Size::new(32 * n, 32),
                _ => Size::new(10 * n, 20),
            }
        }
    }

    pub fn texts(ops: &[DrawOp]) -> Vec<&str> {
        ops.iter().filter_map(DrawOp::text).collect()
    }
}
