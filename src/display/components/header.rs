/*
 *  display/components/header.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Date band across the top of the panel
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

use chrono::NaiveDate;

use crate::canvas::{INK, PAPER};
use crate::constants::{CANVAS_WIDTH, HEADER_BAND_HEIGHT};
use crate::display::layout::{DrawOp, LayoutRegion};
use crate::display::text::header_date;
use crate::typeset::{Font, TextMeasurer};

/// Filled band with the full date centered in paper color.
pub fn build_header(measurer: &dyn TextMeasurer, today: NaiveDate) -> Vec<DrawOp> {
    let band = LayoutRegion::new(0, 0, CANVAS_WIDTH, HEADER_BAND_HEIGHT);
    let text = header_date(today);
    let origin = band.center(measurer.measure(&text, Font::Title));
    vec![
        DrawOp::Fill { region: band, color: INK },
        DrawOp::Text { text, font: Font::Title, origin, color: PAPER },
    ]
}
