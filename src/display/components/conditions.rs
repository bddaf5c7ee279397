/*
 *  display/components/conditions.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Current conditions: icon, big temperature, low/high/precipitation
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

use embedded_graphics::prelude::*;

use crate::canvas::INK;
use crate::constants::{
    CANVAS_WIDTH, CONDITIONS_HEIGHT, CONDITIONS_ICON_SIZE, CONDITIONS_TEMP_Y, CONDITIONS_Y,
    SUB_VALUE_COLUMN_WIDTH, SUB_VALUE_GAP, SUB_VALUE_ICON_SIZE, SUB_VALUE_Y,
};
use crate::display::error::Result;
use crate::display::layout::{center_offset, DrawOp, LayoutRegion};
use crate::icons::{IconRef, UiIcon};
use crate::typeset::{Font, TextMeasurer};
use crate::weather::WeatherSnapshot;

/// Left half holds the icon, right half the temperature and sub-values.
pub fn build_conditions(
    measurer: &dyn TextMeasurer,
    weather: &WeatherSnapshot,
) -> Result<Vec<DrawOp>> {
    let half = CANVAS_WIDTH / 2;
    let left = LayoutRegion::new(0, CONDITIONS_Y, half, CONDITIONS_HEIGHT);
    let right_x = half as i32;

    let icon_size = Size::new_equal(CONDITIONS_ICON_SIZE);
    let icon_at = left.center(icon_size);
    let mut ops = vec![DrawOp::Icon {
        icon: IconRef::Weather(weather.current_icon.clone()),
        region: LayoutRegion::new(icon_at.x, icon_at.y, icon_size.width, icon_size.height),
    }];

    let temp = weather.current_temp_label();
    let temp_size = measurer.measure(&temp, Font::Display);
    ops.push(DrawOp::Text {
        origin: Point::new(center_offset(right_x, half, temp_size.width), CONDITIONS_TEMP_Y),
        text: temp,
        font: Font::Display,
        color: INK,
    });

    let temps = weather.weather_temps()?;
    let sub_values = [
        (UiIcon::TempLow, format!("{}°", temps.low)),
        (UiIcon::TempHigh, format!("{}°", temps.high)),
        (UiIcon::Precipitation, format!("{}%", temps.pop)),
    ];
    for (i, (icon, text)) in sub_values.into_iter().enumerate() {
        let column = right_x + (i as u32 * SUB_VALUE_COLUMN_WIDTH) as i32;
        ops.push(DrawOp::Icon {
            icon: IconRef::Ui(icon),
            region: LayoutRegion::new(
                center_offset(column, SUB_VALUE_COLUMN_WIDTH, SUB_VALUE_ICON_SIZE),
                SUB_VALUE_Y,
                SUB_VALUE_ICON_SIZE,
                SUB_VALUE_ICON_SIZE,
            ),
        });
        let size = measurer.measure(&text, Font::Label);
        ops.push(DrawOp::Text {
            origin: Point::new(
                center_offset(column, SUB_VALUE_COLUMN_WIDTH, size.width),
                SUB_VALUE_Y + SUB_VALUE_ICON_SIZE as i32 + SUB_VALUE_GAP,
            ),
            text,
            font: Font::Label,
            color: INK,
        });
    }
    Ok(ops)
}
