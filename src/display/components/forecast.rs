/*
 *  display/components/forecast.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Five-day forecast strip
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
use crate::constants::{FORECAST_DAYS, FORECAST_ICON_SIZE, FORECAST_PADDING, RULE_WIDTH};
use crate::display::error::{DashboardError, Result};
use crate::display::layout::{center_offset, DrawOp, LayoutRegion};
use crate::icons::IconRef;
use crate::typeset::{Font, TextMeasurer};
use crate::weather::DailyForecast;

/// Space between the stacked label, icon and range
const STACK_GAP: i32 = 4;

/// Columns for forecast days 1..=5 in a strip `width` wide starting at `y`.
///
/// The strip is one column width tall. Column starts are truncated, so
/// widths that do not divide evenly drift by a pixel or two.
pub fn build_forecast(
    measurer: &dyn TextMeasurer,
    days: &[DailyForecast],
    width: u32,
    y: i32,
) -> Result<Vec<DrawOp>> {
    if days.len() != FORECAST_DAYS {
        return Err(DashboardError::malformed(format!(
            "forecast strip needs {} days, got {}",
            FORECAST_DAYS,
            days.len()
        )));
    }

    let column_width = width as f32 / FORECAST_DAYS as f32;
    let cw = column_width as u32;
    let height = cw as i32;
    let right = width as i32 - 1;

    let mut ops = vec![
        DrawOp::Line {
            from: Point::new(0, y),
            to: Point::new(right, y),
            color: INK,
            width: RULE_WIDTH,
        },
        DrawOp::Line {
            from: Point::new(0, y + height),
            to: Point::new(right, y + height),
            color: INK,
            width: RULE_WIDTH,
        },
    ];

    for (i, day) in days.iter().enumerate() {
        let x = (i as f32 * column_width) as i32;
        if i > 0 {
            ops.push(DrawOp::Line {
                from: Point::new(x, y),
                to: Point::new(x, y + height),
                color: INK,
                width: RULE_WIDTH,
            });
        }

        let label = day.day_label();
        let label_size = measurer.measure(&label, Font::Label);
        let label_y = y + FORECAST_PADDING;
        ops.push(DrawOp::Text {
            origin: Point::new(center_offset(x, cw, label_size.width), label_y),
            text: label,
            font: Font::Label,
            color: INK,
        });

        let icon_y = label_y + label_size.height as i32 + STACK_GAP;
        ops.push(DrawOp::Icon {
            icon: IconRef::Weather(day.icon_id.clone()),
            region: LayoutRegion::new(
                center_offset(x, cw, FORECAST_ICON_SIZE),
                icon_y,
                FORECAST_ICON_SIZE,
                FORECAST_ICON_SIZE,
            ),
        });

        let range = day.temp_range_label();
        let range_size = measurer.measure(&range, Font::Label);
        ops.push(DrawOp::Text {
            origin: Point::new(
                center_offset(x, cw, range_size.width),
                icon_y + FORECAST_ICON_SIZE as i32 + STACK_GAP,
            ),
            text: range,
            font: Font::Label,
            color: INK,
        });
    }
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CANVAS_WIDTH, FORECAST_Y};
    use crate::display::components::testing::{texts, FixedMeasurer};
    use chrono::{Days, NaiveDate};

    fn days(n: usize) -> Vec<DailyForecast> {
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        (0..n)
            .map(|i| {
                let date = monday.checked_add_days(Days::new(i as u64)).unwrap();
                DailyForecast::new(date, 50.0, 65.0, 0.3, format!("1{}d", i)).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_five_columns() {
        let ops = build_forecast(&FixedMeasurer, &days(5), CANVAS_WIDTH, FORECAST_Y).unwrap();
        assert_eq!(
            texts(&ops),
            vec![
                "Mon", "50° - 65°", "Tue", "50° - 65°", "Wed", "50° - 65°",
                "Thu", "50° - 65°", "Fri", "50° - 65°",
            ]
        );
        let icons: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Icon { region, .. } => Some(region.x),
                _ => None,
            })
            .collect();
        // each 50px icon centered in a 120px column
        assert_eq!(icons, vec![35, 155, 275, 395, 515]);
    }

    #[test]
    fn test_dividers_skip_left_edge() {
        let ops = build_forecast(&FixedMeasurer, &days(5), CANVAS_WIDTH, FORECAST_Y).unwrap();
        let verticals: Vec<i32> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { from, to, .. } if from.x == to.x => Some(from.x),
                _ => None,
            })
            .collect();
        assert_eq!(verticals, vec![120, 240, 360, 480]);
    }

    #[test]
    fn test_column_starts_truncate() {
        // 7 / 5 = 1.4: starts 0, 1, 2, 4, 5
        let ops = build_forecast(&FixedMeasurer, &days(5), 7, 0).unwrap();
        let verticals: Vec<i32> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { from, to, .. } if from.x == to.x => Some(from.x),
                _ => None,
            })
            .collect();
        assert_eq!(verticals, vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_stack_fits_strip() {
        let ops = build_forecast(&FixedMeasurer, &days(5), CANVAS_WIDTH, FORECAST_Y).unwrap();
        let DrawOp::Text { origin, .. } = ops.last().unwrap() else { panic!("text expected") };
        assert!(origin.y + 20 <= FORECAST_Y + 120);
    }

    #[test]
    fn test_wrong_day_count_is_malformed() {
        let err = build_forecast(&FixedMeasurer, &days(4), CANVAS_WIDTH, FORECAST_Y).unwrap_err();
        assert!(matches!(err, DashboardError::MalformedData(_)));
    }
}
