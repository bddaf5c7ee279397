/*
 *  constants.rs
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

/// The width of the panel in pixels.
pub const CANVAS_WIDTH: u32 = 600;
/// The height of the panel in pixels.
pub const CANVAS_HEIGHT: u32 = 800;

// Header band (date, inverse colors)
/// Height of the filled header band, rows 0..=55.
pub const HEADER_BAND_HEIGHT: u32 = 56;

// Current conditions block
/// First row of the current conditions block.
pub const CONDITIONS_Y: i32 = 56;
/// Height of the current conditions block, rows 56..=274.
pub const CONDITIONS_HEIGHT: u32 = 219;
/// Edge length of the current weather icon.
pub const CONDITIONS_ICON_SIZE: u32 = 150;
/// Edge length of the low/high/precipitation UI icons.
pub const SUB_VALUE_ICON_SIZE: u32 = 32;
/// Gap between a sub-value icon and its text.
pub const SUB_VALUE_GAP: i32 = 6;
/// Top of the large current temperature, below the header band.
pub const CONDITIONS_TEMP_Y: i32 = 76;
/// Top row of the low/high/precipitation icons.
pub const SUB_VALUE_Y: i32 = 190;
/// Width of each sub-value column in the right half.
pub const SUB_VALUE_COLUMN_WIDTH: u32 = 100;

// Forecast strip
/// First row of the forecast strip.
pub const FORECAST_Y: i32 = 275;
/// Number of forecast columns (tomorrow through day 5).
pub const FORECAST_DAYS: usize = 5;
/// Edge length of a forecast icon.
pub const FORECAST_ICON_SIZE: u32 = 50;
/// Top padding inside a forecast column.
pub const FORECAST_PADDING: i32 = 6;
/// Strip height, one column width.
pub const FORECAST_HEIGHT: u32 = CANVAS_WIDTH / FORECAST_DAYS as u32;
/// Stroke width of rules and dividers.
pub const RULE_WIDTH: u32 = 2;

// Agenda
/// Height of a section header (label plus rule) before the first row.
pub const SECTION_HEADER_HEIGHT: i32 = 45;
/// Row of the horizontal rule, relative to the section top.
pub const SECTION_RULE_OFFSET: i32 = 40;
/// Fixed height of every agenda row.
pub const AGENDA_ROW_HEIGHT: i32 = 40;
/// Left column for the start time label.
pub const AGENDA_TIME_X: i32 = 10;
/// Middle column for the event title.
pub const AGENDA_TITLE_X: i32 = 150;
/// Right margin for the emoji glyph.
pub const AGENDA_RIGHT_MARGIN: i32 = 10;
/// Widest title that stays clear of the right-aligned emoji.
pub const AGENDA_TITLE_MAX_WIDTH: u32 =
    CANVAS_WIDTH - AGENDA_RIGHT_MARGIN as u32 - EMOJI_SIZE - AGENDA_TITLE_X as u32;
/// Time label shown for events without a clock time.
pub const ALL_DAY_LABEL: &str = "(All day)";
/// Row shown when a day has no qualifying events.
pub const NO_EVENTS_LABEL: &str = "No Events";

/// Edge length of an emoji glyph in the symbol face.
pub const EMOJI_SIZE: u32 = 32;

/// Default weather location (Seattle) and units.
pub const DEFAULT_LAT: f64 = 47.608013;
pub const DEFAULT_LON: f64 = -122.335167;
pub const DEFAULT_UNITS: &str = "imperial";
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Weather API endpoint and excluded blocks.
pub const ONECALL_URL: &str = "https://api.openweathermap.org/data/2.5/onecall";
pub const ONECALL_EXCLUDE: &str = "minutely,hourly,alerts";
