/*
 *  display/text.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *  (c) 2020-26 Stuart Hunter
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

use std::ops::RangeInclusive;

use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;

use crate::calendar::EventStart;
use crate::constants::ALL_DAY_LABEL;

/// Code points drawn with the symbol face.
pub const EMOJI_RANGE: RangeInclusive<u32> = 0x1F000..=0x1FAFF;

/// First character in the emoji block, if any.
pub fn first_emoji(text: &str) -> Option<char> {
    text.chars().find(|c| EMOJI_RANGE.contains(&(*c as u32)))
}

/// Keep only printable 7-bit ASCII.
pub fn printable_ascii(text: &str) -> String {
    text.chars().filter(|c| (' '..='~').contains(c)).collect()
}

/// 12-hour clock label, e.g. "9:05 AM"
pub fn time_label(at: &DateTime<FixedOffset>, tz: &Tz) -> String {
    at.with_timezone(tz).format("%-I:%M %p").to_string()
}

/// Left column label of an agenda row.
pub fn start_label(start: &EventStart, tz: &Tz) -> String {
    match start {
        EventStart::AllDay(_) => ALL_DAY_LABEL.to_string(),
        EventStart::At(at) => time_label(at, tz),
    }
}

/// Header date, e.g. "Sunday, October 18, 2026"
pub fn header_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_emoji_only() {
        assert_eq!(first_emoji("Party \u{1F389} and \u{1F382}"), Some('\u{1F389}'));
        assert_eq!(first_emoji("Standup"), None);
        // U+2600 is outside the block
        assert_eq!(first_emoji("Sun \u{2600}"), None);
        assert_eq!(first_emoji("\u{1F000}"), Some('\u{1F000}'));
        assert_eq!(first_emoji("\u{1FAFF}"), Some('\u{1FAFF}'));
        assert_eq!(first_emoji("\u{1FB00}"), None);
    }

    #[test]
    fn test_printable_ascii() {
        assert_eq!(printable_ascii("Caf\u{e9} \u{1F389}\tnight~"), "Caf night~");
        assert_eq!(printable_ascii("plain"), "plain");
    }

    #[test]
    fn test_labels() {
        let tz = chrono_tz::America::Los_Angeles;
        let at = DateTime::parse_from_rfc3339("2026-10-18T16:05:00Z").unwrap();
        assert_eq!(time_label(&at, &tz), "9:05 AM");
        assert_eq!(start_label(&EventStart::At(at), &tz), "9:05 AM");
        let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(start_label(&EventStart::AllDay(day), &tz), "(All day)");
        assert_eq!(header_date(day), "Sunday, October 18, 2026");
    }
}
