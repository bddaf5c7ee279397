/*
 *  display/components/agenda.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Today / Tomorrow agenda sections
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

use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use embedded_graphics::prelude::*;

use crate::calendar::{CalendarEvent, EventStart};
use crate::canvas::INK;
use crate::constants::{
    AGENDA_RIGHT_MARGIN, AGENDA_ROW_HEIGHT, AGENDA_TIME_X, AGENDA_TITLE_MAX_WIDTH, AGENDA_TITLE_X,
    CANVAS_WIDTH, NO_EVENTS_LABEL, RULE_WIDTH, SECTION_HEADER_HEIGHT, SECTION_RULE_OFFSET,
};
use crate::display::layout::{center_offset, DrawOp};
use crate::display::text::{first_emoji, printable_ascii, start_label};
use crate::typeset::{Font, TextMeasurer};

/// The events of one calendar date, all-day first then timed by start.
#[derive(Debug, Clone, Default)]
pub struct AgendaDayWindow<'a> {
    pub all_day: Vec<&'a CalendarEvent>,
    pub timed: Vec<&'a CalendarEvent>,
}

impl<'a> AgendaDayWindow<'a> {
    /// Events starting on `date` in `tz`. Timed events strictly before
    /// `not_before` are dropped; all-day events never are.
    pub fn select(
        events: &'a [CalendarEvent],
        date: NaiveDate,
        tz: &Tz,
        not_before: Option<DateTime<FixedOffset>>,
    ) -> Self {
        let mut window = Self::default();
        for event in events.iter().filter(|e| e.date_in(tz) == date) {
            match event.start {
                EventStart::AllDay(_) => window.all_day.push(event),
                EventStart::At(at) => {
                    if not_before.is_some_and(|now| at < now) {
                        continue;
                    }
                    window.timed.push(event);
                }
            }
        }
        // stable, so equal starts keep feed order
        window.timed.sort_by_key(|e| match e.start {
            EventStart::At(at) => Some(at),
            EventStart::AllDay(_) => None,
        });
        window
    }

    pub fn len(&self) -> usize {
        self.all_day.len() + self.timed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rendering order
    pub fn events(&self) -> impl Iterator<Item = &'a CalendarEvent> + '_ {
        self.all_day.iter().chain(self.timed.iter()).copied()
    }
}

/// Draw instructions for one section and where the next one starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionLayout {
    pub ops: Vec<DrawOp>,
    /// Top of each row, "No Events" included
    pub row_tops: Vec<i32>,
    pub end_y: i32,
}

/// Lay out a labelled section starting at `y`.
pub fn build_section(
    measurer: &dyn TextMeasurer,
    label: &str,
    window: &AgendaDayWindow<'_>,
    tz: &Tz,
    y: i32,
) -> SectionLayout {
    let mut ops = Vec::new();
    let label_size = measurer.measure(label, Font::Title);
    ops.push(DrawOp::Text {
        text: label.to_string(),
        font: Font::Title,
        origin: Point::new(
            center_offset(0, CANVAS_WIDTH, label_size.width),
            center_offset(y, SECTION_RULE_OFFSET as u32, label_size.height),
        ),
        color: INK,
    });
    ops.push(DrawOp::Line {
        from: Point::new(0, y + SECTION_RULE_OFFSET),
        to: Point::new(CANVAS_WIDTH as i32 - 1, y + SECTION_RULE_OFFSET),
        color: INK,
        width: RULE_WIDTH,
    });

    let mut row_y = y + SECTION_HEADER_HEIGHT;
    let mut row_tops = Vec::with_capacity(window.len().max(1));

    if window.is_empty() {
        let size = measurer.measure(NO_EVENTS_LABEL, Font::Body);
        ops.push(DrawOp::Text {
            text: NO_EVENTS_LABEL.to_string(),
            font: Font::Body,
            origin: Point::new(
                center_offset(0, CANVAS_WIDTH, size.width),
                center_offset(row_y, AGENDA_ROW_HEIGHT as u32, size.height),
            ),
            color: INK,
        });
        row_tops.push(row_y);
        row_y += AGENDA_ROW_HEIGHT;
    }

    for event in window.events() {
        row_tops.push(row_y);
        push_row(&mut ops, measurer, event, tz, row_y);
        row_y += AGENDA_ROW_HEIGHT;
    }

    SectionLayout { ops, row_tops, end_y: row_y }
}

fn push_row(
    ops: &mut Vec<DrawOp>,
    measurer: &dyn TextMeasurer,
    event: &CalendarEvent,
    tz: &Tz,
    row_y: i32,
) {
    let time = start_label(&event.start, tz);
    let time_height = measurer.measure(&time, Font::Body).height;
    let text_y = center_offset(row_y, AGENDA_ROW_HEIGHT as u32, time_height);
    ops.push(DrawOp::Text {
        text: time,
        font: Font::Body,
        origin: Point::new(AGENDA_TIME_X, text_y),
        color: INK,
    });

    let title = clip_title(measurer, printable_ascii(&event.summary));
    if !title.trim().is_empty() {
        ops.push(DrawOp::Text {
            text: title,
            font: Font::Body,
            origin: Point::new(AGENDA_TITLE_X, text_y),
            color: INK,
        });
    }

    if let Some(emoji) = first_emoji(&event.summary) {
        let glyph = emoji.to_string();
        let size = measurer.measure(&glyph, Font::Symbol);
        ops.push(DrawOp::Text {
            origin: Point::new(
                CANVAS_WIDTH as i32 - AGENDA_RIGHT_MARGIN - size.width as i32,
                center_offset(row_y, AGENDA_ROW_HEIGHT as u32, size.height),
            ),
            text: glyph,
            font: Font::Symbol,
            color: INK,
        });
    }
}

/// Drop trailing characters until the title fits its column.
fn clip_title(measurer: &dyn TextMeasurer, mut title: String) -> String {
    while measurer.measure(&title, Font::Body).width > AGENDA_TITLE_MAX_WIDTH {
        if title.pop().is_none() {
            break;
        }
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::components::testing::{texts, FixedMeasurer};
    use chrono_tz::America::Los_Angeles;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn events() -> Vec<CalendarEvent> {
        vec![
            CalendarEvent::new_at("Standup", at("2026-10-18T09:00:00-07:00")),
            CalendarEvent::new_at("Lunch", at("2026-10-18T12:00:00-07:00")),
            CalendarEvent::new_all_day("Vacation", today()),
            CalendarEvent::new_at("Early call", at("2026-10-18T14:00:00Z")),
            CalendarEvent::new_all_day("Birthday \u{1F382}\u{1F389}", today()),
            CalendarEvent::new_at("Tomorrow standup", at("2026-10-19T09:00:00-07:00")),
        ]
    }

    #[test]
    fn test_all_day_first_then_by_time() {
        let evs = events();
        let window = AgendaDayWindow::select(&evs, today(), &Los_Angeles, None);
        let order: Vec<_> = window.events().map(|e| e.summary.as_str()).collect();
        // 14:00Z is 07:00 in Seattle
        assert_eq!(
            order,
            vec!["Vacation", "Birthday \u{1F382}\u{1F389}", "Early call", "Standup", "Lunch"]
        );
    }

    #[test]
    fn test_today_drops_passed_events() {
        let evs = events();
        let now = at("2026-10-18T10:00:00-07:00");
        let window = AgendaDayWindow::select(&evs, today(), &Los_Angeles, Some(now));
        let order: Vec<_> = window.events().map(|e| e.summary.as_str()).collect();
        assert_eq!(order, vec!["Vacation", "Birthday \u{1F382}\u{1F389}", "Lunch"]);
    }

    #[test]
    fn test_event_starting_now_is_kept() {
        let evs = events();
        let now = at("2026-10-18T09:00:00-07:00");
        let window = AgendaDayWindow::select(&evs, today(), &Los_Angeles, Some(now));
        assert!(window.events().any(|e| e.summary == "Standup"));
    }

    #[test]
    fn test_tomorrow_has_no_passed_filter() {
        let evs = events();
        let tomorrow = today().succ_opt().unwrap();
        let window = AgendaDayWindow::select(&evs, tomorrow, &Los_Angeles, None);
        let order: Vec<_> = window.events().map(|e| e.summary.as_str()).collect();
        assert_eq!(order, vec!["Tomorrow standup"]);
    }

    #[test]
    fn test_empty_section_advances_one_row() {
        let window = AgendaDayWindow::default();
        let layout = build_section(&FixedMeasurer, "Today", &window, &Los_Angeles, 400);
        assert_eq!(texts(&layout.ops), vec!["Today", "No Events"]);
        assert_eq!(layout.row_tops, vec![445]);
        assert_eq!(layout.end_y, 400 + SECTION_HEADER_HEIGHT + AGENDA_ROW_HEIGHT);
        let DrawOp::Text { origin, .. } = &layout.ops[2] else { panic!("text expected") };
        assert_eq!(*origin, Point::new(255, 455));
    }

    #[test]
    fn test_rows_stack_and_show_first_emoji() {
        let evs = events();
        let now = at("2026-10-18T10:00:00-07:00");
        let window = AgendaDayWindow::select(&evs, today(), &Los_Angeles, Some(now));
        let layout = build_section(&FixedMeasurer, "Today", &window, &Los_Angeles, 395);
        assert_eq!(
            texts(&layout.ops),
            vec![
                "Today",
                "(All day)",
                "Vacation",
                "(All day)",
                "Birthday ",
                "\u{1F382}",
                "12:00 PM",
                "Lunch",
            ]
        );
        assert_eq!(layout.row_tops, vec![440, 480, 520]);
        assert_eq!(layout.end_y, 560);

        let emoji = layout
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { font: Font::Symbol, origin, .. } => Some(*origin),
                _ => None,
            })
            .unwrap();
        assert_eq!(emoji, Point::new(600 - 10 - 32, 484));
    }

    #[test]
    fn test_long_title_stops_short_of_emoji() {
        let long = format!("{} \u{1F389}", "x".repeat(60));
        let evs = vec![CalendarEvent::new_all_day(long, today())];
        let window = AgendaDayWindow::select(&evs, today(), &Los_Angeles, None);
        let layout = build_section(&FixedMeasurer, "Today", &window, &Los_Angeles, 395);

        let title = texts(&layout.ops)[2];
        assert_eq!(title, "x".repeat(40));
        let emoji_x = layout
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { font: Font::Symbol, origin, .. } => Some(origin.x),
                _ => None,
            })
            .unwrap();
        assert!(AGENDA_TITLE_X + FixedMeasurer.measure(title, Font::Body).width as i32 <= emoji_x);
    }

    #[test]
    fn test_rows_past_canvas_are_still_laid_out() {
        let many: Vec<_> = (0..20)
            .map(|i| CalendarEvent::new_all_day(format!("Event {}", i), today()))
            .collect();
        let window = AgendaDayWindow::select(&many, today(), &Los_Angeles, None);
        let layout = build_section(&FixedMeasurer, "Today", &window, &Los_Angeles, 395);
        assert_eq!(layout.row_tops.len(), 20);
        assert_eq!(layout.end_y, 395 + 45 + 20 * 40);
    }
}
