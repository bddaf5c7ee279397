/*
 *  calendar.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *	(c) 2020-26 Stuart Hunter
 *
 *	Calendar events from an iCalendar feed
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

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::{debug, info, warn};
use reqwest::{header, Client};

use crate::display::error::{DashboardError, Result};

/// When an event starts: a whole day, or an instant with its offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStart {
    AllDay(NaiveDate),
    At(DateTime<FixedOffset>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub summary: String,
    pub start: EventStart,
}

impl CalendarEvent {
    pub fn all_day(&self) -> bool {
        matches!(self.start, EventStart::AllDay(_))
    }

    /// Calendar date the event starts on, as seen in `tz`.
    pub fn date_in(&self, tz: &Tz) -> NaiveDate {
        match self.start {
            EventStart::AllDay(d) => d,
            EventStart::At(at) => at.with_timezone(tz).date_naive(),
        }
    }

    pub fn new_all_day(summary: impl Into<String>, date: NaiveDate) -> Self {
        Self { summary: summary.into(), start: EventStart::AllDay(date) }
    }

    pub fn new_at(summary: impl Into<String>, at: DateTime<FixedOffset>) -> Self {
        Self { summary: summary.into(), start: EventStart::At(at) }
    }
}

/// RFC 5545 unfolding: a line starting with space or tab continues the previous one.
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(rest) = line.strip_prefix([' ', '\t']) {
            if let Some(prev) = lines.last_mut() {
                prev.push_str(rest);
                continue;
            }
        }
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    lines
}

/// A content line: `NAME;PARAM=V;...:VALUE`
struct ContentLine<'a> {
    name: String,
    params: Vec<(String, &'a str)>,
    value: &'a str,
}

impl<'a> ContentLine<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        // the first colon outside a quoted parameter value ends the head
        let mut quoted = false;
        let split = line.char_indices().find(|&(_, c)| {
            if c == '"' {
                quoted = !quoted;
            }
            c == ':' && !quoted
        })?;
        let (head, value) = (&line[..split.0], &line[split.0 + 1..]);
        let mut parts = head.split(';');
        let name = parts.next()?.trim().to_ascii_uppercase();
        let params = parts
            .filter_map(|p| {
                let (k, v) = p.split_once('=')?;
                Some((k.trim().to_ascii_uppercase(), v.trim_matches('"')))
            })
            .collect();
        Some(Self { name, params, value })
    }

    fn param(&self, key: &str) -> Option<&'a str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push(' '),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Resolve a wall-clock time in `tz`; a time inside a DST gap moves forward an hour.
fn localize<Z: TimeZone>(tz: &Z, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + chrono::Duration::hours(1))).earliest())
        .map(|dt| dt.fixed_offset())
}

/// Windows zone names some exporters put in TZID.
const WINDOWS_ZONES: &[(&str, Tz)] = &[
    ("Pacific Standard Time", Tz::America__Los_Angeles),
    ("Mountain Standard Time", Tz::America__Denver),
    ("US Mountain Standard Time", Tz::America__Phoenix),
    ("Central Standard Time", Tz::America__Chicago),
    ("Eastern Standard Time", Tz::America__New_York),
    ("Alaskan Standard Time", Tz::America__Anchorage),
    ("Hawaiian Standard Time", Tz::Pacific__Honolulu),
    ("GMT Standard Time", Tz::Europe__London),
    ("W. Europe Standard Time", Tz::Europe__Berlin),
    ("Romance Standard Time", Tz::Europe__Paris),
    ("UTC", Tz::UTC),
];

/// IANA name, then Windows name, else the configured zone.
fn resolve_tzid(name: &str, default_tz: &Tz) -> Tz {
    if let Ok(tz) = name.parse::<Tz>() {
        return tz;
    }
    if let Some((_, tz)) = WINDOWS_ZONES.iter().find(|(windows, _)| *windows == name) {
        return *tz;
    }
    warn!("unknown TZID '{}', using {}", name, default_tz.name());
    *default_tz
}

fn parse_dtstart(line: &ContentLine<'_>, default_tz: &Tz) -> Result<EventStart> {
    let value = line.value.trim();
    let bad = || DashboardError::malformed(format!("unparseable DTSTART '{}'", value));

    if line.param("VALUE") == Some("DATE") || value.len() == 8 {
        let date = NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|_| bad())?;
        return Ok(EventStart::AllDay(date));
    }

    if let Some(utc) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").map_err(|_| bad())?;
        return Ok(EventStart::At(Utc.from_utc_datetime(&naive).fixed_offset()));
    }

    let naive = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").map_err(|_| bad())?;
    let at = match line.param("TZID") {
        Some(name) => localize(&resolve_tzid(name, default_tz), naive),
        // floating time
        None => localize(default_tz, naive),
    };
    at.map(EventStart::At).ok_or_else(bad)
}

/// Parse VEVENTs out of an iCalendar document. Floating times are read in `tz`.
///
/// Recurrence rules are not expanded; each VEVENT yields one event.
pub fn parse_ics(text: &str, tz: &Tz) -> Result<Vec<CalendarEvent>> {
    let mut events = Vec::new();
    // Some(summary, start) while inside a VEVENT
    let mut current: Option<(Option<String>, Option<EventStart>)> = None;
    // nested components (VALARM) inside the event
    let mut nested = 0usize;

    for line in unfold(text) {
        let Some(cl) = ContentLine::parse(&line) else {
            debug!("skipping ics line without a value: {}", line);
            continue;
        };
        let is_vevent = cl.value.eq_ignore_ascii_case("VEVENT");
        let Some((summary, start)) = current.as_mut() else {
            if cl.name == "BEGIN" && is_vevent {
                current = Some((None, None));
                nested = 0;
            }
            continue;
        };
        match cl.name.as_str() {
            "BEGIN" => nested += 1,
            "END" if nested > 0 => nested -= 1,
            "END" if is_vevent => {
                let summary = summary.take().unwrap_or_default();
                let start = start.take().ok_or_else(|| {
                    DashboardError::malformed(format!("VEVENT '{}' has no DTSTART", summary))
                })?;
                events.push(CalendarEvent { summary, start });
                current = None;
            }
            "SUMMARY" if nested == 0 => *summary = Some(unescape_text(cl.value)),
            "DTSTART" if nested == 0 => *start = Some(parse_dtstart(&cl, tz)?),
            _ => {}
        }
    }

    if current.is_some() {
        return Err(DashboardError::malformed("unterminated VEVENT"));
    }
    Ok(events)
}

/// webcal:// is plain HTTPS.
pub fn feed_url(url: &str) -> String {
    match url.strip_prefix("webcal://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

/// Fetches and parses the calendar feed.
#[derive(Debug)]
pub struct CalendarClient {
    url: Option<String>,
    tz: Tz,
    client: Client,
}

impl CalendarClient {
    pub fn new(url: Option<&str>, tz: Tz) -> Result<Self> {
        const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("text/calendar"));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|source| DashboardError::DataFetch { what: "calendar", source })?;

        let url = url.filter(|u| !u.trim().is_empty()).map(feed_url);
        if url.is_none() {
            warn!("calendar feed URL not configured; the calendar fetch will fail");
        }
        Ok(Self { url, tz, client })
    }

    pub async fn fetch(&self) -> Result<Vec<CalendarEvent>> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| {
                DashboardError::Configuration("calendar feed URL (CALENDAR_URL) is not set".into())
            })?;
        info!("Fetching calendar feed");

        let text = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| DashboardError::DataFetch { what: "calendar", source })?
            .text()
            .await
            .map_err(|source| DashboardError::DataFetch { what: "calendar", source })?;

        let events = parse_ics(&text, &self.tz)?;
        info!("Calendar: {} events", events.len());
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Los_Angeles;

    const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Vacation \u{1F3D6}\r\n\
DTSTART;VALUE=DATE:20261018\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Standup\\, daily\r\n\
DTSTART;TZID=America/New_York:20261018T120000\r\n\
BEGIN:VALARM\r\n\
SUMMARY:reminder\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Long title that is\r\n  folded\r\n\
DTSTART:20261019T160000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn test_parse_feed() {
        let events = parse_ics(FEED, &Los_Angeles).unwrap();
        assert_eq!(events.len(), 3);

        assert_eq!(events[0].summary, "Vacation \u{1F3D6}");
        assert!(events[0].all_day());
        assert_eq!(events[0].start, EventStart::AllDay(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()));

        assert_eq!(events[1].summary, "Standup, daily");
        assert!(!events[1].all_day());
        let EventStart::At(at) = events[1].start else { panic!("timed event expected") };
        assert_eq!(at.to_rfc3339(), "2026-10-18T12:00:00-04:00");
        assert_eq!(events[1].date_in(&Los_Angeles), NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());

        assert_eq!(events[2].summary, "Long title that is folded");
        // 16:00Z is 09:00 in Seattle
        let EventStart::At(at) = events[2].start else { panic!("timed event expected") };
        assert_eq!(at.with_timezone(&Los_Angeles).format("%H:%M").to_string(), "09:00");
    }

    #[test]
    fn test_floating_time_uses_configured_zone() {
        let ics = "BEGIN:VEVENT\nSUMMARY:Lunch\nDTSTART:20261018T120000\nEND:VEVENT\n";
        let events = parse_ics(ics, &Los_Angeles).unwrap();
        let EventStart::At(at) = events[0].start else { panic!("timed event expected") };
        assert_eq!(at.to_rfc3339(), "2026-10-18T12:00:00-07:00");
    }

    #[test]
    fn test_windows_tzid_maps_to_iana_zone() {
        let ics = "BEGIN:VEVENT\nSUMMARY:Sync\n\
DTSTART;TZID=Eastern Standard Time:20261018T120000\nEND:VEVENT\n";
        let events = parse_ics(ics, &Los_Angeles).unwrap();
        let EventStart::At(at) = events[0].start else { panic!("timed event expected") };
        assert_eq!(at.to_rfc3339(), "2026-10-18T12:00:00-04:00");
    }

    #[test]
    fn test_unknown_tzid_uses_configured_zone() {
        let ics = "BEGIN:VEVENT\nSUMMARY:Sync\n\
DTSTART;TZID=Made Up Zone:20261018T090000\nEND:VEVENT\n";
        let events = parse_ics(ics, &Los_Angeles).unwrap();
        let EventStart::At(at) = events[0].start else { panic!("timed event expected") };
        assert_eq!(at.to_rfc3339(), "2026-10-18T09:00:00-07:00");
    }

    #[test]
    fn test_date_in_zone_crosses_midnight() {
        let at = DateTime::parse_from_rfc3339("2026-10-19T05:00:00Z").unwrap();
        let event = CalendarEvent::new_at("Late", at);
        assert_eq!(event.date_in(&Los_Angeles), NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(event.date_in(&chrono_tz::UTC), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    }

    #[test]
    fn test_missing_dtstart_is_malformed() {
        let ics = "BEGIN:VEVENT\nSUMMARY:Nothing\nEND:VEVENT\n";
        assert!(matches!(parse_ics(ics, &Los_Angeles), Err(DashboardError::MalformedData(_))));

        let ics = "BEGIN:VEVENT\nDTSTART:tomorrow\nEND:VEVENT\n";
        assert!(matches!(parse_ics(ics, &Los_Angeles), Err(DashboardError::MalformedData(_))));
    }

    #[test]
    fn test_missing_summary_is_empty() {
        let ics = "BEGIN:VEVENT\nDTSTART;VALUE=DATE:20261020\nEND:VEVENT\n";
        let events = parse_ics(ics, &Los_Angeles).unwrap();
        assert_eq!(events[0].summary, "");
    }

    #[test]
    fn test_webcal_is_https() {
        assert_eq!(feed_url("webcal://example.com/cal.ics"), "https://example.com/cal.ics");
        assert_eq!(feed_url("https://example.com/cal.ics"), "https://example.com/cal.ics");
    }

    #[tokio::test]
    async fn test_fetch_without_url_is_configuration_error() {
        let client = CalendarClient::new(None, Los_Angeles).unwrap();
        assert!(matches!(client.fetch().await, Err(DashboardError::Configuration(_))));
    }
}
