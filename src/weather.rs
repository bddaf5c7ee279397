/*
 *  weather.rs
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
use std::io::Read;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use flate2::read::GzDecoder;
use log::{debug, info, warn};
use reqwest::{header, Client};
use serde::Deserialize;

use crate::config::WeatherConfig;
use crate::constants::{FORECAST_DAYS, ONECALL_EXCLUDE, ONECALL_URL};
use crate::deutils::{deserialize_epoch_utc, deserialize_numeric_f64};
use crate::display::error::{DashboardError, Result};

// One Call wire format, only the fields the dashboard reads
#[derive(Debug, Deserialize)]
struct OneCall {
    current: WireCurrent,
    daily: Vec<WireDaily>,
}

#[derive(Debug, Deserialize)]
struct WireCurrent {
    #[serde(deserialize_with = "deserialize_numeric_f64")]
    temp: f64,
    #[serde(default)]
    weather: Vec<WireCondition>,
}

#[derive(Debug, Deserialize)]
struct WireDaily {
    #[serde(deserialize_with = "deserialize_epoch_utc")]
    dt: DateTime<Utc>,
    temp: WireTemp,
    #[serde(deserialize_with = "deserialize_numeric_f64")]
    pop: f64,
    #[serde(default)]
    weather: Vec<WireCondition>,
}

#[derive(Debug, Deserialize)]
struct WireTemp {
    #[serde(deserialize_with = "deserialize_numeric_f64")]
    min: f64,
    #[serde(deserialize_with = "deserialize_numeric_f64")]
    max: f64,
}

#[derive(Debug, Deserialize)]
struct WireCondition {
    icon: String,
}

/// One day of forecast data.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temp_low: f64,
    pub temp_high: f64,
    /// Clamped to [0, 1] on construction
    pub precipitation_probability: f64,
    pub icon_id: String,
}

impl DailyForecast {
    /// Validates `low <= high` and clamps the precipitation probability.
    pub fn new(
        date: NaiveDate,
        temp_low: f64,
        temp_high: f64,
        precipitation_probability: f64,
        icon_id: impl Into<String>,
    ) -> Result<Self> {
        let finite = [temp_low, temp_high, precipitation_probability].iter().all(|v| v.is_finite());
        if !finite {
            return Err(DashboardError::malformed(format!(
                "non-finite forecast value for {}",
                date
            )));
        }
        if temp_low > temp_high {
            return Err(DashboardError::malformed(format!(
                "forecast for {} has low {} above high {}",
                date, temp_low, temp_high
            )));
        }
        let icon_id = icon_id.into();
        if icon_id.is_empty() {
            return Err(DashboardError::malformed(format!("forecast for {} has no icon", date)));
        }
        Ok(Self {
            date,
            temp_low,
            temp_high,
            precipitation_probability: precipitation_probability.clamp(0.0, 1.0),
            icon_id,
        })
    }

    /// Three-letter weekday computed from the date, e.g. "Mon".
    pub fn day_label(&self) -> String {
        self.date.format("%a").to_string()
    }

    /// e.g. "50° - 65°"
    pub fn temp_range_label(&self) -> String {
        format!("{}° - {}°", round_temp(self.temp_low), round_temp(self.temp_high))
    }

    /// Whole percent in [0, 100]
    pub fn pop_percent(&self) -> u8 {
        (self.precipitation_probability.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Rounded low/high/precipitation for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherTemps {
    pub low: i64,
    pub high: i64,
    pub pop: u8,
}

/// Weather for one render. Index 0 of `daily` is today.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub current_temp: f64,
    pub current_icon: String,
    pub daily: Vec<DailyForecast>,
}

/// Rounds half away from zero.
pub fn round_temp(t: f64) -> i64 {
    t.round() as i64
}

impl WeatherSnapshot {
    /// Parse a One Call JSON body; daily timestamps become dates in `tz`.
    pub fn from_json(body: &str, tz: Tz) -> Result<Self> {
        let wire: OneCall = serde_json::from_str(body)?;
        Self::from_wire(wire, tz)
    }

    fn from_wire(wire: OneCall, tz: Tz) -> Result<Self> {
        let current_icon = wire
            .current
            .weather
            .first()
            .map(|w| w.icon.clone())
            .ok_or_else(|| DashboardError::malformed("current.weather[0].icon missing"))?;

        let daily = wire
            .daily
            .into_iter()
            .enumerate()
            .map(|(i, d)| {
                let icon = d
                    .weather
                    .first()
                    .map(|w| w.icon.clone())
                    .ok_or_else(|| {
                        DashboardError::malformed(format!("daily[{}].weather[0].icon missing", i))
                    })?;
                DailyForecast::new(
                    d.dt.with_timezone(&tz).date_naive(),
                    d.temp.min,
                    d.temp.max,
                    d.pop,
                    icon,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        if daily.is_empty() {
            return Err(DashboardError::malformed("daily forecast is empty"));
        }

        Ok(Self {
            current_temp: wire.current.temp,
            current_icon,
            daily,
        })
    }

    /// e.g. "72°"
    pub fn current_temp_label(&self) -> String {
        format!("{}°", round_temp(self.current_temp))
    }

    /// Today's low, high and precipitation chance, rounded.
    pub fn weather_temps(&self) -> Result<WeatherTemps> {
        let today = self
            .daily
            .first()
            .ok_or_else(|| DashboardError::malformed("daily[0] missing"))?;
        let (a, b) = (round_temp(today.temp_low), round_temp(today.temp_high));
        Ok(WeatherTemps {
            low: a.min(b),
            high: a.max(b),
            pop: today.pop_percent(),
        })
    }

    /// Days 1..=5, tomorrow onwards. Fewer than five is malformed.
    pub fn forecast_days(&self) -> Result<&[DailyForecast]> {
        self.daily
            .get(1..=FORECAST_DAYS)
            .ok_or_else(|| DashboardError::malformed(format!(
                "need daily[1..={}], got {} entries",
                FORECAST_DAYS,
                self.daily.len()
            )))
    }
}

/// Gunzip when the body is gzip, else treat it as plain text.
fn decode_body(raw: &[u8]) -> String {
    let mut decoder = GzDecoder::new(raw);
    let mut decoded = String::new();
    match decoder.read_to_string(&mut decoded) {
        Ok(_) => decoded,
        Err(_) => String::from_utf8_lossy(raw).to_string(),
    }
}

/// One Call API client
#[derive(Debug)]
pub struct WeatherClient {
    api_key: Option<String>,
    lat: f64,
    lon: f64,
    units: String,
    tz: Tz,
    client: Client,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig, tz: Tz) -> Result<Self> {
        const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("application/json"));
        headers.insert("Accept-Encoding", header::HeaderValue::from_static("gzip"));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|source| DashboardError::DataFetch { what: "weather", source })?;

        let api_key = config.api_key.clone().filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!("weather API key not configured; the weather fetch will fail");
        }

        Ok(Self {
            api_key,
            lat: config.lat(),
            lon: config.lon(),
            units: config.units(),
            tz,
            client,
        })
    }

    /// Query parameters; fails when no API key is configured.
    pub fn query(&self) -> Result<Vec<(&'static str, String)>> {
        let key = self
            .api_key
            .as_ref()
            .ok_or_else(|| {
                DashboardError::Configuration("weather API key (WEATHERAPI) is not set".into())
            })?;
        Ok(vec![
            ("lat", self.lat.to_string()),
            ("lon", self.lon.to_string()),
            ("exclude", ONECALL_EXCLUDE.to_string()),
            ("units", self.units.clone()),
            ("appid", key.clone()),
        ])
    }

    /// Fetch and validate the snapshot. No retries: any failure is returned as-is.
    pub async fn fetch(&self) -> Result<WeatherSnapshot> {
        let params = self.query()?;
        info!("Fetching weather for {:.4}, {:.4} ({})", self.lat, self.lon, self.units);

        let response = self
            .client
            .get(ONECALL_URL)
            .query(&params)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| DashboardError::DataFetch { what: "weather", source })?;
        let raw = response
            .bytes()
            .await
            .map_err(|source| DashboardError::DataFetch { what: "weather", source })?;

        let body = decode_body(&raw);
        debug!("weather payload {} bytes", body.len());
        let snapshot = WeatherSnapshot::from_json(&body, self.tz)?;
        info!(
            "Weather: {} now, {} daily entries",
            snapshot.current_temp_label(),
            snapshot.daily.len()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    fn sample_json() -> String {
        let days: Vec<String> = (0..8)
            .map(|i| {
                format!(
                    r#"{{"dt": {}, "temp": {{"min": 50, "max": 65, "day": 60}}, "pop": 0.3, "weather": [{{"id": 500, "icon": "10d"}}]}}"#,
                    1792353600 + i * 86400
                )
            })
            .collect();
        format!(
            r#"{{"lat": 47.6, "lon": -122.3, "current": {{"dt": 1792353600, "temp": 72.4, "weather": [{{"icon": "01d"}}]}}, "daily": [{}]}}"#,
            days.join(",")
        )
    }

    #[test]
    fn test_parse_onecall() {
        let snap = WeatherSnapshot::from_json(&sample_json(), chrono_tz::America::Los_Angeles).unwrap();
        assert_eq!(snap.current_temp_label(), "72°");
        assert_eq!(snap.current_icon, "01d");
        assert_eq!(snap.daily.len(), 8);
        assert_eq!(snap.daily[0].date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        assert_eq!(snap.daily[1].day_label(), "Mon");
        assert_eq!(snap.daily[1].temp_range_label(), "50° - 65°");
    }

    #[test]
    fn test_weather_temps() {
        let snap = WeatherSnapshot::from_json(&sample_json(), chrono_tz::UTC).unwrap();
        assert_eq!(snap.weather_temps().unwrap(), WeatherTemps { low: 50, high: 65, pop: 30 });
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(round_temp(72.5), 73);
        assert_eq!(round_temp(72.4), 72);
        assert_eq!(round_temp(-0.5), -1);
        assert_eq!(round_temp(-3.4), -3);
    }

    #[test]
    fn test_pop_is_clamped() {
        let d = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(DailyForecast::new(d, 1.0, 2.0, 1.7, "01d").unwrap().pop_percent(), 100);
        assert_eq!(DailyForecast::new(d, 1.0, 2.0, -0.2, "01d").unwrap().pop_percent(), 0);
    }

    #[test]
    fn test_low_above_high_is_malformed() {
        let d = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(matches!(DailyForecast::new(d, 70.0, 60.0, 0.1, "01d"), Err(DashboardError::MalformedData(_))));
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let no_daily = r#"{"current": {"temp": 70, "weather": [{"icon": "01d"}]}}"#;
        assert!(matches!(WeatherSnapshot::from_json(no_daily, chrono_tz::UTC), Err(DashboardError::MalformedData(_))));

        let no_icon = r#"{"current": {"temp": 70, "weather": []}, "daily": []}"#;
        assert!(matches!(WeatherSnapshot::from_json(no_icon, chrono_tz::UTC), Err(DashboardError::MalformedData(_))));

        let no_pop = r#"{"current": {"temp": 70, "weather": [{"icon": "01d"}]},
            "daily": [{"dt": 0, "temp": {"min": 1, "max": 2}, "weather": [{"icon": "01d"}]}]}"#;
        assert!(matches!(WeatherSnapshot::from_json(no_pop, chrono_tz::UTC), Err(DashboardError::MalformedData(_))));
    }

    #[test]
    fn test_forecast_days_needs_five_after_today() {
        let mut snap = WeatherSnapshot::from_json(&sample_json(), chrono_tz::UTC).unwrap();
        assert_eq!(snap.forecast_days().unwrap().len(), 5);
        snap.daily.truncate(5);
        assert!(matches!(snap.forecast_days(), Err(DashboardError::MalformedData(_))));
    }

    #[test]
    fn test_decode_body_handles_gzip_and_plain() {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"{\"a\":1}").unwrap();
        let gz = enc.finish().unwrap();
        assert_eq!(decode_body(&gz), "{\"a\":1}");
        assert_eq!(decode_body(b"{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_query_without_key_is_configuration_error() {
        let client = WeatherClient::new(&WeatherConfig::default(), chrono_tz::UTC).unwrap();
        assert!(matches!(client.query(), Err(DashboardError::Configuration(_))));
    }

    #[test]
    fn test_query_carries_location_and_units() {
        let cfg = WeatherConfig { api_key: Some("k".into()), ..Default::default() };
        let client = WeatherClient::new(&cfg, chrono_tz::UTC).unwrap();
        let q = client.query().unwrap();
        assert!(q.contains(&("units", "imperial".to_string())));
        assert!(q.contains(&("lat", "47.608013".to_string())));
        assert!(q.contains(&("exclude", "minutely,hourly,alerts".to_string())));
        assert!(q.contains(&("appid", "k".to_string())));
    }
}
