/*
 *  config.rs
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
use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::constants::{DEFAULT_LAT, DEFAULT_LON, DEFAULT_TIMEZONE, DEFAULT_UNITS};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    /// IANA zone used for "today" and event times
    pub timezone: Option<String>,
    /// Output image path; `.pbm` writes packed 1bpp, anything else PNG
    pub output: Option<PathBuf>,
    pub weather: Option<WeatherConfig>,
    pub calendar: Option<CalendarConfig>,
    pub assets: Option<AssetsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub units: Option<String>,         // imperial | metric | standard
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CalendarConfig {
    /// iCalendar feed, https:// or webcal://
    pub feed_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AssetsConfig {
    pub icons_dir: Option<PathBuf>,
    pub emoji_dir: Option<PathBuf>,
}

impl WeatherConfig {
    pub fn lat(&self) -> f64 {
        self.lat.unwrap_or(DEFAULT_LAT)
    }

    pub fn lon(&self) -> f64 {
        self.lon.unwrap_or(DEFAULT_LON)
    }

    pub fn units(&self) -> String {
        self.units.clone().unwrap_or_else(|| DEFAULT_UNITS.to_string()).to_ascii_lowercase()
    }
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn tz(&self) -> Result<Tz, ConfigError> {
        let name = self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
        name.parse::<Tz>()
            .map_err(|_| ConfigError::Validation(format!("unknown timezone '{}'", name)))
    }

    pub fn output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from("status.png"))
    }

    pub fn weather(&self) -> WeatherConfig {
        self.weather.clone().unwrap_or_default()
    }

    pub fn feed_url(&self) -> Option<&str> {
        self.calendar.as_ref().and_then(|c| c.feed_url.as_deref())
    }

    pub fn icons_dir(&self) -> PathBuf {
        self.assets
            .as_ref()
            .and_then(|a| a.icons_dir.clone())
            .unwrap_or_else(|| PathBuf::from("assets/icons"))
    }

    pub fn emoji_dir(&self) -> PathBuf {
        self.assets
            .as_ref()
            .and_then(|a| a.emoji_dir.clone())
            .unwrap_or_else(|| PathBuf::from("assets/emoji"))
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "statusimage", about = "Render the e-ink status dashboard", version)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Weather API key
    #[arg(long, env = "WEATHERAPI", hide_env_values = true)]
    pub api_key: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,
    #[arg(long)]
    pub units: Option<String>,
    /// iCalendar feed URL
    #[arg(long, env = "CALENDAR_URL")]
    pub calendar_url: Option<String>,
    #[arg(long)]
    pub timezone: Option<String>,
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub icons_dir: Option<PathBuf>,
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub emoji_dir: Option<PathBuf>,
    /// Output image path
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
    /// Render as of this instant (RFC 3339) instead of the clock
    #[arg(long)]
    pub now: Option<DateTime<FixedOffset>>,
    /// Read weather JSON from a file instead of the API
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub weather_file: Option<PathBuf>,
    /// Read the calendar from an .ics file instead of the feed
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub calendar_file: Option<PathBuf>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<(Config, Cli), ConfigError> {
    let cli = Cli::parse();
    let cfg = load_from(&cli)?;

    if cli.dump_config {
        let mut shown = cfg.clone();
        if let Some(w) = shown.weather.as_mut() {
            if w.api_key.is_some() { w.api_key = Some("********".into()); }
        }
        let s = serde_yaml::to_string(&shown)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok((cfg, cli))
}

/// Defaults, then YAML, then CLI, then validation.
pub fn load_from(cli: &Cli) -> Result<Config, ConfigError> {
    let mut cfg = Config::default();

    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    apply_cli_overrides(&mut cfg, cli);
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    if let Some(home) = home_dir() {
        let p = home.join(".config/statusimage/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/statusimage.yaml");
        if p.exists() { return Some(p) }
    }
    for candidate in &["statusimage.yaml", "config.yaml", "config/statusimage.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()  { dst.log_level = src.log_level; }
    if src.timezone.is_some()   { dst.timezone = src.timezone; }
    if src.output.is_some()     { dst.output = src.output; }
    match (&mut dst.weather, src.weather) {
        (None, Some(w)) => dst.weather = Some(w),
        (Some(d), Some(s)) => merge_weather(d, s),
        _ => {}
    }
    match (&mut dst.calendar, src.calendar) {
        (None, Some(c)) => dst.calendar = Some(c),
        (Some(d), Some(s)) => {
            if s.feed_url.is_some() { d.feed_url = s.feed_url; }
        }
        _ => {}
    }
    match (&mut dst.assets, src.assets) {
        (None, Some(a)) => dst.assets = Some(a),
        (Some(d), Some(s)) => {
            if s.icons_dir.is_some() { d.icons_dir = s.icons_dir; }
            if s.emoji_dir.is_some() { d.emoji_dir = s.emoji_dir; }
        }
        _ => {}
    }
}

fn merge_weather(dst: &mut WeatherConfig, src: WeatherConfig) {
    if src.api_key.is_some()  { dst.api_key = src.api_key; }
    if src.lat.is_some()      { dst.lat = src.lat; }
    if src.lon.is_some()      { dst.lon = src.lon; }
    if src.units.is_some()    { dst.units = src.units; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()  { cfg.log_level = cli.log_level.clone(); }
    if cli.timezone.is_some()   { cfg.timezone = cli.timezone.clone(); }
    if cli.output.is_some()     { cfg.output = cli.output.clone(); }

    let any_weather = cli.api_key.is_some()
        || cli.lat.is_some()
        || cli.lon.is_some()
        || cli.units.is_some();
    if any_weather {
        let weather = cfg.weather.get_or_insert_with(WeatherConfig::default);
        if cli.api_key.is_some()  { weather.api_key = cli.api_key.clone(); }
        if cli.lat.is_some()      { weather.lat = cli.lat; }
        if cli.lon.is_some()      { weather.lon = cli.lon; }
        if cli.units.is_some()    { weather.units = cli.units.clone(); }
    }

    if cli.calendar_url.is_some() {
        let calendar = cfg.calendar.get_or_insert_with(CalendarConfig::default);
        calendar.feed_url = cli.calendar_url.clone();
    }

    if cli.icons_dir.is_some() || cli.emoji_dir.is_some() {
        let assets = cfg.assets.get_or_insert_with(AssetsConfig::default);
        if cli.icons_dir.is_some()  { assets.icons_dir = cli.icons_dir.clone(); }
        if cli.emoji_dir.is_some()  { assets.emoji_dir = cli.emoji_dir.clone(); }
    }
}

/// Ranges, known units, a parseable timezone.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let weather = cfg.weather();
    let (lat, lon) = (weather.lat(), weather.lon());
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ConfigError::Validation(format!("latitude {} out of range -90..=90", lat)));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ConfigError::Validation(format!("longitude {} out of range -180..=180", lon)));
    }
    match weather.units().as_str() {
        "imperial" | "metric" | "standard" => {}
        other => {
            return Err(ConfigError::Validation(format!(
                "units must be imperial|metric|standard, got '{}'",
                other
            )))
        }
    }
    cfg.tz()?;
    if let Some(url) = cfg.feed_url() {
        if !["https://", "http://", "webcal://"].iter().any(|scheme| url.starts_with(scheme)) {
            return Err(ConfigError::Validation(format!(
                "unsupported calendar URL scheme: {}",
                url
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with(config: &Path) -> Cli {
        Cli { config: Some(config.to_path_buf()), ..Default::default() }
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.tz().unwrap(), chrono_tz::America::Los_Angeles);
        assert_eq!(cfg.weather().units(), "imperial");
        assert_eq!(cfg.weather().lat(), DEFAULT_LAT);
        assert_eq!(cfg.output(), PathBuf::from("status.png"));
        assert_eq!(cfg.icons_dir(), PathBuf::from("assets/icons"));
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_yaml_then_cli_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statusimage.yaml");
        fs::write(
            &path,
            "timezone: Europe/London\nweather:\n  lat: 51.5\n  units: metric\nassets:\n  icons_dir: /srv/icons\n",
        )
        .unwrap();

        let mut cli = cli_with(&path);
        cli.units = Some("standard".into());
        cli.emoji_dir = Some(PathBuf::from("/srv/emoji"));
        let cfg = load_from(&cli).unwrap();

        assert_eq!(cfg.tz().unwrap(), chrono_tz::Europe::London);
        assert_eq!(cfg.weather().lat(), 51.5);
        assert_eq!(cfg.weather().lon(), DEFAULT_LON);
        assert_eq!(cfg.weather().units(), "standard");
        assert_eq!(cfg.icons_dir(), PathBuf::from("/srv/icons"));
        assert_eq!(cfg.emoji_dir(), PathBuf::from("/srv/emoji"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let cli = cli_with(Path::new("/nonexistent/statusimage.yaml"));
        assert!(matches!(load_from(&cli), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.weather = Some(WeatherConfig { lat: Some(91.0), ..Default::default() });
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.weather = Some(WeatherConfig { units: Some("kelvin".into()), ..Default::default() });
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.timezone = Some("Mars/Olympus".into());
        assert!(validate(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.calendar = Some(CalendarConfig { feed_url: Some("ftp://x".into()) });
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_cli_parses_now_and_files() {
        let cli = Cli::try_parse_from([
            "statusimage",
            "--now",
            "2026-10-18T10:00:00-07:00",
            "--weather-file",
            "w.json",
            "--lon",
            "-0.12",
        ])
        .unwrap();
        assert_eq!(cli.now.unwrap().to_rfc3339(), "2026-10-18T10:00:00-07:00");
        assert_eq!(cli.weather_file, Some(PathBuf::from("w.json")));
        assert_eq!(cli.lon, Some(-0.12));
    }
}
