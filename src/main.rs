/*
 *  main.rs
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

use anyhow::{Context, Result};
use chrono::Utc;
use env_logger::Env;
use log::info;

use statusimage::calendar::{parse_ics, CalendarClient};
use statusimage::config;
use statusimage::weather::WeatherClient;
use statusimage::{BitmapTypesetter, DashboardComposer, IconStore, WeatherSnapshot};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

#[tokio::main]
async fn main() -> Result<()> {
    let (cfg, cli) = config::load().context("loading configuration")?;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let tz = cfg.tz()?;
    let now = cli
        .now
        .unwrap_or_else(|| Utc::now().with_timezone(&tz).fixed_offset());
    info!("Rendering as of {} ({})", now.to_rfc3339(), tz);

    let weather = async {
        match &cli.weather_file {
            Some(path) => {
                info!("Reading weather from {}", path.display());
                let body = tokio::fs::read_to_string(path).await?;
                WeatherSnapshot::from_json(&body, tz)
            }
            None => WeatherClient::new(&cfg.weather(), tz)?.fetch().await,
        }
    };
    let calendar = async {
        match &cli.calendar_file {
            Some(path) => {
                info!("Reading calendar from {}", path.display());
                let text = tokio::fs::read_to_string(path).await?;
                parse_ics(&text, &tz)
            }
            None => CalendarClient::new(cfg.feed_url(), tz)?.fetch().await,
        }
    };
    let (weather, events) = tokio::try_join!(weather, calendar).context("fetching dashboard data")?;

    let typesetter = BitmapTypesetter::with_emoji_dir(&cfg.emoji_dir())?;
    let composer = DashboardComposer::new(typesetter, IconStore::new(cfg.icons_dir()), tz);
    let canvas = composer
        .render(&weather, &events, now)
        .context("rendering dashboard")?;

    let output = cfg.output();
    canvas
        .save(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!("Wrote {}", output.display());
    Ok(())
}
