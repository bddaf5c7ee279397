/*
 *  display/composer.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Sequences the dashboard bands and draws them on a fresh canvas
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

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use embedded_graphics::{
    prelude::*,
    primitives::{Line, PrimitiveStyle},
};
use log::{debug, info, warn};

use crate::calendar::CalendarEvent;
use crate::canvas::Canvas;
use crate::constants::{AGENDA_ROW_HEIGHT, CANVAS_HEIGHT, CANVAS_WIDTH, FORECAST_HEIGHT, FORECAST_Y};
use crate::display::components::{
    build_conditions, build_forecast, build_header, build_section, AgendaDayWindow,
};
use crate::display::error::{DashboardError, Result};
use crate::display::layout::DrawOp;
use crate::func_timer::FunctionTimer;
use crate::icons::IconStore;
use crate::typeset::Typesetter;
use crate::weather::WeatherSnapshot;

pub const TODAY_LABEL: &str = "Today";
pub const TOMORROW_LABEL: &str = "Tomorrow";

/// Lays out and draws the whole dashboard for one render.
pub struct DashboardComposer<T: Typesetter> {
    typesetter: T,
    icons: IconStore,
    tz: Tz,
}

impl<T: Typesetter> DashboardComposer<T> {
    pub fn new(typesetter: T, icons: IconStore, tz: Tz) -> Self {
        Self { typesetter, icons, tz }
    }

    /// Every draw instruction, top to bottom. Measurement only, no pixels.
    pub fn plan(
        &self,
        weather: &WeatherSnapshot,
        events: &[CalendarEvent],
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<DrawOp>> {
        let today = now.with_timezone(&self.tz).date_naive();
        let tomorrow = today
            .succ_opt()
            .ok_or_else(|| DashboardError::malformed(format!("no day after {}", today)))?;
        let measurer = &self.typesetter;

        let mut ops = build_header(measurer, today);
        ops.extend(build_conditions(measurer, weather)?);
        ops.extend(build_forecast(measurer, weather.forecast_days()?, CANVAS_WIDTH, FORECAST_Y)?);

        let mut y = FORECAST_Y + FORECAST_HEIGHT as i32;
        let mut row_tops = Vec::new();
        for (label, date, not_before) in [
            (TODAY_LABEL, today, Some(now)),
            (TOMORROW_LABEL, tomorrow, None),
        ] {
            let window = AgendaDayWindow::select(events, date, &self.tz, not_before);
            debug!("{} ({}): {} events from y={}", label, date, window.len(), y);
            let section = build_section(measurer, label, &window, &self.tz, y);
            ops.extend(section.ops);
            row_tops.extend(section.row_tops);
            y = section.end_y;
        }

        let clipped = row_tops
            .iter()
            .filter(|&&top| top + AGENDA_ROW_HEIGHT > CANVAS_HEIGHT as i32)
            .count();
        if clipped > 0 {
            warn!("{} agenda rows run past the bottom of the panel and are clipped", clipped);
        }
        debug!("planned {} draw ops, agenda ends at y={}", ops.len(), y);
        Ok(ops)
    }

    /// Plan, then draw on a blank canvas. Any error discards the canvas.
    pub fn render(
        &self,
        weather: &WeatherSnapshot,
        events: &[CalendarEvent],
        now: DateTime<FixedOffset>,
    ) -> Result<Canvas> {
        let _timer = FunctionTimer::new("render");
        let ops = self.plan(weather, events, now)?;
        let mut canvas = Canvas::dashboard();
        for op in &ops {
            self.execute(&mut canvas, op)?;
        }
        info!("Rendered {} ops, {} ink pixels", ops.len(), canvas.count_ink());
        Ok(canvas)
    }

    fn execute(&self, canvas: &mut Canvas, op: &DrawOp) -> Result<()> {
        match op {
            DrawOp::Fill { region, color } => {
                canvas.fill_solid(&region.rect(), *color)?;
            }
            DrawOp::Line { from, to, color, width } => {
                Line::new(*from, *to)
                    .into_styled(PrimitiveStyle::with_stroke(*color, *width))
                    .draw(canvas)?;
            }
            DrawOp::Text { text, font, origin, color } => {
                self.typesetter.draw_text(canvas, text, *font, *origin, *color)?;
            }
            DrawOp::Icon { icon, region } => {
                let bitmap = self.icons.load(icon, region.size())?;
                bitmap.draw(canvas, region.top_left())?;
            }
        }
        Ok(())
    }
}
