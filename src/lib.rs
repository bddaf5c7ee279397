/*
 *  lib.rs
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

pub mod config;
pub mod constants;
pub mod canvas;
pub mod svgimage;
pub mod icons;
pub mod typeset;
pub mod deutils;
pub mod weather;
pub mod calendar;
pub mod func_timer;
pub mod display;

pub use calendar::{CalendarEvent, EventStart};
pub use canvas::Canvas;
pub use display::{DashboardComposer, DashboardError, DrawOp, LayoutRegion};
pub use icons::{IconRef, IconStore, UiIcon};
pub use typeset::{BitmapTypesetter, Font, TextMeasurer, Typesetter};
pub use weather::{DailyForecast, WeatherSnapshot, WeatherTemps};
