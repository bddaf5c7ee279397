/*
 *  display/mod.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Dashboard layout and composition
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

pub mod error;

// Geometry and draw instructions
pub mod layout;
pub mod text;

// Band builders
pub mod components;

pub mod composer;

// Re-exports for convenience
pub use error::{DashboardError, Result};
pub use layout::{center_offset, DrawOp, LayoutRegion};
pub use components::{AgendaDayWindow, SectionLayout};
pub use composer::DashboardComposer;
