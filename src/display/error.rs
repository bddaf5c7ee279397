/*
 *  display/error.rs
 *
 *  StatusImage - e-ink weather & agenda dashboard
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error taxonomy shared by the fetchers, the builders and the composer
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

use std::convert::Infallible;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure aborts the render; there is no partial canvas.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A required credential or URL is absent
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network failure fetching weather or calendar data
    #[error("failed to fetch {what}: {source}")]
    DataFetch {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// An icon or glyph referenced by the layout cannot be loaded
    #[error("asset missing: {}: {reason}", path.display())]
    AssetMissing { path: PathBuf, reason: String },

    /// Expected field absent or wrong-shaped in a payload
    #[error("malformed data: {0}")]
    MalformedData(String),

    /// Drawing operation failed
    #[error("drawing error: {0}")]
    Drawing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn asset_missing(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DashboardError::AssetMissing { path: path.into(), reason: reason.into() }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        DashboardError::MalformedData(msg.into())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::MalformedData(format!("JSON: {}", err))
    }
}

// canvas draws cannot fail
impl From<Infallible> for DashboardError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(source: reqwest::Error) -> Self {
        DashboardError::DataFetch { what: "request", source }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
