//!  Farecast Fare Estimator
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Fare Estimator Errors

use chrono::NaiveDate;
use farecast_fare_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FareError {
    #[error("missing form field '{0}'")]
    MissingField(&'static str),

    #[error("invalid value for '{field}': '{value}' is not an integer")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid datetime for '{field}': '{value}' (expected YYYY-MM-DDTHH:MM)")]
    InvalidDateTime { field: &'static str, value: String },

    #[error("unknown {role} city '{city}'. Known cities: {known}")]
    UnknownCity {
        role: &'static str,
        city: String,
        known: String,
    },

    #[error("invalid vocabulary: {0}")]
    InvalidVocabulary(String),

    #[error("vocabulary encodes {vocabulary} features but the model expects {model}")]
    FeatureWidthMismatch { vocabulary: usize, model: usize },

    #[error("no calendar date {days} days after {start}")]
    DateOutOfRange { start: NaiveDate, days: u64 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed vocabulary: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}
