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

// Library for farecast-fare-estimator
// Fare predictions across airlines for a requested trip, plus a 7-day trend

mod error;
mod estimator;
mod features;
mod report;
mod trip_request;
mod vocabulary;

#[cfg(feature = "mcp")]
pub mod mcp_server;
#[cfg(feature = "web")]
pub mod web;

pub use error::FareError;
pub use estimator::{
    AirlineFare, Comparison, FareEstimator, FareQuote, FareStatus, TREND_DAYS, TrendPoint,
    cheapest_day, label_range, round_fare,
};
pub use features::{FIXED_FEATURES, FeatureVector, TripFeatures};
pub use report::{
    ComparisonResponse, PageBody, calendar_json, escape_html, fare_table_html, fmt_day_month,
    render_page, trend_json,
};
pub use trip_request::{CompareForm, PriceBand, TripRequest, TripRequestBuilder, parse_datetime};
pub use vocabulary::{CityColumns, Vocabulary};

// Re-export the model interface so front ends only depend on this crate
pub use farecast_fare_model::{FareModel, ModelArtifact, ModelError};
