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

//! # Trip Request
//!
//! Side-effect free parsing of the comparison form into a typed request.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::FareError;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Acceptable fare range supplied by the user, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: i64,
    pub max: i64,
}

/// Raw form fields as posted by the comparison page.
///
/// Every field is optional so a missing one surfaces as a [`FareError`]
/// rather than an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareForm {
    #[serde(rename = "Dep_Time", default)]
    pub dep_time: Option<String>,
    #[serde(rename = "Arrival_Time", default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub stops: Option<String>,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(rename = "Source", default)]
    pub source: Option<String>,
    #[serde(rename = "Destination", default)]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub stops: i64,
    pub price_band: PriceBand,
    pub origin: String,
    pub destination: String,
}

impl TripRequest {
    pub fn builder(
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
        origin: String,
        destination: String,
    ) -> TripRequestBuilder {
        TripRequestBuilder {
            departure,
            arrival,
            origin,
            destination,
            stops: 0,
            price_band: PriceBand { min: 0, max: 0 },
        }
    }

    pub fn from_form(form: &CompareForm) -> Result<Self, FareError> {
        let departure = parse_datetime("Dep_Time", required(&form.dep_time, "Dep_Time")?)?;
        let arrival = parse_datetime("Arrival_Time", required(&form.arrival_time, "Arrival_Time")?)?;
        let stops = parse_int("stops", required(&form.stops, "stops")?)?;
        let min = parse_int("min_price", required(&form.min_price, "min_price")?)?;
        let max = parse_int("max_price", required(&form.max_price, "max_price")?)?;
        let origin = required(&form.source, "Source")?;
        let destination = required(&form.destination, "Destination")?;

        Ok(Self::builder(
            departure,
            arrival,
            origin.to_string(),
            destination.to_string(),
        )
        .stops(stops)
        .price_band(PriceBand { min, max })
        .build())
    }

    /// Calendar date the fare table is computed for
    pub fn journey_date(&self) -> NaiveDate {
        self.departure.date()
    }

    /// Per-component absolute difference of the clock times, as (hours, minutes).
    ///
    /// Not an elapsed time: an overnight 22:00 → 01:30 flight yields (21, 30).
    // FIXME: handle day rollover once the model is retrained on true elapsed durations.
    pub fn duration(&self) -> (u32, u32) {
        (
            self.arrival.hour().abs_diff(self.departure.hour()),
            self.arrival.minute().abs_diff(self.departure.minute()),
        )
    }
}

#[derive(Clone)]
pub struct TripRequestBuilder {
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
    origin: String,
    destination: String,
    stops: i64,
    price_band: PriceBand,
}

impl TripRequestBuilder {
    pub fn stops(mut self, stops: i64) -> Self {
        self.stops = stops;
        self
    }

    pub fn price_band(mut self, price_band: PriceBand) -> Self {
        self.price_band = price_band;
        self
    }

    pub fn build(self) -> TripRequest {
        TripRequest {
            departure: self.departure,
            arrival: self.arrival,
            stops: self.stops,
            price_band: self.price_band,
            origin: self.origin,
            destination: self.destination,
        }
    }
}

/// Parse a `datetime-local` form value (`YYYY-MM-DDTHH:MM`, seconds optional)
pub fn parse_datetime(field: &'static str, value: &str) -> Result<NaiveDateTime, FareError> {
    let trimmed = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| FareError::InvalidDateTime {
            field,
            value: value.to_string(),
        })
}

fn parse_int(field: &'static str, value: &str) -> Result<i64, FareError> {
    value
        .trim()
        .parse()
        .map_err(|_| FareError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, FareError> {
    value.as_deref().ok_or(FareError::MissingField(field))
}
