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

//! # Feature Encoding
//!
//! Builds model input rows. Column order:
//!
//! | Columns | Content |
//! |---|---|
//! | 0 | stop count |
//! | 1, 2 | day, month |
//! | 3, 4 | departure hour, minute |
//! | 5, 6 | arrival hour, minute |
//! | 7, 8 | duration hour, minute |
//! | 9.. | airline one-hot, then origin one-hot, then destination one-hot |

use crate::error::FareError;
use crate::trip_request::TripRequest;
use crate::vocabulary::Vocabulary;

/// Number of columns preceding the airline one-hot block
pub const FIXED_FEATURES: usize = 9;

/// A single model input row
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The request fields shared by every row of a comparison, encoded once.
#[derive(Debug, Clone, PartialEq)]
pub struct TripFeatures {
    pub stops: f64,
    pub dep_hour: u32,
    pub dep_minute: u32,
    pub arr_hour: u32,
    pub arr_minute: u32,
    pub dur_hour: u32,
    pub dur_minute: u32,
    pub origin: Vec<f64>,
    pub destination: Vec<f64>,
}

impl TripFeatures {
    pub fn encode(request: &TripRequest, vocabulary: &Vocabulary) -> Result<Self, FareError> {
        use chrono::Timelike;

        let origin = vocabulary.encode_origin(&request.origin)?;
        let destination = vocabulary.encode_destination(&request.destination)?;
        let (dur_hour, dur_minute) = request.duration();

        Ok(Self {
            stops: request.stops as f64,
            dep_hour: request.departure.hour(),
            dep_minute: request.departure.minute(),
            arr_hour: request.arrival.hour(),
            arr_minute: request.arrival.minute(),
            dur_hour,
            dur_minute,
            origin,
            destination,
        })
    }

    /// Row for `airline` (index into the airline vocabulary of `n_airlines`) on `day`/`month`
    pub fn row(&self, day: u32, month: u32, airline: usize, n_airlines: usize) -> FeatureVector {
        let mut row =
            Vec::with_capacity(FIXED_FEATURES + n_airlines + self.origin.len() + self.destination.len());
        row.extend_from_slice(&[
            self.stops,
            day as f64,
            month as f64,
            self.dep_hour as f64,
            self.dep_minute as f64,
            self.arr_hour as f64,
            self.arr_minute as f64,
            self.dur_hour as f64,
            self.dur_minute as f64,
        ]);
        row.extend((0..n_airlines).map(|i| if i == airline { 1.0 } else { 0.0 }));
        row.extend_from_slice(&self.origin);
        row.extend_from_slice(&self.destination);
        FeatureVector(row)
    }
}
