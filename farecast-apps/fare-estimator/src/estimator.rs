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

//! # Fare Estimator
//!
//! Runs the fare model once per airline for a date, labels each fare against
//! the user's price band, and scans the following week for the cheapest day.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Datelike, Days, NaiveDate};
use farecast_fare_model::{FareModel, ModelArtifact};
use serde::{Deserialize, Serialize};

use crate::error::FareError;
use crate::features::TripFeatures;
use crate::trip_request::{CompareForm, PriceBand, TripRequest};
use crate::vocabulary::Vocabulary;

/// Length of the forward fare trend, starting at the departure date
pub const TREND_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FareStatus {
    #[serde(rename = "Very Cheap")]
    VeryCheap,
    #[serde(rename = "Meets Expectation")]
    MeetsExpectation,
    #[serde(rename = "Expensive")]
    Expensive,
}

impl FareStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FareStatus::VeryCheap => "Very Cheap",
            FareStatus::MeetsExpectation => "Meets Expectation",
            FareStatus::Expensive => "Expensive",
        }
    }
}

impl fmt::Display for FareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `price` against `band`. Both band ends count as meeting expectation.
pub fn label_range(price: f64, band: &PriceBand) -> FareStatus {
    if price < band.min as f64 {
        FareStatus::VeryCheap
    } else if price > band.max as f64 {
        FareStatus::Expensive
    } else {
        FareStatus::MeetsExpectation
    }
}

/// Round to 2 decimals, the precision fares are displayed and compared at.
/// Halves go to the even cent.
pub fn round_fare(fare: f64) -> f64 {
    (fare * 100.0).round_ties_even() / 100.0
}

/// Raw model output for one airline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineFare {
    pub airline: String,
    pub fare: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareQuote {
    pub airline: String,
    pub fare: f64,
    pub status: FareStatus,
}

/// Cheapest airline on one day of the trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub fare: f64,
    pub airline: String,
}

/// Everything the comparison page shows for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub journey_date: NaiveDate,
    pub price_band: PriceBand,
    /// Sorted by ascending fare; ties keep vocabulary order
    pub fares: Vec<FareQuote>,
    pub best: FareQuote,
    pub trend: Vec<TrendPoint>,
    pub cheapest_day: TrendPoint,
}

impl Comparison {
    pub fn has_fare_in_range(&self) -> bool {
        self.fares
            .iter()
            .any(|q| q.status == FareStatus::MeetsExpectation)
    }
}

/// First trend point with the lowest fare
pub fn cheapest_day(trend: &[TrendPoint]) -> Option<&TrendPoint> {
    trend
        .iter()
        .reduce(|best, point| if point.fare < best.fare { point } else { best })
}

pub struct FareEstimator {
    model: Arc<dyn FareModel>,
    vocabulary: Vocabulary,
}

impl FareEstimator {
    pub fn new(model: Arc<dyn FareModel>, vocabulary: Vocabulary) -> Result<Self, FareError> {
        vocabulary.validate()?;
        if let Some(expected) = model.n_features() {
            let width = vocabulary.feature_width();
            if width != expected {
                return Err(FareError::FeatureWidthMismatch {
                    vocabulary: width,
                    model: expected,
                });
            }
        }
        tracing::debug!(
            "Fare estimator ready: model '{}', {} airlines",
            model.name(),
            vocabulary.airlines.len()
        );
        Ok(Self { model, vocabulary })
    }

    /// Load the model artifact and, if given, a vocabulary override
    pub fn from_paths(model: &Path, vocabulary: Option<&Path>) -> Result<Self, FareError> {
        let artifact = ModelArtifact::from_path(model)?;
        let vocabulary = match vocabulary {
            Some(path) => Vocabulary::from_path(path)?,
            None => Vocabulary::default(),
        };
        Self::new(Arc::new(artifact), vocabulary)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// One model call per airline, returned in vocabulary order
    pub fn predict_fares_for_date(
        &self,
        trip: &TripFeatures,
        day: u32,
        month: u32,
    ) -> Result<Vec<AirlineFare>, FareError> {
        let n_airlines = self.vocabulary.airlines.len();
        self.vocabulary
            .airlines
            .iter()
            .enumerate()
            .map(|(idx, airline)| -> Result<AirlineFare, FareError> {
                let row = trip.row(day, month, idx, n_airlines);
                let fare = self.model.predict(row.as_slice())?;
                Ok(AirlineFare {
                    airline: airline.clone(),
                    fare,
                })
            })
            .collect()
    }

    /// Parse the form and compare
    pub fn compare_form(&self, form: &CompareForm) -> Result<Comparison, FareError> {
        let request = TripRequest::from_form(form)?;
        self.compare(&request)
    }

    pub fn compare(&self, request: &TripRequest) -> Result<Comparison, FareError> {
        let start = Instant::now();
        let trip = TripFeatures::encode(request, &self.vocabulary)?;
        let journey_date = request.journey_date();
        let band = request.price_band;

        if band.min > band.max {
            tracing::warn!(
                "Price band is inverted (min {} > max {}): no fare can meet expectation",
                band.min,
                band.max
            );
        }

        let mut fares: Vec<FareQuote> = self
            .predict_fares_for_date(&trip, journey_date.day(), journey_date.month())?
            .into_iter()
            .map(|f| {
                let fare = round_fare(f.fare);
                FareQuote {
                    airline: f.airline,
                    fare,
                    status: label_range(fare, &band),
                }
            })
            .collect();
        fares.sort_by(|a, b| a.fare.total_cmp(&b.fare));

        let best = fares
            .first()
            .cloned()
            .ok_or_else(|| FareError::InvalidVocabulary("no airlines".into()))?;

        let trend = self.trend(&trip, journey_date)?;
        let cheapest = cheapest_day(&trend)
            .cloned()
            .ok_or_else(|| FareError::InvalidVocabulary("no airlines".into()))?;

        tracing::info!(
            "Compared {} -> {} on {}: best {} at {:.2}, cheapest day {} in {:?}",
            request.origin,
            request.destination,
            journey_date,
            best.airline,
            best.fare,
            cheapest.date,
            start.elapsed()
        );

        Ok(Comparison {
            journey_date,
            price_band: band,
            fares,
            best,
            trend,
            cheapest_day: cheapest,
        })
    }

    /// Cheapest airline for each of the [`TREND_DAYS`] days starting at `start`
    fn trend(&self, trip: &TripFeatures, start: NaiveDate) -> Result<Vec<TrendPoint>, FareError> {
        (0..TREND_DAYS)
            .map(|offset| -> Result<TrendPoint, FareError> {
                let date = start
                    .checked_add_days(Days::new(offset))
                    .ok_or(FareError::DateOutOfRange {
                        start,
                        days: offset,
                    })?;
                let fares = self.predict_fares_for_date(trip, date.day(), date.month())?;
                let cheapest = fares
                    .into_iter()
                    .reduce(|best, f| if f.fare < best.fare { f } else { best })
                    .ok_or_else(|| FareError::InvalidVocabulary("no airlines".into()))?;
                tracing::debug!(
                    "Trend {}: {} at {:.2}",
                    date,
                    cheapest.airline,
                    cheapest.fare
                );
                Ok(TrendPoint {
                    date,
                    fare: round_fare(cheapest.fare),
                    airline: cheapest.airline,
                })
            })
            .collect()
    }
}
