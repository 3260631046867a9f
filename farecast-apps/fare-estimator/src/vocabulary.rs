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

//! # Vocabulary
//!
//! Airline, origin and destination categories in the column order the fare
//! model was trained with. Nothing checks that order against the model: a
//! reordered vocabulary still predicts, just wrongly.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FareError;

/// One-hot columns for a city role, plus the baseline city dropped at training time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CityColumns {
    /// Encoded as all zeros
    pub baseline: String,
    /// Form value activating each column, in column order
    pub columns: Vec<String>,
}

impl CityColumns {
    /// One-hot encoding for `city`, or `None` if the city is unknown.
    pub fn one_hot(&self, city: &str) -> Option<Vec<f64>> {
        let city = city.trim();
        let mut encoded = vec![0.0; self.columns.len()];
        if let Some(pos) = self
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(city))
        {
            encoded[pos] = 1.0;
            Some(encoded)
        } else if self.baseline.eq_ignore_ascii_case(city) {
            Some(encoded)
        } else {
            None
        }
    }

    /// All accepted city names, baseline first
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.baseline.as_str()).chain(self.columns.iter().map(String::as_str))
    }

    fn validate(&self, role: &str) -> Result<(), FareError> {
        let mut seen = HashSet::new();
        for city in self.cities() {
            if city.trim().is_empty() {
                return Err(FareError::InvalidVocabulary(format!(
                    "empty {} city name",
                    role
                )));
            }
            if !seen.insert(city.to_ascii_lowercase()) {
                return Err(FareError::InvalidVocabulary(format!(
                    "duplicate {} city '{}'",
                    role, city
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Vocabulary {
    pub airlines: Vec<String>,
    pub origins: CityColumns,
    pub destinations: CityColumns,
}

impl Default for Vocabulary {
    fn default() -> Self {
        let airlines = [
            "Air India",
            "GoAir",
            "IndiGo",
            "Jet Airways",
            "Jet Airways Business",
            "Multiple carriers",
            "Multiple carriers Premium economy",
            "SpiceJet",
            "Trujet",
            "Vistara",
            "Vistara Premium economy",
        ];
        Self {
            airlines: airlines.iter().map(|a| a.to_string()).collect(),
            origins: CityColumns {
                baseline: "Bangalore".into(),
                columns: ["Chennai", "Delhi", "Kolkata", "Mumbai"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            },
            destinations: CityColumns {
                baseline: "Bangalore".into(),
                // The last column was trained as "New Delhi"; the form sends "Chennai" for it.
                columns: ["Cochin", "Delhi", "Hyderabad", "Kolkata", "Chennai"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            },
        }
    }
}

impl Vocabulary {
    pub fn from_json(json: &str) -> Result<Self, FareError> {
        let vocabulary: Vocabulary = serde_json::from_str(json)?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FareError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| FareError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let vocabulary = Self::from_json(&json)?;
        tracing::info!(
            "Loaded vocabulary from {}: {} airlines, {} origins, {} destinations",
            path.display(),
            vocabulary.airlines.len(),
            vocabulary.origins.columns.len() + 1,
            vocabulary.destinations.columns.len() + 1
        );
        Ok(vocabulary)
    }

    pub fn validate(&self) -> Result<(), FareError> {
        if self.airlines.is_empty() {
            return Err(FareError::InvalidVocabulary("no airlines".into()));
        }
        let mut seen = HashSet::new();
        for airline in &self.airlines {
            if !seen.insert(airline.as_str()) {
                return Err(FareError::InvalidVocabulary(format!(
                    "duplicate airline '{}'",
                    airline
                )));
            }
        }
        self.origins.validate("origin")?;
        self.destinations.validate("destination")?;
        Ok(())
    }

    /// Length of every feature vector built from this vocabulary
    pub fn feature_width(&self) -> usize {
        crate::features::FIXED_FEATURES
            + self.airlines.len()
            + self.origins.columns.len()
            + self.destinations.columns.len()
    }

    pub fn encode_origin(&self, city: &str) -> Result<Vec<f64>, FareError> {
        self.origins
            .one_hot(city)
            .ok_or_else(|| unknown_city("origin", city, &self.origins))
    }

    pub fn encode_destination(&self, city: &str) -> Result<Vec<f64>, FareError> {
        self.destinations
            .one_hot(city)
            .ok_or_else(|| unknown_city("destination", city, &self.destinations))
    }
}

fn unknown_city(role: &'static str, city: &str, columns: &CityColumns) -> FareError {
    FareError::UnknownCity {
        role,
        city: city.to_string(),
        known: columns.cities().collect::<Vec<_>>().join(", "),
    }
}
