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

//! Fare estimator properties.
//!
//! - one fare per airline, in vocabulary order
//! - band boundaries meet expectation
//! - the trend covers 7 consecutive days from the departure date
//! - the cheapest day is the first minimum of the trend
//!
//! Run with:
//!     cargo test --test t_fare_estimator_properties


use chrono::{Days, NaiveDate};
use estimator_helpers::*;
use farecast_fare_estimator::{
    FareError, FareEstimator, FareStatus, TREND_DAYS, TripFeatures, Vocabulary,
};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_one_fare_per_airline_in_vocabulary_order() {
    let est = estimator(LadderModel);
    let trip = TripFeatures::encode(&sample_request(), est.vocabulary()).unwrap();

    let fares = est.predict_fares_for_date(&trip, 2, 11).unwrap();

    let names: Vec<&str> = fares.iter().map(|f| f.airline.as_str()).collect();
    let expected: Vec<&str> = est.vocabulary().airlines.iter().map(String::as_str).collect();
    assert_eq!(names, expected);
    for (i, fare) in fares.iter().enumerate() {
        assert_eq!(fare.fare, 3020.0 + 500.0 * i as f64, "{}", fare.airline);
    }
}

#[test]
fn test_band_boundaries_meet_expectation() {
    let mut fares = vec![7000.0; AIRLINES];
    fares[0] = 3000.0;
    fares[1] = 6000.0;
    fares[2] = 2999.99;
    fares[3] = 6000.01;
    let est = estimator(FixedFaresModel(fares));

    let comparison = est.compare(&sample_request()).unwrap();
    let status_of = |airline: &str| {
        comparison
            .fares
            .iter()
            .find(|q| q.airline == airline)
            .map(|q| q.status)
            .unwrap()
    };

    assert_eq!(status_of("Air India"), FareStatus::MeetsExpectation);
    assert_eq!(status_of("GoAir"), FareStatus::MeetsExpectation);
    assert_eq!(status_of("IndiGo"), FareStatus::VeryCheap);
    assert_eq!(status_of("Jet Airways"), FareStatus::Expensive);
    assert_eq!(status_of("Vistara"), FareStatus::Expensive);
    assert!(comparison.has_fare_in_range());
}

#[test]
fn test_table_sorted_ascending_with_best_first() {
    let est = estimator(FixedFaresModel(vec![
        5200.0, 4100.0, 6100.0, 3900.5, 4100.0, 8000.0, 9000.0, 3900.5, 7000.0, 5000.0, 5001.0,
    ]));

    let comparison = est.compare(&sample_request()).unwrap();

    assert!(
        comparison
            .fares
            .windows(2)
            .all(|w| w[0].fare <= w[1].fare)
    );
    // Ties keep vocabulary order
    assert_eq!(comparison.fares[0].airline, "Jet Airways");
    assert_eq!(comparison.fares[1].airline, "SpiceJet");
    assert_eq!(comparison.fares[2].airline, "GoAir");
    assert_eq!(comparison.fares[3].airline, "Jet Airways Business");
    assert_eq!(comparison.best, comparison.fares[0]);
    assert_eq!(comparison.best.fare, 3900.5);
}

#[test]
fn test_fares_rounded_to_cents() {
    let est = estimator(FixedFaresModel(vec![4523.17491; AIRLINES]));
    let comparison = est.compare(&sample_request()).unwrap();
    assert!(comparison.fares.iter().all(|q| q.fare == 4523.17));
    assert!(comparison.trend.iter().all(|p| p.fare == 4523.17));
}

#[test]
fn test_trend_has_seven_consecutive_days() {
    let est = estimator(LadderModel);
    let comparison = est.compare(&sample_request()).unwrap();

    assert_eq!(comparison.trend.len(), TREND_DAYS as usize);
    assert_eq!(comparison.trend.len(), 7);
    for (i, point) in comparison.trend.iter().enumerate() {
        assert_eq!(point.date, date(2026, 11, 2 + i as u32));
        // LadderModel: cheapest airline is always the first column
        assert_eq!(point.airline, "Air India");
        assert_eq!(point.fare, 3000.0 + 10.0 * (2 + i) as f64);
    }
    assert_eq!(comparison.trend[0].fare, comparison.best.fare);
}

#[test]
fn test_trend_crosses_month_and_year_boundaries() {
    let model = Arc::new(RecordingModel::default());
    let est = FareEstimator::new(model.clone(), Vocabulary::default()).unwrap();
    let req = request(
        "2026-12-29T06:00",
        "2026-12-29T09:15",
        1,
        (3000, 6000),
        "Mumbai",
        "Hyderabad",
    );

    let comparison = est.compare(&req).unwrap();

    let start = date(2026, 12, 29);
    let dates: Vec<NaiveDate> = comparison.trend.iter().map(|p| p.date).collect();
    let expected: Vec<NaiveDate> = (0..7)
        .map(|i| start.checked_add_days(Days::new(i)).unwrap())
        .collect();
    assert_eq!(dates, expected);
    assert_eq!(dates[6], date(2027, 1, 4));

    // One model call per airline for the table, then per airline per trend day
    let rows = model.rows.lock().unwrap();
    assert_eq!(rows.len(), AIRLINES * 8);
    for (day_idx, chunk) in rows[AIRLINES..].chunks(AIRLINES).enumerate() {
        let expected_date = expected[day_idx];
        for row in chunk {
            assert_eq!(row[1], chrono::Datelike::day(&expected_date) as f64);
            assert_eq!(row[2], chrono::Datelike::month(&expected_date) as f64);
        }
    }
}

#[test]
fn test_cheapest_day_is_trend_minimum() {
    // 2 Mar 2026 + 0..7 days -> days 2..=8, minimum on the 5th
    let est = estimator(DayCurveModel(|day| 4000.0 + 100.0 * (day as f64 - 5.0).abs()));
    let req = request(
        "2026-03-02T10:00",
        "2026-03-02T12:40",
        0,
        (3000, 6000),
        "Kolkata",
        "Delhi",
    );

    let comparison = est.compare(&req).unwrap();

    let min = comparison
        .trend
        .iter()
        .map(|p| p.fare)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(comparison.cheapest_day.fare, min);
    assert_eq!(comparison.cheapest_day.date, date(2026, 3, 5));
    assert_eq!(comparison.cheapest_day.airline, "Air India");
}

#[test]
fn test_cheapest_day_ties_pick_first_day() {
    let est = estimator(DayCurveModel(|_| 4000.0));
    let comparison = est.compare(&sample_request()).unwrap();
    assert_eq!(comparison.cheapest_day.date, date(2026, 11, 2));
    assert_eq!(comparison.cheapest_day, comparison.trend[0]);
}

#[test]
fn test_no_fare_in_range() {
    let est = estimator(FixedFaresModel(vec![9000.0; AIRLINES]));
    let comparison = est.compare(&sample_request()).unwrap();
    assert!(!comparison.has_fare_in_range());
    assert_eq!(
        comparison.status_text(),
        "⚠️ No flights matched your expected price range on 2-11"
    );
}

#[test]
fn test_summary_texts() {
    let est = estimator(LadderModel);
    let comparison = est.compare(&sample_request()).unwrap();
    assert_eq!(
        comparison.best_text(),
        "Best Fare Today: Air India — ₹3020.00"
    );
    assert_eq!(
        comparison.status_text(),
        "Flights available within your expected range on 2-11"
    );
    assert_eq!(
        comparison.cheapest_text(),
        "Cheapest day: 02-Nov — ₹3020.00 (Air India)"
    );
}

#[test]
fn test_unknown_city_is_rejected() {
    let est = estimator(LadderModel);
    let mut req = sample_request();
    req.destination = "Mumbai".into();
    let err = est.compare(&req).unwrap_err();
    assert!(
        matches!(err, FareError::UnknownCity { role: "destination", .. }),
        "got {:?}",
        err
    );
}

#[test]
fn test_model_failure_propagates() {
    let est = estimator(FailingModel);
    let err = est.compare(&sample_request()).unwrap_err();
    assert!(matches!(err, FareError::Model(_)), "got {:?}", err);
    assert!(err.to_string().contains("non-finite"));
}

#[test]
fn test_vocabulary_width_must_match_model() {
    let mut vocab = Vocabulary::default();
    vocab.airlines.pop();
    let err = FareEstimator::new(Arc::new(LadderModel), vocab).err().unwrap();
    assert!(matches!(
        err,
        FareError::FeatureWidthMismatch {
            vocabulary: 28,
            model: 29
        }
    ));
}
