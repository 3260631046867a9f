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

//! MCP tool tests, calling the `compare_fares` tool in-process.
//!
//! Run with:
//!     cargo test --test t_mcp_tools

#![cfg(feature = "mcp")]


use estimator_helpers::*;
use farecast_fare_estimator::ComparisonResponse;
use farecast_fare_estimator::mcp_server::{CompareFaresInput, FarecastServer};
use rmcp::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use serde_json::Value;
use std::sync::Arc;

fn server() -> FarecastServer {
    FarecastServer::new(Arc::new(estimator(LadderModel)))
}

fn input() -> CompareFaresInput {
    CompareFaresInput {
        departure: "2026-11-02T08:30".into(),
        arrival: "2026-11-02T11:05".into(),
        stops: 0,
        min_price: 3000,
        max_price: 6000,
        origin: "Delhi".into(),
        destination: "Cochin".into(),
    }
}

#[tokio::test]
async fn test_compare_fares_tool() {
    let out = server()
        .compare_fares(Parameters(input()))
        .await
        .expect("tool should succeed");

    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["journey_date"], "2026-11-02");
    assert_eq!(v["fares"].as_array().unwrap().len(), AIRLINES);
    assert_eq!(v["trend"].as_array().unwrap().len(), 7);
    assert_eq!(v["fares"][0]["airline"], "Air India");
    assert_eq!(v["fares"][0]["status"], "Meets Expectation");
    assert_eq!(v["fares"][10]["status"], "Expensive");
    assert_eq!(v["best_text"], "Best Fare Today: Air India — ₹3020.00");
    assert_eq!(v["cheapest_day"]["date"], "2026-11-02");

    let typed: ComparisonResponse = serde_json::from_str(&out).unwrap();
    assert_eq!(typed.price_band.min, 3000);
    assert_eq!(typed.trend[6].fare, 3080.0);
}

#[tokio::test]
async fn test_compare_fares_tool_errors() {
    let mut bad_date = input();
    bad_date.departure = "next monday".into();
    let err = server()
        .compare_fares(Parameters(bad_date))
        .await
        .unwrap_err();
    assert!(err.contains("invalid datetime for 'departure'"), "{}", err);

    let mut bad_city = input();
    bad_city.origin = "Cochin".into();
    let err = server()
        .compare_fares(Parameters(bad_city))
        .await
        .unwrap_err();
    assert!(err.starts_with("Fare comparison failed: unknown origin city"), "{}", err);
}

#[test]
fn test_server_info_lists_cities() {
    let info = server().get_info();
    let instructions = info.instructions.unwrap_or_default();
    assert!(instructions.contains("model 'ladder'"), "{}", instructions);
    assert!(instructions.contains("Bangalore, Chennai, Delhi, Kolkata, Mumbai"));
    assert!(info.capabilities.tools.is_some());
}
