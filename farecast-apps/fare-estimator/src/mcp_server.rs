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

//! # MCP Server
//!
//! Exposes the fare comparison as a single `compare_fares` tool.

use std::sync::Arc;

use rmcp::handler::server::tool::{ToolCallContext, ToolRouter};
use rmcp::handler::server::{ServerHandler, wrapper::Parameters};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam,
    ProtocolVersion, ServerCapabilities, ServerInfo, ToolsCapability,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, tool, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::estimator::FareEstimator;
use crate::trip_request::{PriceBand, TripRequest, parse_datetime};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct CompareFaresInput {
    /// Departure, YYYY-MM-DDTHH:MM
    pub departure: String,
    /// Arrival, YYYY-MM-DDTHH:MM
    pub arrival: String,
    #[serde(default)]
    pub stops: i64,
    pub min_price: i64,
    pub max_price: i64,
    pub origin: String,
    pub destination: String,
}

#[derive(Clone)]
pub struct FarecastServer {
    estimator: Arc<FareEstimator>,
    tool_router: ToolRouter<Self>,
}

impl FarecastServer {
    pub fn new(estimator: Arc<FareEstimator>) -> Self {
        Self {
            estimator,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl FarecastServer {
    #[tool(
        name = "compare_fares",
        description = "Predict flight fares for every airline on a date, label them against a price band and return the cheapest day of the following week. Parameters: departure and arrival (YYYY-MM-DDTHH:MM), stops (0+), min_price and max_price (INR), origin and destination (city names)."
    )]
    pub async fn compare_fares(
        &self,
        params: Parameters<CompareFaresInput>,
    ) -> Result<String, String> {
        let input = params.0;
        let departure = parse_datetime("departure", &input.departure).map_err(|e| e.to_string())?;
        let arrival = parse_datetime("arrival", &input.arrival).map_err(|e| e.to_string())?;
        let request = TripRequest::builder(departure, arrival, input.origin, input.destination)
            .stops(input.stops)
            .price_band(PriceBand {
                min: input.min_price,
                max: input.max_price,
            })
            .build();

        let comparison = self
            .estimator
            .compare(&request)
            .map_err(|e| format!("Fare comparison failed: {e}"))?;

        serde_json::to_string(&comparison.to_api_response()).map_err(|e| e.to_string())
    }
}

impl FarecastServer {
    fn instructions(&self) -> String {
        let vocabulary = self.estimator.vocabulary();
        let origins: Vec<&str> = vocabulary.origins.cities().collect();
        let destinations: Vec<&str> = vocabulary.destinations.cities().collect();
        format!(
            "Fare predictions from model '{}'. Origins: {}. Destinations: {}.",
            self.estimator.model_name(),
            origins.join(", "),
            destinations.join(", ")
        )
    }
}

impl ServerHandler for FarecastServer {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        async move { Ok(ListToolsResult::with_all_items(self.tool_router.list_all())) }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        tracing::debug!("tool call: {}", request.name);
        async move {
            self.tool_router
                .call(ToolCallContext::new(self, request, context))
                .await
        }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
                ..Default::default()
            },
            server_info: Implementation::from_build_env(),
            instructions: Some(self.instructions()),
        }
    }
}
