use anyhow::Result;
use reqwest::Client;
use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler, tool::ToolRouter},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use serde::Serialize;
use std::sync::Arc;

use crate::conditions::SurfConditions;
use crate::config::Config;
use crate::constants::USER_AGENT;
use crate::error::SurfError;
use crate::forecast::WindyClient;
use crate::formatters::{format_beaches, format_error};
use crate::geocoding::NominatimClient;
use crate::models::{FindBeachesRequest, GetSurfConditionsByBeachRequest, GetSurfConditionsRequest};

/// MCP service exposing the surf conditions tools
#[derive(Clone)]
pub struct SurfService {
    conditions: Arc<SurfConditions>,
    tool_router: ToolRouter<Self>,
}

impl SurfService {
    /// Creates the service with the Nominatim and Windy providers
    pub fn new(config: &Config) -> Result<Self> {
        let client = Arc::new(
            Client::builder()
                .user_agent(USER_AGENT)
                .timeout(config.http_timeout())
                .build()?,
        );

        let geocoder = NominatimClient::new(Arc::clone(&client), config.nominatim_url.clone());
        let forecaster = WindyClient::new(
            client,
            config.windy_api_url.clone(),
            config.windy_api_key.clone(),
        );

        let conditions = SurfConditions::new(Arc::new(geocoder), Arc::new(forecaster))
            .with_onshore_reference(config.onshore_reference())
            .with_max_forecast_hours(config.max_forecast_hours)
            .with_matcher(config.beach_match);

        Ok(Self::with_conditions(conditions))
    }

    pub fn with_conditions(conditions: SurfConditions) -> Self {
        Self {
            conditions: Arc::new(conditions),
            tool_router: Self::tool_router(),
        }
    }
}

/// Turns a domain result into a tool result; domain errors become structured
/// error content instead of protocol errors.
fn respond<T: Serialize>(result: Result<T, SurfError>) -> Result<CallToolResult, McpError> {
    match result {
        Ok(body) => Ok(CallToolResult::success(vec![Content::json(body)?])),
        Err(e) => {
            tracing::warn!("Tool call failed ({}): {}", e.kind(), e);
            Ok(CallToolResult::error(vec![Content::json(format_error(&e))?]))
        }
    }
}

#[tool_handler]
impl ServerHandler for SurfService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "surf-conditions".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Surf conditions forecasts powered by the Windy Point Forecast API, with beach \
                search from OpenStreetMap. Typical workflow: call find_beaches for a city, then \
                get_surf_conditions_by_beach with one of the returned names, or call \
                get_surf_conditions with coordinates. Offshore wind (land to sea) gives clean \
                waves; a period of 10s or more indicates quality ground swell; surfable \
                conditions need at least 0.5m of wave height and an 8s period."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl SurfService {
    /// Lists the beaches of a city
    #[tool(description = "Find beaches in a city using OpenStreetMap data. Returns names and coordinates usable with get_surf_conditions_by_beach or get_surf_conditions (e.g., city: 'Mar del Plata', country: 'Argentina').")]
    pub async fn find_beaches(
        &self,
        Parameters(request): Parameters<FindBeachesRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Finding beaches in: {}", request.city);

        let result = self
            .conditions
            .find_beaches(&request.city, request.country.as_deref())
            .await
            .map(format_beaches);

        respond(result)
    }

    /// Gets surf conditions for a beach by name
    #[tool(description = "Get the surf forecast for a beach by name. Geocodes the beach within the given city, then returns wave, swell and wind data with wind type (offshore/onshore/cross) and quality indicators. hours_ahead defaults to 48 (max 384).")]
    pub async fn get_surf_conditions_by_beach(
        &self,
        Parameters(request): Parameters<GetSurfConditionsByBeachRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            "Getting surf conditions for beach: {} in {}",
            request.beach_name,
            request.city
        );

        let result = self
            .conditions
            .by_beach_name(
                &request.beach_name,
                &request.city,
                request.country.as_deref(),
                request.hours_ahead,
            )
            .await;

        respond(result)
    }

    /// Gets surf conditions for coordinates
    #[tool(description = "Get the surf forecast for coordinates (e.g., lat: -38.0055, lon: -57.5426 for Mar del Plata). Returns wave, swell and wind data with wind type (offshore/onshore/cross) and quality indicators (is_offshore, good_period, surfable). hours_ahead defaults to 48 (max 384).")]
    pub async fn get_surf_conditions(
        &self,
        Parameters(request): Parameters<GetSurfConditionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            "Getting surf conditions for coordinates: {}, {}",
            request.lat,
            request.lon
        );

        let result = self
            .conditions
            .by_coordinates(request.lat, request.lon, request.hours_ahead)
            .await;

        respond(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> SurfService {
        SurfService::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_exposes_three_tools() {
        let mut names: Vec<String> = service()
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "find_beaches",
                "get_surf_conditions",
                "get_surf_conditions_by_beach"
            ]
        );
    }

    #[test]
    fn test_hours_ahead_is_optional_in_schema() {
        let tools = service().tool_router.list_all();
        let tool = tools
            .iter()
            .find(|tool| tool.name == "get_surf_conditions")
            .unwrap();
        let required = tool.input_schema.get("required").unwrap();
        assert!(required.as_array().unwrap().iter().any(|v| v == "lat"));
        assert!(!required.as_array().unwrap().iter().any(|v| v == "hours_ahead"));
    }

    #[test]
    fn test_server_info() {
        let info = service().get_info();
        assert_eq!(info.server_info.name, "surf-conditions");
        assert!(info.instructions.unwrap().contains("find_beaches"));
    }

    #[tokio::test]
    async fn test_validation_errors_are_tool_errors() {
        let result = service()
            .get_surf_conditions(Parameters(GetSurfConditionsRequest {
                lat: 120.0,
                lon: 0.0,
                hours_ahead: 48,
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
    }
}
