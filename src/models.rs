use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{DEFAULT_HOURS_AHEAD, MAX_FORECAST_HOURS};
use crate::error::{Result, SurfError};

// ============================================================================
// Domain Models
// ============================================================================

/// A geocoded beach candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Beach {
    pub name: String,
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Validated latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if !valid {
            return Err(SurfError::InvalidCoordinates { lat, lon });
        }
        Ok(Self { lat, lon })
    }
}

/// Number of hours of forecast to return, within `1..=max_hours`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastHorizon(u32);

impl ForecastHorizon {
    /// Rejects horizons outside `1..=max_hours`. `max_hours` itself is capped
    /// at the 384h model ceiling.
    pub fn new(hours: u32, max_hours: u32) -> Result<Self> {
        let max_hours = max_hours.min(MAX_FORECAST_HOURS);
        if hours == 0 || hours > max_hours {
            return Err(SurfError::InvalidForecastHorizon {
                requested: hours,
                max_hours,
            });
        }
        Ok(Self(hours))
    }

    pub fn hours(self) -> u32 {
        self.0
    }
}

/// Raw provider record for one forecast timestep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub wave_height_m: Option<f64>,
    pub wave_period_s: Option<f64>,
    pub wave_direction_deg: Option<f64>,
    pub swell_height_m: Option<f64>,
    pub swell_period_s: Option<f64>,
    pub swell_direction_deg: Option<f64>,
    pub wind_speed_ms: f64,
    pub wind_direction_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindType {
    Offshore,
    Onshore,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityIndicators {
    pub is_offshore: bool,
    pub good_period: bool,
    pub surfable: bool,
}

/// Forecast point with its derived wind type and quality indicators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedForecastPoint {
    #[serde(flatten)]
    pub point: ForecastPoint,
    pub wind_type: WindType,
    pub quality_indicators: QualityIndicators,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastMetadata {
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

/// Raw forecast as returned by a forecast provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderForecast {
    pub points: Vec<ForecastPoint>,
    pub metadata: ForecastMetadata,
}

/// Complete answer of a surf conditions lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    pub location: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beach: Option<Beach>,
    pub forecasts: Vec<ClassifiedForecastPoint>,
    pub metadata: ForecastMetadata,
}

// ============================================================================
// Nominatim API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(deserialize_with = "f64_from_str_or_number")]
    pub lat: f64,
    #[serde(deserialize_with = "f64_from_str_or_number")]
    pub lon: f64,
    #[serde(rename = "class", default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub place_type: String,
    #[serde(default)]
    pub address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub country: Option<String>,
}

/// Nominatim serializes coordinates as strings
fn f64_from_str_or_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// Windy Point Forecast API Models
// ============================================================================

#[derive(Debug, Serialize)]
pub struct WindyRequest<'a> {
    pub lat: f64,
    pub lon: f64,
    pub model: &'a str,
    pub parameters: &'a [&'a str],
    pub levels: &'a [&'a str],
    pub key: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct WindyWaveResponse {
    /// Unix timestamps in milliseconds
    pub ts: Vec<i64>,
    #[serde(rename = "waves_height-surface", default)]
    pub wave_heights: Vec<Option<f64>>,
    #[serde(rename = "waves_period-surface", default)]
    pub wave_periods: Vec<Option<f64>>,
    #[serde(rename = "waves_direction-surface", default)]
    pub wave_directions: Vec<Option<f64>>,
    #[serde(rename = "swell1_height-surface", default)]
    pub swell_heights: Vec<Option<f64>>,
    #[serde(rename = "swell1_period-surface", default)]
    pub swell_periods: Vec<Option<f64>>,
    #[serde(rename = "swell1_direction-surface", default)]
    pub swell_directions: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct WindyWindResponse {
    pub ts: Vec<i64>,
    /// West-to-east component (m/s)
    #[serde(rename = "wind_u-surface", default)]
    pub wind_u: Vec<Option<f64>>,
    /// South-to-north component (m/s)
    #[serde(rename = "wind_v-surface", default)]
    pub wind_v: Vec<Option<f64>>,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

fn default_hours_ahead() -> u32 {
    DEFAULT_HOURS_AHEAD
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct FindBeachesRequest {
    /// City to search (e.g. "Mar del Plata", "Sydney")
    pub city: String,
    /// Optional country to narrow the search (e.g. "Argentina")
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetSurfConditionsByBeachRequest {
    /// Beach name as returned by find_beaches (e.g. "Playa Grande")
    pub beach_name: String,
    /// City the beach belongs to (e.g. "Mar del Plata")
    pub city: String,
    /// Optional country to narrow the search
    #[serde(default)]
    pub country: Option<String>,
    /// Hours of forecast to return (max 384)
    #[serde(default = "default_hours_ahead")]
    pub hours_ahead: u32,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetSurfConditionsRequest {
    /// Latitude of the surf spot (-90 to 90)
    pub lat: f64,
    /// Longitude of the surf spot (-180 to 180)
    pub lon: f64,
    /// Hours of forecast to return (max 384)
    #[serde(default = "default_hours_ahead")]
    pub hours_ahead: u32,
}

// ============================================================================
// MCP Tool Response Models
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FindBeachesResponse {
    pub beaches: Vec<Beach>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ToolErrorBody {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}
