//! Error kinds surfaced by the surf conditions core.

use thiserror::Error;

/// Failure of a surf conditions operation.
///
/// Every variant reaches the tool boundary unchanged and is rendered there as
/// a structured `{kind, message, hint}` body.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfError {
    /// The geocoding provider failed, timed out or answered garbage
    #[error("Geocoding service unavailable: {message}")]
    GeocodingUnavailable { message: String },

    /// The forecast provider failed, timed out or has no coverage
    #[error("Forecast service unavailable: {message}")]
    ForecastUnavailable { message: String },

    /// No single beach matched the requested name
    #[error("Beach not found: {message}")]
    BeachNotFound { message: String },

    /// Requested horizon is outside `1..=max_hours`
    #[error("Invalid forecast horizon: {requested}h (must be between 1 and {max_hours}h)")]
    InvalidForecastHorizon { requested: u32, max_hours: u32 },

    /// Latitude or longitude outside the physical range
    #[error("Invalid coordinates: ({lat}, {lon}); latitude must be within -90..=90 and longitude within -180..=180")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

impl SurfError {
    pub fn geocoding<S: Into<String>>(message: S) -> Self {
        Self::GeocodingUnavailable {
            message: message.into(),
        }
    }

    pub fn forecast<S: Into<String>>(message: S) -> Self {
        Self::ForecastUnavailable {
            message: message.into(),
        }
    }

    pub fn beach_not_found<S: Into<String>>(message: S) -> Self {
        Self::BeachNotFound {
            message: message.into(),
        }
    }

    /// Stable machine-readable error kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SurfError::GeocodingUnavailable { .. } => "geocoding_unavailable",
            SurfError::ForecastUnavailable { .. } => "forecast_unavailable",
            SurfError::BeachNotFound { .. } => "beach_not_found",
            SurfError::InvalidForecastHorizon { .. } => "invalid_forecast_horizon",
            SurfError::InvalidCoordinates { .. } => "invalid_coordinates",
        }
    }

    /// Suggestion for the calling agent, when one applies
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SurfError::GeocodingUnavailable { .. } => {
                Some("The geocoding service could not be reached. Please try again later.")
            }
            SurfError::ForecastUnavailable { .. } => Some(
                "Check that SURF_WINDY_API_KEY is configured. GFS Wave excludes Hudson Bay, \
                 the Black Sea, the Caspian Sea and most of the Arctic Ocean.",
            ),
            SurfError::BeachNotFound { .. } => Some(
                "Use find_beaches first to list the beaches of a city, then pass one of the \
                 returned names.",
            ),
            SurfError::InvalidForecastHorizon { .. } | SurfError::InvalidCoordinates { .. } => {
                None
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SurfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(SurfError::geocoding("down").kind(), "geocoding_unavailable");
        assert_eq!(SurfError::forecast("down").kind(), "forecast_unavailable");
        assert_eq!(SurfError::beach_not_found("x").kind(), "beach_not_found");
        assert_eq!(
            SurfError::InvalidForecastHorizon {
                requested: 500,
                max_hours: 384
            }
            .kind(),
            "invalid_forecast_horizon"
        );
        assert_eq!(
            SurfError::InvalidCoordinates { lat: 91.0, lon: 0.0 }.kind(),
            "invalid_coordinates"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = SurfError::InvalidForecastHorizon {
            requested: 500,
            max_hours: 384,
        };
        assert!(err.to_string().contains("500h"));
        assert!(err.to_string().contains("384h"));

        let err = SurfError::beach_not_found("Playa Grande, Mar del Plata");
        assert_eq!(err.to_string(), "Beach not found: Playa Grande, Mar del Plata");
    }

    #[test]
    fn test_hints() {
        assert!(SurfError::beach_not_found("x")
            .hint()
            .unwrap()
            .contains("find_beaches"));
        assert!(SurfError::InvalidCoordinates { lat: 0.0, lon: 181.0 }
            .hint()
            .is_none());
    }
}
