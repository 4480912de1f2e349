//! Configuration loaded once at startup from `SURF_`-prefixed environment
//! variables (an optional `.env` file is read first).

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::analyzer::{OnshoreReference, DEFAULT_ONSHORE_REFERENCE_DEG};
use crate::conditions::BeachMatchStrategy;
use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, MAX_FORECAST_HOURS, NOMINATIM_API_BASE, WINDY_API_URL,
};

const ENV_PREFIX: &str = "SURF_";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Windy Point Forecast API key
    pub windy_api_key: Option<String>,
    #[serde(default = "default_windy_api_url")]
    pub windy_api_url: String,
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,
    /// Per-request HTTP timeout
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Longest horizon a caller may request, never above 384h
    #[serde(default = "default_max_forecast_hours")]
    pub max_forecast_hours: u32,
    /// Fixed onshore bearing; when unset the provider's wave direction is used
    pub onshore_reference_deg: Option<f64>,
    /// Onshore bearing used when neither a fixed nor a provider value exists
    #[serde(default = "default_fallback_onshore_deg")]
    pub fallback_onshore_deg: f64,
    #[serde(default)]
    pub beach_match: BeachMatchStrategy,
}

fn default_windy_api_url() -> String {
    WINDY_API_URL.to_string()
}

fn default_nominatim_url() -> String {
    NOMINATIM_API_BASE.to_string()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_max_forecast_hours() -> u32 {
    MAX_FORECAST_HOURS
}

fn default_fallback_onshore_deg() -> f64 {
    DEFAULT_ONSHORE_REFERENCE_DEG
}

impl Default for Config {
    fn default() -> Self {
        Self {
            windy_api_key: None,
            windy_api_url: default_windy_api_url(),
            nominatim_url: default_nominatim_url(),
            http_timeout_secs: default_http_timeout_secs(),
            max_forecast_hours: default_max_forecast_hours(),
            onshore_reference_deg: None,
            fallback_onshore_deg: default_fallback_onshore_deg(),
            beach_match: BeachMatchStrategy::default(),
        }
    }
}

impl Config {
    /// Loads and validates the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let config = envy::prefixed(ENV_PREFIX)
            .from_env::<Config>()
            .context("Failed to read SURF_* environment variables")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_forecast_hours == 0 || self.max_forecast_hours > MAX_FORECAST_HOURS {
            bail!(
                "SURF_MAX_FORECAST_HOURS must be between 1 and {}, got {}",
                MAX_FORECAST_HOURS,
                self.max_forecast_hours
            );
        }
        if self.http_timeout_secs == 0 {
            bail!("SURF_HTTP_TIMEOUT_SECS must be greater than zero");
        }
        for (name, value) in [
            ("SURF_ONSHORE_REFERENCE_DEG", self.onshore_reference_deg),
            ("SURF_FALLBACK_ONSHORE_DEG", Some(self.fallback_onshore_deg)),
        ] {
            if let Some(deg) = value {
                if !(0.0..=360.0).contains(&deg) {
                    bail!("{name} must be a bearing between 0 and 360, got {deg}");
                }
            }
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn onshore_reference(&self) -> OnshoreReference {
        OnshoreReference {
            fixed_deg: self.onshore_reference_deg,
            fallback_deg: self.fallback_onshore_deg,
        }
    }

    pub fn has_windy_api_key(&self) -> bool {
        self.windy_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(vars: &[(&str, &str)]) -> Result<Config> {
        let vars = vars.iter().map(|(k, v)| (k.to_string(), v.to_string()));
        let config = envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(vars)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.windy_api_key, None);
        assert_eq!(config.windy_api_url, WINDY_API_URL);
        assert_eq!(config.nominatim_url, NOMINATIM_API_BASE);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_forecast_hours, 384);
        assert_eq!(config.beach_match, BeachMatchStrategy::ExactOrSubstring);
        assert!(!config.has_windy_api_key());
    }

    #[test]
    fn test_reads_prefixed_variables() {
        let config = parse(&[
            ("SURF_WINDY_API_KEY", "secret"),
            ("SURF_HTTP_TIMEOUT_SECS", "5"),
            ("SURF_MAX_FORECAST_HOURS", "120"),
            ("SURF_ONSHORE_REFERENCE_DEG", "225"),
            ("SURF_BEACH_MATCH", "exact"),
        ])
        .unwrap();
        assert!(config.has_windy_api_key());
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.max_forecast_hours, 120);
        assert_eq!(config.onshore_reference().fixed_deg, Some(225.0));
        assert_eq!(config.beach_match, BeachMatchStrategy::Exact);
    }

    #[test]
    fn test_rejects_horizon_above_ceiling() {
        assert!(parse(&[("SURF_MAX_FORECAST_HOURS", "500")]).is_err());
        assert!(parse(&[("SURF_MAX_FORECAST_HOURS", "0")]).is_err());
    }

    #[test]
    fn test_rejects_invalid_bearing() {
        assert!(parse(&[("SURF_ONSHORE_REFERENCE_DEG", "400")]).is_err());
        assert!(parse(&[("SURF_FALLBACK_ONSHORE_DEG", "-10")]).is_err());
    }

    #[test]
    fn test_blank_api_key_is_not_configured() {
        let config = parse(&[("SURF_WINDY_API_KEY", "  ")]).unwrap();
        assert!(!config.has_windy_api_key());
    }
}
