//! Marine forecast retrieval through the Windy Point Forecast API.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

use crate::analyzer::{round_to, wind_from_components};
use crate::constants::{WAVE_MODEL, WIND_MODEL};
use crate::error::{Result, SurfError};
use crate::models::{
    Coordinates, ForecastHorizon, ForecastMetadata, ForecastPoint, ProviderForecast,
    WindyRequest, WindyWaveResponse, WindyWindResponse,
};

const WAVE_PARAMETERS: &[&str] = &["waves", "swell1"];
const WIND_PARAMETERS: &[&str] = &["wind"];
const SURFACE_LEVEL: &[&str] = &["surface"];

/// Fragments of a Windy 400 body that indicate missing GFS Wave coverage
const NO_COVERAGE_MARKERS: &[&str] = &["coverage", "no data", "not available", "no forecast"];

/// Fetches the raw forecast for a location
#[async_trait]
pub trait ForecastClient: Send + Sync {
    async fn fetch(
        &self,
        coordinates: Coordinates,
        horizon: ForecastHorizon,
    ) -> Result<ProviderForecast>;
}

pub struct WindyClient {
    client: Arc<Client>,
    api_url: String,
    api_key: Option<String>,
}

impl WindyClient {
    pub fn new(client: Arc<Client>, api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// Posts one point-forecast request and decodes the JSON response
    async fn request<T: DeserializeOwned>(
        &self,
        coordinates: Coordinates,
        model: &str,
        parameters: &[&str],
    ) -> Result<T> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            SurfError::forecast("SURF_WINDY_API_KEY is not set; configure a Windy API key")
        })?;

        let payload = WindyRequest {
            lat: round_to(coordinates.lat, 2),
            lon: round_to(coordinates.lon, 2),
            model,
            parameters,
            levels: SURFACE_LEVEL,
            key,
        };

        tracing::debug!(
            "Windy request: model={} lat={} lon={}",
            model,
            payload.lat,
            payload.lon
        );

        let response = self
            .client
            .post(&self.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SurfError::forecast(format!("Windy {model} request timed out"))
                } else {
                    SurfError::forecast(format!("Failed to fetch {model} forecast: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "Windy {} error for ({}, {}): {} {}",
                model,
                coordinates.lat,
                coordinates.lon,
                status,
                body
            );
            return Err(status_error(status, &body, coordinates));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SurfError::forecast(format!("Malformed {model} forecast response: {e}")))
    }
}

#[async_trait]
impl ForecastClient for WindyClient {
    async fn fetch(
        &self,
        coordinates: Coordinates,
        horizon: ForecastHorizon,
    ) -> Result<ProviderForecast> {
        tracing::info!(
            "Fetching {}h forecast for ({}, {})",
            horizon.hours(),
            coordinates.lat,
            coordinates.lon
        );

        let wave = self
            .request::<WindyWaveResponse>(coordinates, WAVE_MODEL, WAVE_PARAMETERS)
            .await?;
        ensure_coverage(&wave, coordinates)?;
        let wind = self
            .request::<WindyWindResponse>(coordinates, WIND_MODEL, WIND_PARAMETERS)
            .await?;

        let generated_at = Utc::now();
        let cutoff = generated_at + Duration::hours(i64::from(horizon.hours()));
        let points = merge_series(wave, wind, cutoff)?;

        Ok(ProviderForecast {
            points,
            metadata: ForecastMetadata {
                model: WAVE_MODEL.to_string(),
                generated_at,
            },
        })
    }
}

/// A 200 answer without any wave sample means the model does not cover the
/// location (enclosed seas, ice).
fn ensure_coverage(wave: &WindyWaveResponse, coordinates: Coordinates) -> Result<()> {
    let has_wave_data = [&wave.wave_heights, &wave.wave_periods, &wave.wave_directions]
        .iter()
        .any(|series| series.iter().any(Option::is_some));
    if wave.ts.is_empty() || !has_wave_data {
        return Err(no_coverage(coordinates));
    }
    Ok(())
}

fn no_coverage(coordinates: Coordinates) -> SurfError {
    SurfError::forecast(format!(
        "Location ({}, {}) has no GFS Wave coverage",
        coordinates.lat, coordinates.lon
    ))
}

fn status_error(status: StatusCode, body: &str, coordinates: Coordinates) -> SurfError {
    let lowered = body.to_lowercase();
    if status == StatusCode::BAD_REQUEST
        && NO_COVERAGE_MARKERS.iter().any(|marker| lowered.contains(marker))
    {
        return no_coverage(coordinates);
    }
    SurfError::forecast(format!("Request failed with status: {status}"))
}

/// Joins wave and wind series into forecast points up to `cutoff`.
///
/// Wave timestamps drive the series; wind is matched by timestamp and a
/// missing wind sample is reported as calm.
pub fn merge_series(
    wave: WindyWaveResponse,
    wind: WindyWindResponse,
    cutoff: DateTime<Utc>,
) -> Result<Vec<ForecastPoint>> {
    let wind_by_ts: HashMap<i64, (Option<f64>, Option<f64>)> = wind
        .ts
        .iter()
        .enumerate()
        .map(|(i, ts)| (*ts, (sample(&wind.wind_u, i), sample(&wind.wind_v, i))))
        .collect();

    let mut points = Vec::with_capacity(wave.ts.len());
    for (i, ts) in wave.ts.iter().enumerate() {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(*ts)
            .ok_or_else(|| SurfError::forecast(format!("Invalid forecast timestamp: {ts}")))?;
        if timestamp > cutoff {
            continue;
        }

        let (wind_u, wind_v) = wind_by_ts.get(ts).copied().unwrap_or((None, None));
        let (wind_speed_ms, wind_direction_deg) = wind_from_components(wind_u, wind_v);

        points.push(ForecastPoint {
            timestamp,
            wave_height_m: sample(&wave.wave_heights, i).map(|v| round_to(v, 2)),
            wave_period_s: sample(&wave.wave_periods, i).map(|v| round_to(v, 1)),
            wave_direction_deg: sample(&wave.wave_directions, i).map(|v| round_to(v, 0)),
            swell_height_m: sample(&wave.swell_heights, i).map(|v| round_to(v, 2)),
            swell_period_s: sample(&wave.swell_periods, i).map(|v| round_to(v, 1)),
            swell_direction_deg: sample(&wave.swell_directions, i).map(|v| round_to(v, 0)),
            wind_speed_ms,
            wind_direction_deg,
        });
    }

    Ok(points)
}

fn sample(series: &[Option<f64>], index: usize) -> Option<f64> {
    series.get(index).copied().flatten()
}
