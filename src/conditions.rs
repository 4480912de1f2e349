//! Surf conditions lookup: geocoding, forecast retrieval and classification.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::analyzer::{classify, OnshoreReference};
use crate::constants::MAX_FORECAST_HOURS;
use crate::error::{Result, SurfError};
use crate::forecast::ForecastClient;
use crate::geocoding::GeocodingClient;
use crate::models::{Beach, Coordinates, ForecastHorizon, ForecastResult};

/// How a requested beach name is matched against geocoded candidates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeachMatchStrategy {
    /// Case-insensitive equality only
    Exact,
    /// Exact match first, else a single unambiguous substring match
    #[default]
    ExactOrSubstring,
}

impl BeachMatchStrategy {
    /// Picks the beach named `query` among `candidates`
    pub fn select<'a>(&self, query: &str, candidates: &'a [Beach]) -> Option<&'a Beach> {
        let query = normalize(query);
        if query.is_empty() {
            return None;
        }

        if let Some(exact) = candidates.iter().find(|b| normalize(&b.name) == query) {
            return Some(exact);
        }

        match self {
            BeachMatchStrategy::Exact => None,
            BeachMatchStrategy::ExactOrSubstring => {
                let matches: Vec<&Beach> = candidates
                    .iter()
                    .filter(|b| normalize(&b.name).contains(&query))
                    .collect();
                // the same beach is often mapped as several OSM objects
                let first = matches.first()?;
                let first_name = normalize(&first.name);
                matches
                    .iter()
                    .all(|b| normalize(&b.name) == first_name)
                    .then_some(*first)
            }
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Answers "what are the surf conditions" for a beach or a coordinate pair
pub struct SurfConditions {
    geocoder: Arc<dyn GeocodingClient>,
    forecaster: Arc<dyn ForecastClient>,
    onshore: OnshoreReference,
    max_forecast_hours: u32,
    matcher: BeachMatchStrategy,
}

impl SurfConditions {
    pub fn new(geocoder: Arc<dyn GeocodingClient>, forecaster: Arc<dyn ForecastClient>) -> Self {
        Self {
            geocoder,
            forecaster,
            onshore: OnshoreReference::default(),
            max_forecast_hours: MAX_FORECAST_HOURS,
            matcher: BeachMatchStrategy::default(),
        }
    }

    pub fn with_onshore_reference(mut self, onshore: OnshoreReference) -> Self {
        self.onshore = onshore;
        self
    }

    pub fn with_max_forecast_hours(mut self, hours: u32) -> Self {
        self.max_forecast_hours = hours;
        self
    }

    pub fn with_matcher(mut self, matcher: BeachMatchStrategy) -> Self {
        self.matcher = matcher;
        self
    }

    pub async fn find_beaches(&self, city: &str, country: Option<&str>) -> Result<Vec<Beach>> {
        self.geocoder.find_beaches(city, country).await
    }

    pub async fn by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        hours_ahead: u32,
    ) -> Result<ForecastResult> {
        let coordinates = Coordinates::new(lat, lon)?;
        let horizon = ForecastHorizon::new(hours_ahead, self.max_forecast_hours)?;
        self.forecast(coordinates, horizon, None).await
    }

    pub async fn by_beach_name(
        &self,
        beach_name: &str,
        city: &str,
        country: Option<&str>,
        hours_ahead: u32,
    ) -> Result<ForecastResult> {
        let horizon = ForecastHorizon::new(hours_ahead, self.max_forecast_hours)?;

        let candidates = self.geocoder.find_beaches(city, country).await?;
        let beach = self
            .matcher
            .select(beach_name, &candidates)
            .cloned()
            .ok_or_else(|| not_found(beach_name, city, country, &candidates))?;

        tracing::info!(
            "Found beach: {} at ({}, {}), fetching surf conditions",
            beach.name,
            beach.lat,
            beach.lon
        );

        let coordinates = Coordinates::new(beach.lat, beach.lon)?;
        self.forecast(coordinates, horizon, Some(beach)).await
    }

    async fn forecast(
        &self,
        coordinates: Coordinates,
        horizon: ForecastHorizon,
        beach: Option<Beach>,
    ) -> Result<ForecastResult> {
        let raw = self.forecaster.fetch(coordinates, horizon).await?;

        let mut forecasts: Vec<_> = raw
            .points
            .into_iter()
            .map(|point| {
                let onshore_deg = self.onshore.resolve(&point);
                classify(point, onshore_deg)
            })
            .collect();
        forecasts.sort_by_key(|f| f.point.timestamp);

        Ok(ForecastResult {
            location: coordinates,
            beach,
            forecasts,
            metadata: raw.metadata,
        })
    }
}

fn not_found(
    beach_name: &str,
    city: &str,
    country: Option<&str>,
    candidates: &[Beach],
) -> SurfError {
    let mut location = format!("{beach_name}, {city}");
    if let Some(country) = country {
        location.push_str(", ");
        location.push_str(country);
    }

    if candidates.is_empty() {
        return SurfError::beach_not_found(format!("{location} (no beaches found in {city})"));
    }

    let names: BTreeSet<&str> = candidates.iter().map(|b| b.name.as_str()).collect();
    let names: Vec<&str> = names.into_iter().collect();
    SurfError::beach_not_found(format!(
        "{location} (no single match among: {})",
        names.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beach(name: &str) -> Beach {
        Beach {
            name: name.to_string(),
            display_name: format!("{name}, Mar del Plata, Argentina"),
            lat: -38.0,
            lon: -57.5,
            city: Some("Mar del Plata".to_string()),
            country: Some("Argentina".to_string()),
        }
    }

    fn candidates() -> Vec<Beach> {
        vec![
            beach("Playa Grande"),
            beach("Playa Grande Norte"),
            beach("Playa Varese"),
            beach("Punta Mogotes"),
        ]
    }

    #[test]
    fn test_exact_match_is_preferred() {
        let beaches = candidates();
        let selected = BeachMatchStrategy::ExactOrSubstring
            .select("  playa GRANDE ", &beaches)
            .unwrap();
        assert_eq!(selected.name, "Playa Grande");
    }

    #[test]
    fn test_single_substring_match() {
        let beaches = candidates();
        let selected = BeachMatchStrategy::ExactOrSubstring
            .select("mogotes", &beaches)
            .unwrap();
        assert_eq!(selected.name, "Punta Mogotes");
    }

    #[test]
    fn test_ambiguous_substring_match() {
        let beaches = candidates();
        assert!(BeachMatchStrategy::ExactOrSubstring
            .select("playa", &beaches)
            .is_none());
    }

    #[test]
    fn test_duplicate_names_are_not_ambiguous() {
        let mut beaches = candidates();
        beaches.push(beach("Punta Mogotes"));
        let selected = BeachMatchStrategy::ExactOrSubstring
            .select("mogotes", &beaches)
            .unwrap();
        assert_eq!(selected.name, "Punta Mogotes");
    }

    #[test]
    fn test_exact_strategy_ignores_substrings() {
        let beaches = candidates();
        assert!(BeachMatchStrategy::Exact.select("mogotes", &beaches).is_none());
        assert!(BeachMatchStrategy::Exact
            .select("Punta Mogotes", &beaches)
            .is_some());
    }

    #[test]
    fn test_empty_query_never_matches() {
        assert!(BeachMatchStrategy::ExactOrSubstring
            .select("   ", &candidates())
            .is_none());
        assert!(BeachMatchStrategy::ExactOrSubstring
            .select("Playa Grande", &[])
            .is_none());
    }

    #[test]
    fn test_not_found_messages() {
        let err = not_found("Playa Grande", "Nowhere", None, &[]);
        assert_eq!(err.kind(), "beach_not_found");
        assert!(err.to_string().contains("no beaches found in Nowhere"));

        let err = not_found("playa", "Mar del Plata", Some("Argentina"), &candidates());
        assert!(err.to_string().contains("Mar del Plata, Argentina"));
        assert!(err.to_string().contains("Playa Varese"));
    }

    #[test]
    fn test_not_found_lists_each_name_once() {
        let mut beaches = candidates();
        beaches.push(beach("Playa Grande"));
        let err = not_found("playa", "Mar del Plata", None, &beaches);
        assert_eq!(
            err.to_string().matches("Playa Grande,").count(),
            1,
            "{err}"
        );
        assert!(err
            .to_string()
            .ends_with("Playa Grande, Playa Grande Norte, Playa Varese, Punta Mogotes)"));
    }
}
