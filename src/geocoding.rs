//! Beach lookup through the Nominatim (OpenStreetMap) search API.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use crate::constants::GEOCODING_RESULT_LIMIT;
use crate::error::{Result, SurfError};
use crate::models::{Beach, NominatimPlace};

/// OSM `(class, type)` tags accepted as beaches
pub const BEACH_TAGS: &[(&str, &str)] = &[("natural", "beach"), ("leisure", "beach_resort")];

const UNNAMED_BEACH: &str = "Unnamed Beach";

/// Resolves a city (and optional country) to its beaches.
///
/// An empty result is not an error; callers decide whether it is terminal.
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    async fn find_beaches(&self, city: &str, country: Option<&str>) -> Result<Vec<Beach>>;
}

pub struct NominatimClient {
    client: Arc<Client>,
    base_url: String,
}

impl NominatimClient {
    pub fn new(client: Arc<Client>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl GeocodingClient for NominatimClient {
    async fn find_beaches(&self, city: &str, country: Option<&str>) -> Result<Vec<Beach>> {
        let query = search_query(city, country);
        let url = format!("{}/search", self.base_url);
        let limit = GEOCODING_RESULT_LIMIT.to_string();

        tracing::info!("Searching beaches: {}", query);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.as_str()),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SurfError::geocoding(format!("Failed to search for beaches: {e}")))?;

        if !response.status().is_success() {
            return Err(SurfError::geocoding(format!(
                "Request failed with status: {}",
                response.status()
            )));
        }

        let places = response
            .json::<Vec<NominatimPlace>>()
            .await
            .map_err(|e| SurfError::geocoding(format!("Malformed geocoding response: {e}")))?;

        let beaches = beaches_from_places(places);
        tracing::info!("Found {} beaches for {}", beaches.len(), query);
        Ok(beaches)
    }
}

fn search_query(city: &str, country: Option<&str>) -> String {
    let mut parts = vec!["beach", city.trim()];
    if let Some(country) = country.map(str::trim).filter(|c| !c.is_empty()) {
        parts.push(country);
    }
    parts.join(" ")
}

/// Keeps beach-tagged places, in provider order
pub fn beaches_from_places(places: Vec<NominatimPlace>) -> Vec<Beach> {
    places
        .into_iter()
        .filter(is_beach)
        .map(|place| {
            let address = place.address;
            Beach {
                name: place
                    .name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| UNNAMED_BEACH.to_string()),
                display_name: place.display_name,
                lat: place.lat,
                lon: place.lon,
                city: address.city.or(address.town).or(address.village),
                country: address.country,
            }
        })
        .collect()
}

fn is_beach(place: &NominatimPlace) -> bool {
    BEACH_TAGS
        .iter()
        .any(|&(class, kind)| place.category == class && place.place_type == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn places() -> Vec<NominatimPlace> {
        serde_json::from_value(json!([
            {
                "name": "Playa Grande",
                "display_name": "Playa Grande, Mar del Plata, Buenos Aires, Argentina",
                "lat": "-38.0123",
                "lon": "-57.5351",
                "class": "natural",
                "type": "beach",
                "address": {"city": "Mar del Plata", "country": "Argentina"}
            },
            {
                "name": "Hotel Playa",
                "display_name": "Hotel Playa, Mar del Plata, Argentina",
                "lat": "-38.0",
                "lon": "-57.5",
                "class": "tourism",
                "type": "hotel",
                "address": {"city": "Mar del Plata", "country": "Argentina"}
            },
            {
                "name": "",
                "display_name": "Beach, Chapadmalal, Argentina",
                "lat": "-38.17",
                "lon": "-57.65",
                "class": "natural",
                "type": "beach",
                "address": {"village": "Chapadmalal", "country": "Argentina"}
            },
            {
                "name": "Punta Mogotes",
                "display_name": "Punta Mogotes, Mar del Plata, Argentina",
                "lat": "-38.07",
                "lon": "-57.54",
                "class": "leisure",
                "type": "beach_resort",
                "address": {"town": "Mar del Plata"}
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_filters_non_beach_places() {
        let beaches = beaches_from_places(places());
        let names: Vec<&str> = beaches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Playa Grande", "Unnamed Beach", "Punta Mogotes"]);
    }

    #[test]
    fn test_maps_address_fields() {
        let beaches = beaches_from_places(places());
        assert_eq!(beaches[0].city.as_deref(), Some("Mar del Plata"));
        assert_eq!(beaches[0].country.as_deref(), Some("Argentina"));
        assert_eq!(beaches[0].lat, -38.0123);
        assert_eq!(beaches[1].city.as_deref(), Some("Chapadmalal"));
        assert_eq!(beaches[2].city.as_deref(), Some("Mar del Plata"));
        assert_eq!(beaches[2].country, None);
    }

    #[test]
    fn test_beach_type_needs_beach_class() {
        let places: Vec<NominatimPlace> = serde_json::from_value(json!([
            {
                "name": "Beach Bar",
                "display_name": "Beach Bar, Bondi, Australia",
                "lat": "-33.89",
                "lon": "151.27",
                "class": "amenity",
                "type": "beach"
            },
            {
                "name": "Bondi Beach",
                "display_name": "Bondi Beach, Sydney, Australia",
                "lat": "-33.8908",
                "lon": "151.2743",
                "class": "natural",
                "type": "beach"
            }
        ]))
        .unwrap();
        let beaches = beaches_from_places(places);
        assert_eq!(beaches.len(), 1);
        assert_eq!(beaches[0].name, "Bondi Beach");
    }

    #[test]
    fn test_no_beach_results_is_empty() {
        assert!(beaches_from_places(Vec::new()).is_empty());
    }

    #[test]
    fn test_search_query() {
        assert_eq!(search_query("Mar del Plata", None), "beach Mar del Plata");
        assert_eq!(
            search_query(" Sydney ", Some("Australia")),
            "beach Sydney Australia"
        );
        assert_eq!(search_query("Sydney", Some("  ")), "beach Sydney");
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_geocoding_unavailable() {
        let http = Client::builder()
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        let client = NominatimClient::new(Arc::new(http), "http://127.0.0.1:9");
        let err = client.find_beaches("Sydney", None).await.unwrap_err();
        assert_eq!(err.kind(), "geocoding_unavailable");
    }
}
