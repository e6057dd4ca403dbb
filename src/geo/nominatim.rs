//! Nominatim search API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::GeocoderConfig;
use crate::domain::Coordinates;

use super::{GeoError, Geocoder};

/// Forward geocoder backed by the Nominatim search endpoint
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
}

/// One search hit; Nominatim serializes coordinates as strings
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    /// Build a client from configuration
    pub fn from_config(config: &GeocoderConfig) -> Result<Self, GeoError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, GeoError> {
        debug!(place = %place, "geocode: querying nominatim");

        let hits: Vec<SearchHit> = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[("q", place), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(hit) = hits.first() else {
            debug!(place = %place, "geocode: no results");
            return Ok(None);
        };

        let latitude: f64 = hit
            .lat
            .parse()
            .map_err(|_| GeoError::Malformed(format!("latitude {:?}", hit.lat)))?;
        let longitude: f64 = hit
            .lon
            .parse()
            .map_err(|_| GeoError::Malformed(format!("longitude {:?}", hit.lon)))?;

        let coords = Coordinates::new(latitude, longitude)
            .map_err(|e| GeoError::Malformed(e.to_string()))?;

        debug!(place = %place, lat = latitude, lon = longitude, "geocode: resolved");
        Ok(Some(coords))
    }
}
