//! Address-to-coordinates resolution against a Nominatim-compatible
//! endpoint, used to derive the search-origin bias from a business address.

use std::time::Duration;

use maprank_core::{AppConfig, GeoLocation};
use reqwest::Client;
use serde::Deserialize;

use crate::error::ScraperError;

/// Nominatim `/search` hit; coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

/// Forward geocoder over a Nominatim-compatible `/search` endpoint.
pub struct Geocoder {
    client: Client,
    endpoint: String,
}

impl Geocoder {
    /// Creates a geocoder with the configured endpoint, timeout and user
    /// agent. The public Nominatim instance requires an identifying UA.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.geocoder_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            endpoint: config.geocoder_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Resolves `address` to coordinates.
    ///
    /// Tolerant by design: any failure — network, non-2xx status, malformed
    /// body, no hits — yields `None`, and the caller falls back to its
    /// default location. Geocoding is a bias refinement, never a gate.
    pub async fn geocode_address(&self, address: &str) -> Option<GeoLocation> {
        let url = format!("{}/search", self.endpoint);
        let response = match self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(address, error = %e, "geocoding request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::warn!(address, status = %response.status(), "geocoding returned non-success");
            return None;
        }
        let hits: Vec<NominatimHit> = match response.json().await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(address, error = %e, "geocoding response did not parse");
                return None;
            }
        };
        let hit = hits.first()?;
        let latitude: f64 = hit.lat.parse().ok()?;
        let longitude: f64 = hit.lon.parse().ok()?;
        tracing::debug!(address, latitude, longitude, "address geocoded");
        Some(GeoLocation {
            latitude,
            longitude,
        })
    }
}
