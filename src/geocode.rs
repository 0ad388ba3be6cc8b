//! Address geocoding
//!
//! [`Geocoder`] is the seam the request pipeline depends on;
//! [`GeoapifyGeocoder`] is the production implementation backed by the
//! Geoapify search API.

use crate::models::Coordinates;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_GEOAPIFY_URL: &str = "https://api.geoapify.com/v1/geocode/search";

#[derive(Debug, Error)]
pub enum GeocodeError {
    /// No candidates, or the first candidate has no coordinates
    #[error("address could not be geocoded")]
    NotFound,
    #[error("geocoding service failed: {0:#}")]
    Upstream(#[from] anyhow::Error),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

// ============================================================================
// Geoapify
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GeoapifyResponse {
    #[serde(default)]
    pub features: Vec<GeoapifyFeature>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeoapifyFeature {
    #[serde(default)]
    pub properties: GeoapifyProperties,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeoapifyProperties {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl GeoapifyResponse {
    /// Coordinates of the first candidate only.
    pub fn first_coordinates(&self) -> Result<Coordinates, GeocodeError> {
        let first = self.features.first().ok_or(GeocodeError::NotFound)?;
        match (first.properties.lat, first.properties.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(GeocodeError::NotFound),
        }
    }
}

pub struct GeoapifyGeocoder {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeoapifyGeocoder {
    pub fn new(base_url: &str, api_key: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            client: builder.build().context("failed to build HTTP client")?,
        })
    }
}

#[async_trait]
impl Geocoder for GeoapifyGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        debug!("Geocoding '{}'", address);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("text", address), ("apiKey", self.api_key.as_str())])
            .send()
            .await
            .context("geocoding request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("geocoding request failed: {} - {}", status, text).into());
        }

        let body: GeoapifyResponse = response
            .json()
            .await
            .context("invalid geocoding response")?;
        body.first_coordinates()
    }
}
