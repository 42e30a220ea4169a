//! Live outdoor temperature (Open-Meteo forecast API)
//!
//! The simulator only needs the current 2 m air temperature at a single
//! site. Any failure to obtain it degrades to a configured fallback so that
//! callers always receive a usable reading.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::WeatherConfig;

/// Source of the outdoor temperature used as simulation context.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current outdoor temperature in °C. Never fails.
    async fn fetch_outdoor_temperature(&self) -> f64;
}

/// Geographic location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Outcome of a single temperature lookup
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherReading {
    Live(f64),
    Fallback { temperature_c: f64, reason: String },
}

impl WeatherReading {
    pub fn temperature_c(&self) -> f64 {
        match self {
            WeatherReading::Live(t) => *t,
            WeatherReading::Fallback { temperature_c, .. } => *temperature_c,
        }
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather API returned HTTP {0}")]
    Status(StatusCode),

    #[error("malformed weather response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Open-Meteo client for the current temperature at a fixed site
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    location: GeoLocation,
    fallback_temp_c: f64,
}

impl OpenMeteoClient {
    pub fn new(cfg: &WeatherConfig) -> Result<Self> {
        let client = Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
            location: GeoLocation {
                latitude: cfg.latitude,
                longitude: cfg.longitude,
            },
            fallback_temp_c: cfg.fallback_temp_c,
        })
    }

    fn forecast_url(&self) -> String {
        format!(
            "{}/v1/forecast?latitude={}&longitude={}&current=temperature_2m",
            self.base_url.trim_end_matches('/'),
            self.location.latitude,
            self.location.longitude
        )
    }

    async fn fetch_current(&self) -> Result<f64, WeatherError> {
        let url = self.forecast_url();
        debug!(%url, "fetching current temperature");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status));
        }

        let body = resp.text().await?;
        let parsed: ForecastResponse = serde_json::from_str(&body)?;
        Ok(parsed.current.temperature_2m)
    }

    /// Look up the current temperature, substituting the fallback on failure
    pub async fn read(&self) -> WeatherReading {
        match self.fetch_current().await {
            Ok(t) => {
                info!(temperature_c = t, "live weather fetched");
                WeatherReading::Live(t)
            }
            Err(e) => {
                warn!(error = %e, fallback_c = self.fallback_temp_c, "weather API error, using fallback");
                WeatherReading::Fallback {
                    temperature_c: self.fallback_temp_c,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn fetch_outdoor_temperature(&self) -> f64 {
        self.read().await.temperature_c()
    }
}

/// Provider that always reports the same temperature (offline runs, tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedTemperature(pub f64);

#[async_trait]
impl WeatherProvider for FixedTemperature {
    async fn fetch_outdoor_temperature(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
}
