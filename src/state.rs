use anyhow::Result;
use std::sync::Arc;

use crate::{
    config::Config,
    forecast::{OpenMeteoClient, WeatherProvider},
    simulation::PolicySimulator,
};

/// Collaborators shared by all request handlers. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<dyn WeatherProvider>,
    pub simulator: Arc<PolicySimulator>,
}

impl AppState {
    pub fn new(weather: Arc<dyn WeatherProvider>, simulator: PolicySimulator) -> Self {
        Self {
            weather,
            simulator: Arc::new(simulator),
        }
    }

    /// Live Open-Meteo weather and the default policy model
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let weather = Arc::new(OpenMeteoClient::new(&cfg.weather)?);
        Ok(Self::new(weather, PolicySimulator::default()))
    }
}
