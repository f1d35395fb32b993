use crate::{config::Config, error::WeatherError, model::WeatherSnapshot};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tracing::warn;

pub mod weatherapi;

pub use weatherapi::WeatherApiClient;

/// Anything that can turn a city name into a [`WeatherSnapshot`].
///
/// Implementations make exactly one outbound call per `fetch` and never retry.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;
}

/// Stand-in used until an API key is configured. Every fetch fails with
/// [`WeatherError::NotConfigured`] without touching the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredSource;

#[async_trait]
impl WeatherSource for UnconfiguredSource {
    async fn fetch(&self, _city: &str) -> Result<WeatherSnapshot, WeatherError> {
        Err(WeatherError::NotConfigured)
    }
}

/// Construct the weather source described by `config`.
///
/// A missing API key is not an error here: pages that need no weather data
/// still render, and weather pages report the missing key in their descriptor.
pub fn source_from_config(config: &Config) -> Result<Arc<dyn WeatherSource>, WeatherError> {
    match config.api_key() {
        Ok(api_key) => {
            let client = WeatherApiClient::new(api_key, config.base_url(), config.timeout())?;
            Ok(Arc::new(client))
        }
        Err(_) => {
            warn!("no API key configured, weather pages will show a configuration hint");
            Ok(Arc::new(UnconfiguredSource))
        }
    }
}
