use crate::{Config, WeatherReading, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Sentinel shipped in sample configs; treated the same as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(
        "No OpenWeatherMap API key configured.\n\
         Hint: run `cityweather configure` or set WEATHER_API_KEY."
    )]
    MissingCredential,

    #[error("Error fetching weather data: {0}")]
    Network(String),

    #[error("Malformed weather payload: {0}")]
    MalformedPayload(String),
}

pub type FetchOutcome = Result<WeatherReading, FetchError>;

/// Returns true when `api_key` can be sent to the provider.
pub fn is_usable_api_key(api_key: &str) -> bool {
    let key = api_key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch the provider's JSON payload for `city` without interpreting it.
    async fn fetch_raw(&self, city: &str) -> Result<serde_json::Value, FetchError>;

    /// Fetch the current weather for `city`.
    async fn fetch(&self, city: &str) -> FetchOutcome {
        let payload = self.fetch_raw(city).await?;
        openweather::reading_from_payload(payload, city)
    }
}

/// Construct the weather provider described by `config`.
///
/// Fails with [`FetchError::MissingCredential`] when no usable key is set, so
/// callers can report it before any request is attempted.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, FetchError> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|key| is_usable_api_key(key))
        .ok_or(FetchError::MissingCredential)?;

    Ok(Box::new(OpenWeatherProvider::new(
        api_key.trim().to_owned(),
        config.base_url.clone(),
        config.timeout(),
    )))
}
