use std::{error::Error as _, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::model::WeatherReading;

use super::{FetchError, WeatherProvider, is_usable_api_key};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Self {
        Self::with_client(api_key, base_url, timeout, Client::new())
    }

    pub fn with_client(api_key: String, base_url: String, timeout: Duration, http: Client) -> Self {
        Self {
            api_key,
            base_url,
            timeout,
            http,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_raw(&self, city: &str) -> Result<serde_json::Value, FetchError> {
        if !is_usable_api_key(&self.api_key) {
            return Err(FetchError::MissingCredential);
        }

        debug!(city, url = %self.base_url, "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::Network(describe(&e)))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Network(describe(&e)))?;

        debug!(%status, bytes = body.len(), "weather response received");

        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "OpenWeather request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        parse_payload(&body)
    }
}

/// Parse a response body into a JSON object.
pub fn parse_payload(body: &str) -> Result<serde_json::Value, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedPayload(format!("response is not JSON: {e}")))?;

    if !value.is_object() {
        return Err(FetchError::MalformedPayload(
            "response is not a JSON object".to_string(),
        ));
    }

    Ok(value)
}

/// Convert an OpenWeather current-weather payload into a [`WeatherReading`].
///
/// Missing or `null` fields are not errors: numbers default to `0.0`,
/// country and description to `""`, and the city name to `requested_city`.
/// Fields present with the wrong JSON type make the payload malformed.
pub fn reading_from_payload(
    payload: serde_json::Value,
    requested_city: &str,
) -> Result<WeatherReading, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_value(payload)
        .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

    let main = parsed.main.unwrap_or_default();
    let wind = parsed.wind.unwrap_or_default();
    let coord = parsed.coord.unwrap_or_default();

    let description = parsed
        .weather
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|w| w.description)
        .unwrap_or_default();

    Ok(WeatherReading {
        city: parsed.name.unwrap_or_else(|| requested_city.to_string()),
        country: parsed.sys.and_then(|s| s.country).unwrap_or_default(),
        temperature_c: main.temp.unwrap_or(0.0),
        feels_like_c: main.feels_like.unwrap_or(0.0),
        humidity_pct: main.humidity.unwrap_or(0.0),
        pressure_hpa: main.pressure.unwrap_or(0.0),
        description,
        wind_speed_mps: wind.speed.unwrap_or(0.0),
        visibility_m: parsed.visibility.unwrap_or(0.0),
        latitude: coord.lat.unwrap_or(0.0),
        longitude: coord.lon.unwrap_or(0.0),
    })
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwCoord {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    sys: Option<OwSys>,
    main: Option<OwMain>,
    weather: Option<Vec<OwWeather>>,
    wind: Option<OwWind>,
    visibility: Option<f64>,
    coord: Option<OwCoord>,
}

/// Render a reqwest error together with its underlying causes.
fn describe(err: &reqwest::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
