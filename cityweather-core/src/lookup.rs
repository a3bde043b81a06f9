use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;
use tracing::info;

use crate::{
    model::WeatherReading,
    provider::{FetchError, WeatherProvider, openweather::reading_from_payload},
    timezone::{ResolvedZone, TimezoneResolver},
};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Please enter a city name")]
    EmptyCity,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Everything shown for one city lookup.
#[derive(Debug, Clone)]
pub struct CityReport {
    pub reading: WeatherReading,
    pub timezone: ResolvedZone,
    pub local_time: DateTime<Tz>,
    /// Provider payload as received.
    pub raw: serde_json::Value,
}

/// Fetch the weather for `city`, then localize it to the city's timezone.
pub async fn lookup_city(
    provider: &dyn WeatherProvider,
    resolver: &TimezoneResolver,
    city: &str,
) -> Result<CityReport, LookupError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(LookupError::EmptyCity);
    }

    let raw = provider.fetch_raw(city).await?;
    let reading = reading_from_payload(raw.clone(), city)?;

    let timezone = resolver.resolve_from_coordinates(reading.latitude, reading.longitude);
    let local_time = timezone.zone.now();

    info!(
        city = %reading.city,
        country = %reading.country,
        zone = timezone.zone.name(),
        "weather lookup complete"
    );

    Ok(CityReport {
        reading,
        timezone,
        local_time,
        raw,
    })
}
