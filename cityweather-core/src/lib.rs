//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeatherMap client behind the `WeatherProvider` trait
//! - Coordinate-to-timezone resolution and the timezone catalog
//! - The lookup pipeline tying these together, plus display formatting
//!
//! It is used by `cityweather-cli`, but can also be reused by other binaries or services.

pub mod catalog;
pub mod config;
pub mod display;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod timezone;

pub use catalog::{FilteredZones, TimezoneCatalog};
pub use config::Config;
pub use lookup::{CityReport, LookupError, lookup_city};
pub use model::WeatherReading;
pub use provider::{FetchError, FetchOutcome, WeatherProvider, provider_from_config};
pub use timezone::{
    FallbackReason, ResolvedZone, TimezoneError, TimezoneId, TimezoneResolver, current_time_in,
};
