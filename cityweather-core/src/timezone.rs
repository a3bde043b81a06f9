//! Coordinate-to-timezone resolution and wall-clock time in a zone.
//!
//! Point lookups use the tzf-rs boundary dataset; zone names and offsets come
//! from chrono-tz, which also backs the catalog in [`crate::catalog`].

use std::{fmt, str::FromStr, sync::OnceLock};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::{debug, warn};
use tzf_rs::DefaultFinder;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimezoneError {
    #[error("Unknown timezone '{0}'")]
    UnknownZone(String),
}

/// An IANA timezone identifier known to the timezone database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneId(Tz);

impl TimezoneId {
    pub fn parse(name: &str) -> Result<Self, TimezoneError> {
        Tz::from_str(name)
            .map(Self)
            .map_err(|_| TimezoneError::UnknownZone(name.to_string()))
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Name with underscores shown as spaces, e.g. `America/New York`.
    pub fn display_name(&self) -> String {
        self.name().replace('_', " ")
    }

    /// Current wall-clock time in this zone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.0)
    }
}

impl From<Tz> for TimezoneId {
    fn from(tz: Tz) -> Self {
        Self(tz)
    }
}

impl fmt::Display for TimezoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why coordinate resolution fell back to the default zone.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// Latitude or longitude was not a finite value in range.
    InvalidCoordinates { latitude: f64, longitude: f64 },
    /// The boundary dataset has no zone covering the point.
    NoMatch,
    /// The dataset named a zone the timezone database does not know.
    UnrecognizedZone(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::InvalidCoordinates {
                latitude,
                longitude,
            } => write!(f, "coordinates ({latitude}, {longitude}) are out of range"),
            FallbackReason::NoMatch => f.write_str("no timezone covers these coordinates"),
            FallbackReason::UnrecognizedZone(name) => {
                write!(f, "lookup returned unrecognized zone '{name}'")
            }
        }
    }
}

/// Outcome of a coordinate lookup. Always carries a usable zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedZone {
    pub zone: TimezoneId,
    /// Set when `zone` is the default rather than a lookup result.
    pub fallback: Option<FallbackReason>,
}

impl ResolvedZone {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct TimezoneResolver {
    default_zone: TimezoneId,
}

impl TimezoneResolver {
    pub fn new(default_zone: TimezoneId) -> Self {
        Self { default_zone }
    }

    pub fn default_zone(&self) -> TimezoneId {
        self.default_zone
    }

    /// Determine the zone covering (`latitude`, `longitude`).
    ///
    /// Never fails: anything short of a recognized zone yields the default,
    /// with the reason recorded in [`ResolvedZone::fallback`].
    pub fn resolve_from_coordinates(&self, latitude: f64, longitude: f64) -> ResolvedZone {
        match lookup(latitude, longitude) {
            Ok(zone) => {
                debug!(latitude, longitude, zone = zone.name(), "resolved timezone");
                ResolvedZone {
                    zone,
                    fallback: None,
                }
            }
            Err(reason) => {
                warn!(
                    latitude,
                    longitude,
                    fallback_zone = self.default_zone.name(),
                    "could not determine timezone from coordinates ({reason}); falling back to default"
                );
                ResolvedZone {
                    zone: self.default_zone,
                    fallback: Some(reason),
                }
            }
        }
    }
}

fn finder() -> &'static DefaultFinder {
    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    FINDER.get_or_init(DefaultFinder::new)
}

fn lookup(latitude: f64, longitude: f64) -> Result<TimezoneId, FallbackReason> {
    let in_range = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);
    if !in_range {
        return Err(FallbackReason::InvalidCoordinates {
            latitude,
            longitude,
        });
    }

    // tzf-rs takes (longitude, latitude).
    let name = finder().get_tz_name(longitude, latitude);
    if name.is_empty() {
        return Err(FallbackReason::NoMatch);
    }

    TimezoneId::parse(name).map_err(|_| FallbackReason::UnrecognizedZone(name.to_string()))
}

/// Current wall-clock time in the zone called `name`.
///
/// An unknown name is reported, never replaced by another zone.
pub fn current_time_in(name: &str) -> Result<DateTime<Tz>, TimezoneError> {
    TimezoneId::parse(name).map(|zone| zone.now())
}
