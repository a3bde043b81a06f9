//! The list of known timezones and the substring filter over it.

use chrono_tz::TZ_VARIANTS;

use crate::timezone::TimezoneId;

/// Every zone in the timezone database, in database order.
#[derive(Debug, Clone)]
pub struct TimezoneCatalog {
    zones: Vec<TimezoneId>,
}

impl TimezoneCatalog {
    pub fn all() -> Self {
        Self {
            zones: TZ_VARIANTS.iter().copied().map(TimezoneId::from).collect(),
        }
    }

    /// Catalog over an explicit list, kept in the given order.
    pub fn from_zones(zones: Vec<TimezoneId>) -> Self {
        Self { zones }
    }

    pub fn zones(&self) -> &[TimezoneId] {
        &self.zones
    }

    /// Zones whose name contains `filter`, ignoring case.
    ///
    /// An empty or all-whitespace filter keeps the whole catalog; any other
    /// filter is matched as typed, surrounding spaces included. `preferred`
    /// is pre-selected when it survives the filter, otherwise the first entry is.
    pub fn filter(&self, filter: &str, preferred: TimezoneId) -> FilteredZones {
        let needle = filter.to_lowercase();

        let zones: Vec<TimezoneId> = if needle.trim().is_empty() {
            self.zones.clone()
        } else {
            self.zones
                .iter()
                .copied()
                .filter(|zone| zone.name().to_lowercase().contains(&needle))
                .collect()
        };

        let selected = zones
            .iter()
            .position(|zone| *zone == preferred)
            .or(if zones.is_empty() { None } else { Some(0) });

        FilteredZones { zones, selected }
    }
}

/// Result of [`TimezoneCatalog::filter`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredZones {
    pub zones: Vec<TimezoneId>,
    /// Index into `zones` of the pre-selected entry; `None` if empty.
    pub selected: Option<usize>,
}

impl FilteredZones {
    pub fn selected_zone(&self) -> Option<TimezoneId> {
        self.selected.map(|idx| self.zones[idx])
    }
}
