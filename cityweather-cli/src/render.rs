use std::fmt::Write as _;

use chrono::DateTime;
use chrono_tz::Tz;
use cityweather_core::{
    CityReport, FilteredZones, TimezoneId, WeatherReading,
    display::{format_time, format_visibility, title_case},
};

/// Weather metrics, description and the city's local time.
pub fn report(report: &CityReport) -> String {
    let r = &report.reading;
    let mut out = String::new();

    let _ = writeln!(out, "Weather data retrieved for {}, {}", r.city, r.country);
    let _ = writeln!(out);
    let _ = writeln!(out, "  Temperature:  {}°C", r.temperature_c);
    let _ = writeln!(out, "  Feels Like:   {}°C", r.feels_like_c);
    let _ = writeln!(out, "  Humidity:     {}%", r.humidity_pct);
    let _ = writeln!(out, "  Pressure:     {} hPa", r.pressure_hpa);
    let _ = writeln!(out, "  Wind Speed:   {} m/s", r.wind_speed_mps);
    let _ = writeln!(out, "  Visibility:   {}", format_visibility(r.visibility_m));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", title_case(&r.description));
    let _ = writeln!(out);
    let _ = writeln!(out, "Timezone Information");
    let _ = writeln!(out, "  City Timezone: {}", report.timezone.zone.display_name());
    let _ = writeln!(out, "  Current Time:  {}", format_time(&report.local_time));

    out
}

pub fn zone_time(zone: TimezoneId, time: &DateTime<Tz>) -> String {
    format!(
        "Current time in {}: {}",
        zone.display_name(),
        format_time(time)
    )
}

pub fn location(reading: &WeatherReading) -> String {
    format!(
        "Location Details\n  Latitude:     {}°\n  Longitude:    {}°\n  Country Code: {}\n",
        reading.latitude, reading.longitude, reading.country
    )
}

/// One zone per line, the pre-selected entry marked with `>`.
pub fn zone_list(filtered: &FilteredZones) -> String {
    let mut out = String::new();
    for (idx, zone) in filtered.zones.iter().enumerate() {
        let marker = if Some(idx) == filtered.selected { '>' } else { ' ' };
        let _ = writeln!(out, "{marker} {}", zone.display_name());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use cityweather_core::{ResolvedZone, TimezoneCatalog};

    fn kolkata() -> TimezoneId {
        TimezoneId::parse("Asia/Kolkata").unwrap()
    }

    fn sample(visibility_m: f64) -> CityReport {
        CityReport {
            reading: WeatherReading {
                city: "Mumbai".into(),
                country: "IN".into(),
                temperature_c: 30.0,
                feels_like_c: 33.5,
                humidity_pct: 70.0,
                pressure_hpa: 1008.0,
                description: "clear sky".into(),
                wind_speed_mps: 3.1,
                visibility_m,
                latitude: 19.07,
                longitude: 72.87,
            },
            timezone: ResolvedZone {
                zone: kolkata(),
                fallback: None,
            },
            local_time: chrono_tz::Asia::Kolkata
                .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
                .unwrap(),
            raw: serde_json::json!({}),
        }
    }

    #[test]
    fn report_shows_metrics_and_title_cased_description() {
        let text = report(&sample(10000.0));

        assert!(text.starts_with("Weather data retrieved for Mumbai, IN"));
        assert!(text.contains("Temperature:  30°C"));
        assert!(text.contains("Feels Like:   33.5°C"));
        assert!(text.contains("Visibility:   10.0 km"));
        assert!(text.contains("\nClear Sky\n"));
        assert!(text.contains("City Timezone: Asia/Kolkata"));
        assert!(text.contains("Current Time:  2024-01-02 03:04:05 IST"));
    }

    #[test]
    fn unknown_visibility_is_not_available() {
        let text = report(&sample(0.0));
        assert!(text.contains("Visibility:   N/A"));
        assert!(!text.contains("0.0 km"));
    }

    #[test]
    fn location_lists_coordinates_and_country() {
        let text = location(&sample(10000.0).reading);

        assert_eq!(
            text,
            "Location Details\n  Latitude:     19.07°\n  Longitude:    72.87°\n  Country Code: IN\n"
        );
    }

    #[test]
    fn zone_list_marks_selection() {
        let filtered = TimezoneCatalog::all().filter("kolk", kolkata());
        assert_eq!(zone_list(&filtered), "> Asia/Kolkata\n");
    }

    #[test]
    fn zone_time_uses_display_name() {
        let zone = TimezoneId::parse("America/New_York").unwrap();
        let time = chrono_tz::America::New_York
            .with_ymd_and_hms(2024, 7, 1, 12, 0, 0)
            .unwrap();

        assert_eq!(
            zone_time(zone, &time),
            "Current time in America/New York: 2024-07-01 12:00:00 EDT"
        );
    }
}
