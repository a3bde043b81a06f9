/// A single current-weather observation for one city.
///
/// Numeric fields the provider left out are `0.0` and text fields are empty;
/// a `visibility_m` of `0.0` means the visibility is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub description: String,
    pub wind_speed_mps: f64,
    pub visibility_m: f64,
    pub latitude: f64,
    pub longitude: f64,
}
