//! Weather report models for the template contract

use serde::Serialize;

/// Weather block of the template: current conditions, today's detail and a
/// short forecast. Every part is optional; a failed fetch yields an empty
/// report and the template omits what is missing.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub current: Option<CurrentWeather>,
    pub today: Option<TodayWeather>,
    pub forecast: Vec<ForecastDay>,
}

/// Current conditions
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub icon: String,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Rounded display label, e.g. "12°C"
    pub temperature_label: String,
    /// Wind speed in km/h
    pub windspeed: f64,
    /// WMO weather code
    pub weather_code: u8,
    pub description: String,
}

/// Today's min/max and fixed hourly snapshots
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayWeather {
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    /// Rounded range label, e.g. "3° – 9°C", when both bounds are known
    pub range_label: Option<String>,
    pub icon: String,
    pub weather_code: u8,
    pub hourly: HourlySnapshots,
}

/// Temperatures at 08:00, 12:00 and 15:00 local time
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySnapshots {
    pub morning: Option<f64>,
    pub noon: Option<f64>,
    pub afternoon: Option<f64>,
}

/// One forecast day (tomorrow or the day after)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    /// Localized day label ("Tomorrow", "Übermorgen", ...)
    pub label: String,
    pub icon: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub range_label: String,
    /// Precipitation sum in mm
    pub precipitation: f64,
    /// Locale-formatted precipitation, e.g. "0,4" for de
    pub precipitation_label: String,
    pub weather_code: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_serialization() {
        let report = WeatherReport::default();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["current"].is_null());
        assert!(json["today"].is_null());
        assert_eq!(json["forecast"].as_array().unwrap().len(), 0);
    }
}
