//! Weather data from the Open-Meteo DWD-ICON model
//!
//! Fetches current conditions, today's detail (min/max plus fixed hourly
//! snapshots) and a two-day forecast. Weather is decorative on this
//! dashboard: a failed fetch logs a warning and yields an empty report so the
//! agenda still renders.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::instrument;

use crate::locale::{self, Locale};
use crate::models::{
    CurrentWeather, ForecastDay, HourlySnapshots, Location, TodayWeather, WeatherReport,
};

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/dwd-icon";
const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch the weather report for the given coordinates.
///
/// Never fails the render cycle: any fetch or decode problem is logged and an
/// empty report is returned.
#[instrument(skip(locale))]
pub fn fetch_report(timezone: &str, locale: Locale, latitude: f64, longitude: f64) -> WeatherReport {
    match fetch_forecast(timezone, latitude, longitude) {
        Ok(response) => build_report(&response, locale),
        Err(err) => {
            tracing::warn!("Failed to fetch weather data: {err:#}");
            WeatherReport::default()
        }
    }
}

fn fetch_forecast(
    timezone: &str,
    latitude: f64,
    longitude: f64,
) -> Result<open_meteo::ForecastResponse> {
    let url = format!(
        "{FORECAST_URL}?latitude={latitude}&longitude={longitude}&current_weather=true&daily=temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode&hourly=temperature_2m&forecast_days=3&timezone={}",
        urlencoding::encode(timezone)
    );

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let response = client.get(url).send()?.error_for_status()?;

    response
        .json()
        .with_context(|| "Failed to parse Open-Meteo forecast response")
}

/// Resolve a location name via the Open-Meteo geocoding API (no API key)
#[instrument]
pub fn geocode(location_name: &str) -> Result<Vec<Location>> {
    let url = format!(
        "{GEOCODING_URL}?name={}&count=5&language=en&format=json",
        urlencoding::encode(location_name)
    );

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let response = client.get(url).send()?.error_for_status()?;

    let geocoding_response: open_meteo::GeocodingResponse = response
        .json()
        .with_context(|| "Failed to parse Open-Meteo geocoding response")?;

    Ok(geocoding_response
        .results
        .unwrap_or_default()
        .into_iter()
        .map(Into::into)
        .collect())
}

/// Build the report from an API response. Pure; separated from the fetch so
/// it can be tested against fixture responses.
#[must_use]
pub fn build_report(response: &open_meteo::ForecastResponse, locale: Locale) -> WeatherReport {
    let labels = locale.labels();

    let current = response.current_weather.as_ref().map(|current| {
        let code = current.weathercode;
        CurrentWeather {
            icon: icon_for_code(code).to_string(),
            temperature: current.temperature,
            temperature_label: locale::format_temperature(current.temperature),
            windspeed: current.windspeed,
            weather_code: code,
            description: description_for_code(code).to_string(),
        }
    });

    let today = response.daily.as_ref().and_then(|daily| {
        let today_date = daily.time.first()?;
        let temp_min = value_at(&daily.temperature_min, 0);
        let temp_max = value_at(&daily.temperature_max, 0);
        let code = code_at(&daily.weather_code, 0).unwrap_or(0);
        let range_label = match (temp_min, temp_max) {
            (Some(lo), Some(hi)) => Some(locale::format_temperature_range(lo, hi)),
            _ => None,
        };
        Some(TodayWeather {
            temp_min,
            temp_max,
            range_label,
            icon: icon_for_code(code).to_string(),
            weather_code: code,
            hourly: hourly_snapshots(response.hourly.as_ref(), today_date),
        })
    });

    let mut forecast = Vec::new();
    if let Some(daily) = &response.daily {
        for (i, label) in [(1, labels.tomorrow), (2, labels.day_after_tomorrow)] {
            if daily.time.len() <= i {
                continue;
            }
            let temp_min = value_at(&daily.temperature_min, i).unwrap_or(0.0);
            let temp_max = value_at(&daily.temperature_max, i).unwrap_or(0.0);
            let precipitation = value_at(&daily.precipitation, i).unwrap_or(0.0);
            let code = code_at(&daily.weather_code, i).unwrap_or(0);
            forecast.push(ForecastDay {
                label: label.to_string(),
                icon: icon_for_code(code).to_string(),
                temp_min,
                temp_max,
                range_label: locale::format_temperature_range(temp_min, temp_max),
                precipitation,
                precipitation_label: locale::format_decimal(precipitation, locale),
                weather_code: code,
            });
        }
    }

    WeatherReport {
        current,
        today,
        forecast,
    }
}

/// Pull the 08:00 / 12:00 / 15:00 temperatures for the given date out of the
/// hourly series. Timestamps arrive as "2026-03-02T08:00" local time.
fn hourly_snapshots(hourly: Option<&open_meteo::HourlyData>, date: &str) -> HourlySnapshots {
    let mut snapshots = HourlySnapshots::default();
    let Some(hourly) = hourly else {
        return snapshots;
    };

    for (idx, timestamp) in hourly.time.iter().enumerate() {
        if !timestamp.starts_with(date) {
            continue;
        }
        let Some(hour) = timestamp.get(11..13).and_then(|h| h.parse::<u8>().ok()) else {
            continue;
        };
        let temp = value_at(&hourly.temperature, idx);
        match hour {
            8 => snapshots.morning = temp,
            12 => snapshots.noon = temp,
            15 => snapshots.afternoon = temp,
            _ => {}
        }
    }
    snapshots
}

fn value_at(series: &Option<Vec<Option<f64>>>, index: usize) -> Option<f64> {
    series.as_ref().and_then(|v| v.get(index)).copied().flatten()
}

fn code_at(series: &Option<Vec<Option<u8>>>, index: usize) -> Option<u8> {
    series.as_ref().and_then(|v| v.get(index)).copied().flatten()
}

/// Glyph for a WMO weather code, for the template's icon slots
#[must_use]
pub fn icon_for_code(code: u8) -> &'static str {
    match code {
        0 => "☀️",
        1 => "🌤️",
        2 => "⛅",
        3 => "☁️",
        45 | 48 => "🌫️",
        51 | 53 | 55 | 80 => "🌦️",
        61 | 63 | 65 | 81 | 82 => "🌧️",
        71 | 73 | 75 => "❄️",
        95 | 96 | 99 => "⛈️",
        _ => "❓",
    }
}

/// Human-readable description of a WMO weather code
#[must_use]
pub fn description_for_code(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Open-Meteo API response structures
pub mod open_meteo {
    use serde::Deserialize;

    use crate::models::Location;

    /// Forecast response from the DWD-ICON endpoint
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current_weather: Option<CurrentWeatherData>,
        pub daily: Option<DailyData>,
        pub hourly: Option<HourlyData>,
    }

    /// Current weather block (`current_weather=true`)
    #[derive(Debug, Deserialize)]
    pub struct CurrentWeatherData {
        pub temperature: f64,
        pub windspeed: f64,
        pub weathercode: u8,
    }

    /// Daily aggregates
    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub time: Vec<String>,
        #[serde(rename = "temperature_2m_max")]
        pub temperature_max: Option<Vec<Option<f64>>>,
        #[serde(rename = "temperature_2m_min")]
        pub temperature_min: Option<Vec<Option<f64>>>,
        #[serde(rename = "precipitation_sum")]
        pub precipitation: Option<Vec<Option<f64>>>,
        #[serde(rename = "weathercode")]
        pub weather_code: Option<Vec<Option<u8>>>,
    }

    /// Hourly series
    #[derive(Debug, Deserialize)]
    pub struct HourlyData {
        pub time: Vec<String>,
        #[serde(rename = "temperature_2m")]
        pub temperature: Option<Vec<Option<f64>>>,
    }

    /// Geocoding response
    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
    }

    impl From<GeocodingResult> for Location {
        fn from(result: GeocodingResult) -> Self {
            Location {
                latitude: result.latitude,
                longitude: result.longitude,
                name: result.name,
                country: result.country,
            }
        }
    }
}
