//! Plugin settings and host device configuration
//!
//! The host owns settings persistence and the configuration UI; this module
//! defines the settings fields the plugin exposes, validates them, and maps
//! the host's device configuration (resolution, orientation, timezone, time
//! format) into typed values.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::color;
use crate::error::PluginError;
use crate::locale::Locale;

/// Fallback coordinates when the settings carry no location (Darmstadt)
pub const DEFAULT_LATITUDE: f64 = 49.8728;
pub const DEFAULT_LONGITUDE: f64 = 8.6512;

/// Timezone assumed when the host provides none
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Font size options exposed in the settings UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    XSmall,
    Smaller,
    Small,
    #[default]
    Normal,
    Large,
    Larger,
    XLarge,
}

impl FontSize {
    /// Scale factor applied to the template's base font sizes
    #[must_use]
    pub fn scale(self) -> f32 {
        match self {
            FontSize::XSmall => 0.7,
            FontSize::Smaller => 0.8,
            FontSize::Small => 0.9,
            FontSize::Normal => 1.0,
            FontSize::Large => 1.1,
            FontSize::Larger => 1.2,
            FontSize::XLarge => 1.3,
        }
    }
}

/// Display orientation reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Clock format reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

/// Settings the host's configuration UI collects for this plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSettings {
    /// Display language
    #[serde(default)]
    pub language: Locale,
    /// iCalendar feed URLs (http, https or webcal)
    #[serde(default)]
    pub calendar_urls: Vec<String>,
    /// Background color per calendar, `#rrggbb`
    #[serde(default)]
    pub calendar_colors: Vec<String>,
    /// Weather location latitude in decimal degrees
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Weather location longitude in decimal degrees
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Weather location name, geocoded when no coordinates are set
    #[serde(default)]
    pub location: Option<String>,
    /// Font size selection
    #[serde(default)]
    pub font_size: FontSize,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            language: Locale::En,
            calendar_urls: Vec::new(),
            calendar_colors: Vec::new(),
            latitude: None,
            longitude: None,
            location: None,
            font_size: FontSize::Normal,
        }
    }
}

impl PluginSettings {
    /// Validate all settings
    pub fn validate(&self) -> Result<(), PluginError> {
        self.validate_calendar_urls()?;
        self.validate_calendar_colors()?;
        self.validate_coordinates()?;
        Ok(())
    }

    /// Validate the calendar feed URLs
    fn validate_calendar_urls(&self) -> Result<(), PluginError> {
        if self.calendar_urls.is_empty() {
            return Err(PluginError::settings("at least one calendar URL is required"));
        }
        for url in &self.calendar_urls {
            let trimmed = url.trim();
            if trimmed.is_empty() {
                return Err(PluginError::settings("calendar URL cannot be blank"));
            }
            let valid_scheme = trimmed.starts_with("http://")
                || trimmed.starts_with("https://")
                || trimmed.starts_with("webcal://");
            if !valid_scheme {
                return Err(PluginError::settings(format!(
                    "calendar URL '{trimmed}' must use http, https or webcal"
                )));
            }
        }
        Ok(())
    }

    /// Validate the per-calendar colors, when provided
    fn validate_calendar_colors(&self) -> Result<(), PluginError> {
        for c in &self.calendar_colors {
            color::parse_hex(c)?;
        }
        Ok(())
    }

    /// Validate the weather coordinates, when provided
    fn validate_coordinates(&self) -> Result<(), PluginError> {
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(PluginError::settings(format!(
                    "latitude {lat} out of range (-90..90)"
                )));
            }
        }
        if let Some(lon) = self.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(PluginError::settings(format!(
                    "longitude {lon} out of range (-180..180)"
                )));
            }
        }
        Ok(())
    }

    /// Colors aligned with the URL list, padded with the default event color
    #[must_use]
    pub fn padded_colors(&self) -> Vec<String> {
        if self.calendar_colors.len() >= self.calendar_urls.len() {
            self.calendar_colors.clone()
        } else {
            vec![color::DEFAULT_EVENT_COLOR.to_string(); self.calendar_urls.len()]
        }
    }
}

/// Device configuration provided by the host at render time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfig {
    /// Panel resolution as reported by the host, width x height
    pub resolution: (u32, u32),
    #[serde(default)]
    pub orientation: Orientation,
    /// IANA timezone name
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub time_format: TimeFormat,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            resolution: (800, 480),
            orientation: Orientation::Horizontal,
            timezone: default_timezone(),
            time_format: TimeFormat::TwelveHour,
        }
    }
}

impl DeviceConfig {
    /// Effective render dimensions, swapped for vertical mounting
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        match self.orientation {
            Orientation::Horizontal => self.resolution,
            Orientation::Vertical => (self.resolution.1, self.resolution.0),
        }
    }

    /// Parse the configured IANA timezone
    pub fn tz(&self) -> Result<Tz, PluginError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| PluginError::settings(format!("unknown timezone '{}'", self.timezone)))
    }
}
