//! Agenda + weather dashboard plugin for e-ink display hosts
//!
//! Aggregates events from one or more iCalendar feeds and a 3-day
//! Open-Meteo forecast into the data structure a host-owned template
//! renderer consumes. The host application owns plugin discovery, the
//! settings UI, the render loop and display I/O; this crate supplies the
//! settings schema, the data function and the template contract.

pub mod calendar;
pub mod color;
pub mod error;
pub mod locale;
pub mod models;
pub mod plugin;
pub mod settings;
pub mod weather;

// Re-export the plugin surface
pub use error::PluginError;
pub use locale::{Labels, Locale};
pub use models::{AgendaEvent, Location, WeatherReport};
pub use plugin::{AgendaWeatherPlugin, TemplateParams};
pub use settings::{DeviceConfig, FontSize, Orientation, PluginSettings, TimeFormat};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PluginError>;
