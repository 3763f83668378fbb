//! Data models for the template contract

pub mod event;
pub mod location;
pub mod weather;

pub use event::AgendaEvent;
pub use location::Location;
pub use weather::{CurrentWeather, ForecastDay, HourlySnapshots, TodayWeather, WeatherReport};
