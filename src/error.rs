//! Error types for the agenda-weather plugin

use thiserror::Error;

/// Main error type surfaced to the dashboard host
#[derive(Error, Debug)]
pub enum PluginError {
    /// Settings validation errors
    #[error("Settings error: {message}")]
    Settings { message: String },

    /// Calendar feed errors (fetch or parse)
    #[error("Calendar error: {message}")]
    Calendar { message: String },

    /// Weather API errors
    #[error("Weather error: {message}")]
    Weather { message: String },

    /// HTTP transport errors
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PluginError {
    /// Create a new settings error
    pub fn settings<S: Into<String>>(message: S) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }

    /// Create a new calendar error
    pub fn calendar<S: Into<String>>(message: S) -> Self {
        Self::Calendar {
            message: message.into(),
        }
    }

    /// Create a new weather error
    pub fn weather<S: Into<String>>(message: S) -> Self {
        Self::Weather {
            message: message.into(),
        }
    }

    /// Get a message suitable for the host's fallback/error screen
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PluginError::Settings { message } => {
                format!("Invalid plugin settings: {message}")
            }
            PluginError::Calendar { .. } => {
                "Unable to load calendar feed. Please check the calendar URLs.".to_string()
            }
            PluginError::Weather { .. } => {
                "Unable to load weather data. Please check your internet connection.".to_string()
            }
            PluginError::Http { .. } => {
                "Unable to reach external services. Please check your internet connection."
                    .to_string()
            }
            PluginError::Io { .. } => "File operation failed.".to_string(),
        }
    }
}
