//! Localization for the dashboard: UI label tables and locale-aware
//! date/time/number formatting
//!
//! The selected locale drives the label strings, the weekday/month names in
//! the title bar and day headers, and the decimal separator used for numeric
//! labels. To add a new language, add a `Locale` variant, its `Labels` entry
//! and its date pattern; the formatting helpers pick up weekday and month
//! names from chrono's locale data.

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::settings::TimeFormat;

/// Languages offered in the plugin settings dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
    Es,
    Fr,
}

/// UI strings for one language
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Labels {
    pub all_day_text: &'static str,
    pub no_events_content: &'static str,
    pub nothing_more_today: &'static str,
    pub today: &'static str,
    pub tomorrow: &'static str,
    pub day_after_tomorrow: &'static str,
}

const LABELS_EN: Labels = Labels {
    all_day_text: "All day",
    no_events_content: "Nothing scheduled!",
    nothing_more_today: "Nothing more for today.",
    today: "Today",
    tomorrow: "Tomorrow",
    day_after_tomorrow: "Day after tomorrow",
};

const LABELS_DE: Labels = Labels {
    all_day_text: "Ganztägig",
    no_events_content: "Nix geplant!",
    nothing_more_today: "Nix mehr los heute!",
    today: "Heute",
    tomorrow: "Morgen",
    day_after_tomorrow: "Übermorgen",
};

const LABELS_ES: Labels = Labels {
    all_day_text: "Todo el día",
    no_events_content: "¡Nada programado!",
    nothing_more_today: "Nada más para hoy.",
    today: "Hoy",
    tomorrow: "Mañana",
    day_after_tomorrow: "Pasado mañana",
};

const LABELS_FR: Labels = Labels {
    all_day_text: "Toute la journée",
    no_events_content: "Rien de prévu !",
    nothing_more_today: "Rien d'autre pour aujourd'hui.",
    today: "Aujourd'hui",
    tomorrow: "Demain",
    day_after_tomorrow: "Après-demain",
};

impl Locale {
    /// All supported locales, in settings-dropdown order
    pub const ALL: [Locale; 4] = [Locale::En, Locale::De, Locale::Es, Locale::Fr];

    /// Two-letter language code used in the settings schema
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
            Locale::Es => "es",
            Locale::Fr => "fr",
        }
    }

    /// Language name shown in the settings dropdown
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::De => "German",
            Locale::Es => "Spanish",
            Locale::Fr => "French",
        }
    }

    /// UI label table for this language
    #[must_use]
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::En => &LABELS_EN,
            Locale::De => &LABELS_DE,
            Locale::Es => &LABELS_ES,
            Locale::Fr => &LABELS_FR,
        }
    }

    fn chrono_locale(self) -> chrono::Locale {
        match self {
            Locale::En => chrono::Locale::en_US,
            Locale::De => chrono::Locale::de_DE,
            Locale::Es => chrono::Locale::es_ES,
            Locale::Fr => chrono::Locale::fr_FR,
        }
    }

    /// Long date pattern; date order differs per language
    fn long_date_pattern(self) -> &'static str {
        match self {
            Locale::En => "%A, %B %-d, %Y",
            Locale::De => "%A, %-d. %B %Y",
            Locale::Es => "%A, %-d de %B de %Y",
            Locale::Fr => "%A %-d %B %Y",
        }
    }

    /// Decimal separator for numeric labels
    fn decimal_separator(self) -> char {
        match self {
            Locale::En => '.',
            Locale::De | Locale::Es | Locale::Fr => ',',
        }
    }
}

/// Format a date as the localized long form used by the title bar and the
/// day headers, e.g. "Monday, March 2, 2026" / "Montag, 2. März 2026".
#[must_use]
pub fn format_long_date(date: NaiveDate, locale: Locale) -> String {
    date.format_localized(locale.long_date_pattern(), locale.chrono_locale())
        .to_string()
}

/// Format a clock time per the device's time format: "3:05 pm" or "15:05"
#[must_use]
pub fn format_clock_time<Tz: TimeZone>(dt: &DateTime<Tz>, time_format: TimeFormat) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match time_format {
        TimeFormat::TwelveHour => dt.format("%-I:%M %p").to_string().to_lowercase(),
        TimeFormat::TwentyFourHour => dt.format("%H:%M").to_string(),
    }
}

/// Rounded temperature label with degree suffix, e.g. "12°C"
#[must_use]
pub fn format_temperature(celsius: f64) -> String {
    format!("{}°C", celsius.round() as i64)
}

/// Rounded min/max temperature range, e.g. "3° – 9°C"
#[must_use]
pub fn format_temperature_range(min: f64, max: f64) -> String {
    format!("{}° – {}°C", min.round() as i64, max.round() as i64)
}

/// One-decimal number with the locale's decimal separator, e.g. "0,4" for de
#[must_use]
pub fn format_decimal(value: f64, locale: Locale) -> String {
    let formatted = format!("{value:.1}");
    match locale.decimal_separator() {
        '.' => formatted,
        sep => formatted.replace('.', &sep.to_string()),
    }
}
