//! Calendar event model for the agenda list

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// One row of the agenda list, serialized for the host template.
///
/// Times are local to the display timezone and carry their UTC offset, so
/// the template can print them without further conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEvent {
    /// Event title (VEVENT SUMMARY)
    pub title: String,
    /// Start in the display timezone
    pub start: DateTime<FixedOffset>,
    /// End in the display timezone, when the feed provides one
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end: Option<DateTime<FixedOffset>>,
    /// Date-only events (VALUE=DATE starts)
    pub all_day: bool,
    /// Background color of the source calendar
    pub background_color: String,
    /// Black or white, picked for contrast against the background
    pub text_color: String,
    /// Preformatted start time per the device clock format; absent for
    /// all-day events and placeholders
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub time_label: Option<String>,
    /// Synthetic "nothing scheduled" row, not a real calendar entry
    #[serde(skip_serializing_if = "is_false", default)]
    pub placeholder: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl AgendaEvent {
    /// Local date the event starts on
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// End when known, otherwise the start
    #[must_use]
    pub fn effective_end(&self) -> DateTime<FixedOffset> {
        self.end.unwrap_or(self.start)
    }
}
