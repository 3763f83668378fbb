//! Plugin surface consumed by the dashboard host: the settings schema, the
//! data function invoked each render cycle, and the template data contract

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::instrument;

use crate::calendar;
use crate::color;
use crate::error::PluginError;
use crate::locale::{self, Labels, Locale};
use crate::models::{AgendaEvent, WeatherReport};
use crate::settings::{
    DeviceConfig, PluginSettings, TimeFormat, DEFAULT_LATITUDE, DEFAULT_LONGITUDE,
};
use crate::weather;

/// Data handed to the host's template renderer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateParams {
    /// Template view; fixed to the 3-day list
    pub view: &'static str,
    /// Localized long date for the title bar
    pub title: String,
    pub events: Vec<AgendaEvent>,
    /// Render time truncated to the hour, RFC 3339
    pub current_dt: String,
    pub timezone: String,
    pub time_format: TimeFormat,
    pub font_scale: f32,
    pub locale: Locale,
    pub labels: &'static Labels,
    pub weather: WeatherReport,
}

/// The agenda + weather dashboard plugin
pub struct AgendaWeatherPlugin;

impl AgendaWeatherPlugin {
    /// Settings fields for the host's configuration UI
    #[must_use]
    pub fn settings_schema() -> Value {
        let languages: Vec<Value> = Locale::ALL
            .iter()
            .map(|l| json!({ "value": l.code(), "label": l.display_name() }))
            .collect();
        json!({
            "fields": [
                {
                    "id": "language",
                    "type": "select",
                    "label": "Language",
                    "default": "en",
                    "options": languages,
                },
                {
                    "id": "calendarUrls",
                    "type": "url-list",
                    "label": "Calendar URLs (ICS)",
                    "required": true,
                },
                {
                    "id": "calendarColors",
                    "type": "color-list",
                    "label": "Calendar colors",
                    "default": color::DEFAULT_EVENT_COLOR,
                },
                { "id": "location", "type": "text", "label": "Weather location" },
                { "id": "latitude", "type": "number", "label": "Latitude" },
                { "id": "longitude", "type": "number", "label": "Longitude" },
                {
                    "id": "fontSize",
                    "type": "select",
                    "label": "Font size",
                    "default": "normal",
                    "options": [
                        "x-small", "smaller", "small", "normal",
                        "large", "larger", "x-large",
                    ],
                },
            ],
        })
    }

    /// Fetch calendars and weather and derive the template data.
    ///
    /// Called synchronously by the host's render cycle. Calendar failures are
    /// surfaced as errors; weather failures degrade to an empty report.
    #[instrument(skip(settings, device))]
    pub fn generate_template_params(
        settings: &PluginSettings,
        device: &DeviceConfig,
    ) -> Result<TemplateParams, PluginError> {
        settings.validate()?;
        let tz = device.tz()?;
        let now = Utc::now().with_timezone(&tz);
        let range = calendar::view_range(now);
        tracing::info!(start = %range.0, end = %range.1, "fetching events");

        let colors = settings.padded_colors();
        let events = calendar::fetch_events(&settings.calendar_urls, &colors, tz, range)?;
        if events.is_empty() {
            tracing::warn!("no events found in any calendar feed");
        }

        let (latitude, longitude) = resolve_coordinates(settings);
        let report = weather::fetch_report(&device.timezone, settings.language, latitude, longitude);

        Ok(assemble(events, report, settings, device, now))
    }
}

/// Assemble the template data from fetched inputs. Pure; the render clock is
/// injected so behavior at a given time is testable.
#[must_use]
pub fn assemble(
    mut events: Vec<AgendaEvent>,
    weather: WeatherReport,
    settings: &PluginSettings,
    device: &DeviceConfig,
    now: DateTime<Tz>,
) -> TemplateParams {
    let labels = settings.language.labels();
    let today = now.date_naive();

    calendar::retain_upcoming(&mut events, now);

    for event in &mut events {
        if !event.all_day && !event.placeholder {
            event.time_label = Some(locale::format_clock_time(&event.start, device.time_format));
        }
    }

    // No day section is ever empty: today gets a "nothing more" row once its
    // events are done, the next two days get "nothing scheduled" rows.
    let day_labels = [
        (0, labels.nothing_more_today),
        (1, labels.no_events_content),
        (2, labels.no_events_content),
    ];
    for (offset, text) in day_labels {
        let date = today + chrono::Duration::days(offset);
        if !calendar::has_event_on(&events, date) {
            events.push(placeholder_event(text, date, now.timezone()));
        }
    }

    calendar::sort_agenda(&mut events);

    let truncated = now
        .with_minute(0)
        .and_then(|dt| dt.with_second(0))
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(now);

    TemplateParams {
        view: "listWeek",
        title: locale::format_long_date(today, settings.language),
        events,
        current_dt: truncated.fixed_offset().to_rfc3339(),
        timezone: device.timezone.clone(),
        time_format: device.time_format,
        font_scale: settings.font_size.scale(),
        locale: settings.language,
        labels,
        weather,
    }
}

/// Synthetic all-day row shown when a day has no events
fn placeholder_event(title: &str, date: NaiveDate, tz: Tz) -> AgendaEvent {
    let start = tz
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    AgendaEvent {
        title: title.to_string(),
        start: start.fixed_offset(),
        end: None,
        all_day: true,
        background_color: color::DEFAULT_EVENT_COLOR.to_string(),
        text_color: color::contrast_color(color::DEFAULT_EVENT_COLOR).to_string(),
        time_label: None,
        placeholder: true,
    }
}

/// Weather coordinates: explicit settings first, then a geocoded location
/// name, then the defaults
fn resolve_coordinates(settings: &PluginSettings) -> (f64, f64) {
    if let (Some(latitude), Some(longitude)) = (settings.latitude, settings.longitude) {
        return (latitude, longitude);
    }
    if let Some(name) = settings.location.as_deref().filter(|n| !n.trim().is_empty()) {
        match weather::geocode(name) {
            Ok(results) => {
                if let Some(found) = results.first() {
                    tracing::info!(location = %name, coords = %found.format_coordinates(), "geocoded weather location");
                    return (found.latitude, found.longitude);
                }
                tracing::warn!(location = %name, "no geocoding results");
            }
            Err(err) => tracing::warn!(location = %name, "geocoding failed: {err:#}"),
        }
    }
    (DEFAULT_LATITUDE, DEFAULT_LONGITUDE)
}
