//! iCalendar feed handling: fetch, parse, recurrence expansion and the
//! date-range filtering that drives the agenda list
//!
//! Feeds are public ICS URLs. Events are expanded into concrete occurrences
//! inside the view range (today through +2 weeks), converted to the display
//! timezone, and filtered so the agenda only shows what is still ahead:
//! events that ended before today disappear, and today's timed events drop
//! off once their end time has passed.

use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, CalendarDateTime, Component, DatePerhapsTime, Event};
use tracing::instrument;

use crate::color;
use crate::error::PluginError;
use crate::models::AgendaEvent;

const FETCH_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Cap on expanded occurrences per recurring event within the view range
const MAX_OCCURRENCES: u16 = 100;

/// View range for event expansion: start of the current local day through
/// two weeks out. The agenda itself shows today plus the next two days; the
/// wider range keeps multi-day and recurring events anchored correctly.
pub fn view_range(now: DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
    let start = resolve_local(now.timezone(), now.date_naive().and_time(NaiveTime::MIN));
    (start, start + Duration::weeks(2))
}

/// Rewrite webcal:// URLs to https:// (common in published calendar links)
#[must_use]
pub fn normalize_feed_url(url: &str) -> String {
    let trimmed = url.trim();
    match trimmed.strip_prefix("webcal://") {
        Some(rest) => format!("https://{rest}"),
        None => trimmed.to_string(),
    }
}

/// Fetch the raw ICS text of one feed
pub fn fetch_feed(url: &str) -> Result<String, PluginError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let response = client
        .get(normalize_feed_url(url))
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(|e| PluginError::calendar(format!("failed to fetch '{url}': {e}")))?;
    response
        .text()
        .map_err(|e| PluginError::calendar(format!("failed to read '{url}': {e}")))
}

/// Fetch and parse all configured feeds into agenda events within the range.
///
/// A feed that cannot be fetched or parsed fails the whole call; the host
/// shows its error state rather than a partially silent agenda.
#[instrument(skip(urls, colors), fields(feeds = urls.len()))]
pub fn fetch_events(
    urls: &[String],
    colors: &[String],
    tz: Tz,
    range: (DateTime<Tz>, DateTime<Tz>),
) -> Result<Vec<AgendaEvent>, PluginError> {
    let mut events = Vec::new();
    for (url, feed_color) in urls.iter().zip(colors) {
        let ics = fetch_feed(url)?;
        let parsed = parse_feed(&ics, feed_color, tz, range)
            .map_err(|e| PluginError::calendar(format!("failed to parse '{url}': {e:#}")))?;
        tracing::debug!(feed = %url, count = parsed.len(), "parsed calendar feed");
        events.extend(parsed);
    }
    Ok(events)
}

/// Parse one ICS document into agenda events overlapping the view range
pub fn parse_feed(
    ics: &str,
    feed_color: &str,
    tz: Tz,
    range: (DateTime<Tz>, DateTime<Tz>),
) -> Result<Vec<AgendaEvent>> {
    let calendar: Calendar = ics
        .parse()
        .map_err(|e: String| anyhow::anyhow!("invalid ICS document: {e}"))?;

    let text_color = color::contrast_color(feed_color);
    let mut events = Vec::new();

    for component in &calendar.components {
        let Some(event) = component.as_event() else {
            continue;
        };
        let Some(start_value) = event.get_start() else {
            tracing::warn!("skipping event without DTSTART");
            continue;
        };

        let (start, all_day) = to_zoned(&start_value, tz);
        let end = event_end(event, start, tz);
        let title = event.get_summary().unwrap_or("(untitled)").to_string();
        let duration = end.map(|e| e - start);

        let occurrences = match event.property_value("RRULE") {
            Some(rule) => match expand_rrule(event, start, rule, range) {
                Ok(dates) => dates,
                Err(err) => {
                    // Keep the base occurrence rather than hiding the event
                    tracing::warn!(title = %title, "could not expand RRULE: {err:#}");
                    vec![start]
                }
            },
            None => vec![start],
        };

        for occurrence_start in occurrences {
            let occurrence_end = duration.map(|d| occurrence_start + d);
            let effective_end = occurrence_end.unwrap_or(occurrence_start);
            // Same overlap test for single and expanded occurrences; the
            // rrule expansion is range-bounded already but all-day DTENDs
            // land one day past the occurrence.
            if occurrence_start >= range.1 || effective_end < range.0 {
                continue;
            }
            events.push(AgendaEvent {
                title: title.clone(),
                start: occurrence_start.fixed_offset(),
                end: occurrence_end.map(|e| e.fixed_offset()),
                all_day,
                background_color: feed_color.to_string(),
                text_color: text_color.to_string(),
                time_label: None,
                placeholder: false,
            });
        }
    }

    Ok(events)
}

/// End of an event: DTEND when present, else DTSTART + DURATION
fn event_end(event: &Event, start: DateTime<Tz>, tz: Tz) -> Option<DateTime<Tz>> {
    if let Some(end_value) = event.get_end() {
        return Some(to_zoned(&end_value, tz).0);
    }
    event
        .property_value("DURATION")
        .and_then(parse_ical_duration)
        .map(|d| start + d)
}

/// Expand a recurring event's occurrences inside the view range
fn expand_rrule(
    event: &Event,
    start: DateTime<Tz>,
    rule: &str,
    range: (DateTime<Tz>, DateTime<Tz>),
) -> Result<Vec<DateTime<Tz>>> {
    let tz = start.timezone();
    let mut definition = format!(
        "DTSTART:{}\nRRULE:{}",
        start.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ"),
        rule
    );
    let exdates = exclusion_dates(event, tz);
    if !exdates.is_empty() {
        definition.push_str("\nEXDATE:");
        definition.push_str(&exdates.join(","));
    }

    let set: rrule::RRuleSet = definition
        .parse()
        .with_context(|| format!("unsupported recurrence rule '{rule}'"))?;
    let result = set
        .after(range.0.with_timezone(&rrule::Tz::UTC))
        .before(range.1.with_timezone(&rrule::Tz::UTC))
        .all(MAX_OCCURRENCES);

    if result.limited {
        tracing::warn!("recurrence expansion hit the {MAX_OCCURRENCES} occurrence cap");
    }
    Ok(result
        .dates
        .into_iter()
        .map(|d| d.with_timezone(&tz))
        .collect())
}

/// Collect an event's EXDATE values, normalized to UTC so they line up with
/// the UTC DTSTART the rule set is built around.
///
/// EXDATE is a multi-property: a feed may carry several EXDATE lines, each
/// with a comma-separated value list and an optional TZID parameter.
/// Unparseable values are skipped with a warning rather than failing the
/// whole expansion.
fn exclusion_dates(event: &Event, tz: Tz) -> Vec<String> {
    let Some(properties) = event.multi_properties().get("EXDATE") else {
        return Vec::new();
    };

    let mut exdates = Vec::new();
    for property in properties {
        let exdate_tz = property
            .params()
            .get("TZID")
            .and_then(|p| p.value().parse::<Tz>().ok())
            .unwrap_or(tz);
        for value in property.value().split(',') {
            match parse_exdate_value(value.trim(), exdate_tz) {
                Some(utc) => exdates.push(utc.format("%Y%m%dT%H%M%SZ").to_string()),
                None => tracing::warn!(value, "skipping unparseable EXDATE value"),
            }
        }
    }
    exdates
}

/// Parse one EXDATE value: UTC ("...Z"), local datetime (TZID or floating)
/// or date-only, yielding the excluded instant in UTC
fn parse_exdate_value(value: &str, tz: Tz) -> Option<DateTime<Utc>> {
    if let Some(stripped) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(stripped, "%Y%m%dT%H%M%S").ok()?;
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S") {
        return Some(resolve_local(tz, naive).with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y%m%d").ok()?;
    Some(resolve_local(tz, date.and_time(NaiveTime::MIN)).with_timezone(&Utc))
}

/// Convert an ICS date or datetime to the display timezone.
/// Returns the zoned start and whether the value was date-only (all-day).
fn to_zoned(value: &DatePerhapsTime, tz: Tz) -> (DateTime<Tz>, bool) {
    match value {
        DatePerhapsTime::Date(date) => {
            (resolve_local(tz, date.and_time(NaiveTime::MIN)), true)
        }
        DatePerhapsTime::DateTime(dt) => {
            let zoned = match dt {
                CalendarDateTime::Utc(utc) => utc.with_timezone(&tz),
                CalendarDateTime::Floating(naive) => resolve_local(tz, *naive),
                CalendarDateTime::WithTimezone { date_time, tzid } => match tzid.parse::<Tz>() {
                    Ok(event_tz) => resolve_local(event_tz, *date_time).with_timezone(&tz),
                    Err(_) => {
                        tracing::warn!(tzid = %tzid, "unknown TZID, assuming display timezone");
                        resolve_local(tz, *date_time)
                    }
                },
            };
            (zoned, false)
        }
    }
}

/// Resolve a naive local time, tolerating DST gaps and overlaps
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz.from_utc_datetime(&naive),
    }
}

/// Parse an ISO-8601 duration as used by ICS DURATION, e.g. "PT45M", "P1DT2H"
fn parse_ical_duration(value: &str) -> Option<Duration> {
    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let rest = rest.strip_prefix('P')?;

    let mut total = Duration::zero();
    let mut in_time = false;
    let mut digits = String::new();
    for c in rest.chars() {
        match c {
            'T' => in_time = true,
            d if d.is_ascii_digit() => digits.push(d),
            unit => {
                let n: i64 = digits.parse().ok()?;
                digits.clear();
                total += match (unit, in_time) {
                    ('W', false) => Duration::weeks(n),
                    ('D', false) => Duration::days(n),
                    ('H', true) => Duration::hours(n),
                    ('M', true) => Duration::minutes(n),
                    ('S', true) => Duration::seconds(n),
                    _ => return None,
                };
            }
        }
    }
    if !digits.is_empty() {
        return None;
    }
    Some(if negative { -total } else { total })
}

/// Hide events that are over: anything that ended before today, and today's
/// timed events whose end time has already passed. All-day DTEND is exclusive
/// per RFC 5545, so a finished all-day event does not linger an extra day.
pub fn retain_upcoming(events: &mut Vec<AgendaEvent>, now: DateTime<Tz>) {
    let now = now.fixed_offset();
    let today = now.date_naive();
    events.retain(|event| {
        let end = event.effective_end();
        let end_date = if event.all_day && event.end.is_some() {
            end.date_naive().pred_opt().unwrap_or_else(|| end.date_naive())
        } else {
            end.date_naive()
        };
        if end_date < today {
            return false;
        }
        if !event.all_day && end.date_naive() == today && end <= now {
            return false;
        }
        true
    });
}

/// Agenda ordering: by day, all-day entries first, then by start time
pub fn sort_agenda(events: &mut [AgendaEvent]) {
    events.sort_by_key(|e| (e.start_date(), !e.all_day, e.start));
}

/// Whether any event starts on the given local date
#[must_use]
pub fn has_event_on(events: &[AgendaEvent], date: chrono::NaiveDate) -> bool {
    events.iter().any(|e| e.start_date() == date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    const BERLIN: Tz = chrono_tz::Europe::Berlin;

    fn wrap_ics(body: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//test//EN\r\n{body}END:VCALENDAR\r\n"
        )
    }

    fn march_now() -> DateTime<Tz> {
        // Monday 2026-03-02 10:00 Berlin (UTC+1)
        BERLIN.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap()
    }

    fn march_range() -> (DateTime<Tz>, DateTime<Tz>) {
        view_range(march_now())
    }

    #[rstest]
    #[case("webcal://example.org/cal.ics", "https://example.org/cal.ics")]
    #[case("https://example.org/cal.ics", "https://example.org/cal.ics")]
    #[case("  http://example.org/cal.ics ", "http://example.org/cal.ics")]
    fn test_normalize_feed_url(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_feed_url(input), expected);
    }

    #[test]
    fn test_view_range_starts_at_midnight() {
        let (start, end) = march_range();
        assert_eq!(start, BERLIN.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
        assert_eq!(end - start, Duration::weeks(2));
    }

    #[test]
    fn test_parse_timed_event() {
        let ics = wrap_ics(
            "BEGIN:VEVENT\r\nUID:1\r\nDTSTART:20260302T130000Z\r\nDTEND:20260302T140000Z\r\nSUMMARY:Dentist\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics, "#007BFF", BERLIN, march_range()).unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.title, "Dentist");
        assert!(!event.all_day);
        // 13:00 UTC is 14:00 in Berlin
        assert_eq!(event.start.time(), NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(event.text_color, "#ffffff");
    }

    #[test]
    fn test_parse_all_day_event() {
        let ics = wrap_ics(
            "BEGIN:VEVENT\r\nUID:2\r\nDTSTART;VALUE=DATE:20260303\r\nDTEND;VALUE=DATE:20260304\r\nSUMMARY:Holiday\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics, "#ffffff", BERLIN, march_range()).unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].all_day);
        assert_eq!(events[0].start_date(), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
        assert_eq!(events[0].text_color, "#000000");
    }

    #[test]
    fn test_parse_duration_end() {
        let ics = wrap_ics(
            "BEGIN:VEVENT\r\nUID:3\r\nDTSTART:20260302T130000Z\r\nDURATION:PT45M\r\nSUMMARY:Call\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics, "#007BFF", BERLIN, march_range()).unwrap();
        let event = &events[0];
        assert_eq!(event.end.unwrap() - event.start, Duration::minutes(45));
    }

    #[test]
    fn test_parse_event_outside_range_dropped() {
        let ics = wrap_ics(
            "BEGIN:VEVENT\r\nUID:4\r\nDTSTART:20251201T130000Z\r\nDTEND:20251201T140000Z\r\nSUMMARY:Long gone\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics, "#007BFF", BERLIN, march_range()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_recurring_event_expansion() {
        let ics = wrap_ics(
            "BEGIN:VEVENT\r\nUID:5\r\nDTSTART:20260302T090000Z\r\nDTEND:20260302T093000Z\r\nRRULE:FREQ=DAILY;COUNT=5\r\nSUMMARY:Standup\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics, "#007BFF", BERLIN, march_range()).unwrap();
        assert_eq!(events.len(), 5);
        let dates: Vec<NaiveDate> = events.iter().map(AgendaEvent::start_date).collect();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(dates[4], NaiveDate::from_ymd_opt(2026, 3, 6).unwrap());
        // every occurrence keeps the 30 minute duration
        assert!(events
            .iter()
            .all(|e| e.end.unwrap() - e.start == Duration::minutes(30)));
    }

    #[test]
    fn test_recurring_event_limited_to_range() {
        let ics = wrap_ics(
            "BEGIN:VEVENT\r\nUID:6\r\nDTSTART:20260101T090000Z\r\nRRULE:FREQ=WEEKLY\r\nSUMMARY:Weekly\r\nEND:VEVENT\r\n",
        );
        let (start, end) = march_range();
        let events = parse_feed(&ics, "#007BFF", BERLIN, (start, end)).unwrap();
        assert!(!events.is_empty());
        assert!(events.iter().all(|e| {
            let s = e.start;
            s >= start.fixed_offset() && s < end.fixed_offset()
        }));
    }

    #[test]
    fn test_unparseable_rrule_keeps_base_occurrence() {
        let ics = wrap_ics(
            "BEGIN:VEVENT\r\nUID:7\r\nDTSTART:20260302T090000Z\r\nRRULE:FREQ=BOGUS\r\nSUMMARY:Odd\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics, "#007BFF", BERLIN, march_range()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Odd");
    }

    #[test]
    fn test_parse_tzid_start_converted_to_display_timezone() {
        let ics = wrap_ics(
            "BEGIN:VEVENT\r\nUID:8\r\nDTSTART;TZID=America/New_York:20260302T090000\r\nDTEND;TZID=America/New_York:20260302T100000\r\nSUMMARY:Sync\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics, "#007BFF", BERLIN, march_range()).unwrap();
        assert_eq!(events.len(), 1);
        // 9:00 New York (UTC-5 in early March) is 15:00 in Berlin
        assert_eq!(events[0].start.time(), NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert!(!events[0].all_day);
    }

    #[test]
    fn test_parse_floating_start_uses_display_timezone() {
        let ics = wrap_ics(
            "BEGIN:VEVENT\r\nUID:9\r\nDTSTART:20260302T090000\r\nDTEND:20260302T100000\r\nSUMMARY:Chores\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics, "#007BFF", BERLIN, march_range()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_recurring_event_honors_exdate() {
        let ics = wrap_ics(
            "BEGIN:VEVENT\r\nUID:10\r\nDTSTART:20260302T080000Z\r\nDTEND:20260302T083000Z\r\nRRULE:FREQ=DAILY;COUNT=5\r\nEXDATE:20260303T080000Z\r\nSUMMARY:Standup\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics, "#007BFF", BERLIN, march_range()).unwrap();
        assert_eq!(events.len(), 4);
        let dates: Vec<NaiveDate> = events.iter().map(AgendaEvent::start_date).collect();
        assert!(!dates.contains(&NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()));
        assert!(dates.contains(&NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()));
    }

    #[test]
    fn test_recurring_event_honors_tzid_exdate() {
        // DTSTART 08:00 UTC is 09:00 Berlin; the exclusion names the Berlin time
        let ics = wrap_ics(
            "BEGIN:VEVENT\r\nUID:11\r\nDTSTART:20260302T080000Z\r\nRRULE:FREQ=DAILY;COUNT=4\r\nEXDATE;TZID=Europe/Berlin:20260303T090000\r\nSUMMARY:Walk\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics, "#007BFF", BERLIN, march_range()).unwrap();
        assert_eq!(events.len(), 3);
        let dates: Vec<NaiveDate> = events.iter().map(AgendaEvent::start_date).collect();
        assert!(!dates.contains(&NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()));
    }

    #[test]
    fn test_recurring_event_honors_exdate_value_list() {
        let ics = wrap_ics(
            "BEGIN:VEVENT\r\nUID:12\r\nDTSTART:20260302T080000Z\r\nRRULE:FREQ=DAILY;COUNT=5\r\nEXDATE:20260303T080000Z,20260305T080000Z\r\nSUMMARY:Run\r\nEND:VEVENT\r\n",
        );
        let events = parse_feed(&ics, "#007BFF", BERLIN, march_range()).unwrap();
        let dates: Vec<NaiveDate> = events.iter().map(AgendaEvent::start_date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
            ]
        );
    }

    #[rstest]
    #[case("20260303T080000Z", 7, 0)]
    #[case("20260303T090000", 8, 0)]
    fn test_parse_exdate_value_to_utc(
        #[case] input: &str,
        #[case] utc_hour: u32,
        #[case] utc_minute: u32,
    ) {
        // floating values resolve in the given timezone (Berlin, UTC+1)
        let parsed = parse_exdate_value(input, BERLIN).unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2026, 3, 3, utc_hour, utc_minute, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_exdate_value_rejects_garbage() {
        assert!(parse_exdate_value("not-a-date", BERLIN).is_none());
        assert!(parse_exdate_value("2026-03-03", BERLIN).is_none());
    }

    #[rstest]
    #[case("PT45M", Duration::minutes(45))]
    #[case("PT1H30M", Duration::minutes(90))]
    #[case("P1D", Duration::days(1))]
    #[case("P2W", Duration::weeks(2))]
    #[case("P1DT2H", Duration::hours(26))]
    #[case("-PT15M", Duration::minutes(-15))]
    fn test_parse_ical_duration(#[case] input: &str, #[case] expected: Duration) {
        assert_eq!(parse_ical_duration(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_ical_duration_rejects_garbage() {
        assert!(parse_ical_duration("45M").is_none());
        assert!(parse_ical_duration("P1X").is_none());
        assert!(parse_ical_duration("PT5").is_none());
    }

    fn timed(start: DateTime<Tz>, minutes: i64) -> AgendaEvent {
        AgendaEvent {
            title: "t".to_string(),
            start: start.fixed_offset(),
            end: Some((start + Duration::minutes(minutes)).fixed_offset()),
            all_day: false,
            background_color: "#007BFF".to_string(),
            text_color: "#ffffff".to_string(),
            time_label: None,
            placeholder: false,
        }
    }

    fn all_day(start_date: NaiveDate, days: i64) -> AgendaEvent {
        let start = resolve_local(BERLIN, start_date.and_time(NaiveTime::MIN));
        AgendaEvent {
            title: "a".to_string(),
            start: start.fixed_offset(),
            end: Some((start + Duration::days(days)).fixed_offset()),
            all_day: true,
            background_color: "#007BFF".to_string(),
            text_color: "#ffffff".to_string(),
            time_label: None,
            placeholder: false,
        }
    }

    #[test]
    fn test_retain_upcoming_drops_past_days() {
        let now = march_now();
        let mut events = vec![
            timed(BERLIN.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap(), 60),
            timed(BERLIN.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap(), 60),
        ];
        retain_upcoming(&mut events, now);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start_date(), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
    }

    #[test]
    fn test_retain_upcoming_drops_todays_ended_events() {
        let now = march_now(); // 10:00
        let mut events = vec![
            timed(BERLIN.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap(), 60), // ended 9:00
            timed(BERLIN.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap(), 60), // ends 10:30
            timed(BERLIN.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).unwrap(), 60),
        ];
        retain_upcoming(&mut events, now);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.effective_end() > now.fixed_offset()));
    }

    #[test]
    fn test_retain_upcoming_all_day_end_is_exclusive() {
        let now = march_now(); // 2026-03-02
        let mut events = vec![
            // yesterday only: DTSTART 03-01, exclusive DTEND 03-02
            all_day(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), 1),
            // spans 03-01..03-03 (exclusive DTEND 03-04): still running
            all_day(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), 3),
            // today's all-day event stays all day regardless of the clock
            all_day(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), 1),
        ];
        retain_upcoming(&mut events, now);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.all_day));
    }

    #[test]
    fn test_sort_agenda_all_day_first_per_day() {
        let d2 = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let mut events = vec![
            timed(BERLIN.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap(), 60),
            timed(BERLIN.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).unwrap(), 60),
            all_day(d2, 1),
            timed(BERLIN.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(), 60),
        ];
        sort_agenda(&mut events);
        assert!(events[0].all_day);
        assert_eq!(events[0].start_date(), d2);
        assert_eq!(events[1].start.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(events[2].start.time(), NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert_eq!(events[3].start_date(), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
    }

    #[test]
    fn test_has_event_on() {
        let events = vec![timed(BERLIN.with_ymd_and_hms(2026, 3, 2, 15, 0, 0).unwrap(), 60)];
        assert!(has_event_on(&events, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()));
        assert!(!has_event_on(&events, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()));
    }
}
