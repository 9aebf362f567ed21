//! Decoder for the structured JSON timetable feed.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;

use crate::{Error, LessonOccurrence, NO_LOCATION, Result, TIMEZONE, Timetable};

/// Offsets written without a colon, which RFC 3339 parsing rejects
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// ISO 8601 basic form, e.g. `20230301T090000` or `20230301T0800Z`
static BASIC_ISO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})T(\d{2})(\d{2})(\d{2})?(Z|[+-]\d{2}:?\d{2})?$")
        .expect("valid basic ISO regex")
});

/// One event of the JSON feed
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEvent {
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(default, rename = "aule")]
    pub rooms: Option<Vec<FeedRoom>>,
    #[serde(default, rename = "docente")]
    pub teacher: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedRoom {
    #[serde(rename = "des_risorsa")]
    pub classroom: String,
    #[serde(rename = "des_ubicazione")]
    pub campus: String,
}

/// Older feeds wrapped the event list in an object
#[derive(Deserialize)]
#[serde(untagged)]
enum FeedPayload {
    Events(Vec<FeedEvent>),
    Wrapped { events: Vec<FeedEvent> },
}

/// Parses the raw feed body into its events.
pub fn parse_feed(body: &str) -> Result<Vec<FeedEvent>> {
    let payload: FeedPayload = serde_json::from_str(body)?;
    Ok(match payload {
        FeedPayload::Events(events) | FeedPayload::Wrapped { events } => events,
    })
}

/// Converts feed events into lesson occurrences, one per event.
pub fn decode_events(events: &[FeedEvent]) -> Result<Timetable> {
    events.iter().map(FeedEvent::to_occurrence).collect()
}

impl FeedEvent {
    pub fn location(&self) -> String {
        match self.rooms.as_deref() {
            Some([room, ..]) => format!("{}, {}", room.classroom, room.campus),
            _ => NO_LOCATION.to_string(),
        }
    }

    pub fn to_occurrence(&self) -> Result<LessonOccurrence> {
        let start = parse_timestamp(&self.start)?;
        let end = parse_timestamp(&self.end)?;
        if start >= end {
            return Err(Error::upstream(format!(
                "event '{}' ends at {} before it starts at {}",
                self.title, self.end, self.start
            )));
        }

        Ok(LessonOccurrence {
            name: self.title.clone(),
            start,
            end,
            location: self.location(),
            teacher: self.teacher.clone().unwrap_or_default(),
        })
    }
}

/// Parses a feed timestamp.
///
/// Timestamps carrying an offset are converted to the timetable zone, naive
/// ones are taken as local time of that zone.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Tz>> {
    let text = text.trim();
    let extended;
    let text = match BASIC_ISO.captures(text) {
        Some(parts) => {
            extended = format!(
                "{}-{}-{}T{}:{}:{}{}",
                &parts[1],
                &parts[2],
                &parts[3],
                &parts[4],
                &parts[5],
                parts.get(6).map_or("00", |m| m.as_str()),
                parts.get(7).map_or("", |m| m.as_str())
            );
            extended.as_str()
        }
        None => text,
    };

    let with_offset = DateTime::parse_from_rfc3339(text).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(text, format).ok())
    });
    if let Some(datetime) = with_offset {
        return Ok(datetime.with_timezone(&TIMEZONE));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .ok_or_else(|| Error::upstream(format!("invalid timestamp '{text}'")))?;

    TIMEZONE
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| Error::upstream(format!("timestamp '{text}' does not exist in {TIMEZONE}")))
}
