//! Parsing of the Italian date and time text found on the HTML timetables.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime, Weekday};
use regex::Regex;

use crate::{Error, Result};

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("lunedì", Weekday::Mon),
    ("martedì", Weekday::Tue),
    ("mercoledì", Weekday::Wed),
    ("giovedì", Weekday::Thu),
    ("venerdì", Weekday::Fri),
    ("sabato", Weekday::Sat),
    ("domenica", Weekday::Sun),
];

const MONTHS: [&str; 12] = [
    "gennaio",
    "febbraio",
    "marzo",
    "aprile",
    "maggio",
    "giugno",
    "luglio",
    "agosto",
    "settembre",
    "ottobre",
    "novembre",
    "dicembre",
];

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}:\d{2})\s*-\s*(\d{1,2}:\d{2})$").expect("valid time range regex")
});

/// Maps an Italian weekday name, in any letter case, to its weekday.
///
/// The unaccented spelling (`lunedi`) is accepted as well.
pub fn parse_weekday(name: &str) -> Result<Weekday> {
    let name = name.trim().to_lowercase();
    WEEKDAYS
        .iter()
        .find(|(it, _)| *it == name || it.replace('ì', "i") == name)
        .map(|&(_, weekday)| weekday)
        .ok_or_else(|| Error::upstream(format!("unknown weekday '{name}'")))
}

/// Parses a date written as `d monthname yyyy`, e.g. `1 marzo 2023`.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let invalid = || Error::upstream(format!("invalid Italian date '{}'", text.trim()));

    let mut fields = text.split_whitespace();
    let (Some(day), Some(month), Some(year)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(invalid());
    };

    let day: u32 = day.parse().map_err(|_| invalid())?;
    let month = month.to_lowercase();
    let month = MONTHS
        .iter()
        .position(|m| *m == month)
        .ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month as u32 + 1, day).ok_or_else(invalid)
}

/// Parses an `HH:MM - HH:MM` range into its two times.
pub fn parse_time_range(text: &str) -> Result<(NaiveTime, NaiveTime)> {
    let text = text.trim();
    let captures = TIME_RANGE
        .captures(text)
        .ok_or_else(|| Error::upstream(format!("invalid time range '{text}'")))?;

    let start = NaiveTime::parse_from_str(&captures[1], "%H:%M")?;
    let end = NaiveTime::parse_from_str(&captures[2], "%H:%M")?;
    Ok((start, end))
}
