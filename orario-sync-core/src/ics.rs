use chrono::{DateTime, Utc};

use crate::{IcsOptions, LessonOccurrence, TIMEZONE};

pub const PRODID: &str = "-//Orario Sync//Timetable Export//IT";

/// Longest content line allowed before folding, in octets
const MAX_LINE_OCTETS: usize = 75;

/// CET/CEST rule of the fixed zone. Written out so that no system timezone
/// database is needed.
const VTIMEZONE: [&str; 18] = [
    "BEGIN:VTIMEZONE",
    "TZID:Europe/Rome",
    "X-LIC-LOCATION:Europe/Rome",
    "BEGIN:DAYLIGHT",
    "TZOFFSETFROM:+0100",
    "TZOFFSETTO:+0200",
    "TZNAME:CEST",
    "DTSTART:19700329T020000",
    "RRULE:FREQ=YEARLY;BYDAY=-1SU;BYMONTH=3",
    "END:DAYLIGHT",
    "BEGIN:STANDARD",
    "TZOFFSETFROM:+0200",
    "TZOFFSETTO:+0100",
    "TZNAME:CET",
    "DTSTART:19701025T030000",
    "RRULE:FREQ=YEARLY;BYDAY=-1SU;BYMONTH=10",
    "END:STANDARD",
    "END:VTIMEZONE",
];

/// Calendar generator for lesson occurrences
pub struct IcsGenerator {
    options: IcsOptions,
}

impl IcsGenerator {
    pub const fn new(options: IcsOptions) -> Self {
        Self { options }
    }

    /// Renders the lessons as an iCalendar document
    pub fn generate(&self, lessons: &[LessonOccurrence]) -> String {
        self.generate_at(lessons, Utc::now())
    }

    /// Same as [`generate`](Self::generate) with an explicit generation time,
    /// used for UIDs and DTSTAMP.
    pub fn generate_at(&self, lessons: &[LessonOccurrence], generated_at: DateTime<Utc>) -> String {
        let mut ics_content = String::new();

        push_line(&mut ics_content, "BEGIN:VCALENDAR");
        push_line(&mut ics_content, "VERSION:2.0");
        push_line(&mut ics_content, &format!("PRODID:{PRODID}"));
        push_line(&mut ics_content, "CALSCALE:GREGORIAN");
        push_line(&mut ics_content, "METHOD:PUBLISH");

        if let Some(ref name) = self.options.calendar_name {
            push_line(
                &mut ics_content,
                &format!("X-WR-CALNAME:{}", escape_text(name)),
            );
        }
        push_line(&mut ics_content, &format!("X-WR-TIMEZONE:{TIMEZONE}"));

        for line in VTIMEZONE {
            push_line(&mut ics_content, line);
        }

        for (index, lesson) in lessons.iter().enumerate() {
            self.add_lesson_event(&mut ics_content, lesson, index, generated_at);
        }

        push_line(&mut ics_content, "END:VCALENDAR");

        tracing::debug!("Generated calendar with {} events", lessons.len());
        ics_content
    }

    fn add_lesson_event(
        &self,
        ics_content: &mut String,
        lesson: &LessonOccurrence,
        index: usize,
        generated_at: DateTime<Utc>,
    ) {
        let uid = format!(
            "{}-{}@orario-sync",
            generated_at.format("%Y%m%dT%H%M%S%6f"),
            index
        );
        let dtstamp = generated_at.format("%Y%m%dT%H%M%SZ");
        let dtstart = lesson.start.format("%Y%m%dT%H%M%S");
        let dtend = lesson.end.format("%Y%m%dT%H%M%S");

        push_line(ics_content, "BEGIN:VEVENT");
        push_line(ics_content, &format!("UID:{uid}"));
        push_line(ics_content, &format!("DTSTAMP:{dtstamp}"));
        push_line(ics_content, &format!("SUMMARY:{}", escape_text(&lesson.name)));
        push_line(ics_content, &format!("DTSTART;TZID={TIMEZONE}:{dtstart}"));
        push_line(ics_content, &format!("DTEND;TZID={TIMEZONE}:{dtend}"));
        push_line(
            ics_content,
            &format!("LOCATION:{}", escape_text(&lesson.location)),
        );

        if self.options.include_teacher {
            push_line(
                ics_content,
                &format!("DESCRIPTION:{}", escape_text(&lesson.teacher)),
            );
        }

        // reminder
        if let Some(reminder_minutes) = self.options.reminder_minutes {
            push_line(ics_content, "BEGIN:VALARM");
            push_line(ics_content, "ACTION:DISPLAY");
            push_line(
                ics_content,
                &format!("DESCRIPTION:{}", escape_text(&lesson.name)),
            );
            push_line(ics_content, &format!("TRIGGER:-PT{reminder_minutes}M"));
            push_line(ics_content, "END:VALARM");
        }

        push_line(ics_content, "END:VEVENT");
    }
}

impl Default for IcsGenerator {
    fn default() -> Self {
        Self::new(IcsOptions::default())
    }
}

/// Escapes a TEXT value
fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

/// Appends a CRLF terminated content line, folded at 75 octets without
/// splitting a character.
///
/// A continuation never starts with whitespace: many readers drop every
/// leading blank when unfolding, not only the fold marker.
fn push_line(ics_content: &mut String, line: &str) {
    let mut rest = line;
    let mut limit = MAX_LINE_OCTETS;

    while rest.len() > limit {
        let widest = floor_char_boundary(rest, limit);
        let mut cut = widest;
        while cut > 0 && rest[cut..].starts_with([' ', '\t']) {
            cut = rest[..cut].char_indices().next_back().map_or(0, |(i, _)| i);
        }
        // nothing but blanks up to the limit
        if cut == 0 {
            cut = widest;
        }

        ics_content.push_str(&rest[..cut]);
        ics_content.push_str("\r\n ");
        rest = &rest[cut..];
        // the fold marker takes one octet of each continuation
        limit = MAX_LINE_OCTETS - 1;
    }

    ics_content.push_str(rest);
    ics_content.push_str("\r\n");
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    (0..=index.min(text.len()))
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0)
}

/// Course name usable in a file name: letters only, so embedded course
/// codes, spaces and punctuation are dropped.
pub fn safe_course_name(name: &str) -> String {
    name.chars().filter(|c| c.is_alphabetic()).collect()
}

/// `{code}_{name}_{year}.ics`
pub fn calendar_file_name(course_code: &str, course_name: &str, year: u32) -> String {
    format!("{}_{}_{}.ics", course_code, safe_course_name(course_name), year)
}
