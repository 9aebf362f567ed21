use chrono::{DateTime, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Fixed zone every lesson is expressed in
pub const TIMEZONE: Tz = chrono_tz::Europe::Rome;

/// Location used when the upstream does not say where a lesson is held
pub const NO_LOCATION: &str = "No location data available";

/// One concrete, dated class meeting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonOccurrence {
    /// Class title
    pub name: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// Room and campus, or [`NO_LOCATION`]
    pub location: String,
    /// Teacher name, possibly empty
    pub teacher: String,
}

/// Normalized timetable. Not sorted by start time.
pub type Timetable = Vec<LessonOccurrence>;

/// A weekly recurring slot of a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyPattern {
    weekday: Weekday,
    start_time: NaiveTime,
    end_time: NaiveTime,
    teacher: String,
}

impl WeeklyPattern {
    pub fn new(
        weekday: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
        teacher: impl Into<String>,
    ) -> Result<Self> {
        if start_time >= end_time {
            return Err(Error::upstream(format!(
                "weekly slot on {weekday} ends at {end_time} before it starts at {start_time}"
            )));
        }

        Ok(Self {
            weekday,
            start_time,
            end_time,
            teacher: teacher.into(),
        })
    }

    pub const fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub const fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub const fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    pub fn teacher(&self) -> &str {
        &self.teacher
    }
}

/// A contiguous window (usually a semester) during which a class meets
/// according to its weekly patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPeriod {
    pub class_name: String,
    pub location: String,
    /// First day of the period (inclusive)
    pub start: NaiveDate,
    /// Last day of the period (exclusive)
    pub end: NaiveDate,
    pub patterns: Vec<WeeklyPattern>,
}

/// Department (school) of the university
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
}

/// Degree course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Numeric course code
    pub code: String,
    /// Course title followed by its degree type, e.g. `Lettere [L]`
    pub name: String,
    /// Course website, base of every timetable URL
    #[serde(rename = "link")]
    pub url: String,
}

/// Curriculum (track) of a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    /// Code used in timetable requests, e.g. `947-000`
    pub code: String,
    pub name: String,
}

/// Identity of one upstream timetable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimetableRequest {
    pub course_url: String,
    /// Year of the course (1, 2, 3, ...)
    pub year: u32,
    /// Curriculum code
    pub curriculum: String,
}

impl TimetableRequest {
    pub fn new(course_url: impl Into<String>, year: u32, curriculum: impl Into<String>) -> Self {
        Self {
            course_url: course_url.into().trim_end_matches('/').to_string(),
            year,
            curriculum: curriculum.into(),
        }
    }
}

/// Provider configuration: where the catalog pages live and how to reach them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Page listing all departments
    pub departments_url: String,
    /// Course listing, the department id is appended
    pub courses_url: String,
    /// Request timeout in seconds
    pub timeout: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            departments_url: "https://www.unibo.it/it/didattica/corsi-di-studio".to_string(),
            courses_url: "https://www.unibo.it/it/didattica/corsi-di-studio/elenco?&schede="
                .to_string(),
            timeout: Some(30),
            user_agent: None,
        }
    }
}

/// ICS generation options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcsOptions {
    /// Calendar name (X-WR-CALNAME)
    pub calendar_name: Option<String>,
    /// Put the teacher name in the event description
    pub include_teacher: bool,
    /// Display reminder before each lesson
    pub reminder_minutes: Option<u32>,
}

impl Default for IcsOptions {
    fn default() -> Self {
        Self {
            calendar_name: Some("Orario lezioni".to_string()),
            include_teacher: true,
            reminder_minutes: None,
        }
    }
}
