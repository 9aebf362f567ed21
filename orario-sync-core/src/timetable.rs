//! The two upstream timetable shapes and their normalization.

use crate::{
    Result, Timetable,
    feed::{FeedEvent, decode_events, parse_feed},
    scrape::{ScrapedClass, scrape_timetable},
    selection::class_names,
};

/// Timetable published as a JSON event feed
#[derive(Debug, Clone)]
pub struct StructuredTimetable {
    pub events: Vec<FeedEvent>,
}

/// Timetable scraped from the HTML weekly schedule
#[derive(Debug, Clone)]
pub struct ScrapedTimetable {
    pub classes: Vec<ScrapedClass>,
}

/// A timetable as fetched from upstream, before normalization
#[derive(Debug, Clone)]
pub enum RawTimetable {
    Structured(StructuredTimetable),
    Scraped(ScrapedTimetable),
}

impl RawTimetable {
    pub fn from_feed(body: &str) -> Result<Self> {
        Ok(Self::Structured(StructuredTimetable {
            events: parse_feed(body)?,
        }))
    }

    pub fn from_html(html: &str) -> Result<Self> {
        Ok(Self::Scraped(ScrapedTimetable {
            classes: scrape_timetable(html)?,
        }))
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Structured(_) => "json",
            Self::Scraped(_) => "html",
        }
    }

    /// Sorted, duplicate-free class names. Selection masks index into this list.
    pub fn class_names(&self) -> Vec<String> {
        match self {
            Self::Structured(feed) => class_names(feed.events.iter().map(|e| e.title.as_str())),
            Self::Scraped(page) => class_names(page.classes.iter().map(|c| c.name.as_str())),
        }
    }

    /// Normalizes into dated lesson occurrences.
    pub fn to_timetable(&self) -> Result<Timetable> {
        match self {
            Self::Structured(feed) => decode_events(&feed.events),
            Self::Scraped(page) => {
                let mut lessons = Vec::new();
                for class in &page.classes {
                    lessons.extend(class.occurrences()?);
                }
                Ok(lessons)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::tests::PAGE;

    #[test]
    fn test_structured_class_names() {
        let body = r#"[
            {"title": "Algebra", "start": "2023-03-01T09:00:00", "end": "2023-03-01T11:00:00", "aule": []},
            {"title": "Fisica", "start": "2023-03-02T09:00:00", "end": "2023-03-02T11:00:00", "aule": []},
            {"title": "Algebra", "start": "2023-03-03T09:00:00", "end": "2023-03-03T11:00:00", "aule": []},
            {"title": "Algebra", "start": "2023-03-06T09:00:00", "end": "2023-03-06T11:00:00", "aule": []}
        ]"#;

        let raw = RawTimetable::from_feed(body).unwrap();
        assert_eq!(raw.kind(), "json");
        assert_eq!(raw.class_names(), vec!["Algebra", "Fisica"]);
        assert_eq!(raw.to_timetable().unwrap().len(), 4);
    }

    #[test]
    fn test_scraped_class_names() {
        let raw = RawTimetable::from_html(PAGE).unwrap();
        assert_eq!(raw.kind(), "html");
        assert_eq!(
            raw.class_names(),
            vec!["Letteratura italiana", "Storia medievale"]
        );

        let timetable = raw.to_timetable().unwrap();
        assert!(timetable.iter().any(|l| l.name == "Storia medievale"));
        assert!(timetable.iter().any(|l| l.name == "Letteratura italiana"));
    }
}
