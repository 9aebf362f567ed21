//! Upstream URL layout.
//!
//! Every course website exposes its timetable under a path whose spelling
//! depends on the site language: Italian sites use `orario-lezioni` and the
//! `anno` query key, English ones (recognizable by `cycle` in their URL) use
//! `timetable` and `year`.

use crate::TimetableRequest;

/// Language of a course website
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseLanguage {
    Italian,
    English,
}

impl CourseLanguage {
    pub fn of(course_url: &str) -> Self {
        if course_url.contains("cycle") {
            Self::English
        } else {
            Self::Italian
        }
    }

    const fn timetable_path(self) -> &'static str {
        match self {
            Self::Italian => "orario-lezioni",
            Self::English => "timetable",
        }
    }

    const fn year_key(self) -> &'static str {
        match self {
            Self::Italian => "anno",
            Self::English => "year",
        }
    }
}

/// Structured JSON feed of a timetable
pub fn feed_url(request: &TimetableRequest) -> String {
    let lang = CourseLanguage::of(&request.course_url);
    format!(
        "{}/{}/@@orario_reale_json?{}={}&curricula={}",
        request.course_url,
        lang.timetable_path(),
        lang.year_key(),
        request.year,
        request.curriculum
    )
}

/// HTML page used when the course has no JSON feed.
///
/// Both languages use the `anno` key on this page.
pub fn html_timetable_url(request: &TimetableRequest) -> String {
    let lang = CourseLanguage::of(&request.course_url);
    format!(
        "{}/{}?calendar_view=&date=&anno={}&curricula={}",
        request.course_url,
        lang.timetable_path(),
        request.year,
        request.curriculum
    )
}

/// Curricula available for a course in a given year
pub fn curricula_url(course_url: &str, year: u32) -> String {
    let course_url = course_url.trim_end_matches('/');
    let lang = CourseLanguage::of(course_url);
    format!(
        "{}/{}/@@available_curricula?{}={}",
        course_url,
        lang.timetable_path(),
        lang.year_key(),
        year
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_detection() {
        assert_eq!(
            CourseLanguage::of("https://corsi.unibo.it/laurea/lettere"),
            CourseLanguage::Italian
        );
        assert_eq!(
            CourseLanguage::of("https://corsi.unibo.it/1cycle/ComputerScience"),
            CourseLanguage::English
        );
    }

    #[test]
    fn test_italian_urls() {
        let request = TimetableRequest::new("https://corsi.unibo.it/laurea/lettere", 2, "947-000");

        assert_eq!(
            feed_url(&request),
            "https://corsi.unibo.it/laurea/lettere/orario-lezioni/@@orario_reale_json?anno=2&curricula=947-000"
        );
        assert_eq!(
            html_timetable_url(&request),
            "https://corsi.unibo.it/laurea/lettere/orario-lezioni?calendar_view=&date=&anno=2&curricula=947-000"
        );
        assert_eq!(
            curricula_url(&request.course_url, 2),
            "https://corsi.unibo.it/laurea/lettere/orario-lezioni/@@available_curricula?anno=2"
        );
    }

    #[test]
    fn test_english_urls() {
        let request = TimetableRequest::new("https://corsi.unibo.it/2cycle/ai", 1, "000-000");

        assert_eq!(
            feed_url(&request),
            "https://corsi.unibo.it/2cycle/ai/timetable/@@orario_reale_json?year=1&curricula=000-000"
        );
        assert_eq!(
            html_timetable_url(&request),
            "https://corsi.unibo.it/2cycle/ai/timetable?calendar_view=&date=&anno=1&curricula=000-000"
        );
        assert_eq!(
            curricula_url("https://corsi.unibo.it/2cycle/ai/", 1),
            "https://corsi.unibo.it/2cycle/ai/timetable/@@available_curricula?year=1"
        );
    }
}
