pub mod base;
pub mod unibo;

use async_trait::async_trait;

use crate::{Course, Curriculum, Department, RawTimetable, Result, TimetableRequest};

pub use base::*;

/// Upstream source of course catalogs and timetables
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Provider description
    fn description(&self) -> &str;

    /// Departments, in the order their 1-based ids follow
    async fn departments(&self) -> Result<Vec<Department>>;

    /// Courses of a department, `department_id` starting at 1
    async fn courses(&self, department_id: usize) -> Result<Vec<Course>>;

    /// Curricula of a course for one year
    async fn curricula(&self, course_url: &str, year: u32) -> Result<Vec<Curriculum>>;

    /// Whether the timetable is published as a JSON feed.
    ///
    /// Any non-200 answer means no: the HTML page is used instead.
    async fn has_structured_feed(&self, request: &TimetableRequest) -> Result<bool>;

    /// Raw body of the JSON feed
    async fn fetch_feed(&self, request: &TimetableRequest) -> Result<String>;

    /// Raw body of the HTML timetable page
    async fn fetch_html(&self, request: &TimetableRequest) -> Result<String>;

    /// Fetches the timetable in whichever shape the course publishes it.
    async fn fetch_timetable(&self, request: &TimetableRequest) -> Result<RawTimetable> {
        let timetable = if self.has_structured_feed(request).await? {
            RawTimetable::from_feed(&self.fetch_feed(request).await?)?
        } else {
            tracing::info!(
                "No JSON feed for {} (year {}, curriculum {}), scraping HTML",
                request.course_url,
                request.year,
                request.curriculum
            );
            RawTimetable::from_html(&self.fetch_html(request).await?)?
        };

        tracing::info!(
            "Fetched {} timetable with {} classes",
            timetable.kind(),
            timetable.class_names().len()
        );
        Ok(timetable)
    }
}
