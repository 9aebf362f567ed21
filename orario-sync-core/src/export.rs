//! Fetch, select and serialize: one calendar file for a course.

use crate::{
    Course, IcsOptions, RawTimetable, Result, TimetableRequest,
    ics::{IcsGenerator, calendar_file_name},
    providers::Provider,
    selection::{ClassSelection, MAX_SELECTABLE},
};

/// A generated calendar, ready to be saved or served
#[derive(Debug, Clone)]
pub struct CalendarExport {
    pub file_name: String,
    pub content: String,
    /// Number of events in `content`
    pub lessons: usize,
}

/// Renders the classes selected by `mask` out of a fetched timetable.
pub fn render_selection(
    timetable: &RawTimetable,
    mask: u64,
    options: IcsOptions,
) -> Result<(String, usize)> {
    let names = timetable.class_names();
    if names.len() > MAX_SELECTABLE {
        tracing::warn!(
            "{} classes listed, only the first {} can be selected",
            names.len(),
            MAX_SELECTABLE
        );
    }
    let selection = ClassSelection::from_mask(&names, mask)?;
    if selection.is_empty() {
        tracing::warn!("No class selected, the calendar has no events");
    }
    let lessons = selection.filter(timetable.to_timetable()?);
    tracing::debug!(
        "{} of {} classes selected, {} lessons",
        selection.len(),
        names.len(),
        lessons.len()
    );

    Ok((IcsGenerator::new(options).generate(&lessons), lessons.len()))
}

pub async fn export_calendar(
    provider: &dyn Provider,
    course: &Course,
    year: u32,
    curriculum: &str,
    mask: u64,
    options: IcsOptions,
) -> Result<CalendarExport> {
    let request = TimetableRequest::new(course.url.as_str(), year, curriculum);
    let timetable = provider.fetch_timetable(&request).await?;
    let (content, lessons) = render_selection(&timetable, mask, options)?;

    let file_name = calendar_file_name(&course.code, &course.name, year);
    tracing::info!("Generated {} with {} lessons", file_name, lessons);

    Ok(CalendarExport {
        file_name,
        content,
        lessons,
    })
}
