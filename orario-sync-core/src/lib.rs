//! Orario Sync Core Library
//!
//! Normalizes University of Bologna course timetables, published either as a
//! JSON event feed or as an HTML weekly schedule, into dated lessons and
//! exports a selection of them as an iCalendar file.

pub mod catalog;
pub mod endpoints;
pub mod error;
pub mod expand;
pub mod export;
pub mod feed;
pub mod ics;
pub mod italian;
pub mod providers;
pub mod scrape;
pub mod selection;
pub mod timetable;
pub mod types;

// Re-export core types and error handling
pub use error::{Error, Result};
pub use timetable::RawTimetable;
pub use types::*;

/// Commonly used items
pub mod prelude {
    pub use crate::{
        export::*, ics::*, providers::unibo::UniboProvider, providers::*, selection::*,
        timetable::*, types::*,
    };
}
