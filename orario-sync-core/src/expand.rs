use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::{ClassPeriod, Error, LessonOccurrence, Result, TIMEZONE, Timetable};

/// Every date in `[start, end)`. Empty when `end <= start`.
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |date| *date < end)
}

/// Expands the weekly patterns of a period into dated occurrences.
///
/// The period end is exclusive: a lesson falling on `period.end` is not
/// emitted.
pub fn expand_period(period: &ClassPeriod) -> Result<Timetable> {
    let mut lessons = Vec::new();

    for date in dates_between(period.start, period.end) {
        let weekday = date.weekday();
        for pattern in period.patterns.iter().filter(|p| p.weekday() == weekday) {
            lessons.push(LessonOccurrence {
                name: period.class_name.clone(),
                start: localize(date, pattern.start_time())?,
                end: localize(date, pattern.end_time())?,
                location: period.location.clone(),
                teacher: pattern.teacher().to_string(),
            });
        }
    }

    tracing::debug!(
        "Expanded '{}' {}..{} into {} lessons",
        period.class_name,
        period.start,
        period.end,
        lessons.len()
    );
    Ok(lessons)
}

fn localize(date: NaiveDate, time: NaiveTime) -> Result<DateTime<Tz>> {
    TIMEZONE
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| Error::upstream(format!("{date} {time} does not exist in {TIMEZONE}")))
}

#[cfg(test)]
mod tests {
    use chrono::{Timelike, Weekday};

    use super::*;
    use crate::WeeklyPattern;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn period(start: NaiveDate, end: NaiveDate, patterns: Vec<WeeklyPattern>) -> ClassPeriod {
        ClassPeriod {
            class_name: "Fisica".to_string(),
            location: "Aula 3 - Via Irnerio 46".to_string(),
            start,
            end,
            patterns,
        }
    }

    #[test]
    fn test_half_open_period() {
        // 2023-03-01 and 2023-03-08 are both Wednesdays
        let wednesday = WeeklyPattern::new(Weekday::Wed, time(9, 0), time(11, 0), "Rossi").unwrap();
        let lessons = expand_period(&period(date(2023, 3, 1), date(2023, 3, 8), vec![wednesday]))
            .unwrap();

        assert_eq!(lessons.len(), 1);
        let lesson = &lessons[0];
        assert_eq!(lesson.start.date_naive(), date(2023, 3, 1));
        assert_eq!(lesson.start.hour(), 9);
        assert_eq!(lesson.end.hour(), 11);
        assert_eq!(lesson.teacher, "Rossi");
        assert_eq!(lesson.location, "Aula 3 - Via Irnerio 46");
        assert_eq!(lesson.name, "Fisica");
    }

    #[test]
    fn test_multiple_patterns_per_week() {
        let patterns = vec![
            WeeklyPattern::new(Weekday::Mon, time(9, 0), time(11, 0), "Rossi").unwrap(),
            WeeklyPattern::new(Weekday::Thu, time(14, 0), time(16, 0), "Verdi").unwrap(),
            WeeklyPattern::new(Weekday::Mon, time(15, 0), time(17, 0), "Verdi").unwrap(),
        ];
        // Monday 6 March to Monday 20 March, two full weeks
        let lessons = expand_period(&period(date(2023, 3, 6), date(2023, 3, 20), patterns)).unwrap();

        assert_eq!(lessons.len(), 6);
        assert_eq!(
            lessons
                .iter()
                .filter(|l| l.start.weekday() == Weekday::Mon)
                .count(),
            4
        );
        assert!(lessons.iter().all(|l| l.start < l.end));
        assert!(lessons.iter().all(|l| l.start.date_naive() == l.end.date_naive()));
        assert!(lessons.iter().all(|l| l.start.date_naive() < date(2023, 3, 20)));
    }

    #[test]
    fn test_empty_and_inverted_periods() {
        let pattern = WeeklyPattern::new(Weekday::Wed, time(9, 0), time(11, 0), "Rossi").unwrap();

        let empty = period(date(2023, 3, 1), date(2023, 3, 1), vec![pattern.clone()]);
        assert!(expand_period(&empty).unwrap().is_empty());

        let inverted = period(date(2023, 3, 8), date(2023, 3, 1), vec![pattern]);
        assert!(expand_period(&inverted).unwrap().is_empty());
    }

    #[test]
    fn test_lessons_across_dst_change() {
        // Summer time starts on 26 March 2023
        let pattern = WeeklyPattern::new(Weekday::Fri, time(9, 0), time(11, 0), "").unwrap();
        let lessons = expand_period(&period(date(2023, 3, 20), date(2023, 4, 3), vec![pattern]))
            .unwrap();

        assert_eq!(lessons.len(), 2);
        assert!(lessons.iter().all(|l| l.start.hour() == 9));
    }

    #[test]
    fn test_dates_between() {
        let dates: Vec<_> = dates_between(date(2023, 12, 30), date(2024, 1, 2)).collect();
        assert_eq!(dates, vec![date(2023, 12, 30), date(2023, 12, 31), date(2024, 1, 1)]);
    }
}
