use std::collections::BTreeSet;

use crate::{Error, LessonOccurrence, Result, Timetable};

/// Sorted, duplicate-free class names.
pub fn class_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    names
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

/// Sorted, duplicate-free names of the classes in a timetable.
pub fn timetable_class_names(timetable: &[LessonOccurrence]) -> Vec<String> {
    class_names(timetable.iter().map(|lesson| lesson.name.as_str()))
}

/// Looks up `index` in an enumeration shown to the caller.
///
/// `what` names the enumeration in the error.
pub fn pick<'a, T>(items: &'a [T], index: usize, what: &'static str) -> Result<&'a T> {
    items.get(index).ok_or(Error::IndexOutOfRange {
        what,
        index,
        len: items.len(),
    })
}

/// Width of a selection mask
pub const MAX_SELECTABLE: usize = u64::BITS as usize;

/// Set of classes chosen by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSelection {
    names: BTreeSet<String>,
}

impl ClassSelection {
    /// Selects the `i`-th of `names` for every bit `i` set in `mask`.
    ///
    /// A bit beyond the end of `names` is rejected. Only the first
    /// [`MAX_SELECTABLE`] classes can be selected this way.
    pub fn from_mask(names: &[String], mask: u64) -> Result<Self> {
        let indices: Vec<usize> = (0..MAX_SELECTABLE)
            .filter(|bit| mask & (1 << bit) != 0)
            .collect();
        Self::from_indices(names, &indices)
    }

    pub fn from_indices(names: &[String], indices: &[usize]) -> Result<Self> {
        let names = indices
            .iter()
            .map(|&index| pick(names, index, "class").cloned())
            .collect::<Result<_>>()?;
        Ok(Self { names })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Keeps the selected lessons, in their original order.
    pub fn filter(&self, timetable: Timetable) -> Timetable {
        timetable
            .into_iter()
            .filter(|lesson| self.contains(&lesson.name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::{NO_LOCATION, TIMEZONE};

    fn lesson(name: &str, day: u32) -> LessonOccurrence {
        let start = TIMEZONE.with_ymd_and_hms(2023, 3, day, 9, 0, 0).unwrap();
        LessonOccurrence {
            name: name.to_string(),
            start,
            end: start + Duration::hours(2),
            location: NO_LOCATION.to_string(),
            teacher: String::new(),
        }
    }

    #[test]
    fn test_names_are_deduplicated_and_sorted() {
        let timetable = vec![
            lesson("Fisica", 1),
            lesson("Algebra", 2),
            lesson("Algebra", 3),
            lesson("Analisi", 4),
            lesson("Algebra", 5),
        ];

        let names = timetable_class_names(&timetable);
        assert_eq!(names, vec!["Algebra", "Analisi", "Fisica"]);
        assert_eq!(names.iter().filter(|n| *n == "Algebra").count(), 1);
    }

    #[test]
    fn test_mask_selection_preserves_order() {
        let timetable = vec![
            lesson("Fisica", 1),
            lesson("Analisi", 2),
            lesson("Algebra", 3),
            lesson("Fisica", 4),
            lesson("Analisi", 5),
        ];
        let names = timetable_class_names(&timetable);

        let selection = ClassSelection::from_mask(&names, 0b101).unwrap();
        assert_eq!(selection.len(), 2);
        assert!(selection.contains("Algebra"));
        assert!(selection.contains("Fisica"));
        assert!(!selection.contains("Analisi"));

        let filtered = selection.filter(timetable);
        let picked: Vec<_> = filtered
            .iter()
            .map(|l| (l.name.as_str(), l.start.date_naive().to_string()))
            .collect();
        assert_eq!(
            picked,
            vec![
                ("Fisica", "2023-03-01".to_string()),
                ("Algebra", "2023-03-03".to_string()),
                ("Fisica", "2023-03-04".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_mask_selects_nothing() {
        let names = vec!["Algebra".to_string()];
        let selection = ClassSelection::from_mask(&names, 0).unwrap();
        assert!(selection.is_empty());
        assert!(selection.filter(vec![lesson("Algebra", 1)]).is_empty());
    }

    #[test]
    fn test_mask_beyond_enumeration_is_rejected() {
        let names = vec!["Algebra".to_string(), "Analisi".to_string()];
        let err = ClassSelection::from_mask(&names, 0b100).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                what: "class",
                index: 2,
                len: 2
            }
        ));
        assert!(err.is_client_input());
    }

    #[test]
    fn test_mask_uses_all_64_bits() {
        let names: Vec<String> = (0..70).map(|i| format!("Classe {i:02}")).collect();
        let selection = ClassSelection::from_mask(&names, 1 << 63).unwrap();
        assert!(selection.contains("Classe 63"));
        assert_eq!(selection.len(), 1);

        let err = ClassSelection::from_mask(&names[..63], 1 << 63).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 63, len: 63, .. }));
    }

    #[test]
    fn test_pick() {
        let items = ["a", "b"];
        assert_eq!(*pick(&items, 1, "course").unwrap(), "b");
        assert!(pick(&items, 2, "course").unwrap_err().is_client_input());
    }
}
