//! Scraper for the HTML timetable served to courses without a JSON feed.
//!
//! The page lists the classes in a form (`#insegnamenti-popup`) and renders
//! each class in a pair of elements sharing its position in that list: a
//! heading `h3#tab{i}` and a panel `div#panel{i}`. The panel holds one
//! paragraph per active period, a location block and one `table.timetable`
//! of weekly slots per period.
//!
//! The listing and the panels are only aligned when they come from the same
//! response, so both are read from one document in [`scrape_timetable`].

use chrono::NaiveDate;
use select::{
    document::Document,
    node::Node,
    predicate::{And, Attr, Class, Name, Predicate},
};

use crate::{
    ClassPeriod, Error, Result, Timetable, WeeklyPattern,
    expand::expand_period,
    italian::{parse_date, parse_time_range, parse_weekday},
};

const CLASS_LISTING_ID: &str = "insegnamenti-popup";
const SLOT_TABLE_CLASS: &str = "timetable";
/// Cells per weekly slot: weekday, time range, teacher, separator
const CELLS_PER_SLOT: usize = 4;

/// A class read from the HTML timetable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedClass {
    pub name: String,
    pub location: String,
    pub periods: Vec<ClassPeriod>,
}

impl ScrapedClass {
    /// All dated lessons of the class, period after period.
    pub fn occurrences(&self) -> Result<Timetable> {
        let mut lessons = Vec::new();
        for period in &self.periods {
            lessons.extend(expand_period(period)?);
        }
        Ok(lessons)
    }
}

/// Reads every class listed on the page together with its schedule.
pub fn scrape_timetable(html: &str) -> Result<Vec<ScrapedClass>> {
    let document = Document::from(html);
    let listing = class_listing(&document)?;
    tracing::debug!("HTML timetable lists {} classes", listing.len());

    listing
        .iter()
        .enumerate()
        .map(|(index, listed_name)| {
            let class = scrape_class(&document, index)?;
            if class.name != *listed_name {
                tracing::warn!(
                    "Class #{} is listed as '{}' but its panel is titled '{}'",
                    index,
                    listed_name,
                    class.name
                );
            }
            Ok(class)
        })
        .collect()
}

/// Class names of the listing form, in page order.
pub fn class_listing(document: &Document) -> Result<Vec<String>> {
    let form = document
        .find(And(Name("form"), Attr("id", CLASS_LISTING_ID)))
        .next()
        .ok_or_else(|| Error::upstream(format!("missing class listing form #{CLASS_LISTING_ID}")))?;

    form.find(Name("li"))
        .map(|item| {
            let label = item
                .find(Name("label"))
                .next()
                .map_or_else(|| item.text(), |label| label.text());
            let label = label.trim();
            if label.is_empty() {
                return Err(Error::upstream("empty entry in class listing"));
            }
            Ok(label.to_string())
        })
        .collect()
}

fn scrape_class(document: &Document, index: usize) -> Result<ScrapedClass> {
    let name = class_name(document, index)?;

    let panel_id = format!("panel{index}");
    let panel = document
        .find(And(Name("div"), Attr("id", panel_id.as_str())))
        .next()
        .ok_or_else(|| Error::upstream(format!("missing panel #{panel_id}")))?;

    let location = class_location(&panel)?;

    let windows = panel
        .find(Name("p"))
        .map(|paragraph| parse_period(&paragraph.text()))
        .collect::<Result<Vec<_>>>()?;
    if windows.is_empty() {
        return Err(Error::upstream(format!("no active period for '{name}'")));
    }

    let tables = panel
        .find(And(Name("table"), Class(SLOT_TABLE_CLASS)))
        .map(|table| weekly_patterns(&table))
        .collect::<Result<Vec<_>>>()?;
    if tables.len() != windows.len() {
        return Err(Error::upstream(format!(
            "'{}' has {} periods but {} timetables",
            name,
            windows.len(),
            tables.len()
        )));
    }

    let periods = windows
        .into_iter()
        .zip(tables)
        .map(|((start, end), patterns)| ClassPeriod {
            class_name: name.clone(),
            location: location.clone(),
            start,
            end,
            patterns,
        })
        .collect();

    Ok(ScrapedClass {
        name,
        location,
        periods,
    })
}

fn class_name(document: &Document, index: usize) -> Result<String> {
    let heading_id = format!("tab{index}");
    let heading = document
        .find(And(Name("h3"), Attr("id", heading_id.as_str())))
        .next()
        .ok_or_else(|| Error::upstream(format!("missing heading #{heading_id}")))?;
    let anchor = first_descendant(&heading, Name("a"))
        .ok_or_else(|| Error::upstream(format!("heading #{heading_id} has no link")))?;

    anchor
        .children()
        .filter_map(|child| child.as_text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .last()
        .map(ToString::to_string)
        .ok_or_else(|| Error::upstream(format!("heading #{heading_id} has no class name")))
}

/// Room name, followed by ` - <address>` when the block carries one.
fn class_location(panel: &Node) -> Result<String> {
    let block = first_descendant(panel, Name("div"))
        .ok_or_else(|| Error::upstream("panel has no location block"))?;
    let mut children = block.children();

    let mut location = children
        .next()
        .and_then(|node| node.as_text())
        .map(|text| text.trim().to_string())
        .ok_or_else(|| Error::upstream("location block has no room name"))?;

    let address = children
        .next()
        .and_then(|node| first_descendant(&node, Name("div")))
        .map(|node| node.text().trim().to_string())
        .filter(|address| !address.is_empty());
    if let Some(address) = address {
        location.push_str(" - ");
        location.push_str(&address);
    }

    Ok(location)
}

/// Parses the free-text description of an active period.
///
/// The text spans four lines: the third holds the start date followed by a
/// two letter connective, the fourth the end date.
fn parse_period(text: &str) -> Result<(NaiveDate, NaiveDate)> {
    let lines: Vec<&str> = text.split('\n').collect();
    let (Some(start), Some(end)) = (lines.get(2), lines.get(3)) else {
        return Err(Error::upstream(format!(
            "unexpected period description '{}'",
            text.trim()
        )));
    };

    let mut start = start.trim().chars();
    start.next_back();
    start.next_back();

    Ok((parse_date(start.as_str())?, parse_date(end)?))
}

fn weekly_patterns(table: &Node) -> Result<Vec<WeeklyPattern>> {
    let body = first_descendant(table, Name("tbody"))
        .ok_or_else(|| Error::upstream("weekly timetable has no body"))?;
    let cells: Vec<String> = body
        .find(Name("td"))
        .map(|cell| cell.text().trim().to_string())
        .collect();

    cells
        .chunks(CELLS_PER_SLOT)
        .map(|slot| match slot {
            [weekday, times, teacher, ..] => {
                let (start, end) = parse_time_range(times)?;
                WeeklyPattern::new(parse_weekday(weekday)?, start, end, teacher.as_str())
            }
            _ => Err(Error::upstream(format!(
                "incomplete weekly slot {slot:?}"
            ))),
        })
        .collect()
}

fn first_descendant<'a, P: Predicate>(node: &Node<'a>, predicate: P) -> Option<Node<'a>> {
    let index = node.index();
    node.find(predicate).find(|found| found.index() != index)
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{Datelike, Timelike, Weekday};

    use super::*;

    pub(crate) const PAGE: &str = r##"<!DOCTYPE html>
<html>
<body>
<form id="insegnamenti-popup">
  <ul>
    <li>
      <input type="checkbox" value="1">
      <label>Storia medievale</label>
    </li>
    <li>
      <input type="checkbox" value="2">
      <label>Letteratura italiana</label>
    </li>
  </ul>
</form>
<h3 id="tab0"><a href="#panel0"><span>00123</span>
  Storia medievale
</a></h3>
<div id="panel0">
<p>
Dal
1 marzo 2023 al
8 marzo 2023
</p>
<div class="location">Aula Prodi<div class="address"><div>Piazza San Giovanni in Monte 2</div></div></div>
<table class="timetable">
  <tbody>
    <tr><td>Mercoledì</td><td>09:00 - 11:00</td><td>Rossi</td><td></td></tr>
  </tbody>
</table>
</div>
<h3 id="tab1"><a href="#panel1"><span>00456</span>
  Letteratura italiana
</a></h3>
<div id="panel1">
<p>
Dal
2 ottobre 2023 al
1 dicembre 2023
</p>
<p>
Dal
19 febbraio 2024 al
1 marzo 2024
</p>
<div class="location">Aula III</div>
<table class="timetable">
  <tr><td>lunedì</td><td>11:00 - 13:00</td><td>Bianchi</td><td></td></tr>
  <tr><td>GIOVEDÌ</td><td>14:00 - 16:00</td><td>Verdi</td><td></td></tr>
</table>
<table class="timetable">
  <tr><td>Venerdì</td><td>9:00 - 12:00</td><td>Bianchi</td></tr>
</table>
</div>
</body>
</html>"##;

    #[test]
    fn test_class_listing() {
        let document = Document::from(PAGE);
        let names = class_listing(&document).unwrap();
        assert_eq!(names, vec!["Storia medievale", "Letteratura italiana"]);
    }

    #[test]
    fn test_scrape_single_period_class() {
        let classes = scrape_timetable(PAGE).unwrap();
        assert_eq!(classes.len(), 2);

        let storia = &classes[0];
        assert_eq!(storia.name, "Storia medievale");
        assert_eq!(
            storia.location,
            "Aula Prodi - Piazza San Giovanni in Monte 2"
        );
        assert_eq!(storia.periods.len(), 1);

        let period = &storia.periods[0];
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2023, 3, 8).unwrap());
        assert_eq!(period.patterns.len(), 1);
        assert_eq!(period.patterns[0].weekday(), Weekday::Wed);
        assert_eq!(period.patterns[0].teacher(), "Rossi");

        let lessons = storia.occurrences().unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].start.day(), 1);
        assert_eq!(lessons[0].start.hour(), 9);
    }

    #[test]
    fn test_scrape_multi_period_class() {
        let classes = scrape_timetable(PAGE).unwrap();
        let letteratura = &classes[1];

        assert_eq!(letteratura.location, "Aula III");
        assert_eq!(letteratura.periods.len(), 2);

        let autumn = &letteratura.periods[0];
        assert_eq!(autumn.patterns.len(), 2);
        assert_eq!(autumn.patterns[0].weekday(), Weekday::Mon);
        assert_eq!(autumn.patterns[1].weekday(), Weekday::Thu);
        assert_eq!(autumn.patterns[1].teacher(), "Verdi");

        let spring = &letteratura.periods[1];
        assert_eq!(spring.start, NaiveDate::from_ymd_opt(2024, 2, 19).unwrap());
        assert_eq!(spring.patterns.len(), 1);
        assert_eq!(spring.patterns[0].weekday(), Weekday::Fri);

        let lessons = letteratura.occurrences().unwrap();
        // nothing is scheduled during the winter break
        assert!(lessons.iter().all(|l| {
            let date = l.start.date_naive();
            date < NaiveDate::from_ymd_opt(2023, 12, 1).unwrap()
                || date >= NaiveDate::from_ymd_opt(2024, 2, 19).unwrap()
        }));
        // 1 March 2024 is a Friday but also the excluded period end
        let fridays: Vec<_> = lessons
            .iter()
            .filter(|l| l.start.weekday() == Weekday::Fri)
            .map(|l| l.start.date_naive())
            .collect();
        assert_eq!(fridays, vec![NaiveDate::from_ymd_opt(2024, 2, 23).unwrap()]);
    }

    #[test]
    fn test_missing_panel_fails_whole_page() {
        let broken = PAGE.replace("id=\"panel1\"", "id=\"panel7\"");
        let err = scrape_timetable(&broken).unwrap_err();
        assert!(err.to_string().contains("panel1"));
    }

    #[test]
    fn test_missing_listing_form() {
        let broken = PAGE.replace("insegnamenti-popup", "something-else");
        assert!(matches!(
            scrape_timetable(&broken),
            Err(Error::UpstreamData(_))
        ));
    }

    #[test]
    fn test_period_table_mismatch() {
        let broken = PAGE.replacen("<table class=\"timetable\">", "<table>", 1);
        assert!(scrape_timetable(&broken).is_err());
    }

    #[test]
    fn test_unknown_weekday_in_table() {
        let broken = PAGE.replace("Mercoledì", "Wednesday");
        assert!(scrape_timetable(&broken).is_err());
    }

    #[test]
    fn test_parse_period() {
        let (start, end) = parse_period("\n  Dal\n  10 gennaio 2024 al\n  20 febbraio 2024\n").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());

        assert!(parse_period("10 gennaio 2024 - 20 febbraio 2024").is_err());
    }
}
