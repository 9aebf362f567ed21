//! Department, course and curriculum listings of the university site.

use select::{
    document::Document,
    predicate::{And, Class, Name},
};
use serde::Deserialize;

use crate::{Course, Curriculum, Department, Error, Result};

/// Parses the department names of the degree programmes page.
pub fn parse_departments(html: &str) -> Result<Vec<Department>> {
    let document = Document::from(html);
    let list = document
        .find(And(Name("div"), Class("dropdown-list")))
        .next()
        .ok_or_else(|| Error::upstream("missing department list"))?;

    Ok(list
        .find(Name("button"))
        .filter_map(|button| button.find(And(Name("span"), Class("title"))).next())
        .map(|title| Department {
            name: title.text().trim().to_string(),
        })
        .collect())
}

/// Parses the course list of one department.
///
/// Each course is rendered as a title block (name, then code), a tracked
/// link to its website and a paragraph with the degree type.
pub fn parse_courses(html: &str) -> Result<Vec<Course>> {
    let document = Document::from(html);
    let titles = document.find(And(Name("div"), Class("title")));
    let links = document.find(And(Name("a"), Class("umtrack")));
    let types = document.find(And(Name("p"), Class("type")));

    titles
        .zip(links)
        .zip(types)
        .map(|((title, link), kind)| {
            let mut fields = title.children().filter(|child| child.name().is_some());
            let (Some(name), Some(code)) = (fields.next(), fields.next()) else {
                return Err(Error::upstream("course title without name and code"));
            };
            let url = link
                .attr("href")
                .ok_or_else(|| Error::upstream("course link without href"))?;
            let degree: String = kind.text().chars().filter(char::is_ascii_uppercase).collect();

            Ok(Course {
                code: code.text().chars().filter(char::is_ascii_digit).collect(),
                name: format!("{} [{}]", name.text().trim(), degree),
                url: url.trim().to_string(),
            })
        })
        .collect()
}

#[derive(Deserialize)]
struct RawCurriculum {
    value: String,
    label: String,
}

/// Parses the available curricula JSON.
pub fn parse_curricula(body: &str) -> Result<Vec<Curriculum>> {
    let raw: Vec<RawCurriculum> = serde_json::from_str(body)?;
    Ok(raw
        .into_iter()
        .map(|c| Curriculum {
            code: c.value,
            name: c.label,
        })
        .collect())
}
