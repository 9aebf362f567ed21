use std::fs;

use anyhow::Result;
use orario_sync_core::prelude::*;

/// Parameters of the generate command
pub struct GenerateParams {
    pub course_url: String,
    pub code: String,
    pub name: String,
    pub year: u32,
    pub curriculum: String,
    pub classes: u64,
    pub output: Option<String>,
    pub calendar_name: Option<String>,
    pub include_teacher: bool,
    pub reminder_minutes: Option<u32>,
}

pub async fn departments_command(config: ProviderConfig) -> Result<()> {
    let provider = UniboProvider::new(config)?;
    let departments = provider.departments().await?;

    println!("Departments:");
    for (index, department) in departments.iter().enumerate() {
        println!("  [{index}] {}", department.name);
    }

    Ok(())
}

pub async fn courses_command(config: ProviderConfig, school: usize) -> Result<()> {
    let provider = UniboProvider::new(config)?;
    let departments = provider.departments().await?;
    let department = pick(&departments, school, "department")?;

    let courses = provider.courses(school + 1).await?;
    println!("Courses of {}:", department.name);
    for (index, course) in courses.iter().enumerate() {
        println!("  [{index}] {} {}", course.code, course.name);
        println!("      {}", course.url);
    }

    Ok(())
}

pub async fn curricula_command(config: ProviderConfig, course_url: String, year: u32) -> Result<()> {
    let provider = UniboProvider::new(config)?;
    let curricula = provider.curricula(&course_url, year).await?;

    if curricula.is_empty() {
        println!("No curricula published for year {year}");
    }
    for curriculum in curricula {
        println!("  {} - {}", curriculum.code, curriculum.name);
    }

    Ok(())
}

pub async fn classes_command(
    config: ProviderConfig,
    course_url: String,
    year: u32,
    curriculum: String,
) -> Result<()> {
    let provider = UniboProvider::new(config)?;
    let request = TimetableRequest::new(course_url, year, curriculum);
    let timetable = provider.fetch_timetable(&request).await?;

    println!("Classes ({} timetable):", timetable.kind());
    for (index, name) in timetable.class_names().iter().enumerate() {
        if index < MAX_SELECTABLE {
            println!("  [{index}] bit {:#x} {name}", 1u64 << index);
        } else {
            println!("  [{index}] (not selectable) {name}");
        }
    }

    Ok(())
}

pub async fn generate_command(config: ProviderConfig, params: GenerateParams) -> Result<()> {
    tracing::info!(
        "Generating timetable: course={}, year={}, curriculum={:?}, classes={:#b}",
        params.course_url,
        params.year,
        params.curriculum,
        params.classes
    );

    let provider = UniboProvider::new(config)?;
    let course = Course {
        code: params.code,
        name: params.name,
        url: params.course_url,
    };
    let options = IcsOptions {
        calendar_name: params
            .calendar_name
            .or_else(|| Some(format!("{} - anno {}", course.name, params.year))),
        include_teacher: params.include_teacher,
        reminder_minutes: params.reminder_minutes,
    };

    let export = export_calendar(
        &provider,
        &course,
        params.year,
        &params.curriculum,
        params.classes,
        options,
    )
    .await?;
    println!("✓ {} lessons exported", export.lessons);

    let output_file = params.output.unwrap_or(export.file_name);
    fs::write(&output_file, export.content)?;
    println!("✓ ICS file saved to: {output_file}");

    Ok(())
}
