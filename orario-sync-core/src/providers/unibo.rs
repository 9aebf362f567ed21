use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{
    Course, Curriculum, Department, ProviderConfig, Result, TimetableRequest,
    catalog::{parse_courses, parse_curricula, parse_departments},
    endpoints::{curricula_url, feed_url, html_timetable_url},
    providers::{BaseProvider, BaseProviderBuilder, Provider, ProviderInfo},
};

/// University of Bologna course websites
pub struct UniboProvider {
    base: BaseProvider,
    config: ProviderConfig,
}

impl UniboProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let info = ProviderInfo {
            name: "unibo".to_string(),
            description: "Università di Bologna course timetables".to_string(),
        };
        let mut builder = match config.timeout {
            Some(secs) => BaseProviderBuilder::new_with_timeout(info, secs),
            None => BaseProviderBuilder::new(info),
        };
        if let Some(user_agent) = &config.user_agent {
            builder.client_builder = builder.client_builder.user_agent(user_agent.as_str());
        }

        Ok(Self {
            base: builder.build()?,
            config,
        })
    }
}

#[async_trait]
impl Provider for UniboProvider {
    fn name(&self) -> &str {
        &self.base.info.name
    }

    fn description(&self) -> &str {
        &self.base.info.description
    }

    async fn departments(&self) -> Result<Vec<Department>> {
        let html = self.base.get_text(&self.config.departments_url).await?;
        let departments = parse_departments(&html)?;
        tracing::info!("Found {} departments", departments.len());
        Ok(departments)
    }

    async fn courses(&self, department_id: usize) -> Result<Vec<Course>> {
        let url = format!("{}{}", self.config.courses_url, department_id);
        let html = self.base.get_text(&url).await?;
        let courses = parse_courses(&html)?;
        tracing::info!(
            "Found {} courses for department {}",
            courses.len(),
            department_id
        );
        Ok(courses)
    }

    async fn curricula(&self, course_url: &str, year: u32) -> Result<Vec<Curriculum>> {
        let body = self.base.get_text(&curricula_url(course_url, year)).await?;
        parse_curricula(&body)
    }

    async fn has_structured_feed(&self, request: &TimetableRequest) -> Result<bool> {
        let status = self.base.status(&feed_url(request)).await?;
        tracing::debug!("Feed check for {} answered {}", request.course_url, status);
        Ok(status == StatusCode::OK)
    }

    async fn fetch_feed(&self, request: &TimetableRequest) -> Result<String> {
        self.base.get_text(&feed_url(request)).await
    }

    async fn fetch_html(&self, request: &TimetableRequest) -> Result<String> {
        self.base.get_text(&html_timetable_url(request)).await
    }
}
