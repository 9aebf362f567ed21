use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use orario_sync_core::{
    Course, Curriculum, Department, IcsOptions, TimetableRequest,
    export::export_calendar,
    providers::Provider,
    selection::{MAX_SELECTABLE, pick},
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Highest course year accepted by the API
const MAX_YEAR: u32 = 6;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn Provider>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// Query of every catalog endpoint. Each endpoint reads the prefix it needs;
/// missing values default to 0 like the web client expects.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogQuery {
    /// 0-based department index
    school: usize,
    course: usize,
    year: u32,
    curr: usize,
    /// Class selection mask, bit i for the i-th class of `/getclasses`.
    /// 64 bits wide: larger values are rejected with 400.
    classes: u64,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/getschools", get(get_schools_handler))
        .route("/getcourses", get(get_courses_handler))
        .route("/getcurricula", get(get_curricula_handler))
        .route("/getclasses", get(get_classes_handler))
        .route("/getical", get(get_ical_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Orario Sync",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.provider.name(),
        "description": state.provider.description(),
        "endpoints": {
            "health": "/health",
            "schools": "/getschools",
            "courses": "/getcourses?school",
            "curricula": "/getcurricula?school&course&year",
            "classes": "/getclasses?school&course&year&curr",
            "ical": "/getical?school&course&year&curr&classes"
        },
        "classes_mask": format!(
            "bit i selects the i-th class of /getclasses, first {MAX_SELECTABLE} classes only"
        )
    }))
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn get_schools_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Department>>, AppError> {
    Ok(Json(state.provider.departments().await?))
}

async fn get_courses_handler(
    Query(query): Query<CatalogQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, AppError> {
    Ok(Json(state.provider.courses(query.school + 1).await?))
}

async fn get_curricula_handler(
    Query(query): Query<CatalogQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Curriculum>>, AppError> {
    let year = validate_year(query.year)?;
    let course = course_at(&state, &query).await?;
    Ok(Json(state.provider.curricula(&course.url, year).await?))
}

async fn get_classes_handler(
    Query(query): Query<CatalogQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let year = validate_year(query.year)?;
    let course = course_at(&state, &query).await?;
    let curriculum = curriculum_at(&state, &course, year, query.curr).await?;

    let request = TimetableRequest::new(course.url.as_str(), year, curriculum.code);
    let timetable = state.provider.fetch_timetable(&request).await?;
    Ok(Json(timetable.class_names()))
}

async fn get_ical_handler(
    Query(query): Query<CatalogQuery>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let year = validate_year(query.year)?;
    let course = course_at(&state, &query).await?;
    let curriculum = curriculum_at(&state, &course, year, query.curr).await?;

    let options = IcsOptions {
        calendar_name: Some(course.name.clone()),
        ..IcsOptions::default()
    };
    let export = export_calendar(
        state.provider.as_ref(),
        &course,
        year,
        &curriculum.code,
        query.classes,
        options,
    )
    .await?;

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "text/calendar; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", export.file_name),
            ),
        ],
        export.content,
    )
        .into_response())
}

fn validate_year(year: u32) -> Result<u32, orario_sync_core::Error> {
    if (1..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(orario_sync_core::Error::InvalidInput(format!(
            "year must be between 1 and {MAX_YEAR}, got {year}"
        )))
    }
}

async fn course_at(state: &AppState, query: &CatalogQuery) -> Result<Course, AppError> {
    let courses = state.provider.courses(query.school + 1).await?;
    Ok(pick(&courses, query.course, "course")?.clone())
}

async fn curriculum_at(
    state: &AppState,
    course: &Course,
    year: u32,
    index: usize,
) -> Result<Curriculum, AppError> {
    let curricula = state.provider.curricula(&course.url, year).await?;
    Ok(pick(&curricula, index, "curriculum")?.clone())
}

/// Application error type
#[derive(Debug)]
struct AppError(orario_sync_core::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = if self.0.is_client_input() {
            (StatusCode::BAD_REQUEST, "Invalid request")
        } else if self.0.is_upstream() {
            (
                StatusCode::BAD_GATEWAY,
                "Unable to retrieve timetable data from UniBo",
            )
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        };

        if status == StatusCode::BAD_REQUEST {
            tracing::debug!("Rejected request: {}", self.0);
        } else {
            tracing::error!("Request failed: {}", self.0);
        }

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            message: self.0.to_string(),
        });

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<orario_sync_core::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
