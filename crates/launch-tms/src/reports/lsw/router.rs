use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::lifecycle::LifecycleError;
use super::notifications::{NotificationPublisher, NotificationSummary, ReportNotification};
use super::repository::{ReportRepository, RepositoryError};
use super::service::{DailyReportService, ReportServiceError};
use crate::fleet::FleetSnapshot;

/// Router builder exposing the daily report lifecycle and notifications.
pub fn report_router<R, N>(service: Arc<DailyReportService<R, N>>) -> Router
where
    R: ReportRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/reports/lsw", post(generate_handler::<R, N>))
        .route(
            "/api/v1/reports/lsw/:terminal_id",
            get(history_handler::<R, N>),
        )
        .route(
            "/api/v1/reports/lsw/:terminal_id/:report_date",
            get(report_handler::<R, N>),
        )
        .route(
            "/api/v1/reports/lsw/:terminal_id/:report_date/notes",
            put(notes_handler::<R, N>),
        )
        .route(
            "/api/v1/reports/lsw/:terminal_id/:report_date/draft",
            post(draft_handler::<R, N>),
        )
        .route(
            "/api/v1/reports/lsw/:terminal_id/:report_date/submit",
            post(submit_handler::<R, N>),
        )
        .route(
            "/api/v1/reports/lsw/:terminal_id/:report_date/reminders",
            post(reminders_handler::<R, N>),
        )
        .route(
            "/api/v1/notifications/:terminal_id",
            get(notifications_handler::<R, N>),
        )
        .route(
            "/api/v1/notifications/:terminal_id/:notification_id/ack",
            post(acknowledge_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub snapshot: FleetSnapshot,
    #[serde(default)]
    pub report_date: Option<NaiveDate>,
    #[serde(default)]
    pub generated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
    #[serde(default)]
    pub at: Option<NaiveDateTime>,
}

/// Optional clock override for actions that record a timestamp.
#[derive(Debug, Default, Deserialize)]
pub struct ClockRequest {
    #[serde(default)]
    pub at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
pub struct NotificationFeed {
    pub terminal_id: String,
    pub summary: NotificationSummary,
    pub notifications: Vec<ReportNotification>,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn clock(request: Option<Json<ClockRequest>>) -> NaiveDateTime {
    request.and_then(|Json(body)| body.at).unwrap_or_else(now)
}

pub(crate) async fn generate_handler<R, N>(
    State(service): State<Arc<DailyReportService<R, N>>>,
    request: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response
where
    R: ReportRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return rejection_response(rejection),
    };
    let generated_at = request.generated_at.unwrap_or_else(now);
    let report_date = request.report_date.unwrap_or(generated_at.date());

    match service.generate(&request.snapshot, report_date, generated_at) {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<R, N>(
    State(service): State<Arc<DailyReportService<R, N>>>,
    Path(terminal_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.history(&terminal_id) {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R, N>(
    State(service): State<Arc<DailyReportService<R, N>>>,
    Path((terminal_id, report_date)): Path<(String, NaiveDate)>,
) -> Response
where
    R: ReportRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.get(&terminal_id, report_date) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn notes_handler<R, N>(
    State(service): State<Arc<DailyReportService<R, N>>>,
    Path((terminal_id, report_date)): Path<(String, NaiveDate)>,
    request: Result<Json<NotesRequest>, JsonRejection>,
) -> Response
where
    R: ReportRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return rejection_response(rejection),
    };
    let at = request.at.unwrap_or_else(now);
    match service.set_notes(&terminal_id, report_date, request.notes, at) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn draft_handler<R, N>(
    State(service): State<Arc<DailyReportService<R, N>>>,
    Path((terminal_id, report_date)): Path<(String, NaiveDate)>,
    request: Option<Json<ClockRequest>>,
) -> Response
where
    R: ReportRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.save_draft(&terminal_id, report_date, clock(request)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<DailyReportService<R, N>>>,
    Path((terminal_id, report_date)): Path<(String, NaiveDate)>,
    request: Option<Json<ClockRequest>>,
) -> Response
where
    R: ReportRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.submit(&terminal_id, report_date, clock(request)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reminders_handler<R, N>(
    State(service): State<Arc<DailyReportService<R, N>>>,
    Path((terminal_id, report_date)): Path<(String, NaiveDate)>,
    request: Option<Json<ClockRequest>>,
) -> Response
where
    R: ReportRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.dispatch_reminders(&terminal_id, report_date, clock(request)) {
        Ok(sent) => (StatusCode::OK, Json(json!({ "sent": sent }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn notifications_handler<R, N>(
    State(service): State<Arc<DailyReportService<R, N>>>,
    Path(terminal_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let feed = NotificationFeed {
        summary: service.notification_summary(&terminal_id, now()),
        notifications: service.notifications(&terminal_id),
        terminal_id,
    };
    (StatusCode::OK, Json(feed)).into_response()
}

pub(crate) async fn acknowledge_handler<R, N>(
    State(service): State<Arc<DailyReportService<R, N>>>,
    Path((terminal_id, notification_id)): Path<(String, String)>,
    request: Option<Json<ClockRequest>>,
) -> Response
where
    R: ReportRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.acknowledge(&terminal_id, &notification_id, clock(request)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

/// Malformed or missing JSON bodies keep axum's status but use the error envelope.
fn rejection_response(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
    });
    (rejection.status(), Json(payload)).into_response()
}

fn error_response(error: ReportServiceError) -> Response {
    let status = match &error {
        ReportServiceError::Lifecycle(LifecycleError::AlreadySubmitted(_))
        | ReportServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ReportServiceError::Lifecycle(LifecycleError::KeyMismatch { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ReportServiceError::Repository(RepositoryError::NotFound)
        | ReportServiceError::NotificationNotFound(_) => StatusCode::NOT_FOUND,
        ReportServiceError::Repository(RepositoryError::Unavailable(_))
        | ReportServiceError::Publish(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
