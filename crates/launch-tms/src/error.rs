use crate::config::ConfigError;
use crate::fleet::FleetImportError;
use crate::reports::lsw::{LifecycleError, ReportServiceError, RepositoryError};
use crate::telemetry::TelemetryError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(FleetImportError),
    Snapshot(serde_json::Error),
    Report(ReportServiceError),
    Request(JsonRejection),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "fleet import error: {}", err),
            AppError::Snapshot(err) => write!(f, "invalid fleet snapshot: {}", err),
            AppError::Report(err) => write!(f, "report error: {}", err),
            AppError::Request(err) => write!(f, "invalid request body: {}", err.body_text()),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Snapshot(err) => Some(err),
            AppError::Report(err) => Some(err),
            AppError::Request(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Request(rejection) => rejection.status(),
            AppError::Import(_) | AppError::Snapshot(_) => StatusCode::BAD_REQUEST,
            AppError::Report(ReportServiceError::Repository(RepositoryError::NotFound))
            | AppError::Report(ReportServiceError::NotificationNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Report(ReportServiceError::Repository(RepositoryError::Conflict))
            | AppError::Report(ReportServiceError::Lifecycle(
                LifecycleError::AlreadySubmitted(_),
            )) => StatusCode::CONFLICT,
            AppError::Report(ReportServiceError::Lifecycle(LifecycleError::KeyMismatch {
                ..
            })) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Report(_)
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<FleetImportError> for AppError {
    fn from(value: FleetImportError) -> Self {
        Self::Import(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Snapshot(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::Request(value)
    }
}

impl From<ReportServiceError> for AppError {
    fn from(value: ReportServiceError) -> Self {
        Self::Report(value)
    }
}
