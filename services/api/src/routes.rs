use crate::infra::AppState;
use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate, NaiveDateTime};
use launch_tms::error::AppError;
use launch_tms::fleet::{FleetCsvImporter, FleetSnapshot};
use launch_tms::reports::lsw::{
    generate, report_router, DailyReportService, DailyStatusReport, NotificationPublisher,
    ReportContext, ReportRepository, SubmissionCutoff, TerminalInfo,
};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// Stateless report build; nothing is stored and no reminders are scheduled.
#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    #[serde(default)]
    pub(crate) snapshot: FleetSnapshot,
    #[serde(default)]
    pub(crate) terminal: Option<TerminalInfo>,
    #[serde(default)]
    pub(crate) report_date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) generated_at: Option<NaiveDateTime>,
    /// Load template export; replaces `snapshot.loads` when present.
    #[serde(default)]
    pub(crate) loads_csv: Option<String>,
    /// Driver template export; replaces `snapshot.drivers` when present.
    #[serde(default)]
    pub(crate) drivers_csv: Option<String>,
}

pub(crate) fn with_report_routes<R, N>(service: Arc<DailyReportService<R, N>>) -> axum::Router
where
    R: ReportRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let cutoff = service.settings().cutoff;
    report_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/reports/preview",
            axum::routing::post(
                move |payload: Result<Json<PreviewRequest>, JsonRejection>| {
                    preview_endpoint(cutoff, payload)
                },
            ),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn preview_endpoint(
    cutoff: SubmissionCutoff,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<DailyStatusReport>, AppError> {
    let Json(payload) = payload?;
    let PreviewRequest {
        mut snapshot,
        terminal,
        report_date,
        generated_at,
        loads_csv,
        drivers_csv,
    } = payload;

    if let Some(csv) = loads_csv {
        snapshot.loads = FleetCsvImporter::loads_from_reader(Cursor::new(csv.into_bytes()))?;
    }
    if let Some(csv) = drivers_csv {
        snapshot.drivers = FleetCsvImporter::drivers_from_reader(Cursor::new(csv.into_bytes()))?;
    }

    let generated_at = generated_at.unwrap_or_else(|| Local::now().naive_local());
    let context = ReportContext::new(terminal.unwrap_or_default(), generated_at)
        .with_report_date(report_date.unwrap_or(generated_at.date()))
        .with_cutoff(cutoff);

    Ok(Json(generate(&snapshot, &context)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryNotificationPublisher, InMemoryReportRepository};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use launch_tms::reports::lsw::ReportSettings;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    const LOAD_CSV: &str = "\
Load ID*,Load Number*,Status*,Pickup Date*,Delivery Date*,Rate*
L-1,LD-1,delivered,2025-09-23,2025-09-24,1200
L-2,LD-2,pending,2025-09-25,2025-09-26,800
";

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 24)
            .and_then(|date| date.and_hms_opt(8, 30, 0))
            .expect("valid timestamp")
    }

    fn preview_request(loads_csv: Option<&str>) -> PreviewRequest {
        PreviewRequest {
            snapshot: FleetSnapshot::default(),
            terminal: None,
            report_date: None,
            generated_at: Some(generated_at()),
            loads_csv: loads_csv.map(str::to_string),
            drivers_csv: None,
        }
    }

    fn app(ready: bool) -> axum::Router {
        let service = Arc::new(DailyReportService::new(
            Arc::new(InMemoryReportRepository::default()),
            Arc::new(InMemoryNotificationPublisher::default()),
            ReportSettings::default(),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_report_routes(service).layer(Extension(state))
    }

    #[tokio::test]
    async fn preview_builds_report_from_csv() {
        let Json(report) = preview_endpoint(
            SubmissionCutoff::default(),
            Ok(Json(preview_request(Some(LOAD_CSV)))),
        )
        .await
        .expect("preview builds");

        assert_eq!(report.terminal, TerminalInfo::default());
        assert_eq!(report.loads.delivered, 1);
        assert!((report.loads.revenue - 1200.0).abs() < f64::EPSILON);
        assert_eq!(report.outlook.tomorrow.expected_pickups, 1);
        assert!(!report.is_late_submission);
    }

    #[tokio::test]
    async fn preview_rejects_malformed_csv() {
        let error = preview_endpoint(
            SubmissionCutoff::default(),
            Ok(Json(preview_request(Some("Load ID,Status\nL-1,teleported\n")))),
        )
        .await
        .expect_err("unknown status rejected");

        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn preview_rejects_malformed_body_with_json_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/reports/preview")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"snapshot\": "))
            .expect("request");

        let response = app(true).oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), 4096).await.expect("body");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert!(value["error"]
            .as_str()
            .unwrap_or_default()
            .starts_with("invalid request body"));
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let response = app(false)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.expect("body");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(value["status"], "ready");
    }

    #[tokio::test]
    async fn report_routes_are_mounted_alongside_health_checks() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/reports/lsw")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "generated_at": "2025-09-24T08:30:00" }).to_string(),
            ))
            .expect("request");

        let response = app(true).oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app(true)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
