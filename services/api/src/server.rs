use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryNotificationPublisher, InMemoryReportRepository};
use crate::routes::with_report_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use launch_tms::config::AppConfig;
use launch_tms::error::AppError;
use launch_tms::reports::lsw::DailyReportService;
use launch_tms::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryReportRepository::default());
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let report_service = Arc::new(DailyReportService::new(
        repository,
        notifications,
        config.reporting.settings(),
    ));

    let app = with_report_routes(report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        terminal = %config.reporting.terminal.id,
        cutoff = %config.reporting.cutoff,
        "daily operations report service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
