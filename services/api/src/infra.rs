use chrono::{NaiveDate, NaiveTime};
use launch_tms::reports::lsw::{
    DailyStatusReport, NotificationPublisher, PublishError, ReportKey, ReportNotification,
    ReportRepository, RepositoryError, SubmissionCutoff,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    reports: Arc<Mutex<BTreeMap<ReportKey, DailyStatusReport>>>,
}

impl InMemoryReportRepository {
    fn guard(&self) -> Result<MutexGuard<'_, BTreeMap<ReportKey, DailyStatusReport>>, RepositoryError> {
        self.reports
            .lock()
            .map_err(|_| RepositoryError::Unavailable("report store mutex poisoned".to_string()))
    }

    fn store(&self, report: DailyStatusReport) -> Result<(), RepositoryError> {
        let mut guard = self.guard()?;
        let key = report.key();
        if guard.get(&key).is_some_and(DailyStatusReport::is_submitted) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, report);
        Ok(())
    }
}

impl ReportRepository for InMemoryReportRepository {
    fn save_draft(&self, report: DailyStatusReport) -> Result<(), RepositoryError> {
        self.store(report)
    }

    fn submit(&self, report: DailyStatusReport) -> Result<(), RepositoryError> {
        self.store(report)
    }

    fn fetch(
        &self,
        terminal_id: &str,
        report_date: NaiveDate,
    ) -> Result<Option<DailyStatusReport>, RepositoryError> {
        let guard = self.guard()?;
        Ok(guard.get(&ReportKey::new(terminal_id, report_date)).cloned())
    }

    fn list(&self, terminal_id: &str) -> Result<Vec<DailyStatusReport>, RepositoryError> {
        let guard = self.guard()?;
        Ok(guard
            .values()
            .filter(|report| report.terminal.id == terminal_id)
            .cloned()
            .collect())
    }
}

/// Publishes notifications to the service log and keeps a copy for the demo.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    sent: Arc<Mutex<Vec<ReportNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: &ReportNotification) -> Result<(), PublishError> {
        let mut guard = self
            .sent
            .lock()
            .map_err(|_| PublishError::Transport("notification mutex poisoned".to_string()))?;
        info!(
            id = %notification.id,
            kind = notification.kind.label(),
            "{}",
            notification.message
        );
        guard.push(notification.clone());
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn sent(&self) -> Vec<ReportNotification> {
        self.sent
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_clock(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
}

pub(crate) fn parse_cutoff(raw: &str) -> Result<SubmissionCutoff, String> {
    SubmissionCutoff::parse(raw).ok_or_else(|| format!("'{raw}' is not a valid HH:MM cutoff"))
}
