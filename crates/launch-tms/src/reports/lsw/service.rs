use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use super::builder::generate;
use super::domain::{ReportKey, ReportSettings};
use super::history::ReportHistory;
use super::lifecycle::LifecycleError;
use super::notifications::{
    NotificationLog, NotificationPublisher, NotificationSummary, PublishError, ReminderSchedule,
    ReportNotification,
};
use super::report::DailyStatusReport;
use super::repository::{ReportRepository, RepositoryError};
use crate::fleet::FleetSnapshot;

/// Service composing the report builder, repository, and notification publisher.
pub struct DailyReportService<R, N> {
    repository: Arc<R>,
    notifications: Arc<N>,
    settings: ReportSettings,
    schedule: ReminderSchedule,
    log: Mutex<NotificationLog>,
}

impl<R, N> DailyReportService<R, N>
where
    R: ReportRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifications: Arc<N>, settings: ReportSettings) -> Self {
        let schedule = ReminderSchedule::for_cutoff(settings.cutoff);
        Self {
            repository,
            notifications,
            settings,
            schedule,
            log: Mutex::new(NotificationLog::new()),
        }
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    pub fn schedule(&self) -> &ReminderSchedule {
        &self.schedule
    }

    /// Generate the report for the configured terminal and store it as the draft.
    ///
    /// An existing draft for the same day is refreshed so its notes and
    /// history survive; a submitted one is left untouched.
    pub fn generate(
        &self,
        snapshot: &FleetSnapshot,
        report_date: NaiveDate,
        generated_at: NaiveDateTime,
    ) -> Result<DailyStatusReport, ReportServiceError> {
        let context = self.settings.context(report_date, generated_at);
        let fresh = generate(snapshot, &context);

        let report = match self
            .repository
            .fetch(&context.terminal.id, report_date)?
        {
            Some(mut existing) => {
                existing.refresh(fresh)?;
                existing
            }
            None => fresh,
        };

        self.repository.save_draft(report.clone())?;
        info!(
            report = %report.key(),
            late = report.is_late_submission,
            alerts = report.compliance.alerts.len(),
            "daily report draft stored"
        );
        Ok(report)
    }

    pub fn set_notes(
        &self,
        terminal_id: &str,
        report_date: NaiveDate,
        notes: String,
        at: NaiveDateTime,
    ) -> Result<DailyStatusReport, ReportServiceError> {
        let mut report = self.get(terminal_id, report_date)?;
        report.set_notes(notes, at)?;
        self.repository.save_draft(report.clone())?;
        Ok(report)
    }

    pub fn save_draft(
        &self,
        terminal_id: &str,
        report_date: NaiveDate,
        at: NaiveDateTime,
    ) -> Result<DailyStatusReport, ReportServiceError> {
        let mut report = self.get(terminal_id, report_date)?;
        report.save_draft(at)?;
        self.repository.save_draft(report.clone())?;
        info!(report = %report.key(), "daily report draft saved");
        Ok(report)
    }

    /// Submit the stored draft. Submission is final for the report's key.
    pub fn submit(
        &self,
        terminal_id: &str,
        report_date: NaiveDate,
        at: NaiveDateTime,
    ) -> Result<DailyStatusReport, ReportServiceError> {
        let mut report = self.get(terminal_id, report_date)?;
        report.submit(at)?;
        self.repository.submit(report.clone())?;
        info!(
            report = %report.key(),
            late = report.is_late_submission,
            "daily report submitted"
        );

        let confirmation =
            ReportNotification::submission_confirmed(report.key(), report.cutoff, at);
        // The submission stays stored even when the confirmation cannot be delivered.
        if let Err(error) = self.record_and_publish(confirmation) {
            warn!(report = %report.key(), %error, "submission confirmation not delivered");
        }

        Ok(report)
    }

    pub fn get(
        &self,
        terminal_id: &str,
        report_date: NaiveDate,
    ) -> Result<DailyStatusReport, ReportServiceError> {
        let report = self
            .repository
            .fetch(terminal_id, report_date)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(report)
    }

    pub fn history(&self, terminal_id: &str) -> Result<ReportHistory, ReportServiceError> {
        let reports = self.repository.list(terminal_id)?;
        Ok(ReportHistory::from_reports(terminal_id, &reports))
    }

    /// Publish every reminder due at `now` that has not been sent yet.
    pub fn dispatch_reminders(
        &self,
        terminal_id: &str,
        report_date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Vec<ReportNotification>, ReportServiceError> {
        let submitted = self
            .repository
            .fetch(terminal_id, report_date)?
            .is_some_and(|report| report.is_submitted());
        let key = ReportKey::new(terminal_id, report_date);

        self.lock_log().prune(now);

        let mut sent = Vec::new();
        for notification in self.schedule.notifications_due(&key, now, submitted) {
            if self.record_and_publish(notification.clone())? {
                sent.push(notification);
            }
        }
        Ok(sent)
    }

    pub fn notifications(&self, terminal_id: &str) -> Vec<ReportNotification> {
        self.lock_log().for_terminal(terminal_id).cloned().collect()
    }

    pub fn notification_summary(&self, terminal_id: &str, now: NaiveDateTime) -> NotificationSummary {
        self.lock_log().summary(terminal_id, now)
    }

    /// Ids from another terminal's feed are reported as not found.
    pub fn acknowledge(
        &self,
        terminal_id: &str,
        notification_id: &str,
        at: NaiveDateTime,
    ) -> Result<(), ReportServiceError> {
        if self.lock_log().acknowledge(terminal_id, notification_id, at) {
            Ok(())
        } else {
            Err(ReportServiceError::NotificationNotFound(
                notification_id.to_string(),
            ))
        }
    }

    /// Returns false when the notification had already been sent.
    fn record_and_publish(&self, notification: ReportNotification) -> Result<bool, PublishError> {
        let mut log = self.lock_log();
        if log.contains(&notification.id) {
            return Ok(false);
        }
        self.notifications.publish(&notification)?;
        log.record(notification);
        Ok(true)
    }

    fn lock_log(&self) -> MutexGuard<'_, NotificationLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Error raised by the daily report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error("notification {0} not found")]
    NotificationNotFound(String),
}
