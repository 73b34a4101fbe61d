//! Submission reminders and the notification log kept per deployment.

use super::domain::{ReportKey, SubmissionCutoff};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Sent notifications older than this are pruned from the log.
pub const NOTIFICATION_RETENTION_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Thirty minutes before the cutoff.
    EarlyReminder,
    /// Fifteen minutes before the cutoff.
    FinalReminder,
    DueNow,
    /// Thirty minutes past the cutoff.
    Overdue,
    SubmissionConfirmed,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::EarlyReminder => "Reminder",
            Self::FinalReminder => "Final reminder",
            Self::DueNow => "Due now",
            Self::Overdue => "Overdue",
            Self::SubmissionConfirmed => "Submission confirmed",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::EarlyReminder => "early-reminder",
            Self::FinalReminder => "final-reminder",
            Self::DueNow => "due-now",
            Self::Overdue => "overdue",
            Self::SubmissionConfirmed => "submission-confirmed",
        }
    }

    pub fn message(self, cutoff: SubmissionCutoff) -> String {
        match self {
            Self::EarlyReminder => format!(
                "Daily LSW status report due in 30 minutes ({cutoff}). Please prepare your submission."
            ),
            Self::FinalReminder => format!(
                "Daily LSW status report due in 15 minutes ({cutoff}). Please submit now."
            ),
            Self::DueNow => {
                "Daily LSW status report is now due. Please submit immediately.".to_string()
            }
            Self::Overdue => "Daily LSW status report is OVERDUE. Submit immediately - late submission will be noted.".to_string(),
            Self::SubmissionConfirmed => {
                "Daily LSW status report submitted successfully.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReminderSlot {
    pub kind: NotificationKind,
    pub at: NaiveTime,
}

/// Reminder times for one day, anchored on the submission cutoff.
///
/// With the default 09:30 cutoff the slots fall at 09:00, 09:15, 09:30 and
/// 10:00.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderSchedule {
    cutoff: SubmissionCutoff,
    slots: Vec<ReminderSlot>,
}

impl ReminderSchedule {
    pub fn for_cutoff(cutoff: SubmissionCutoff) -> Self {
        let deadline = cutoff.time();
        let offsets = [
            (NotificationKind::EarlyReminder, -30),
            (NotificationKind::FinalReminder, -15),
            (NotificationKind::DueNow, 0),
            (NotificationKind::Overdue, 30),
        ];
        let slots = offsets
            .into_iter()
            .map(|(kind, minutes)| ReminderSlot {
                kind,
                at: deadline.overflowing_add_signed(Duration::minutes(minutes)).0,
            })
            .collect();

        Self { cutoff, slots }
    }

    pub fn standard() -> Self {
        Self::for_cutoff(SubmissionCutoff::default())
    }

    pub fn cutoff(&self) -> SubmissionCutoff {
        self.cutoff
    }

    pub fn slots(&self) -> &[ReminderSlot] {
        &self.slots
    }

    /// Reminders whose time on `report_date` has been reached by `now`.
    ///
    /// Nothing is due once the report is submitted.
    pub fn due_notifications(
        &self,
        report_date: NaiveDate,
        now: NaiveDateTime,
        submitted: bool,
    ) -> Vec<NotificationKind> {
        if submitted {
            return Vec::new();
        }

        self.slots
            .iter()
            .filter(|slot| report_date.and_time(slot.at) <= now)
            .map(|slot| slot.kind)
            .collect()
    }

    /// Builds the notifications for every reminder due at `now`.
    pub fn notifications_due(
        &self,
        key: &ReportKey,
        now: NaiveDateTime,
        submitted: bool,
    ) -> Vec<ReportNotification> {
        self.due_notifications(key.report_date, now, submitted)
            .into_iter()
            .map(|kind| ReportNotification::new(key.clone(), kind, kind.message(self.cutoff), now))
            .collect()
    }
}

impl Default for ReminderSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportNotification {
    /// `{terminal}-{date}-{kind}`; at most one notification of a kind per report.
    pub id: String,
    pub report_key: ReportKey,
    pub kind: NotificationKind,
    pub message: String,
    pub sent_at: NaiveDateTime,
    pub acknowledged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged_at: Option<NaiveDateTime>,
}

impl ReportNotification {
    pub fn new(
        report_key: ReportKey,
        kind: NotificationKind,
        message: String,
        sent_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: format!("{report_key}-{}", kind.slug()),
            report_key,
            kind,
            message,
            sent_at,
            acknowledged: false,
            acknowledged_at: None,
        }
    }

    pub fn submission_confirmed(report_key: ReportKey, cutoff: SubmissionCutoff, at: NaiveDateTime) -> Self {
        let kind = NotificationKind::SubmissionConfirmed;
        Self::new(report_key, kind, kind.message(cutoff), at)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NotificationSummary {
    pub unacknowledged: usize,
    /// Unacknowledged overdue notices.
    pub overdue: usize,
    pub today: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationLog {
    notifications: Vec<ReportNotification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.notifications.iter().any(|sent| sent.id == id)
    }

    /// Stores `notification` unless one with the same id was already sent.
    pub fn record(&mut self, notification: ReportNotification) -> bool {
        if self.contains(&notification.id) {
            return false;
        }
        self.notifications.push(notification);
        true
    }

    /// Marks `id` read; false when no notification of `terminal_id` carries it.
    pub fn acknowledge(&mut self, terminal_id: &str, id: &str, at: NaiveDateTime) -> bool {
        match self
            .notifications
            .iter_mut()
            .find(|sent| sent.id == id && sent.report_key.terminal_id == terminal_id)
        {
            Some(notification) => {
                if !notification.acknowledged {
                    notification.acknowledged = true;
                    notification.acknowledged_at = Some(at);
                }
                true
            }
            None => false,
        }
    }

    /// Drops notifications sent more than seven days before `now`.
    pub fn prune(&mut self, now: NaiveDateTime) -> usize {
        let threshold = now - Duration::days(NOTIFICATION_RETENTION_DAYS);
        let before = self.notifications.len();
        self.notifications.retain(|sent| sent.sent_at > threshold);
        before - self.notifications.len()
    }

    pub fn summary(&self, terminal_id: &str, now: NaiveDateTime) -> NotificationSummary {
        let today = now.date();
        self.for_terminal(terminal_id)
            .fold(NotificationSummary::default(), |mut summary, sent| {
                if !sent.acknowledged {
                    summary.unacknowledged += 1;
                    if sent.kind == NotificationKind::Overdue {
                        summary.overdue += 1;
                    }
                }
                if sent.sent_at.date() == today {
                    summary.today += 1;
                }
                summary
            })
    }

    pub fn for_terminal<'a>(
        &'a self,
        terminal_id: &'a str,
    ) -> impl Iterator<Item = &'a ReportNotification> + 'a {
        self.notifications
            .iter()
            .filter(move |sent| sent.report_key.terminal_id == terminal_id)
    }

    pub fn all(&self) -> &[ReportNotification] {
        &self.notifications
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

/// Outbound delivery of report notifications (e-mail, push, chat adapters).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: &ReportNotification) -> Result<(), PublishError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
