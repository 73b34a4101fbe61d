//! LSW daily status report: the morning roll-up a terminal manager submits
//! before the 09:30 cutoff.
//!
//! [`generate`] is a pure transform from a [`FleetSnapshot`](crate::fleet::FleetSnapshot)
//! and a [`ReportContext`] to a [`DailyStatusReport`]. The lifecycle, reminder,
//! repository, and HTTP layers are built around it.

mod builder;
pub mod compliance;
pub mod domain;
pub mod history;
pub mod lifecycle;
pub mod notifications;
pub mod outlook;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod tally;

#[cfg(test)]
mod tests;

pub use builder::generate;
pub use compliance::{
    ComplianceAlert, ComplianceSection, ComplianceSeverity, ComplianceTopic, DriverCompliance,
    SafetyIncidents, VehicleCompliance,
};
pub use domain::{
    ReportContext, ReportKey, ReportSettings, ReportStatus, SubmissionCutoff, TerminalInfo,
    COMPLIANCE_HORIZON_DAYS,
};
pub use history::{ReportHistory, ReportHistoryEntry, ReportMetrics};
pub use lifecycle::{reduce, HistoryAction, LifecycleError, ReportAction, SubmissionHistoryEntry};
pub use notifications::{
    NotificationKind, NotificationLog, NotificationPublisher, NotificationSummary, PublishError,
    ReminderSchedule, ReminderSlot, ReportNotification,
};
pub use outlook::{Outlook, OutlookDay};
pub use report::{
    DailyStatusReport, DriverSection, DriverStatusDetail, EventSummary, LoadSection,
    LoadStatusDetail, TrailerSection, TrailerStatusDetail, TruckSection, TruckStatusDetail,
};
pub use repository::{ReportRepository, RepositoryError};
pub use router::report_router;
pub use service::{DailyReportService, ReportServiceError};
pub use tally::{StatusTally, TallyEntry};
