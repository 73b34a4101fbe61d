use super::domain::ReportStatus;
use super::report::DailyStatusReport;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One row of a terminal's report history, newest first when listed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportHistoryEntry {
    pub report_date: NaiveDate,
    pub terminal_id: String,
    pub status: ReportStatus,
    pub status_label: &'static str,
    pub is_late_submission: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<NaiveDateTime>,
    pub delivered_loads: usize,
    pub revenue: f64,
    pub critical_alerts: usize,
}

impl ReportHistoryEntry {
    pub fn from_report(report: &DailyStatusReport) -> Self {
        Self {
            report_date: report.report_date,
            terminal_id: report.terminal.id.clone(),
            status: report.status,
            status_label: report.status.label(),
            is_late_submission: report.is_late_submission,
            submitted_at: report.submitted_at,
            delivered_loads: report.loads.delivered,
            revenue: report.loads.revenue,
            critical_alerts: report.compliance.critical_alerts(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReportMetrics {
    pub total: usize,
    pub submitted_on_time: usize,
    pub submitted_late: usize,
    pub outstanding: usize,
    /// Percentage of all reports submitted on time; 0 with no reports.
    pub compliance_rate: f64,
}

impl ReportMetrics {
    pub fn from_reports<'a>(reports: impl IntoIterator<Item = &'a DailyStatusReport>) -> Self {
        let mut metrics = reports
            .into_iter()
            .fold(Self::default(), |mut metrics, report| {
                metrics.total += 1;
                match (report.status, report.is_late_submission) {
                    (ReportStatus::Submitted, false) => metrics.submitted_on_time += 1,
                    (ReportStatus::Submitted, true) => metrics.submitted_late += 1,
                    (ReportStatus::Draft, _) => metrics.outstanding += 1,
                }
                metrics
            });

        if metrics.total > 0 {
            metrics.compliance_rate =
                metrics.submitted_on_time as f64 * 100.0 / metrics.total as f64;
        }
        metrics
    }
}

/// History rows plus metrics for one terminal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportHistory {
    pub terminal_id: String,
    pub metrics: ReportMetrics,
    pub reports: Vec<ReportHistoryEntry>,
}

impl ReportHistory {
    pub fn from_reports(terminal_id: impl Into<String>, reports: &[DailyStatusReport]) -> Self {
        let mut rows: Vec<ReportHistoryEntry> =
            reports.iter().map(ReportHistoryEntry::from_report).collect();
        rows.sort_by(|a, b| b.report_date.cmp(&a.report_date));

        Self {
            terminal_id: terminal_id.into(),
            metrics: ReportMetrics::from_reports(reports),
            reports: rows,
        }
    }
}
