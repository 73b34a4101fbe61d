use super::compliance::ComplianceSection;
use super::domain::{ReportKey, ReportStatus, SubmissionCutoff, TerminalInfo};
use super::lifecycle::SubmissionHistoryEntry;
use super::outlook::Outlook;
use super::tally::StatusTally;
use crate::fleet::{
    DriverStatus, EventSeverity, LoadEventType, LoadStatus, TrailerStatus, TruckStatus,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverStatusDetail {
    pub driver_id: String,
    pub name: String,
    pub status: DriverStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_truck_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverSection {
    pub present: usize,
    pub on_leave: usize,
    pub out_of_service: usize,
    pub in_training: usize,
    pub applications: usize,
    pub tally: StatusTally<DriverStatus>,
    pub details: Vec<DriverStatusDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruckStatusDetail {
    pub truck_id: String,
    pub identifier: String,
    pub status: TruckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_driver_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_return_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruckSection {
    pub assigned: usize,
    pub unseated: usize,
    pub maintenance: usize,
    pub out_of_service: usize,
    pub tally: StatusTally<TruckStatus>,
    pub details: Vec<TruckStatusDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrailerStatusDetail {
    pub trailer_id: String,
    pub identifier: String,
    pub status: TrailerStatus,
    pub location: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_truck_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrailerSection {
    pub at_terminal: usize,
    pub in_transit: usize,
    pub out_of_service: usize,
    pub dedicated: usize,
    pub tally: StatusTally<TrailerStatus>,
    pub details: Vec<TrailerStatusDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadStatusDetail {
    pub load_id: String,
    pub load_number: String,
    pub status: LoadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_driver_id: Option<String>,
    pub pickup_location: String,
    pub delivery_location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<NaiveDate>,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSection {
    pub picked_up: usize,
    pub in_transit: usize,
    pub delivered: usize,
    pub pending: usize,
    pub cancelled: usize,
    /// Sum of rates over delivered loads.
    pub revenue: f64,
    pub tally: StatusTally<LoadStatus>,
    pub details: Vec<LoadStatusDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub event_id: String,
    pub event_type: LoadEventType,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    pub severity: EventSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
    pub resolved: bool,
}

/// The LSW daily status report for one terminal and day.
///
/// Computed sections are replaced wholesale on refresh; `notes`, `status`,
/// the timestamps and `history` only change through lifecycle actions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStatusReport {
    pub terminal: TerminalInfo,
    pub report_date: NaiveDate,
    pub generated_at: NaiveDateTime,
    pub cutoff: SubmissionCutoff,
    pub drivers: DriverSection,
    pub trucks: TruckSection,
    pub trailers: TrailerSection,
    pub loads: LoadSection,
    pub events: Vec<EventSummary>,
    pub compliance: ComplianceSection,
    pub outlook: Outlook,
    pub notes: String,
    pub status: ReportStatus,
    pub is_late_submission: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_saved_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<NaiveDateTime>,
    pub history: Vec<SubmissionHistoryEntry>,
}

impl DailyStatusReport {
    pub fn key(&self) -> ReportKey {
        ReportKey::new(self.terminal.id.clone(), self.report_date)
    }

    pub fn is_submitted(&self) -> bool {
        self.status == ReportStatus::Submitted
    }
}
