use super::domain::COMPLIANCE_HORIZON_DAYS;
use crate::fleet::{Driver, LoadEvent, LoadEventType, Truck};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceSeverity {
    Warning,
    Critical,
}

impl ComplianceSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceTopic {
    LicenseExpiry,
    MaintenanceOverdue,
    RegistrationExpiry,
    InsuranceExpiry,
    SafetyIncident,
}

impl ComplianceTopic {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LicenseExpiry => "Driver license",
            Self::MaintenanceOverdue => "Preventive maintenance",
            Self::RegistrationExpiry => "Vehicle registration",
            Self::InsuranceExpiry => "Vehicle insurance",
            Self::SafetyIncident => "Safety incident",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceAlert {
    pub subject_id: String,
    pub topic: ComplianceTopic,
    pub topic_label: &'static str,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<NaiveDate>,
    pub severity: ComplianceSeverity,
    pub severity_label: &'static str,
}

impl ComplianceAlert {
    fn new(
        subject_id: &str,
        topic: ComplianceTopic,
        detail: String,
        due_on: Option<NaiveDate>,
        severity: ComplianceSeverity,
    ) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            topic,
            topic_label: topic.label(),
            detail,
            due_on,
            severity,
            severity_label: severity.label(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriverCompliance {
    pub license_expirations: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VehicleCompliance {
    pub maintenance_overdue: usize,
    pub registration_expirations: usize,
    pub insurance_expirations: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SafetyIncidents {
    pub accidents: usize,
    pub spills: usize,
    pub ncr_open: usize,
    pub open_incidents: usize,
    pub inspections_today: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceSection {
    pub horizon_days: i64,
    pub driver_compliance: DriverCompliance,
    pub vehicle_compliance: VehicleCompliance,
    pub safety_incidents: SafetyIncidents,
    pub alerts: Vec<ComplianceAlert>,
}

impl ComplianceSection {
    pub fn critical_alerts(&self) -> usize {
        self.alerts
            .iter()
            .filter(|alert| alert.severity == ComplianceSeverity::Critical)
            .count()
    }
}

/// Expiry windows are inclusive: a date exactly on the horizon is flagged.
pub(crate) fn evaluate(
    drivers: &[Driver],
    trucks: &[Truck],
    events: &[LoadEvent],
    report_date: NaiveDate,
) -> ComplianceSection {
    let horizon = report_date + Duration::days(COMPLIANCE_HORIZON_DAYS);
    let mut alerts = Vec::new();

    let mut driver_compliance = DriverCompliance::default();
    for driver in drivers {
        if let Some(expiry) = driver.license_expiry.filter(|expiry| *expiry <= horizon) {
            driver_compliance.license_expirations += 1;
            alerts.push(ComplianceAlert::new(
                &driver.id,
                ComplianceTopic::LicenseExpiry,
                expiry_detail(&driver.display_name(), "license", expiry, report_date),
                Some(expiry),
                expiry_severity(expiry, report_date),
            ));
        }
    }

    let mut vehicle_compliance = VehicleCompliance::default();
    for truck in trucks {
        if let Some(due) = truck.next_maintenance_due.filter(|due| *due <= report_date) {
            vehicle_compliance.maintenance_overdue += 1;
            alerts.push(ComplianceAlert::new(
                &truck.id,
                ComplianceTopic::MaintenanceOverdue,
                format!("{} maintenance was due {}", truck.identifier(), due),
                Some(due),
                expiry_severity(due, report_date),
            ));
        }

        if let Some(expiry) = truck.registration_expiry.filter(|expiry| *expiry <= horizon) {
            vehicle_compliance.registration_expirations += 1;
            alerts.push(ComplianceAlert::new(
                &truck.id,
                ComplianceTopic::RegistrationExpiry,
                expiry_detail(&truck.identifier(), "registration", expiry, report_date),
                Some(expiry),
                expiry_severity(expiry, report_date),
            ));
        }

        if let Some(expiry) = truck.insurance_expiry.filter(|expiry| *expiry <= horizon) {
            vehicle_compliance.insurance_expirations += 1;
            alerts.push(ComplianceAlert::new(
                &truck.id,
                ComplianceTopic::InsuranceExpiry,
                expiry_detail(&truck.identifier(), "insurance", expiry, report_date),
                Some(expiry),
                expiry_severity(expiry, report_date),
            ));
        }
    }

    let mut safety_incidents = SafetyIncidents::default();
    for event in events {
        let occurred_on = event.occurred_on();
        if event.event_type == LoadEventType::Inspection && occurred_on == Some(report_date) {
            safety_incidents.inspections_today += 1;
        }

        // Events dated after the report day belong to a later report.
        if event.resolved || occurred_on.is_some_and(|day| day > report_date) {
            continue;
        }

        let tracked = match event.event_type {
            LoadEventType::Accident => {
                safety_incidents.accidents += 1;
                true
            }
            LoadEventType::Spill => {
                safety_incidents.spills += 1;
                true
            }
            LoadEventType::Ncr | LoadEventType::Contamination => {
                safety_incidents.ncr_open += 1;
                true
            }
            _ => false,
        };

        let serious = event.severity.is_serious();
        if serious {
            safety_incidents.open_incidents += 1;
        }

        if tracked || serious {
            let severity = if serious {
                ComplianceSeverity::Critical
            } else {
                ComplianceSeverity::Warning
            };
            alerts.push(ComplianceAlert::new(
                &event.id,
                ComplianceTopic::SafetyIncident,
                event_detail(event),
                occurred_on,
                severity,
            ));
        }
    }

    alerts.sort_by(|a, b| {
        a.due_on
            .cmp(&b.due_on)
            .then_with(|| a.subject_id.cmp(&b.subject_id))
    });

    ComplianceSection {
        horizon_days: COMPLIANCE_HORIZON_DAYS,
        driver_compliance,
        vehicle_compliance,
        safety_incidents,
        alerts,
    }
}

fn expiry_severity(date: NaiveDate, report_date: NaiveDate) -> ComplianceSeverity {
    if date < report_date {
        ComplianceSeverity::Critical
    } else {
        ComplianceSeverity::Warning
    }
}

fn expiry_detail(subject: &str, document: &str, expiry: NaiveDate, report_date: NaiveDate) -> String {
    let days = (expiry - report_date).num_days();
    match days {
        d if d < 0 => format!("{subject} {document} expired {expiry} ({} days ago)", -d),
        0 => format!("{subject} {document} expires today"),
        1 => format!("{subject} {document} expires tomorrow ({expiry})"),
        d => format!("{subject} {document} expires {expiry} (in {d} days)"),
    }
}

fn event_detail(event: &LoadEvent) -> String {
    let mut detail = format!(
        "Unresolved {} ({})",
        event.event_type.label().to_lowercase(),
        event.severity.label().to_lowercase()
    );
    if let Some(load_id) = &event.load_id {
        detail.push_str(&format!(" on load {load_id}"));
    }
    if !event.description.trim().is_empty() {
        detail.push_str(": ");
        detail.push_str(event.description.trim());
    }
    detail
}
