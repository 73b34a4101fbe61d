use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::fleet::{
    Driver, DriverStatus, EventSeverity, FleetSnapshot, Load, LoadEvent, LoadEventType,
    LoadStatus, Location, Trailer, TrailerStatus, Truck, TruckStatus,
};
use crate::reports::lsw::domain::{ReportKey, ReportSettings};
use crate::reports::lsw::notifications::{
    NotificationPublisher, PublishError, ReportNotification,
};
use crate::reports::lsw::report::DailyStatusReport;
use crate::reports::lsw::repository::{ReportRepository, RepositoryError};
use crate::reports::lsw::{report_router, DailyReportService};

pub(super) fn report_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 24).expect("valid date")
}

pub(super) fn at(hour: u32, minute: u32) -> NaiveDateTime {
    report_date().and_hms_opt(hour, minute, 0).expect("valid time")
}

fn days(offset: i64) -> Option<NaiveDate> {
    Some(report_date() + Duration::days(offset))
}

fn driver(id: &str, status: DriverStatus, license_offset: Option<i64>) -> Driver {
    Driver {
        id: id.to_string(),
        first_name: "Dana".to_string(),
        last_name: id.to_uppercase(),
        status,
        license_expiry: license_offset.and_then(days),
        assigned_truck_id: None,
    }
}

fn truck(id: &str, status: TruckStatus) -> Truck {
    Truck {
        id: id.to_string(),
        make: "Freightliner".to_string(),
        model: "Cascadia".to_string(),
        year: Some(2022),
        license_plate: format!("IA-{id}"),
        status,
        next_maintenance_due: None,
        registration_expiry: None,
        insurance_expiry: None,
        assigned_driver_id: None,
    }
}

fn load(id: &str, status: LoadStatus, rate: f64) -> Load {
    Load {
        id: id.to_string(),
        load_number: format!("LD-{id}"),
        status,
        pickup_date: None,
        delivery_date: None,
        rate: Some(rate),
        pickup_location: Some(Location {
            city: "Des Moines".to_string(),
            state: "IA".to_string(),
            ..Location::default()
        }),
        delivery_location: Some(Location {
            city: "Omaha".to_string(),
            state: "NE".to_string(),
            ..Location::default()
        }),
        assigned_driver_id: None,
    }
}

pub(super) fn snapshot() -> FleetSnapshot {
    let mut t1 = truck("t1", TruckStatus::Assigned);
    t1.next_maintenance_due = days(-4);
    t1.assigned_driver_id = Some("d1".to_string());
    let mut t2 = truck("t2", TruckStatus::Available);
    t2.registration_expiry = days(30);
    let mut t3 = truck("t3", TruckStatus::Maintenance);
    t3.insurance_expiry = days(40);
    t3.next_maintenance_due = days(2);

    let mut delivered_today = load("l1", LoadStatus::Delivered, 100.0);
    delivered_today.delivery_date = days(0);
    let mut pending = load("l2", LoadStatus::Pending, 50.0);
    pending.pickup_date = days(0);
    pending.delivery_date = days(1);
    let mut delivered_yesterday = load("l3", LoadStatus::Delivered, 25.0);
    delivered_yesterday.delivery_date = days(-1);
    let mut cancelled = load("l4", LoadStatus::Cancelled, 500.0);
    cancelled.pickup_date = days(0);

    FleetSnapshot {
        drivers: vec![
            driver("d1", DriverStatus::Active, Some(10)),
            driver("d2", DriverStatus::OnLeave, Some(31)),
            driver("d3", DriverStatus::InTraining, Some(-1)),
            driver("d4", DriverStatus::Inactive, None),
        ],
        trucks: vec![t1, t2, t3],
        trailers: vec![
            Trailer {
                id: "tr1".to_string(),
                make: "Wabash".to_string(),
                model: "DuraPlate".to_string(),
                year: Some(2020),
                license_plate: "TR-1".to_string(),
                status: TrailerStatus::AtTerminal,
                assigned_truck_id: None,
            },
            Trailer {
                id: "tr2".to_string(),
                make: String::new(),
                model: String::new(),
                year: None,
                license_plate: String::new(),
                status: TrailerStatus::InTransit,
                assigned_truck_id: Some("t1".to_string()),
            },
        ],
        loads: vec![delivered_today, pending, delivered_yesterday, cancelled],
        events: vec![
            LoadEvent {
                id: "e1".to_string(),
                load_id: Some("l2".to_string()),
                driver_id: Some("d1".to_string()),
                event_type: LoadEventType::Accident,
                description: "Backed into dock door".to_string(),
                severity: EventSeverity::High,
                timestamp: Some(at(7, 15)),
                resolved: false,
            },
            LoadEvent {
                id: "e2".to_string(),
                load_id: Some("l1".to_string()),
                driver_id: None,
                event_type: LoadEventType::Spill,
                description: "Minor spill, cleaned".to_string(),
                severity: EventSeverity::Medium,
                timestamp: Some(at(6, 0) - Duration::days(2)),
                resolved: true,
            },
            LoadEvent {
                id: "e3".to_string(),
                load_id: None,
                driver_id: None,
                event_type: LoadEventType::Inspection,
                description: "Roadside level 2".to_string(),
                severity: EventSeverity::Low,
                timestamp: Some(at(8, 0)),
                resolved: true,
            },
        ],
    }
}

pub(super) fn build_service() -> (
    DailyReportService<MemoryRepository, MemoryPublisher>,
    Arc<MemoryRepository>,
    Arc<MemoryPublisher>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let publisher = Arc::new(MemoryPublisher::default());
    let service =
        DailyReportService::new(repository.clone(), publisher.clone(), ReportSettings::default());
    (service, repository, publisher)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) reports: Arc<Mutex<BTreeMap<ReportKey, DailyStatusReport>>>,
}

impl MemoryRepository {
    fn store(&self, report: DailyStatusReport) -> Result<(), RepositoryError> {
        let mut guard = self.reports.lock().expect("repository mutex poisoned");
        let key = report.key();
        if guard.get(&key).is_some_and(DailyStatusReport::is_submitted) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, report);
        Ok(())
    }
}

impl ReportRepository for MemoryRepository {
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
        let guard = self.reports.lock().expect("repository mutex poisoned");
        Ok(guard
            .get(&ReportKey::new(terminal_id, report_date))
            .cloned())
    }

    fn list(&self, terminal_id: &str) -> Result<Vec<DailyStatusReport>, RepositoryError> {
        let guard = self.reports.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|report| report.terminal.id == terminal_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryPublisher {
    sent: Arc<Mutex<Vec<ReportNotification>>>,
}

impl MemoryPublisher {
    pub(super) fn sent(&self) -> Vec<ReportNotification> {
        self.sent.lock().expect("publisher mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryPublisher {
    fn publish(&self, notification: &ReportNotification) -> Result<(), PublishError> {
        self.sent
            .lock()
            .expect("publisher mutex poisoned")
            .push(notification.clone());
        Ok(())
    }
}

pub(super) struct OfflinePublisher;

impl NotificationPublisher for OfflinePublisher {
    fn publish(&self, _notification: &ReportNotification) -> Result<(), PublishError> {
        Err(PublishError::Transport("smtp relay offline".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl ReportRepository for UnavailableRepository {
    fn save_draft(&self, _report: DailyStatusReport) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn submit(&self, _report: DailyStatusReport) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _terminal_id: &str,
        _report_date: NaiveDate,
    ) -> Result<Option<DailyStatusReport>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _terminal_id: &str) -> Result<Vec<DailyStatusReport>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn report_router_with_service(
    service: DailyReportService<MemoryRepository, MemoryPublisher>,
) -> axum::Router {
    report_router(Arc::new(service))
}
