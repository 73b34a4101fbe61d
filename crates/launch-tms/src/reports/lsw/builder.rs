use super::compliance;
use super::domain::{ReportContext, ReportStatus};
use super::lifecycle::{HistoryAction, SubmissionHistoryEntry};
use super::outlook;
use super::report::{
    DailyStatusReport, DriverSection, DriverStatusDetail, EventSummary, LoadSection,
    LoadStatusDetail, TrailerSection, TrailerStatusDetail, TruckSection, TruckStatusDetail,
};
use super::tally::StatusTally;
use crate::fleet::{
    Driver, DriverStatus, FleetSnapshot, Load, LoadEvent, LoadStatus, Trailer, TrailerStatus,
    Truck, TruckStatus,
};
use tracing::debug;

/// Builds the daily report for `context` from a fleet snapshot.
///
/// Pure: identical inputs always produce an identical report. The result
/// starts as a draft whose late flag reflects `context.generated_at`.
pub fn generate(snapshot: &FleetSnapshot, context: &ReportContext) -> DailyStatusReport {
    let drivers = driver_section(&snapshot.drivers);
    let trucks = truck_section(&snapshot.trucks);
    let trailers = trailer_section(&snapshot.trailers);
    let loads = load_section(&snapshot.loads);
    let events = events_on_report_day(&snapshot.events, context);
    let compliance = compliance::evaluate(
        &snapshot.drivers,
        &snapshot.trucks,
        &snapshot.events,
        context.report_date,
    );
    let outlook = outlook::project(
        &snapshot.loads,
        context.report_date,
        drivers.present,
        trucks.assigned,
    );
    let is_late_submission = context
        .cutoff
        .is_late(context.report_date, context.generated_at);

    debug!(
        terminal = %context.terminal.id,
        report_date = %context.report_date,
        drivers = drivers.tally.total(),
        trucks = trucks.tally.total(),
        trailers = trailers.tally.total(),
        loads = loads.tally.total(),
        alerts = compliance.alerts.len(),
        late = is_late_submission,
        "generated daily status report"
    );

    DailyStatusReport {
        terminal: context.terminal.clone(),
        report_date: context.report_date,
        generated_at: context.generated_at,
        cutoff: context.cutoff,
        drivers,
        trucks,
        trailers,
        loads,
        events,
        compliance,
        outlook,
        notes: String::new(),
        status: ReportStatus::Draft,
        is_late_submission,
        last_saved_at: None,
        submitted_at: None,
        history: vec![SubmissionHistoryEntry {
            at: context.generated_at,
            action: HistoryAction::Created,
        }],
    }
}

fn driver_section(drivers: &[Driver]) -> DriverSection {
    let tally = StatusTally::from_statuses(drivers.iter().map(|driver| driver.status));
    let details = drivers
        .iter()
        .map(|driver| DriverStatusDetail {
            driver_id: driver.id.clone(),
            name: driver.display_name(),
            status: driver.status,
            assigned_truck_id: driver.assigned_truck_id.clone(),
        })
        .collect();

    DriverSection {
        present: tally.count(DriverStatus::Active),
        on_leave: tally.count(DriverStatus::OnLeave),
        out_of_service: tally.count(DriverStatus::Terminated),
        in_training: tally.count(DriverStatus::InTraining),
        applications: tally.count(DriverStatus::Inactive),
        tally,
        details,
    }
}

fn truck_section(trucks: &[Truck]) -> TruckSection {
    let tally = StatusTally::from_statuses(trucks.iter().map(|truck| truck.status));
    let details = trucks
        .iter()
        .map(|truck| {
            let in_shop = truck.status == TruckStatus::Maintenance;
            TruckStatusDetail {
                truck_id: truck.id.clone(),
                identifier: truck.identifier(),
                status: truck.status,
                assigned_driver_id: truck.assigned_driver_id.clone(),
                maintenance_notes: in_shop.then(|| "Scheduled maintenance".to_string()),
                estimated_return_date: truck.next_maintenance_due.filter(|_| in_shop),
            }
        })
        .collect();

    TruckSection {
        assigned: tally.count(TruckStatus::Assigned),
        unseated: tally.count(TruckStatus::Available),
        maintenance: tally.count(TruckStatus::Maintenance),
        out_of_service: tally.count(TruckStatus::OutOfService),
        tally,
        details,
    }
}

fn trailer_section(trailers: &[Trailer]) -> TrailerSection {
    let tally = StatusTally::from_statuses(trailers.iter().map(|trailer| trailer.status));
    let details = trailers
        .iter()
        .map(|trailer| TrailerStatusDetail {
            trailer_id: trailer.id.clone(),
            identifier: trailer.identifier(),
            status: trailer.status,
            location: trailer_location(trailer.status),
            assigned_truck_id: trailer.assigned_truck_id.clone(),
        })
        .collect();

    TrailerSection {
        at_terminal: tally.count(TrailerStatus::AtTerminal),
        in_transit: tally.count(TrailerStatus::InTransit),
        out_of_service: tally.count(TrailerStatus::OutOfService),
        dedicated: tally.count(TrailerStatus::Dedicated),
        tally,
        details,
    }
}

fn trailer_location(status: TrailerStatus) -> &'static str {
    match status {
        TrailerStatus::AtTerminal | TrailerStatus::OutOfService => "Terminal",
        TrailerStatus::InTransit => "In Transit",
        TrailerStatus::Dedicated => "Dedicated Route",
    }
}

fn load_section(loads: &[Load]) -> LoadSection {
    let tally = StatusTally::from_statuses(loads.iter().map(|load| load.status));
    let revenue: f64 = loads
        .iter()
        .filter(|load| load.status == LoadStatus::Delivered)
        .map(Load::rate_or_zero)
        .sum();
    let details = loads
        .iter()
        .map(|load| LoadStatusDetail {
            load_id: load.id.clone(),
            load_number: load.load_number.clone(),
            status: load.status,
            assigned_driver_id: load.assigned_driver_id.clone(),
            pickup_location: load.pickup_label(),
            delivery_location: load.delivery_label(),
            estimated_delivery: load.delivery_date,
            rate: load.rate_or_zero(),
        })
        .collect();

    LoadSection {
        picked_up: tally.count(LoadStatus::PickedUp),
        in_transit: tally.count_any(&[LoadStatus::InTransit, LoadStatus::Delivering]),
        delivered: tally.count(LoadStatus::Delivered),
        pending: tally.count_any(&[LoadStatus::Pending, LoadStatus::Assigned]),
        cancelled: tally.count(LoadStatus::Cancelled),
        revenue,
        tally,
        details,
    }
}

fn events_on_report_day(events: &[LoadEvent], context: &ReportContext) -> Vec<EventSummary> {
    let mut todays: Vec<&LoadEvent> = events
        .iter()
        .filter(|event| event.occurred_on() == Some(context.report_date))
        .collect();
    todays.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

    todays
        .into_iter()
        .map(|event| EventSummary {
            event_id: event.id.clone(),
            event_type: event.event_type,
            description: event.description.clone(),
            load_id: event.load_id.clone(),
            driver_id: event.driver_id.clone(),
            severity: event.severity,
            timestamp: event.timestamp,
            resolved: event.resolved,
        })
        .collect()
}
