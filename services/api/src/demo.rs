use crate::infra::{InMemoryNotificationPublisher, InMemoryReportRepository};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;
use launch_tms::config::AppConfig;
use launch_tms::error::AppError;
use launch_tms::fleet::{FleetCsvImporter, FleetSnapshot, StatusKind};
use launch_tms::reports::lsw::{
    generate, DailyReportService, DailyStatusReport, ReportSettings, StatusTally,
    SubmissionCutoff,
};
use serde_json::json;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Fleet snapshot JSON (drivers, trucks, trailers, loads, events)
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Load template CSV; replaces the snapshot's loads
    #[arg(long)]
    pub(crate) loads_csv: Option<PathBuf>,
    /// Driver template CSV; replaces the snapshot's drivers
    #[arg(long)]
    pub(crate) drivers_csv: Option<PathBuf>,
    /// Report date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Generation time (HH:MM). Defaults to the current time.
    #[arg(long, value_parser = crate::infra::parse_clock)]
    pub(crate) at: Option<NaiveTime>,
    /// Override the configured submission cutoff (HH:MM)
    #[arg(long, value_parser = crate::infra::parse_cutoff)]
    pub(crate) cutoff: Option<SubmissionCutoff>,
    /// Include per-record detail rows in the output
    #[arg(long)]
    pub(crate) details: bool,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Report date for the sample terminal (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Submit after the cutoff to show the late flag.
    #[arg(long)]
    pub(crate) late: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        snapshot,
        loads_csv,
        drivers_csv,
        date,
        at,
        cutoff,
        details,
        json,
    } = args;

    let mut settings = AppConfig::load()?.reporting.settings();
    if let Some(cutoff) = cutoff {
        settings.cutoff = cutoff;
    }

    let snapshot = load_snapshot(snapshot, loads_csv, drivers_csv)?;
    let now = Local::now().naive_local();
    let report_date = date.unwrap_or(now.date());
    let generated_at = report_date.and_time(at.unwrap_or(now.time()));

    let report = generate(&snapshot, &settings.context(report_date, generated_at));
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report, details);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let report_date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let at = |hour: u32, minute: u32| -> NaiveDateTime {
        report_date.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN))
    };

    let settings = ReportSettings::default();
    let terminal_id = settings.terminal.id.clone();
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let service = DailyReportService::new(
        Arc::new(InMemoryReportRepository::default()),
        notifications.clone(),
        settings,
    );

    println!("LSW daily report demo");
    let snapshot = sample_snapshot(report_date)?;
    let draft = service.generate(&snapshot, report_date, at(8, 40))?;
    render_report(&draft, false);

    service.set_notes(
        &terminal_id,
        report_date,
        "Truck TRK003 waiting on brake parts; ETA Friday.".to_string(),
        at(8, 55),
    )?;
    service.save_draft(&terminal_id, report_date, at(9, 0))?;

    let reminder_check = if args.late { at(10, 5) } else { at(9, 20) };
    let reminders = service.dispatch_reminders(&terminal_id, report_date, reminder_check)?;
    println!("\nReminders sent by {}", reminder_check.format("%H:%M"));
    for reminder in &reminders {
        println!("  - [{}] {}", reminder.kind.label(), reminder.message);
    }

    let submitted_at = if args.late { at(10, 10) } else { at(9, 25) };
    let submitted = service.submit(&terminal_id, report_date, submitted_at)?;
    println!(
        "\nSubmitted at {} ({})",
        submitted_at.format("%H:%M"),
        if submitted.is_late_submission {
            "late"
        } else {
            "on time"
        }
    );
    println!("Submission history:");
    for entry in &submitted.history {
        println!("  - {} {:?}", entry.at.format("%H:%M"), entry.action);
    }

    let summary = service.notification_summary(&terminal_id, submitted_at);
    println!(
        "\nNotifications: {} unacknowledged | {} overdue | {} today",
        summary.unacknowledged, summary.overdue, summary.today
    );
    for notification in notifications.sent() {
        println!("  - {} -> {}", notification.id, notification.message);
    }

    let history = service.history(&terminal_id)?;
    println!(
        "\nCompliance: {}/{} on time ({:.0}%)",
        history.metrics.submitted_on_time, history.metrics.total, history.metrics.compliance_rate
    );

    Ok(())
}

fn load_snapshot(
    snapshot: Option<PathBuf>,
    loads_csv: Option<PathBuf>,
    drivers_csv: Option<PathBuf>,
) -> Result<FleetSnapshot, AppError> {
    let mut fleet = match snapshot {
        Some(path) => FleetSnapshot::from_json_reader(BufReader::new(File::open(path)?))?,
        None => FleetSnapshot::default(),
    };
    if let Some(path) = loads_csv {
        fleet.loads = FleetCsvImporter::loads_from_path(path)?;
    }
    if let Some(path) = drivers_csv {
        fleet.drivers = FleetCsvImporter::drivers_from_path(path)?;
    }
    Ok(fleet)
}

fn render_report(report: &DailyStatusReport, details: bool) {
    println!(
        "LSW daily status report: {} ({}) for {}",
        report.terminal.name,
        report.terminal.code,
        report.report_date.format("%Y-%m-%d")
    );
    println!(
        "Generated {} | cutoff {} | {}{}",
        report.generated_at.format("%H:%M"),
        report.cutoff,
        report.status.label(),
        if report.is_late_submission {
            " (late)"
        } else {
            ""
        }
    );

    println!(
        "\nDrivers: {} present | {} on leave | {} out of service | {} in training",
        report.drivers.present,
        report.drivers.on_leave,
        report.drivers.out_of_service,
        report.drivers.in_training
    );
    render_tally(&report.drivers.tally);
    println!(
        "Trucks: {} assigned | {} unseated | {} maintenance | {} out of service",
        report.trucks.assigned,
        report.trucks.unseated,
        report.trucks.maintenance,
        report.trucks.out_of_service
    );
    render_tally(&report.trucks.tally);
    println!(
        "Trailers: {} at terminal | {} in transit | {} out of service | {} dedicated",
        report.trailers.at_terminal,
        report.trailers.in_transit,
        report.trailers.out_of_service,
        report.trailers.dedicated
    );
    println!(
        "Loads: {} picked up | {} in transit | {} delivered | {} pending | {} cancelled | ${:.2} delivered revenue",
        report.loads.picked_up,
        report.loads.in_transit,
        report.loads.delivered,
        report.loads.pending,
        report.loads.cancelled,
        report.loads.revenue
    );

    println!("\nOutlook:");
    for day in report.outlook.days() {
        println!(
            "  - {}: {} pickups | {} deliveries | ${:.2} est. revenue",
            day.date.format("%a %Y-%m-%d"),
            day.expected_pickups,
            day.expected_deliveries,
            day.estimated_revenue
        );
    }

    let safety = &report.compliance.safety_incidents;
    println!(
        "\nSafety: {} accidents | {} spills | {} open NCRs | {} open incidents | {} inspections today",
        safety.accidents, safety.spills, safety.ncr_open, safety.open_incidents, safety.inspections_today
    );
    if report.compliance.alerts.is_empty() {
        println!(
            "Compliance alerts ({} day horizon): none",
            report.compliance.horizon_days
        );
    } else {
        println!(
            "Compliance alerts ({} day horizon):",
            report.compliance.horizon_days
        );
        for alert in &report.compliance.alerts {
            println!(
                "  - [{}] {} {}: {}",
                alert.severity_label, alert.topic_label, alert.subject_id, alert.detail
            );
        }
    }

    if !report.events.is_empty() {
        println!("Today's events:");
        for event in &report.events {
            println!(
                "  - {} {} ({}){}",
                event.event_id,
                event.event_type.label(),
                event.severity.label(),
                if event.resolved { " resolved" } else { "" }
            );
        }
    }

    if details {
        println!("\nDriver detail:");
        for driver in &report.drivers.details {
            println!("  - {} {} ({})", driver.driver_id, driver.name, driver.status.label());
        }
        println!("Truck detail:");
        for truck in &report.trucks.details {
            println!("  - {} ({})", truck.identifier, truck.status.label());
        }
        println!("Load detail:");
        for load in &report.loads.details {
            println!(
                "  - {} {} -> {} ({}) ${:.2}",
                load.load_number,
                load.pickup_location,
                load.delivery_location,
                load.status.label(),
                load.rate
            );
        }
    }

    if !report.notes.is_empty() {
        println!("\nNotes: {}", report.notes);
    }
}

fn render_tally<S: StatusKind>(tally: &StatusTally<S>) {
    let buckets: Vec<String> = tally
        .entries()
        .into_iter()
        .filter(|entry| entry.count > 0)
        .map(|entry| format!("{} {}", entry.count, entry.label))
        .collect();
    if !buckets.is_empty() {
        println!("  ({})", buckets.join(", "));
    }
}

fn sample_snapshot(report_date: NaiveDate) -> Result<FleetSnapshot, AppError> {
    let day = |offset: i64| {
        (report_date + chrono::Duration::days(offset))
            .format("%Y-%m-%d")
            .to_string()
    };

    let snapshot: FleetSnapshot = serde_json::from_value(json!({
        "drivers": [
            { "id": "DRV001", "firstName": "John", "lastName": "Smith", "status": "active", "licenseExpiry": day(400), "assignedTruckId": "TRK001" },
            { "id": "DRV002", "firstName": "Maria", "lastName": "Garcia", "status": "active", "licenseExpiry": day(21), "assignedTruckId": "TRK002" },
            { "id": "DRV003", "firstName": "Michael", "lastName": "Johnson", "status": "in_training", "licenseExpiry": day(200) },
            { "id": "DRV004", "firstName": "Priya", "lastName": "Patel", "status": "on_leave", "licenseExpiry": day(90) }
        ],
        "trucks": [
            { "id": "TRK001", "make": "Freightliner", "model": "Cascadia", "year": 2022, "licensePlate": "IA-4821", "status": "assigned", "assignedDriverId": "DRV001", "nextMaintenanceDue": day(45) },
            { "id": "TRK002", "make": "Volvo", "model": "VNL 860", "year": 2021, "licensePlate": "IA-7710", "status": "assigned", "assignedDriverId": "DRV002", "registrationExpiry": day(12) },
            { "id": "TRK003", "make": "Kenworth", "model": "T680", "year": 2019, "licensePlate": "IA-3304", "status": "maintenance", "nextMaintenanceDue": day(-3) }
        ],
        "trailers": [
            { "id": "TRL101", "status": "at-terminal" },
            { "id": "TRL102", "status": "in-transit", "assignedTruckId": "TRK001" },
            { "id": "TRL103", "status": "dedicated" }
        ],
        "loads": [
            { "id": "L-1001", "loadNumber": "LD-1001", "status": "delivered", "rate": 1850.5, "pickupDate": day(-1), "deliveryDate": day(0), "assignedDriverId": "DRV001" },
            { "id": "L-1002", "loadNumber": "LD-1002", "status": "in_transit", "rate": 2400.0, "pickupDate": day(0), "deliveryDate": day(1), "assignedDriverId": "DRV002" },
            { "id": "L-1003", "loadNumber": "LD-1003", "status": "pending", "rate": 1325.0, "pickupDate": day(1), "deliveryDate": day(2) }
        ],
        "events": [
            { "id": "EVT-1", "loadId": "L-1002", "driverId": "DRV002", "type": "inspection", "description": "Roadside level 2 inspection", "severity": "low", "timestamp": format!("{}T07:15:00", day(0)), "resolved": true }
        ]
    }))?;

    Ok(snapshot)
}
