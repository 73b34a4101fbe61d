use super::common::*;
use crate::reports::lsw::domain::{ReportSettings, ReportStatus};
use crate::reports::lsw::lifecycle::{HistoryAction, LifecycleError};
use crate::reports::lsw::notifications::NotificationKind;
use crate::reports::lsw::repository::{ReportRepository, RepositoryError};
use crate::reports::lsw::{DailyReportService, ReportServiceError};
use std::sync::Arc;

#[test]
fn generate_stores_draft_for_configured_terminal() {
    let (service, repository, _) = build_service();

    let report = service
        .generate(&snapshot(), report_date(), at(8, 0))
        .expect("generate succeeds");

    assert_eq!(report.terminal.id, "terminal-1");
    assert_eq!(report.status, ReportStatus::Draft);
    let stored = repository
        .fetch("terminal-1", report_date())
        .expect("fetch")
        .expect("draft stored");
    assert_eq!(stored, report);
}

#[test]
fn regenerate_refreshes_draft_and_keeps_notes() {
    let (service, _, _) = build_service();
    service
        .generate(&snapshot(), report_date(), at(8, 0))
        .expect("first generate");
    service
        .set_notes("terminal-1", report_date(), "Yard lights out".to_string(), at(8, 10))
        .expect("notes accepted");

    let mut changed = snapshot();
    changed.loads.clear();
    let refreshed = service
        .generate(&changed, report_date(), at(8, 20))
        .expect("refresh");

    assert_eq!(refreshed.notes, "Yard lights out");
    assert_eq!(refreshed.loads.tally.total(), 0);
    let actions: Vec<HistoryAction> = refreshed.history.iter().map(|entry| entry.action).collect();
    assert_eq!(
        actions,
        [HistoryAction::Created, HistoryAction::Updated, HistoryAction::Updated]
    );
}

#[test]
fn submit_publishes_confirmation_and_locks_report() {
    let (service, _, publisher) = build_service();
    service
        .generate(&snapshot(), report_date(), at(8, 0))
        .expect("generate");

    let submitted = service
        .submit("terminal-1", report_date(), at(9, 12))
        .expect("submit succeeds");
    assert_eq!(submitted.status, ReportStatus::Submitted);
    assert!(!submitted.is_late_submission);

    let sent = publisher.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::SubmissionConfirmed);

    match service.set_notes("terminal-1", report_date(), "too late".to_string(), at(9, 20)) {
        Err(ReportServiceError::Lifecycle(LifecycleError::AlreadySubmitted(key))) => {
            assert_eq!(key.terminal_id, "terminal-1");
        }
        other => panic!("expected already submitted, got {other:?}"),
    }
}

#[test]
fn second_submission_is_rejected() {
    let (service, _, _) = build_service();
    service
        .generate(&snapshot(), report_date(), at(8, 0))
        .expect("generate");
    service
        .submit("terminal-1", report_date(), at(9, 0))
        .expect("first submit");

    assert!(matches!(
        service.submit("terminal-1", report_date(), at(9, 5)),
        Err(ReportServiceError::Lifecycle(LifecycleError::AlreadySubmitted(_)))
    ));
    assert!(matches!(
        service.generate(&snapshot(), report_date(), at(9, 6)),
        Err(ReportServiceError::Lifecycle(LifecycleError::AlreadySubmitted(_)))
    ));
}

#[test]
fn repository_rejects_overwriting_submitted_report() {
    let (service, repository, _) = build_service();
    let draft = service
        .generate(&snapshot(), report_date(), at(8, 0))
        .expect("generate");
    service
        .submit("terminal-1", report_date(), at(9, 0))
        .expect("submit");

    assert!(matches!(
        repository.submit(draft),
        Err(RepositoryError::Conflict)
    ));
}

#[test]
fn late_submission_is_flagged() {
    let (service, _, _) = build_service();
    service
        .generate(&snapshot(), report_date(), at(8, 0))
        .expect("generate");

    let report = service
        .submit("terminal-1", report_date(), at(9, 31))
        .expect("submit");
    assert!(report.is_late_submission);

    let history = service.history("terminal-1").expect("history");
    assert_eq!(history.metrics.submitted_late, 1);
    assert_eq!(history.metrics.submitted_on_time, 0);
}

#[test]
fn get_missing_report_is_not_found() {
    let (service, _, _) = build_service();
    assert!(matches!(
        service.get("terminal-1", report_date()),
        Err(ReportServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn reminders_are_sent_once_and_stop_after_submission() {
    let (service, _, publisher) = build_service();
    service
        .generate(&snapshot(), report_date(), at(8, 0))
        .expect("generate");

    let first = service
        .dispatch_reminders("terminal-1", report_date(), at(9, 16))
        .expect("dispatch");
    assert_eq!(first.len(), 2);

    let repeat = service
        .dispatch_reminders("terminal-1", report_date(), at(9, 17))
        .expect("dispatch");
    assert!(repeat.is_empty());

    service
        .submit("terminal-1", report_date(), at(9, 25))
        .expect("submit");
    let after = service
        .dispatch_reminders("terminal-1", report_date(), at(10, 5))
        .expect("dispatch");
    assert!(after.is_empty());

    let kinds: Vec<NotificationKind> = publisher.sent().iter().map(|sent| sent.kind).collect();
    assert_eq!(
        kinds,
        [
            NotificationKind::EarlyReminder,
            NotificationKind::FinalReminder,
            NotificationKind::SubmissionConfirmed
        ]
    );

    let summary = service.notification_summary("terminal-1", at(10, 5));
    assert_eq!(summary.unacknowledged, 3);
    service
        .acknowledge("terminal-1", "terminal-1-2025-09-24-early-reminder", at(10, 6))
        .expect("known notification");
    assert_eq!(
        service.notification_summary("terminal-1", at(10, 6)).unacknowledged,
        2
    );
    assert!(matches!(
        service.acknowledge("terminal-1", "missing", at(10, 6)),
        Err(ReportServiceError::NotificationNotFound(_))
    ));
}

#[test]
fn notification_feed_is_scoped_to_its_terminal() {
    let (service, _, _) = build_service();
    let sent = service
        .dispatch_reminders("terminal-2", report_date(), at(10, 5))
        .expect("dispatch");
    assert_eq!(sent.len(), 4);

    let own = service.notification_summary("terminal-1", at(10, 5));
    assert_eq!(own.unacknowledged, 0);
    assert_eq!(own.overdue, 0);
    assert_eq!(own.today, 0);
    assert_eq!(
        service.notification_summary("terminal-2", at(10, 5)).unacknowledged,
        4
    );

    assert!(matches!(
        service.acknowledge("terminal-1", "terminal-2-2025-09-24-overdue", at(10, 6)),
        Err(ReportServiceError::NotificationNotFound(_))
    ));
    assert_eq!(service.notification_summary("terminal-2", at(10, 6)).overdue, 1);
}

#[test]
fn publish_failure_does_not_undo_submission() {
    let repository = Arc::new(MemoryRepository::default());
    let service = DailyReportService::new(
        repository.clone(),
        Arc::new(OfflinePublisher),
        ReportSettings::default(),
    );
    service
        .generate(&snapshot(), report_date(), at(8, 0))
        .expect("generate");

    let report = service
        .submit("terminal-1", report_date(), at(9, 0))
        .expect("submission survives publisher outage");
    assert!(report.is_submitted());
    assert!(service.notifications("terminal-1").is_empty());

    assert!(matches!(
        service.dispatch_reminders("terminal-2", report_date(), at(9, 5)),
        Err(ReportServiceError::Publish(_))
    ));
}

#[test]
fn repository_outage_propagates() {
    let service = DailyReportService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryPublisher::default()),
        ReportSettings::default(),
    );

    assert!(matches!(
        service.generate(&snapshot(), report_date(), at(8, 0)),
        Err(ReportServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}
