use chrono::{NaiveDate, NaiveDateTime};
use launch_tms::fleet::FleetSnapshot;
use launch_tms::reports::lsw::{
    generate, reduce, HistoryAction, LifecycleError, NotificationKind, ReminderSchedule,
    ReportAction, ReportContext, ReportStatus, TerminalInfo,
};

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, 24)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

fn context(generated_at: NaiveDateTime) -> ReportContext {
    ReportContext::new(
        TerminalInfo {
            id: "terminal-9".to_string(),
            name: "Council Bluffs".to_string(),
            code: "CB09".to_string(),
        },
        generated_at,
    )
}

#[test]
fn reducer_walks_draft_to_submitted() {
    let draft = generate(&FleetSnapshot::default(), &context(at(8, 0)));
    assert_eq!(draft.status, ReportStatus::Draft);

    let report = [
        ReportAction::SetNotes {
            notes: "Reefer unit 12 down".to_string(),
            at: at(8, 5),
        },
        ReportAction::SaveDraft { at: at(8, 30) },
        ReportAction::Refresh(Box::new(generate(
            &FleetSnapshot::default(),
            &context(at(9, 0)),
        ))),
        ReportAction::Submit { at: at(9, 20) },
    ]
    .into_iter()
    .try_fold(draft, reduce)
    .expect("every action accepted while draft");

    assert_eq!(report.status, ReportStatus::Submitted);
    assert_eq!(report.notes, "Reefer unit 12 down");
    assert_eq!(report.submitted_at, Some(at(9, 20)));
    assert!(!report.is_late_submission);

    let actions: Vec<HistoryAction> = report.history.iter().map(|entry| entry.action).collect();
    assert_eq!(
        actions,
        [
            HistoryAction::Created,
            HistoryAction::Updated,
            HistoryAction::AutoSaved,
            HistoryAction::Updated,
            HistoryAction::Submitted,
        ]
    );
}

#[test]
fn submitted_report_rejects_every_action() {
    let draft = generate(&FleetSnapshot::default(), &context(at(8, 0)));
    let submitted = reduce(draft, ReportAction::Submit { at: at(9, 0) }).expect("submit");

    let attempts = [
        ReportAction::SetNotes {
            notes: "after the fact".to_string(),
            at: at(9, 1),
        },
        ReportAction::SaveDraft { at: at(9, 2) },
        ReportAction::Submit { at: at(9, 3) },
        ReportAction::Refresh(Box::new(generate(
            &FleetSnapshot::default(),
            &context(at(9, 4)),
        ))),
    ];

    for action in attempts {
        match reduce(submitted.clone(), action) {
            Err(LifecycleError::AlreadySubmitted(key)) => {
                assert_eq!(key.to_string(), "terminal-9-2025-09-24");
            }
            other => panic!("expected already submitted, got {other:?}"),
        }
    }
}

#[test]
fn draft_generated_late_can_still_be_submitted() {
    let draft = generate(&FleetSnapshot::default(), &context(at(11, 0)));
    assert!(draft.is_late_submission);

    let submitted = reduce(draft, ReportAction::Submit { at: at(11, 5) }).expect("submit");
    assert!(submitted.is_late_submission);
}

#[test]
fn reminders_stop_after_submission() {
    let schedule = ReminderSchedule::standard();
    let draft = generate(&FleetSnapshot::default(), &context(at(8, 0)));

    let due = schedule.due_notifications(draft.report_date, at(9, 30), draft.is_submitted());
    assert_eq!(
        due,
        [
            NotificationKind::EarlyReminder,
            NotificationKind::FinalReminder,
            NotificationKind::DueNow,
        ]
    );

    let submitted = reduce(draft, ReportAction::Submit { at: at(9, 31) }).expect("submit");
    assert!(schedule
        .due_notifications(submitted.report_date, at(10, 30), submitted.is_submitted())
        .is_empty());
}
