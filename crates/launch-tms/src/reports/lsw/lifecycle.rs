//! Draft/submitted lifecycle of a daily report.
//!
//! `DRAFT --submit--> SUBMITTED`; submitted reports are terminal and reject
//! every further action, including note edits.

use super::domain::{ReportKey, ReportStatus};
use super::report::DailyStatusReport;
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Created,
    Updated,
    AutoSaved,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionHistoryEntry {
    pub at: NaiveDateTime,
    pub action: HistoryAction,
}

#[derive(Debug, Clone)]
pub enum ReportAction {
    SetNotes { notes: String, at: NaiveDateTime },
    /// Replace computed sections with a freshly generated report for the same key.
    Refresh(Box<DailyStatusReport>),
    SaveDraft { at: NaiveDateTime },
    Submit { at: NaiveDateTime },
}

impl ReportAction {
    const fn name(&self) -> &'static str {
        match self {
            Self::SetNotes { .. } => "set_notes",
            Self::Refresh(_) => "refresh",
            Self::SaveDraft { .. } => "save_draft",
            Self::Submit { .. } => "submit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("report {0} has already been submitted")]
    AlreadySubmitted(ReportKey),
    #[error("cannot refresh report {expected} with data generated for {found}")]
    KeyMismatch { expected: ReportKey, found: ReportKey },
}

/// Applies `action` to `report`, returning the next state.
pub fn reduce(
    mut report: DailyStatusReport,
    action: ReportAction,
) -> Result<DailyStatusReport, LifecycleError> {
    report.apply(action)?;
    Ok(report)
}

impl DailyStatusReport {
    /// Applies `action` in place. On error the report is left untouched.
    pub fn apply(&mut self, action: ReportAction) -> Result<(), LifecycleError> {
        if self.status == ReportStatus::Submitted {
            warn!(report = %self.key(), action = action.name(), "rejected change to submitted report");
            return Err(LifecycleError::AlreadySubmitted(self.key()));
        }

        match action {
            ReportAction::SetNotes { notes, at } => {
                self.notes = notes;
                self.record(at, HistoryAction::Updated);
            }
            ReportAction::Refresh(fresh) => {
                let found = fresh.key();
                if found != self.key() {
                    return Err(LifecycleError::KeyMismatch {
                        expected: self.key(),
                        found,
                    });
                }

                let DailyStatusReport {
                    terminal,
                    generated_at,
                    cutoff,
                    drivers,
                    trucks,
                    trailers,
                    loads,
                    events,
                    compliance,
                    outlook,
                    is_late_submission,
                    ..
                } = *fresh;

                self.terminal = terminal;
                self.generated_at = generated_at;
                self.cutoff = cutoff;
                self.drivers = drivers;
                self.trucks = trucks;
                self.trailers = trailers;
                self.loads = loads;
                self.events = events;
                self.compliance = compliance;
                self.outlook = outlook;
                self.is_late_submission = is_late_submission;
                self.record(generated_at, HistoryAction::Updated);
            }
            ReportAction::SaveDraft { at } => {
                self.last_saved_at = Some(at);
                self.record(at, HistoryAction::AutoSaved);
            }
            ReportAction::Submit { at } => {
                self.status = ReportStatus::Submitted;
                self.submitted_at = Some(at);
                self.last_saved_at = Some(at);
                self.is_late_submission = self.cutoff.is_late(self.report_date, at);
                self.record(at, HistoryAction::Submitted);
            }
        }

        Ok(())
    }

    pub fn set_notes(
        &mut self,
        notes: impl Into<String>,
        at: NaiveDateTime,
    ) -> Result<(), LifecycleError> {
        self.apply(ReportAction::SetNotes {
            notes: notes.into(),
            at,
        })
    }

    pub fn refresh(&mut self, fresh: DailyStatusReport) -> Result<(), LifecycleError> {
        self.apply(ReportAction::Refresh(Box::new(fresh)))
    }

    pub fn save_draft(&mut self, at: NaiveDateTime) -> Result<(), LifecycleError> {
        self.apply(ReportAction::SaveDraft { at })
    }

    pub fn submit(&mut self, at: NaiveDateTime) -> Result<(), LifecycleError> {
        self.apply(ReportAction::Submit { at })
    }

    fn record(&mut self, at: NaiveDateTime, action: HistoryAction) {
        self.history.push(SubmissionHistoryEntry { at, action });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::FleetSnapshot;
    use crate::reports::lsw::domain::{ReportContext, TerminalInfo};
    use crate::reports::lsw::generate;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 24)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn draft(generated_at: NaiveDateTime) -> DailyStatusReport {
        let context = ReportContext::new(TerminalInfo::default(), generated_at);
        generate(&FleetSnapshot::default(), &context)
    }

    #[test]
    fn submit_moves_draft_to_submitted() {
        let report = draft(at(8, 0));
        let report = reduce(report, ReportAction::Submit { at: at(9, 10) }).expect("submit");

        assert_eq!(report.status, ReportStatus::Submitted);
        assert_eq!(report.submitted_at, Some(at(9, 10)));
        assert!(!report.is_late_submission);
        assert_eq!(
            report.history.last().map(|entry| entry.action),
            Some(HistoryAction::Submitted)
        );
    }

    #[test]
    fn notes_are_rejected_after_submission() {
        let mut report = draft(at(8, 0));
        report.set_notes("Two drivers out sick", at(8, 5)).expect("draft accepts notes");
        report.submit(at(9, 0)).expect("submit");

        let err = report
            .set_notes("late edit", at(9, 5))
            .expect_err("submitted report is locked");
        assert!(matches!(err, LifecycleError::AlreadySubmitted(_)));
        assert_eq!(report.notes, "Two drivers out sick");
    }

    #[test]
    fn resubmission_is_rejected() {
        let mut report = draft(at(8, 0));
        report.submit(at(9, 0)).expect("first submit");
        let history_len = report.history.len();

        assert!(report.submit(at(9, 1)).is_err());
        assert!(report.save_draft(at(9, 2)).is_err());
        assert_eq!(report.history.len(), history_len);
        assert_eq!(report.submitted_at, Some(at(9, 0)));
    }

    #[test]
    fn late_flag_freezes_at_submission_time() {
        let mut report = draft(at(8, 0));
        assert!(!report.is_late_submission);
        report.submit(at(9, 45)).expect("submit");
        assert!(report.is_late_submission);
    }

    #[test]
    fn refresh_keeps_notes_and_requires_matching_key() {
        let mut report = draft(at(8, 0));
        report.set_notes("keep me", at(8, 1)).expect("notes");

        report.refresh(draft(at(9, 40))).expect("same key refresh");
        assert_eq!(report.notes, "keep me");
        assert_eq!(report.generated_at, at(9, 40));
        assert!(report.is_late_submission);

        let other_day = draft(at(8, 0) + chrono::Duration::days(1));
        let err = report.refresh(other_day).expect_err("different day rejected");
        assert!(matches!(err, LifecycleError::KeyMismatch { .. }));
    }

    #[test]
    fn save_draft_records_timestamp() {
        let mut report = draft(at(8, 0));
        report.save_draft(at(8, 30)).expect("save");
        assert_eq!(report.last_saved_at, Some(at(8, 30)));
        assert_eq!(report.status, ReportStatus::Draft);
        assert_eq!(
            report.history.last().map(|entry| entry.action),
            Some(HistoryAction::AutoSaved)
        );
    }
}
