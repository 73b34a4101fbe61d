use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expirations falling within this many days of the report date are flagged.
pub const COMPLIANCE_HORIZON_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalInfo {
    pub id: String,
    pub name: String,
    pub code: String,
}

impl Default for TerminalInfo {
    fn default() -> Self {
        Self {
            id: "terminal-1".to_string(),
            name: "Main Terminal".to_string(),
            code: "MT01".to_string(),
        }
    }
}

/// One report exists per terminal per day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportKey {
    pub terminal_id: String,
    pub report_date: NaiveDate,
}

impl ReportKey {
    pub fn new(terminal_id: impl Into<String>, report_date: NaiveDate) -> Self {
        Self {
            terminal_id: terminal_id.into(),
            report_date,
        }
    }
}

impl fmt::Display for ReportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.terminal_id, self.report_date.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    Submitted,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
        }
    }
}

/// Daily submission deadline, 09:30 unless configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmissionCutoff {
    hour: u32,
    minute: u32,
}

impl SubmissionCutoff {
    pub const fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Parses `HH:MM`.
    pub fn parse(raw: &str) -> Option<Self> {
        let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()?;
        Self::new(time.hour(), time.minute())
    }

    pub const fn hour(self) -> u32 {
        self.hour
    }

    pub const fn minute(self) -> u32 {
        self.minute
    }

    pub fn time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn deadline(self, report_date: NaiveDate) -> NaiveDateTime {
        report_date.and_time(self.time())
    }

    /// True once `at` is strictly past the deadline for `report_date`.
    pub fn is_late(self, report_date: NaiveDate, at: NaiveDateTime) -> bool {
        at > self.deadline(report_date)
    }
}

impl Default for SubmissionCutoff {
    fn default() -> Self {
        Self {
            hour: 9,
            minute: 30,
        }
    }
}

impl fmt::Display for SubmissionCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Inputs besides the fleet snapshot that determine a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub terminal: TerminalInfo,
    pub report_date: NaiveDate,
    pub generated_at: NaiveDateTime,
    pub cutoff: SubmissionCutoff,
}

impl ReportContext {
    pub fn new(terminal: TerminalInfo, generated_at: NaiveDateTime) -> Self {
        Self {
            terminal,
            report_date: generated_at.date(),
            generated_at,
            cutoff: SubmissionCutoff::default(),
        }
    }

    pub fn with_report_date(mut self, report_date: NaiveDate) -> Self {
        self.report_date = report_date;
        self
    }

    pub fn with_cutoff(mut self, cutoff: SubmissionCutoff) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn key(&self) -> ReportKey {
        ReportKey::new(self.terminal.id.clone(), self.report_date)
    }
}

/// Per-deployment defaults used when a caller only supplies a date and clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSettings {
    pub terminal: TerminalInfo,
    pub cutoff: SubmissionCutoff,
}

impl ReportSettings {
    pub fn context(&self, report_date: NaiveDate, generated_at: NaiveDateTime) -> ReportContext {
        ReportContext::new(self.terminal.clone(), generated_at)
            .with_report_date(report_date)
            .with_cutoff(self.cutoff)
    }
}
