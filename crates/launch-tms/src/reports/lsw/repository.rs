use chrono::NaiveDate;

use super::report::DailyStatusReport;

/// Storage abstraction for daily reports keyed by terminal and date.
pub trait ReportRepository: Send + Sync {
    /// Stores or replaces the draft for the report's key.
    ///
    /// Fails with [`RepositoryError::Conflict`] if the key is already submitted.
    fn save_draft(&self, report: DailyStatusReport) -> Result<(), RepositoryError>;
    /// Stores a submitted report. A key can be submitted once.
    fn submit(&self, report: DailyStatusReport) -> Result<(), RepositoryError>;
    fn fetch(
        &self,
        terminal_id: &str,
        report_date: NaiveDate,
    ) -> Result<Option<DailyStatusReport>, RepositoryError>;
    fn list(&self, terminal_id: &str) -> Result<Vec<DailyStatusReport>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("report already submitted")]
    Conflict,
    #[error("report not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
