use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid ticket: {0}")]
    Ticket(#[from] crate::error::TicketError),

    #[error("Schedule interpretation failed: {0}")]
    Schedule(#[from] crate::error::ScheduleError),

    #[error("Lag calculation failed: {0}")]
    Lag(#[from] crate::error::CronError),

    #[error("Timespan resolution failed: {0}")]
    Timespan(#[from] crate::error::TimespanError),

    #[error("Analytics store query failed: {0}")]
    Store(#[from] crate::error::StoreError),

    #[error("Writing artifacts failed: {0}")]
    Storage(#[from] crate::error::StorageError),
}

/// Non-fatal findings; the job is still produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineWarning {
    /// A requested field has no expression and renders as an empty column.
    UnmappedField { key: String, alias: String },
    UnknownAdvertiser,
    EmptySample,
}
