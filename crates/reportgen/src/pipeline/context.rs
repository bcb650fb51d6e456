use chrono::NaiveDate;

use crate::columns::ColumnSet;
use crate::job::{JobDefinition, ValidationQuery};
use crate::schedule::{CronExpression, Lag};
use crate::ticket::TicketRequest;
use crate::timespan::Timespan;

use super::error::PipelineWarning;

/// Input of one translation run.
pub struct PipelineContext {
    pub request: TicketRequest,

    /// Run date; anchors relative timespans and the sample window.
    pub today: NaiveDate,

    /// Skips the store lookup when set.
    pub advertiser_name: Option<String>,

    pub warnings: Vec<PipelineWarning>,
}

impl PipelineContext {
    pub fn new(request: TicketRequest, today: NaiveDate) -> Self {
        Self {
            request,
            today,
            advertiser_name: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_advertiser_name(mut self, name: impl Into<String>) -> Self {
        self.advertiser_name = Some(name.into());
        self
    }
}

/// Everything resolved from a ticket, before anything touches disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub columns: ColumnSet,
    pub cron: CronExpression,
    pub lag: Lag,
    pub timespan: Timespan,
    pub advertiser_name: String,
    pub job: JobDefinition,
    pub validation: ValidationQuery,
}
