//! The stakeholder validation query: the job's query with concrete dates and
//! human column names, run once at generation time.

use chrono::{Days, NaiveDate};

use crate::columns::ColumnSet;
use crate::ticket::AdvertiserIds;
use crate::timespan::Timespan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub sql: String,
}

impl ValidationQuery {
    /// Covers `start` through yesterday, relative to `today`.
    pub fn build(
        columns: &ColumnSet,
        timespan: Timespan,
        advertiser: AdvertiserIds,
        source_table: &str,
        today: NaiveDate,
    ) -> Self {
        let (start, end) = sample_window(timespan, today);

        let mut sql = format!(
            "SELECT {} FROM {} WHERE event_date BETWEEN '{}' AND '{}' AND advertiser_lid = {} AND advertiser_hid = {}",
            columns.report_select_list(),
            source_table,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            advertiser.lid,
            advertiser.hid
        );
        let group_by = columns.group_by();
        if !group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&group_by);
        }
        sql.push_str(" ORDER BY event_date desc");

        Self { start, end, sql }
    }
}

/// Concrete `(start, end)` dates for a timespan; `end` is always yesterday
/// and `start` never passes it.
///
/// Rolling windows cover the period containing yesterday, so a run on the
/// first of a month samples the whole previous month.
pub fn sample_window(timespan: Timespan, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    let start = match timespan {
        Timespan::DaysBack(days) => today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(today),
        Timespan::StartDate(date) => date,
        Timespan::Rolling(window) => window.start_date(end),
    };
    (start.min(end), end)
}
