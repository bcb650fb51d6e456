//! Free-text lookback descriptions ("Last 7 days", "MTD", "Present 03/10")
//! to a typed [`Timespan`].

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::error::TimespanError;

static RE_MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})").unwrap());
static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static RE_DAYS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*day").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollingWindow {
    MonthToDate,
    YearToDate,
}

impl RollingWindow {
    pub fn label(&self) -> &'static str {
        match self {
            RollingWindow::MonthToDate => "MTD",
            RollingWindow::YearToDate => "YTD",
        }
    }

    /// Start-of-period expression evaluated by the store at run time.
    pub fn start_expression(&self) -> &'static str {
        match self {
            RollingWindow::MonthToDate => "toStartOfMonth(today())",
            RollingWindow::YearToDate => "toStartOfYear(today())",
        }
    }

    /// First day of the period containing `today`.
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        match self {
            RollingWindow::MonthToDate => today.with_day(1).unwrap_or(today),
            RollingWindow::YearToDate => today.with_ordinal(1).unwrap_or(today),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timespan {
    DaysBack(u32),
    StartDate(NaiveDate),
    Rolling(RollingWindow),
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timespan::DaysBack(days) => write!(f, "last {} days", days),
            Timespan::StartDate(date) => write!(f, "since {}", date.format("%Y-%m-%d")),
            Timespan::Rolling(window) => write!(f, "{}", window.label()),
        }
    }
}

/// One classification rule: if `predicate` holds, `extract` decides the
/// result and no later rule is consulted.
pub struct TimespanRule {
    pub name: &'static str,
    pub predicate: fn(&str) -> bool,
    pub extract: fn(&str, NaiveDate) -> Option<Timespan>,
}

pub const TIMESPAN_RULES: &[TimespanRule] = &[
    TimespanRule {
        name: "present",
        predicate: |text| text.contains("present"),
        extract: extract_present,
    },
    TimespanRule {
        name: "month_to_date",
        predicate: |text| text.contains("mtd") || text.contains("month to date"),
        extract: |_, _| Some(Timespan::Rolling(RollingWindow::MonthToDate)),
    },
    TimespanRule {
        name: "year_to_date",
        predicate: |text| text.contains("ytd") || text.contains("year to date"),
        extract: |_, _| Some(Timespan::Rolling(RollingWindow::YearToDate)),
    },
    TimespanRule {
        name: "prior_day",
        predicate: |text| text.contains("prior day") || text.contains("previous day"),
        extract: |_, _| Some(Timespan::DaysBack(1)),
    },
    TimespanRule {
        name: "ongoing",
        predicate: |text| text.contains("ongoing") || text.contains("starting"),
        extract: extract_ongoing,
    },
    TimespanRule {
        name: "days_back",
        predicate: |_| true,
        extract: extract_days_back,
    },
];

/// `present 03/10` → that month/day in the current year.
fn extract_present(text: &str, today: NaiveDate) -> Option<Timespan> {
    let caps = RE_MONTH_DAY.captures(text)?;
    let month = caps.get(1)?.as_str().parse().ok()?;
    let day = caps.get(2)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(today.year(), month, day).map(Timespan::StartDate)
}

/// Up to three numbers read as month, day, year; missing parts come from today.
fn extract_ongoing(text: &str, today: NaiveDate) -> Option<Timespan> {
    let numbers: Vec<u32> = RE_NUMBER
        .find_iter(text)
        .take(3)
        .map(|m| m.as_str().parse().ok())
        .collect::<Option<_>>()?;

    let (year, month, day) = match numbers.as_slice() {
        [] => (today.year(), today.month(), today.day()),
        [month] => (today.year(), *month, today.day()),
        [month, day] => (today.year(), *month, *day),
        [month, day, year, ..] => {
            let year = if *year < 100 { year + 2000 } else { *year };
            (i32::try_from(year).ok()?, *month, *day)
        }
    };

    NaiveDate::from_ymd_opt(year, month, day).map(Timespan::StartDate)
}

/// `last 14 days` → 14. Zero is not a usable lookback.
fn extract_days_back(text: &str, _today: NaiveDate) -> Option<Timespan> {
    let caps = RE_DAYS.captures(text)?;
    let days: u32 = caps.get(1)?.as_str().parse().ok()?;
    (days > 0).then_some(Timespan::DaysBack(days))
}

pub struct TimespanResolver {
    today: NaiveDate,
}

impl TimespanResolver {
    /// `today` anchors relative dates; pass the run date.
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Resolves the first non-blank description (after lowercasing and
    /// de-duplication). An unmatched description is an error: no job may be
    /// assembled without a timespan.
    pub fn resolve<S: AsRef<str>>(&self, descriptions: &[S]) -> Result<Timespan, TimespanError> {
        let candidates = crate::schedule::interpreter::normalize_descriptions(descriptions);
        let text = candidates.first().ok_or(TimespanError::Empty)?;

        let rule = TIMESPAN_RULES
            .iter()
            .find(|rule| (rule.predicate)(text))
            .ok_or_else(|| TimespanError::Unparsed(text.clone()))?;

        let timespan =
            (rule.extract)(text, self.today).ok_or_else(|| TimespanError::Unparsed(text.clone()))?;

        debug!(rule = rule.name, timespan = %timespan, "Resolved timespan");
        Ok(timespan)
    }
}
