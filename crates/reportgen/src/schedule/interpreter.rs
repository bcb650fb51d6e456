//! Free-text delivery schedules ("Mondays 9:30am ET", "daily at 6 pm") to
//! canonical cron expressions.
//!
//! Each concern (hour, timezone, weekday, cadence) is an ordered rule table.
//! Rules are tried top to bottom, each against every description in order,
//! and the first hit wins. Anything left undetected falls back to the
//! configured defaults.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::config::ScheduleConfig;
use crate::error::ScheduleError;

use super::cron::CronExpression;

const CLOCK_PATTERN: &str = r"\b(\d{1,2}):([0-5]\d)";

static RE_CLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(CLOCK_PATTERN).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: Option<u32>,
}

pub struct HourRule {
    pub name: &'static str,
    regex: Regex,
    extract: fn(&Captures<'_>) -> Option<TimeOfDay>,
}

impl HourRule {
    pub fn apply(&self, text: &str) -> Option<TimeOfDay> {
        self.regex
            .captures(text)
            .and_then(|caps| (self.extract)(&caps))
    }
}

fn capture_u32(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

fn extract_meridiem(caps: &Captures<'_>) -> Option<TimeOfDay> {
    let hour = capture_u32(caps, 1)?;
    let is_pm = caps.get(3).is_some_and(|m| m.as_str().starts_with('p'));
    Some(TimeOfDay {
        hour: if is_pm && hour < 12 { hour + 12 } else { hour },
        minute: capture_u32(caps, 2),
    })
}

fn extract_clock(caps: &Captures<'_>) -> Option<TimeOfDay> {
    Some(TimeOfDay {
        hour: capture_u32(caps, 1)?,
        minute: capture_u32(caps, 2),
    })
}

pub static HOUR_RULES: LazyLock<Vec<HourRule>> = LazyLock::new(|| {
    vec![
        HourRule {
            name: "meridiem",
            regex: Regex::new(r"\b(\d{1,2})(?::([0-5]\d))?\s*(am|pm|a\.m\.|p\.m\.)").unwrap(),
            extract: extract_meridiem,
        },
        HourRule {
            name: "clock",
            regex: Regex::new(CLOCK_PATTERN).unwrap(),
            extract: extract_clock,
        },
    ]
});

/// Hour offset of a timezone relative to Pacific time.
pub struct TimezoneRule {
    pub name: &'static str,
    pub offset_hours: i32,
    pub tokens: &'static [&'static str],
}

pub const TIMEZONE_RULES: &[TimezoneRule] = &[
    TimezoneRule {
        name: "central",
        offset_hours: -2,
        tokens: &["ct", "cst", "cdt", "central"],
    },
    TimezoneRule {
        name: "eastern",
        offset_hours: -3,
        tokens: &["et", "est", "edt", "eastern"],
    },
    TimezoneRule {
        name: "mountain",
        offset_hours: -1,
        tokens: &["mt", "mst", "mdt", "mountain"],
    },
    TimezoneRule {
        name: "pacific",
        offset_hours: 0,
        tokens: &["pt", "pst", "pdt", "pacific"],
    },
];

impl TimezoneRule {
    pub fn matches(&self, text: &str) -> bool {
        words(text).any(|word| self.tokens.contains(&word))
    }
}

/// Weekday names with their cron index, in detection order.
pub const WEEKDAYS: &[(&str, u32)] = &[
    ("monday", 1),
    ("tuesday", 2),
    ("wednesday", 3),
    ("thursday", 4),
    ("friday", 5),
    ("saturday", 6),
    ("sunday", 0),
];

pub fn detect_weekday(text: &str) -> Option<u32> {
    WEEKDAYS
        .iter()
        .find(|(name, _)| text.contains(name))
        .map(|(_, index)| *index)
}

/// `daily` anywhere, or `day` as a word of its own ("every day").
pub fn is_daily(text: &str) -> bool {
    text.contains("daily") || words(text).any(|word| word == "day")
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
}

pub struct ScheduleInterpreter {
    defaults: ScheduleConfig,
}

impl ScheduleInterpreter {
    pub fn new(defaults: ScheduleConfig) -> Self {
        Self { defaults }
    }

    /// Interprets one or more descriptions of the same schedule.
    ///
    /// Descriptions are lowercased and de-duplicated; blank ones are ignored.
    /// Fails when nothing non-blank remains, or when a configured default is
    /// out of cron range.
    pub fn interpret<S: AsRef<str>>(
        &self,
        descriptions: &[S],
    ) -> Result<CronExpression, ScheduleError> {
        let candidates = normalize_descriptions(descriptions);
        if candidates.is_empty() {
            return Err(ScheduleError::Empty);
        }

        let time = HOUR_RULES
            .iter()
            .find_map(|rule| first_match(&candidates, |text| rule.apply(text)));

        let minute = time
            .and_then(|time| time.minute)
            .or_else(|| {
                first_match(&candidates, |text| {
                    RE_CLOCK
                        .captures(text)
                        .and_then(|caps| capture_u32(&caps, 2))
                })
            })
            .unwrap_or(self.defaults.default_minute);

        let hour = time
            .map(|time| time.hour)
            .unwrap_or(self.defaults.default_hour);

        let offset = TIMEZONE_RULES
            .iter()
            .find(|rule| candidates.iter().any(|text| rule.matches(text)))
            .map(|rule| rule.offset_hours)
            .unwrap_or(0);
        let hour = shift_hour(hour, offset);

        let weekday =
            first_match(&candidates, detect_weekday).unwrap_or(self.defaults.default_weekday);

        let cron = if candidates.iter().any(|text| is_daily(text)) {
            CronExpression::daily(minute, hour)?
        } else {
            CronExpression::weekly(minute, hour, weekday)?
        };

        debug!(cron = %cron, "Interpreted schedule");
        Ok(cron)
    }
}

impl Default for ScheduleInterpreter {
    fn default() -> Self {
        Self::new(ScheduleConfig::default())
    }
}

/// Lowercased, trimmed, de-duplicated, non-blank; first occurrence kept.
pub(crate) fn normalize_descriptions<S: AsRef<str>>(descriptions: &[S]) -> Vec<String> {
    let mut seen = Vec::new();
    for description in descriptions {
        let text = description.as_ref().trim().to_lowercase();
        if !text.is_empty() && !seen.contains(&text) {
            seen.push(text);
        }
    }
    seen
}

fn first_match<T>(candidates: &[String], f: impl Fn(&str) -> Option<T>) -> Option<T> {
    candidates.iter().find_map(|text| f(text))
}

fn shift_hour(hour: u32, offset: i32) -> u32 {
    (i64::from(hour) + i64::from(offset)).rem_euclid(24) as u32
}
