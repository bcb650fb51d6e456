use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::CronError;

/// Canonical five-field schedule produced by the interpreter.
///
/// Minute and hour are concrete; day-of-month and month are always `*`;
/// day-of-week is `*` for a daily run or 0–6 (Sunday = 0) for a weekly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CronExpression {
    minute: u32,
    hour: u32,
    day_of_week: Option<u32>,
}

impl CronExpression {
    pub fn daily(minute: u32, hour: u32) -> Result<Self, CronError> {
        check_range("minute", minute, 59)?;
        check_range("hour", hour, 23)?;
        Ok(Self {
            minute,
            hour,
            day_of_week: None,
        })
    }

    pub fn weekly(minute: u32, hour: u32, day_of_week: u32) -> Result<Self, CronError> {
        check_range("day_of_week", day_of_week, 6)?;
        let mut cron = Self::daily(minute, hour)?;
        cron.day_of_week = Some(day_of_week);
        Ok(cron)
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn day_of_week(&self) -> Option<u32> {
        self.day_of_week
    }

    pub fn is_daily(&self) -> bool {
        self.day_of_week.is_none()
    }
}

fn check_range(field: &'static str, value: u32, max: u32) -> Result<(), CronError> {
    if value > max {
        return Err(CronError::OutOfRange { field, value });
    }
    Ok(())
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.day_of_week {
            Some(dow) => write!(f, "{} {} * * {}", self.minute, self.hour, dow),
            None => write!(f, "{} {} * * *", self.minute, self.hour),
        }
    }
}

/// Parses only the canonical shape; richer cron syntax is rejected.
impl FromStr for CronExpression {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let [minute, hour, dom, month, dow] = fields.as_slice() else {
            return Err(CronError::FieldCount(s.to_string()));
        };

        let minute = parse_field(s, "minute", minute)?;
        let hour = parse_field(s, "hour", hour)?;
        if *dom != "*" {
            return Err(CronError::NotNumeric {
                expr: s.to_string(),
                field: "day_of_month",
            });
        }
        if *month != "*" {
            return Err(CronError::NotNumeric {
                expr: s.to_string(),
                field: "month",
            });
        }

        match *dow {
            "*" => Self::daily(minute, hour),
            other => Self::weekly(minute, hour, parse_field(s, "day_of_week", other)?),
        }
    }
}

pub(crate) fn parse_field(expr: &str, field: &'static str, value: &str) -> Result<u32, CronError> {
    value.parse::<u32>().map_err(|_| CronError::NotNumeric {
        expr: expr.to_string(),
        field,
    })
}

impl Serialize for CronExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
