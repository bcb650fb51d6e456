//! Notification delay derived from a job's cron schedule.
//!
//! The downstream scheduler waits on the ETL completion notification, which
//! normally fires at the baseline hour. The lag tells it how far the report's
//! own slot sits from that baseline.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::CronError;

use super::cron::parse_field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReportCadence {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for ReportCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportCadence::Daily => write!(f, "Daily"),
            ReportCadence::Weekly => write!(f, "Weekly"),
            ReportCadence::Monthly => write!(f, "Monthly"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lag {
    pub cadence: ReportCadence,
    pub hours: i32,
    pub minutes: u32,
}

pub struct LagCalculator {
    baseline_hour: i32,
}

impl LagCalculator {
    pub fn new(baseline_hour: u32) -> Self {
        Self {
            baseline_hour: baseline_hour as i32,
        }
    }

    /// Classifies `cron` and computes its offset from the baseline.
    ///
    /// - Daily (`* * *` tail): `hour - baseline` hours, the cron minute.
    /// - Weekly (numeric day-of-week `d`): `-((d * 24) - (hour - baseline))`
    ///   hours, the cron minute.
    /// - Monthly (anything else): zero offsets. The interpreter never emits
    ///   such a schedule today, so this branch is untested against real
    ///   tickets.
    pub fn calculate(&self, cron: &str) -> Result<Lag, CronError> {
        let fields: Vec<&str> = cron.split_whitespace().collect();
        let [minute, hour, dom, month, dow] = fields.as_slice() else {
            return Err(CronError::FieldCount(cron.to_string()));
        };

        let lag = if *dom == "*" && *month == "*" && *dow == "*" {
            let minute = parse_field(cron, "minute", minute)?;
            let hour = parse_field(cron, "hour", hour)? as i32;
            Lag {
                cadence: ReportCadence::Daily,
                hours: hour - self.baseline_hour,
                minutes: minute,
            }
        } else if let Ok(weekday) = dow.parse::<u32>() {
            if weekday > 6 {
                return Err(CronError::OutOfRange {
                    field: "day_of_week",
                    value: weekday,
                });
            }
            let minute = parse_field(cron, "minute", minute)?;
            let hour = parse_field(cron, "hour", hour)? as i32;
            Lag {
                cadence: ReportCadence::Weekly,
                hours: -((weekday as i32 * 24) - (hour - self.baseline_hour)),
                minutes: minute,
            }
        } else {
            Lag {
                cadence: ReportCadence::Monthly,
                hours: 0,
                minutes: 0,
            }
        };

        debug!(cron, cadence = %lag.cadence, hours = lag.hours, minutes = lag.minutes, "Calculated lag");
        Ok(lag)
    }
}

impl Default for LagCalculator {
    fn default() -> Self {
        Self::new(3)
    }
}
