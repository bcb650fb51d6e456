pub mod cron;
pub mod interpreter;
pub mod lag;

pub use cron::CronExpression;
pub use interpreter::{ScheduleInterpreter, TimeOfDay, HOUR_RULES, TIMEZONE_RULES, WEEKDAYS};
pub use lag::{Lag, LagCalculator, ReportCadence};
