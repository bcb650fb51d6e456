//! The scheduler job document.
//!
//! Field order here is the key order of the serialized document, so keep it
//! stable: regenerating a job from the same ticket must be byte-identical.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDefinition {
    pub export_setting: ExportSetting,
    pub report_definition: ReportDefinition,
    pub external_dependency: ExternalDependency,
    pub schedule_interval: String,
}

impl JobDefinition {
    /// Single-line JSON, the form the scheduler ingests.
    pub fn to_compact_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_pretty_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Delivery settings. Unused transport fields are kept as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSetting {
    pub export_type: String,
    pub mail_to: String,
    /// `${start_date}` / `${end_date}` are filled in at delivery time.
    pub attachment_name: String,
    pub export_dest_dir: String,
    pub mail_subject: String,
    pub export_password: String,
    pub export_url: String,
    pub mail_from: String,
    pub mail_body: String,
    pub export_username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDefinition {
    #[serde(rename = "reportType")]
    pub report_type: String,
    pub quotechar: String,
    pub report_for_past_n_days: u32,
    pub escapechar: String,
    /// Column manifest, `alias|Label` pairs.
    pub columns: String,
    #[serde(rename = "calculateTotals")]
    pub calculate_totals: bool,
    #[serde(rename = "lowerCtr")]
    pub lower_ctr: String,
    #[serde(rename = "upperCtr")]
    pub upper_ctr: String,
    pub separator: String,
    #[serde(rename = "lineEnd")]
    pub line_end: String,
    #[serde(rename = "scriptedTableReport")]
    pub scripted_table_report: ScriptedTableReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedTableReport {
    pub database: String,
    /// Query with `:startDate` / `:endDate` placeholders.
    #[serde(rename = "scriptedSql")]
    pub scripted_sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDependency {
    pub timedelta: Timedelta,
    pub task_id: String,
    pub dag_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timedelta {
    pub hours: i32,
    pub minutes: u32,
}
