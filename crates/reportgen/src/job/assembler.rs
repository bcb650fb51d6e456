use tracing::debug;

use crate::advertiser::subject_name;
use crate::columns::ColumnSet;
use crate::config::{Config, DependencyConfig, ExportConfig, QueryConfig};
use crate::schedule::{CronExpression, Lag};
use crate::ticket::{AdvertiserIds, DeliveryMethod};
use crate::timespan::Timespan;

use super::definition::{
    ExportSetting, ExternalDependency, JobDefinition, ReportDefinition, ScriptedTableReport,
    Timedelta,
};

/// Everything a job is built from. Assembly is a pure function of these.
#[derive(Debug, Clone, Copy)]
pub struct JobInputs<'a> {
    pub columns: &'a ColumnSet,
    pub cron: &'a CronExpression,
    pub lag: Lag,
    pub timespan: Timespan,
    pub delivery: DeliveryMethod,
    pub recipients: &'a [String],
    pub advertiser: AdvertiserIds,
    /// Formatted name, e.g. `Acme_Widgets`.
    pub advertiser_name: &'a str,
}

/// Per-variant pieces of the template.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DateWindow {
    /// Right-hand side of `event_date BETWEEN`.
    filter: String,
    past_n_days: u32,
    /// Span segment of the attachment name.
    filename_span: String,
    /// Word before "Report" in the subject.
    subject_span: String,
}

impl DateWindow {
    fn for_timespan(timespan: Timespan, lag: Lag) -> Self {
        match timespan {
            Timespan::DaysBack(days) => Self {
                filter: ":startDate AND :endDate".to_string(),
                past_n_days: days,
                filename_span: "${start_date}".to_string(),
                subject_span: lag.cadence.to_string(),
            },
            Timespan::StartDate(date) => {
                let date = date.format("%Y-%m-%d").to_string();
                Self {
                    filter: format!("'{}' AND :endDate", date),
                    past_n_days: 1,
                    filename_span: date,
                    subject_span: lag.cadence.to_string(),
                }
            }
            Timespan::Rolling(window) => Self {
                filter: format!("{} AND :endDate", window.start_expression()),
                past_n_days: 1,
                filename_span: window.label().to_string(),
                subject_span: window.label().to_string(),
            },
        }
    }
}

/// Builds job documents from resolved ticket parts.
#[derive(Debug, Clone, Default)]
pub struct JobAssembler {
    export: ExportConfig,
    query: QueryConfig,
    dependency: DependencyConfig,
}

impl JobAssembler {
    pub fn new(config: &Config) -> Self {
        Self {
            export: config.export.clone(),
            query: config.query.clone(),
            dependency: config.dependency.clone(),
        }
    }

    pub fn assemble(&self, inputs: &JobInputs<'_>) -> JobDefinition {
        let window = DateWindow::for_timespan(inputs.timespan, inputs.lag);
        debug!(
            timespan = %inputs.timespan,
            filter = %window.filter,
            past_n_days = window.past_n_days,
            "Assembling job"
        );

        JobDefinition {
            export_setting: self.export_setting(inputs, &window),
            report_definition: ReportDefinition {
                report_type: "SCRIPTED".to_string(),
                quotechar: "\"".to_string(),
                report_for_past_n_days: window.past_n_days,
                escapechar: "\"".to_string(),
                columns: inputs.columns.manifest(),
                calculate_totals: false,
                lower_ctr: String::new(),
                upper_ctr: String::new(),
                separator: ",".to_string(),
                line_end: "\n".to_string(),
                scripted_table_report: ScriptedTableReport {
                    database: "CLICKHOUSE".to_string(),
                    scripted_sql: self.scripted_sql(inputs, &window.filter),
                },
            },
            external_dependency: ExternalDependency {
                timedelta: Timedelta {
                    hours: inputs.lag.hours,
                    minutes: inputs.lag.minutes,
                },
                task_id: self.dependency.task_id.clone(),
                dag_id: self.dependency.dag_id.clone(),
            },
            schedule_interval: inputs.cron.to_string(),
        }
    }

    fn export_setting(&self, inputs: &JobInputs<'_>, window: &DateWindow) -> ExportSetting {
        ExportSetting {
            export_type: inputs.delivery.to_string(),
            mail_to: self.mail_to(inputs.recipients),
            attachment_name: format!(
                "{}_{}_{}_${{end_date}}.csv",
                self.export.filename_prefix, inputs.advertiser_name, window.filename_span
            ),
            export_dest_dir: String::new(),
            mail_subject: format!(
                "{} - {} {} Report",
                self.export.subject_prefix,
                subject_name(inputs.advertiser_name),
                window.subject_span
            ),
            export_password: String::new(),
            export_url: String::new(),
            mail_from: self.export.mail_from.clone(),
            mail_body: self.export.mail_body.clone(),
            export_username: String::new(),
        }
    }

    /// Ticket recipients followed by the internal recipient, unless the
    /// ticket already lists it.
    fn mail_to(&self, recipients: &[String]) -> String {
        let internal = self.export.internal_recipient.trim();
        let mut all: Vec<&str> = recipients.iter().map(String::as_str).collect();
        if !internal.is_empty() && !all.iter().any(|r| r.eq_ignore_ascii_case(internal)) {
            all.push(internal);
        }
        all.join(", ")
    }

    fn scripted_sql(&self, inputs: &JobInputs<'_>, filter: &str) -> String {
        let mut sql = format!(
            "SELECT {} FROM {} where event_date BETWEEN {} AND (advertiser_lid = {} AND advertiser_hid = {})",
            inputs.columns.select_list(),
            self.query.source_table,
            filter,
            inputs.advertiser.lid,
            inputs.advertiser.hid
        );
        let group_by = inputs.columns.group_by();
        if !group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&group_by);
        }
        sql.push_str(" ORDER BY event_date desc");
        sql
    }
}
