use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// Extra or overriding label → expression entries, merged over the
    /// built-in field table.
    #[serde(default)]
    pub field_mappings: BTreeMap<String, String>,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub dependency: DependencyConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            field_mappings: BTreeMap::new(),
            export: ExportConfig::default(),
            query: QueryConfig::default(),
            schedule: ScheduleConfig::default(),
            dependency: DependencyConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Always appended to the ticket's recipient list.
    #[serde(default = "default_internal_recipient")]
    pub internal_recipient: String,
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
    #[serde(default = "default_mail_body")]
    pub mail_body: String,
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

fn default_internal_recipient() -> String {
    "reporting@ad.net".to_string()
}

fn default_mail_from() -> String {
    "NO-REPLY@ad.net".to_string()
}

fn default_mail_body() -> String {
    "Stats attached.".to_string()
}

fn default_filename_prefix() -> String {
    "adnet".to_string()
}

fn default_subject_prefix() -> String {
    "Ad.net".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            internal_recipient: default_internal_recipient(),
            mail_from: default_mail_from(),
            mail_body: default_mail_body(),
            filename_prefix: default_filename_prefix(),
            subject_prefix: default_subject_prefix(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_source_table")]
    pub source_table: String,
    #[serde(default = "default_advertiser_dim_table")]
    pub advertiser_dim_table: String,
}

fn default_source_table() -> String {
    "ad_event_view".to_string()
}

fn default_advertiser_dim_table() -> String {
    "advertiser_dim".to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            source_table: default_source_table(),
            advertiser_dim_table: default_advertiser_dim_table(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Hour (reference timezone) the upstream ETL normally completes.
    #[serde(default = "default_baseline_hour")]
    pub baseline_hour: u32,
    #[serde(default)]
    pub default_minute: u32,
    #[serde(default = "default_hour")]
    pub default_hour: u32,
    /// Sunday = 0.
    #[serde(default = "default_weekday")]
    pub default_weekday: u32,
}

fn default_baseline_hour() -> u32 {
    3
}

fn default_hour() -> u32 {
    4
}

fn default_weekday() -> u32 {
    1
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            baseline_hour: default_baseline_hour(),
            default_minute: 0,
            default_hour: default_hour(),
            default_weekday: default_weekday(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyConfig {
    #[serde(default = "default_task_id")]
    pub task_id: String,
    #[serde(default = "default_dag_id")]
    pub dag_id: String,
}

fn default_task_id() -> String {
    "process_completed_notification".to_string()
}

fn default_dag_id() -> String {
    "traffic-server-etl-daily".to_string()
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            task_id: default_task_id(),
            dag_id: default_dag_id(),
        }
    }
}

/// Connection settings for the ClickHouse HTTP interface.
///
/// The password never lives in the config file itself; it is resolved from
/// `password_file` or `password_env_var` when the store client is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_url")]
    pub url: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password_file: Option<String>,
    #[serde(default = "default_password_env_var")]
    pub password_env_var: Option<String>,
}

fn default_store_url() -> String {
    "http://localhost:8123".to_string()
}

fn default_database() -> String {
    "addotnet".to_string()
}

fn default_user() -> String {
    "default".to_string()
}

fn default_password_env_var() -> Option<String> {
    Some("CLICKHOUSE_PASSWORD".to_string())
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            database: default_database(),
            user: default_user(),
            password_file: None,
            password_env_var: default_password_env_var(),
        }
    }
}
