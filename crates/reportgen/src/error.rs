use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportGenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ticket error: {0}")]
    Ticket(#[from] TicketError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Cron error: {0}")]
    Cron(#[from] CronError),

    #[error("Timespan error: {0}")]
    Timespan(#[from] TimespanError),

    #[error("Analytics store error: {0}")]
    Store(#[from] StoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid field mapping '{label}': {reason}")]
    InvalidMapping { label: String, reason: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TicketError {
    #[error("Failed to read ticket file '{path}': {reason}")]
    ReadFile { path: PathBuf, reason: String },

    #[error("Failed to parse ticket file '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Ticket field '{0}' is empty")]
    MissingField(&'static str),

    #[error("Unsupported delivery method '{0}' (only email is supported)")]
    UnsupportedDelivery(String),

    #[error("Malformed advertiser id '{0}', expected '<lid>~<hid>'")]
    MalformedAdvertiserId(String),

    #[error("No recipients left after normalizing '{0}'")]
    NoRecipients(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Schedule description is empty")]
    Empty,

    #[error("Schedule default is not a valid cron value: {0}")]
    InvalidDefault(#[from] CronError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CronError {
    #[error("Cron expression '{0}' must have exactly 5 fields")]
    FieldCount(String),

    #[error("Cron field '{field}' in '{expr}' is not a number")]
    NotNumeric { expr: String, field: &'static str },

    #[error("Cron field '{field}' value {value} is out of range")]
    OutOfRange { field: &'static str, value: u32 },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimespanError {
    #[error("Timespan description is empty")]
    Empty,

    #[error("Could not interpret timespan '{0}'")]
    Unparsed(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Analytics store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Analytics store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode analytics store response: {0}")]
    Decode(String),

    #[error("Analytics store credentials unavailable: {0}")]
    Credentials(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize job document: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportGenError>;
