//! The export request as it arrives from the ticket tracker.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TicketError;

static RE_RECIPIENT_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;,\r\n]+").unwrap());

/// Raw ticket fields, exactly as the tracker exports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub time_span: String,
    #[serde(default)]
    pub sql_select_columns: String,
    #[serde(default)]
    pub period_and_time: String,
    #[serde(default)]
    pub delivery_method: String,
    #[serde(default)]
    pub recipient_list: String,
    #[serde(default)]
    pub lid_hid: String,
}

impl TicketRecord {
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TicketError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TicketError::ReadFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content).map_err(|e| TicketError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Email,
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMethod::Email => write!(f, "email"),
        }
    }
}

impl FromStr for DeliveryMethod {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" | "e-mail" => Ok(DeliveryMethod::Email),
            _ => Err(TicketError::UnsupportedDelivery(s.trim().to_string())),
        }
    }
}

/// The lid/hid pair identifying the advertiser that owns the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvertiserIds {
    pub lid: u64,
    pub hid: u64,
}

impl FromStr for AdvertiserIds {
    type Err = TicketError;

    /// Parses `<lid>~<hid>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TicketError::MalformedAdvertiserId(s.to_string());
        let (lid, hid) = s.trim().split_once('~').ok_or_else(malformed)?;
        Ok(Self {
            lid: lid.trim().parse().map_err(|_| malformed())?,
            hid: hid.trim().parse().map_err(|_| malformed())?,
        })
    }
}

impl fmt::Display for AdvertiserIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.lid, self.hid)
    }
}

/// Validated, immutable view of a ticket for one translation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRequest {
    pub key: String,
    pub columns: String,
    pub timespan: String,
    pub schedule: String,
    pub delivery: DeliveryMethod,
    pub recipients: Vec<String>,
    pub advertiser: AdvertiserIds,
}

impl TicketRequest {
    pub fn from_record(record: &TicketRecord) -> Result<Self, TicketError> {
        let columns = required(&record.sql_select_columns, "sql_select_columns")?;
        let timespan = required(&record.time_span, "time_span")?;
        let schedule = required(&record.period_and_time, "period_and_time")?;
        let delivery = required(&record.delivery_method, "delivery_method")?.parse::<DeliveryMethod>()?;
        let advertiser = required(&record.lid_hid, "lid_hid")?.parse::<AdvertiserIds>()?;

        let recipients = normalize_recipients(&record.recipient_list);
        if recipients.is_empty() {
            return Err(TicketError::NoRecipients(record.recipient_list.clone()));
        }

        Ok(Self {
            key: record.key.trim().to_string(),
            columns: columns.to_string(),
            timespan: timespan.to_string(),
            schedule: schedule.to_string(),
            delivery,
            recipients,
            advertiser,
        })
    }

    /// Recipients joined the way the export settings expect them.
    pub fn recipient_line(&self) -> String {
        self.recipients.join(", ")
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, TicketError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TicketError::MissingField(field));
    }
    Ok(trimmed)
}

/// Lowercases and splits on commas, semicolons and newlines; drops blanks
/// and repeats while keeping first-seen order.
pub fn normalize_recipients(raw: &str) -> Vec<String> {
    let mut recipients: Vec<String> = Vec::new();
    for address in RE_RECIPIENT_SEPARATOR.split(&raw.to_lowercase()) {
        let address = address.trim();
        if !address.is_empty() && !recipients.iter().any(|r| r == address) {
            recipients.push(address.to_string());
        }
    }
    recipients
}
