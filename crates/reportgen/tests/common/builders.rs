//! Builders for ticket records and configurations.

#![allow(dead_code)]

use chrono::NaiveDate;

use reportgen::config::Config;
use reportgen::{TicketRecord, TicketRequest};

/// Fixed run date for deterministic assertions.
pub fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 18).unwrap()
}

pub struct TicketBuilder {
    record: TicketRecord,
}

impl TicketBuilder {
    /// A complete, valid weekly ticket.
    pub fn new() -> Self {
        Self {
            record: TicketRecord {
                key: "AD-378".to_string(),
                summary: "Weekly publisher stats for Acme".to_string(),
                time_span: "Last 7 Days".to_string(),
                sql_select_columns: "Date, Publisher Name, Clicks, CPC - cost per click"
                    .to_string(),
                period_and_time: "Mondays at 8am PT".to_string(),
                delivery_method: "Email".to_string(),
                recipient_list: "ann@example.com; bob@example.com".to_string(),
                lid_hid: "1001~2002".to_string(),
            },
        }
    }

    pub fn key(mut self, key: &str) -> Self {
        self.record.key = key.to_string();
        self
    }

    pub fn columns(mut self, columns: &str) -> Self {
        self.record.sql_select_columns = columns.to_string();
        self
    }

    pub fn time_span(mut self, time_span: &str) -> Self {
        self.record.time_span = time_span.to_string();
        self
    }

    pub fn schedule(mut self, schedule: &str) -> Self {
        self.record.period_and_time = schedule.to_string();
        self
    }

    pub fn delivery(mut self, delivery: &str) -> Self {
        self.record.delivery_method = delivery.to_string();
        self
    }

    pub fn recipients(mut self, recipients: &str) -> Self {
        self.record.recipient_list = recipients.to_string();
        self
    }

    pub fn lid_hid(mut self, lid_hid: &str) -> Self {
        self.record.lid_hid = lid_hid.to_string();
        self
    }

    pub fn record(self) -> TicketRecord {
        self.record
    }

    pub fn build(self) -> TicketRequest {
        TicketRequest::from_record(&self.record).expect("builder ticket is valid")
    }
}

impl Default for TicketBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.store.password_env_var = None;
        Self { config }
    }

    pub fn field_mapping(mut self, label: &str, expression: &str) -> Self {
        self.config
            .field_mappings
            .insert(label.to_string(), expression.to_string());
        self
    }

    pub fn internal_recipient(mut self, address: &str) -> Self {
        self.config.export.internal_recipient = address.to_string();
        self
    }

    pub fn source_table(mut self, table: &str) -> Self {
        self.config.query.source_table = table.to_string();
        self
    }

    pub fn baseline_hour(mut self, hour: u32) -> Self {
        self.config.schedule.baseline_hour = hour;
        self
    }

    pub fn store_url(mut self, url: &str) -> Self {
        self.config.store.url = url.to_string();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
