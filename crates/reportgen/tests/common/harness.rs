//! Isolated environment for end-to-end pipeline runs.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reportgen::config::Config;
use reportgen::{ArtifactWriter, ClickHouseStore, Pipeline};

use super::builders::ConfigBuilder;

pub struct TestHarness {
    pub temp_dir: TempDir,
    pub server: MockServer,
    pub config: Config,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self::with_config(ConfigBuilder::new()).await
    }

    pub async fn with_config(builder: ConfigBuilder) -> Self {
        let server = MockServer::start().await;
        let config = builder.store_url(&server.uri()).build();
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
            server,
            config,
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        let store = ClickHouseStore::from_config(&self.config.store).expect("store config is valid");
        Pipeline::from_config(&self.config, Arc::new(store))
    }

    pub fn job_path(&self) -> PathBuf {
        self.temp_dir.path().join("out").join("job.json")
    }

    pub fn sample_path(&self) -> PathBuf {
        self.temp_dir.path().join("out").join("sample.csv")
    }

    pub fn writer(&self) -> ArtifactWriter {
        ArtifactWriter::new(self.job_path(), self.sample_path())
    }

    /// Answers the event-table advertiser lookup.
    pub async fn mount_advertiser(&self, name: &str) {
        Mock::given(method("POST"))
            .and(body_string_contains("SELECT DISTINCT advertiser_name FROM ad_event_view"))
            .respond_with(compact(&["advertiser_name"], vec![vec![json!(name)]]))
            .mount(&self.server)
            .await;
    }

    /// Answers both advertiser lookups with no rows.
    pub async fn mount_no_advertiser(&self) {
        Mock::given(method("POST"))
            .and(body_string_contains("SELECT DISTINCT advertiser_name"))
            .respond_with(compact(&["advertiser_name"], vec![]))
            .mount(&self.server)
            .await;
    }

    /// Answers the validation query.
    pub async fn mount_sample(&self, columns: &[&str], rows: Vec<Vec<Value>>) {
        Mock::given(method("POST"))
            .and(body_string_contains("ORDER BY event_date desc"))
            .respond_with(compact(columns, rows))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_sample_failure(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(body_string_contains("ORDER BY event_date desc"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// SQL bodies the mock store received, in order.
    pub async fn received_sql(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| String::from_utf8_lossy(&r.body).to_string())
            .collect()
    }
}

fn compact(columns: &[&str], rows: Vec<Vec<Value>>) -> ResponseTemplate {
    let meta: Vec<Value> = columns
        .iter()
        .map(|name| json!({"name": name, "type": "String"}))
        .collect();
    let count = rows.len();
    ResponseTemplate::new(200).set_body_json(json!({
        "meta": meta,
        "data": rows,
        "rows": count,
    }))
}
