//! ClickHouse over its HTTP interface.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info_span, Instrument};

use crate::config::StoreConfig;
use crate::error::StoreError;

use super::secret::resolve_password;
use super::{AnalyticsStore, QueryResult};

/// Response body for `FORMAT JSONCompact`.
#[derive(Debug, Deserialize)]
struct CompactResponse {
    meta: Vec<ColumnMeta>,
    data: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ColumnMeta {
    name: String,
}

pub struct ClickHouseStore {
    client: reqwest::Client,
    url: String,
    database: String,
    user: String,
    password: Option<SecretString>,
}

impl ClickHouseStore {
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let password = resolve_password(
            config.password_file.as_deref(),
            config.password_env_var.as_deref(),
        )?;

        Ok(Self::new(
            reqwest::Client::new(),
            &config.url,
            &config.database,
            &config.user,
            password,
        ))
    }

    pub fn new(
        client: reqwest::Client,
        url: &str,
        database: &str,
        user: &str,
        password: Option<SecretString>,
    ) -> Self {
        Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            database: database.to_string(),
            user: user.to_string(),
            password,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

#[async_trait]
impl AnalyticsStore for ClickHouseStore {
    async fn query(&self, sql: &str) -> Result<QueryResult, StoreError> {
        let span = info_span!("clickhouse_query", database = %self.database);

        async {
            let mut request = self
                .client
                .post(format!("{}/", self.url))
                .query(&[
                    ("database", self.database.as_str()),
                    ("default_format", "JSONCompact"),
                ])
                .header("X-ClickHouse-User", &self.user)
                .body(sql.to_string());
            if let Some(password) = &self.password {
                request = request.header("X-ClickHouse-Key", password.expose_secret());
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(StoreError::Status {
                    status: status.as_u16(),
                    body: body.trim().to_string(),
                });
            }

            let body: CompactResponse = response
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;

            let result = QueryResult {
                columns: body.meta.into_iter().map(|m| m.name).collect(),
                rows: body.data,
            };
            debug!(rows = result.rows.len(), "Query returned");
            Ok::<_, StoreError>(result)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string, header, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer, password: Option<&str>) -> ClickHouseStore {
        ClickHouseStore::new(
            reqwest::Client::new(),
            &server.uri(),
            "addotnet",
            "reporter",
            password.map(|p| SecretString::from(p.to_string())),
        )
    }

    #[tokio::test]
    async fn test_query_decodes_compact_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(query_param("database", "addotnet"))
            .and(query_param("default_format", "JSONCompact"))
            .and(header("X-ClickHouse-User", "reporter"))
            .and(header("X-ClickHouse-Key", "s3cret"))
            .and(body_string("SELECT 1 AS one"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": [{"name": "one", "type": "UInt8"}, {"name": "Publisher_Name", "type": "String"}],
                "data": [[1, "Acme"], [2, "Globex"]],
                "rows": 2
            })))
            .mount(&server)
            .await;

        let result = store(&server, Some("s3cret"))
            .query("SELECT 1 AS one")
            .await
            .unwrap();

        assert_eq!(result.columns, vec!["one", "Publisher_Name"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[1][1], json!("Globex"));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Code: 62. Syntax error\n"))
            .mount(&server)
            .await;

        let err = store(&server, None).query("SELEC").await.unwrap_err();
        match err {
            StoreError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "Code: 62. Syntax error");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1\tAcme\n"))
            .mount(&server)
            .await;

        let err = store(&server, None).query("SELECT 1").await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn test_from_config_trims_trailing_slash() {
        let config = StoreConfig {
            url: "http://ch.internal:8123/".to_string(),
            password_env_var: None,
            ..StoreConfig::default()
        };
        let store = ClickHouseStore::from_config(&config).unwrap();
        assert_eq!(store.url(), "http://ch.internal:8123");
        assert_eq!(store.database(), "addotnet");
    }
}
