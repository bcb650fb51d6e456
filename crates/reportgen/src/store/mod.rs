//! The columnar analytics store the validation query runs against.

pub mod clickhouse;
pub mod secret;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

pub use clickhouse::ClickHouseStore;

/// Tabular result of a query: column names plus rows of JSON scalars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First cell of the first row, rendered as text.
    pub fn first_text(&self) -> Option<String> {
        self.rows
            .first()
            .and_then(|row| row.first())
            .and_then(|value| match value {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
    }
}

/// Read-only access to the analytics store.
///
/// Retries and timeouts belong to implementations; the pipeline calls each
/// query once and propagates failures.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    async fn query(&self, sql: &str) -> Result<QueryResult, StoreError>;
}
