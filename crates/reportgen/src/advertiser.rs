//! Advertiser display names for filenames and mail subjects.

use chrono::NaiveDate;
use tracing::{debug, info_span, Instrument};

use crate::columns::title_case;
use crate::config::QueryConfig;
use crate::error::StoreError;
use crate::store::AnalyticsStore;
use crate::ticket::AdvertiserIds;

pub const UNKNOWN_ADVERTISER: &str = "Unknown_Advertiser";

/// Looks the advertiser up in the event table for `today`, then in the
/// advertiser dimension by hid. Returns [`UNKNOWN_ADVERTISER`] when neither
/// has a name.
pub async fn resolve_advertiser_name(
    store: &dyn AnalyticsStore,
    query: &QueryConfig,
    ids: AdvertiserIds,
    today: NaiveDate,
) -> Result<String, StoreError> {
    let span = info_span!("resolve_advertiser", advertiser = %ids);

    async {
        let by_event = format!(
            "SELECT DISTINCT advertiser_name FROM {} WHERE event_date = '{}' AND advertiser_lid = {} AND advertiser_hid = {}",
            query.source_table,
            today.format("%Y-%m-%d"),
            ids.lid,
            ids.hid
        );
        let mut name = store.query(&by_event).await?.first_text();

        if name.is_none() {
            debug!("No event rows today, falling back to advertiser dimension");
            let by_dimension = format!(
                "SELECT DISTINCT advertiser_name FROM {} WHERE advertiser_hid = {}",
                query.advertiser_dim_table, ids.hid
            );
            name = store.query(&by_dimension).await?.first_text();
        }

        let formatted = match name {
            Some(raw) if !raw.trim().is_empty() => format_advertiser_name(&raw),
            _ => UNKNOWN_ADVERTISER.to_string(),
        };
        debug!(name = %formatted, "Resolved advertiser name");
        Ok::<_, StoreError>(formatted)
    }
    .instrument(span)
    .await
}

/// `acme dotcom` → `Acme_Dotcom`; a lowercase `dotcom` surviving title-casing
/// (inside a word, e.g. `Shopdotcom`) becomes `.com`.
pub fn format_advertiser_name(raw: &str) -> String {
    title_case(raw.trim())
        .replace("dotcom", ".com")
        .replace(' ', "_")
}

/// Advertiser name as it reads in a mail subject.
pub fn subject_name(formatted: &str) -> String {
    formatted.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::QueryResult;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers queries from a fixed queue and records what it was asked.
    struct ScriptedStore {
        answers: Mutex<Vec<QueryResult>>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedStore {
        fn new(answers: Vec<QueryResult>) -> Self {
            Self {
                answers: Mutex::new(answers),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AnalyticsStore for ScriptedStore {
        async fn query(&self, sql: &str) -> Result<QueryResult, StoreError> {
            self.seen.lock().unwrap().push(sql.to_string());
            let mut answers = self.answers.lock().unwrap();
            if answers.is_empty() {
                Ok(QueryResult::default())
            } else {
                Ok(answers.remove(0))
            }
        }
    }

    fn names(values: &[&str]) -> QueryResult {
        QueryResult {
            columns: vec!["advertiser_name".to_string()],
            rows: values.iter().map(|v| vec![json!(v)]).collect(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 18).unwrap()
    }

    const IDS: AdvertiserIds = AdvertiserIds { lid: 11, hid: 22 };

    #[test]
    fn test_format_advertiser_name() {
        assert_eq!(format_advertiser_name("acme widgets"), "Acme_Widgets");
        assert_eq!(format_advertiser_name("  BIG box store "), "Big_Box_Store");
        assert_eq!(format_advertiser_name("shopdotcom"), "Shop.com");
        assert_eq!(format_advertiser_name("acme dotcom"), "Acme_Dotcom");
        assert_eq!(format_advertiser_name("o'neil shoes"), "O'Neil_Shoes");
        assert_eq!(subject_name("Big_Box_Store"), "Big Box Store");
    }

    #[tokio::test]
    async fn test_name_from_event_table() {
        let store = ScriptedStore::new(vec![names(&["acme widgets"])]);
        let name = resolve_advertiser_name(&store, &QueryConfig::default(), IDS, today())
            .await
            .unwrap();

        assert_eq!(name, "Acme_Widgets");
        let seen = store.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("FROM ad_event_view"));
        assert!(seen[0].contains("event_date = '2025-06-18'"));
        assert!(seen[0].contains("advertiser_lid = 11 AND advertiser_hid = 22"));
    }

    #[tokio::test]
    async fn test_falls_back_to_dimension() {
        let store = ScriptedStore::new(vec![names(&[]), names(&["globex corp"])]);
        let name = resolve_advertiser_name(&store, &QueryConfig::default(), IDS, today())
            .await
            .unwrap();

        assert_eq!(name, "Globex_Corp");
        let seen = store.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].contains("FROM advertiser_dim WHERE advertiser_hid = 22"));
    }

    #[tokio::test]
    async fn test_unknown_advertiser() {
        let store = ScriptedStore::new(vec![]);
        let name = resolve_advertiser_name(&store, &QueryConfig::default(), IDS, today())
            .await
            .unwrap();
        assert_eq!(name, UNKNOWN_ADVERTISER);
    }
}
