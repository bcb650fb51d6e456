//! Lookup from human-readable field labels to query expressions.

pub mod builtin;

use std::collections::{BTreeMap, HashMap};

use crate::config::Config;

pub use builtin::BUILTIN_FIELDS;

/// Immutable label → expression table.
///
/// Built once (from the stock table, optionally with deployment overrides)
/// and handed to the column parser; lookups never mutate it.
#[derive(Debug, Clone)]
pub struct FieldMapper {
    expressions: HashMap<String, String>,
}

impl FieldMapper {
    /// The stock table only.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_FIELDS.iter().copied())
    }

    /// Stock table with the config's `field_mappings` layered on top.
    pub fn from_config(config: &Config) -> Self {
        Self::builtin().with_overrides(&config.field_mappings)
    }

    /// A table holding exactly `entries`. Labels are normalized like lookup keys.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let expressions = entries
            .into_iter()
            .map(|(label, expr)| (normalize_key(label.as_ref()), expr.into()))
            .collect();
        Self { expressions }
    }

    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (label, expr) in overrides {
            self.expressions.insert(normalize_key(label), expr.clone());
        }
        self
    }

    /// Returns the expression for `label`, or `None` for an unrecognized field.
    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.expressions
            .get(&normalize_key(label))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lowercases and collapses runs of whitespace to a single space.
pub fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
