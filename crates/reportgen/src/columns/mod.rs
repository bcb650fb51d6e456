//! Free-text column lists → ordered column specs.
//!
//! A ticket lists its fields loosely ("Clicks, CPC - cost per click, and
//! Publisher Name"). Each token is reduced to a field name, resolved through
//! the [`FieldMapper`], and given a stable alias and display label.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::fields::{normalize_key, FieldMapper};

static RE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\r?\n|,\s*and\s+|,").unwrap());

const ALIAS_SUFFIX: &str = "_as_column";

const AGGREGATE_KEYWORDS: &[&str] = &["sum", "count", "min", "max"];

/// One way of separating a field name from a trailing annotation.
pub struct AnnotationRule {
    pub name: &'static str,
    regex: Regex,
}

impl AnnotationRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
        }
    }

    /// Returns the field name if the token has this rule's shape.
    pub fn extract<'t>(&self, token: &'t str) -> Option<&'t str> {
        self.regex
            .captures(token)
            .and_then(|caps| caps.name("name"))
            .map(|m| m.as_str().trim())
    }
}

/// Annotation shapes, tried top to bottom; the first match wins.
///
/// A dash only separates when whitespace sits on at least one side of it, so
/// hyphenated labels such as `sid-said` stay whole.
pub static ANNOTATION_RULES: LazyLock<Vec<AnnotationRule>> = LazyLock::new(|| {
    vec![
        AnnotationRule::new(
            "dash_or_equals",
            r"^(?P<name>.+?)(?:\s+-\s*|\s*-\s+|\s*=\s*)(?P<note>.*)$",
        ),
        AnnotationRule::new(
            "parenthesized",
            r"^(?P<name>[^()]+?)\s*\((?P<note>[^()]*)\)$",
        ),
    ]
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Token as it appeared in the ticket, trimmed.
    pub raw: String,
    /// Lowercased, whitespace-normalized field name.
    pub key: String,
    /// Resolved expression; `None` for an unrecognized field.
    pub expression: Option<String>,
    /// Machine identifier used in the job's column manifest.
    pub alias: String,
    /// Human label, e.g. `Publisher Name`.
    pub label: String,
    /// Label as a column name in the validation query (backticked if spaced).
    pub report_name: String,
    pub is_aggregate: bool,
}

impl ColumnSpec {
    pub fn is_mapped(&self) -> bool {
        self.expression.is_some()
    }

    /// The expression, or an empty fragment for an unrecognized field.
    pub fn expression_or_blank(&self) -> &str {
        self.expression.as_deref().unwrap_or("")
    }
}

/// Ordered column specs for one job. Order is the ticket's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    specs: Vec<ColumnSpec>,
}

impl ColumnSet {
    pub fn new(specs: Vec<ColumnSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[ColumnSpec] {
        &self.specs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn unmapped(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.specs.iter().filter(|spec| !spec.is_mapped())
    }

    /// `alias|Label` pairs, comma separated.
    pub fn manifest(&self) -> String {
        self.specs
            .iter()
            .map(|spec| format!("{}|{}", spec.alias, spec.label))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// SELECT list for the scheduled query (`expr as alias`).
    pub fn select_list(&self) -> String {
        self.specs
            .iter()
            .map(|spec| format!("{} as {}", spec.expression_or_blank(), spec.alias))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// SELECT list for the validation query (`expr as Label`).
    pub fn report_select_list(&self) -> String {
        self.specs
            .iter()
            .map(|spec| format!("{} as {}", spec.expression_or_blank(), spec.report_name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Mapped, non-aggregate expressions in ticket order.
    pub fn group_by_expressions(&self) -> Vec<&str> {
        self.specs
            .iter()
            .filter(|spec| !spec.is_aggregate)
            .filter_map(|spec| spec.expression.as_deref())
            .collect()
    }

    pub fn group_by(&self) -> String {
        self.group_by_expressions().join(", ")
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a ColumnSpec;
    type IntoIter = std::slice::Iter<'a, ColumnSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

pub struct ColumnSpecParser {
    mapper: FieldMapper,
}

impl ColumnSpecParser {
    pub fn new(mapper: FieldMapper) -> Self {
        Self { mapper }
    }

    pub fn mapper(&self) -> &FieldMapper {
        &self.mapper
    }

    pub fn parse(&self, text: &str) -> ColumnSet {
        let mut occurrences: HashMap<String, usize> = HashMap::new();
        let mut specs = Vec::new();

        for token in RE_SEPARATOR.split(text).map(str::trim).filter(|t| !t.is_empty()) {
            let key = normalize_key(extract_name(token));
            if key.is_empty() {
                continue;
            }

            let occurrence = occurrences.entry(key.clone()).or_insert(0);
            *occurrence += 1;

            let spec = self.build_spec(token, key, *occurrence);
            if spec.expression.is_none() {
                warn!(field = %spec.key, "Requested field has no known expression");
            }
            specs.push(spec);
        }

        debug!(columns = specs.len(), "Parsed column list");
        ColumnSet::new(specs)
    }

    fn build_spec(&self, token: &str, key: String, occurrence: usize) -> ColumnSpec {
        let expression = self.mapper.lookup(&key).map(str::to_string);
        let is_aggregate = expression.as_deref().is_some_and(is_aggregate_expression);

        let base_alias = format!("{}{}", key.replace(' ', "_"), ALIAS_SUFFIX);
        let base_label = display_label(&key);
        let (alias, label) = if occurrence > 1 {
            (
                format!("{}_{}", base_alias, occurrence),
                format!("{} {}", base_label, occurrence),
            )
        } else {
            (base_alias, base_label)
        };

        ColumnSpec {
            raw: token.to_string(),
            report_name: quote_if_spaced(&label),
            key,
            expression,
            alias,
            label,
            is_aggregate,
        }
    }
}

/// Field name from a token, after applying the first matching annotation rule.
pub fn extract_name(token: &str) -> &str {
    ANNOTATION_RULES
        .iter()
        .find_map(|rule| rule.extract(token))
        .unwrap_or(token)
}

/// Short words (three characters or fewer) are capitalized; longer words are
/// title-cased, which also capitalizes letters after inner punctuation.
pub fn display_label(key: &str) -> String {
    key.split_whitespace()
        .map(|word| {
            if word.chars().count() <= 3 {
                capitalize(word)
            } else {
                title_case(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Uppercases every letter that follows a non-letter, lowercases the rest.
pub(crate) fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if previous_is_letter {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }
    result
}

fn quote_if_spaced(label: &str) -> String {
    if label.contains(' ') {
        format!("`{}`", label)
    } else {
        label.to_string()
    }
}

/// Case-insensitive substring check against the aggregate keywords.
pub fn is_aggregate_expression(expression: &str) -> bool {
    let lowered = expression.to_lowercase();
    AGGREGATE_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}
