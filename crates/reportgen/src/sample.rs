//! The sample extract sent for stakeholder sign-off.

use serde_json::Value;

use crate::store::QueryResult;

const DELIMITER: char = ',';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleReport {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SampleReport {
    pub fn from_query_result(result: &QueryResult) -> Self {
        Self {
            headers: result.columns.iter().map(|c| humanize_header(c)).collect(),
            rows: result
                .rows
                .iter()
                .map(|row| row.iter().map(render_cell).collect())
                .collect(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Comma-delimited text, header line first, one record per line.
    pub fn to_delimited(&self) -> String {
        let mut out = String::new();
        push_record(&mut out, &self.headers);
        for row in &self.rows {
            push_record(&mut out, row);
        }
        out
    }
}

/// `Publisher_Name` → `Publisher Name`
pub fn humanize_header(column: &str) -> String {
    column.replace('_', " ")
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn push_record(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        out.push_str(&quote_field(field));
    }
    out.push('\n');
}

/// Quotes a field containing the delimiter, a quote or a line break;
/// embedded quotes are doubled.
fn quote_field(field: &str) -> String {
    if field.contains([DELIMITER, '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_query_result() {
        let result = QueryResult {
            columns: vec!["Date".to_string(), "Publisher_Name".to_string(), "Clicks".to_string()],
            rows: vec![
                vec![json!("2025-06-17"), json!("Acme, Inc."), json!(42)],
                vec![json!("2025-06-16"), json!(null), json!(7.5)],
            ],
        };
        let report = SampleReport::from_query_result(&result);

        assert_eq!(report.headers, vec!["Date", "Publisher Name", "Clicks"]);
        assert_eq!(report.row_count(), 2);
        assert_eq!(
            report.to_delimited(),
            "Date,Publisher Name,Clicks\n2025-06-17,\"Acme, Inc.\",42\n2025-06-16,,7.5\n"
        );
    }

    #[test]
    fn test_quote_field() {
        assert_eq!(quote_field("plain"), "plain");
        assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_empty_result_keeps_header() {
        let result = QueryResult {
            columns: vec!["Date".to_string()],
            rows: vec![],
        };
        assert_eq!(SampleReport::from_query_result(&result).to_delimited(), "Date\n");
    }
}
