//! Table-driven tests for configuration loading and validation.

mod common;

use std::io::Write;

use reportgen::config::{load_config, load_config_from_str, load_config_from_yaml_str};

struct ConfigTestCase {
    name: &'static str,
    config_json: &'static str,
    should_succeed: bool,
    expected_error: Option<&'static str>,
}

const JSON_CONFIG_TESTS: &[ConfigTestCase] = &[
    ConfigTestCase {
        name: "valid_minimal",
        config_json: r#"{"version": "1.0"}"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "valid_full",
        config_json: r#"{
            "version": "1.0",
            "field_mappings": {"bounce rate": "round(avg(bounced), 4)"},
            "export": {
                "internal_recipient": "ops@example.net",
                "mail_from": "reports@example.net",
                "mail_body": "See attached.",
                "filename_prefix": "example",
                "subject_prefix": "Example"
            },
            "query": {"source_table": "events_v2", "advertiser_dim_table": "advertisers"},
            "schedule": {"baseline_hour": 2, "default_minute": 30, "default_hour": 5, "default_weekday": 2},
            "dependency": {"task_id": "done", "dag_id": "etl"},
            "store": {"url": "http://ch:8123", "database": "stats", "user": "reader", "password_env_var": null}
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "missing_version",
        config_json: r#"{"field_mappings": {}}"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "unsupported_version",
        config_json: r#"{"version": "2.0"}"#,
        should_succeed: false,
        expected_error: Some("Unsupported config version"),
    },
    ConfigTestCase {
        name: "unknown_top_level_key",
        config_json: r#"{"version": "1.0", "recipients": []}"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "baseline_hour_out_of_range",
        config_json: r#"{"version": "1.0", "schedule": {"baseline_hour": 24}}"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "weekday_out_of_range",
        config_json: r#"{"version": "1.0", "schedule": {"default_weekday": 7}}"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "blank_mapping_expression",
        config_json: r#"{"version": "1.0", "field_mappings": {"visits": "  "}}"#,
        should_succeed: false,
        expected_error: Some("Invalid field mapping 'visits'"),
    },
    ConfigTestCase {
        name: "mapping_not_a_string",
        config_json: r#"{"version": "1.0", "field_mappings": {"visits": 3}}"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "malformed_json",
        config_json: r#"{"version": "1.0",}"#,
        should_succeed: false,
        expected_error: Some("Failed to parse config JSON"),
    },
];

#[test]
fn test_json_config_loading() {
    for case in JSON_CONFIG_TESTS {
        let result = load_config_from_str(case.config_json);
        if case.should_succeed {
            assert!(result.is_ok(), "[{}] expected success, got {:?}", case.name, result.err());
        } else {
            let err = result.expect_err(case.name).to_string();
            if let Some(expected) = case.expected_error {
                assert!(
                    err.contains(expected),
                    "[{}] expected error containing '{}', got '{}'",
                    case.name,
                    expected,
                    err
                );
            }
        }
    }
}

#[test]
fn test_yaml_and_json_agree() {
    let json = load_config_from_str(
        r#"{"version": "1.0", "query": {"source_table": "events_v2"}, "schedule": {"default_hour": 6}}"#,
    )
    .unwrap();
    let yaml = load_config_from_yaml_str(
        "version: \"1.0\"\nquery:\n  source_table: events_v2\nschedule:\n  default_hour: 6\n",
    )
    .unwrap();
    assert_eq!(json, yaml);
}

#[test]
fn test_load_by_extension() {
    let mut yaml_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(yaml_file, "version: \"1.0\"\ndependency:\n  dag_id: etl-yaml\n").unwrap();
    let config = load_config(yaml_file.path()).unwrap();
    assert_eq!(config.dependency.dag_id, "etl-yaml");

    let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(json_file, r#"{{"version": "1.0", "dependency": {{"dag_id": "etl-json"}}}}"#).unwrap();
    let config = load_config(json_file.path()).unwrap();
    assert_eq!(config.dependency.dag_id, "etl-json");
}

#[test]
fn test_missing_file_names_path() {
    let err = load_config("/nonexistent/reportgen/config.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/reportgen/config.json"));
}
