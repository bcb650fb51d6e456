//! Helpers for sanitizing data before it enters tracing span attributes.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Keeps the first character of the local part and the domain.
///
/// `ann.lee@example.com` → `a***@example.com`
pub fn redact_email(address: &str) -> String {
    let address = address.trim();
    match address.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

/// Redacted recipients joined for a single span field.
pub fn redact_recipients(recipients: &[String]) -> String {
    recipients
        .iter()
        .map(|r| redact_email(r))
        .collect::<Vec<_>>()
        .join(", ")
}
