//! Store password resolution.
//!
//! The password is read from a file (Docker secrets style) or an environment
//! variable, in that order. Having neither is fine: the store is then
//! queried without a password.

use secrecy::SecretString;

use crate::error::StoreError;

pub fn resolve_password(
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<Option<SecretString>, StoreError> {
    if let Some(path) = file_path.filter(|p| !p.is_empty()) {
        let expanded = expand_home(path);
        let content = std::fs::read_to_string(&expanded).map_err(|e| {
            StoreError::Credentials(format!("failed to read password file '{}': {}", expanded, e))
        })?;
        return Ok(Some(SecretString::from(content.trim().to_string())));
    }

    if let Some(var_name) = env_var.filter(|v| !v.is_empty()) {
        match std::env::var(var_name) {
            Ok(value) => return Ok(Some(SecretString::from(value.trim().to_string()))),
            Err(std::env::VarError::NotPresent) => return Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(StoreError::Credentials(format!(
                    "environment variable '{}' contains invalid UTF-8",
                    var_name
                )))
            }
        }
    }

    Ok(None)
}

/// Expands a leading `~` to the user's home directory.
fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    #[serial]
    fn test_file_takes_priority_over_env() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "  file_value  ").unwrap();

        std::env::set_var("REPORTGEN_TEST_PW_1", "env_value");
        let result = resolve_password(
            Some(temp_file.path().to_str().unwrap()),
            Some("REPORTGEN_TEST_PW_1"),
        )
        .unwrap()
        .unwrap();
        std::env::remove_var("REPORTGEN_TEST_PW_1");

        assert_eq!(result.expose_secret(), "file_value");
    }

    #[test]
    #[serial]
    fn test_env_var_fallback() {
        std::env::set_var("REPORTGEN_TEST_PW_2", "env_value\n");
        let result = resolve_password(None, Some("REPORTGEN_TEST_PW_2")).unwrap().unwrap();
        std::env::remove_var("REPORTGEN_TEST_PW_2");

        assert_eq!(result.expose_secret(), "env_value");
    }

    #[test]
    fn test_missing_env_var_means_no_password() {
        let result = resolve_password(None, Some("REPORTGEN_DEFINITELY_NOT_SET_12345")).unwrap();
        assert!(result.is_none());
        assert!(resolve_password(None, None).unwrap().is_none());
        assert!(resolve_password(Some(""), Some("")).unwrap().is_none());
    }

    #[test]
    fn test_unreadable_file_is_error() {
        let result = resolve_password(Some("/nonexistent/path/to/password"), None);
        assert!(matches!(result, Err(StoreError::Credentials(_))));
    }
}
