use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;
use crate::job::JobDefinition;
use crate::sanitize::redact_path;

/// Writes `content` to `path`, creating missing parent directories.
/// An existing file is replaced.
pub fn write_artifact(path: &Path, content: &[u8]) -> Result<PathBuf, StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, content).map_err(|e| StorageError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(file = %redact_path(path), bytes = content.len(), "Wrote artifact");
    Ok(path.to_path_buf())
}

/// Writes the two artifacts of a run to caller-chosen paths.
pub struct ArtifactWriter {
    job_path: PathBuf,
    sample_path: PathBuf,
}

impl ArtifactWriter {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(job_path: P, sample_path: Q) -> Self {
        Self {
            job_path: job_path.as_ref().to_path_buf(),
            sample_path: sample_path.as_ref().to_path_buf(),
        }
    }

    pub fn job_path(&self) -> &Path {
        &self.job_path
    }

    pub fn sample_path(&self) -> &Path {
        &self.sample_path
    }

    /// Compact single-line JSON.
    pub fn write_job(&self, job: &JobDefinition) -> Result<PathBuf, StorageError> {
        let json = job.to_compact_json()?;
        write_artifact(&self.job_path, json.as_bytes())
    }

    pub fn write_sample(&self, delimited: &str) -> Result<PathBuf, StorageError> {
        write_artifact(&self.sample_path, delimited.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("jobs").join("2025").join("AD-1.json");

        let written = write_artifact(&path, b"{}").unwrap();

        assert_eq!(written, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sample.csv");

        write_artifact(&path, b"old contents").unwrap();
        write_artifact(&path, b"new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_failure_names_path() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"file, not a directory").unwrap();

        let err = write_artifact(&blocker.join("job.json"), b"{}").unwrap_err();
        match err {
            StorageError::CreateDirectory { path, .. } | StorageError::WriteFile { path, .. } => {
                assert!(path.starts_with(&blocker));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_writer_paths() {
        let temp = TempDir::new().unwrap();
        let writer = ArtifactWriter::new(temp.path().join("a.json"), temp.path().join("b.csv"));
        writer.write_sample("Date,Clicks\r\n").unwrap();

        assert_eq!(writer.sample_path(), temp.path().join("b.csv"));
        assert_eq!(writer.job_path(), temp.path().join("a.json"));
        assert_eq!(
            std::fs::read_to_string(writer.sample_path()).unwrap(),
            "Date,Clicks\r\n"
        );
    }
}
