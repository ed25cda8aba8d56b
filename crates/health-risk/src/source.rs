use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Input feeds the engine reads from the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    Profile,
    Settings,
    Observations,
    NutritionTracker,
    SleepTracker,
}

impl DataSourceKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Profile => "user profile",
            Self::Settings => "prediction settings",
            Self::Observations => "clinical observations",
            Self::NutritionTracker => "nutrition tracker",
            Self::SleepTracker => "sleep tracker",
        }
    }
}

impl std::fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure to read or decode one data file.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid CSV in {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

/// Opens, decodes and closes a JSON file. The handle is dropped on every
/// return path, including decode failures.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn read_json_reports_missing_file_as_io() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let error = read_json::<serde_json::Value>(&dir.path().join("missing.json"))
            .expect_err("missing file fails");

        match error {
            SourceError::Io { path, .. } => assert!(path.ends_with("missing.json")),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn read_json_reports_decode_failures() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").expect("write fixture");

        let error = read_json::<serde_json::Value>(&path).expect_err("broken file fails");
        assert!(matches!(error, SourceError::Json { .. }));
        assert!(error.to_string().contains("broken.json"));
    }
}
