//! Snapshot persistence
//!
//! A snapshot decouples collection from submission: one invocation walks the
//! tree and writes the records to a JSON file, a later one reads them back
//! and builds the prompt. The file has no schema version.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::types::FileRecord;
use super::walk::{walk, WalkError, WalkOptions};

/// Default snapshot file name, relative to the working directory.
pub const DEFAULT_SNAPSHOT_FILE: &str = "files_snapshot.json";

/// Error type for snapshot operations
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Walk(#[from] WalkError),
}

/// A serialized walk plus the metadata needed to make sense of it later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Absolute path of the walked root.
    pub root: String,
    #[serde(with = "rfc3339")]
    pub generated_at: DateTime<Utc>,
    pub files: Vec<FileRecord>,
}

impl Snapshot {
    pub fn new(root: &Path, files: Vec<FileRecord>) -> Self {
        Self {
            root: root.display().to_string(),
            generated_at: Utc::now(),
            files,
        }
    }

    /// Walk `root` and wrap the result. The root is canonicalized first so
    /// the stored path is absolute.
    pub fn collect(root: &Path, options: &WalkOptions) -> Result<Self, SnapshotError> {
        let root = root.canonicalize().map_err(|source| SnapshotError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let files = walk(&root, options)?;

        Ok(Self::new(&root, files))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Write `snapshot` to `path` as pretty-printed JSON.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SnapshotError> {
    let json = snapshot.to_json().map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, json).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a snapshot previously written by [`save_snapshot`].
pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SnapshotError::NotFound(path.to_path_buf())
        } else {
            SnapshotError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&text).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `generatedAt` is written with millisecond precision and a `Z` suffix.
mod rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Human-readable timestamp for console output.
pub fn format_generated_at(snapshot: &Snapshot) -> String {
    snapshot
        .generated_at
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
