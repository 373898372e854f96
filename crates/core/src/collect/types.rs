use serde::{Deserialize, Serialize};

/// Default per-file byte threshold above which content is not captured.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 8 * 1024;

/// Base names skipped by default, together with everything below them.
pub const DEFAULT_IGNORE: &[&str] = &["node_modules", ".git", ".env", ".env.local"];

/// What the walker managed to capture for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// The file was under the threshold and decoded as UTF-8.
    Text(String),
    /// The file was over the threshold, so it was never read.
    TooLarge,
    /// The file was under the threshold but could not be read as text.
    Unreadable,
}

impl FileContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileContent::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// One walked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FileRecordRepr", into = "FileRecordRepr")]
pub struct FileRecord {
    /// Path relative to the walk root, `/`-separated on every platform.
    pub path: String,
    /// Size in bytes as reported by the file metadata.
    pub size: u64,
    pub content: FileContent,
}

impl FileRecord {
    pub fn text(&self) -> Option<&str> {
        self.content.as_text()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum SkipReason {
    TooLarge,
    Unreadable,
}

/// On-disk shape of a record: `content` is a string or `null`, and the
/// optional `skipped` tag tells the two `null` cases apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileRecordRepr {
    path: String,
    size: u64,
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    skipped: Option<SkipReason>,
}

impl From<FileRecord> for FileRecordRepr {
    fn from(record: FileRecord) -> Self {
        let (content, skipped) = match record.content {
            FileContent::Text(text) => (Some(text), None),
            FileContent::TooLarge => (None, Some(SkipReason::TooLarge)),
            FileContent::Unreadable => (None, Some(SkipReason::Unreadable)),
        };

        FileRecordRepr {
            path: record.path,
            size: record.size,
            content,
            skipped,
        }
    }
}

impl From<FileRecordRepr> for FileRecord {
    fn from(repr: FileRecordRepr) -> Self {
        let content = match (repr.content, repr.skipped) {
            (Some(text), _) => FileContent::Text(text),
            (None, Some(SkipReason::TooLarge)) => FileContent::TooLarge,
            (None, Some(SkipReason::Unreadable)) => FileContent::Unreadable,
            // Snapshots written without the tag
            (None, None) if repr.size > DEFAULT_MAX_FILE_BYTES => FileContent::TooLarge,
            (None, None) => FileContent::Unreadable,
        };

        FileRecord {
            path: repr.path,
            size: repr.size,
            content,
        }
    }
}

/// Aggregate counts over a set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalkSummary {
    pub files: usize,
    pub total_bytes: u64,
    pub captured: usize,
    pub too_large: usize,
    pub unreadable: usize,
}

impl WalkSummary {
    pub fn from_records(records: &[FileRecord]) -> Self {
        records.iter().fold(WalkSummary::default(), |mut acc, record| {
            acc.files += 1;
            acc.total_bytes += record.size;
            match record.content {
                FileContent::Text(_) => acc.captured += 1,
                FileContent::TooLarge => acc.too_large += 1,
                FileContent::Unreadable => acc.unreadable += 1,
            }
            acc
        })
    }
}
