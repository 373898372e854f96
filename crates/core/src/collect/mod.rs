pub mod prompt;
pub mod snapshot;
pub mod types;
pub mod walk;

pub use prompt::{build_prompt, console_preview, PromptStyle};
pub use snapshot::{load_snapshot, save_snapshot, Snapshot, SnapshotError};
pub use types::{FileContent, FileRecord, WalkSummary};
pub use walk::{walk, WalkError, WalkOptions};
