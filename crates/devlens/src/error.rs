#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Missing ANTHROPIC_API_KEY. Set it in the environment or in a .env file (see .env.example)")]
    MissingApiKey,

    #[error("Snapshot not found at {0}. Run `devlens collect` first.")]
    SnapshotMissing(String),

    #[error("Network error: {0}. Check your internet connection and API key")]
    Network(String),
}
