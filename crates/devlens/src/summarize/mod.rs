mod config;
mod raw;
mod sdk;
#[cfg(test)]
mod test_support;

pub use config::{Backend, SummarizerConfig};
pub use raw::HttpSummarizer;
pub use sdk::RigSummarizer;

use crate::collect::{collect_files, WalkArgs};
use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use devlens_core::collect::prompt::CONSOLE_PREVIEW_CHARS;
use devlens_core::collect::snapshot::format_generated_at;
use devlens_core::collect::{build_prompt, console_preview, load_snapshot, PromptStyle};
use devlens_core::collect::{FileRecord, SnapshotError};
use devlens_core::response::{describe_api_error, ResponseEnvelope};
use std::path::PathBuf;

const SYSTEM_PREAMBLE: &str = "\
You are a senior engineer helping a developer get an unfamiliar project running.
Answer from the file listing you are given. Be concrete and concise.";

/// A single-shot call to a hosted language model.
#[allow(async_fn_in_trait)]
pub trait Summarizer {
    async fn summarize(&self, prompt: &str) -> Result<ResponseEnvelope>;
}

/// The backend chosen at startup.
pub enum Client {
    Rig(RigSummarizer),
    Http(HttpSummarizer),
}

impl Client {
    pub fn from_config(config: &SummarizerConfig) -> Result<Self> {
        match config.backend {
            Backend::Rig => Ok(Client::Rig(RigSummarizer::new(config)?)),
            Backend::Http => Ok(Client::Http(HttpSummarizer::new(config))),
        }
    }
}

impl Summarizer for Client {
    async fn summarize(&self, prompt: &str) -> Result<ResponseEnvelope> {
        match self {
            Client::Rig(client) => client.summarize(prompt).await,
            Client::Http(client) => client.summarize(prompt).await,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum Style {
    /// Markdown sections with 500-character previews
    #[default]
    Markdown,
    /// A JSON array with 1000-character excerpts
    Json,
}

impl From<Style> for PromptStyle {
    fn from(s: Style) -> Self {
        match s {
            Style::Markdown => PromptStyle::Markdown,
            Style::Json => PromptStyle::Json,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct SummarizeOptions {
    /// Project root to walk
    #[arg(long, default_value = ".", conflicts_with = "snapshot")]
    pub root: PathBuf,

    /// Read files from a snapshot written by `devlens collect` instead of walking
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    #[clap(flatten)]
    pub walk: WalkArgs,

    /// Prompt layout
    #[arg(long, value_enum, default_value_t = Style::Markdown)]
    pub style: Style,

    /// Client implementation used for the request
    #[arg(long, value_enum, env = "SUMMARIZER_BACKEND", default_value_t = Backend::Rig)]
    pub backend: Backend,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier
    #[arg(long, env = "ANTHROPIC_MODEL", default_value = config::DEFAULT_MODEL)]
    pub model: String,

    /// Maximum tokens in the answer
    #[arg(long, default_value_t = config::DEFAULT_MAX_TOKENS)]
    pub max_tokens: u64,

    /// API origin
    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = config::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Print the prompt instead of sending it (no API key needed)
    #[arg(long)]
    pub dry_run: bool,

    /// Print the response envelope as JSON
    #[arg(long)]
    pub json: bool,
}

impl SummarizeOptions {
    fn config(&self) -> std::result::Result<SummarizerConfig, Error> {
        SummarizerConfig::new(
            self.api_key.clone(),
            self.model.clone(),
            self.max_tokens,
            self.base_url.clone(),
            self.backend,
        )
    }

    /// The snapshot-style prompt is always previewed before sending.
    fn shows_preview(&self, verbose: bool) -> bool {
        verbose || (matches!(self.style, Style::Json) && !self.json)
    }
}

pub async fn run(options: SummarizeOptions, global: crate::Global) -> Result<()> {
    // Resolve the credential before doing any work.
    let config = if options.dry_run {
        None
    } else {
        Some(options.config()?)
    };

    let files = load_files(&options, options.json)?;
    if !options.json {
        println!("Found {} files", files.len());
    }

    let prompt = build_prompt(&files, options.style.into());

    let Some(config) = config else {
        println!("{prompt}");
        return Ok(());
    };

    if global.verbose {
        eprintln!("Backend: {:?}", config.backend);
        eprintln!("Model: {}", config.model);
        eprintln!("Prompt length: {} chars", prompt.chars().count());
    }

    if options.shows_preview(global.verbose) {
        eprintln!(
            "Prompt preview (first {} chars):\n{}\n---",
            CONSOLE_PREVIEW_CHARS,
            console_preview(&prompt)
        );
    }

    if !options.json {
        println!("Sending to {}...", config.model);
    }

    let client = Client::from_config(&config)?;
    let envelope = client.summarize(&prompt).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        print_envelope(&envelope)?;
    }

    Ok(())
}

fn load_files(options: &SummarizeOptions, quiet: bool) -> Result<Vec<FileRecord>> {
    match &options.snapshot {
        Some(path) => match load_snapshot(path) {
            Ok(snapshot) => {
                if !quiet {
                    println!(
                        "Loaded snapshot of {} taken at {}",
                        snapshot.root,
                        format_generated_at(&snapshot)
                    );
                }
                Ok(snapshot.files)
            }
            Err(SnapshotError::NotFound(path)) => {
                Err(Error::SnapshotMissing(path.display().to_string()).into())
            }
            Err(e) => Err(eyre!(e)),
        },
        None => collect_files(&options.root, &options.walk),
    }
}

fn print_envelope(envelope: &ResponseEnvelope) -> Result<()> {
    match envelope {
        ResponseEnvelope::Answer { text } => {
            println!("\n{}\n", "Response:".green().bold());
            println!("{text}");
        }
        ResponseEnvelope::ApiError { error } => {
            eprintln!("\n{} {}", "API Error:".red().bold(), describe_api_error(error));
        }
        ResponseEnvelope::Raw { status, body } => {
            println!("\n{} (HTTP {status})\n{body}", "Raw Response:".yellow().bold());
        }
        ResponseEnvelope::Unrecognized { payload } => {
            println!(
                "\n{}\n{}",
                "Raw Response:".yellow().bold(),
                serde_json::to_string_pretty(payload)?
            );
        }
    }

    Ok(())
}
