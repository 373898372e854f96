use crate::prelude::{println, *};
use colored::Colorize;
use devlens_core::collect::snapshot::DEFAULT_SNAPSHOT_FILE;
use devlens_core::collect::types::{FileContent, FileRecord, DEFAULT_MAX_FILE_BYTES};
use devlens_core::collect::{save_snapshot, Snapshot, WalkOptions, WalkSummary};
use std::path::{Path, PathBuf};

/// Walk options shared by `collect` and `summarize`.
#[derive(Debug, Clone, clap::Args)]
pub struct WalkArgs {
    /// Files larger than this many bytes are listed without content
    #[arg(long, env = "DEVLENS_MAX_FILE_BYTES", default_value_t = DEFAULT_MAX_FILE_BYTES)]
    pub max_file_bytes: u64,

    /// Extra base names to skip, together with everything below them
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,
}

impl WalkArgs {
    pub fn to_options(&self) -> WalkOptions {
        WalkOptions::default()
            .with_max_file_bytes(self.max_file_bytes)
            .with_ignored(self.ignore.iter().cloned())
    }
}

#[derive(Debug, clap::Args)]
pub struct CollectOptions {
    /// Project root to walk
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Where to write the snapshot
    #[arg(short, long, default_value = DEFAULT_SNAPSHOT_FILE)]
    pub out: PathBuf,

    #[clap(flatten)]
    pub walk: WalkArgs,

    /// Print the snapshot to stdout instead of writing it
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: CollectOptions, global: crate::Global) -> Result<()> {
    let walk_options = collect_walk_options(&options);

    if global.verbose {
        println!("Collecting files from {}...", options.root.display());
    }

    let snapshot = Snapshot::collect(&options.root, &walk_options)
        .with_context(|| format!("Failed to collect files from {}", options.root.display()))?;

    if options.json {
        println!("{}", snapshot.to_json()?);
        return Ok(());
    }

    save_snapshot(&options.out, &snapshot)
        .with_context(|| format!("Failed to write snapshot to {}", options.out.display()))?;

    if global.verbose {
        print_records(&snapshot.files);
    }

    println!(
        "Wrote {} with {} files (content limited to {} bytes per file).",
        options.out.display().to_string().green(),
        snapshot.files.len(),
        walk_options.max_file_bytes
    );

    Ok(())
}

/// The snapshot file itself is never collected, so repeated runs do not
/// feed the previous snapshot into the next one.
fn collect_walk_options(options: &CollectOptions) -> WalkOptions {
    let walk_options = options.walk.to_options();

    match options.out.file_name().and_then(|name| name.to_str()) {
        Some(name) => walk_options.with_ignored([name]),
        None => walk_options,
    }
}

/// Print one row per record plus a totals line.
pub fn print_records(files: &[FileRecord]) {
    let mut table = new_table();
    table.add_row(prettytable::row!["Path", "Size", "Content"]);

    for file in files {
        table.add_row(prettytable::row![file.path, file.size, content_label(&file.content)]);
    }

    table.printstd();

    let summary = WalkSummary::from_records(files);
    println!(
        "{} files, {} bytes ({} captured, {} too large, {} unreadable)",
        summary.files, summary.total_bytes, summary.captured, summary.too_large, summary.unreadable
    );
}

fn content_label(content: &FileContent) -> &'static str {
    match content {
        FileContent::Text(_) => "text",
        FileContent::TooLarge => "too large",
        FileContent::Unreadable => "unreadable",
    }
}

/// Walk `root` for the `summarize` command.
pub fn collect_files(root: &Path, walk: &WalkArgs) -> Result<Vec<FileRecord>> {
    devlens_core::collect::walk(root, &walk.to_options())
        .with_context(|| format!("Failed to collect files from {}", root.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(out: &str) -> CollectOptions {
        CollectOptions {
            root: PathBuf::from("."),
            out: PathBuf::from(out),
            walk: WalkArgs {
                max_file_bytes: 1024,
                ignore: vec!["dist".to_string()],
            },
            json: false,
        }
    }

    #[test]
    fn test_walk_options_skip_the_snapshot_file() {
        let walk_options = collect_walk_options(&options("out/snap.json"));

        assert!(walk_options.is_ignored("snap.json"));
        assert!(walk_options.is_ignored("dist"));
        assert!(walk_options.is_ignored("node_modules"));
        assert_eq!(walk_options.max_file_bytes, 1024);
    }

    #[tokio::test]
    async fn test_run_writes_snapshot() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let root = temp_dir.path().join("site");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("index.html"), "<h1>Hi</h1>").unwrap();
        let out = root.join(DEFAULT_SNAPSHOT_FILE);

        let mut opts = options(out.to_str().unwrap());
        opts.root = root.clone();
        run(opts, crate::Global { verbose: false }).await.unwrap();

        // Second run must not pick up the first snapshot.
        let mut opts = options(out.to_str().unwrap());
        opts.root = root.clone();
        run(opts, crate::Global { verbose: false }).await.unwrap();

        let snapshot = devlens_core::collect::load_snapshot(&out).unwrap();
        assert_eq!(snapshot.files.len(), 1);
        assert_eq!(snapshot.files[0].path, "index.html");
    }
}
