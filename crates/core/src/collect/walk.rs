use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;

use super::types::{FileContent, FileRecord, DEFAULT_IGNORE, DEFAULT_MAX_FILE_BYTES};

/// Error type for walk operations
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("Walk root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to read walk root {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Options controlling a single walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Files larger than this are recorded without content.
    pub max_file_bytes: u64,
    /// Exact, case-sensitive base names to skip along with their subtrees.
    pub ignore: BTreeSet<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            ignore: DEFAULT_IGNORE.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl WalkOptions {
    /// Add extra base names to the ignore set.
    pub fn with_ignored<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    pub fn is_ignored(&self, base_name: &str) -> bool {
        self.ignore.contains(base_name)
    }
}

/// Walk `root` depth-first and record every regular file below it.
///
/// Entries come out in directory-listing order, with a subdirectory's
/// contents emitted before the rest of its siblings. Nothing is sorted.
/// The ignore set is matched against base names only, so an ignored name
/// prunes a directory anywhere in the tree and skips plain files with the
/// same name too. Entries that fail to list or stat are skipped.
pub fn walk(root: &Path, options: &WalkOptions) -> Result<Vec<FileRecord>, WalkError> {
    let metadata = fs::metadata(root).map_err(|source| WalkError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    if !metadata.is_dir() {
        return Err(WalkError::NotADirectory(root.to_path_buf()));
    }

    let ignore = options.ignore.clone();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            entry.depth() == 0
                || !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| ignore.contains(name))
        })
        .build();

    let mut records = Vec::new();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                log::debug!("Skipping unreadable entry: {err}");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                log::debug!("Skipping {}: {err}", entry.path().display());
                continue;
            }
        };

        let content = if size > options.max_file_bytes {
            FileContent::TooLarge
        } else {
            match fs::read_to_string(entry.path()) {
                Ok(text) => FileContent::Text(text),
                Err(err) => {
                    log::debug!("Could not read {} as text: {err}", entry.path().display());
                    FileContent::Unreadable
                }
            }
        };

        records.push(FileRecord {
            path: relative_slash_path(root, entry.path()),
            size,
            content,
        });
    }

    Ok(records)
}

/// Render `path` relative to `root` with `/` separators.
pub fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn find<'a>(records: &'a [FileRecord], path: &str) -> Option<&'a FileRecord> {
        records.iter().find(|r| r.path == path)
    }

    #[test]
    fn test_small_files_capture_exact_text() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "index.html", "<h1>Hello</h1>\n");
        write(root, "src/app.js", "console.log('hi');\n");

        let records = walk(root, &WalkOptions::default()).unwrap();

        assert_eq!(records.len(), 2);
        let index = find(&records, "index.html").unwrap();
        assert_eq!(index.size, 15);
        assert_eq!(index.text(), Some("<h1>Hello</h1>\n"));
        let app = find(&records, "src/app.js").unwrap();
        assert_eq!(app.text(), Some("console.log('hi');\n"));
    }

    #[test]
    fn test_file_at_threshold_is_captured() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "exact.txt", "a".repeat(8192));
        write(root, "over.txt", "a".repeat(8193));

        let records = walk(root, &WalkOptions::default()).unwrap();

        let exact = find(&records, "exact.txt").unwrap();
        assert_eq!(exact.text().map(str::len), Some(8192));
        let over = find(&records, "over.txt").unwrap();
        assert_eq!(over.size, 8193);
        assert_eq!(over.content, FileContent::TooLarge);
    }

    #[test]
    fn test_large_files_have_no_content_even_when_readable() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "notes.md", "0123456789");

        let options = WalkOptions::default().with_max_file_bytes(4);
        let records = walk(root, &options).unwrap();

        assert_eq!(records[0].content, FileContent::TooLarge);
        assert_eq!(records[0].size, 10);
    }

    #[test]
    fn test_non_utf8_file_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "logo.png", [0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe, 0x00]);

        let records = walk(root, &WalkOptions::default()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].size, 7);
        assert_eq!(records[0].content, FileContent::Unreadable);
    }

    #[test]
    fn test_ignored_directories_are_pruned_at_any_depth() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "package.json", "{}");
        write(root, "node_modules/left-pad/index.js", "module.exports = 1;");
        write(root, "packages/web/node_modules/react/index.js", "x");
        write(root, "packages/web/main.js", "main();");
        write(root, ".git/HEAD", "ref: refs/heads/main");

        let records = walk(root, &WalkOptions::default()).unwrap();
        let mut paths: Vec<_> = records.iter().map(|r| r.path.as_str()).collect();
        paths.sort();

        assert_eq!(paths, vec!["package.json", "packages/web/main.js"]);
    }

    #[test]
    fn test_ignored_names_match_plain_files_too() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, ".env", "ANTHROPIC_API_KEY=secret");
        write(root, "config/.env.local", "X=1");
        write(root, "node_modules", "not a directory");
        write(root, "README.md", "# readme");

        let records = walk(root, &WalkOptions::default()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "README.md");
    }

    #[test]
    fn test_ignore_match_is_case_sensitive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "Node_Modules/kept.js", "1");

        let records = walk(root, &WalkOptions::default()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "Node_Modules/kept.js");
    }

    #[test]
    fn test_extra_ignored_names() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "dist/bundle.js", "1");
        write(root, "src/index.js", "2");

        let options = WalkOptions::default().with_ignored(["dist"]);
        let records = walk(root, &options).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "src/index.js");
    }

    #[test]
    fn test_hidden_and_gitignored_files_are_not_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, ".gitignore", "build\n");
        write(root, "build/out.txt", "out");
        write(root, ".prettierrc", "{}");

        let records = walk(root, &WalkOptions::default()).unwrap();
        let mut paths: Vec<_> = records.iter().map(|r| r.path.as_str()).collect();
        paths.sort();

        assert_eq!(paths, vec![".gitignore", ".prettierrc", "build/out.txt"]);
    }

    #[test]
    fn test_subdirectory_contents_are_contiguous() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a/one.txt", "1");
        write(root, "a/deep/two.txt", "2");
        write(root, "b/three.txt", "3");

        let records = walk(root, &WalkOptions::default()).unwrap();
        let positions: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.path.starts_with("a/"))
            .map(|(i, _)| i)
            .collect();

        assert_eq!(records.len(), 3);
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[1] - positions[0], 1);
    }

    #[test]
    fn test_root_must_be_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(matches!(
            walk(&file, &WalkOptions::default()),
            Err(WalkError::NotADirectory(_))
        ));
        assert!(matches!(
            walk(&temp_dir.path().join("missing"), &WalkOptions::default()),
            Err(WalkError::Io { .. })
        ));
    }

    #[test]
    fn test_root_named_like_ignored_entry_is_still_walked() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("node_modules");
        write(&root, "pkg/index.js", "1");

        let records = walk(&root, &WalkOptions::default()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "pkg/index.js");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a.txt", "a");
        write(root, "locked/secret.txt", "s");
        write(root, "z/b.txt", "b");
        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop a privileged user.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let records = walk(root, &WalkOptions::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let records = records.unwrap();
        let mut paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        paths.sort();
        assert_eq!(paths, vec!["a.txt", "z/b.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "a.txt", "a");
        std::os::unix::fs::symlink(root.join("gone.txt"), root.join("link.txt")).unwrap();

        let records = walk(root, &WalkOptions::default()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "a.txt");
    }

    #[test]
    fn test_relative_slash_path() {
        let root = Path::new("/project");
        assert_eq!(
            relative_slash_path(root, Path::new("/project/src/lib/util.js")),
            "src/lib/util.js"
        );
        assert_eq!(relative_slash_path(root, Path::new("/project/a")), "a");
    }
}
