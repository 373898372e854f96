//! Path resolution and content types for the static dev server

use std::path::{Component, Path, PathBuf};

/// File served when a request resolves to a directory or a missing path.
pub const INDEX_FILE: &str = "index.html";

/// Body of every 404 response.
pub const NOT_FOUND_BODY: &str = "<h1>404 Not Found</h1>";

/// Content type for extensions missing from [`MIME_TYPES`].
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extension to content type table. Matching is exact and case-sensitive.
pub const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("txt", "text/plain"),
];

/// Error type for request path resolution
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Request path is not valid UTF-8 after decoding: {0}")]
    InvalidEncoding(String),

    #[error("Request path escapes the served root: {0}")]
    Traversal(String),
}

/// Infer a content type from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            MIME_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, content_type)| *content_type)
        })
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Map a URL path onto `root`.
///
/// The path is percent-decoded and joined component by component. Parent
/// (`..`) components, drive prefixes and NUL bytes are rejected rather than
/// normalized away.
pub fn resolve_request_path(root: &Path, url_path: &str) -> Result<PathBuf, ResolveError> {
    let decoded = urlencoding::decode(url_path)
        .map_err(|_| ResolveError::InvalidEncoding(url_path.to_string()))?;

    if decoded.contains('\0') {
        return Err(ResolveError::Traversal(url_path.to_string()));
    }

    let relative = decoded.trim_start_matches('/');
    let mut resolved = root.to_path_buf();

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(name) => resolved.push(name),
            Component::CurDir => continue,
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ResolveError::Traversal(url_path.to_string()));
            }
        }
    }

    Ok(resolved)
}

/// Resolve a request to the file that should be read.
///
/// Directories and paths that do not exist get [`INDEX_FILE`] appended.
/// Existing targets must stay inside `root` once symlinks are resolved.
pub fn resolve_target(root: &Path, url_path: &str) -> Result<PathBuf, ResolveError> {
    let resolved = resolve_request_path(root, url_path)?;

    let target = if resolved.is_file() {
        resolved
    } else {
        resolved.join(INDEX_FILE)
    };

    if let (Ok(canonical_root), Ok(canonical_target)) = (root.canonicalize(), target.canonicalize())
    {
        if !canonical_target.starts_with(&canonical_root) {
            return Err(ResolveError::Traversal(url_path.to_string()));
        }
    }

    Ok(target)
}

/// Display form of `path` relative to `root`, for request logs.
pub fn display_relative(root: &Path, path: &Path) -> String {
    crate::collect::walk::relative_slash_path(root, path)
}
