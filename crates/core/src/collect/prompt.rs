use serde::Serialize;

use super::types::{FileContent, FileRecord};

/// Characters of each file shown in a [`PromptStyle::Markdown`] prompt.
pub const MARKDOWN_PREVIEW_CHARS: usize = 500;

/// Characters of each file shown in a [`PromptStyle::Json`] prompt.
pub const JSON_EXCERPT_CHARS: usize = 1000;

/// Characters of the outgoing prompt echoed to the console.
pub const CONSOLE_PREVIEW_CHARS: usize = 2000;

const MARKDOWN_HEADER: &str = "You are analyzing a web project. Here are the files:";

const MARKDOWN_INSTRUCTIONS: &str = "\
Please:
1. Summarize the project structure
2. List any missing dependencies or setup steps
3. Provide Windows PowerShell commands to run the project";

const JSON_INSTRUCTIONS: [&str; 3] = [
    "You are given a JSON array of files in a repository.",
    "Please summarize the repository structure, list Node-related files (package.json, package-lock.json, node_modules, scripts), and point out any files that look like they require setup (e.g., missing dependencies, start scripts).",
    "Provide next-step commands to install Node dependencies and launch the project on Windows (PowerShell).",
];

/// Layout of the generated prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptStyle {
    /// One `## path (size bytes)` section per file with a short preview.
    #[default]
    Markdown,
    /// A pretty-printed JSON array of `{ path, size, excerpt }`.
    Json,
}

#[derive(Debug, Serialize)]
struct JsonItem<'a> {
    path: &'a str,
    size: u64,
    excerpt: String,
}

/// Build the prompt for `files` in the requested style.
///
/// The result is not budgeted against any model context limit.
pub fn build_prompt(files: &[FileRecord], style: PromptStyle) -> String {
    match style {
        PromptStyle::Markdown => build_markdown_prompt(files),
        PromptStyle::Json => build_json_prompt(files),
    }
}

fn build_markdown_prompt(files: &[FileRecord]) -> String {
    let file_list = files
        .iter()
        .map(|file| format!("\n## {} ({} bytes)\n{}", file.path, file.size, markdown_preview(file)))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{MARKDOWN_HEADER}\n{file_list}\n\n{MARKDOWN_INSTRUCTIONS}")
}

fn markdown_preview(file: &FileRecord) -> String {
    match &file.content {
        FileContent::Text(text) if !text.is_empty() => {
            truncate_chars(text, MARKDOWN_PREVIEW_CHARS).to_string()
        }
        FileContent::Unreadable => format!("<binary or unreadable: {} bytes>", file.size),
        _ => format!("<{} bytes>", file.size),
    }
}

fn build_json_prompt(files: &[FileRecord]) -> String {
    let items: Vec<JsonItem> = files
        .iter()
        .map(|file| JsonItem {
            path: &file.path,
            size: file.size,
            excerpt: json_excerpt(file),
        })
        .collect();

    // Serializing a Vec of plain structs cannot fail.
    let array = serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string());

    let mut lines: Vec<String> = JSON_INSTRUCTIONS.iter().map(|s| s.to_string()).collect();
    lines.push("\n--- JSON FILES BEGIN ---\n".to_string());
    lines.push(array);
    lines.push("\n--- JSON FILES END ---\n".to_string());
    lines.join("\n")
}

fn json_excerpt(file: &FileRecord) -> String {
    match file.text() {
        Some(text) if !text.is_empty() => {
            truncate_chars(text, JSON_EXCERPT_CHARS).replace('\n', "\\n")
        }
        _ if file.size > 0 => format!("<{} bytes - skipped content>", file.size),
        _ => String::new(),
    }
}

/// Return at most `max_chars` characters of `text`, never splitting one.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// The part of a prompt echoed to the console before sending it.
pub fn console_preview(prompt: &str) -> &str {
    truncate_chars(prompt, CONSOLE_PREVIEW_CHARS)
}
