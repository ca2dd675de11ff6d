//! Recognizing compass's "generated file" notices in its stdout.

use std::path::{Path, PathBuf};

/// A file compass reports having (re)written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Project root the child ran in.
    pub cwd: PathBuf,
    /// Directory the generated stylesheets are rooted at.
    pub base: PathBuf,
    /// Absolute location of the generated file.
    pub path: PathBuf,
}

impl GeneratedFile {
    pub fn new(project: &Path, css_dir: &Path, relative: &str) -> Self {
        Self {
            cwd: project.to_path_buf(),
            base: css_dir.to_path_buf(),
            path: project.join(relative),
        }
    }
}

const OVERWRITE: &str = "overwrite";

/// Relative path named by an `overwrite <path>` line, if this is one.
pub fn overwritten_path(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(OVERWRITE)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let path = rest.trim();
    (!path.is_empty()).then_some(path)
}

/// Every `overwrite` path in a chunk of stdout, in order. Lines may be
/// separated by any run of `\n` and `\r`.
pub fn scan_chunk(chunk: &str) -> Vec<&str> {
    chunk
        .split(['\n', '\r'])
        .filter_map(overwritten_path)
        .collect()
}

/// True for a chunk that is only an ANSI SGR sequence such as `ESC[0m`,
/// optionally followed by a line ending.
pub fn is_bare_color_reset(chunk: &str) -> bool {
    let Some(rest) = chunk.trim_end_matches(['\n', '\r']).strip_prefix("\u{1b}[") else {
        return false;
    };
    let Some(digits) = rest.strip_suffix('m') else {
        return false;
    };
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
