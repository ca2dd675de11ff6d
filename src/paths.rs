//! Path conventions shared by argument building and result reporting.
//!
//! Compass receives paths as plain strings, so every conversion from `Path`
//! to argument text goes through this module. All normalization here is
//! lexical. Only [`absolute`] consults the process, for its working
//! directory.

use std::path::{Component, Path, PathBuf};

// ── Executable names ─────────────────────────────────────────────

pub const COMPASS_EXECUTABLE: &str = "compass";
pub const BUNDLE_EXECUTABLE: &str = "bundle";
pub const BUNDLE_EXEC_VERB: &str = "exec";

// ── Default project layout ───────────────────────────────────────

pub const DEFAULT_CSS_DIR: &str = "css";
pub const DEFAULT_SASS_DIR: &str = "sass";
pub const DEFAULT_IMAGES_DIR: &str = "images";
pub const DEFAULT_JAVASCRIPTS_DIR: &str = "js";
pub const DEFAULT_FONTS_DIR: &str = "font";

// ── Platform-dependent separators ────────────────────────────────

/// Which separator rules apply when handing the project root to compass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Render a path for the compass command line. Backslashes become
    /// forward slashes on Windows; elsewhere the text passes through.
    pub fn argument_path(self, path: &Path) -> String {
        let text = path.to_string_lossy();
        match self {
            Platform::Windows => to_forward_slashes(&text),
            Platform::Unix => text.into_owned(),
        }
    }
}

pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

// ── Lexical path helpers ─────────────────────────────────────────

/// Collapse `.` and `..` components without consulting the filesystem.
/// `..` never climbs above a root; on a relative path it is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// `path` expressed relative to `base`, both normalized first.
///
/// Returns an empty path when they are equal. If one is absolute and the
/// other is not there is no meaningful relation, so `path` is returned as is.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);
    if path.has_root() != base.has_root() {
        return path;
    }

    let path_parts: Vec<Component<'_>> = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let base_parts: Vec<Component<'_>> = base
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in base_parts.iter().skip(common) {
        relative.push("..");
    }
    for part in path_parts.iter().skip(common) {
        relative.push(part.as_os_str());
    }
    relative
}

/// `path` made absolute against the current directory and normalized.
/// Falls back to `path` itself when there is no current directory.
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).map_or_else(|_| path.to_path_buf(), |p| normalize(&p))
}

/// Interpret `file` against `project` when it is relative.
pub fn resolve_in(project: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        normalize(file)
    } else {
        normalize(&project.join(file))
    }
}

/// Where compass writes the compiled artifact for `file`:
/// `<project>/<css>/<file relative to <project>/<sass>>`.
pub fn output_path(project: &Path, css: &str, sass: &str, file: &Path) -> PathBuf {
    let source = resolve_in(project, file);
    let sass_dir = normalize(&project.join(sass));
    let relative = relative_to(&source, &sass_dir);
    normalize(&project.join(css).join(relative))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_slashes() {
        assert_eq!(to_forward_slashes(r"src\sass\app.scss"), "src/sass/app.scss");
        assert_eq!(to_forward_slashes("already/fine"), "already/fine");
    }

    #[test]
    fn test_argument_path_only_rewrites_on_windows() {
        let project = Path::new(r"C:\work\site");
        assert_eq!(Platform::Windows.argument_path(project), "C:/work/site");
        assert_eq!(Platform::Unix.argument_path(project), r"C:\work\site");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("./a/b")), PathBuf::from("a/b"));
        assert_eq!(normalize(Path::new("../a")), PathBuf::from("../a"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new(".")), PathBuf::from("."));
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/p/src/sass/app.scss"), Path::new("/p/src/sass")),
            PathBuf::from("app.scss")
        );
        assert_eq!(
            relative_to(Path::new("/p/other/x.scss"), Path::new("/p/sass")),
            PathBuf::from("../other/x.scss")
        );
        assert_eq!(
            relative_to(Path::new("sass/partials/_a.scss"), Path::new("./sass")),
            PathBuf::from("partials/_a.scss")
        );
        assert_eq!(relative_to(Path::new("/p/sass"), Path::new("/p/sass")), PathBuf::new());
    }

    #[test]
    fn test_output_path_follows_css_dir() {
        let out = output_path(
            Path::new("/srv/site"),
            "build/css",
            "src/sass",
            Path::new("src/sass/app.scss"),
        );
        assert_eq!(out, PathBuf::from("/srv/site/build/css/app.scss"));

        let nested = output_path(
            Path::new("/srv/site"),
            "css",
            "sass",
            Path::new("/srv/site/sass/pages/home.scss"),
        );
        assert_eq!(nested, PathBuf::from("/srv/site/css/pages/home.scss"));
    }

    #[test]
    fn test_absolute_anchors_relative_project() {
        let cwd = normalize(&std::env::current_dir().unwrap());
        assert_eq!(absolute(Path::new(".")), cwd);
        assert_eq!(absolute(Path::new("./site/../site")), cwd.join("site"));
        assert_eq!(absolute(Path::new("/srv/./site")), PathBuf::from("/srv/site"));
    }

    #[test]
    fn test_output_path_with_anchored_project_and_absolute_file() {
        let project = absolute(Path::new("."));
        let file = project.join("sass/app.scss");
        assert_eq!(output_path(&project, "css", "sass", &file), project.join("css/app.scss"));
    }
}
