#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use compass_invoker::SearchPathResolver;
use tempfile::TempDir;

/// File the stand-in scripts record their arguments to, inside the project.
pub const ARGS_FILE: &str = ".compass-args";

/// Records arguments, reports one generated file and one warning, exits 0.
pub const COMPASS_OK: &str = r#"printf '%s\n' "$@" > .compass-args
echo "    create css/ie.css"
echo "overwrite css/app.css"
echo "compass warning" >&2
printf '\033[0m\n' >&2
exit 0
"#;

/// Fails the way compass does on a syntax error.
pub const COMPASS_SYNTAX_ERROR: &str = r#"printf '%s\n' "$@" > .compass-args
echo "    error sass/app.scss (Line 3: Invalid CSS after \"a {\": expected \"}\")" >&2
exit 1
"#;

/// Dies from SIGTERM before exiting on its own.
pub const COMPASS_TERMINATED: &str = r#"printf '%s\n' "$@" > .compass-args
kill -TERM $$
sleep 3
"#;

/// A watcher that does nothing but stay alive for a while.
pub const COMPASS_WATCH: &str = r#"printf '%s\n' "$@" > .compass-args
sleep 3
"#;

/// A directory with a `bin/` for stand-in executables and a `project/` root.
pub struct Sandbox {
    pub root: TempDir,
    pub bin: PathBuf,
    pub project: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let bin = root.path().join("bin");
        let project = root.path().join("project");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::create_dir_all(project.join("sass")).unwrap();
        Self { root, bin, project }
    }

    /// Install an executable shell script called `name` into `bin/`.
    pub fn install(&self, name: &str, body: &str) -> PathBuf {
        let path = self.bin.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    pub fn resolver(&self) -> SearchPathResolver {
        SearchPathResolver::with_search_path(self.bin.as_os_str())
    }

    /// Arguments the last stand-in run recorded.
    pub fn recorded_args(&self) -> Vec<String> {
        let text = std::fs::read_to_string(self.project.join(ARGS_FILE)).unwrap();
        text.lines().map(str::to_string).collect()
    }

    pub fn project_str(&self) -> String {
        self.project.to_string_lossy().into_owned()
    }

    pub fn wait_for_args(&self) -> Vec<String> {
        let path = self.project.join(ARGS_FILE);
        for _ in 0..50 {
            if path_has_content(&path) {
                return self.recorded_args();
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
        self.recorded_args()
    }
}

fn path_has_content(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.len() > 0)
}
