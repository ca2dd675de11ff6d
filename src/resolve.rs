use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ResolveError;

/// Turns an executable name into a runnable path.
pub trait ExecutableResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<PathBuf, ResolveError>;
}

/// Looks executables up on a `PATH`-style search path with [`which`].
///
/// Names containing a path separator are checked directly instead of being
/// searched for, relative to the current directory. On Windows every
/// `PATHEXT` extension is tried as well.
#[derive(Debug, Clone)]
pub struct SearchPathResolver {
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl SearchPathResolver {
    /// Resolver over the current process's `PATH`.
    pub fn from_env() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
            cwd: current_dir(),
        }
    }

    /// Resolver over an explicit search path.
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
            cwd: current_dir(),
        }
    }

    fn directories(&self) -> Vec<PathBuf> {
        self.search_path
            .as_ref()
            .map(|p| std::env::split_paths(p).filter(|d| !d.as_os_str().is_empty()).collect())
            .unwrap_or_default()
    }
}

impl Default for SearchPathResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

impl ExecutableResolver for SearchPathResolver {
    fn resolve(&self, name: &str) -> Result<PathBuf, ResolveError> {
        let explicit = Path::new(name).components().count() > 1;
        let dirs = self.directories();
        if !explicit && dirs.is_empty() {
            return Err(ResolveError {
                name: name.to_string(),
                searched: dirs,
            });
        }

        let search = std::env::join_paths(&dirs).ok();
        match which::which_in(name, search, &self.cwd) {
            Ok(found) => {
                log::trace!("Resolved {name} to {}", found.display());
                Ok(found)
            }
            Err(e) => {
                log::trace!("Cannot resolve {name}: {e}");
                Err(ResolveError {
                    name: name.to_string(),
                    searched: if explicit { Vec::new() } else { dirs },
                })
            }
        }
    }
}
