use std::fmt;
use std::path::PathBuf;

/// The compiler (or its wrapper) could not be found on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError {
    pub name: String,
    pub searched: Vec<PathBuf>,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.searched.is_empty() {
            write!(f, "not found: {} (search path is empty)", self.name)
        } else {
            write!(
                f,
                "not found: {} (searched {} directories)",
                self.name,
                self.searched.len()
            )
        }
    }
}

impl std::error::Error for ResolveError {}

/// Failure to read or write an options file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {e}"),
            ConfigError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Crate-level error. Invocations never return it directly; it is rendered
/// into the `stderr` field of an `InvocationResult` or logged.
#[derive(Debug, Clone)]
pub enum InvokeError {
    Spawn { program: String, message: String },
    Config { message: String },
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::Spawn { program, message } => {
                write!(f, "Failed to spawn {program}: {message}")
            }
            InvokeError::Config { message } => write!(f, "Invalid options: {message}"),
        }
    }
}

impl std::error::Error for InvokeError {}

impl From<ConfigError> for InvokeError {
    fn from(e: ConfigError) -> Self {
        InvokeError::Config {
            message: e.to_string(),
        }
    }
}
