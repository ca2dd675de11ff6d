//! Runs the Compass stylesheet compiler as a subprocess.
//!
//! [`Invoker`] turns an [`InvocationOptions`] record into a `compass` (or
//! `bundle exec compass`) command line, streams the child's output, forwards
//! `overwrite <path>` notices to a [`FlushSink`], and reports the exit code,
//! captured output and compiled stylesheet path as an [`InvocationResult`].

pub mod args;
pub mod config;
pub mod error;
pub mod invoker;
pub mod logger;
pub mod notice;
pub mod options;
pub mod paths;
pub mod resolve;
pub mod sinks;

pub use args::InvokerConfig;
pub use error::{ConfigError, InvokeError, ResolveError};
pub use invoker::{
    status_code, InvocationResult, Invoker, Outcome, PreparedInvocation, EXIT_NOT_FOUND,
    EXIT_SPAWN_FAILED,
};
pub use notice::GeneratedFile;
pub use options::{InvocationOptions, OutputStyle};
pub use paths::Platform;
pub use resolve::{ExecutableResolver, SearchPathResolver};
pub use sinks::{FlushSink, LogSink};
