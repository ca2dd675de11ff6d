//! Running compass: resolve, spawn, pump output, report.
//!
//! An invocation never returns an error. Resolution failures, spawn failures
//! and compiler failures all surface through [`InvocationResult`]: its exit
//! code and stderr text.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};

use crate::args::{self, InvokerConfig};
use crate::error::{InvokeError, ResolveError};
use crate::notice::{self, GeneratedFile};
use crate::options::InvocationOptions;
use crate::paths::{self, Platform};
use crate::resolve::{ExecutableResolver, SearchPathResolver};
use crate::sinks::{CompassLogSink, FlushSink, LogFlushSink, LogSink};

/// Exit code reported when the compiler or wrapper is not on the search path.
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit code reported when the executable was found but could not be started.
pub const EXIT_SPAWN_FAILED: i32 = 126;

// ── Results ──────────────────────────────────────────────────────

/// Outcome of one non-watch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    pub exit_code: i32,
    /// Captured stdout; empty when logging is off.
    pub stdout: String,
    pub stderr: String,
    /// Where the compiled stylesheet was written. Empty if nothing ran.
    pub output_path: PathBuf,
}

impl InvocationResult {
    fn not_spawned(exit_code: i32, stderr: String) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr,
            output_path: PathBuf::new(),
        }
    }

    pub fn not_found(err: &ResolveError) -> Self {
        Self::not_spawned(EXIT_NOT_FOUND, err.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// What `run` produced.
#[derive(Debug)]
pub enum Outcome {
    /// A compile run (or a failed resolution) finished.
    Finished(InvocationResult),
    /// A watch run is in progress. Dropping the child leaves it running.
    Watching(Child),
    /// A watch run could not be started.
    WatchFailed(InvokeError),
}

impl Outcome {
    pub fn into_result(self) -> Option<InvocationResult> {
        match self {
            Outcome::Finished(result) => Some(result),
            Outcome::Watching(_) | Outcome::WatchFailed(_) => None,
        }
    }
}

// ── Invoker ──────────────────────────────────────────────────────

/// Runs compass with a fixed set of collaborators.
pub struct Invoker {
    config: InvokerConfig,
    resolver: Arc<dyn ExecutableResolver>,
    flush: Arc<dyn FlushSink>,
    logger: Arc<dyn LogSink>,
    platform: Platform,
    echo: bool,
}

impl Default for Invoker {
    fn default() -> Self {
        Self::new()
    }
}

impl Invoker {
    /// Invoker over the process `PATH` that logs generated files and
    /// compiler diagnostics through the `log` facade.
    pub fn new() -> Self {
        Self {
            config: InvokerConfig::default(),
            resolver: Arc::new(SearchPathResolver::from_env()),
            flush: Arc::new(LogFlushSink),
            logger: Arc::new(CompassLogSink),
            platform: Platform::current(),
            echo: true,
        }
    }

    pub fn with_config(mut self, config: InvokerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_resolver(mut self, resolver: impl ExecutableResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn with_flush_sink(mut self, flush: Arc<dyn FlushSink>) -> Self {
        self.flush = flush;
        self
    }

    pub fn with_log_sink(mut self, logger: Arc<dyn LogSink>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Whether captured stdout is also echoed to our own stdout. Capture
    /// itself still follows `logging`.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Resolve the executable and build the command line without running it.
    ///
    /// A resolution failure comes back as the finished result the callback
    /// would receive: exit code 127, the error text as stderr.
    pub fn prepare(
        &self,
        file: &str,
        opts: &InvocationOptions,
    ) -> Result<PreparedInvocation, InvocationResult> {
        let file_path = paths::to_forward_slashes(file);
        let executable = self.config.executable_for(opts);
        let program = self.resolver.resolve(executable).map_err(|e| {
            log::debug!("Cannot run {executable}: {e}");
            InvocationResult::not_found(&e)
        })?;

        // Anchor the project once so the command line, the child's cwd and
        // the output path all agree on it.
        let mut opts = opts.clone();
        opts.project = paths::absolute(&opts.project);

        Ok(PreparedInvocation {
            program,
            args: args::build_args(&self.config, &opts, &file_path, self.platform),
            output_path: paths::output_path(
                &opts.project,
                &opts.css,
                &opts.sass,
                Path::new(&file_path),
            ),
            css_dir: opts.css_dir(),
            project: opts.project,
            watch: opts.watch,
            logging: opts.logging,
            echo: self.echo,
            flush: Arc::clone(&self.flush),
            logger: Arc::clone(&self.logger),
        })
    }

    /// Run compass on `file` and wait for it, unless `opts.watch` is set.
    pub async fn run(&self, file: &str, opts: &InvocationOptions) -> Outcome {
        match self.prepare(file, opts) {
            Ok(prepared) => prepared.run().await,
            Err(result) => Outcome::Finished(result),
        }
    }

    /// Run compass and hand the result to `callback`.
    ///
    /// The callback runs exactly once for compile runs, before any process is
    /// spawned if resolution fails. It never runs for watch runs; the
    /// watching child is detached and keeps running.
    pub async fn invoke<F>(&self, file: &str, opts: &InvocationOptions, callback: Option<F>)
    where
        F: FnOnce(InvocationResult),
    {
        let outcome = self.run(file, opts).await;
        if let (Some(result), Some(callback)) = (outcome.into_result(), callback) {
            callback(result);
        }
    }
}

// ── Prepared invocation ──────────────────────────────────────────

/// A resolved command line, ready to spawn.
pub struct PreparedInvocation {
    program: PathBuf,
    args: Vec<String>,
    output_path: PathBuf,
    project: PathBuf,
    css_dir: PathBuf,
    watch: bool,
    logging: bool,
    echo: bool,
    flush: Arc<dyn FlushSink>,
    logger: Arc<dyn LogSink>,
}

impl PreparedInvocation {
    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Working directory of the child: the project root.
    pub fn cwd(&self) -> &Path {
        &self.project
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn is_watch(&self) -> bool {
        self.watch
    }

    /// Program and arguments joined with spaces, for display.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.project)
            .stdin(Stdio::null());
        command
    }

    pub async fn run(self) -> Outcome {
        log::debug!("Running {} in {}", self.command_line(), self.project.display());
        if self.watch {
            return self.spawn_watch();
        }

        let mut child = match self
            .command()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                let err = self.spawn_error(&e);
                log::error!("{err}");
                return Outcome::Finished(InvocationResult::not_spawned(
                    EXIT_SPAWN_FAILED,
                    err.to_string(),
                ));
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (stdout, mut stderr) =
            tokio::join!(self.pump_stdout(stdout), self.pump_stderr(stderr));

        let exit_code = match child.wait().await {
            Ok(status) => status_code(status),
            Err(e) => {
                log::error!("Failed to wait for {}: {e}", self.program.display());
                stderr.push_str(&e.to_string());
                -1
            }
        };

        Outcome::Finished(InvocationResult {
            exit_code,
            stdout,
            stderr,
            output_path: self.output_path,
        })
    }

    fn spawn_watch(self) -> Outcome {
        let spawned = self
            .command()
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => {
                log::info!(
                    "Watching {} (pid {})",
                    self.project.display(),
                    child.id().map_or_else(|| "?".to_string(), |id| id.to_string())
                );
                Outcome::Watching(child)
            }
            Err(e) => {
                let err = self.spawn_error(&e);
                log::error!("{err}");
                Outcome::WatchFailed(err)
            }
        }
    }

    fn spawn_error(&self, e: &std::io::Error) -> InvokeError {
        InvokeError::Spawn {
            program: self.program.to_string_lossy().into_owned(),
            message: e.to_string(),
        }
    }

    /// Echo and capture stdout when logging, and flush every `overwrite`
    /// notice regardless.
    async fn pump_stdout<R: AsyncRead + Unpin>(&self, stream: Option<R>) -> String {
        let mut captured = String::new();
        let Some(stream) = stream else {
            return captured;
        };
        read_chunks(stream, "stdout", |chunk| {
            if self.logging {
                captured.push_str(chunk);
                if self.echo {
                    print!("{chunk}");
                }
            }
            for relative in notice::scan_chunk(chunk) {
                log::info!("Flushing {relative}");
                self.flush
                    .flush(GeneratedFile::new(&self.project, &self.css_dir, relative));
            }
        })
        .await;
        captured
    }

    /// Capture stderr, and forward it to the log sink when logging.
    async fn pump_stderr<R: AsyncRead + Unpin>(&self, stream: Option<R>) -> String {
        let mut captured = String::new();
        let Some(stream) = stream else {
            return captured;
        };
        read_chunks(stream, "stderr", |chunk| {
            captured.push_str(chunk);
            if self.logging && !notice::is_bare_color_reset(chunk) {
                self.logger.log(chunk);
            }
        })
        .await;
        captured
    }
}

/// Feed `stream` to `on_chunk` one line at a time, line ending included.
/// Invalid UTF-8 is replaced rather than ending the stream.
async fn read_chunks<R, F>(stream: R, label: &str, mut on_chunk: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => on_chunk(&String::from_utf8_lossy(&buf)),
            Err(e) => {
                log::warn!("Failed to read compass {label}: {e}");
                break;
            }
        }
    }
}

/// Exit code of a finished child. Signals map to `128 + signo` on Unix.
pub fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}
