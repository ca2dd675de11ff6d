// CLI binary: exits the process on unrecoverable errors.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use compass_invoker::config;
use compass_invoker::logger;
use compass_invoker::paths;
use compass_invoker::{InvocationOptions, InvokeError, Invoker, Outcome, OutputStyle};

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser)]
#[command(name = "compass-invoke", about = "Run the Compass stylesheet compiler", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write log records to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a stylesheet and wait for compass to finish
    Compile {
        #[command(flatten)]
        target: Target,
        /// Print the invocation result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run `compass watch` on a project until it exits
    Watch {
        #[command(flatten)]
        target: Target,
    },
    /// Print the command line that would run, without running it
    Args {
        #[command(flatten)]
        target: Target,
        /// Print program and arguments as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Print the JSON Schema of an options file
    Schema,
}

#[derive(clap::Args)]
struct Target {
    /// Stylesheet to compile
    file: String,

    /// Options file (JSON); defaults to <project>/compass-options.json when present
    #[arg(long)]
    options: Option<PathBuf>,
    /// Project root (defaults to the current directory)
    #[arg(long)]
    project: Option<PathBuf>,
    #[arg(long)]
    style: Option<OutputStyle>,
    #[arg(long)]
    css_dir: Option<String>,
    #[arg(long)]
    sass_dir: Option<String>,
    #[arg(long)]
    images_dir: Option<String>,
    #[arg(long)]
    javascripts_dir: Option<String>,
    #[arg(long)]
    fonts_dir: Option<String>,
    /// Extra import path (repeatable)
    #[arg(short = 'I', long = "import-path")]
    import_path: Vec<String>,
    /// Library to require (repeatable)
    #[arg(long)]
    require: Vec<String>,
    /// Compass config file; replaces the style and directory flags
    #[arg(short = 'c', long)]
    config_file: Option<PathBuf>,
    #[arg(long)]
    no_line_comments: bool,
    #[arg(long)]
    no_relative_assets: bool,
    #[arg(long)]
    load_all: Option<String>,
    /// Run through `bundle exec`
    #[arg(long)]
    bundle_exec: bool,
    /// Don't echo compiler output
    #[arg(long)]
    quiet: bool,
}

// ── Options assembly ─────────────────────────────────────────────

/// Options file (explicit or the project's), then flags on top. The project
/// root is made absolute against `cwd`.
fn build_options(target: &Target, cwd: &Path, watch: bool) -> Result<InvocationOptions, InvokeError> {
    let flag_project = target.project.as_ref().map(|p| paths::resolve_in(cwd, p));

    let mut opts = match target.options {
        Some(ref file) => config::load_options(file)?,
        None => {
            let project = flag_project.clone().unwrap_or_else(|| cwd.to_path_buf());
            config::load_project_options(&project)?
                .unwrap_or_else(|| InvocationOptions::for_project(project))
        }
    };

    opts.project = match flag_project {
        Some(project) => project,
        None => paths::resolve_in(cwd, &opts.project),
    };
    if let Some(style) = target.style {
        opts.style = style;
    }
    let dirs = [
        (&target.css_dir, &mut opts.css),
        (&target.sass_dir, &mut opts.sass),
        (&target.images_dir, &mut opts.image),
        (&target.javascripts_dir, &mut opts.javascript),
        (&target.fonts_dir, &mut opts.font),
    ];
    for (flag, field) in dirs {
        if let Some(value) = flag {
            field.clone_from(value);
        }
    }
    if !target.import_path.is_empty() {
        opts.import_path.clone_from(&target.import_path);
    }
    if !target.require.is_empty() {
        opts.require.clone_from(&target.require);
    }
    if target.config_file.is_some() {
        opts.config_file.clone_from(&target.config_file);
    }
    if target.load_all.is_some() {
        opts.load_all.clone_from(&target.load_all);
    }
    if target.no_line_comments {
        opts.comments = false;
    }
    if target.no_relative_assets {
        opts.relative = false;
    }
    if target.bundle_exec {
        opts.bundle_exec = true;
    }
    if target.quiet {
        opts.logging = false;
    }
    opts.watch = watch;
    Ok(opts)
}

fn options_or_exit(target: &Target, watch: bool) -> InvocationOptions {
    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("Error: cannot read current directory: {e}");
        process::exit(1);
    });
    build_options(target, &cwd, watch).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    })
}

/// Exit codes outside 0..=255 can't be reported faithfully.
fn process_exit_code(code: i32) -> i32 {
    if (0..=255).contains(&code) {
        code
    } else {
        1
    }
}

// ── Commands ─────────────────────────────────────────────────────

async fn run_compile(invoker: &Invoker, target: &Target, json: bool) -> i32 {
    let opts = options_or_exit(target, false);
    let Some(result) = invoker.run(&target.file, &opts).await.into_result() else {
        return 1;
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else if result.is_success() {
        log::info!("Compiled {}", result.output_path.display());
    } else if result.exit_code == compass_invoker::EXIT_NOT_FOUND
        || result.exit_code == compass_invoker::EXIT_SPAWN_FAILED
    {
        eprintln!("Error: {}", result.stderr);
    }
    result.exit_code
}

async fn run_watch(invoker: &Invoker, target: &Target) -> i32 {
    let opts = options_or_exit(target, true);
    match invoker.run(&target.file, &opts).await {
        Outcome::Watching(mut child) => match child.wait().await {
            Ok(status) => compass_invoker::status_code(status),
            Err(e) => {
                eprintln!("Error: {e}");
                1
            }
        },
        Outcome::WatchFailed(e) => {
            eprintln!("Error: {e}");
            1
        }
        Outcome::Finished(result) => {
            eprintln!("Error: {}", result.stderr);
            result.exit_code
        }
    }
}

fn run_args(invoker: &Invoker, target: &Target, json: bool) -> i32 {
    let opts = options_or_exit(target, false);
    match invoker.prepare(&target.file, &opts) {
        Ok(prepared) => {
            if json {
                let mut line = vec![prepared.program().to_string_lossy().into_owned()];
                line.extend(prepared.args().iter().cloned());
                println!("{}", serde_json::to_string_pretty(&line).unwrap());
            } else {
                println!("{}", prepared.command_line());
            }
            0
        }
        Err(result) => {
            eprintln!("Error: {}", result.stderr);
            result.exit_code
        }
    }
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Compiler diagnostics are logged at warn, so the floor is warn, not error.
    if let Err(e) = logger::configure(cli.verbose.saturating_add(1), cli.log_file.clone()) {
        eprintln!("Error: {e}");
        process::exit(2);
    }

    let invoker = Invoker::new();
    let code = match &cli.command {
        // Compiler output would corrupt the JSON document on stdout.
        Commands::Compile { target, json } => {
            run_compile(&Invoker::new().with_echo(!*json), target, *json).await
        }
        Commands::Watch { target } => run_watch(&invoker, target).await,
        Commands::Args { target, json } => run_args(&invoker, target, *json),
        Commands::Schema => {
            println!(
                "{}",
                serde_json::to_string_pretty(&config::options_schema()).unwrap()
            );
            0
        }
    };
    process::exit(process_exit_code(code));
}
