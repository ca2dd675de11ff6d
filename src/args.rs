//! Compass command-line construction.
//!
//! The order here is part of the contract: wrapper verb, mode verb, project,
//! file, then either `-c <config>` or the discrete flags in a fixed order.

use crate::options::InvocationOptions;
use crate::paths::{self, Platform};

/// Executable names and the wrapper verb used to build a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokerConfig {
    /// Name of the compiler executable.
    pub compiler: String,
    /// Name of the wrapper executable used when `bundle_exec` is set.
    pub wrapper: String,
    /// Sub-command the wrapper runs the compiler through.
    pub wrapper_verb: String,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            compiler: paths::COMPASS_EXECUTABLE.to_string(),
            wrapper: paths::BUNDLE_EXECUTABLE.to_string(),
            wrapper_verb: paths::BUNDLE_EXEC_VERB.to_string(),
        }
    }
}

impl InvokerConfig {
    /// The executable to look up on the search path for these options.
    pub fn executable_for(&self, opts: &InvocationOptions) -> &str {
        if opts.bundle_exec {
            &self.wrapper
        } else {
            &self.compiler
        }
    }
}

/// Mode verb for the compiler.
pub fn mode_verb(opts: &InvocationOptions) -> &'static str {
    if opts.watch {
        "watch"
    } else {
        "compile"
    }
}

/// Build the argument list for one run. `file_path` must already be
/// normalized to forward slashes.
pub fn build_args(
    config: &InvokerConfig,
    opts: &InvocationOptions,
    file_path: &str,
    platform: Platform,
) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();

    if opts.bundle_exec {
        args.push(config.wrapper_verb.clone());
        args.push(config.compiler.clone());
    }

    args.push(mode_verb(opts).to_string());
    args.push(platform.argument_path(&opts.project));
    args.push(file_path.to_string());

    if let Some(ref config_file) = opts.config_file {
        args.push("-c".into());
        args.push(config_file.to_string_lossy().into_owned());
        return args;
    }

    if !opts.comments {
        args.push("--no-line-comments".into());
    }
    if opts.relative {
        args.push("--relative-assets".into());
    }

    let dirs = [
        ("--output-style", opts.style.as_str()),
        ("--css-dir", opts.css.as_str()),
        ("--sass-dir", opts.sass.as_str()),
        ("--images-dir", opts.image.as_str()),
        ("--javascripts-dir", opts.javascript.as_str()),
        ("--fonts-dir", opts.font.as_str()),
    ];
    for (flag, value) in dirs {
        args.push(flag.into());
        args.push(value.to_string());
    }

    // Empty entries count as unset.
    for import in opts.import_path.iter().filter(|p| !p.is_empty()) {
        args.push("-I".into());
        args.push(import.clone());
    }

    if let Some(load_all) = opts.load_all.as_deref().filter(|v| !v.is_empty()) {
        args.push("--load-all".into());
        args.push(load_all.to_string());
    }

    for lib in opts.require.iter().filter(|r| !r.is_empty()) {
        args.push("--require".into());
        args.push(lib.clone());
    }

    args
}
