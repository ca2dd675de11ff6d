//! Logger setup for the command line front end.
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use env_logger::Builder;
use log::LevelFilter;
use time::OffsetDateTime;

/// Map a `-v` count to a level filter. Anything above 4 is rejected.
pub fn level_for(verbosity: u8) -> Result<LevelFilter, String> {
    match verbosity {
        0 => Ok(LevelFilter::Error),
        1 => Ok(LevelFilter::Warn),
        2 => Ok(LevelFilter::Info),
        3 => Ok(LevelFilter::Debug),
        4 => Ok(LevelFilter::Trace),
        _ => Err(String::from("Verbosity is at most -vvvv")),
    }
}

/// Configures the global logger with the specified verbosity, optionally
/// writing to `log_file` instead of stderr.
///
/// Compiler diagnostics are logged under the `compass` target at `warn`, so
/// they show at verbosity 1 and above. The CLI never configures less.
pub fn configure(verbosity: u8, log_file: Option<PathBuf>) -> Result<(), String> {
    let log_level = level_for(verbosity)?;

    let mut builder = Builder::new();

    if let Some(log_location) = log_file {
        let file = File::create(&log_location).map_err(|e| {
            format!(
                "Unable to create log file {}. {}",
                log_location.display(),
                e
            )
        })?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{} {:?}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                OffsetDateTime::now_utc(),
                record.args()
            )
        })
        .filter_level(log_level)
        .try_init()
        .map_err(|e| e.to_string())?;

    log::trace!("Logger verbosity {log_level}");
    Ok(())
}
