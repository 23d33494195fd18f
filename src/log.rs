//! Initialisation and configuration of the program's logging.
//!
//! Messages at `info` level and below go to stdout and warnings and errors go to stderr. If an
//! output directory is given, messages are also written to log files in that directory.
use anyhow::{Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// The default log level for the program.
///
/// Used if the user does not specify one in the settings file or via the environment variable.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable which overrides the log level
const LOG_LEVEL_ENV_VAR: &str = "FLEXFORDEL_LOG_LEVEL";

/// The file name for the log file containing messages about the ordinary operation of the program
const LOG_INFO_FILE_NAME: &str = "flexfordel_info.log";

/// The file name for the log file containing warnings and error messages
const LOG_ERROR_FILE_NAME: &str = "flexfordel_error.log";

/// Used to check whether the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Initialise the program logger using the `fern` logging library.
///
/// The user can specify their preferred logging level either via the settings file or the
/// `FLEXFORDEL_LOG_LEVEL` environment variable, which takes precedence. Possible options are:
///
/// * `error`: Only log errors
/// * `warn`: Log warnings and errors
/// * `info`: Log general information, warnings and errors (default)
/// * `debug`: Log debug information as well
/// * `trace`: Log everything
/// * `off`: Disable logging
///
/// # Arguments
///
/// * `log_level_from_settings`: The log level specified in the settings file
/// * `output_path`: The folder to write log files to, if any
pub fn init(log_level_from_settings: &str, output_path: Option<&Path>) -> Result<()> {
    // The logger can only be set once per process
    if is_logger_initialised() {
        return Ok(());
    }

    let log_level = env::var(LOG_LEVEL_ENV_VAR)
        .unwrap_or_else(|_| log_level_from_settings.to_string())
        .to_lowercase();
    let log_level = match log_level.as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let use_colour_stdout = std::io::stdout().is_terminal();
    let use_colour_stderr = std::io::stderr().is_terminal();

    let mut dispatch = Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() > LevelFilter::Warn)
                .format(move |out, message, record| {
                    write_log_colour(out, message, record, use_colour_stdout, colours);
                })
                .level(log_level)
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .format(move |out, message, record| {
                    write_log_colour(out, message, record, use_colour_stderr, colours);
                })
                .level(log_level.min(LevelFilter::Warn))
                .chain(std::io::stderr()),
        );

    if let Some(output_path) = output_path {
        let info_file = fern::log_file(output_path.join(LOG_INFO_FILE_NAME))?;
        let error_file = fern::log_file(output_path.join(LOG_ERROR_FILE_NAME))?;
        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .format(write_log_plain)
                    .level(log_level.max(LevelFilter::Info))
                    .chain(info_file),
            )
            .chain(
                Dispatch::new()
                    .format(write_log_plain)
                    .level(LevelFilter::Warn)
                    .chain(error_file),
            );
    }

    dispatch.apply()?;
    let _ = LOGGER_INIT.set(());

    Ok(())
}

/// Write a log message, without colour
fn write_log_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    write_log(out, record.level(), record.target(), message);
}

/// Write a log message, with colour if requested
fn write_log_colour(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: ColoredLevelConfig,
) {
    if use_colour {
        write_log(out, colours.color(record.level()), record.target(), message);
    } else {
        write_log_plain(out, message, record);
    }
}

/// Write a log message in the standard format
fn write_log<T: Display>(out: FormatCallback, level: T, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");
    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}
