//! Generic logger utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info};
use fern;
use colored::{ColoredString, Colorize};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// STRUCTURES
// ---------------------------------------------------------------------------

/// Where log records go and how verbose each destination is.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level of records written to the session log file.
    pub file_level: LevelFilter,

    /// Level of records printed to stdout.
    pub stdout_level: LevelFilter,

    /// Overrides for individual targets (module paths), applied before
    /// either destination.
    pub module_levels: Vec<(&'static str, LevelFilter)>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_level: LevelFilter::Debug,
            stdout_level: LevelFilter::Info,
            module_levels: Vec::new()
        }
    }
}

impl LogConfig {
    /// The most verbose level any destination accepts.
    pub fn max_level(&self) -> LevelFilter {
        self.file_level.max(self.stdout_level)
    }

    /// Check that both destinations include `INFO` records.
    pub fn validate(&self) -> Result<(), LoggerInitError> {
        for &level in &[self.file_level, self.stdout_level] {
            if level < log::Level::Info {
                return Err(LoggerInitError::InvalidMinLogLevel(level))
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// # Notes
///
/// - Both levels in `config` must include `log::Level::Info`.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    config: &LogConfig,
    session: &session::Session
) -> Result<(), LoggerInitError> {

    config.validate()?;

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {

            // If debug or trace include the target, otherwise don't include it
            if record.level() > log::Level::Info {
                out.finish(format_args!(
                    "[{:10.6} {}] {}: {}",
                    session::get_elapsed_seconds(),
                    level_to_str(record.level()),
                    record.target(),
                    message
                ))
            }
            else {
                out.finish(format_args!(
                    "[{:10.6} {}] {}",
                    session::get_elapsed_seconds(),
                    level_to_str(record.level()),
                    message
                ))
            }

        })
        .level(config.max_level());

    for &(target, level) in config.module_levels.iter() {
        dispatch = dispatch.level_for(target, level);
    }

    dispatch
        .chain(
            fern::Dispatch::new()
                .level(config.stdout_level)
                .chain(std::io::stdout())
        )
        .chain(
            fern::Dispatch::new()
                .level(config.file_level)
                .chain(log_file)
        )
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Stdout log level: {:?}", config.stdout_level);
    info!("    File log level: {:?}", config.file_level);
    for (target, level) in config.module_levels.iter() {
        info!("    Level for {}: {:?}", target, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info  => "INF".normal(),
        log::Level::Warn  => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_log_config() {
        let config = LogConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_level(), LevelFilter::Debug);

        let quiet = LogConfig {
            stdout_level: LevelFilter::Warn,
            ..LogConfig::default()
        };
        assert!(matches!(
            quiet.validate(),
            Err(LoggerInitError::InvalidMinLogLevel(LevelFilter::Warn))
        ));
    }
}
