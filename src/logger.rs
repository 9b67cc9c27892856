//! Logging and verbosity control for the application.
//!
//! Provides a global logger with three verbosity levels:
//! - Quiet: only errors and written file paths
//! - Normal: progress messages without prefixes (default)
//! - Verbose: timestamped colored logs with details
//!
//! The free functions are no-ops until [`Logger::init`] has been called, so
//! library code can log unconditionally.

use std::sync::OnceLock;
use std::time::Instant;

/// Verbosity level for controlling output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Only errors and written file paths
    Quiet,
    /// Progress messages without prefixes (default)
    Normal,
    /// Timestamped colored logs with details
    Verbose,
}

impl VerbosityLevel {
    /// Picks the level from the `--quiet` / `--verbose` flags.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if verbose {
            VerbosityLevel::Verbose
        } else if quiet {
            VerbosityLevel::Quiet
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Global logger instance.
static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Global start time for elapsed calculations.
static START_TIME: OnceLock<Instant> = OnceLock::new();

#[derive(Debug)]
pub struct Logger {
    level: VerbosityLevel,
    colors_enabled: bool,
}

impl Logger {
    /// Initialize the global logger with the specified verbosity level.
    ///
    /// # Panics
    /// Panics if called more than once.
    pub fn init(level: VerbosityLevel, no_color: bool) {
        let colors_enabled = !no_color
            && std::env::var("NO_COLOR").is_err()
            && atty::is(atty::Stream::Stdout);

        START_TIME.set(Instant::now()).ok();
        LOGGER
            .set(Logger {
                level,
                colors_enabled,
            })
            .expect("Logger already initialized");
    }

    /// Get the global logger instance, if initialized.
    pub fn get() -> Option<&'static Logger> {
        LOGGER.get()
    }

    fn elapsed(&self) -> f64 {
        START_TIME
            .get()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    pub fn is_verbose(&self) -> bool {
        self.level == VerbosityLevel::Verbose
    }

    pub fn is_quiet(&self) -> bool {
        self.level == VerbosityLevel::Quiet
    }

    pub fn level(&self) -> VerbosityLevel {
        self.level
    }

    /// Format a line with level prefix and timestamp (verbose mode).
    fn format_with_level(&self, level: &str, msg: &str) -> String {
        let elapsed = self.elapsed();
        if self.colors_enabled {
            let level_color = match level {
                "ERROR" => "\x1b[31m",
                "WARN" => "\x1b[33m",
                "INFO" => "\x1b[34m",
                "DEBUG" => "\x1b[90m",
                _ => "",
            };
            format!(
                "\x1b[90m[{:.2}s]\x1b[0m {}[{}]\x1b[0m {}",
                elapsed, level_color, level, msg
            )
        } else {
            format!("[{:.2}s] [{}] {}", elapsed, level, msg)
        }
    }

    /// Log an error message (always displayed, on stderr).
    pub fn error(&self, msg: &str) {
        if self.is_verbose() {
            eprintln!("{}", self.format_with_level("ERROR", msg));
        } else {
            eprintln!("Error: {}", msg);
        }
    }

    /// Log a warning message (normal and verbose modes, on stderr).
    pub fn warn(&self, msg: &str) {
        match self.level {
            VerbosityLevel::Quiet => {}
            VerbosityLevel::Normal => eprintln!("Warning: {}", msg),
            VerbosityLevel::Verbose => eprintln!("{}", self.format_with_level("WARN", msg)),
        }
    }

    /// Report a written file (quiet: just path, normal: message, verbose: with prefix).
    pub fn output(&self, path: &str) {
        match self.level {
            VerbosityLevel::Quiet => println!("{}", path),
            VerbosityLevel::Normal => println!("Wrote: {}", path),
            VerbosityLevel::Verbose => {
                println!("{}", self.format_with_level("INFO", &format!("Wrote: {}", path)))
            }
        }
    }

    /// Log an info message (displayed in normal mode and above).
    pub fn info(&self, msg: &str) {
        match self.level {
            VerbosityLevel::Quiet => {}
            VerbosityLevel::Normal => println!("{}", msg),
            VerbosityLevel::Verbose => println!("{}", self.format_with_level("INFO", msg)),
        }
    }

    /// Log a debug message (displayed only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if self.is_verbose() {
            println!("{}", self.format_with_level("DEBUG", msg));
        }
    }
}

/// Log an error message (always displayed).
pub fn error(msg: &str) {
    match Logger::get() {
        Some(logger) => logger.error(msg),
        None => eprintln!("Error: {}", msg),
    }
}

/// Log a warning message (normal and verbose modes).
pub fn warn(msg: &str) {
    if let Some(logger) = Logger::get() {
        logger.warn(msg);
    }
}

/// Report a written file.
pub fn output(path: &str) {
    if let Some(logger) = Logger::get() {
        logger.output(path);
    }
}

/// Log an info message (displayed in normal mode and above).
pub fn info(msg: &str) {
    if let Some(logger) = Logger::get() {
        logger.info(msg);
    }
}

/// Log a debug message (displayed only in verbose mode).
pub fn debug(msg: &str) {
    if let Some(logger) = Logger::get() {
        logger.debug(msg);
    }
}

/// Returns true if quiet mode is enabled.
pub fn is_quiet() -> bool {
    Logger::get().is_some_and(Logger::is_quiet)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger(level: VerbosityLevel) -> Logger {
        Logger {
            level,
            colors_enabled: false,
        }
    }

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(VerbosityLevel::from_flags(false, false), VerbosityLevel::Normal);
        assert_eq!(VerbosityLevel::from_flags(true, false), VerbosityLevel::Quiet);
        assert_eq!(VerbosityLevel::from_flags(false, true), VerbosityLevel::Verbose);
    }

    #[test]
    fn test_logger_levels() {
        assert!(logger(VerbosityLevel::Quiet).is_quiet());
        assert!(!logger(VerbosityLevel::Normal).is_quiet());
        assert!(logger(VerbosityLevel::Verbose).is_verbose());
        assert!(!logger(VerbosityLevel::Normal).is_verbose());
        assert_eq!(logger(VerbosityLevel::Quiet).level(), VerbosityLevel::Quiet);
    }

    #[test]
    fn test_plain_format() {
        let line = logger(VerbosityLevel::Verbose).format_with_level("WARN", "careful");
        assert!(line.starts_with('['));
        assert!(line.ends_with("[WARN] careful"));
    }

    #[test]
    fn test_free_functions_without_init() {
        // must not panic before the logger is initialized
        debug("debug");
        info("info");
        warn("warn");
        assert!(!is_quiet());
    }
}
