//! Logger utility for application-wide logging
//!
//! A small file-backed logger that doubles as the `log` crate's global
//! sink. Per-slide status lines are written through `log()` so every run
//! leaves a plain-text record next to the extracted patches, while the
//! usual `info!`/`debug!` macros are mirrored to both the file and the
//! console.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// File-backed logger
pub struct Logger {
    /// File handle for log output
    file: Mutex<Option<File>>,
    /// Most verbose level mirrored to the console
    level: Level,
}

impl Logger {
    /// Creates a new logger writing to the given file
    ///
    /// # Arguments
    /// * `log_file` - Path to the log file, truncated on creation
    ///
    /// # Returns
    /// A new Logger instance or an error if the file cannot be created
    pub fn new(log_file: &str) -> io::Result<Self> {
        Self::with_level(log_file, Level::Info)
    }

    /// Creates a new logger with an explicit verbosity level
    pub fn with_level(log_file: &str, level: Level) -> io::Result<Self> {
        let file = File::create(Path::new(log_file))?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level,
        })
    }

    /// Writes a raw status line to the log file
    ///
    /// # Arguments
    /// * `message` - The message to log
    pub fn log(&self, message: &str) -> io::Result<()> {
        if let Some(file) = &mut *self.file.lock().unwrap() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Installs a logger as the `log` crate's global sink
    ///
    /// # Arguments
    /// * `log_file` - Path for the global log file
    /// * `verbose` - Mirror debug-level records as well as info
    pub fn init_global_logger(log_file: &str, verbose: bool) -> io::Result<()> {
        let level = if verbose { Level::Debug } else { Level::Info };
        let global_logger = Logger::with_level(log_file, level)?;

        // Ignore the SetLoggerError; this runs once at startup and a
        // second call means the logger is already in place
        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        });
        Ok(())
    }
}

// Implement the Log trait so the macros reach the file and the console
impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = self.log(&message);
            println!("{}", message);
        }
    }

    fn flush(&self) {
        // Already flushing in the log method
    }
}
