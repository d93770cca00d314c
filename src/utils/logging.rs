// Logging utilities
// Author: Gabriel Demetrios Lafis

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Metadata, Record};

use super::{AppError, AppResult};

/// Initialize logging with the given level, to stderr or appended to a file
pub fn init_logging(level: LevelFilter, file: Option<&Path>) -> AppResult<()> {
    let sink = match file {
        Some(path) => Some(Mutex::new(
            OpenOptions::new().create(true).append(true).open(path)?,
        )),
        None => None,
    };

    log::set_boxed_logger(Box::new(SimpleLogger { level, sink }))
        .map(|()| log::set_max_level(level))
        .map_err(|e| AppError::Other(format!("Failed to install logger: {}", e)))
}

/// Simple logger implementation
struct SimpleLogger {
    level: LevelFilter,
    sink: Option<Mutex<File>>,
}

impl SimpleLogger {
    fn level_str(level: Level, colored: bool) -> &'static str {
        match (level, colored) {
            (Level::Error, true) => "\x1B[31mERROR\x1B[0m",
            (Level::Warn, true) => "\x1B[33mWARN\x1B[0m",
            (Level::Info, true) => "\x1B[32mINFO\x1B[0m",
            (Level::Debug, true) => "\x1B[34mDEBUG\x1B[0m",
            (Level::Trace, true) => "\x1B[90mTRACE\x1B[0m",
            (Level::Error, false) => "ERROR",
            (Level::Warn, false) => "WARN",
            (Level::Info, false) => "INFO",
            (Level::Debug, false) => "DEBUG",
            (Level::Trace, false) => "TRACE",
        }
    }
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        match &self.sink {
            Some(file) => {
                // A poisoned sink just loses the line
                if let Ok(mut file) = file.lock() {
                    let _ = writeln!(
                        file,
                        "[{}] {} {}: {}",
                        timestamp,
                        Self::level_str(record.level(), false),
                        record.target(),
                        record.args()
                    );
                }
            }
            None => {
                let _ = writeln!(
                    io::stderr(),
                    "[{}] {} {}: {}",
                    timestamp,
                    Self::level_str(record.level(), true),
                    record.target(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.sink {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}
