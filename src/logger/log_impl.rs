// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::RwLock;

use log::Level;
use log::LevelFilter;
use log::Metadata;
use log::Record;

use super::LoggerBuilder;
use super::builder::RollingPolicy;
use crate::Append;
use crate::Error;
use crate::Layout;
use crate::append::RollingFile;
use crate::append::Stdout;

/// A logger that formats records once and writes them to stdout and a rotating log file.
///
/// A logger starts without a log file. [`Logger::ensure_initialized`] opens one exactly once,
/// [`Logger::set_log_file`] switches to another one, and [`Logger::close`] releases it. Records
/// logged while no file is open only go to stdout.
///
/// The logger implements [`log::Log`], so it can also serve the `log` crate macros:
///
/// ```rust
/// let logger: &'static daylog::Logger = Box::leak(Box::new(daylog::Logger::builder().build()));
/// log::set_logger(logger).unwrap();
/// log::set_max_level(logger.max_level());
///
/// log::info!("This is an info message.");
/// ```
#[derive(Debug)]
pub struct Logger {
    max_level: LevelFilter,
    layout: Box<dyn Layout>,
    stdout: Option<Stdout>,
    policy: RollingPolicy,

    // set once a log file has been opened; also serializes reconfiguration
    latch: Mutex<bool>,
    file: RwLock<Option<RollingFile>>,
}

impl Logger {
    /// Create a new [`LoggerBuilder`].
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub(super) fn new(
        max_level: LevelFilter,
        layout: Box<dyn Layout>,
        stdout: Option<Stdout>,
        policy: RollingPolicy,
    ) -> Self {
        Self {
            max_level,
            layout,
            stdout,
            policy,
            latch: Mutex::new(false),
            file: RwLock::new(None),
        }
    }

    /// The maximum level of records this logger writes.
    pub fn max_level(&self) -> LevelFilter {
        self.max_level
    }

    /// Open the log file `<dir>/<app_name>_<stamp>.log` unless this logger was already
    /// initialized.
    ///
    /// Only the first successful call opens a file; every later call returns `Ok(())` without
    /// doing anything, whatever its arguments. Concurrent callers wait for the call that is
    /// opening the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened. The logger stays uninitialized, so a
    /// later call may try again.
    pub fn ensure_initialized(&self, dir: impl AsRef<Path>, app_name: &str) -> Result<(), Error> {
        let mut initialized = self.lock_latch();
        if *initialized {
            return Ok(());
        }

        let file = self.policy.open(dir.as_ref(), app_name)?;
        self.swap_file(Some(file));
        *initialized = true;
        Ok(())
    }

    /// Switch to the log file `<dir>/<app_name>_<stamp>.log`, whether or not this logger was
    /// initialized before.
    ///
    /// The new file is opened first; the previous one is flushed and closed once the new one is
    /// installed.
    ///
    /// # Errors
    ///
    /// Returns an error if the new log file cannot be opened, in which case the previous file
    /// stays in use.
    pub fn set_log_file(&self, dir: impl AsRef<Path>, app_name: &str) -> Result<(), Error> {
        let mut initialized = self.lock_latch();

        let file = self.policy.open(dir.as_ref(), app_name)?;
        if let Some(previous) = self.swap_file(Some(file)) {
            if let Err(err) = previous.flush() {
                eprintln!("failed to flush previous log file: {err}");
            }
        }
        *initialized = true;
        Ok(())
    }

    /// Flush and close the current log file. Does nothing if no file is open.
    ///
    /// Closing does not reset initialization: [`Logger::ensure_initialized`] stays a no-op, and
    /// only [`Logger::set_log_file`] opens a file again.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffered records cannot be flushed. The file is closed anyway.
    pub fn close(&self) -> Result<(), Error> {
        let _latch = self.lock_latch();
        match self.swap_file(None) {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    /// Whether a log file has been opened by this logger.
    pub fn is_initialized(&self) -> bool {
        *self.lock_latch()
    }

    /// The path of the log file currently written, if any.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.read_file().as_ref().map(RollingFile::current_file)
    }

    /// Flush stdout and the current log file.
    ///
    /// # Errors
    ///
    /// Returns the first flush error.
    pub fn flush(&self) -> Result<(), Error> {
        if let Some(stdout) = &self.stdout {
            stdout.flush()?;
        }
        match self.read_file().as_ref() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    /// Log a message at the debug level, attributed to the caller's location.
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log_at(Level::Debug, message);
    }

    /// Log a message at the info level, attributed to the caller's location.
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log_at(Level::Info, message);
    }

    /// Log a message at the warn level, attributed to the caller's location.
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log_at(Level::Warn, message);
    }

    /// Log a message at the error level, attributed to the caller's location.
    ///
    /// The written record includes the caller's stack.
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log_at(Level::Error, message);
    }

    #[track_caller]
    fn log_at(&self, level: Level, message: impl fmt::Display) {
        let location = Location::caller();
        self.write_record(
            &Record::builder()
                .args(format_args!("{message}"))
                .level(level)
                .file(Some(location.file()))
                .line(Some(location.line()))
                .build(),
        );
    }

    fn write_record(&self, record: &Record) {
        if record.level() > self.max_level {
            return;
        }

        let bytes = match self.layout.format(record) {
            Ok(bytes) => bytes,
            Err(err) => return handle_log_error(record, err),
        };

        if let Some(stdout) = &self.stdout {
            if let Err(err) = stdout.append(&bytes) {
                handle_log_error(record, err);
            }
        }
        if let Some(file) = self.read_file().as_ref() {
            if let Err(err) = file.append(&bytes) {
                handle_log_error(record, err);
            }
        }
    }

    fn swap_file(&self, file: Option<RollingFile>) -> Option<RollingFile> {
        let mut current = self.file.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, file)
    }

    fn read_file(&self) -> std::sync::RwLockReadGuard<'_, Option<RollingFile>> {
        self.file.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_latch(&self) -> MutexGuard<'_, bool> {
        self.latch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        self.write_record(record);
    }

    fn flush(&self) {
        if let Err(err) = Logger::flush(self) {
            handle_flush_error(err);
        }
    }
}

// Nowhere left to report a failure of the fallback itself; the caller must never see it.
fn handle_log_error(record: &Record, error: Error) {
    let _ = write!(
        std::io::stderr(),
        r###"
Error perform logging.
    Attempted to log: {args}
    Record: {record:?}
    Error: {error}
"###,
        args = record.args(),
        record = record,
        error = error,
    );
}

fn handle_flush_error(error: Error) {
    let _ = write!(
        std::io::stderr(),
        r###"
Error perform flush.
    Error: {error}
"###,
    );
}
