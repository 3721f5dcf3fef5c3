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
use std::path::Path;
use std::sync::LazyLock;

use crate::Error;
use crate::Logger;

static GLOBAL: LazyLock<Logger> = LazyLock::new(|| Logger::builder().build());

/// The process-wide [`Logger`], built with the default configuration on first use.
pub fn global() -> &'static Logger {
    &GLOBAL
}

/// Open the process-wide log file `<dir>/<app_name>_<YYYYMMDD>.log` once.
///
/// Only the first call has an effect; later calls return immediately. The first call also
/// installs the process-wide logger as the backend of the `log` crate, unless another backend is
/// already installed.
///
/// The process exits with status 1 if the log file cannot be opened.
pub fn init_once(dir: impl AsRef<Path>, app_name: &str) {
    let logger = global();
    if let Err(err) = logger.ensure_initialized(dir, app_name) {
        fatal("failed to initialize log file", err);
    }

    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.max_level());
    }
}

/// Switch the process-wide log file to `<dir>/<app_name>_<YYYYMMDD>.log`, closing the current
/// one.
///
/// The process exits with status 1 if the new log file cannot be opened.
pub fn set_log_file(dir: impl AsRef<Path>, app_name: &str) {
    if let Err(err) = global().set_log_file(dir, app_name) {
        fatal("failed to switch log file", err);
    }
}

/// Close the process-wide log file. Does nothing if none is open.
pub fn close() {
    if let Err(err) = global().close() {
        eprintln!("failed to close log file: {err}");
    }
}

/// Log a message at the debug level through the process-wide logger.
#[track_caller]
pub fn debug(message: impl fmt::Display) {
    global().debug(message);
}

/// Log a message at the info level through the process-wide logger.
#[track_caller]
pub fn info(message: impl fmt::Display) {
    global().info(message);
}

/// Log a message at the warn level through the process-wide logger.
#[track_caller]
pub fn warn(message: impl fmt::Display) {
    global().warn(message);
}

/// Log a message at the error level through the process-wide logger, followed by the caller's
/// stack.
#[track_caller]
pub fn error(message: impl fmt::Display) {
    global().error(message);
}

fn fatal(context: &str, err: Error) -> ! {
    eprintln!("{context}: {err:?}");
    std::process::exit(1);
}
