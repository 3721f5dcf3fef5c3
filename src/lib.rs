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

//! Daylog is a process-wide logging facade that writes every record to stdout and to a log file
//! rotated daily.
//!
//! # Overview
//!
//! Records are formatted as one line carrying a millisecond timestamp, the caller's file and
//! line, the id of the logging thread and the upper-cased level:
//!
//! ```text
//! [2024-08-11|22:44:57.172][main.rs:12][executionID:1][INFO]: service started
//! ```
//!
//! Error records are followed by the stack of the logging thread, without the frames of the
//! standard library, async runtimes and web frameworks.
//!
//! Log files are named `<app_name>_<YYYYMMDD>.log`. A new file is started every day, a link named
//! `<app_name>.log` points at the newest one, and files older than seven days are deleted.
//!
//! # Examples
//!
//! Use the process-wide logger:
//!
//! ```no_run
//! daylog::init_once("logs", "app");
//!
//! daylog::info("service started");
//! daylog::error(format_args!("request {} failed", 42));
//!
//! // the `log` crate macros are served as well
//! log::warn!("cache miss");
//!
//! daylog::close();
//! ```
//!
//! Or construct a logger and pass it around:
//!
//! ```no_run
//! use daylog::Logger;
//!
//! let logger = Logger::builder().stdout(false).build();
//! logger.ensure_initialized("logs", "worker")?;
//! logger.info("worker started");
//! logger.set_log_file("other-logs", "worker")?;
//! logger.close()?;
//! # Ok::<(), daylog::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod diagnostic;
pub mod layout;

pub use append::Append;
pub use layout::Layout;

mod error;
pub use error::Error;

mod logger;
pub use logger::*;

mod global;
pub use global::*;
