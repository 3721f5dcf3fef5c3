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

//! Appender for writing log records to time-rotated files.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use daylog::append::Append;
//! use daylog::append::rolling_file::RollingFile;
//! use daylog::append::rolling_file::RollingFileWriter;
//! use daylog::append::rolling_file::Rotation;
//!
//! let writer = RollingFileWriter::builder()
//!     .rotation(Rotation::Daily)
//!     .max_age(Duration::from_secs(7 * 24 * 60 * 60))
//!     .build("logs", "app")
//!     .unwrap();
//!
//! // writes to logs/app_<YYYYMMDD>.log, linked from logs/app.log
//! let file = RollingFile::new(writer);
//! file.append(b"hello\n").unwrap();
//! ```

pub use append::RollingFile;
pub use rolling::RollingFileWriter;
pub use rolling::RollingFileWriterBuilder;
pub use rotation::Rotation;

mod append;
mod clock;
mod rolling;
mod rotation;
