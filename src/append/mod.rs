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

//! Destinations for formatted log records.

use std::fmt;

use crate::Error;

pub mod rolling_file;
mod stdio;

pub use self::rolling_file::RollingFile;
pub use self::stdio::Stdout;

/// A destination that formatted log records are written to.
///
/// The [`Logger`](crate::Logger) formats each record once with its layout and hands the same
/// bytes to every appender.
pub trait Append: fmt::Debug + Send + Sync + 'static {
    /// Writes one formatted log record.
    fn append(&self, bytes: &[u8]) -> Result<(), Error>;

    /// Flushes any buffered records.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}
