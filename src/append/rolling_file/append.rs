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

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::Error;
use crate::append::Append;
use crate::append::rolling_file::RollingFileWriter;

/// An appender that writes log records to rolling files.
///
/// Dropping the appender closes the file it currently writes.
#[derive(Debug)]
pub struct RollingFile {
    writer: Mutex<RollingFileWriter>,
}

impl RollingFile {
    /// Creates a new [`RollingFile`] appender.
    pub fn new(writer: RollingFileWriter) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// The path of the file currently written.
    pub fn current_file(&self) -> PathBuf {
        self.lock().current_file().to_path_buf()
    }

    // a panic while writing leaves the file usable, so poisoning is ignored
    fn lock(&self) -> MutexGuard<'_, RollingFileWriter> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Append for RollingFile {
    fn append(&self, bytes: &[u8]) -> Result<(), Error> {
        self.lock().write_all(bytes).map_err(Error::from_io_error)
    }

    fn flush(&self) -> Result<(), Error> {
        self.lock().flush().map_err(Error::from_io_error)
    }
}
