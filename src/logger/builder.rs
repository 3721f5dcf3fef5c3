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

use std::path::Path;
use std::time::Duration;

use log::LevelFilter;

use super::Logger;
use crate::Error;
use crate::Layout;
use crate::append::RollingFile;
use crate::append::Stdout;
use crate::append::rolling_file::RollingFileWriter;
use crate::append::rolling_file::Rotation;
use crate::layout::TextLayout;

/// A builder for configuring a [`Logger`].
///
/// By default the logger accepts every level, formats records with [`TextLayout`], duplicates
/// them to stdout, and rotates its log file daily keeping seven days of files.
///
/// ## Examples
///
/// ```rust
/// use log::LevelFilter;
/// use daylog::Logger;
/// use daylog::append::rolling_file::Rotation;
///
/// let logger = Logger::builder()
///     .max_level(LevelFilter::Info)
///     .rotation(Rotation::Hourly)
///     .stdout(false)
///     .build();
/// assert!(!logger.is_initialized());
/// ```
#[must_use = "call `build` to construct the logger"]
#[derive(Debug)]
pub struct LoggerBuilder {
    max_level: LevelFilter,
    layout: Box<dyn Layout>,
    stdout: bool,
    policy: RollingPolicy,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Create a new [`LoggerBuilder`] with the default configuration.
    pub fn new() -> Self {
        Self {
            max_level: LevelFilter::Trace,
            layout: Box::new(TextLayout::default()),
            stdout: true,
            policy: RollingPolicy::default(),
        }
    }

    /// Set the maximum level of records the logger writes.
    pub fn max_level(mut self, max_level: LevelFilter) -> Self {
        self.max_level = max_level;
        self
    }

    /// Set the layout used to format records.
    pub fn layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Set whether records are duplicated to stdout.
    pub fn stdout(mut self, stdout: bool) -> Self {
        self.stdout = stdout;
        self
    }

    /// Set the rotation period of log files.
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.policy.rotation = Some(rotation);
        self
    }

    /// Set how long rotated log files are kept.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.policy.max_age = Some(max_age);
        self
    }

    /// Set whether the `<app_name>.log` link to the current file is maintained.
    pub fn link(mut self, link: bool) -> Self {
        self.policy.link = Some(link);
        self
    }

    /// Construct the [`Logger`]. No file is opened until the logger is initialized.
    pub fn build(self) -> Logger {
        let stdout = self.stdout.then(Stdout::default);
        Logger::new(self.max_level, self.layout, stdout, self.policy)
    }
}

/// How rotating writers are built each time a logger opens a log file. Unset fields keep the
/// defaults of [`RollingFileWriter::builder`].
#[derive(Debug, Default, Clone)]
pub(super) struct RollingPolicy {
    rotation: Option<Rotation>,
    max_age: Option<Duration>,
    link: Option<bool>,
}

impl RollingPolicy {
    pub(super) fn open(&self, dir: &Path, app_name: &str) -> Result<RollingFile, Error> {
        let mut builder = RollingFileWriter::builder();
        if let Some(rotation) = self.rotation {
            builder = builder.rotation(rotation);
        }
        if let Some(max_age) = self.max_age {
            builder = builder.max_age(max_age);
        }
        if let Some(link) = self.link {
            builder = builder.link(link);
        }
        builder.build(dir, app_name).map(RollingFile::new)
    }
}
