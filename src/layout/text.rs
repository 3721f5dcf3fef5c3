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

use std::fmt::Write;
use std::path::Path;
use std::sync::LazyLock;

use jiff::Zoned;
use jiff::tz::TimeZone;
use log::Level;
use log::Record;
use regex::Regex;

use crate::Error;
use crate::diagnostic::BacktraceCapturer;
use crate::diagnostic::ExecutionContextId;
use crate::diagnostic::Frame;
use crate::diagnostic::StackCapturer;
use crate::diagnostic::ThreadIdDiagnostic;
use crate::layout::Layout;

/// Frames matching this pattern are left out of the stack section of error records.
///
/// It covers the standard library, the test harness, the logging plumbing itself, async runtimes,
/// web frameworks, and process start-up symbols. Closure call shims such as
/// `<F as core::ops::function::FnOnce<()>>::call_once` are matched wherever the path appears.
pub const DEFAULT_NOISE_PATTERN: &str = concat!(
    r"^(?:<?(?:std|core|alloc|backtrace|test|log|daylog|tokio|hyper|tower|axum|futures_\w+|actix_\w+)::",
    r"|__rust|__GI_|_start$|__libc_start|start_thread$|clone3?$|main$|<unknown>$)",
    r"|core::ops::function::",
);

static DEFAULT_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_NOISE_PATTERN)
        .expect("invalid default noise pattern; this is a bug in daylog text layout")
});

const DEFAULT_MAX_FRAMES: usize = 10;

/// A layout that formats log record as a bracketed text line.
///
/// Output format:
///
/// ```text
/// [2024-08-11|22:44:57.172][handler.rs:51][executionID:3][INFO]: Hello info!
/// [2024-08-11|22:44:57.172][handler.rs:52][executionID:3][WARN]: Hello warn!
/// [2024-08-11|22:44:57.173][handler.rs:53][executionID:3][ERROR]: Hello error!
/// src/handler.rs:53
///     app::handler::serve
/// src/main.rs:20
///     app::main
/// ```
///
/// Error records are followed by the call stack of the logging thread. Frames whose function
/// matches the noise pattern (see [`DEFAULT_NOISE_PATTERN`]) are skipped and at most ten frames
/// are printed.
///
/// The timestamp uses the system time zone unless [`TextLayout::timezone`] is set. When the
/// record carries no caller location, the file and line fields are left empty.
#[derive(Debug)]
pub struct TextLayout {
    tz: Option<TimeZone>,
    execution_id: Box<dyn ExecutionContextId>,
    stack: Box<dyn StackCapturer>,
    noise: Regex,
    max_frames: usize,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            tz: None,
            execution_id: Box::new(ThreadIdDiagnostic::default()),
            stack: Box::new(BacktraceCapturer::default()),
            noise: DEFAULT_NOISE.clone(),
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

impl TextLayout {
    /// Sets the time zone of the timestamp.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }

    /// Sets how the execution id is resolved.
    pub fn execution_id(mut self, execution_id: impl ExecutionContextId) -> Self {
        self.execution_id = Box::new(execution_id);
        self
    }

    /// Sets how the call stack of error records is captured.
    pub fn stack_capturer(mut self, stack: impl StackCapturer) -> Self {
        self.stack = Box::new(stack);
        self
    }

    /// Replaces the pattern of stack frames to leave out.
    ///
    /// The pattern is matched against the function name of each frame.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regular expression.
    pub fn noise_pattern(mut self, pattern: &str) -> Result<Self, Error> {
        self.noise = Regex::new(pattern).map_err(|err| {
            Error::new("failed to compile noise pattern")
                .with_context("pattern", pattern)
                .with_source(err)
        })?;
        Ok(self)
    }

    /// Sets the maximum number of stack frames printed for an error record.
    pub fn max_frames(mut self, n: usize) -> Self {
        self.max_frames = n;
        self
    }

    fn write_stack(&self, text: &mut String) {
        let frames = self.stack.capture();
        let frames = frames
            .iter()
            .filter(|frame| !self.noise.is_match(&frame.function))
            .take(self.max_frames);

        for Frame {
            file,
            line,
            function,
        } in frames
        {
            let _ = match (file, line) {
                (Some(file), Some(line)) => writeln!(text, "{file}:{line}"),
                (Some(file), None) => writeln!(text, "{file}"),
                (None, _) => writeln!(text, "<unknown>"),
            };
            let _ = writeln!(text, "\t{function}");
        }
    }
}

impl Layout for TextLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let now = match self.tz.clone() {
            Some(tz) => Zoned::now().with_time_zone(tz),
            None => Zoned::now(),
        };
        let time = now.strftime("%Y-%m-%d|%H:%M:%S.%3f");
        let file = record.file().map(basename).unwrap_or_default();
        let line = record.line().map(|l| l.to_string()).unwrap_or_default();
        let id = self.execution_id.current();
        let level = record.level().as_str().to_uppercase();
        let message = record.args();

        let mut text =
            format!("[{time}][{file}:{line}][executionID:{id}][{level}]: {message}\n");
        if record.level() <= Level::Error {
            self.write_stack(&mut text);
        }
        Ok(text.into_bytes())
    }
}

fn basename(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}
