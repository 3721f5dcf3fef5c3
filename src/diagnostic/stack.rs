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

use std::backtrace::Backtrace;
use std::backtrace::BacktraceStatus;

use crate::diagnostic::StackCapturer;

/// One frame of a captured call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Source file of the frame, if debug info is available.
    pub file: Option<String>,
    /// Line in `file`, if debug info is available.
    pub line: Option<u32>,
    /// Demangled function name, `<unknown>` if unresolved.
    pub function: String,
}

/// A [`StackCapturer`] backed by [`std::backtrace::Backtrace`].
///
/// The standard library does not expose backtrace frames as data yet, so the rendered backtrace
/// is parsed back into [`Frame`]s. Frames without symbols or locations are kept with the missing
/// parts left empty.
#[derive(Default, Debug, Clone, Copy)]
#[non_exhaustive]
pub struct BacktraceCapturer {}

impl StackCapturer for BacktraceCapturer {
    fn capture(&self) -> Vec<Frame> {
        let backtrace = Backtrace::force_capture();
        match backtrace.status() {
            BacktraceStatus::Captured => parse_backtrace(&backtrace.to_string()),
            _ => vec![],
        }
    }
}

// The rendering looks like:
//
//    3: app::handler
//              at ./src/handler.rs:42:9
//       app::inlined_helper
//              at ./src/helper.rs:7:5
//    4: <unknown>
fn parse_backtrace(rendered: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = vec![];

    for line in rendered.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                let (file, lineno) = parse_location(location);
                frame.file = Some(file);
                frame.line = lineno;
            }
            continue;
        }

        let function = match line.split_once(": ") {
            Some((index, function)) if index.chars().all(|c| c.is_ascii_digit()) => function,
            // an inlined symbol of the previous frame
            _ => line,
        };
        frames.push(Frame {
            file: None,
            line: None,
            function: function.to_string(),
        });
    }

    frames
}

// `file:line:column` or `file:line`, where the file itself may contain colons (`C:\src\main.rs`).
fn parse_location(location: &str) -> (String, Option<u32>) {
    let mut file = location;
    let mut numbers = vec![];
    while numbers.len() < 2 {
        match file.rsplit_once(':') {
            Some((head, tail)) if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) => {
                numbers.push(tail);
                file = head;
            }
            _ => break,
        }
    }

    // the outermost number is the line
    let line = numbers.last().and_then(|n| n.parse().ok());
    (file.to_string(), line)
}
