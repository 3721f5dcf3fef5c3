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

//! Best-effort diagnostic enrichment for log records.
//!
//! Layouts depend on the capabilities defined here rather than on a particular runtime, so the
//! execution id and the call stack can be swapped out (or faked in tests) without touching the
//! formatting code.

use std::fmt;

pub use self::stack::BacktraceCapturer;
pub use self::stack::Frame;
pub use self::thread_id::ThreadIdDiagnostic;

mod stack;
mod thread_id;

/// Resolves a numeric identifier of the calling thread of execution.
///
/// The id is only used to correlate log lines. Implementations return `0` when they cannot
/// resolve one.
pub trait ExecutionContextId: fmt::Debug + Send + Sync + 'static {
    /// Returns the id of the current thread of execution, or `0` if unsupported.
    fn current(&self) -> u64;
}

/// Captures the call stack of the current thread of execution.
pub trait StackCapturer: fmt::Debug + Send + Sync + 'static {
    /// Returns the frames of the current call stack, innermost first.
    ///
    /// An empty list is returned when the platform cannot produce a stack.
    fn capture(&self) -> Vec<Frame>;
}
