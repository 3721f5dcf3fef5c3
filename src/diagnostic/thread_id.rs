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

use crate::diagnostic::ExecutionContextId;

/// An [`ExecutionContextId`] that reports the numeric part of [`std::thread::ThreadId`].
///
/// `ThreadId` only exposes its number through its debug representation (`ThreadId(7)`), so the
/// value is parsed from there.
///
/// ## Example
///
/// ```rust
/// use daylog::diagnostic::ExecutionContextId;
/// use daylog::diagnostic::ThreadIdDiagnostic;
///
/// let id = ThreadIdDiagnostic::default().current();
/// assert!(id > 0);
/// ```
#[derive(Default, Debug, Clone, Copy)]
#[non_exhaustive]
pub struct ThreadIdDiagnostic {}

impl ExecutionContextId for ThreadIdDiagnostic {
    fn current(&self) -> u64 {
        let id = format!("{:?}", std::thread::current().id());
        parse_thread_id(&id)
    }
}

fn parse_thread_id(repr: &str) -> u64 {
    let Some(rest) = repr.strip_prefix("ThreadId(") else {
        return 0;
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().unwrap_or(0)
}
