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

#[cfg(test)]
use jiff::Span;
use jiff::Zoned;

/// Source of the current time for rotation decisions.
#[derive(Debug)]
pub enum Clock {
    System,
    /// The time only moves when told to.
    #[cfg(test)]
    Manual(Zoned),
}

impl Clock {
    pub fn now(&self) -> Zoned {
        match self {
            Clock::System => Zoned::now(),
            #[cfg(test)]
            Clock::Manual(now) => now.clone(),
        }
    }

    #[cfg(test)]
    pub fn set_now(&mut self, now: Zoned) {
        *self = Clock::Manual(now);
    }

    #[cfg(test)]
    pub fn advance(&mut self, span: Span) {
        let next = self
            .now()
            .checked_add(span)
            .expect("manual clock overflowed");
        self.set_now(next);
    }
}
