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

use jiff::RoundMode;
use jiff::Span;
use jiff::Timestamp;
use jiff::Unit;
use jiff::Zoned;
use jiff::ZonedRound;
use jiff::civil::Date;

/// Defines a fixed period for rolling of a log file.
///
/// Periods start at the top of the minute, hour or day in the time zone of the clock.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub enum Rotation {
    /// A new file every minute, stamped `%Y%m%d%H%M`.
    Minutely,
    /// A new file every hour, stamped `%Y%m%d%H`.
    Hourly,
    /// A new file every day, stamped `%Y%m%d`.
    #[default]
    Daily,
}

impl Rotation {
    /// Returns the start of the period following the one `now` falls in.
    pub(super) fn next_rollover(&self, now: &Zoned) -> Option<Timestamp> {
        let (unit, period) = match *self {
            Rotation::Minutely => (Unit::Minute, Span::new().minutes(1)),
            Rotation::Hourly => (Unit::Hour, Span::new().hours(1)),
            Rotation::Daily => (Unit::Day, Span::new().days(1)),
        };

        let start = now
            .round(ZonedRound::new().smallest(unit).mode(RoundMode::Trunc))
            .ok()?;
        let next = start.checked_add(period).ok()?;
        Some(next.timestamp())
    }

    /// The strftime pattern of the period stamp in file names.
    pub(super) fn date_format(&self) -> &'static str {
        match *self {
            Rotation::Minutely => "%Y%m%d%H%M",
            Rotation::Hourly => "%Y%m%d%H",
            Rotation::Daily => "%Y%m%d",
        }
    }

    /// Whether `stamp` could have been produced by [`Rotation::date_format`].
    pub(super) fn is_stamp(&self, stamp: &str) -> bool {
        let len = match *self {
            Rotation::Minutely => 12,
            Rotation::Hourly => 10,
            Rotation::Daily => 8,
        };
        if stamp.len() != len || !stamp.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }

        // all ASCII digits, so slicing and parsing cannot fail
        let field = |range: std::ops::Range<usize>| stamp[range].parse::<i16>().unwrap_or(-1);
        let (year, month, day) = (field(0..4), field(4..6), field(6..8));
        if Date::new(year, month as i8, day as i8).is_err() {
            return false;
        }
        if len >= 10 && field(8..10) >= 24 {
            return false;
        }
        if len >= 12 && field(10..12) >= 60 {
            return false;
        }
        true
    }
}
