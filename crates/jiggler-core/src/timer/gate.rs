//! Time-window gate.
//!
//! Decides whether jiggling is permitted at a given wall-clock instant. Pure
//! and total, so it is cheap enough to call on every poll tick and on every
//! settings edit.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::settings::{parse_weekday, short_name, MinuteOfDay, TimeRestriction};

/// Weekday plus minute of day, the only parts of "now" the gate looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallTime {
    pub weekday: Weekday,
    pub minute_of_day: MinuteOfDay,
}

impl WallTime {
    pub fn new(weekday: Weekday, minute_of_day: MinuteOfDay) -> Self {
        Self {
            weekday,
            minute_of_day,
        }
    }

    pub fn at(weekday: Weekday, hour: i64, minute: i64) -> Self {
        Self::new(weekday, MinuteOfDay::from_hm(hour, minute))
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self::at(dt.weekday(), i64::from(dt.hour()), i64::from(dt.minute()))
    }

    /// Current local wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    /// Parses `"<Day> <HH:MM>"`, e.g. `"Mon 10:00"`.
    pub fn parse(text: &str) -> Option<Self> {
        let (day, time) = text.trim().split_once(char::is_whitespace)?;
        Some(Self::new(parse_weekday(day)?, MinuteOfDay::parse_hhmm(time)?))
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", short_name(self.weekday), self.minute_of_day)
    }
}

/// Returns whether `now` falls inside the configured window.
///
/// - restriction disabled: always `true`;
/// - weekday not enabled: `false`;
/// - `start <= end`: `start <= now < end`, so `start == end` is never inside;
/// - `start > end` (overnight): `now >= start || now < end`.
pub fn is_within_window(now: WallTime, restriction: &TimeRestriction) -> bool {
    if !restriction.enabled {
        return true;
    }

    if !restriction.active_days.contains(now.weekday) {
        return false;
    }

    let now = now.minute_of_day;
    let start = restriction.window_start;
    let end = restriction.window_end;

    if start <= end {
        now >= start && now < end
    } else {
        now >= start || now < end
    }
}
