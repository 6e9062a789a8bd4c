//! Time-of-day and weekday value types used by the restriction window.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weekdays in the order they are written to the settings record.
pub const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Minutes since midnight, always within `0..=1439`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    pub const MIDNIGHT: MinuteOfDay = MinuteOfDay(0);
    pub const LAST: MinuteOfDay = MinuteOfDay(1439);

    /// Clamps `minutes` into `0..=1439`.
    pub fn new(minutes: i64) -> Self {
        Self(minutes.clamp(0, i64::from(Self::LAST.0)) as u16)
    }

    /// Builds a time of day from separate hour and minute fields, clamping
    /// each one (hours to `0..=23`, minutes to `0..=59`).
    pub fn from_hm(hour: i64, minute: i64) -> Self {
        let hour = hour.clamp(0, 23);
        let minute = minute.clamp(0, 59);
        Self((hour * 60 + minute) as u16)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Parses `HH:MM`. Fields are clamped, not rejected.
    pub fn parse_hhmm(text: &str) -> Option<Self> {
        let (hour, minute) = text.trim().split_once(':')?;
        let hour = hour.trim().parse::<i64>().ok()?;
        let minute = minute.trim().parse::<i64>().ok()?;
        Some(Self::from_hm(hour, minute))
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl From<MinuteOfDay> for String {
    fn from(value: MinuteOfDay) -> Self {
        value.to_string()
    }
}

impl<'de> Deserialize<'de> for MinuteOfDay {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        MinuteOfDay::parse_hhmm(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day: {text}")))
    }
}

/// A set of weekdays. Membership is non-exclusive and the empty set is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);
    pub const ALL: WeekdaySet = WeekdaySet(0b111_1111);

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_sunday()
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn remove(&mut self, day: Weekday) {
        self.0 &= !Self::bit(day);
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        WEEK.into_iter().filter(move |day| self.contains(*day))
    }

    /// Parses a comma-separated day list such as `Mon,wed,FRI`.
    ///
    /// Case-insensitive, any order. Unrecognized tokens are skipped and an
    /// empty string yields the empty set.
    pub fn parse_list(text: &str) -> Self {
        text.split(',')
            .filter_map(parse_weekday)
            .collect()
    }
}

impl Default for WeekdaySet {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(short_name).collect();
        f.write_str(&names.join(","))
    }
}

impl From<WeekdaySet> for String {
    fn from(value: WeekdaySet) -> Self {
        value.to_string()
    }
}

/// Three-letter name used in the settings record.
pub fn short_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

pub fn parse_weekday(value: &str) -> Option<Weekday> {
    match value.trim().to_ascii_lowercase().as_str() {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    }
}
