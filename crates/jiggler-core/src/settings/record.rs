//! Key/value settings record exchanged with the settings store.
//!
//! Every value is text. Reading is lenient (see [`parse_flag`] and
//! [`parse_int`]); the validated view lives in [`super::JiggleConfig`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;

use super::days::{parse_weekday, MinuteOfDay};

/// Record keys.
pub mod keys {
    pub const MINIMIZE_ON_STARTUP: &str = "MinimizeOnStartup";
    pub const ZEN_JIGGLE: &str = "ZenJiggle";
    pub const JIGGLE_PERIOD: &str = "JigglePeriod";
    pub const ENABLE_TIME_RESTRICTION: &str = "EnableTimeRestriction";
    pub const START_HOUR: &str = "StartHour";
    pub const START_MINUTE: &str = "StartMinute";
    pub const END_HOUR: &str = "EndHour";
    pub const END_MINUTE: &str = "EndMinute";
    pub const ENABLED_DAYS: &str = "EnabledDays";

    pub const ALL: [&str; 9] = [
        MINIMIZE_ON_STARTUP,
        ZEN_JIGGLE,
        JIGGLE_PERIOD,
        ENABLE_TIME_RESTRICTION,
        START_HOUR,
        START_MINUTE,
        END_HOUR,
        END_MINUTE,
        ENABLED_DAYS,
    ];
}

/// Ordered key → text map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsRecord(BTreeMap<String, String>);

impl SettingsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Reads a 0/1 flag, falling back to `default` when missing or unreadable.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(parse_flag).unwrap_or(default)
    }

    /// Reads an integer, falling back to `default` when missing or unreadable.
    pub fn int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(parse_int).unwrap_or(default)
    }

    /// Checks that `key` belongs to the record and that `value` is readable
    /// for it. Range is not checked here; out-of-range numbers are clamped
    /// when the record is turned into a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] or [`ConfigError::InvalidValue`].
    pub fn validate_entry(key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        match key {
            keys::MINIMIZE_ON_STARTUP | keys::ZEN_JIGGLE | keys::ENABLE_TIME_RESTRICTION => {
                parse_flag(value).map(|_| ()).ok_or_else(|| invalid("expected 0 or 1"))
            }
            keys::JIGGLE_PERIOD
            | keys::START_HOUR
            | keys::START_MINUTE
            | keys::END_HOUR
            | keys::END_MINUTE => parse_int(value)
                .map(|_| ())
                .ok_or_else(|| invalid("expected an integer")),
            keys::ENABLED_DAYS => {
                let unknown: Vec<&str> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty() && parse_weekday(token).is_none())
                    .collect();
                if unknown.is_empty() {
                    Ok(())
                } else {
                    Err(invalid(&format!("unknown day(s): {}", unknown.join(", "))))
                }
            }
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    /// Reads a time of day stored as separate hour and minute keys.
    pub fn time_of_day(&self, hour_key: &str, minute_key: &str, default: MinuteOfDay) -> MinuteOfDay {
        let hour = self.int(hour_key, i64::from(default.hour()));
        let minute = self.int(minute_key, i64::from(default.minute()));
        MinuteOfDay::from_hm(hour, minute)
    }
}

impl FromIterator<(String, String)> for SettingsRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Any non-zero integer, or `true`, reads as set.
pub fn parse_flag(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    parse_int(text).map(|n| n != 0)
}

pub fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

pub fn format_flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}
