//! Validated jiggle configuration.
//!
//! [`JiggleConfig`] is an immutable snapshot. Every constructor and every
//! `with_*` edit clamps numeric fields into their domain, so a constructed
//! value can never hold an out-of-range period or time of day.

mod days;
mod record;

pub use days::{parse_weekday, short_name, MinuteOfDay, WeekdaySet, WEEK};
pub use record::{format_flag, keys, parse_flag, parse_int, SettingsRecord};

use serde::Serialize;

pub const MIN_PERIOD_SECS: u32 = 1;
pub const MAX_PERIOD_SECS: u32 = 10_800;
pub const DEFAULT_PERIOD_SECS: u32 = 60;

/// Clamps a period in seconds into `MIN_PERIOD_SECS..=MAX_PERIOD_SECS`.
pub fn clamp_period_secs(secs: i64) -> u32 {
    secs.clamp(i64::from(MIN_PERIOD_SECS), i64::from(MAX_PERIOD_SECS)) as u32
}

/// Weekly time-of-day window that gates automatic jiggling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRestriction {
    pub enabled: bool,
    pub window_start: MinuteOfDay,
    pub window_end: MinuteOfDay,
    pub active_days: WeekdaySet,
}

impl Default for TimeRestriction {
    fn default() -> Self {
        Self {
            enabled: false,
            window_start: MinuteOfDay::from_hm(9, 0),
            window_end: MinuteOfDay::from_hm(18, 0),
            active_days: WeekdaySet::ALL,
        }
    }
}

/// Launch-time intent taken from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchIntent {
    pub start_jiggling: bool,
    pub minimized: bool,
    pub zen: bool,
    pub period_secs: Option<i64>,
}

/// Configuration snapshot consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JiggleConfig {
    period_secs: u32,
    zen_mode: bool,
    minimize_on_startup: bool,
    /// Manual intent applied once when the engine is constructed.
    #[serde(skip)]
    start_jiggling: bool,
    restriction: TimeRestriction,
}

impl Default for JiggleConfig {
    fn default() -> Self {
        Self {
            period_secs: DEFAULT_PERIOD_SECS,
            zen_mode: false,
            minimize_on_startup: false,
            start_jiggling: false,
            restriction: TimeRestriction::default(),
        }
    }
}

impl JiggleConfig {
    // ── Queries ──────────────────────────────────────────────────────

    pub fn period_secs(&self) -> u32 {
        self.period_secs
    }

    pub fn period_ms(&self) -> u64 {
        u64::from(self.period_secs).saturating_mul(1000)
    }

    pub fn zen_mode(&self) -> bool {
        self.zen_mode
    }

    pub fn minimize_on_startup(&self) -> bool {
        self.minimize_on_startup
    }

    pub fn start_jiggling(&self) -> bool {
        self.start_jiggling
    }

    pub fn restriction(&self) -> &TimeRestriction {
        &self.restriction
    }

    // ── Edits ────────────────────────────────────────────────────────

    pub fn with_period_secs(mut self, secs: i64) -> Self {
        self.period_secs = clamp_period_secs(secs);
        self
    }

    pub fn with_zen_mode(mut self, zen_mode: bool) -> Self {
        self.zen_mode = zen_mode;
        self
    }

    pub fn with_minimize_on_startup(mut self, minimize: bool) -> Self {
        self.minimize_on_startup = minimize;
        self
    }

    pub fn with_start_jiggling(mut self, start: bool) -> Self {
        self.start_jiggling = start;
        self
    }

    pub fn with_restriction(mut self, restriction: TimeRestriction) -> Self {
        self.restriction = restriction;
        self
    }

    pub fn with_restriction_enabled(mut self, enabled: bool) -> Self {
        self.restriction.enabled = enabled;
        self
    }

    pub fn with_window(mut self, start: MinuteOfDay, end: MinuteOfDay) -> Self {
        self.restriction.window_start = start;
        self.restriction.window_end = end;
        self
    }

    pub fn with_active_days(mut self, days: WeekdaySet) -> Self {
        self.restriction.active_days = days;
        self
    }

    /// Folds command-line intent into the loaded settings. Only the flags
    /// that were given change anything.
    pub fn apply_intent(self, intent: &LaunchIntent) -> Self {
        let mut config = self;
        if intent.start_jiggling {
            config = config.with_start_jiggling(true);
        }
        if intent.minimized {
            config = config.with_minimize_on_startup(true);
        }
        if intent.zen {
            config = config.with_zen_mode(true);
        }
        if let Some(secs) = intent.period_secs {
            config = config.with_period_secs(secs);
        }
        config
    }

    // ── Record conversion ────────────────────────────────────────────

    /// Builds a configuration from a settings record. Missing or unreadable
    /// keys take their defaults; out-of-range numbers are clamped.
    pub fn from_record(record: &SettingsRecord) -> Self {
        let defaults = Self::default();
        let default_window = TimeRestriction::default();

        let active_days = match record.get(keys::ENABLED_DAYS) {
            Some(list) => WeekdaySet::parse_list(list),
            None => default_window.active_days,
        };

        Self {
            period_secs: clamp_period_secs(
                record.int(keys::JIGGLE_PERIOD, i64::from(defaults.period_secs)),
            ),
            zen_mode: record.flag(keys::ZEN_JIGGLE, defaults.zen_mode),
            minimize_on_startup: record.flag(keys::MINIMIZE_ON_STARTUP, defaults.minimize_on_startup),
            start_jiggling: false,
            restriction: TimeRestriction {
                enabled: record.flag(keys::ENABLE_TIME_RESTRICTION, default_window.enabled),
                window_start: record.time_of_day(
                    keys::START_HOUR,
                    keys::START_MINUTE,
                    default_window.window_start,
                ),
                window_end: record.time_of_day(
                    keys::END_HOUR,
                    keys::END_MINUTE,
                    default_window.window_end,
                ),
                active_days,
            },
        }
    }

    /// Writes every persisted field. `start_jiggling` is launch intent and is
    /// never persisted.
    pub fn to_record(&self) -> SettingsRecord {
        let window = &self.restriction;
        let mut record = SettingsRecord::new();
        record.set(keys::MINIMIZE_ON_STARTUP, format_flag(self.minimize_on_startup));
        record.set(keys::ZEN_JIGGLE, format_flag(self.zen_mode));
        record.set(keys::JIGGLE_PERIOD, self.period_secs.to_string());
        record.set(keys::ENABLE_TIME_RESTRICTION, format_flag(window.enabled));
        record.set(keys::START_HOUR, window.window_start.hour().to_string());
        record.set(keys::START_MINUTE, window.window_start.minute().to_string());
        record.set(keys::END_HOUR, window.window_end.hour().to_string());
        record.set(keys::END_MINUTE, window.window_end.minute().to_string());
        record.set(keys::ENABLED_DAYS, window.active_days.to_string());
        record
    }

    /// Human-readable period label, e.g. `60 s`.
    pub fn period_label(&self) -> String {
        format!("{} s", self.period_secs)
    }
}
