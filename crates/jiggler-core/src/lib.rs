//! # Jiggler Core Library
//!
//! Keeps a workstation looking active by issuing periodic synthetic pointer
//! movement, optionally gated by a weekly time-of-day window. All decisions
//! live here; drawing UI, owning OS timers and moving the real cursor are
//! left to the caller through two narrow traits.
//!
//! ## Architecture
//!
//! - **Gate**: pure function deciding whether jiggling is permitted at a
//!   wall-clock instant
//! - **Engine**: the Idle/Active state machine; reconciles manual intent with
//!   the gate and asks its presenter to arm or cancel timers
//! - **Movement**: the zig-zag (or zen) vector produced on each period tick
//! - **Settings**: validated configuration snapshot, key/value record and the
//!   TOML settings store
//!
//! ## Key Components
//!
//! - [`JiggleEngine`]: Core state machine
//! - [`Presenter`]: Timer and refresh callbacks the engine requires
//! - [`MoveSink`]: The pointer-injection primitive
//! - [`JiggleConfig`]: Configuration snapshot
//! - [`SettingsStore`]: Settings persistence

pub mod error;
pub mod events;
pub mod settings;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, Result, ScheduleError};
pub use events::{Event, Trigger};
pub use settings::{JiggleConfig, LaunchIntent, MinuteOfDay, SettingsRecord, TimeRestriction, WeekdaySet};
pub use storage::SettingsStore;
pub use timer::{
    is_within_window, JiggleEngine, JiggleState, MoveSink, MoveVector, Presenter, TimerKind,
    WallTime,
};
