//! Line commands read from stdin while the jiggler runs.

use std::fmt;

use jiggler_core::settings::keys;
use jiggler_core::{JiggleConfig, MinuteOfDay, SettingsRecord, WeekdaySet};

pub const USAGE: &str = "commands: toggle | start | stop | zen on|off | period <secs> | \
restrict on|off | window <HH:MM> <HH:MM> | days <Mon,Tue,...> | status | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Start,
    Stop,
    Status,
    Quit,
    Edit(Edit),
}

/// A settings change made from the console. Saved as soon as it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Zen(bool),
    Period(i64),
    Restrict(bool),
    Window(MinuteOfDay, MinuteOfDay),
    Days(WeekdaySet),
}

impl Edit {
    pub fn apply(self, config: JiggleConfig) -> JiggleConfig {
        match self {
            Edit::Zen(on) => config.with_zen_mode(on),
            Edit::Period(secs) => config.with_period_secs(secs),
            Edit::Restrict(on) => config.with_restriction_enabled(on),
            Edit::Window(start, end) => config.with_window(start, end),
            Edit::Days(days) => config.with_active_days(days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseError {}

fn on_off(word: Option<&str>) -> Result<bool, ParseError> {
    match word.map(str::to_ascii_lowercase).as_deref() {
        Some("on") | Some("1") | Some("true") => Ok(true),
        Some("off") | Some("0") | Some("false") => Ok(false),
        _ => Err(ParseError("expected on or off".into())),
    }
}

fn time_of_day(word: Option<&str>) -> Result<MinuteOfDay, ParseError> {
    word.and_then(MinuteOfDay::parse_hhmm)
        .ok_or_else(|| ParseError("expected a time as HH:MM".into()))
}

/// Parses one console line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "toggle" | "t" => Command::Toggle,
        "start" => Command::Start,
        "stop" => Command::Stop,
        "status" | "s" => Command::Status,
        "quit" | "q" | "exit" => Command::Quit,
        "zen" => Command::Edit(Edit::Zen(on_off(words.next())?)),
        "restrict" => Command::Edit(Edit::Restrict(on_off(words.next())?)),
        "period" => {
            let secs = words
                .next()
                .and_then(|w| w.parse::<i64>().ok())
                .ok_or_else(|| ParseError("expected a period in seconds".into()))?;
            Command::Edit(Edit::Period(secs))
        }
        "window" => {
            let start = time_of_day(words.next())?;
            let end = time_of_day(words.next())?;
            Command::Edit(Edit::Window(start, end))
        }
        "days" => {
            let list: String = words.by_ref().collect::<Vec<_>>().join(",");
            SettingsRecord::validate_entry(keys::ENABLED_DAYS, &list)
                .map_err(|e| ParseError(e.to_string()))?;
            Command::Edit(Edit::Days(WeekdaySet::parse_list(&list)))
        }
        other => return Err(ParseError(format!("unknown command '{other}'; {USAGE}"))),
    };

    if let Some(extra) = words.next() {
        return Err(ParseError(format!("unexpected argument '{extra}'")));
    }
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn parses_control_verbs() {
        assert_eq!(parse("toggle"), Ok(Some(Command::Toggle)));
        assert_eq!(parse("  T "), Ok(Some(Command::Toggle)));
        assert_eq!(parse("start"), Ok(Some(Command::Start)));
        assert_eq!(parse("stop"), Ok(Some(Command::Stop)));
        assert_eq!(parse("q"), Ok(Some(Command::Quit)));
        assert_eq!(parse(""), Ok(None));
    }

    #[test]
    fn parses_edits() {
        assert_eq!(parse("zen on"), Ok(Some(Command::Edit(Edit::Zen(true)))));
        assert_eq!(parse("restrict OFF"), Ok(Some(Command::Edit(Edit::Restrict(false)))));
        assert_eq!(parse("period 90"), Ok(Some(Command::Edit(Edit::Period(90)))));
        assert_eq!(
            parse("window 22:00 06:30"),
            Ok(Some(Command::Edit(Edit::Window(
                MinuteOfDay::from_hm(22, 0),
                MinuteOfDay::from_hm(6, 30)
            ))))
        );
    }

    #[test]
    fn days_accepts_spaces_after_commas() {
        let Ok(Some(Command::Edit(Edit::Days(days)))) = parse("days Mon, fri") else {
            panic!("expected a days edit");
        };
        assert!(days.contains(Weekday::Mon));
        assert!(days.contains(Weekday::Fri));
        assert_eq!(days.len(), 2);
    }

    #[test]
    fn days_accepts_space_separated_names() {
        let Ok(Some(Command::Edit(Edit::Days(days)))) = parse("days Mon Fri") else {
            panic!("expected a days edit");
        };
        assert!(days.contains(Weekday::Mon));
        assert!(days.contains(Weekday::Fri));
        assert_eq!(days.len(), 2);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse("dance").is_err());
        assert!(parse("zen maybe").is_err());
        assert!(parse("period soon").is_err());
        assert!(parse("window 09:00").is_err());
        assert!(parse("days Mon,Funday").is_err());
        assert!(parse("stop now").is_err());
    }

    #[test]
    fn period_edit_is_clamped_on_apply() {
        let config = Edit::Period(0).apply(JiggleConfig::default());
        assert_eq!(config.period_secs(), 1);
        let config = Edit::Period(1_000_000).apply(config);
        assert_eq!(config.period_secs(), 10_800);
    }
}
