use clap::Args;
use serde::Serialize;

use jiggler_core::{is_within_window, MinuteOfDay, SettingsStore, WallTime, WeekdaySet};

#[derive(Args)]
pub struct GateArgs {
    /// Instant to evaluate, e.g. "Mon 10:00" (defaults to now)
    #[arg(long, value_parser = parse_wall_time)]
    at: Option<WallTime>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

fn parse_wall_time(text: &str) -> Result<WallTime, String> {
    WallTime::parse(text).ok_or_else(|| format!("expected \"<Day> <HH:MM>\", got \"{text}\""))
}

#[derive(Serialize)]
struct GateReport {
    at: WallTime,
    restriction_enabled: bool,
    window_start: MinuteOfDay,
    window_end: MinuteOfDay,
    active_days: WeekdaySet,
    within_window: bool,
}

pub fn run(args: GateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = SettingsStore::open_default()?.load()?;
    let restriction = config.restriction();
    let at = args.at.unwrap_or_else(WallTime::now);

    let report = GateReport {
        at,
        restriction_enabled: restriction.enabled,
        window_start: restriction.window_start,
        window_end: restriction.window_end,
        active_days: restriction.active_days,
        within_window: is_within_window(at, restriction),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let verdict = if report.within_window { "permitted" } else { "not permitted" };
    if report.restriction_enabled {
        println!(
            "{at}: jiggling {verdict} (window {}-{} on {})",
            report.window_start, report.window_end, report.active_days
        );
    } else {
        println!("{at}: jiggling {verdict} (time restriction disabled)");
    }
    Ok(())
}
