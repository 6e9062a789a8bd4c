//! `jiggler run`: the engine plus the tokio adapter loop.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use jiggler_core::storage::config_dir;
use jiggler_core::{
    Event, JiggleConfig, JiggleEngine, LaunchIntent, MoveSink, SettingsStore, TimerKind, WallTime,
};

use crate::adapter::TokioPresenter;
use crate::console::{self, Command};
use crate::instance::InstanceLock;
use crate::sink;

type Engine = JiggleEngine<TokioPresenter, Box<dyn MoveSink>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Settings as stored on disk, kept apart from the running configuration so
/// that launch flags are never written back.
struct Session {
    store: SettingsStore,
    stored: JiggleConfig,
}

pub fn run(intent: LaunchIntent) -> Result<(), Box<dyn std::error::Error>> {
    let lock = InstanceLock::acquire(&config_dir()?)?;

    let store = SettingsStore::open_default()?;
    let stored = store.load_or_default();
    let config = stored.apply_intent(&intent);
    let sink = sink::open()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(drive(Session { store, stored }, config, sink));
    // A pending stdin read would otherwise hold the runtime open.
    runtime.shutdown_background();
    debug!(lock = %lock.path().display(), "releasing instance lock");
    result
}

async fn drive(
    mut session: Session,
    config: JiggleConfig,
    sink: Box<dyn MoveSink>,
) -> Result<(), Box<dyn std::error::Error>> {
    let quiet = config.minimize_on_startup();
    let mut engine: Engine = JiggleEngine::new(config, TokioPresenter::new(quiet), sink);
    if !quiet {
        if !engine.is_active() {
            println!("{}", engine.tooltip_text());
        }
        println!("{}", console::USAGE);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            kind = engine.presenter_mut().next_tick() => {
                let event = match kind {
                    TimerKind::Period => engine.on_period_tick(),
                    TimerKind::GatePoll => engine.poll_gate(WallTime::now()),
                };
                trace_event(event);
            }
            line = lines.next_line() => match line? {
                Some(line) => {
                    if handle_line(&line, &mut engine, &mut session) == Flow::Quit {
                        break;
                    }
                }
                None => {
                    info!("stdin closed");
                    break;
                }
            },
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
        }
    }

    trace_event(engine.shutdown());
    debug_assert!(!engine.presenter().is_armed(TimerKind::Period));
    debug_assert!(!engine.presenter().is_armed(TimerKind::GatePoll));
    Ok(())
}

fn handle_line(line: &str, engine: &mut Engine, session: &mut Session) -> Flow {
    let command = match console::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Flow::Continue,
        Err(err) => {
            eprintln!("{err}");
            return Flow::Continue;
        }
    };

    match command {
        Command::Toggle => trace_event(engine.manual_toggle()),
        Command::Start => trace_event(engine.manual_start()),
        Command::Stop => trace_event(engine.manual_stop()),
        Command::Status => print_status(engine),
        Command::Quit => return Flow::Quit,
        Command::Edit(edit) => {
            session.stored = edit.apply(session.stored);
            if let Err(err) = session.store.save(&session.stored) {
                warn!(%err, "settings not saved");
                eprintln!("error: {err}");
            }
            trace_event(engine.reconfigure(edit.apply(*engine.config())));
        }
    }
    Flow::Continue
}

fn print_status(engine: &Engine) {
    let config = engine.config();
    let restriction = config.restriction();
    println!("{}", engine.tooltip_text());
    println!(
        "period {}, zen {}, restriction {}",
        config.period_label(),
        if config.zen_mode() { "on" } else { "off" },
        if restriction.enabled {
            format!(
                "{}-{} on {}",
                restriction.window_start, restriction.window_end, restriction.active_days
            )
        } else {
            "off".to_string()
        }
    );
}

fn trace_event(event: Option<Event>) {
    if let Some(event) = event {
        match serde_json::to_string(&event) {
            Ok(json) => debug!(event = %json, "engine event"),
            Err(_) => debug!(?event, "engine event"),
        }
    }
}
