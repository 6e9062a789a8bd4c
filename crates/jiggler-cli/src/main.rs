use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use jiggler_core::LaunchIntent;

mod adapter;
mod commands;
mod console;
mod instance;
mod sink;

#[derive(Parser)]
#[command(
    name = "jiggler",
    version,
    about = "Keeps the workstation awake by jiggling the mouse",
    disable_help_flag = true
)]
struct Cli {
    /// Start jiggling immediately
    #[arg(short = 'j', long = "jiggle")]
    jiggle: bool,
    /// Start minimized (no console status output)
    #[arg(short = 'm', long = "minimized")]
    minimized: bool,
    /// Start in zen mode (no visible movement)
    #[arg(short = 'z', long = "zen")]
    zen: bool,
    /// Jiggle period in seconds, clamped to 1..=10800
    #[arg(short = 's', long = "seconds", value_name = "N", allow_negative_numbers = true)]
    seconds: Option<i64>,
    /// Print help
    #[arg(short = 'h', long = "help", short_alias = '?', action = ArgAction::Help)]
    help: Option<bool>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn intent(&self) -> LaunchIntent {
        LaunchIntent {
            start_jiggling: self.jiggle,
            minimized: self.minimized,
            zen: self.zen,
            period_secs: self.seconds,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the jiggler (default)
    Run,
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Evaluate the time-window gate
    Gate(commands::gate::GateArgs),
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("JIGGLER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging unavailable: {e}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let intent = cli.intent();
    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::run(intent),
        Commands::Config { action } => commands::config::run(action),
        Commands::Gate(args) => commands::gate::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
