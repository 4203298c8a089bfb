use std::path::PathBuf;
use std::process;

use clap::Parser;

use chatbook::config::Config;
use chatbook::{telemetry, tui};

#[derive(Parser)]
#[command(
    name = "cb",
    version = env!("CARGO_PKG_VERSION"),
    about = "Terminal chat client with a lazily loaded conversation list"
)]
struct Cli {
    /// Use a custom config file instead of ~/.chatbook.json
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Sample conversations generated at startup, on top of the fixed ones
    #[arg(long, value_name = "N")]
    chats: Option<usize>,

    /// Stop loading more conversations once the list holds this many
    #[arg(long, value_name = "N")]
    ceiling: Option<usize>,

    /// Append logs to this file (default: off unless CHATBOOK_LOG is set)
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref());
    if let Some(chats) = cli.chats {
        config.mock.initial_chats = chats;
    }
    if let Some(ceiling) = cli.ceiling {
        config.list.ceiling = ceiling;
    }

    if let Err(e) = telemetry::init_logging(cli.log_file.as_deref()) {
        eprintln!("Warning: {}", e);
    }

    if let Err(e) = tui::run(config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
