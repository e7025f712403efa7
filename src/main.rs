use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tabstrip::config::Config;
use tabstrip::logging::LogTarget;
use tabstrip::{client, logging, replay};

#[derive(Parser)]
#[command(name = "tabstrip", about = "Tab-group window controller for a window-layout service")]
struct Cli {
    /// Config file (defaults to ~/.config/tabstrip/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the layout service and run the controller
    Run {
        /// Layout service socket
        #[arg(short, long)]
        socket: Option<PathBuf>,
    },
    /// Replay a JSON-lines event log and print what the controller does
    Replay {
        /// Event log, one layout event or click per line
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let target = match cli.command {
        Some(Commands::Replay { .. }) => LogTarget::Stderr,
        _ => LogTarget::File(config.log_file.clone()),
    };
    logging::init(&config.log_level, &target)?;

    match cli.command {
        None => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(client::run(config))
        }
        Some(Commands::Run { socket }) => {
            if let Some(socket) = socket {
                config.service.socket = socket;
            }
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(client::run(config))
        }
        Some(Commands::Replay { file }) => {
            let input = std::fs::File::open(&file)
                .with_context(|| format!("cannot open {}", file.display()))?;
            let summary = replay::replay(&config, BufReader::new(input), io::stdout().lock())?;
            tracing::info!(
                steps = summary.steps,
                commands = summary.commands,
                skipped = summary.skipped,
                "replay finished"
            );
            Ok(())
        }
    }
}
