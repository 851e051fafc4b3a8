use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use connect_four::config::{AppConfig, OutputFormat};
use connect_four::game::{GameOutcome, GameState};
use connect_four::session::SessionState;

/// Replay a sequence of column drops and print the resulting game.
#[derive(Parser)]
#[command(name = "connect-four", about = "Replay Connect Four moves through the engine")]
struct Cli {
    /// Columns to drop into, in order (e.g. 3,3,4)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    moves: Vec<i64>,

    /// Output format; overrides the config file
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Leave the game waiting instead of starting it before the first move
    #[arg(long)]
    no_start: bool,

    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load_optional(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let config_found = loaded.is_some();
    let config = loaded.unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if !config_found {
        warn!(path = %cli.config.display(), "config file not found, using defaults");
    }

    let format = cli.format.unwrap_or(config.replay.format);
    let mut state = GameState::initial();
    if config.replay.start && !cli.no_start {
        state = state.start();
    }

    for (index, &col) in cli.moves.iter().enumerate() {
        state = state
            .make_move(col)
            .with_context(|| format!("move {} (column {col})", index + 1))?;
    }
    info!(moves = state.move_count(), status = ?state.status(), "replay complete");

    print_state(&state, format)
}

fn print_state(state: &GameState, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print!("{}", state.board());
            match state.outcome() {
                Some(GameOutcome::Winner(player)) => println!("{player} wins"),
                Some(GameOutcome::Draw) => println!("Draw"),
                None => println!("{} to move", state.current_player()),
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(state).context("serializing game state")?;
            println!("{json}");
        }
        OutputFormat::Session => {
            let (session, status) = SessionState::from_game(state);
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "status": status,
                "state": session,
            }))
            .context("serializing session state")?;
            println!("{json}");
        }
    }
    Ok(())
}
