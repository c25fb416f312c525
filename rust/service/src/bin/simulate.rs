use std::error::Error;

use clap::Parser;
use pokerroom_engine::errors::GameError;
use pokerroom_engine::showdown::HandOutcome;
use pokerroom_service::{ServiceError, TableRegistry, config, init_logging};

#[derive(Parser)]
#[command(name = "pokerroom-sim")]
#[command(about = "Play bot-only hands and report chip counts")]
struct Cli {
    /// Seats at the table (2-6)
    #[arg(long, default_value_t = 6)]
    seats: usize,
    /// Number of hands to play
    #[arg(long, default_value_t = 100)]
    hands: u64,
    /// Shuffle seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Bot strategy (overrides configuration)
    #[arg(long)]
    strategy: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    if let Err(e) = init_logging() {
        tracing::debug!(error = %e, "keeping the already installed tracing subscriber");
    }

    let mut cfg = config::load()?;
    if let Some(strategy) = cli.strategy {
        cfg.bot_strategy = strategy;
    }
    let registry = TableRegistry::new(cfg)?;
    let id = registry.create_table_with_seed(cli.seats, cli.seed)?;

    let mut played = 0u64;
    let mut showdowns = 0u64;
    while played < cli.hands {
        match registry.start_hand(&id) {
            Ok(()) => {}
            Err(ServiceError::Game(GameError::NotEnoughPlayers(_))) => break,
            Err(e) => return Err(e.into()),
        }
        registry.run_bots(&id)?;
        if matches!(registry.showdown(&id)?, HandOutcome::Showdown(_)) {
            showdowns += 1;
        }
        played += 1;
    }

    let stacks = registry.inspect(&id, |t| {
        t.players()
            .iter()
            .map(|p| (p.name().to_string(), p.stack()))
            .collect::<Vec<_>>()
    })?;
    println!("hands played: {played}");
    println!("showdowns:    {showdowns}");
    for (name, stack) in stacks {
        println!("{name:>8}: {stack}");
    }
    Ok(())
}
