use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::{constants::DEFAULT_TICK_RATE, waves::WaveBook};

const DEFAULT_LOG_FILTER: &str = "game=info,common=info";

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Headless wave survival simulation", long_about = None)]
pub struct Args {
    // Seed for every random draw in the run
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    // Stop after this many waves (runs until everyone is down when omitted)
    #[arg(long)]
    pub waves: Option<u32>,

    // Local players, 1 or 2
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub players: u8,

    // Simulation ticks per second
    #[arg(long, default_value_t = DEFAULT_TICK_RATE, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub tick_rate: u32,

    // JSON file replacing the built-in wave definitions
    #[arg(long)]
    pub wave_book: Option<PathBuf>,

    // Leave players idle instead of driving them with the autopilot
    #[arg(long, default_value_t = false)]
    pub no_autopilot: bool,

    // Pace ticks against the wall clock instead of running flat out
    #[arg(long, default_value_t = false)]
    pub realtime: bool,

    // Hard stop after this many ticks
    #[arg(long)]
    pub max_ticks: Option<u64>,
}

// ============================================================================
// Setup
// ============================================================================

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn load_wave_book(path: Option<&Path>) -> Result<WaveBook> {
    let Some(path) = path else {
        return Ok(WaveBook::builtin());
    };
    let book = WaveBook::load(path).with_context(|| format!("Failed to load wave book {}", path.display()))?;
    tracing::info!("loaded {} wave definitions from {}", book.waves.len(), path.display());
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let args = Args::parse_from(["game"]);
        assert_eq!(args.seed, 0);
        assert_eq!(args.players, 1);
        assert_eq!(args.tick_rate, DEFAULT_TICK_RATE);
        assert!(!args.no_autopilot);
        assert!(args.waves.is_none());
    }

    #[test]
    fn rejects_three_players() {
        assert!(Args::try_parse_from(["game", "--players", "3"]).is_err());
    }

    #[test]
    fn missing_book_is_an_error() {
        assert!(load_wave_book(Some(Path::new("/nonexistent/waves.json"))).is_err());
        assert!(load_wave_book(None).is_ok());
    }
}
