//! gostate: a Go rules engine.
//!
//! ## Usage
//!
//! - `gostate` - Show a demo
//! - `gostate gtp` - Start GTP server for GUI integration
//! - `gostate selfplay` - Play random games and report the results

use std::io;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;

use gostate::board::Move;
use gostate::constants::{DEFAULT_SIZE, MAX_SIZE, MIN_SIZE, max_game_len};
use gostate::gtp::GtpEngine;
use gostate::player::{MatchConfig, RandomPlayer, play_match};
use gostate::position::Position;

/// gostate: a Go rules engine
#[derive(Parser)]
#[command(name = "gostate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp {
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,
    },
    /// Play random games against each other
    Selfplay {
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,
        #[arg(long, default_value_t = 1)]
        games: usize,
        /// Turn limit per game (default: three times the board area)
        #[arg(long)]
        max_turns: Option<usize>,
        /// Seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a simple demo of the engine
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logger(cli.verbose)?;

    match cli.command {
        Some(Commands::Gtp { size }) => {
            check_size(size)?;
            GtpEngine::new(size).run().context("GTP session failed")?;
        }
        Some(Commands::Selfplay {
            size,
            games,
            max_turns,
            seed,
        }) => {
            check_size(size)?;
            let config = MatchConfig {
                size,
                max_turns: max_turns.unwrap_or(max_game_len(size)),
            };
            run_selfplay(&config, games, seed)?;
        }
        Some(Commands::Demo) | None => run_demo()?,
    }
    Ok(())
}

fn setup_logger(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}][{}] {}", record.target(), record.level(), message))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .context("failed to install logger")
}

fn check_size(size: usize) -> Result<()> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
        bail!("board size must be between {MIN_SIZE} and {MAX_SIZE}, got {size}");
    }
    Ok(())
}

fn run_selfplay(config: &MatchConfig, games: usize, seed: Option<u64>) -> Result<()> {
    for game in 0..games {
        let (mut black, mut white) = match seed {
            Some(seed) => {
                let (b, w) = game_seeds(seed, game);
                (RandomPlayer::with_seed(b), RandomPlayer::with_seed(w))
            }
            None => (RandomPlayer::new(), RandomPlayer::new()),
        };
        let pos = play_match(&mut black, &mut white, config)
            .with_context(|| format!("game {} failed", game + 1))?;
        info!("game {} finished", game + 1);
        println!(
            "game {}: {} turns, prisoners black {} white {}",
            game + 1,
            pos.turns_played(),
            pos.black_prisoners(),
            pos.white_prisoners()
        );
    }
    Ok(())
}

/// Seeds for Black and White in game `game` of a seeded run.
fn game_seeds(seed: u64, game: usize) -> (u64, u64) {
    let base = seed.wrapping_add((game as u64).wrapping_mul(2));
    (base, base.wrapping_add(1))
}

fn run_demo() -> Result<()> {
    println!("gostate: Go rules engine\n");

    // A ladder: White (C2) is chased along the diagonal by Black.
    let moves = [(1, 1), (2, 1), (2, 0), (0, 8), (2, 2), (0, 7)];
    let moves: Vec<Move> = moves.iter().map(|&p| Move::Play(p)).collect();
    let pos = Position::replay(9, &moves).context("demo moves are legal")?;
    println!("{pos}");

    let action = Move::Play((3, 0));
    println!("Black {action} is a ladder capture: {}", pos.is_ladder_capture(action));
    println!(
        "  read to the end: {}",
        pos.is_ladder_capture_exhaustive(action)
    );

    let config = MatchConfig::with_size(9);
    let end = play_match(&mut RandomPlayer::new(), &mut RandomPlayer::new(), &config)?;
    println!("\nRandom game on 9x9:\n{end}");
    Ok(())
}
