//! othello-mc: play Othello against a Monte Carlo engine.
//!
//! ## Usage
//!
//! - `othello-mc` - Play an interactive game in the terminal
//! - `othello-mc play` - Same as above
//! - `othello-mc demo` - Score every opening move and show the engine's choice
//!
//! Set `RUST_LOG=debug` to see per-move scores and passes.

use std::io;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use othello_mc::board::{Board, Side};
use othello_mc::config::Config;
use othello_mc::console::Console;
use othello_mc::constants::{DEFAULT_SIMULATIONS, DEFAULT_SIZE, DEFAULT_THREADS};
use othello_mc::evaluator::{select_best, Evaluator};
use othello_mc::game::Game;

/// othello-mc: Othello against a Monte Carlo engine
#[derive(Parser)]
#[command(name = "othello-mc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    options: Options,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive game on stdin/stdout
    Play,
    /// Score every opening move for the first side
    Demo,
}

#[derive(Args)]
struct Options {
    /// Board size (even, 4 to 26)
    #[arg(long, default_value_t = DEFAULT_SIZE, global = true)]
    size: usize,

    /// Let the computer move first (the human then plays Light)
    #[arg(long, global = true)]
    computer_starts: bool,

    /// Parallel workers per move evaluation
    #[arg(long, default_value_t = DEFAULT_THREADS, global = true)]
    threads: usize,

    /// Random playouts per candidate move
    #[arg(long, default_value_t = DEFAULT_SIMULATIONS, global = true)]
    simulations: usize,

    /// Do not show the computer's win estimate
    #[arg(long, global = true)]
    hide_score: bool,

    /// Seed for reproducible engine play
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl Options {
    fn config(&self) -> Config {
        Config {
            size: self.size,
            human: if self.computer_starts { Side::Light } else { Side::Dark },
            first: Side::Dark,
            simulations: self.simulations,
            threads: self.threads,
            show_score: !self.hide_score,
            seed: self.seed,
        }
        .validated()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.options.config();

    match cli.command {
        Some(Commands::Demo) => run_demo(&config),
        Some(Commands::Play) | None => {
            let mut console = Console::new(Game::new(config));
            console.run(io::stdin().lock(), io::stdout())
        }
    }
}

fn run_demo(config: &Config) -> Result<()> {
    println!("othello-mc: Monte Carlo Othello\n");

    let board = Board::new(config.size);
    println!("{board}");
    println!(
        "Scoring {} moves with {} playouts each on {} workers...",
        config.first,
        config.simulations,
        config.threads
    );

    let mut evaluator = Evaluator::new(config);
    let scored = evaluator.evaluate_all(&board, config.first);
    for s in &scored {
        println!("  {}  {:5.1}%", s.mv, s.score * 100.0);
    }
    if let Some(best) = select_best(&scored) {
        println!("Best move: {} ({:.1}%)", best.mv, best.score * 100.0);
    }
    Ok(())
}
