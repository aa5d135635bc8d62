//! Game and engine settings.
//!
//! A [`Config`] is built once at startup and handed to the engine by
//! reference. Out-of-range values are clamped, never rejected, so a playable
//! configuration always exists.

use log::warn;

use crate::board::Side;
use crate::constants::{DEFAULT_SIMULATIONS, DEFAULT_SIZE, DEFAULT_THREADS, MAX_SIZE, MIN_SIZE};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Board size (NxN), even, between `MIN_SIZE` and `MAX_SIZE`.
    pub size: usize,
    /// Side played by the human.
    pub human: Side,
    /// Side that makes the first move of a game.
    pub first: Side,
    /// Playouts per candidate move, over all workers.
    pub simulations: usize,
    /// Parallel workers per move evaluation.
    pub threads: usize,
    /// Whether front ends show the computer's win estimate.
    pub show_score: bool,
    /// Master seed for the playout generators; random if `None`.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            human: Side::Dark,
            first: Side::Dark,
            simulations: DEFAULT_SIMULATIONS,
            threads: DEFAULT_THREADS,
            show_score: true,
            seed: None,
        }
    }
}

impl Config {
    /// The side the engine plays.
    #[inline]
    pub fn computer(&self) -> Side {
        self.human.opponent()
    }

    /// Clamp every field to its valid range, logging each adjustment.
    pub fn validated(mut self) -> Self {
        let size = clamp_size(self.size);
        if size != self.size {
            warn!("board size {} is not playable, using {size}", self.size);
            self.size = size;
        }
        if self.simulations == 0 {
            warn!("simulation count must be at least 1, using 1");
            self.simulations = 1;
        }
        if self.threads == 0 {
            warn!("thread count must be at least 1, using 1");
            self.threads = 1;
        }
        self
    }
}

/// Nearest playable size: at least `MIN_SIZE`, odd sizes round up, capped at `MAX_SIZE`.
fn clamp_size(size: usize) -> usize {
    let size = size.clamp(MIN_SIZE, MAX_SIZE);
    if size % 2 == 1 { size + 1 } else { size }
}
