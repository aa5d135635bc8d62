//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random legal moves for both sides until neither
//! can move, then scores the final position by piece count.

use fastrand::Rng;

use crate::board::{Board, Side};
use crate::rules::{apply_move, legal_moves, winner, Outcome};

/// Result of one finished playout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Playout {
    pub outcome: Outcome,
    /// Number of pieces placed during the playout.
    pub moves: usize,
}

/// Play a random game from `board` with `first` to move.
///
/// Works on its own clone; `board` is left untouched. Sides alternate every
/// turn whether they play or pass, and the game stops after two consecutive
/// passes. Since every placement fills a cell this takes at most N² moves.
pub fn random_playout(board: &Board, first: Side, rng: &mut Rng) -> Playout {
    let mut board = board.clone();
    playout_in_place(&mut board, first, rng)
}

/// Same as [`random_playout`] but consumes the given board.
pub(crate) fn playout_in_place(board: &mut Board, first: Side, rng: &mut Rng) -> Playout {
    let mut side = first;
    let mut passes = 0;
    let mut moves = 0;

    while passes < 2 {
        let candidates = legal_moves(board, side);
        if candidates.is_empty() {
            passes += 1;
        } else {
            let mv = candidates[rng.usize(..candidates.len())];
            apply_move(board, mv, side);
            moves += 1;
            passes = 0;
        }
        side = side.opponent();
    }

    Playout {
        outcome: winner(board),
        moves,
    }
}
