//! Othello rules: legal move generation, move execution and scoring.
//!
//! All functions are pure over a [`Board`] except [`apply_move`], which is the
//! only way a board cell ever changes after construction.

use std::fmt;

use crate::board::{Board, Move, Side};
use crate::constants::DIRECTIONS;

/// Final result of a game, decided by piece count alone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win(Side),
    Tie,
}

impl Outcome {
    #[inline]
    pub fn is_win_for(self, side: Side) -> bool {
        self == Outcome::Win(side)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win(side) => write!(f, "{side} wins"),
            Outcome::Tie => write!(f, "Tie"),
        }
    }
}

/// Number of opponent pieces `side` would capture along `dir` by playing at `mv`.
///
/// A capture needs one or more opponent pieces directly adjacent, followed by a
/// piece of `side`, before an empty cell or the edge.
fn run_length(board: &Board, mv: Move, side: Side, dir: (isize, isize)) -> usize {
    let mut k = 1;
    while let Some(p) = board.offset(mv, dir, k) {
        match board.get(p.row, p.col) {
            None => return 0,
            Some(s) if s == side => return k - 1,
            Some(_) => k += 1,
        }
    }
    0
}

/// Captures per direction, in `DIRECTIONS` order.
fn runs(board: &Board, mv: Move, side: Side) -> [usize; 8] {
    std::array::from_fn(|i| run_length(board, mv, side, DIRECTIONS[i]))
}

/// Number of pieces `side` would flip by playing at `mv` (0 if the move is illegal).
pub fn flips(board: &Board, mv: Move, side: Side) -> usize {
    if !board.is_empty_at(mv) {
        return 0;
    }
    runs(board, mv, side).iter().sum()
}

/// Check whether `side` may play at `mv`.
pub fn is_legal(board: &Board, mv: Move, side: Side) -> bool {
    board.is_empty_at(mv)
        && DIRECTIONS
            .iter()
            .any(|&dir| run_length(board, mv, side, dir) > 0)
}

/// All legal moves for `side`, in row-major scan order.
///
/// The order is relied on by move selection: among equally scored moves the
/// first one scanned wins.
pub fn legal_moves(board: &Board, side: Side) -> Vec<Move> {
    let n = board.size();
    (0..n)
        .flat_map(|row| (0..n).map(move |col| Move::new(row, col)))
        .filter(|&mv| is_legal(board, mv, side))
        .collect()
}

/// Whether `side` has at least one legal move.
pub fn has_legal_move(board: &Board, side: Side) -> bool {
    let n = board.size();
    (0..n).any(|row| (0..n).any(|col| is_legal(board, Move::new(row, col), side)))
}

/// Play `mv` for `side`: flip every bracketed run, then place the piece.
/// Returns the number of flipped pieces.
///
/// # Panics
/// If the move is not legal. Callers must pick moves from [`legal_moves`];
/// anything else is a bug that would corrupt the position.
pub fn apply_move(board: &mut Board, mv: Move, side: Side) -> usize {
    assert!(
        board.is_empty_at(mv),
        "illegal move {mv} for {side}: cell is occupied or off the board"
    );
    let runs = runs(board, mv, side);
    let flipped: usize = runs.iter().sum();
    assert!(flipped > 0, "illegal move {mv} for {side}: captures nothing");

    for (&dir, &len) in DIRECTIONS.iter().zip(runs.iter()) {
        for k in 1..=len {
            if let Some(p) = board.offset(mv, dir, k) {
                board.set(p.row, p.col, side);
            }
        }
    }
    board.set(mv.row, mv.col, side);
    flipped
}

/// Number of cells holding a piece of `side`.
pub fn piece_count(board: &Board, side: Side) -> usize {
    board.cells().iter().filter(|&&c| c == Some(side)).count()
}

/// Winner by piece count: strictly more pieces wins, equal counts tie.
/// Only meaningful once neither side can move.
pub fn winner(board: &Board) -> Outcome {
    let dark = piece_count(board, Side::Dark);
    let light = piece_count(board, Side::Light);
    match dark.cmp(&light) {
        std::cmp::Ordering::Greater => Outcome::Win(Side::Dark),
        std::cmp::Ordering::Less => Outcome::Win(Side::Light),
        std::cmp::Ordering::Equal => Outcome::Tie,
    }
}

/// The game is over when neither side has a legal move.
pub fn is_game_over(board: &Board) -> bool {
    !has_legal_move(board, Side::Dark) && !has_legal_move(board, Side::Light)
}
