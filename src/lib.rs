//! othello-mc: Othello with a Monte Carlo move evaluator.
//!
//! The engine scores each candidate move by playing it, then running many
//! random playouts from the resulting position across a pool of workers.
//! The move with the highest fraction of computer wins is played.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits and engine defaults
//! - [`config`] - Startup settings, clamped to playable values
//! - [`board`] - Board representation, sides and coordinates
//! - [`rules`] - Legal moves, flipping and scoring
//! - [`playout`] - Random game simulation
//! - [`evaluator`] - Parallel Monte Carlo move scoring
//! - [`game`] - Turn controller with undo history
//! - [`console`] - Line-oriented text front end
//!
//! ## Example
//!
//! ```
//! use othello_mc::board::{Board, Side};
//! use othello_mc::evaluator::score_move;
//! use othello_mc::rules::legal_moves;
//!
//! let board = Board::new(8);
//! let mv = legal_moves(&board, Side::Dark)[0];
//! let score = score_move(&board, mv, Side::Dark, 200, 2, 42);
//! println!("{mv}: {:.1}%", score * 100.0);
//! ```

pub mod board;
pub mod config;
pub mod console;
pub mod constants;
pub mod evaluator;
pub mod game;
pub mod playout;
pub mod rules;
