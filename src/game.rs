//! Turn controller: alternating play, passes, computer move selection and undo.

use log::{debug, info};
use thiserror::Error;

use crate::board::{Board, Move, Side};
use crate::config::Config;
use crate::evaluator::{Evaluator, ScoredMove};
use crate::rules::{self, Outcome};

/// Whose turn it is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    Awaiting(Side),
    Ended,
}

/// Misuse of the turn controller by a front end.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("the game is over")]
    GameOver,

    #[error("it is not {0}'s turn")]
    NotYourTurn(Side),

    #[error("{mv} is not a legal move for {side}")]
    IllegalMove { mv: Move, side: Side },
}

/// A game between the human and the engine.
pub struct Game {
    config: Config,
    board: Board,
    turn: Turn,
    /// Snapshots taken at the start of each human turn; the top one is the
    /// current position while the human is to move. A snapshot is only taken
    /// once the human is awaited, so the human has a legal move in each.
    history: Vec<Board>,
    evaluator: Evaluator,
    last_score: Option<f64>,
}

impl Game {
    /// Start a game from the standard opening. Out-of-range settings are
    /// clamped first.
    pub fn new(config: Config) -> Self {
        let config = config.validated();
        let board = Board::new(config.size);
        Self::from_board(config, board)
    }

    /// Start a game from an arbitrary position, with `config.first` to move.
    pub fn from_board(config: Config, board: Board) -> Self {
        let config = config.validated();
        let evaluator = Evaluator::new(&config);
        let first = config.first;
        let mut game = Self {
            config,
            board,
            turn: Turn::Ended,
            history: Vec::new(),
            evaluator,
            last_score: None,
        };
        game.settle(first);
        game
    }

    /// New game on a fresh board with the human and computer sides swapped,
    /// so whoever moved second last time moves first now.
    pub fn rematch(&mut self) {
        self.config.human = self.config.human.opponent();
        self.board = Board::new(self.config.size);
        self.history.clear();
        self.last_score = None;
        self.settle(self.config.first);
        info!("new game: human plays {}", self.config.human);
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn turn(&self) -> Turn {
        self.turn
    }

    #[inline]
    pub fn human(&self) -> Side {
        self.config.human
    }

    #[inline]
    pub fn computer(&self) -> Side {
        self.config.computer()
    }

    pub fn is_human_turn(&self) -> bool {
        self.turn == Turn::Awaiting(self.human())
    }

    pub fn is_computer_turn(&self) -> bool {
        self.turn == Turn::Awaiting(self.computer())
    }

    pub fn is_over(&self) -> bool {
        self.turn == Turn::Ended
    }

    /// Final result, once the game has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        self.is_over().then(|| rules::winner(&self.board))
    }

    /// Pieces on the board for `side`.
    pub fn score(&self, side: Side) -> usize {
        rules::piece_count(&self.board, side)
    }

    /// Win estimate of the computer's most recent move.
    pub fn last_score(&self) -> Option<f64> {
        self.last_score
    }

    /// Legal moves for the side to move (empty once the game is over).
    pub fn legal_moves(&self) -> Vec<Move> {
        match self.turn {
            Turn::Awaiting(side) => rules::legal_moves(&self.board, side),
            Turn::Ended => Vec::new(),
        }
    }

    /// Number of snapshots available to undo into.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Play a human move. The move must be one of [`Game::legal_moves`].
    pub fn play_human(&mut self, mv: Move) -> Result<(), GameError> {
        let human = self.human();
        self.expect_turn(human)?;
        if !rules::is_legal(&self.board, mv, human) {
            return Err(GameError::IllegalMove { mv, side: human });
        }
        let flipped = rules::apply_move(&mut self.board, mv, human);
        debug!("{human} plays {mv}, flipping {flipped}");
        self.settle(human.opponent());
        Ok(())
    }

    /// Evaluate every computer move and play the best one.
    pub fn play_computer(&mut self) -> Result<ScoredMove, GameError> {
        let computer = self.computer();
        self.expect_turn(computer)?;
        // Awaiting a side implies it has a legal move.
        let best = self
            .evaluator
            .best_move(&self.board, computer)
            .ok_or(GameError::GameOver)?;
        rules::apply_move(&mut self.board, best.mv, computer);
        info!(
            "{computer} plays {} (estimated {:.1}% win)",
            best.mv,
            best.score * 100.0
        );
        self.last_score = Some(best.score);
        self.settle(computer.opponent());
        Ok(best)
    }

    /// Take back to the previous position where the human was to move.
    ///
    /// Only possible while the human is to move. The snapshot of the current
    /// position is dropped and the one before it restored. The first snapshot
    /// of the game is never dropped. Returns `false` if there was nothing to
    /// undo.
    pub fn undo(&mut self) -> bool {
        if !self.is_human_turn() || self.history.len() <= 1 {
            return false;
        }
        self.history.pop();
        if let Some(snapshot) = self.history.last() {
            self.board = snapshot.clone();
        }
        self.turn = Turn::Awaiting(self.human());
        info!("undo: back to move with {} snapshots left", self.history.len());
        true
    }

    fn expect_turn(&self, side: Side) -> Result<(), GameError> {
        match self.turn {
            Turn::Ended => Err(GameError::GameOver),
            Turn::Awaiting(s) if s == side => Ok(()),
            Turn::Awaiting(_) => Err(GameError::NotYourTurn(side)),
        }
    }

    /// Hand the turn to `side`, skipping it if it must pass, and end the game
    /// if neither side can move. Snapshots the board when the human is next.
    fn settle(&mut self, side: Side) {
        self.turn = if rules::has_legal_move(&self.board, side) {
            Turn::Awaiting(side)
        } else if rules::has_legal_move(&self.board, side.opponent()) {
            debug!("{side} has no legal move and passes");
            Turn::Awaiting(side.opponent())
        } else {
            Turn::Ended
        };

        match self.turn {
            Turn::Awaiting(s) if s == self.human() => self.history.push(self.board.clone()),
            Turn::Awaiting(_) => {}
            Turn::Ended => info!(
                "game over: Dark {} - Light {}, {}",
                self.score(Side::Dark),
                self.score(Side::Light),
                rules::winner(&self.board)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> Config {
        Config {
            simulations: 20,
            threads: 2,
            seed: Some(11),
            ..Config::default()
        }
    }

    #[test]
    fn test_new_game_awaits_first_side() {
        let game = Game::new(fast_config());
        assert_eq!(game.turn(), Turn::Awaiting(Side::Dark));
        assert!(game.is_human_turn());
        assert_eq!(game.history_len(), 1);
        assert_eq!(game.legal_moves().len(), 4);
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn test_computer_first_has_no_snapshot() {
        let config = Config {
            human: Side::Light,
            ..fast_config()
        };
        let mut game = Game::new(config);
        assert!(game.is_computer_turn());
        assert_eq!(game.history_len(), 0);
        game.play_computer().unwrap();
        assert!(game.is_human_turn());
        assert_eq!(game.history_len(), 1);
    }

    #[test]
    fn test_turn_errors() {
        let mut game = Game::new(fast_config());
        assert_eq!(game.play_computer(), Err(GameError::NotYourTurn(Side::Light)));
        assert_eq!(
            game.play_human(Move::new(0, 0)),
            Err(GameError::IllegalMove {
                mv: Move::new(0, 0),
                side: Side::Dark
            })
        );
        assert_eq!(
            game.play_human(Move::new(20, 20)),
            Err(GameError::IllegalMove {
                mv: Move::new(20, 20),
                side: Side::Dark
            })
        );
        game.play_human(Move::new(2, 3)).unwrap();
        assert_eq!(
            game.play_human(Move::new(2, 2)),
            Err(GameError::NotYourTurn(Side::Dark))
        );
    }

    #[test]
    fn test_undo_on_first_snapshot_is_noop() {
        let mut game = Game::new(fast_config());
        assert!(!game.undo());
        assert_eq!(game.board(), &Board::new(8));
        assert_eq!(game.history_len(), 1);
    }

    #[test]
    fn test_pass_hands_turn_back() {
        // Light is due to start but has no move, so Dark is awaited instead.
        let board = Board::from_rows(&["XO..", "....", "....", "...."]).unwrap();
        let config = Config {
            first: Side::Light,
            ..fast_config()
        };
        let game = Game::from_board(config, board);
        assert!(!rules::has_legal_move(game.board(), Side::Light));
        assert_eq!(game.turn(), Turn::Awaiting(Side::Dark));
        assert_eq!(game.legal_moves(), vec![Move::new(0, 2)]);
        assert_eq!(game.history_len(), 1);
    }

    #[test]
    fn test_computer_pass_returns_turn_to_human() {
        let board = Board::from_rows(&["XO..", "....", "....", "XO.."]).unwrap();
        let mut game = Game::from_board(fast_config(), board);
        assert!(game.is_human_turn());
        assert_eq!(game.history_len(), 1);

        // After c1 the computer has nothing to capture and must pass.
        game.play_human(Move::new(0, 2)).unwrap();
        assert!(!rules::has_legal_move(game.board(), Side::Light));
        assert!(game.is_human_turn());
        assert_eq!(game.history_len(), 2);
        assert_eq!(game.legal_moves(), vec![Move::new(3, 2)]);
        assert_eq!(game.play_computer(), Err(GameError::NotYourTurn(Side::Light)));

        assert!(game.undo());
        assert_eq!(game.legal_moves(), vec![Move::new(0, 2), Move::new(3, 2)]);

        game.play_human(Move::new(0, 2)).unwrap();
        game.play_human(Move::new(3, 2)).unwrap();
        assert!(game.is_over());
        assert_eq!(game.score(Side::Light), 0);
        assert_eq!(game.history_len(), 2);
    }

    #[test]
    fn test_invalid_config_is_clamped() {
        let game = Game::new(Config {
            size: 7,
            simulations: 0,
            threads: 0,
            ..fast_config()
        });
        assert_eq!(game.board().size(), 8);
        assert_eq!(game.config().size, 8);
        assert_eq!(game.config().simulations, 1);
        assert_eq!(game.config().threads, 1);
        assert_eq!(game.legal_moves().len(), 4);
    }

    #[test]
    fn test_blocked_board_ends_immediately() {
        let board = Board::from_rows(&["....", ".XX.", ".XX.", "...."]).unwrap();
        let mut game = Game::from_board(fast_config(), board);
        assert!(game.is_over());
        assert_eq!(game.outcome(), Some(Outcome::Win(Side::Dark)));
        assert_eq!(game.history_len(), 0);
        assert_eq!(game.play_human(Move::new(0, 0)), Err(GameError::GameOver));
        assert_eq!(game.play_computer(), Err(GameError::GameOver));
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_rematch_swaps_sides() {
        let mut game = Game::new(fast_config());
        game.play_human(Move::new(2, 3)).unwrap();
        game.rematch();
        assert_eq!(game.human(), Side::Light);
        assert_eq!(game.board(), &Board::new(8));
        assert!(game.is_computer_turn());
        assert_eq!(game.history_len(), 0);
        assert_eq!(game.last_score(), None);
    }
}
