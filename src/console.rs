//! Line-oriented text front end.
//!
//! Reads one command per line and answers on the output stream. After every
//! human action the engine plays its own turns until the human is to move
//! again or the game is over, then the board is redrawn.
//!
//! ## Supported Commands
//!
//! - `<coord>` or `play <coord>` - Play a move, e.g. `d3`
//! - `undo` - Take back to your previous move
//! - `show` - Redraw the board
//! - `moves` - List your legal moves
//! - `new` - Start a new game with sides swapped
//! - `help` - List commands
//! - `quit` - Exit

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::board::Move;
use crate::game::{Game, GameError};

const HELP: &str = "\
commands:
  <coord> | play <coord>   play a move, e.g. d3
  undo                     take back to your previous move
  show                     redraw the board
  moves                    list your legal moves
  new                      start a new game with sides swapped
  help                     show this text
  quit                     exit";

/// Interactive session around a [`Game`].
pub struct Console {
    game: Game,
}

impl Console {
    pub fn new(game: Game) -> Self {
        Self { game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        self.reply(&mut out)?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            if success {
                if !message.is_empty() {
                    writeln!(out, "{message}")?;
                }
            } else {
                writeln!(out, "? {message}")?;
            }
            out.flush()?;

            if command == "quit" {
                break;
            }
            let changed = matches!(command.as_str(), "play" | "undo" | "new") || is_coord(&command);
            if success && changed {
                self.reply(&mut out)?;
            }
        }
        Ok(())
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "play" => match args.first() {
                Some(coord) => self.play(coord),
                None => (false, "missing coordinate".to_string()),
            },

            "undo" => {
                if self.game.undo() {
                    (true, "move taken back".to_string())
                } else {
                    (false, "nothing to undo".to_string())
                }
            }

            "show" => (true, self.render()),

            "moves" => {
                if !self.game.is_human_turn() {
                    return (false, "it is not your turn".to_string());
                }
                let moves: Vec<String> =
                    self.game.legal_moves().iter().map(Move::to_string).collect();
                (true, moves.join(" "))
            }

            "new" => {
                self.game.rematch();
                (true, format!("new game, you play {}", self.game.human()))
            }

            "help" => (true, HELP.to_string()),

            "quit" => (true, String::new()),

            other if is_coord(other) => self.play(other),

            _ => (false, format!("unknown command: {command} (try 'help')")),
        }
    }

    fn play(&mut self, coord: &str) -> (bool, String) {
        let mv: Move = match coord.parse() {
            Ok(mv) => mv,
            Err(err) => return (false, err.to_string()),
        };
        match self.game.play_human(mv) {
            Ok(()) => (true, format!("you play {mv}")),
            Err(err @ GameError::GameOver) => (false, format!("{err}, type 'new' to play again")),
            Err(err) => (false, err.to_string()),
        }
    }

    /// Let the engine move until it is the human's turn or the game ends,
    /// then redraw.
    fn reply<W: Write>(&mut self, out: &mut W) -> Result<()> {
        while self.game.is_computer_turn() {
            writeln!(out, "thinking...")?;
            out.flush()?;
            let best = self.game.play_computer()?;
            writeln!(out, "computer plays {}", best.mv)?;
        }
        writeln!(out, "{}", self.render())?;
        out.flush()?;
        Ok(())
    }

    fn render(&self) -> String {
        let game = &self.game;
        let human = game.human();
        let computer = game.computer();
        let mut text = game.board().to_string();

        text.push_str(&format!(
            "you ({human}, {}) {} - {} computer ({computer}, {})\n",
            human.symbol(),
            game.score(human),
            game.score(computer),
            computer.symbol(),
        ));
        if game.config().show_score {
            if let Some(score) = game.last_score() {
                text.push_str(&format!("computer estimate: {:.1}%\n", score * 100.0));
            }
        }
        match game.outcome() {
            Some(outcome) => text.push_str(&format!("game over: {outcome}, type 'new' or 'quit'")),
            None => text.push_str("your move"),
        }
        text
    }
}

fn is_coord(s: &str) -> bool {
    s.parse::<Move>().is_ok()
}
