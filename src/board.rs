//! Othello board representation.
//!
//! The board is a square grid stored row-major in a flat `Vec`. A cell is
//! either empty (`None`) or holds a piece of one [`Side`]. Cells change only
//! through [`crate::rules::apply_move`]; everything else gets read-only access.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{MAX_SIZE, MIN_SIZE};

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Dark,
    Light,
}

impl Side {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Dark => Side::Light,
            Side::Light => Side::Dark,
        }
    }

    /// Character used for this side's pieces in text diagrams.
    pub fn symbol(self) -> char {
        match self {
            Side::Dark => 'X',
            Side::Light => 'O',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Dark => write!(f, "Dark"),
            Side::Light => write!(f, "Light"),
        }
    }
}

/// Errors from building boards or reading coordinates from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid board size {0}: must be an even number from 4 to 26")]
    InvalidSize(usize),

    #[error("row {row} has {len} cells, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },

    #[error("invalid cell character {0:?}")]
    InvalidCell(char),

    #[error("invalid coordinate {0:?}")]
    InvalidCoordinate(String),
}

/// A target cell, zero-based. Written as column letter plus 1-based row, e.g. `d3`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = (b'a' + self.col as u8) as char;
        write!(f, "{letter}{}", self.row + 1)
    }
}

impl FromStr for Move {
    type Err = BoardError;

    /// Parse `d3`-style coordinates (case-insensitive). Bounds are not checked
    /// here; a move outside the board is simply never legal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BoardError::InvalidCoordinate(s.to_string());
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?.to_ascii_lowercase();
        if !letter.is_ascii_lowercase() {
            return Err(invalid());
        }
        let row: usize = chars.as_str().parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        Ok(Move::new(row - 1, (letter as u8 - b'a') as usize))
    }
}

/// An N x N Othello board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Side>>,
}

impl Board {
    /// Create a board in the standard opening position: Light on the main
    /// diagonal of the center square, Dark on the anti-diagonal.
    ///
    /// # Panics
    /// If `size` is odd or outside `MIN_SIZE..=MAX_SIZE`. Sizes coming from
    /// user input go through [`crate::config::Config::validated`] first.
    pub fn new(size: usize) -> Self {
        assert!(is_valid_size(size), "{}", BoardError::InvalidSize(size));
        let mut board = Self {
            size,
            cells: vec![None; size * size],
        };
        let mid = size / 2;
        board.set(mid - 1, mid - 1, Side::Light);
        board.set(mid, mid, Side::Light);
        board.set(mid - 1, mid, Side::Dark);
        board.set(mid, mid - 1, Side::Dark);
        board
    }

    /// Build a board from a text diagram, one string per row:
    /// `X` = Dark, `O` = Light, `.` = empty. Whitespace inside a row is ignored.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let size = rows.len();
        if !is_valid_size(size) {
            return Err(BoardError::InvalidSize(size));
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, line) in rows.iter().enumerate() {
            let before = cells.len();
            for ch in line.chars().filter(|c| !c.is_whitespace()) {
                cells.push(match ch {
                    'X' | 'x' => Some(Side::Dark),
                    'O' | 'o' => Some(Side::Light),
                    '.' => None,
                    other => return Err(BoardError::InvalidCell(other)),
                });
            }
            let len = cells.len() - before;
            if len != size {
                return Err(BoardError::RaggedRow {
                    row,
                    len,
                    expected: size,
                });
            }
        }
        Ok(Self { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Cell state at (row, col); `None` for an empty cell or a point off the board.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Side> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells[self.idx(row, col)]
    }

    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        mv.row < self.size && mv.col < self.size
    }

    #[inline]
    pub fn is_empty_at(&self, mv: Move) -> bool {
        self.contains(mv) && self.cells[self.idx(mv.row, mv.col)].is_none()
    }

    /// Step from `mv` by `k` cells along `dir`, if still on the board.
    #[inline]
    pub(crate) fn offset(&self, mv: Move, dir: (isize, isize), k: usize) -> Option<Move> {
        let row = mv.row as isize + dir.0 * k as isize;
        let col = mv.col as isize + dir.1 * k as isize;
        let n = self.size as isize;
        if (0..n).contains(&row) && (0..n).contains(&col) {
            Some(Move::new(row as usize, col as usize))
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, side: Side) {
        let i = self.idx(row, col);
        self.cells[i] = Some(side);
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub(crate) fn cells(&self) -> &[Option<Side>] {
        &self.cells
    }
}

fn is_valid_size(size: usize) -> bool {
    size % 2 == 0 && (MIN_SIZE..=MAX_SIZE).contains(&size)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.size {
            write!(f, "{} ", (b'a' + col as u8) as char)?;
        }
        writeln!(f)?;
        for row in 0..self.size {
            write!(f, "{:>2} ", row + 1)?;
            for col in 0..self.size {
                let ch = self.get(row, col).map_or('.', Side::symbol);
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
