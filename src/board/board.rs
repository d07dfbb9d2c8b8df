//! Board structure with side-to-move tracking

use std::fmt;

use super::bitboard::Bitboard;
use super::{Disc, Pos, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::{Error, Result};

/// Othello position: disc sets, board side and the side to move
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Black discs bitboard
    pub black: Bitboard,
    /// White discs bitboard
    pub white: Bitboard,
    size: u8,
    side_to_move: Disc,
}

impl Board {
    /// Standard starting position: the central 2x2 block with White on the
    /// main diagonal, Black to move.
    pub fn new(size: usize) -> Result<Self> {
        let mut board = Self::empty(size)?;
        #[allow(clippy::cast_possible_truncation)]
        let mid = (size / 2) as u8;
        board.place(Pos::new(mid - 1, mid - 1), Disc::White);
        board.place(Pos::new(mid, mid), Disc::White);
        board.place(Pos::new(mid - 1, mid), Disc::Black);
        board.place(Pos::new(mid, mid - 1), Disc::Black);
        Ok(board)
    }

    /// Board with no discs, Black to move
    pub fn empty(size: usize) -> Result<Self> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) || size % 2 != 0 {
            return Err(Error::InvalidBoardSize { size });
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
            size: size as u8,
            side_to_move: Disc::Black,
        })
    }

    /// Parse a textual grid.
    ///
    /// Rows are whitespace-separated lines of `.`/`-` (empty), `B`/`X`
    /// (black) and `W`/`O` (white); characters inside a row may be separated
    /// by spaces. An optional final line names the side to move.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows: Vec<Vec<Disc>> = Vec::new();
        let mut side = Disc::Black;

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if line.starts_with('#') {
                continue;
            }
            if let Ok(disc) = line.parse::<Disc>() {
                if line.len() > 1 {
                    side = disc;
                    continue;
                }
            }
            let row = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| match c {
                    '.' | '-' => Ok(Disc::Empty),
                    'B' | 'b' | 'X' | 'x' => Ok(Disc::Black),
                    'W' | 'w' | 'O' | 'o' => Ok(Disc::White),
                    other => Err(Error::parse(format!("unexpected character '{other}'"))),
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }

        let size = rows.len();
        let mut board = Self::empty(size)?;
        for (r, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(Error::parse(format!(
                    "row {r} has {} cells, expected {size}",
                    row.len()
                )));
            }
            for (c, &disc) in row.iter().enumerate() {
                #[allow(clippy::cast_possible_truncation)]
                board.place(Pos::new(r as u8, c as u8), disc);
            }
        }
        board.side_to_move = side;
        Ok(board)
    }

    /// Board side length
    #[inline]
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Number of cells on the board
    #[inline]
    pub fn capacity(&self) -> u32 {
        u32::from(self.size) * u32::from(self.size)
    }

    #[inline]
    pub fn side_to_move(&self) -> Disc {
        self.side_to_move
    }

    #[inline]
    pub fn set_side_to_move(&mut self, side: Disc) {
        debug_assert!(side != Disc::Empty);
        self.side_to_move = side;
    }

    /// Hand the move to the other side without placing a disc
    #[inline]
    pub fn toggle_side(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// Checked coordinate conversion
    pub fn pos(&self, row: usize, col: usize) -> Result<Pos> {
        if row < self.size() && col < self.size() {
            #[allow(clippy::cast_possible_truncation)]
            Ok(Pos::new(row as u8, col as u8))
        } else {
            Err(Error::OutOfBounds {
                row,
                col,
                size: self.size(),
            })
        }
    }

    /// Get disc at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Disc {
        if self.black.get(pos) {
            Disc::Black
        } else if self.white.get(pos) {
            Disc::White
        } else {
            Disc::Empty
        }
    }

    /// Check if position is empty
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Put a disc on a cell, replacing whatever was there (no flipping).
    /// Use `rules::make_move` for game moves.
    #[inline]
    pub fn place(&mut self, pos: Pos, disc: Disc) {
        self.remove(pos);
        match disc {
            Disc::Black => self.black.set(pos),
            Disc::White => self.white.set(pos),
            Disc::Empty => {}
        }
    }

    /// Remove a disc
    #[inline]
    pub fn remove(&mut self, pos: Pos) {
        self.black.clear(pos);
        self.white.clear(pos);
    }

    /// Get bitboard for a color (returns None for Empty)
    #[inline]
    pub fn discs(&self, disc: Disc) -> Option<&Bitboard> {
        match disc {
            Disc::Black => Some(&self.black),
            Disc::White => Some(&self.white),
            Disc::Empty => None,
        }
    }

    /// Get mutable bitboard for a color (returns None for Empty)
    #[inline]
    pub fn discs_mut(&mut self, disc: Disc) -> Option<&mut Bitboard> {
        match disc {
            Disc::Black => Some(&mut self.black),
            Disc::White => Some(&mut self.white),
            Disc::Empty => None,
        }
    }

    /// Number of discs of one color
    #[inline]
    pub fn count(&self, disc: Disc) -> u32 {
        self.discs(disc).map_or(0, Bitboard::count)
    }

    /// Total discs on board
    #[inline]
    pub fn disc_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    /// Number of empty cells
    #[inline]
    pub fn empty_count(&self) -> u32 {
        self.capacity() - self.disc_count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Pos> {
        let size = self.size;
        (0..size).flat_map(move |r| (0..size).map(move |c| Pos::new(r, c)))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size {
            let row: Vec<&str> = (0..self.size)
                .map(|c| match self.get(Pos::new(r, c)) {
                    Disc::Black => "B",
                    Disc::White => "W",
                    Disc::Empty => ".",
                })
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        write!(f, "{}", self.side_to_move.name())
    }
}
