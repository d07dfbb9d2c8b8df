//! Board representation for Othello

pub mod bitboard;
pub mod board;
pub mod squares;


// Re-exports
pub use bitboard::Bitboard;
pub use board::Board;
pub use squares::{SquareKind, adjacent_corner, classify, corners, is_edge};

/// Smallest supported board side
pub const MIN_BOARD_SIZE: usize = 4;
/// Largest supported board side (bitboard stride)
pub const MAX_BOARD_SIZE: usize = 16;
/// Number of addressable cells (16 x 16)
pub const TOTAL_CELLS: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE; // 256

/// The eight neighbour directions used by flipping, frontier and mobility scans
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Disc colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disc {
    Empty,
    Black,
    White,
}

impl Disc {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Disc {
        match self {
            Disc::Black => Disc::White,
            Disc::White => Disc::Black,
            Disc::Empty => Disc::Empty,
        }
    }

    /// Index into per-color tables (Black = 0, White = 1)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Disc::White => 1,
            _ => 0,
        }
    }

    /// Lowercase name, as used by the command line and board files
    pub fn name(self) -> &'static str {
        match self {
            Disc::Black => "black",
            Disc::White => "white",
            Disc::Empty => "empty",
        }
    }
}

impl std::str::FromStr for Disc {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "b" | "x" => Ok(Disc::Black),
            "white" | "w" | "o" => Ok(Disc::White),
            other => Err(crate::Error::parse(format!("unknown side '{other}'"))),
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!((row as usize) < MAX_BOARD_SIZE && (col as usize) < MAX_BOARD_SIZE);
        Self { row, col }
    }

    /// Bitboard index; the stride is always `MAX_BOARD_SIZE` so the index
    /// does not depend on the board side.
    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * MAX_BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / MAX_BOARD_SIZE) as u8,
            col: (idx % MAX_BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(row: i32, col: i32, size: usize) -> bool {
        row >= 0 && row < size as i32 && col >= 0 && col < size as i32
    }

    /// Neighbour in direction `(dr, dc)`, if it lies on a `size` board
    #[inline]
    pub fn offset(self, dr: i32, dc: i32, size: usize) -> Option<Pos> {
        let r = i32::from(self.row) + dr;
        let c = i32::from(self.col) + dc;
        if Self::is_valid(r, c, size) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some(Pos::new(r as u8, c as u8))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}
