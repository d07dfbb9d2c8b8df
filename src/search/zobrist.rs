//! Zobrist hashing for position identification
//!
//! Keys cover the disc on every cell, the side to move and a search context
//! (board size, phase and whether exact endgame solving is active). Positions
//! scored under different contexts therefore never share a table slot.
//!
//! # Example
//!
//! ```
//! use othello::board::{Board, Pos};
//! use othello::rules::make_move;
//! use othello::search::ZobristTable;
//!
//! let zt = ZobristTable::new();
//! let mut board = Board::new(8).unwrap();
//! let before = zt.hash(&board);
//!
//! let info = make_move(&mut board, Pos::new(2, 3));
//!
//! // Incremental update is equivalent to full recomputation
//! assert_eq!(zt.update_move(before, &info), zt.hash(&board));
//! ```

use crate::board::{Board, Disc, Pos, MAX_BOARD_SIZE, TOTAL_CELLS};
use crate::rules::FlipInfo;

/// Zobrist hash table for position hashing.
pub struct ZobristTable {
    /// Random values for black discs at each position
    black: [u64; TOTAL_CELLS],
    /// Random values for white discs at each position
    white: [u64; TOTAL_CELLS],
    /// XORed when White is to move
    white_to_move: u64,
    /// Context keys: one per board side
    sizes: [u64; MAX_BOARD_SIZE + 1],
    /// Context keys: one per phase
    phases: [u64; 3],
    /// Context key for exact endgame solving
    exact: u64,
}

impl ZobristTable {
    /// Create a new Zobrist table with deterministic random values.
    ///
    /// Uses a linear congruential generator (LCG) with a fixed seed
    /// so hashes are reproducible across runs.
    #[must_use]
    pub fn new() -> Self {
        // Constants from Knuth's MMIX LCG; the high half is mixed down
        // because the low bits of an LCG have short periods.
        let mut seed: u64 = 0x0DDB_A11C_0FFE_E123;
        let mut next_rand = || {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            seed ^ (seed >> 29)
        };

        let mut black = [0u64; TOTAL_CELLS];
        let mut white = [0u64; TOTAL_CELLS];
        for i in 0..TOTAL_CELLS {
            black[i] = next_rand();
            white[i] = next_rand();
        }

        let white_to_move = next_rand();
        let mut sizes = [0u64; MAX_BOARD_SIZE + 1];
        for key in &mut sizes {
            *key = next_rand();
        }
        let phases = [next_rand(), next_rand(), next_rand()];

        Self {
            black,
            white,
            white_to_move,
            sizes,
            phases,
            exact: next_rand(),
        }
    }

    #[inline]
    fn disc_key(&self, pos: Pos, disc: Disc) -> u64 {
        let idx = pos.to_index();
        match disc {
            Disc::Black => self.black[idx],
            Disc::White => self.white[idx],
            Disc::Empty => 0,
        }
    }

    /// Compute the full hash for a board position, including the side to move.
    #[must_use]
    pub fn hash(&self, board: &Board) -> u64 {
        let mut h = 0u64;

        for pos in board.black.iter_ones() {
            h ^= self.black[pos.to_index()];
        }
        for pos in board.white.iter_ones() {
            h ^= self.white[pos.to_index()];
        }
        if board.side_to_move() == Disc::White {
            h ^= self.white_to_move;
        }

        h
    }

    /// Key for a search context. XOR it into position hashes so that values
    /// computed under different evaluation settings stay apart.
    #[must_use]
    pub fn context(&self, size: usize, phase_index: usize, exact_solve: bool) -> u64 {
        let mut key = self.sizes[size.min(MAX_BOARD_SIZE)] ^ self.phases[phase_index % 3];
        if exact_solve {
            key ^= self.exact;
        }
        key
    }

    /// Incrementally update the hash after [`crate::rules::make_move`].
    ///
    /// The placed disc is added, each flipped disc changes color, and the
    /// side to move toggles. Applying the same update again undoes it.
    #[inline]
    #[must_use]
    pub fn update_move(&self, hash: u64, info: &FlipInfo) -> u64 {
        let mover = info.color;
        let mut h = hash ^ self.disc_key(info.pos, mover) ^ self.white_to_move;
        for pos in info.flipped.iter_ones() {
            h ^= self.disc_key(pos, mover) ^ self.disc_key(pos, mover.opponent());
        }
        h
    }

    /// Toggle the side-to-move component of the hash (a pass).
    #[inline]
    #[must_use]
    pub fn toggle_side(&self, hash: u64) -> u64 {
        hash ^ self.white_to_move
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}
