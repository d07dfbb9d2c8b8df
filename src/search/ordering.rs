//! Move ordering for alpha-beta
//!
//! Moves are sorted by tier, then by static positional value, then
//! (optionally) by history score, then by board index. Every key is
//! deterministic, so the same position always yields the same order.

use std::cmp::Reverse;

use crate::board::{adjacent_corner, classify, Board, Disc, Pos, SquareKind, TOTAL_CELLS};
use crate::eval::PositionTable;

/// Ordering tier of a move, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveTier {
    Corner,
    /// Edge cell not next to an empty corner
    SafeEdge,
    Ordinary,
    /// X- or C-square next to an empty corner
    Risky,
}

impl MoveTier {
    /// Tier of `pos` on `board`
    pub fn of(board: &Board, pos: Pos) -> Self {
        let size = board.size();
        let corner_claimed = || adjacent_corner(pos, size).is_some_and(|c| !board.is_empty(c));
        match classify(pos, size) {
            SquareKind::Corner => MoveTier::Corner,
            SquareKind::Edge => MoveTier::SafeEdge,
            SquareKind::CSquare if corner_claimed() => MoveTier::SafeEdge,
            SquareKind::XSquare if corner_claimed() => MoveTier::Ordinary,
            SquareKind::CSquare | SquareKind::XSquare => MoveTier::Risky,
            SquareKind::Interior => MoveTier::Ordinary,
        }
    }
}

/// Move orderer with a per-color history table.
///
/// History counts moves that produced beta cutoffs, weighted by the
/// square of the remaining depth.
#[derive(Debug, Clone)]
pub struct MoveOrderer {
    history: [[u32; TOTAL_CELLS]; 2],
}

impl MoveOrderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: [[0; TOTAL_CELLS]; 2],
        }
    }

    /// Sort moves using tiers and positional values only
    pub fn order_static(board: &Board, moves: &mut [Pos], table: &PositionTable) {
        moves.sort_by_key(|&pos| (MoveTier::of(board, pos), Reverse(table.get(pos)), pos));
    }

    /// Sort moves for the side to move, breaking ties with history
    pub fn order(&self, board: &Board, moves: &mut [Pos], table: &PositionTable) {
        let hist = &self.history[board.side_to_move().index()];
        moves.sort_by_key(|&pos| {
            (
                MoveTier::of(board, pos),
                Reverse(table.get(pos)),
                Reverse(hist[pos.to_index()]),
                pos,
            )
        });
    }

    /// Credit a move that caused a cutoff at `depth` plies remaining
    pub fn record_cutoff(&mut self, color: Disc, pos: Pos, depth: i8) {
        let d = u32::from(depth.max(1).unsigned_abs());
        let slot = &mut self.history[color.index()][pos.to_index()];
        *slot = slot.saturating_add(d * d);
    }

    #[inline]
    pub fn history_score(&self, color: Disc, pos: Pos) -> u32 {
        self.history[color.index()][pos.to_index()]
    }

    pub fn clear(&mut self) {
        self.history = [[0; TOTAL_CELLS]; 2];
    }
}

impl Default for MoveOrderer {
    fn default() -> Self {
        Self::new()
    }
}
