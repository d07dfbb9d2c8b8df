//! Game-end detection and scoring

use super::moves::has_legal_move;
use crate::board::{Board, Disc};

/// Disc counts as `(black, white)`
#[inline]
pub fn piece_counts(board: &Board) -> (u32, u32) {
    (board.count(Disc::Black), board.count(Disc::White))
}

/// Disc difference from `color`'s point of view
#[inline]
pub fn disc_margin(board: &Board, color: Disc) -> i32 {
    #[allow(clippy::cast_possible_wrap)]
    let margin = board.count(color) as i32 - board.count(color.opponent()) as i32;
    margin
}

/// The game is over when the board is full or neither side can move
pub fn is_terminal(board: &Board) -> bool {
    board.is_full()
        || (!has_legal_move(board, Disc::Black) && !has_legal_move(board, Disc::White))
}

/// Result of a finished game.
///
/// `None` while the game is still running, `Some(Disc::Empty)` for a draw.
pub fn winner(board: &Board) -> Option<Disc> {
    if !is_terminal(board) {
        return None;
    }
    let (black, white) = piece_counts(board);
    Some(match black.cmp(&white) {
        std::cmp::Ordering::Greater => Disc::Black,
        std::cmp::Ordering::Less => Disc::White,
        std::cmp::Ordering::Equal => Disc::Empty,
    })
}
