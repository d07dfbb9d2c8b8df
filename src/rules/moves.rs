//! Move generation and disc flipping
//!
//! A move at `pos` is legal for `color` when the cell is empty and at least
//! one straight line from it runs over one or more opponent discs and ends on
//! a disc of `color`. Every such bracketed run is flipped.

use crate::board::{Bitboard, Board, Disc, Pos, DIRECTIONS};
use crate::error::{Error, Result};

/// Undo record for an applied move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipInfo {
    /// Cell the disc was placed on
    pub pos: Pos,
    /// Color that moved
    pub color: Disc,
    /// Opponent discs turned over by the move
    pub flipped: Bitboard,
}

impl FlipInfo {
    /// Number of flipped discs
    #[inline]
    pub fn count(&self) -> u32 {
        self.flipped.count()
    }
}

/// Discs that would be flipped if `color` played at `pos`.
///
/// Returns an empty set for occupied cells and for illegal moves.
pub fn flips_for(board: &Board, pos: Pos, color: Disc) -> Bitboard {
    let mut flips = Bitboard::new();
    if !board.is_empty(pos) || color == Disc::Empty {
        return flips;
    }

    let size = board.size();
    let opponent = color.opponent();
    let mut run: Vec<Pos> = Vec::with_capacity(size);

    for &(dr, dc) in &DIRECTIONS {
        run.clear();
        let mut cursor = pos.offset(dr, dc, size);
        while let Some(p) = cursor {
            match board.get(p) {
                d if d == opponent => run.push(p),
                d if d == color => {
                    for &f in &run {
                        flips.set(f);
                    }
                    break;
                }
                _ => break,
            }
            cursor = p.offset(dr, dc, size);
        }
    }

    flips
}

/// Check if `color` may play at `pos`
pub fn is_legal(board: &Board, pos: Pos, color: Disc) -> bool {
    if !board.is_empty(pos) || color == Disc::Empty {
        return false;
    }

    let size = board.size();
    let opponent = color.opponent();
    DIRECTIONS.iter().any(|&(dr, dc)| {
        let mut seen_opponent = false;
        let mut cursor = pos.offset(dr, dc, size);
        while let Some(p) = cursor {
            match board.get(p) {
                d if d == opponent => seen_opponent = true,
                d if d == color => return seen_opponent,
                _ => return false,
            }
            cursor = p.offset(dr, dc, size);
        }
        false
    })
}

/// Legal moves for `color`, in row-major order
pub fn legal_moves_for(board: &Board, color: Disc) -> Vec<Pos> {
    board
        .cells()
        .filter(|&pos| is_legal(board, pos, color))
        .collect()
}

/// Legal moves for the side to move, in row-major order
pub fn legal_moves(board: &Board) -> Vec<Pos> {
    legal_moves_for(board, board.side_to_move())
}

/// Whether `color` has at least one legal move
pub fn has_legal_move(board: &Board, color: Disc) -> bool {
    board.cells().any(|pos| is_legal(board, pos, color))
}

/// Number of legal moves for `color`
pub fn mobility(board: &Board, color: Disc) -> u32 {
    #[allow(clippy::cast_possible_truncation)]
    let n = board
        .cells()
        .filter(|&pos| is_legal(board, pos, color))
        .count() as u32;
    n
}

/// Apply a move for the side to move without validation.
///
/// The side to move is toggled. The returned record restores the position
/// through [`unmake_move`].
pub fn make_move(board: &mut Board, pos: Pos) -> FlipInfo {
    let color = board.side_to_move();
    let flipped = flips_for(board, pos, color);
    debug_assert!(!flipped.is_empty(), "make_move called with an illegal move");

    if let Some(opp) = board.discs_mut(color.opponent()) {
        opp.remove_all(&flipped);
    }
    if let Some(own) = board.discs_mut(color) {
        own.union_with(&flipped);
        own.set(pos);
    }
    board.toggle_side();

    FlipInfo {
        pos,
        color,
        flipped,
    }
}

/// Revert a move applied by [`make_move`]
pub fn unmake_move(board: &mut Board, info: &FlipInfo) {
    if let Some(own) = board.discs_mut(info.color) {
        own.remove_all(&info.flipped);
        own.clear(info.pos);
    }
    if let Some(opp) = board.discs_mut(info.color.opponent()) {
        opp.union_with(&info.flipped);
    }
    board.set_side_to_move(info.color);
}

/// Checked move application on a copy of the position.
///
/// Returns the resulting position and the flipped cells, or
/// [`Error::IllegalMove`] when `pos` is not a legal move for the side to move.
pub fn apply_move(board: &Board, pos: Pos) -> Result<(Board, Vec<Pos>)> {
    if board.pos(pos.row as usize, pos.col as usize).is_err()
        || !is_legal(board, pos, board.side_to_move())
    {
        return Err(Error::IllegalMove { pos });
    }

    let mut next = board.clone();
    let info = make_move(&mut next, pos);
    Ok((next, info.flipped.iter_ones().collect()))
}

/// Hand the turn to the opponent. Only meaningful when the side to move has
/// no legal move.
#[inline]
pub fn pass(board: &mut Board) {
    board.toggle_side();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flips_for_opening_move() {
        let board = Board::new(8).unwrap();
        // Black plays (2, 3): flips white (3, 3)
        let flips = flips_for(&board, Pos::new(2, 3), Disc::Black);
        assert_eq!(flips.iter_ones().collect::<Vec<_>>(), vec![Pos::new(3, 3)]);
    }

    #[test]
    fn test_flips_for_occupied_cell_is_empty() {
        let board = Board::new(8).unwrap();
        assert!(flips_for(&board, Pos::new(3, 3), Disc::Black).is_empty());
    }

    #[test]
    fn test_flips_multiple_directions() {
        let board = Board::parse(
            "B . . .
             W W . .
             . W . .
             . B . .",
        )
        .unwrap();
        // Only the upward run is bracketed; the others end on empty cells
        let flips = flips_for(&board, Pos::new(2, 0), Disc::Black);
        assert_eq!(flips.iter_ones().collect::<Vec<_>>(), vec![Pos::new(1, 0)]);

        // A run of two
        let flips = flips_for(&board, Pos::new(0, 1), Disc::Black);
        assert_eq!(
            flips.iter_ones().collect::<Vec<_>>(),
            vec![Pos::new(1, 1), Pos::new(2, 1)]
        );
    }

    #[test]
    fn test_opening_moves_8x8() {
        let board = Board::new(8).unwrap();
        let moves = legal_moves(&board);
        assert_eq!(
            moves,
            vec![Pos::new(2, 3), Pos::new(3, 2), Pos::new(4, 5), Pos::new(5, 4)]
        );
    }

    #[test]
    fn test_opening_moves_4x4() {
        let board = Board::new(4).unwrap();
        let moves = legal_moves(&board);
        assert_eq!(
            moves,
            vec![Pos::new(0, 1), Pos::new(1, 0), Pos::new(2, 3), Pos::new(3, 2)]
        );
        assert_eq!(mobility(&board, Disc::White), 4);
    }

    #[test]
    fn test_make_unmake_restores_position() {
        let mut board = Board::new(8).unwrap();
        let original = board.clone();

        let info = make_move(&mut board, Pos::new(2, 3));
        assert_eq!(board.get(Pos::new(2, 3)), Disc::Black);
        assert_eq!(board.get(Pos::new(3, 3)), Disc::Black);
        assert_eq!(board.side_to_move(), Disc::White);
        assert_eq!(info.count(), 1);

        unmake_move(&mut board, &info);
        assert_eq!(board, original);
    }

    #[test]
    fn test_apply_move_rejects_illegal() {
        let board = Board::new(8).unwrap();
        let err = apply_move(&board, Pos::new(0, 0)).unwrap_err();
        assert!(matches!(err, Error::IllegalMove { pos } if pos == Pos::new(0, 0)));

        // Occupied cell
        assert!(apply_move(&board, Pos::new(3, 3)).is_err());
        // Outside a 4x4 board
        let small = Board::new(4).unwrap();
        assert!(apply_move(&small, Pos::new(5, 5)).is_err());
    }

    #[test]
    fn test_apply_move_returns_flips_and_keeps_input() {
        let board = Board::new(8).unwrap();
        let (next, flipped) = apply_move(&board, Pos::new(2, 3)).unwrap();
        assert_eq!(flipped, vec![Pos::new(3, 3)]);
        assert_eq!(next.count(Disc::Black), 4);
        assert_eq!(next.count(Disc::White), 1);
        assert_eq!(board.count(Disc::Black), 2);
    }

    #[test]
    fn test_pass_toggles_side() {
        let mut board = Board::new(4).unwrap();
        pass(&mut board);
        assert_eq!(board.side_to_move(), Disc::White);
    }
}
