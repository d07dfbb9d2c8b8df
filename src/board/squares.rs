//! Square classification shared by evaluation, move ordering and fallback

use super::Pos;

/// Strategic class of a cell relative to the corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareKind {
    /// Can never be flipped once taken
    Corner,
    /// Diagonally adjacent to a corner
    XSquare,
    /// Orthogonally adjacent to a corner, on the edge
    CSquare,
    /// Any other edge cell
    Edge,
    /// Not on the edge
    Interior,
}

/// The four corners of a `size` board, in row-major order
#[inline]
pub fn corners(size: usize) -> [Pos; 4] {
    let last = (size - 1) as u8;
    [
        Pos::new(0, 0),
        Pos::new(0, last),
        Pos::new(last, 0),
        Pos::new(last, last),
    ]
}

/// Classify a cell on a `size` board
pub fn classify(pos: Pos, size: usize) -> SquareKind {
    let last = size - 1;
    let (r, c) = (pos.row as usize, pos.col as usize);
    let on_rim = |v: usize| v == 0 || v == last;
    let next_to_rim = |v: usize| v == 1 || v == last - 1;

    match (on_rim(r), on_rim(c)) {
        (true, true) => SquareKind::Corner,
        (true, false) if next_to_rim(c) => SquareKind::CSquare,
        (false, true) if next_to_rim(r) => SquareKind::CSquare,
        (true, false) | (false, true) => SquareKind::Edge,
        (false, false) if next_to_rim(r) && next_to_rim(c) => SquareKind::XSquare,
        (false, false) => SquareKind::Interior,
    }
}

/// Corner guarded by an X- or C-square; `None` for any other cell
pub fn adjacent_corner(pos: Pos, size: usize) -> Option<Pos> {
    match classify(pos, size) {
        SquareKind::XSquare | SquareKind::CSquare => {
            let last = size - 1;
            let snap = |v: usize| if v <= 1 { 0 } else { last };
            #[allow(clippy::cast_possible_truncation)]
            Some(Pos::new(
                snap(pos.row as usize) as u8,
                snap(pos.col as usize) as u8,
            ))
        }
        _ => None,
    }
}

/// Whether the cell lies on the outer ring
#[inline]
pub fn is_edge(pos: Pos, size: usize) -> bool {
    let last = (size - 1) as u8;
    pos.row == 0 || pos.col == 0 || pos.row == last || pos.col == last
}
