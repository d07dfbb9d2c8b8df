//! Stable and frontier disc detection
//!
//! A disc is stable when, along each of the four lines through it, at least
//! one neighbour is off the board or is itself a stable disc of the same
//! color. Every disc is checked once; a disc that becomes stable puts its
//! unstable same-color neighbours back on the worklist, since only they can
//! gain an anchor from it. Corners settle first, then edge runs anchored on
//! them, and so on inward.

use crate::board::{Bitboard, Board, Disc, Pos, DIRECTIONS};

/// One direction of each of the four lines through a cell
const LINES: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Stable discs of `color`
pub fn stable_discs(board: &Board, color: Disc) -> Bitboard {
    let mut stable = Bitboard::new();
    let Some(discs) = board.discs(color) else {
        return stable;
    };
    let size = board.size();

    let anchored = |stable: &Bitboard, pos: Pos, dr: i32, dc: i32| match pos.offset(dr, dc, size) {
        None => true,
        Some(n) => stable.get(n),
    };

    let mut pending: Vec<Pos> = discs.iter_ones().collect();
    while let Some(pos) = pending.pop() {
        if stable.get(pos) {
            continue;
        }
        let holds = LINES.iter().all(|&(dr, dc)| {
            anchored(&stable, pos, dr, dc) || anchored(&stable, pos, -dr, -dc)
        });
        if !holds {
            continue;
        }
        stable.set(pos);
        pending.extend(
            DIRECTIONS
                .iter()
                .filter_map(|&(dr, dc)| pos.offset(dr, dc, size))
                .filter(|&n| discs.get(n) && !stable.get(n)),
        );
    }

    stable
}

/// Discs of `color` touching at least one empty cell
pub fn frontier_discs(board: &Board, color: Disc) -> u32 {
    let Some(discs) = board.discs(color) else {
        return 0;
    };
    let size = board.size();

    #[allow(clippy::cast_possible_truncation)]
    let n = discs
        .iter_ones()
        .filter(|&pos| {
            DIRECTIONS
                .iter()
                .filter_map(|&(dr, dc)| pos.offset(dr, dc, size))
                .any(|n| board.is_empty(n))
        })
        .count() as u32;
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_has_no_stable_discs() {
        let board = Board::new(8).unwrap();
        assert!(stable_discs(&board, Disc::Black).is_empty());
        assert!(stable_discs(&board, Disc::White).is_empty());
    }

    #[test]
    fn test_corner_is_stable() {
        let board = Board::parse(
            "B . . .
             . W B .
             . B W .
             . . . .",
        )
        .unwrap();
        let stable = stable_discs(&board, Disc::Black);
        assert_eq!(stable.iter_ones().collect::<Vec<_>>(), vec![Pos::new(0, 0)]);
    }

    #[test]
    fn test_edge_run_from_corner_is_stable() {
        let board = Board::parse(
            "B B B . . .
             . . . . . .
             . . W B . .
             . . B W . .
             . . . . . .
             . . . . . .",
        )
        .unwrap();
        let stable = stable_discs(&board, Disc::Black);
        assert_eq!(
            stable.iter_ones().collect::<Vec<_>>(),
            vec![Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)]
        );
    }

    #[test]
    fn test_full_board_block_is_stable() {
        let board = Board::parse(
            "B B W W
             B B W W
             W W B B
             W W B B",
        )
        .unwrap();
        // Each corner anchors its two edge neighbours; the inner discs sit
        // between two opposing discs on one diagonal and stay unstable
        let black = stable_discs(&board, Disc::Black);
        assert_eq!(black.count(), 6);
        assert!(!black.get(Pos::new(1, 1)));
        assert_eq!(stable_discs(&board, Disc::White).count(), 6);
    }

    #[test]
    fn test_uniform_board_is_fully_stable() {
        let row = vec!["B"; 16].join(" ");
        let text = vec![row; 16].join("\n");
        let board = Board::parse(&text).unwrap();
        assert_eq!(stable_discs(&board, Disc::Black).count(), 256);
        assert!(stable_discs(&board, Disc::White).is_empty());
    }

    /// Grow the stable set by rescanning every disc until nothing changes
    fn rescan_closure(board: &Board, color: Disc) -> Bitboard {
        let mut stable = Bitboard::new();
        let Some(discs) = board.discs(color) else {
            return stable;
        };
        let size = board.size();
        let anchored = |stable: &Bitboard, pos: Pos, dr: i32, dc: i32| {
            pos.offset(dr, dc, size).map_or(true, |n| stable.get(n))
        };
        loop {
            let fresh: Vec<Pos> = discs
                .iter_ones()
                .filter(|&pos| !stable.get(pos))
                .filter(|&pos| {
                    LINES.iter().all(|&(dr, dc)| {
                        anchored(&stable, pos, dr, dc) || anchored(&stable, pos, -dr, -dc)
                    })
                })
                .collect();
            if fresh.is_empty() {
                return stable;
            }
            for pos in fresh {
                stable.set(pos);
            }
        }
    }

    #[test]
    fn test_worklist_matches_rescan_over_games() {
        use crate::rules::{apply_move, is_terminal, legal_moves, pass};

        for seed in 0..6usize {
            let mut board = Board::new(8).unwrap();
            let mut ply = 0usize;
            while !is_terminal(&board) {
                let moves = legal_moves(&board);
                if moves.is_empty() {
                    pass(&mut board);
                    continue;
                }
                board = apply_move(&board, moves[(ply * 5 + seed) % moves.len()])
                    .unwrap()
                    .0;
                ply += 1;
                for color in [Disc::Black, Disc::White] {
                    assert_eq!(
                        stable_discs(&board, color),
                        rescan_closure(&board, color),
                        "seed {seed} ply {ply}\n{board}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_frontier_count() {
        let board = Board::new(8).unwrap();
        assert_eq!(frontier_discs(&board, Disc::Black), 2);
        assert_eq!(frontier_discs(&board, Disc::White), 2);

        let full = Board::parse(
            "B B B B
             B B B B
             W W W W
             W W W W",
        )
        .unwrap();
        assert_eq!(frontier_discs(&full, Disc::Black), 0);
    }
}
