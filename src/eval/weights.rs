//! Score scale and tunable evaluation weights
//!
//! Feature weights and positional tables are configuration: each phase
//! carries its own set, and all of them can be overridden from TOML.

use serde::{Deserialize, Serialize};

use crate::board::{Pos, TOTAL_CELLS};

/// Score scale shared by the evaluator and the search
pub struct Score;

impl Score {
    /// Heuristic evaluations are clamped to `[-EVAL_LIMIT, EVAL_LIMIT]`
    pub const EVAL_LIMIT: i32 = 500_000;
    /// Base score of a won game; always above `EVAL_LIMIT`
    pub const WIN: i32 = 1_000_000;
    /// Added per disc of final margin on top of `WIN`
    pub const DISC: i32 = 1_000;
    /// Search window bound, larger than any reachable score
    pub const INF: i32 = 100_000_000;
}

/// Weight per evaluation feature.
///
/// Every feature is measured as (own - opponent), so a negative weight
/// penalizes owning the feature. The frontier weight is applied with a
/// negative sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureWeights {
    pub material: i32,
    pub corner: i32,
    pub x_square: i32,
    pub c_square: i32,
    pub edge: i32,
    pub edge_run: i32,
    pub mobility: i32,
    pub stability: i32,
    pub frontier: i32,
    pub positional: i32,
}

impl FeatureWeights {
    /// Opening: mobility and positional play, material barely counts
    pub const fn opening() -> Self {
        Self {
            material: 10,
            corner: 500,
            x_square: -300,
            c_square: -150,
            edge: 50,
            edge_run: 10,
            mobility: 100,
            stability: 300,
            frontier: 20,
            positional: 30,
        }
    }

    pub const fn midgame() -> Self {
        Self {
            material: 50,
            corner: 400,
            x_square: -150,
            c_square: -100,
            edge: 100,
            edge_run: 20,
            mobility: 80,
            stability: 300,
            frontier: 30,
            positional: 50,
        }
    }

    /// Endgame: material and stability dominate
    pub const fn endgame() -> Self {
        Self {
            material: 500,
            corner: 300,
            x_square: -50,
            c_square: -30,
            edge: 100,
            edge_run: 40,
            mobility: 20,
            stability: 500,
            frontier: 10,
            positional: 50,
        }
    }
}

/// Positional values for one quadrant.
///
/// `quadrant[a][b]` is the value of a cell whose distances to the nearest
/// horizontal and vertical border are `a` and `b` (clamped to 3). The full
/// table of any board side is the quadrant mirrored into all four corners,
/// so an 8x8 table is reproduced exactly and larger boards reuse the
/// innermost value for their centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalWeights {
    pub quadrant: [[i32; 4]; 4],
}

impl PositionalWeights {
    pub const fn opening() -> Self {
        Self {
            quadrant: [
                [100, -20, 10, 5],
                [-20, -25, 1, 1],
                [10, 1, 5, 2],
                [5, 1, 2, 1],
            ],
        }
    }

    pub const fn midgame() -> Self {
        Self {
            quadrant: [
                [100, -10, 8, 6],
                [-10, -15, 4, 2],
                [8, 4, 6, 4],
                [6, 2, 4, 2],
            ],
        }
    }

    pub const fn endgame() -> Self {
        Self {
            quadrant: [
                [100, -5, 10, 8],
                [-5, -10, 5, 3],
                [10, 5, 5, 3],
                [8, 3, 3, 3],
            ],
        }
    }

    /// The quadrant must be symmetric: swapping rows and columns of a
    /// board must not change any cell value.
    pub fn is_symmetric(&self) -> bool {
        (0..4).all(|a| (0..4).all(|b| self.quadrant[a][b] == self.quadrant[b][a]))
    }

    /// Expand into a full table for a `size` board
    pub fn table(&self, size: usize) -> PositionTable {
        let mut values = [0; TOTAL_CELLS];
        let last = size - 1;
        for r in 0..size {
            for c in 0..size {
                let a = r.min(last - r).min(3);
                let b = c.min(last - c).min(3);
                values[r * crate::board::MAX_BOARD_SIZE + c] = self.quadrant[a][b];
            }
        }
        PositionTable { size, values }
    }
}

/// Static positional value of every cell of one board size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionTable {
    size: usize,
    values: [i32; TOTAL_CELLS],
}

impl PositionTable {
    /// Value of a cell; cells outside the board are worth 0
    #[inline]
    pub fn get(&self, pos: Pos) -> i32 {
        self.values[pos.to_index()]
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }
}
