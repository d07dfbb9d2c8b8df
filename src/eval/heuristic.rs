//! Heuristic evaluation of Othello positions
//!
//! The evaluation blends several strategic features, each measured as the
//! difference between the scored player and the opponent:
//! - Material (disc count)
//! - Corner occupancy
//! - X-/C-square exposure next to corners the player does not hold
//! - Edge occupancy and edge runs touching a corner
//! - Mobility
//! - Stability (fixed-point closure, see [`super::stability`])
//! - Frontier discs (penalized)
//! - Static positional table
//!
//! Every feature is a difference, so `evaluate(board, Black)` is always
//! `-evaluate(board, White)`. Negamax relies on this.

use crate::board::{adjacent_corner, classify, corners, Board, Disc, Pos, SquareKind};
use crate::rules::mobility;

use super::stability::{frontier_discs, stable_discs};
use super::weights::{FeatureWeights, PositionTable, PositionalWeights, Score};

/// Raw per-feature differences (own - opponent) behind an evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalBreakdown {
    pub material: i32,
    pub corners: i32,
    pub x_squares: i32,
    pub c_squares: i32,
    pub edges: i32,
    pub edge_runs: i32,
    pub mobility: i32,
    pub stability: i32,
    pub frontier: i32,
    pub positional: i32,
}

impl EvalBreakdown {
    /// Weighted sum, before clamping
    pub fn weighted(&self, w: &FeatureWeights) -> i64 {
        let terms = [
            (self.material, w.material),
            (self.corners, w.corner),
            (self.x_squares, w.x_square),
            (self.c_squares, w.c_square),
            (self.edges, w.edge),
            (self.edge_runs, w.edge_run),
            (self.mobility, w.mobility),
            (self.stability, w.stability),
            (self.frontier, -w.frontier),
            (self.positional, w.positional),
        ];
        terms
            .iter()
            .map(|&(value, weight)| i64::from(value) * i64::from(weight))
            .sum()
    }

    fn negated(self) -> Self {
        Self {
            material: -self.material,
            corners: -self.corners,
            x_squares: -self.x_squares,
            c_squares: -self.c_squares,
            edges: -self.edges,
            edge_runs: -self.edge_runs,
            mobility: -self.mobility,
            stability: -self.stability,
            frontier: -self.frontier,
            positional: -self.positional,
        }
    }
}

/// Per-color feature counts
#[derive(Debug, Clone, Copy, Default)]
struct Features {
    material: i32,
    corners: i32,
    x_squares: i32,
    c_squares: i32,
    edges: i32,
    edge_runs: i32,
    mobility: i32,
    stability: i32,
    frontier: i32,
    positional: i32,
}

/// Phase-weighted position evaluator for one board size
#[derive(Debug, Clone)]
pub struct Evaluator {
    weights: FeatureWeights,
    table: PositionTable,
}

impl Evaluator {
    /// Build an evaluator for boards of side `size`
    pub fn new(weights: FeatureWeights, positional: &PositionalWeights, size: usize) -> Self {
        Self {
            weights,
            table: positional.table(size),
        }
    }

    #[inline]
    pub fn weights(&self) -> &FeatureWeights {
        &self.weights
    }

    /// Positional table used by this evaluator
    #[inline]
    pub fn table(&self) -> &PositionTable {
        &self.table
    }

    /// Evaluate the board from the perspective of `color`.
    ///
    /// Positive values favour `color`. The result is clamped to
    /// `[-Score::EVAL_LIMIT, Score::EVAL_LIMIT]` so that it never reaches a
    /// terminal score. The board is not modified.
    #[must_use]
    pub fn evaluate(&self, board: &Board, color: Disc) -> i32 {
        let raw = self.breakdown(board, color).weighted(&self.weights);
        let limit = i64::from(Score::EVAL_LIMIT);
        #[allow(clippy::cast_possible_truncation)]
        let clamped = raw.clamp(-limit, limit) as i32;
        clamped
    }

    /// Feature differences for `color`, unweighted
    pub fn breakdown(&self, board: &Board, color: Disc) -> EvalBreakdown {
        if color == Disc::Empty {
            return EvalBreakdown::default();
        }
        // Always measure Black - White and flip afterwards so both
        // perspectives share the exact same arithmetic.
        let black = self.features(board, Disc::Black);
        let white = self.features(board, Disc::White);
        let diff = EvalBreakdown {
            material: black.material - white.material,
            corners: black.corners - white.corners,
            x_squares: black.x_squares - white.x_squares,
            c_squares: black.c_squares - white.c_squares,
            edges: black.edges - white.edges,
            edge_runs: black.edge_runs - white.edge_runs,
            mobility: black.mobility - white.mobility,
            stability: black.stability - white.stability,
            frontier: black.frontier - white.frontier,
            positional: black.positional - white.positional,
        };
        if color == Disc::Black {
            diff
        } else {
            diff.negated()
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn features(&self, board: &Board, color: Disc) -> Features {
        let Some(discs) = board.discs(color) else {
            return Features::default();
        };
        let size = board.size();
        let mut f = Features {
            material: discs.count() as i32,
            mobility: mobility(board, color) as i32,
            stability: stable_discs(board, color).count() as i32,
            frontier: frontier_discs(board, color) as i32,
            edge_runs: edge_runs(board, color),
            ..Features::default()
        };

        for pos in discs.iter_ones() {
            f.positional += self.table.get(pos);
            match classify(pos, size) {
                SquareKind::Corner => f.corners += 1,
                kind @ (SquareKind::XSquare | SquareKind::CSquare) => {
                    let guarded = adjacent_corner(pos, size).is_some_and(|c| board.get(c) == color);
                    if !guarded {
                        if kind == SquareKind::XSquare {
                            f.x_squares += 1;
                        } else {
                            f.c_squares += 1;
                        }
                    }
                    if kind == SquareKind::CSquare {
                        f.edges += 1;
                    }
                }
                SquareKind::Edge => f.edges += 1,
                SquareKind::Interior => {}
            }
        }

        f
    }
}

/// Total length of the runs of `color` along the four edges that touch a
/// corner. A run spanning a whole edge is counted once.
fn edge_runs(board: &Board, color: Disc) -> i32 {
    let size = board.size();
    let [top_left, top_right, bottom_left, _] = corners(size);

    let edges: [(Pos, (i32, i32)); 4] = [
        (top_left, (0, 1)),
        (top_left, (1, 0)),
        (top_right, (1, 0)),
        (bottom_left, (0, 1)),
    ];

    let mut total = 0;
    for (start, (dr, dc)) in edges {
        let line: Vec<Pos> = std::iter::successors(Some(start), |p| p.offset(dr, dc, size)).collect();
        let lead = line.iter().take_while(|&&p| board.get(p) == color).count();
        if lead == line.len() {
            total += lead;
            continue;
        }
        let tail = line.iter().rev().take_while(|&&p| board.get(p) == color).count();
        total += lead + tail;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let total = total as i32;
    total
}
