//! Negamax search with alpha-beta pruning and iterative deepening
//!
//! This module implements the core search of the engine.
//!
//! # Features
//!
//! - Iterative deepening, keeping the result of the last completed depth
//! - Forced passes searched at the same depth with the side flipped
//! - Exact endgame solving once few enough cells are empty
//! - Transposition table reuse at matching depth only
//! - History-based tie breaking at interior nodes
//! - Optional root-move parallelism sharing the lock-free table
//! - Cooperative deadline polling every `node_check_interval` nodes
//!
//! # Example
//!
//! ```
//! use othello::board::Board;
//! use othello::eval::{Evaluator, FeatureWeights, PositionalWeights};
//! use othello::search::{SearchLimits, Searcher};
//! use othello::strategy::Phase;
//!
//! let board = Board::new(6).unwrap();
//! let evaluator = Evaluator::new(FeatureWeights::opening(), &PositionalWeights::opening(), 6);
//! let mut searcher = Searcher::new(1, 1);
//!
//! let result = searcher.search(&board, &evaluator, Phase::Opening, &SearchLimits::depth(3));
//! assert!(result.best_move.is_some());
//! assert_eq!(result.depth, 3);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::board::{Board, Disc, Pos};
use crate::eval::{Evaluator, Score};
use crate::rules::{
    disc_margin, has_legal_move, is_terminal, legal_moves, make_move, pass, unmake_move,
};
use crate::strategy::Phase;

use super::{EntryType, MoveOrderer, TTStats, TranspositionTable, ZobristTable};

/// Window bound
const INF: i32 = Score::INF;

/// Remaining-depth marker for nodes inside an exact endgame solve. Their
/// value no longer depends on depth, so they all share one table depth.
const EXACT_DEPTH: i8 = -1;

/// Score of a finished game from `color`'s point of view.
///
/// Wins and losses lie strictly outside the heuristic range:
/// `±(Score::WIN + Score::DISC * |margin|)`; a draw is 0.
#[must_use]
pub fn terminal_score(board: &Board, color: Disc) -> i32 {
    let margin = disc_margin(board, color);
    match margin.signum() {
        1 => Score::WIN + Score::DISC * margin,
        -1 => -(Score::WIN + Score::DISC * -margin),
        _ => 0,
    }
}

/// Disc margin encoded in a terminal score, `None` for heuristic scores.
///
/// A draw (0) is indistinguishable from a balanced evaluation and also
/// yields `None`.
#[must_use]
pub fn decode_margin(score: i32) -> Option<i32> {
    if score.abs() < Score::WIN {
        return None;
    }
    Some(score.signum() * (score.abs() - Score::WIN) / Score::DISC)
}

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Total beta cutoffs (fail-high)
    pub beta_cutoffs: u64,
    /// Beta cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
    /// Total TT probes
    pub tt_probes: u64,
    /// TT probes that returned a usable score
    pub tt_score_hits: u64,
    /// TT probes that provided a best move for ordering
    pub tt_move_hits: u64,
    /// Forced passes searched
    pub passes: u64,
    /// Finished games reached
    pub terminal_nodes: u64,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    #[allow(clippy::cast_precision_loss)]
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }

    /// TT score hit rate in percent
    #[allow(clippy::cast_precision_loss)]
    pub fn tt_score_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_score_hits as f64 / self.tt_probes as f64 * 100.0
        }
    }

    /// Merge another worker's stats into this one
    fn merge(&mut self, other: &SearchStats) {
        self.beta_cutoffs += other.beta_cutoffs;
        self.first_move_cutoffs += other.first_move_cutoffs;
        self.tt_probes += other.tt_probes;
        self.tt_score_hits += other.tt_score_hits;
        self.tt_move_hits += other.tt_move_hits;
        self.passes += other.passes;
        self.terminal_nodes += other.terminal_nodes;
    }
}

/// Bounds for one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Deepest iteration to run
    pub max_depth: i8,
    /// Wall-clock deadline; depth 1 ignores it
    pub deadline: Option<Instant>,
    /// Solve exactly once at most this many cells are empty
    pub exact_empties: Option<u32>,
}

impl SearchLimits {
    /// Fixed depth, no deadline, no exact solving
    #[must_use]
    pub fn depth(max_depth: i8) -> Self {
        Self {
            max_depth,
            deadline: None,
            exact_empties: None,
        }
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_exact_empties(mut self, empties: u32) -> Self {
        self.exact_empties = Some(empties);
        self
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move of the last completed depth; `None` when no depth
    /// completed or the side to move has no legal move
    pub best_move: Option<Pos>,
    /// Score of `best_move` relative to the side to move
    pub score: i32,
    /// Last completed depth (0 if none)
    pub depth: i8,
    /// Total nodes searched, including abandoned iterations
    pub nodes: u64,
    pub elapsed: Duration,
    /// Whether the time budget ended the search before `max_depth`
    pub timed_out: bool,
    /// Search diagnostics
    pub stats: SearchStats,
}

// =============================================================================
// SharedState: state shared across all workers
// =============================================================================

/// State shared between all search workers.
struct SharedState {
    zobrist: ZobristTable,
    tt: Option<TranspositionTable>,
    /// Global stop signal, raised by whichever worker sees the deadline pass.
    stopped: AtomicBool,
}

/// Per-search settings every worker reads
#[derive(Clone, Copy)]
struct NodeContext<'a> {
    evaluator: &'a Evaluator,
    deadline: Option<Instant>,
    exact_empties: Option<u32>,
    use_history: bool,
    check_interval: u64,
}

// =============================================================================
// Worker: per-thread search state
// =============================================================================

/// Per-thread search worker. Each worker owns its history table and shares
/// the TT and Zobrist keys through `&SharedState`.
struct Worker<'a> {
    shared: &'a SharedState,
    ctx: NodeContext<'a>,
    orderer: MoveOrderer,
    nodes: u64,
    stats: SearchStats,
}

impl<'a> Worker<'a> {
    fn new(shared: &'a SharedState, ctx: NodeContext<'a>) -> Self {
        Self {
            shared,
            ctx,
            orderer: MoveOrderer::new(),
            nodes: 0,
            stats: SearchStats::default(),
        }
    }

    #[inline]
    fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Relaxed)
    }

    /// Check the deadline and raise the global stop flag once it passes.
    #[inline]
    fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        if let Some(deadline) = self.ctx.deadline {
            if Instant::now() >= deadline {
                self.shared.stopped.store(true, Ordering::Relaxed);
                return true;
            }
        }
        false
    }

    #[inline]
    fn in_exact_mode(&self, board: &Board) -> bool {
        self.ctx
            .exact_empties
            .is_some_and(|limit| board.empty_count() <= limit)
    }

    /// Search the given root moves with the usual narrowing window.
    ///
    /// Returns `(best_move, score)`; ties keep the earlier move.
    fn search_root(
        &mut self,
        board: &mut Board,
        moves: &[Pos],
        depth: i8,
        hash: u64,
    ) -> (Pos, i32) {
        let exact = self.in_exact_mode(board);
        let child_depth = if exact { EXACT_DEPTH } else { depth - 1 };

        let mut alpha = -INF;
        let mut best = (moves[0], -INF);
        for &mv in moves {
            let info = make_move(board, mv);
            let child_hash = self.shared.zobrist.update_move(hash, &info);
            let score = -self.negamax(board, child_depth, -INF, -alpha, child_hash);
            unmake_move(board, &info);

            if self.is_stopped() {
                break;
            }
            if score > best.1 {
                best = (mv, score);
            }
            alpha = alpha.max(score);
        }
        best
    }

    /// Search each move with a full window. Used by parallel workers so
    /// that merged scores do not depend on which thread saw what first.
    fn search_root_full(
        &mut self,
        board: &mut Board,
        moves: &[(usize, Pos)],
        depth: i8,
        hash: u64,
    ) -> Vec<(usize, i32)> {
        let exact = self.in_exact_mode(board);
        let child_depth = if exact { EXACT_DEPTH } else { depth - 1 };

        let mut scores = Vec::with_capacity(moves.len());
        for &(idx, mv) in moves {
            let info = make_move(board, mv);
            let child_hash = self.shared.zobrist.update_move(hash, &info);
            let score = -self.negamax(board, child_depth, -INF, INF, child_hash);
            unmake_move(board, &info);

            if self.is_stopped() {
                break;
            }
            scores.push((idx, score));
        }
        scores
    }

    /// Fail-soft negamax. Returns the score of `board` for its side to move.
    fn negamax(
        &mut self,
        board: &mut Board,
        depth: i8,
        mut alpha: i32,
        beta: i32,
        hash: u64,
    ) -> i32 {
        self.nodes += 1;
        let color = board.side_to_move();

        if board.is_full() {
            self.stats.terminal_nodes += 1;
            return terminal_score(board, color);
        }

        // Time check every `check_interval` nodes
        if self.nodes % self.ctx.check_interval == 0 {
            self.check_time();
        }
        let exact = self.in_exact_mode(board);
        if self.is_stopped() || (depth <= 0 && !exact) {
            return self.ctx.evaluator.evaluate(board, color);
        }

        let mut moves = legal_moves(board);
        if moves.is_empty() {
            if !has_legal_move(board, color.opponent()) {
                self.stats.terminal_nodes += 1;
                return terminal_score(board, color);
            }
            // Forced pass: same depth, opponent to move
            self.stats.passes += 1;
            pass(board);
            let pass_hash = self.shared.zobrist.toggle_side(hash);
            let score = -self.negamax(board, depth, -beta, -alpha, pass_hash);
            pass(board);
            return score;
        }

        let depth = if exact { EXACT_DEPTH } else { depth };
        let child_depth = if exact { EXACT_DEPTH } else { depth - 1 };

        // TT probe
        if let Some(tt) = &self.shared.tt {
            self.stats.tt_probes += 1;
            if let Some(score) = tt.probe(hash, depth, alpha, beta) {
                self.stats.tt_score_hits += 1;
                return score;
            }
        }

        self.order_moves(board, &mut moves, hash);

        let alpha_orig = alpha;
        let mut best_score = -INF;
        let mut best_move = None;

        for (i, &mv) in moves.iter().enumerate() {
            let info = make_move(board, mv);
            let child_hash = self.shared.zobrist.update_move(hash, &info);
            let score = -self.negamax(board, child_depth, -beta, -alpha, child_hash);
            unmake_move(board, &info);

            if self.is_stopped() {
                // Unwind; the caller discards this iteration
                return best_score.max(score);
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                if self.ctx.use_history {
                    self.orderer.record_cutoff(color, mv, depth);
                }
                break;
            }
        }

        if let Some(tt) = &self.shared.tt {
            let entry_type = if best_score <= alpha_orig {
                EntryType::UpperBound
            } else if best_score >= beta {
                EntryType::LowerBound
            } else {
                EntryType::Exact
            };
            tt.store(hash, depth, best_score, entry_type, best_move);
        }

        best_score
    }

    /// Order interior moves; a legal TT move goes first.
    fn order_moves(&mut self, board: &Board, moves: &mut [Pos], hash: u64) {
        let table = self.ctx.evaluator.table();
        if self.ctx.use_history {
            self.orderer.order(board, moves, table);
        } else {
            MoveOrderer::order_static(board, moves, table);
        }

        let tt_move = self.shared.tt.as_ref().and_then(|tt| tt.best_move(hash));
        if let Some(tt_move) = tt_move {
            // Moves that are not legal here come from a colliding entry
            if let Some(idx) = moves.iter().position(|&m| m == tt_move) {
                self.stats.tt_move_hits += 1;
                moves[..=idx].rotate_right(1);
            }
        }
    }
}

/// How one root iteration ended
enum RootOutcome {
    Done(Pos, i32),
    /// The deadline passed mid-iteration
    Stopped,
    /// A worker thread panicked; its moves have no score
    WorkerFailed,
}

/// Join scoped workers, logging and counting the ones that panicked
fn join_workers<T>(handles: Vec<std::thread::ScopedJoinHandle<'_, T>>) -> (Vec<T>, usize) {
    let mut outputs = Vec::with_capacity(handles.len());
    let mut failed = 0;
    for handle in handles {
        match handle.join() {
            Ok(output) => outputs.push(output),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::warn!("search worker panicked: {message}");
                failed += 1;
            }
        }
    }
    (outputs, failed)
}

// =============================================================================
// Searcher: public entry point
// =============================================================================

/// Alpha-beta search engine with iterative deepening and transposition table.
///
/// The searcher keeps its transposition table across searches; history
/// tables are rebuilt for each search. For a new game or new settings, call
/// `clear_tt()`.
pub struct Searcher {
    shared: SharedState,
    threads: usize,
    use_history: bool,
    node_check_interval: u64,
}

impl Searcher {
    /// Create a searcher with a `tt_size_mb` table (0 disables it) and
    /// `threads` root workers.
    ///
    /// # Example
    ///
    /// ```
    /// use othello::search::Searcher;
    ///
    /// let searcher = Searcher::new(16, 1); // 16 MB table, single thread
    /// assert!(searcher.tt_stats().is_some());
    /// assert!(Searcher::new(0, 1).tt_stats().is_none());
    /// ```
    #[must_use]
    pub fn new(tt_size_mb: usize, threads: usize) -> Self {
        let tt = (tt_size_mb > 0).then(|| TranspositionTable::new(tt_size_mb));
        Self {
            shared: SharedState {
                zobrist: ZobristTable::new(),
                tt,
                stopped: AtomicBool::new(false),
            },
            threads: threads.max(1),
            use_history: true,
            node_check_interval: 1024,
        }
    }

    /// Enable or disable history tie breaking
    #[must_use]
    pub fn with_history(mut self, use_history: bool) -> Self {
        self.use_history = use_history;
        self
    }

    /// Poll the clock every `interval` nodes (at least 1)
    #[must_use]
    pub fn with_node_check_interval(mut self, interval: u64) -> Self {
        self.node_check_interval = interval.max(1);
        self
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Run iterative deepening from depth 1 to `limits.max_depth`.
    ///
    /// Depth 1 always completes without looking at the deadline, unless the
    /// root or its children are inside the exact endgame window. Later
    /// depths, and a depth 1 made of exact solves, stop at the deadline and
    /// are then discarded. Once the root is solved exactly, deeper
    /// iterations cannot change anything and the loop ends.
    ///
    /// Without legal moves the pass is searched under the same deadline; if
    /// it runs out, the static evaluation is reported instead.
    pub fn search(
        &mut self,
        board: &Board,
        evaluator: &Evaluator,
        phase: Phase,
        limits: &SearchLimits,
    ) -> SearchResult {
        let start = Instant::now();
        self.shared.stopped.store(false, Ordering::Relaxed);

        let context = self
            .shared
            .zobrist
            .context(board.size(), phase.index(), limits.exact_empties.is_some());
        let root_hash = self.shared.zobrist.hash(board) ^ context;
        let root_exact = limits.exact_empties.is_some_and(|e| board.empty_count() <= e);

        let base_ctx = NodeContext {
            evaluator,
            deadline: limits.deadline,
            exact_empties: limits.exact_empties,
            use_history: self.use_history,
            check_interval: self.node_check_interval,
        };

        let mut result = SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
            timed_out: false,
            stats: SearchStats::default(),
        };

        let mut root_moves = legal_moves(board);
        MoveOrderer::order_static(board, &mut root_moves, evaluator.table());

        if root_moves.is_empty() {
            // Pass or game over: report the score, there is no move to make
            if is_terminal(board) {
                result.score = terminal_score(board, board.side_to_move());
                result.nodes = 1;
                result.stats.terminal_nodes = 1;
                result.elapsed = start.elapsed();
                return result;
            }
            let mut worker = Worker::new(&self.shared, base_ctx);
            let mut work_board = board.clone();
            let depth = limits.max_depth.max(1);
            let score = worker.negamax(&mut work_board, depth, -INF, INF, root_hash);
            if self.shared.stopped.load(Ordering::Relaxed) {
                result.timed_out = true;
                result.score = evaluator.evaluate(board, board.side_to_move());
                log::debug!("pass search abandoned at deadline");
            } else {
                result.score = score;
            }
            result.nodes = worker.nodes;
            result.stats = worker.stats;
            result.elapsed = start.elapsed();
            return result;
        }

        let mut single = (self.threads == 1).then(|| Worker::new(&self.shared, base_ctx));
        let mut prev_depth_time = Duration::ZERO;
        // Children inside the exact window are full solves, never cheap
        let children_exact = limits
            .exact_empties
            .is_some_and(|e| board.empty_count() <= e + 1);

        for depth in 1..=limits.max_depth.max(1) {
            let depth_start = Instant::now();
            let unbounded = depth == 1 && !root_exact && !children_exact;
            let ctx = if unbounded {
                NodeContext {
                    deadline: None,
                    ..base_ctx
                }
            } else {
                base_ctx
            };

            let outcome = match single.as_mut() {
                Some(worker) => {
                    worker.ctx = ctx;
                    let mut work_board = board.clone();
                    let (best_move, score) =
                        worker.search_root(&mut work_board, &root_moves, depth, root_hash);
                    if self.shared.stopped.load(Ordering::Relaxed) {
                        RootOutcome::Stopped
                    } else {
                        RootOutcome::Done(best_move, score)
                    }
                }
                None => {
                    self.search_root_parallel(board, &root_moves, depth, root_hash, ctx, &mut result)
                }
            };

            let (best_move, score) = match outcome {
                RootOutcome::Done(best_move, score) => (best_move, score),
                RootOutcome::Stopped => {
                    result.timed_out = true;
                    log::debug!("depth {depth} abandoned at deadline");
                    break;
                }
                RootOutcome::WorkerFailed => {
                    log::warn!("depth {depth} discarded: a search worker panicked");
                    break;
                }
            };

            result.best_move = Some(best_move);
            result.score = score;
            result.depth = depth;
            log::trace!("depth {depth}: best {best_move} score {score}");

            // Previous best goes first in the next iteration
            if let Some(idx) = root_moves.iter().position(|&m| m == best_move) {
                root_moves[..=idx].rotate_right(1);
            }

            if root_exact || children_exact {
                break;
            }

            // Skip a depth that cannot finish in the remaining time
            if let Some(deadline) = limits.deadline {
                let depth_time = depth_start.elapsed();
                let remaining = deadline.saturating_duration_since(Instant::now());
                let factor = if prev_depth_time.as_micros() > 0 {
                    (depth_time.as_secs_f64() / prev_depth_time.as_secs_f64()).clamp(1.5, 5.0)
                } else {
                    3.0
                };
                prev_depth_time = depth_time;
                if depth < limits.max_depth && depth_time.mul_f64(factor) > remaining {
                    result.timed_out = true;
                    log::debug!("stopping after depth {depth}: next depth would overrun");
                    break;
                }
            }
        }

        if let Some(worker) = single {
            result.nodes += worker.nodes;
            result.stats.merge(&worker.stats);
        }
        result.elapsed = start.elapsed();
        result
    }

    /// One depth of root-parallel search. Root moves are dealt round-robin
    /// to scoped workers; each move is searched with a full window and the
    /// first move in root order with the highest score wins.
    fn search_root_parallel(
        &self,
        board: &Board,
        root_moves: &[Pos],
        depth: i8,
        hash: u64,
        ctx: NodeContext<'_>,
        result: &mut SearchResult,
    ) -> RootOutcome {
        let threads = self.threads.min(root_moves.len());
        let shared = &self.shared;

        let (outputs, failed) = std::thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let share: Vec<(usize, Pos)> = root_moves
                        .iter()
                        .copied()
                        .enumerate()
                        .filter(|(i, _)| i % threads == t)
                        .collect();
                    let mut work_board = board.clone();
                    s.spawn(move || {
                        let mut worker = Worker::new(shared, ctx);
                        let scores = worker.search_root_full(&mut work_board, &share, depth, hash);
                        (scores, worker.nodes, worker.stats)
                    })
                })
                .collect();
            join_workers(handles)
        });

        let mut scores: Vec<Option<i32>> = vec![None; root_moves.len()];
        for (worker_scores, nodes, stats) in outputs {
            result.nodes += nodes;
            result.stats.merge(&stats);
            for (idx, score) in worker_scores {
                scores[idx] = Some(score);
            }
        }

        if failed > 0 {
            return RootOutcome::WorkerFailed;
        }
        if self.shared.stopped.load(Ordering::Relaxed) {
            return RootOutcome::Stopped;
        }

        // Merge in root order
        let mut best: Option<(Pos, i32)> = None;
        for (&mv, score) in root_moves.iter().zip(&scores) {
            let Some(score) = *score else {
                return RootOutcome::WorkerFailed;
            };
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((mv, score));
            }
        }
        match best {
            Some((mv, score)) => RootOutcome::Done(mv, score),
            None => RootOutcome::WorkerFailed,
        }
    }

    /// Get statistics about the transposition table, if enabled.
    #[must_use]
    pub fn tt_stats(&self) -> Option<TTStats> {
        self.shared.tt.as_ref().map(TranspositionTable::stats)
    }

    /// Clear the transposition table.
    pub fn clear_tt(&self) {
        if let Some(tt) = &self.shared.tt {
            tt.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{FeatureWeights, PositionalWeights};

    fn evaluator(size: usize) -> Evaluator {
        Evaluator::new(FeatureWeights::midgame(), &PositionalWeights::midgame(), size)
    }

    #[test]
    fn test_terminal_score_encoding() {
        let board = Board::parse(
            "B B B B
             B B W W
             W W W W
             B B B B",
        )
        .unwrap();
        let black = terminal_score(&board, Disc::Black);
        assert_eq!(black, Score::WIN + 4 * Score::DISC);
        assert_eq!(terminal_score(&board, Disc::White), -black);
        assert_eq!(decode_margin(black), Some(4));
        assert_eq!(decode_margin(-black), Some(-4));
        assert_eq!(decode_margin(Score::EVAL_LIMIT), None);
    }

    #[test]
    fn test_search_returns_legal_move() {
        let board = Board::new(6).unwrap();
        let eval = evaluator(6);
        let mut searcher = Searcher::new(1, 1);
        let result = searcher.search(&board, &eval, Phase::Opening, &SearchLimits::depth(3));
        let best = result.best_move.unwrap();
        assert!(legal_moves(&board).contains(&best));
        assert_eq!(result.depth, 3);
        assert!(result.nodes > 0);
        assert!(!result.timed_out);
    }

    #[test]
    fn test_search_takes_free_corner() {
        // Black can take (0,0) by flipping (1,1)
        let board = Board::parse(
            ". . . . . .
             . W . . . .
             . . B W . .
             . . W B . .
             . . . . . .
             . . . . . .",
        )
        .unwrap();
        let eval = evaluator(6);
        let mut searcher = Searcher::new(1, 1);
        let result = searcher.search(&board, &eval, Phase::Midgame, &SearchLimits::depth(2));
        assert_eq!(result.best_move, Some(Pos::new(0, 0)));
    }

    #[test]
    fn test_full_board_scores_terminal() {
        let board = Board::parse(
            "B B B B
             B B W W
             W W W W
             B B B B
             white",
        )
        .unwrap();
        let eval = evaluator(4);
        let mut searcher = Searcher::new(1, 1);
        let result = searcher.search(&board, &eval, Phase::Endgame, &SearchLimits::depth(4));
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, -(Score::WIN + 4 * Score::DISC));
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn test_forced_pass_is_not_game_over() {
        // White has no move; Black can still play (0,3)
        let board = Board::parse(
            "B B W .
             B B B B
             B B B B
             B B B B
             white",
        )
        .unwrap();
        assert!(legal_moves(&board).is_empty());
        let eval = evaluator(4);
        let mut searcher = Searcher::new(1, 1);
        let result = searcher.search(&board, &eval, Phase::Endgame, &SearchLimits::depth(2));
        // Black plays (0,3), wins 16-0
        assert_eq!(result.score, -(Score::WIN + 16 * Score::DISC));
        assert_eq!(result.stats.passes, 1);
    }

    #[test]
    fn test_deadline_in_past_still_completes_depth_one() {
        let board = Board::new(8).unwrap();
        let eval = evaluator(8);
        let mut searcher = Searcher::new(1, 1).with_node_check_interval(1);
        let limits = SearchLimits::depth(6).with_deadline(Instant::now());
        let result = searcher.search(&board, &eval, Phase::Opening, &limits);
        assert_eq!(result.depth, 1);
        assert!(result.best_move.is_some());
        assert!(result.timed_out);
    }

    /// Play deterministic first-choice games until `empties` cells remain
    fn midgame_board(empties: u32) -> Board {
        for seed in 0..32usize {
            let mut board = Board::new(8).unwrap();
            let mut ply = 0usize;
            while board.empty_count() > empties && !is_terminal(&board) {
                let moves = legal_moves(&board);
                if moves.is_empty() {
                    pass(&mut board);
                    continue;
                }
                let pick = moves[(ply * 7 + seed) % moves.len()];
                board = crate::rules::apply_move(&board, pick).unwrap().0;
                ply += 1;
            }
            if board.empty_count() == empties && !legal_moves(&board).is_empty() {
                return board;
            }
        }
        panic!("no playout reached {empties} empties");
    }

    #[test]
    fn test_exact_children_respect_deadline() {
        // Every root child is a 16-empty solve; depth 1 must not ignore the clock
        let board = midgame_board(17);
        let eval = evaluator(8);
        let mut searcher = Searcher::new(1, 1).with_node_check_interval(64);
        let limits = SearchLimits::depth(30)
            .with_exact_empties(16)
            .with_deadline(Instant::now() + Duration::from_millis(50));
        let result = searcher.search(&board, &eval, Phase::Endgame, &limits);
        assert!(result.elapsed < Duration::from_secs(2), "took {:?}", result.elapsed);
        if result.timed_out {
            assert_eq!(result.depth, 0);
            assert_eq!(result.best_move, None);
        } else {
            assert_eq!(result.depth, 1);
            assert!(decode_margin(result.score).is_some());
        }
    }

    #[test]
    fn test_pass_search_respects_deadline() {
        // Black is walled off from the lone white corner disc
        let board = Board::parse(
            "W B . . . . . .
             B B . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .
             . . . . . . . .",
        )
        .unwrap();
        assert!(legal_moves(&board).is_empty());
        assert!(!is_terminal(&board));
        let eval = evaluator(8);
        let mut searcher = Searcher::new(1, 1).with_node_check_interval(64);
        let limits =
            SearchLimits::depth(60).with_deadline(Instant::now() + Duration::from_millis(50));
        let result = searcher.search(&board, &eval, Phase::Opening, &limits);
        assert!(result.elapsed < Duration::from_secs(2), "took {:?}", result.elapsed);
        assert!(result.timed_out);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, eval.evaluate(&board, Disc::Black));
        assert!(result.score.abs() <= Score::EVAL_LIMIT);
    }

    #[test]
    fn test_join_workers_reports_panics() {
        let (outputs, failed) = std::thread::scope(|s| {
            let handles = vec![
                s.spawn(|| 7),
                s.spawn(|| -> i32 { panic!("worker blew up") }),
                s.spawn(|| 9),
            ];
            join_workers(handles)
        });
        assert_eq!(outputs, vec![7, 9]);
        assert_eq!(failed, 1);
    }

    #[test]
    fn test_search_repeatable() {
        let board = Board::new(6).unwrap();
        let eval = evaluator(6);
        let mut searcher = Searcher::new(1, 1);
        let a = searcher.search(&board, &eval, Phase::Opening, &SearchLimits::depth(4));
        // Second run hits a warm table
        let b = searcher.search(&board, &eval, Phase::Opening, &SearchLimits::depth(4));
        assert_eq!(a.best_move, b.best_move);
        assert_eq!(a.score, b.score);
        assert!(b.stats.tt_score_hits > 0);
    }

    #[test]
    fn test_parallel_matches_single() {
        let board = Board::new(6).unwrap();
        let eval = evaluator(6);
        let single = Searcher::new(1, 1).search(&board, &eval, Phase::Opening, &SearchLimits::depth(4));
        let parallel = Searcher::new(1, 3).search(&board, &eval, Phase::Opening, &SearchLimits::depth(4));
        assert_eq!(single.best_move, parallel.best_move);
        assert_eq!(single.score, parallel.score);
    }

    #[test]
    fn test_stats_rates() {
        let stats = SearchStats {
            beta_cutoffs: 10,
            first_move_cutoffs: 9,
            tt_probes: 4,
            tt_score_hits: 1,
            ..SearchStats::default()
        };
        assert!((stats.first_move_rate() - 90.0).abs() < 1e-9);
        assert!((stats.tt_score_rate() - 25.0).abs() < 1e-9);
    }
}
