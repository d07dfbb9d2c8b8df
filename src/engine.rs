//! Move decision engine
//!
//! [`Engine`] ties the pieces together for one move request: it detects the
//! game phase, builds the evaluator and search limits for that phase and
//! difficulty, runs iterative deepening and falls back to a one-ply greedy
//! choice when the search produced no move.
//!
//! A request walks through these states:
//!
//! ```text
//! Idle -> PhaseDetected -> Searching -> ResultReady
//!                                    -> FallbackResult
//!                       -> NoMoves
//! ```
//!
//! # Example
//!
//! ```
//! use othello::{Board, Difficulty, Disc, Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//! let board = Board::new(6).unwrap();
//!
//! let decision = engine.find_best_move(&board, Disc::Black, Difficulty::Easy).unwrap();
//! let pos = decision.best_move.unwrap();
//! assert!(othello::rules::is_legal(&board, pos, Disc::Black));
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use crate::board::{Board, Disc, Pos};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::eval::Evaluator;
use crate::rules::{is_legal, is_terminal, legal_moves, make_move};
use crate::search::{decode_margin, SearchLimits, SearchStats, Searcher, TTStats};
use crate::strategy::{
    greedy_move, reply_threats, require_player, Difficulty, MoveCategory, MoveThreats, Phase,
    PhaseStrategy,
};

/// Where the engine is in handling a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionState {
    Idle,
    PhaseDetected,
    Searching,
    /// The search produced the move
    ResultReady,
    /// The greedy fallback produced the move
    FallbackResult,
    /// The side to move has no legal move; it must pass
    NoMoves,
}

impl fmt::Display for DecisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecisionState::Idle => "idle",
            DecisionState::PhaseDetected => "phase detected",
            DecisionState::Searching => "searching",
            DecisionState::ResultReady => "result ready",
            DecisionState::FallbackResult => "fallback result",
            DecisionState::NoMoves => "no moves",
        };
        f.write_str(name)
    }
}

/// Caller overrides of the phase budget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Budget {
    /// Replaces the phase depth bound
    pub depth: Option<i8>,
    /// Replaces the phase time budget
    pub time: Option<Duration>,
}

impl Budget {
    #[must_use]
    pub fn depth(depth: i8) -> Self {
        Self {
            depth: Some(depth),
            time: None,
        }
    }

    #[must_use]
    pub fn with_time(mut self, time: Duration) -> Self {
        self.time = Some(time);
        self
    }
}

/// Outcome of a move request
#[derive(Debug, Clone)]
pub struct Decision {
    /// Chosen move; `None` when the side to move must pass
    pub best_move: Option<Pos>,
    /// Score for the side to move
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    /// The move came from the greedy fallback rather than the search
    pub used_fallback: bool,
    /// Last completed search depth
    pub depth: i8,
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub state: DecisionState,
    pub category: Option<MoveCategory>,
    /// The time budget cut iterative deepening short
    pub timed_out: bool,
    pub stats: SearchStats,
    /// Opponent replies that punish each candidate move
    pub threats: Vec<MoveThreats>,
}

impl Decision {
    /// Final disc margin for the side to move, when the score is a proven
    /// game result
    pub fn proven_margin(&self) -> Option<i32> {
        decode_margin(self.score)
    }
}

/// Othello move engine.
///
/// Keeps its transposition table between requests. Changing the
/// configuration clears it.
pub struct Engine {
    config: EngineConfig,
    strategy: PhaseStrategy,
    searcher: Searcher,
    state: DecisionState,
}

impl Engine {
    /// Create an engine after validating `config`
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            strategy: PhaseStrategy::new(&config),
            searcher: Self::make_searcher(&config),
            config,
            state: DecisionState::Idle,
        }
    }

    fn make_searcher(config: &EngineConfig) -> Searcher {
        if config.tt_size_mb == 0 {
            log::warn!("transposition table disabled, every node is searched without cache");
        }
        Searcher::new(config.tt_size_mb, config.threads)
            .with_history(config.use_history)
            .with_node_check_interval(config.node_check_interval)
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// State reached by the last request
    #[inline]
    pub fn state(&self) -> DecisionState {
        self.state
    }

    /// Replace the configuration. Cached results were computed with the old
    /// weights, so the searcher starts over with an empty table.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<()> {
        config.validate()?;
        self.searcher = Self::make_searcher(&config);
        self.strategy = PhaseStrategy::new(&config);
        self.config = config;
        self.state = DecisionState::Idle;
        Ok(())
    }

    /// Forget cached search results, e.g. for a new game
    pub fn clear_cache(&mut self) {
        self.searcher.clear_tt();
    }

    pub fn tt_stats(&self) -> Option<TTStats> {
        self.searcher.tt_stats()
    }

    /// Best move for `player` in `board`, using the phase budget scaled
    /// by `difficulty`.
    ///
    /// The side to move stored in `board` is ignored. Fails only when
    /// `player` is [`Disc::Empty`]; having no legal move yields a
    /// [`DecisionState::NoMoves`] decision.
    pub fn find_best_move(
        &mut self,
        board: &Board,
        player: Disc,
        difficulty: Difficulty,
    ) -> Result<Decision> {
        self.find_best_move_with_budget(board, player, difficulty, Budget::default())
    }

    /// [`find_best_move`](Self::find_best_move) with depth or time overrides
    pub fn find_best_move_with_budget(
        &mut self,
        board: &Board,
        player: Disc,
        difficulty: Difficulty,
        budget: Budget,
    ) -> Result<Decision> {
        let player = require_player(player)?;
        let start = Instant::now();
        self.state = DecisionState::Idle;

        let mut position = board.clone();
        position.set_side_to_move(player);

        let mut plan = self.strategy.plan(&position, difficulty);
        if let Some(depth) = budget.depth {
            plan.depth = depth.max(1);
        }
        if let Some(time) = budget.time {
            plan.time_budget = time;
        }
        self.transition(DecisionState::PhaseDetected);
        log::debug!(
            "{} phase, {difficulty}: depth {} within {:?}{}",
            plan.phase,
            plan.depth,
            plan.time_budget,
            if plan.exact_at_root { ", solving exactly" } else { "" }
        );

        let evaluator = Evaluator::new(plan.weights, &plan.positional, position.size());
        let mut limits =
            SearchLimits::depth(plan.depth).with_deadline(start + plan.time_budget);
        if let Some(empties) = plan.exact_empties {
            limits = limits.with_exact_empties(empties);
        }

        let moves = legal_moves(&position);
        self.transition(DecisionState::Searching);
        let result = self.searcher.search(&position, &evaluator, plan.phase, &limits);

        let mut decision = Decision {
            best_move: None,
            score: result.score,
            nodes: result.nodes,
            elapsed: Duration::ZERO,
            used_fallback: false,
            depth: result.depth,
            phase: plan.phase,
            difficulty,
            state: DecisionState::NoMoves,
            category: None,
            timed_out: result.timed_out,
            stats: result.stats,
            threats: Vec::new(),
        };

        if moves.is_empty() {
            self.transition(DecisionState::NoMoves);
            log::info!(
                "{} has no legal move{}",
                player.name(),
                if is_terminal(&position) { ", game over" } else { ", passing" }
            );
            decision.elapsed = start.elapsed();
            return Ok(decision);
        }

        match result.best_move.filter(|&pos| is_legal(&position, pos, player)) {
            Some(pos) => {
                decision.best_move = Some(pos);
                decision.state = DecisionState::ResultReady;
            }
            None => {
                // Legal moves exist, so the fallback always finds one
                let pos = greedy_move(&position, evaluator.table()).unwrap_or(moves[0]);
                log::warn!(
                    "search produced no move at {} phase, using greedy fallback {pos}",
                    plan.phase
                );
                let mut after = position.clone();
                make_move(&mut after, pos);
                decision.best_move = Some(pos);
                decision.score = -evaluator.evaluate(&after, player.opponent());
                decision.used_fallback = true;
                decision.state = DecisionState::FallbackResult;
            }
        }
        self.transition(decision.state);

        decision.category = decision
            .best_move
            .map(|pos| MoveCategory::classify(&position, pos));
        decision.threats = reply_threats(&position);
        decision.elapsed = start.elapsed();

        if let Some(pos) = decision.best_move {
            log::info!(
                "{} plays {pos} (score {}, depth {}, {} nodes, {:?})",
                player.name(),
                decision.score,
                decision.depth,
                decision.nodes,
                decision.elapsed
            );
        }
        Ok(decision)
    }

    fn transition(&mut self, next: DecisionState) {
        log::debug!("engine: {} -> {}", self.state, next);
        self.state = next;
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}
