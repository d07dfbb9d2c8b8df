//! Phase classification, difficulty and the greedy fallback
//!
//! The phase of a position is read from its occupancy: few discs means
//! opening, a nearly full board means endgame. Each phase brings its own
//! depth and time budget and evaluation weights from [`EngineConfig`];
//! difficulty then scales that budget down.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::board::{classify, is_edge, Board, Disc, Pos, SquareKind};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::eval::{stable_discs, FeatureWeights, PositionTable, PositionalWeights};
use crate::rules::{flips_for, legal_moves_for, make_move, mobility};
use crate::search::MoveTier;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Opening,
    Midgame,
    Endgame,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Opening, Phase::Midgame, Phase::Endgame];

    /// Stable index (0, 1, 2)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Phase::Opening => 0,
            Phase::Midgame => 1,
            Phase::Endgame => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Opening => "opening",
            Phase::Midgame => "midgame",
            Phase::Endgame => "endgame",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Playing strength. Scales the phase budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    /// Depth at most 2, no exact endgame solving
    Easy,
    /// Two plies shallower and half the time
    Medium,
    /// Phase parameters unchanged
    #[default]
    Hard,
}

impl Difficulty {
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(Error::parse(format!("unknown difficulty '{other}'"))),
        }
    }
}

/// Everything a search needs for one move request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhasePlan {
    pub phase: Phase,
    pub depth: i8,
    pub time_budget: Duration,
    /// Exact solving window, if solving applies to this request
    pub exact_empties: Option<u32>,
    /// Whether the root position is already inside the exact window
    pub exact_at_root: bool,
    pub weights: FeatureWeights,
    pub positional: PositionalWeights,
}

/// Selects phase, budget and fallback for a position
#[derive(Debug, Clone)]
pub struct PhaseStrategy {
    config: EngineConfig,
}

impl PhaseStrategy {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Phase from the share of occupied cells
    pub fn classify(&self, board: &Board) -> Phase {
        let occupancy = f64::from(board.disc_count()) / f64::from(board.capacity());
        if occupancy < self.config.early_fraction {
            Phase::Opening
        } else if occupancy > self.config.late_fraction {
            Phase::Endgame
        } else {
            Phase::Midgame
        }
    }

    /// Budget and settings for a move request at `difficulty`
    pub fn plan(&self, board: &Board, difficulty: Difficulty) -> PhasePlan {
        let phase = self.classify(board);
        let params = self.config.parameters(phase);
        let base_time = Duration::from_millis(params.time_ms);

        let (depth, time_budget) = match difficulty {
            Difficulty::Easy => (params.depth.min(2), base_time),
            Difficulty::Medium => ((params.depth - 2).max(1), base_time / 2),
            Difficulty::Hard => (params.depth, base_time),
        };

        let exact_empties = match (difficulty, self.config.exact_solve_empties) {
            (Difficulty::Easy, _) | (_, 0) => None,
            (_, n) => Some(n),
        };
        let exact_at_root = exact_empties.is_some_and(|n| board.empty_count() <= n);

        PhasePlan {
            phase,
            depth,
            time_budget,
            exact_empties,
            exact_at_root,
            weights: params.weights,
            positional: params.positional,
        }
    }
}

/// One-ply greedy move choice used when search produced nothing.
///
/// Preference order: a corner; the safe cell with the best positional
/// value (flips break ties); an edge; the first legal move. Deterministic,
/// and `None` only when the side to move has no legal move.
pub fn greedy_move(board: &Board, table: &PositionTable) -> Option<Pos> {
    let color = board.side_to_move();
    let size = board.size();
    let moves = crate::rules::legal_moves(board);
    let flips = |pos: Pos| flips_for(board, pos, color).count();

    if let Some(&corner) = moves
        .iter()
        .find(|&&p| classify(p, size) == SquareKind::Corner)
    {
        return Some(corner);
    }

    let safe = moves
        .iter()
        .copied()
        .filter(|&p| MoveTier::of(board, p) != MoveTier::Risky);
    if let Some(pos) = first_best(safe, |p| (table.get(p), flips(p))) {
        return Some(pos);
    }

    let edges = moves.iter().copied().filter(|&p| is_edge(p, size));
    if let Some(pos) = first_best(edges, flips) {
        return Some(pos);
    }

    moves.first().copied()
}

/// Highest-scoring candidate; the earliest one wins ties
fn first_best<K: Ord>(
    candidates: impl Iterator<Item = Pos>,
    score: impl Fn(Pos) -> K,
) -> Option<Pos> {
    let mut best: Option<(Pos, K)> = None;
    for pos in candidates {
        let s = score(pos);
        if best.as_ref().map_or(true, |(_, b)| s > *b) {
            best = Some((pos, s));
        }
    }
    best.map(|(pos, _)| pos)
}

/// How much an opponent reply hurts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Medium => "medium",
            Severity::High => "high",
        })
    }
}

/// A dangerous opponent answer to one candidate move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyThreat {
    pub reply: Pos,
    /// Discs the reply flips
    pub flips: u32,
    pub takes_corner: bool,
    pub severity: Severity,
}

/// Dangerous replies to one legal move of the side to move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveThreats {
    pub candidate: Pos,
    pub replies: Vec<ReplyThreat>,
}

/// Flip counts from which a reply is listed, and from which it is severe.
/// 3 and 5 on 8x8, 2 and 3 on small boards.
fn flip_thresholds(size: usize) -> (u32, u32) {
    #[allow(clippy::cast_possible_truncation)]
    let size = size as u32;
    ((size * 3 / 8).max(2), (size * 5 / 8).max(3))
}

/// For every legal move of the side to move, the opponent replies that take
/// a corner or flip many discs.
///
/// Corner replies are always [`Severity::High`]. Moves without dangerous
/// replies are left out; the rest keep legal move order.
pub fn reply_threats(board: &Board) -> Vec<MoveThreats> {
    let size = board.size();
    let opponent = board.side_to_move().opponent();
    let (listed, severe) = flip_thresholds(size);

    let mut threats = Vec::new();
    for candidate in crate::rules::legal_moves(board) {
        let mut after = board.clone();
        make_move(&mut after, candidate);

        let replies: Vec<ReplyThreat> = legal_moves_for(&after, opponent)
            .into_iter()
            .filter_map(|reply| {
                let flips = flips_for(&after, reply, opponent).count();
                let takes_corner = classify(reply, size) == SquareKind::Corner;
                if !takes_corner && flips < listed {
                    return None;
                }
                let severity = if takes_corner || flips >= severe {
                    Severity::High
                } else {
                    Severity::Medium
                };
                Some(ReplyThreat {
                    reply,
                    flips,
                    takes_corner,
                    severity,
                })
            })
            .collect();

        if !replies.is_empty() {
            threats.push(MoveThreats { candidate, replies });
        }
    }
    threats
}

/// Strategic class of a chosen move, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveCategory {
    Corner,
    XSquare,
    CSquare,
    Edge,
    /// Reduces the opponent's mobility
    MobilityControl,
    /// Adds stable discs
    StabilityBuilding,
    Central,
}

impl MoveCategory {
    /// Classify `pos` as played by the side to move on `board`
    pub fn classify(board: &Board, pos: Pos) -> Self {
        let size = board.size();
        match classify(pos, size) {
            SquareKind::Corner => return MoveCategory::Corner,
            SquareKind::XSquare => return MoveCategory::XSquare,
            SquareKind::CSquare => return MoveCategory::CSquare,
            SquareKind::Edge => return MoveCategory::Edge,
            SquareKind::Interior => {}
        }

        let color = board.side_to_move();
        let opponent = color.opponent();
        let mut after = board.clone();
        make_move(&mut after, pos);

        if stable_discs(&after, color).count() > stable_discs(board, color).count() {
            MoveCategory::StabilityBuilding
        } else if mobility(&after, opponent) < mobility(board, opponent) {
            MoveCategory::MobilityControl
        } else {
            MoveCategory::Central
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MoveCategory::Corner => "takes a corner, which can never be flipped",
            MoveCategory::XSquare => "takes an X-square diagonal to a corner",
            MoveCategory::CSquare => "takes a C-square next to a corner",
            MoveCategory::Edge => "takes an edge, which is harder for the opponent to flip",
            MoveCategory::MobilityControl => "restricts the opponent's choice of moves",
            MoveCategory::StabilityBuilding => "adds discs that can no longer be flipped",
            MoveCategory::Central => "develops the centre",
        }
    }
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Checks that `player` can be asked to move
pub(crate) fn require_player(player: Disc) -> Result<Disc> {
    match player {
        Disc::Empty => Err(Error::InvalidPlayer {
            name: player.name(),
        }),
        side => Ok(side),
    }
}
