//! Othello (Reversi) search engine
//!
//! An engine for Othello on any even board from 4x4 to 16x16:
//! - Bitboard positions with make/unmake move application
//! - Phase-aware heuristic evaluation (material, corners, X/C-squares,
//!   edges, mobility, stability, frontier, positional tables)
//! - Negamax alpha-beta search with iterative deepening, a lock-free
//!   transposition table and exact endgame solving
//! - A deterministic greedy fallback whenever search yields no move
//!
//! # Architecture
//!
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Move generation, flipping and game end
//! - [`eval`]: Weights, positional tables, stability and the evaluator
//! - [`search`]: Zobrist hashing, transposition table, ordering, negamax
//! - [`strategy`]: Phase detection, difficulty and the greedy fallback
//! - [`engine`]: Main engine integrating all components
//! - [`config`]: TOML configuration
//!
//! # Quick Start
//!
//! ```
//! use othello::{Board, Difficulty, Disc, Engine};
//!
//! let mut board = Board::new(8).unwrap();
//! let mut engine = Engine::default();
//!
//! let decision = engine.find_best_move(&board, Disc::Black, Difficulty::Easy).unwrap();
//! if let Some(pos) = decision.best_move {
//!     let (next, flipped) = othello::rules::apply_move(&board, pos).unwrap();
//!     println!("Black plays {pos}, flipping {}", flipped.len());
//!     board = next;
//! }
//! assert_eq!(board.side_to_move(), Disc::White);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;
pub mod strategy;

// Re-export commonly used types for convenience
pub use board::{Board, Disc, Pos};
pub use config::{EngineConfig, StrategyParameters};
pub use engine::{Budget, Decision, DecisionState, Engine};
pub use error::{Error, Result};
pub use strategy::{Difficulty, MoveCategory, MoveThreats, Phase, ReplyThreat, Severity};
