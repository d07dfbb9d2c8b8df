//! Search module for the Othello engine
//!
//! Contains:
//! - Zobrist hashing for position identification
//! - Transposition table for caching search results
//! - Move ordering (tiers, positional values, history)
//! - Negamax alpha-beta search with iterative deepening

pub mod alphabeta;
pub mod ordering;
pub mod tt;
pub mod zobrist;

pub use alphabeta::{
    decode_margin, terminal_score, SearchLimits, SearchResult, SearchStats, Searcher,
};
pub use ordering::{MoveOrderer, MoveTier};
pub use tt::{EntryType, TTEntry, TTStats, TranspositionTable};
pub use zobrist::ZobristTable;
