//! Othello rules
//!
//! This module implements the rule set the search relies on:
//! - Move legality and disc flipping
//! - Make/unmake with an undo record
//! - Passing, terminal detection and the final result

pub mod game;
pub mod moves;

// Re-exports for convenient access
pub use game::{disc_margin, is_terminal, piece_counts, winner};
pub use moves::{
    apply_move, flips_for, has_legal_move, is_legal, legal_moves, legal_moves_for, make_move,
    mobility, pass, unmake_move, FlipInfo,
};
