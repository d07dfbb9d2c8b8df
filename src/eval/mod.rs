//! Evaluation module for Othello positions
//!
//! This module provides the static evaluation used at search leaves.
//! The evaluation considers:
//! - Material, corners and corner-adjacent squares
//! - Edges and edge runs
//! - Mobility, stability and frontier discs
//! - Phase-specific positional tables

pub mod heuristic;
pub mod stability;
pub mod weights;

pub use heuristic::{EvalBreakdown, Evaluator};
pub use stability::{frontier_discs, stable_discs};
pub use weights::{FeatureWeights, PositionTable, PositionalWeights, Score};
