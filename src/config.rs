//! Engine configuration
//!
//! Everything tunable lives here: phase thresholds, per-phase depth and
//! time budgets, evaluation weights and positional tables, cache size and
//! thread count. Configuration is plain TOML; omitted keys keep their
//! defaults, and a phase table, when present, must be complete.
//!
//! ```
//! use othello::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(
//!     r#"
//!     exact_solve_empties = 10
//!     threads = 2
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.exact_solve_empties, 10);
//! assert_eq!(config.opening.depth, 6);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::eval::{FeatureWeights, PositionalWeights};
use crate::strategy::Phase;

/// Deepest iteration a phase may request
pub const MAX_SEARCH_DEPTH: i8 = 60;
/// Largest exact-solve window accepted by validation
pub const MAX_EXACT_EMPTIES: u32 = 20;

/// Search budget and evaluation settings for one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyParameters {
    /// Depth bound for iterative deepening
    pub depth: i8,
    /// Time budget per move in milliseconds
    pub time_ms: u64,
    pub weights: FeatureWeights,
    pub positional: PositionalWeights,
}

impl StrategyParameters {
    pub fn opening() -> Self {
        Self {
            depth: 6,
            time_ms: 3000,
            weights: FeatureWeights::opening(),
            positional: PositionalWeights::opening(),
        }
    }

    pub fn midgame() -> Self {
        Self {
            depth: 5,
            time_ms: 5000,
            weights: FeatureWeights::midgame(),
            positional: PositionalWeights::midgame(),
        }
    }

    pub fn endgame() -> Self {
        Self {
            depth: 6,
            time_ms: 5000,
            weights: FeatureWeights::endgame(),
            positional: PositionalWeights::endgame(),
        }
    }

    fn validate(&self, phase: Phase) -> Result<()> {
        if !(1..=MAX_SEARCH_DEPTH).contains(&self.depth) {
            return Err(Error::config(format!(
                "{phase}: depth {} must be between 1 and {MAX_SEARCH_DEPTH}",
                self.depth
            )));
        }
        if self.time_ms == 0 {
            return Err(Error::config(format!("{phase}: time_ms must be positive")));
        }
        if !self.positional.is_symmetric() {
            return Err(Error::config(format!(
                "{phase}: positional quadrant must be symmetric"
            )));
        }
        Ok(())
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Occupancy below which the position counts as opening
    pub early_fraction: f64,
    /// Occupancy above which the position counts as endgame
    pub late_fraction: f64,
    /// Solve exactly once at most this many cells are empty (0 disables)
    pub exact_solve_empties: u32,
    /// Transposition table size; 0 disables the table
    pub tt_size_mb: usize,
    /// Root search threads
    pub threads: usize,
    /// Break move-ordering ties with the history heuristic
    pub use_history: bool,
    /// Nodes between deadline checks
    pub node_check_interval: u64,
    pub opening: StrategyParameters,
    pub midgame: StrategyParameters,
    pub endgame: StrategyParameters,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            early_fraction: 0.25,
            late_fraction: 0.75,
            exact_solve_empties: 8,
            tt_size_mb: 16,
            threads: 1,
            use_history: true,
            node_check_interval: 1024,
            opening: StrategyParameters::opening(),
            midgame: StrategyParameters::midgame(),
            endgame: StrategyParameters::endgame(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parameters of one phase
    pub fn parameters(&self, phase: Phase) -> &StrategyParameters {
        match phase {
            Phase::Opening => &self.opening,
            Phase::Midgame => &self.midgame,
            Phase::Endgame => &self.endgame,
        }
    }

    /// Check value ranges and cross-field constraints
    pub fn validate(&self) -> Result<()> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(self.early_fraction) || !in_unit(self.late_fraction) {
            return Err(Error::config("phase fractions must lie in [0, 1]"));
        }
        if self.early_fraction > self.late_fraction {
            return Err(Error::config(format!(
                "early_fraction {} exceeds late_fraction {}",
                self.early_fraction, self.late_fraction
            )));
        }
        if self.exact_solve_empties > MAX_EXACT_EMPTIES {
            return Err(Error::config(format!(
                "exact_solve_empties {} exceeds {MAX_EXACT_EMPTIES}",
                self.exact_solve_empties
            )));
        }
        if !(1..=64).contains(&self.threads) {
            return Err(Error::config("threads must be between 1 and 64"));
        }
        if self.node_check_interval == 0 {
            return Err(Error::config("node_check_interval must be positive"));
        }
        for phase in Phase::ALL {
            self.parameters(phase).validate(phase)?;
        }
        Ok(())
    }
}
