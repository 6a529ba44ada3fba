//! Generator configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use plover_task::VariableId;

use crate::timeout::check_max_time;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error("max_pdb_size must be positive")]
    ZeroPdbSize,
    #[error("max_time must be a non-negative number of seconds, got {0}")]
    InvalidMaxTime(f64),
    #[error("seed variable {var} out of range (task has {num_variables} variables)")]
    SeedVariableOutOfRange {
        var: VariableId,
        num_variables: usize,
    },
}

/// How the CEGAR generator picks its single-variable starting pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStrategy {
    /// A uniformly chosen goal variable.
    #[default]
    RandomGoal,
    /// The first variable mentioned by the goal.
    FirstGoal,
    /// A uniformly chosen task variable.
    RandomVariable,
    /// A fixed variable.
    Variable(VariableId),
}

/// Options for [`CegarPatternGenerator`](crate::CegarPatternGenerator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CegarOptions {
    /// Maximum number of abstract states of the produced pattern.
    pub max_pdb_size: usize,
    /// Wall-clock refinement budget in seconds; `None` is unlimited.
    pub max_time: Option<f64>,
    /// Accept any tied optimal abstract operator at each plan step.
    pub use_wildcard_plans: bool,
    /// Seed for tie-breaking; `None` seeds from OS entropy.
    pub random_seed: Option<u64>,
    /// Maximum number of committed refinements; `None` is unlimited.
    pub max_refinements: Option<usize>,
    /// Variables that refinement never adds.
    pub blacklist: Vec<VariableId>,
    pub seed_strategy: SeedStrategy,
}

impl Default for CegarOptions {
    fn default() -> Self {
        Self {
            max_pdb_size: 1_000_000,
            max_time: None,
            use_wildcard_plans: true,
            random_seed: None,
            max_refinements: None,
            blacklist: Vec::new(),
            seed_strategy: SeedStrategy::RandomGoal,
        }
    }
}

impl CegarOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_pdb_size == 0 {
            return Err(OptionsError::ZeroPdbSize);
        }
        check_max_time(self.max_time)
    }

    pub fn is_blacklisted(&self, var: VariableId) -> bool {
        self.blacklist.contains(&var)
    }
}

/// Options for [`RandomPatternGenerator`](crate::RandomPatternGenerator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomPatternOptions {
    pub max_pdb_size: usize,
    pub max_time: Option<f64>,
    pub random_seed: Option<u64>,
    /// Walk along causal-graph arcs in both directions instead of only
    /// towards predecessors.
    pub bidirectional: bool,
}

impl Default for RandomPatternOptions {
    fn default() -> Self {
        Self {
            max_pdb_size: 1_000_000,
            max_time: None,
            random_seed: None,
            bidirectional: true,
        }
    }
}

impl RandomPatternOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_pdb_size == 0 {
            return Err(OptionsError::ZeroPdbSize);
        }
        check_max_time(self.max_time)
    }
}

impl From<&CegarOptions> for RandomPatternOptions {
    fn from(options: &CegarOptions) -> Self {
        Self {
            max_pdb_size: options.max_pdb_size,
            max_time: options.max_time,
            random_seed: options.random_seed,
            ..Self::default()
        }
    }
}
