//! The generator interface shared by all pattern generators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use plover_pdb::ProjectionError;
use plover_task::Task;

use crate::cegar::CegarPatternGenerator;
use crate::options::{CegarOptions, OptionsError, RandomPatternOptions};
use crate::random::RandomPatternGenerator;
use crate::result::PatternInformation;
use crate::rng::SharedRng;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("invalid generator options: {0}")]
    InvalidOptions(#[from] OptionsError),
    #[error("task has no variables")]
    EmptyTask,
    #[error("no seed variable fits into {limit} abstract states")]
    NoSeedFits { limit: usize },
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

/// Something that turns a task into a single pattern with its distances.
///
/// Generators keep no state between calls apart from their random source.
pub trait PatternGenerator {
    fn name(&self) -> &'static str;

    fn generate(&self, task: &Task) -> Result<PatternInformation, GeneratorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    #[default]
    Cegar,
    Random,
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorKind::Cegar => write!(f, "cegar"),
            GeneratorKind::Random => write!(f, "random"),
        }
    }
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cegar" => Ok(GeneratorKind::Cegar),
            "random" => Ok(GeneratorKind::Random),
            other => Err(format!(
                "unknown generator '{other}' (expected 'cegar' or 'random')"
            )),
        }
    }
}

/// Build a generator of the given kind that draws from `rng`.
///
/// The random generator inherits the size and time budgets of `options`.
pub fn build_generator(
    kind: GeneratorKind,
    options: &CegarOptions,
    rng: SharedRng,
) -> Box<dyn PatternGenerator> {
    match kind {
        GeneratorKind::Cegar => Box::new(CegarPatternGenerator::new(options.clone(), rng)),
        GeneratorKind::Random => Box::new(RandomPatternGenerator::new(
            RandomPatternOptions::from(options),
            rng,
        )),
    }
}
