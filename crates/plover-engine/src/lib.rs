#![doc = include_str!("../README.md")]

//! Plover pattern generation engine.
//!
//! This crate drives projection, abstract search and flaw detection to
//! grow patterns, and reports the result as [`PatternInformation`].

pub mod cegar;
pub mod flaw;
pub mod generator;
pub mod options;
pub mod random;
pub mod result;
pub mod rng;
mod timeout;

pub use cegar::CegarPatternGenerator;
pub use flaw::{find_flaw, Flaw, FlawKind};
pub use generator::{build_generator, GeneratorError, GeneratorKind, PatternGenerator};
pub use options::{CegarOptions, OptionsError, RandomPatternOptions, SeedStrategy};
pub use random::RandomPatternGenerator;
pub use result::{GenerationStatistics, PatternInformation, RefinementStage, Termination};
pub use rng::{shared_rng, SharedRng};
