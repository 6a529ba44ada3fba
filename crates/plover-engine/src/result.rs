//! Generator output and statistics.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use plover_pdb::{Pattern, PatternDatabase, INFINITE_COST};
use plover_task::{Cost, Task, VariableId};

use crate::flaw::FlawKind;

/// Why a generator stopped growing its pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The optimal abstract plan is a valid concrete plan.
    Converged,
    /// The abstract initial state cannot reach an abstract goal.
    Unsolvable,
    /// Every variable that could fix the last flaw exceeds `max_pdb_size`.
    SizeBlocked,
    /// The wall-clock budget ran out.
    TimedOut,
    /// The configured number of refinements was reached.
    RefinementLimit,
    /// Every variable responsible for the last flaw is blacklisted.
    Blacklisted,
    /// The random walk cannot reach a variable outside the pattern.
    NeighborhoodExhausted,
}

impl Termination {
    /// Stable machine-readable reason code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::Converged => "converged",
            Termination::Unsolvable => "unsolvable",
            Termination::SizeBlocked => "size_blocked",
            Termination::TimedOut => "timed_out",
            Termination::RefinementLimit => "refinement_limit",
            Termination::Blacklisted => "blacklisted",
            Termination::NeighborhoodExhausted => "neighborhood_exhausted",
        }
    }

    /// Whether refinement stopped because no further refinement is
    /// warranted, as opposed to running out of budget.
    pub fn is_converged(&self) -> bool {
        matches!(self, Termination::Converged | Termination::Unsolvable)
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One committed pattern in a generator run (stage 0 = seed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefinementStage {
    pub iteration: usize,
    pub pattern: Pattern,
    pub abstract_states: usize,
    /// Variable added by this stage; `None` for the seed.
    pub added_variable: Option<VariableId>,
    /// Kind of flaw that triggered this stage, for CEGAR refinements.
    pub flaw: Option<FlawKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStatistics {
    pub generator: &'static str,
    /// Number of variables added after the seed.
    pub refinements: usize,
    pub elapsed_secs: f64,
    /// Number of abstract states of the final pattern.
    pub abstract_states: usize,
    pub termination: Termination,
    pub history: Vec<RefinementStage>,
}

impl GenerationStatistics {
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_secs)
    }
}

/// A generated pattern with its abstract goal distances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternInformation {
    pub pattern: Pattern,
    /// Goal distance per abstract state index; `INFINITE_COST` for dead ends.
    pub distances: Vec<Cost>,
    /// Goal distance of the abstract initial state.
    pub initial_distance: Cost,
    pub statistics: GenerationStatistics,
}

impl PatternInformation {
    pub fn termination(&self) -> Termination {
        self.statistics.termination
    }

    /// Heuristic lookup table for concrete states of `task`.
    pub fn database(&self, task: &Task) -> PatternDatabase {
        PatternDatabase::from_distances(self.pattern.clone(), task, self.distances.clone())
    }

    /// Committed patterns in order, starting with the seed.
    pub fn pattern_sequence(&self) -> Vec<Pattern> {
        self.statistics
            .history
            .iter()
            .map(|stage| stage.pattern.clone())
            .collect()
    }
}

impl fmt::Display for PatternInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.statistics;
        writeln!(
            f,
            "Pattern {} ({} abstract states)",
            self.pattern, stats.abstract_states
        )?;
        writeln!(f, "  Generator: {}", stats.generator)?;
        writeln!(f, "  Termination: {}", stats.termination)?;
        writeln!(f, "  Refinements: {}", stats.refinements)?;
        if self.initial_distance == INFINITE_COST {
            writeln!(f, "  h(init): infinity")?;
        } else {
            writeln!(f, "  h(init): {}", self.initial_distance)?;
        }
        writeln!(f, "  Elapsed: {:.3}s", stats.elapsed_secs)?;
        write!(f, "  History:")?;
        for stage in &stats.history {
            write!(f, "\n    #{} {}", stage.iteration, stage.pattern)?;
            if let Some(var) = stage.added_variable {
                write!(f, " (+v{var}")?;
                if let Some(kind) = stage.flaw {
                    write!(f, ", {kind} flaw")?;
                }
                write!(f, ")")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PatternInformation {
        PatternInformation {
            pattern: Pattern::new(vec![0, 1]),
            distances: vec![2, 1, 1, 0],
            initial_distance: 2,
            statistics: GenerationStatistics {
                generator: "cegar",
                refinements: 1,
                elapsed_secs: 0.25,
                abstract_states: 4,
                termination: Termination::Converged,
                history: vec![
                    RefinementStage {
                        iteration: 0,
                        pattern: Pattern::single(0),
                        abstract_states: 2,
                        added_variable: None,
                        flaw: None,
                    },
                    RefinementStage {
                        iteration: 1,
                        pattern: Pattern::new(vec![0, 1]),
                        abstract_states: 4,
                        added_variable: Some(1),
                        flaw: Some(FlawKind::Precondition),
                    },
                ],
            },
        }
    }

    #[test]
    fn display_summarises_run() {
        let rendered = sample().to_string();
        assert!(rendered.starts_with("Pattern {0, 1} (4 abstract states)"));
        assert!(rendered.contains("Termination: converged"));
        assert!(rendered.contains("#1 {0, 1} (+v1, precondition flaw)"));
        assert!(rendered.contains("h(init): 2"));
    }

    #[test]
    fn json_uses_reason_codes() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["statistics"]["termination"], "converged");
        assert_eq!(json["pattern"], serde_json::json!([0, 1]));
        assert_eq!(json["statistics"]["history"][1]["flaw"], "precondition");
    }

    #[test]
    fn convergence_classification() {
        assert!(Termination::Converged.is_converged());
        assert!(Termination::Unsolvable.is_converged());
        assert!(!Termination::SizeBlocked.is_converged());
        assert!(!Termination::TimedOut.is_converged());
        assert_eq!(Termination::SizeBlocked.to_string(), "size_blocked");
    }

    #[test]
    fn pattern_sequence_lists_history() {
        let info = sample();
        assert_eq!(
            info.pattern_sequence(),
            vec![Pattern::single(0), Pattern::new(vec![0, 1])]
        );
        assert_eq!(info.statistics.elapsed(), Duration::from_millis(250));
    }
}
