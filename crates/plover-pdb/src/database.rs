use plover_task::{Cost, State, Task};

use crate::pattern::Pattern;
use crate::projection::Projection;
use crate::shortest_paths::INFINITE_COST;

/// Goal distances of a projection, indexed by abstract state.
///
/// Looking up the projection of a concrete state gives an admissible
/// estimate of its goal distance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDatabase {
    pattern: Pattern,
    multipliers: Vec<usize>,
    distances: Vec<Cost>,
}

impl PatternDatabase {
    pub fn new(projection: &Projection, distances: Vec<Cost>) -> Self {
        debug_assert_eq!(distances.len(), projection.num_states());
        Self {
            pattern: projection.pattern().clone(),
            multipliers: projection.multipliers().to_vec(),
            distances,
        }
    }

    /// Rebuild a database from a pattern and its distance table.
    pub fn from_distances(pattern: Pattern, task: &Task, distances: Vec<Cost>) -> Self {
        let mut multipliers = Vec::with_capacity(pattern.len());
        let mut multiplier = 1usize;
        for &var in pattern.variables() {
            multipliers.push(multiplier);
            multiplier = multiplier.saturating_mul(task.domain_size(var));
        }
        Self {
            pattern,
            multipliers,
            distances,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn size(&self) -> usize {
        self.distances.len()
    }

    pub fn distances(&self) -> &[Cost] {
        &self.distances
    }

    pub fn abstract_index(&self, state: &State) -> usize {
        self.pattern
            .variables()
            .iter()
            .zip(&self.multipliers)
            .map(|(&var, &mult)| state.get(var) * mult)
            .sum()
    }

    pub fn heuristic_value(&self, state: &State) -> Cost {
        self.distances[self.abstract_index(state)]
    }

    pub fn is_dead_end(&self, state: &State) -> bool {
        self.heuristic_value(state) == INFINITE_COST
    }
}
