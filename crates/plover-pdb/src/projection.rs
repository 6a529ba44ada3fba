//! Projection of a task onto a pattern.
//!
//! Abstract states are total assignments to the pattern's variables, ranked
//! as mixed-radix integers: `index = sum(value_i * multiplier_i)` with the
//! pattern's variables in canonical order.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use plover_task::{Cost, OperatorId, State, Task, Value, VariableId};

use crate::pattern::Pattern;
use crate::shortest_paths::WeightedGraph;

pub type AbstractOperatorId = usize;

/// A concrete operator restricted to the pattern variables.
///
/// Conditions are `(pattern position, value)` pairs sorted by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractOperator {
    pub preconditions: Vec<(usize, Value)>,
    pub effects: Vec<(usize, Value)>,
    pub cost: Cost,
    /// Concrete operators that project onto this operator, ascending.
    pub concrete_operators: Vec<OperatorId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("Cannot project onto an empty pattern")]
    EmptyPattern,
    #[error("Pattern {pattern} references unknown variable {var}")]
    UnknownVariable { pattern: Pattern, var: VariableId },
    #[error("Projection onto {pattern} exceeds the limit of {limit} abstract states")]
    SizeOverflow { pattern: Pattern, limit: usize },
}

type OperatorKey = (Vec<(usize, Value)>, Vec<(usize, Value)>, Cost);

/// The abstract transition system induced by a pattern.
#[derive(Debug, Clone)]
pub struct Projection {
    pattern: Pattern,
    domain_sizes: Vec<usize>,
    multipliers: Vec<usize>,
    num_states: usize,
    operators: Vec<AbstractOperator>,
    concrete_to_abstract: Vec<Option<AbstractOperatorId>>,
    goal: Vec<(usize, Value)>,
    initial_state: usize,
}

impl Projection {
    /// Project `task` onto `pattern`.
    ///
    /// Fails with [`ProjectionError::SizeOverflow`] when the pattern induces
    /// more than `max_states` abstract states. Operators with no effect on
    /// the pattern are dropped, and operators that project identically
    /// (same conditions and cost) share one abstract operator.
    pub fn build(pattern: &Pattern, task: &Task, max_states: usize) -> Result<Self, ProjectionError> {
        if pattern.is_empty() {
            return Err(ProjectionError::EmptyPattern);
        }
        if let Some(&var) = pattern
            .variables()
            .iter()
            .find(|&&var| var >= task.num_variables())
        {
            return Err(ProjectionError::UnknownVariable {
                pattern: pattern.clone(),
                var,
            });
        }
        let num_states = match pattern.num_abstract_states(task) {
            Some(size) if size <= max_states => size,
            _ => {
                return Err(ProjectionError::SizeOverflow {
                    pattern: pattern.clone(),
                    limit: max_states,
                })
            }
        };

        let domain_sizes: Vec<usize> = pattern
            .variables()
            .iter()
            .map(|&var| task.domain_size(var))
            .collect();
        let mut multipliers = Vec::with_capacity(domain_sizes.len());
        let mut multiplier = 1usize;
        for &size in &domain_sizes {
            multipliers.push(multiplier);
            multiplier *= size;
        }

        let mut by_key: IndexMap<OperatorKey, AbstractOperatorId> = IndexMap::new();
        let mut operators: Vec<AbstractOperator> = Vec::new();
        let mut concrete_to_abstract = Vec::with_capacity(task.num_operators());
        for (op_id, op) in task.operators.iter().enumerate() {
            let mut preconditions: Vec<(usize, Value)> = op
                .preconditions
                .iter()
                .filter_map(|fact| pattern.position(fact.var).map(|pos| (pos, fact.value)))
                .collect();
            preconditions.sort_unstable();
            let mut effects: Vec<(usize, Value)> = op
                .effects
                .iter()
                .filter(|fact| op.precondition_value(fact.var) != Some(fact.value))
                .filter_map(|fact| pattern.position(fact.var).map(|pos| (pos, fact.value)))
                .collect();
            effects.sort_unstable();

            if effects.is_empty() {
                concrete_to_abstract.push(None);
                continue;
            }

            let key = (preconditions, effects, op.cost);
            let id = match by_key.get(&key) {
                Some(&id) => {
                    operators[id].concrete_operators.push(op_id);
                    id
                }
                None => {
                    let id = operators.len();
                    operators.push(AbstractOperator {
                        preconditions: key.0.clone(),
                        effects: key.1.clone(),
                        cost: op.cost,
                        concrete_operators: vec![op_id],
                    });
                    by_key.insert(key, id);
                    id
                }
            };
            concrete_to_abstract.push(Some(id));
        }

        let mut goal: Vec<(usize, Value)> = task
            .goal
            .iter()
            .filter_map(|fact| pattern.position(fact.var).map(|pos| (pos, fact.value)))
            .collect();
        goal.sort_unstable();

        let mut projection = Self {
            pattern: pattern.clone(),
            domain_sizes,
            multipliers,
            num_states,
            operators,
            concrete_to_abstract,
            goal,
            initial_state: 0,
        };
        projection.initial_state = projection.rank(&task.initial_state());

        debug!(
            "Projected onto {}: {} abstract states, {} abstract operators",
            projection.pattern,
            projection.num_states,
            projection.operators.len()
        );
        Ok(projection)
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn multipliers(&self) -> &[usize] {
        &self.multipliers
    }

    pub fn domain_sizes(&self) -> &[usize] {
        &self.domain_sizes
    }

    pub fn initial_state(&self) -> usize {
        self.initial_state
    }

    pub fn operators(&self) -> &[AbstractOperator] {
        &self.operators
    }

    pub fn operator(&self, id: AbstractOperatorId) -> &AbstractOperator {
        &self.operators[id]
    }

    /// The abstract operator `concrete` projects onto, if it affects the
    /// pattern.
    pub fn abstract_operator_of(&self, concrete: OperatorId) -> Option<AbstractOperatorId> {
        self.concrete_to_abstract.get(concrete).copied().flatten()
    }

    /// Index of the abstract state a concrete state projects to.
    pub fn rank(&self, state: &State) -> usize {
        self.pattern
            .variables()
            .iter()
            .zip(&self.multipliers)
            .map(|(&var, &mult)| state.get(var) * mult)
            .sum()
    }

    pub fn unrank(&self, index: usize) -> Vec<Value> {
        (0..self.pattern.len())
            .map(|pos| self.value_of(index, pos))
            .collect()
    }

    /// Value of the pattern variable at `position` in abstract state `index`.
    pub fn value_of(&self, index: usize, position: usize) -> Value {
        (index / self.multipliers[position]) % self.domain_sizes[position]
    }

    /// Whether `index` agrees with every goal fact on a pattern variable.
    pub fn is_goal(&self, index: usize) -> bool {
        self.goal
            .iter()
            .all(|&(pos, value)| self.value_of(index, pos) == value)
    }

    pub fn goal_states(&self) -> Vec<usize> {
        (0..self.num_states).filter(|&s| self.is_goal(s)).collect()
    }

    pub fn is_applicable(&self, index: usize, op: AbstractOperatorId) -> bool {
        self.operators[op]
            .preconditions
            .iter()
            .all(|&(pos, value)| self.value_of(index, pos) == value)
    }

    /// Successor of `index` under `op`, or `None` if `op` is not applicable.
    pub fn successor(&self, index: usize, op: AbstractOperatorId) -> Option<usize> {
        if !self.is_applicable(index, op) {
            return None;
        }
        let mut next = index;
        for &(pos, value) in &self.operators[op].effects {
            let mult = self.multipliers[pos];
            next -= self.value_of(index, pos) * mult;
            next += value * mult;
        }
        Some(next)
    }

    /// All non-self-loop abstract transitions, labelled with the abstract
    /// operator id. Edges are inserted by source state, then operator id.
    pub fn transition_graph(&self) -> WeightedGraph {
        let mut graph = WeightedGraph::new(self.num_states);
        for state in 0..self.num_states {
            for (id, op) in self.operators.iter().enumerate() {
                if let Some(next) = self.successor(state, id) {
                    if next != state {
                        graph.add_edge(state, next, op.cost, id);
                    }
                }
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plover_task::{FactPair, Operator, Variable};

    /// v0 in {0,1}, v1 in {0,1,2}, v2 in {0,1}; goal v0=1, v1=2.
    fn sample_task() -> Task {
        let mut task = Task::new();
        task.add_variable(Variable::new("v0", 2));
        task.add_variable(Variable::new("v1", 3));
        task.add_variable(Variable::new("v2", 2));
        // 0: v1=0 -> v1=1
        task.add_operator(Operator::new(
            "inc-a",
            vec![FactPair::new(1, 0)],
            vec![FactPair::new(1, 1)],
            1,
        ));
        // 1: v1=1, v2=1 -> v1=2
        task.add_operator(Operator::new(
            "inc-b",
            vec![FactPair::new(1, 1), FactPair::new(2, 1)],
            vec![FactPair::new(1, 2)],
            1,
        ));
        // 2: -> v2=1 (irrelevant to pattern {0, 1})
        task.add_operator(Operator::new("set-v2", vec![], vec![FactPair::new(2, 1)], 1));
        // 3: v1=2 -> v0=1
        task.add_operator(Operator::new(
            "finish",
            vec![FactPair::new(1, 2)],
            vec![FactPair::new(0, 1)],
            2,
        ));
        // 4: same projection onto {0, 1} as operator 1
        task.add_operator(Operator::new(
            "inc-b-alt",
            vec![FactPair::new(1, 1), FactPair::new(2, 0)],
            vec![FactPair::new(1, 2)],
            1,
        ));
        // 5: v0=1 -> v0=1 (prevail only on the pattern)
        task.add_operator(Operator::new(
            "noop-on-v0",
            vec![FactPair::new(0, 1)],
            vec![FactPair::new(0, 1), FactPair::new(2, 0)],
            1,
        ));
        task.initial_state = vec![0, 0, 0];
        task.goal = vec![FactPair::new(0, 1), FactPair::new(1, 2)];
        task
    }

    #[test]
    fn mixed_radix_ranking_roundtrips() {
        let task = sample_task();
        let projection = Projection::build(&Pattern::new(vec![0, 1]), &task, 100).unwrap();
        assert_eq!(projection.num_states(), 6);
        assert_eq!(projection.multipliers(), &[1, 2]);
        let state = State::new(vec![1, 2, 0]);
        assert_eq!(projection.rank(&state), 1 + 2 * 2);
        assert_eq!(projection.unrank(5), vec![1, 2]);
        for index in 0..projection.num_states() {
            let values = projection.unrank(index);
            let concrete = State::new(vec![values[0], values[1], 0]);
            assert_eq!(projection.rank(&concrete), index);
        }
    }

    #[test]
    fn operators_are_projected_deduplicated_and_pruned() {
        let task = sample_task();
        let projection = Projection::build(&Pattern::new(vec![0, 1]), &task, 100).unwrap();
        // inc-a, inc-b (+ inc-b-alt), finish
        assert_eq!(projection.operators().len(), 3);
        assert_eq!(projection.abstract_operator_of(2), None);
        assert_eq!(projection.abstract_operator_of(5), None);
        let merged = projection.abstract_operator_of(1).unwrap();
        assert_eq!(projection.abstract_operator_of(4), Some(merged));
        assert_eq!(projection.operator(merged).concrete_operators, vec![1, 4]);
        assert_eq!(projection.operator(merged).preconditions, vec![(1, 1)]);
        let finish = projection.abstract_operator_of(3).unwrap();
        assert_eq!(projection.operator(finish).cost, 2);
    }

    #[test]
    fn goal_states_respect_only_pattern_variables() {
        let task = sample_task();
        let projection = Projection::build(&Pattern::single(0), &task, 100).unwrap();
        assert_eq!(projection.goal_states(), vec![1]);

        let projection = Projection::build(&Pattern::single(2), &task, 100).unwrap();
        // The goal is silent on v2: every value is goal-compatible.
        assert_eq!(projection.goal_states(), vec![0, 1]);
    }

    #[test]
    fn successors_follow_effect_deltas() {
        let task = sample_task();
        let projection = Projection::build(&Pattern::new(vec![0, 1]), &task, 100).unwrap();
        let inc_a = projection.abstract_operator_of(0).unwrap();
        let finish = projection.abstract_operator_of(3).unwrap();
        assert_eq!(projection.successor(0, inc_a), Some(2));
        assert_eq!(projection.successor(2, inc_a), None);
        assert_eq!(projection.successor(4, finish), Some(5));
        assert_eq!(projection.initial_state(), 0);
    }

    #[test]
    fn transition_graph_skips_self_loops() {
        let mut task = sample_task();
        // Writes v1=2 without requiring anything: a self-loop in states with v1=2.
        task.add_operator(Operator::new("force", vec![], vec![FactPair::new(1, 2)], 1));
        let projection = Projection::build(&Pattern::single(1), &task, 100).unwrap();
        let graph = projection.transition_graph();
        assert!(graph.edges().iter().all(|e| e.source != e.target));
        let force = projection.abstract_operator_of(6).unwrap();
        let force_edges = graph.edges().iter().filter(|e| e.label == force).count();
        assert_eq!(force_edges, 2);
    }

    #[test]
    fn oversized_and_invalid_patterns_are_rejected() {
        let task = sample_task();
        assert_eq!(
            Projection::build(&Pattern::new(vec![0, 1]), &task, 5).unwrap_err(),
            ProjectionError::SizeOverflow {
                pattern: Pattern::new(vec![0, 1]),
                limit: 5
            }
        );
        assert_eq!(
            Projection::build(&Pattern::default(), &task, 5).unwrap_err(),
            ProjectionError::EmptyPattern
        );
        assert!(matches!(
            Projection::build(&Pattern::single(9), &task, 5),
            Err(ProjectionError::UnknownVariable { var: 9, .. })
        ));
    }
}
