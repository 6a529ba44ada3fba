//! Abstract goal distances and optimal operators.

use tracing::debug;

use plover_task::Cost;

use crate::projection::{AbstractOperatorId, Projection};
use crate::shortest_paths::{backward_dijkstra, INFINITE_COST};

/// Goal distances of every abstract state of one projection, together with
/// the operators that realise them.
#[derive(Debug, Clone)]
pub struct AbstractSolution {
    distances: Vec<Cost>,
    hops: Vec<usize>,
    optimal_operators: Vec<Vec<AbstractOperatorId>>,
    initial_state: usize,
    wildcard: bool,
}

/// Run a backward Dijkstra from the abstract goal states of `projection`.
///
/// With `wildcard` set, every optimal operator of a state is kept (ascending
/// operator id); otherwise only the operator on the state's shortest-path
/// tree edge. An operator from `s` to `t` is optimal when
/// `cost + d(t) = d(s)`; a zero-cost operator must additionally lead to a
/// state with fewer tree hops. Each step along optimal operators lowers the
/// distance or the hop count, so such walks always reach a goal.
pub fn solve(projection: &Projection, wildcard: bool) -> AbstractSolution {
    let graph = projection.transition_graph();
    let paths = backward_dijkstra(&graph, &projection.goal_states());

    let mut optimal_operators = vec![Vec::new(); projection.num_states()];
    if wildcard {
        for edge in graph.edges() {
            if paths.is_optimal_edge(edge) {
                optimal_operators[edge.source].push(edge.label);
            }
        }
    } else {
        for (state, parent) in paths.parent_edge.iter().enumerate() {
            if let Some(edge) = parent {
                optimal_operators[state].push(graph.edge(*edge).label);
            }
        }
    }

    let initial_state = projection.initial_state();
    debug!(
        "Solved projection onto {}: {} transitions, h(init) = {}",
        projection.pattern(),
        graph.num_edges(),
        format_cost(paths.distances[initial_state])
    );

    AbstractSolution {
        distances: paths.distances,
        hops: paths.hops,
        optimal_operators,
        initial_state,
        wildcard,
    }
}

fn format_cost(cost: Cost) -> String {
    if cost == INFINITE_COST {
        "infinity".to_string()
    } else {
        cost.to_string()
    }
}

impl AbstractSolution {
    pub fn distance(&self, state: usize) -> Cost {
        self.distances[state]
    }

    pub fn distances(&self) -> &[Cost] {
        &self.distances
    }

    pub fn into_distances(self) -> Vec<Cost> {
        self.distances
    }

    pub fn hops(&self, state: usize) -> usize {
        self.hops[state]
    }

    pub fn initial_state(&self) -> usize {
        self.initial_state
    }

    pub fn initial_distance(&self) -> Cost {
        self.distances[self.initial_state]
    }

    /// Whether the abstract initial state can reach an abstract goal.
    pub fn is_solvable(&self) -> bool {
        self.initial_distance() != INFINITE_COST
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Optimal operators retained for `state`; empty for goal states and
    /// dead ends.
    pub fn optimal_operators(&self, state: usize) -> &[AbstractOperatorId] {
        &self.optimal_operators[state]
    }
}
