//! Property-based tests for projections and abstract distances.
//!
//! Concrete goal distances are computed by running the same backward
//! Dijkstra over the full concrete state space of small generated tasks.

use proptest::prelude::*;

use plover_pdb::{
    backward_dijkstra, solve, Pattern, PatternDatabase, Projection, WeightedGraph, INFINITE_COST,
};
use plover_task::proptest_generators::arb_task;
use plover_task::{State, Task};

fn all_states(task: &Task) -> Vec<State> {
    let mut states = vec![Vec::new()];
    for var in &task.variables {
        let mut next = Vec::with_capacity(states.len() * var.domain_size);
        for prefix in &states {
            for value in 0..var.domain_size {
                let mut values = prefix.clone();
                values.push(value);
                next.push(values);
            }
        }
        states = next;
    }
    states.into_iter().map(State::new).collect()
}

fn concrete_distances(task: &Task) -> (Vec<State>, Vec<u64>) {
    let states = all_states(task);
    let full = Pattern::new((0..task.num_variables()).collect());
    let ranker = Projection::build(&full, task, usize::MAX).unwrap();
    let mut graph = WeightedGraph::new(states.len());
    for state in &states {
        for (id, op) in task.operators.iter().enumerate() {
            if op.is_applicable(state) {
                let next = op.apply(state);
                graph.add_edge(ranker.rank(state), ranker.rank(&next), op.cost, id);
            }
        }
    }
    let goals: Vec<usize> = states
        .iter()
        .filter(|s| task.is_goal_state(s))
        .map(|s| ranker.rank(s))
        .collect();
    let paths = backward_dijkstra(&graph, &goals);
    let mut ordered = states;
    ordered.sort_by_key(|s| ranker.rank(s));
    (ordered, paths.distances)
}

fn arb_task_and_pattern() -> impl Strategy<Value = (Task, Pattern)> {
    arb_task().prop_flat_map(|task| {
        let n = task.num_variables();
        (
            Just(task),
            proptest::collection::vec(0..n, 1..=n).prop_map(Pattern::new),
        )
    })
}

proptest! {
    #[test]
    fn rank_and_unrank_are_inverse((task, pattern) in arb_task_and_pattern()) {
        let projection = Projection::build(&pattern, &task, usize::MAX).unwrap();
        for index in 0..projection.num_states() {
            let values = projection.unrank(index);
            let mut concrete = task.initial_state();
            for (pos, &var) in pattern.variables().iter().enumerate() {
                concrete.set(var, values[pos]);
            }
            prop_assert_eq!(projection.rank(&concrete), index);
        }
    }

    #[test]
    fn pattern_databases_are_admissible((task, pattern) in arb_task_and_pattern()) {
        let projection = Projection::build(&pattern, &task, usize::MAX).unwrap();
        let database = PatternDatabase::new(&projection, solve(&projection, false).into_distances());
        let (states, exact) = concrete_distances(&task);
        for (index, state) in states.iter().enumerate() {
            prop_assert!(database.heuristic_value(state) <= exact[index]);
        }
    }

    #[test]
    fn optimal_walks_reach_goal_at_distance_cost(
        (task, pattern) in arb_task_and_pattern(),
        wildcard in any::<bool>(),
    ) {
        let projection = Projection::build(&pattern, &task, usize::MAX).unwrap();
        let solution = solve(&projection, wildcard);
        for start in 0..projection.num_states() {
            if solution.distance(start) == INFINITE_COST {
                prop_assert!(solution.optimal_operators(start).is_empty());
                continue;
            }
            // Take the last tied operator each time to exercise non-tree edges.
            let mut state = start;
            let mut cost = 0;
            let mut steps = 0;
            while let Some(&op) = solution.optimal_operators(state).last() {
                cost += projection.operator(op).cost;
                state = projection.successor(state, op).unwrap();
                steps += 1;
                prop_assert!(steps <= projection.num_states());
            }
            prop_assert!(projection.is_goal(state));
            prop_assert_eq!(cost, solution.distance(start));
        }
    }
}
