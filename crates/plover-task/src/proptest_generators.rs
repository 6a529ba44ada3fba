//! Proptest strategies for generating well-formed `Task` instances.

use proptest::prelude::*;

use crate::task::*;

/// Per-variable seed for one operator: `(precondition, effect)` where `0`
/// means "not mentioned" and any other value is reduced modulo the domain.
type OperatorSeed = Vec<(u8, u8)>;

/// Strategy for a small well-formed `Task` suitable for property testing.
///
/// Generated tasks have:
/// - 2–5 variables with domain sizes 2–3
/// - 1–8 operators, each with at least one effect and cost 0–3
/// - a goal over at least one variable
pub fn arb_task() -> impl Strategy<Value = Task> {
    (2..=5usize, 1..=8usize)
        .prop_flat_map(|(nvars, nops)| {
            let domains = proptest::collection::vec(2..=3usize, nvars..=nvars);
            let ops = proptest::collection::vec(
                (
                    proptest::collection::vec((0..4u8, 0..4u8), nvars..=nvars),
                    0..=3u64,
                ),
                nops..=nops,
            );
            let init = proptest::collection::vec(0..3usize, nvars..=nvars);
            let goal = proptest::collection::vec(0..3u8, nvars..=nvars);
            (domains, ops, init, goal)
        })
        .prop_map(|(domains, ops, init, goal)| build_task(&domains, &ops, &init, &goal))
}

fn build_task(
    domains: &[usize],
    ops: &[(OperatorSeed, Cost)],
    init: &[usize],
    goal: &[u8],
) -> Task {
    let mut task = Task::new();
    for (i, &domain_size) in domains.iter().enumerate() {
        task.add_variable(Variable::new(format!("var{i}"), domain_size));
    }

    for (op_index, (seeds, cost)) in ops.iter().enumerate() {
        let mut preconditions = Vec::new();
        let mut effects = Vec::new();
        for (var, &(pre, eff)) in seeds.iter().enumerate() {
            if pre > 0 {
                preconditions.push(FactPair::new(var, (pre as usize - 1) % domains[var]));
            }
            if eff > 0 {
                effects.push(FactPair::new(var, (eff as usize - 1) % domains[var]));
            }
        }
        if effects.is_empty() {
            let var = op_index % domains.len();
            effects.push(FactPair::new(var, 1 % domains[var]));
        }
        task.add_operator(Operator::new(
            format!("op{op_index}"),
            preconditions,
            effects,
            *cost,
        ));
    }

    task.initial_state = init
        .iter()
        .zip(domains)
        .map(|(value, domain)| value % domain)
        .collect();

    task.goal = goal
        .iter()
        .enumerate()
        .filter(|(_, seed)| **seed > 0)
        .map(|(var, seed)| FactPair::new(var, (*seed as usize - 1) % domains[var]))
        .collect();
    if task.goal.is_empty() {
        task.goal.push(FactPair::new(0, 1 % domains[0]));
    }
    task
}
