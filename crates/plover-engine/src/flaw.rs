//! Replaying abstract plans on the concrete task.
//!
//! The replay keeps a concrete state and an abstract cursor in lockstep. At
//! each step the candidates are the concrete operators behind the step's
//! abstract operators, in step order and then ascending operator id; the
//! first applicable candidate is applied. The first failure is reported as
//! a [`Flaw`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use plover_pdb::AbstractPlan;
use plover_task::{OperatorId, State, Task, VariableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlawKind {
    /// No candidate operator of a plan step is applicable.
    Precondition,
    /// The plan ran to completion but the concrete goal does not hold.
    Goal,
}

impl fmt::Display for FlawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlawKind::Precondition => write!(f, "precondition"),
            FlawKind::Goal => write!(f, "goal"),
        }
    }
}

/// A concrete execution failure of an abstract plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flaw {
    pub kind: FlawKind,
    /// Index of the failed step; the plan length for goal flaws.
    pub step: usize,
    /// Abstract state in which the failure happened.
    pub abstract_state: usize,
    /// Concrete state in which the failure happened.
    pub concrete_state: State,
    /// Candidates of the failed step, none of them applicable. Empty for
    /// goal flaws.
    pub failed_operators: Vec<OperatorId>,
    /// Variables outside the pattern whose values caused the failure, in
    /// order of first appearance.
    pub responsible_variables: Vec<VariableId>,
}

/// Replay `plan` from the concrete initial state and return the first flaw,
/// or `None` if the plan is a valid concrete plan.
pub fn find_flaw(task: &Task, plan: &AbstractPlan<'_>) -> Option<Flaw> {
    let projection = plan.projection();
    let pattern = projection.pattern();
    let mut state = task.initial_state();
    let mut cursor = plan.initial_state();
    let mut step = 0;

    loop {
        let operators = plan.step(cursor);
        if operators.is_empty() {
            break;
        }

        let candidates: Vec<OperatorId> = operators
            .iter()
            .flat_map(|&op| projection.operator(op).concrete_operators.iter().copied())
            .collect();

        match candidates
            .iter()
            .copied()
            .find(|&op| task.operator(op).is_applicable(&state))
        {
            Some(op) => {
                state = task.operator(op).apply(&state);
                let next = projection.rank(&state);
                debug_assert!(projection
                    .abstract_operator_of(op)
                    .and_then(|abstract_op| projection.successor(cursor, abstract_op))
                    == Some(next));
                cursor = next;
                step += 1;
            }
            None => {
                let mut responsible = Vec::new();
                for &op in &candidates {
                    for fact in task.operator(op).violated_preconditions(&state) {
                        if !pattern.contains(fact.var) && !responsible.contains(&fact.var) {
                            responsible.push(fact.var);
                        }
                    }
                }
                debug!(
                    "Precondition flaw at step {step} in {state}: {} candidate(s), responsible {:?}",
                    candidates.len(),
                    responsible
                );
                return Some(Flaw {
                    kind: FlawKind::Precondition,
                    step,
                    abstract_state: cursor,
                    concrete_state: state,
                    failed_operators: candidates,
                    responsible_variables: responsible,
                });
            }
        }
    }

    if task.is_goal_state(&state) {
        return None;
    }

    let mut responsible = Vec::new();
    for fact in task.unmet_goals(&state) {
        if !pattern.contains(fact.var) && !responsible.contains(&fact.var) {
            responsible.push(fact.var);
        }
    }
    debug!("Goal flaw after {step} step(s) in {state}: responsible {responsible:?}");
    Some(Flaw {
        kind: FlawKind::Goal,
        step,
        abstract_state: cursor,
        concrete_state: state,
        failed_operators: Vec::new(),
        responsible_variables: responsible,
    })
}
