//! Optimal abstract plans.
//!
//! A plan is read off an [`AbstractSolution`]: in every abstract state the
//! plan's step is the set of optimal operators the solution retained for it
//! (one operator, or all tied operators in wildcard mode). Walks along
//! optimal operators always reach an abstract goal.

use plover_task::Cost;

use crate::projection::{AbstractOperatorId, Projection};
use crate::solver::AbstractSolution;

/// One step of a materialised plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanStep {
    pub state: usize,
    pub operators: Vec<AbstractOperatorId>,
    /// State reached by the first operator of the step.
    pub successor: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct AbstractPlan<'a> {
    projection: &'a Projection,
    solution: &'a AbstractSolution,
}

impl<'a> AbstractPlan<'a> {
    /// The optimal plan from the abstract initial state, or `None` when the
    /// initial state cannot reach an abstract goal.
    pub fn new(projection: &'a Projection, solution: &'a AbstractSolution) -> Option<Self> {
        solution.is_solvable().then_some(Self {
            projection,
            solution,
        })
    }

    pub fn projection(&self) -> &'a Projection {
        self.projection
    }

    pub fn solution(&self) -> &'a AbstractSolution {
        self.solution
    }

    pub fn initial_state(&self) -> usize {
        self.projection.initial_state()
    }

    pub fn cost(&self) -> Cost {
        self.solution.initial_distance()
    }

    pub fn is_wildcard(&self) -> bool {
        self.solution.is_wildcard()
    }

    /// Operators of the step taken in `state`; empty once the plan is
    /// exhausted.
    pub fn step(&self, state: usize) -> &'a [AbstractOperatorId] {
        self.solution.optimal_operators(state)
    }

    /// The plan that always takes the first operator of each step.
    pub fn canonical_steps(&self) -> Vec<PlanStep> {
        let mut steps = Vec::new();
        let mut state = self.initial_state();
        while let Some(&op) = self.step(state).first() {
            let Some(successor) = self.projection.successor(state, op) else {
                break;
            };
            steps.push(PlanStep {
                state,
                operators: self.step(state).to_vec(),
                successor,
            });
            state = successor;
        }
        steps
    }
}
