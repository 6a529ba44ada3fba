//! Random-walk pattern generation on the causal graph.
//!
//! The walk starts at a random goal variable and repeatedly moves to a
//! random causal-graph neighbour, adding every newly visited variable while
//! the pattern still fits. It is a cheap baseline for the CEGAR generator.

use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, info};

use plover_pdb::{solve, Pattern, Projection};
use plover_task::{CausalGraph, Task, VariableId};

use crate::generator::{GeneratorError, PatternGenerator};
use crate::options::RandomPatternOptions;
use crate::result::{GenerationStatistics, PatternInformation, RefinementStage, Termination};
use crate::rng::{choose, shared_rng, SharedRng};
use crate::timeout::{deadline_after, deadline_exceeded};

const GENERATOR_NAME: &str = "random";

pub struct RandomPatternGenerator {
    options: RandomPatternOptions,
    rng: SharedRng,
}

impl RandomPatternGenerator {
    pub fn new(options: RandomPatternOptions, rng: SharedRng) -> Self {
        Self { options, rng }
    }

    pub fn from_options(options: RandomPatternOptions) -> Self {
        let rng = shared_rng(options.random_seed);
        Self::new(options, rng)
    }

    pub fn options(&self) -> &RandomPatternOptions {
        &self.options
    }

    fn neighbors(&self, graph: &CausalGraph, var: VariableId) -> Vec<VariableId> {
        if self.options.bidirectional {
            graph.neighbors(var)
        } else {
            graph.predecessors(var)
        }
    }

    /// Whether a variable outside `pattern` is reachable from `start`.
    fn can_grow(&self, graph: &CausalGraph, pattern: &Pattern, start: VariableId) -> bool {
        let mut seen = vec![false; graph.num_variables()];
        let mut queue = VecDeque::from([start]);
        seen[start] = true;
        while let Some(var) = queue.pop_front() {
            if !pattern.contains(var) {
                return true;
            }
            for next in self.neighbors(graph, var) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }

    pub fn generate(&self, task: &Task) -> Result<PatternInformation, GeneratorError> {
        self.options.validate()?;
        if task.num_variables() == 0 {
            return Err(GeneratorError::EmptyTask);
        }

        let started_at = Instant::now();
        let deadline = deadline_after(started_at, self.options.max_time);
        let limit = self.options.max_pdb_size;
        let fits = |var: &VariableId| task.domain_size(*var) <= limit;

        let goal_variables: Vec<VariableId> =
            task.goal_variables().into_iter().filter(fits).collect();
        let seed = match choose(&self.rng, &goal_variables) {
            Some(var) => var,
            None => {
                let candidates: Vec<VariableId> =
                    (0..task.num_variables()).filter(fits).collect();
                choose(&self.rng, &candidates).ok_or(GeneratorError::NoSeedFits { limit })?
            }
        };

        let graph = CausalGraph::new(task);
        let mut pattern = Pattern::single(seed);
        let mut size = task.domain_size(seed);
        let mut history = vec![RefinementStage {
            iteration: 0,
            pattern: pattern.clone(),
            abstract_states: size,
            added_variable: None,
            flaw: None,
        }];
        let mut current = seed;

        let termination = loop {
            if deadline_exceeded(deadline) {
                break Termination::TimedOut;
            }
            if !self.can_grow(&graph, &pattern, current) {
                break Termination::NeighborhoodExhausted;
            }
            let neighbors = self.neighbors(&graph, current);
            let Some(next) = choose(&self.rng, &neighbors) else {
                break Termination::NeighborhoodExhausted;
            };
            if !pattern.contains(next) {
                match size.checked_mul(task.domain_size(next)) {
                    Some(grown) if grown <= limit => {
                        pattern = pattern.with_variable(next);
                        size = grown;
                        debug!("Random walk added v{next}: {pattern}");
                        history.push(RefinementStage {
                            iteration: history.len(),
                            pattern: pattern.clone(),
                            abstract_states: size,
                            added_variable: Some(next),
                            flaw: None,
                        });
                    }
                    _ => break Termination::SizeBlocked,
                }
            }
            current = next;
        };

        let projection = Projection::build(&pattern, task, limit)?;
        let solution = solve(&projection, false);
        let initial_distance = solution.initial_distance();
        let distances = solution.into_distances();
        let elapsed = started_at.elapsed();
        let refinements = history.len() - 1;

        info!(
            "Random walk finished ({termination}) with pattern {pattern} in {:.3}s",
            elapsed.as_secs_f64()
        );

        Ok(PatternInformation {
            statistics: GenerationStatistics {
                generator: GENERATOR_NAME,
                refinements,
                elapsed_secs: elapsed.as_secs_f64(),
                abstract_states: distances.len(),
                termination,
                history,
            },
            pattern,
            distances,
            initial_distance,
        })
    }
}

impl PatternGenerator for RandomPatternGenerator {
    fn name(&self) -> &'static str {
        GENERATOR_NAME
    }

    fn generate(&self, task: &Task) -> Result<PatternInformation, GeneratorError> {
        RandomPatternGenerator::generate(self, task)
    }
}
