//! Counterexample-guided pattern refinement.
//!
//! Starting from a single goal variable, the generator repeatedly solves the
//! projection onto its pattern, replays the optimal abstract plan on the
//! concrete task and adds one variable responsible for the first flaw. It
//! stops when the plan works concretely, the abstraction is unsolvable, or a
//! budget (size, time, refinement count) is exhausted.

use std::time::Instant;
use tracing::{debug, info, warn};

use plover_pdb::{solve, AbstractPlan, AbstractSolution, Pattern, Projection};
use plover_task::{Task, VariableId};

use crate::flaw::{find_flaw, Flaw};
use crate::generator::{GeneratorError, PatternGenerator};
use crate::options::{CegarOptions, OptionsError, SeedStrategy};
use crate::result::{GenerationStatistics, PatternInformation, RefinementStage, Termination};
use crate::rng::{choose, choose_index, shared_rng, SharedRng};
use crate::timeout::{deadline_after, deadline_exceeded};

const GENERATOR_NAME: &str = "cegar";

/// Outcome of checking one committed pattern.
enum Check {
    Converged,
    Unsolvable,
    Flawed(Flaw),
}

pub struct CegarPatternGenerator {
    options: CegarOptions,
    rng: SharedRng,
}

impl CegarPatternGenerator {
    pub fn new(options: CegarOptions, rng: SharedRng) -> Self {
        Self { options, rng }
    }

    /// A generator with its own random source seeded from `random_seed`.
    pub fn from_options(options: CegarOptions) -> Self {
        let rng = shared_rng(options.random_seed);
        Self::new(options, rng)
    }

    pub fn options(&self) -> &CegarOptions {
        &self.options
    }

    fn select_seed(&self, task: &Task) -> Result<VariableId, GeneratorError> {
        let limit = self.options.max_pdb_size;
        let fits = |var: &VariableId| task.domain_size(*var) <= limit;
        let goal_variables: Vec<VariableId> =
            task.goal_variables().into_iter().filter(fits).collect();

        let seed = match self.options.seed_strategy {
            SeedStrategy::Variable(var) => {
                if var >= task.num_variables() {
                    return Err(OptionsError::SeedVariableOutOfRange {
                        var,
                        num_variables: task.num_variables(),
                    }
                    .into());
                }
                if !fits(&var) {
                    return Err(GeneratorError::NoSeedFits { limit });
                }
                Some(var)
            }
            SeedStrategy::FirstGoal => goal_variables.first().copied(),
            SeedStrategy::RandomGoal => choose(&self.rng, &goal_variables),
            SeedStrategy::RandomVariable => None,
        };

        match seed {
            Some(var) => Ok(var),
            None => {
                let candidates: Vec<VariableId> =
                    (0..task.num_variables()).filter(fits).collect();
                choose(&self.rng, &candidates).ok_or(GeneratorError::NoSeedFits { limit })
            }
        }
    }

    /// Projects, solves and replays `pattern`.
    fn check(
        &self,
        task: &Task,
        pattern: &Pattern,
    ) -> Result<(Check, Projection, AbstractSolution), GeneratorError> {
        let projection = Projection::build(pattern, task, self.options.max_pdb_size)?;
        let solution = solve(&projection, self.options.use_wildcard_plans);
        let check = match AbstractPlan::new(&projection, &solution) {
            None => Check::Unsolvable,
            Some(plan) => match find_flaw(task, &plan) {
                None => Check::Converged,
                Some(flaw) => Check::Flawed(flaw),
            },
        };
        Ok((check, projection, solution))
    }

    /// Pick the variable to add for `flaw`, together with the size of the
    /// grown pattern. Candidates are drawn at random one at a time; the
    /// first one that keeps the pattern within `max_pdb_size` wins.
    fn choose_refinement(
        &self,
        task: &Task,
        pattern: &Pattern,
        flaw: &Flaw,
    ) -> Result<(VariableId, usize), Termination> {
        let mut candidates: Vec<VariableId> = flaw
            .responsible_variables
            .iter()
            .copied()
            .filter(|&var| !self.options.is_blacklisted(var))
            .collect();
        if candidates.is_empty() && !flaw.responsible_variables.is_empty() {
            debug!(
                "All responsible variables {:?} are blacklisted",
                flaw.responsible_variables
            );
            return Err(Termination::Blacklisted);
        }

        while !candidates.is_empty() {
            let var = candidates.remove(choose_index(&self.rng, candidates.len()));
            let grown = pattern.with_variable(var);
            match grown.num_abstract_states(task) {
                Some(size) if size <= self.options.max_pdb_size => return Ok((var, size)),
                _ => debug!(
                    "Adding v{var} to {pattern} exceeds {} abstract states",
                    self.options.max_pdb_size
                ),
            }
        }
        Err(Termination::SizeBlocked)
    }

    pub fn generate(&self, task: &Task) -> Result<PatternInformation, GeneratorError> {
        self.options.validate()?;
        if task.num_variables() == 0 {
            return Err(GeneratorError::EmptyTask);
        }

        let started_at = Instant::now();
        let deadline = deadline_after(started_at, self.options.max_time);

        let seed = self.select_seed(task)?;
        let mut pattern = Pattern::single(seed);
        let mut history = vec![RefinementStage {
            iteration: 0,
            pattern: pattern.clone(),
            abstract_states: task.domain_size(seed),
            added_variable: None,
            flaw: None,
        }];
        info!("CEGAR seed pattern {pattern}");

        let mut refinements = 0usize;
        let mut last_solved: Option<(Projection, AbstractSolution)> = None;

        let termination = loop {
            if deadline_exceeded(deadline) {
                break Termination::TimedOut;
            }
            if self
                .options
                .max_refinements
                .is_some_and(|limit| refinements >= limit)
            {
                break Termination::RefinementLimit;
            }

            let (check, projection, solution) = self.check(task, &pattern)?;
            info!(
                "CEGAR iteration {refinements}: pattern {pattern}, {} abstract states, {} abstract operators",
                projection.num_states(),
                projection.operators().len()
            );
            last_solved = Some((projection, solution));

            let flaw = match check {
                Check::Converged => break Termination::Converged,
                Check::Unsolvable => {
                    warn!("Abstract initial state of {pattern} cannot reach a goal; task is unsolvable");
                    break Termination::Unsolvable;
                }
                Check::Flawed(flaw) => flaw,
            };

            match self.choose_refinement(task, &pattern, &flaw) {
                Ok((var, abstract_states)) => {
                    pattern = pattern.with_variable(var);
                    refinements += 1;
                    debug!(
                        "Added v{var} for {} flaw at step {}",
                        flaw.kind, flaw.step
                    );
                    history.push(RefinementStage {
                        iteration: refinements,
                        pattern: pattern.clone(),
                        abstract_states,
                        added_variable: Some(var),
                        flaw: Some(flaw.kind),
                    });
                }
                Err(termination) => break termination,
            }
        };

        let solution = match last_solved {
            Some((projection, solution)) if projection.pattern() == &pattern => solution,
            _ => {
                let projection = Projection::build(&pattern, task, self.options.max_pdb_size)?;
                solve(&projection, self.options.use_wildcard_plans)
            }
        };
        let initial_distance = solution.initial_distance();
        let distances = solution.into_distances();
        let elapsed = started_at.elapsed();

        info!(
            "CEGAR finished ({termination}) after {refinements} refinement(s) in {:.3}s: pattern {pattern}",
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

impl PatternGenerator for CegarPatternGenerator {
    fn name(&self) -> &'static str {
        GENERATOR_NAME
    }

    fn generate(&self, task: &Task) -> Result<PatternInformation, GeneratorError> {
        CegarPatternGenerator::generate(self, task)
    }
}
