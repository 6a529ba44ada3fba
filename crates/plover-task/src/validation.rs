//! Structural validation of tasks.
//!
//! The pattern generators assume a well-formed task. Loaders call
//! [`validate`] before handing a task to them.

use thiserror::Error;

use crate::task::{FactPair, Task, VariableId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("Variable {var} ('{name}') has an empty domain")]
    EmptyDomain { var: VariableId, name: String },
    #[error("{context} references unknown variable {var}")]
    UnknownVariable { context: String, var: VariableId },
    #[error("{context} assigns value {value} to variable {var} with domain size {domain_size}")]
    ValueOutOfRange {
        context: String,
        var: VariableId,
        value: usize,
        domain_size: usize,
    },
    #[error("{context} mentions variable {var} more than once")]
    DuplicateVariable { context: String, var: VariableId },
    #[error("Initial state has {actual} values but the task has {expected} variables")]
    InitialStateLength { expected: usize, actual: usize },
    #[error("Operator {op} ('{name}') has no effect")]
    EmptyEffect { op: usize, name: String },
}

/// Check that every fact in the task is in range and that no condition
/// mentions a variable twice.
pub fn validate(task: &Task) -> Result<(), TaskError> {
    for (var, variable) in task.variables.iter().enumerate() {
        if variable.domain_size == 0 {
            return Err(TaskError::EmptyDomain {
                var,
                name: variable.name.clone(),
            });
        }
    }

    if task.initial_state.len() != task.num_variables() {
        return Err(TaskError::InitialStateLength {
            expected: task.num_variables(),
            actual: task.initial_state.len(),
        });
    }
    for (var, &value) in task.initial_state.iter().enumerate() {
        check_fact(task, &FactPair::new(var, value), "Initial state")?;
    }

    check_condition(task, &task.goal, "Goal")?;

    for (id, op) in task.operators.iter().enumerate() {
        if op.effects.is_empty() {
            return Err(TaskError::EmptyEffect {
                op: id,
                name: op.name.clone(),
            });
        }
        check_condition(
            task,
            &op.preconditions,
            &format!("Precondition of operator {id} ('{}')", op.name),
        )?;
        check_condition(
            task,
            &op.effects,
            &format!("Effect of operator {id} ('{}')", op.name),
        )?;
    }
    Ok(())
}

fn check_condition(task: &Task, facts: &[FactPair], context: &str) -> Result<(), TaskError> {
    let mut seen: Vec<VariableId> = Vec::with_capacity(facts.len());
    for fact in facts {
        check_fact(task, fact, context)?;
        if seen.contains(&fact.var) {
            return Err(TaskError::DuplicateVariable {
                context: context.to_string(),
                var: fact.var,
            });
        }
        seen.push(fact.var);
    }
    Ok(())
}

fn check_fact(task: &Task, fact: &FactPair, context: &str) -> Result<(), TaskError> {
    let Some(variable) = task.variables.get(fact.var) else {
        return Err(TaskError::UnknownVariable {
            context: context.to_string(),
            var: fact.var,
        });
    };
    if fact.value >= variable.domain_size {
        return Err(TaskError::ValueOutOfRange {
            context: context.to_string(),
            var: fact.var,
            value: fact.value,
            domain_size: variable.domain_size,
        });
    }
    Ok(())
}
