//! JSON task format.
//!
//! The format is the serde representation of [`Task`]. Parsing always runs
//! [`validate`] so downstream consumers can rely on a well-formed task.

use thiserror::Error;

use crate::task::Task;
use crate::validation::{validate, TaskError};

#[derive(Debug, Error)]
pub enum TaskFormatError {
    #[error("Malformed task JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid task: {0}")]
    Invalid(#[from] TaskError),
}

pub fn parse_task_json(source: &str) -> Result<Task, TaskFormatError> {
    let task: Task = serde_json::from_str(source)?;
    validate(&task)?;
    Ok(task)
}

pub fn to_task_json(task: &Task) -> Result<String, TaskFormatError> {
    Ok(serde_json::to_string_pretty(task)?)
}
