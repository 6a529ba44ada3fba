#![doc = include_str!("../README.md")]

//! Plover task model.
//!
//! This crate defines the planning task consumed by the pattern generators:
//! variables and their domains, operators, states, the goal condition, the
//! causal graph, validation, and the JSON exchange format.

pub mod causal_graph;
pub mod format;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;
pub mod task;
pub mod validation;

pub use causal_graph::CausalGraph;
pub use task::{Cost, FactPair, Operator, OperatorId, State, Task, Value, Variable, VariableId};
pub use validation::{validate, TaskError};
