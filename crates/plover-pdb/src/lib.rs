#![doc = include_str!("../README.md")]

//! Pattern projections and abstract distance computation.
//!
//! Everything here is a pure function of a pattern and a task: nothing is
//! cached across patterns.

pub mod database;
pub mod pattern;
pub mod plan;
pub mod projection;
pub mod shortest_paths;
pub mod solver;

pub use database::PatternDatabase;
pub use pattern::Pattern;
pub use plan::{AbstractPlan, PlanStep};
pub use projection::{AbstractOperator, AbstractOperatorId, Projection, ProjectionError};
pub use shortest_paths::{backward_dijkstra, ShortestPaths, WeightedGraph, INFINITE_COST};
pub use solver::{solve, AbstractSolution};
