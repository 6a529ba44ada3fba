use serde::{Deserialize, Serialize};
use std::fmt;

use plover_task::{Task, VariableId};

/// A set of task variables in canonical (ascending) order.
///
/// The order fixes the mixed-radix encoding of abstract states: the first
/// variable has multiplier 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    variables: Vec<VariableId>,
}

impl Pattern {
    pub fn new(mut variables: Vec<VariableId>) -> Self {
        variables.sort_unstable();
        variables.dedup();
        Self { variables }
    }

    pub fn single(var: VariableId) -> Self {
        Self {
            variables: vec![var],
        }
    }

    pub fn variables(&self) -> &[VariableId] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn contains(&self, var: VariableId) -> bool {
        self.variables.binary_search(&var).is_ok()
    }

    /// Position of `var` in the canonical order.
    pub fn position(&self, var: VariableId) -> Option<usize> {
        self.variables.binary_search(&var).ok()
    }

    /// The pattern extended by `var`.
    pub fn with_variable(&self, var: VariableId) -> Pattern {
        let mut variables = self.variables.clone();
        if let Err(pos) = variables.binary_search(&var) {
            variables.insert(pos, var);
        }
        Pattern { variables }
    }

    pub fn is_subset_of(&self, other: &Pattern) -> bool {
        self.variables.iter().all(|&var| other.contains(var))
    }

    pub fn is_strict_subset_of(&self, other: &Pattern) -> bool {
        self.len() < other.len() && self.is_subset_of(other)
    }

    /// Product of the domain sizes of the pattern's variables, or `None` if
    /// it does not fit in `usize`.
    pub fn num_abstract_states(&self, task: &Task) -> Option<usize> {
        self.variables
            .iter()
            .try_fold(1usize, |acc, &var| acc.checked_mul(task.domain_size(var)))
    }

    /// Whether the projection onto this pattern has at most `limit` states.
    pub fn fits(&self, task: &Task, limit: usize) -> bool {
        self.num_abstract_states(task)
            .is_some_and(|size| size <= limit)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, var) in self.variables.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var}")?;
        }
        write!(f, "}}")
    }
}
