//! Causal graph over task variables.
//!
//! There is an arc `u -> v` whenever some operator has a precondition on `u`
//! and an effect on `v` (pre-to-eff), or effects on both `u` and `v`
//! (eff-to-eff). Self-loops are omitted.

use crate::task::{Task, VariableId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CausalGraph {
    pre_to_eff: Vec<Vec<VariableId>>,
    eff_to_pre: Vec<Vec<VariableId>>,
    eff_to_eff: Vec<Vec<VariableId>>,
}

impl CausalGraph {
    pub fn new(task: &Task) -> Self {
        let n = task.num_variables();
        let mut pre_to_eff = vec![Vec::new(); n];
        let mut eff_to_pre = vec![Vec::new(); n];
        let mut eff_to_eff = vec![Vec::new(); n];

        for op in &task.operators {
            for pre in &op.preconditions {
                for eff in &op.effects {
                    if pre.var != eff.var {
                        pre_to_eff[pre.var].push(eff.var);
                        eff_to_pre[eff.var].push(pre.var);
                    }
                }
            }
            for a in &op.effects {
                for b in &op.effects {
                    if a.var != b.var {
                        eff_to_eff[a.var].push(b.var);
                    }
                }
            }
        }

        for lists in [&mut pre_to_eff, &mut eff_to_pre, &mut eff_to_eff] {
            for list in lists.iter_mut() {
                list.sort_unstable();
                list.dedup();
            }
        }

        Self {
            pre_to_eff,
            eff_to_pre,
            eff_to_eff,
        }
    }

    pub fn num_variables(&self) -> usize {
        self.pre_to_eff.len()
    }

    pub fn pre_to_eff(&self, var: VariableId) -> &[VariableId] {
        &self.pre_to_eff[var]
    }

    pub fn eff_to_pre(&self, var: VariableId) -> &[VariableId] {
        &self.eff_to_pre[var]
    }

    pub fn eff_to_eff(&self, var: VariableId) -> &[VariableId] {
        &self.eff_to_eff[var]
    }

    /// Variables that can influence `var`, sorted.
    pub fn predecessors(&self, var: VariableId) -> Vec<VariableId> {
        merge_sorted(&self.eff_to_pre[var], &self.eff_to_eff[var])
    }

    /// Variables that `var` can influence, sorted.
    pub fn successors(&self, var: VariableId) -> Vec<VariableId> {
        merge_sorted(&self.pre_to_eff[var], &self.eff_to_eff[var])
    }

    /// Predecessors and successors of `var`, sorted.
    pub fn neighbors(&self, var: VariableId) -> Vec<VariableId> {
        merge_sorted(&self.predecessors(var), &self.successors(var))
    }
}

fn merge_sorted(a: &[VariableId], b: &[VariableId]) -> Vec<VariableId> {
    let mut merged: Vec<VariableId> = a.iter().chain(b.iter()).copied().collect();
    merged.sort_unstable();
    merged.dedup();
    merged
}
