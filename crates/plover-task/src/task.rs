use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique identifier for a state variable.
pub type VariableId = usize;
/// A unique identifier for an operator.
pub type OperatorId = usize;
/// A value from a variable's finite domain `0..domain_size`.
pub type Value = usize;
/// Non-negative operator cost.
pub type Cost = u64;

/// An atomic `var = value` condition or assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactPair {
    pub var: VariableId,
    pub value: Value,
}

impl FactPair {
    pub fn new(var: VariableId, value: Value) -> Self {
        Self { var, value }
    }
}

impl fmt::Display for FactPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}={}", self.var, self.value)
    }
}

/// A finite-domain state variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub domain_size: usize,
    /// Optional human-readable names for the values, indexed by value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_names: Vec<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>, domain_size: usize) -> Self {
        Self {
            name: name.into(),
            domain_size,
            value_names: Vec::new(),
        }
    }

    /// Display name for `value`, falling back to its index.
    pub fn value_name(&self, value: Value) -> String {
        self.value_names
            .get(value)
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }
}

/// A concrete operator with a conjunctive precondition and a set of
/// assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub name: String,
    #[serde(default)]
    pub preconditions: Vec<FactPair>,
    pub effects: Vec<FactPair>,
    #[serde(default = "default_cost")]
    pub cost: Cost,
}

fn default_cost() -> Cost {
    1
}

impl Operator {
    pub fn new(
        name: impl Into<String>,
        preconditions: Vec<FactPair>,
        effects: Vec<FactPair>,
        cost: Cost,
    ) -> Self {
        Self {
            name: name.into(),
            preconditions,
            effects,
            cost,
        }
    }

    pub fn is_applicable(&self, state: &State) -> bool {
        self.preconditions
            .iter()
            .all(|fact| state.get(fact.var) == fact.value)
    }

    /// Preconditions that do not hold in `state`, in declaration order.
    pub fn violated_preconditions<'a>(
        &'a self,
        state: &'a State,
    ) -> impl Iterator<Item = &'a FactPair> + 'a {
        self.preconditions
            .iter()
            .filter(move |fact| state.get(fact.var) != fact.value)
    }

    /// Successor state. The caller is responsible for checking applicability.
    pub fn apply(&self, state: &State) -> State {
        let mut next = state.clone();
        for fact in &self.effects {
            next.set(fact.var, fact.value);
        }
        next
    }

    pub fn precondition_value(&self, var: VariableId) -> Option<Value> {
        self.preconditions
            .iter()
            .find(|fact| fact.var == var)
            .map(|fact| fact.value)
    }

    pub fn effect_value(&self, var: VariableId) -> Option<Value> {
        self.effects
            .iter()
            .find(|fact| fact.var == var)
            .map(|fact| fact.value)
    }
}

/// A total assignment of values to all task variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    values: Vec<Value>,
}

impl State {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, var: VariableId) -> Value {
        self.values[var]
    }

    pub fn set(&mut self, var: VariableId, value: Value) {
        self.values[var] = value;
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn satisfies(&self, fact: &FactPair) -> bool {
        self.get(fact.var) == fact.value
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}

/// A factored state-transition task.
///
/// Tasks are read-only once built; the pattern generators never mutate them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub variables: Vec<Variable>,
    pub operators: Vec<Operator>,
    pub initial_state: Vec<Value>,
    pub goal: Vec<FactPair>,
}

impl Task {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, var: Variable) -> VariableId {
        let id = self.variables.len();
        self.variables.push(var);
        id
    }

    pub fn add_operator(&mut self, op: Operator) -> OperatorId {
        let id = self.operators.len();
        self.operators.push(op);
        id
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_operators(&self) -> usize {
        self.operators.len()
    }

    pub fn domain_size(&self, var: VariableId) -> usize {
        self.variables[var].domain_size
    }

    pub fn operator(&self, id: OperatorId) -> &Operator {
        &self.operators[id]
    }

    pub fn initial_state(&self) -> State {
        State::new(self.initial_state.clone())
    }

    pub fn is_goal_state(&self, state: &State) -> bool {
        self.goal.iter().all(|fact| state.satisfies(fact))
    }

    /// Goal facts violated by `state`, in goal order.
    pub fn unmet_goals<'a>(&'a self, state: &'a State) -> impl Iterator<Item = &'a FactPair> + 'a {
        self.goal.iter().filter(move |fact| !state.satisfies(fact))
    }

    /// Variables mentioned by the goal, in goal order.
    pub fn goal_variables(&self) -> Vec<VariableId> {
        let mut vars = Vec::with_capacity(self.goal.len());
        for fact in &self.goal {
            if !vars.contains(&fact.var) {
                vars.push(fact.var);
            }
        }
        vars
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Task:")?;
        writeln!(f, "  Variables ({}):", self.variables.len())?;
        for (id, var) in self.variables.iter().enumerate() {
            writeln!(f, "    v{id} {} (|D| = {})", var.name, var.domain_size)?;
        }
        writeln!(f, "  Operators: {}", self.operators.len())?;
        write!(f, "  Goal:")?;
        if self.goal.is_empty() {
            write!(f, " (empty)")?;
        }
        for fact in &self.goal {
            write!(f, " {fact}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door_task() -> Task {
        let mut task = Task::new();
        let at = task.add_variable(Variable::new("at", 2));
        let door = task.add_variable(Variable::new("door", 2));
        task.add_operator(Operator::new(
            "open",
            vec![],
            vec![FactPair::new(door, 1)],
            1,
        ));
        task.add_operator(Operator::new(
            "move",
            vec![FactPair::new(door, 1)],
            vec![FactPair::new(at, 1)],
            2,
        ));
        task.initial_state = vec![0, 0];
        task.goal = vec![FactPair::new(at, 1)];
        task
    }

    #[test]
    fn operator_applicability_and_effects() {
        let task = door_task();
        let init = task.initial_state();
        assert!(task.operator(0).is_applicable(&init));
        assert!(!task.operator(1).is_applicable(&init));
        let violated: Vec<_> = task.operator(1).violated_preconditions(&init).collect();
        assert_eq!(violated, vec![&FactPair::new(1, 1)]);

        let opened = task.operator(0).apply(&init);
        assert_eq!(opened.values(), &[0, 1]);
        let moved = task.operator(1).apply(&opened);
        assert!(task.is_goal_state(&moved));
    }

    #[test]
    fn unmet_goals_preserve_goal_order() {
        let mut task = door_task();
        task.goal = vec![FactPair::new(1, 1), FactPair::new(0, 1)];
        let init = task.initial_state();
        let unmet: Vec<_> = task.unmet_goals(&init).map(|f| f.var).collect();
        assert_eq!(unmet, vec![1, 0]);
        assert_eq!(task.goal_variables(), vec![1, 0]);
    }

    #[test]
    fn fact_lookup_helpers() {
        let task = door_task();
        assert_eq!(task.operator(1).precondition_value(1), Some(1));
        assert_eq!(task.operator(1).precondition_value(0), None);
        assert_eq!(task.operator(1).effect_value(0), Some(1));
    }

    #[test]
    fn display_lists_variables_and_goal() {
        let rendered = door_task().to_string();
        assert!(rendered.contains("v0 at (|D| = 2)"));
        assert!(rendered.contains("Goal: v0=1"));
        assert_eq!(State::new(vec![1, 0, 2]).to_string(), "[1, 0, 2]");
    }
}
