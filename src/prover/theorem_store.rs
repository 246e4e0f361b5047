//! Operator index over the theorems in scope

use crate::absyn::{Exp, Location, Operator, TheoremEntry};
use crate::scope::SymbolTable;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Theorem with its operator set computed once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theorem {
    name: String,
    assertion: Exp,
    operators: BTreeSet<Operator>,
    location: Location,
}

impl Theorem {
    pub fn new(name: impl Into<String>, assertion: Exp, location: Location) -> Self {
        let operators = assertion.operators();
        Self {
            name: name.into(),
            assertion,
            operators,
            location,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn assertion(&self) -> &Exp {
        &self.assertion
    }

    /// Distinct functional symbols appearing anywhere in the assertion
    pub fn operators(&self) -> &BTreeSet<Operator> {
        &self.operators
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Names bound by the leading universal quantifiers
    pub fn pattern_vars(&self) -> Vec<String> {
        self.assertion.strip_universal().0
    }

    /// Assertion without its leading universal quantifiers
    pub fn body(&self) -> &Exp {
        self.assertion.strip_universal().1
    }
}

impl From<&TheoremEntry> for Theorem {
    fn from(entry: &TheoremEntry) -> Self {
        Theorem::new(entry.name.clone(), entry.assertion.clone(), entry.location.clone())
    }
}

/// Theorems indexed by the operators they mention
///
/// Built once per module scope and shared read-only by every prover worker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TheoremStore {
    theorems: Vec<Theorem>,
    by_operator: BTreeMap<Operator, Vec<usize>>,
    zero_op_theorems: Vec<usize>,
}

impl TheoremStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every theorem visible from `scope`
    pub fn from_scope(scope: &dyn SymbolTable) -> Self {
        let mut store = Self::new();
        for entry in scope.theorems() {
            store.add(Theorem::from(entry));
        }
        tracing::debug!(
            "Indexed {} theorem(s) over {} operator(s)",
            store.len(),
            store.by_operator.len()
        );
        store
    }

    /// Add a theorem; returns its index
    pub fn add(&mut self, theorem: Theorem) -> usize {
        let index = self.theorems.len();
        if theorem.operators.is_empty() {
            self.zero_op_theorems.push(index);
        }
        for op in &theorem.operators {
            self.by_operator.entry(op.clone()).or_default().push(index);
        }
        self.theorems.push(theorem);
        index
    }

    pub fn len(&self) -> usize {
        self.theorems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theorems.is_empty()
    }

    pub fn theorems(&self) -> &[Theorem] {
        &self.theorems
    }

    pub fn get(&self, index: usize) -> Option<&Theorem> {
        self.theorems.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Theorem> {
        self.theorems.iter().find(|t| t.name == name)
    }

    /// Theorems mentioning no operator at all
    pub fn zero_op_theorems(&self) -> impl Iterator<Item = &Theorem> {
        self.zero_op_theorems.iter().map(move |&i| &self.theorems[i])
    }

    /// Indices of the theorems whose operator set is a subset of `ops`, in insertion order
    pub fn relevant_indices(&self, ops: &BTreeSet<Operator>) -> Vec<usize> {
        let mut candidates: BTreeSet<usize> = self.zero_op_theorems.iter().copied().collect();
        for op in ops {
            if let Some(bucket) = self.by_operator.get(op) {
                candidates.extend(bucket.iter().copied());
            }
        }
        candidates
            .into_iter()
            .filter(|&i| self.theorems[i].operators.is_subset(ops))
            .collect()
    }

    /// Theorems whose operator set is a subset of `ops`
    ///
    /// Zero-operator theorems are always included.
    pub fn find_relevant_theorems(&self, ops: &BTreeSet<Operator>) -> Vec<&Theorem> {
        self.relevant_indices(ops)
            .into_iter()
            .map(|i| &self.theorems[i])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TheoremStore {
        let mut store = TheoremStore::new();
        // 0: |s| >= 0
        store.add(Theorem::new(
            "Length_Nonneg",
            Exp::forall(
                vec!["s"],
                Exp::infix(Exp::function("|_|", vec![Exp::var("s")]), ">=", Exp::int(0)),
            ),
            Location::default(),
        ));
        // 1: x + 0 = x
        store.add(Theorem::new(
            "Add_Zero",
            Exp::forall(
                vec!["x"],
                Exp::equals(Exp::infix(Exp::var("x"), "+", Exp::int(0)), Exp::var("x")),
            ),
            Location::default(),
        ));
        // 2: true
        store.add(Theorem::new("Trivial", Exp::true_exp(), Location::default()));
        store
    }

    #[test]
    fn test_subset_lookup() {
        let store = store();
        let ops: BTreeSet<Operator> = [Operator::new("+", 2), Operator::new("=", 2)].into();
        let names: Vec<&str> = store.find_relevant_theorems(&ops).iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Add_Zero", "Trivial"]);
    }

    #[test]
    fn test_partial_overlap_excluded() {
        let store = store();
        let ops: BTreeSet<Operator> = [Operator::new("+", 2)].into();
        let names: Vec<&str> = store.find_relevant_theorems(&ops).iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Trivial"]);
    }

    #[test]
    fn test_empty_query_yields_zero_op_theorems() {
        let store = store();
        let found = store.find_relevant_theorems(&BTreeSet::new());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "Trivial");
        assert_eq!(store.zero_op_theorems().count(), 1);
    }

    #[test]
    fn test_qualified_operator_is_distinct() {
        let mut store = TheoremStore::new();
        let mut f = Exp::function("Len", vec![Exp::var("s")]);
        if let crate::absyn::ExpKind::Function { qualifier, .. } = &mut f.kind {
            *qualifier = Some("String_Theory".to_string());
        }
        store.add(Theorem::new("T", Exp::infix(f, ">=", Exp::int(0)), Location::default()));
        let ops: BTreeSet<Operator> = [Operator::new("Len", 1), Operator::new(">=", 2)].into();
        assert!(store.find_relevant_theorems(&ops).is_empty());
    }
}
