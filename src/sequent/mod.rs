//! Sequents and their reduction to atomic form
//!
//! A [`Sequent`] `Γ ⊢ Δ` holds when the conjunction of its antecedents implies
//! the disjunction of its consequents. [`SequentReduction`] repeatedly applies
//! the left/right rules in [`rules`] until no member has a logical connective or
//! quantifier at the top.

mod atomic;
mod reduction;
pub mod rules;

pub use atomic::AtomicFormulaChecker;
pub use reduction::{ReducedSequent, ReductionTree, SequentReduction};
pub use rules::{ReductionOutcome, ReductionRule, Side};

use crate::absyn::{Exp, Location};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Antecedents ⊢ consequents
///
/// The location is reference counted: sequents produced by an equivalence
/// preserving step share it, a genuinely new goal gets its own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequent {
    location: Arc<Location>,
    antecedents: Vec<Exp>,
    consequents: Vec<Exp>,
}

impl Sequent {
    /// Create a sequent
    pub fn new(location: impl Into<Arc<Location>>, antecedents: Vec<Exp>, consequents: Vec<Exp>) -> Self {
        Self {
            location: location.into(),
            antecedents,
            consequents,
        }
    }

    /// Sequent with no antecedents and no consequents
    pub fn empty(location: impl Into<Arc<Location>>) -> Self {
        Self::new(location, Vec::new(), Vec::new())
    }

    pub fn location(&self) -> &Arc<Location> {
        &self.location
    }

    pub fn antecedents(&self) -> &[Exp] {
        &self.antecedents
    }

    pub fn consequents(&self) -> &[Exp] {
        &self.consequents
    }

    pub fn is_empty(&self) -> bool {
        self.antecedents.is_empty() && self.consequents.is_empty()
    }

    /// Whether every member is atomic
    pub fn consist_of_atomic_formulas(&self) -> bool {
        let checker = AtomicFormulaChecker;
        self.antecedents
            .iter()
            .chain(&self.consequents)
            .all(|e| checker.is_atomic(e))
    }

    /// Whether an equivalent formula is among the antecedents
    pub fn has_antecedent(&self, exp: &Exp) -> bool {
        self.antecedents.iter().any(|a| a.equivalent(exp))
    }

    /// Whether an equivalent formula is among the consequents
    pub fn has_consequent(&self, exp: &Exp) -> bool {
        self.consequents.iter().any(|c| c.equivalent(exp))
    }

    /// Copy with the same location and different members
    pub fn with_members(&self, antecedents: Vec<Exp>, consequents: Vec<Exp>) -> Sequent {
        Sequent {
            location: Arc::clone(&self.location),
            antecedents,
            consequents,
        }
    }

    /// Add antecedents, skipping ones already present
    pub fn add_antecedents(&self, exps: impl IntoIterator<Item = Exp>) -> Sequent {
        let mut antecedents = self.antecedents.clone();
        for exp in exps {
            if !antecedents.iter().any(|a| a.equivalent(&exp)) {
                antecedents.push(exp);
            }
        }
        self.with_members(antecedents, self.consequents.clone())
    }

    /// Apply a substitution to every member
    pub fn substitute(&self, subs: &[(Exp, Exp)]) -> Sequent {
        self.with_members(
            self.antecedents.iter().map(|e| e.substitute(subs)).collect(),
            self.consequents.iter().map(|e| e.substitute(subs)).collect(),
        )
    }

    /// Free variable and operator names over all members
    pub fn symbols(&self) -> BTreeSet<String> {
        self.antecedents
            .iter()
            .chain(&self.consequents)
            .flat_map(|e| e.symbols())
            .collect()
    }

    /// Free variable names over all members
    pub fn free_variables(&self) -> BTreeSet<String> {
        self.antecedents
            .iter()
            .chain(&self.consequents)
            .flat_map(|e| e.free_variables())
            .collect()
    }
}

fn write_members(f: &mut fmt::Formatter<'_>, exps: &[Exp]) -> fmt::Result {
    write!(f, "{{")?;
    for (i, exp) in exps.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", exp)?;
    }
    write!(f, "}}")
}

impl fmt::Display for Sequent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_members(f, &self.antecedents)?;
        write!(f, " |- ")?;
        write_members(f, &self.consequents)
    }
}
