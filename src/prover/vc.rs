use crate::absyn::{Exp, Operator};
use crate::error::{Error, Result};
use crate::sequent::AtomicFormulaChecker;
use crate::vcgen::VerificationCondition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Atomic VC in the form the prover consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmutableVc {
    name: String,
    antecedents: Vec<Exp>,
    consequents: Vec<Exp>,
    operators: BTreeSet<Operator>,
}

impl ImmutableVc {
    /// Fails with [`Error::NonAtomicVc`] when a member still has a logical connective at its top
    pub fn new(vc: &VerificationCondition) -> Result<Self> {
        let sequent = vc.sequent();
        if !sequent.consist_of_atomic_formulas() {
            return Err(Error::NonAtomicVc {
                name: vc.name().to_string(),
                formula: sequent.to_string(),
            });
        }
        Ok(Self::from_parts(
            vc.name(),
            sequent.antecedents().to_vec(),
            sequent.consequents().to_vec(),
        ))
    }

    /// Build directly from atomic members; used by hosts that reduce sequents themselves
    pub fn from_parts(name: impl Into<String>, antecedents: Vec<Exp>, consequents: Vec<Exp>) -> Self {
        let operators = antecedents
            .iter()
            .chain(&consequents)
            .flat_map(|e| e.operators())
            .collect();
        Self {
            name: name.into(),
            antecedents,
            consequents,
            operators,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn antecedents(&self) -> &[Exp] {
        &self.antecedents
    }

    pub fn consequents(&self) -> &[Exp] {
        &self.consequents
    }

    /// Operators of every member, the key for theorem lookup
    pub fn operators(&self) -> &BTreeSet<Operator> {
        &self.operators
    }

    pub fn is_atomic(&self) -> bool {
        let checker = AtomicFormulaChecker;
        self.antecedents
            .iter()
            .chain(&self.consequents)
            .all(|e| checker.is_atomic(e))
    }
}
