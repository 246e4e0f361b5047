//! Elaboration rules derived from theorems
//!
//! An elaboration rule says: once every precursor occurs in a VC (under one
//! consistent instantiation of the theorem's variables), the resultant may be
//! added as a new local theorem.

use super::theorem_store::Theorem;
use crate::absyn::Exp;
use crate::config::ElaborationMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElaborationRule {
    theorem: String,
    vars: Vec<String>,
    precursors: Vec<Exp>,
    /// Sub-expression whose determinism admitted the rule
    candidate: Exp,
    resultant: Exp,
}

impl ElaborationRule {
    pub fn theorem(&self) -> &str {
        &self.theorem
    }

    /// Pattern variables of the source theorem
    pub fn vars(&self) -> &[String] {
        &self.vars
    }

    pub fn precursors(&self) -> &[Exp] {
        &self.precursors
    }

    pub fn candidate(&self) -> &Exp {
        &self.candidate
    }

    pub fn resultant(&self) -> &Exp {
        &self.resultant
    }
}

/// Whether every direct sub-expression of `candidate` is a variable leaf of some precursor
pub fn is_deterministic(precursors: &[Exp], candidate: &Exp) -> bool {
    let leaves: Vec<&Exp> = precursors.iter().flat_map(|p| p.variable_leaves()).collect();
    candidate
        .sub_expressions()
        .iter()
        .all(|sub| leaves.iter().any(|leaf| leaf.equivalent(sub)))
}

/// Equation `candidate = counterpart` when `body` equates the two, else `body`
///
/// The resultant is always a formula: a bare term asserted as a local theorem
/// would be merged with `true`.
fn oriented_resultant(body: &Exp, candidate: &Exp) -> Exp {
    match body.infix_parts("=") {
        Some((lhs, rhs)) if rhs.equivalent(candidate) && !lhs.equivalent(candidate) => {
            Exp::equals(rhs.clone(), lhs.clone())
        }
        _ => body.clone(),
    }
}

/// Derive the elaboration rules of one theorem
///
/// A single-clause theorem yields one rule per direct sub-expression `e` whose
/// siblings determine it. In [`ElaborationMode::Literal`] the resultant is the
/// whole assertion; [`ElaborationMode::Subexpression`] orients an equation so
/// that `e` is its left side and keeps any other assertion whole. A theorem
/// whose body is a conjunction yields one rule per clause, the clause being the
/// resultant and the other clauses its precursors.
pub fn derive_rules(theorem: &Theorem, mode: ElaborationMode) -> Vec<ElaborationRule> {
    let vars = theorem.pattern_vars();
    let body = theorem.body();
    let clauses = body.conjuncts();
    let mut rules = Vec::new();

    if clauses.len() == 1 {
        let subs = body.sub_expressions();
        if subs.len() < 2 {
            return rules;
        }
        for (i, candidate) in subs.iter().enumerate() {
            let precursors: Vec<Exp> = subs
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, e)| (*e).clone())
                .collect();
            if !is_deterministic(&precursors, candidate) {
                continue;
            }
            let resultant = match mode {
                ElaborationMode::Literal => body.clone(),
                ElaborationMode::Subexpression => oriented_resultant(body, candidate),
            };
            rules.push(ElaborationRule {
                theorem: theorem.name().to_string(),
                vars: vars.clone(),
                precursors,
                candidate: (*candidate).clone(),
                resultant,
            });
        }
    } else {
        for (i, clause) in clauses.iter().enumerate() {
            let precursors: Vec<Exp> = clauses
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, c)| c.clone())
                .collect();
            if !is_deterministic(&precursors, clause) {
                continue;
            }
            rules.push(ElaborationRule {
                theorem: theorem.name().to_string(),
                vars: vars.clone(),
                precursors,
                candidate: clause.clone(),
                resultant: clause.clone(),
            });
        }
    }
    rules
}

/// Rules of every theorem, in theorem order
pub fn derive_all<'a>(
    theorems: impl IntoIterator<Item = &'a Theorem>,
    mode: ElaborationMode,
) -> Vec<ElaborationRule> {
    theorems
        .into_iter()
        .flat_map(|t| derive_rules(t, mode))
        .collect()
}
