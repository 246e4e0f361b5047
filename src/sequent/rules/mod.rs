//! One-step sequent calculus rules
//!
//! Each rule value is built for a single application: it borrows the sequent
//! and the member formula it targets, and [`ReductionRule::apply`] returns the
//! sequents that together are equivalent to the original. Handing a rule a
//! formula of the wrong shape is an internal error, never a "no match".

mod left;
mod quantifier;
mod right;

pub use left::{LeftAndRule, LeftImpliesRule, LeftNotRule, LeftOrRule};
pub use quantifier::QuantifierRule;
pub use right::{RightAndRule, RightImpliesRule, RightNotRule, RightOrRule};

use super::Sequent;
use crate::absyn::{Exp, ExpKind};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which side of the turnstile a formula sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Antecedent,
    Consequent,
}

/// Result of one rule application
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionOutcome {
    /// Resulting sequents, in rule order
    pub sequents: Vec<Sequent>,
    /// Set when the step entered a negation or produced a new independent goal
    pub impacting: bool,
}

/// A sequent calculus rule
pub trait ReductionRule {
    /// Apply the rule once
    fn apply(&self) -> Result<ReductionOutcome>;

    /// Human readable rule name
    fn description(&self) -> &'static str;
}

/// Pick the rule for a non-atomic member of a sequent
pub fn rule_for<'a>(
    sequent: &'a Sequent,
    side: Side,
    exp: &'a Exp,
) -> Result<Box<dyn ReductionRule + 'a>> {
    let rule: Box<dyn ReductionRule + 'a> = match (&exp.kind, side) {
        (ExpKind::Quantified { .. }, _) => Box::new(QuantifierRule::new(sequent, side, exp)),
        (ExpKind::Infix { op, .. }, Side::Antecedent) => match op.as_str() {
            "and" => Box::new(LeftAndRule::new(sequent, exp)),
            "or" => Box::new(LeftOrRule::new(sequent, exp)),
            "implies" => Box::new(LeftImpliesRule::new(sequent, exp)),
            _ => return Err(mismatch("Rule Selection", exp)),
        },
        (ExpKind::Infix { op, .. }, Side::Consequent) => match op.as_str() {
            "and" => Box::new(RightAndRule::new(sequent, exp)),
            "or" => Box::new(RightOrRule::new(sequent, exp)),
            "implies" => Box::new(RightImpliesRule::new(sequent, exp)),
            _ => return Err(mismatch("Rule Selection", exp)),
        },
        (ExpKind::Prefix { op, .. }, Side::Antecedent) if op == "not" => {
            Box::new(LeftNotRule::new(sequent, exp))
        }
        (ExpKind::Prefix { op, .. }, Side::Consequent) if op == "not" => {
            Box::new(RightNotRule::new(sequent, exp))
        }
        _ => return Err(mismatch("Rule Selection", exp)),
    };
    Ok(rule)
}

pub(crate) fn mismatch(rule: &str, exp: &Exp) -> Error {
    Error::UnexpectedExpression {
        rule: rule.to_string(),
        expression: exp.to_string(),
        kind: exp.kind_name().to_string(),
    }
}

/// Position of `exp` among `members`, by structural equality
fn position_of(rule: &str, members: &[Exp], exp: &Exp) -> Result<usize> {
    members.iter().position(|m| m == exp).ok_or_else(|| mismatch(rule, exp))
}

/// Replace the member at `index` with `replacements`, keeping the others in order
fn splice(members: &[Exp], index: usize, replacements: Vec<Exp>) -> Vec<Exp> {
    let mut out = Vec::with_capacity(members.len() + replacements.len());
    out.extend_from_slice(&members[..index]);
    out.extend(replacements);
    out.extend_from_slice(&members[index + 1..]);
    out
}

/// Copy `child`, inheriting the provenance tag of the connective it came from
fn inherit_detail(child: &Exp, parent: &Exp) -> Exp {
    let mut child = child.clone();
    if child.detail.is_none() {
        child.detail = parent.detail.clone();
    }
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absyn::Location;

    #[test]
    fn test_rule_selection_rejects_atomic_formula() {
        let atom = Exp::equals(Exp::var("x"), Exp::int(0));
        let seq = Sequent::new(Location::default(), vec![atom.clone()], vec![]);
        let err = rule_for(&seq, Side::Antecedent, &atom).err().unwrap();
        assert!(matches!(err, Error::UnexpectedExpression { .. }));
    }

    #[test]
    fn test_rule_selection_by_side() {
        let exp = Exp::and(Exp::var("a"), Exp::var("b"));
        let seq = Sequent::new(Location::default(), vec![exp.clone()], vec![exp.clone()]);
        assert_eq!(rule_for(&seq, Side::Antecedent, &exp).unwrap().description(), "Left And Rule");
        assert_eq!(rule_for(&seq, Side::Consequent, &exp).unwrap().description(), "Right And Rule");
    }
}
