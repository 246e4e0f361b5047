use super::{inherit_detail, mismatch, position_of, splice, ReductionOutcome, ReductionRule};
use crate::absyn::Exp;
use crate::error::Result;
use crate::sequent::Sequent;

/// `Γ, A and B ⊢ Δ` becomes `Γ, A, B ⊢ Δ`
pub struct LeftAndRule<'a> {
    sequent: &'a Sequent,
    exp: &'a Exp,
}

impl<'a> LeftAndRule<'a> {
    pub fn new(sequent: &'a Sequent, exp: &'a Exp) -> Self {
        Self { sequent, exp }
    }
}

impl ReductionRule for LeftAndRule<'_> {
    fn apply(&self) -> Result<ReductionOutcome> {
        let (a, b) = self
            .exp
            .infix_parts("and")
            .ok_or_else(|| mismatch(self.description(), self.exp))?;
        let index = position_of(self.description(), self.sequent.antecedents(), self.exp)?;

        let antecedents = splice(
            self.sequent.antecedents(),
            index,
            vec![inherit_detail(a, self.exp), inherit_detail(b, self.exp)],
        );
        Ok(ReductionOutcome {
            sequents: vec![self
                .sequent
                .with_members(antecedents, self.sequent.consequents().to_vec())],
            impacting: false,
        })
    }

    fn description(&self) -> &'static str {
        "Left And Rule"
    }
}

/// `Γ, A or B ⊢ Δ` becomes `Γ, A ⊢ Δ` and `Γ, B ⊢ Δ`
///
/// Both branches restate the same goal, so the connective's provenance tag is
/// not pushed down; the goal keeps reporting the location it already had.
pub struct LeftOrRule<'a> {
    sequent: &'a Sequent,
    exp: &'a Exp,
}

impl<'a> LeftOrRule<'a> {
    pub fn new(sequent: &'a Sequent, exp: &'a Exp) -> Self {
        Self { sequent, exp }
    }
}

impl ReductionRule for LeftOrRule<'_> {
    fn apply(&self) -> Result<ReductionOutcome> {
        let (a, b) = self
            .exp
            .infix_parts("or")
            .ok_or_else(|| mismatch(self.description(), self.exp))?;
        let index = position_of(self.description(), self.sequent.antecedents(), self.exp)?;
        let consequents = self.sequent.consequents().to_vec();

        let first = splice(self.sequent.antecedents(), index, vec![a.clone()]);
        let second = splice(self.sequent.antecedents(), index, vec![b.clone()]);
        Ok(ReductionOutcome {
            sequents: vec![
                self.sequent.with_members(first, consequents.clone()),
                self.sequent.with_members(second, consequents),
            ],
            impacting: false,
        })
    }

    fn description(&self) -> &'static str {
        "Left Or Rule"
    }
}

/// `Γ, A implies B ⊢ Δ` becomes `Γ, B ⊢ Δ` and `Γ ⊢ A, Δ`
pub struct LeftImpliesRule<'a> {
    sequent: &'a Sequent,
    exp: &'a Exp,
}

impl<'a> LeftImpliesRule<'a> {
    pub fn new(sequent: &'a Sequent, exp: &'a Exp) -> Self {
        Self { sequent, exp }
    }
}

impl ReductionRule for LeftImpliesRule<'_> {
    fn apply(&self) -> Result<ReductionOutcome> {
        let (a, b) = self
            .exp
            .infix_parts("implies")
            .ok_or_else(|| mismatch(self.description(), self.exp))?;
        let index = position_of(self.description(), self.sequent.antecedents(), self.exp)?;

        let with_b = splice(
            self.sequent.antecedents(),
            index,
            vec![inherit_detail(b, self.exp)],
        );
        let without = splice(self.sequent.antecedents(), index, Vec::new());
        let mut consequents_with_a = vec![inherit_detail(a, self.exp)];
        consequents_with_a.extend_from_slice(self.sequent.consequents());

        Ok(ReductionOutcome {
            sequents: vec![
                self.sequent
                    .with_members(with_b, self.sequent.consequents().to_vec()),
                self.sequent.with_members(without, consequents_with_a),
            ],
            impacting: true,
        })
    }

    fn description(&self) -> &'static str {
        "Left Implies Rule"
    }
}

/// `Γ, not A ⊢ Δ` becomes `Γ ⊢ Δ, A`
pub struct LeftNotRule<'a> {
    sequent: &'a Sequent,
    exp: &'a Exp,
}

impl<'a> LeftNotRule<'a> {
    pub fn new(sequent: &'a Sequent, exp: &'a Exp) -> Self {
        Self { sequent, exp }
    }
}

impl ReductionRule for LeftNotRule<'_> {
    fn apply(&self) -> Result<ReductionOutcome> {
        let a = self
            .exp
            .prefix_arg("not")
            .ok_or_else(|| mismatch(self.description(), self.exp))?;
        let index = position_of(self.description(), self.sequent.antecedents(), self.exp)?;

        let antecedents = splice(self.sequent.antecedents(), index, Vec::new());
        let mut consequents = self.sequent.consequents().to_vec();
        consequents.push(inherit_detail(a, self.exp));
        Ok(ReductionOutcome {
            sequents: vec![self.sequent.with_members(antecedents, consequents)],
            impacting: true,
        })
    }

    fn description(&self) -> &'static str {
        "Left Not Rule"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absyn::{Location, LocationDetailModel};
    use crate::error::Error;

    fn loc() -> Location {
        Location::new("Left.co", 1, 1)
    }

    #[test]
    fn test_left_and_keeps_position() {
        let and = Exp::and(Exp::var("A"), Exp::var("B"));
        let seq = Sequent::new(loc(), vec![Exp::var("H"), and.clone(), Exp::var("K")], vec![Exp::var("G")]);
        let outcome = LeftAndRule::new(&seq, &and).apply().unwrap();
        assert_eq!(outcome.sequents.len(), 1);
        assert_eq!(outcome.sequents[0].to_string(), "{H, A, B, K} |- {G}");
        assert!(!outcome.impacting);
    }

    #[test]
    fn test_left_or_does_not_push_detail() {
        let detail = LocationDetailModel::new(loc(), loc(), "Requires Clause of Pop");
        let or = Exp::or(Exp::var("P"), Exp::var("Q")).with_detail(detail);
        let seq = Sequent::new(loc(), vec![or.clone()], vec![]);
        let outcome = LeftOrRule::new(&seq, &or).apply().unwrap();
        assert_eq!(outcome.sequents.len(), 2);
        assert_eq!(outcome.sequents[0].antecedents(), &[Exp::var("P")]);
        assert_eq!(outcome.sequents[1].antecedents(), &[Exp::var("Q")]);
        assert!(outcome.sequents[0].antecedents()[0].detail.is_none());
    }

    #[test]
    fn test_left_implies_branches() {
        let imp = Exp::implies(Exp::var("A"), Exp::var("B"));
        let seq = Sequent::new(loc(), vec![Exp::var("H"), imp.clone()], vec![Exp::var("G")]);
        let outcome = LeftImpliesRule::new(&seq, &imp).apply().unwrap();
        assert_eq!(outcome.sequents[0].to_string(), "{H, B} |- {G}");
        assert_eq!(outcome.sequents[1].to_string(), "{H} |- {A, G}");
        assert!(outcome.impacting);
    }

    #[test]
    fn test_left_not_moves_to_consequents() {
        let not = Exp::not(Exp::var("A"));
        let seq = Sequent::new(loc(), vec![not.clone()], vec![Exp::var("G")]);
        let outcome = LeftNotRule::new(&seq, &not).apply().unwrap();
        assert_eq!(outcome.sequents[0].to_string(), "{} |- {G, A}");
    }

    #[test]
    fn test_wrong_connective_is_internal_error() {
        let and = Exp::and(Exp::var("A"), Exp::var("B"));
        let seq = Sequent::new(loc(), vec![and.clone()], vec![]);
        let err = LeftOrRule::new(&seq, &and).apply().unwrap_err();
        assert!(matches!(err, Error::UnexpectedExpression { .. }));
        assert!(err.to_string().contains("Left Or Rule"));
    }
}
