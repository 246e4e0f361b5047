use super::{inherit_detail, mismatch, position_of, splice, ReductionOutcome, ReductionRule};
use crate::absyn::{Exp, Location};
use crate::error::Result;
use crate::sequent::Sequent;
use std::sync::Arc;

/// `Γ ⊢ A and B, Δ` becomes `Γ ⊢ A, Δ` and `Γ ⊢ B, Δ`
///
/// The second sequent is a new goal and gets its own copy of the location.
pub struct RightAndRule<'a> {
    sequent: &'a Sequent,
    exp: &'a Exp,
}

impl<'a> RightAndRule<'a> {
    pub fn new(sequent: &'a Sequent, exp: &'a Exp) -> Self {
        Self { sequent, exp }
    }
}

impl ReductionRule for RightAndRule<'_> {
    fn apply(&self) -> Result<ReductionOutcome> {
        let (a, b) = self
            .exp
            .infix_parts("and")
            .ok_or_else(|| mismatch(self.description(), self.exp))?;
        let index = position_of(self.description(), self.sequent.consequents(), self.exp)?;
        let antecedents = self.sequent.antecedents().to_vec();

        let first = splice(self.sequent.consequents(), index, vec![inherit_detail(a, self.exp)]);
        let second = splice(self.sequent.consequents(), index, vec![inherit_detail(b, self.exp)]);
        let copied: Arc<Location> = Arc::new(Location::clone(self.sequent.location()));

        Ok(ReductionOutcome {
            sequents: vec![
                self.sequent.with_members(antecedents.clone(), first),
                Sequent::new(copied, antecedents, second),
            ],
            impacting: true,
        })
    }

    fn description(&self) -> &'static str {
        "Right And Rule"
    }
}

/// `Γ ⊢ A or B, Δ` becomes `Γ ⊢ A, B, Δ`
pub struct RightOrRule<'a> {
    sequent: &'a Sequent,
    exp: &'a Exp,
}

impl<'a> RightOrRule<'a> {
    pub fn new(sequent: &'a Sequent, exp: &'a Exp) -> Self {
        Self { sequent, exp }
    }
}

impl ReductionRule for RightOrRule<'_> {
    fn apply(&self) -> Result<ReductionOutcome> {
        let (a, b) = self
            .exp
            .infix_parts("or")
            .ok_or_else(|| mismatch(self.description(), self.exp))?;
        let index = position_of(self.description(), self.sequent.consequents(), self.exp)?;

        let consequents = splice(
            self.sequent.consequents(),
            index,
            vec![inherit_detail(a, self.exp), inherit_detail(b, self.exp)],
        );
        Ok(ReductionOutcome {
            sequents: vec![self
                .sequent
                .with_members(self.sequent.antecedents().to_vec(), consequents)],
            impacting: false,
        })
    }

    fn description(&self) -> &'static str {
        "Right Or Rule"
    }
}

/// `Γ ⊢ A implies B, Δ` becomes `Γ, A ⊢ B, Δ`
pub struct RightImpliesRule<'a> {
    sequent: &'a Sequent,
    exp: &'a Exp,
}

impl<'a> RightImpliesRule<'a> {
    pub fn new(sequent: &'a Sequent, exp: &'a Exp) -> Self {
        Self { sequent, exp }
    }
}

impl ReductionRule for RightImpliesRule<'_> {
    fn apply(&self) -> Result<ReductionOutcome> {
        let (a, b) = self
            .exp
            .infix_parts("implies")
            .ok_or_else(|| mismatch(self.description(), self.exp))?;
        let index = position_of(self.description(), self.sequent.consequents(), self.exp)?;

        let mut antecedents = self.sequent.antecedents().to_vec();
        antecedents.push(a.clone());
        let consequents = splice(self.sequent.consequents(), index, vec![inherit_detail(b, self.exp)]);
        Ok(ReductionOutcome {
            sequents: vec![self.sequent.with_members(antecedents, consequents)],
            impacting: false,
        })
    }

    fn description(&self) -> &'static str {
        "Right Implies Rule"
    }
}

/// `Γ ⊢ not A, Δ` becomes `Γ, A ⊢ Δ`
pub struct RightNotRule<'a> {
    sequent: &'a Sequent,
    exp: &'a Exp,
}

impl<'a> RightNotRule<'a> {
    pub fn new(sequent: &'a Sequent, exp: &'a Exp) -> Self {
        Self { sequent, exp }
    }
}

impl ReductionRule for RightNotRule<'_> {
    fn apply(&self) -> Result<ReductionOutcome> {
        let a = self
            .exp
            .prefix_arg("not")
            .ok_or_else(|| mismatch(self.description(), self.exp))?;
        let index = position_of(self.description(), self.sequent.consequents(), self.exp)?;

        let mut antecedents = self.sequent.antecedents().to_vec();
        antecedents.push(a.clone());
        let consequents = splice(self.sequent.consequents(), index, Vec::new());
        Ok(ReductionOutcome {
            sequents: vec![self.sequent.with_members(antecedents, consequents)],
            impacting: true,
        })
    }

    fn description(&self) -> &'static str {
        "Right Not Rule"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::new("Right.co", 7, 3)
    }

    #[test]
    fn test_right_and_clones_second_location() {
        let and = Exp::and(Exp::var("A"), Exp::var("B"));
        let seq = Sequent::new(loc(), vec![], vec![and.clone()]);
        let outcome = RightAndRule::new(&seq, &and).apply().unwrap();

        let (first, second) = (&outcome.sequents[0], &outcome.sequents[1]);
        assert_eq!(first.consequents(), &[Exp::var("A")]);
        assert_eq!(second.consequents(), &[Exp::var("B")]);
        assert!(Arc::ptr_eq(first.location(), seq.location()));
        assert!(!Arc::ptr_eq(second.location(), seq.location()));
        assert_eq!(second.location(), seq.location());
        assert!(outcome.impacting);
    }

    #[test]
    fn test_right_or_splits_in_place() {
        let or = Exp::or(Exp::var("A"), Exp::var("B"));
        let seq = Sequent::new(loc(), vec![Exp::var("H")], vec![Exp::var("G"), or.clone()]);
        let outcome = RightOrRule::new(&seq, &or).apply().unwrap();
        assert_eq!(outcome.sequents[0].to_string(), "{H} |- {G, A, B}");
    }

    #[test]
    fn test_right_implies_adds_hypothesis() {
        let imp = Exp::implies(Exp::var("X"), Exp::var("Y"));
        let seq = Sequent::new(loc(), vec![Exp::var("H")], vec![imp.clone()]);
        let outcome = RightImpliesRule::new(&seq, &imp).apply().unwrap();
        assert_eq!(outcome.sequents[0].to_string(), "{H, X} |- {Y}");
        assert!(!outcome.impacting);
    }

    #[test]
    fn test_right_not_moves_to_antecedents() {
        let not = Exp::not(Exp::var("A"));
        let seq = Sequent::new(loc(), vec![], vec![not.clone(), Exp::var("G")]);
        let outcome = RightNotRule::new(&seq, &not).apply().unwrap();
        assert_eq!(outcome.sequents[0].to_string(), "{A} |- {G}");
    }
}
