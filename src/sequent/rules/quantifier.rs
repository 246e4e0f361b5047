use super::{inherit_detail, mismatch, position_of, splice, ReductionOutcome, ReductionRule, Side};
use crate::absyn::{fresh_name, Exp, ExpKind, Quantifier};
use crate::error::Result;
use crate::sequent::Sequent;

/// Strips a top-level quantifier, renaming its bound variables apart
///
/// On the right of `⊢` a universal (and on the left an existential) is replaced
/// by fresh eigen-variables, which is an equivalence. The other two positions
/// are instantiated with fresh free variables as well: the resulting sequent
/// implies the original, so a proof of it is still a proof of the original.
pub struct QuantifierRule<'a> {
    sequent: &'a Sequent,
    side: Side,
    exp: &'a Exp,
}

impl<'a> QuantifierRule<'a> {
    pub fn new(sequent: &'a Sequent, side: Side, exp: &'a Exp) -> Self {
        Self { sequent, side, exp }
    }

    fn quantifier(&self) -> Option<Quantifier> {
        match &self.exp.kind {
            ExpKind::Quantified { quantifier, .. } => Some(*quantifier),
            _ => None,
        }
    }
}

impl ReductionRule for QuantifierRule<'_> {
    fn apply(&self) -> Result<ReductionOutcome> {
        let (vars, body) = match &self.exp.kind {
            ExpKind::Quantified { vars, body, .. } => (vars, body),
            _ => return Err(mismatch(self.description(), self.exp)),
        };

        let mut taken = self.sequent.free_variables();
        let mut subs = Vec::with_capacity(vars.len());
        for var in vars {
            let name = fresh_name(var, &taken);
            taken.insert(name.clone());
            if name != *var {
                subs.push((Exp::var(var.clone()), Exp::var(name)));
            }
        }
        let opened = inherit_detail(&body.substitute(&subs), self.exp);

        let sequent = match self.side {
            Side::Antecedent => {
                let index = position_of(self.description(), self.sequent.antecedents(), self.exp)?;
                self.sequent.with_members(
                    splice(self.sequent.antecedents(), index, vec![opened]),
                    self.sequent.consequents().to_vec(),
                )
            }
            Side::Consequent => {
                let index = position_of(self.description(), self.sequent.consequents(), self.exp)?;
                self.sequent.with_members(
                    self.sequent.antecedents().to_vec(),
                    splice(self.sequent.consequents(), index, vec![opened]),
                )
            }
        };

        Ok(ReductionOutcome {
            sequents: vec![sequent],
            impacting: false,
        })
    }

    fn description(&self) -> &'static str {
        match (self.side, self.quantifier()) {
            (Side::Antecedent, Some(Quantifier::Forall)) => "Left Forall Rule",
            (Side::Antecedent, _) => "Left Exists Rule",
            (Side::Consequent, Some(Quantifier::Forall)) => "Right Forall Rule",
            (Side::Consequent, _) => "Right Exists Rule",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absyn::Location;

    #[test]
    fn test_right_forall_renames_apart() {
        let body = Exp::infix(Exp::var("x"), "<=", Exp::var("n"));
        let all = Exp::forall(vec!["x"], body);
        let seq = Sequent::new(
            Location::default(),
            vec![Exp::equals(Exp::var("x"), Exp::int(0))],
            vec![all.clone()],
        );
        let outcome = QuantifierRule::new(&seq, Side::Consequent, &all).apply().unwrap();
        assert_eq!(outcome.sequents[0].to_string(), "{x = 0} |- {x_1 <= n}");
    }

    #[test]
    fn test_left_exists_keeps_unused_names() {
        let some = Exp::exists(vec!["k"], Exp::function("P", vec![Exp::var("k")]));
        let seq = Sequent::new(Location::default(), vec![some.clone()], vec![]);
        let rule = QuantifierRule::new(&seq, Side::Antecedent, &some);
        assert_eq!(rule.description(), "Left Exists Rule");
        let outcome = rule.apply().unwrap();
        assert_eq!(outcome.sequents[0].to_string(), "{P(k)} |- {}");
    }
}
