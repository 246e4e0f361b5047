use super::ProofRuleApplication;
use crate::absyn::Exp;
use crate::error::Result;
use crate::sequent::Sequent;
use crate::vcgen::AssertiveCodeBlock;

/// `Assume P;` adds `P` to the hypotheses of every VC
///
/// Non-stipulated assumptions are added parsimoniously: an equality whose one
/// side is a variable mentioned by the VC is used as a substitution instead of
/// a hypothesis, and the remaining conjuncts are added only when they share a
/// variable with the VC (directly or through other added conjuncts).
pub struct AssumeStmtRule<'a> {
    assertion: &'a Exp,
    stipulate: bool,
    parsimonious: bool,
}

impl<'a> AssumeStmtRule<'a> {
    pub fn new(assertion: &'a Exp, stipulate: bool, parsimonious: bool) -> Self {
        Self {
            assertion,
            stipulate,
            parsimonious,
        }
    }

    fn assume_into(&self, sequent: &Sequent, conjuncts: &[Exp]) -> Sequent {
        if self.stipulate || !self.parsimonious {
            return sequent.add_antecedents(conjuncts.iter().cloned());
        }

        let mut sequent = sequent.clone();
        let mut pending = conjuncts.to_vec();
        let mut kept: Vec<Exp> = Vec::new();
        for i in 0..pending.len() {
            let conjunct = pending[i].clone();
            if let Some((var, value)) = replaceable_equality(&conjunct) {
                if mentions(&sequent, var) {
                    let subs = [(var.clone(), value.clone())];
                    sequent = sequent.substitute(&subs);
                    for later in pending.iter_mut().skip(i + 1) {
                        *later = later.substitute(&subs);
                    }
                    for earlier in kept.iter_mut() {
                        *earlier = earlier.substitute(&subs);
                    }
                    continue;
                }
            }
            kept.push(conjunct);
        }

        let mut symbols = sequent.free_variables();
        let mut selected = vec![false; kept.len()];
        loop {
            let mut changed = false;
            for (j, conjunct) in kept.iter().enumerate() {
                if selected[j] {
                    continue;
                }
                let vars = conjunct.free_variables();
                if conjunct.is_literal_false() || vars.is_empty() || !vars.is_disjoint(&symbols) {
                    selected[j] = true;
                    symbols.extend(vars);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        sequent.add_antecedents(
            kept.into_iter()
                .zip(selected)
                .filter_map(|(c, keep)| keep.then_some(c)),
        )
    }
}

/// `(x, e)` for an equality `x = e` or `e = x` where `x` does not occur in `e`
fn replaceable_equality(exp: &Exp) -> Option<(&Exp, &Exp)> {
    let (left, right) = exp.infix_parts("=")?;
    if left.is_variable_like() && !right.contains(left) {
        Some((left, right))
    } else if right.is_variable_like() && !left.contains(right) {
        Some((right, left))
    } else {
        None
    }
}

fn mentions(sequent: &Sequent, var: &Exp) -> bool {
    sequent
        .antecedents()
        .iter()
        .chain(sequent.consequents())
        .any(|e| e.contains(var))
}

impl ProofRuleApplication for AssumeStmtRule<'_> {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        let conjuncts: Vec<Exp> = self
            .assertion
            .conjuncts()
            .into_iter()
            .filter(|c| !c.is_literal_true())
            .collect();
        if !conjuncts.is_empty() {
            block.update_vcs(|vc| vc.with_sequent(self.assume_into(vc.sequent(), &conjuncts)));
        }
        Ok(Vec::new())
    }

    fn description(&self) -> &'static str {
        "Assume Rule"
    }
}
