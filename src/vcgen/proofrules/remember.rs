use super::ProofRuleApplication;
use crate::absyn::{Exp, ExpKind};
use crate::error::Result;
use crate::vcgen::AssertiveCodeBlock;

/// `Remember;` at procedure entry: incoming values are the current values
pub struct RememberStmtRule;

fn collect_old(exp: &Exp, out: &mut Vec<(Exp, Exp)>) {
    for leaf in exp.variable_leaves() {
        if let ExpKind::Old(inner) = &leaf.kind {
            if !out.iter().any(|(old, _)| old.equivalent(leaf)) {
                out.push((leaf.clone(), inner.as_ref().clone()));
            }
        }
    }
}

impl ProofRuleApplication for RememberStmtRule {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        let mut subs = Vec::new();
        for vc in block.vcs() {
            let seq = vc.sequent();
            for exp in seq.antecedents().iter().chain(seq.consequents()) {
                collect_old(exp, &mut subs);
            }
        }
        block.substitute(&subs);
        Ok(Vec::new())
    }

    fn description(&self) -> &'static str {
        "Remember Rule"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absyn::Location;
    use crate::vcgen::VerificationCondition;

    #[test]
    fn test_remember_drops_old_markers() {
        let mut block = AssertiveCodeBlock::new("Test", Location::default());
        let goal = Exp::equals(
            Exp::function("Reverse", vec![Exp::old(Exp::var("S"))]),
            Exp::var("S"),
        );
        block.add_vc(VerificationCondition::goal(Location::default(), goal));
        RememberStmtRule.apply(&mut block).unwrap();
        assert_eq!(block.vcs()[0].sequent().to_string(), "{} |- {Reverse(S) = S}");
    }
}
