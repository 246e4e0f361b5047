use super::ProofRuleApplication;
use crate::absyn::Exp;
use crate::error::Result;
use crate::vcgen::AssertiveCodeBlock;

/// `x := e;` replaces `x` by `e` in every VC
pub struct FuncAssignStmtRule<'a> {
    var: &'a Exp,
    value: &'a Exp,
}

impl<'a> FuncAssignStmtRule<'a> {
    pub fn new(var: &'a Exp, value: &'a Exp) -> Self {
        Self { var, value }
    }
}

impl ProofRuleApplication for FuncAssignStmtRule<'_> {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        block.substitute(&[(self.var.clone(), self.value.clone())]);
        Ok(Vec::new())
    }

    fn description(&self) -> &'static str {
        "Function Assignment Rule"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absyn::Location;
    use crate::vcgen::VerificationCondition;

    #[test]
    fn test_assignment_substitutes_value() {
        let mut block = AssertiveCodeBlock::new("Test", Location::default());
        let goal = Exp::equals(Exp::var("x"), Exp::old(Exp::var("x")));
        block.add_vc(VerificationCondition::goal(Location::default(), goal));

        let (x, value) = (Exp::var("x"), Exp::infix(Exp::var("x"), "+", Exp::int(1)));
        FuncAssignStmtRule::new(&x, &value).apply(&mut block).unwrap();
        assert_eq!(block.vcs()[0].sequent().to_string(), "{} |- {(x + 1) = #x}");
    }
}
