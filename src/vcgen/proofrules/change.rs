use super::ProofRuleApplication;
use crate::absyn::Exp;
use crate::error::Result;
use crate::vcgen::AssertiveCodeBlock;

/// `Change x, y;` gives each variable an arbitrary new value `x'`
pub struct ChangeStmtRule<'a> {
    vars: &'a [Exp],
}

impl<'a> ChangeStmtRule<'a> {
    pub fn new(vars: &'a [Exp]) -> Self {
        Self { vars }
    }
}

impl ProofRuleApplication for ChangeStmtRule<'_> {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        let mut subs = Vec::with_capacity(self.vars.len());
        for var in self.vars {
            let fresh = block.next_vc_var(var);
            block.add_free_var(fresh.clone());
            subs.push((var.clone(), fresh));
        }
        block.substitute(&subs);
        Ok(Vec::new())
    }

    fn description(&self) -> &'static str {
        "Change Rule"
    }
}
