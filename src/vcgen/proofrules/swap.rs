use super::ProofRuleApplication;
use crate::absyn::Exp;
use crate::error::Result;
use crate::vcgen::AssertiveCodeBlock;

/// `x :=: y;` exchanges the two variables in every VC
pub struct SwapStmtRule<'a> {
    left: &'a Exp,
    right: &'a Exp,
}

impl<'a> SwapStmtRule<'a> {
    pub fn new(left: &'a Exp, right: &'a Exp) -> Self {
        Self { left, right }
    }
}

impl ProofRuleApplication for SwapStmtRule<'_> {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        // Three renamings through a temporary, as a single simultaneous substitution.
        block.substitute(&[
            (self.left.clone(), self.right.clone()),
            (self.right.clone(), self.left.clone()),
        ]);
        Ok(Vec::new())
    }

    fn description(&self) -> &'static str {
        "Swap Rule"
    }
}
