use super::{tag, ProofRuleApplication};
use crate::absyn::{Exp, Location};
use crate::error::Result;
use crate::vcgen::{AssertiveCodeBlock, VerificationCondition};

/// `Confirm P;` creates the goal `⊢ P`
pub struct ConfirmStmtRule<'a> {
    assertion: &'a Exp,
    simplify: bool,
    location: &'a Location,
}

impl<'a> ConfirmStmtRule<'a> {
    pub fn new(assertion: &'a Exp, simplify: bool, location: &'a Location) -> Self {
        Self {
            assertion,
            simplify,
            location,
        }
    }
}

impl ProofRuleApplication for ConfirmStmtRule<'_> {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        if self.simplify || self.assertion.is_literal_true() {
            return Ok(Vec::new());
        }
        let goal = tag(self.assertion, self.location, "Confirm Statement");
        block.add_vc(VerificationCondition::goal(self.location.clone(), goal));
        Ok(Vec::new())
    }

    fn description(&self) -> &'static str {
        "Confirm Rule"
    }
}
