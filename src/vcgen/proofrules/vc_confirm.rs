use super::ProofRuleApplication;
use crate::error::Result;
use crate::vcgen::{AssertiveCodeBlock, VerificationCondition};

/// Restores the VCs the while rule parked on the loop's exit branch
pub struct VcConfirmStmtRule<'a> {
    vcs: &'a [VerificationCondition],
}

impl<'a> VcConfirmStmtRule<'a> {
    pub fn new(vcs: &'a [VerificationCondition]) -> Self {
        Self { vcs }
    }
}

impl ProofRuleApplication for VcConfirmStmtRule<'_> {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        block.extend_vcs(self.vcs.iter().cloned());
        Ok(Vec::new())
    }

    fn description(&self) -> &'static str {
        "VC Confirm Rule"
    }
}
