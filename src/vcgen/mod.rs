//! Verification condition generation
//!
//! Each declaration is turned into an [`AssertiveCodeBlock`] by its
//! declaration rule, then the statement rules in [`proofrules`] consume the
//! block backward until only [`VerificationCondition`]s remain. The
//! [`VcGenerator`] finally reduces every VC to atomic sequents and names it.

mod block;
mod decl_rules;
mod generator;
pub mod proofrules;
mod sanity;
mod vc;

pub use block::AssertiveCodeBlock;
pub use decl_rules::{FacilityDeclRule, ProcedureDeclRule};
pub use generator::{VcGenOutput, VcGenerator};
pub use proofrules::{apply_statement_rule, ProofRuleApplication, VerificationContext};
pub use sanity::ValidOperationDeclChecker;
pub use vc::VerificationCondition;
