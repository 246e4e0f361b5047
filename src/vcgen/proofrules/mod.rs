//! Proof rules, one per statement kind
//!
//! Rules run backward over an [`AssertiveCodeBlock`]: the generator pops the
//! last statement and hands it to the matching rule, which rewrites the block's
//! VCs and may push further statements to process. Rules that branch return
//! the extra blocks; the current block always continues.

mod assume;
mod call;
mod change;
mod confirm;
mod facility;
mod func_assign;
mod if_stmt;
mod remember;
mod swap;
mod var;
mod vc_confirm;
mod while_stmt;

pub use assume::AssumeStmtRule;
pub use call::CallStmtRule;
pub use change::ChangeStmtRule;
pub use confirm::ConfirmStmtRule;
pub use facility::{FacilityFormalToActuals, FacilityInitStmtRule};
pub use func_assign::FuncAssignStmtRule;
pub use if_stmt::IfStmtRule;
pub use remember::RememberStmtRule;
pub use swap::SwapStmtRule;
pub use var::{FinalizeVarStmtRule, InitializeVarStmtRule};
pub use vc_confirm::VcConfirmStmtRule;
pub use while_stmt::WhileStmtRule;

use super::block::AssertiveCodeBlock;
use crate::absyn::{Exp, Location, LocationDetailModel, Statement};
use crate::config::VcGenOptions;
use crate::error::{Error, Result};
use crate::scope::SymbolTable;

/// Resources the proof rules read while walking one module
pub struct VerificationContext<'a> {
    pub scope: &'a dyn SymbolTable,
    pub options: &'a VcGenOptions,
}

impl<'a> VerificationContext<'a> {
    pub fn new(scope: &'a dyn SymbolTable, options: &'a VcGenOptions) -> Self {
        Self { scope, options }
    }
}

/// A proof rule ready to be applied to a block
pub trait ProofRuleApplication {
    /// Rewrite `block`; returns the blocks created by branching, if any
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>>;

    /// Rule name used in traces
    fn description(&self) -> &'static str;
}

/// Apply the rule for `statement` to `block`
pub fn apply_statement_rule(
    ctx: &VerificationContext<'_>,
    block: &mut AssertiveCodeBlock,
    statement: &Statement,
) -> Result<Vec<AssertiveCodeBlock>> {
    let rule: Box<dyn ProofRuleApplication + '_> = match statement {
        Statement::Assume {
            assertion,
            stipulate,
            ..
        } => Box::new(AssumeStmtRule::new(
            assertion,
            *stipulate,
            ctx.options.parsimonious_assume,
        )),
        Statement::Confirm {
            assertion,
            simplify,
            location,
        } => Box::new(ConfirmStmtRule::new(assertion, *simplify, location)),
        Statement::Change { vars, .. } => Box::new(ChangeStmtRule::new(vars)),
        Statement::Swap { left, right, .. } => Box::new(SwapStmtRule::new(left, right)),
        Statement::FuncAssign { var, value, .. } => Box::new(FuncAssignStmtRule::new(var, value)),
        Statement::Call {
            operation,
            args,
            location,
        } => Box::new(CallStmtRule::new(ctx, operation, args, location)),
        Statement::If {
            condition,
            then_branch,
            else_branch,
            location,
        } => Box::new(IfStmtRule::new(condition, then_branch, else_branch, location)),
        Statement::While {
            condition,
            invariant,
            decreasing,
            changing,
            body,
            location,
        } => Box::new(WhileStmtRule::new(
            condition,
            invariant,
            decreasing.as_ref(),
            changing,
            body,
            location,
        )),
        Statement::FacilityInit { facility, location } => {
            Box::new(FacilityInitStmtRule::new(ctx, facility, location))
        }
        Statement::InitializeVar { var, .. } => Box::new(InitializeVarStmtRule::new(ctx, var)),
        Statement::FinalizeVar { var, .. } => Box::new(FinalizeVarStmtRule::new(ctx, var)),
        Statement::Remember { .. } => Box::new(RememberStmtRule),
        Statement::VcConfirm { vcs, .. } => Box::new(VcConfirmStmtRule::new(vcs)),
        Statement::Memory { location } => {
            return Err(Error::UnhandledStatement {
                kind: statement.kind_name().to_string(),
                location: location.clone(),
            })
        }
    };

    let branches = rule.apply(block)?;
    tracing::trace!("{} applied in block {}", rule.description(), block.name());
    block.record_step(rule.description(), statement);
    Ok(branches)
}

/// Tag an assertion with a provenance message unless it already has one
pub(crate) fn tag(exp: &Exp, location: &Location, message: impl Into<String>) -> Exp {
    let mut exp = exp.clone();
    if exp.detail.is_none() {
        let source = exp.location.clone().unwrap_or_else(|| location.clone());
        exp.detail = Some(LocationDetailModel::new(source, location.clone(), message));
    }
    exp
}
