use super::{tag, ProofRuleApplication, VerificationContext};
use crate::absyn::{Exp, Location, Statement};
use crate::error::{Error, Result};
use crate::scope::OperationProfileSearcher;
use crate::vcgen::AssertiveCodeBlock;

/// `Op(a1, ..., an);`
///
/// Arguments passed in a changing mode get fresh values `a'` in the VCs after
/// the call. Then, walking backward, the ensures clause is assumed (with `#p`
/// as the incoming argument and `p` as its outgoing value) and the requires
/// clause is confirmed for the incoming arguments.
pub struct CallStmtRule<'a> {
    ctx: &'a VerificationContext<'a>,
    operation: &'a str,
    args: &'a [Exp],
    location: &'a Location,
}

impl<'a> CallStmtRule<'a> {
    pub fn new(
        ctx: &'a VerificationContext<'a>,
        operation: &'a str,
        args: &'a [Exp],
        location: &'a Location,
    ) -> Self {
        Self {
            ctx,
            operation,
            args,
            location,
        }
    }
}

impl ProofRuleApplication for CallStmtRule<'_> {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        let op = OperationProfileSearcher::new(self.operation, self.args, self.location)
            .find(self.ctx.scope)?;

        let mut requires_subs = Vec::with_capacity(op.params.len());
        let mut ensures_subs = Vec::with_capacity(op.params.len() * 2);
        let mut changed = Vec::new();
        for (param, arg) in op.params.iter().zip(self.args) {
            let formal = param.as_exp();
            requires_subs.push((formal.clone(), arg.clone()));
            ensures_subs.push((Exp::old(formal.clone()), arg.clone()));

            if param.mode.changes_value() {
                if !arg.is_variable_like() {
                    return Err(Error::source(
                        self.location.clone(),
                        format!(
                            "argument {} for {} parameter {} of {} must be a variable",
                            arg, param.mode, param.name, op.name
                        ),
                    ));
                }
                let fresh = block.next_vc_var(arg);
                block.add_free_var(fresh.clone());
                ensures_subs.push((formal, fresh.clone()));
                changed.push((arg.clone(), fresh));
            } else {
                ensures_subs.push((formal, arg.clone()));
            }
        }

        block.substitute(&changed);

        let requires = tag(
            &op.requires.substitute(&requires_subs),
            self.location,
            format!("Requires Clause of {}", op.name),
        );
        let ensures = tag(
            &op.ensures.substitute(&ensures_subs),
            self.location,
            format!("Ensures Clause of {}", op.name),
        );
        block.add_statement(Statement::confirm(requires, self.location.clone()));
        block.add_statement(Statement::assume(ensures, self.location.clone()));
        Ok(Vec::new())
    }

    fn description(&self) -> &'static str {
        "Call Rule"
    }
}
