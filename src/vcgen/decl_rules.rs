//! Declaration rules: build the initial assertive code block of a declaration

use super::block::AssertiveCodeBlock;
use super::proofrules::{tag, FacilityFormalToActuals, VerificationContext};
use super::sanity::ValidOperationDeclChecker;
use crate::absyn::{Exp, FacilityDec, ProcedureDec, Statement};
use crate::error::{Error, Result};

/// Procedure declaration rule
///
/// ```text
/// Assume <module constraints> and <requires>;
/// _InitFac(F) for each facility in scope;
/// Remember;
/// _Initialize(v) for each local variable;
/// <body>
/// _Finalize(v) for each local variable, in reverse;
/// Confirm <ensures> and p = #p for each restores/preserves parameter;
/// ```
pub struct ProcedureDeclRule<'a> {
    ctx: &'a VerificationContext<'a>,
    procedure: &'a ProcedureDec,
}

impl<'a> ProcedureDeclRule<'a> {
    pub fn new(ctx: &'a VerificationContext<'a>, procedure: &'a ProcedureDec) -> Self {
        Self { ctx, procedure }
    }

    pub fn initial_block(&self) -> Result<AssertiveCodeBlock> {
        let proc = self.procedure;
        let loc = &proc.location;
        let operation = self
            .ctx
            .scope
            .operations()
            .iter()
            .find(|op| op.name == proc.name);
        if let Some(op) = operation {
            ValidOperationDeclChecker::new(op, proc).check()?;
        }

        let mut block = AssertiveCodeBlock::new(proc.name.clone(), loc.clone());
        for param in &proc.params {
            block.add_free_var(param.as_exp());
        }

        let mut assumed: Vec<Exp> = self.ctx.scope.global_constraints().to_vec();
        let mut confirmed = Vec::new();
        if let Some(op) = operation {
            assumed.push(tag(&op.requires, loc, format!("Requires Clause of {}", op.name)));
            confirmed.push(tag(&op.ensures, loc, format!("Ensures Clause of {}", op.name)));
        }
        for param in proc.params.iter().filter(|p| p.mode.keeps_value()) {
            let current = param.as_exp();
            confirmed.push(tag(
                &Exp::equals(current.clone(), Exp::old(current)),
                loc,
                format!(
                    "Ensures Clause of {} (Condition from \"{}\" parameter mode)",
                    proc.name, param.mode
                ),
            ));
        }

        block.add_statement(Statement::assume(Exp::conjunction(assumed), loc.clone()));
        for facility in self.ctx.scope.facilities() {
            block.add_statement(Statement::FacilityInit {
                facility: facility.name.clone(),
                location: facility.location.clone(),
            });
        }
        block.add_statement(Statement::Remember { location: loc.clone() });
        for var in &proc.variables {
            block.add_statement(Statement::InitializeVar {
                var: var.clone(),
                location: var.location.clone(),
            });
        }
        block.add_statements(proc.statements.iter().cloned());
        for var in proc.variables.iter().rev() {
            block.add_statement(Statement::FinalizeVar {
                var: var.clone(),
                location: var.location.clone(),
            });
        }
        block.add_statement(Statement::confirm(Exp::conjunction(confirmed), loc.clone()));
        Ok(block)
    }
}

/// Facility declaration rule: the concept's requires clause holds for the actuals
pub struct FacilityDeclRule<'a> {
    ctx: &'a VerificationContext<'a>,
    facility: &'a FacilityDec,
}

impl<'a> FacilityDeclRule<'a> {
    pub fn new(ctx: &'a VerificationContext<'a>, facility: &'a FacilityDec) -> Self {
        Self { ctx, facility }
    }

    pub fn initial_block(&self) -> Result<AssertiveCodeBlock> {
        let fac = self.facility;
        let concept = self
            .ctx
            .scope
            .find_concept(&fac.concept)
            .ok_or_else(|| Error::NoSuchSymbol {
                name: fac.concept.clone(),
                location: fac.location.clone(),
            })?;
        let mapping = FacilityFormalToActuals::new(fac, concept)?;

        let mut block =
            AssertiveCodeBlock::new(format!("Facility_Dec_{}", fac.name), fac.location.clone());
        block.add_statement(Statement::assume(
            Exp::conjunction(self.ctx.scope.global_constraints().to_vec()),
            fac.location.clone(),
        ));
        block.add_statement(Statement::confirm(
            tag(
                &mapping.substitute(&concept.requires),
                &fac.location,
                format!(
                    "Requires Clause for {} in Facility Instantiation Rule",
                    concept.name
                ),
            ),
            fac.location.clone(),
        ));
        Ok(block)
    }
}
