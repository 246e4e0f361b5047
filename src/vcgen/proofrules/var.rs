use super::{tag, FacilityFormalToActuals, ProofRuleApplication, VerificationContext};
use crate::absyn::{Exp, ExpKind, Statement, TypeFamilyDec, VarDec};
use crate::error::{Error, Result};
use crate::vcgen::AssertiveCodeBlock;

/// Type family clause instantiated for one variable
fn instantiate(
    ctx: &VerificationContext<'_>,
    var: &VarDec,
    family: &TypeFamilyDec,
    clause: &Exp,
) -> Result<Exp> {
    let mut exp = clause.clone();
    if let Some(facility) = &var.facility {
        let mapping = FacilityFormalToActuals::lookup(ctx.scope, facility, &var.location)?;
        exp = mapping.substitute(&exp);
    }
    Ok(exp.substitute(&[
        (family.exemplar_exp(), var.as_exp()),
        (Exp::old(family.exemplar_exp()), Exp::old(var.as_exp())),
    ]))
}

/// Initialization ensures describe a fresh value; an incoming value makes no sense
pub fn check_initialization_ensures(family: &TypeFamilyDec) -> Result<()> {
    let mentions_old = family
        .initialization_ensures
        .variable_leaves()
        .iter()
        .any(|leaf| matches!(leaf.kind, ExpKind::Old(_)));
    if mentions_old {
        return Err(Error::source(
            family.location.clone(),
            format!(
                "initialization ensures of {} cannot refer to #{}",
                family.name, family.exemplar
            ),
        ));
    }
    Ok(())
}

/// `Var x: T;` assumes the initialization ensures of `T` for `x`
pub struct InitializeVarStmtRule<'a> {
    ctx: &'a VerificationContext<'a>,
    var: &'a VarDec,
}

impl<'a> InitializeVarStmtRule<'a> {
    pub fn new(ctx: &'a VerificationContext<'a>, var: &'a VarDec) -> Self {
        Self { ctx, var }
    }
}

impl ProofRuleApplication for InitializeVarStmtRule<'_> {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        let found = self
            .ctx
            .scope
            .find_type_family(self.var.facility.as_deref(), &self.var.type_name);
        let Some((family, _)) = found else {
            return Ok(Vec::new());
        };
        check_initialization_ensures(family)?;

        let ensures = instantiate(self.ctx, self.var, family, &family.initialization_ensures)?;
        let constraint = instantiate(self.ctx, self.var, family, &family.constraint)?;
        let message = format!("Initialization Ensures Clause of {}", family.name);
        block.add_statement(Statement::Assume {
            assertion: Exp::and(constraint, tag(&ensures, &self.var.location, message)),
            stipulate: false,
            location: self.var.location.clone(),
        });
        block.add_free_var(self.var.as_exp());
        Ok(Vec::new())
    }

    fn description(&self) -> &'static str {
        "Variable Initialization Rule"
    }
}

/// End of a variable's scope: the finalization ensures relate `#x` to a fresh `x'`
pub struct FinalizeVarStmtRule<'a> {
    ctx: &'a VerificationContext<'a>,
    var: &'a VarDec,
}

impl<'a> FinalizeVarStmtRule<'a> {
    pub fn new(ctx: &'a VerificationContext<'a>, var: &'a VarDec) -> Self {
        Self { ctx, var }
    }
}

impl ProofRuleApplication for FinalizeVarStmtRule<'_> {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        let found = self
            .ctx
            .scope
            .find_type_family(self.var.facility.as_deref(), &self.var.type_name);
        let Some((family, _)) = found else {
            return Ok(Vec::new());
        };
        if family.finalization_ensures.is_literal_true() {
            return Ok(Vec::new());
        }

        let var = self.var.as_exp();
        let fresh = block.next_vc_var(&var);
        block.add_free_var(fresh.clone());
        block.substitute(&[(var.clone(), fresh.clone())]);

        let ensures = instantiate(self.ctx, self.var, family, &family.finalization_ensures)?
            .substitute(&[(var.clone(), fresh), (Exp::old(var.clone()), var)]);
        let message = format!("Finalization Ensures Clause of {}", family.name);
        block.add_statement(Statement::Assume {
            assertion: tag(&ensures, &self.var.location, message),
            stipulate: false,
            location: self.var.location.clone(),
        });
        Ok(Vec::new())
    }

    fn description(&self) -> &'static str {
        "Variable Finalization Rule"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absyn::{ConceptSpec, FacilityDec, Location, ModuleParameter};
    use crate::config::VcGenOptions;
    use crate::scope::ModuleScope;
    use crate::vcgen::VerificationCondition;

    fn scope(init: Exp) -> ModuleScope {
        let family = TypeFamilyDec::new("Stack", "S", Location::default())
            .with_constraint(Exp::infix(
                Exp::function("|_|", vec![Exp::var("S")]),
                "<=",
                Exp::var("Max_Depth"),
            ))
            .with_initialization_ensures(init);
        let mut scope = ModuleScope::new("Test");
        scope.add_concept(
            ConceptSpec::new("Stack_Template", vec![ModuleParameter::new("Max_Depth")], Location::default())
                .with_type_family(family),
        );
        scope.add_facility(FacilityDec::new("SF", "Stack_Template", vec![Exp::int(10)], Location::default()));
        scope
    }

    #[test]
    fn test_initialize_var_assumes_instantiated_ensures() {
        let scope = scope(Exp::equals(Exp::var("S"), Exp::var("Empty_String")));
        let options = VcGenOptions::default();
        let ctx = VerificationContext::new(&scope, &options);
        let var = VarDec::new("T", "Stack", Location::default()).from_facility("SF");

        let mut block = AssertiveCodeBlock::new("Test", Location::default());
        block.add_vc(VerificationCondition::goal(Location::default(), Exp::var("goal")));
        InitializeVarStmtRule::new(&ctx, &var).apply(&mut block).unwrap();

        match block.remove_last_statement() {
            Some(Statement::Assume { assertion, .. }) => {
                assert_eq!(assertion.to_string(), "(|_|(T) <= 10) and (T = Empty_String)");
            }
            other => panic!("expected assume, got {:?}", other),
        }
    }

    #[test]
    fn test_old_exemplar_in_initialization_is_rejected() {
        let scope = scope(Exp::equals(Exp::var("S"), Exp::old(Exp::var("S"))));
        let options = VcGenOptions::default();
        let ctx = VerificationContext::new(&scope, &options);
        let var = VarDec::new("T", "Stack", Location::default()).from_facility("SF");

        let mut block = AssertiveCodeBlock::new("Test", Location::default());
        let err = InitializeVarStmtRule::new(&ctx, &var).apply(&mut block).unwrap_err();
        assert!(err.is_source_error());
        assert!(err.to_string().contains("#S"));
    }

    #[test]
    fn test_builtin_types_need_no_assumption() {
        let scope = ModuleScope::new("Test");
        let options = VcGenOptions::default();
        let ctx = VerificationContext::new(&scope, &options);
        let var = VarDec::new("i", "Integer", Location::default());
        let mut block = AssertiveCodeBlock::new("Test", Location::default());
        InitializeVarStmtRule::new(&ctx, &var).apply(&mut block).unwrap();
        assert!(!block.has_more_statements());
    }
}
