//! Module-level VC generation driver

use super::block::AssertiveCodeBlock;
use super::decl_rules::{FacilityDeclRule, ProcedureDeclRule};
use super::proofrules::{apply_statement_rule, VerificationContext};
use super::vc::VerificationCondition;
use crate::absyn::ModuleDec;
use crate::config::VcGenOptions;
use crate::error::Result;
use crate::scope::SymbolTable;
use crate::sequent::SequentReduction;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Finished blocks of one module, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VcGenOutput {
    pub module: String,
    pub blocks: Vec<AssertiveCodeBlock>,
}

impl VcGenOutput {
    /// All VCs across all blocks
    pub fn vcs(&self) -> impl Iterator<Item = &VerificationCondition> {
        self.blocks.iter().flat_map(|b| b.vcs())
    }

    pub fn vc_count(&self) -> usize {
        self.blocks.iter().map(|b| b.vcs().len()).sum()
    }

    pub fn find_vc(&self, name: &str) -> Option<&VerificationCondition> {
        self.vcs().find(|vc| vc.name() == name)
    }
}

/// Applies declaration and statement rules to every declaration of a module
///
/// # Example
///
/// ```ignore
/// let generator = VcGenerator::new(&scope, VcGenOptions::default());
/// let output = generator.generate(&module)?;
/// for vc in output.vcs() {
///     println!("{}", vc);
/// }
/// ```
pub struct VcGenerator<'a> {
    scope: &'a dyn SymbolTable,
    options: VcGenOptions,
}

impl<'a> VcGenerator<'a> {
    pub fn new(scope: &'a dyn SymbolTable, options: VcGenOptions) -> Self {
        Self { scope, options }
    }

    pub fn options(&self) -> &VcGenOptions {
        &self.options
    }

    /// Generate and name the VCs of `module`
    ///
    /// Facility declarations come first, then procedures. VC names take the
    /// form `<block>_<vc>`, where blocks without VCs are skipped when counting.
    pub fn generate(&self, module: &ModuleDec) -> Result<VcGenOutput> {
        let ctx = VerificationContext::new(self.scope, &self.options);
        let mut finished = Vec::new();

        for facility in &module.facilities {
            let initial = FacilityDeclRule::new(&ctx, facility).initial_block()?;
            finished.extend(self.apply_statement_rules(&ctx, initial)?);
        }
        for procedure in &module.procedures {
            let initial = ProcedureDeclRule::new(&ctx, procedure).initial_block()?;
            finished.extend(self.apply_statement_rules(&ctx, initial)?);
        }

        let blocks = self.finalize(finished)?;
        let output = VcGenOutput {
            module: module.name.clone(),
            blocks,
        };
        tracing::info!(
            "Generated {} VC(s) in {} block(s) for {}",
            output.vc_count(),
            output.blocks.len(),
            module.name
        );
        Ok(output)
    }

    /// Run the statement rules until every block (including branches) is empty
    pub fn apply_statement_rules(
        &self,
        ctx: &VerificationContext<'_>,
        initial: AssertiveCodeBlock,
    ) -> Result<Vec<AssertiveCodeBlock>> {
        let mut pending = VecDeque::from([initial]);
        let mut done = Vec::new();
        while let Some(mut block) = pending.pop_front() {
            while let Some(statement) = block.remove_last_statement() {
                let branches = apply_statement_rule(ctx, &mut block, &statement)?;
                pending.extend(branches);
            }
            tracing::debug!("Block {} produced {} VC(s)", block.name(), block.vcs().len());
            done.push(block);
        }
        Ok(done)
    }

    fn finalize(&self, blocks: Vec<AssertiveCodeBlock>) -> Result<Vec<AssertiveCodeBlock>> {
        let mut block_count = 0;
        let mut finalized = Vec::with_capacity(blocks.len());
        for mut block in blocks {
            let mut vcs = Vec::new();
            for vc in block.take_vcs() {
                vcs.extend(self.finalize_vc(vc)?);
            }
            if !vcs.is_empty() {
                for (i, vc) in vcs.iter_mut().enumerate() {
                    vc.set_name(format!("{}_{}", block_count, i + 1));
                }
                block_count += 1;
            }
            block.set_vcs(vcs);
            finalized.push(block);
        }
        Ok(finalized)
    }

    fn finalize_vc(&self, vc: VerificationCondition) -> Result<Vec<VerificationCondition>> {
        let vc = if self.options.simplify { vc.simplify() } else { vc };
        if !self.options.reduce_sequents {
            return Ok(vec![vc]);
        }

        let mut reduction = SequentReduction::new(vc.sequent().clone());
        reduction.apply_reduction()?;
        let mut out = Vec::with_capacity(reduction.results().len());
        for reduced in reduction.results() {
            let detail = match reduced.sequent.consequents() {
                [goal] if goal.detail.is_some() => goal.detail.clone(),
                _ => vc.detail().cloned(),
            };
            let child = vc
                .with_sequent(reduced.sequent.clone())
                .with_detail(detail)
                .with_impacting_reduction(reduced.impacting);
            out.push(if self.options.simplify { child.simplify() } else { child });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absyn::{Exp, Location, OperationEntry, ParameterDec, ParameterMode, ProcedureDec, Statement};
    use crate::scope::ModuleScope;

    fn inc_module() -> (ModuleScope, ModuleDec) {
        let loc = Location::new("Inc.rb", 1, 1);
        let params = vec![ParameterDec::new("x", ParameterMode::Updates, "Integer")];
        let mut scope = ModuleScope::new("Inc_Realiz");
        scope.add_operation(
            OperationEntry::new("Inc", params.clone(), loc.clone())
                .with_requires(Exp::infix(Exp::var("x"), "<", Exp::var("Max_Int")))
                .with_ensures(Exp::equals(
                    Exp::var("x"),
                    Exp::infix(Exp::old(Exp::var("x")), "+", Exp::int(1)),
                )),
        );
        let body = vec![Statement::assign(
            Exp::var("x"),
            Exp::infix(Exp::var("x"), "+", Exp::int(1)),
            loc.clone(),
        )];
        let module = ModuleDec::new("Inc_Realiz")
            .with_procedure(ProcedureDec::new("Inc", params, loc).with_statements(body));
        (scope, module)
    }

    #[test]
    fn test_generate_names_vcs() {
        let (scope, module) = inc_module();
        let output = VcGenerator::new(&scope, VcGenOptions::default())
            .generate(&module)
            .unwrap();
        assert!(output.vc_count() >= 1);
        assert_eq!(output.vcs().next().unwrap().name(), "0_1");
        assert!(output.vcs().all(|vc| vc.sequent().consist_of_atomic_formulas()));
    }

    #[test]
    fn test_empty_module() {
        let scope = ModuleScope::new("Empty");
        let output = VcGenerator::new(&scope, VcGenOptions::default())
            .generate(&ModuleDec::new("Empty"))
            .unwrap();
        assert_eq!(output.vc_count(), 0);
        assert!(output.blocks.is_empty());
    }
}
