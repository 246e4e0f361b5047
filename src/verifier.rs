//! End-to-end pipeline: generate, reduce, prove, report

use crate::absyn::ModuleDec;
use crate::config::VerifierOptions;
use crate::error::Result;
use crate::prover::{CongruenceClassProver, ImmutableVc, ProverRun};
use crate::report::VerificationReport;
use crate::scope::SymbolTable;
use crate::vcgen::{VcGenOutput, VcGenerator};

/// Everything produced for one module
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub vcgen: VcGenOutput,
    /// `None` when proving is disabled
    pub prover: Option<ProverRun>,
    pub report: VerificationReport,
}

impl VerificationOutcome {
    /// Whether every VC was proved; `false` when the prover did not run
    pub fn all_proved(&self) -> bool {
        self.prover.as_ref().map_or(false, |run| {
            run.results.len() == self.vcgen.vc_count() && run.all_proved()
        })
    }
}

/// Runs the verification phases for a module scope
pub struct Verifier<'a> {
    scope: &'a dyn SymbolTable,
    options: VerifierOptions,
}

impl<'a> Verifier<'a> {
    pub fn new(scope: &'a dyn SymbolTable, options: VerifierOptions) -> Self {
        Self { scope, options }
    }

    pub fn options(&self) -> &VerifierOptions {
        &self.options
    }

    pub fn verify(&self, module: &ModuleDec) -> Result<VerificationOutcome> {
        // Phase 1: VC generation (includes sequent reduction)
        tracing::info!("Generating VCs for {}", module.name);
        let vcgen = VcGenerator::new(self.scope, self.options.vcgen.clone()).generate(module)?;

        // Phase 2: Proving, if enabled
        let prover = if self.options.prover.enabled {
            tracing::info!("Proving {} VC(s) for {}", vcgen.vc_count(), module.name);
            let vcs = vcgen.vcs().map(ImmutableVc::new).collect::<Result<Vec<_>>>()?;
            let prover = CongruenceClassProver::from_scope(self.scope, self.options.prover.clone());
            Some(prover.prove_all(&vcs)?)
        } else {
            tracing::debug!("Prover disabled; skipping proof phase");
            None
        };

        // Phase 3: Report
        let report = VerificationReport::new(&vcgen, prover.as_ref());
        tracing::info!(
            "{}: {}/{} VC(s) proved",
            module.name,
            report.proved_vcs(),
            report.total_vcs()
        );
        Ok(VerificationOutcome {
            vcgen,
            prover,
            report,
        })
    }
}
