//! Congruence-class prover: depth-first search over theorem applications

use super::application::GeneralApplication;
use super::context::ReasoningContext;
use super::elaboration::{derive_all, ElaborationRule};
use super::model::PerVcProverModel;
use super::registry::CongruenceRegistry;
use super::theorem_store::TheoremStore;
use super::transformations::{for_theorem, LocalEqualitySubstitution, Transformation};
use super::vc::ImmutableVc;
use crate::absyn::Operator;
use crate::config::ProverOptions;
use crate::error::Result;
#[cfg(feature = "parallel")]
use crate::error::Error;
use crate::scope::SymbolTable;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

lazy_static::lazy_static! {
    /// Operators the registry interprets itself; always part of a theorem query
    static ref BUILTIN_OPERATORS: BTreeSet<Operator> = [Operator::new("=", 2)].into();
}

/// Outcome of one VC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofStatus {
    /// A goal follows from the local theorems
    Proved,
    /// The local theorems contradict each other, so every goal holds
    FalseAssumption,
    /// Search exhausted, timed out or ran out of steps
    Unproved,
    /// Not attempted because the run halted
    Skipped,
}

impl ProofStatus {
    pub fn is_proved(&self) -> bool {
        matches!(self, ProofStatus::Proved | ProofStatus::FalseAssumption)
    }
}

/// Per-VC result with the proof trace and search metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VcProofResult {
    pub vc_name: String,
    pub status: ProofStatus,
    pub timed_out: bool,
    /// Applications tried
    pub steps: usize,
    pub elapsed_ms: u64,
    /// Steps on the successful path, in order
    pub proof: Vec<String>,
    /// Rendering of the model when the search stopped
    pub final_model: String,
}

impl VcProofResult {
    fn skipped(vc: &ImmutableVc) -> Self {
        Self {
            vc_name: vc.name().to_string(),
            status: ProofStatus::Skipped,
            timed_out: false,
            steps: 0,
            elapsed_ms: 0,
            proof: Vec::new(),
            final_model: String::new(),
        }
    }
}

/// Results of proving a list of VCs, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProverRun {
    pub results: Vec<VcProofResult>,
    /// Whether the consecutive-failure budget stopped the run
    pub halted: bool,
}

impl ProverRun {
    pub fn proved_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_proved()).count()
    }

    pub fn unproved_count(&self) -> usize {
        self.results.len() - self.proved_count()
    }

    pub fn all_proved(&self) -> bool {
        self.results.iter().all(|r| r.status.is_proved())
    }

    pub fn find(&self, vc_name: &str) -> Option<&VcProofResult> {
        self.results.iter().find(|r| r.vc_name == vc_name)
    }
}

/// Consecutive-failure bookkeeping; halts once the count exceeds the limit
#[derive(Debug, Default)]
struct FailureTracker {
    consecutive: usize,
    halted: bool,
}

impl FailureTracker {
    fn record(&mut self, status: ProofStatus, limit: Option<usize>) {
        if status.is_proved() {
            self.consecutive = 0;
        } else {
            self.consecutive += 1;
        }
        if let Some(limit) = limit {
            if !self.halted && self.consecutive > limit {
                tracing::warn!("Halting prover after {} consecutive unproved VC(s)", self.consecutive);
                self.halted = true;
            }
        }
    }
}

/// Feeds results that complete out of order to a [`FailureTracker`] in VC order
#[cfg(feature = "parallel")]
#[derive(Debug, Default)]
struct OrderedTracker {
    pending: std::collections::BTreeMap<usize, ProofStatus>,
    next: usize,
    tracker: FailureTracker,
    /// Index of the VC whose result halted the run
    halted_at: Option<usize>,
}

#[cfg(feature = "parallel")]
impl OrderedTracker {
    /// Whether the VC at `index` comes after the halting one
    fn skips(&self, index: usize) -> bool {
        matches!(self.halted_at, Some(halt) if index > halt)
    }

    fn record(&mut self, index: usize, status: ProofStatus, limit: Option<usize>) {
        self.pending.insert(index, status);
        while self.halted_at.is_none() {
            let Some(status) = self.pending.remove(&self.next) else {
                break;
            };
            self.tracker.record(status, limit);
            if self.tracker.halted {
                self.halted_at = Some(self.next);
            }
            self.next += 1;
        }
    }
}

/// Congruence-class prover over one module's theorems
///
/// The theorem store, elaboration rules and transformations are built once
/// and shared read-only; each VC gets its own model and [`ReasoningContext`].
pub struct CongruenceClassProver {
    store: Arc<TheoremStore>,
    rules: Arc<Vec<ElaborationRule>>,
    /// Transformations of each theorem, indexed like the store
    transformations: Arc<Vec<Vec<Box<dyn Transformation>>>>,
    local: LocalEqualitySubstitution,
    usefulness: Arc<DashMap<String, usize>>,
    options: ProverOptions,
}

impl CongruenceClassProver {
    pub fn new(store: TheoremStore, options: ProverOptions) -> Self {
        let rules = derive_all(store.theorems(), options.elaboration);
        let transformations = store
            .theorems()
            .iter()
            .map(|t| for_theorem(t, &rules))
            .collect();
        tracing::debug!(
            "Prover ready with {} theorem(s) and {} elaboration rule(s)",
            store.len(),
            rules.len()
        );
        Self {
            store: Arc::new(store),
            rules: Arc::new(rules),
            transformations: Arc::new(transformations),
            local: LocalEqualitySubstitution,
            usefulness: Arc::new(DashMap::new()),
            options,
        }
    }

    pub fn from_scope(scope: &dyn SymbolTable, options: ProverOptions) -> Self {
        Self::new(TheoremStore::from_scope(scope), options)
    }

    pub fn theorem_store(&self) -> &TheoremStore {
        &self.store
    }

    pub fn elaboration_rules(&self) -> &[ElaborationRule] {
        &self.rules
    }

    pub fn options(&self) -> &ProverOptions {
        &self.options
    }

    /// How many proofs so far used `theorem`
    pub fn usefulness(&self, theorem: &str) -> usize {
        self.usefulness.get(theorem).map(|c| *c).unwrap_or(0)
    }

    /// Transformations relevant to `vc`, most promising first
    fn transformations_for(&self, vc: &ImmutableVc) -> Vec<&dyn Transformation> {
        let mut selected: Vec<&dyn Transformation> = vec![&self.local];
        let ops: BTreeSet<Operator> = vc.operators().union(&BUILTIN_OPERATORS).cloned().collect();
        for index in self.store.relevant_indices(&ops) {
            if let Some(list) = self.transformations.get(index) {
                selected.extend(list.iter().map(|t| t.as_ref()));
            }
        }
        selected.sort_by_key(|t| {
            let used = t.theorem().map(|name| self.usefulness(name)).unwrap_or(0);
            (t.kind(), std::cmp::Reverse(used))
        });
        selected
    }

    fn candidates(
        transformations: &[&dyn Transformation],
        model: &PerVcProverModel,
        ctx: &ReasoningContext,
    ) -> Vec<GeneralApplication> {
        let mut apps: Vec<GeneralApplication> = transformations
            .iter()
            .flat_map(|t| t.applications(model, ctx))
            .collect();
        // Popped from the back
        apps.reverse();
        apps
    }

    /// Status implied by the model as it stands, if it settles the VC
    fn check(model: &PerVcProverModel) -> Option<ProofStatus> {
        let mut registry = CongruenceRegistry::from_facts(model.local_theorems().map(|(_, e)| e));
        if registry.is_contradictory() {
            return Some(ProofStatus::FalseAssumption);
        }
        let goals: Vec<_> = model.consequents().map(|(_, e)| e.clone()).collect();
        if goals.iter().any(|g| registry.holds(g)) {
            return Some(ProofStatus::Proved);
        }
        None
    }

    /// Search for a proof of one VC
    pub fn prove_vc(&self, vc: &ImmutableVc) -> Result<VcProofResult> {
        let mut model = PerVcProverModel::new(vc);
        let mut ctx = ReasoningContext::new(self.options.timeout, self.options.max_steps);
        let transformations = self.transformations_for(vc);

        let mut timed_out = false;
        let status = match Self::check(&model) {
            Some(status) => status,
            None => {
                ctx.visit(model.state_key());
                let mut frames = vec![Self::candidates(&transformations, &model, &ctx)];
                loop {
                    if ctx.is_timed_out() {
                        timed_out = true;
                        break ProofStatus::Unproved;
                    }
                    if ctx.is_out_of_steps() {
                        break ProofStatus::Unproved;
                    }
                    let Some(frame) = frames.last_mut() else {
                        break ProofStatus::Unproved;
                    };
                    let Some(app) = frame.pop() else {
                        frames.pop();
                        if !frames.is_empty() {
                            model.undo_last_proof_step();
                        }
                        continue;
                    };

                    app.apply(&mut model)?;
                    ctx.record_step();
                    if !ctx.visit(model.state_key()) {
                        model.undo_last_proof_step();
                        continue;
                    }
                    if let Some(status) = Self::check(&model) {
                        break status;
                    }
                    if model.depth() < self.options.max_depth {
                        frames.push(Self::candidates(&transformations, &model, &ctx));
                    } else {
                        model.undo_last_proof_step();
                    }
                }
            }
        };

        if status.is_proved() {
            for step in model.proof_steps() {
                if let Some(theorem) = &step.theorem {
                    *self.usefulness.entry(theorem.clone()).or_insert(0) += 1;
                }
            }
        }
        let result = VcProofResult {
            vc_name: vc.name().to_string(),
            status,
            timed_out,
            steps: ctx.steps(),
            elapsed_ms: ctx.elapsed().as_millis() as u64,
            proof: model.proof_steps().iter().map(|s| s.description.clone()).collect(),
            final_model: model.to_string(),
        };
        tracing::debug!(
            "VC {}: {:?} after {} step(s) in {} ms",
            result.vc_name,
            result.status,
            result.steps,
            result.elapsed_ms
        );
        Ok(result)
    }

    /// Prove every VC, honouring the consecutive-failure budget
    pub fn prove_all(&self, vcs: &[ImmutableVc]) -> Result<ProverRun> {
        #[cfg(feature = "parallel")]
        if self.options.parallel && vcs.len() > 1 {
            return self.prove_all_parallel(vcs);
        }

        let mut tracker = FailureTracker::default();
        let mut results = Vec::with_capacity(vcs.len());
        for vc in vcs {
            if tracker.halted {
                results.push(VcProofResult::skipped(vc));
                continue;
            }
            let result = self.prove_vc(vc)?;
            tracker.record(result.status, self.options.num_tries);
            results.push(result);
        }
        let run = ProverRun {
            results,
            halted: tracker.halted,
        };
        tracing::info!("Proved {} of {} VC(s)", run.proved_count(), run.results.len());
        Ok(run)
    }

    #[cfg(feature = "parallel")]
    fn prove_all_parallel(&self, vcs: &[ImmutableVc]) -> Result<ProverRun> {
        use rayon::prelude::*;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.max_parallelism.clamp(1, vcs.len()))
            .build()
            .map_err(|e| Error::ThreadPoolError(format!("Failed to create thread pool: {}", e)))?;
        let tracker = parking_lot::Mutex::new(OrderedTracker::default());

        let results = pool.install(|| {
            vcs.par_iter()
                .enumerate()
                .map(|(index, vc)| {
                    if tracker.lock().skips(index) {
                        return Ok(VcProofResult::skipped(vc));
                    }
                    let result = self.prove_vc(vc)?;
                    tracker.lock().record(index, result.status, self.options.num_tries);
                    Ok(result)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        // Later VCs may have finished before the halting one did
        let tracker = tracker.into_inner();
        let results = results
            .into_iter()
            .zip(vcs)
            .enumerate()
            .map(|(index, (result, vc))| {
                if tracker.skips(index) {
                    VcProofResult::skipped(vc)
                } else {
                    result
                }
            })
            .collect();
        let run = ProverRun {
            results,
            halted: tracker.halted_at.is_some(),
        };
        tracing::info!(
            "Proved {} of {} VC(s) on {} worker(s)",
            run.proved_count(),
            run.results.len(),
            pool.current_num_threads()
        );
        Ok(run)
    }
}
