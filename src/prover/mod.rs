//! Congruence-class automated prover
//!
//! The prover takes atomic VCs ([`ImmutableVc`]), looks up the theorems whose
//! operators all occur in the VC ([`TheoremStore`]) and searches depth first
//! over the [`GeneralApplication`]s its transformations propose. A
//! [`CongruenceRegistry`] decides after every step whether a goal holds.
//!
//! # Example
//!
//! ```ignore
//! let prover = CongruenceClassProver::from_scope(&scope, ProverOptions::enabled());
//! let vcs = output.vcs().map(ImmutableVc::new).collect::<Result<Vec<_>>>()?;
//! let run = prover.prove_all(&vcs)?;
//! println!("{} of {} proved", run.proved_count(), run.results.len());
//! ```

mod application;
mod cc_prover;
mod context;
pub mod elaboration;
pub mod matching;
mod model;
mod registry;
mod theorem_store;
pub mod transformations;
mod vc;

pub use application::GeneralApplication;
pub use cc_prover::{CongruenceClassProver, ProofStatus, ProverRun, VcProofResult};
pub use context::ReasoningContext;
pub use elaboration::{derive_rules, is_deterministic, ElaborationRule};
pub use model::{Conjunct, ConjunctId, ConjunctRole, GeneralStep, PerVcProverModel, Site};
pub use registry::CongruenceRegistry;
pub use theorem_store::{Theorem, TheoremStore};
pub use transformations::{Transformation, TransformationKind};
pub use vc::ImmutableVc;
