#![allow(clippy::new_without_default)]
//! # vcgen - Verification Conditions and Congruence-Class Proving
//!
//! The back half of a verifying compiler: given a type-checked module and a
//! queryable symbol table, produce the verification conditions (VCs) whose
//! validity implies the module is correct, and try to discharge them.
//!
//! ## Pipeline
//!
//! 1. **Declaration rules** turn each procedure and facility declaration into an
//!    [`AssertiveCodeBlock`](vcgen::AssertiveCodeBlock).
//! 2. **Proof rules** consume each block backward, one statement at a time,
//!    until only [`VerificationCondition`](vcgen::VerificationCondition)s remain.
//!    `if` statements split a block in two.
//! 3. **Sequent reduction** breaks every VC down to sequents of atomic formulas.
//! 4. **Congruence-class proving** (optional) searches for a proof of each VC
//!    using the theorems in scope.
//!
//! ## Quick Start
//!
//! ```rust
//! use vcgen::absyn::{Exp, Location, ModuleDec, OperationEntry, ParameterDec, ParameterMode, ProcedureDec, Statement};
//! use vcgen::scope::ModuleScope;
//! use vcgen::{Verifier, VerifierOptions};
//!
//! # fn main() -> vcgen::Result<()> {
//! let loc = Location::new("Inc_Realiz.rb", 3, 5);
//! let params = vec![ParameterDec::new("x", ParameterMode::Updates, "Integer")];
//!
//! let mut scope = ModuleScope::new("Inc_Realiz");
//! scope.add_operation(
//!     OperationEntry::new("Inc", params.clone(), loc.clone())
//!         .with_ensures(Exp::equals(Exp::var("x"), Exp::infix(Exp::old(Exp::var("x")), "+", Exp::int(1)))),
//! );
//!
//! let body = vec![Statement::assign(Exp::var("x"), Exp::infix(Exp::var("x"), "+", Exp::int(1)), loc.clone())];
//! let module = ModuleDec::new("Inc_Realiz")
//!     .with_procedure(ProcedureDec::new("Inc", params, loc).with_statements(body));
//!
//! let mut options = VerifierOptions::default();
//! options.prover.enabled = true;
//! let outcome = Verifier::new(&scope, options).verify(&module)?;
//! assert_eq!(outcome.vcgen.vc_count(), 1);
//! assert!(outcome.all_proved());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`absyn`] - expressions, statements and declarations the rules consume
//! - [`scope`] - symbol table interface and an in-memory implementation
//! - [`sequent`] - sequents, reduction rules and the reduction driver
//! - [`vcgen`] - assertive code blocks, proof rules and the VC generator
//! - [`prover`] - theorem store, elaboration rules and the congruence-class prover
//! - [`report`] - text and JSON reports
//! - [`config`] - option structs and flag resolution
//! - [`error`] - error types
//!
//! ## Logging
//!
//! Phases log through [`tracing`]; install a subscriber in the host to see them.
//! Rule applications are logged at `trace` level.

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod absyn;
pub mod config;
pub mod error;
pub mod prover;
pub mod report;
pub mod scope;
pub mod sequent;
pub mod vcgen;
pub mod verifier;

// Re-export main types
pub use config::{CompileFlags, ElaborationMode, ProverOptions, VcGenOptions, VerifierOptions};
pub use error::{Error, ErrorSeverity, Result};
pub use prover::{CongruenceClassProver, ImmutableVc, ProofStatus, ProverRun, TheoremStore};
pub use report::VerificationReport;
pub use scope::{ModuleScope, SymbolTable};
pub use sequent::{Sequent, SequentReduction};
pub use vcgen::{AssertiveCodeBlock, VcGenOutput, VcGenerator, VerificationCondition};
pub use verifier::{VerificationOutcome, Verifier};
