//! Abstract syntax consumed by the VC generator and the prover
//!
//! The front end hands over fully type-checked trees; this module only models
//! the shapes the proof rules and reduction rules touch.

mod decl;
mod exp;
mod location;
mod stmt;

pub use decl::{
    ConceptSpec, FacilityDec, ModuleDec, ModuleParameter, OperationEntry, ParameterDec, ParameterMode,
    ProcedureDec, TheoremEntry, TypeFamilyDec,
};
pub use exp::{fresh_name, Exp, ExpKind, Literal, MathType, Operator, Quantifier};
pub use location::{Location, LocationDetailModel};
pub use stmt::{Statement, VarDec};
