use super::exp::Exp;
use super::location::Location;
use crate::vcgen::VerificationCondition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local variable declaration: `Var S: Stack;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDec {
    /// Variable name
    pub name: String,
    /// Program type name
    pub type_name: String,
    /// Facility the type comes from, if any (`SF::Stack`)
    pub facility: Option<String>,
    /// Declaration location
    pub location: Location,
}

impl VarDec {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            facility: None,
            location,
        }
    }

    /// Type qualified by a facility
    pub fn from_facility(mut self, facility: impl Into<String>) -> Self {
        self.facility = Some(facility.into());
        self
    }

    /// Variable as an expression
    pub fn as_exp(&self) -> Exp {
        Exp::var(self.name.clone()).with_location(self.location.clone())
    }
}

/// Statements handled by the proof rules
///
/// Program statements arrive from the front end; the assertive-only forms
/// (`Assume`, `Confirm`, `Change`, `Remember`, `VcConfirm`, ...) are introduced
/// by the declaration and statement rules themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Assume an assertion
    Assume {
        /// Assumed assertion
        assertion: Exp,
        /// Stipulated assumptions are added whole, without parsimonious filtering
        stipulate: bool,
        /// Statement location
        location: Location,
    },

    /// Confirm an assertion (creates a goal)
    Confirm {
        /// Goal assertion
        assertion: Exp,
        /// Already known to hold; no goal is created
        simplify: bool,
        /// Statement location
        location: Location,
    },

    /// Mark variables as changed to arbitrary values
    Change {
        /// Changing variables
        vars: Vec<Exp>,
        /// Statement location
        location: Location,
    },

    /// Exchange two variables: `x :=: y`
    Swap {
        /// Left variable
        left: Exp,
        /// Right variable
        right: Exp,
        /// Statement location
        location: Location,
    },

    /// Function assignment: `x := e`
    FuncAssign {
        /// Assigned variable
        var: Exp,
        /// Assigned value
        value: Exp,
        /// Statement location
        location: Location,
    },

    /// Operation call: `Push(E, S)`
    Call {
        /// Operation name
        operation: String,
        /// Actual arguments
        args: Vec<Exp>,
        /// Statement location
        location: Location,
    },

    /// If statement
    If {
        /// Condition
        condition: Exp,
        /// Statements of the if branch
        then_branch: Vec<Statement>,
        /// Statements of the else branch (empty when absent)
        else_branch: Vec<Statement>,
        /// Statement location
        location: Location,
    },

    /// While loop with its verification annotations
    While {
        /// Loop condition
        condition: Exp,
        /// Maintaining clause
        invariant: Exp,
        /// Decreasing clause
        decreasing: Option<Exp>,
        /// Changing clause
        changing: Vec<Exp>,
        /// Loop body
        body: Vec<Statement>,
        /// Statement location
        location: Location,
    },

    /// Facility instantiation point
    FacilityInit {
        /// Facility name
        facility: String,
        /// Statement location
        location: Location,
    },

    /// Variable initialization
    InitializeVar {
        /// Declared variable
        var: VarDec,
        /// Statement location
        location: Location,
    },

    /// Variable finalization
    FinalizeVar {
        /// Declared variable
        var: VarDec,
        /// Statement location
        location: Location,
    },

    /// Incoming values become current values: `#x` becomes `x`
    Remember {
        /// Statement location
        location: Location,
    },

    /// Save point of a block's state; no proof rule exists for it
    Memory {
        /// Statement location
        location: Location,
    },

    /// VCs parked by the while rule, restored when reached
    VcConfirm {
        /// Parked VCs
        vcs: Vec<VerificationCondition>,
        /// Statement location
        location: Location,
    },
}

impl Statement {
    /// Statement location
    pub fn location(&self) -> &Location {
        match self {
            Statement::Assume { location, .. }
            | Statement::Confirm { location, .. }
            | Statement::Change { location, .. }
            | Statement::Swap { location, .. }
            | Statement::FuncAssign { location, .. }
            | Statement::Call { location, .. }
            | Statement::If { location, .. }
            | Statement::While { location, .. }
            | Statement::FacilityInit { location, .. }
            | Statement::InitializeVar { location, .. }
            | Statement::FinalizeVar { location, .. }
            | Statement::Remember { location }
            | Statement::Memory { location }
            | Statement::VcConfirm { location, .. } => location,
        }
    }

    /// Statement kind name used in diagnostics and traces
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Assume { .. } => "AssumeStmt",
            Statement::Confirm { .. } => "ConfirmStmt",
            Statement::Change { .. } => "ChangeStmt",
            Statement::Swap { .. } => "SwapStmt",
            Statement::FuncAssign { .. } => "FuncAssignStmt",
            Statement::Call { .. } => "CallStmt",
            Statement::If { .. } => "IfStmt",
            Statement::While { .. } => "WhileStmt",
            Statement::FacilityInit { .. } => "InitializeFacilityStmt",
            Statement::InitializeVar { .. } => "InitializeVarStmt",
            Statement::FinalizeVar { .. } => "FinalizeVarStmt",
            Statement::Remember { .. } => "RememberStmt",
            Statement::Memory { .. } => "MemoryStmt",
            Statement::VcConfirm { .. } => "VCConfirmStmt",
        }
    }

    /// `Assume e;`
    pub fn assume(assertion: Exp, location: Location) -> Self {
        Statement::Assume {
            assertion,
            stipulate: false,
            location,
        }
    }

    /// `Confirm e;`
    pub fn confirm(assertion: Exp, location: Location) -> Self {
        Statement::Confirm {
            assertion,
            simplify: false,
            location,
        }
    }

    /// `x := e;`
    pub fn assign(var: Exp, value: Exp, location: Location) -> Self {
        Statement::FuncAssign {
            var,
            value,
            location,
        }
    }
}

fn join(exps: &[Exp]) -> String {
    exps.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assume {
                assertion,
                stipulate,
                ..
            } => {
                if *stipulate {
                    write!(f, "Assume (stipulate) {};", assertion)
                } else {
                    write!(f, "Assume {};", assertion)
                }
            }
            Statement::Confirm { assertion, .. } => write!(f, "Confirm {};", assertion),
            Statement::Change { vars, .. } => write!(f, "Change {};", join(vars)),
            Statement::Swap { left, right, .. } => write!(f, "{} :=: {};", left, right),
            Statement::FuncAssign { var, value, .. } => write!(f, "{} := {};", var, value),
            Statement::Call {
                operation, args, ..
            } => write!(f, "{}({});", operation, join(args)),
            Statement::If { condition, .. } => write!(f, "If {} then ... end;", condition),
            Statement::While { condition, .. } => write!(f, "While {} do ... end;", condition),
            Statement::FacilityInit { facility, .. } => write!(f, "_InitFac({});", facility),
            Statement::InitializeVar { var, .. } => write!(f, "_Initialize({});", var.name),
            Statement::FinalizeVar { var, .. } => write!(f, "_Finalize({});", var.name),
            Statement::Remember { .. } => write!(f, "Remember;"),
            Statement::Memory { .. } => write!(f, "Memory;"),
            Statement::VcConfirm { vcs, .. } => write!(f, "Confirm VCs ({});", vcs.len()),
        }
    }
}
