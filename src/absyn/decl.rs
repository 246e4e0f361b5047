use super::exp::{Exp, MathType};
use super::location::Location;
use super::stmt::{Statement, VarDec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameter passing modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterMode {
    /// Value may change in an unspecified way
    Alters,
    /// Value changes as the ensures clause describes
    Updates,
    /// Value is reset to an initial value
    Clears,
    /// Value is restored before returning
    Restores,
    /// Value is never modified
    Preserves,
    /// Incoming value is ignored and replaced
    Replaces,
    /// Argument is an expression evaluated at the call
    Evaluates,
}

impl ParameterMode {
    /// Whether a call may leave the argument with a new value
    pub fn changes_value(&self) -> bool {
        matches!(
            self,
            ParameterMode::Alters
                | ParameterMode::Updates
                | ParameterMode::Clears
                | ParameterMode::Replaces
        )
    }

    /// Whether the outgoing value must equal the incoming one
    pub fn keeps_value(&self) -> bool {
        matches!(self, ParameterMode::Restores | ParameterMode::Preserves)
    }

    /// Whether a procedure parameter in mode `implementation` may implement this mode
    ///
    /// Equal modes always match; a procedure may promise more than its
    /// operation (restoring or preserving where the operation updates or alters).
    pub fn accepts(&self, implementation: ParameterMode) -> bool {
        if *self == implementation {
            return true;
        }
        match self {
            ParameterMode::Alters => implementation != ParameterMode::Evaluates,
            ParameterMode::Updates => {
                matches!(implementation, ParameterMode::Restores | ParameterMode::Preserves)
            }
            ParameterMode::Restores => implementation == ParameterMode::Preserves,
            _ => false,
        }
    }
}

impl fmt::Display for ParameterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            ParameterMode::Alters => "alters",
            ParameterMode::Updates => "updates",
            ParameterMode::Clears => "clears",
            ParameterMode::Restores => "restores",
            ParameterMode::Preserves => "preserves",
            ParameterMode::Replaces => "replaces",
            ParameterMode::Evaluates => "evaluates",
        };
        write!(f, "{}", word)
    }
}

/// Operation or procedure parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDec {
    pub name: String,
    pub mode: ParameterMode,
    /// Program type name
    pub type_name: String,
    /// Mathematical type, once resolved
    pub math_type: Option<MathType>,
}

impl ParameterDec {
    pub fn new(name: impl Into<String>, mode: ParameterMode, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode,
            type_name: type_name.into(),
            math_type: None,
        }
    }

    /// Attach a resolved mathematical type
    pub fn with_math_type(mut self, math_type: MathType) -> Self {
        self.math_type = Some(math_type);
        self
    }

    pub fn as_exp(&self) -> Exp {
        let exp = Exp::var(self.name.clone());
        match &self.math_type {
            Some(t) => exp.with_type(t.clone()),
            None => exp,
        }
    }
}

/// Operation specification as found in the symbol table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationEntry {
    pub name: String,
    pub params: Vec<ParameterDec>,
    /// Precondition (`true` when absent)
    pub requires: Exp,
    /// Postcondition (`true` when absent)
    pub ensures: Exp,
    pub location: Location,
}

impl OperationEntry {
    pub fn new(name: impl Into<String>, params: Vec<ParameterDec>, location: Location) -> Self {
        Self {
            name: name.into(),
            params,
            requires: Exp::true_exp(),
            ensures: Exp::true_exp(),
            location,
        }
    }

    pub fn with_requires(mut self, requires: Exp) -> Self {
        self.requires = requires;
        self
    }

    pub fn with_ensures(mut self, ensures: Exp) -> Self {
        self.ensures = ensures;
        self
    }
}

/// Procedure implementing an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureDec {
    pub name: String,
    pub params: Vec<ParameterDec>,
    /// Local variables
    pub variables: Vec<VarDec>,
    /// Body
    pub statements: Vec<Statement>,
    pub location: Location,
}

impl ProcedureDec {
    pub fn new(name: impl Into<String>, params: Vec<ParameterDec>, location: Location) -> Self {
        Self {
            name: name.into(),
            params,
            variables: Vec::new(),
            statements: Vec::new(),
            location,
        }
    }

    pub fn with_variables(mut self, variables: Vec<VarDec>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_statements(mut self, statements: Vec<Statement>) -> Self {
        self.statements = statements;
        self
    }
}

/// Formal parameter of a concept: `Max_Depth: Integer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleParameter {
    pub name: String,
    pub math_type: Option<MathType>,
}

impl ModuleParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            math_type: None,
        }
    }
}

/// Type family exported by a concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeFamilyDec {
    /// Program type name
    pub name: String,
    /// Exemplar variable name used in the clauses
    pub exemplar: String,
    pub constraint: Exp,
    pub initialization_ensures: Exp,
    pub finalization_ensures: Exp,
    pub location: Location,
}

impl TypeFamilyDec {
    pub fn new(name: impl Into<String>, exemplar: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            exemplar: exemplar.into(),
            constraint: Exp::true_exp(),
            initialization_ensures: Exp::true_exp(),
            finalization_ensures: Exp::true_exp(),
            location,
        }
    }

    pub fn with_constraint(mut self, constraint: Exp) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn with_initialization_ensures(mut self, ensures: Exp) -> Self {
        self.initialization_ensures = ensures;
        self
    }

    pub fn with_finalization_ensures(mut self, ensures: Exp) -> Self {
        self.finalization_ensures = ensures;
        self
    }

    pub fn exemplar_exp(&self) -> Exp {
        Exp::var(self.exemplar.clone())
    }
}

/// Concept (specification module)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptSpec {
    pub name: String,
    pub params: Vec<ModuleParameter>,
    /// Module-level precondition on the parameters
    pub requires: Exp,
    /// Module-level constraints
    pub constraints: Vec<Exp>,
    pub type_families: Vec<TypeFamilyDec>,
    pub operations: Vec<OperationEntry>,
    pub location: Location,
}

impl ConceptSpec {
    pub fn new(name: impl Into<String>, params: Vec<ModuleParameter>, location: Location) -> Self {
        Self {
            name: name.into(),
            params,
            requires: Exp::true_exp(),
            constraints: Vec::new(),
            type_families: Vec::new(),
            operations: Vec::new(),
            location,
        }
    }

    pub fn with_requires(mut self, requires: Exp) -> Self {
        self.requires = requires;
        self
    }

    pub fn with_type_family(mut self, family: TypeFamilyDec) -> Self {
        self.type_families.push(family);
        self
    }

    pub fn with_operation(mut self, operation: OperationEntry) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn with_constraint(mut self, constraint: Exp) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Facility declaration: `Facility SF is Stack_Template(Integer, 10) realized by ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityDec {
    pub name: String,
    /// Concept being instantiated
    pub concept: String,
    /// Actual arguments, positionally matched with the concept's parameters
    pub args: Vec<Exp>,
    pub location: Location,
}

impl FacilityDec {
    pub fn new(
        name: impl Into<String>,
        concept: impl Into<String>,
        args: Vec<Exp>,
        location: Location,
    ) -> Self {
        Self {
            name: name.into(),
            concept: concept.into(),
            args,
            location,
        }
    }
}

/// Implementation module handed to the VC generator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleDec {
    pub name: String,
    /// Facility declarations whose instantiation must be checked
    pub facilities: Vec<FacilityDec>,
    /// Procedures to verify
    pub procedures: Vec<ProcedureDec>,
}

impl ModuleDec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_facility(mut self, facility: FacilityDec) -> Self {
        self.facilities.push(facility);
        self
    }

    pub fn with_procedure(mut self, procedure: ProcedureDec) -> Self {
        self.procedures.push(procedure);
        self
    }
}

/// Theorem as stored in the symbol table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TheoremEntry {
    pub name: String,
    /// Assertion, universally quantified over its free variables
    pub assertion: Exp,
    pub location: Location,
}

impl TheoremEntry {
    pub fn new(name: impl Into<String>, assertion: Exp, location: Location) -> Self {
        Self {
            name: name.into(),
            assertion,
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_compatibility() {
        assert!(ParameterMode::Updates.accepts(ParameterMode::Updates));
        assert!(ParameterMode::Updates.accepts(ParameterMode::Restores));
        assert!(ParameterMode::Alters.accepts(ParameterMode::Clears));
        assert!(!ParameterMode::Preserves.accepts(ParameterMode::Updates));
        assert!(!ParameterMode::Alters.accepts(ParameterMode::Evaluates));
    }

    #[test]
    fn test_changing_modes() {
        assert!(ParameterMode::Replaces.changes_value());
        assert!(!ParameterMode::Evaluates.changes_value());
        assert!(ParameterMode::Preserves.keeps_value());
    }
}
