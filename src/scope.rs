//! Queryable module scope
//!
//! Symbol-table population belongs to the front end. The verification core only
//! needs read access to the entries of one module, expressed by [`SymbolTable`].
//! [`ModuleScope`] is an in-memory implementation hosts and tests can fill
//! directly.

use crate::absyn::{
    ConceptSpec, Exp, FacilityDec, Location, MathType, OperationEntry, TheoremEntry,
    TypeFamilyDec,
};
use crate::error::{Error, Result};

/// Read-only view of one module's symbol table
pub trait SymbolTable {
    /// Name of the module being verified
    fn module_name(&self) -> &str;

    /// Theorems visible from the module, in declaration order
    fn theorems(&self) -> &[TheoremEntry];

    /// Operations declared in or imported by the module
    fn operations(&self) -> &[OperationEntry];

    /// Facilities declared in the module
    fn facilities(&self) -> &[FacilityDec];

    /// Concepts visible from the module
    fn concepts(&self) -> &[ConceptSpec];

    /// Module-level assumptions (constraints of the module and its imports)
    fn global_constraints(&self) -> &[Exp];

    fn find_facility(&self, name: &str) -> Option<&FacilityDec> {
        self.facilities().iter().find(|f| f.name == name)
    }

    fn find_concept(&self, name: &str) -> Option<&ConceptSpec> {
        self.concepts().iter().find(|c| c.name == name)
    }

    /// Type family for a program type, with the facility that instantiates it
    ///
    /// Built-in program types (`Integer`, `Boolean`) have no family and yield `None`.
    fn find_type_family(
        &self,
        facility: Option<&str>,
        type_name: &str,
    ) -> Option<(&TypeFamilyDec, Option<&FacilityDec>)> {
        match facility {
            Some(name) => {
                let facility = self.find_facility(name)?;
                let concept = self.find_concept(&facility.concept)?;
                let family = concept.type_families.iter().find(|t| t.name == type_name)?;
                Some((family, Some(facility)))
            }
            None => self.concepts().iter().find_map(|c| {
                c.type_families
                    .iter()
                    .find(|t| t.name == type_name)
                    .map(|t| (t, None))
            }),
        }
    }
}

/// In-memory module scope
#[derive(Debug, Clone, Default)]
pub struct ModuleScope {
    name: String,
    theorems: Vec<TheoremEntry>,
    operations: Vec<OperationEntry>,
    facilities: Vec<FacilityDec>,
    concepts: Vec<ConceptSpec>,
    constraints: Vec<Exp>,
}

impl ModuleScope {
    /// Create an empty scope for a module
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_theorem(&mut self, theorem: TheoremEntry) -> &mut Self {
        self.theorems.push(theorem);
        self
    }

    pub fn add_operation(&mut self, operation: OperationEntry) -> &mut Self {
        self.operations.push(operation);
        self
    }

    pub fn add_facility(&mut self, facility: FacilityDec) -> &mut Self {
        self.facilities.push(facility);
        self
    }

    /// Add a concept; its operations become visible for call resolution
    pub fn add_concept(&mut self, concept: ConceptSpec) -> &mut Self {
        self.operations.extend(concept.operations.iter().cloned());
        self.concepts.push(concept);
        self
    }

    pub fn add_constraint(&mut self, constraint: Exp) -> &mut Self {
        self.constraints.push(constraint);
        self
    }
}

impl SymbolTable for ModuleScope {
    fn module_name(&self) -> &str {
        &self.name
    }

    fn theorems(&self) -> &[TheoremEntry] {
        &self.theorems
    }

    fn operations(&self) -> &[OperationEntry] {
        &self.operations
    }

    fn facilities(&self) -> &[FacilityDec] {
        &self.facilities
    }

    fn concepts(&self) -> &[ConceptSpec] {
        &self.concepts
    }

    fn global_constraints(&self) -> &[Exp] {
        &self.constraints
    }
}

/// Finds the operation a call statement refers to
///
/// Matches by name and argument count, then by argument types where both sides
/// are known. Entries whose parameter types never resolved are skipped rather
/// than failing the whole query.
#[derive(Debug, Clone)]
pub struct OperationProfileSearcher<'a> {
    name: &'a str,
    arg_types: Vec<Option<&'a MathType>>,
    location: &'a Location,
}

impl<'a> OperationProfileSearcher<'a> {
    pub fn new(name: &'a str, args: &'a [Exp], location: &'a Location) -> Self {
        Self {
            name,
            arg_types: args.iter().map(|a| a.math_type.as_ref()).collect(),
            location,
        }
    }

    /// All entries compatible with the call
    pub fn matching<'s, S: SymbolTable + ?Sized>(&self, scope: &'s S) -> Vec<&'s OperationEntry> {
        scope
            .operations()
            .iter()
            .filter(|op| op.name == self.name && op.params.len() == self.arg_types.len())
            .filter(|op| match self.check_types(op) {
                Ok(matches) => matches,
                Err(e) => {
                    tracing::debug!("Skipping operation entry {}: {}", op.name, e);
                    false
                }
            })
            .collect()
    }

    /// The first compatible entry, or a source error when none exists
    pub fn find<'s, S: SymbolTable + ?Sized>(&self, scope: &'s S) -> Result<&'s OperationEntry> {
        self.matching(scope)
            .into_iter()
            .next()
            .ok_or_else(|| Error::NoSuchSymbol {
                name: format!("{}/{}", self.name, self.arg_types.len()),
                location: self.location.clone(),
            })
    }

    fn check_types(&self, op: &OperationEntry) -> Result<bool> {
        let typed_call = self.arg_types.iter().any(Option::is_some);
        for (param, arg_type) in op.params.iter().zip(&self.arg_types) {
            match (&param.math_type, arg_type) {
                (Some(expected), Some(actual)) => {
                    if expected != *actual {
                        return Ok(false);
                    }
                }
                (None, Some(_)) if typed_call => {
                    return Err(Error::source(
                        op.location.clone(),
                        format!("parameter {} of {} has no resolved type", param.name, op.name),
                    ));
                }
                _ => {}
            }
        }
        Ok(true)
    }
}
