use super::{tag, ProofRuleApplication, VerificationContext};
use crate::absyn::{ConceptSpec, Exp, FacilityDec, Location, Statement};
use crate::error::{Error, Result};
use crate::scope::SymbolTable;
use crate::vcgen::AssertiveCodeBlock;

/// Formal-to-actual mapping of one facility instantiation
///
/// Construction checks arity, so every formal of the concept has exactly one
/// actual and [`substitute`](Self::substitute) is total.
#[derive(Debug, Clone)]
pub struct FacilityFormalToActuals {
    facility: String,
    subs: Vec<(Exp, Exp)>,
}

impl FacilityFormalToActuals {
    pub fn new(facility: &FacilityDec, concept: &ConceptSpec) -> Result<Self> {
        if facility.args.len() != concept.params.len() {
            return Err(Error::FacilityArity {
                facility: facility.name.clone(),
                expected: concept.params.len(),
                found: facility.args.len(),
                location: facility.location.clone(),
            });
        }
        let subs = concept
            .params
            .iter()
            .zip(&facility.args)
            .map(|(formal, actual)| (Exp::var(formal.name.clone()), actual.clone()))
            .collect();
        Ok(Self {
            facility: facility.name.clone(),
            subs,
        })
    }

    /// Look up a facility and its concept in scope and build the mapping
    pub fn lookup(scope: &dyn SymbolTable, facility: &str, location: &Location) -> Result<Self> {
        let dec = scope.find_facility(facility).ok_or_else(|| Error::NoSuchSymbol {
            name: facility.to_string(),
            location: location.clone(),
        })?;
        let concept = scope.find_concept(&dec.concept).ok_or_else(|| Error::NoSuchSymbol {
            name: dec.concept.clone(),
            location: dec.location.clone(),
        })?;
        Self::new(dec, concept)
    }

    pub fn facility(&self) -> &str {
        &self.facility
    }

    pub fn substitutions(&self) -> &[(Exp, Exp)] {
        &self.subs
    }

    /// Instantiate an assertion of the concept
    pub fn substitute(&self, exp: &Exp) -> Exp {
        exp.substitute(&self.subs)
    }
}

/// Facility instantiation point: the concept's constraints hold for the actuals
pub struct FacilityInitStmtRule<'a> {
    ctx: &'a VerificationContext<'a>,
    facility: &'a str,
    location: &'a Location,
}

impl<'a> FacilityInitStmtRule<'a> {
    pub fn new(ctx: &'a VerificationContext<'a>, facility: &'a str, location: &'a Location) -> Self {
        Self {
            ctx,
            facility,
            location,
        }
    }
}

impl ProofRuleApplication for FacilityInitStmtRule<'_> {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        let mapping = FacilityFormalToActuals::lookup(self.ctx.scope, self.facility, self.location)?;
        let concept = self
            .ctx
            .scope
            .find_facility(self.facility)
            .and_then(|f| self.ctx.scope.find_concept(&f.concept));

        if let Some(concept) = concept {
            let constraints: Vec<Exp> = concept
                .constraints
                .iter()
                .map(|c| {
                    tag(
                        &mapping.substitute(c),
                        self.location,
                        format!("Constraint Clause of {}", concept.name),
                    )
                })
                .collect();
            if !constraints.is_empty() {
                block.add_statement(Statement::Assume {
                    assertion: Exp::conjunction(constraints),
                    stipulate: false,
                    location: self.location.clone(),
                });
            }
        }
        Ok(Vec::new())
    }

    fn description(&self) -> &'static str {
        "Facility Initialization Rule"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absyn::ModuleParameter;

    fn concept() -> ConceptSpec {
        ConceptSpec::new(
            "Stack_Template",
            vec![ModuleParameter::new("Entry"), ModuleParameter::new("Max_Depth")],
            Location::default(),
        )
        .with_requires(Exp::infix(Exp::var("Max_Depth"), ">", Exp::int(0)))
    }

    #[test]
    fn test_formal_to_actuals() {
        let facility = FacilityDec::new(
            "SF",
            "Stack_Template",
            vec![Exp::var("Integer"), Exp::int(10)],
            Location::default(),
        );
        let mapping = FacilityFormalToActuals::new(&facility, &concept()).unwrap();
        assert_eq!(mapping.substitute(&concept().requires).to_string(), "10 > 0");
    }

    #[test]
    fn test_arity_mismatch_is_source_error() {
        let facility = FacilityDec::new("SF", "Stack_Template", vec![Exp::var("Integer")], Location::default());
        let err = FacilityFormalToActuals::new(&facility, &concept()).unwrap_err();
        assert!(matches!(err, Error::FacilityArity { expected: 2, found: 1, .. }));
        assert!(err.is_source_error());
    }
}
