use crate::absyn::{Exp, Location, LocationDetailModel};
use crate::sequent::Sequent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named sequent whose validity is part of a program's correctness argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationCondition {
    name: String,
    location: Location,
    sequent: Sequent,
    detail: Option<LocationDetailModel>,
    impacting_reduction: bool,
}

impl VerificationCondition {
    /// Unnamed VC; names are assigned when its block is finalized
    pub fn new(location: Location, sequent: Sequent, detail: Option<LocationDetailModel>) -> Self {
        Self {
            name: String::new(),
            location,
            sequent,
            detail,
            impacting_reduction: false,
        }
    }

    /// VC for a single goal with no hypotheses
    pub fn goal(location: Location, goal: Exp) -> Self {
        let detail = goal.detail.clone();
        let sequent = Sequent::new(location.clone(), Vec::new(), vec![goal]);
        Self::new(location, sequent, detail)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn sequent(&self) -> &Sequent {
        &self.sequent
    }

    pub fn detail(&self) -> Option<&LocationDetailModel> {
        self.detail.as_ref()
    }

    pub fn impacting_reduction(&self) -> bool {
        self.impacting_reduction
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Same provenance, different sequent
    pub fn with_sequent(&self, sequent: Sequent) -> Self {
        Self {
            sequent,
            ..self.clone()
        }
    }

    pub(crate) fn with_detail(mut self, detail: Option<LocationDetailModel>) -> Self {
        self.detail = detail;
        self
    }

    pub(crate) fn with_impacting_reduction(mut self, impacting: bool) -> Self {
        self.impacting_reduction = impacting;
        self
    }

    /// Drop `true` hypotheses, `false` goals and repeated members
    pub fn simplify(&self) -> Self {
        let mut antecedents: Vec<Exp> = Vec::new();
        for exp in self.sequent.antecedents() {
            if !exp.is_literal_true() && !antecedents.iter().any(|a| a.equivalent(exp)) {
                antecedents.push(exp.clone());
            }
        }
        let mut consequents: Vec<Exp> = Vec::new();
        for exp in self.sequent.consequents() {
            if !exp.is_literal_false() && !consequents.iter().any(|c| c.equivalent(exp)) {
                consequents.push(exp.clone());
            }
        }
        self.with_sequent(self.sequent.with_members(antecedents, consequents))
    }

    /// Holds without any theorem: a `false` hypothesis, a `true` goal, or a goal
    /// that is literally one of the hypotheses
    pub fn is_obviously_true(&self) -> bool {
        let seq = &self.sequent;
        seq.antecedents().iter().any(Exp::is_literal_false)
            || seq.consequents().iter().any(Exp::is_literal_true)
            || seq.consequents().iter().any(|c| seq.has_antecedent(c))
    }
}

impl fmt::Display for VerificationCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VC {}", self.name)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        writeln!(f)?;
        writeln!(f, "Goal(s):")?;
        for goal in self.sequent.consequents() {
            writeln!(f, "  {}", goal)?;
        }
        writeln!(f, "Given:")?;
        for (i, given) in self.sequent.antecedents().iter().enumerate() {
            writeln!(f, "  {}: {}", i + 1, given)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_and_obvious() {
        let seq = Sequent::new(
            Location::default(),
            vec![Exp::true_exp(), Exp::var("p"), Exp::var("p")],
            vec![Exp::false_exp(), Exp::var("p")],
        );
        let vc = VerificationCondition::new(Location::default(), seq, None).simplify();
        assert_eq!(vc.sequent().to_string(), "{p} |- {p}");
        assert!(vc.is_obviously_true());
    }

    #[test]
    fn test_goal_keeps_detail() {
        let detail = LocationDetailModel::new(Location::default(), Location::default(), "Ensures Clause of Pop");
        let vc = VerificationCondition::goal(Location::default(), Exp::var("q").with_detail(detail.clone()));
        assert_eq!(vc.detail(), Some(&detail));
        assert!(!vc.is_obviously_true());
    }
}
