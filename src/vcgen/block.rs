use super::vc::VerificationCondition;
use crate::absyn::{Exp, ExpKind, Location, Statement};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One linear path through a procedure, consumed backward by the proof rules
///
/// Statements form a stack: the last statement is the next one a rule handles.
/// Cloning a block (the if rule does) gives an independent copy of every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertiveCodeBlock {
    name: String,
    location: Location,
    free_vars: Vec<Exp>,
    statements: Vec<Statement>,
    vcs: Vec<VerificationCondition>,
    branching_conditions: Vec<String>,
    trace: Vec<String>,
}

impl AssertiveCodeBlock {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            free_vars: Vec::new(),
            statements: Vec::new(),
            vcs: Vec::new(),
            branching_conditions: Vec::new(),
            trace: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn add_statement(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn add_statements(&mut self, statements: impl IntoIterator<Item = Statement>) {
        self.statements.extend(statements);
    }

    pub fn remove_last_statement(&mut self) -> Option<Statement> {
        self.statements.pop()
    }

    pub fn has_more_statements(&self) -> bool {
        !self.statements.is_empty()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn free_vars(&self) -> &[Exp] {
        &self.free_vars
    }

    pub fn add_free_var(&mut self, var: Exp) {
        if !self.contains_free_var(&var) {
            self.free_vars.push(var);
        }
    }

    pub fn contains_free_var(&self, var: &Exp) -> bool {
        self.free_vars.iter().any(|v| v.equivalent(var))
    }

    /// Next unused verification variable for `var`: `x'`, then `x''`, ...
    pub fn next_vc_var(&self, var: &Exp) -> Exp {
        let base = match &var.kind {
            ExpKind::VcVar { exp, .. } => exp.as_ref(),
            _ => var,
        };
        let used = self
            .free_vars
            .iter()
            .filter_map(|v| match &v.kind {
                ExpKind::VcVar { exp, ticks } if exp.equivalent(base) => Some(*ticks),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        let mut plain = base.clone();
        plain.detail = None;
        Exp::vc_var(plain, used + 1)
    }

    pub fn vcs(&self) -> &[VerificationCondition] {
        &self.vcs
    }

    /// Record a new goal; goals met earlier on the backward walk come later in
    /// the program, so the list stays in program order
    pub fn add_vc(&mut self, vc: VerificationCondition) {
        self.vcs.insert(0, vc);
    }

    /// Append VCs after the current ones
    pub fn extend_vcs(&mut self, vcs: impl IntoIterator<Item = VerificationCondition>) {
        self.vcs.extend(vcs);
    }

    /// Remove and return every VC
    pub fn take_vcs(&mut self) -> Vec<VerificationCondition> {
        std::mem::take(&mut self.vcs)
    }

    pub(crate) fn set_vcs(&mut self, vcs: Vec<VerificationCondition>) {
        self.vcs = vcs;
    }

    /// Rewrite every VC in place
    pub fn update_vcs(&mut self, mut f: impl FnMut(&VerificationCondition) -> VerificationCondition) {
        self.vcs = self.vcs.iter().map(&mut f).collect();
    }

    /// Apply a substitution to every VC
    pub fn substitute(&mut self, subs: &[(Exp, Exp)]) {
        if subs.is_empty() {
            return;
        }
        self.update_vcs(|vc| vc.with_sequent(vc.sequent().substitute(subs)));
    }

    pub fn add_branching_condition(&mut self, location: &Location, condition: &Exp) {
        self.branching_conditions
            .push(format!("{} ({})", condition, location));
    }

    pub fn branching_conditions(&self) -> &[String] {
        &self.branching_conditions
    }

    /// Record a rule application in the step trace
    pub fn record_step(&mut self, rule: &str, statement: &Statement) {
        self.trace.push(format!("{}: {}", rule, statement));
    }

    pub fn trace(&self) -> &[String] {
        &self.trace
    }
}

impl fmt::Display for AssertiveCodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========== {} ==========", self.name)?;
        write!(f, "Free Variables:")?;
        for var in &self.free_vars {
            write!(f, " {}", var)?;
        }
        writeln!(f)?;
        for condition in &self.branching_conditions {
            writeln!(f, "Branching Condition: {}", condition)?;
        }
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        for vc in &self.vcs {
            writeln!(f)?;
            write!(f, "{}", vc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_stack() {
        let mut block = AssertiveCodeBlock::new("Test", Location::default());
        block.add_statement(Statement::Remember { location: Location::default() });
        block.add_statement(Statement::Memory { location: Location::default() });
        assert!(matches!(block.remove_last_statement(), Some(Statement::Memory { .. })));
        assert!(block.has_more_statements());
    }

    #[test]
    fn test_next_vc_var_counts_ticks() {
        let mut block = AssertiveCodeBlock::new("Test", Location::default());
        let x = Exp::var("x");
        let first = block.next_vc_var(&x);
        assert_eq!(first.to_string(), "x'");
        block.add_free_var(first);
        assert_eq!(block.next_vc_var(&x).to_string(), "x''");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut block = AssertiveCodeBlock::new("Test", Location::default());
        block.add_vc(VerificationCondition::goal(Location::default(), Exp::var("p")));
        let mut copy = block.clone();
        copy.take_vcs();
        assert_eq!(block.vcs().len(), 1);
        assert!(copy.vcs().is_empty());
    }
}
