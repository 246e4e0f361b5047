use super::{tag, ProofRuleApplication};
use crate::absyn::{Exp, Location, Statement};
use crate::error::Result;
use crate::vcgen::AssertiveCodeBlock;

/// `If B then S1 else S2 end;` splits the block in two
///
/// The current block continues with `Assume B; S1`, a copy continues with
/// `Assume not B; S2`. Both assumptions are stipulated so the branch condition
/// is never filtered away.
pub struct IfStmtRule<'a> {
    condition: &'a Exp,
    then_branch: &'a [Statement],
    else_branch: &'a [Statement],
    location: &'a Location,
}

impl<'a> IfStmtRule<'a> {
    pub fn new(
        condition: &'a Exp,
        then_branch: &'a [Statement],
        else_branch: &'a [Statement],
        location: &'a Location,
    ) -> Self {
        Self {
            condition,
            then_branch,
            else_branch,
            location,
        }
    }
}

impl ProofRuleApplication for IfStmtRule<'_> {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        let negated = Exp::not(self.condition.clone());
        let mut negated_block = block.clone();

        block.add_branching_condition(self.location, self.condition);
        block.add_statement(Statement::Assume {
            assertion: tag(self.condition, self.location, "Condition from If Statement"),
            stipulate: true,
            location: self.location.clone(),
        });
        block.add_statements(self.then_branch.iter().cloned());

        negated_block.add_branching_condition(self.location, &negated);
        negated_block.add_statement(Statement::Assume {
            assertion: tag(&negated, self.location, "Negation of Condition from If Statement"),
            stipulate: true,
            location: self.location.clone(),
        });
        negated_block.add_statements(self.else_branch.iter().cloned());

        Ok(vec![negated_block])
    }

    fn description(&self) -> &'static str {
        "If-Else Rule"
    }
}
