use super::{tag, ProofRuleApplication};
use crate::absyn::{Exp, Location, Statement};
use crate::error::Result;
use crate::vcgen::AssertiveCodeBlock;

/// `While B maintaining I decreasing P changing x do S end;`
///
/// Rewritten into straight-line statements:
///
/// ```text
/// Confirm I;                       -- base case
/// Change x;
/// Assume I and P_val = P;
/// If B then
///     S;
///     Confirm I and P < P_val;     -- inductive case, termination
/// else
///     Confirm <VCs after the loop>;
/// end;
/// ```
///
/// The VCs collected so far belong after the loop, so they are parked on the
/// exit branch and the block's own list is emptied.
pub struct WhileStmtRule<'a> {
    condition: &'a Exp,
    invariant: &'a Exp,
    decreasing: Option<&'a Exp>,
    changing: &'a [Exp],
    body: &'a [Statement],
    location: &'a Location,
}

impl<'a> WhileStmtRule<'a> {
    pub fn new(
        condition: &'a Exp,
        invariant: &'a Exp,
        decreasing: Option<&'a Exp>,
        changing: &'a [Exp],
        body: &'a [Statement],
        location: &'a Location,
    ) -> Self {
        Self {
            condition,
            invariant,
            decreasing,
            changing,
            body,
            location,
        }
    }
}

impl ProofRuleApplication for WhileStmtRule<'_> {
    fn apply(&self, block: &mut AssertiveCodeBlock) -> Result<Vec<AssertiveCodeBlock>> {
        let loc = self.location;

        block.add_statement(Statement::confirm(
            tag(self.invariant, loc, "Base Case of the Invariant of While Statement"),
            loc.clone(),
        ));
        block.add_statement(Statement::Change {
            vars: self.changing.to_vec(),
            location: loc.clone(),
        });

        let mut assumed = vec![self.invariant.clone()];
        let mut maintained = vec![tag(
            self.invariant,
            loc,
            "Inductive Case of Invariant of While Statement",
        )];
        if let Some(decreasing) = self.decreasing {
            let p_val = block.next_vc_var(&Exp::var("P_val"));
            block.add_free_var(p_val.clone());
            assumed.push(Exp::equals(p_val.clone(), decreasing.clone()));
            maintained.push(tag(
                &Exp::infix(decreasing.clone(), "<", p_val),
                loc,
                "Termination of While Statement",
            ));
        }
        block.add_statement(Statement::Assume {
            assertion: Exp::conjunction(assumed),
            stipulate: true,
            location: loc.clone(),
        });

        let mut then_branch = self.body.to_vec();
        then_branch.push(Statement::confirm(Exp::conjunction(maintained), loc.clone()));
        let else_branch = vec![Statement::VcConfirm {
            vcs: block.take_vcs(),
            location: loc.clone(),
        }];
        block.add_statement(Statement::If {
            condition: self.condition.clone(),
            then_branch,
            else_branch,
            location: loc.clone(),
        });

        Ok(Vec::new())
    }

    fn description(&self) -> &'static str {
        "While Rule"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcgen::VerificationCondition;

    #[test]
    fn test_while_rewrites_into_if() {
        let mut block = AssertiveCodeBlock::new("Test", Location::default());
        block.add_vc(VerificationCondition::goal(Location::default(), Exp::var("post")));

        let condition = Exp::infix(Exp::var("i"), "<", Exp::var("n"));
        let invariant = Exp::infix(Exp::var("i"), "<=", Exp::var("n"));
        let decreasing = Exp::infix(Exp::var("n"), "-", Exp::var("i"));
        let changing = vec![Exp::var("i")];
        let loc = Location::new("T.fa", 12, 5);
        WhileStmtRule::new(&condition, &invariant, Some(&decreasing), &changing, &[], &loc)
            .apply(&mut block)
            .unwrap();

        assert!(block.vcs().is_empty());
        let kinds: Vec<&str> = block.statements().iter().map(|s| s.kind_name()).collect();
        assert_eq!(kinds, vec!["ConfirmStmt", "ChangeStmt", "AssumeStmt", "IfStmt"]);

        match block.statements().last() {
            Some(Statement::If { else_branch, then_branch, .. }) => {
                assert!(matches!(&else_branch[0], Statement::VcConfirm { vcs, .. } if vcs.len() == 1));
                assert!(then_branch[0].to_string().contains("(n - i) < P_val'"));
            }
            other => panic!("expected if statement, got {:?}", other),
        }
    }
}
