//! Transformations: sources of candidate [`GeneralApplication`]s
//!
//! Each transformation inspects the current model and proposes the steps it
//! can take. It never mutates the model itself.

use super::application::GeneralApplication;
use super::context::ReasoningContext;
use super::elaboration::ElaborationRule;
use super::matching::{all_terms, instantiate, match_all, match_pattern, Bindings};
use super::model::{PerVcProverModel, Site};
use super::theorem_store::Theorem;
use crate::absyn::Exp;
use std::fmt;

/// Search order between transformation kinds; lower runs first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransformationKind {
    TheoremInstance,
    LocalSubstitution,
    TheoremRewrite,
    Elaboration,
}

pub trait Transformation: Send + Sync + fmt::Debug {
    fn kind(&self) -> TransformationKind;

    /// Source theorem, if any
    fn theorem(&self) -> Option<&str>;

    fn applications(&self, model: &PerVcProverModel, ctx: &ReasoningContext) -> Vec<GeneralApplication>;
}

/// Forward-chains an elaboration rule, adding its instantiated resultant
///
/// An implication resultant whose premise is already a local theorem adds its
/// conclusion instead.
#[derive(Debug, Clone)]
pub struct ElaborationTransformation {
    rule: ElaborationRule,
}

impl ElaborationTransformation {
    pub fn new(rule: ElaborationRule) -> Self {
        Self { rule }
    }
}

impl Transformation for ElaborationTransformation {
    fn kind(&self) -> TransformationKind {
        TransformationKind::Elaboration
    }

    fn theorem(&self) -> Option<&str> {
        Some(self.rule.theorem())
    }

    fn applications(&self, model: &PerVcProverModel, ctx: &ReasoningContext) -> Vec<GeneralApplication> {
        let exps: Vec<&Exp> = model
            .local_theorems()
            .chain(model.consequents())
            .map(|(_, e)| e)
            .collect();
        let pool = all_terms(exps);
        let vars = self.rule.vars();
        let mut added: Vec<Exp> = Vec::new();
        for bindings in match_all(self.rule.precursors(), &pool, vars, ctx.match_limit) {
            let Some(mut resultant) = instantiate(self.rule.resultant(), vars, &bindings) else {
                continue;
            };
            let conclusion = resultant
                .infix_parts("implies")
                .filter(|(premise, _)| model.has_local_theorem(premise))
                .map(|(_, conclusion)| conclusion.clone());
            if let Some(conclusion) = conclusion {
                resultant = conclusion;
            }
            if resultant.is_literal_true()
                || model.has_local_theorem(&resultant)
                || added.iter().any(|e| e.equivalent(&resultant))
            {
                continue;
            }
            added.push(resultant);
        }
        let end = model.local_theorem_ids().len();
        added
            .into_iter()
            .map(|exp| {
                GeneralApplication::new("Elaboration")
                    .with_theorem(self.rule.theorem())
                    .add_local_theorem(exp, end)
            })
            .collect()
    }
}

/// Rewrites goal sub-terms with a theorem `lhs = rhs`, left to right
#[derive(Debug, Clone)]
pub struct TheoremRewriteTransformation {
    theorem: String,
    vars: Vec<String>,
    lhs: Exp,
    rhs: Exp,
}

impl TheoremRewriteTransformation {
    /// `None` unless the theorem is an equality whose right side is determined by its left
    pub fn from_theorem(theorem: &Theorem) -> Option<Self> {
        let vars = theorem.pattern_vars();
        let (lhs, rhs) = theorem.body().infix_parts("=")?;
        if lhs.var_name().map_or(false, |n| vars.iter().any(|v| v == n)) {
            return None;
        }
        let lhs_vars = lhs.free_variables();
        let determined = rhs
            .free_variables()
            .iter()
            .all(|v| !vars.contains(v) || lhs_vars.contains(v));
        if !determined {
            return None;
        }
        Some(Self {
            theorem: theorem.name().to_string(),
            vars,
            lhs: lhs.clone(),
            rhs: rhs.clone(),
        })
    }
}

impl Transformation for TheoremRewriteTransformation {
    fn kind(&self) -> TransformationKind {
        TransformationKind::TheoremRewrite
    }

    fn theorem(&self) -> Option<&str> {
        Some(&self.theorem)
    }

    fn applications(&self, model: &PerVcProverModel, ctx: &ReasoningContext) -> Vec<GeneralApplication> {
        let mut out = Vec::new();
        for (id, goal) in model.consequents() {
            for path in goal.paths() {
                if out.len() >= ctx.match_limit {
                    return out;
                }
                let Some(sub) = goal.at_path(&path) else {
                    continue;
                };
                let mut bindings = Bindings::new();
                if !match_pattern(&self.lhs, sub, &self.vars, &mut bindings) {
                    continue;
                }
                let Some(replacement) = instantiate(&self.rhs, &self.vars, &bindings) else {
                    continue;
                };
                if let Some(rewritten) = goal.replace_at_path(&path, replacement) {
                    out.push(
                        GeneralApplication::new("Theorem Rewrite")
                            .with_theorem(self.theorem.clone())
                            .update(id, rewritten)
                            .with_site(Site { conjunct: id, path }),
                    );
                }
            }
        }
        out
    }
}

/// Closes a goal that is an instance of a theorem, or the conclusion of an
/// implication theorem whose premise is a local theorem
#[derive(Debug, Clone)]
pub struct TheoremInstanceTransformation {
    theorem: String,
    vars: Vec<String>,
    body: Exp,
}

impl TheoremInstanceTransformation {
    pub fn from_theorem(theorem: &Theorem) -> Self {
        Self {
            theorem: theorem.name().to_string(),
            vars: theorem.pattern_vars(),
            body: theorem.body().clone(),
        }
    }

    fn closes(&self, model: &PerVcProverModel, goal: &Exp) -> bool {
        if match_pattern(&self.body, goal, &self.vars, &mut Bindings::new()) {
            return true;
        }
        let Some((premise, conclusion)) = self.body.infix_parts("implies") else {
            return false;
        };
        let mut bindings = Bindings::new();
        if !match_pattern(conclusion, goal, &self.vars, &mut bindings) {
            return false;
        }
        match instantiate(premise, &self.vars, &bindings) {
            Some(p) => model.has_local_theorem(&p),
            None => false,
        }
    }
}

impl Transformation for TheoremInstanceTransformation {
    fn kind(&self) -> TransformationKind {
        TransformationKind::TheoremInstance
    }

    fn theorem(&self) -> Option<&str> {
        Some(&self.theorem)
    }

    fn applications(&self, model: &PerVcProverModel, _ctx: &ReasoningContext) -> Vec<GeneralApplication> {
        model
            .consequents()
            .filter(|(_, goal)| !goal.is_literal_true() && self.closes(model, goal))
            .map(|(id, _)| {
                GeneralApplication::new("Theorem Instance")
                    .with_theorem(self.theorem.clone())
                    .update(id, Exp::true_exp())
                    .with_site(Site::root(id))
            })
            .collect()
    }
}

/// Substitutes one side of a local equality for the other in goals
#[derive(Debug, Clone, Default)]
pub struct LocalEqualitySubstitution;

impl Transformation for LocalEqualitySubstitution {
    fn kind(&self) -> TransformationKind {
        TransformationKind::LocalSubstitution
    }

    fn theorem(&self) -> Option<&str> {
        None
    }

    fn applications(&self, model: &PerVcProverModel, ctx: &ReasoningContext) -> Vec<GeneralApplication> {
        let mut out = Vec::new();
        for (eq_id, eq) in model.local_theorems() {
            let Some((left, right)) = eq.infix_parts("=") else {
                continue;
            };
            for (from, to) in [(left, right), (right, left)] {
                if to.contains(from) {
                    continue;
                }
                for (goal_id, goal) in model.consequents() {
                    if out.len() >= ctx.match_limit {
                        return out;
                    }
                    if !goal.contains(from) {
                        continue;
                    }
                    let rewritten = goal.substitute(&[(from.clone(), to.clone())]);
                    out.push(
                        GeneralApplication::new("Local Equality Substitution")
                            .update(goal_id, rewritten)
                            .with_site(Site::root(eq_id))
                            .with_site(Site::root(goal_id)),
                    );
                }
            }
        }
        out
    }
}

/// Every transformation derivable from `theorem` and its elaboration rules
pub fn for_theorem(theorem: &Theorem, rules: &[ElaborationRule]) -> Vec<Box<dyn Transformation>> {
    let mut out: Vec<Box<dyn Transformation>> =
        vec![Box::new(TheoremInstanceTransformation::from_theorem(theorem))];
    if let Some(rewrite) = TheoremRewriteTransformation::from_theorem(theorem) {
        out.push(Box::new(rewrite));
    }
    out.extend(
        rules
            .iter()
            .filter(|r| r.theorem() == theorem.name())
            .map(|r| Box::new(ElaborationTransformation::new(r.clone())) as Box<dyn Transformation>),
    );
    out
}
