//! Mutable per-VC proof state with an undo stack

use super::vc::ImmutableVc;
use crate::absyn::Exp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a conjunct in the model's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConjunctId(pub usize);

/// Which side of the VC a conjunct lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConjunctRole {
    LocalTheorem,
    Consequent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conjunct {
    pub exp: Exp,
    pub role: ConjunctRole,
    /// `Given`, `Goal` or the transformation that introduced it
    pub origin: String,
}

/// Position inside a conjunct: handle plus path in its expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Site {
    pub conjunct: ConjunctId,
    pub path: Vec<usize>,
}

impl Site {
    pub fn root(conjunct: ConjunctId) -> Self {
        Self {
            conjunct,
            path: Vec::new(),
        }
    }
}

/// Removed conjunct with the list position it held
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RemovedConjunct {
    pub id: ConjunctId,
    pub index: usize,
    pub conjunct: Conjunct,
}

/// Everything needed to revert one applied [`GeneralApplication`](super::GeneralApplication)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralStep {
    pub description: String,
    pub theorem: Option<String>,
    pub sites: Vec<Site>,
    pub(crate) altered: Vec<(ConjunctId, Exp)>,
    pub(crate) removed: Vec<RemovedConjunct>,
    pub(crate) added: Vec<ConjunctId>,
}

/// Goals and local theorems of one VC as the prover rewrites them
///
/// Conjuncts live in an arena addressed by [`ConjunctId`]; removal leaves a hole
/// so handles held by pending applications stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerVcProverModel {
    vc_name: String,
    arena: Vec<Option<Conjunct>>,
    local_theorems: Vec<ConjunctId>,
    consequents: Vec<ConjunctId>,
    steps: Vec<GeneralStep>,
}

impl PerVcProverModel {
    pub fn new(vc: &ImmutableVc) -> Self {
        let mut model = Self {
            vc_name: vc.name().to_string(),
            arena: Vec::new(),
            local_theorems: Vec::new(),
            consequents: Vec::new(),
            steps: Vec::new(),
        };
        for exp in vc.antecedents() {
            let id = model.alloc(exp.clone(), ConjunctRole::LocalTheorem, "Given");
            model.local_theorems.push(id);
        }
        for exp in vc.consequents() {
            let id = model.alloc(exp.clone(), ConjunctRole::Consequent, "Goal");
            model.consequents.push(id);
        }
        model
    }

    fn alloc(&mut self, exp: Exp, role: ConjunctRole, origin: &str) -> ConjunctId {
        let id = ConjunctId(self.arena.len());
        self.arena.push(Some(Conjunct {
            exp,
            role,
            origin: origin.to_string(),
        }));
        id
    }

    fn list_mut(&mut self, role: ConjunctRole) -> &mut Vec<ConjunctId> {
        match role {
            ConjunctRole::LocalTheorem => &mut self.local_theorems,
            ConjunctRole::Consequent => &mut self.consequents,
        }
    }

    pub fn vc_name(&self) -> &str {
        &self.vc_name
    }

    pub fn conjunct(&self, id: ConjunctId) -> Option<&Conjunct> {
        self.arena.get(id.0).and_then(Option::as_ref)
    }

    pub fn exp(&self, id: ConjunctId) -> Option<&Exp> {
        self.conjunct(id).map(|c| &c.exp)
    }

    pub fn local_theorem_ids(&self) -> &[ConjunctId] {
        &self.local_theorems
    }

    pub fn consequent_ids(&self) -> &[ConjunctId] {
        &self.consequents
    }

    pub fn local_theorems(&self) -> impl Iterator<Item = (ConjunctId, &Exp)> {
        self.local_theorems
            .iter()
            .filter_map(move |&id| self.exp(id).map(|e| (id, e)))
    }

    pub fn consequents(&self) -> impl Iterator<Item = (ConjunctId, &Exp)> {
        self.consequents
            .iter()
            .filter_map(move |&id| self.exp(id).map(|e| (id, e)))
    }

    pub fn has_local_theorem(&self, exp: &Exp) -> bool {
        self.local_theorems().any(|(_, e)| e.equivalent(exp))
    }

    /// Number of arena slots, live or not
    pub fn arena_len(&self) -> usize {
        self.arena.len()
    }

    /// Number of applied steps not yet undone
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn proof_steps(&self) -> &[GeneralStep] {
        &self.steps
    }

    /// Key identifying the current goals and local theorems, used to avoid revisiting states
    pub fn state_key(&self) -> String {
        let mut givens: Vec<String> = self.local_theorems().map(|(_, e)| e.to_string()).collect();
        givens.sort();
        let goals: Vec<String> = self.consequents().map(|(_, e)| e.to_string()).collect();
        format!("{} |- {}", givens.join(", "), goals.join(", "))
    }

    pub(crate) fn insert_local_theorem(&mut self, exp: Exp, index: usize, origin: &str) -> ConjunctId {
        let id = self.alloc(exp, ConjunctRole::LocalTheorem, origin);
        let index = index.min(self.local_theorems.len());
        self.local_theorems.insert(index, id);
        id
    }

    /// Replace a conjunct's expression; returns the previous one
    pub(crate) fn alter(&mut self, id: ConjunctId, exp: Exp) -> Option<Exp> {
        let slot = self.arena.get_mut(id.0)?.as_mut()?;
        Some(std::mem::replace(&mut slot.exp, exp))
    }

    pub(crate) fn remove(&mut self, id: ConjunctId) -> Option<RemovedConjunct> {
        let role = self.conjunct(id)?.role;
        let list = self.list_mut(role);
        let index = list.iter().position(|&x| x == id)?;
        list.remove(index);
        let conjunct = self.arena.get_mut(id.0)?.take()?;
        Some(RemovedConjunct { id, index, conjunct })
    }

    pub(crate) fn push_step(&mut self, step: GeneralStep) {
        self.steps.push(step);
    }

    /// Revert the most recent step
    ///
    /// Added conjuncts are discarded first, then removed conjuncts go back to
    /// their positions (last removed first) and altered expressions are restored.
    pub fn undo_last_proof_step(&mut self) -> Option<GeneralStep> {
        let step = self.steps.pop()?;
        for id in step.added.iter().rev() {
            self.local_theorems.retain(|x| x != id);
            self.consequents.retain(|x| x != id);
            if id.0 + 1 == self.arena.len() {
                self.arena.pop();
            } else if let Some(slot) = self.arena.get_mut(id.0) {
                *slot = None;
            }
        }
        for removed in step.removed.iter().rev() {
            let role = removed.conjunct.role;
            if let Some(slot) = self.arena.get_mut(removed.id.0) {
                *slot = Some(removed.conjunct.clone());
            }
            let list = self.list_mut(role);
            let index = removed.index.min(list.len());
            list.insert(index, removed.id);
        }
        for (id, previous) in step.altered.iter().rev() {
            if let Some(Some(slot)) = self.arena.get_mut(id.0) {
                slot.exp = previous.clone();
            }
        }
        tracing::trace!("Undid {} in {}", step.description, self.vc_name);
        Some(step)
    }
}

impl fmt::Display for PerVcProverModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "VC {}", self.vc_name)?;
        writeln!(f, "Local theorems:")?;
        for (id, exp) in self.local_theorems() {
            writeln!(f, "  [{}] {}", id.0, exp)?;
        }
        writeln!(f, "Goals:")?;
        for (id, exp) in self.consequents() {
            writeln!(f, "  [{}] {}", id.0, exp)?;
        }
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "Step {}: {}", i + 1, step.description)?;
        }
        Ok(())
    }
}
