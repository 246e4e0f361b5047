use super::model::{ConjunctId, GeneralStep, PerVcProverModel, Site};
use crate::absyn::Exp;
use crate::error::{Error, Result};
use std::fmt;

/// Candidate proof step produced by a transformation
///
/// Updates run first (`Some(exp)` replaces a conjunct's expression, `None`
/// removes it), then new local theorems are inserted at their indices. Applying
/// pushes a [`GeneralStep`] so the change can be undone.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralApplication {
    conjuncts_to_update: Vec<(ConjunctId, Option<Exp>)>,
    local_theorems_to_add: Vec<Exp>,
    indices: Vec<usize>,
    involved_sites: Vec<Site>,
    transformation: String,
    theorem: Option<String>,
}

impl GeneralApplication {
    pub fn new(transformation: impl Into<String>) -> Self {
        Self {
            conjuncts_to_update: Vec::new(),
            local_theorems_to_add: Vec::new(),
            indices: Vec::new(),
            involved_sites: Vec::new(),
            transformation: transformation.into(),
            theorem: None,
        }
    }

    /// Full constructor; `local_theorems_to_add` and `indices` must have the same length
    pub fn with_parts(
        transformation: impl Into<String>,
        conjuncts_to_update: Vec<(ConjunctId, Option<Exp>)>,
        local_theorems_to_add: Vec<Exp>,
        indices: Vec<usize>,
        involved_sites: Vec<Site>,
    ) -> Result<Self> {
        if local_theorems_to_add.len() != indices.len() {
            return Err(Error::invalid_argument(format!(
                "{} local theorem(s) to add but {} insertion index(es)",
                local_theorems_to_add.len(),
                indices.len()
            )));
        }
        Ok(Self {
            conjuncts_to_update,
            local_theorems_to_add,
            indices,
            involved_sites,
            transformation: transformation.into(),
            theorem: None,
        })
    }

    pub fn update(mut self, id: ConjunctId, exp: Exp) -> Self {
        self.conjuncts_to_update.push((id, Some(exp)));
        self
    }

    pub fn remove(mut self, id: ConjunctId) -> Self {
        self.conjuncts_to_update.push((id, None));
        self
    }

    pub fn add_local_theorem(mut self, exp: Exp, index: usize) -> Self {
        self.local_theorems_to_add.push(exp);
        self.indices.push(index);
        self
    }

    pub fn with_site(mut self, site: Site) -> Self {
        self.involved_sites.push(site);
        self
    }

    pub fn with_theorem(mut self, theorem: impl Into<String>) -> Self {
        self.theorem = Some(theorem.into());
        self
    }

    pub fn transformation(&self) -> &str {
        &self.transformation
    }

    pub fn theorem(&self) -> Option<&str> {
        self.theorem.as_deref()
    }

    pub fn involved_sites(&self) -> &[Site] {
        &self.involved_sites
    }

    pub fn local_theorems_to_add(&self) -> &[Exp] {
        &self.local_theorems_to_add
    }

    pub fn conjuncts_to_update(&self) -> &[(ConjunctId, Option<Exp>)] {
        &self.conjuncts_to_update
    }

    /// Apply to `model` and record the step
    pub fn apply(&self, model: &mut PerVcProverModel) -> Result<()> {
        for (id, _) in &self.conjuncts_to_update {
            if model.conjunct(*id).is_none() {
                return Err(Error::invalid_argument(format!(
                    "{} refers to missing conjunct {}",
                    self.transformation, id.0
                )));
            }
        }

        let mut step = GeneralStep {
            description: self.to_string(),
            theorem: self.theorem.clone(),
            sites: self.involved_sites.clone(),
            altered: Vec::new(),
            removed: Vec::new(),
            added: Vec::new(),
        };
        for (id, update) in &self.conjuncts_to_update {
            match update {
                Some(exp) => {
                    if let Some(previous) = model.alter(*id, exp.clone()) {
                        step.altered.push((*id, previous));
                    }
                }
                None => {
                    if let Some(removed) = model.remove(*id) {
                        step.removed.push(removed);
                    }
                }
            }
        }
        for (exp, &index) in self.local_theorems_to_add.iter().zip(&self.indices) {
            let id = model.insert_local_theorem(exp.clone(), index, &self.transformation);
            step.added.push(id);
        }
        model.push_step(step);
        Ok(())
    }
}

impl fmt::Display for GeneralApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.transformation)?;
        if let Some(theorem) = &self.theorem {
            write!(f, " using {}", theorem)?;
        }
        for exp in &self.local_theorems_to_add {
            write!(f, "; adds {}", exp)?;
        }
        for (id, update) in &self.conjuncts_to_update {
            match update {
                Some(exp) => write!(f, "; [{}] becomes {}", id.0, exp)?,
                None => write!(f, "; removes [{}]", id.0)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prover::vc::ImmutableVc;

    fn model() -> PerVcProverModel {
        let vc = ImmutableVc::from_parts(
            "0_1",
            vec![Exp::var("p"), Exp::var("q")],
            vec![Exp::var("r")],
        );
        PerVcProverModel::new(&vc)
    }

    #[test]
    fn test_mismatched_indices_rejected() {
        let result = GeneralApplication::with_parts("Test", vec![], vec![Exp::var("a")], vec![], vec![]);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_apply_then_undo() {
        let mut model = model();
        let before = model.clone();
        let app = GeneralApplication::new("Test")
            .remove(ConjunctId(0))
            .update(ConjunctId(2), Exp::true_exp())
            .add_local_theorem(Exp::var("s"), 0);
        app.apply(&mut model).unwrap();
        assert_eq!(model.state_key(), "q, s |- true");
        assert_eq!(model.depth(), 1);

        model.undo_last_proof_step().unwrap();
        assert_eq!(model, before);
    }

    #[test]
    fn test_missing_conjunct_is_error() {
        let mut model = model();
        let app = GeneralApplication::new("Test").remove(ConjunctId(9));
        assert!(app.apply(&mut model).is_err());
        assert_eq!(model.depth(), 0);
    }
}
