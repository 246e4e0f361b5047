use super::atomic::AtomicFormulaChecker;
use super::rules::{rule_for, Side};
use super::Sequent;
use crate::error::Result;
use std::collections::VecDeque;

/// Parent/child record of every sequent produced during a reduction
#[derive(Debug, Clone, Default)]
pub struct ReductionTree {
    nodes: Vec<Sequent>,
    children: Vec<Vec<usize>>,
}

impl ReductionTree {
    fn add_node(&mut self, sequent: Sequent) -> usize {
        self.nodes.push(sequent);
        self.children.push(Vec::new());
        self.nodes.len() - 1
    }

    fn add_edge(&mut self, parent: usize, child: usize) {
        self.children[parent].push(child);
    }

    /// Index of the original sequent
    pub fn root(&self) -> usize {
        0
    }

    pub fn node(&self, index: usize) -> Option<&Sequent> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, index: usize) -> &[usize] {
        self.children.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `to` is reachable from `from` along parent→child edges
    pub fn path_exists(&self, from: usize, to: usize) -> bool {
        if from >= self.nodes.len() || to >= self.nodes.len() {
            return false;
        }
        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            if std::mem::replace(&mut visited[current], true) {
                continue;
            }
            queue.extend(self.children[current].iter().copied());
        }
        false
    }
}

/// Atomic sequent produced by a reduction
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedSequent {
    pub sequent: Sequent,
    /// Node of this sequent in the reduction tree
    pub node: usize,
    /// Whether any rule on the path from the original was impacting
    pub impacting: bool,
}

/// Reduces one sequent to a list of atomic sequents
///
/// Antecedents are searched before consequents, leftmost first. Children of a
/// rule are expanded depth first in rule order, so the output order is fixed
/// for a given input.
#[derive(Debug, Clone)]
pub struct SequentReduction {
    tree: ReductionTree,
    results: Vec<ReducedSequent>,
    checker: AtomicFormulaChecker,
}

impl SequentReduction {
    pub fn new(original: Sequent) -> Self {
        let mut tree = ReductionTree::default();
        tree.add_node(original);
        Self {
            tree,
            results: Vec::new(),
            checker: AtomicFormulaChecker,
        }
    }

    /// Run the reduction and return the atomic sequents
    pub fn apply_reduction(&mut self) -> Result<Vec<Sequent>> {
        self.results.clear();
        let mut worklist = vec![(self.tree.root(), false)];

        while let Some((node, impacting)) = worklist.pop() {
            let sequent = self.tree.nodes[node].clone();
            let target = match self.checker.first_non_atomic(sequent.antecedents()) {
                Some(i) => Some((Side::Antecedent, i)),
                None => self
                    .checker
                    .first_non_atomic(sequent.consequents())
                    .map(|i| (Side::Consequent, i)),
            };

            let Some((side, index)) = target else {
                self.results.push(ReducedSequent {
                    sequent,
                    node,
                    impacting,
                });
                continue;
            };

            let exp = match side {
                Side::Antecedent => &sequent.antecedents()[index],
                Side::Consequent => &sequent.consequents()[index],
            };
            let rule = rule_for(&sequent, side, exp)?;
            let outcome = rule.apply()?;
            tracing::trace!(
                "{} on {} produced {} sequent(s)",
                rule.description(),
                sequent,
                outcome.sequents.len()
            );

            let mut created = Vec::with_capacity(outcome.sequents.len());
            for child in outcome.sequents {
                let id = self.tree.add_node(child);
                self.tree.add_edge(node, id);
                created.push(id);
            }
            for id in created.into_iter().rev() {
                worklist.push((id, impacting || outcome.impacting));
            }
        }

        Ok(self.results.iter().map(|r| r.sequent.clone()).collect())
    }

    /// Results of the last reduction with their tree nodes and impacting flags
    pub fn results(&self) -> &[ReducedSequent] {
        &self.results
    }

    pub fn original(&self) -> &Sequent {
        &self.tree.nodes[0]
    }

    pub fn reduction_tree(&self) -> &ReductionTree {
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absyn::{Exp, Location};

    #[test]
    fn test_empty_sequent_is_identity() {
        let original = Sequent::empty(Location::default());
        let mut reduction = SequentReduction::new(original.clone());
        let result = reduction.apply_reduction().unwrap();
        assert_eq!(result, vec![original]);
        assert_eq!(reduction.reduction_tree().len(), 1);
    }

    #[test]
    fn test_nested_reduction_order() {
        // (a or b) ⊢ (c and d)
        let original = Sequent::new(
            Location::default(),
            vec![Exp::or(Exp::var("a"), Exp::var("b"))],
            vec![Exp::and(Exp::var("c"), Exp::var("d"))],
        );
        let mut reduction = SequentReduction::new(original);
        let result = reduction.apply_reduction().unwrap();
        let rendered: Vec<String> = result.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["{a} |- {c}", "{a} |- {d}", "{b} |- {c}", "{b} |- {d}"]
        );

        let tree = reduction.reduction_tree();
        for reduced in reduction.results() {
            assert!(tree.path_exists(tree.root(), reduced.node));
            assert!(reduced.impacting);
        }
    }

    #[test]
    fn test_restatements_are_not_impacting() {
        let original = Sequent::new(
            Location::default(),
            vec![Exp::and(Exp::var("a"), Exp::var("b"))],
            vec![Exp::implies(Exp::var("c"), Exp::var("d"))],
        );
        let mut reduction = SequentReduction::new(original);
        let result = reduction.apply_reduction().unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].to_string(), "{a, b, c} |- {d}");
        assert!(!reduction.results()[0].impacting);
    }
}
