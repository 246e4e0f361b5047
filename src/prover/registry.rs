//! Congruence closure over the ground facts of a VC
//!
//! Every term gets a node; nodes are merged into classes by asserted
//! equalities and by congruence (same head, pairwise-equal arguments). Boolean
//! facts are merged into the `true` class, refuted ones into `false`.

use crate::absyn::{Exp, ExpKind, Literal};
use std::collections::HashMap;

/// Operators whose arguments being equal makes the application true
const REFLEXIVE_OPERATORS: &[&str] = &["=", "<=", ">="];

type Signature = (String, Vec<usize>);

#[derive(Debug, Clone, Default)]
pub struct CongruenceRegistry {
    heads: Vec<String>,
    args: Vec<Vec<usize>>,
    terms: HashMap<Signature, usize>,
    parent: Vec<usize>,
    uses: Vec<Vec<usize>>,
    signatures: HashMap<Signature, usize>,
    disequalities: Vec<(usize, usize)>,
    true_node: usize,
    false_node: usize,
}

impl CongruenceRegistry {
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.true_node = registry.add_term(&Exp::true_exp());
        registry.false_node = registry.add_term(&Exp::false_exp());
        registry
    }

    /// Registry holding `facts` as hypotheses
    pub fn from_facts<'a>(facts: impl IntoIterator<Item = &'a Exp>) -> Self {
        let mut registry = Self::new();
        for fact in facts {
            registry.assert_fact(fact);
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.heads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    fn head(exp: &Exp) -> Option<String> {
        match &exp.kind {
            ExpKind::Infix { op, .. } => Some(format!("infix {}", op)),
            ExpKind::Prefix { op, .. } => Some(format!("prefix {}", op)),
            ExpKind::Function {
                qualifier, name, ..
            } => Some(match qualifier {
                Some(q) => format!("fn {}::{}", q, name),
                None => format!("fn {}", name),
            }),
            ExpKind::Tuple(_) => Some("tuple".to_string()),
            _ => None,
        }
    }

    /// Node for `exp`, creating it (and its sub-terms) if needed
    pub fn add_term(&mut self, exp: &Exp) -> usize {
        let (head, args) = match Self::head(exp) {
            Some(head) => {
                let args: Vec<usize> = exp
                    .sub_expressions()
                    .into_iter()
                    .map(|c| self.add_term(c))
                    .collect();
                (head, args)
            }
            // Leaves and binders are opaque; their rendering is their identity
            None => (format!("leaf {}", exp), Vec::new()),
        };
        let key = (head.clone(), args.clone());
        if let Some(&node) = self.terms.get(&key) {
            return node;
        }

        let node = self.heads.len();
        self.heads.push(head.clone());
        self.args.push(args.clone());
        self.parent.push(node);
        self.uses.push(Vec::new());
        self.terms.insert(key, node);

        for &arg in &args {
            let root = self.find(arg);
            self.uses[root].push(node);
        }
        let signature = self.signature(node);
        match self.signatures.get(&signature).copied() {
            Some(other) => self.merge(node, other),
            None => {
                self.signatures.insert(signature, node);
            }
        }
        node
    }

    pub fn find(&self, mut node: usize) -> usize {
        while self.parent[node] != node {
            node = self.parent[node];
        }
        node
    }

    fn signature(&self, node: usize) -> Signature {
        let roots = self.args[node].iter().map(|&a| self.find(a)).collect();
        (self.heads[node].clone(), roots)
    }

    /// Merge two classes and propagate congruences
    pub fn merge(&mut self, a: usize, b: usize) {
        let mut pending = vec![(a, b)];
        while let Some((x, y)) = pending.pop() {
            let (mut rx, mut ry) = (self.find(x), self.find(y));
            if rx == ry {
                continue;
            }
            if self.uses[rx].len() > self.uses[ry].len() {
                std::mem::swap(&mut rx, &mut ry);
            }
            self.parent[rx] = ry;
            let moved = std::mem::take(&mut self.uses[rx]);
            for user in moved {
                let signature = self.signature(user);
                match self.signatures.get(&signature).copied() {
                    Some(other) if self.find(other) != self.find(user) => pending.push((user, other)),
                    Some(_) => {}
                    None => {
                        self.signatures.insert(signature, user);
                    }
                }
                self.uses[ry].push(user);
            }
        }
    }

    pub fn are_equal(&self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Add a hypothesis
    pub fn assert_fact(&mut self, fact: &Exp) {
        if let Some((left, right)) = fact.infix_parts("and") {
            self.assert_fact(left);
            self.assert_fact(right);
            return;
        }
        if let Some(inner) = fact.prefix_arg("not") {
            let node = self.add_term(inner);
            self.merge(node, self.false_node);
            return;
        }
        if let Some((left, right)) = fact.infix_parts("=") {
            let (l, r) = (self.add_term(left), self.add_term(right));
            self.merge(l, r);
        }
        if let Some((left, right)) = fact.infix_parts("/=") {
            let (l, r) = (self.add_term(left), self.add_term(right));
            self.disequalities.push((l, r));
        }
        let node = self.add_term(fact);
        self.merge(node, self.true_node);
    }

    /// Whether the hypotheses contradict each other
    pub fn is_contradictory(&self) -> bool {
        self.are_equal(self.true_node, self.false_node)
            || self
                .disequalities
                .iter()
                .any(|&(l, r)| self.are_equal(l, r))
    }

    /// Whether the hypotheses establish `goal`
    pub fn holds(&mut self, goal: &Exp) -> bool {
        if let ExpKind::Literal(Literal::Bool(b)) = goal.kind {
            return b;
        }
        if let Some((left, right)) = goal.infix_parts("and") {
            return self.holds(left) && self.holds(right);
        }
        if let Some(inner) = goal.prefix_arg("not") {
            let node = self.add_term(inner);
            return self.are_equal(node, self.false_node);
        }
        let node = self.add_term(goal);
        if self.are_equal(node, self.true_node) {
            return true;
        }
        for op in REFLEXIVE_OPERATORS {
            if let Some((left, right)) = goal.infix_parts(op) {
                let (l, r) = (self.add_term(left), self.add_term(right));
                if self.are_equal(l, r) {
                    return true;
                }
            }
        }
        if let Some((left, right)) = goal.infix_parts("/=") {
            let (l, r) = (self.add_term(left), self.add_term(right));
            return self.disequalities.iter().any(|&(a, b)| {
                (self.are_equal(a, l) && self.are_equal(b, r))
                    || (self.are_equal(a, r) && self.are_equal(b, l))
            });
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(arg: Exp) -> Exp {
        Exp::function("f", vec![arg])
    }

    #[test]
    fn test_congruence_propagates() {
        let mut registry = CongruenceRegistry::from_facts(&[Exp::equals(Exp::var("a"), Exp::var("b"))]);
        assert!(registry.holds(&Exp::equals(f(Exp::var("a")), f(Exp::var("b")))));
        assert!(!registry.holds(&Exp::equals(f(Exp::var("a")), f(Exp::var("c")))));
    }

    #[test]
    fn test_transitive_equality() {
        let facts = [
            Exp::equals(Exp::var("a"), Exp::var("b")),
            Exp::equals(Exp::var("b"), Exp::var("c")),
        ];
        let mut registry = CongruenceRegistry::from_facts(&facts);
        assert!(registry.holds(&Exp::equals(Exp::var("c"), Exp::var("a"))));
    }

    #[test]
    fn test_reflexive_operators() {
        let mut registry = CongruenceRegistry::new();
        assert!(registry.holds(&Exp::infix(Exp::var("x"), "<=", Exp::var("x"))));
        assert!(!registry.holds(&Exp::infix(Exp::var("x"), "<", Exp::var("x"))));
    }

    #[test]
    fn test_fact_and_contradiction() {
        let lt = Exp::infix(Exp::var("x"), "<", Exp::var("y"));
        let mut registry = CongruenceRegistry::from_facts(&[lt.clone()]);
        assert!(registry.holds(&lt));
        assert!(!registry.is_contradictory());

        let facts = [
            Exp::infix(Exp::var("x"), "/=", Exp::var("y")),
            Exp::equals(Exp::var("x"), Exp::var("y")),
        ];
        assert!(CongruenceRegistry::from_facts(&facts).is_contradictory());
        assert!(CongruenceRegistry::from_facts(&[Exp::false_exp()]).is_contradictory());
    }
}
