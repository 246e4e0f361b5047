//! Property-based tests for sequent reduction, theorem lookup, elaboration and undo
//!
//! These tests use proptest to generate random inputs and verify that:
//! 1. Reduction always terminates in sequents of atomic formulas
//! 2. Theorem lookup returns exactly the theorems whose operators the query covers
//! 3. Derived elaboration rules are deterministic and never assert a bare term
//! 4. Any sequence of proof steps can be undone back to the initial model

use proptest::prelude::*;
use std::collections::BTreeSet;
use vcgen::absyn::{Exp, Location, Operator};
use vcgen::prover::{
    derive_rules, is_deterministic, GeneralApplication, ImmutableVc, PerVcProverModel, Theorem,
    TheoremStore,
};
use vcgen::{ElaborationMode, Sequent, SequentReduction};

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Propositional formulas over a handful of atoms
fn formula() -> impl Strategy<Value = Exp> {
    let atom = prop_oneof![
        Just(Exp::var("p")),
        Just(Exp::var("q")),
        Just(Exp::var("r")),
        Just(Exp::infix(Exp::var("x"), "<", Exp::var("y"))),
        Just(Exp::equals(Exp::var("x"), Exp::int(0))),
    ];
    atom.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Exp::and(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Exp::or(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Exp::implies(a, b)),
            inner.prop_map(Exp::not),
        ]
    })
}

/// Terms over `f/1`, `g/2` and `+/2`
fn term() -> impl Strategy<Value = Exp> {
    let leaf = prop_oneof![
        Just(Exp::var("a")),
        Just(Exp::var("b")),
        (0i64..3).prop_map(Exp::int),
    ];
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| Exp::function("f", vec![t])),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Exp::function("g", vec![a, b])),
            (inner.clone(), inner).prop_map(|(a, b)| Exp::infix(a, "+", b)),
        ]
    })
}

/// Theorem assertions: bare terms (possibly operator-free) or equations
fn assertion() -> impl Strategy<Value = Exp> {
    prop_oneof![
        term(),
        (term(), term()).prop_map(|(l, r)| Exp::equals(l, r)),
        (term(), term()).prop_map(|(l, r)| Exp::infix(l, ">=", r)),
    ]
}

fn universe() -> Vec<Operator> {
    vec![
        Operator::new("f", 1),
        Operator::new("g", 2),
        Operator::new("+", 2),
        Operator::new("=", 2),
        Operator::new(">=", 2),
    ]
}

/// A subset of the operator universe chosen by bitmask
fn operator_query() -> impl Strategy<Value = BTreeSet<Operator>> {
    (0u8..32).prop_map(|mask| {
        universe()
            .into_iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, op)| op)
            .collect()
    })
}

/// Proof-step scripts: (kind, selector) pairs
fn step_script() -> impl Strategy<Value = Vec<(u8, usize)>> {
    prop::collection::vec((0u8..3, 0usize..8), 0..12)
}

// =============================================================================
// SEQUENT REDUCTION
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Reduction yields only atomic sequents, each reachable in the tree
    #[test]
    fn reduction_outputs_are_atomic(
        antecedents in prop::collection::vec(formula(), 0..3),
        consequents in prop::collection::vec(formula(), 0..3),
    ) {
        let original = Sequent::new(Location::default(), antecedents, consequents);
        let mut reduction = SequentReduction::new(original);
        let result = reduction.apply_reduction().unwrap();

        prop_assert!(!result.is_empty());
        let tree = reduction.reduction_tree();
        for reduced in reduction.results() {
            prop_assert!(reduced.sequent.consist_of_atomic_formulas());
            prop_assert!(tree.path_exists(tree.root(), reduced.node));
        }
    }

    /// Reducing an atomic sequent again changes nothing
    #[test]
    fn reduction_is_idempotent(formulas in prop::collection::vec(formula(), 1..3)) {
        let original = Sequent::new(Location::default(), vec![], formulas);
        let first = SequentReduction::new(original).apply_reduction().unwrap();
        for sequent in first {
            let again = SequentReduction::new(sequent.clone()).apply_reduction().unwrap();
            prop_assert_eq!(again, vec![sequent]);
        }
    }
}

// =============================================================================
// THEOREM STORE
// =============================================================================

proptest! {
    /// Lookup returns exactly the theorems whose operators are covered by the query
    #[test]
    fn theorem_lookup_subset_law(
        assertions in prop::collection::vec(assertion(), 0..10),
        query in operator_query(),
    ) {
        let mut store = TheoremStore::new();
        for (i, exp) in assertions.into_iter().enumerate() {
            store.add(Theorem::new(format!("T{}", i), exp, Location::default()));
        }

        let found: BTreeSet<&str> = store
            .find_relevant_theorems(&query)
            .into_iter()
            .map(|t| t.name())
            .collect();
        for theorem in store.theorems() {
            let covered = theorem.operators().is_subset(&query);
            prop_assert_eq!(found.contains(theorem.name()), covered, "theorem {}", theorem.name());
        }
        for theorem in store.zero_op_theorems() {
            prop_assert!(found.contains(theorem.name()));
        }
    }
}

// =============================================================================
// ELABORATION RULES
// =============================================================================

proptest! {
    /// Every derived rule is deterministic and derivation is repeatable
    #[test]
    fn elaboration_rules_are_deterministic(body in assertion()) {
        let theorem = Theorem::new("Thm", Exp::forall(vec!["a", "b"], body), Location::default());
        let literal = derive_rules(&theorem, ElaborationMode::Literal);
        let subexp = derive_rules(&theorem, ElaborationMode::Subexpression);

        prop_assert_eq!(&literal, &derive_rules(&theorem, ElaborationMode::Literal));
        prop_assert_eq!(literal.len(), subexp.len());
        for (lit, sub) in literal.iter().zip(&subexp) {
            prop_assert!(is_deterministic(lit.precursors(), lit.candidate()));
            prop_assert_eq!(lit.precursors(), sub.precursors());
            prop_assert!(lit.resultant().equivalent(theorem.body()));
            // Subexpression resultants stay formulas over the same symbols
            prop_assert!(sub.resultant().contains(sub.candidate()));
            prop_assert_eq!(sub.resultant().operators(), theorem.body().operators());
            if !sub.resultant().equivalent(theorem.body()) {
                let (lhs, _) = sub.resultant().infix_parts("=").unwrap();
                prop_assert!(lhs.equivalent(sub.candidate()));
            }
            prop_assert_eq!(lit.vars(), &["a".to_string(), "b".to_string()][..]);
        }
    }
}

// =============================================================================
// PROVER MODEL
// =============================================================================

proptest! {
    /// Applying any script of steps and undoing them all restores the model
    #[test]
    fn undo_restores_initial_model(
        givens in prop::collection::vec(formula(), 0..3),
        goals in prop::collection::vec(formula(), 1..3),
        script in step_script(),
    ) {
        let vc = ImmutableVc::from_parts("0_1", givens, goals);
        let mut model = PerVcProverModel::new(&vc);
        let initial = model.clone();

        for (step, (kind, selector)) in script.iter().enumerate() {
            let live: Vec<_> = model
                .local_theorem_ids()
                .iter()
                .chain(model.consequent_ids())
                .copied()
                .collect();
            let fresh = Exp::var(format!("u{}", step));
            let app = match (kind, live.is_empty()) {
                (0, false) => GeneralApplication::new("Update").update(live[selector % live.len()], fresh),
                (1, false) => GeneralApplication::new("Remove").remove(live[selector % live.len()]),
                _ => GeneralApplication::new("Add").add_local_theorem(fresh, *selector),
            };
            app.apply(&mut model).unwrap();
        }
        prop_assert_eq!(model.depth(), script.len());

        while model.undo_last_proof_step().is_some() {}
        prop_assert_eq!(model, initial);
    }
}
