//! # VC Generation Integration Tests
//!
//! Declaration rules, proof rules and VC naming, driven through [`VcGenerator`].

use std::collections::BTreeSet;
use vcgen::absyn::{
    ConceptSpec, Exp, FacilityDec, Location, ModuleDec, ModuleParameter, OperationEntry,
    ParameterDec, ParameterMode, ProcedureDec, Statement,
};
use vcgen::{Error, ModuleScope, VcGenOptions, VcGenerator};

fn loc(line: usize) -> Location {
    Location::new("Max_Realiz.rb", line, 5)
}

fn updates(name: &str) -> Vec<ParameterDec> {
    vec![ParameterDec::new(name, ParameterMode::Updates, "Integer")]
}

fn x() -> Exp {
    Exp::var("x")
}

/// Test that VC names count only blocks that produced VCs
#[test]
fn test_vc_naming_skips_empty_blocks() {
    let mut scope = ModuleScope::new("Counter_Realiz");
    scope
        .add_operation(
            OperationEntry::new("Inc", updates("x"), loc(1))
                .with_ensures(Exp::equals(x(), Exp::infix(Exp::old(x()), "+", Exp::int(1)))),
        )
        .add_operation(
            OperationEntry::new("Dec", updates("x"), loc(2))
                .with_ensures(Exp::equals(x(), Exp::infix(Exp::old(x()), "-", Exp::int(1)))),
        );

    let module = ModuleDec::new("Counter_Realiz")
        // no operation, no value-keeping parameters: nothing to confirm
        .with_procedure(ProcedureDec::new("Noop", vec![], loc(3)))
        .with_procedure(ProcedureDec::new("Inc", updates("x"), loc(4)).with_statements(vec![
            Statement::assign(x(), Exp::infix(x(), "+", Exp::int(1)), loc(5)),
        ]))
        .with_procedure(ProcedureDec::new("Dec", updates("x"), loc(6)).with_statements(vec![
            Statement::assign(x(), Exp::infix(x(), "-", Exp::int(1)), loc(7)),
        ]));

    let output = VcGenerator::new(&scope, VcGenOptions::default())
        .generate(&module)
        .unwrap();

    assert_eq!(output.module, "Counter_Realiz");
    assert_eq!(output.blocks.len(), 3);
    assert!(output.blocks[0].vcs().is_empty());
    let names: Vec<&str> = output.vcs().map(|vc| vc.name()).collect();
    assert_eq!(names, vec!["0_1", "1_1"]);
    assert_eq!(
        output.find_vc("0_1").unwrap().sequent().to_string(),
        "{} |- {(x + 1) = (x + 1)}"
    );
    assert_eq!(
        output.find_vc("1_1").unwrap().sequent().to_string(),
        "{} |- {(x - 1) = (x - 1)}"
    );
}

/// Test that an if statement splits the procedure into two blocks
#[test]
fn test_if_statement_branches() {
    let mut scope = ModuleScope::new("Max_Realiz");
    scope.add_operation(
        OperationEntry::new("Clamp", updates("x"), loc(1))
            .with_ensures(Exp::infix(x(), ">=", Exp::old(x()))),
    );
    let body = vec![Statement::If {
        condition: Exp::infix(x(), "<", Exp::int(0)),
        then_branch: vec![Statement::assign(x(), Exp::int(0), loc(9))],
        else_branch: vec![],
        location: loc(8),
    }];
    let module = ModuleDec::new("Max_Realiz")
        .with_procedure(ProcedureDec::new("Clamp", updates("x"), loc(7)).with_statements(body));

    let output = VcGenerator::new(&scope, VcGenOptions::default())
        .generate(&module)
        .unwrap();

    assert_eq!(output.blocks.len(), 2);
    assert!(output.blocks[0].branching_conditions()[0].starts_with("x < 0"));
    assert!(output.blocks[1].branching_conditions()[0].starts_with("not (x < 0)"));

    let then_vc = output.find_vc("0_1").unwrap();
    assert_eq!(then_vc.sequent().to_string(), "{x < 0} |- {0 >= x}");
    assert_eq!(
        then_vc.detail().map(|d| d.message.as_str()),
        Some("Ensures Clause of Clamp")
    );

    let else_vc = output.find_vc("1_1").unwrap();
    assert!(else_vc.sequent().consist_of_atomic_formulas());
    assert!(else_vc.sequent().has_consequent(&Exp::infix(x(), ">=", x())));
    assert!(else_vc.sequent().has_consequent(&Exp::infix(x(), "<", Exp::int(0))));
}

/// Test that a while loop yields base, inductive and termination VCs
#[test]
fn test_while_statement_obligations() {
    let scope = ModuleScope::new("Count_Realiz");
    let n = Exp::var("n");
    let body = vec![Statement::While {
        condition: Exp::infix(n.clone(), ">", Exp::int(0)),
        invariant: Exp::infix(Exp::int(0), "<=", n.clone()),
        decreasing: Some(n.clone()),
        changing: vec![n.clone()],
        body: vec![Statement::assign(n.clone(), Exp::infix(n.clone(), "-", Exp::int(1)), loc(12))],
        location: loc(11),
    }];
    let module = ModuleDec::new("Count_Realiz")
        .with_procedure(ProcedureDec::new("Count_Down", updates("n"), loc(10)).with_statements(body));

    let output = VcGenerator::new(&scope, VcGenOptions::default())
        .generate(&module)
        .unwrap();

    let messages: BTreeSet<&str> = output
        .vcs()
        .filter_map(|vc| vc.detail().map(|d| d.message.as_str()))
        .collect();
    assert!(messages.contains("Base Case of the Invariant of While Statement"));
    assert!(messages.contains("Inductive Case of Invariant of While Statement"));
    assert!(messages.contains("Termination of While Statement"));

    let names: Vec<&str> = output.vcs().map(|vc| vc.name()).collect();
    assert_eq!(names, vec!["0_1", "0_2", "0_3", "1_1"]);
    assert_eq!(
        output.find_vc("0_1").unwrap().detail().unwrap().message,
        "Base Case of the Invariant of While Statement"
    );
    assert!(output.vcs().all(|vc| vc.sequent().consist_of_atomic_formulas()));
}

/// Test that operation calls substitute the callee's contract
#[test]
fn test_call_substitutes_contract() {
    let mut scope = ModuleScope::new("Twice_Realiz");
    scope
        .add_operation(
            OperationEntry::new("Inc", updates("x"), loc(1))
                .with_ensures(Exp::equals(x(), Exp::infix(Exp::old(x()), "+", Exp::int(1)))),
        )
        .add_operation(
            OperationEntry::new("Twice", updates("y"), loc(2)).with_ensures(Exp::equals(
                Exp::var("y"),
                Exp::infix(Exp::old(Exp::var("y")), "+", Exp::int(2)),
            )),
        );
    let call = Statement::Call {
        operation: "Inc".to_string(),
        args: vec![Exp::var("y")],
        location: loc(4),
    };
    let module = ModuleDec::new("Twice_Realiz").with_procedure(
        ProcedureDec::new("Twice", updates("y"), loc(3)).with_statements(vec![call.clone(), call]),
    );

    let output = VcGenerator::new(&scope, VcGenOptions::default())
        .generate(&module)
        .unwrap();

    assert_eq!(output.vc_count(), 1);
    assert_eq!(
        output.find_vc("0_1").unwrap().sequent().to_string(),
        "{} |- {((y + 1) + 1) = (y + 2)}"
    );
}

/// Test that a call passing an expression to an updates parameter is rejected
#[test]
fn test_call_with_expression_argument_fails() {
    let mut scope = ModuleScope::new("Bad_Realiz");
    scope.add_operation(OperationEntry::new("Inc", updates("x"), loc(1)));
    let module = ModuleDec::new("Bad_Realiz").with_procedure(
        ProcedureDec::new("Main", updates("y"), loc(2)).with_statements(vec![Statement::Call {
            operation: "Inc".to_string(),
            args: vec![Exp::infix(Exp::var("y"), "+", Exp::int(1))],
            location: loc(3),
        }]),
    );

    let err = VcGenerator::new(&scope, VcGenOptions::default())
        .generate(&module)
        .unwrap_err();
    assert!(matches!(err, Error::SourceError { .. }), "got {:?}", err);
}

/// Test that a statement without a proof rule is reported
#[test]
fn test_memory_statement_unhandled() {
    let scope = ModuleScope::new("Mem_Realiz");
    let module = ModuleDec::new("Mem_Realiz").with_procedure(
        ProcedureDec::new("Save", vec![], loc(1))
            .with_statements(vec![Statement::Memory { location: loc(2) }]),
    );

    let err = VcGenerator::new(&scope, VcGenOptions::default())
        .generate(&module)
        .unwrap_err();
    match err {
        Error::UnhandledStatement { kind, location } => {
            assert_eq!(kind, "MemoryStmt");
            assert_eq!(location, loc(2));
        }
        other => panic!("expected unhandled statement, got {:?}", other),
    }
}

fn stack_concept() -> ConceptSpec {
    ConceptSpec::new(
        "Stack_Template",
        vec![ModuleParameter::new("Max_Depth")],
        Location::new("Stack_Template.co", 1, 1),
    )
    .with_requires(Exp::infix(Exp::var("Max_Depth"), ">", Exp::int(0)))
}

/// Test that a facility declaration confirms the concept's requires clause
#[test]
fn test_facility_requires_vc() -> anyhow::Result<()> {
    let mut scope = ModuleScope::new("Client");
    scope.add_concept(stack_concept());
    let facility = FacilityDec::new("SF", "Stack_Template", vec![Exp::int(10)], loc(1));
    let module = ModuleDec::new("Client").with_facility(facility);

    let output = VcGenerator::new(&scope, VcGenOptions::default()).generate(&module)?;

    assert_eq!(output.blocks[0].name(), "Facility_Dec_SF");
    let vc = output
        .find_vc("0_1")
        .ok_or_else(|| anyhow::anyhow!("facility VC missing"))?;
    assert_eq!(vc.sequent().to_string(), "{} |- {10 > 0}");
    assert_eq!(
        vc.detail().map(|d| d.message.as_str()),
        Some("Requires Clause for Stack_Template in Facility Instantiation Rule")
    );
    Ok(())
}

/// Test that a facility with the wrong number of arguments is rejected
#[test]
fn test_facility_arity_mismatch() {
    let mut scope = ModuleScope::new("Client");
    scope.add_concept(stack_concept());
    let facility = FacilityDec::new("SF", "Stack_Template", vec![Exp::int(10), Exp::int(4)], loc(1));
    let module = ModuleDec::new("Client").with_facility(facility);

    let err = VcGenerator::new(&scope, VcGenOptions::default())
        .generate(&module)
        .unwrap_err();
    match err {
        Error::FacilityArity {
            facility,
            expected,
            found,
            ..
        } => {
            assert_eq!(facility, "SF");
            assert_eq!(expected, 1);
            assert_eq!(found, 2);
        }
        other => panic!("expected arity error, got {:?}", other),
    }
}

/// Test that a procedure must agree with its operation's parameters
#[test]
fn test_operation_mismatch() {
    let mut scope = ModuleScope::new("Inc_Realiz");
    scope.add_operation(OperationEntry::new("Inc", updates("x"), loc(1)));
    let module = ModuleDec::new("Inc_Realiz")
        .with_procedure(ProcedureDec::new("Inc", updates("y"), loc(2)));

    let err = VcGenerator::new(&scope, VcGenOptions::default())
        .generate(&module)
        .unwrap_err();
    assert!(
        matches!(&err, Error::OperationMismatch { procedure, .. } if procedure == "Inc"),
        "got {:?}",
        err
    );
}

/// Test that a preserves parameter is confirmed unchanged
#[test]
fn test_preserves_parameter_confirmed() {
    let scope = ModuleScope::new("Peek_Realiz");
    let params = vec![ParameterDec::new("s", ParameterMode::Preserves, "Integer")];
    let module = ModuleDec::new("Peek_Realiz").with_procedure(
        ProcedureDec::new("Peek", params, loc(1))
            .with_statements(vec![Statement::assign(Exp::var("s"), Exp::int(3), loc(2))]),
    );

    let output = VcGenerator::new(&scope, VcGenOptions::default())
        .generate(&module)
        .unwrap();

    let vc = output.find_vc("0_1").unwrap();
    assert_eq!(vc.sequent().to_string(), "{} |- {3 = s}");
    assert!(vc.detail().unwrap().message.contains("parameter mode"));
}

/// Test that disabling reduction keeps the VC as generated
#[test]
fn test_without_reduction() {
    let scope = ModuleScope::new("Swap_Realiz");
    let goal = Exp::and(Exp::var("p"), Exp::var("q"));
    let module = ModuleDec::new("Swap_Realiz").with_procedure(
        ProcedureDec::new("Check", vec![], loc(1))
            .with_statements(vec![Statement::confirm(goal, loc(2))]),
    );
    let options = VcGenOptions {
        reduce_sequents: false,
        ..Default::default()
    };

    let output = VcGenerator::new(&scope, options).generate(&module).unwrap();
    assert_eq!(output.vc_count(), 1);
    assert!(!output.find_vc("0_1").unwrap().sequent().consist_of_atomic_formulas());

    let reduced = VcGenerator::new(&scope, VcGenOptions::default())
        .generate(&module)
        .unwrap();
    assert_eq!(reduced.vc_count(), 2);
}

/// Test that an assignment does not capture a variable under a quantified goal
#[test]
fn test_assignment_renames_quantified_goal() {
    let scope = ModuleScope::new("Shift_Realiz");
    let p = |a: &str, b: &str| Exp::function("P", vec![Exp::var(a), Exp::var(b)]);
    // x := n; Confirm For all n, P(x, n)
    let module = ModuleDec::new("Shift_Realiz").with_procedure(
        ProcedureDec::new("Shift", vec![], loc(1)).with_statements(vec![
            Statement::assign(x(), Exp::var("n"), loc(2)),
            Statement::confirm(Exp::forall(vec!["n"], p("x", "n")), loc(3)),
        ]),
    );
    let options = VcGenOptions {
        reduce_sequents: false,
        ..Default::default()
    };

    let output = VcGenerator::new(&scope, options).generate(&module).unwrap();
    let goal = &output.find_vc("0_1").unwrap().sequent().consequents()[0];
    assert!(goal.equivalent(&Exp::forall(vec!["n_1"], p("n", "n_1"))), "got {}", goal);
    assert!(!goal.equivalent(&Exp::forall(vec!["n"], p("n", "n"))));
}
