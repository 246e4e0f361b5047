use crate::absyn::{Exp, ExpKind};

/// Decides whether a formula still needs a reduction rule
///
/// A formula is atomic when its top-level node is neither a logical connective
/// (`and`, `or`, `implies`, `not`) nor a quantifier. Connectives nested inside
/// function arguments, equalities or lambdas are terms, not formulas, and are
/// left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicFormulaChecker;

impl AtomicFormulaChecker {
    pub fn is_atomic(&self, exp: &Exp) -> bool {
        match &exp.kind {
            ExpKind::Quantified { .. } => false,
            ExpKind::Infix { .. } | ExpKind::Prefix { .. } => !exp.is_logical(),
            _ => true,
        }
    }

    /// Index of the first non-atomic formula in a list
    pub fn first_non_atomic(&self, exps: &[Exp]) -> Option<usize> {
        exps.iter().position(|e| !self.is_atomic(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectives_are_not_atomic() {
        let checker = AtomicFormulaChecker;
        assert!(!checker.is_atomic(&Exp::and(Exp::var("a"), Exp::var("b"))));
        assert!(!checker.is_atomic(&Exp::not(Exp::var("a"))));
        assert!(!checker.is_atomic(&Exp::forall(vec!["x"], Exp::var("x"))));
    }

    #[test]
    fn test_nested_connectives_stay_atomic() {
        let checker = AtomicFormulaChecker;
        let inside_equality = Exp::equals(Exp::var("p"), Exp::or(Exp::var("a"), Exp::var("b")));
        let inside_function = Exp::function("f", vec![Exp::not(Exp::var("a"))]);
        assert!(checker.is_atomic(&inside_equality));
        assert!(checker.is_atomic(&inside_function));
        assert!(checker.is_atomic(&Exp::true_exp()));
        assert!(checker.is_atomic(&Exp::prefix("-", Exp::var("x"))));
    }

    #[test]
    fn test_first_non_atomic() {
        let checker = AtomicFormulaChecker;
        let exps = vec![
            Exp::var("p"),
            Exp::implies(Exp::var("a"), Exp::var("b")),
            Exp::or(Exp::var("c"), Exp::var("d")),
        ];
        assert_eq!(checker.first_non_atomic(&exps), Some(1));
        assert_eq!(checker.first_non_atomic(&exps[..1]), None);
    }
}
