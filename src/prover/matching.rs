//! First-order matching of theorem patterns against VC terms

use crate::absyn::{Exp, ExpKind};
use std::collections::BTreeMap;

/// Pattern variable assignments
pub type Bindings = BTreeMap<String, Exp>;

/// Extend `bindings` so that `pattern` instantiated with them is equivalent to `term`
///
/// Only unqualified variables named in `vars` are pattern variables; every other
/// leaf must match literally. On failure `bindings` may hold partial entries,
/// so callers match against a copy.
pub fn match_pattern(pattern: &Exp, term: &Exp, vars: &[String], bindings: &mut Bindings) -> bool {
    if let ExpKind::Var {
        qualifier: None,
        name,
    } = &pattern.kind
    {
        if vars.iter().any(|v| v == name) {
            return match bindings.get(name) {
                Some(bound) => bound.equivalent(term),
                None => {
                    bindings.insert(name.clone(), term.clone());
                    true
                }
            };
        }
    }

    let same_head = match (&pattern.kind, &term.kind) {
        (ExpKind::Infix { op: a, .. }, ExpKind::Infix { op: b, .. }) => a == b,
        (ExpKind::Prefix { op: a, .. }, ExpKind::Prefix { op: b, .. }) => a == b,
        (
            ExpKind::Function {
                qualifier: q1,
                name: n1,
                args: a1,
            },
            ExpKind::Function {
                qualifier: q2,
                name: n2,
                args: a2,
            },
        ) => q1 == q2 && n1 == n2 && a1.len() == a2.len(),
        (ExpKind::Tuple(a), ExpKind::Tuple(b)) => a.len() == b.len(),
        // Binders, leaves and primed/old values only match literally
        _ => return pattern.equivalent(term),
    };
    if !same_head {
        return false;
    }
    pattern
        .sub_expressions()
        .into_iter()
        .zip(term.sub_expressions())
        .all(|(p, t)| match_pattern(p, t, vars, bindings))
}

/// Match every pattern against some term of `pool`, sharing one set of bindings
///
/// Returns every consistent assignment, at most `limit` of them.
pub fn match_all(patterns: &[Exp], pool: &[&Exp], vars: &[String], limit: usize) -> Vec<Bindings> {
    let mut out = Vec::new();
    match_rest(patterns, pool, vars, Bindings::new(), limit, &mut out);
    out
}

fn match_rest(
    patterns: &[Exp],
    pool: &[&Exp],
    vars: &[String],
    bindings: Bindings,
    limit: usize,
    out: &mut Vec<Bindings>,
) {
    if out.len() >= limit {
        return;
    }
    let Some((first, rest)) = patterns.split_first() else {
        if !out.contains(&bindings) {
            out.push(bindings);
        }
        return;
    };
    for term in pool {
        let mut attempt = bindings.clone();
        if match_pattern(first, term, vars, &mut attempt) {
            match_rest(rest, pool, vars, attempt, limit, out);
        }
    }
}

/// Substitute bound pattern variables; `None` when some variable of `vars` in
/// `exp` is still unbound
pub fn instantiate(exp: &Exp, vars: &[String], bindings: &Bindings) -> Option<Exp> {
    let unbound = exp
        .free_variables()
        .into_iter()
        .any(|name| vars.contains(&name) && !bindings.contains_key(&name));
    if unbound {
        return None;
    }
    let subs: Vec<(Exp, Exp)> = bindings
        .iter()
        .map(|(name, value)| (Exp::var(name.clone()), value.clone()))
        .collect();
    Some(exp.substitute(&subs))
}

/// Every sub-term of `exps`, roots included, in pre-order
pub fn all_terms<'a>(exps: impl IntoIterator<Item = &'a Exp>) -> Vec<&'a Exp> {
    let mut out = Vec::new();
    for exp in exps {
        collect_terms(exp, &mut out);
    }
    out
}

fn collect_terms<'a>(exp: &'a Exp, out: &mut Vec<&'a Exp>) {
    if !out.iter().any(|seen| seen.equivalent(exp)) {
        out.push(exp);
    }
    for child in exp.sub_expressions() {
        collect_terms(child, out);
    }
}
