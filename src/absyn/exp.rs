use super::location::{Location, LocationDetailModel};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

lazy_static! {
    static ref LOGICAL_CONNECTIVES: HashSet<&'static str> =
        ["and", "or", "implies", "not"].into_iter().collect();
    static ref WORD_OPERATORS: HashSet<&'static str> =
        ["and", "or", "implies", "iff", "not", "is_in", "is_not_in", "union", "intersection"]
            .into_iter()
            .collect();
}

/// Mathematical type attached to an expression by the type checker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathType {
    /// `B`
    Boolean,
    /// `N`
    Natural,
    /// `Z`
    Integer,
    /// `Entity`
    Entity,
    /// Any other named type (`Str(Entry)`, `Queue`, ...)
    Named(String),
}

impl fmt::Display for MathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathType::Boolean => write!(f, "B"),
            MathType::Natural => write!(f, "N"),
            MathType::Integer => write!(f, "Z"),
            MathType::Entity => write!(f, "Entity"),
            MathType::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    /// Integer literal
    Int(i64),
    /// `true` / `false`
    Bool(bool),
    /// Character literal
    Char(char),
    /// String literal
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Char(c) => write!(f, "'{}'", c),
            Literal::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Quantifier kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantifier {
    /// Universal
    Forall,
    /// Existential
    Exists,
}

/// Functional symbol identity used for theorem indexing
///
/// Two operators are the same symbol only when qualifier, name and arity agree,
/// so `Stack_Theory::+` and an integer `+` land in different index buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Operator {
    /// Defining module, if qualified
    pub qualifier: Option<String>,
    /// Symbol name
    pub name: String,
    /// Number of arguments
    pub arity: usize,
}

impl Operator {
    /// Create an unqualified operator
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
            arity,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}::{}/{}", q, self.name, self.arity),
            None => write!(f, "{}/{}", self.name, self.arity),
        }
    }
}

/// Expression node kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpKind {
    /// Variable reference: `x`, `Std_Integer_Fac::Max_Int`
    Var {
        /// Module qualifier
        qualifier: Option<String>,
        /// Variable name
        name: String,
    },
    /// Literal value
    Literal(Literal),
    /// Binary operator application: `a + b`, `p and q`, `x = y`
    Infix {
        /// Left operand
        left: Box<Exp>,
        /// Operator symbol
        op: String,
        /// Right operand
        right: Box<Exp>,
    },
    /// Unary operator application: `not p`, `-x`
    Prefix {
        /// Operator symbol
        op: String,
        /// Operand
        arg: Box<Exp>,
    },
    /// Function application: `|S|`, `Reverse(S)`
    Function {
        /// Module qualifier
        qualifier: Option<String>,
        /// Function name
        name: String,
        /// Arguments
        args: Vec<Exp>,
    },
    /// Tuple: `(a, b)`
    Tuple(Vec<Exp>),
    /// Lambda: `lambda(i).(i + 1)`
    Lambda {
        /// Bound parameter names
        params: Vec<String>,
        /// Body
        body: Box<Exp>,
    },
    /// Quantified expression: `For all x, P(x)`
    Quantified {
        /// Quantifier
        quantifier: Quantifier,
        /// Bound variable names
        vars: Vec<String>,
        /// Body
        body: Box<Exp>,
    },
    /// Incoming value: `#x`
    Old(Box<Exp>),
    /// Verification variable introduced by a state change: `x'`
    VcVar {
        /// Underlying variable
        exp: Box<Exp>,
        /// Number of primes
        ticks: usize,
    },
}

/// Mathematical expression with its type and provenance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exp {
    /// Node kind
    pub kind: ExpKind,
    /// Mathematical type, when known
    pub math_type: Option<MathType>,
    /// Source location, when known
    pub location: Option<Location>,
    /// Provenance tag
    pub detail: Option<LocationDetailModel>,
}

impl Exp {
    /// Wrap a kind without metadata
    pub fn new(kind: ExpKind) -> Self {
        Self {
            kind,
            math_type: None,
            location: None,
            detail: None,
        }
    }

    /// Unqualified variable
    pub fn var(name: impl Into<String>) -> Self {
        Self::new(ExpKind::Var {
            qualifier: None,
            name: name.into(),
        })
    }

    /// Qualified variable
    pub fn qualified_var(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ExpKind::Var {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        })
    }

    /// Integer literal
    pub fn int(n: i64) -> Self {
        Self::new(ExpKind::Literal(Literal::Int(n))).with_type(MathType::Integer)
    }

    /// Boolean literal
    pub fn bool_exp(b: bool) -> Self {
        Self::new(ExpKind::Literal(Literal::Bool(b))).with_type(MathType::Boolean)
    }

    /// `true`
    pub fn true_exp() -> Self {
        Self::bool_exp(true)
    }

    /// `false`
    pub fn false_exp() -> Self {
        Self::bool_exp(false)
    }

    /// Binary operator application
    pub fn infix(left: Exp, op: impl Into<String>, right: Exp) -> Self {
        Self::new(ExpKind::Infix {
            left: Box::new(left),
            op: op.into(),
            right: Box::new(right),
        })
    }

    /// Unary operator application
    pub fn prefix(op: impl Into<String>, arg: Exp) -> Self {
        Self::new(ExpKind::Prefix {
            op: op.into(),
            arg: Box::new(arg),
        })
    }

    /// Unqualified function application
    pub fn function(name: impl Into<String>, args: Vec<Exp>) -> Self {
        Self::new(ExpKind::Function {
            qualifier: None,
            name: name.into(),
            args,
        })
    }

    /// Tuple expression
    pub fn tuple(items: Vec<Exp>) -> Self {
        Self::new(ExpKind::Tuple(items))
    }

    /// Lambda expression
    pub fn lambda(params: Vec<String>, body: Exp) -> Self {
        Self::new(ExpKind::Lambda {
            params,
            body: Box::new(body),
        })
    }

    /// Universally quantified expression
    pub fn forall<S: Into<String>>(vars: Vec<S>, body: Exp) -> Self {
        Self::new(ExpKind::Quantified {
            quantifier: Quantifier::Forall,
            vars: vars.into_iter().map(Into::into).collect(),
            body: Box::new(body),
        })
        .with_type(MathType::Boolean)
    }

    /// Existentially quantified expression
    pub fn exists<S: Into<String>>(vars: Vec<S>, body: Exp) -> Self {
        Self::new(ExpKind::Quantified {
            quantifier: Quantifier::Exists,
            vars: vars.into_iter().map(Into::into).collect(),
            body: Box::new(body),
        })
        .with_type(MathType::Boolean)
    }

    /// Incoming value `#e`
    pub fn old(exp: Exp) -> Self {
        let math_type = exp.math_type.clone();
        Self {
            math_type,
            ..Self::new(ExpKind::Old(Box::new(exp)))
        }
    }

    /// Verification variable `e'` with the given number of primes
    pub fn vc_var(exp: Exp, ticks: usize) -> Self {
        let math_type = exp.math_type.clone();
        Self {
            math_type,
            ..Self::new(ExpKind::VcVar {
                exp: Box::new(exp),
                ticks,
            })
        }
    }

    /// `a and b`
    pub fn and(a: Exp, b: Exp) -> Self {
        Self::infix(a, "and", b).with_type(MathType::Boolean)
    }

    /// `a or b`
    pub fn or(a: Exp, b: Exp) -> Self {
        Self::infix(a, "or", b).with_type(MathType::Boolean)
    }

    /// `a implies b`
    pub fn implies(a: Exp, b: Exp) -> Self {
        Self::infix(a, "implies", b).with_type(MathType::Boolean)
    }

    /// `not a`
    pub fn not(a: Exp) -> Self {
        Self::prefix("not", a).with_type(MathType::Boolean)
    }

    /// `a = b`
    pub fn equals(a: Exp, b: Exp) -> Self {
        Self::infix(a, "=", b).with_type(MathType::Boolean)
    }

    /// Fold a list of conjuncts into one expression; empty list gives `true`
    pub fn conjunction(mut exps: Vec<Exp>) -> Self {
        if exps.is_empty() {
            return Self::true_exp();
        }
        let first = exps.remove(0);
        exps.into_iter().fold(first, Exp::and)
    }

    /// Attach a location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach a provenance tag
    pub fn with_detail(mut self, detail: LocationDetailModel) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Attach a mathematical type
    pub fn with_type(mut self, math_type: MathType) -> Self {
        self.math_type = Some(math_type);
        self
    }

    pub fn is_literal_true(&self) -> bool {
        matches!(self.kind, ExpKind::Literal(Literal::Bool(true)))
    }

    pub fn is_literal_false(&self) -> bool {
        matches!(self.kind, ExpKind::Literal(Literal::Bool(false)))
    }

    /// Variable-like leaf (`x`, `#x`, `x'`)
    pub fn is_variable_like(&self) -> bool {
        matches!(
            self.kind,
            ExpKind::Var { .. } | ExpKind::Old(_) | ExpKind::VcVar { .. }
        )
    }

    /// Unqualified name of a plain variable
    pub fn var_name(&self) -> Option<&str> {
        match &self.kind {
            ExpKind::Var { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Operands of an infix application of `op`
    pub fn infix_parts(&self, op: &str) -> Option<(&Exp, &Exp)> {
        match &self.kind {
            ExpKind::Infix {
                left,
                op: actual,
                right,
            } if actual == op => Some((left, right)),
            _ => None,
        }
    }

    /// Operand of a prefix application of `op`
    pub fn prefix_arg(&self, op: &str) -> Option<&Exp> {
        match &self.kind {
            ExpKind::Prefix { op: actual, arg } if actual == op => Some(arg),
            _ => None,
        }
    }

    /// Node kind name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExpKind::Var { .. } => "VarExp",
            ExpKind::Literal(_) => "LiteralExp",
            ExpKind::Infix { op, .. } if op == "=" || op == "/=" => "EqualsExp",
            ExpKind::Infix { .. } => "InfixExp",
            ExpKind::Prefix { .. } => "PrefixExp",
            ExpKind::Function { .. } => "FunctionExp",
            ExpKind::Tuple(_) => "TupleExp",
            ExpKind::Lambda { .. } => "LambdaExp",
            ExpKind::Quantified { .. } => "QuantExp",
            ExpKind::Old(_) => "OldExp",
            ExpKind::VcVar { .. } => "VCVarExp",
        }
    }

    /// Whether the top-level node is a logical connective or quantifier
    pub fn is_logical(&self) -> bool {
        match &self.kind {
            ExpKind::Infix { op, .. } | ExpKind::Prefix { op, .. } => {
                LOGICAL_CONNECTIVES.contains(op.as_str())
            }
            ExpKind::Quantified { .. } => true,
            _ => false,
        }
    }

    /// Direct sub-expressions in positional order
    ///
    /// `#x` and `x'` are leaves: substituting for `x` must not touch them.
    pub fn sub_expressions(&self) -> Vec<&Exp> {
        match &self.kind {
            ExpKind::Var { .. } | ExpKind::Literal(_) | ExpKind::Old(_) | ExpKind::VcVar { .. } => {
                Vec::new()
            }
            ExpKind::Infix { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            ExpKind::Prefix { arg, .. } => vec![arg.as_ref()],
            ExpKind::Function { args, .. } => args.iter().collect(),
            ExpKind::Tuple(items) => items.iter().collect(),
            ExpKind::Lambda { body, .. } | ExpKind::Quantified { body, .. } => vec![body.as_ref()],
        }
    }

    /// Rebuild this node with new children, in `sub_expressions` order
    fn with_children(&self, mut children: Vec<Exp>) -> Exp {
        let kind = match &self.kind {
            ExpKind::Infix { op, .. } if children.len() == 2 => {
                let right = children.pop().map(Box::new);
                let left = children.pop().map(Box::new);
                match (left, right) {
                    (Some(left), Some(right)) => ExpKind::Infix {
                        left,
                        op: op.clone(),
                        right,
                    },
                    _ => self.kind.clone(),
                }
            }
            ExpKind::Prefix { op, .. } => match children.pop() {
                Some(arg) => ExpKind::Prefix {
                    op: op.clone(),
                    arg: Box::new(arg),
                },
                None => self.kind.clone(),
            },
            ExpKind::Function {
                qualifier, name, ..
            } => ExpKind::Function {
                qualifier: qualifier.clone(),
                name: name.clone(),
                args: children,
            },
            ExpKind::Tuple(_) => ExpKind::Tuple(children),
            ExpKind::Lambda { params, .. } => match children.pop() {
                Some(body) => ExpKind::Lambda {
                    params: params.clone(),
                    body: Box::new(body),
                },
                None => self.kind.clone(),
            },
            ExpKind::Quantified {
                quantifier, vars, ..
            } => match children.pop() {
                Some(body) => ExpKind::Quantified {
                    quantifier: *quantifier,
                    vars: vars.clone(),
                    body: Box::new(body),
                },
                None => self.kind.clone(),
            },
            _ => self.kind.clone(),
        };
        Exp {
            kind,
            math_type: self.math_type.clone(),
            location: self.location.clone(),
            detail: self.detail.clone(),
        }
    }

    /// Names bound by this node, if it is a binder
    fn bound_names(&self) -> &[String] {
        match &self.kind {
            ExpKind::Lambda { params, .. } => params,
            ExpKind::Quantified { vars, .. } => vars,
            _ => &[],
        }
    }

    /// Structural equality ignoring type, location and provenance
    pub fn equivalent(&self, other: &Exp) -> bool {
        match (&self.kind, &other.kind) {
            (
                ExpKind::Var {
                    qualifier: q1,
                    name: n1,
                },
                ExpKind::Var {
                    qualifier: q2,
                    name: n2,
                },
            ) => q1 == q2 && n1 == n2,
            (ExpKind::Literal(a), ExpKind::Literal(b)) => a == b,
            (
                ExpKind::Infix {
                    left: l1,
                    op: o1,
                    right: r1,
                },
                ExpKind::Infix {
                    left: l2,
                    op: o2,
                    right: r2,
                },
            ) => o1 == o2 && l1.equivalent(l2) && r1.equivalent(r2),
            (ExpKind::Prefix { op: o1, arg: a1 }, ExpKind::Prefix { op: o2, arg: a2 }) => {
                o1 == o2 && a1.equivalent(a2)
            }
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
            ) => q1 == q2 && n1 == n2 && all_equivalent(a1, a2),
            (ExpKind::Tuple(a), ExpKind::Tuple(b)) => all_equivalent(a, b),
            (
                ExpKind::Lambda {
                    params: p1,
                    body: b1,
                },
                ExpKind::Lambda {
                    params: p2,
                    body: b2,
                },
            ) => p1 == p2 && b1.equivalent(b2),
            (
                ExpKind::Quantified {
                    quantifier: k1,
                    vars: v1,
                    body: b1,
                },
                ExpKind::Quantified {
                    quantifier: k2,
                    vars: v2,
                    body: b2,
                },
            ) => k1 == k2 && v1 == v2 && b1.equivalent(b2),
            (ExpKind::Old(a), ExpKind::Old(b)) => a.equivalent(b),
            (ExpKind::VcVar { exp: a, ticks: t1 }, ExpKind::VcVar { exp: b, ticks: t2 }) => {
                t1 == t2 && a.equivalent(b)
            }
            _ => false,
        }
    }

    /// Replace every sub-expression equivalent to a key with its replacement
    ///
    /// Substitutions are simultaneous. Keys that are variables bound by an inner
    /// quantifier or lambda are not applied under that binder, and a binder whose
    /// name occurs free in a replacement is renamed apart first.
    pub fn substitute(&self, subs: &[(Exp, Exp)]) -> Exp {
        if subs.is_empty() {
            return self.clone();
        }
        if let Some((_, replacement)) = subs.iter().find(|(key, _)| key.equivalent(self)) {
            return replacement.clone();
        }

        let bound = self.bound_names();
        let children = self.sub_expressions();
        if children.is_empty() {
            return self.clone();
        }
        if bound.is_empty() {
            let rebuilt = children.into_iter().map(|c| c.substitute(subs)).collect();
            return self.with_children(rebuilt);
        }

        let visible: Vec<(Exp, Exp)> = subs
            .iter()
            .filter(|(key, _)| match key.var_name() {
                Some(name) => !bound.iter().any(|b| b == name),
                None => true,
            })
            .filter(|(key, _)| children.iter().any(|c| c.contains(key)))
            .cloned()
            .collect();
        if visible.is_empty() {
            return self.clone();
        }

        let incoming: BTreeSet<String> = visible
            .iter()
            .flat_map(|(_, replacement)| replacement.free_variables())
            .collect();
        if !bound.iter().any(|b| incoming.contains(b)) {
            let rebuilt = children.into_iter().map(|c| c.substitute(&visible)).collect();
            return self.with_children(rebuilt);
        }

        // Alpha-rename the clashing binders, then substitute into the renamed body
        let mut taken = incoming.clone();
        taken.extend(children.iter().flat_map(|c| c.free_variables()));
        taken.extend(bound.iter().cloned());
        let mut names = Vec::with_capacity(bound.len());
        let mut renames = Vec::new();
        for name in bound {
            if incoming.contains(name) {
                let fresh = fresh_name(name, &taken);
                taken.insert(fresh.clone());
                renames.push((Exp::var(name.clone()), Exp::var(fresh.clone())));
                names.push(fresh);
            } else {
                names.push(name.clone());
            }
        }
        let rebuilt = children
            .into_iter()
            .map(|c| c.substitute(&renames).substitute(&visible))
            .collect();
        self.with_bound_names(names).with_children(rebuilt)
    }

    /// This binder with its bound names replaced positionally
    fn with_bound_names(&self, names: Vec<String>) -> Exp {
        let kind = match &self.kind {
            ExpKind::Lambda { body, .. } => ExpKind::Lambda {
                params: names,
                body: body.clone(),
            },
            ExpKind::Quantified {
                quantifier, body, ..
            } => ExpKind::Quantified {
                quantifier: *quantifier,
                vars: names,
                body: body.clone(),
            },
            _ => return self.clone(),
        };
        Exp {
            kind,
            ..self.clone()
        }
    }

    /// Whether an equivalent sub-expression occurs anywhere in this tree
    pub fn contains(&self, target: &Exp) -> bool {
        self.equivalent(target) || self.sub_expressions().iter().any(|c| c.contains(target))
    }

    /// Names of free variable-like leaves, rendered (`x`, `#x`, `x'`)
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_free_variables(&mut Vec::new(), &mut out);
        out
    }

    fn collect_free_variables(&self, bound: &mut Vec<String>, out: &mut BTreeSet<String>) {
        match &self.kind {
            ExpKind::Var { name, .. } => {
                if !bound.contains(name) {
                    out.insert(self.to_string());
                }
            }
            ExpKind::Old(_) | ExpKind::VcVar { .. } => {
                out.insert(self.to_string());
            }
            _ => {
                let names = self.bound_names();
                let before = bound.len();
                bound.extend(names.iter().cloned());
                for child in self.sub_expressions() {
                    child.collect_free_variables(bound, out);
                }
                bound.truncate(before);
            }
        }
    }

    /// Every variable-like leaf of the tree, bound or free
    pub fn variable_leaves(&self) -> Vec<&Exp> {
        let mut out = Vec::new();
        self.collect_variable_leaves(&mut out);
        out
    }

    fn collect_variable_leaves<'a>(&'a self, out: &mut Vec<&'a Exp>) {
        if self.is_variable_like() {
            out.push(self);
            return;
        }
        for child in self.sub_expressions() {
            child.collect_variable_leaves(out);
        }
    }

    /// Distinct functional symbols appearing anywhere in the tree
    pub fn operators(&self) -> BTreeSet<Operator> {
        let mut out = BTreeSet::new();
        self.collect_operators(&mut out);
        out
    }

    fn collect_operators(&self, out: &mut BTreeSet<Operator>) {
        match &self.kind {
            ExpKind::Infix { op, .. } => {
                out.insert(Operator::new(op.clone(), 2));
            }
            ExpKind::Prefix { op, .. } => {
                out.insert(Operator::new(op.clone(), 1));
            }
            ExpKind::Function {
                qualifier,
                name,
                args,
            } => {
                out.insert(Operator {
                    qualifier: qualifier.clone(),
                    name: name.clone(),
                    arity: args.len(),
                });
            }
            _ => {}
        }
        for child in self.sub_expressions() {
            child.collect_operators(out);
        }
    }

    /// Free variable names plus operator names
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut out = self.free_variables();
        out.extend(self.operators().into_iter().map(|op| op.name));
        out
    }

    /// Split top-level `and` chains into their conjuncts
    pub fn conjuncts(&self) -> Vec<Exp> {
        match self.infix_parts("and") {
            Some((left, right)) => {
                let mut out = left.conjuncts();
                out.extend(right.conjuncts());
                out
            }
            None => vec![self.clone()],
        }
    }

    /// Strip leading universal quantifiers, returning the bound names and the body
    pub fn strip_universal(&self) -> (Vec<String>, &Exp) {
        let mut vars = Vec::new();
        let mut current = self;
        while let ExpKind::Quantified {
            quantifier: Quantifier::Forall,
            vars: bound,
            body,
        } = &current.kind
        {
            vars.extend(bound.iter().cloned());
            current = body;
        }
        (vars, current)
    }

    /// Sub-expression at a positional path
    pub fn at_path(&self, path: &[usize]) -> Option<&Exp> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self.sub_expressions().get(*first)?.at_path(rest),
        }
    }

    /// Copy of this tree with the node at `path` replaced
    pub fn replace_at_path(&self, path: &[usize], replacement: Exp) -> Option<Exp> {
        match path.split_first() {
            None => Some(replacement),
            Some((first, rest)) => {
                let children = self.sub_expressions();
                let target = children.get(*first)?;
                let replaced = target.replace_at_path(rest, replacement)?;
                let rebuilt = children
                    .iter()
                    .enumerate()
                    .map(|(i, c)| if i == *first { replaced.clone() } else { (*c).clone() })
                    .collect();
                Some(self.with_children(rebuilt))
            }
        }
    }

    /// All positional paths in pre-order, starting with the root `[]`
    pub fn paths(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new()];
        for (i, child) in self.sub_expressions().iter().enumerate() {
            for mut sub in child.paths() {
                sub.insert(0, i);
                out.push(sub);
            }
        }
        out
    }

    fn needs_parens(&self) -> bool {
        matches!(
            self.kind,
            ExpKind::Infix { .. } | ExpKind::Quantified { .. } | ExpKind::Lambda { .. }
        )
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_parens() {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

fn all_equivalent(a: &[Exp], b: &[Exp]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equivalent(y))
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Exp]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpKind::Var { qualifier, name } => match qualifier {
                Some(q) => write!(f, "{}::{}", q, name),
                None => write!(f, "{}", name),
            },
            ExpKind::Literal(lit) => write!(f, "{}", lit),
            ExpKind::Infix { left, op, right } => {
                left.fmt_operand(f)?;
                write!(f, " {} ", op)?;
                right.fmt_operand(f)
            }
            ExpKind::Prefix { op, arg } => {
                if WORD_OPERATORS.contains(op.as_str()) {
                    write!(f, "{} ", op)?;
                } else {
                    write!(f, "{}", op)?;
                }
                arg.fmt_operand(f)
            }
            ExpKind::Function {
                qualifier,
                name,
                args,
            } => {
                if let Some(q) = qualifier {
                    write!(f, "{}::", q)?;
                }
                write!(f, "{}(", name)?;
                write_list(f, args)?;
                write!(f, ")")
            }
            ExpKind::Tuple(items) => {
                write!(f, "(")?;
                write_list(f, items)?;
                write!(f, ")")
            }
            ExpKind::Lambda { params, body } => {
                write!(f, "lambda({}).({})", params.join(", "), body)
            }
            ExpKind::Quantified {
                quantifier,
                vars,
                body,
            } => {
                let word = match quantifier {
                    Quantifier::Forall => "For all",
                    Quantifier::Exists => "There exists",
                };
                write!(f, "{} {}, {}", word, vars.join(", "), body)
            }
            ExpKind::Old(exp) => {
                write!(f, "#")?;
                exp.fmt_operand(f)
            }
            ExpKind::VcVar { exp, ticks } => {
                exp.fmt_operand(f)?;
                write!(f, "{}", "'".repeat(*ticks))
            }
        }
    }
}

/// A name based on `base` that is not in `taken`
pub fn fresh_name(base: &str, taken: &BTreeSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|i| format!("{}_{}", base, i))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
