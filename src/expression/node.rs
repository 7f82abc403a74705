use std::rc::Rc;

use crate::context::Context;
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

/// How aggressively the ratexpset constructor normalizes expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identities {
    /// Associativity, neutral elements, zero absorption.
    Trivial,
    /// `Trivial` plus commutativity of sum (sorted, like terms combined)
    /// and distributivity of scalar products.
    Series,
}

/// One node of an expression DAG, parameterized by the context it lives in.
#[derive(Debug)]
pub enum ExpKind<L: LabelSet, W: WeightSet> {
    Zero,
    One,
    Atom(L::Value),
    Sum(Vec<Expression<L, W>>),
    Prod(Vec<Expression<L, W>>),
    Star(Expression<L, W>),
    Plus(Expression<L, W>),
    Maybe(Expression<L, W>),
    Complement(Expression<L, W>),
    Conjunction(Vec<Expression<L, W>>),
    Shuffle(Vec<Expression<L, W>>),
    LDiv(Expression<L, W>, Expression<L, W>),
    Transposition(Expression<L, W>),
    LWeight(W::Value, Expression<L, W>),
    RWeight(Expression<L, W>, W::Value),
}

struct Node<L: LabelSet, W: WeightSet> {
    kind: ExpKind<L, W>,
}

/// A reference-shared, immutable expression node.
pub struct Expression<L: LabelSet, W: WeightSet>(Rc<Node<L, W>>);

impl<L: LabelSet, W: WeightSet> Clone for Expression<L, W> {
    fn clone(&self) -> Self {
        Expression(Rc::clone(&self.0))
    }
}

// Identity-based, not structural: weight values carry no `PartialEq` of
// their own (semiring equality is the `WeightSet::equals` method), so an
// expression used as a label value (`ExpressionSet`) is only distinguished
// by which DAG node it is. Two separately-built but structurally identical
// expressions compare unequal here; use `structurally_equal` for the
// semantic notion. This trades away automatic label-level canonicalization
// of built-up expressions, never correctness.
impl<L: LabelSet, W: WeightSet> PartialEq for Expression<L, W> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<L: LabelSet, W: WeightSet> Eq for Expression<L, W> {}

impl<L: LabelSet, W: WeightSet> std::hash::Hash for Expression<L, W> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl<L: LabelSet, W: WeightSet> PartialOrd for Expression<L, W> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<L: LabelSet, W: WeightSet> Ord for Expression<L, W> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (Rc::as_ptr(&self.0) as usize).cmp(&(Rc::as_ptr(&other.0) as usize))
    }
}

impl<L: LabelSet, W: WeightSet> std::fmt::Debug for Expression<L, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.kind.fmt(f)
    }
}

impl<L: LabelSet, W: WeightSet> Expression<L, W> {
    pub(crate) fn new(kind: ExpKind<L, W>) -> Self {
        Expression(Rc::new(Node { kind }))
    }

    pub fn kind(&self) -> &ExpKind<L, W> {
        &self.0.kind
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Structural equality by shape, using the context's weightset/labelset
    /// equality for leaves rather than Rust's own `PartialEq` (weight values
    /// don't carry one — equality is a semiring operation).
    pub fn structurally_equal(&self, other: &Self, ctx: &Context<L, W>) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        use ExpKind::*;
        match (self.kind(), other.kind()) {
            (Zero, Zero) | (One, One) => true,
            (Atom(a), Atom(b)) => a == b,
            (Sum(a), Sum(b)) | (Prod(a), Prod(b)) | (Conjunction(a), Conjunction(b)) | (Shuffle(a), Shuffle(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structurally_equal(y, ctx))
            }
            (Star(a), Star(b)) | (Plus(a), Plus(b)) | (Maybe(a), Maybe(b)) | (Complement(a), Complement(b))
            | (Transposition(a), Transposition(b)) => a.structurally_equal(b, ctx),
            (LDiv(a1, a2), LDiv(b1, b2)) => a1.structurally_equal(b1, ctx) && a2.structurally_equal(b2, ctx),
            (LWeight(wa, a), LWeight(wb, b)) => ctx.weightset().equals(wa, wb) && a.structurally_equal(b, ctx),
            (RWeight(a, wa), RWeight(b, wb)) => ctx.weightset().equals(wa, wb) && a.structurally_equal(b, ctx),
            _ => false,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.kind(), ExpKind::Zero)
    }

    pub fn is_one(&self) -> bool {
        matches!(self.kind(), ExpKind::One)
    }
}
