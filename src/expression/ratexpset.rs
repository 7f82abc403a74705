use crate::base::Position;
use crate::context::Context;
use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;
use crate::labelset::LabelSet;
use crate::weightset::{StarStatus, WeightSet};

use super::node::{ExpKind, Expression, Identities};
use super::{constant_term, parser, printer};

/// The constructor and weightset for expressions over `Context<L, W>`:
/// building through `RatExpSet` keeps every expression normalized to its
/// configured [`Identities`] level.
#[derive(Debug, Clone)]
pub struct RatExpSet<L: LabelSet, W: WeightSet> {
    context: Context<L, W>,
    identities: Identities,
}

impl<L: LabelSet, W: WeightSet> RatExpSet<L, W> {
    pub fn new(context: Context<L, W>, identities: Identities) -> Self {
        Self { context, identities }
    }

    pub fn context(&self) -> &Context<L, W> {
        &self.context
    }

    pub fn identities(&self) -> Identities {
        self.identities
    }

    pub fn zero(&self) -> Expression<L, W> {
        Expression::new(ExpKind::Zero)
    }

    pub fn one(&self) -> Expression<L, W> {
        Expression::new(ExpKind::One)
    }

    pub fn atom(&self, label: L::Value) -> Expression<L, W> {
        Expression::new(ExpKind::Atom(label))
    }

    pub fn sum(&self, a: &Expression<L, W>, b: &Expression<L, W>) -> Expression<L, W> {
        if a.is_zero() {
            return b.clone();
        }
        if b.is_zero() {
            return a.clone();
        }
        let as_sum = |k: &ExpKind<L, W>| match k {
            ExpKind::Sum(v) => Some(v.as_slice()),
            _ => None,
        };
        let mut terms = Vec::new();
        for e in [a, b] {
            if let Some(children) = as_sum(e.kind()) {
                terms.extend(children.iter().cloned());
            } else {
                terms.push(e.clone());
            }
        }
        if self.identities == Identities::Series {
            terms = self.combine_like_terms(terms);
        }
        match terms.len() {
            0 => self.zero(),
            1 => terms.into_iter().next().unwrap(),
            _ => Expression::new(ExpKind::Sum(terms)),
        }
    }

    fn term_core_and_coeff(&self, e: &Expression<L, W>) -> (Expression<L, W>, W::Value) {
        match e.kind() {
            ExpKind::LWeight(w, inner) => (inner.clone(), w.clone()),
            _ => (e.clone(), self.context.weightset().one()),
        }
    }

    fn combine_like_terms(&self, terms: Vec<Expression<L, W>>) -> Vec<Expression<L, W>> {
        let ws = self.context.weightset();
        let mut groups: Vec<(Expression<L, W>, W::Value)> = Vec::new();
        for t in terms {
            let (core, coeff) = self.term_core_and_coeff(&t);
            if let Some(g) = groups.iter_mut().find(|(c, _)| c.structurally_equal(&core, &self.context)) {
                g.1 = ws.add(&g.1, &coeff);
            } else {
                groups.push((core, coeff));
            }
        }
        let mut rebuilt: Vec<Expression<L, W>> = groups
            .into_iter()
            .filter(|(_, w)| !ws.is_zero(w))
            .map(|(core, w)| self.lweight(w, &core))
            .collect();
        rebuilt.sort_by(|x, y| printer::print(&self.context, x).cmp(&printer::print(&self.context, y)));
        rebuilt
    }

    pub fn prod(&self, a: &Expression<L, W>, b: &Expression<L, W>) -> Expression<L, W> {
        if a.is_zero() || b.is_zero() {
            return self.zero();
        }
        if a.is_one() {
            return b.clone();
        }
        if b.is_one() {
            return a.clone();
        }
        let as_prod = |k: &ExpKind<L, W>| match k {
            ExpKind::Prod(v) => Some(v.as_slice()),
            _ => None,
        };
        let mut factors = Vec::new();
        for e in [a, b] {
            if let Some(children) = as_prod(e.kind()) {
                factors.extend(children.iter().cloned());
            } else {
                factors.push(e.clone());
            }
        }
        match factors.len() {
            0 => self.one(),
            1 => factors.into_iter().next().unwrap(),
            _ => Expression::new(ExpKind::Prod(factors)),
        }
    }

    pub fn star(&self, a: &Expression<L, W>) -> Expression<L, W> {
        if a.is_zero() || a.is_one() {
            return self.one();
        }
        Expression::new(ExpKind::Star(a.clone()))
    }

    pub fn plus(&self, a: &Expression<L, W>) -> Expression<L, W> {
        if a.is_zero() {
            return self.zero();
        }
        Expression::new(ExpKind::Plus(a.clone()))
    }

    pub fn maybe(&self, a: &Expression<L, W>) -> Expression<L, W> {
        if a.is_zero() {
            return self.one();
        }
        Expression::new(ExpKind::Maybe(a.clone()))
    }

    pub fn complement(&self, a: &Expression<L, W>) -> Expression<L, W> {
        Expression::new(ExpKind::Complement(a.clone()))
    }

    pub fn conjunction(&self, a: &Expression<L, W>, b: &Expression<L, W>) -> Expression<L, W> {
        Expression::new(ExpKind::Conjunction(vec![a.clone(), b.clone()]))
    }

    pub fn shuffle(&self, a: &Expression<L, W>, b: &Expression<L, W>) -> Expression<L, W> {
        Expression::new(ExpKind::Shuffle(vec![a.clone(), b.clone()]))
    }

    pub fn ldiv(&self, a: &Expression<L, W>, b: &Expression<L, W>) -> Expression<L, W> {
        Expression::new(ExpKind::LDiv(a.clone(), b.clone()))
    }

    pub fn transposition(&self, a: &Expression<L, W>) -> Expression<L, W> {
        Expression::new(ExpKind::Transposition(a.clone()))
    }

    pub fn lweight(&self, w: W::Value, a: &Expression<L, W>) -> Expression<L, W> {
        let ws = self.context.weightset();
        if ws.is_zero(&w) || a.is_zero() {
            return self.zero();
        }
        if ws.is_one(&w) {
            return a.clone();
        }
        match a.kind() {
            ExpKind::LWeight(w2, inner) => Expression::new(ExpKind::LWeight(ws.mul(&w, w2), inner.clone())),
            _ => Expression::new(ExpKind::LWeight(w, a.clone())),
        }
    }

    pub fn rweight(&self, a: &Expression<L, W>, w: W::Value) -> Expression<L, W> {
        let ws = self.context.weightset();
        if ws.is_zero(&w) || a.is_zero() {
            return self.zero();
        }
        if ws.is_one(&w) {
            return a.clone();
        }
        match a.kind() {
            ExpKind::RWeight(inner, w2) => Expression::new(ExpKind::RWeight(inner.clone(), ws.mul(w2, &w))),
            _ => Expression::new(ExpKind::RWeight(a.clone(), w)),
        }
    }
}

impl<L: LabelSet, W: WeightSet> WeightSet for RatExpSet<L, W> {
    type Value = Expression<L, W>;

    fn name(&self) -> String {
        format!("RatE[{}]", self.context.name())
    }

    fn zero(&self) -> Self::Value {
        RatExpSet::zero(self)
    }

    fn one(&self) -> Self::Value {
        RatExpSet::one(self)
    }

    fn add(&self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        self.sum(a, b)
    }

    fn mul(&self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        self.prod(a, b)
    }

    fn star(&self, a: &Self::Value) -> Result<Self::Value, AwaliError> {
        // Syntactic star is always defined in the expression semiring.
        Ok(RatExpSet::star(self, a))
    }

    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool {
        a.structurally_equal(b, &self.context)
    }

    fn less_than(&self, a: &Self::Value, b: &Self::Value) -> bool {
        printer::print(&self.context, a) < printer::print(&self.context, b)
    }

    fn conv(&self, s: &str) -> Result<Self::Value, ParseError> {
        let mut pos = Position::start();
        parser::parse(self, s, &mut pos)
    }

    fn print(&self, v: &Self::Value) -> String {
        printer::print(&self.context, v)
    }

    fn to_json(&self, v: &Self::Value) -> Json {
        super::printer::to_json(&self.context, v)
    }

    fn from_json(&self, v: &Json) -> Result<Self::Value, ParseError> {
        super::parser::from_json(self, v)
    }

    fn star_status(&self) -> StarStatus {
        StarStatus::Starrable
    }
}

impl<L: LabelSet, W: WeightSet> RatExpSet<L, W> {
    pub fn constant_term(&self, e: &Expression<L, W>) -> Result<W::Value, AwaliError> {
        constant_term::constant_term(self, e)
    }
}
