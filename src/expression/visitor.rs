use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

use super::node::{ExpKind, Expression};

/// The expression visitor protocol (§4.4). Implementors that don't support
/// one of the non-free-monoid operators should raise `UnsupportedInContext`
/// from that method rather than panicking.
pub trait Visitor<L: LabelSet, W: WeightSet> {
    type Output;

    fn visit(&mut self, e: &Expression<L, W>) -> Self::Output {
        match e.kind() {
            ExpKind::Zero => self.visit_zero(),
            ExpKind::One => self.visit_one(),
            ExpKind::Atom(l) => self.visit_atom(l),
            ExpKind::Sum(v) => self.visit_sum(v),
            ExpKind::Prod(v) => self.visit_prod(v),
            ExpKind::Star(a) => self.visit_star(a),
            ExpKind::Plus(a) => self.visit_plus(a),
            ExpKind::Maybe(a) => self.visit_maybe(a),
            ExpKind::Complement(a) => self.visit_complement(a),
            ExpKind::Conjunction(v) => self.visit_conjunction(v),
            ExpKind::Shuffle(v) => self.visit_shuffle(v),
            ExpKind::LDiv(a, b) => self.visit_ldiv(a, b),
            ExpKind::Transposition(a) => self.visit_transposition(a),
            ExpKind::LWeight(w, a) => self.visit_lweight(w, a),
            ExpKind::RWeight(a, w) => self.visit_rweight(a, w),
        }
    }

    fn visit_zero(&mut self) -> Self::Output;
    fn visit_one(&mut self) -> Self::Output;
    fn visit_atom(&mut self, label: &L::Value) -> Self::Output;
    fn visit_sum(&mut self, terms: &[Expression<L, W>]) -> Self::Output;
    fn visit_prod(&mut self, factors: &[Expression<L, W>]) -> Self::Output;
    fn visit_star(&mut self, inner: &Expression<L, W>) -> Self::Output;
    fn visit_plus(&mut self, inner: &Expression<L, W>) -> Self::Output;
    fn visit_maybe(&mut self, inner: &Expression<L, W>) -> Self::Output;
    fn visit_complement(&mut self, inner: &Expression<L, W>) -> Self::Output;
    fn visit_conjunction(&mut self, terms: &[Expression<L, W>]) -> Self::Output;
    fn visit_shuffle(&mut self, terms: &[Expression<L, W>]) -> Self::Output;
    fn visit_ldiv(&mut self, a: &Expression<L, W>, b: &Expression<L, W>) -> Self::Output;
    fn visit_transposition(&mut self, inner: &Expression<L, W>) -> Self::Output;
    fn visit_lweight(&mut self, weight: &W::Value, inner: &Expression<L, W>) -> Self::Output;
    fn visit_rweight(&mut self, inner: &Expression<L, W>, weight: &W::Value) -> Self::Output;
}
