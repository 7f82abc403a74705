use crate::error::AwaliError;
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

use super::node::Expression;
use super::ratexpset::RatExpSet;
use super::visitor::Visitor;

/// The weight of the empty word in the series denoted by `e`.
pub fn constant_term<L: LabelSet, W: WeightSet>(
    rs: &RatExpSet<L, W>,
    e: &Expression<L, W>,
) -> Result<W::Value, AwaliError> {
    let mut visitor = ConstantTerm { rs };
    visitor.visit(e)
}

struct ConstantTerm<'a, L: LabelSet, W: WeightSet> {
    rs: &'a RatExpSet<L, W>,
}

impl<'a, L: LabelSet, W: WeightSet> Visitor<L, W> for ConstantTerm<'a, L, W> {
    type Output = Result<W::Value, AwaliError>;

    fn visit_zero(&mut self) -> Self::Output {
        Ok(self.rs.context().weightset().zero())
    }

    fn visit_one(&mut self) -> Self::Output {
        Ok(self.rs.context().weightset().one())
    }

    fn visit_atom(&mut self, _label: &L::Value) -> Self::Output {
        Ok(self.rs.context().weightset().zero())
    }

    fn visit_sum(&mut self, terms: &[Expression<L, W>]) -> Self::Output {
        let ws = self.rs.context().weightset();
        let mut acc = ws.zero();
        for t in terms {
            acc = ws.add(&acc, &self.visit(t)?);
        }
        Ok(acc)
    }

    fn visit_prod(&mut self, factors: &[Expression<L, W>]) -> Self::Output {
        let ws = self.rs.context().weightset();
        let mut acc = ws.one();
        for f in factors {
            acc = ws.mul(&acc, &self.visit(f)?);
        }
        Ok(acc)
    }

    fn visit_star(&mut self, inner: &Expression<L, W>) -> Self::Output {
        let c = self.visit(inner)?;
        self.rs.context().weightset().star(&c)
    }

    fn visit_plus(&mut self, inner: &Expression<L, W>) -> Self::Output {
        let ws = self.rs.context().weightset();
        let c = self.visit(inner)?;
        let star_c = ws.star(&c)?;
        Ok(ws.mul(&c, &star_c))
    }

    fn visit_maybe(&mut self, inner: &Expression<L, W>) -> Self::Output {
        let ws = self.rs.context().weightset();
        let c = self.visit(inner)?;
        Ok(ws.add(&ws.one(), &c))
    }

    fn visit_complement(&mut self, inner: &Expression<L, W>) -> Self::Output {
        let ws = self.rs.context().weightset();
        let c = self.visit(inner)?;
        Ok(if ws.is_zero(&c) { ws.one() } else { ws.zero() })
    }

    fn visit_conjunction(&mut self, terms: &[Expression<L, W>]) -> Self::Output {
        let ws = self.rs.context().weightset();
        let mut acc = ws.one();
        for t in terms {
            acc = ws.mul(&acc, &self.visit(t)?);
        }
        Ok(acc)
    }

    fn visit_shuffle(&mut self, terms: &[Expression<L, W>]) -> Self::Output {
        let ws = self.rs.context().weightset();
        let mut acc = ws.one();
        for t in terms {
            acc = ws.mul(&acc, &self.visit(t)?);
        }
        Ok(acc)
    }

    fn visit_ldiv(&mut self, _a: &Expression<L, W>, _b: &Expression<L, W>) -> Self::Output {
        Err(AwaliError::not_implemented("constant_term", "left quotient"))
    }

    fn visit_transposition(&mut self, inner: &Expression<L, W>) -> Self::Output {
        self.visit(inner)
    }

    fn visit_lweight(&mut self, weight: &W::Value, inner: &Expression<L, W>) -> Self::Output {
        let ws = self.rs.context().weightset();
        let c = self.visit(inner)?;
        Ok(ws.mul(weight, &c))
    }

    fn visit_rweight(&mut self, inner: &Expression<L, W>, weight: &W::Value) -> Self::Output {
        let ws = self.rs.context().weightset();
        let c = self.visit(inner)?;
        Ok(ws.mul(&c, weight))
    }
}
