use crate::base::Position;
use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;

use super::{StarStatus, WeightSet};

/// The direct product of two weightsets: componentwise `add`/`mul`/`star`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TupleWeightSet<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> TupleWeightSet<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: WeightSet, B: WeightSet> WeightSet for TupleWeightSet<A, B> {
    type Value = (A::Value, B::Value);

    fn name(&self) -> String {
        format!("{{tupleSR: [{}, {}]}}", self.first.name(), self.second.name())
    }

    fn zero(&self) -> Self::Value {
        (self.first.zero(), self.second.zero())
    }

    fn one(&self) -> Self::Value {
        (self.first.one(), self.second.one())
    }

    fn add(&self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        (self.first.add(&a.0, &b.0), self.second.add(&a.1, &b.1))
    }

    fn mul(&self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        (self.first.mul(&a.0, &b.0), self.second.mul(&a.1, &b.1))
    }

    fn sub(&self, a: &Self::Value, b: &Self::Value) -> Option<Self::Value> {
        Some((self.first.sub(&a.0, &b.0)?, self.second.sub(&a.1, &b.1)?))
    }

    fn star(&self, a: &Self::Value) -> Result<Self::Value, AwaliError> {
        Ok((self.first.star(&a.0)?, self.second.star(&a.1)?))
    }

    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool {
        self.first.equals(&a.0, &b.0) && self.second.equals(&a.1, &b.1)
    }

    fn less_than(&self, a: &Self::Value, b: &Self::Value) -> bool {
        if !self.first.equals(&a.0, &b.0) {
            self.first.less_than(&a.0, &b.0)
        } else {
            self.second.less_than(&a.1, &b.1)
        }
    }

    fn conv(&self, s: &str) -> Result<Self::Value, ParseError> {
        let (l, r) = s
            .split_once(',')
            .ok_or_else(|| ParseError::new(Position::start(), "expected 'a,b' tuple weight literal"))?;
        Ok((self.first.conv(l.trim())?, self.second.conv(r.trim())?))
    }

    fn print(&self, v: &Self::Value) -> String {
        format!("({}, {})", self.first.print(&v.0), self.second.print(&v.1))
    }

    fn to_json(&self, v: &Self::Value) -> Json {
        Json::Array(vec![self.first.to_json(&v.0), self.second.to_json(&v.1)])
    }

    fn from_json(&self, v: &Json) -> Result<Self::Value, ParseError> {
        match v.as_array() {
            Some([a, b]) => Ok((self.first.from_json(a)?, self.second.from_json(b)?)),
            _ => Err(ParseError::new(Position::start(), "expected a 2-element tuple weight")),
        }
    }

    fn is_commutative_semiring(&self) -> bool {
        self.first.is_commutative_semiring() && self.second.is_commutative_semiring()
    }

    fn star_status(&self) -> StarStatus {
        match (self.first.star_status(), self.second.star_status()) {
            (StarStatus::Starrable, StarStatus::Starrable) => StarStatus::Starrable,
            _ => StarStatus::NonStarrable,
        }
    }
}
