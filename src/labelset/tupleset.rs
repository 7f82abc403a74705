use crate::base::Position;
use crate::error::ParseError;
use crate::json::Value as Json;

use super::{LabelKind, LabelSet};

/// The direct product of two labelsets: one label per tape (`LAT`,
/// "labels are tuples"), as used by transducers. Printed as `a|b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleSet<A, B> {
    pub first: A,
    pub second: B,
}

impl<A: LabelSet, B: LabelSet> TupleSet<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: LabelSet, B: LabelSet> LabelSet for TupleSet<A, B> {
    type Value = (A::Value, B::Value);

    fn kind(&self) -> LabelKind {
        LabelKind::MultiTape
    }

    fn has_one(&self) -> bool {
        self.first.has_one() && self.second.has_one()
    }

    fn is_free(&self) -> bool {
        false
    }

    fn conv(&self, input: &str, pos: &mut Position, strict_alphabet: bool) -> Result<Self::Value, ParseError> {
        let rest = &input[pos.offset..];
        let sep = rest
            .find('|')
            .ok_or_else(|| ParseError::new(*pos, "expected 'a|b' tuple label literal"))?;
        let left = &rest[..sep];
        let first = self.first.conv(left, &mut Position::start(), strict_alphabet)?;
        for c in left.chars() {
            pos.advance(c);
        }
        pos.advance('|');
        let right = &rest[sep + 1..];
        let second = self.second.conv(right, &mut Position::start(), strict_alphabet)?;
        for c in right.chars() {
            pos.advance(c);
        }
        Ok((first, second))
    }

    fn alphabet(&self) -> Vec<Self::Value> {
        let mut out = Vec::new();
        for a in self.first.alphabet() {
            for b in self.second.alphabet() {
                out.push((a.clone(), b.clone()));
            }
        }
        out
    }

    fn print(&self, v: &Self::Value) -> String {
        format!("{}|{}", self.first.print(&v.0), self.second.print(&v.1))
    }

    fn to_json(&self, v: &Self::Value) -> Json {
        Json::Array(vec![self.first.to_json(&v.0), self.second.to_json(&v.1)])
    }

    fn from_json(&self, v: &Json) -> Result<Self::Value, ParseError> {
        match v.as_array() {
            Some([a, b]) => Ok((self.first.from_json(a)?, self.second.from_json(b)?)),
            _ => Err(ParseError::new(Position::start(), "expected a 2-element tuple label")),
        }
    }

    fn transpose(&self, v: &Self::Value) -> Self::Value {
        (self.first.transpose(&v.0), self.second.transpose(&v.1))
    }

    fn name(&self) -> String {
        format!("Tuple[{}, {}]", self.first.name(), self.second.name())
    }
}
