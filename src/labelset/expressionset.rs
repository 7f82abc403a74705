use crate::base::Position;
use crate::error::ParseError;
use crate::expression::{Expression, RatExpSet};
use crate::json::Value as Json;
use crate::labelset::LabelSet as InnerLabelSet;
use crate::weightset::WeightSet as InnerWeightSet;

use super::{LabelKind, LabelSet};

/// A labelset whose values are themselves rational expressions over a base
/// context (`LAR`, "labels are ratexps"): the automaton this labels is one
/// level up from the expressions it carries.
#[derive(Debug, Clone)]
pub struct ExpressionSet<BL: InnerLabelSet, BW: InnerWeightSet> {
    rs: RatExpSet<BL, BW>,
}

impl<BL: InnerLabelSet, BW: InnerWeightSet> ExpressionSet<BL, BW> {
    pub fn new(rs: RatExpSet<BL, BW>) -> Self {
        Self { rs }
    }

    pub fn ratexpset(&self) -> &RatExpSet<BL, BW> {
        &self.rs
    }
}

impl<BL: InnerLabelSet, BW: InnerWeightSet> LabelSet for ExpressionSet<BL, BW> {
    type Value = Expression<BL, BW>;

    fn kind(&self) -> LabelKind {
        LabelKind::Expressions
    }

    fn has_one(&self) -> bool {
        true
    }

    fn is_free(&self) -> bool {
        false
    }

    fn conv(&self, input: &str, pos: &mut Position, _strict_alphabet: bool) -> Result<Self::Value, ParseError> {
        let rest = &input[pos.offset..];
        let mut local = Position::start();
        let e = crate::expression::parse(&self.rs, rest, &mut local)?;
        for c in rest.chars() {
            pos.advance(c);
        }
        Ok(e)
    }

    fn print(&self, v: &Self::Value) -> String {
        crate::expression::print(self.rs.context(), v)
    }

    fn to_json(&self, v: &Self::Value) -> Json {
        crate::expression::printer::to_json(self.rs.context(), v)
    }

    fn from_json(&self, v: &Json) -> Result<Self::Value, ParseError> {
        crate::expression::parser::from_json(&self.rs, v)
    }

    fn name(&self) -> String {
        format!("Expressions[{}]", self.rs.context().name())
    }
}
