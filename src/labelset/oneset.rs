use crate::base::Position;
use crate::error::ParseError;
use crate::json::Value as Json;

use super::{LabelKind, LabelSet};

/// The trivial labelset: the only label is epsilon (`LAO`, "labels are one",
/// used by weighted automata with no alphabet, e.g. plain counters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneSet;

impl LabelSet for OneSet {
    type Value = ();

    fn kind(&self) -> LabelKind {
        LabelKind::NoLabel
    }

    fn has_one(&self) -> bool {
        true
    }

    fn is_free(&self) -> bool {
        true
    }

    fn conv(&self, _input: &str, _pos: &mut Position, _strict_alphabet: bool) -> Result<(), ParseError> {
        Ok(())
    }

    fn print(&self, _v: &()) -> String {
        String::new()
    }

    fn to_json(&self, _v: &()) -> Json {
        Json::Null
    }

    fn from_json(&self, _v: &Json) -> Result<(), ParseError> {
        Ok(())
    }

    fn name(&self) -> String {
        "NoLabel".to_string()
    }
}
