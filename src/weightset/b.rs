use crate::base::Position;
use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;

use super::{StarStatus, WeightSet};

/// The Boolean semiring: `{false, true}` with `or`/`and`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct B;

impl WeightSet for B {
    type Value = bool;

    fn name(&self) -> String {
        "B".to_string()
    }

    fn zero(&self) -> bool {
        false
    }

    fn one(&self) -> bool {
        true
    }

    fn add(&self, a: &bool, b: &bool) -> bool {
        *a || *b
    }

    fn mul(&self, a: &bool, b: &bool) -> bool {
        *a && *b
    }

    fn star(&self, _a: &bool) -> Result<bool, AwaliError> {
        // 1 + x + x^2 + ... collapses to `true` for any x in {false, true}.
        Ok(true)
    }

    fn equals(&self, a: &bool, b: &bool) -> bool {
        a == b
    }

    fn less_than(&self, a: &bool, b: &bool) -> bool {
        !a && *b
    }

    fn conv(&self, s: &str) -> Result<bool, ParseError> {
        match s.trim() {
            "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(ParseError::new(Position::start(), format!("'{other}' is not a Boolean literal"))),
        }
    }

    fn print(&self, v: &bool) -> String {
        if *v { "1".to_string() } else { "0".to_string() }
    }

    fn to_json(&self, v: &bool) -> Json {
        Json::Bool(*v)
    }

    fn from_json(&self, v: &Json) -> Result<bool, ParseError> {
        match v {
            Json::Bool(b) => Ok(*b),
            Json::Int(0) => Ok(false),
            Json::Int(1) => Ok(true),
            Json::Str(s) => self.conv(s),
            _ => Err(ParseError::new(Position::start(), "expected a Boolean weight")),
        }
    }

    fn show_one(&self) -> bool {
        false
    }

    fn star_status(&self) -> StarStatus {
        StarStatus::Starrable
    }
}
