use crate::base::Position;
use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;

use super::{StarStatus, WeightSet};

/// The field `Z/2Z`, addition is XOR, multiplication is AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct F2;

impl WeightSet for F2 {
    type Value = bool;

    fn name(&self) -> String {
        "F2".to_string()
    }

    fn zero(&self) -> bool {
        false
    }

    fn one(&self) -> bool {
        true
    }

    fn add(&self, a: &bool, b: &bool) -> bool {
        a ^ b
    }

    fn mul(&self, a: &bool, b: &bool) -> bool {
        a & b
    }

    fn sub(&self, a: &bool, b: &bool) -> Option<bool> {
        Some(a ^ b)
    }

    fn star(&self, a: &bool) -> Result<bool, AwaliError> {
        if *a {
            Err(AwaliError::non_starrable(self.print(a)))
        } else {
            Ok(true)
        }
    }

    fn equals(&self, a: &bool, b: &bool) -> bool {
        a == b
    }

    fn less_than(&self, a: &bool, b: &bool) -> bool {
        !a && *b
    }

    fn conv(&self, s: &str) -> Result<bool, ParseError> {
        match s.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(ParseError::new(Position::start(), format!("'{other}' is not an F2 literal"))),
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
            _ => Err(ParseError::new(Position::start(), "expected an F2 weight")),
        }
    }

    fn show_one(&self) -> bool {
        false
    }

    fn star_status(&self) -> StarStatus {
        StarStatus::NonStarrable
    }
}
