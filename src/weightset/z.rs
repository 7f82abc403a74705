use crate::base::Position;
use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;

use super::{StarStatus, WeightSet};

/// The ring of integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Z;

impl WeightSet for Z {
    type Value = i64;

    fn name(&self) -> String {
        "Z".to_string()
    }

    fn zero(&self) -> i64 {
        0
    }

    fn one(&self) -> i64 {
        1
    }

    fn add(&self, a: &i64, b: &i64) -> i64 {
        a + b
    }

    fn mul(&self, a: &i64, b: &i64) -> i64 {
        a * b
    }

    fn sub(&self, a: &i64, b: &i64) -> Option<i64> {
        Some(a - b)
    }

    fn star(&self, a: &i64) -> Result<i64, AwaliError> {
        // 1 + x + x^2 + ... converges in Z only for x = 0.
        if *a == 0 {
            Ok(1)
        } else {
            Err(AwaliError::non_starrable(self.print(a)))
        }
    }

    fn equals(&self, a: &i64, b: &i64) -> bool {
        a == b
    }

    fn less_than(&self, a: &i64, b: &i64) -> bool {
        a < b
    }

    fn conv(&self, s: &str) -> Result<i64, ParseError> {
        s.trim()
            .parse::<i64>()
            .map_err(|e| ParseError::new(Position::start(), format!("'{s}' is not an integer: {e}")))
    }

    fn print(&self, v: &i64) -> String {
        v.to_string()
    }

    fn to_json(&self, v: &i64) -> Json {
        Json::Int(*v)
    }

    fn from_json(&self, v: &Json) -> Result<i64, ParseError> {
        match v {
            Json::Int(n) => Ok(*n),
            Json::Str(s) => self.conv(s),
            _ => Err(ParseError::new(Position::start(), "expected an integer weight")),
        }
    }

    fn star_status(&self) -> StarStatus {
        StarStatus::NonStarrable
    }
}
