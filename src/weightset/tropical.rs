use crate::base::Position;
use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;

use super::{StarStatus, WeightSet};

/// The min-plus tropical semiring over `Z ∪ {+oo}`: `add = min`, `mul = +`.
/// `+oo` is represented as `i64::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZMinPlus;

const PLUS_INF: i64 = i64::MAX;

impl WeightSet for ZMinPlus {
    type Value = i64;

    fn name(&self) -> String {
        "Z-min-plus".to_string()
    }

    fn zero(&self) -> i64 {
        PLUS_INF
    }

    fn one(&self) -> i64 {
        0
    }

    fn add(&self, a: &i64, b: &i64) -> i64 {
        (*a).min(*b)
    }

    fn mul(&self, a: &i64, b: &i64) -> i64 {
        if *a == PLUS_INF || *b == PLUS_INF { PLUS_INF } else { a + b }
    }

    fn star(&self, a: &i64) -> Result<i64, AwaliError> {
        // min(0, x, 2x, ...) converges to 0 as soon as x >= 0.
        if *a >= 0 {
            Ok(0)
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
        match s.trim() {
            "oo" => Ok(PLUS_INF),
            other => other
                .parse::<i64>()
                .map_err(|e| ParseError::new(Position::start(), format!("'{s}' is not a Z-min-plus literal: {e}"))),
        }
    }

    fn print(&self, v: &i64) -> String {
        if *v == PLUS_INF { "oo".to_string() } else { v.to_string() }
    }

    fn to_json(&self, v: &i64) -> Json {
        if *v == PLUS_INF { Json::str("oo") } else { Json::Int(*v) }
    }

    fn from_json(&self, v: &Json) -> Result<i64, ParseError> {
        match v {
            Json::Int(n) => Ok(*n),
            Json::Str(s) => self.conv(s),
            _ => Err(ParseError::new(Position::start(), "expected a Z-min-plus weight")),
        }
    }

    fn star_status(&self) -> StarStatus {
        StarStatus::Tops
    }
}

/// The max-plus tropical semiring over `Z ∪ {-oo}`: `add = max`, `mul = +`.
/// `-oo` is represented as `i64::MIN`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZMaxPlus;

const MINUS_INF: i64 = i64::MIN;

impl WeightSet for ZMaxPlus {
    type Value = i64;

    fn name(&self) -> String {
        "Z-max-plus".to_string()
    }

    fn zero(&self) -> i64 {
        MINUS_INF
    }

    fn one(&self) -> i64 {
        0
    }

    fn add(&self, a: &i64, b: &i64) -> i64 {
        (*a).max(*b)
    }

    fn mul(&self, a: &i64, b: &i64) -> i64 {
        if *a == MINUS_INF || *b == MINUS_INF { MINUS_INF } else { a + b }
    }

    fn star(&self, a: &i64) -> Result<i64, AwaliError> {
        if *a <= 0 {
            Ok(0)
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
        match s.trim() {
            "-oo" => Ok(MINUS_INF),
            other => other
                .parse::<i64>()
                .map_err(|e| ParseError::new(Position::start(), format!("'{s}' is not a Z-max-plus literal: {e}"))),
        }
    }

    fn print(&self, v: &i64) -> String {
        if *v == MINUS_INF { "-oo".to_string() } else { v.to_string() }
    }

    fn to_json(&self, v: &i64) -> Json {
        if *v == MINUS_INF { Json::str("-oo") } else { Json::Int(*v) }
    }

    fn from_json(&self, v: &Json) -> Result<i64, ParseError> {
        match v {
            Json::Int(n) => Ok(*n),
            Json::Str(s) => self.conv(s),
            _ => Err(ParseError::new(Position::start(), "expected a Z-max-plus weight")),
        }
    }

    fn star_status(&self) -> StarStatus {
        StarStatus::Tops
    }
}
