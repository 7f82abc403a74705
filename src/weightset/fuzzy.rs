use crate::base::Position;
use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;

use super::{StarStatus, WeightSet};

/// The fuzzy semiring: values in `[0, 1]`, `add = max`, `mul = min`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fuzzy;

impl WeightSet for Fuzzy {
    type Value = f64;

    fn name(&self) -> String {
        "Fuzzy".to_string()
    }

    fn zero(&self) -> f64 {
        0.0
    }

    fn one(&self) -> f64 {
        1.0
    }

    fn add(&self, a: &f64, b: &f64) -> f64 {
        a.max(*b)
    }

    fn mul(&self, a: &f64, b: &f64) -> f64 {
        a.min(*b)
    }

    fn star(&self, _a: &f64) -> Result<f64, AwaliError> {
        // max(1, x, x, ...) = 1 for any x in [0, 1].
        Ok(1.0)
    }

    fn equals(&self, a: &f64, b: &f64) -> bool {
        a == b
    }

    fn less_than(&self, a: &f64, b: &f64) -> bool {
        a < b
    }

    fn conv(&self, s: &str) -> Result<f64, ParseError> {
        let v: f64 = s
            .trim()
            .parse()
            .map_err(|e| ParseError::new(Position::start(), format!("'{s}' is not a fuzzy value: {e}")))?;
        if !(0.0..=1.0).contains(&v) {
            return Err(ParseError::new(Position::start(), format!("fuzzy value '{s}' must lie in [0, 1]")));
        }
        Ok(v)
    }

    fn print(&self, v: &f64) -> String {
        if v.fract() == 0.0 { format!("{v:.0}") } else { v.to_string() }
    }

    fn to_json(&self, v: &f64) -> Json {
        Json::Float(*v)
    }

    fn from_json(&self, v: &Json) -> Result<f64, ParseError> {
        match v {
            Json::Float(f) => Ok(*f),
            Json::Int(n) => Ok(*n as f64),
            Json::Str(s) => self.conv(s),
            _ => Err(ParseError::new(Position::start(), "expected a fuzzy weight")),
        }
    }

    fn star_status(&self) -> StarStatus {
        StarStatus::Starrable
    }
}
