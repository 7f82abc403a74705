use crate::base::Position;
use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;

use super::{StarStatus, WeightSet};

/// The field of (floating-point) reals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct R;

impl WeightSet for R {
    type Value = f64;

    fn name(&self) -> String {
        "R".to_string()
    }

    fn zero(&self) -> f64 {
        0.0
    }

    fn one(&self) -> f64 {
        1.0
    }

    fn add(&self, a: &f64, b: &f64) -> f64 {
        a + b
    }

    fn mul(&self, a: &f64, b: &f64) -> f64 {
        a * b
    }

    fn sub(&self, a: &f64, b: &f64) -> Option<f64> {
        Some(a - b)
    }

    fn div(&self, a: &f64, b: &f64) -> Option<f64> {
        if *b == 0.0 {
            return None;
        }
        Some(a / b)
    }

    fn star(&self, a: &f64) -> Result<f64, AwaliError> {
        if a.abs() >= 1.0 {
            return Err(AwaliError::non_starrable(self.print(a)));
        }
        Ok(1.0 / (1.0 - a))
    }

    fn equals(&self, a: &f64, b: &f64) -> bool {
        a == b
    }

    fn less_than(&self, a: &f64, b: &f64) -> bool {
        a < b
    }

    fn conv(&self, s: &str) -> Result<f64, ParseError> {
        match s.trim() {
            "oo" => return Ok(f64::INFINITY),
            "-oo" => return Ok(f64::NEG_INFINITY),
            _ => {}
        }
        s.trim()
            .parse::<f64>()
            .map_err(|e| ParseError::new(Position::start(), format!("'{s}' is not a real literal: {e}")))
    }

    fn print(&self, v: &f64) -> String {
        if v.is_infinite() {
            if *v > 0.0 { "oo".to_string() } else { "-oo".to_string() }
        } else if v.fract() == 0.0 {
            format!("{v:.1}")
        } else {
            v.to_string()
        }
    }

    fn to_json(&self, v: &f64) -> Json {
        Json::Float(*v)
    }

    fn from_json(&self, v: &Json) -> Result<f64, ParseError> {
        match v {
            Json::Float(f) => Ok(*f),
            Json::Int(n) => Ok(*n as f64),
            Json::Str(s) => self.conv(s),
            _ => Err(ParseError::new(Position::start(), "expected a real weight")),
        }
    }

    fn star_status(&self) -> StarStatus {
        StarStatus::AbsVal
    }
}
