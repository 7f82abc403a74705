use crate::base::Position;
use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;

use super::{StarStatus, WeightSet};

/// The ring `Z/nZ` ("Cyclic" in the JSON format), `n >= 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cyclic {
    pub modulus: u64,
}

impl Cyclic {
    pub fn new(modulus: u64) -> Self {
        assert!(modulus >= 2, "Cyclic modulus must be >= 2");
        Self { modulus }
    }

    fn reduce(&self, v: i64) -> u64 {
        v.rem_euclid(self.modulus as i64) as u64
    }
}

impl WeightSet for Cyclic {
    type Value = u64;

    fn name(&self) -> String {
        format!("Z/{}Z", self.modulus)
    }

    fn zero(&self) -> u64 {
        0
    }

    fn one(&self) -> u64 {
        1 % self.modulus
    }

    fn add(&self, a: &u64, b: &u64) -> u64 {
        (a + b) % self.modulus
    }

    fn mul(&self, a: &u64, b: &u64) -> u64 {
        (a * b) % self.modulus
    }

    fn sub(&self, a: &u64, b: &u64) -> Option<u64> {
        Some(self.reduce(*a as i64 - *b as i64))
    }

    fn star(&self, a: &u64) -> Result<u64, AwaliError> {
        if *a == 0 {
            Ok(self.one())
        } else {
            Err(AwaliError::non_starrable(self.print(a)))
        }
    }

    fn equals(&self, a: &u64, b: &u64) -> bool {
        a == b
    }

    fn less_than(&self, a: &u64, b: &u64) -> bool {
        a < b
    }

    fn conv(&self, s: &str) -> Result<u64, ParseError> {
        let n: i64 = s
            .trim()
            .parse()
            .map_err(|e| ParseError::new(Position::start(), format!("'{s}' is not an integer: {e}")))?;
        Ok(self.reduce(n))
    }

    fn print(&self, v: &u64) -> String {
        v.to_string()
    }

    fn to_json(&self, v: &u64) -> Json {
        Json::Int(*v as i64)
    }

    fn from_json(&self, v: &Json) -> Result<u64, ParseError> {
        match v {
            Json::Int(n) => Ok(self.reduce(*n)),
            Json::Str(s) => self.conv(s),
            _ => Err(ParseError::new(Position::start(), "expected a cyclic weight")),
        }
    }

    fn star_status(&self) -> StarStatus {
        StarStatus::NonStarrable
    }
}
