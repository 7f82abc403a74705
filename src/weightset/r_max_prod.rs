use crate::base::Position;
use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;

use super::{StarStatus, WeightSet};

/// The max-prod semiring over non-negative reals: `add = max`, `mul = *`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RMaxProd;

impl WeightSet for RMaxProd {
    type Value = f64;

    fn name(&self) -> String {
        "R-max-prod".to_string()
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
        a * b
    }

    fn star(&self, a: &f64) -> Result<f64, AwaliError> {
        // max(1, x, x^2, ...) converges to 1 as soon as 0 <= x <= 1.
        if *a >= 0.0 && *a <= 1.0 {
            Ok(1.0)
        } else {
            Err(AwaliError::non_starrable(self.print(a)))
        }
    }

    fn equals(&self, a: &f64, b: &f64) -> bool {
        a == b
    }

    fn less_than(&self, a: &f64, b: &f64) -> bool {
        a < b
    }

    fn conv(&self, s: &str) -> Result<f64, ParseError> {
        s.trim()
            .parse::<f64>()
            .map_err(|e| ParseError::new(Position::start(), format!("'{s}' is not an R-max-prod literal: {e}")))
    }

    fn print(&self, v: &f64) -> String {
        v.to_string()
    }

    fn to_json(&self, v: &f64) -> Json {
        Json::Float(*v)
    }

    fn from_json(&self, v: &Json) -> Result<f64, ParseError> {
        match v {
            Json::Float(f) => Ok(*f),
            Json::Int(n) => Ok(*n as f64),
            Json::Str(s) => self.conv(s),
            _ => Err(ParseError::new(Position::start(), "expected an R-max-prod weight")),
        }
    }

    fn star_status(&self) -> StarStatus {
        StarStatus::AbsVal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn r_max_prod_add_is_max() {
        assert_eq!(RMaxProd.add(&0.5, &0.75), 0.75);
    }

    #[test]
    fn r_max_prod_star_requires_at_most_one() {
        assert_eq!(RMaxProd.star(&0.5), Ok(1.0));
        assert!(RMaxProd.star(&2.0).is_err());
    }
}
