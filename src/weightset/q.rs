use num_rational::Ratio;

use crate::base::Position;
use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;

use super::{StarStatus, WeightSet};

/// The field of rational numbers, represented exactly as `i64/i64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Q;

pub type Rational = Ratio<i64>;

impl WeightSet for Q {
    type Value = Rational;

    fn name(&self) -> String {
        "Q".to_string()
    }

    fn zero(&self) -> Rational {
        Ratio::new_raw(0, 1)
    }

    fn one(&self) -> Rational {
        Ratio::new_raw(1, 1)
    }

    fn add(&self, a: &Rational, b: &Rational) -> Rational {
        a + b
    }

    fn mul(&self, a: &Rational, b: &Rational) -> Rational {
        a * b
    }

    fn sub(&self, a: &Rational, b: &Rational) -> Option<Rational> {
        Some(a - b)
    }

    fn div(&self, a: &Rational, b: &Rational) -> Option<Rational> {
        if b.numer() == &0 {
            return None;
        }
        Some(a / b)
    }

    fn star(&self, a: &Rational) -> Result<Rational, AwaliError> {
        // 1 + x + x^2 + ... = 1 / (1 - x), defined only when |x| < 1.
        let one = self.one();
        if *a <= -one || *a >= one {
            return Err(AwaliError::non_starrable(self.print(a)));
        }
        Ok(one / (one - *a))
    }

    fn equals(&self, a: &Rational, b: &Rational) -> bool {
        a == b
    }

    fn less_than(&self, a: &Rational, b: &Rational) -> bool {
        a < b
    }

    fn conv(&self, s: &str) -> Result<Rational, ParseError> {
        let s = s.trim();
        if let Some((num, den)) = s.split_once('/') {
            let n: i64 = num.trim().parse().map_err(|_| {
                ParseError::new(Position::start(), format!("'{s}' is not a rational literal"))
            })?;
            let d: i64 = den.trim().parse().map_err(|_| {
                ParseError::new(Position::start(), format!("'{s}' is not a rational literal"))
            })?;
            if d == 0 {
                return Err(ParseError::new(Position::start(), "zero denominator in rational literal"));
            }
            return Ok(Ratio::new(n, d));
        }
        if let Some(dot) = s.find('.') {
            let int_part: i64 = s[..dot].parse().unwrap_or(0);
            let frac_str = &s[dot + 1..];
            let frac_len = frac_str.len() as u32;
            let frac_part: i64 = frac_str.parse().map_err(|_| {
                ParseError::new(Position::start(), format!("'{s}' is not a decimal literal"))
            })?;
            let den = 10i64.pow(frac_len);
            let sign = if s.starts_with('-') { -1 } else { 1 };
            return Ok(Ratio::new(int_part * den + sign * frac_part, den));
        }
        s.parse::<i64>()
            .map(|n| Ratio::new(n, 1))
            .map_err(|e| ParseError::new(Position::start(), format!("'{s}' is not a rational literal: {e}")))
    }

    fn print(&self, v: &Rational) -> String {
        if *v.denom() == 1 {
            v.numer().to_string()
        } else {
            format!("{}/{}", v.numer(), v.denom())
        }
    }

    fn to_json(&self, v: &Rational) -> Json {
        if *v.denom() == 1 {
            Json::Int(*v.numer())
        } else {
            Json::Array(vec![Json::Int(*v.numer()), Json::Int(*v.denom())])
        }
    }

    fn from_json(&self, v: &Json) -> Result<Rational, ParseError> {
        match v {
            Json::Int(n) => Ok(Ratio::new(*n, 1)),
            Json::Str(s) => self.conv(s),
            Json::Array(items) if items.len() == 2 => {
                let n = items[0]
                    .as_i64()
                    .ok_or_else(|| ParseError::new(Position::start(), "expected integer numerator"))?;
                let d = items[1]
                    .as_i64()
                    .ok_or_else(|| ParseError::new(Position::start(), "expected integer denominator"))?;
                if d == 0 {
                    return Err(ParseError::new(Position::start(), "zero denominator in rational weight"));
                }
                Ok(Ratio::new(n, d))
            }
            _ => Err(ParseError::new(Position::start(), "expected a rational weight")),
        }
    }

    fn star_status(&self) -> StarStatus {
        StarStatus::AbsVal
    }
}
