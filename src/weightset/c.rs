use crate::base::Position;
use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;

use super::{StarStatus, WeightSet};

/// A complex number with `f64` components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    fn abs(&self) -> f64 {
        self.re.hypot(self.im)
    }
}

impl std::ops::Add for Complex {
    type Output = Complex;
    fn add(self, o: Complex) -> Complex {
        Complex::new(self.re + o.re, self.im + o.im)
    }
}

impl std::ops::Sub for Complex {
    type Output = Complex;
    fn sub(self, o: Complex) -> Complex {
        Complex::new(self.re - o.re, self.im - o.im)
    }
}

impl std::ops::Mul for Complex {
    type Output = Complex;
    fn mul(self, o: Complex) -> Complex {
        Complex::new(self.re * o.re - self.im * o.im, self.re * o.im + self.im * o.re)
    }
}

impl std::ops::Div for Complex {
    type Output = Complex;
    fn div(self, o: Complex) -> Complex {
        let d = o.re * o.re + o.im * o.im;
        Complex::new((self.re * o.re + self.im * o.im) / d, (self.im * o.re - self.re * o.im) / d)
    }
}

/// The field of complex numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct C;

impl WeightSet for C {
    type Value = Complex;

    fn name(&self) -> String {
        "C".to_string()
    }

    fn zero(&self) -> Complex {
        Complex::new(0.0, 0.0)
    }

    fn one(&self) -> Complex {
        Complex::new(1.0, 0.0)
    }

    fn add(&self, a: &Complex, b: &Complex) -> Complex {
        *a + *b
    }

    fn mul(&self, a: &Complex, b: &Complex) -> Complex {
        *a * *b
    }

    fn sub(&self, a: &Complex, b: &Complex) -> Option<Complex> {
        Some(*a - *b)
    }

    fn div(&self, a: &Complex, b: &Complex) -> Option<Complex> {
        if b.re == 0.0 && b.im == 0.0 {
            return None;
        }
        Some(*a / *b)
    }

    fn star(&self, a: &Complex) -> Result<Complex, AwaliError> {
        if a.abs() >= 1.0 {
            return Err(AwaliError::non_starrable(self.print(a)));
        }
        Ok(self.one() / (self.one() - *a))
    }

    fn equals(&self, a: &Complex, b: &Complex) -> bool {
        a == b
    }

    fn less_than(&self, a: &Complex, b: &Complex) -> bool {
        a.abs() < b.abs()
    }

    fn conv(&self, s: &str) -> Result<Complex, ParseError> {
        let s = s.trim();
        if let Some(stripped) = s.strip_suffix('i') {
            if let Some(plus) = stripped.rfind(['+', '-']).filter(|&i| i > 0) {
                let (re_s, im_s) = stripped.split_at(plus);
                let re: f64 = re_s.trim().parse().map_err(|_| {
                    ParseError::new(Position::start(), format!("'{s}' is not a complex literal"))
                })?;
                let im: f64 = im_s.trim().parse().map_err(|_| {
                    ParseError::new(Position::start(), format!("'{s}' is not a complex literal"))
                })?;
                return Ok(Complex::new(re, im));
            }
            let im: f64 = stripped
                .parse()
                .map_err(|_| ParseError::new(Position::start(), format!("'{s}' is not a complex literal")))?;
            return Ok(Complex::new(0.0, im));
        }
        s.parse::<f64>()
            .map(|re| Complex::new(re, 0.0))
            .map_err(|e| ParseError::new(Position::start(), format!("'{s}' is not a complex literal: {e}")))
    }

    fn print(&self, v: &Complex) -> String {
        if v.im == 0.0 {
            format!("{}", v.re)
        } else if v.im >= 0.0 {
            format!("{}+{}i", v.re, v.im)
        } else {
            format!("{}{}i", v.re, v.im)
        }
    }

    fn to_json(&self, v: &Complex) -> Json {
        Json::Array(vec![Json::Float(v.re), Json::Float(v.im)])
    }

    fn from_json(&self, v: &Json) -> Result<Complex, ParseError> {
        match v {
            Json::Array(items) if items.len() == 2 => {
                let re = items[0]
                    .as_f64()
                    .ok_or_else(|| ParseError::new(Position::start(), "expected real part"))?;
                let im = items[1]
                    .as_f64()
                    .ok_or_else(|| ParseError::new(Position::start(), "expected imaginary part"))?;
                Ok(Complex::new(re, im))
            }
            Json::Int(n) => Ok(Complex::new(*n as f64, 0.0)),
            Json::Float(f) => Ok(Complex::new(*f, 0.0)),
            Json::Str(s) => self.conv(s),
            _ => Err(ParseError::new(Position::start(), "expected a complex weight")),
        }
    }

    fn star_status(&self) -> StarStatus {
        StarStatus::AbsVal
    }
}
