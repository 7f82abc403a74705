//! Semiring abstraction (§4.1) and the concrete semirings built on it.
//!
//! A [`WeightSet`] is a value type plus `zero`/`one`/`add`/`mul`/`star` and
//! the supporting machinery (equality, ordering, parse/print, JSON codec)
//! needed to use it as the weight algebra of an automaton or expression.

mod b;
mod bounded;
mod c;
mod cyclic;
mod f2;
mod fuzzy;
mod n;
mod q;
mod r;
mod r_max_prod;
mod tropical;
mod tuple;
mod z;

pub use b::B;
pub use bounded::Bounded;
pub use c::{Complex, C};
pub use cyclic::Cyclic;
pub use f2::F2;
pub use fuzzy::Fuzzy;
pub use n::N;
pub use q::Q;
pub use r::R;
pub use r_max_prod::RMaxProd;
pub use tropical::{ZMaxPlus, ZMinPlus};
pub use tuple::TupleWeightSet;
pub use z::Z;

use crate::error::{AwaliError, ParseError};
use crate::json::Value as Json;

/// How `star` behaves on a given semiring, independently of any particular
/// value (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarStatus {
    /// `star` is defined for every value (e.g. B, Fuzzy).
    Starrable,
    /// `star` is defined only for select values (e.g. Z: only for zero).
    NonStarrable,
    /// `star` is defined via an absolute-value convergence criterion (e.g.
    /// Q, R, C: `|x| < 1`).
    AbsVal,
    /// `star` is defined via a sign criterion in a tropical semiring.
    Tops,
}

/// A semiring from which transition and expression weights are drawn.
pub trait WeightSet: Clone + std::fmt::Debug {
    type Value: Clone + std::fmt::Debug;

    /// Name used in the JSON `"semiring"` field and by `join`.
    fn name(&self) -> String;

    fn zero(&self) -> Self::Value;
    fn one(&self) -> Self::Value;
    fn add(&self, a: &Self::Value, b: &Self::Value) -> Self::Value;
    fn mul(&self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// Defined when the semiring has a compatible group structure (Z, Q, R, C).
    fn sub(&self, _a: &Self::Value, _b: &Self::Value) -> Option<Self::Value> {
        None
    }

    fn star(&self, a: &Self::Value) -> Result<Self::Value, AwaliError>;

    /// Defined when the semiring is a field (Q, R, C). Used by
    /// [`crate::algo::reduce`]'s linear-algebra reduction to normalize
    /// pivots; `None` for everything else, including Z.
    fn div(&self, _a: &Self::Value, _b: &Self::Value) -> Option<Self::Value> {
        None
    }

    fn equals(&self, a: &Self::Value, b: &Self::Value) -> bool;
    fn less_than(&self, a: &Self::Value, b: &Self::Value) -> bool;

    fn is_zero(&self, a: &Self::Value) -> bool {
        self.equals(a, &self.zero())
    }

    fn is_one(&self, a: &Self::Value) -> bool {
        self.equals(a, &self.one())
    }

    fn conv(&self, s: &str) -> Result<Self::Value, ParseError>;
    fn print(&self, v: &Self::Value) -> String;

    fn to_json(&self, v: &Self::Value) -> Json;
    fn from_json(&self, v: &Json) -> Result<Self::Value, ParseError>;

    fn is_commutative_semiring(&self) -> bool {
        true
    }

    /// Whether a unit weight is rendered at all (B and F2 never show it).
    fn show_one(&self) -> bool {
        true
    }

    fn star_status(&self) -> StarStatus;
}

/// The minimal common super-semiring of two named semirings, e.g.
/// `join("B", "Z") == Some("Z")`, `join("Q", "C") == Some("C")`.
///
/// This is a property of the semiring *lattice*, used by the (out-of-scope)
/// dynamic facade when it has to combine automata over two different
/// concrete weightsets into a common one before running a binary algorithm.
/// The statically-typed algorithms in this crate operate within a single
/// `WeightSet` type and never need to call it themselves.
pub fn join(a: &str, b: &str) -> Option<&'static str> {
    const CHAIN: &[&str] = &["B", "F2", "N", "Z", "Q", "R", "C"];
    if a == b {
        return Some(CHAIN.iter().find(|&&n| n == a).copied().unwrap_or("B"));
    }
    let rank = |n: &str| CHAIN.iter().position(|&c| c == n);
    match (rank(a), rank(b)) {
        (Some(ra), Some(rb)) => Some(CHAIN[ra.max(rb)]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_picks_minimal_super_semiring() {
        assert_eq!(join("B", "Z"), Some("Z"));
        assert_eq!(join("Z", "Q"), Some("Q"));
        assert_eq!(join("Q", "C"), Some("C"));
        assert_eq!(join("B", "C"), Some("C"));
        assert_eq!(join("Z", "Z"), Some("Z"));
    }
}
