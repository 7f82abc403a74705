//! Label-set abstraction (§4.2): the monoid of transition labels.
//!
//! `pre`/`post`'s special marker and epsilon are NOT part of a labelset's
//! own value domain; they are carried by [`crate::automaton::Label`], the
//! wrapper every automaton actually stores. A labelset only ever describes
//! its *ordinary* letters/words/tuples/expressions, which keeps each
//! concrete labelset's `Value` type free of sentinels it doesn't own.

mod expressionset;
mod letterset;
mod nullableset;
mod oneset;
mod tupleset;
mod wordset;

pub use expressionset::ExpressionSet;
pub use letterset::LetterSet;
pub use nullableset::NullableSet;
pub use oneset::OneSet;
pub use tupleset::TupleSet;
pub use wordset::WordSet;

use crate::base::Position;
use crate::error::ParseError;
use crate::json::Value as Json;

/// The `labelKind` discriminant used by the JSON format and by context kind
/// flags (`is_lal`, `is_lan`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Letters,
    Words,
    NoLabel,
    MultiTape,
    Expressions,
}

/// A monoid of transition labels.
pub trait LabelSet: Clone + std::fmt::Debug {
    type Value: Clone + std::fmt::Debug + PartialEq + Eq + std::hash::Hash + Ord;

    fn kind(&self) -> LabelKind;

    /// Whether this labelset admits epsilon (`one`) transitions at all.
    fn has_one(&self) -> bool;

    /// A free monoid has no two-letter composition: letter-indexed data
    /// structures are valid (letterset, nullableset, wordset, oneset).
    fn is_free(&self) -> bool;

    /// Parse one label value from `input` starting at `*pos`, advancing
    /// `*pos` past what was consumed. `strict_alphabet` rejects letters
    /// outside the declared alphabet instead of silently accepting them.
    fn conv(&self, input: &str, pos: &mut Position, strict_alphabet: bool) -> Result<Self::Value, ParseError>;

    fn print(&self, v: &Self::Value) -> String;

    fn to_json(&self, v: &Self::Value) -> Json;
    fn from_json(&self, v: &Json) -> Result<Self::Value, ParseError>;

    /// The finite set of label values transition-iterating algorithms
    /// (determinize, derived-term, Hopcroft) should try. Empty unless
    /// `is_free()` (letterset/wordset/nullableset/tupleset of such).
    fn alphabet(&self) -> Vec<Self::Value> {
        Vec::new()
    }

    /// Involution used by `transposition` (reverses words/tuples of letters).
    fn transpose(&self, v: &Self::Value) -> Self::Value {
        v.clone()
    }

    fn name(&self) -> String;
}

pub(crate) fn parse_error(pos: Position, reason: impl Into<String>) -> ParseError {
    ParseError::new(pos, reason.into())
}

const KIND_CHAIN: [LabelKind; 4] = [LabelKind::NoLabel, LabelKind::Letters, LabelKind::Words, LabelKind::Expressions];

/// The minimal common super-labelset-kind of two label kinds, e.g.
/// `join(NoLabel, Letters) == Some(Letters)`. `MultiTape` isn't part of the
/// chain: it only joins with itself.
///
/// Mirrors [`crate::weightset::join`]'s role for semirings: a property of
/// the labelset-kind lattice, used by the (out-of-scope) dynamic facade
/// when combining automata with heterogeneous label kinds. The
/// statically-typed algorithms in this crate operate within a single
/// `LabelSet` type and never need to call it themselves.
pub fn join(a: LabelKind, b: LabelKind) -> Option<LabelKind> {
    if a == b {
        return Some(a);
    }
    let rank = |k: LabelKind| KIND_CHAIN.iter().position(|&c| c == k);
    match (rank(a), rank(b)) {
        (Some(ra), Some(rb)) => Some(KIND_CHAIN[ra.max(rb)]),
        _ => None,
    }
}

/// The maximal common sub-labelset-kind of two label kinds, dual to
/// [`join`].
pub fn meet(a: LabelKind, b: LabelKind) -> Option<LabelKind> {
    if a == b {
        return Some(a);
    }
    let rank = |k: LabelKind| KIND_CHAIN.iter().position(|&c| c == k);
    match (rank(a), rank(b)) {
        (Some(ra), Some(rb)) => Some(KIND_CHAIN[ra.min(rb)]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_picks_minimal_super_kind() {
        assert_eq!(join(LabelKind::NoLabel, LabelKind::Letters), Some(LabelKind::Letters));
        assert_eq!(join(LabelKind::Letters, LabelKind::Words), Some(LabelKind::Words));
        assert_eq!(join(LabelKind::Words, LabelKind::Expressions), Some(LabelKind::Expressions));
        assert_eq!(join(LabelKind::MultiTape, LabelKind::Letters), None);
    }

    #[test]
    fn meet_picks_maximal_sub_kind() {
        assert_eq!(meet(LabelKind::Letters, LabelKind::Words), Some(LabelKind::Letters));
        assert_eq!(meet(LabelKind::NoLabel, LabelKind::Expressions), Some(LabelKind::NoLabel));
        assert_eq!(meet(LabelKind::MultiTape, LabelKind::Words), None);
    }
}
