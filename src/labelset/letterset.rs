use std::collections::BTreeSet;

use crate::base::Position;
use crate::error::ParseError;
use crate::json::Value as Json;

use super::{LabelKind, LabelSet};

/// The free monoid generated by a finite alphabet of single characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterSet {
    alphabet: BTreeSet<char>,
}

impl LetterSet {
    pub fn new(alphabet: impl IntoIterator<Item = char>) -> Self {
        Self { alphabet: alphabet.into_iter().collect() }
    }

    pub fn alphabet(&self) -> impl Iterator<Item = char> + '_ {
        self.alphabet.iter().copied()
    }

    pub fn contains(&self, c: char) -> bool {
        self.alphabet.contains(&c)
    }
}

impl LabelSet for LetterSet {
    type Value = char;

    fn kind(&self) -> LabelKind {
        LabelKind::Letters
    }

    fn has_one(&self) -> bool {
        false
    }

    fn is_free(&self) -> bool {
        true
    }

    fn conv(&self, input: &str, pos: &mut Position, strict_alphabet: bool) -> Result<char, ParseError> {
        let c = input[pos.offset..]
            .chars()
            .next()
            .ok_or_else(|| ParseError::new(*pos, "expected a letter, found end of input"))?;
        if strict_alphabet && !self.alphabet.contains(&c) {
            return Err(ParseError::new(*pos, format!("letter '{c}' is not in the alphabet")));
        }
        pos.advance(c);
        Ok(c)
    }

    fn alphabet(&self) -> Vec<char> {
        self.alphabet.iter().copied().collect()
    }

    fn print(&self, v: &char) -> String {
        v.to_string()
    }

    fn to_json(&self, v: &char) -> Json {
        Json::str(v.to_string())
    }

    fn from_json(&self, v: &Json) -> Result<char, ParseError> {
        let s = v
            .as_str()
            .ok_or_else(|| ParseError::new(Position::start(), "expected a one-character letter string"))?;
        let mut chars = s.chars();
        let c = chars
            .next()
            .ok_or_else(|| ParseError::new(Position::start(), "empty letter string"))?;
        if chars.next().is_some() {
            return Err(ParseError::new(Position::start(), format!("'{s}' is not a single letter")));
        }
        Ok(c)
    }

    fn name(&self) -> String {
        "Letters".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conv_rejects_letter_outside_alphabet() {
        let ls = LetterSet::new(['a', 'b']);
        let mut pos = Position::start();
        assert!(ls.conv("c", &mut pos, true).is_err());
        let mut pos = Position::start();
        assert!(ls.conv("c", &mut pos, false).is_ok());
    }

    #[test]
    fn json_round_trip() {
        let ls = LetterSet::new(['a', 'b']);
        let json = ls.to_json(&'a');
        assert_eq!(ls.from_json(&json).unwrap(), 'a');
    }
}
