use std::collections::BTreeSet;

use crate::base::Position;
use crate::error::ParseError;
use crate::json::Value as Json;

use super::{LabelKind, LabelSet};

/// The free monoid generated by an alphabet, with labels being whole words
/// (`LAW` context: "labels are words"). The empty word is `one`, distinct
/// from the absence of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSet {
    alphabet: BTreeSet<char>,
}

impl WordSet {
    pub fn new(alphabet: impl IntoIterator<Item = char>) -> Self {
        Self { alphabet: alphabet.into_iter().collect() }
    }

    pub fn alphabet(&self) -> impl Iterator<Item = char> + '_ {
        self.alphabet.iter().copied()
    }
}

impl LabelSet for WordSet {
    type Value = String;

    fn kind(&self) -> LabelKind {
        LabelKind::Words
    }

    fn has_one(&self) -> bool {
        true
    }

    fn is_free(&self) -> bool {
        true
    }

    fn conv(&self, input: &str, pos: &mut Position, strict_alphabet: bool) -> Result<String, ParseError> {
        let rest = &input[pos.offset..];
        let word: String = rest
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != '+' && *c != '.' && *c != '*' && *c != '(' && *c != ')')
            .collect();
        if strict_alphabet {
            if let Some(bad) = word.chars().find(|c| !self.alphabet.contains(c)) {
                return Err(ParseError::new(*pos, format!("letter '{bad}' is not in the alphabet")));
            }
        }
        for c in word.chars() {
            pos.advance(c);
        }
        Ok(word)
    }

    /// The length-1 words, one per alphabet letter — the unit `determinize`
    /// and `derived_term` iterate over; whole-word labels beyond length 1
    /// only ever appear as literal transition labels, never as derivation
    /// steps.
    fn alphabet(&self) -> Vec<String> {
        self.alphabet.iter().map(|c| c.to_string()).collect()
    }

    fn print(&self, v: &String) -> String {
        v.clone()
    }

    fn to_json(&self, v: &String) -> Json {
        Json::str(v.clone())
    }

    fn from_json(&self, v: &Json) -> Result<String, ParseError> {
        v.as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ParseError::new(Position::start(), "expected a word string"))
    }

    fn transpose(&self, v: &String) -> String {
        v.chars().rev().collect()
    }

    fn name(&self) -> String {
        "Words".to_string()
    }
}
