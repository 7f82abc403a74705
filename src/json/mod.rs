//! JSON: the engine's public interchange format (see [`schema`]).
//!
//! Three layers: [`value`] is the hand-rolled JSON AST (`null`, bool,
//! number, string, array, object); [`parser`] turns text into a [`Value`];
//! [`printer`] turns a [`Value`] back into width-aware, pretty-printed text.
//! [`schema`] sits above all three and knows the shape of an Awali
//! automaton/expression file.

pub mod parser;
pub mod printer;
pub mod schema;
pub mod value;

pub use parser::{parse, parse_early_stop_after_metadata};
pub use printer::{print, print_default};
pub use value::Value;

use crate::error::{ParseError, PathSegment};

/// Annotate a `ParseError` coming from a nested field with the key that
/// leads to it, building up a path as the error propagates outward.
pub fn at_key<T>(result: Result<T, ParseError>, key: &str) -> Result<T, ParseError> {
    result.map_err(|mut e| {
        e.push_path(PathSegment::Key(key.to_string()));
        e
    })
}

pub fn at_index<T>(result: Result<T, ParseError>, index: usize) -> Result<T, ParseError> {
    result.map_err(|mut e| {
        e.push_path(PathSegment::Index(index));
        e
    })
}

/// Fetch a mandatory field, producing a `ParseError` if absent.
pub fn require_field<'a>(obj: &'a Value, key: &str) -> Result<&'a Value, ParseError> {
    obj.get(key)
        .ok_or_else(|| ParseError::new(crate::base::Position::start(), format!("missing field `{key}`")))
}
