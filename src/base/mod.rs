//! Foundation types shared by every layer of the engine.
//!
//! This module has NO dependencies on other crate modules: everything above
//! it (weightsets, labelsets, contexts, automata, expressions, algorithms)
//! is built in terms of the identifiers and positions defined here.

mod ids;
mod position;

pub use ids::{StateId, TransId, POST, PRE};
pub use position::{Position, Span};
