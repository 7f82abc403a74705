//! # awali
//!
//! A weighted finite automata, transducer, and rational expression engine
//! over arbitrary semirings.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! algo       → determinize, minimize, product, compose, standard, ...
//!   ↓
//! expression → rational expression DAG, visitor, constant term
//!   ↓
//! automaton  → mutable automaton, history, labels
//!   ↓
//! context    → (labelset, weightset) pair, kind flags
//!   ↓
//! labelset   → letters, words, nullable, one, tuple, expression labels
//! weightset  → B, N, Z, Q, R, C, F2, tropical, R-max-prod, fuzzy, tuple, ratexpset
//!   ↓
//! json       → interchange format (parser, printer, schema)
//! error      → ParseError, AwaliError
//! base       → StateId/TransId, Position/Span
//! ```

/// Foundation types: StateId/TransId, Position/Span.
pub mod base;

/// Error types: `ParseError`, `AwaliError`.
pub mod error;

/// JSON interchange format: value AST, parser, printer, file schema.
pub mod json;

/// Semiring (weightset) abstraction and concrete semirings.
pub mod weightset;

/// Label-set abstraction and concrete labelsets.
pub mod labelset;

/// Context: a (labelset, weightset) pair.
pub mod context;

/// Mutable automaton: states, transitions, history.
pub mod automaton;

/// Rational expression DAG, visitor protocol, constant term.
pub mod expression;

/// Algorithms over automata and expressions.
pub mod algo;

pub use base::{Position, Span, StateId, TransId};
pub use context::Context;
pub use error::{AwaliError, ParseError};
