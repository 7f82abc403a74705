//! Crate-wide error types.
//!
//! Every fallible entry point in the engine returns a [`Result<T>`] whose
//! error is an [`AwaliError`]. The six kinds below mirror the error taxonomy
//! the engine has always used: malformed input, operations the context does
//! not support, bad arguments, non-convergent `star`, semiring-specific
//! domain errors, and visitors reaching an operator they don't implement.

use std::fmt;

use crate::base::Position;

/// One segment of a JSON error path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, ".{k}"),
            PathSegment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// A malformed-input error: textual weight/label/expression syntax, or JSON.
///
/// `path` is populated by the JSON parser (a sequence of object keys and
/// array indices pinpointing the failing node) and left empty by the other
/// textual parsers, which only have a position to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub position: Position,
    pub reason: String,
    pub path: Vec<PathSegment>,
}

impl ParseError {
    pub fn new(position: Position, reason: impl Into<String>) -> Self {
        Self { position, reason: reason.into(), path: Vec::new() }
    }

    pub fn with_path(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    pub fn push_path(&mut self, segment: PathSegment) {
        self.path.insert(0, segment);
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.reason)?;
        if !self.path.is_empty() {
            write!(f, " (at $")?;
            for seg in &self.path {
                write!(f, "{seg}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// The engine's unified error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AwaliError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Operation not defined for this labelset/weightset, e.g. `determinize`
    /// on a wordset, or `star` on a non-zero value of Z.
    #[error("unsupported operation `{op}` in context `{context}`")]
    UnsupportedInContext { op: String, context: String },

    /// Unknown state/transition id, duplicate `new_transition`, negative
    /// exponent, empty sum/product, and the like.
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument { field: String, reason: String },

    /// `star` invoked on a value whose series does not converge.
    #[error("value `{value}` is not starrable in this semiring")]
    NonStarrable { value: String },

    /// Semiring-specific failure: division by zero, zero denominator in Q,
    /// a letter outside the declared strict alphabet.
    #[error("domain error: {reason}")]
    DomainError { reason: String },

    /// A visitor reached an operator it does not implement, e.g.
    /// `complement` while building a standard automaton.
    #[error("operator `{operator}` is not implemented by `{algorithm}`")]
    NotImplemented { operator: String, algorithm: String },
}

impl AwaliError {
    pub fn unsupported(op: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnsupportedInContext { op: op.into(), context: context.into() }
    }

    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument { field: field.into(), reason: reason.into() }
    }

    pub fn non_starrable(value: impl Into<String>) -> Self {
        Self::NonStarrable { value: value.into() }
    }

    pub fn domain(reason: impl Into<String>) -> Self {
        Self::DomainError { reason: reason.into() }
    }

    pub fn not_implemented(operator: impl Into<String>, algorithm: impl Into<String>) -> Self {
        Self::NotImplemented { operator: operator.into(), algorithm: algorithm.into() }
    }
}

pub type Result<T> = std::result::Result<T, AwaliError>;
