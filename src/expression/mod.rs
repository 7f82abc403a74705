//! Rational expression algebra (§4.4): a shared, immutable DAG of
//! expression nodes, its ratexpset constructor, parser, and printer.

mod constant_term;
mod node;
pub(crate) mod parser;
pub(crate) mod printer;
mod ratexpset;
mod visitor;

pub use constant_term::constant_term;
pub use node::{Expression, ExpKind, Identities};
pub use parser::parse;
pub use printer::print;
pub use ratexpset::RatExpSet;
pub use visitor::Visitor;
