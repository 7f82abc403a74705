//! Algorithms (§4.5) over [`crate::automaton::Automaton`] and
//! [`crate::expression::Expression`].

mod accessibility;
mod compose;
mod derived_term;
mod determinize;
mod elimination;
mod enumerate;
mod eval;
mod minimize;
mod product;
mod proper;
mod reduce;
mod scc;
mod standard;
mod thompson;

pub use accessibility::{accessible, coaccessible, trim};
pub use compose::{compose, images, inverse, outsplit, projection};
pub use derived_term::derived_term;
pub use determinize::{determinize, determinize_bounded, is_ambiguous, is_deterministic, is_sequential, ExploreBound};
pub use elimination::{eliminate_states, EliminationStrategy};
pub use enumerate::{enumerate, shortest};
pub use eval::eval;
pub use minimize::{minimize, quotient};
pub use product::{infiltration, product, shuffle};
pub use proper::{proper, ProperDirection};
pub use reduce::{left_reduce, reduce, right_reduce};
pub use scc::{condensation, tarjan_scc};
pub use standard::{is_standard, standard, standard_here};
pub use thompson::{thompson, thompson_compact};
