use std::fmt;

/// Identifier of a state inside a [`crate::automaton::Automaton`].
///
/// Ids are stable under insertion: once issued, a given id keeps denoting
/// the same state until it is deleted. Deleted ids are not re-issued within
/// the lifetime of the automaton that held them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub u32);

/// Identifier of a transition inside a [`crate::automaton::Automaton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransId(pub u32);

/// Reserved state: sole source of every initial transition.
pub const PRE: StateId = StateId(0);
/// Reserved state: sole destination of every final transition.
pub const POST: StateId = StateId(1);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PRE => write!(f, "pre"),
            POST => write!(f, "post"),
            StateId(n) => write!(f, "{n}"),
        }
    }
}

impl fmt::Display for TransId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TransId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
