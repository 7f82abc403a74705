use rustc_hash::FxHashMap;

use crate::base::StateId;
use crate::context::Context;
use crate::expression::Expression;
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

/// What produced each state of a derived automaton (§4.3).
enum Entry<L: LabelSet, W: WeightSet> {
    /// `standard_here`, `accessible`/`coaccessible`/`trim`: one parent state.
    Single(StateId),
    /// Quotients: SCC condensation, minimization.
    Partition(Vec<StateId>),
    /// Product, shuffle, infiltration.
    Pair(StateId, StateId),
    /// n-ary composition.
    Tuple(Vec<StateId>),
    /// Thompson: a free-form tag.
    Str(String),
    /// Derived-term automaton: the expression this state denotes.
    RatExp(Expression<L, W>),
}

/// Attaches a provenance record to the states of a derived automaton.
pub struct History<L: LabelSet, W: WeightSet> {
    entries: FxHashMap<StateId, Entry<L, W>>,
}

impl<L: LabelSet, W: WeightSet> History<L, W> {
    pub fn new() -> Self {
        Self { entries: FxHashMap::default() }
    }

    pub fn has(&self, s: StateId) -> bool {
        self.entries.contains_key(&s)
    }

    pub fn set_single(&mut self, s: StateId, parent: StateId) {
        self.entries.insert(s, Entry::Single(parent));
    }

    pub fn set_partition(&mut self, s: StateId, parents: Vec<StateId>) {
        self.entries.insert(s, Entry::Partition(parents));
    }

    pub fn set_pair(&mut self, s: StateId, a: StateId, b: StateId) {
        self.entries.insert(s, Entry::Pair(a, b));
    }

    pub fn set_tuple(&mut self, s: StateId, parents: Vec<StateId>) {
        self.entries.insert(s, Entry::Tuple(parents));
    }

    pub fn set_string(&mut self, s: StateId, tag: impl Into<String>) {
        self.entries.insert(s, Entry::Str(tag.into()));
    }

    pub fn set_ratexp(&mut self, s: StateId, expr: Expression<L, W>) {
        self.entries.insert(s, Entry::RatExp(expr));
    }

    pub fn single_of(&self, s: StateId) -> Option<StateId> {
        match self.entries.get(&s) {
            Some(Entry::Single(p)) => Some(*p),
            _ => None,
        }
    }

    pub fn pair_of(&self, s: StateId) -> Option<(StateId, StateId)> {
        match self.entries.get(&s) {
            Some(Entry::Pair(a, b)) => Some((*a, *b)),
            _ => None,
        }
    }

    pub fn partition_of(&self, s: StateId) -> Option<&[StateId]> {
        match self.entries.get(&s) {
            Some(Entry::Partition(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn ratexp_of(&self, s: StateId) -> Option<&Expression<L, W>> {
        match self.entries.get(&s) {
            Some(Entry::RatExp(e)) => Some(e),
            _ => None,
        }
    }

    pub fn describe(&self, s: StateId) -> String {
        match self.entries.get(&s) {
            None => String::new(),
            Some(Entry::Single(p)) => format!("{p}"),
            Some(Entry::Partition(v)) => format!("{{{}}}", v.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ")),
            Some(Entry::Pair(a, b)) => format!("({a}, {b})"),
            Some(Entry::Tuple(v)) => format!("({})", v.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ")),
            Some(Entry::Str(s)) => s.clone(),
            Some(Entry::RatExp(_)) => "<ratexp>".to_string(),
        }
    }

    /// Renders a state's description using the originating context's
    /// labelset/weightset printers, for the `ratexp` history kind.
    pub fn describe_with_context(&self, s: StateId, ctx: &Context<L, W>) -> String {
        match self.entries.get(&s) {
            Some(Entry::RatExp(e)) => crate::expression::print(ctx, e),
            _ => self.describe(s),
        }
    }
}

impl<L: LabelSet, W: WeightSet> Default for History<L, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LabelSet, W: WeightSet> std::fmt::Debug for History<L, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "History({} entries)", self.entries.len())
    }
}

impl<L: LabelSet, W: WeightSet> Clone for History<L, W> {
    fn clone(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(k, v)| {
                let v = match v {
                    Entry::Single(p) => Entry::Single(*p),
                    Entry::Partition(v) => Entry::Partition(v.clone()),
                    Entry::Pair(a, b) => Entry::Pair(*a, *b),
                    Entry::Tuple(v) => Entry::Tuple(v.clone()),
                    Entry::Str(s) => Entry::Str(s.clone()),
                    Entry::RatExp(e) => Entry::RatExp(e.clone()),
                };
                (*k, v)
            })
            .collect();
        History { entries }
    }
}
