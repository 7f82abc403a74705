//! Mutable automaton (§3, §4.3): states, transitions, and the indices
//! algorithms walk.

mod history;
mod label;

pub use history::History;
pub use label::Label;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;

use crate::base::{StateId, TransId, PRE, POST};
use crate::context::Context;
use crate::error::{AwaliError, Result};
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

#[derive(Debug, Clone)]
struct TransitionData<V, K> {
    src: StateId,
    dst: StateId,
    label: Label<V>,
    weight: K,
}

/// A mutable weighted automaton over `Context<L, W>`.
///
/// States `pre` (id 0) and `post` (id 1) are always present and reserved:
/// `pre`'s outgoing transitions are the initial function, `post`'s incoming
/// transitions are the final function, both carrying [`Label::PrePost`].
#[derive(Debug, Clone)]
pub struct Automaton<L: LabelSet, W: WeightSet> {
    context: Context<L, W>,
    states: IndexSet<StateId>,
    next_state: u32,
    transitions: IndexMap<TransId, TransitionData<L::Value, W::Value>>,
    next_trans: u32,
    out: FxHashMap<StateId, Vec<TransId>>,
    inn: FxHashMap<StateId, Vec<TransId>>,
    /// Fast lookup by `(src, dst, label)`, maintained only when the
    /// labelset is free; otherwise callers fall back to scanning `out[s]`.
    by_src_dst_label: FxHashMap<(StateId, StateId, Label<L::Value>), TransId>,
    state_names: FxHashMap<StateId, String>,
    history: Option<History<L, W>>,
}

impl<L: LabelSet, W: WeightSet> Automaton<L, W> {
    pub fn new(context: Context<L, W>) -> Self {
        let mut states = IndexSet::new();
        states.insert(PRE);
        states.insert(POST);
        let mut out = FxHashMap::default();
        let mut inn = FxHashMap::default();
        out.insert(PRE, Vec::new());
        out.insert(POST, Vec::new());
        inn.insert(PRE, Vec::new());
        inn.insert(POST, Vec::new());
        Self {
            context,
            states,
            next_state: 2,
            transitions: IndexMap::new(),
            next_trans: 0,
            out,
            inn,
            by_src_dst_label: FxHashMap::default(),
            state_names: FxHashMap::default(),
            history: None,
        }
    }

    pub fn context(&self) -> &Context<L, W> {
        &self.context
    }

    // ---- states ----------------------------------------------------

    pub fn add_state(&mut self) -> StateId {
        let id = StateId(self.next_state);
        self.next_state += 1;
        self.states.insert(id);
        self.out.insert(id, Vec::new());
        self.inn.insert(id, Vec::new());
        id
    }

    pub fn has_state(&self, s: StateId) -> bool {
        self.states.contains(&s)
    }

    pub fn del_state(&mut self, s: StateId) {
        if !self.states.contains(&s) {
            return;
        }
        let incident: Vec<TransId> = self
            .out
            .get(&s)
            .into_iter()
            .flatten()
            .chain(self.inn.get(&s).into_iter().flatten())
            .copied()
            .collect();
        for t in incident {
            self.del_transition_id(t);
        }
        self.states.shift_remove(&s);
        self.out.remove(&s);
        self.inn.remove(&s);
        self.state_names.remove(&s);
    }

    /// States in id order; `pre`/`post` are included only when requested.
    pub fn states(&self, include_prepost: bool) -> Vec<StateId> {
        let mut v: Vec<StateId> = self
            .states
            .iter()
            .copied()
            .filter(|s| include_prepost || (*s != PRE && *s != POST))
            .collect();
        v.sort_by_key(|s| s.0);
        v
    }

    pub fn num_states(&self) -> usize {
        self.states.iter().filter(|&&s| s != PRE && s != POST).count()
    }

    // ---- state naming ------------------------------------------------

    pub fn get_state_name(&self, s: StateId) -> String {
        self.state_names.get(&s).cloned().unwrap_or_else(|| format!("{s}"))
    }

    pub fn set_state_name(&mut self, s: StateId, name: impl Into<String>) {
        self.state_names.insert(s, name.into());
    }

    pub fn has_explicit_name(&self, s: StateId) -> bool {
        self.state_names.contains_key(&s)
    }

    pub fn get_state_by_name(&self, name: &str) -> Option<StateId> {
        self.state_names.iter().find(|(_, n)| n.as_str() == name).map(|(s, _)| *s)
    }

    // ---- transitions ---------------------------------------------------

    fn key_of(&self, src: StateId, dst: StateId, label: &Label<L::Value>) -> (StateId, StateId, Label<L::Value>) {
        (src, dst, label.clone())
    }

    fn find(&self, src: StateId, dst: StateId, label: &Label<L::Value>) -> Option<TransId> {
        self.by_src_dst_label.get(&self.key_of(src, dst, label)).copied()
    }

    fn check_endpoint_invariants(&self, src: StateId, dst: StateId, label: &Label<L::Value>) -> Result<()> {
        if src == PRE && (dst == PRE || !matches!(label, Label::PrePost)) {
            return Err(AwaliError::invalid_argument("label", "transitions from pre must target a non-pre state with the prepost label"));
        }
        if dst == POST && (src == POST || !matches!(label, Label::PrePost)) {
            return Err(AwaliError::invalid_argument("label", "transitions to post must originate from a non-post state with the prepost label"));
        }
        if matches!(label, Label::PrePost) && src != PRE && dst != POST {
            return Err(AwaliError::invalid_argument("label", "the prepost label is reserved for pre/post transitions"));
        }
        if matches!(label, Label::Epsilon) && !self.context.has_one() {
            return Err(AwaliError::unsupported("epsilon transition", self.context.name()));
        }
        Ok(())
    }

    fn link(&mut self, id: TransId, data: &TransitionData<L::Value, W::Value>) {
        self.out.entry(data.src).or_default().push(id);
        self.inn.entry(data.dst).or_default().push(id);
        self.by_src_dst_label.insert((data.src, data.dst, data.label.clone()), id);
    }

    fn unlink(&mut self, id: TransId, data: &TransitionData<L::Value, W::Value>) {
        if let Some(v) = self.out.get_mut(&data.src) {
            v.retain(|&t| t != id);
        }
        if let Some(v) = self.inn.get_mut(&data.dst) {
            v.retain(|&t| t != id);
        }
        self.by_src_dst_label.remove(&(data.src, data.dst, data.label.clone()));
    }

    /// Inserts; fails with `InvalidArgument` if `(src, dst, label)` already
    /// has a transition.
    pub fn new_transition(&mut self, src: StateId, dst: StateId, label: Label<L::Value>, weight: W::Value) -> Result<TransId> {
        self.check_endpoint_invariants(src, dst, &label)?;
        if self.find(src, dst, &label).is_some() {
            return Err(AwaliError::invalid_argument("label", "a transition with this (src, dst, label) already exists"));
        }
        if self.context.weightset().is_zero(&weight) {
            return Err(AwaliError::invalid_argument("weight", "transitions may not carry a zero weight"));
        }
        let id = TransId(self.next_trans);
        self.next_trans += 1;
        let data = TransitionData { src, dst, label, weight };
        self.link(id, &data);
        self.transitions.insert(id, data);
        Ok(id)
    }

    /// Inserts or replaces; a zero weight removes any existing transition.
    pub fn set_transition(&mut self, src: StateId, dst: StateId, label: Label<L::Value>, weight: W::Value) -> Result<Option<TransId>> {
        self.check_endpoint_invariants(src, dst, &label)?;
        let zero = self.context.weightset().is_zero(&weight);
        if let Some(existing) = self.find(src, dst, &label) {
            if zero {
                self.del_transition_id(existing);
                return Ok(None);
            }
            self.transitions.get_mut(&existing).unwrap().weight = weight;
            return Ok(Some(existing));
        }
        if zero {
            return Ok(None);
        }
        let id = TransId(self.next_trans);
        self.next_trans += 1;
        let data = TransitionData { src, dst, label, weight };
        self.link(id, &data);
        self.transitions.insert(id, data);
        Ok(Some(id))
    }

    /// Accumulates weight on an existing transition (or creates one);
    /// removes the transition if the resulting weight is zero. Returns the
    /// resulting weight.
    pub fn add_transition(&mut self, src: StateId, dst: StateId, label: Label<L::Value>, weight: W::Value) -> Result<W::Value> {
        self.check_endpoint_invariants(src, dst, &label)?;
        let ws = self.context.weightset().clone();
        if let Some(existing) = self.find(src, dst, &label) {
            let data = self.transitions.get_mut(&existing).unwrap();
            data.weight = ws.add(&data.weight, &weight);
            let result = data.weight.clone();
            if ws.is_zero(&result) {
                self.del_transition_id(existing);
                return Ok(result);
            }
            return Ok(result);
        }
        if ws.is_zero(&weight) {
            return Ok(weight);
        }
        let id = TransId(self.next_trans);
        self.next_trans += 1;
        let data = TransitionData { src, dst, label, weight: weight.clone() };
        self.link(id, &data);
        self.transitions.insert(id, data);
        Ok(weight)
    }

    fn del_transition_id(&mut self, id: TransId) {
        if let Some(data) = self.transitions.shift_remove(&id) {
            self.unlink(id, &data);
        }
    }

    pub fn del_transition(&mut self, id: TransId) {
        self.del_transition_id(id);
    }

    pub fn del_transition_by_endpoints(&mut self, src: StateId, dst: StateId, label: &Label<L::Value>) {
        if let Some(id) = self.find(src, dst, label) {
            self.del_transition_id(id);
        }
    }

    // ---- initial / final ------------------------------------------------

    pub fn set_initial(&mut self, s: StateId, w: W::Value) -> Result<Option<TransId>> {
        self.set_transition(PRE, s, Label::PrePost, w)
    }

    pub fn set_final(&mut self, s: StateId, w: W::Value) -> Result<Option<TransId>> {
        self.set_transition(s, POST, Label::PrePost, w)
    }

    pub fn add_initial(&mut self, s: StateId, w: W::Value) -> Result<W::Value> {
        self.add_transition(PRE, s, Label::PrePost, w)
    }

    pub fn add_final(&mut self, s: StateId, w: W::Value) -> Result<W::Value> {
        self.add_transition(s, POST, Label::PrePost, w)
    }

    pub fn is_initial(&self, s: StateId) -> bool {
        self.find(PRE, s, &Label::PrePost).is_some()
    }

    pub fn is_final(&self, s: StateId) -> bool {
        self.find(s, POST, &Label::PrePost).is_some()
    }

    pub fn initial_weight(&self, s: StateId) -> Option<W::Value> {
        self.find(PRE, s, &Label::PrePost).map(|t| self.transitions[&t].weight.clone())
    }

    pub fn final_weight(&self, s: StateId) -> Option<W::Value> {
        self.find(s, POST, &Label::PrePost).map(|t| self.transitions[&t].weight.clone())
    }

    pub fn num_initials(&self) -> usize {
        self.out.get(&PRE).map(|v| v.len()).unwrap_or(0)
    }

    pub fn num_finals(&self) -> usize {
        self.inn.get(&POST).map(|v| v.len()).unwrap_or(0)
    }

    // ---- epsilon helpers ------------------------------------------------

    pub fn is_epsilon(&self, label: &Label<L::Value>) -> bool {
        matches!(label, Label::Epsilon)
    }

    pub fn new_epsilon_trans(&mut self, src: StateId, dst: StateId, weight: W::Value) -> Result<TransId> {
        if !self.context.has_one() {
            return Err(AwaliError::unsupported("epsilon transition", self.context.name()));
        }
        self.new_transition(src, dst, Label::Epsilon, weight)
    }

    pub fn add_epsilon_trans(&mut self, src: StateId, dst: StateId, weight: W::Value) -> Result<W::Value> {
        if !self.context.has_one() {
            return Err(AwaliError::unsupported("epsilon transition", self.context.name()));
        }
        self.add_transition(src, dst, Label::Epsilon, weight)
    }

    pub fn set_epsilon_trans(&mut self, src: StateId, dst: StateId, weight: W::Value) -> Result<Option<TransId>> {
        if !self.context.has_one() {
            return Err(AwaliError::unsupported("epsilon transition", self.context.name()));
        }
        self.set_transition(src, dst, Label::Epsilon, weight)
    }

    pub fn del_epsilon_trans(&mut self, src: StateId, dst: StateId) -> Result<()> {
        if !self.context.has_one() {
            return Err(AwaliError::unsupported("epsilon transition", self.context.name()));
        }
        self.del_transition_by_endpoints(src, dst, &Label::Epsilon);
        Ok(())
    }

    // ---- queries ---------------------------------------------------------

    pub fn num_transitions(&self) -> usize {
        self.transitions
            .values()
            .filter(|d| !matches!(d.label, Label::PrePost))
            .count()
    }

    pub fn label_of(&self, t: TransId) -> &Label<L::Value> {
        &self.transitions[&t].label
    }

    pub fn weight_of(&self, t: TransId) -> &W::Value {
        &self.transitions[&t].weight
    }

    pub fn src_of(&self, t: TransId) -> StateId {
        self.transitions[&t].src
    }

    pub fn dst_of(&self, t: TransId) -> StateId {
        self.transitions[&t].dst
    }

    pub fn out(&self, s: StateId) -> &[TransId] {
        self.out.get(&s).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn inn(&self, s: StateId) -> &[TransId] {
        self.inn.get(&s).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn out_on(&self, s: StateId, label: &Label<L::Value>) -> Vec<TransId> {
        self.out(s).iter().copied().filter(|&t| &self.transitions[&t].label == label).collect()
    }

    pub fn in_on(&self, s: StateId, label: &Label<L::Value>) -> Vec<TransId> {
        self.inn(s).iter().copied().filter(|&t| &self.transitions[&t].label == label).collect()
    }

    /// All transitions between two states regardless of label.
    pub fn outin(&self, s: StateId, d: StateId) -> Vec<TransId> {
        self.out(s).iter().copied().filter(|&t| self.transitions[&t].dst == d).collect()
    }

    pub fn all_out(&self, s: StateId) -> &[TransId] {
        self.out(s)
    }

    pub fn all_in(&self, s: StateId) -> &[TransId] {
        self.inn(s)
    }

    // ---- history ------------------------------------------------------

    pub fn history(&self) -> Option<&History<L, W>> {
        self.history.as_ref()
    }

    pub fn set_history(&mut self, history: History<L, W>) {
        self.history = Some(history);
    }

    pub fn strip_history(&mut self) {
        self.history = None;
    }

    pub fn has_history(&self, s: StateId) -> bool {
        self.history.as_ref().is_some_and(|h| h.has(s))
    }

    pub fn print_state_history(&self, s: StateId) -> String {
        self.history.as_ref().map(|h| h.describe(s)).unwrap_or_default()
    }
}
