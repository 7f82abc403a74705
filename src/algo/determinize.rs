use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::automaton::{Automaton, History, Label};
use crate::base::{StateId, POST, PRE};
use crate::error::{AwaliError, Result};
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

/// How far the weighted subset construction is allowed to explore before
/// it is cut off with a sink state, per spec's bounded variants.
#[derive(Debug, Clone, Copy)]
pub enum ExploreBound {
    /// Truncate at subsets reached by words of length > `n`.
    ByLength(usize),
    /// Truncate at subsets whose weight components exceed `k` in
    /// absolute value. Only meaningful for N, Z, N-bounded-style
    /// weightsets where `abs_le` is a sound approximation; `print`'s
    /// digit count is used as a crude magnitude proxy for any weightset.
    ByWeightBound(i64),
}

/// A weighted subset: state -> accumulated weight, kept sorted by
/// `StateId` so two subsets with the same members/weights compare equal
/// and hash identically via their canonical key string.
type Subset<W> = BTreeMap<StateId, <W as WeightSet>::Value>;

fn subset_key<W: WeightSet>(ws: &W, subset: &Subset<W>) -> String {
    subset.iter().map(|(s, w)| format!("{}:{}", s, ws.print(w))).collect::<Vec<_>>().join(",")
}

fn merge_subset<W: WeightSet>(ws: &W, dest: &mut Subset<W>, s: StateId, w: W::Value) {
    let merged = match dest.get(&s) {
        Some(acc) => ws.add(acc, &w),
        None => w,
    };
    dest.insert(s, merged);
}

struct Determinizer<L: LabelSet, W: WeightSet> {
    out: Automaton<L, W>,
    history: History<L, W>,
    state_of: HashMap<String, StateId>,
    queue: VecDeque<(StateId, Subset<W>)>,
}

/// Weighted subset-construction determinization. Requires a free
/// labelset without epsilon (run `proper` first if needed).
pub fn determinize<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> Result<Automaton<L, W>> {
    determinize_impl(aut, None)
}

/// Determinization truncated per `bound`. Words/weights beyond the bound
/// collapse into a single sink state with no outgoing transitions.
pub fn determinize_bounded<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, bound: ExploreBound) -> Result<Automaton<L, W>> {
    determinize_impl(aut, Some(bound))
}

fn determinize_impl<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, bound: Option<ExploreBound>) -> Result<Automaton<L, W>> {
    if !aut.context().is_free() {
        return Err(AwaliError::unsupported("determinize", aut.context().name()));
    }
    for s in aut.states(true) {
        for &t in aut.out(s) {
            if aut.is_epsilon(aut.label_of(t)) {
                return Err(AwaliError::unsupported("determinize", "automaton has epsilon transitions"));
            }
        }
    }
    tracing::debug!("determinize: {} source states", aut.num_states());
    let ws = aut.context().weightset();
    let alphabet = aut.context().labelset().alphabet();

    let mut det = Determinizer {
        out: Automaton::new(aut.context().clone()),
        history: History::new(),
        state_of: HashMap::new(),
        queue: VecDeque::new(),
    };

    let mut initial: Subset<W> = BTreeMap::new();
    for s in aut.states(false) {
        if let Some(w) = aut.initial_weight(s) {
            merge_subset(ws, &mut initial, s, w);
        }
    }
    let init_key = subset_key(ws, &initial);
    let init_state = det.out.add_state();
    det.state_of.insert(init_key, init_state);
    det.history.set_partition(init_state, initial.keys().copied().collect());
    det.out.set_initial(init_state, ws.one())?;
    det.queue.push_back((init_state, initial));

    let mut depth_of: HashMap<StateId, usize> = HashMap::new();
    depth_of.insert(init_state, 0);
    let mut sink: Option<StateId> = None;

    while let Some((src, subset)) = det.queue.pop_front() {
        let depth = depth_of[&src];
        let mut final_weight = ws.zero();
        for (&s, w) in &subset {
            if let Some(fw) = aut.final_weight(s) {
                final_weight = ws.add(&final_weight, &ws.mul(w, &fw));
            }
        }
        if !ws.is_zero(&final_weight) {
            det.out.add_final(src, final_weight)?;
        }

        if let Some(ExploreBound::ByLength(n)) = bound {
            if depth >= n {
                continue;
            }
        }

        for a in &alphabet {
            let mut image: Subset<W> = BTreeMap::new();
            for (&s, w) in &subset {
                for &t in aut.out(s) {
                    if aut.label_of(t) != &Label::Value(a.clone()) {
                        continue;
                    }
                    let dst = aut.dst_of(t);
                    let contrib = ws.mul(w, aut.weight_of(t));
                    merge_subset(ws, &mut image, dst, contrib);
                }
            }
            if image.is_empty() {
                continue;
            }

            let exceeds_bound = matches!(bound, Some(ExploreBound::ByWeightBound(k)) if image.values().any(|w| ws.print(w).len() as i64 > k));
            let dst_state = if exceeds_bound {
                *sink.get_or_insert_with(|| det.out.add_state())
            } else {
                let key = subset_key(ws, &image);
                if let Some(&existing) = det.state_of.get(&key) {
                    existing
                } else {
                    let ns = det.out.add_state();
                    det.state_of.insert(key, ns);
                    det.history.set_partition(ns, image.keys().copied().collect());
                    depth_of.insert(ns, depth + 1);
                    det.queue.push_back((ns, image));
                    ns
                }
            };
            det.out.add_transition(src, dst_state, Label::Value(a.clone()), ws.one())?;
        }
    }
    det.out.set_history(det.history);
    tracing::debug!("determinize: produced {} states", det.out.num_states());
    Ok(det.out)
}

/// Whether every state has at most one outgoing transition per letter and
/// no epsilon transitions — a labelset/transition-shape query, independent
/// of weight.
pub fn is_deterministic<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> bool {
    for s in aut.states(true) {
        let mut seen = std::collections::HashSet::new();
        for &t in aut.out(s) {
            if aut.is_epsilon(aut.label_of(t)) {
                return false;
            }
            if !seen.insert(aut.label_of(t).clone()) {
                return false;
            }
        }
    }
    true
}

/// Deterministic and has at most one initial state with weight one (the
/// stricter "sequential" shape: a single entry point, no choice anywhere).
pub fn is_sequential<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> bool {
    is_deterministic(aut) && aut.num_initials() <= 1
}

/// Whether some word admits two distinct accepting runs (ignoring
/// weight — a structural ambiguity query over the transition relation).
pub fn is_ambiguous<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> bool {
    // Two runs of the same word diverge iff the product self-automaton
    // (aut x aut restricted to the diagonal-avoiding pairs) can reach
    // post from two distinct states synchronized on the same letters.
    let mut queue = VecDeque::new();
    let mut visited = std::collections::HashSet::new();
    queue.push_back((PRE, PRE));
    visited.insert((PRE, PRE));
    while let Some((s1, s2)) = queue.pop_front() {
        for &t1 in aut.out(s1) {
            for &t2 in aut.out(s2) {
                if aut.label_of(t1) != aut.label_of(t2) {
                    continue;
                }
                let d1 = aut.dst_of(t1);
                let d2 = aut.dst_of(t2);
                if s1 == s2 && d1 == d2 {
                    continue;
                }
                if d1 == POST && d2 == POST {
                    return true;
                }
                if visited.insert((d1, d2)) {
                    queue.push_back((d1, d2));
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::labelset::LetterSet;
    use crate::weightset::B;

    fn ctx() -> Context<LetterSet, B> {
        Context::new(LetterSet::new(['a']), B)
    }

    fn nondeterministic_choice() -> Automaton<LetterSet, B> {
        let mut aut = Automaton::new(ctx());
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        let s2 = aut.add_state();
        aut.set_initial(s0, true).unwrap();
        aut.set_final(s1, true).unwrap();
        aut.set_final(s2, true).unwrap();
        aut.add_transition(s0, s1, Label::Value('a'), true).unwrap();
        aut.add_transition(s0, s2, Label::Value('a'), true).unwrap();
        aut
    }

    #[test]
    fn determinize_collapses_a_nondeterministic_choice() {
        let aut = nondeterministic_choice();
        assert!(!is_deterministic(&aut));
        let det = determinize(&aut).unwrap();
        assert!(is_deterministic(&det));
    }

    #[test]
    fn is_ambiguous_detects_two_accepting_runs_of_the_same_word() {
        assert!(is_ambiguous(&nondeterministic_choice()));
    }

    #[test]
    fn is_sequential_requires_at_most_one_initial_state() {
        let mut aut = Automaton::new(ctx());
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        aut.set_initial(s0, true).unwrap();
        aut.set_initial(s1, true).unwrap();
        assert!(is_deterministic(&aut));
        assert!(!is_sequential(&aut));
    }
}
