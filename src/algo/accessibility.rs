use std::collections::{HashSet, VecDeque};

use crate::automaton::{Automaton, History};
use crate::base::{StateId, POST, PRE};
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

fn forward_reachable<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> HashSet<StateId> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(PRE);
    queue.push_back(PRE);
    while let Some(s) = queue.pop_front() {
        for &t in aut.out(s) {
            let dst = aut.dst_of(t);
            if seen.insert(dst) {
                queue.push_back(dst);
            }
        }
    }
    seen
}

fn backward_reachable<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> HashSet<StateId> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(POST);
    queue.push_back(POST);
    while let Some(s) = queue.pop_front() {
        for &t in aut.inn(s) {
            let src = aut.src_of(t);
            if seen.insert(src) {
                queue.push_back(src);
            }
        }
    }
    seen
}

/// Builds a fresh automaton containing only `keep` (always including
/// `pre`/`post`), preserving a single-history map to the source states.
fn restrict<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, keep: &HashSet<StateId>) -> Automaton<L, W> {
    let mut out = Automaton::new(aut.context().clone());
    let mut map = std::collections::HashMap::new();
    map.insert(PRE, PRE);
    map.insert(POST, POST);
    let mut history = History::new();
    for s in aut.states(false) {
        if keep.contains(&s) {
            let ns = out.add_state();
            map.insert(s, ns);
            history.set_single(ns, s);
        }
    }
    for s in aut.states(true) {
        if !keep.contains(&s) {
            continue;
        }
        for &t in aut.out(s) {
            let dst = aut.dst_of(t);
            if !keep.contains(&dst) {
                continue;
            }
            let ns = map[&s];
            let nd = map[&dst];
            let label = aut.label_of(t).clone();
            let weight = aut.weight_of(t).clone();
            out.set_transition(ns, nd, label, weight).expect("restricted transition is well-formed");
        }
    }
    out.set_history(history);
    out
}

/// States reachable from `pre`, as a fresh automaton. History kind: single.
pub fn accessible<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> Automaton<L, W> {
    let keep = forward_reachable(aut);
    restrict(aut, &keep)
}

/// States that can reach `post`, as a fresh automaton. History kind: single.
pub fn coaccessible<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> Automaton<L, W> {
    let keep = backward_reachable(aut);
    restrict(aut, &keep)
}

/// States both accessible and coaccessible. History kind: single.
pub fn trim<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> Automaton<L, W> {
    let fwd = forward_reachable(aut);
    let bwd = backward_reachable(aut);
    let keep: HashSet<StateId> = fwd.intersection(&bwd).copied().collect();
    tracing::debug!(
        "trim: keeping {} of {} states",
        keep.len(),
        aut.num_states()
    );
    restrict(aut, &keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Label;
    use crate::context::Context;
    use crate::labelset::LetterSet;
    use crate::weightset::B;

    fn ctx() -> Context<LetterSet, B> {
        Context::new(LetterSet::new(['a', 'b']), B)
    }

    #[test]
    fn trim_drops_unreachable_and_dead_end_states() {
        let mut aut = Automaton::new(ctx());
        let start = aut.add_state();
        let reachable = aut.add_state();
        let _unreachable = aut.add_state();
        let dead_end = aut.add_state();
        aut.set_initial(start, true).unwrap();
        aut.set_final(reachable, true).unwrap();
        aut.add_transition(start, reachable, Label::Value('a'), true).unwrap();
        aut.add_transition(start, dead_end, Label::Value('b'), true).unwrap();

        let trimmed = trim(&aut);
        assert_eq!(trimmed.num_states(), 2);
    }

    #[test]
    fn accessible_and_coaccessible_agree_with_trim_here() {
        let mut aut = Automaton::new(ctx());
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        aut.set_initial(s0, true).unwrap();
        aut.set_final(s1, true).unwrap();
        aut.add_transition(s0, s1, Label::Value('a'), true).unwrap();

        assert_eq!(accessible(&aut).num_states(), 2);
        assert_eq!(coaccessible(&aut).num_states(), 2);
        assert_eq!(trim(&aut).num_states(), 2);
    }
}
