use std::collections::{HashMap, VecDeque};

use crate::automaton::{Automaton, History, Label};
use crate::base::{StateId, POST, PRE};
use crate::context::Context;
use crate::labelset::{LabelSet, TupleSet};
use crate::weightset::WeightSet;

/// Drops tape 1, keeping tape 0's labelset. The concretization of the
/// spec's generic `projection<I>` to this crate's fixed two-tape
/// [`TupleSet`]: with only two tapes, "drop all tapes except I" has
/// exactly two useful instances, named `projection` (keep tape 0) and
/// [`images`] (keep tape 1, "drop tape 0" per spec wording).
pub fn projection<A: LabelSet, B: LabelSet, W: WeightSet>(tdc: &Automaton<TupleSet<A, B>, W>) -> Automaton<A, W> {
    tracing::debug!("projection: {} states, keeping tape 0", tdc.num_states());
    let ctx = Context::new(tdc.context().labelset().first.clone(), tdc.context().weightset().clone());
    retag(tdc, ctx, |(a, _)| a.clone())
}

/// Drops tape 0, keeping tape 1's labelset.
pub fn images<A: LabelSet, B: LabelSet, W: WeightSet>(tdc: &Automaton<TupleSet<A, B>, W>) -> Automaton<B, W> {
    tracing::debug!("images: {} states, keeping tape 1", tdc.num_states());
    let ctx = Context::new(tdc.context().labelset().second.clone(), tdc.context().weightset().clone());
    retag(tdc, ctx, |(_, b)| b.clone())
}

fn retag<A: LabelSet, B: LabelSet, W: WeightSet, L2: LabelSet>(
    tdc: &Automaton<TupleSet<A, B>, W>,
    ctx: Context<L2, W>,
    pick: impl Fn(&(A::Value, B::Value)) -> L2::Value,
) -> Automaton<L2, W> {
    let mut out = Automaton::new(ctx);
    let mut map = HashMap::new();
    for s in tdc.states(false) {
        map.insert(s, out.add_state());
    }
    for (&s, &ns) in &map {
        if let Some(w) = tdc.initial_weight(s) {
            let _ = out.set_initial(ns, w);
        }
        if let Some(w) = tdc.final_weight(s) {
            let _ = out.set_final(ns, w);
        }
    }
    for &s in map.keys() {
        for &t in tdc.out(s) {
            let dst = tdc.dst_of(t);
            let Some(&ndst) = map.get(&dst) else { continue };
            let label = match tdc.label_of(t) {
                Label::Value(v) => Label::Value(pick(v)),
                Label::Epsilon => Label::Epsilon,
                Label::PrePost => continue,
            };
            let _ = out.add_transition(map[&s], ndst, label, tdc.weight_of(t).clone());
        }
    }
    out
}

/// Swaps tapes 0 and 1.
pub fn inverse<A: LabelSet, B: LabelSet, W: WeightSet>(tdc: &Automaton<TupleSet<A, B>, W>) -> Automaton<TupleSet<B, A>, W> {
    tracing::debug!("inverse: swapping tapes of {} states", tdc.num_states());
    let inner = tdc.context().labelset().clone();
    let ctx = Context::new(TupleSet::new(inner.second.clone(), inner.first.clone()), tdc.context().weightset().clone());
    retag(tdc, ctx, |(a, b)| (b.clone(), a.clone()))
}

/// Splits states so outgoing transitions on tape `I` are either all
/// epsilon or all non-epsilon, the ordering precondition `compose` needs
/// on its synchronized tape. This crate's [`TupleSet`] has no per-tape
/// epsilon value (only the whole-transition `Label::Epsilon`), so every
/// transition is already uniformly epsilon or uniformly non-epsilon on
/// both tapes at once: the split is always already satisfied and this is
/// the identity. Kept as a named pass so call sites read the same as the
/// original three-stage `outsplit; sort; product` pipeline.
pub fn outsplit<A: LabelSet, B: LabelSet, W: WeightSet>(tdc: &Automaton<TupleSet<A, B>, W>) -> Automaton<TupleSet<A, B>, W> {
    retag(tdc, tdc.context().clone(), |v| v.clone())
}

/// Synchronous composition on tape 1 of `t1` / tape 0 of `t2`. Both
/// inputs are first passed through [`outsplit`] (a no-op under this
/// crate's tuple-label model, kept for fidelity to the spec's pipeline),
/// then matched letter-for-letter on the shared tape; `t1`'s tape 0 and
/// `t2`'s tape 1 survive into the result's two tapes. Leaves residual
/// whole-transition epsilon pairs in place: run [`super::proper`]
/// afterwards to remove them, per spec.
pub fn compose<A: LabelSet, B: LabelSet, C: LabelSet, W: WeightSet>(
    t1: &Automaton<TupleSet<A, B>, W>,
    t2: &Automaton<TupleSet<B, C>, W>,
) -> Automaton<TupleSet<A, C>, W> {
    tracing::debug!("compose: {} x {} states", t1.num_states(), t2.num_states());
    let t1 = outsplit(t1);
    let t2 = outsplit(t2);
    let ws = t1.context().weightset().clone();
    let ctx = Context::new(
        TupleSet::new(t1.context().labelset().first.clone(), t2.context().labelset().second.clone()),
        ws.clone(),
    );

    let mut out = Automaton::new(ctx);
    let mut history = History::new();
    let mut state_of: HashMap<(StateId, StateId), StateId> = HashMap::new();
    let mut queue: VecDeque<(StateId, StateId)> = VecDeque::new();

    let mut intern = |out: &mut Automaton<TupleSet<A, C>, W>, history: &mut History<TupleSet<A, C>, W>, a: StateId, b: StateId, queue: &mut VecDeque<(StateId, StateId)>| -> StateId {
        if a == PRE && b == PRE {
            return PRE;
        }
        if a == POST && b == POST {
            return POST;
        }
        *state_of.entry((a, b)).or_insert_with(|| {
            let s = out.add_state();
            history.set_pair(s, a, b);
            queue.push_back((a, b));
            s
        })
    };

    queue.push_back((PRE, PRE));
    while let Some((s1, s2)) = queue.pop_front() {
        let src = intern(&mut out, &mut history, s1, s2, &mut queue);
        for &e1 in t1.out(s1) {
            let l1 = t1.label_of(e1).clone();
            for &e2 in t2.out(s2) {
                let l2 = t2.label_of(e2).clone();
                let synced = match (&l1, &l2) {
                    (Label::Value((_, b1)), Label::Value((b2, _))) => b1 == b2,
                    (Label::Epsilon, Label::Epsilon) => true,
                    // PRE/POST pseudo-edges aren't part of the tape-1/tape-0
                    // synchronization; they're handled structurally by the
                    // src == PRE / dst == POST branches below.
                    (Label::PrePost, Label::PrePost) => true,
                    _ => false,
                };
                if !synced {
                    continue;
                }
                let d1 = t1.dst_of(e1);
                let d2 = t2.dst_of(e2);
                let dst = intern(&mut out, &mut history, d1, d2, &mut queue);
                let weight = ws.mul(t1.weight_of(e1), t2.weight_of(e2));
                let out_label = match (&l1, &l2) {
                    (Label::Value((a, _)), Label::Value((_, c))) => Label::Value((a.clone(), c.clone())),
                    _ => Label::Epsilon,
                };
                if src == PRE {
                    let _ = out.add_initial(dst, weight);
                } else if dst == POST {
                    let _ = out.add_final(src, weight);
                } else {
                    let _ = out.add_transition(src, dst, out_label, weight);
                }
            }
        }
    }
    out.set_history(history);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labelset::LetterSet;
    use crate::weightset::B;

    fn ctx() -> Context<TupleSet<LetterSet, LetterSet>, B> {
        Context::new(TupleSet::new(LetterSet::new(['a']), LetterSet::new(['b'])), B)
    }

    fn a_to_b() -> Automaton<TupleSet<LetterSet, LetterSet>, B> {
        let mut tdc = Automaton::new(ctx());
        let s0 = tdc.add_state();
        let s1 = tdc.add_state();
        tdc.set_initial(s0, true).unwrap();
        tdc.set_final(s1, true).unwrap();
        tdc.add_transition(s0, s1, Label::Value(('a', 'b')), true).unwrap();
        tdc
    }

    fn count_labeled<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, label: &Label<L::Value>) -> usize {
        aut.states(true).iter().map(|&s| aut.out(s).iter().filter(|&&t| aut.label_of(t) == label).count()).sum()
    }

    #[test]
    fn projection_keeps_only_tape_zero() {
        let p = projection(&a_to_b());
        assert_eq!(p.num_states(), 2);
        assert_eq!(count_labeled(&p, &Label::Value('a')), 1);
    }

    #[test]
    fn images_keeps_only_tape_one() {
        let i = images(&a_to_b());
        assert_eq!(i.num_states(), 2);
        assert_eq!(count_labeled(&i, &Label::Value('b')), 1);
    }

    #[test]
    fn inverse_swaps_the_two_tapes() {
        let inv = inverse(&a_to_b());
        assert_eq!(count_labeled(&inv, &Label::Value(('b', 'a'))), 1);
    }

    #[test]
    fn composing_a_to_b_with_b_to_a_yields_identity_on_a() {
        let t1 = a_to_b();
        let t2 = inverse(&a_to_b());
        let composed = compose(&t1, &t2);
        let p = projection(&composed);
        let im = images(&composed);
        assert_eq!(count_labeled(&p, &Label::Value('a')), 1);
        assert_eq!(count_labeled(&im, &Label::Value('a')), 1);
    }
}
