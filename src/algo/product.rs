use std::collections::{HashMap, VecDeque};

use crate::automaton::{Automaton, History};
use crate::base::{StateId, POST, PRE};
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

/// Accessible-part state-pair exploration shared by `product`/`shuffle`/
/// `infiltration`: a worklist over `(s1, s2)` pairs, building a fresh
/// automaton whose states are pairs and whose history is `pair`.
struct PairBuilder<L: LabelSet, W: WeightSet> {
    out: Automaton<L, W>,
    history: History<L, W>,
    state_of: HashMap<(StateId, StateId), StateId>,
    queue: VecDeque<(StateId, StateId)>,
}

impl<L: LabelSet, W: WeightSet> PairBuilder<L, W> {
    fn new(ctx: crate::context::Context<L, W>) -> Self {
        Self {
            out: Automaton::new(ctx),
            history: History::new(),
            state_of: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    fn intern(&mut self, a: StateId, b: StateId) -> StateId {
        if a == PRE && b == PRE {
            return PRE;
        }
        if a == POST && b == POST {
            return POST;
        }
        *self.state_of.entry((a, b)).or_insert_with(|| {
            let s = self.out.add_state();
            self.history.set_pair(s, a, b);
            self.queue.push_back((a, b));
            s
        })
    }
}

/// Synchronous product on matching letters; weight is the semiring product
/// of the two sides' weights. History kind: pair.
pub fn product<L: LabelSet, W: WeightSet>(a: &Automaton<L, W>, b: &Automaton<L, W>) -> Automaton<L, W> {
    tracing::debug!("product: {} x {} states", a.num_states(), b.num_states());
    let ws = a.context().weightset().clone();
    let mut builder = PairBuilder::new(a.context().clone());
    builder.queue.push_back((PRE, PRE));

    while let Some((s1, s2)) = builder.queue.pop_front() {
        let src = builder.intern(s1, s2);
        for &t1 in a.out(s1) {
            let l1 = a.label_of(t1).clone();
            for &t2 in b.out(s2) {
                let l2 = b.label_of(t2).clone();
                if l1 != l2 {
                    continue;
                }
                let d1 = a.dst_of(t1);
                let d2 = b.dst_of(t2);
                let dst = builder.intern(d1, d2);
                let weight = ws.mul(a.weight_of(t1), b.weight_of(t2));
                if src == PRE {
                    let _ = builder.out.add_initial(dst, weight);
                } else if dst == POST {
                    let _ = builder.out.add_final(src, weight);
                } else {
                    let _ = builder.out.add_transition(src, dst, l1.clone(), weight);
                }
            }
        }
    }
    builder.out.set_history(builder.history);
    builder.out
}

/// Interleaves the two sides: at each step exactly one side advances.
/// Final weight is the product of both sides' final weights (both must
/// have finished). History kind: pair.
pub fn shuffle<L: LabelSet, W: WeightSet>(a: &Automaton<L, W>, b: &Automaton<L, W>) -> Automaton<L, W> {
    tracing::debug!("shuffle: {} x {} states", a.num_states(), b.num_states());
    let ws = a.context().weightset().clone();
    let mut builder = PairBuilder::new(a.context().clone());
    builder.queue.push_back((PRE, PRE));

    while let Some((s1, s2)) = builder.queue.pop_front() {
        let src = builder.intern(s1, s2);
        if s1 == PRE && s2 == PRE {
            for &t1 in a.out(PRE) {
                for &t2 in b.out(PRE) {
                    let d1 = a.dst_of(t1);
                    let d2 = b.dst_of(t2);
                    let dst = builder.intern(d1, d2);
                    let weight = ws.mul(a.weight_of(t1), b.weight_of(t2));
                    let _ = builder.out.add_initial(dst, weight);
                }
            }
            continue;
        }
        // advance side a, keep b fixed
        for &t1 in a.out(s1) {
            if a.dst_of(t1) == POST {
                continue;
            }
            let dst = builder.intern(a.dst_of(t1), s2);
            let _ = builder.out.add_transition(src, dst, a.label_of(t1).clone(), a.weight_of(t1).clone());
        }
        // advance side b, keep a fixed
        for &t2 in b.out(s2) {
            if b.dst_of(t2) == POST {
                continue;
            }
            let dst = builder.intern(s1, b.dst_of(t2));
            let _ = builder.out.add_transition(src, dst, b.label_of(t2).clone(), b.weight_of(t2).clone());
        }
        if let (Some(fa), Some(fb)) = (a.final_weight(s1), b.final_weight(s2)) {
            let _ = builder.out.add_final(src, ws.mul(&fa, &fb));
        }
    }
    builder.out.set_history(builder.history);
    builder.out
}

/// The union of `product` and `shuffle`: at each step either both sides
/// advance in lockstep on a matching letter, or exactly one side advances.
/// History kind: pair.
pub fn infiltration<L: LabelSet, W: WeightSet>(a: &Automaton<L, W>, b: &Automaton<L, W>) -> Automaton<L, W> {
    tracing::debug!("infiltration: {} x {} states", a.num_states(), b.num_states());
    let ws = a.context().weightset().clone();
    let mut builder = PairBuilder::new(a.context().clone());
    builder.queue.push_back((PRE, PRE));

    while let Some((s1, s2)) = builder.queue.pop_front() {
        let src = builder.intern(s1, s2);
        if s1 == PRE && s2 == PRE {
            for &t1 in a.out(PRE) {
                for &t2 in b.out(PRE) {
                    let d1 = a.dst_of(t1);
                    let d2 = b.dst_of(t2);
                    let dst = builder.intern(d1, d2);
                    let weight = ws.mul(a.weight_of(t1), b.weight_of(t2));
                    let _ = builder.out.add_initial(dst, weight);
                }
            }
            continue;
        }
        // synchronous step (product-like)
        for &t1 in a.out(s1) {
            if a.dst_of(t1) == POST {
                continue;
            }
            for &t2 in b.out(s2) {
                if b.dst_of(t2) == POST || a.label_of(t1) != b.label_of(t2) {
                    continue;
                }
                let dst = builder.intern(a.dst_of(t1), b.dst_of(t2));
                let weight = ws.mul(a.weight_of(t1), b.weight_of(t2));
                let _ = builder.out.add_transition(src, dst, a.label_of(t1).clone(), weight);
            }
        }
        // shuffle step: advance one side only
        for &t1 in a.out(s1) {
            if a.dst_of(t1) == POST {
                continue;
            }
            let dst = builder.intern(a.dst_of(t1), s2);
            let _ = builder.out.add_transition(src, dst, a.label_of(t1).clone(), a.weight_of(t1).clone());
        }
        for &t2 in b.out(s2) {
            if b.dst_of(t2) == POST {
                continue;
            }
            let dst = builder.intern(s1, b.dst_of(t2));
            let _ = builder.out.add_transition(src, dst, b.label_of(t2).clone(), b.weight_of(t2).clone());
        }
        if let (Some(fa), Some(fb)) = (a.final_weight(s1), b.final_weight(s2)) {
            let _ = builder.out.add_final(src, ws.mul(&fa, &fb));
        }
    }
    builder.out.set_history(builder.history);
    builder.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::eval;
    use crate::labelset::LetterSet;
    use crate::weightset::B;

    fn ctx() -> Context<LetterSet, B> {
        Context::new(LetterSet::new(['a', 'b']), B)
    }

    fn any_word() -> Automaton<LetterSet, B> {
        let mut aut = Automaton::new(ctx());
        let s = aut.add_state();
        aut.set_initial(s, true).unwrap();
        aut.set_final(s, true).unwrap();
        aut.add_transition(s, s, Label::Value('a'), true).unwrap();
        aut.add_transition(s, s, Label::Value('b'), true).unwrap();
        aut
    }

    fn exactly_a() -> Automaton<LetterSet, B> {
        let mut aut = Automaton::new(ctx());
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        aut.set_initial(s0, true).unwrap();
        aut.set_final(s1, true).unwrap();
        aut.add_transition(s0, s1, Label::Value('a'), true).unwrap();
        aut
    }

    #[test]
    fn product_intersects_the_two_languages() {
        let p = product(&any_word(), &exactly_a());
        assert_eq!(eval(&p, &['a']).unwrap(), true);
        assert_eq!(eval(&p, &['b']).unwrap(), false);
        assert_eq!(eval(&p, &['a', 'a']).unwrap(), false);
    }

    #[test]
    fn shuffle_accepts_interleavings_of_both_sides() {
        let sh = shuffle(&exactly_a(), &exactly_a());
        assert_eq!(eval(&sh, &['a', 'a']).unwrap(), true);
        assert_eq!(eval(&sh, &['a']).unwrap(), false);
    }

    #[test]
    fn infiltration_accepts_everything_product_and_shuffle_accept() {
        let inf = infiltration(&exactly_a(), &exactly_a());
        assert_eq!(eval(&inf, &['a']).unwrap(), true);
        assert_eq!(eval(&inf, &['a', 'a']).unwrap(), true);
        assert_eq!(eval(&inf, &['b']).unwrap(), false);
    }
}
