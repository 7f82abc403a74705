use std::collections::HashMap;

use crate::automaton::{Automaton, Label};
use crate::base::StateId;
use crate::error::{AwaliError, Result};
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

/// Evaluates the weight of `word` (a sequence of label values) against a
/// free-labelset automaton without epsilon transitions, in
/// `O(|word| * |transitions|)` by forward reachability over weighted
/// subsets, one letter at a time.
pub fn eval<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, word: &[L::Value]) -> Result<W::Value> {
    if !aut.context().is_free() {
        return Err(AwaliError::unsupported("eval", aut.context().name()));
    }
    for s in aut.states(true) {
        for &t in aut.out(s) {
            if aut.is_epsilon(aut.label_of(t)) {
                return Err(AwaliError::unsupported("eval", "automaton has epsilon transitions"));
            }
        }
    }
    let ws = aut.context().weightset();
    tracing::trace!("eval: word of length {}", word.len());

    let mut current: HashMap<StateId, W::Value> = HashMap::new();
    for s in aut.states(false) {
        if let Some(w) = aut.initial_weight(s) {
            current.insert(s, w);
        }
    }

    for letter in word {
        let mut next: HashMap<StateId, W::Value> = HashMap::new();
        for (&s, w) in &current {
            for &t in aut.out(s) {
                if aut.label_of(t) != &Label::Value(letter.clone()) {
                    continue;
                }
                let dst = aut.dst_of(t);
                let contrib = ws.mul(w, aut.weight_of(t));
                let acc = next.get(&dst).cloned().unwrap_or_else(|| ws.zero());
                next.insert(dst, ws.add(&acc, &contrib));
            }
        }
        current = next;
    }

    let mut total = ws.zero();
    for (&s, w) in &current {
        if let Some(fw) = aut.final_weight(s) {
            total = ws.add(&total, &ws.mul(w, &fw));
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::labelset::{LetterSet, NullableSet};
    use crate::weightset::Z;

    fn ctx() -> Context<LetterSet, Z> {
        Context::new(LetterSet::new(['a', 'b']), Z)
    }

    #[test]
    fn word_that_falls_off_the_automaton_evaluates_to_zero() {
        let mut aut = Automaton::new(ctx());
        let s0 = aut.add_state();
        aut.set_initial(s0, 1).unwrap();
        aut.set_final(s0, 1).unwrap();
        aut.add_transition(s0, s0, Label::Value('a'), 1).unwrap();

        assert_eq!(eval(&aut, &['b']).unwrap(), 0);
    }

    #[test]
    fn eval_accumulates_weight_along_every_accepting_run() {
        let mut aut = Automaton::new(ctx());
        let s0 = aut.add_state();
        aut.set_initial(s0, 2).unwrap();
        aut.set_final(s0, 3).unwrap();
        aut.add_transition(s0, s0, Label::Value('a'), 5).unwrap();

        assert_eq!(eval(&aut, &['a', 'a']).unwrap(), 2 * 5 * 5 * 3);
    }

    #[test]
    fn eval_rejects_automata_with_epsilon_transitions() {
        let ctx: Context<NullableSet<LetterSet>, Z> = Context::new(NullableSet::new(LetterSet::new(['a'])), Z);
        let mut aut = Automaton::new(ctx);
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        aut.set_initial(s0, 1).unwrap();
        aut.set_final(s1, 1).unwrap();
        aut.new_epsilon_trans(s0, s1, 1).unwrap();
        assert!(eval(&aut, &['a']).is_err());
    }
}
