use std::collections::VecDeque;

use crate::automaton::{Automaton, Label};
use crate::base::StateId;
use crate::error::Result;
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

/// Lists all words of length ≤ `n` with non-zero evaluation, in radix
/// order (shortest first, then lexicographic among the alphabet's own
/// iteration order), paired with their weight.
pub fn enumerate<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, n: usize) -> Vec<(Vec<L::Value>, W::Value)> {
    let ws = aut.context().weightset();
    let alphabet = aut.context().labelset().alphabet();
    tracing::debug!("enumerate: up to length {n} over alphabet of size {}", alphabet.len());

    let mut results = Vec::new();
    let mut queue: VecDeque<(Vec<L::Value>, StateId, W::Value)> = VecDeque::new();
    for s in aut.states(false) {
        if let Some(w) = aut.initial_weight(s) {
            queue.push_back((Vec::new(), s, w));
        }
    }

    while let Some((word, s, w)) = queue.pop_front() {
        if let Some(fw) = aut.final_weight(s) {
            let total = ws.mul(&w, &fw);
            if !ws.is_zero(&total) {
                results.push((word.clone(), total));
            }
        }
        if word.len() >= n {
            continue;
        }
        for a in &alphabet {
            for &t in aut.out(s) {
                if aut.label_of(t) != &Label::Value(a.clone()) {
                    continue;
                }
                let mut next_word = word.clone();
                next_word.push(a.clone());
                let weight = ws.mul(&w, aut.weight_of(t));
                queue.push_back((next_word, aut.dst_of(t), weight));
            }
        }
    }
    results.sort_by(|(wa, _), (wb, _)| wa.len().cmp(&wb.len()).then_with(|| wa.cmp(wb)));
    results
}

/// The first `n` words (by radix order) with non-zero evaluation,
/// regardless of length: grows the explored length bound one step at a
/// time until `enumerate` has produced at least `n` matches.
pub fn shortest<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, n: usize) -> Result<Vec<(Vec<L::Value>, W::Value)>> {
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut length_bound = 1;
    loop {
        let found = enumerate(aut, length_bound);
        if found.len() >= n || length_bound > aut.num_states() + n {
            let mut found = found;
            found.truncate(n);
            return Ok(found);
        }
        length_bound *= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
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

    #[test]
    fn enumerate_lists_words_shortest_first_in_radix_order() {
        let words: Vec<Vec<char>> = enumerate(&any_word(), 2).into_iter().map(|(w, _)| w).collect();
        assert_eq!(
            words,
            vec![vec![], vec!['a'], vec!['b'], vec!['a', 'a'], vec!['a', 'b'], vec!['b', 'a'], vec!['b', 'b']]
        );
    }

    #[test]
    fn shortest_returns_exactly_n_matches_in_radix_order() {
        let found = shortest(&any_word(), 3).unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].0, Vec::<char>::new());
        assert_eq!(found[1].0, vec!['a']);
        assert_eq!(found[2].0, vec!['b']);
    }
}
