use std::collections::HashMap;

use crate::automaton::Automaton;
use crate::base::StateId;
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

/// Iterative Tarjan SCC. Returns the SCC id of every state (`pre` and
/// `post` each get their own, per §4.5) and the states of each SCC in
/// discovery order.
pub fn tarjan_scc<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> (HashMap<StateId, usize>, Vec<Vec<StateId>>) {
    let states = aut.states(true);
    let mut index: HashMap<StateId, usize> = HashMap::new();
    let mut lowlink: HashMap<StateId, usize> = HashMap::new();
    let mut on_stack: HashMap<StateId, bool> = HashMap::new();
    let mut stack: Vec<StateId> = Vec::new();
    let mut next_index = 0usize;
    let mut scc_of: HashMap<StateId, usize> = HashMap::new();
    let mut states_of: Vec<Vec<StateId>> = Vec::new();

    // Classic iterative Tarjan: an explicit stack of (state, next child
    // index still to examine) standing in for the call stack.
    for &root in &states {
        if index.contains_key(&root) {
            continue;
        }
        let mut work: Vec<(StateId, usize)> = vec![(root, 0)];

        while let Some(&(v, i)) = work.last() {
            if i == 0 {
                index.insert(v, next_index);
                lowlink.insert(v, next_index);
                next_index += 1;
                stack.push(v);
                on_stack.insert(v, true);
            }
            let children = aut.out(v).to_vec();
            let mut recurse = false;
            let mut i = i;
            while i < children.len() {
                let w = aut.dst_of(children[i]);
                i += 1;
                if !index.contains_key(&w) {
                    work.last_mut().unwrap().1 = i;
                    work.push((w, 0));
                    recurse = true;
                    break;
                } else if *on_stack.get(&w).unwrap_or(&false) {
                    let lv = lowlink[&v].min(index[&w]);
                    lowlink.insert(v, lv);
                }
            }
            if recurse {
                continue;
            }
            work.pop();
            if let Some(&(parent, _)) = work.last() {
                let lv = lowlink[&parent].min(lowlink[&v]);
                lowlink.insert(parent, lv);
            }
            if lowlink[&v] == index[&v] {
                let mut component = Vec::new();
                loop {
                    let w = stack.pop().unwrap();
                    on_stack.insert(w, false);
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                let id = states_of.len();
                for &s in &component {
                    scc_of.insert(s, id);
                }
                states_of.push(component);
            }
        }
    }
    (scc_of, states_of)
}

/// Quotients `aut` by its SCCs. `pre`/`post` keep fixed ids 0 and 1.
/// Transitions carry original labels/weights; transitions that collapse
/// onto the same `(scc_src, scc_dst, label)` have their weights
/// accumulated (the automaton invariant forbids duplicate transitions,
/// so "not merged" from distinct labels is preserved, but same-label
/// collisions must combine). Delegates the actual partition-to-automaton
/// construction to [`super::minimize::quotient`], shared with
/// [`super::minimize::minimize`].
pub fn condensation<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> Automaton<L, W> {
    let (_, states_of) = tarjan_scc(aut);
    tracing::debug!("condensation: {} states collapse into {} components", aut.num_states(), states_of.len());
    super::minimize::quotient(aut, &states_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Label;
    use crate::context::Context;
    use crate::labelset::LetterSet;
    use crate::weightset::B;

    fn ctx() -> Context<LetterSet, B> {
        Context::new(LetterSet::new(['a']), B)
    }

    fn two_state_cycle() -> Automaton<LetterSet, B> {
        let mut aut = Automaton::new(ctx());
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        aut.set_initial(s0, true).unwrap();
        aut.set_final(s1, true).unwrap();
        aut.add_transition(s0, s1, Label::Value('a'), true).unwrap();
        aut.add_transition(s1, s0, Label::Value('a'), true).unwrap();
        aut
    }

    #[test]
    fn tarjan_groups_a_cycle_into_one_component() {
        let aut = two_state_cycle();
        let (scc_of, states_of) = tarjan_scc(&aut);
        let s0 = aut.states(false)[0];
        let s1 = aut.states(false)[1];
        assert_eq!(scc_of[&s0], scc_of[&s1]);
        // pre and post each get their own singleton component besides the cycle.
        assert_eq!(states_of.iter().filter(|c| c.len() == 2).count(), 1);
    }

    #[test]
    fn condensation_collapses_the_cycle_to_one_state() {
        let aut = two_state_cycle();
        let cond = condensation(&aut);
        assert_eq!(cond.num_states(), 1);
    }
}
