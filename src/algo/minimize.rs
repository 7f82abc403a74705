use std::collections::HashMap;

use crate::automaton::{Automaton, History};
use crate::base::{StateId, POST, PRE};
use crate::error::Result;
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

/// Builds an automaton whose states are the blocks of `partition`
/// (`pre`/`post` must each appear as a singleton block containing exactly
/// `PRE`/`POST`, and keep those fixed ids). Transitions, initial and final
/// weights of collapsed states with the same `(label)` are accumulated.
/// Shared by [`super::scc::condensation`] and [`minimize`], which both
/// reduce to "build one automaton per part of a state partition".
pub fn quotient<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, partition: &[Vec<StateId>]) -> Automaton<L, W> {
    let mut out = Automaton::new(aut.context().clone());
    let mut state_of: HashMap<StateId, StateId> = HashMap::new();
    let mut part_of_state: HashMap<usize, StateId> = HashMap::new();
    let mut history = History::new();

    let pre_part = partition.iter().position(|p| p.contains(&PRE)).expect("pre must be in some block");
    let post_part = partition.iter().position(|p| p.contains(&POST)).expect("post must be in some block");

    for (id, members) in partition.iter().enumerate() {
        let ns = if id == pre_part {
            PRE
        } else if id == post_part {
            POST
        } else {
            out.add_state()
        };
        part_of_state.insert(id, ns);
        history.set_partition(ns, members.clone());
        for &m in members {
            state_of.insert(m, ns);
        }
    }

    for s in aut.states(true) {
        for &t in aut.out(s) {
            let dst = aut.dst_of(t);
            let ns = state_of[&s];
            let nd = state_of[&dst];
            let _ = out.add_transition(ns, nd, aut.label_of(t).clone(), aut.weight_of(t).clone());
        }
    }
    out.set_history(history);
    out
}

/// Partitions states by `(is_initial?, initial_weight, is_final?,
/// final_weight)`, the coarsest sound starting point for Hopcroft
/// refinement (`pre`/`post` are always singleton blocks of their own).
fn initial_partition<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> Vec<Vec<StateId>> {
    let ws = aut.context().weightset();
    let mut groups: HashMap<String, Vec<StateId>> = HashMap::new();
    for s in aut.states(false) {
        let fw = aut.final_weight(s).map(|w| ws.print(&w));
        let key = match fw {
            Some(w) => format!("final:{w}"),
            None => "nonfinal".to_string(),
        };
        groups.entry(key).or_default().push(s);
    }
    let mut partition: Vec<Vec<StateId>> = vec![vec![PRE], vec![POST]];
    partition.extend(groups.into_values());
    partition
}

/// Signature of `s` with respect to the current `block_of` assignment:
/// for each letter, which block `s`'s transition on that letter lands in
/// and with what accumulated weight. Two states refine apart iff their
/// signatures differ.
fn signature<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, s: StateId, block_of: &HashMap<StateId, usize>, ws: &W) -> Vec<(String, usize, String)> {
    let mut per_label: HashMap<String, HashMap<usize, W::Value>> = HashMap::new();
    for &t in aut.out(s) {
        let label_key = format!("{:?}", aut.label_of(t));
        let dst_block = block_of[&aut.dst_of(t)];
        let entry = per_label.entry(label_key).or_default();
        let acc = entry.get(&dst_block).cloned().unwrap_or_else(|| ws.zero());
        entry.insert(dst_block, ws.add(&acc, aut.weight_of(t)));
    }
    let mut sig: Vec<(String, usize, String)> = Vec::new();
    for (label, by_block) in per_label {
        let mut blocks: Vec<_> = by_block.into_iter().collect();
        blocks.sort_by_key(|(b, _)| *b);
        for (b, w) in blocks {
            sig.push((label.clone(), b, ws.print(&w)));
        }
    }
    sig.sort();
    sig
}

/// Hopcroft-style partition refinement minimization. Fixed-point
/// signature refinement rather than the splitter-queue formulation: same
/// result, simpler to follow, without the amortised complexity bound.
/// Requires a deterministic automaton (run [`super::determinize`] first
/// if needed) for the quotient to itself be deterministic and minimal.
pub fn minimize<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, cancellative: bool) -> Result<Automaton<L, W>> {
    let ws = aut.context().weightset();
    let mut partition = initial_partition(aut);
    tracing::debug!("minimize: {} states, {} initial blocks, cancellative={cancellative}", aut.num_states(), partition.len());

    loop {
        let mut block_of: HashMap<StateId, usize> = HashMap::new();
        for (id, members) in partition.iter().enumerate() {
            for &m in members {
                block_of.insert(m, id);
            }
        }

        let mut next_partition: Vec<Vec<StateId>> = Vec::new();
        let mut changed = false;
        for block in &partition {
            if block.len() == 1 {
                next_partition.push(block.clone());
                continue;
            }
            let mut by_sig: HashMap<Vec<(String, usize, String)>, Vec<StateId>> = HashMap::new();
            for &s in block {
                let sig = signature(aut, s, &block_of, ws);
                by_sig.entry(sig).or_default().push(s);
            }
            if by_sig.len() > 1 {
                changed = true;
            }
            let mut groups: Vec<Vec<StateId>> = by_sig.into_values().collect();
            if cancellative && groups.len() > 1 {
                groups.sort_by_key(|g| std::cmp::Reverse(g.len()));
            }
            next_partition.extend(groups);
        }
        partition = next_partition;
        if !changed {
            break;
        }
    }

    tracing::debug!("minimize: converged to {} blocks", partition.len());
    Ok(quotient(aut, &partition))
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
    fn minimize_merges_equivalent_final_states() {
        let mut aut = Automaton::new(ctx());
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        let s2 = aut.add_state();
        aut.set_initial(s0, true).unwrap();
        aut.set_final(s1, true).unwrap();
        aut.set_final(s2, true).unwrap();
        aut.add_transition(s0, s1, Label::Value('a'), true).unwrap();
        aut.add_transition(s0, s2, Label::Value('b'), true).unwrap();

        let min = minimize(&aut, false).unwrap();
        assert_eq!(min.num_states(), 2);
    }

    #[test]
    fn minimize_is_idempotent_on_state_count() {
        let mut aut = Automaton::new(ctx());
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        aut.set_initial(s0, true).unwrap();
        aut.set_final(s1, true).unwrap();
        aut.add_transition(s0, s1, Label::Value('a'), true).unwrap();

        let once = minimize(&aut, false).unwrap();
        let twice = minimize(&once, false).unwrap();
        assert_eq!(once.num_states(), twice.num_states());
    }

    #[test]
    fn quotient_keeps_pre_and_post_fixed() {
        let mut aut = Automaton::new(ctx());
        let s0 = aut.add_state();
        aut.set_initial(s0, true).unwrap();
        aut.set_final(s0, true).unwrap();
        let partition = vec![vec![crate::base::PRE], vec![crate::base::POST], vec![s0]];
        let q = quotient(&aut, &partition);
        assert_eq!(q.num_states(), 1);
    }
}
