use std::collections::{HashMap, HashSet, VecDeque};

use crate::automaton::{Automaton, Label};
use crate::base::StateId;
use crate::error::{AwaliError, Result};
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

/// Which way epsilon-closures are propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProperDirection {
    /// Accumulate epsilon-predecessors' weight onto each non-epsilon
    /// transition's source.
    Forward,
    /// Symmetric: accumulate epsilon-successors' weight onto each
    /// non-epsilon transition's destination.
    Backward,
}

fn epsilon_neighbors<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, s: StateId, direction: ProperDirection) -> Vec<(StateId, W::Value)> {
    let trans = match direction {
        ProperDirection::Forward => aut.inn(s),
        ProperDirection::Backward => aut.out(s),
    };
    trans
        .iter()
        .filter(|&&t| aut.is_epsilon(aut.label_of(t)))
        .map(|&t| {
            let other = match direction {
                ProperDirection::Forward => aut.src_of(t),
                ProperDirection::Backward => aut.dst_of(t),
            };
            (other, aut.weight_of(t).clone())
        })
        .collect()
}

/// The epsilon-closure weight of every state reachable from `s` through
/// epsilon transitions only, including `s` itself with weight one.
/// Fails with `NonStarrable` if an epsilon cycle's total weight cannot be
/// starred in this weightset.
fn closure<L: LabelSet, W: WeightSet>(
    aut: &Automaton<L, W>,
    s: StateId,
    direction: ProperDirection,
) -> Result<HashMap<StateId, W::Value>> {
    let ws = aut.context().weightset();
    let mut dist: HashMap<StateId, W::Value> = HashMap::new();
    dist.insert(s, ws.one());
    let mut queue = VecDeque::new();
    queue.push_back(s);
    let mut on_path: HashSet<StateId> = HashSet::new();
    on_path.insert(s);

    while let Some(cur) = queue.pop_front() {
        let cur_weight = dist[&cur].clone();
        for (other, w) in epsilon_neighbors(aut, cur, direction) {
            let contrib = ws.mul(&cur_weight, &w);
            if other == cur {
                // epsilon self-loop: fold into this state's own weight via star.
                let starred = ws.star(&w).map_err(|_| AwaliError::non_starrable(ws.print(&w)))?;
                let new_weight = ws.mul(&cur_weight, &starred);
                dist.insert(cur, new_weight);
                continue;
            }
            let acc = dist.get(&other).cloned().unwrap_or_else(|| ws.zero());
            let merged = ws.add(&acc, &contrib);
            let first_visit = !dist.contains_key(&other);
            dist.insert(other, merged);
            if first_visit {
                queue.push_back(other);
            }
        }
    }
    Ok(dist)
}

/// Removes epsilon transitions, folding their weight into the surviving
/// non-epsilon transitions and initial/final weights. Requires
/// `ctx.has_one()`. Fails with `NonStarrable` if an epsilon cycle's weight
/// cannot be starred.
pub fn proper<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, direction: ProperDirection) -> Result<Automaton<L, W>> {
    if !aut.context().has_one() {
        return Err(AwaliError::unsupported("proper", aut.context().name()));
    }
    tracing::debug!("proper: removing epsilon transitions ({direction:?})");
    let ws = aut.context().weightset();
    let mut out = Automaton::new(aut.context().clone());
    let mut map = HashMap::new();
    for s in aut.states(false) {
        map.insert(s, out.add_state());
    }
    for (s, &ns) in &map {
        if let Some(w) = aut.initial_weight(*s) {
            out.set_initial(ns, w)?;
        }
        if let Some(w) = aut.final_weight(*s) {
            out.set_final(ns, w)?;
        }
    }

    for &s in map.keys() {
        let cl = closure(aut, s, direction)?;
        match direction {
            ProperDirection::Forward => {
                // each of s's own non-epsilon transitions t: s -> dst is
                // copied onto every epsilon-predecessor pred of s, scaled by
                // the weight of the epsilon path pred => s.
                let fw = aut.final_weight(s);
                for (pred, pred_w) in &cl {
                    for &t in aut.out(s) {
                        if aut.is_epsilon(aut.label_of(t)) {
                            continue;
                        }
                        let dst = aut.dst_of(t);
                        let Some(&ndst) = map.get(&dst) else { continue };
                        let weight = ws.mul(pred_w, aut.weight_of(t));
                        out.add_transition(map[pred], ndst, aut.label_of(t).clone(), weight)?;
                    }
                    if *pred != s {
                        if let Some(fw) = &fw {
                            out.add_final(map[pred], ws.mul(pred_w, fw))?;
                        }
                    }
                }
            }
            ProperDirection::Backward => {
                // mirror: s's own non-epsilon transitions t: src -> s are
                // copied onto every epsilon-successor succ of s, scaled by
                // the weight of the epsilon path s => succ.
                let iw = aut.initial_weight(s);
                for (succ, succ_w) in &cl {
                    for &t in aut.inn(s) {
                        if aut.is_epsilon(aut.label_of(t)) {
                            continue;
                        }
                        let src = aut.src_of(t);
                        let Some(&nsrc) = map.get(&src) else { continue };
                        let weight = ws.mul(aut.weight_of(t), succ_w);
                        out.add_transition(nsrc, map[succ], aut.label_of(t).clone(), weight)?;
                    }
                    if *succ != s {
                        if let Some(iw) = &iw {
                            out.add_initial(map[succ], ws.mul(iw, succ_w))?;
                        }
                    }
                }
            }
        }
    }
    Ok(out)
}

impl std::fmt::Display for ProperDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProperDirection::Forward => write!(f, "forward"),
            ProperDirection::Backward => write!(f, "backward"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::eval;
    use crate::context::Context;
    use crate::labelset::{LetterSet, NullableSet};
    use crate::weightset::Z;

    fn ctx() -> Context<NullableSet<LetterSet>, Z> {
        Context::new(NullableSet::new(LetterSet::new(['a'])), Z)
    }

    #[test]
    fn proper_folds_epsilon_weight_into_survivors() {
        let mut aut = Automaton::new(ctx());
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        let s2 = aut.add_state();
        aut.set_initial(s0, 1).unwrap();
        aut.new_epsilon_trans(s0, s1, 2).unwrap();
        aut.new_transition(s1, s2, Label::Value('a'), 3).unwrap();
        aut.set_final(s2, 1).unwrap();

        let propered = proper(&aut, ProperDirection::Forward).unwrap();
        for s in propered.states(true) {
            for &t in propered.out(s) {
                assert!(!propered.is_epsilon(propered.label_of(t)));
            }
        }
        assert_eq!(eval(&propered, &['a']).unwrap(), 6);
    }

    #[test]
    fn proper_requires_a_context_that_admits_epsilon() {
        let plain: Context<LetterSet, Z> = Context::new(LetterSet::new(['a']), Z);
        let aut = Automaton::new(plain);
        assert!(proper(&aut, ProperDirection::Forward).is_err());
    }
}
