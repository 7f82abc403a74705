use std::collections::HashMap;

use crate::automaton::Automaton;
use crate::base::{StateId, POST, PRE};
use crate::expression::{Expression, RatExpSet};
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

/// How the next state to eliminate is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationStrategy {
    /// Eliminate states in their existing `StateId` order.
    InOrder,
    /// Minimise `|in| * |out|`, preferring states without a self-loop
    /// when scores tie.
    DegreeHeuristic,
}

type Adjacency<L, W> = HashMap<StateId, HashMap<StateId, Expression<L, W>>>;

fn edge_expr<L: LabelSet, W: WeightSet>(rs: &RatExpSet<L, W>, aut: &Automaton<L, W>, t: crate::base::TransId) -> Expression<L, W> {
    use crate::automaton::Label;
    let w = aut.weight_of(t).clone();
    let base = match aut.label_of(t) {
        Label::Value(v) => rs.atom(v.clone()),
        Label::Epsilon | Label::PrePost => rs.one(),
    };
    rs.lweight(w, &base)
}

fn build_adjacency<L: LabelSet, W: WeightSet>(rs: &RatExpSet<L, W>, aut: &Automaton<L, W>) -> Adjacency<L, W> {
    let mut adj: Adjacency<L, W> = HashMap::new();
    for s in aut.states(true) {
        for &t in aut.out(s) {
            let dst = aut.dst_of(t);
            let e = edge_expr(rs, aut, t);
            let row = adj.entry(s).or_default();
            let merged = match row.get(&dst) {
                Some(existing) => rs.sum(existing, &e),
                None => e,
            };
            row.insert(dst, merged);
        }
    }
    adj
}

fn pick_next<L: LabelSet, W: WeightSet>(adj: &Adjacency<L, W>, remaining: &[StateId], strategy: EliminationStrategy) -> StateId {
    match strategy {
        EliminationStrategy::InOrder => remaining[0],
        EliminationStrategy::DegreeHeuristic => {
            let mut best = remaining[0];
            let mut best_score = (usize::MAX, true);
            for &s in remaining {
                let in_deg = adj.values().filter(|row| row.contains_key(&s)).count();
                let out_deg = adj.get(&s).map(|row| row.len()).unwrap_or(0);
                let has_self_loop = adj.get(&s).map(|row| row.contains_key(&s)).unwrap_or(false);
                let score = (in_deg * out_deg, has_self_loop);
                if score < best_score {
                    best_score = score;
                    best = s;
                }
            }
            best
        }
    }
}

/// Reduces `aut` to a single rational expression by iterative state
/// elimination: each removed state `st` is replaced by, for every
/// `(predecessor p, successor q)` pair, a transition `e(p,st) . star(loop)
/// . e(st,q)` folded into the existing `p -> q` edge.
pub fn eliminate_states<L: LabelSet, W: WeightSet>(
    rs: &RatExpSet<L, W>,
    aut: &Automaton<L, W>,
    strategy: EliminationStrategy,
) -> Expression<L, W> {
    tracing::debug!("eliminate_states: {} states to remove, strategy={strategy:?}", aut.num_states().saturating_sub(2));
    let mut adj = build_adjacency(rs, aut);
    let mut remaining: Vec<StateId> = aut.states(false);

    while !remaining.is_empty() {
        let st = pick_next(&adj, &remaining, strategy);
        remaining.retain(|&s| s != st);

        let self_loop = adj.get(&st).and_then(|row| row.get(&st).cloned()).unwrap_or_else(|| rs.zero());
        let star = rs.star(&self_loop);

        let incoming: Vec<(StateId, Expression<L, W>)> = adj
            .iter()
            .filter(|&(p, _)| *p != st)
            .filter_map(|(&p, row)| row.get(&st).map(|e| (p, e.clone())))
            .collect();
        let outgoing: Vec<(StateId, Expression<L, W>)> = adj
            .get(&st)
            .map(|row| row.iter().filter(|&(q, _)| *q != st).map(|(&q, e)| (q, e.clone())).collect())
            .unwrap_or_default();

        for (p, e_in) in &incoming {
            for (q, e_out) in &outgoing {
                let through = rs.prod(&rs.prod(e_in, &star), e_out);
                let row = adj.entry(*p).or_default();
                let merged = match row.get(q) {
                    Some(existing) => rs.sum(existing, &through),
                    None => through,
                };
                row.insert(*q, merged);
            }
        }

        adj.remove(&st);
        for row in adj.values_mut() {
            row.remove(&st);
        }
    }

    adj.get(&PRE).and_then(|row| row.get(&POST).cloned()).unwrap_or_else(|| rs.zero())
}

impl std::fmt::Display for EliminationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EliminationStrategy::InOrder => write!(f, "in-order"),
            EliminationStrategy::DegreeHeuristic => write!(f, "degree-heuristic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::expression::Identities;
    use crate::labelset::LetterSet;
    use crate::weightset::B;

    fn ctx() -> Context<LetterSet, B> {
        Context::new(LetterSet::new(['a', 'b']), B)
    }

    #[test]
    fn eliminating_a_single_transition_yields_its_atom() {
        let c = ctx();
        let mut aut = Automaton::new(c.clone());
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        aut.set_initial(s0, true).unwrap();
        aut.set_final(s1, true).unwrap();
        aut.add_transition(s0, s1, crate::automaton::Label::Value('a'), true).unwrap();

        let rs = RatExpSet::new(c, Identities::Trivial);
        let e = eliminate_states(&rs, &aut, EliminationStrategy::InOrder);
        assert_eq!(rs.print(&e), rs.print(&rs.atom('a')));
    }

    #[test]
    fn in_order_and_degree_heuristic_agree_on_constant_term() {
        let c = ctx();
        let mut aut = Automaton::new(c.clone());
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        let s2 = aut.add_state();
        aut.set_initial(s0, true).unwrap();
        aut.set_final(s2, true).unwrap();
        aut.set_final(s0, true).unwrap();
        aut.add_transition(s0, s1, crate::automaton::Label::Value('a'), true).unwrap();
        aut.add_transition(s1, s1, crate::automaton::Label::Value('b'), true).unwrap();
        aut.add_transition(s1, s2, crate::automaton::Label::Value('a'), true).unwrap();

        let rs = RatExpSet::new(c, Identities::Trivial);
        let by_order = eliminate_states(&rs, &aut, EliminationStrategy::InOrder);
        let by_degree = eliminate_states(&rs, &aut, EliminationStrategy::DegreeHeuristic);
        assert_eq!(rs.constant_term(&by_order).unwrap(), rs.constant_term(&by_degree).unwrap());
        assert_eq!(rs.constant_term(&by_order).unwrap(), true);
    }
}
