use std::collections::HashMap;

use crate::automaton::{Automaton, Label};
use crate::base::StateId;
use crate::error::{AwaliError, Result};
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

type Vector<W> = HashMap<StateId, <W as WeightSet>::Value>;

fn at<W: WeightSet>(ws: &W, v: &Vector<W>, s: StateId) -> W::Value {
    v.get(&s).cloned().unwrap_or_else(|| ws.zero())
}

fn scale<W: WeightSet>(ws: &W, v: &Vector<W>, k: &W::Value) -> Vector<W> {
    let mut out = Vector::<W>::new();
    for (s, w) in v {
        let nw = ws.mul(w, k);
        if !ws.is_zero(&nw) {
            out.insert(*s, nw);
        }
    }
    out
}

fn sub_vec<W: WeightSet>(ws: &W, a: &Vector<W>, b: &Vector<W>) -> Result<Vector<W>> {
    let mut out = a.clone();
    for (s, bw) in b {
        let aw = at(ws, &out, *s);
        let diff = ws.sub(&aw, bw).ok_or_else(|| AwaliError::not_implemented("reduce", ws.name()))?;
        if ws.is_zero(&diff) {
            out.remove(s);
        } else {
            out.insert(*s, diff);
        }
    }
    Ok(out)
}

/// One row of a reduced row-echelon basis over the state space: `vector`
/// has a `1` at `pivot` and a `0` at every other basis row's pivot.
struct BasisRow<W: WeightSet> {
    pivot: StateId,
    vector: Vector<W>,
}

/// Reduces `v` against `basis`, returning the (should-be-zero, once `v`
/// lies in the span) remainder and the coordinates subtracted off at
/// each basis row.
fn reduce_capture<W: WeightSet>(ws: &W, basis: &[BasisRow<W>], mut v: Vector<W>) -> Result<(Vector<W>, Vec<W::Value>)> {
    let mut coeffs = vec![ws.zero(); basis.len()];
    for (i, row) in basis.iter().enumerate() {
        let c = at(ws, &v, row.pivot);
        if !ws.is_zero(&c) {
            v = sub_vec(ws, &v, &scale(ws, &row.vector, &c))?;
            coeffs[i] = c;
        }
    }
    Ok((v, coeffs))
}

/// Reduces `v` against `basis`; if a nonzero remainder survives, folds it
/// in as a new row (normalized to `1` at its own pivot, back-substituted
/// into every earlier row so the basis stays in reduced echelon form).
/// Returns whether a new row was added.
fn try_insert<W: WeightSet>(ws: &W, basis: &mut Vec<BasisRow<W>>, v: Vector<W>) -> Result<bool> {
    let (remaining, _) = reduce_capture(ws, basis, v)?;
    if remaining.is_empty() {
        return Ok(false);
    }
    let mut entries: Vec<(StateId, W::Value)> = remaining.into_iter().collect();
    entries.sort_by_key(|(s, _)| *s);
    let (pivot, pivot_val) = entries[0].clone();
    let mut normalized = Vector::<W>::new();
    for (s, w) in entries {
        let nv = ws.div(&w, &pivot_val).ok_or_else(|| AwaliError::not_implemented("reduce", ws.name()))?;
        normalized.insert(s, nv);
    }
    for row in basis.iter_mut() {
        let c = at(ws, &row.vector, pivot);
        if !ws.is_zero(&c) {
            row.vector = sub_vec(ws, &row.vector, &scale(ws, &normalized, &c))?;
        }
    }
    basis.push(BasisRow { pivot, vector: normalized });
    Ok(true)
}

/// `v * mu(a)`: propagates a state-indexed vector one step forward
/// through every transition labeled `a`.
fn forward_image<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, ws: &W, v: &Vector<W>, a: &L::Value) -> Vector<W> {
    let mut image = Vector::<W>::new();
    for (&s, w) in v {
        for &t in aut.out(s) {
            if aut.label_of(t) != &Label::Value(a.clone()) {
                continue;
            }
            let dst = aut.dst_of(t);
            let sum = ws.add(&at(ws, &image, dst), &ws.mul(w, aut.weight_of(t)));
            if ws.is_zero(&sum) {
                image.remove(&dst);
            } else {
                image.insert(dst, sum);
            }
        }
    }
    image
}

fn dot<W: WeightSet>(ws: &W, v: &Vector<W>, other: &Vector<W>) -> W::Value {
    let mut total = ws.zero();
    for (s, w) in v {
        if let Some(o) = other.get(s) {
            total = ws.add(&total, &ws.mul(w, o));
        }
    }
    total
}

/// Right-reduction: projects the automaton onto the subspace spanned by
/// the orbit of the initial vector under the transition action (`λ`,
/// `λ·μ(a)`, `λ·μ(a)·μ(b)`, ...), the dual-basis linear-algebra reduction
/// from spec, restricted to field weightsets (`Q`, `R`, `C` — anything
/// with `WeightSet::div` defined; `NotImplemented` otherwise, including
/// `Z` and `B`, since general reduction over a ring needs Smith normal
/// form rather than plain Gaussian elimination).
pub fn right_reduce<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> Result<Automaton<L, W>> {
    let ws = aut.context().weightset();
    let alphabet = aut.context().labelset().alphabet();
    tracing::debug!("right_reduce: {} states over alphabet of size {}", aut.num_states(), alphabet.len());

    let mut lambda = Vector::<W>::new();
    for s in aut.states(false) {
        if let Some(w) = aut.initial_weight(s) {
            lambda.insert(s, w);
        }
    }

    let mut basis: Vec<BasisRow<W>> = Vec::new();
    let mut frontier: Vec<Vector<W>> = Vec::new();
    if try_insert(ws, &mut basis, lambda.clone())? {
        frontier.push(basis.last().unwrap().vector.clone());
    }
    while let Some(v) = frontier.pop() {
        for a in &alphabet {
            let image = forward_image(aut, ws, &v, a);
            if try_insert(ws, &mut basis, image)? {
                frontier.push(basis.last().unwrap().vector.clone());
            }
        }
    }

    if basis.is_empty() {
        return Ok(Automaton::new(aut.context().clone()));
    }

    let mut gamma = Vector::<W>::new();
    for s in aut.states(false) {
        if let Some(w) = aut.final_weight(s) {
            gamma.insert(s, w);
        }
    }
    let (_, lambda_coords) = reduce_capture(ws, &basis, lambda)?;

    let mut out = Automaton::new(aut.context().clone());
    let new_states: Vec<StateId> = (0..basis.len()).map(|_| out.add_state()).collect();

    for (i, &ns) in new_states.iter().enumerate() {
        if !ws.is_zero(&lambda_coords[i]) {
            out.set_initial(ns, lambda_coords[i].clone())?;
        }
        let g = dot(ws, &basis[i].vector, &gamma);
        if !ws.is_zero(&g) {
            out.set_final(ns, g)?;
        }
    }
    for (i, row) in basis.iter().enumerate() {
        for a in &alphabet {
            let image = forward_image(aut, ws, &row.vector, a);
            let (_, coords) = reduce_capture(ws, &basis, image)?;
            for (j, c) in coords.iter().enumerate() {
                if !ws.is_zero(c) {
                    out.add_transition(new_states[i], new_states[j], Label::Value(a.clone()), c.clone())?;
                }
            }
        }
    }
    tracing::debug!("right_reduce: reduced to {} states", basis.len());
    Ok(out)
}

/// Reverses every transition and swaps initial/final weights, used to
/// express [`left_reduce`] as [`right_reduce`] on the mirror automaton.
fn mirror<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> Automaton<L, W> {
    let mut out = Automaton::new(aut.context().clone());
    let mut map = HashMap::new();
    for s in aut.states(false) {
        map.insert(s, out.add_state());
    }
    for (&s, &ns) in &map {
        if let Some(w) = aut.final_weight(s) {
            let _ = out.set_initial(ns, w);
        }
        if let Some(w) = aut.initial_weight(s) {
            let _ = out.set_final(ns, w);
        }
    }
    for &s in map.keys() {
        for &t in aut.out(s) {
            let dst = aut.dst_of(t);
            let Some(&ndst) = map.get(&dst) else { continue };
            if let Label::Value(v) = aut.label_of(t) {
                let _ = out.add_transition(ndst, map[&s], Label::Value(v.clone()), aut.weight_of(t).clone());
            }
        }
    }
    out
}

/// Left-reduction: the dual of [`right_reduce`] (projects onto the
/// orbit of the *final* vector under the reversed transition action),
/// implemented via [`mirror`] rather than duplicating the closure logic.
pub fn left_reduce<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> Result<Automaton<L, W>> {
    tracing::debug!("left_reduce: {} states", aut.num_states());
    let reduced = right_reduce(&mirror(aut))?;
    Ok(mirror(&reduced))
}

/// `reduce = right_reduce . left_reduce`: a state-minimal equivalent
/// representation over the same (field) semiring.
pub fn reduce<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> Result<Automaton<L, W>> {
    right_reduce(&left_reduce(aut)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::eval;
    use crate::context::Context;
    use crate::labelset::LetterSet;
    use crate::weightset::{Q, B};

    fn q_ctx() -> Context<LetterSet, Q> {
        Context::new(LetterSet::new(['a']), Q)
    }

    fn two_equivalent_paths() -> Automaton<LetterSet, Q> {
        let half = num_rational::Ratio::<i64>::new(1, 2);
        let mut aut = Automaton::new(q_ctx());
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        let s2 = aut.add_state();
        aut.set_initial(s0, half).unwrap();
        aut.set_initial(s1, half).unwrap();
        aut.set_final(s2, num_rational::Ratio::<i64>::new(1, 1)).unwrap();
        aut.add_transition(s0, s2, Label::Value('a'), num_rational::Ratio::<i64>::new(1, 1)).unwrap();
        aut.add_transition(s1, s2, Label::Value('a'), num_rational::Ratio::<i64>::new(1, 1)).unwrap();
        aut
    }

    #[test]
    fn right_reduce_collapses_redundant_initial_states() {
        let aut = two_equivalent_paths();
        let reduced = right_reduce(&aut).unwrap();
        assert!(reduced.num_states() < aut.num_states());
        for word in [vec![], vec!['a']] {
            assert_eq!(eval(&aut, &word).unwrap(), eval(&reduced, &word).unwrap());
        }
    }

    #[test]
    fn reduce_preserves_behavior_of_a_small_automaton() {
        let aut = two_equivalent_paths();
        let reduced = reduce(&aut).unwrap();
        for word in [vec![], vec!['a']] {
            assert_eq!(eval(&aut, &word).unwrap(), eval(&reduced, &word).unwrap());
        }
    }

    #[test]
    fn reduce_is_not_implemented_over_the_boolean_semiring() {
        let ctx: Context<LetterSet, B> = Context::new(LetterSet::new(['a']), B);
        let aut = Automaton::new(ctx);
        assert!(reduce(&aut).is_err());
    }
}
