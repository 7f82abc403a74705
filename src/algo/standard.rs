use crate::automaton::{Automaton, Label};
use crate::base::{StateId, PRE};
use crate::context::Context;
use crate::error::{AwaliError, Result};
use crate::expression::{ExpKind, Expression};
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

/// `pre`'s unique outgoing transition targets the initial state with
/// weight one, and that state has no other incoming transition.
pub fn is_standard<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>) -> bool {
    if aut.num_initials() != 1 {
        return false;
    }
    let ws = aut.context().weightset();
    let init_trans = aut.out(PRE)[0];
    let s = aut.dst_of(init_trans);
    if !ws.is_one(aut.weight_of(init_trans)) {
        return false;
    }
    aut.inn(s).iter().all(|&t| aut.src_of(t) == PRE)
}

/// Redirects every initial state's outgoing transitions onto a single
/// fresh initial state (weighted by the initial weight), then drops the
/// old initials that became orphaned (no other incoming transition).
pub fn standard_here<L: LabelSet, W: WeightSet>(aut: &mut Automaton<L, W>) -> Result<()> {
    let ws = aut.context().weightset().clone();
    let old_initials: Vec<(StateId, W::Value)> = aut
        .out(PRE)
        .iter()
        .map(|&t| (aut.dst_of(t), aut.weight_of(t).clone()))
        .collect();
    if old_initials.len() == 1 && ws.is_one(&old_initials[0].1) {
        return Ok(());
    }
    let new_init = aut.add_state();
    for (s, w) in &old_initials {
        aut.del_transition_by_endpoints(PRE, *s, &Label::PrePost);
        for &t in aut.out(*s).to_vec().iter() {
            let dst = aut.dst_of(t);
            let label = aut.label_of(t).clone();
            let tw = aut.weight_of(t).clone();
            aut.add_transition(new_init, dst, label, ws.mul(w, &tw))?;
        }
        if aut.is_final(*s) {
            let fw = aut.final_weight(*s).unwrap();
            aut.add_final(new_init, ws.mul(w, &fw))?;
        }
    }
    aut.set_initial(new_init, ws.one())?;
    for (s, _) in &old_initials {
        if aut.inn(*s).is_empty() && aut.out(*s).is_empty() && !aut.is_final(*s) {
            aut.del_state(*s);
        }
    }
    Ok(())
}

/// Builds a standard automaton from a free-monoid expression by the
/// classical inductive construction. `complement`/`conjunction`/`shuffle`/
/// `ldiv`/`transposition` have no standard-automaton construction and fail
/// with `UnsupportedInContext`.
pub fn standard<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, e: &Expression<L, W>) -> Result<Automaton<L, W>> {
    tracing::trace!(kind = ?e.kind(), "standard: building from expression node");
    let ws = ctx.weightset();
    match e.kind() {
        ExpKind::Zero => Ok(Automaton::new(ctx.clone())),
        ExpKind::One => {
            let mut aut = Automaton::new(ctx.clone());
            let s = aut.add_state();
            aut.set_initial(s, ws.one())?;
            aut.set_final(s, ws.one())?;
            Ok(aut)
        }
        ExpKind::Atom(label) => {
            let mut aut = Automaton::new(ctx.clone());
            let s0 = aut.add_state();
            let s1 = aut.add_state();
            aut.set_initial(s0, ws.one())?;
            aut.new_transition(s0, s1, Label::Value(label.clone()), ws.one())?;
            aut.set_final(s1, ws.one())?;
            Ok(aut)
        }
        ExpKind::Sum(terms) => {
            let mut acc = standard(ctx, &terms[0])?;
            for t in &terms[1..] {
                acc = standard_sum(ctx, &acc, &standard(ctx, t)?)?;
            }
            Ok(acc)
        }
        ExpKind::Prod(factors) => {
            let mut acc = standard(ctx, &factors[0])?;
            for f in &factors[1..] {
                acc = standard_prod(ctx, &acc, &standard(ctx, f)?)?;
            }
            Ok(acc)
        }
        ExpKind::Star(inner) => standard_star(ctx, &standard(ctx, inner)?),
        ExpKind::Plus(inner) => {
            let a = standard(ctx, inner)?;
            let star_a = standard_star(ctx, &a)?;
            standard_prod(ctx, &a, &star_a)
        }
        ExpKind::Maybe(inner) => {
            let mut one_aut = Automaton::new(ctx.clone());
            let s = one_aut.add_state();
            one_aut.set_initial(s, ws.one())?;
            one_aut.set_final(s, ws.one())?;
            let a = standard(ctx, inner)?;
            standard_sum(ctx, &one_aut, &a)
        }
        ExpKind::LWeight(k, inner) => {
            let mut a = standard(ctx, inner)?;
            scale_finals(&mut a, |fw| ws.mul(k, fw))?;
            Ok(a)
        }
        ExpKind::RWeight(inner, k) => {
            let mut a = standard(ctx, inner)?;
            scale_finals(&mut a, |fw| ws.mul(fw, k))?;
            Ok(a)
        }
        ExpKind::Complement(_) => Err(AwaliError::unsupported("standard", "complement")),
        ExpKind::Conjunction(_) => Err(AwaliError::unsupported("standard", "conjunction")),
        ExpKind::Shuffle(_) => Err(AwaliError::unsupported("standard", "shuffle")),
        ExpKind::LDiv(_, _) => Err(AwaliError::unsupported("standard", "left quotient")),
        ExpKind::Transposition(_) => Err(AwaliError::unsupported("standard", "transposition")),
    }
}

fn scale_finals<L: LabelSet, W: WeightSet>(
    aut: &mut Automaton<L, W>,
    f: impl Fn(&W::Value) -> W::Value,
) -> Result<()> {
    let finals: Vec<(StateId, W::Value)> = aut
        .states(false)
        .into_iter()
        .filter_map(|s| aut.final_weight(s).map(|w| (s, w)))
        .collect();
    for (s, w) in finals {
        aut.set_final(s, f(&w))?;
    }
    Ok(())
}

fn standard_sum<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, a: &Automaton<L, W>, b: &Automaton<L, W>) -> Result<Automaton<L, W>> {
    let ws = ctx.weightset();
    let mut out = Automaton::new(ctx.clone());
    let new_init = out.add_state();
    out.set_initial(new_init, ws.one())?;

    for (src, local) in [(a, true), (b, false)] {
        let init_s = src.out(PRE)[0];
        let init_dst = src.dst_of(init_s);
        let init_w = src.weight_of(init_s).clone();
        let mut map = std::collections::HashMap::new();
        for s in src.states(false) {
            if s == init_dst {
                continue;
            }
            map.insert(s, out.add_state());
        }
        let resolve = |s: StateId, map: &std::collections::HashMap<StateId, StateId>| -> StateId {
            if s == init_dst { new_init } else { map[&s] }
        };
        for s in src.states(false) {
            for &t in src.out(s) {
                let dst = src.dst_of(t);
                let label = src.label_of(t).clone();
                let w = src.weight_of(t).clone();
                let effective_w = if s == init_dst { ws.mul(&init_w, &w) } else { w };
                out.add_transition(resolve(s, &map), resolve(dst, &map), label, effective_w)?;
            }
            if let Some(fw) = src.final_weight(s) {
                let effective_w = if s == init_dst { ws.mul(&init_w, &fw) } else { fw };
                out.add_final(resolve(s, &map), effective_w)?;
            }
        }
        let _ = local;
    }
    Ok(out)
}

fn standard_prod<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, a: &Automaton<L, W>, b: &Automaton<L, W>) -> Result<Automaton<L, W>> {
    let ws = ctx.weightset();
    let mut out = Automaton::new(ctx.clone());

    let a_init_t = a.out(PRE)[0];
    let a_init = a.dst_of(a_init_t);
    let mut map_a = std::collections::HashMap::new();
    for s in a.states(false) {
        map_a.insert(s, out.add_state());
    }
    out.set_initial(map_a[&a_init], ws.one())?;
    for s in a.states(false) {
        for &t in a.out(s) {
            let dst = a.dst_of(t);
            out.new_transition(map_a[&s], map_a[&dst], a.label_of(t).clone(), a.weight_of(t).clone())?;
        }
    }

    let b_init_t = b.out(PRE)[0];
    let b_init = b.dst_of(b_init_t);
    let b_init_w = b.weight_of(b_init_t).clone();
    let mut map_b = std::collections::HashMap::new();
    for s in b.states(false) {
        if s == b_init {
            continue;
        }
        map_b.insert(s, out.add_state());
    }
    let resolve_b = |s: StateId, map: &std::collections::HashMap<StateId, StateId>, a_finals: &[(StateId, W::Value)]| -> Vec<StateId> {
        if s == b_init { a_finals.iter().map(|(f, _)| *f).collect() } else { vec![map[&s]] }
    };

    let a_finals: Vec<(StateId, W::Value)> = a
        .states(false)
        .into_iter()
        .filter_map(|s| a.final_weight(s).map(|w| (map_a[&s], w)))
        .collect();

    for s in b.states(false) {
        for &t in b.out(s) {
            let dst = b.dst_of(t);
            let label = b.label_of(t).clone();
            let w = b.weight_of(t).clone();
            let sources = resolve_b(s, &map_b, &a_finals);
            let targets = resolve_b(dst, &map_b, &a_finals);
            for (i, &src_s) in sources.iter().enumerate() {
                let factor = if s == b_init { ws.mul(&a_finals[i].1, &ws.mul(&b_init_w, &w)) } else { w.clone() };
                for &dst_s in &targets {
                    out.add_transition(src_s, dst_s, label.clone(), factor.clone())?;
                }
            }
        }
        if let Some(fw) = b.final_weight(s) {
            let targets = resolve_b(s, &map_b, &a_finals);
            for (i, &t) in targets.iter().enumerate() {
                let factor = if s == b_init { ws.mul(&a_finals[i].1, &ws.mul(&b_init_w, &fw)) } else { fw.clone() };
                out.add_final(t, factor)?;
            }
        }
    }
    Ok(out)
}

fn standard_star<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, a: &Automaton<L, W>) -> Result<Automaton<L, W>> {
    let ws = ctx.weightset();
    let init_t = a.out(PRE)[0];
    let init = a.dst_of(init_t);

    let mut out = Automaton::new(ctx.clone());
    let mut map = std::collections::HashMap::new();
    for s in a.states(false) {
        map.insert(s, out.add_state());
    }
    out.set_initial(map[&init], ws.one())?;
    for s in a.states(false) {
        for &t in a.out(s) {
            out.new_transition(map[&s], map[&a.dst_of(t)], a.label_of(t).clone(), a.weight_of(t).clone())?;
        }
        if let Some(fw) = a.final_weight(s) {
            out.add_final(map[&s], fw)?;
        }
    }
    out.add_final(map[&init], ws.one())?;

    let init_out: Vec<(Label<L::Value>, StateId, W::Value)> = a
        .out(init)
        .iter()
        .map(|&t| (a.label_of(t).clone(), map[&a.dst_of(t)], a.weight_of(t).clone()))
        .collect();
    let finals: Vec<(StateId, W::Value)> = a
        .states(false)
        .into_iter()
        .filter_map(|s| a.final_weight(s).map(|w| (map[&s], w)))
        .collect();
    for (f, fw) in &finals {
        for (label, dst, w) in &init_out {
            out.add_transition(*f, *dst, label.clone(), ws.mul(fw, w))?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::labelset::LetterSet;
    use crate::weightset::B;

    fn ctx() -> Context<LetterSet, B> {
        Context::new(LetterSet::new(['a']), B)
    }

    #[test]
    fn standard_here_merges_several_initials_into_one() {
        let mut aut = Automaton::new(ctx());
        let s0 = aut.add_state();
        let s1 = aut.add_state();
        aut.set_initial(s0, true).unwrap();
        aut.set_initial(s1, true).unwrap();
        aut.set_final(s0, true).unwrap();
        aut.set_final(s1, true).unwrap();
        assert!(!is_standard(&aut));

        standard_here(&mut aut).unwrap();
        assert!(is_standard(&aut));
        assert_eq!(aut.num_initials(), 1);
    }

    #[test]
    fn standard_of_an_atom_is_already_standard() {
        let c = ctx();
        let rs = crate::expression::RatExpSet::new(c.clone(), crate::expression::Identities::Trivial);
        let e = rs.atom('a');
        let aut = standard(&c, &e).unwrap();
        assert!(is_standard(&aut));
    }
}
