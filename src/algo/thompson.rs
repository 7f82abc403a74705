use crate::automaton::{Automaton, Label};
use crate::base::StateId;
use crate::context::Context;
use crate::error::{AwaliError, Result};
use crate::expression::{ExpKind, Expression};
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

struct Piece {
    init: StateId,
    fin: StateId,
}

fn unsupported(op: &str) -> AwaliError {
    AwaliError::unsupported("thompson", op)
}

/// Canonical two-state-per-operator Thompson construction. Requires
/// `ctx.has_one()`. States get a free-form (`string`) history tag.
pub fn thompson<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, e: &Expression<L, W>) -> Result<Automaton<L, W>> {
    if !ctx.has_one() {
        return Err(unsupported("epsilon transitions required"));
    }
    let mut aut = Automaton::new(ctx.clone());
    let mut history = crate::automaton::History::new();
    let piece = build(&mut aut, &mut history, e, false)?;
    aut.set_initial(piece.init, ctx.weightset().one())?;
    aut.set_final(piece.fin, ctx.weightset().one())?;
    aut.set_history(history);
    tracing::debug!("thompson: built automaton with {} states", aut.num_states());
    Ok(aut)
}

/// Merges the initial/final states shared across `sum`/`prod` instead of
/// bridging them with a fresh epsilon transition, for a smaller automaton.
pub fn thompson_compact<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, e: &Expression<L, W>) -> Result<Automaton<L, W>> {
    if !ctx.has_one() {
        return Err(unsupported("epsilon transitions required"));
    }
    let mut aut = Automaton::new(ctx.clone());
    let mut history = crate::automaton::History::new();
    let piece = build(&mut aut, &mut history, e, true)?;
    aut.set_initial(piece.init, ctx.weightset().one())?;
    aut.set_final(piece.fin, ctx.weightset().one())?;
    aut.set_history(history);
    Ok(aut)
}

fn build<L: LabelSet, W: WeightSet>(
    aut: &mut Automaton<L, W>,
    history: &mut crate::automaton::History<L, W>,
    e: &Expression<L, W>,
    compact: bool,
) -> Result<Piece> {
    let ws = aut.context().weightset().clone();
    match e.kind() {
        ExpKind::Zero => {
            let init = aut.add_state();
            let fin = aut.add_state();
            history.set_string(init, "zero.in");
            history.set_string(fin, "zero.out");
            Ok(Piece { init, fin })
        }
        ExpKind::One => {
            let init = aut.add_state();
            let fin = aut.add_state();
            aut.new_epsilon_trans(init, fin, ws.one())?;
            history.set_string(init, "one.in");
            history.set_string(fin, "one.out");
            Ok(Piece { init, fin })
        }
        ExpKind::Atom(label) => {
            let init = aut.add_state();
            let fin = aut.add_state();
            aut.new_transition(init, fin, Label::Value(label.clone()), ws.one())?;
            history.set_string(init, "atom.in");
            history.set_string(fin, "atom.out");
            Ok(Piece { init, fin })
        }
        ExpKind::Sum(terms) => {
            let children: Vec<Piece> = terms.iter().map(|t| build(aut, history, t, compact)).collect::<Result<_>>()?;
            if compact {
                let init = children[0].init;
                let fin = children[0].fin;
                for c in &children[1..] {
                    merge_into(aut, c.init, init);
                    merge_into(aut, c.fin, fin);
                }
                Ok(Piece { init, fin })
            } else {
                let init = aut.add_state();
                let fin = aut.add_state();
                for c in &children {
                    aut.new_epsilon_trans(init, c.init, ws.one())?;
                    aut.new_epsilon_trans(c.fin, fin, ws.one())?;
                }
                history.set_string(init, "sum.in");
                history.set_string(fin, "sum.out");
                Ok(Piece { init, fin })
            }
        }
        ExpKind::Prod(factors) => {
            let children: Vec<Piece> = factors.iter().map(|f| build(aut, history, f, compact)).collect::<Result<_>>()?;
            if compact {
                for w in children.windows(2) {
                    merge_into(aut, w[1].init, w[0].fin);
                }
                Ok(Piece { init: children[0].init, fin: children.last().unwrap().fin })
            } else {
                for w in children.windows(2) {
                    aut.new_epsilon_trans(w[0].fin, w[1].init, ws.one())?;
                }
                Ok(Piece { init: children[0].init, fin: children.last().unwrap().fin })
            }
        }
        ExpKind::Star(inner) => {
            let child = build(aut, history, inner, compact)?;
            let init = aut.add_state();
            let fin = aut.add_state();
            aut.new_epsilon_trans(init, child.init, ws.one())?;
            aut.new_epsilon_trans(child.fin, fin, ws.one())?;
            aut.new_epsilon_trans(init, fin, ws.one())?;
            aut.new_epsilon_trans(child.fin, child.init, ws.one())?;
            history.set_string(init, "star.in");
            history.set_string(fin, "star.out");
            Ok(Piece { init, fin })
        }
        ExpKind::Plus(inner) => {
            let child = build(aut, history, inner, compact)?;
            let init = aut.add_state();
            let fin = aut.add_state();
            aut.new_epsilon_trans(init, child.init, ws.one())?;
            aut.new_epsilon_trans(child.fin, fin, ws.one())?;
            aut.new_epsilon_trans(child.fin, child.init, ws.one())?;
            history.set_string(init, "plus.in");
            history.set_string(fin, "plus.out");
            Ok(Piece { init, fin })
        }
        ExpKind::Maybe(inner) => {
            let child = build(aut, history, inner, compact)?;
            let init = aut.add_state();
            let fin = aut.add_state();
            aut.new_epsilon_trans(init, child.init, ws.one())?;
            aut.new_epsilon_trans(child.fin, fin, ws.one())?;
            aut.new_epsilon_trans(init, fin, ws.one())?;
            history.set_string(init, "maybe.in");
            history.set_string(fin, "maybe.out");
            Ok(Piece { init, fin })
        }
        ExpKind::LWeight(k, inner) => {
            let child = build(aut, history, inner, compact)?;
            let init = aut.add_state();
            aut.new_epsilon_trans(init, child.init, k.clone())?;
            history.set_string(init, "lweight.in");
            Ok(Piece { init, fin: child.fin })
        }
        ExpKind::RWeight(inner, k) => {
            let child = build(aut, history, inner, compact)?;
            let fin = aut.add_state();
            aut.new_epsilon_trans(child.fin, fin, k.clone())?;
            history.set_string(fin, "rweight.out");
            Ok(Piece { init: child.init, fin })
        }
        ExpKind::Complement(_) => Err(unsupported("complement")),
        ExpKind::Conjunction(_) => Err(unsupported("conjunction")),
        ExpKind::Shuffle(_) => Err(unsupported("shuffle")),
        ExpKind::LDiv(_, _) => Err(unsupported("left quotient")),
        ExpKind::Transposition(_) => Err(unsupported("transposition")),
    }
}

/// Redirects all transitions incident to `from` onto `to` and deletes
/// `from` (used by the compact variant to identify two states as one).
fn merge_into<L: LabelSet, W: WeightSet>(aut: &mut Automaton<L, W>, from: StateId, to: StateId) {
    if from == to {
        return;
    }
    let ws = aut.context().weightset().clone();
    for t in aut.out(from).to_vec() {
        let dst = aut.dst_of(t);
        let label = aut.label_of(t).clone();
        let w = aut.weight_of(t).clone();
        let _ = aut.add_transition(to, dst, label, w);
        let _ = ws;
    }
    for t in aut.inn(from).to_vec() {
        let src = aut.src_of(t);
        let label = aut.label_of(t).clone();
        let w = aut.weight_of(t).clone();
        let _ = aut.add_transition(src, to, label, w);
    }
    aut.del_state(from);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Identities, RatExpSet};
    use crate::labelset::NullableSet;
    use crate::weightset::B;

    fn ctx() -> Context<NullableSet<crate::labelset::LetterSet>, B> {
        Context::new(NullableSet::new(crate::labelset::LetterSet::new(['a', 'b'])), B)
    }

    #[test]
    fn thompson_requires_an_epsilon_capable_context() {
        let plain: Context<crate::labelset::LetterSet, B> = Context::new(crate::labelset::LetterSet::new(['a']), B);
        let rs = RatExpSet::new(plain.clone(), Identities::Trivial);
        let e = rs.atom('a');
        assert!(thompson(&plain, &e).is_err());
    }

    #[test]
    fn thompson_builds_two_states_for_a_bare_atom() {
        let c = ctx();
        let rs = RatExpSet::new(c.clone(), Identities::Trivial);
        let e = rs.atom('a');
        let aut = thompson(&c, &e).unwrap();
        assert_eq!(aut.num_states(), 2);
    }

    #[test]
    fn thompson_compact_never_uses_more_states_than_plain_thompson() {
        let c = ctx();
        let rs = RatExpSet::new(c.clone(), Identities::Trivial);
        let e = rs.sum(&rs.atom('a'), &rs.atom('b'));
        let plain = thompson(&c, &e).unwrap();
        let compact = thompson_compact(&c, &e).unwrap();
        assert!(compact.num_states() <= plain.num_states());
    }
}
