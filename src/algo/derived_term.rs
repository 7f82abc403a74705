use std::collections::HashMap;

use crate::automaton::{Automaton, History, Label};
use crate::context::Context;
use crate::error::{AwaliError, Result};
use crate::expression::{ExpKind, Expression, RatExpSet};
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

/// Computes the partial derivative of `e` with respect to letter `a`.
/// Requires a free labelset (`L::Value: PartialEq` against the iterated
/// alphabet value).
fn derivative<L: LabelSet, W: WeightSet>(
    rs: &RatExpSet<L, W>,
    e: &Expression<L, W>,
    a: &L::Value,
) -> Result<Expression<L, W>> {
    let ws = rs.context().weightset();
    match e.kind() {
        ExpKind::Zero | ExpKind::One => Ok(rs.zero()),
        ExpKind::Atom(l) => Ok(if l == a { rs.one() } else { rs.zero() }),
        ExpKind::Sum(terms) => {
            let mut acc = rs.zero();
            for t in terms {
                acc = rs.sum(&acc, &derivative(rs, t, a)?);
            }
            Ok(acc)
        }
        ExpKind::Prod(factors) => derivative_prod(rs, factors, a),
        ExpKind::Star(inner) => {
            let d = derivative(rs, inner, a)?;
            Ok(rs.prod(&d, &rs.star(inner)))
        }
        ExpKind::Plus(inner) => derivative(rs, &rs.prod(inner, &rs.star(inner)), a),
        ExpKind::Maybe(inner) => derivative(rs, &rs.sum(&rs.one(), inner), a),
        ExpKind::Conjunction(terms) => {
            let mut acc = terms
                .first()
                .map(|t| derivative(rs, t, a))
                .transpose()?
                .unwrap_or_else(|| rs.one());
            for t in &terms[1..] {
                acc = rs.conjunction(&acc, &derivative(rs, t, a)?);
            }
            Ok(acc)
        }
        ExpKind::Shuffle(terms) => {
            // d(e1:e2:...) = sum over i of e1:...:d(ei):...:en
            let mut acc = rs.zero();
            for i in 0..terms.len() {
                let mut piece = derivative(rs, &terms[i], a)?;
                for (j, t) in terms.iter().enumerate() {
                    if j != i {
                        piece = rs.shuffle(&piece, t);
                    }
                }
                acc = rs.sum(&acc, &piece);
            }
            Ok(acc)
        }
        ExpKind::LWeight(k, inner) => Ok(rs.lweight(k.clone(), &derivative(rs, inner, a)?)),
        ExpKind::RWeight(inner, k) => Ok(rs.rweight(&derivative(rs, inner, a)?, k.clone())),
        ExpKind::Complement(_) => Err(AwaliError::unsupported("derived_term", "complement")),
        ExpKind::LDiv(_, _) => Err(AwaliError::unsupported("derived_term", "left quotient")),
        ExpKind::Transposition(_) => Err(AwaliError::unsupported("derived_term", "transposition")),
    }
    .map(|r| {
        let _ = ws;
        r
    })
}

fn derivative_prod<L: LabelSet, W: WeightSet>(
    rs: &RatExpSet<L, W>,
    factors: &[Expression<L, W>],
    a: &L::Value,
) -> Result<Expression<L, W>> {
    if factors.is_empty() {
        return Ok(rs.zero());
    }
    if factors.len() == 1 {
        return derivative(rs, &factors[0], a);
    }
    let head = &factors[0];
    let mut tail = factors[1].clone();
    for f in &factors[2..] {
        tail = rs.prod(&tail, f);
    }
    let d_head = derivative(rs, head, a)?;
    let first_term = rs.prod(&d_head, &tail);
    let c_head = rs.constant_term(head)?;
    let d_tail = derivative(rs, &tail, a)?;
    let second_term = rs.lweight(c_head, &d_tail);
    Ok(rs.sum(&first_term, &second_term))
}

/// Splits a sum-shaped expression into its top-level terms (identity for
/// anything else), for the *breaking* derived-term variant.
fn split_terms<L: LabelSet, W: WeightSet>(e: &Expression<L, W>) -> Vec<Expression<L, W>> {
    match e.kind() {
        ExpKind::Sum(terms) => terms.clone(),
        _ => vec![e.clone()],
    }
}

/// The derived-term (Antimirov) automaton of `e`: states are expressions
/// modulo identities, transitions are derivatives wrt each alphabet letter.
/// `breaking` splits sum-shaped derivatives into separate transitions.
/// History kind: ratexp. Requires a free labelset; terminates iff `e`
/// generates finitely many derivatives.
pub fn derived_term<L: LabelSet, W: WeightSet>(
    rs: &RatExpSet<L, W>,
    e: &Expression<L, W>,
    breaking: bool,
) -> Result<Automaton<L, W>> {
    if !rs.context().is_free() {
        return Err(AwaliError::unsupported("derived_term", "non-free labelset"));
    }
    let ctx: &Context<L, W> = rs.context();
    let alphabet = ctx.labelset().alphabet();
    let ws = ctx.weightset();

    let mut aut = Automaton::new(ctx.clone());
    let mut history = History::new();
    let mut state_of: HashMap<String, crate::base::StateId> = HashMap::new();
    let mut queue: Vec<(crate::base::StateId, Expression<L, W>)> = Vec::new();

    let mut intern = |aut: &mut Automaton<L, W>,
                       history: &mut History<L, W>,
                       expr: &Expression<L, W>,
                       queue: &mut Vec<(crate::base::StateId, Expression<L, W>)>| {
        let key = rs.print(expr);
        *state_of.entry(key).or_insert_with(|| {
            let s = aut.add_state();
            history.set_ratexp(s, expr.clone());
            queue.push((s, expr.clone()));
            s
        })
    };

    let init_state = intern(&mut aut, &mut history, e, &mut queue);
    aut.set_initial(init_state, ws.one())?;

    while let Some((src, expr)) = queue.pop() {
        let c = rs.constant_term(&expr)?;
        if !ws.is_zero(&c) {
            aut.add_final(src, c)?;
        }
        for a in &alphabet {
            let d = derivative(rs, &expr, a)?;
            let terms = if breaking { split_terms(&d) } else { vec![d] };
            for term in terms {
                if term.is_zero() {
                    continue;
                }
                let (core, weight) = match term.kind() {
                    ExpKind::LWeight(w, inner) => (inner.clone(), w.clone()),
                    _ => (term.clone(), ws.one()),
                };
                let dst = intern(&mut aut, &mut history, &core, &mut queue);
                aut.add_transition(src, dst, Label::Value(a.clone()), weight)?;
            }
        }
    }
    aut.set_history(history);
    tracing::debug!("derived_term: explored {} states (breaking={breaking})", aut.num_states());
    Ok(aut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::eval;
    use crate::expression::Identities;
    use crate::labelset::LetterSet;
    use crate::weightset::B;

    fn ctx() -> Context<LetterSet, B> {
        Context::new(LetterSet::new(['a', 'b']), B)
    }

    #[test]
    fn derived_term_of_an_atom_accepts_exactly_that_letter() {
        let c = ctx();
        let rs = RatExpSet::new(c.clone(), Identities::Trivial);
        let e = rs.atom('a');
        let aut = derived_term(&rs, &e, false).unwrap();
        assert_eq!(eval(&aut, &['a']).unwrap(), true);
        assert_eq!(eval(&aut, &['b']).unwrap(), false);
    }

    #[test]
    fn breaking_and_non_breaking_derived_terms_accept_the_same_words() {
        let c = ctx();
        let rs = RatExpSet::new(c.clone(), Identities::Trivial);
        let e = rs.star(&rs.sum(&rs.atom('a'), &rs.atom('b')));
        let plain = derived_term(&rs, &e, false).unwrap();
        let breaking = derived_term(&rs, &e, true).unwrap();
        for w in [vec![], vec!['a'], vec!['b'], vec!['a', 'b'], vec!['b', 'a', 'a']] {
            assert_eq!(eval(&plain, &w).unwrap(), eval(&breaking, &w).unwrap());
        }
    }
}
