use crate::context::Context;
use crate::json::Value as Json;
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

use super::node::{ExpKind, Expression};

/// Prints `e` using the context's labelset/weightset printers.
pub fn print<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, e: &Expression<L, W>) -> String {
    render(ctx, e)
}

fn render<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, e: &Expression<L, W>) -> String {
    match e.kind() {
        ExpKind::Zero => "\\z".to_string(),
        ExpKind::One => "\\e".to_string(),
        ExpKind::Atom(l) => ctx.labelset().print(l),
        ExpKind::Sum(terms) => terms.iter().map(|t| atomize(ctx, t, is_sum_like)).collect::<Vec<_>>().join("+"),
        ExpKind::Prod(factors) => factors.iter().map(|f| atomize(ctx, f, is_prod_atomic)).collect::<Vec<_>>().join("."),
        ExpKind::Star(inner) => format!("{}*", atomize(ctx, inner, is_postfix_atomic)),
        ExpKind::Plus(inner) => format!("{}+", atomize(ctx, inner, is_postfix_atomic)),
        ExpKind::Maybe(inner) => format!("{}?", atomize(ctx, inner, is_postfix_atomic)),
        ExpKind::Complement(inner) => format!("!{}", paren(ctx, inner)),
        ExpKind::Conjunction(terms) => terms.iter().map(|t| paren(ctx, t)).collect::<Vec<_>>().join("&"),
        ExpKind::Shuffle(terms) => terms.iter().map(|t| paren(ctx, t)).collect::<Vec<_>>().join(":"),
        ExpKind::LDiv(a, b) => format!("{}\\{}", paren(ctx, a), paren(ctx, b)),
        ExpKind::Transposition(inner) => format!("{}{{T}}", paren(ctx, inner)),
        ExpKind::LWeight(w, inner) => format!("<{}>{}", ctx.weightset().print(w), atomize(ctx, inner, is_postfix_atomic)),
        ExpKind::RWeight(inner, w) => format!("{}<{}>", atomize(ctx, inner, is_postfix_atomic), ctx.weightset().print(w)),
    }
}

fn is_sum_like<L: LabelSet, W: WeightSet>(e: &Expression<L, W>) -> bool {
    matches!(e.kind(), ExpKind::Sum(_))
}

fn is_prod_atomic<L: LabelSet, W: WeightSet>(e: &Expression<L, W>) -> bool {
    matches!(e.kind(), ExpKind::Sum(_))
}

fn is_postfix_atomic<L: LabelSet, W: WeightSet>(e: &Expression<L, W>) -> bool {
    matches!(e.kind(), ExpKind::Sum(_) | ExpKind::Prod(_))
}

fn atomize<L: LabelSet, W: WeightSet>(
    ctx: &Context<L, W>,
    e: &Expression<L, W>,
    needs_paren: impl Fn(&Expression<L, W>) -> bool,
) -> String {
    if needs_paren(e) {
        format!("({})", render(ctx, e))
    } else {
        render(ctx, e)
    }
}

fn paren<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, e: &Expression<L, W>) -> String {
    match e.kind() {
        ExpKind::Zero | ExpKind::One | ExpKind::Atom(_) => render(ctx, e),
        _ => format!("({})", render(ctx, e)),
    }
}

pub fn to_json<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, e: &Expression<L, W>) -> Json {
    let mut obj = Json::object();
    let kind = match e.kind() {
        ExpKind::Zero => "zero",
        ExpKind::One => "one",
        ExpKind::Atom(_) => "atom",
        ExpKind::Sum(_) => "sum",
        ExpKind::Prod(_) => "prod",
        ExpKind::Star(_) => "star",
        ExpKind::Plus(_) => "plus",
        ExpKind::Maybe(_) => "maybe",
        ExpKind::Complement(_) => "complement",
        ExpKind::Conjunction(_) => "conjunction",
        ExpKind::Shuffle(_) => "shuffle",
        ExpKind::LDiv(_, _) => "ldiv",
        ExpKind::Transposition(_) => "transposition",
        ExpKind::LWeight(_, _) => "lweight",
        ExpKind::RWeight(_, _) => "rweight",
    };
    obj.insert("kind", Json::str(kind));
    match e.kind() {
        ExpKind::Zero | ExpKind::One => {}
        ExpKind::Atom(l) => {
            obj.insert("label", ctx.labelset().to_json(l));
        }
        ExpKind::Sum(v) | ExpKind::Prod(v) | ExpKind::Conjunction(v) | ExpKind::Shuffle(v) => {
            obj.insert("children", Json::Array(v.iter().map(|c| to_json(ctx, c)).collect()));
        }
        ExpKind::Star(a) | ExpKind::Plus(a) | ExpKind::Maybe(a) | ExpKind::Complement(a) | ExpKind::Transposition(a) => {
            obj.insert("child", to_json(ctx, a));
        }
        ExpKind::LDiv(a, b) => {
            obj.insert("left", to_json(ctx, a));
            obj.insert("right", to_json(ctx, b));
        }
        ExpKind::LWeight(w, a) => {
            obj.insert("weight", ctx.weightset().to_json(w));
            obj.insert("child", to_json(ctx, a));
        }
        ExpKind::RWeight(a, w) => {
            obj.insert("child", to_json(ctx, a));
            obj.insert("weight", ctx.weightset().to_json(w));
        }
    }
    obj
}
