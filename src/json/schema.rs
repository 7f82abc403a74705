//! The public automaton/expression file format (§4.6), layered on
//! [`super::value::Value`]. Grounded in the shape documented by the
//! original engine's `json_format.hh`.

use crate::automaton::{Automaton, Label};
use crate::base::{Position, StateId};
use crate::context::Context;
use crate::error::ParseError;
use crate::expression::{self, Expression};
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

use super::Value as Json;

/// Optional descriptive fields carried alongside the `data` payload.
/// Every field is free-form text, taken or produced verbatim.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub name: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
}

impl Metadata {
    fn to_json(&self) -> Json {
        let mut obj = Json::object();
        if let Some(v) = &self.name {
            obj.insert("name", Json::str(v.clone()));
        }
        if let Some(v) = &self.caption {
            obj.insert("caption", Json::str(v.clone()));
        }
        if let Some(v) = &self.description {
            obj.insert("description", Json::str(v.clone()));
        }
        if let Some(v) = &self.author {
            obj.insert("author", Json::str(v.clone()));
        }
        obj
    }

    fn from_json(v: &Json) -> Self {
        Metadata {
            name: v.get("name").and_then(Json::as_str).map(str::to_string),
            caption: v.get("caption").and_then(Json::as_str).map(str::to_string),
            description: v.get("description").and_then(Json::as_str).map(str::to_string),
            author: v.get("author").and_then(Json::as_str).map(str::to_string),
        }
    }
}

fn format_header(kind: &str, metadata: &Metadata) -> Json {
    let mut root = Json::object();
    let mut format = Json::object();
    format.insert("name", Json::str("fsm-json"));
    format.insert("version", Json::str("1"));
    root.insert("format", format);
    root.insert("kind", Json::str(kind));
    root.insert("metadata", metadata.to_json());
    root
}

fn label_kind_name<L: LabelSet>(ls: &L) -> &'static str {
    use crate::labelset::LabelKind;
    match ls.kind() {
        LabelKind::Letters => "Letters",
        LabelKind::Words => "Words",
        LabelKind::NoLabel => "No Label",
        LabelKind::MultiTape => "Multi-tape",
        LabelKind::Expressions => "Expressions",
    }
}

fn context_to_json<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>) -> Json {
    let mut root = Json::object();
    let mut labels = Json::object();
    labels.insert("labelKind", Json::str(label_kind_name(ctx.labelset())));
    labels.insert("allowEpsilon", Json::Bool(ctx.has_one()));
    let alphabet = ctx.labelset().alphabet();
    if !alphabet.is_empty() {
        labels.insert(
            "alphabet",
            Json::Array(alphabet.iter().map(|v| ctx.labelset().to_json(v)).collect()),
        );
    }
    root.insert("labels", labels);
    root.insert("weights", Json::str(ctx.weightset().name()));
    root
}

fn label_to_json<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, label: &Label<L::Value>) -> Json {
    match label {
        Label::PrePost => Json::Null,
        Label::Epsilon => Json::Null,
        Label::Value(v) => ctx.labelset().to_json(v),
    }
}

fn label_from_json<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, v: &Json) -> Result<Label<L::Value>, ParseError> {
    if v.is_null() {
        if ctx.has_one() {
            return Ok(Label::Epsilon);
        }
        return Err(ParseError::new(Position::start(), "labelless transition in a context without epsilon"));
    }
    Ok(Label::Value(ctx.labelset().from_json(v)?))
}

/// Serializes a full automaton file: header, context description, states
/// and transitions.
pub fn automaton_to_json<L: LabelSet, W: WeightSet>(aut: &Automaton<L, W>, metadata: &Metadata) -> Json {
    let ctx = aut.context();
    let mut root = format_header("Automaton", metadata);
    root.insert("context", context_to_json(ctx));

    let mut data = Json::object();
    let mut states = Json::array();
    for s in aut.states(false) {
        let mut entry = Json::object();
        entry.insert("id", Json::Int(s.0 as i64));
        if aut.has_explicit_name(s) {
            entry.insert("name", Json::str(aut.get_state_name(s)));
        }
        if let Some(w) = aut.initial_weight(s) {
            entry.insert("initial", ctx.weightset().to_json(&w));
        }
        if let Some(w) = aut.final_weight(s) {
            entry.insert("final", ctx.weightset().to_json(&w));
        }
        if aut.has_history(s) {
            entry.insert("history", Json::str(aut.print_state_history(s)));
        }
        states.push(entry);
    }
    data.insert("states", states);

    let mut transitions = Json::array();
    for s in aut.states(false) {
        for &t in aut.out(s) {
            if matches!(aut.label_of(t), Label::PrePost) {
                continue;
            }
            let mut entry = Json::object();
            entry.insert("id", Json::Int(t.0 as i64));
            entry.insert("source", Json::Int(aut.src_of(t).0 as i64));
            entry.insert("destination", Json::Int(aut.dst_of(t).0 as i64));
            entry.insert("label", label_to_json(ctx, aut.label_of(t)));
            entry.insert("weight", ctx.weightset().to_json(aut.weight_of(t)));
            transitions.push(entry);
        }
    }
    data.insert("transitions", transitions);

    root.insert("data", data);
    root
}

/// Parses a full automaton file produced by [`automaton_to_json`], validating
/// state id uniqueness, transition-endpoint existence, and weight well
/// formedness against `ctx`'s own semiring.
pub fn automaton_from_json<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, root: &Json) -> Result<(Automaton<L, W>, Metadata), ParseError> {
    let metadata = root.get("metadata").map(Metadata::from_json).unwrap_or_default();
    let data = super::require_field(root, "data")?;
    let mut aut = Automaton::new(ctx.clone());
    let mut id_map = std::collections::HashMap::new();

    let states = data.get("states").and_then(Json::as_array).unwrap_or(&[]);
    for entry in states {
        let raw_id = entry
            .get("id")
            .and_then(Json::as_i64)
            .ok_or_else(|| ParseError::new(Position::start(), "state entry missing integer id"))?;
        let s = aut.add_state();
        if id_map.insert(raw_id, s).is_some() {
            return Err(ParseError::new(Position::start(), format!("duplicate state id {raw_id}")));
        }
        if let Some(name) = entry.get("name").and_then(Json::as_str) {
            aut.set_state_name(s, name.to_string());
        }
        if let Some(w) = entry.get("initial") {
            let weight = ctx.weightset().from_json(w)?;
            aut.set_initial(s, weight).map_err(|e| ParseError::new(Position::start(), e.to_string()))?;
        }
        if let Some(w) = entry.get("final") {
            let weight = ctx.weightset().from_json(w)?;
            aut.set_final(s, weight).map_err(|e| ParseError::new(Position::start(), e.to_string()))?;
        }
    }

    let transitions = data.get("transitions").and_then(Json::as_array).unwrap_or(&[]);
    for entry in transitions {
        let src_raw = entry
            .get("source")
            .and_then(Json::as_i64)
            .ok_or_else(|| ParseError::new(Position::start(), "transition missing source"))?;
        let dst_raw = entry
            .get("destination")
            .and_then(Json::as_i64)
            .ok_or_else(|| ParseError::new(Position::start(), "transition missing destination"))?;
        let src = resolve_state(&id_map, src_raw)?;
        let dst = resolve_state(&id_map, dst_raw)?;
        let label = match entry.get("label") {
            Some(v) => label_from_json(ctx, v)?,
            None => label_from_json(ctx, &Json::Null)?,
        };
        let weight = match entry.get("weight") {
            Some(w) => ctx.weightset().from_json(w)?,
            None => ctx.weightset().one(),
        };
        aut.new_transition(src, dst, label, weight)
            .map_err(|e| ParseError::new(Position::start(), e.to_string()))?;
    }

    Ok((aut, metadata))
}

fn resolve_state(id_map: &std::collections::HashMap<i64, StateId>, raw: i64) -> Result<StateId, ParseError> {
    id_map
        .get(&raw)
        .copied()
        .ok_or_else(|| ParseError::new(Position::start(), format!("transition references unknown state {raw}")))
}

/// Serializes a rational expression file using the public tree shape
/// (`{"sum":[...]}`, `{"label":...}`, etc.), distinct from the internal
/// kind-tagged DAG representation used for normalized-expression caching.
pub fn expression_to_json<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, e: &Expression<L, W>, metadata: &Metadata) -> Json {
    let mut root = format_header("Rational Expression", metadata);
    root.insert("context", context_to_json(ctx));
    root.insert("data", expression_tree(ctx, e));
    root
}

fn expression_tree<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, e: &Expression<L, W>) -> Json {
    use crate::expression::ExpKind;
    match e.kind() {
        ExpKind::Zero => {
            let mut o = Json::object();
            o.insert("zero", Json::Null);
            o
        }
        ExpKind::One => {
            let mut o = Json::object();
            o.insert("one", Json::Null);
            o
        }
        ExpKind::Atom(l) => {
            let mut o = Json::object();
            o.insert("label", ctx.labelset().to_json(l));
            o
        }
        ExpKind::Sum(v) => wrap_children(ctx, "sum", v),
        ExpKind::Prod(v) => wrap_children(ctx, "prod", v),
        ExpKind::Conjunction(v) => wrap_children(ctx, "conjunction", v),
        ExpKind::Shuffle(v) => wrap_children(ctx, "shuffle", v),
        ExpKind::Star(a) => wrap_child(ctx, "star", a),
        ExpKind::Plus(a) => wrap_child(ctx, "plus", a),
        ExpKind::Maybe(a) => wrap_child(ctx, "maybe", a),
        ExpKind::Complement(a) => wrap_child(ctx, "complement", a),
        ExpKind::Transposition(a) => wrap_child(ctx, "transposition", a),
        ExpKind::LDiv(a, b) => {
            let mut o = Json::object();
            o.insert("ldivLeft", expression_tree(ctx, a));
            o.insert("ldivRight", expression_tree(ctx, b));
            o
        }
        ExpKind::LWeight(w, a) => {
            let mut o = expression_tree(ctx, a);
            o.insert("lweight", ctx.weightset().to_json(w));
            o
        }
        ExpKind::RWeight(a, w) => {
            let mut o = expression_tree(ctx, a);
            o.insert("rweight", ctx.weightset().to_json(w));
            o
        }
    }
}

fn wrap_children<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, key: &str, v: &[Expression<L, W>]) -> Json {
    let mut o = Json::object();
    o.insert(key, Json::Array(v.iter().map(|c| expression_tree(ctx, c)).collect()));
    o
}

fn wrap_child<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, key: &str, a: &Expression<L, W>) -> Json {
    let mut o = Json::object();
    o.insert(key, expression_tree(ctx, a));
    o
}

/// Parses a rational expression file produced by [`expression_to_json`].
pub fn expression_from_json<L: LabelSet, W: WeightSet>(ctx: &Context<L, W>, root: &Json) -> Result<(Expression<L, W>, Metadata), ParseError> {
    let metadata = root.get("metadata").map(Metadata::from_json).unwrap_or_default();
    let data = super::require_field(root, "data")?;
    let rs = expression::RatExpSet::new(ctx.clone(), expression::Identities::Series);
    let tree = expression_tree_from_json(&rs, data)?;
    Ok((tree, metadata))
}

fn expression_tree_from_json<L: LabelSet, W: WeightSet>(
    rs: &expression::RatExpSet<L, W>,
    v: &Json,
) -> Result<Expression<L, W>, ParseError> {
    let ctx = rs.context();
    if v.has_child("zero") {
        return Ok(rs.zero());
    }
    if v.has_child("one") {
        return Ok(rs.one());
    }
    if let Some(l) = v.get("label") {
        return Ok(rs.atom(ctx.labelset().from_json(l)?));
    }
    let mut result = if let Some(children) = v.get("sum").and_then(Json::as_array) {
        fold_nary(rs, children, |a, b| rs.sum(a, b))?
    } else if let Some(children) = v.get("prod").and_then(Json::as_array) {
        fold_nary(rs, children, |a, b| rs.prod(a, b))?
    } else if let Some(children) = v.get("conjunction").and_then(Json::as_array) {
        fold_nary(rs, children, |a, b| rs.conjunction(a, b))?
    } else if let Some(children) = v.get("shuffle").and_then(Json::as_array) {
        fold_nary(rs, children, |a, b| rs.shuffle(a, b))?
    } else if let Some(child) = v.get("star") {
        rs.star(&expression_tree_from_json(rs, child)?)
    } else if let Some(child) = v.get("plus") {
        rs.plus(&expression_tree_from_json(rs, child)?)
    } else if let Some(child) = v.get("maybe") {
        rs.maybe(&expression_tree_from_json(rs, child)?)
    } else if let Some(child) = v.get("complement") {
        rs.complement(&expression_tree_from_json(rs, child)?)
    } else if let Some(child) = v.get("transposition") {
        rs.transposition(&expression_tree_from_json(rs, child)?)
    } else if let (Some(l), Some(r)) = (v.get("ldivLeft"), v.get("ldivRight")) {
        rs.ldiv(&expression_tree_from_json(rs, l)?, &expression_tree_from_json(rs, r)?)
    } else {
        return Err(ParseError::new(Position::start(), "unrecognized rational expression node"));
    };
    if let Some(w) = v.get("lweight") {
        result = rs.lweight(ctx.weightset().from_json(w)?, &result);
    }
    if let Some(w) = v.get("rweight") {
        result = rs.rweight(&result, ctx.weightset().from_json(w)?);
    }
    Ok(result)
}

fn fold_nary<L: LabelSet, W: WeightSet>(
    rs: &expression::RatExpSet<L, W>,
    children: &[Json],
    combine: impl Fn(&Expression<L, W>, &Expression<L, W>) -> Expression<L, W>,
) -> Result<Expression<L, W>, ParseError> {
    if children.len() < 2 {
        return Err(ParseError::new(Position::start(), "sum/prod/conjunction/shuffle require at least two children"));
    }
    let mut iter = children.iter();
    let mut acc = expression_tree_from_json(rs, iter.next().unwrap())?;
    for c in iter {
        acc = combine(&acc, &expression_tree_from_json(rs, c)?);
    }
    Ok(acc)
}
