//! Width-aware pretty-printer ("smart printer").
//!
//! Three passes over the value tree, mirroring the original engine:
//! - [`height`] computes how deeply nested a node is;
//! - [`inline_width`] computes how wide the node would be if printed on one
//!   line;
//! - [`Printer::print`] walks the tree, inlining any subtree that fits
//!   within the remaining width at its indentation, and otherwise laying
//!   children out one per line. Arrays made only of small scalar leaves are
//!   packed several-per-line instead of one-per-line.

use super::value::Value;

const DEFAULT_WIDTH: usize = 80;
const INDENT: usize = 2;

/// Height of the value tree (0 for a leaf).
pub fn height(v: &Value) -> usize {
    match v {
        Value::Array(items) => 1 + items.iter().map(height).max().unwrap_or(0),
        Value::Object(fields) => 1 + fields.values().map(height).max().unwrap_or(0),
        _ => 0,
    }
}

/// Width of `v` if printed with no line breaks at all.
pub fn inline_width(v: &Value) -> usize {
    render_inline(v).chars().count()
}

fn render_inline(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Str(s) => escape_string(s),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(render_inline).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(fields) => {
            let parts: Vec<String> = fields
                .iter()
                .map(|(k, v)| format!("{}: {}", escape_string(k), render_inline(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) <= 0x1F => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Pretty-print `v` to a string, wrapping at `width` columns where possible.
pub fn print(v: &Value, width: usize) -> String {
    let mut out = String::new();
    write_node(v, 0, width, &mut out);
    out
}

/// Pretty-print using the engine's default 80-column width.
pub fn print_default(v: &Value) -> String {
    print(v, DEFAULT_WIDTH)
}

fn write_node(v: &Value, indent: usize, width: usize, out: &mut String) {
    let fits = indent + inline_width(v) <= width;
    match v {
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(fields) if fields.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            if fits {
                out.push_str(&render_inline(v));
            } else if is_grid_eligible(items) {
                write_grid(items, indent, width, out);
            } else {
                out.push_str("[\n");
                let child_indent = indent + INDENT;
                for (i, item) in items.iter().enumerate() {
                    out.push_str(&" ".repeat(child_indent));
                    write_node(item, child_indent, width, out);
                    if i + 1 < items.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&" ".repeat(indent));
                out.push(']');
            }
        }
        Value::Object(fields) => {
            if fits {
                out.push_str(&render_inline(v));
            } else {
                out.push_str("{\n");
                let child_indent = indent + INDENT;
                let n = fields.len();
                for (i, (k, val)) in fields.iter().enumerate() {
                    out.push_str(&" ".repeat(child_indent));
                    out.push_str(&escape_string(k));
                    out.push_str(": ");
                    write_node(val, child_indent, width, out);
                    if i + 1 < n {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&" ".repeat(indent));
                out.push('}');
            }
        }
        _ => out.push_str(&render_inline(v)),
    }
}

/// Grid packing applies only to arrays of scalar leaves (no nested array or
/// object), so the rows stay simple to scan.
fn is_grid_eligible(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(|v| !matches!(v, Value::Array(_) | Value::Object(_)))
}

fn write_grid(items: &[Value], indent: usize, width: usize, out: &mut String) {
    out.push_str("[\n");
    let child_indent = indent + INDENT;
    let rendered: Vec<String> = items.iter().map(render_inline).collect();
    let mut i = 0;
    while i < rendered.len() {
        out.push_str(&" ".repeat(child_indent));
        let mut line_len = child_indent;
        let mut first_on_line = true;
        while i < rendered.len() {
            let piece_len = rendered[i].chars().count() + 2;
            if !first_on_line && line_len + piece_len > width {
                break;
            }
            if !first_on_line {
                out.push(' ');
            }
            out.push_str(&rendered[i]);
            line_len += piece_len;
            first_on_line = false;
            i += 1;
            if i < rendered.len() {
                out.push(',');
            }
        }
        out.push('\n');
    }
    out.push_str(&" ".repeat(indent));
    out.push(']');
}
