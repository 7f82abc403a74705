use crate::base::Position;
use crate::error::ParseError;
use crate::json::Value as Json;
use crate::labelset::LabelSet;
use crate::weightset::WeightSet;

use super::node::Expression;
use super::ratexpset::RatExpSet;

/// Parses an expression per the grammar in §4.4:
///
/// ```text
/// E := P | E '+' P
/// P := S | P S | P '.' S
/// S := L | S '*' | S '{' exponent '}' | S '?'
/// L := R | '<' weight '>' R
/// R := A | A '<' weight '>'
/// A := label | '(' E ')' | '[' letter-list ']' | '\e' | '\z'
/// ```
pub fn parse<L: LabelSet, W: WeightSet>(
    rs: &RatExpSet<L, W>,
    input: &str,
    pos: &mut Position,
) -> Result<Expression<L, W>, ParseError> {
    let mut p = ExprParser { rs, chars: input.chars().collect(), idx: 0, pos };
    p.skip_ws();
    let e = p.parse_sum()?;
    p.skip_ws();
    if p.idx != p.chars.len() {
        return Err(ParseError::new(*p.pos, format!("unexpected trailing input at byte {}", p.idx)));
    }
    Ok(e)
}

struct ExprParser<'a, 'p, L: LabelSet, W: WeightSet> {
    rs: &'a RatExpSet<L, W>,
    chars: Vec<char>,
    idx: usize,
    pos: &'p mut Position,
}

impl<'a, 'p, L: LabelSet, W: WeightSet> ExprParser<'a, 'p, L, W> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.idx += 1;
        self.pos.advance(c);
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn expect(&mut self, c: char) -> Result<(), ParseError> {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(*self.pos, format!("expected '{c}'")))
        }
    }

    fn rest(&self) -> String {
        self.chars[self.idx..].iter().collect()
    }

    // E := P | E '+' P
    fn parse_sum(&mut self) -> Result<Expression<L, W>, ParseError> {
        let mut acc = self.parse_prod()?;
        loop {
            self.skip_ws();
            if self.peek() == Some('+') {
                self.advance();
                let rhs = self.parse_prod()?;
                acc = self.rs.sum(&acc, &rhs);
            } else {
                break;
            }
        }
        Ok(acc)
    }

    // P := S | P S | P '.' S
    fn parse_prod(&mut self) -> Result<Expression<L, W>, ParseError> {
        let mut acc = self.parse_star()?;
        loop {
            self.skip_ws();
            if self.peek() == Some('.') {
                self.advance();
                let rhs = self.parse_star()?;
                acc = self.rs.prod(&acc, &rhs);
            } else if matches!(self.peek(), Some(c) if c != '+' && c != ')' && c != '&' && c != ':') {
                let rhs = self.parse_star()?;
                acc = self.rs.prod(&acc, &rhs);
            } else {
                break;
            }
        }
        Ok(acc)
    }

    // S := L | S '*' | S '{' exponent '}' | S '?'
    fn parse_star(&mut self) -> Result<Expression<L, W>, ParseError> {
        let mut acc = self.parse_weighted()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('*') => {
                    self.advance();
                    acc = self.rs.star(&acc);
                }
                Some('?') => {
                    self.advance();
                    acc = self.rs.maybe(&acc);
                }
                Some('{') => {
                    self.advance();
                    acc = self.parse_exponent(acc)?;
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn parse_exponent(&mut self, base: Expression<L, W>) -> Result<Expression<L, W>, ParseError> {
        self.skip_ws();
        let n = self.parse_opt_number();
        self.skip_ws();
        if self.peek() == Some(',') {
            self.advance();
            self.skip_ws();
            let m = self.parse_opt_number();
            self.expect('}')?;
            let lo = n.unwrap_or(0);
            match m {
                Some(hi) => self.repeat_range(&base, lo, hi),
                None => {
                    let mandatory = self.repeat_exact(&base, lo)?;
                    Ok(self.rs.prod(&mandatory, &self.rs.star(&base)))
                }
            }
        } else {
            self.expect('}')?;
            let n = n.ok_or_else(|| ParseError::new(*self.pos, "expected an exponent"))?;
            self.repeat_exact(&base, n)
        }
    }

    fn parse_opt_number(&mut self) -> Option<usize> {
        let start = self.idx;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.idx == start {
            None
        } else {
            self.chars[start..self.idx].iter().collect::<String>().parse().ok()
        }
    }

    fn repeat_exact(&self, base: &Expression<L, W>, n: usize) -> Result<Expression<L, W>, ParseError> {
        let mut acc = self.rs.one();
        for _ in 0..n {
            acc = self.rs.prod(&acc, base);
        }
        Ok(acc)
    }

    fn repeat_range(&self, base: &Expression<L, W>, lo: usize, hi: usize) -> Result<Expression<L, W>, ParseError> {
        if hi < lo {
            return Err(ParseError::new(*self.pos, "exponent range is empty ({n,m} with m < n)"));
        }
        let mandatory = self.repeat_exact(base, lo)?;
        let mut acc = self.rs.one();
        for _ in 0..(hi - lo) {
            acc = self.rs.maybe(&self.rs.prod(base, &acc));
        }
        Ok(self.rs.prod(&mandatory, &acc))
    }

    // L := R | '<' weight '>' R
    fn parse_weighted(&mut self) -> Result<Expression<L, W>, ParseError> {
        self.skip_ws();
        if self.peek() == Some('<') {
            self.advance();
            let w = self.parse_weight_literal()?;
            self.expect('>')?;
            let inner = self.parse_rweighted()?;
            return Ok(self.rs.lweight(w, &inner));
        }
        self.parse_rweighted()
    }

    // R := A | A '<' weight '>'
    fn parse_rweighted(&mut self) -> Result<Expression<L, W>, ParseError> {
        let mut acc = self.parse_atom()?;
        loop {
            self.skip_ws();
            if self.peek() == Some('<') {
                self.advance();
                let w = self.parse_weight_literal()?;
                self.expect('>')?;
                acc = self.rs.rweight(&acc, w);
            } else {
                break;
            }
        }
        Ok(acc)
    }

    fn parse_weight_literal(&mut self) -> Result<W::Value, ParseError> {
        let start = self.idx;
        let mut depth = 0;
        loop {
            match self.peek() {
                Some('<') => {
                    depth += 1;
                    self.advance();
                }
                Some('>') if depth > 0 => {
                    depth -= 1;
                    self.advance();
                }
                Some('>') => break,
                Some(_) => {
                    self.advance();
                }
                None => return Err(ParseError::new(*self.pos, "unterminated weight literal")),
            }
        }
        let text: String = self.chars[start..self.idx].iter().collect();
        self.rs.context().weightset().conv(text.trim())
    }

    // A := label | '(' E ')' | '[' letter-list ']' | '\e' | '\z'
    fn parse_atom(&mut self) -> Result<Expression<L, W>, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some('(') => {
                self.advance();
                let e = self.parse_sum()?;
                self.expect(')')?;
                Ok(e)
            }
            Some('\\') => {
                self.advance();
                match self.advance() {
                    Some('e') => Ok(self.rs.one()),
                    Some('z') => Ok(self.rs.zero()),
                    _ => Err(ParseError::new(*self.pos, "expected \\e or \\z")),
                }
            }
            Some('[') => {
                self.advance();
                self.parse_letter_list()
            }
            Some(_) => {
                let rest = self.rest();
                let mut label_pos = Position::start();
                let label = self.rs.context().labelset().conv(&rest, &mut label_pos, false)?;
                for _ in 0..label_pos.offset {
                    self.advance();
                }
                Ok(self.rs.atom(label))
            }
            None => Err(ParseError::new(*self.pos, "expected an expression, found end of input")),
        }
    }

    /// `[a-z]` / `[^ab]`: parses to the sum of the listed/ranged letters.
    /// Requires `L::Value = char` in practice (letter/nullable labelsets);
    /// other labelsets will fail label parsing inside the loop.
    fn parse_letter_list(&mut self) -> Result<Expression<L, W>, ParseError> {
        let negate = if self.peek() == Some('^') {
            self.advance();
            true
        } else {
            false
        };
        let mut wanted: Vec<char> = Vec::new();
        loop {
            match self.peek() {
                Some(']') => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    self.advance();
                    if self.peek() == Some('-') && self.chars.get(self.idx + 1).is_some_and(|&n| n != ']') {
                        self.advance();
                        let hi = self.advance().ok_or_else(|| ParseError::new(*self.pos, "unterminated letter range"))?;
                        wanted.extend((c..=hi).collect::<Vec<_>>());
                    } else {
                        wanted.push(c);
                    }
                }
                None => return Err(ParseError::new(*self.pos, "unterminated letter list")),
            }
        }
        let ls = self.rs.context().labelset();
        let mut result = self.rs.zero();
        if negate {
            for letter_str in wanted.iter().map(|c| c.to_string()) {
                let _ = letter_str;
            }
            return Err(ParseError::new(*self.pos, "negated letter lists require a strict alphabet, not supported by this labelset"));
        }
        for c in wanted {
            let mut p = Position::start();
            let label = ls.conv(&c.to_string(), &mut p, false)?;
            result = self.rs.sum(&result, &self.rs.atom(label));
        }
        Ok(result)
    }
}

pub fn from_json<L: LabelSet, W: WeightSet>(
    rs: &RatExpSet<L, W>,
    v: &Json,
) -> Result<Expression<L, W>, ParseError> {
    let kind = v
        .get("kind")
        .and_then(Json::as_str)
        .ok_or_else(|| ParseError::new(Position::start(), "expected an expression 'kind' field"))?;
    match kind {
        "zero" => Ok(rs.zero()),
        "one" => Ok(rs.one()),
        "atom" => {
            let label_json = v.get("label").ok_or_else(|| ParseError::new(Position::start(), "atom expression missing 'label'"))?;
            let label = rs.context().labelset().from_json(label_json)?;
            Ok(rs.atom(label))
        }
        "sum" | "prod" | "conjunction" | "shuffle" => {
            let children = v
                .get("children")
                .and_then(Json::as_array)
                .ok_or_else(|| ParseError::new(Position::start(), "expected 'children' array"))?;
            let mut parsed: Vec<Expression<L, W>> = Vec::new();
            for c in children {
                parsed.push(from_json(rs, c)?);
            }
            let mut iter = parsed.into_iter();
            let first = iter.next().unwrap_or_else(|| if kind == "prod" { rs.one() } else { rs.zero() });
            Ok(iter.fold(first, |acc, e| match kind {
                "sum" => rs.sum(&acc, &e),
                "prod" => rs.prod(&acc, &e),
                "conjunction" => rs.conjunction(&acc, &e),
                "shuffle" => rs.shuffle(&acc, &e),
                _ => unreachable!(),
            }))
        }
        "star" | "plus" | "maybe" | "complement" | "transposition" => {
            let child = v.get("child").ok_or_else(|| ParseError::new(Position::start(), "expected 'child'"))?;
            let inner = from_json(rs, child)?;
            Ok(match kind {
                "star" => rs.star(&inner),
                "plus" => rs.plus(&inner),
                "maybe" => rs.maybe(&inner),
                "complement" => rs.complement(&inner),
                "transposition" => rs.transposition(&inner),
                _ => unreachable!(),
            })
        }
        "ldiv" => {
            let left = from_json(rs, v.get("left").ok_or_else(|| ParseError::new(Position::start(), "expected 'left'"))?)?;
            let right = from_json(rs, v.get("right").ok_or_else(|| ParseError::new(Position::start(), "expected 'right'"))?)?;
            Ok(rs.ldiv(&left, &right))
        }
        "lweight" => {
            let w = rs.context().weightset().from_json(v.get("weight").ok_or_else(|| ParseError::new(Position::start(), "expected 'weight'"))?)?;
            let child = from_json(rs, v.get("child").ok_or_else(|| ParseError::new(Position::start(), "expected 'child'"))?)?;
            Ok(rs.lweight(w, &child))
        }
        "rweight" => {
            let child = from_json(rs, v.get("child").ok_or_else(|| ParseError::new(Position::start(), "expected 'child'"))?)?;
            let w = rs.context().weightset().from_json(v.get("weight").ok_or_else(|| ParseError::new(Position::start(), "expected 'weight'"))?)?;
            Ok(rs.rweight(&child, w))
        }
        other => Err(ParseError::new(Position::start(), format!("unknown expression kind '{other}'"))),
    }
}
