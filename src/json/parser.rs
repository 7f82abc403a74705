//! Hand-rolled recursive-descent JSON parser.
//!
//! Mirrors the strict grammar used throughout the engine: `null`, booleans,
//! numbers (integers disambiguated from floats by whether the literal parses
//! identically both ways), strings with the usual escapes plus `\uXXXX` for
//! control characters only, arrays and objects. Object parsing can stop
//! early once the `metadata` field has been consumed, for callers that only
//! want to peek at a file's header.

use indexmap::IndexMap;

use crate::base::Position;
use crate::error::ParseError;

use super::value::Value;

pub struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    position: Position,
    _src: &'a str,
}

/// Parse a complete JSON document. Trailing non-whitespace is an error.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    let mut p = Parser::new(input);
    p.skip_ws();
    let v = p.parse_value()?;
    p.skip_ws();
    if p.pos != p.chars.len() {
        return Err(p.err("trailing characters after JSON value"));
    }
    Ok(v)
}

/// Parse a document, but stop as soon as the top-level `metadata` field (if
/// any) has been read, returning a partial object containing only the keys
/// seen so far. Used by callers that only need a file's header.
pub fn parse_early_stop_after_metadata(input: &str) -> Result<Value, ParseError> {
    let mut p = Parser::new(input);
    p.skip_ws();
    p.parse_object(true)
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { chars: input.chars().collect(), pos: 0, position: Position::start(), _src: input }
    }

    fn err(&self, reason: impl Into<String>) -> ParseError {
        ParseError::new(self.position, reason.into())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        self.position.advance(c);
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, c: char) -> Result<(), ParseError> {
        match self.bump() {
            Some(found) if found == c => Ok(()),
            Some(found) => Err(self.err(format!("expected '{c}', found '{found}'"))),
            None => Err(self.err(format!("expected '{c}', found end of input"))),
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some('{') => self.parse_object(false),
            Some('[') => self.parse_array(),
            Some('"') => Ok(Value::Str(self.parse_string()?)),
            Some('t') | Some('f') => self.parse_bool(),
            Some('n') => self.parse_null(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(self.err(format!("unexpected character '{c}'"))),
            None => Err(self.err("unexpected end of input")),
        }
    }

    fn parse_literal(&mut self, lit: &str) -> Result<(), ParseError> {
        for expected in lit.chars() {
            self.expect(expected)?;
        }
        Ok(())
    }

    fn parse_null(&mut self) -> Result<Value, ParseError> {
        self.parse_literal("null")?;
        Ok(Value::Null)
    }

    fn parse_bool(&mut self) -> Result<Value, ParseError> {
        if self.peek() == Some('t') {
            self.parse_literal("true")?;
            Ok(Value::Bool(true))
        } else {
            self.parse_literal("false")?;
            Ok(Value::Bool(false))
        }
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let mut is_float = false;
        if self.peek() == Some('-') {
            self.bump();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+') | Some('-')) {
                self.bump();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if text.is_empty() || text == "-" {
            return Err(self.err("invalid number literal"));
        }
        if !is_float {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Int(n));
            }
        }
        text.parse::<f64>().map(Value::Float).map_err(|_| self.err("invalid number literal"))
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.err("unterminated string literal")),
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some('/') => out.push('/'),
                    Some('b') => out.push('\u{0008}'),
                    Some('f') => out.push('\u{000C}'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some('u') => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            let c = self.bump().ok_or_else(|| self.err("unterminated \\u escape"))?;
                            let digit = c.to_digit(16).ok_or_else(|| self.err("invalid hex digit in \\u escape"))?;
                            code = code * 16 + digit;
                        }
                        if code > 0x1F {
                            return Err(self.err(
                                "\\u escapes are only accepted for control characters (<= 0x1F)",
                            ));
                        }
                        out.push(char::from_u32(code).unwrap());
                    }
                    Some(other) => return Err(self.err(format!("invalid escape '\\{other}'"))),
                    None => return Err(self.err("unterminated escape sequence")),
                },
                Some(c) => out.push(c),
            }
        }
        Ok(out)
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.expect('[')?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(Value::Array(items));
        }
        loop {
            let v = self.parse_value()?;
            items.push(v);
            self.skip_ws();
            match self.bump() {
                Some(',') => {
                    self.skip_ws();
                    continue;
                }
                Some(']') => break,
                Some(c) => return Err(self.err(format!("expected ',' or ']', found '{c}'"))),
                None => return Err(self.err("unterminated array")),
            }
        }
        Ok(Value::Array(items))
    }

    fn parse_object(&mut self, early_stop_after_metadata: bool) -> Result<Value, ParseError> {
        self.expect('{')?;
        let mut fields = IndexMap::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Value::Object(fields));
        }
        loop {
            self.skip_ws();
            let key = self.parse_string().map_err(|mut e| {
                e.reason = format!("expected object key: {}", e.reason);
                e
            })?;
            self.skip_ws();
            self.expect(':')?;
            let value = self.parse_value()?;
            let is_metadata = key == "metadata";
            fields.insert(key, value);
            if early_stop_after_metadata && is_metadata {
                return Ok(Value::Object(fields));
            }
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => break,
                Some(c) => return Err(self.err(format!("expected ',' or '}}', found '{c}'"))),
                None => return Err(self.err("unterminated object")),
            }
        }
        Ok(Value::Object(fields))
    }
}
