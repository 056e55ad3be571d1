//! Strict recursive-descent J parser.
//!
//! Grounded on the teacher's `parser.rs` shape: a `Parser` struct holding
//! the input and a cursor, with one `parse_*` method per grammar
//! production. The teacher's parser walks a YAML event stream; this one
//! walks raw J text, but keeps the same "struct + cursor + per-production
//! method" organization.

use crate::error::{Error, JsonProblem, Result};
use crate::json::escape::unescape_str;
use crate::json::value::Value;

const MAX_DEPTH: usize = 1000;

pub fn parse(text: &str) -> Result<Value> {
    let mut parser = Parser {
        chars: text.chars().collect(),
        pos: 0,
    };
    parser.skip_ws();
    let value = parser.parse_value(0)?;
    parser.skip_ws();
    if parser.pos != parser.chars.len() {
        return Err(Error::json(JsonProblem::TrailingContent, 1));
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.bump() == Some(c) {
            Ok(())
        } else {
            Err(Error::json(JsonProblem::UnexpectedToken, 1))
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(Error::json(JsonProblem::UnexpectedToken, 1));
        }
        self.skip_ws();
        match self.peek() {
            Some('{') => self.parse_object(depth),
            Some('[') => self.parse_array(depth),
            Some('"') => Ok(Value::String(self.parse_string()?)),
            Some('t') => self.parse_literal("true", Value::Bool(true)),
            Some('f') => self.parse_literal("false", Value::Bool(false)),
            Some('n') => self.parse_literal("null", Value::Null),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            _ => Err(Error::json(JsonProblem::UnexpectedToken, 1)),
        }
    }

    fn parse_literal(&mut self, lit: &str, value: Value) -> Result<Value> {
        for expected in lit.chars() {
            if self.bump() != Some(expected) {
                return Err(Error::json(JsonProblem::UnexpectedToken, 1));
            }
        }
        Ok(value)
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value> {
        self.expect('{')?;
        let mut fields = Vec::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Value::Object(fields));
        }
        loop {
            self.skip_ws();
            let key = self.parse_string()?;
            self.skip_ws();
            self.expect(':')?;
            let value = self.parse_value(depth + 1)?;
            fields.push((key, value));
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => break,
                _ => return Err(Error::json(JsonProblem::UnexpectedToken, 1)),
            }
        }
        Ok(Value::Object(fields))
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value> {
        self.expect('[')?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(Value::Array(items));
        }
        loop {
            let value = self.parse_value(depth + 1)?;
            items.push(value);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(']') => break,
                _ => return Err(Error::json(JsonProblem::UnexpectedToken, 1)),
            }
        }
        Ok(Value::Array(items))
    }

    fn parse_string(&mut self) -> Result<String> {
        self.expect('"')?;
        let start = self.pos;
        let mut in_escape = false;
        loop {
            match self.bump() {
                None => return Err(Error::json(JsonProblem::UnclosedString, 1)),
                Some('\\') if !in_escape => in_escape = true,
                Some('"') if !in_escape => break,
                _ => in_escape = false,
            }
        }
        let body: String = self.chars[start..self.pos - 1].iter().collect();
        unescape_str(&body).ok_or_else(|| Error::json(JsonProblem::InvalidEscape, 1))
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        let mut is_float = false;
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
        if is_float {
            text.parse::<f64>()
                .map(Value::Float)
                .map_err(|_| Error::json(JsonProblem::InvalidNumber, 1))
        } else {
            text.parse::<i64>()
                .map(Value::Int)
                .map_err(|_| Error::json(JsonProblem::InvalidNumber, 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_structure() {
        let value = parse(r#"{"a": [1, 2.5, "x", null, true, false]}"#).unwrap();
        let arr = value.get("a").unwrap().as_array().unwrap();
        assert_eq!(arr[0], Value::Int(1));
        assert_eq!(arr[1], Value::Float(2.5));
        assert_eq!(arr[2], Value::String("x".to_string()));
        assert_eq!(arr[3], Value::Null);
        assert_eq!(arr[4], Value::Bool(true));
    }

    #[test]
    fn rejects_trailing_content() {
        assert!(parse(r#"{"a":1} garbage"#).is_err());
    }

    #[test]
    fn rejects_unclosed_string() {
        assert!(parse(r#"{"a": "unterminated}"#).is_err());
    }
}
