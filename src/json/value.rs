//! The J tree model: spec.md §4.6's "external collaborator" node type.
//!
//! Grounded on the teacher's `composer::{Node, NodeValue}` — specifically
//! the documented design choice "Uses Vec instead of HashMap to maintain
//! order" (`composer.rs` line ~55). We carry that rationale over verbatim:
//! `Object` is a `Vec<(String, Value)>`, not a `HashMap`, so that key order
//! in emitted J always matches source order of first appearance
//! (spec.md §8 property 4).

use crate::error::{Error, JsonProblem, Result};

/// A parsed or constructed J value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn parse(text: &str) -> Result<Self> {
        crate::json::parser::parse(text)
    }

    /// Strict parse requiring the root be an array or object, per spec.md
    /// §7's "root must be array or object" check.
    pub fn parse_root(text: &str) -> Result<Self> {
        let value = Self::parse(text)?;
        match value {
            Value::Array(_) | Value::Object(_) => Ok(value),
            _ => Err(Error::json(JsonProblem::UnexpectedToken, 1)),
        }
    }

    pub fn try_parse(text: &str) -> bool {
        Self::parse_root(text).is_ok()
    }

    pub fn to_compact_string(&self) -> String {
        let mut out = String::new();
        self.write_compact(&mut out);
        out
    }

    pub fn to_pretty_string(&self, indent: usize) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, indent, 0);
        out
    }

    fn write_compact(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::Float(f) => out.push_str(&format_float(*f)),
            Value::String(s) => {
                out.push('"');
                out.push_str(&crate::json::escape::escape_str(s));
                out.push('"');
            }
            Value::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_compact(out);
                }
                out.push(']');
            }
            Value::Object(fields) => {
                out.push('{');
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push('"');
                    out.push_str(&crate::json::escape::escape_str(k));
                    out.push_str("\":");
                    v.write_compact(out);
                }
                out.push('}');
            }
        }
    }

    fn write_pretty(&self, out: &mut String, indent: usize, depth: usize) {
        match self {
            Value::Array(items) if !items.is_empty() => {
                out.push('[');
                out.push('\n');
                for (i, item) in items.iter().enumerate() {
                    push_indent(out, indent, depth + 1);
                    item.write_pretty(out, indent, depth + 1);
                    if i + 1 < items.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                push_indent(out, indent, depth);
                out.push(']');
            }
            Value::Object(fields) if !fields.is_empty() => {
                out.push('{');
                out.push('\n');
                for (i, (k, v)) in fields.iter().enumerate() {
                    push_indent(out, indent, depth + 1);
                    out.push('"');
                    out.push_str(&crate::json::escape::escape_str(k));
                    out.push_str("\": ");
                    v.write_pretty(out, indent, depth + 1);
                    if i + 1 < fields.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                push_indent(out, indent, depth);
                out.push('}');
            }
            _ => self.write_compact(out),
        }
    }

    /// Looks up a direct child by field name; `None` if this isn't an
    /// object or the name isn't present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Looks up a direct child by index; `None` if this isn't an array or
    /// the index is out of range.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Resolves a `/`-separated path from this value, e.g. `"a/b/0/c"`.
    pub fn path(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = match segment.parse::<usize>() {
                Ok(index) if matches!(current, Value::Array(_)) => current.get_index(index)?,
                _ => current.get(segment)?,
            };
        }
        Some(current)
    }

    pub fn add_field(&mut self, name: impl Into<String>, value: Value) {
        if let Value::Object(fields) = self {
            fields.push((name.into(), value));
        }
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Value> {
        if let Value::Object(fields) = self {
            let pos = fields.iter().position(|(k, _)| k == name)?;
            Some(fields.remove(pos).1)
        } else {
            None
        }
    }

    pub fn push(&mut self, value: Value) {
        if let Value::Array(items) = self {
            items.push(value);
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn iter(&self) -> ValueIter<'_> {
        match self {
            Value::Array(items) => ValueIter::Array(items.iter()),
            Value::Object(fields) => ValueIter::Object(fields.iter()),
            _ => ValueIter::Empty,
        }
    }
}

pub enum ValueIter<'a> {
    Array(std::slice::Iter<'a, Value>),
    Object(std::slice::Iter<'a, (String, Value)>),
    Empty,
}

impl<'a> Iterator for ValueIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ValueIter::Array(it) => it.next(),
            ValueIter::Object(it) => it.next().map(|(_, v)| v),
            ValueIter::Empty => None,
        }
    }
}

fn push_indent(out: &mut String, indent: usize, depth: usize) {
    for _ in 0..(indent * depth) {
        out.push(' ');
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_object_key_order() {
        let mut obj = Value::Object(Vec::new());
        obj.add_field("z", Value::Int(1));
        obj.add_field("a", Value::Int(2));
        let keys: Vec<&str> = obj.as_object().unwrap().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn path_lookup_traverses_array_and_object() {
        let value = Value::parse(r#"{"a":[{"b":1},{"b":2}]}"#).unwrap();
        assert_eq!(value.path("a/1/b").and_then(Value::as_i64), Some(2));
    }

    #[test]
    fn compact_and_pretty_round_trip_structurally() {
        let value = Value::parse(r#"{"a":1,"b":[1,2,3]}"#).unwrap();
        let pretty = value.to_pretty_string(2);
        let reparsed = Value::parse(&pretty).unwrap();
        assert_eq!(value, reparsed);
    }
}
