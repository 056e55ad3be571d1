//! The reverse, J → Y direction (spec.md §4.6, briefly specified since
//! there's no ambiguity to resolve going this way — no anchors/aliases/
//! tags to reconstruct, just a straight recursive walk of the tree).
//!
//! Grounded on the teacher's `emitter::Emitter` for indent/line-break
//! bookkeeping style, run in the opposite direction and much simplified:
//! there's no `ScalarAnalysis` pre-scan to choose a style, since Y's
//! ambiguity only matters when *parsing*, not when writing a value we
//! already know the exact type of.

use crate::config::ConversionOptions;
use crate::json::value::Value;

/// Renders `value` as Y text. `value` is expected to be an object or
/// array at the root (the external `J→Y` contract, spec.md §6); other
/// root scalars are rendered as a single line.
pub fn to_yaml(value: &Value, config: &ConversionOptions) -> String {
    let indent = config.indent().max(2);
    let mut out = String::new();
    match value {
        Value::Object(fields) if fields.is_empty() => out.push_str("{}\n"),
        Value::Array(items) if items.is_empty() => out.push_str("[]\n"),
        Value::Object(fields) => write_mapping_body(fields, 0, indent, config, &mut out),
        Value::Array(items) => write_sequence_body(items, 0, indent, config, &mut out),
        other => {
            out.push_str(&render_scalar(other, config));
            out.push('\n');
        }
    }
    out
}

fn write_mapping_body(
    fields: &[(String, Value)],
    depth: usize,
    indent: usize,
    config: &ConversionOptions,
    out: &mut String,
) {
    for (key, value) in fields {
        push_indent(out, indent, depth);
        out.push_str(key);
        out.push(':');
        write_field_value(value, depth, indent, config, out);
    }
}

fn write_sequence_body(
    items: &[Value],
    depth: usize,
    indent: usize,
    config: &ConversionOptions,
    out: &mut String,
) {
    for item in items {
        push_indent(out, indent, depth);
        out.push_str("- ");
        match item {
            Value::Object(fields) if !fields.is_empty() => {
                // First field shares the "- " line; the rest align under it.
                let (first_key, first_value) = &fields[0];
                out.push_str(first_key);
                out.push(':');
                write_field_value(first_value, depth + 1, indent, config, out);
                write_mapping_body(&fields[1..], depth + 1, indent, config, out);
            }
            Value::Array(sub) if !sub.is_empty() => {
                out.push('\n');
                write_sequence_body(sub, depth + 1, indent, config, out);
            }
            _ => {
                out.push_str(&render_inline(item, config));
                out.push('\n');
            }
        }
    }
}

/// Writes the ` value\n` (or nested-block) portion that follows a
/// mapping key's `:`.
fn write_field_value(
    value: &Value,
    depth: usize,
    indent: usize,
    config: &ConversionOptions,
    out: &mut String,
) {
    match value {
        Value::Object(fields) if !fields.is_empty() => {
            out.push('\n');
            write_mapping_body(fields, depth + 1, indent, config, out);
        }
        Value::Array(items) if !items.is_empty() => {
            out.push('\n');
            write_sequence_body(items, depth + 1, indent, config, out);
        }
        other => {
            out.push(' ');
            out.push_str(&render_inline(other, config));
            out.push('\n');
        }
    }
}

/// Renders a scalar or empty container as the text that follows a `: `
/// or a `- `, including multi-line block-scalar strings.
fn render_inline(value: &Value, config: &ConversionOptions) -> String {
    match value {
        Value::Object(fields) if fields.is_empty() => "{}".to_string(),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        other => render_scalar(other, config),
    }
}

fn render_scalar(value: &Value, config: &ConversionOptions) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => {
            if config.yes_no_bool() {
                (if *b { "yes" } else { "no" }).to_string()
            } else {
                (if *b { "true" } else { "false" }).to_string()
            }
        }
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::String(s) => render_string(s),
        Value::Object(_) | Value::Array(_) => String::new(),
    }
}

fn render_string(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.contains('\n') {
        return render_block_string(s);
    }
    if needs_quoting(s) {
        format!("\"{}\"", crate::json::escape::escape_str(s))
    } else {
        s.to_string()
    }
}

/// Block-style rendering for a multi-line string: literal style (`|`)
/// with the chomp modifier implied by its trailing-newline count.
fn render_block_string(s: &str) -> String {
    let trailing_newlines = s.len() - s.trim_end_matches('\n').len();
    let body = s.trim_end_matches('\n');
    let chomp = match trailing_newlines {
        0 => "-",
        1 => "",
        _ => "+",
    };
    let mut out = format!("|{}\n", chomp);
    for line in body.split('\n') {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out.pop();
    out
}

fn needs_quoting(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    matches!(
        lower.as_str(),
        "null" | "~" | "true" | "false" | "yes" | "no" | "on" | "off"
    ) || s.parse::<i64>().is_ok()
        || s.parse::<f64>().is_ok()
        || s.starts_with(' ')
        || s.ends_with(' ')
        || s.contains(": ")
        || s.starts_with(['&', '*', '!', '|', '>', '#', '-', '"', '\''])
        || s.starts_with('[')
}

fn push_indent(out: &mut String, indent: usize, depth: usize) {
    for _ in 0..(indent * depth) {
        out.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::value::Value;

    #[test]
    fn renders_simple_mapping() {
        let value = Value::parse(r#"{"a":1,"b":"two"}"#).unwrap();
        let yaml = to_yaml(&value, &ConversionOptions::default());
        assert_eq!(yaml, "a: 1\nb: two\n");
    }

    #[test]
    fn renders_nested_sequence() {
        let value = Value::parse(r#"{"items":[1,2,3]}"#).unwrap();
        let yaml = to_yaml(&value, &ConversionOptions::default());
        assert_eq!(yaml, "items:\n  - 1\n  - 2\n  - 3\n");
    }

    #[test]
    fn quotes_empty_string() {
        let value = Value::parse(r#"{"a":""}"#).unwrap();
        let yaml = to_yaml(&value, &ConversionOptions::default());
        assert_eq!(yaml, "a: ''\n");
    }

    #[test]
    fn renders_empty_containers() {
        let value = Value::parse(r#"{"a":{},"b":[]}"#).unwrap();
        let yaml = to_yaml(&value, &ConversionOptions::default());
        assert_eq!(yaml, "a: {}\nb: []\n");
    }

    #[test]
    fn multiline_string_uses_literal_block() {
        let mut obj = Value::Object(Vec::new());
        obj.add_field("t", Value::String("a\nb\n".to_string()));
        let yaml = to_yaml(&obj, &ConversionOptions::default());
        assert_eq!(yaml, "t: |\n  a\n  b\n");
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}
