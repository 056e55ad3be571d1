//! J emitter: walks the resolved, classified element list and writes J
//! text (spec.md §4.5).
//!
//! Grounded on the teacher's `emitter::Emitter<W: Write>` — the builder
//! style of `with_indent`/`with_width` survives as [`crate::config::ConversionOptions`],
//! and the teacher's pre-scan-then-write shape (`ScalarAnalysis` computed
//! before a scalar is written) survives as classifying each element before
//! writing it. Reworked to recurse over a bracketed `Element` list instead
//! of a `Node` tree, since there is no tree here — just matched open/close
//! markers (spec.md §3 "Element list invariants").

use crate::classifier::{classify, ClassifiedScalar};
use crate::config::ConversionOptions;
use crate::element::{matching_close, Element, ElementList, Marker};
use crate::error::{Error, Result, YamlProblem};
use crate::json::escape::escape_str;
use crate::json::value::Value;

/// Emits the resolved element list as J text.
pub fn emit(elements: &ElementList, config: &ConversionOptions) -> Result<String> {
    if elements.is_empty() {
        return Ok(String::new());
    }
    let mut out = String::new();
    write_value(elements, 0, config, 0, &mut out)?;
    Ok(out)
}

/// Re-parses the emitted J text into a [`Value`] tree, matching the
/// `YamlToJsonValue` convenience spec.md §4.6 describes.
pub fn to_value(elements: &ElementList, config: &ConversionOptions) -> Result<Value> {
    let text = emit(elements, config)?;
    if text.is_empty() {
        return Ok(Value::Object(Vec::new()));
    }
    Value::parse(&text)
}

/// Produces one-line J text by concatenating each line's trimmed contents
/// with single spaces (spec.md §6 "J minify" — purely textual, no reparse).
pub fn minify(text: &str) -> String {
    text.lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_value(
    elements: &ElementList,
    idx: usize,
    config: &ConversionOptions,
    depth: usize,
    out: &mut String,
) -> Result<usize> {
    let el = &elements[idx];
    if el.is_open() {
        write_container(elements, idx, config, depth, out)
    } else {
        write_scalar(el, config, depth, out)?;
        Ok(idx + 1)
    }
}

fn write_container(
    elements: &ElementList,
    idx: usize,
    config: &ConversionOptions,
    depth: usize,
    out: &mut String,
) -> Result<usize> {
    let end = matching_close(elements, idx)
        .ok_or_else(|| Error::yaml(YamlProblem::InvalidIndent, elements[idx].line))?;
    let is_mapping = matches!(elements[idx].marker, Some(Marker::MappingStart));
    let (open_ch, close_ch) = if is_mapping { ('{', '}') } else { ('[', ']') };

    if end == idx + 1 {
        out.push(open_ch);
        out.push(close_ch);
        return Ok(end + 1);
    }

    out.push(open_ch);
    newline_indent(out, config, depth + 1);

    let mut child = idx + 1;
    let mut first = true;
    while child < end {
        if !first {
            out.push(',');
            newline_indent(out, config, depth + 1);
        }
        first = false;

        if let Some(key) = &elements[child].key {
            out.push('"');
            out.push_str(&escape_str(key));
            out.push_str("\":");
            if config.indent() > 0 {
                out.push(' ');
            }
        }
        child = write_value(elements, child, config, depth + 1, out)?;
    }

    newline_indent(out, config, depth);
    out.push(close_ch);
    Ok(end + 1)
}

fn write_scalar(el: &Element, config: &ConversionOptions, depth: usize, out: &mut String) -> Result<()> {
    match classify(el, config)? {
        ClassifiedScalar::Null => out.push_str("null"),
        ClassifiedScalar::Bool(b) => out.push_str(if b { "true" } else { "false" }),
        ClassifiedScalar::Int(i) => out.push_str(&i.to_string()),
        ClassifiedScalar::Float(f) => out.push_str(&format_float(f)),
        ClassifiedScalar::Str(s) => {
            out.push('"');
            out.push_str(&escape_str(&s));
            out.push('"');
        }
        ClassifiedScalar::EmptyMap => out.push_str("{}"),
        ClassifiedScalar::EmptySeq => out.push_str("[]"),
        ClassifiedScalar::Binary(bytes) => write_binary_array(&bytes, config, depth, out),
    }
    Ok(())
}

fn write_binary_array(bytes: &[u8], config: &ConversionOptions, depth: usize, out: &mut String) {
    if bytes.is_empty() {
        out.push_str("[]");
        return;
    }
    out.push('[');
    newline_indent(out, config, depth + 1);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(',');
            newline_indent(out, config, depth + 1);
        }
        out.push_str(&byte.to_string());
    }
    newline_indent(out, config, depth);
    out.push(']');
}

fn newline_indent(out: &mut String, config: &ConversionOptions, depth: usize) {
    if config.indent() > 0 {
        out.push('\n');
        for _ in 0..(config.indent() * depth) {
            out.push(' ');
        }
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
    use crate::builder::build;
    use crate::resolver::resolve;

    fn convert(text: &str, config: &ConversionOptions) -> String {
        let elements = resolve(build(text).unwrap()).unwrap();
        emit(&elements, config).unwrap()
    }

    #[test]
    fn emits_scalar_mapping_compact() {
        let out = convert("key: value\n", &ConversionOptions::default().with_indent(0));
        assert_eq!(out, r#"{"key":"value"}"#);
    }

    #[test]
    fn emits_integer_and_float() {
        let out = convert("n: 42\nf: 1.5e2\n", &ConversionOptions::default().with_indent(0));
        assert_eq!(out, r#"{"n":42,"f":150.0}"#);
    }

    #[test]
    fn quoted_scalar_stays_string() {
        let out = convert(r#"q: "42""#, &ConversionOptions::default().with_indent(0));
        assert_eq!(out, r#"{"q":"42"}"#);
    }

    #[test]
    fn inline_array_with_null() {
        let out = convert("a: [1, , 3]\n", &ConversionOptions::default().with_indent(0));
        assert_eq!(out, r#"{"a":[1,null,3]}"#);
    }

    #[test]
    fn pretty_indent_nests() {
        let out = convert("a:\n  b: 1\n", &ConversionOptions::default().with_indent(2));
        assert_eq!(out, "{\n  \"a\": {\n    \"b\": 1\n  }\n}");
    }

    #[test]
    fn binary_tag_emits_byte_array() {
        let out = convert(
            "b: !!binary SGVsbG8=\n",
            &ConversionOptions::default().with_indent(0),
        );
        assert_eq!(out, r#"{"b":[72,101,108,108,111]}"#);
    }

    #[test]
    fn minify_concatenates_trimmed_lines() {
        let text = "{\n  \"a\": 1,\n  \"b\": 2\n}";
        assert_eq!(minify(text), r#"{ "a": 1, "b": 2 }"#);
    }
}
