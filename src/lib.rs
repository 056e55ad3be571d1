//! Conversion between an indentation-sensitive YAML-family format (Y) and
//! a brace/bracket-delimited JSON-family format (J).
//!
//! The Y → J direction is the hard part: [`reader`] splits source text
//! into lines, [`scanner`] turns lines into tokens, [`builder`] turns
//! tokens into a flat [`element`] list, [`resolver`] expands anchors,
//! aliases and merge keys in place, [`classifier`] decides each scalar's J
//! type, and [`emitter`] writes the result as J text. [`json`] is the J
//! tree model the emitter's `to_value` and the reverse [`reverse`]
//! direction both build on.
//!
//! Grounded on the teacher's `lib.rs` role as the single place wiring the
//! pipeline stages together; rewritten to drop the PyO3 `#[pymodule]`
//! surface (this crate has no Python binding) in favor of plain functions.

pub mod builder;
pub mod classifier;
pub mod config;
pub mod element;
pub mod emitter;
pub mod error;
pub mod json;
pub mod reader;
pub mod resolver;
pub mod reverse;
pub mod scanner;

pub use config::ConversionOptions;
pub use error::{Error, Result};
pub use json::Value;

/// Converts Y text to J text (spec.md §6, "Y→J text").
pub fn to_json_string(source: &str, config: &ConversionOptions) -> Result<String> {
    let elements = builder::build_with_config(source, config)?;
    let elements = resolver::resolve(elements)?;
    emitter::emit(&elements, config)
}

/// Converts Y text to a J value tree (spec.md §6, "Y→J tree").
pub fn to_json_value(source: &str, config: &ConversionOptions) -> Result<Value> {
    let elements = builder::build_with_config(source, config)?;
    let elements = resolver::resolve(elements)?;
    emitter::to_value(&elements, config)
}

/// Converts J text to Y text (spec.md §6, "J→Y text").
pub fn from_json_to_yaml(source: &str, config: &ConversionOptions) -> Result<String> {
    let value = Value::parse_root(source)?;
    Ok(reverse::to_yaml(&value, config))
}

/// Converts a J value tree to Y text (spec.md §6, "J→Y text").
pub fn value_to_yaml(value: &Value, config: &ConversionOptions) -> String {
    reverse::to_yaml(value, config)
}

/// Produces one-line J text from J source (spec.md §6, "J minify").
pub fn minify_json(source: &str) -> String {
    emitter::minify(source)
}

/// `true` if `source` parses as valid J with an array or object root;
/// never raises (spec.md §7, `tryParse`).
pub fn try_parse_json(source: &str) -> bool {
    Value::try_parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_simple_document() {
        let config = ConversionOptions::default().with_indent(0);
        let json = to_json_string("key: value\nn: 42\n", &config).unwrap();
        assert_eq!(json, r#"{"key":"value","n":42}"#);
    }

    #[test]
    fn json_to_yaml_to_json_stable() {
        let config = ConversionOptions::default();
        let original = r#"{"a":1,"b":[1,2,3],"c":{"d":true}}"#;
        let yaml = from_json_to_yaml(original, &config).unwrap();
        let back = to_json_string(&yaml, &config.clone().with_indent(0)).unwrap();
        let a = Value::parse(original).unwrap();
        let b = Value::parse(&back).unwrap();
        assert_eq!(a, b);
    }
}
