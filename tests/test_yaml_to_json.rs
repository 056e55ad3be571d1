#[cfg(test)]
mod tests {
    use yamljson::{to_json_string, to_json_value, ConversionOptions};

    #[test]
    fn converts_flat_mapping() {
        let config = ConversionOptions::default().with_indent(0);
        let json = to_json_string("name: alice\nage: 30\n", &config).unwrap();
        assert_eq!(json, r#"{"name":"alice","age":30}"#);
    }

    #[test]
    fn converts_nested_sequence() {
        let config = ConversionOptions::default().with_indent(0);
        let json = to_json_string("fruits:\n  - apple\n  - pear\n", &config).unwrap();
        assert_eq!(json, r#"{"fruits":["apple","pear"]}"#);
    }

    #[test]
    fn expands_anchor_and_alias() {
        let config = ConversionOptions::default().with_indent(0);
        let source = "base: &b\n  host: localhost\n  port: 80\nservice:\n  <<: *b\n  port: 8080\n";
        let value = to_json_value(source, &config).unwrap();
        let service = value.get("service").unwrap();
        assert_eq!(service.get("host").and_then(|v| v.as_str()), Some("localhost"));
        assert_eq!(service.get("port").and_then(|v| v.as_i64()), Some(8080));
    }

    #[test]
    fn converts_sequence_of_mappings() {
        let config = ConversionOptions::default().with_indent(0);
        let source = "users:\n  - id: 1\n    name: alice\n  - id: 2\n    name: bob\n";
        let json = to_json_string(source, &config).unwrap();
        assert_eq!(
            json,
            r#"{"users":[{"id":1,"name":"alice"},{"id":2,"name":"bob"}]}"#
        );
    }

    #[test]
    fn round_trips_sequence_of_mappings_through_yaml() {
        use yamljson::from_json_to_yaml;
        let config = ConversionOptions::default();
        let original = r#"{"users":[{"id":1},{"id":2}]}"#;
        let yaml = from_json_to_yaml(original, &config).unwrap();
        let back = to_json_string(&yaml, &config.clone().with_indent(0)).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn classifies_scalars_by_priority() {
        let config = ConversionOptions::default().with_indent(0);
        let source = "a: 42\nb: 3.5\nc: true\nd: null\ne: hello\nf: \"42\"\n";
        let value = to_json_value(source, &config).unwrap();
        assert_eq!(value.get("a").and_then(|v| v.as_i64()), Some(42));
        assert_eq!(value.get("b").and_then(|v| v.as_f64()), Some(3.5));
        assert_eq!(value.get("c").and_then(|v| v.as_bool()), Some(true));
        assert!(value.get("d").unwrap().is_null());
        assert_eq!(value.get("e").and_then(|v| v.as_str()), Some("hello"));
        assert_eq!(value.get("f").and_then(|v| v.as_str()), Some("42"));
    }

    #[test]
    fn anchor_not_found_is_an_error() {
        let config = ConversionOptions::default();
        let err = to_json_string("a: *missing\n", &config).unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn duplicate_keys_are_rejected_by_default() {
        let config = ConversionOptions::default();
        let err = to_json_string("a: 1\na: 2\n", &config).unwrap_err();
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn duplicate_keys_allowed_with_option() {
        let config = ConversionOptions::default()
            .with_indent(0)
            .with_allow_duplicate_keys(true);
        let json = to_json_string("a: 1\na: 2\n", &config).unwrap();
        assert_eq!(json, r#"{"a":2}"#);
    }
}
