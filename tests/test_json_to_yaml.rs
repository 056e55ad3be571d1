#[cfg(test)]
mod tests {
    use yamljson::{from_json_to_yaml, minify_json, try_parse_json, ConversionOptions};

    #[test]
    fn renders_flat_mapping() {
        let config = ConversionOptions::default();
        let yaml = from_json_to_yaml(r#"{"name":"alice","age":30}"#, &config).unwrap();
        assert_eq!(yaml, "name: alice\nage: 30\n");
    }

    #[test]
    fn renders_sequence_of_objects() {
        let config = ConversionOptions::default();
        let yaml = from_json_to_yaml(r#"{"users":[{"id":1},{"id":2}]}"#, &config).unwrap();
        assert_eq!(yaml, "users:\n  - id: 1\n  - id: 2\n");
    }

    #[test]
    fn rejects_scalar_root() {
        let config = ConversionOptions::default();
        assert!(from_json_to_yaml("42", &config).is_err());
    }

    #[test]
    fn minify_strips_newlines_and_extra_whitespace() {
        let text = "{\n  \"a\": 1,\n  \"b\": 2\n}";
        assert_eq!(minify_json(text), r#"{ "a": 1, "b": 2 }"#);
    }

    #[test]
    fn try_parse_accepts_object_and_array_roots_only() {
        assert!(try_parse_json(r#"{"a":1}"#));
        assert!(try_parse_json(r#"[1,2,3]"#));
        assert!(!try_parse_json("42"));
        assert!(!try_parse_json("{not json}"));
    }
}
