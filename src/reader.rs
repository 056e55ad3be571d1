use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// A single numbered source line, already stripped of its trailing line
/// terminator but not of leading whitespace (the leading-whitespace count
/// is the line's source indent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub indent: usize,
    pub content: String,
}

impl Line {
    /// The content with its leading indent stripped.
    pub fn trimmed(&self) -> &str {
        &self.content[self.indent..]
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    pub fn is_comment(&self) -> bool {
        self.trimmed().starts_with('#')
    }
}

/// Splits Y source text into 1-based-numbered [`Line`]s, detecting and
/// stripping a leading byte-order mark first.
///
/// Grounded on the teacher's `reader::AdvancedReader`, which performs the
/// same BOM-sniff-then-decode sequence using the same `encoding_rs` crate.
pub struct LineProvider {
    lines: Vec<Line>,
}

impl LineProvider {
    pub fn from_str(text: &str) -> Self {
        let stripped = strip_bom_str(text);
        Self::build(stripped)
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let (text, _encoding, _had_errors) = detect_and_decode(bytes);
        Self::from_str(&text)
    }

    fn build(text: &str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, raw)| {
                let indent = raw.len() - raw.trim_start_matches(' ').len();
                Line {
                    number: i + 1,
                    indent,
                    content: raw.to_string(),
                }
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn strip_bom_str(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

fn detect_and_decode(bytes: &[u8]) -> (String, &'static Encoding, bool) {
    let (encoding, bom_length) = if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        (UTF_8, 3)
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        (UTF_16BE, 2)
    } else if bytes.starts_with(&[0xFF, 0xFE]) {
        (UTF_16LE, 2)
    } else {
        (UTF_8, 0)
    };
    let (text, _, had_errors) = encoding.decode(&bytes[bom_length..]);
    (text.into_owned(), encoding, had_errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_utf8_bom() {
        let provider = LineProvider::from_str("\u{feff}a: 1\nb: 2\n");
        assert_eq!(provider.lines()[0].content, "a: 1");
    }

    #[test]
    fn tracks_indent_and_numbering() {
        let provider = LineProvider::from_str("a:\n  b: 1\n    c: 2\n");
        let lines = provider.lines();
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].indent, 2);
        assert_eq!(lines[2].indent, 4);
        assert_eq!(lines[2].trimmed(), "c: 2");
    }

    #[test]
    fn detects_blank_and_comment_lines() {
        let provider = LineProvider::from_str("a: 1\n\n# comment\nb: 2\n");
        let lines = provider.lines();
        assert!(lines[1].is_blank());
        assert!(lines[2].is_comment());
    }
}
