//! Structure builder: turns the scanner's line-by-line token stream into
//! the flat [`crate::element::ElementList`].
//!
//! Grounded on the teacher's `parser::parse_mapping_lines`/
//! `parse_sequence_lines`, which compare leading-whitespace length between
//! lines to find nested blocks and recurse. This module does the same
//! indent comparison, but on the scanner's already-classified
//! [`ScannedLine`]s instead of raw strings, and emits a flat element list
//! instead of `Event`s.

use crate::config::ConversionOptions;
use crate::element::{Element, ElementList, Marker, RawScalar};
use crate::error::{Error, Result, YamlProblem};
use crate::scanner::{tokenize_inline, InlineContent, InlineToken, Scanner, ScannedLine};

/// Builds with default options (duplicate keys rejected).
pub fn build(text: &str) -> Result<ElementList> {
    build_with_config(text, &ConversionOptions::default())
}

pub fn build_with_config(text: &str, config: &ConversionOptions) -> Result<ElementList> {
    let scanner = Scanner::new(text);
    let lines = scanner.scan()?;
    if lines.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = Builder {
        lines,
        pos: 0,
        allow_duplicate_keys: config.allow_duplicate_keys(),
    };
    let column = builder.lines[0].indent;
    if builder.lines[0].dash_count > 0 {
        builder.build_sequence(column, 0)
    } else {
        builder.build_mapping(column, 0)
    }
}

struct Builder {
    lines: Vec<ScannedLine>,
    pos: usize,
    allow_duplicate_keys: bool,
}

impl Builder {
    fn peek(&self) -> Option<&ScannedLine> {
        self.lines.get(self.pos)
    }

    /// `column` is the source column shared by every line of this mapping
    /// (purely structural: where to stop). `depth` is the logical nesting
    /// depth stored on the produced elements — a field shares its
    /// mapping's own `depth`; only a field whose value is itself a new
    /// container steps down to `depth + 1` (see `build_value`).
    fn build_mapping(&mut self, column: usize, depth: usize) -> Result<ElementList> {
        let open_line = self.peek().map(|l| l.line).unwrap_or(1);
        let mut out = vec![Element::open(open_line, depth, Marker::MappingStart)];
        // (key, [start, end) within `out`) for each field appended so far,
        // so a later duplicate can splice out the earlier one in O(1) lookup.
        let mut fields: Vec<(String, usize, usize)> = Vec::new();

        while let Some(line) = self.peek() {
            if line.indent != column {
                break;
            }
            if line.dash_count > 0 {
                break;
            }
            let line = line.clone();
            let key = match &line.key {
                Some(k) => k.clone(),
                None => return Err(Error::yaml(YamlProblem::CollectionItem, line.line)),
            };
            let existing = fields.iter().position(|(k, _, _)| k == &key);
            if existing.is_some() && !self.allow_duplicate_keys {
                return Err(Error::yaml(YamlProblem::DuplicatedKey, line.line));
            }
            self.pos += 1;

            let entry = self.build_value(&line, column, depth)?;

            if let Some(idx) = existing {
                let (_, start, end) = fields.remove(idx);
                let shift = end - start;
                out.drain(start..end);
                for (_, s, e) in fields.iter_mut() {
                    if *s >= end {
                        *s -= shift;
                        *e -= shift;
                    }
                }
            }

            let start = out.len();
            out.extend(apply_key(entry, &key));
            fields.push((key, start, out.len()));
        }

        out.push(Element::close(open_line, depth, Marker::MappingEnd));
        Ok(out)
    }

    /// See `build_mapping` for the `column`/`depth` split; an item shares
    /// the sequence's own `depth` unless it expands into a nested
    /// container (`build_sequence_item`).
    fn build_sequence(&mut self, column: usize, depth: usize) -> Result<ElementList> {
        let open_line = self.peek().map(|l| l.line).unwrap_or(1);
        let mut out = vec![Element::open(open_line, depth, Marker::SequenceStart)];

        while let Some(line) = self.peek() {
            if line.indent != column || line.dash_count == 0 {
                break;
            }
            let line = line.clone();
            self.pos += 1;
            let item = self.build_sequence_item(&line, column, depth)?;
            out.extend(item);
        }

        out.push(Element::close(open_line, depth, Marker::SequenceEnd));
        Ok(out)
    }

    fn build_sequence_item(&mut self, line: &ScannedLine, column: usize, depth: usize) -> Result<ElementList> {
        // Each extra leading dash (`"- - x"`) wraps the item in one more
        // nested single-item sequence; every wrapper is a new container,
        // so each steps down one logical level from the one enclosing it.
        let extra = line.dash_count.saturating_sub(1);
        let mut out = Vec::new();
        for i in 0..extra {
            out.push(Element::open(line.line, depth + 1 + i, Marker::SequenceStart));
        }
        let inner_depth = depth + extra;
        // Tuple-in-item (spec.md §4.2 BuildSequence): `- key: value` starts a
        // mapping at the column where content follows the dash; further
        // lines at that same column are more fields of the same mapping.
        let inner = if line.key.is_some() {
            self.build_item_mapping(line, inner_depth + 1)?
        } else {
            self.build_value(line, column, inner_depth)?
        };
        out.extend(inner);
        for i in (0..extra).rev() {
            out.push(Element::close(line.line, depth + 1 + i, Marker::SequenceEnd));
        }
        Ok(out)
    }

    /// Builds the one-or-more-field mapping headed by a sequence item whose
    /// dash is immediately followed by `key: value` (e.g. `- name: foo` then
    /// `  age: 1` on the next line at the same column as `name`). `depth` is
    /// this mapping's own logical depth, already stepped down by the caller.
    fn build_item_mapping(&mut self, first_line: &ScannedLine, depth: usize) -> Result<ElementList> {
        let col = first_line.content_indent;
        let open_line = first_line.line;
        let mut out = vec![Element::open(open_line, depth, Marker::MappingStart)];
        let mut fields: Vec<(String, usize, usize)> = Vec::new();

        let key = first_line.key.clone().expect("caller checked key.is_some()");
        let entry = self.build_value(first_line, col, depth)?;
        let start = out.len();
        out.extend(apply_key(entry, &key));
        fields.push((key, start, out.len()));

        while let Some(line) = self.peek() {
            if line.indent != col || line.dash_count > 0 {
                break;
            }
            let line = line.clone();
            let key = match &line.key {
                Some(k) => k.clone(),
                None => return Err(Error::yaml(YamlProblem::CollectionItem, line.line)),
            };
            let existing = fields.iter().position(|(k, _, _)| k == &key);
            if existing.is_some() && !self.allow_duplicate_keys {
                return Err(Error::yaml(YamlProblem::DuplicatedKey, line.line));
            }
            self.pos += 1;
            let entry = self.build_value(&line, col, depth)?;

            if let Some(idx) = existing {
                let (_, s, e) = fields.remove(idx);
                let shift = e - s;
                out.drain(s..e);
                for (_, s2, e2) in fields.iter_mut() {
                    if *s2 >= e {
                        *s2 -= shift;
                        *e2 -= shift;
                    }
                }
            }

            let start = out.len();
            out.extend(apply_key(entry, &key));
            fields.push((key, start, out.len()));
        }

        out.push(Element::close(open_line, depth, Marker::MappingEnd));
        Ok(out)
    }

    /// Builds the value portion of a mapping entry or sequence item: a
    /// scalar, an alias, an inline array, or (when the line carries no
    /// inline content) a nested block on the following lines. `column` is
    /// the source column this entry's line was found at (structural,
    /// used only to detect a nested block); `depth` is the logical depth
    /// this entry shares with its enclosing container when it stays a
    /// scalar. A value that expands into a new container — a block, an
    /// inline array — steps down to `depth + 1` for that container's own
    /// open/close.
    fn build_value(&mut self, line: &ScannedLine, column: usize, depth: usize) -> Result<ElementList> {
        if let Some(alias) = &line.alias {
            let mut el = Element::alias_ref(line.line, depth, alias.clone());
            el.tag = line.tag.clone();
            return Ok(vec![el]);
        }

        match &line.content {
            InlineContent::Scalar(scalar) => {
                let mut el = Element::scalar(line.line, depth, scalar.clone());
                el.anchor = line.anchor.clone();
                el.tag = line.tag.clone();
                Ok(vec![el])
            }
            InlineContent::InlineArray(text) => {
                self.build_inline_array(text, line.line, depth + 1, line.anchor.clone(), line.tag.clone())
            }
            InlineContent::BlockHeader { .. } => {
                // The scanner always resolves block headers into a
                // literal Scalar before the builder sees them.
                unreachable!("scanner resolves block headers before returning")
            }
            InlineContent::Empty => {
                let next_column = self.peek().map(|l| l.indent);
                let next_is_dash = self.peek().map(|l| l.dash_count > 0).unwrap_or(false);
                let is_nested_block = match next_column {
                    Some(next) if next > column => true,
                    // A sequence-lead at the *same* column as this key is
                    // still this key's value (spec.md §4.2 BuildMapping):
                    // block sequences don't indent their dashes relative
                    // to the key that owns them.
                    Some(next) if next == column && next_is_dash => true,
                    _ => false,
                };
                if is_nested_block {
                    if matches!(line.tag.as_deref(), Some(t) if SCALAR_ONLY_TAGS.contains(&t)) {
                        return Err(Error::yaml(YamlProblem::CollectionBlock, line.line));
                    }
                    let next_column = next_column.unwrap();
                    let mut nested = if next_is_dash {
                        self.build_sequence(next_column, depth + 1)?
                    } else {
                        self.build_mapping(next_column, depth + 1)?
                    };
                    if let Some(first) = nested.first_mut() {
                        first.anchor = line.anchor.clone();
                        first.tag = line.tag.clone();
                    }
                    Ok(nested)
                } else {
                    let mut el = Element::scalar(line.line, depth, RawScalar::plain(String::new()));
                    el.anchor = line.anchor.clone();
                    el.tag = line.tag.clone();
                    Ok(vec![el])
                }
            }
        }
    }

    /// `depth` is this array's own logical depth (already stepped down by
    /// the caller from the field/item it is the value of). Items directly
    /// in the array share `depth`; a nested `[...]` or a tuple-key wrapper
    /// mapping is itself a new container and steps down to `depth + 1`.
    fn build_inline_array(
        &self,
        text: &str,
        line: usize,
        depth: usize,
        anchor: Option<String>,
        tag: Option<String>,
    ) -> Result<ElementList> {
        let tokens = tokenize_inline(text, line)?;
        let mut out = vec![Element::open(line, depth, Marker::SequenceStart)];
        if let Some(first) = out.first_mut() {
            first.anchor = anchor;
            first.tag = tag;
        }

        let mut iter = tokens.into_iter().peekable();
        // `text` spans the outer brackets too, so the token stream includes
        // the outer ArrayStart/ArrayEnd pair already accounted for by the
        // `out[0]` pushed above; only bracket_depth > 1 is a genuinely
        // nested `[...]` that needs its own element pair. `levels` tracks
        // the logical depth of whichever bracket is innermost right now.
        let mut bracket_depth = 0i32;
        let mut levels = vec![depth];
        let mut last_was_separator = true;

        while let Some(tok) = iter.next() {
            match tok {
                InlineToken::ArrayStart => {
                    bracket_depth += 1;
                    if bracket_depth > 1 {
                        let nested = levels.last().copied().unwrap_or(depth) + 1;
                        levels.push(nested);
                        out.push(Element::open(line, nested, Marker::SequenceStart));
                    }
                    last_was_separator = true;
                }
                InlineToken::ArrayEnd => {
                    if bracket_depth > 1 {
                        let closed = *levels.last().unwrap();
                        // Decision (DESIGN.md #1): a trailing comma right
                        // before ']' means an explicit trailing null item.
                        if last_was_separator && !matches!(out.last(), Some(e) if e.is_open()) {
                            out.push(Element::scalar(line, closed, RawScalar::plain(String::new())));
                        }
                        out.push(Element::close(line, closed, Marker::SequenceEnd));
                        levels.pop();
                    }
                    bracket_depth -= 1;
                    if bracket_depth < 0 {
                        return Err(Error::yaml(YamlProblem::InvalidArray, line));
                    }
                    last_was_separator = false;
                }
                InlineToken::Comma => {
                    last_was_separator = true;
                }
                InlineToken::Scalar(scalar) => {
                    let current = *levels.last().unwrap();
                    out.push(Element::scalar(line, current, scalar));
                    last_was_separator = false;
                }
                InlineToken::Anchor(name) => {
                    let current = *levels.last().unwrap();
                    if let Some(InlineToken::Scalar(scalar)) = iter.peek().cloned() {
                        iter.next();
                        let mut el = Element::scalar(line, current, scalar);
                        el.anchor = Some(name);
                        out.push(el);
                    }
                    last_was_separator = false;
                }
                InlineToken::Alias(name) => {
                    let current = *levels.last().unwrap();
                    out.push(Element::alias_ref(line, current, name));
                    last_was_separator = false;
                }
                InlineToken::Tag(name) => {
                    let current = *levels.last().unwrap();
                    if let Some(InlineToken::Scalar(scalar)) = iter.peek().cloned() {
                        iter.next();
                        let mut el = Element::scalar(line, current, scalar);
                        el.tag = Some(name);
                        out.push(el);
                    }
                    last_was_separator = false;
                }
                InlineToken::Key(name) => {
                    // Tuple-in-array element (spec.md §4.2 BuildInlineArray):
                    // wrap the keyed value in its own one-field mapping,
                    // one level deeper than the array holding it.
                    let wrapper = levels.last().copied().unwrap_or(depth) + 1;
                    out.push(Element::open(line, wrapper, Marker::MappingStart));
                    match iter.peek().cloned() {
                        Some(InlineToken::Scalar(scalar)) => {
                            iter.next();
                            let mut el = Element::scalar(line, wrapper, scalar);
                            el.key = Some(name);
                            out.push(el);
                        }
                        Some(InlineToken::Alias(alias_name)) => {
                            iter.next();
                            let mut el = Element::alias_ref(line, wrapper, alias_name);
                            el.key = Some(name);
                            out.push(el);
                        }
                        Some(InlineToken::Anchor(anchor_name)) => {
                            iter.next();
                            if let Some(InlineToken::Scalar(scalar)) = iter.peek().cloned() {
                                iter.next();
                                let mut el = Element::scalar(line, wrapper, scalar);
                                el.key = Some(name);
                                el.anchor = Some(anchor_name);
                                out.push(el);
                            } else {
                                let mut el = Element::scalar(line, wrapper, RawScalar::plain(String::new()));
                                el.key = Some(name);
                                out.push(el);
                            }
                        }
                        Some(InlineToken::Tag(tag_name)) => {
                            iter.next();
                            if let Some(InlineToken::Scalar(scalar)) = iter.peek().cloned() {
                                iter.next();
                                let mut el = Element::scalar(line, wrapper, scalar);
                                el.key = Some(name);
                                el.tag = Some(tag_name);
                                out.push(el);
                            } else {
                                let mut el = Element::scalar(line, wrapper, RawScalar::plain(String::new()));
                                el.key = Some(name);
                                out.push(el);
                            }
                        }
                        _ => {
                            let mut el = Element::scalar(line, wrapper, RawScalar::plain(String::new()));
                            el.key = Some(name);
                            out.push(el);
                        }
                    }
                    out.push(Element::close(line, wrapper, Marker::MappingEnd));
                    last_was_separator = false;
                }
            }
        }

        // Trailing explicit null right before the outer closing bracket.
        if last_was_separator {
            if let Some(last) = out.last() {
                if !last.is_open() {
                    out.push(Element::scalar(line, depth, RawScalar::plain(String::new())));
                }
            }
        }

        out.push(Element::close(line, depth, Marker::SequenceEnd));
        Ok(out)
    }
}

/// Tags that can only apply to a scalar; a nested block following a line
/// carrying one of these is a *CollectionBlock* error (spec.md §4.4's tag
/// consistency check extended to the builder level, since the classifier
/// never gets to see container markers).
const SCALAR_ONLY_TAGS: &[&str] = &[
    "!!str", "!!int", "!!float", "!!bool", "!!null", "!!timestamp", "!!binary",
];

fn apply_key(mut entry: ElementList, key: &str) -> ElementList {
    if let Some(first) = entry.first_mut() {
        first.key = Some(key.to_string());
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_flat_mapping() {
        let list = build("a: 1\nb: two\n").unwrap();
        assert!(matches!(list[0].marker, Some(Marker::MappingStart)));
        assert_eq!(list[1].key.as_deref(), Some("a"));
        assert_eq!(list[2].key.as_deref(), Some("b"));
        assert!(matches!(list[3].marker, Some(Marker::MappingEnd)));
    }

    #[test]
    fn builds_nested_mapping() {
        let list = build("a:\n  b: 1\n").unwrap();
        assert!(matches!(list[0].marker, Some(Marker::MappingStart)));
        assert_eq!(list[1].key.as_deref(), Some("a"));
        assert!(matches!(list[1].marker, Some(Marker::MappingStart)));
        assert_eq!(list[2].key.as_deref(), Some("b"));
    }

    #[test]
    fn builds_sequence_at_same_indent_as_key() {
        // Block sequences conventionally don't indent their dashes
        // relative to the key that owns them.
        let list = build("a:\n- x\n- y\nb: 1\n").unwrap();
        assert!(matches!(list[0].marker, Some(Marker::MappingStart)));
        assert_eq!(list[1].key.as_deref(), Some("a"));
        assert!(matches!(list[1].marker, Some(Marker::SequenceStart)));
        assert_eq!(list[2].value.as_ref().unwrap().text, "x");
        assert_eq!(list[3].value.as_ref().unwrap().text, "y");
        assert!(matches!(list[4].marker, Some(Marker::SequenceEnd)));
        assert_eq!(list[5].key.as_deref(), Some("b"));
        assert_eq!(list[5].value.as_ref().unwrap().text, "1");
        assert!(matches!(list[6].marker, Some(Marker::MappingEnd)));
    }

    #[test]
    fn builds_sequence_of_scalars() {
        let list = build("- 1\n- 2\n- 3\n").unwrap();
        assert!(matches!(list[0].marker, Some(Marker::SequenceStart)));
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn builds_sequence_of_mappings() {
        let list = build("users:\n  - id: 1\n    name: alice\n  - id: 2\n    name: bob\n").unwrap();
        // root { , "users" [ { id=1 name=alice } { id=2 name=bob } ] }
        assert!(matches!(list[0].marker, Some(Marker::MappingStart)));
        assert_eq!(list[1].key.as_deref(), Some("users"));
        assert!(matches!(list[1].marker, Some(Marker::SequenceStart)));
        let first_item = &list[2];
        assert!(matches!(first_item.marker, Some(Marker::MappingStart)));
        assert_eq!(list[3].key.as_deref(), Some("id"));
        assert_eq!(list[3].value.as_ref().unwrap().text, "1");
        assert_eq!(list[4].key.as_deref(), Some("name"));
        assert_eq!(list[4].value.as_ref().unwrap().text, "alice");
        assert!(matches!(list[5].marker, Some(Marker::MappingEnd)));
        assert!(matches!(list[6].marker, Some(Marker::MappingStart)));
        assert_eq!(list[7].key.as_deref(), Some("id"));
        assert_eq!(list[7].value.as_ref().unwrap().text, "2");
    }

    #[test]
    fn builds_sequence_item_with_single_field_mapping() {
        let list = build("- id: 1\n- id: 2\n").unwrap();
        assert!(matches!(list[0].marker, Some(Marker::SequenceStart)));
        assert!(matches!(list[1].marker, Some(Marker::MappingStart)));
        assert_eq!(list[2].key.as_deref(), Some("id"));
        assert!(matches!(list[3].marker, Some(Marker::MappingEnd)));
        assert!(matches!(list[4].marker, Some(Marker::MappingStart)));
        assert_eq!(list[5].key.as_deref(), Some("id"));
        assert!(matches!(list[6].marker, Some(Marker::MappingEnd)));
        assert!(matches!(list[7].marker, Some(Marker::SequenceEnd)));
    }

    #[test]
    fn builds_inline_array() {
        let list = build("a: [1, 2, 3]\n").unwrap();
        assert!(matches!(list[1].marker, Some(Marker::SequenceStart)));
        assert_eq!(list[1].key.as_deref(), Some("a"));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = build("a: 1\na: 2\n").unwrap_err();
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn allow_duplicate_keys_keeps_last_occurrence() {
        let config = ConversionOptions::default().with_allow_duplicate_keys(true);
        let list = build_with_config("a: 1\nb: 2\na: 3\n", &config).unwrap();
        let keys: Vec<_> = list.iter().filter_map(|e| e.key.as_deref()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn builds_inline_array_tuple_elements() {
        let list = build("a: [x: 1, y: 2]\n").unwrap();
        // root { , "a" [ { x=1 } { y=2 } ] }
        assert!(matches!(list[1].marker, Some(Marker::SequenceStart)));
        assert!(matches!(list[2].marker, Some(Marker::MappingStart)));
        assert_eq!(list[3].key.as_deref(), Some("x"));
        assert_eq!(list[3].value.as_ref().unwrap().text, "1");
        assert!(matches!(list[4].marker, Some(Marker::MappingEnd)));
        assert!(matches!(list[5].marker, Some(Marker::MappingStart)));
        assert_eq!(list[6].key.as_deref(), Some("y"));
        assert!(matches!(list[7].marker, Some(Marker::MappingEnd)));
        assert!(matches!(list[8].marker, Some(Marker::SequenceEnd)));
    }

    #[test]
    fn rejects_merge_key_inside_inline_array() {
        let err = build("a: [<<: *base]\n").unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn rejects_collection_item_inside_inline_array() {
        let err = build("a: [- x]\n").unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn rejects_block_modifier_on_collection_item_lead() {
        let err = build("- |\n  foo\n").unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn rejects_scalar_tagged_collection() {
        let err = build("a: !!str\n  b: 1\n").unwrap_err();
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn rejects_invalid_key_characters() {
        let err = build("a,b: 1\n").unwrap_err();
        assert_eq!(err.line(), 1);
    }
}
