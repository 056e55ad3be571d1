//! The flat "element list" pivot structure that sits between the
//! structure builder and the resolver/classifier/emitter stages.
//!
//! A tree would make an anchor's subtree a scattered set of child nodes;
//! flattening into a single `Vec<Element>` bracketed by open/close markers
//! instead makes an anchor's subtree a contiguous range, so alias expansion
//! is a slice copy and merge-key expansion is a splice. This generalizes
//! the ordered-`Vec` idea the teacher's own `composer::NodeValue::Mapping`
//! uses to avoid a `HashMap` reordering keys.

/// A raw (unclassified) scalar value exactly as the scanner produced it,
/// before [`crate::classifier`] decides what J type it becomes.
#[derive(Debug, Clone, PartialEq)]
pub struct RawScalar {
    pub text: String,
    /// `true` for a quoted scalar or a block literal/folded scalar:
    /// classification is bypassed and the value always becomes a J
    /// string, verbatim.
    pub literal: bool,
}

impl RawScalar {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            literal: false,
        }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            literal: true,
        }
    }
}

/// A container open/close marker. `Marker::MappingStart`/`SequenceStart`
/// bracket the range of elements belonging to that container; the builder
/// always emits a matching `*End` at the same logical indent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    MappingStart,
    MappingEnd,
    SequenceStart,
    SequenceEnd,
}

/// One record of the element list.
///
/// Exactly one of `value` or `marker` is set for any given element:
/// scalar entries carry a `value`, container boundaries carry a `marker`.
/// `key` is set when this element (scalar or container) is itself the
/// value half of a mapping entry; it is absent for sequence items and for
/// the top-level document element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub key: Option<String>,
    pub value: Option<RawScalar>,
    pub marker: Option<Marker>,
    /// Logical nesting depth, computed incrementally by the builder —
    /// never the source column.
    pub indent: usize,
    pub anchor: Option<String>,
    pub alias: Option<String>,
    pub tag: Option<String>,
    pub line: usize,
}

impl Element {
    pub fn scalar(line: usize, indent: usize, value: RawScalar) -> Self {
        Self {
            key: None,
            value: Some(value),
            marker: None,
            indent,
            anchor: None,
            alias: None,
            tag: None,
            line,
        }
    }

    pub fn open(line: usize, indent: usize, marker: Marker) -> Self {
        debug_assert!(matches!(
            marker,
            Marker::MappingStart | Marker::SequenceStart
        ));
        Self {
            key: None,
            value: None,
            marker: Some(marker),
            indent,
            anchor: None,
            alias: None,
            tag: None,
            line,
        }
    }

    pub fn close(line: usize, indent: usize, marker: Marker) -> Self {
        debug_assert!(matches!(marker, Marker::MappingEnd | Marker::SequenceEnd));
        Self {
            key: None,
            value: None,
            marker: Some(marker),
            indent,
            anchor: None,
            alias: None,
            tag: None,
            line,
        }
    }

    pub fn alias_ref(line: usize, indent: usize, alias: impl Into<String>) -> Self {
        Self {
            key: None,
            value: None,
            marker: None,
            indent,
            anchor: None,
            alias: Some(alias.into()),
            tag: None,
            line,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn is_open(&self) -> bool {
        matches!(self.marker, Some(Marker::MappingStart) | Some(Marker::SequenceStart))
    }

    pub fn is_close(&self) -> bool {
        matches!(self.marker, Some(Marker::MappingEnd) | Some(Marker::SequenceEnd))
    }

    pub fn is_alias(&self) -> bool {
        self.alias.is_some()
    }

    pub fn is_scalar(&self) -> bool {
        self.value.is_some()
    }
}

pub type ElementList = Vec<Element>;

/// Finds the index of the close marker matching the open marker at
/// `elements[open]`, at the same logical indent. Shared by the resolver
/// (subtree copy/splice) and the emitter (recursive descent over the
/// otherwise-flat list).
pub fn matching_close(elements: &[Element], open: usize) -> Option<usize> {
    let indent = elements[open].indent;
    let opens_mapping = matches!(elements[open].marker, Some(Marker::MappingStart));
    let mut i = open + 1;
    while i < elements.len() {
        if elements[i].indent == indent {
            match elements[i].marker {
                Some(Marker::MappingEnd) if opens_mapping => return Some(i),
                Some(Marker::SequenceEnd) if !opens_mapping => return Some(i),
                _ => {}
            }
        }
        i += 1;
    }
    None
}
