//! Token scanner: turns one physical source line (plus, for block and
//! quoted scalars, as many following lines as the value needs) into a
//! [`ScannedLine`] the structure builder can consume without having to
//! look at raw text again.
//!
//! Grounded on the teacher's `scanner::Scanner`: a byte-dispatch scan loop
//! with one dedicated method per token family (`scan_quoted_scalar`,
//! `scan_plain_scalar`, `scan_anchor`, `scan_alias`, `scan_tag`). The
//! teacher's scanner is not indentation-aware; this one is, because the
//! structure builder needs each line pre-classified by logical role.

use crate::element::RawScalar;
use crate::error::{Error, Result, YamlProblem};
use crate::reader::{Line, LineProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chomp {
    Clip,
    Strip,
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    Literal,
    Folded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InlineContent {
    Scalar(RawScalar),
    BlockHeader { style: BlockStyle, chomp: Chomp },
    InlineArray(String),
    /// Nothing follows the key or item marker on this line: a nested
    /// block (mapping or sequence) starts on the following, deeper-indented
    /// lines.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScannedLine {
    pub line: usize,
    pub indent: usize,
    pub dash_count: usize,
    /// The column the content immediately following the last `- ` starts
    /// at — i.e. this line's own indent plus however much of `"- "` (or
    /// `"-"`) was stripped. Used by the structure builder to find the
    /// tuple-in-item's mapping column (spec.md §4.2 "tuple elements").
    pub content_indent: usize,
    pub key: Option<String>,
    pub anchor: Option<String>,
    pub alias: Option<String>,
    pub tag: Option<String>,
    pub content: InlineContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InlineToken {
    ArrayStart,
    ArrayEnd,
    Comma,
    Scalar(RawScalar),
    Anchor(String),
    Alias(String),
    Tag(String),
    /// A tuple-in-array key (spec.md §4.2 BuildInlineArray): `key` in a
    /// `[key: value, ...]` element. The builder wraps the key and the
    /// token(s) that follow in a one-field `{…}` object.
    Key(String),
}

pub struct Scanner {
    lines: Vec<Line>,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        let provider = LineProvider::from_str(text);
        Self {
            lines: provider.lines().to_vec(),
        }
    }

    pub fn scan(&self) -> Result<Vec<ScannedLine>> {
        let mut out = Vec::new();
        let mut i = 0usize;
        while i < self.lines.len() {
            let line = &self.lines[i];
            if line.is_blank() || line.is_comment() {
                i += 1;
                continue;
            }
            let (scanned, consumed) = self.scan_logical_line(i)?;
            out.push(scanned);
            i += consumed;
        }
        Ok(out)
    }

    /// Scans one logical line starting at `self.lines[start]`, consuming
    /// as many following physical lines as a block or quoted scalar needs.
    /// Returns the scanned line and the number of physical lines consumed.
    fn scan_logical_line(&self, start: usize) -> Result<(ScannedLine, usize)> {
        let line = &self.lines[start];
        let indent = line.indent;
        let mut rest = strip_trailing_comment(line.trimmed());

        let mut dash_count = 0usize;
        let mut content_indent = indent;
        loop {
            if let Some(stripped) = rest.strip_prefix("- ") {
                dash_count += 1;
                content_indent += rest.len() - stripped.len();
                let trimmed = stripped.trim_start();
                content_indent += stripped.len() - trimmed.len();
                rest = trimmed;
            } else if rest == "-" {
                dash_count += 1;
                content_indent += 1;
                rest = "";
                break;
            } else {
                break;
            }
        }

        // A key carries no anchor/tag/alias of its own (those annotate the
        // value); split the key off the untouched dash-stripped text first,
        // then scan anchor/tag/alias prefixes on the value side only.
        let (key, value_part) = if let Some(split) = find_key_colon(rest) {
            let (key_part, value_part) = rest.split_at(split);
            let value_part = value_part[1..].trim_start();
            (Some(validate_key(key_part.trim(), line.number)?), value_part)
        } else {
            (None, rest)
        };
        rest = value_part;

        let mut anchor = None;
        let mut tag = None;

        loop {
            let trimmed = rest.trim_start();
            if let Some(stripped) = trimmed.strip_prefix('&') {
                let (name, remainder) = take_identifier(stripped);
                if name.is_empty() {
                    return Err(Error::yaml(YamlProblem::AnchorAliasName, line.number));
                }
                anchor = Some(name.to_string());
                rest = remainder;
            } else if let Some(stripped) = trimmed.strip_prefix('!') {
                // `!!name` is a builtin tag; a lone `!name` is a local tag
                // (spec.md §4.1 step 2).
                if let Some(builtin_rest) = stripped.strip_prefix('!') {
                    let (name, remainder) = take_tag_name(builtin_rest);
                    let lower = name.to_ascii_lowercase();
                    if !BUILTIN_TAGS.contains(&lower.as_str()) {
                        return Err(Error::yaml(YamlProblem::InvalidTag, line.number));
                    }
                    tag = Some(format!("!!{}", lower));
                    rest = remainder;
                } else {
                    let (name, remainder) = take_tag_name(stripped);
                    tag = Some(format!("!{}", name));
                    rest = remainder;
                }
            } else {
                rest = trimmed;
                break;
            }
        }

        if let Some(stripped) = rest.strip_prefix('*') {
            let (name, remainder) = take_identifier(stripped);
            if name.is_empty() {
                return Err(Error::yaml(YamlProblem::AnchorAliasName, line.number));
            }
            if !remainder.trim().is_empty() {
                return Err(Error::yaml(YamlProblem::AliasValue, line.number));
            }
            return Ok((
                ScannedLine {
                    line: line.number,
                    indent,
                    dash_count,
                    content_indent,
                    key,
                    anchor,
                    alias: Some(name.to_string()),
                    tag,
                    content: InlineContent::Empty,
                },
                1,
            ));
        }

        self.finish_value(line, indent, dash_count, content_indent, key, anchor, tag, rest)
    }

    #[allow(clippy::too_many_arguments)]
    fn finish_value(
        &self,
        line: &Line,
        indent: usize,
        dash_count: usize,
        content_indent: usize,
        key: Option<String>,
        anchor: Option<String>,
        tag: Option<String>,
        value_part: &str,
    ) -> Result<(ScannedLine, usize)> {
        if value_part.is_empty() {
            return Ok((
                ScannedLine {
                    line: line.number,
                    indent,
                    dash_count,
                    content_indent,
                    key,
                    anchor,
                    alias: None,
                    tag,
                    content: InlineContent::Empty,
                },
                1,
            ));
        }

        if let Some(style_chomp) = parse_block_header(value_part) {
            if dash_count > 0 {
                return Err(Error::yaml(YamlProblem::InvalidBlock, line.number));
            }
            let (style, chomp) = style_chomp;
            let is_binary = tag.as_deref() == Some("!!binary");
            let (text, consumed) = self.consume_block_scalar(line, indent, style, chomp, is_binary)?;
            return Ok((
                ScannedLine {
                    line: line.number,
                    indent,
                    dash_count,
                    content_indent,
                    key,
                    anchor,
                    alias: None,
                    tag,
                    content: InlineContent::Scalar(RawScalar::literal(text)),
                },
                consumed,
            ));
        }

        if value_part.starts_with('[') {
            let (text, consumed) = self.consume_bracketed(line, value_part)?;
            return Ok((
                ScannedLine {
                    line: line.number,
                    indent,
                    dash_count,
                    content_indent,
                    key,
                    anchor,
                    alias: None,
                    tag,
                    content: InlineContent::InlineArray(text),
                },
                consumed,
            ));
        }

        if value_part.starts_with('"') || value_part.starts_with('\'') {
            let (scalar, consumed) = self.consume_quoted_scalar(line, value_part)?;
            return Ok((
                ScannedLine {
                    line: line.number,
                    indent,
                    dash_count,
                    content_indent,
                    key,
                    anchor,
                    alias: None,
                    tag,
                    content: InlineContent::Scalar(scalar),
                },
                consumed,
            ));
        }

        let (text, consumed) = self.consume_plain_scalar(line, indent, value_part);
        Ok((
            ScannedLine {
                line: line.number,
                indent,
                dash_count,
                content_indent,
                key,
                anchor,
                alias: None,
                tag,
                content: InlineContent::Scalar(RawScalar::plain(text)),
            },
            consumed,
        ))
    }

    /// Joins a plain scalar's first line with any following, more-indented
    /// continuation lines (spec.md §4.1 step 8): termination is the next
    /// line at or above the entry indent, a collection item, or a
    /// key-like line at any deeper indent. The continuation lines' common
    /// left margin (the leftmost nonblank indent among them) is stripped
    /// before joining with spaces.
    fn consume_plain_scalar(&self, start_line: &Line, indent: usize, first_part: &str) -> (String, usize) {
        let start_index = self
            .lines
            .iter()
            .position(|l| l.number == start_line.number)
            .unwrap();
        let mut continuation: Vec<&Line> = Vec::new();
        let mut consumed = 1usize;
        loop {
            let next_index = start_index + consumed;
            let Some(next) = self.lines.get(next_index) else { break };
            if next.is_blank() || next.indent <= indent || is_key_or_item_line(next) {
                break;
            }
            continuation.push(next);
            consumed += 1;
        }

        let first = strip_trailing_comment(first_part).trim_end().to_string();
        if continuation.is_empty() {
            return (first, consumed);
        }

        let margin = continuation.iter().map(|l| l.indent).min().unwrap();
        let mut parts = vec![first];
        for l in &continuation {
            let body = if l.content.len() >= margin { &l.content[margin..] } else { "" };
            parts.push(strip_trailing_comment(body).trim().to_string());
        }
        (parts.into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" "), consumed)
    }

    fn consume_block_scalar(
        &self,
        header_line: &Line,
        header_indent: usize,
        style: BlockStyle,
        chomp: Chomp,
        is_binary: bool,
    ) -> Result<(String, usize)> {
        let start = self
            .lines
            .iter()
            .position(|l| l.number == header_line.number)
            .unwrap()
            + 1;
        let mut content_lines: Vec<&Line> = Vec::new();
        let mut i = start;
        while i < self.lines.len() {
            let l = &self.lines[i];
            if l.is_blank() {
                content_lines.push(l);
                i += 1;
                continue;
            }
            if l.indent <= header_indent {
                break;
            }
            content_lines.push(l);
            i += 1;
        }
        let consumed = i - (start - 1);

        if content_lines.is_empty() {
            return Ok((String::new(), consumed));
        }

        let base_indent = content_lines
            .iter()
            .filter(|l| !l.is_blank())
            .map(|l| l.indent)
            .min()
            .unwrap_or(header_indent + 1);

        if is_binary {
            // Decision (DESIGN.md #3): !!binary scalars never carry an
            // internal line-feed marker; lines concatenate directly.
            let mut out = String::new();
            for l in &content_lines {
                if l.is_blank() {
                    continue;
                }
                let body = if l.content.len() >= base_indent {
                    &l.content[base_indent..]
                } else {
                    ""
                };
                out.push_str(body.trim());
            }
            return Ok((out, consumed));
        }

        let mut body_lines: Vec<String> = content_lines
            .iter()
            .map(|l| {
                if l.is_blank() {
                    String::new()
                } else if l.content.len() >= base_indent {
                    l.content[base_indent..].to_string()
                } else {
                    String::new()
                }
            })
            .collect();

        // Trim trailing blank lines; chomp decides what to re-add.
        while body_lines.last().map(|s| s.is_empty()).unwrap_or(false) {
            body_lines.pop();
        }

        let joined = match style {
            BlockStyle::Literal => body_lines.join("\n"),
            BlockStyle::Folded => fold_lines(&body_lines),
        };

        let result = match chomp {
            Chomp::Strip => joined,
            Chomp::Clip => {
                if joined.is_empty() {
                    joined
                } else {
                    format!("{}\n", joined)
                }
            }
            Chomp::Keep => {
                let trailing_blanks = content_lines.iter().rev().take_while(|l| l.is_blank()).count();
                format!("{}\n{}", joined, "\n".repeat(trailing_blanks))
            }
        };

        Ok((result, consumed))
    }

    fn consume_quoted_scalar(&self, start_line: &Line, text: &str) -> Result<(RawScalar, usize)> {
        let quote = text.chars().next().unwrap();
        let mut buf = String::new();
        let mut consumed = 1usize;
        let mut remainder = &text[quote.len_utf8()..];
        let mut line_index = self
            .lines
            .iter()
            .position(|l| l.number == start_line.number)
            .unwrap();

        loop {
            let mut chars = remainder.char_indices().peekable();
            let mut closed = false;
            while let Some((idx, c)) = chars.next() {
                if c == quote {
                    if quote == '\'' && remainder[idx + 1..].starts_with('\'') {
                        buf.push('\'');
                        chars.next();
                        continue;
                    }
                    closed = true;
                    break;
                }
                if quote == '"' && c == '\\' {
                    if let Some((_, esc)) = chars.next() {
                        buf.push_str(unescape(esc).as_str());
                    }
                    continue;
                }
                buf.push(c);
            }
            if closed {
                break;
            }
            buf.push(' ');
            line_index += 1;
            if line_index >= self.lines.len() {
                return Err(Error::yaml(YamlProblem::UnclosedLiteral, start_line.number));
            }
            consumed += 1;
            remainder = self.lines[line_index].trimmed();
        }

        Ok((RawScalar::literal(buf), consumed))
    }

    fn consume_bracketed(&self, start_line: &Line, text: &str) -> Result<(String, usize)> {
        let mut depth = 0i32;
        let mut buf = String::new();
        let mut consumed = 1usize;
        let mut in_quote: Option<char> = None;
        let mut remainder = text;
        let mut line_index = self
            .lines
            .iter()
            .position(|l| l.number == start_line.number)
            .unwrap();

        loop {
            for c in remainder.chars() {
                buf.push(c);
                match in_quote {
                    Some(q) => {
                        if c == q {
                            in_quote = None;
                        }
                    }
                    None => match c {
                        '"' | '\'' => in_quote = Some(c),
                        '[' => depth += 1,
                        ']' => {
                            depth -= 1;
                            if depth == 0 {
                                return Ok((buf, consumed));
                            }
                        }
                        _ => {}
                    },
                }
            }
            buf.push(' ');
            line_index += 1;
            if line_index >= self.lines.len() {
                return Err(Error::yaml(YamlProblem::UnclosedArray, start_line.number));
            }
            consumed += 1;
            remainder = self.lines[line_index].trimmed();
        }
    }
}

/// Tokenizes the raw text of a `[...]` inline array (brackets included)
/// for [`crate::builder::build_inline_array`].
pub fn tokenize_inline(text: &str, line: usize) -> Result<Vec<InlineToken>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '[' => {
                tokens.push(InlineToken::ArrayStart);
                i += 1;
            }
            ']' => {
                tokens.push(InlineToken::ArrayEnd);
                i += 1;
            }
            ',' => {
                tokens.push(InlineToken::Comma);
                i += 1;
            }
            c if c.is_whitespace() => {
                i += 1;
            }
            '&' => {
                let (name, next) = take_identifier_chars(&chars, i + 1);
                if name.is_empty() {
                    return Err(Error::yaml(YamlProblem::AnchorAliasName, line));
                }
                tokens.push(InlineToken::Anchor(name));
                i = next;
            }
            '*' => {
                let (name, next) = take_identifier_chars(&chars, i + 1);
                if name.is_empty() {
                    return Err(Error::yaml(YamlProblem::AnchorAliasName, line));
                }
                tokens.push(InlineToken::Alias(name));
                i = next;
            }
            '!' => {
                if chars.get(i + 1) == Some(&'!') {
                    let (name, next) = take_tag_chars(&chars, i + 2);
                    let lower = name.to_ascii_lowercase();
                    if !BUILTIN_TAGS.contains(&lower.as_str()) {
                        return Err(Error::yaml(YamlProblem::InvalidTag, line));
                    }
                    tokens.push(InlineToken::Tag(format!("!!{}", lower)));
                    i = next;
                } else {
                    let (name, next) = take_tag_chars(&chars, i + 1);
                    tokens.push(InlineToken::Tag(format!("!{}", name)));
                    i = next;
                }
            }
            '"' | '\'' => {
                let (value, next) = read_inline_quoted(&chars, i, line)?;
                tokens.push(InlineToken::Scalar(value));
                i = next;
            }
            _ => {
                let start = i;
                while i < chars.len() && !matches!(chars[i], ',' | ']' | '[' | '"' | '\'') {
                    i += 1;
                }
                let raw: String = chars[start..i].iter().collect();
                let trimmed = raw.trim();
                if trimmed.starts_with("- ") || trimmed == "-" {
                    return Err(Error::yaml(YamlProblem::CollectionInArray, line));
                }
                if let Some((key, value)) = split_inline_key(trimmed) {
                    if key == "<<" {
                        return Err(Error::yaml(YamlProblem::MergeInArray, line));
                    }
                    tokens.push(InlineToken::Key(key.to_string()));
                    if !value.is_empty() {
                        tokens.push(InlineToken::Scalar(RawScalar::plain(value.to_string())));
                    }
                } else if !trimmed.is_empty() {
                    tokens.push(InlineToken::Scalar(RawScalar::plain(trimmed.to_string())));
                } else if matches!(tokens.last(), Some(InlineToken::Comma) | Some(InlineToken::ArrayStart)) {
                    // Explicit null between separators: `[1, , 2]`.
                    tokens.push(InlineToken::Scalar(RawScalar::plain(String::new())));
                }
            }
        }
    }

    Ok(tokens)
}

/// Splits a `key: value` or `key:` chunk captured inline (spec.md §4.2
/// BuildInlineArray "tuple elements"). `value` is empty when the actual
/// value is a following token (a quoted scalar, anchor, alias, or tag).
fn split_inline_key(chunk: &str) -> Option<(&str, &str)> {
    if let Some(idx) = chunk.find(": ") {
        return Some((chunk[..idx].trim(), chunk[idx + 2..].trim()));
    }
    if let Some(key) = chunk.strip_suffix(':') {
        if !key.is_empty() {
            return Some((key.trim(), ""));
        }
    }
    None
}

fn read_inline_quoted(chars: &[char], start: usize, line: usize) -> Result<(RawScalar, usize)> {
    let quote = chars[start];
    let mut i = start + 1;
    let mut buf = String::new();
    while i < chars.len() {
        let c = chars[i];
        if c == quote {
            if quote == '\'' && i + 1 < chars.len() && chars[i + 1] == '\'' {
                buf.push('\'');
                i += 2;
                continue;
            }
            return Ok((RawScalar::literal(buf), i + 1));
        }
        if quote == '"' && c == '\\' && i + 1 < chars.len() {
            buf.push_str(unescape(chars[i + 1]).as_str());
            i += 2;
            continue;
        }
        buf.push(c);
        i += 1;
    }
    Err(Error::yaml(YamlProblem::UnclosedLiteral, line))
}

fn take_identifier(s: &str) -> (&str, &str) {
    let end = s
        .char_indices()
        .find(|(_, c)| c.is_whitespace() || matches!(c, ',' | '[' | ']' | ':'))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    (&s[..end], &s[end..])
}

fn take_identifier_chars(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start;
    while i < chars.len() && !chars[i].is_whitespace() && !matches!(chars[i], ',' | '[' | ']' | ':') {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

const BUILTIN_TAGS: &[&str] = &[
    "str", "int", "float", "bool", "null", "map", "seq", "binary", "timestamp",
];

/// Takes the bare tag name up to the next whitespace, `,`, or `]`
/// (terminators relevant both on a block line and inside an inline array).
fn take_tag_name(s: &str) -> (&str, &str) {
    let end = s
        .char_indices()
        .find(|(_, c)| c.is_whitespace() || matches!(c, ',' | ']'))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    (&s[..end], s[end..].trim_start())
}

fn take_tag_chars(chars: &[char], start: usize) -> (String, usize) {
    let start = if chars.get(start) == Some(&'!') { start + 1 } else { start };
    let mut i = start;
    while i < chars.len() && !chars[i].is_whitespace() && chars[i] != ',' && chars[i] != ']' {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

/// True if `line` looks like a collection item or a mapping key, i.e. a
/// line that should terminate a plain scalar's continuation scan rather
/// than be folded into it (spec.md §4.1 step 8).
fn is_key_or_item_line(line: &Line) -> bool {
    let t = line.trimmed();
    if t.starts_with("- ") || t == "-" {
        return true;
    }
    find_key_colon(t).is_some()
}

fn find_key_colon(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_quote: Option<char> = None;
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        let c = b as char;
        match in_quote {
            Some(q) => {
                if c == q {
                    in_quote = None;
                }
            }
            None => match c {
                '"' | '\'' => in_quote = Some(c),
                '[' => depth += 1,
                ']' => depth -= 1,
                ':' if depth == 0 => {
                    let next = bytes.get(i + 1).copied();
                    if next.is_none() || next == Some(b' ') {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

fn validate_key(key: &str, line: usize) -> Result<String> {
    if key.is_empty() {
        return Err(Error::yaml(YamlProblem::KeyNameEmpty, line));
    }
    if key.starts_with('&') || key.starts_with('*') {
        return Err(Error::yaml(YamlProblem::KeyNameAnchorAlias, line));
    }
    if key.starts_with('"') || key.starts_with('\'') {
        let quote = key.chars().next().unwrap();
        if key.len() >= 2 && key.ends_with(quote) {
            return Ok(key[1..key.len() - 1].to_string());
        }
        return Err(Error::yaml(YamlProblem::KeyNameMultiline, line));
    }
    if key.contains('\n') {
        return Err(Error::yaml(YamlProblem::KeyNameMultiline, line));
    }
    if key.contains(['\t', '[', ']', ',']) {
        return Err(Error::yaml(YamlProblem::KeyNameInvalidChar, line));
    }
    Ok(key.to_string())
}

fn strip_trailing_comment(s: &str) -> &str {
    let mut in_quote: Option<char> = None;
    let bytes = s.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        let c = b as char;
        match in_quote {
            Some(q) => {
                if c == q {
                    in_quote = None;
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    in_quote = Some(c);
                } else if c == '#' && (i == 0 || bytes[i - 1] == b' ') {
                    return s[..i].trim_end();
                }
            }
        }
    }
    s
}

fn parse_block_header(s: &str) -> Option<(BlockStyle, Chomp)> {
    let mut chars = s.chars();
    let style = match chars.next()? {
        '|' => BlockStyle::Literal,
        '>' => BlockStyle::Folded,
        _ => return None,
    };
    let rest: String = chars.collect();
    let rest = rest.trim();
    let chomp = match rest {
        "" => Chomp::Clip,
        "-" => Chomp::Strip,
        "+" => Chomp::Keep,
        _ => return None,
    };
    Some((style, chomp))
}

fn fold_lines(lines: &[String]) -> String {
    let mut out = String::new();
    let mut prev_blank = false;
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            out.push('\n');
            prev_blank = true;
            continue;
        }
        if i > 0 && !prev_blank {
            out.push(' ');
        }
        out.push_str(line);
        prev_blank = false;
    }
    out
}

fn unescape(c: char) -> String {
    match c {
        'n' => "\n".to_string(),
        't' => "\t".to_string(),
        'r' => "\r".to_string(),
        'b' => "\u{0008}".to_string(),
        'f' => "\u{000C}".to_string(),
        '"' => "\"".to_string(),
        '\\' => "\\".to_string(),
        '0' => "\0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_simple_mapping() {
        let scanner = Scanner::new("a: 1\nb: two\n");
        let scanned = scanner.scan().unwrap();
        assert_eq!(scanned.len(), 2);
        assert_eq!(scanned[0].key.as_deref(), Some("a"));
        assert_eq!(scanned[1].key.as_deref(), Some("b"));
    }

    #[test]
    fn strips_trailing_comments() {
        let scanner = Scanner::new("a: 1 # trailing\n");
        let scanned = scanner.scan().unwrap();
        match &scanned[0].content {
            InlineContent::Scalar(v) => assert_eq!(v.text, "1"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parses_literal_block_header() {
        let scanner = Scanner::new("a: |\n  line one\n  line two\n");
        let scanned = scanner.scan().unwrap();
        match &scanned[0].content {
            InlineContent::Scalar(v) => assert_eq!(v.text, "line one\nline two\n"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parses_anchor_and_alias() {
        let scanner = Scanner::new("a: &x 1\nb: *x\n");
        let scanned = scanner.scan().unwrap();
        assert_eq!(scanned[0].anchor.as_deref(), Some("x"));
        assert_eq!(scanned[1].alias.as_deref(), Some("x"));
    }

    #[test]
    fn tokenizes_inline_array() {
        let tokens = tokenize_inline("[1, 2, 3]", 1).unwrap();
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn joins_multiline_plain_scalar() {
        let scanner = Scanner::new("t: plain text\n  continued here\nb: next\n");
        let scanned = scanner.scan().unwrap();
        assert_eq!(scanned.len(), 2);
        match &scanned[0].content {
            InlineContent::Scalar(v) => assert_eq!(v.text, "plain text continued here"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(scanned[1].key.as_deref(), Some("b"));
    }

    #[test]
    fn multiline_plain_scalar_stops_at_key_like_continuation() {
        let scanner = Scanner::new("t: plain text\n  nested: value\n");
        let scanned = scanner.scan().unwrap();
        match &scanned[0].content {
            InlineContent::Scalar(v) => assert_eq!(v.text, "plain text"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
