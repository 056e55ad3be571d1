//! J-string escaping/unescaping shared by the emitter and the J parser.
//!
//! Grounded on the scanner's own need to produce J-escaped text for
//! `!!str`-tagged round-tripping; promoted to its own module since both
//! [`crate::emitter`] and [`crate::json::parser`] need the same rules
//! (spec.md §4.1 step 10, §6 "Encoding").

/// Escapes `text` to J-string conventions: standard backslash escapes plus
/// the three Unicode line terminators spec.md §6 calls out by codepoint.
pub fn escape_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{000C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\u{0085}' => out.push_str("\\u0085"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Decodes J-string escapes, the inverse of [`escape_str`]. `body` is the
/// string's content, quotes already stripped.
pub fn unescape_str(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            'b' => out.push('\u{0008}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'f' => out.push('\u{000C}'),
            'r' => out.push('\r'),
            'u' => {
                let hex: String = (&mut chars).take(4).collect();
                if hex.len() != 4 {
                    return None;
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            _ => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_basic_escapes() {
        let text = "a\tb\nc\"d\\e";
        let escaped = escape_str(text);
        assert_eq!(unescape_str(&escaped).unwrap(), text);
    }

    #[test]
    fn escapes_unicode_line_terminators() {
        assert_eq!(escape_str("\u{2028}"), "\\u2028");
        assert_eq!(escape_str("\u{0085}"), "\\u0085");
    }
}
