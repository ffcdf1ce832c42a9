//! XML Entity Decoding and Escaping
//!
//! Handles decoding of XML entities:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//!
//! Uses Cow for zero-copy when no entities are present. The escaping half is
//! used by the serializer when a document is written back out.

use memchr::{memchr, memchr3};
use std::borrow::Cow;

/// Decode text content, handling entity references
///
/// Returns Borrowed if no entities present (zero-copy),
/// returns Owned if entities were decoded.
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

/// Decode all entity references in the input
pub fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let Some(amp_pos) = memchr(b'&', &input[pos..]) else {
            result.extend_from_slice(&input[pos..]);
            break;
        };
        result.extend_from_slice(&input[pos..pos + amp_pos]);
        pos += amp_pos;

        match memchr(b';', &input[pos..]) {
            Some(semi_offset) => {
                let entity = &input[pos + 1..pos + semi_offset];
                if let Some(decoded) = decode_entity(entity) {
                    let mut buf = [0u8; 4];
                    result.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
                    pos += semi_offset + 1;
                } else {
                    // Unknown entity, keep the ampersand literally
                    result.push(b'&');
                    pos += 1;
                }
            }
            None => {
                result.push(b'&');
                pos += 1;
            }
        }
    }

    result
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &[u8]) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix(b"#") {
        return decode_numeric_entity(numeric);
    }

    match entity {
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"amp" => Some('&'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        // Common HTML named entities that show up in hand-edited SVG
        b"nbsp" => Some('\u{00A0}'),
        b"copy" => Some('\u{00A9}'),
        b"reg" => Some('\u{00AE}'),
        b"trade" => Some('\u{2122}'),
        b"mdash" => Some('\u{2014}'),
        b"ndash" => Some('\u{2013}'),
        b"hellip" => Some('\u{2026}'),
        _ => None,
    }
}

/// Decode a numeric character reference (`#123` / `#x7B` without the `#`)
fn decode_numeric_entity(entity: &[u8]) -> Option<char> {
    let codepoint = match entity.first()? {
        b'x' | b'X' => u32::from_str_radix(std::str::from_utf8(&entity[1..]).ok()?, 16).ok()?,
        _ => std::str::from_utf8(entity).ok()?.parse::<u32>().ok()?,
    };
    char::from_u32(codepoint)
}

/// Escape character data for element content
pub fn escape_text_to_buf(s: &str, buf: &mut String) {
    if memchr3(b'&', b'<', b'>', s.as_bytes()).is_none() {
        buf.push_str(s);
        return;
    }
    for c in s.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            _ => buf.push(c),
        }
    }
}

/// Escape an attribute value for a double-quoted attribute
pub fn escape_attr_to_buf(s: &str, buf: &mut String) {
    for c in s.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            '\n' => buf.push_str("&#10;"),
            '\r' => buf.push_str("&#13;"),
            '\t' => buf.push_str("&#9;"),
            _ => buf.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities_borrows() {
        let decoded = decode_text(b"Armor Class");
        assert!(matches!(decoded, Cow::Borrowed(_)));
    }

    #[test]
    fn test_builtin_and_numeric() {
        assert_eq!(decode_text(b"a &lt;b&gt; &amp; &#65;&#x42;").as_ref(), b"a <b> & AB");
    }

    #[test]
    fn test_unknown_entity_kept() {
        assert_eq!(decode_text(b"&bogus; & x").as_ref(), b"&bogus; & x");
    }

    #[test]
    fn test_escape_text() {
        let mut buf = String::new();
        escape_text_to_buf("17 < 18 & \"x\"", &mut buf);
        assert_eq!(buf, "17 &lt; 18 &amp; \"x\"");
    }

    #[test]
    fn test_escape_attr() {
        let mut buf = String::new();
        escape_attr_to_buf("font-family:'Sans';\n\"x\"", &mut buf);
        assert_eq!(buf, "font-family:'Sans';&#10;&quot;x&quot;");
    }
}
