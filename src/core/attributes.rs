//! XML Attribute Parsing
//!
//! Parses XML attributes from tag content.

use super::entities::decode_text;
use super::scanner::{is_name_char, is_name_start_char, is_whitespace};
use memchr::memchr;
use std::borrow::Cow;

/// A parsed XML attribute
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Attribute name (may include namespace prefix)
    pub name: &'a [u8],
    /// Attribute value (entities decoded)
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a [u8], value: Cow<'a, [u8]>) -> Self {
        Attribute { name, value }
    }

    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name).ok()
    }

    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(self.value.as_ref()).ok()
    }

    /// Namespace prefix (before colon), if any
    pub fn prefix(&self) -> Option<&'a [u8]> {
        split_name(self.name).0
    }

    /// Local name (after colon, if namespaced)
    pub fn local_name(&self) -> &'a [u8] {
        split_name(self.name).1
    }

    /// True for `xmlns` and `xmlns:*` declarations
    pub fn is_namespace_decl(&self) -> bool {
        self.name == b"xmlns" || self.prefix() == Some(&b"xmlns"[..])
    }
}

/// Split a name into prefix and local name at the colon
pub fn split_name(name: &[u8]) -> (Option<&[u8]>, &[u8]) {
    if let Some(colon_pos) = memchr(b':', name) {
        (Some(&name[..colon_pos]), &name[colon_pos + 1..])
    } else {
        (None, name)
    }
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input should be the content between element name and '>' or '/>'.
/// Lenient: malformed fragments are skipped.
pub fn parse_attributes(input: &[u8]) -> Vec<Attribute<'_>> {
    parse_attributes_with_validation(input, false).0
}

/// Parse attributes, rejecting malformed or duplicate attributes
pub fn parse_attributes_strict(input: &[u8]) -> Result<Vec<Attribute<'_>>, &'static str> {
    let (attrs, error) = parse_attributes_with_validation(input, true);
    match error {
        Some(msg) => Err(msg),
        None => Ok(attrs),
    }
}

fn parse_attributes_with_validation(input: &[u8], strict: bool) -> (Vec<Attribute<'_>>, Option<&'static str>) {
    let mut attrs: Vec<Attribute<'_>> = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() || input[pos] == b'/' || input[pos] == b'>' {
            break;
        }

        if !is_name_start_char(input[pos]) {
            if strict {
                return (attrs, Some("Attribute name must start with letter, underscore, or colon"));
            }
            pos += 1;
            continue;
        }

        let name_start = pos;
        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= input.len() || input[pos] != b'=' {
            if strict {
                return (attrs, Some("Attribute value required"));
            }
            attrs.push(Attribute::new(name, Cow::Borrowed(b"")));
            continue;
        }
        pos += 1; // '='

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            if strict {
                return (attrs, Some("Attribute value required"));
            }
            attrs.push(Attribute::new(name, Cow::Borrowed(b"")));
            break;
        }

        let quote = input[pos];
        let value = if quote == b'"' || quote == b'\'' {
            pos += 1;
            let value_start = pos;
            match memchr(quote, &input[pos..]) {
                Some(offset) => {
                    pos += offset + 1;
                    &input[value_start..pos - 1]
                }
                None => {
                    if strict {
                        return (attrs, Some("Attribute value has mismatched quotes"));
                    }
                    pos = input.len();
                    &input[value_start..]
                }
            }
        } else {
            if strict {
                return (attrs, Some("Attribute value must be quoted"));
            }
            let value_start = pos;
            while pos < input.len() && !is_whitespace(input[pos]) && input[pos] != b'/' && input[pos] != b'>' {
                pos += 1;
            }
            &input[value_start..pos]
        };

        if strict {
            if memchr(b'<', value).is_some() {
                return (attrs, Some("Attribute value cannot contain '<'"));
            }
            if attrs.iter().any(|a| a.name == name) {
                return (attrs, Some("Duplicate attribute"));
            }
        }

        attrs.push(Attribute::new(name, decode_text(value)));
    }

    (attrs, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_attributes() {
        let attrs = parse_attributes(b" id=\"test\" class=\"foo\"");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name_str(), Some("id"));
        assert_eq!(attrs[0].value_str(), Some("test"));
        assert_eq!(attrs[1].name_str(), Some("class"));
        assert_eq!(attrs[1].value_str(), Some("foo"));
    }

    #[test]
    fn test_single_quoted_with_inner_double() {
        let attrs = parse_attributes(b" style='font-family:\"Sans\"'");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value_str(), Some("font-family:\"Sans\""));
    }

    #[test]
    fn test_namespaced_attribute() {
        let attrs = parse_attributes(b" inkscape:groupmode=\"layer\" xmlns:svg=\"http://www.w3.org/2000/svg\"");
        assert_eq!(attrs[0].prefix(), Some(b"inkscape" as &[u8]));
        assert_eq!(attrs[0].local_name(), b"groupmode");
        assert!(!attrs[0].is_namespace_decl());
        assert!(attrs[1].is_namespace_decl());
    }

    #[test]
    fn test_entity_in_value() {
        let attrs = parse_attributes(b" title=\"&lt;hello&gt;\"");
        assert_eq!(attrs[0].value_str(), Some("<hello>"));
    }

    #[test]
    fn test_whitespace_handling() {
        let attrs = parse_attributes(b"  id  =  \"test\"  ");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].name_str(), Some("id"));
        assert_eq!(attrs[0].value_str(), Some("test"));
    }

    #[test]
    fn test_strict_rejects() {
        assert!(parse_attributes_strict(b" id=test").is_err());
        assert!(parse_attributes_strict(b" id=\"a\" id=\"b\"").is_err());
        assert!(parse_attributes_strict(b" id=\"a").is_err());
        assert!(parse_attributes_strict(b" id=\"a\" x='1'").is_ok());
    }

    #[test]
    fn test_lenient_boolean_attribute() {
        let attrs = parse_attributes(b" hidden id=\"x\"");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].value_str(), Some(""));
    }
}
