//! Zero-Copy Slice Parser
//!
//! Parses XML from a byte slice with zero-copy semantics.
//! Input references are maintained directly in the output.

use super::events::{Declaration, EndElement, StartElement, XmlEvent};
use crate::core::attributes::{parse_attributes, parse_attributes_strict, Attribute};
use crate::core::tokenizer::{Token, TokenKind, Tokenizer};
use crate::error::ParseError;

/// Zero-copy XML reader from a byte slice
pub struct SliceReader<'a> {
    input: &'a [u8],
    tokenizer: Tokenizer<'a>,
    attr_error: Option<ParseError>,
}

impl<'a> SliceReader<'a> {
    /// Create a new slice reader (lenient mode)
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            input,
            tokenizer: Tokenizer::new(input),
            attr_error: None,
        }
    }

    pub fn new_strict(input: &'a [u8]) -> Self {
        SliceReader {
            input,
            tokenizer: Tokenizer::new_strict(input),
            attr_error: None,
        }
    }

    /// Get parse error (strict mode only)
    pub fn error(&self) -> Option<&ParseError> {
        self.attr_error.as_ref().or_else(|| self.tokenizer.error())
    }

    /// Byte offset of the tokenizer
    pub fn position(&self) -> usize {
        self.tokenizer.position()
    }

    /// Get the next XML event
    pub fn next_event(&mut self) -> Option<XmlEvent<'a>> {
        if self.attr_error.is_some() {
            return None;
        }
        loop {
            let token = self.tokenizer.next_token()?;

            match token.kind {
                TokenKind::Eof => return Some(XmlEvent::EndDocument),

                TokenKind::StartTag => {
                    let attrs = self.parse_tag_attributes(&token)?;
                    return Some(XmlEvent::StartElement(StartElement::new(token.name?, attrs)));
                }

                TokenKind::EmptyTag => {
                    let attrs = self.parse_tag_attributes(&token)?;
                    return Some(XmlEvent::EmptyElement(StartElement::new(token.name?, attrs)));
                }

                TokenKind::EndTag => return Some(XmlEvent::EndElement(EndElement::new(token.name?))),

                TokenKind::Text => {
                    if let Some(content) = token.content {
                        if !content.is_empty() {
                            return Some(XmlEvent::Text(content));
                        }
                    }
                }

                TokenKind::CData => return Some(XmlEvent::CData(token.content?)),

                TokenKind::Comment => return Some(XmlEvent::Comment(token.content?)),

                TokenKind::ProcessingInstruction => {
                    return Some(XmlEvent::ProcessingInstruction {
                        target: token.name?,
                        data: token.content.filter(|c| !c.is_empty()),
                    });
                }

                TokenKind::XmlDeclaration => {
                    let attrs = parse_attributes(token.content.as_deref().unwrap_or_default());
                    return Some(XmlEvent::XmlDeclaration(declaration_from(&attrs)));
                }

                TokenKind::DocType => return Some(XmlEvent::DocType(token.content?)),
            }
        }
    }

    /// Parse attributes from a tag token
    fn parse_tag_attributes(&mut self, token: &Token<'a>) -> Option<Vec<Attribute<'a>>> {
        let (start, end) = token.span;
        let name_len = token.name.map_or(0, <[u8]>::len);

        // Skip '<' and the name; drop the trailing '>' or '/>'
        let attr_start = (start + 1 + name_len).min(end);
        let mut attr_end = end.saturating_sub(1);
        if token.kind == TokenKind::EmptyTag {
            attr_end = attr_end.saturating_sub(1);
        }
        if attr_start >= attr_end {
            return Some(Vec::new());
        }
        let attr_content = &self.input[attr_start..attr_end];

        if self.tokenizer.is_strict() {
            match parse_attributes_strict(attr_content) {
                Ok(attrs) => Some(attrs),
                Err(msg) => {
                    self.attr_error = Some(ParseError::new(msg, start));
                    None
                }
            }
        } else {
            Some(parse_attributes(attr_content))
        }
    }
}

fn declaration_from(attrs: &[Attribute<'_>]) -> Declaration {
    let value = |name: &[u8]| {
        attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| String::from_utf8_lossy(a.value.as_ref()).into_owned())
    };
    Declaration {
        version: value(b"version").unwrap_or_else(|| "1.0".to_string()),
        encoding: value(b"encoding"),
        standalone: value(b"standalone").map(|s| s == "yes"),
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = XmlEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.next_event()?;
        if matches!(event, XmlEvent::EndDocument) {
            None
        } else {
            Some(event)
        }
    }
}

/// Parse XML from a byte slice and return all events
pub fn parse_events(input: &[u8]) -> Vec<XmlEvent<'_>> {
    SliceReader::new(input).collect()
}
