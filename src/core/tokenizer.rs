//! XML Tokenizer - State machine for XML token extraction
//!
//! Implements a pull-parser style tokenizer that extracts XML tokens:
//! - Element start/end tags
//! - Text content (entities decoded)
//! - CDATA sections
//! - Comments
//! - Processing instructions and the XML declaration
//! - DOCTYPE declarations (kept verbatim, internal subset included)
//!
//! Lenient mode never fails: stray `<` becomes text and an unterminated
//! construct ends the token stream. Strict mode records the first problem in
//! [`Tokenizer::error`] and stops.

use super::entities::decode_text;
use super::scanner::Scanner;
use crate::error::ParseError;
use std::borrow::Cow;

/// Current parsing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Init,
    /// Inside text content between tags
    InsideText,
    /// Inside a markup construct (<...>)
    InsideMarkup,
    Done,
}

/// Type of XML token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// Empty element: <element/>
    EmptyTag,
    Text,
    /// CDATA section: <![CDATA[...]]>
    CData,
    /// Comment: <!--...-->
    Comment,
    /// Processing instruction: <?target ...?>
    ProcessingInstruction,
    /// XML declaration: <?xml ...?>
    XmlDeclaration,
    DocType,
    Eof,
}

/// A parsed XML token
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// For tags: the element name. For PIs: the target
    pub name: Option<&'a [u8]>,
    /// Text/CDATA/comment/PI content; for DOCTYPE the raw declaration
    pub content: Option<Cow<'a, [u8]>>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            content: None,
        }
    }

    fn with_name(mut self, name: &'a [u8]) -> Self {
        self.name = Some(name);
        self
    }

    fn with_content(mut self, content: Cow<'a, [u8]>) -> Self {
        self.content = Some(content);
        self
    }
}

/// XML tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    state: ParseState,
    strict: bool,
    error: Option<ParseError>,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input (lenient mode)
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
            state: ParseState::Init,
            strict: false,
            error: None,
        }
    }

    pub fn new_strict(input: &'a [u8]) -> Self {
        Tokenizer {
            strict: true,
            ..Tokenizer::new(input)
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Get any parse error (strict mode only)
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Record an error (strict mode) and stop tokenizing in either mode
    fn fail(&mut self, message: &str, position: usize) -> Option<Token<'a>> {
        if self.strict && self.error.is_none() {
            self.error = Some(ParseError::new(message, position));
        }
        self.state = ParseState::Done;
        None
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Get the next token, or None if at end of input or after an error
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if self.state == ParseState::Done {
            return None;
        }

        if self.state == ParseState::Init {
            if !self.strict {
                self.scanner.skip_whitespace();
            }
            self.state = ParseState::InsideText;
        }

        match self.scanner.peek() {
            Some(b'<') => self.parse_markup(),
            Some(_) => self.parse_text(),
            None => {
                self.state = ParseState::Done;
                let pos = self.scanner.position();
                Some(Token::new(TokenKind::Eof, (pos, pos)))
            }
        }
    }

    fn parse_markup(&mut self) -> Option<Token<'a>> {
        let start = self.scanner.position();
        self.scanner.advance(1); // Skip '<'
        self.state = ParseState::InsideMarkup;

        match self.scanner.peek() {
            Some(b'/') => self.parse_end_tag(start),
            Some(b'!') => self.parse_bang_markup(start),
            Some(b'?') => self.parse_pi(start),
            Some(_) => self.parse_start_tag(start),
            None => self.fail("Unexpected end of input after '<'", start),
        }
    }

    /// Parse a start tag or empty element tag
    fn parse_start_tag(&mut self, start: usize) -> Option<Token<'a>> {
        let Some(name) = self.scanner.read_name() else {
            if self.strict {
                return self.fail("Invalid element name: must start with letter, underscore, or colon", start);
            }
            // A stray '<' in lenient mode is plain text
            self.state = ParseState::InsideText;
            return Some(Token::new(TokenKind::Text, (start, start + 1)).with_content(Cow::Borrowed(b"<")));
        };

        let Some(end) = self.scanner.find_tag_end_quoted() else {
            return self.fail("Unterminated start tag", start);
        };

        let is_empty = self.scanner.slice(end - 1, end) == b"/";
        self.scanner.set_position(end + 1);
        self.state = ParseState::InsideText;

        let kind = if is_empty { TokenKind::EmptyTag } else { TokenKind::StartTag };
        Some(Token::new(kind, (start, end + 1)).with_name(name))
    }

    fn parse_end_tag(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(1); // Skip '/'

        let Some(name) = self.scanner.read_name() else {
            return self.fail("Invalid element name in end tag", start);
        };

        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            if self.strict {
                return self.fail("End tag cannot have attributes or other content", self.scanner.position());
            }
            let Some(end) = self.scanner.find_byte(b'>') else {
                return self.fail("Unterminated end tag", start);
            };
            self.scanner.set_position(end);
        }

        self.scanner.advance(1); // Skip '>'
        self.state = ParseState::InsideText;
        Some(Token::new(TokenKind::EndTag, (start, self.scanner.position())).with_name(name))
    }

    /// Parse markup starting with '!' (comment, CDATA, DOCTYPE)
    fn parse_bang_markup(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(1); // Skip '!'

        if self.scanner.starts_with(b"--") {
            self.parse_comment(start)
        } else if self.scanner.starts_with(b"[CDATA[") {
            self.parse_cdata(start)
        } else if self.scanner.starts_with(b"DOCTYPE") {
            self.parse_doctype(start)
        } else {
            self.fail("Invalid declaration - expected comment, CDATA, or DOCTYPE", start)
        }
    }

    fn parse_comment(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(2); // Skip '--'
        let content_start = self.scanner.position();

        let Some(pos) = self.scanner.find_seq(b"-->") else {
            return self.fail("Unterminated comment", start);
        };
        let content = self.scanner.slice(content_start, pos);
        if self.strict && memchr::memmem::find(content, b"--").is_some() {
            return self.fail("'--' is not allowed inside a comment", content_start);
        }

        self.scanner.set_position(pos + 3);
        self.state = ParseState::InsideText;
        Some(Token::new(TokenKind::Comment, (start, pos + 3)).with_content(Cow::Borrowed(content)))
    }

    fn parse_cdata(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(7); // Skip '[CDATA['
        let content_start = self.scanner.position();

        let Some(pos) = self.scanner.find_seq(b"]]>") else {
            return self.fail("Unterminated CDATA section", start);
        };
        let content = self.scanner.slice(content_start, pos);

        self.scanner.set_position(pos + 3);
        self.state = ParseState::InsideText;
        Some(Token::new(TokenKind::CData, (start, pos + 3)).with_content(Cow::Borrowed(content)))
    }

    fn parse_doctype(&mut self, start: usize) -> Option<Token<'a>> {
        let Some(end) = self.scanner.find_doctype_end() else {
            return self.fail("Unterminated DOCTYPE", start);
        };
        let raw = self.scanner.slice(start, end + 1);

        self.scanner.set_position(end + 1);
        self.state = ParseState::InsideText;
        Some(Token::new(TokenKind::DocType, (start, end + 1)).with_content(Cow::Borrowed(raw)))
    }

    fn parse_pi(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(1); // Skip '?'

        let Some(name) = self.scanner.read_name() else {
            return self.fail("Invalid processing instruction target", start);
        };
        let is_xml_decl = name.eq_ignore_ascii_case(b"xml");

        if self.strict && is_xml_decl && start != 0 {
            return self.fail("XML declaration allowed only at the start of the document", start);
        }

        let Some(pos) = self.scanner.find_seq(b"?>") else {
            return self.fail("Unterminated processing instruction", start);
        };

        self.scanner.skip_whitespace();
        let content_start = self.scanner.position().min(pos);
        let content = self.scanner.slice(content_start, pos);

        self.scanner.set_position(pos + 2);
        self.state = ParseState::InsideText;
        let kind = if is_xml_decl { TokenKind::XmlDeclaration } else { TokenKind::ProcessingInstruction };
        Some(Token::new(kind, (start, pos + 2)).with_name(name).with_content(Cow::Borrowed(content)))
    }

    fn parse_text(&mut self) -> Option<Token<'a>> {
        let start = self.scanner.position();
        self.state = ParseState::InsideText;

        let end = self.scanner.find_tag_start().unwrap_or(self.scanner.len());
        let content = self.scanner.slice(start, end);
        self.scanner.set_position(end);

        Some(Token::new(TokenKind::Text, (start, end)).with_content(decode_text(content)))
    }
}

/// Iterator adapter for tokenizer
impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token()?;
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}
