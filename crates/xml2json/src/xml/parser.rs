//! XML parser implementation

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::input::Input;
use crate::xml::cursor::Cursor;
use crate::xml::model::{Content, Document, Element};

/// Hard bound on element nesting
///
/// Elements are parsed and mapped recursively, so every configured depth,
/// including 0, is capped here to keep deep input from exhausting the stack.
pub const DEPTH_CEILING: u16 = 256;

/// Parser limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means [`DEPTH_CEILING`])
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a config with no size limit and the deepest nesting allowed
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }

    /// Depth actually enforced while parsing
    pub const fn effective_max_depth(&self) -> u16 {
        if self.max_depth == 0 || self.max_depth > DEPTH_CEILING {
            DEPTH_CEILING
        } else {
            self.max_depth
        }
    }
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    depth: u16,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser with default limits
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new XML parser with custom limits
    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(Input::from_bytes(input).as_bytes()),
            config,
            depth: 0,
        }
    }

    /// Parse an XML document
    ///
    /// Blank input fails with [`ErrorKind::EmptyInput`]; everything else that
    /// is not a single well-formed root element fails with a markup error.
    pub fn parse(&mut self) -> Result<Document> {
        let remaining = self.cursor.remaining();
        if Input::from_bytes(remaining).is_blank() {
            return Err(Error::bare(ErrorKind::EmptyInput));
        }
        if self.config.max_size > 0 && remaining.len() > self.config.max_size {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                self.cursor.position(),
            ));
        }

        self.parse_prolog()?;
        let root = self.parse_element()?;
        self.parse_epilog()?;

        Ok(Document { root })
    }

    fn parse_prolog(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else if self.cursor.starts_with(b"<!DOCTYPE") {
                self.skip_doctype()?;
            } else if self.cursor.is_eof() {
                return Err(self.error_here(ErrorKind::NoRootElement));
            } else if self.cursor.current() == Some(b'<') && self.cursor.peek(1) != Some(b'!') {
                return Ok(());
            } else {
                return Err(self.expected("root element"));
            }
        }
    }

    fn parse_epilog(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.is_eof() {
                return Ok(());
            }
            if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else if self.cursor.starts_with(b"</") {
                let pos = self.cursor.position();
                self.cursor.advance_by(2);
                let name = self.parse_name()?;
                return Err(Error::at(ErrorKind::UnexpectedClosingTag { name }, pos));
            } else if self.cursor.current() == Some(b'<')
                && self.cursor.peek(1).is_some_and(is_name_start)
            {
                return Err(self.error_here(ErrorKind::MultipleRoots));
            } else {
                return Err(self.error_here(ErrorKind::TrailingContent));
            }
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        let open = self.cursor.position();
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            let name = self.parse_name()?;
            return Err(Error::at(ErrorKind::UnexpectedClosingTag { name }, open));
        }

        self.enter(open)?;

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.consume(b"/>") {
            self.depth -= 1;
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;
        let children = self.parse_content(&name, open)?;
        self.depth -= 1;

        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    /// Parse element content up to and including the matching end tag
    ///
    /// Adjacent character data, references and CDATA sections are merged into
    /// a single text node; comments and processing instructions are dropped
    /// without splitting it.
    fn parse_content(&mut self, name: &str, open: Pos) -> Result<Vec<Content>> {
        let mut children = Vec::new();
        let mut text = String::new();

        loop {
            match self.cursor.current() {
                None => {
                    return Err(Error::at(
                        ErrorKind::UnclosedTag {
                            name: name.to_string(),
                        },
                        open,
                    ));
                }
                Some(b'<') => {
                    if self.cursor.starts_with(b"</") {
                        flush_text(&mut children, &mut text);
                        self.parse_end_tag(name)?;
                        return Ok(children);
                    } else if self.cursor.starts_with(b"<![CDATA[") {
                        self.parse_cdata(&mut text)?;
                    } else if self.cursor.starts_with(b"<!--") {
                        self.skip_comment()?;
                    } else if self.cursor.starts_with(b"<?") {
                        self.skip_processing_instruction()?;
                    } else if self.cursor.peek(1) == Some(b'!') {
                        return Err(self.error_with(
                            ErrorKind::InvalidToken,
                            "markup declaration not allowed in element content",
                        ));
                    } else {
                        flush_text(&mut children, &mut text);
                        let child = self.parse_element()?;
                        children.push(Content::Element(child));
                    }
                }
                Some(_) => self.parse_text(&mut text)?,
            }
        }
    }

    fn parse_end_tag(&mut self, expected: &str) -> Result<()> {
        let pos = self.cursor.position();
        self.cursor.advance_by(2);
        let found = self.parse_name()?;
        if found != expected {
            return Err(Error::at(
                ErrorKind::MismatchedTag {
                    expected: expected.to_string(),
                    found,
                },
                pos,
            ));
        }
        self.cursor.skip_whitespace();
        self.expect_byte(b'>')
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            let before = self.cursor.pos();
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
            }
            if self.cursor.pos() == before {
                return Err(self.expected("whitespace or end of tag"));
            }

            let pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, pos));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    /// Parse a quoted attribute value with references decoded and literal
    /// whitespace normalized to spaces
    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b @ (b'"' | b'\'')) => b,
            _ => return Err(self.expected("quoted attribute value")),
        };
        self.cursor.advance();

        let mut value = String::new();
        let mut start = self.cursor.pos();
        loop {
            match self.cursor.current() {
                None => {
                    return Err(self.error_here(ErrorKind::Unterminated {
                        construct: "attribute value",
                    }));
                }
                Some(b) if b == quote => {
                    self.push_raw(&mut value, start)?;
                    self.cursor.advance();
                    return Ok(value);
                }
                Some(b'<') => {
                    return Err(self.error_with(
                        ErrorKind::InvalidToken,
                        "'<' not allowed in attribute value",
                    ));
                }
                Some(b'&') => {
                    self.push_raw(&mut value, start)?;
                    value.push(self.parse_reference()?);
                    start = self.cursor.pos();
                }
                Some(b'\t' | b'\n' | b'\r') => {
                    self.push_raw(&mut value, start)?;
                    self.consume_line_break_or_tab();
                    value.push(' ');
                    start = self.cursor.pos();
                }
                Some(b) if is_restricted(b) => {
                    return Err(self.error_here(ErrorKind::InvalidCharacter));
                }
                Some(_) => self.cursor.advance(),
            }
        }
    }

    /// Append character data up to the next `<`
    fn parse_text(&mut self, out: &mut String) -> Result<()> {
        let mut start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            match b {
                b'<' => break,
                b'&' => {
                    self.push_raw(out, start)?;
                    out.push(self.parse_reference()?);
                    start = self.cursor.pos();
                }
                b'\r' => {
                    self.push_raw(out, start)?;
                    self.consume_line_break_or_tab();
                    out.push('\n');
                    start = self.cursor.pos();
                }
                b']' if self.cursor.starts_with(b"]]>") => {
                    return Err(
                        self.error_with(ErrorKind::InvalidToken, "']]>' not allowed in text")
                    );
                }
                b if is_restricted(b) => {
                    return Err(self.error_here(ErrorKind::InvalidCharacter));
                }
                _ => self.cursor.advance(),
            }
        }
        self.push_raw(out, start)
    }

    fn parse_cdata(&mut self, out: &mut String) -> Result<()> {
        let open = self.cursor.position();
        self.cursor.advance_by(b"<![CDATA[".len());
        let mut start = self.cursor.pos();
        loop {
            if self.cursor.is_eof() {
                return Err(Error::at(
                    ErrorKind::Unterminated {
                        construct: "CDATA section",
                    },
                    open,
                ));
            }
            if self.cursor.starts_with(b"]]>") {
                self.push_raw(out, start)?;
                self.cursor.advance_by(3);
                return Ok(());
            }
            if self.cursor.current() == Some(b'\r') {
                self.push_raw(out, start)?;
                self.consume_line_break_or_tab();
                out.push('\n');
                start = self.cursor.pos();
            } else {
                self.cursor.advance();
            }
        }
    }

    /// Parse an entity or character reference starting at `&`
    fn parse_reference(&mut self) -> Result<char> {
        let pos = self.cursor.position();
        self.cursor.advance();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b.is_ascii_alphanumeric() || b == b'#' {
                self.cursor.advance();
            } else {
                break;
            }
        }
        let reference = String::from_utf8_lossy(self.cursor.slice_from(start)).into_owned();

        if !self.cursor.consume(b";") {
            return Err(Error::at(ErrorKind::InvalidReference { reference }, pos));
        }
        decode_reference(&reference)
            .ok_or_else(|| Error::at(ErrorKind::InvalidReference { reference }, pos))
    }

    fn parse_name(&mut self) -> Result<String> {
        let pos = self.cursor.position();
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(b) if is_name_start(b) => self.cursor.advance(),
            Some(_) => return Err(Error::at(ErrorKind::InvalidName, pos)),
            None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
        }
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        std::str::from_utf8(self.cursor.slice_from(start))
            .map(str::to_string)
            .map_err(|_| Error::at(ErrorKind::InvalidUtf8, pos))
    }

    fn skip_comment(&mut self) -> Result<()> {
        let open = self.cursor.position();
        self.cursor.advance_by(b"<!--".len());
        loop {
            if self.cursor.consume(b"-->") {
                return Ok(());
            }
            if self.cursor.starts_with(b"--") {
                return Err(self.error_with(ErrorKind::InvalidToken, "'--' not allowed in comment"));
            }
            if self.cursor.is_eof() {
                return Err(Error::at(
                    ErrorKind::Unterminated {
                        construct: "comment",
                    },
                    open,
                ));
            }
            self.cursor.advance();
        }
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        let open = self.cursor.position();
        self.cursor.advance_by(2);
        self.parse_name()?;
        while !self.cursor.consume(b"?>") {
            if self.cursor.is_eof() {
                return Err(Error::at(
                    ErrorKind::Unterminated {
                        construct: "processing instruction",
                    },
                    open,
                ));
            }
            self.cursor.advance();
        }
        Ok(())
    }

    /// Skip a document type declaration, internal subset included
    fn skip_doctype(&mut self) -> Result<()> {
        let open = self.cursor.position();
        self.cursor.advance_by(b"<!DOCTYPE".len());
        let mut brackets = 0usize;
        let mut quote: Option<u8> = None;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => brackets += 1,
                (None, b']') => brackets = brackets.saturating_sub(1),
                (None, b'>') if brackets == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(Error::at(
            ErrorKind::Unterminated {
                construct: "document type declaration",
            },
            open,
        ))
    }

    fn enter(&mut self, at: Pos) -> Result<()> {
        self.depth = self.depth.saturating_add(1);
        let max = self.config.effective_max_depth();
        if self.depth > max {
            return Err(Error::at(ErrorKind::MaxDepthExceeded { max }, at));
        }
        Ok(())
    }

    /// Consume `\t`, `\n`, `\r` or a `\r\n` pair
    fn consume_line_break_or_tab(&mut self) {
        if !self.cursor.consume(b"\r\n") {
            self.cursor.advance();
        }
    }

    fn push_raw(&self, out: &mut String, start: usize) -> Result<()> {
        let raw = self.cursor.slice_from(start);
        let text = std::str::from_utf8(raw).map_err(|_| self.error_here(ErrorKind::InvalidUtf8))?;
        out.push_str(text);
        Ok(())
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.current() == Some(expected) {
            self.cursor.advance();
            Ok(())
        } else {
            Err(self.expected(&format!("'{}'", char::from(expected))))
        }
    }

    fn expected(&self, expected: &str) -> Error {
        let found = match self.cursor.current() {
            None => "end of input".to_string(),
            Some(b) if b.is_ascii_graphic() => format!("'{}'", char::from(b)),
            Some(b) => format!("byte 0x{b:02x}"),
        };
        self.error_here(ErrorKind::Expected {
            expected: expected.to_string(),
            found,
        })
    }

    fn error_here(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.cursor.position())
    }

    fn error_with(&self, kind: ErrorKind, message: &str) -> Error {
        let pos = self.cursor.position();
        Error::with_message(kind, Span::at(pos), message)
    }
}

fn flush_text(children: &mut Vec<Content>, text: &mut String) {
    if !text.is_empty() {
        children.push(Content::Text(std::mem::take(text)));
    }
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

/// Control bytes that may not appear literally in XML 1.0 documents
fn is_restricted(b: u8) -> bool {
    b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r')
}

fn decode_reference(reference: &str) -> Option<char> {
    let ch = match reference {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let code = if let Some(hex) = reference.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                reference.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code).filter(|c| is_xml_char(*c))?
        }
    };
    Some(ch)
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
