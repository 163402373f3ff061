//! Error types for xml2json

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }

    /// True when the span carries no location information
    pub const fn is_empty(&self) -> bool {
        self.start.line == 0
    }
}

/// Caller-facing failure category
///
/// Every [`ErrorKind`] belongs to exactly one category. Transport layers map
/// categories to responses, not individual kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// No usable input was supplied
    EmptyInput,
    /// Input is not well-formed XML
    MalformedMarkup,
    /// Input exceeds the configured depth or size bounds
    ResourceExceeded,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "empty input"),
            Self::MalformedMarkup => write!(f, "malformed markup"),
            Self::ResourceExceeded => write!(f, "resource exceeded"),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    NoRootElement,
    UnexpectedEof,
    InvalidUtf8,
    InvalidName,
    InvalidToken,
    Expected { expected: String, found: String },
    UnclosedTag { name: String },
    MismatchedTag { expected: String, found: String },
    UnexpectedClosingTag { name: String },
    DuplicateAttribute { name: String },
    InvalidReference { reference: String },
    InvalidCharacter,
    MultipleRoots,
    TrailingContent,
    Unterminated { construct: &'static str },
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
}

impl ErrorKind {
    /// Category this kind is reported under
    pub const fn category(&self) -> Category {
        match self {
            Self::EmptyInput => Category::EmptyInput,
            Self::MaxDepthExceeded { .. } | Self::MaxSizeExceeded { .. } => {
                Category::ResourceExceeded
            }
            _ => Category::MalformedMarkup,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "no xml input provided"),
            Self::NoRootElement => write!(f, "no root element"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::InvalidName => write!(f, "invalid name"),
            Self::InvalidToken => write!(f, "invalid token"),
            Self::Expected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::UnclosedTag { name } => write!(f, "unclosed tag <{name}>"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::UnexpectedClosingTag { name } => {
                write!(f, "unexpected closing tag </{name}>")
            }
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::InvalidReference { reference } => {
                write!(f, "invalid reference: &{reference};")
            }
            Self::InvalidCharacter => write!(f, "invalid character"),
            Self::MultipleRoots => write!(f, "more than one root element"),
            Self::TrailingContent => write!(f, "content after root element"),
            Self::Unterminated { construct } => write!(f, "unterminated {construct}"),
            Self::MaxDepthExceeded { max } => {
                write!(f, "max depth exceeded: {max}")
            }
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
        }
    }
}

/// Main error type for xml2json
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Error carrying no location, e.g. empty input
    pub fn bare(kind: ErrorKind) -> Self {
        Self::new(kind, Span::empty())
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_empty_input(&self) -> bool {
        self.category() == Category::EmptyInput
    }

    pub fn is_malformed(&self) -> bool {
        self.category() == Category::MalformedMarkup
    }

    pub fn is_resource_exceeded(&self) -> bool {
        self.category() == Category::ResourceExceeded
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::at(pos))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_empty() {
            write!(f, "{}: {}", self.category(), self.message)
        } else {
            write!(
                f,
                "{} at {}: {}",
                self.category(),
                self.span.start,
                self.message
            )
        }
    }
}

/// Result type alias for xml2json
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "10:5");
    }

    #[test]
    fn test_error_creation() {
        let err = Error::at(ErrorKind::InvalidToken, Pos::new(0, 1, 1));
        assert_eq!(err.kind(), &ErrorKind::InvalidToken);
        assert_eq!(err.span().start.line, 1);
    }

    #[test]
    fn test_categories() {
        assert_eq!(ErrorKind::EmptyInput.category(), Category::EmptyInput);
        assert_eq!(
            ErrorKind::MaxDepthExceeded { max: 4 }.category(),
            Category::ResourceExceeded
        );
        assert_eq!(
            ErrorKind::MaxSizeExceeded { max: 4 }.category(),
            Category::ResourceExceeded
        );
        assert_eq!(ErrorKind::MultipleRoots.category(), Category::MalformedMarkup);
        assert_eq!(
            ErrorKind::UnclosedTag {
                name: "a".to_string()
            }
            .category(),
            Category::MalformedMarkup
        );
    }

    #[test]
    fn test_error_display_with_position() {
        let err = Error::at(
            ErrorKind::MismatchedTag {
                expected: "a".to_string(),
                found: "b".to_string(),
            },
            Pos::new(10, 2, 5),
        );
        let display = err.to_string();
        assert!(display.starts_with("malformed markup at 2:5"));
        assert!(display.contains("expected </a>, found </b>"));
    }

    #[test]
    fn test_error_display_without_position() {
        let err = Error::bare(ErrorKind::EmptyInput);
        assert_eq!(err.to_string(), "empty input: no xml input provided");
        assert!(err.is_empty_input());
        assert!(!err.is_malformed());
    }
}
