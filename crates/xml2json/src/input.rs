//! Raw document bytes as handed to the parser

use crate::xml::cursor::is_whitespace;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Document source with any leading UTF-8 byte order mark removed, so
/// reported offsets and columns refer to the document body.
#[derive(Clone, Copy, Debug)]
pub struct Input<'a> {
    source: &'a [u8],
}

impl<'a> Input<'a> {
    pub fn from_bytes(source: &'a [u8]) -> Self {
        Self {
            source: source.strip_prefix(UTF8_BOM).unwrap_or(source),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &'a str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    pub const fn as_bytes(&self) -> &'a [u8] {
        self.source
    }

    /// Nothing but XML whitespace, or nothing at all
    pub fn is_blank(&self) -> bool {
        self.source.iter().all(|b| is_whitespace(*b))
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(s: &'a str) -> Self {
        Self::from_str(s)
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(b: &'a [u8]) -> Self {
        Self::from_bytes(b)
    }
}
