//! xml2json - deterministic XML to JSON conversion
//!
//! Elements become strings, objects or array entries according to a fixed
//! set of rules: attributes map to `@name` keys, text next to attributes to
//! `#text`, and a repeated child tag promotes its key to an array.
//!
//! # Quick Start
//!
//! ```
//! use xml2json::{convert, Style};
//! # fn main() -> Result<(), xml2json::Error> {
//! let value = convert(r#"<root><item>Value1</item><item attr="test">Value2</item></root>"#)?;
//! assert_eq!(
//!     xml2json::json::to_string(&value, Style::Compact),
//!     r##"{"root":{"item":["Value1",{"@attr":"test","#text":"Value2"}]}}"##
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Category, Error, ErrorKind, Pos, Result, Span};

pub mod input;
pub use input::Input;

pub mod value;
pub use value::{Array, Object, Value};

pub mod json;
pub use json::Style;

pub mod map;
pub use map::{Options as MapOptions, Whitespace};

pub mod xml;
pub use xml::{
    Config as ParserConfig, Content as XmlContent, Document as XmlDocument,
    Element as XmlElement, Parser as XmlParser, DEPTH_CEILING,
};

pub mod convert;
pub use convert::{convert, convert_with_options, to_json_string, ConvertOptions};

/// Parse XML from string
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(s.as_bytes());
    parser.parse()
}

/// Parse XML from bytes
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(bytes);
    parser.parse()
}

/// Parse XML with custom limits
pub fn from_xml_str_with_config(s: &str, config: ParserConfig) -> Result<XmlDocument> {
    let mut parser = XmlParser::with_config(s.as_bytes(), config);
    parser.parse()
}
