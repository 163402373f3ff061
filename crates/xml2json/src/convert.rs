//! XML to JSON conversion entry points

use tracing::{debug, instrument};

use crate::error::Result;
use crate::json::{self, Style};
use crate::map::{self, Options as MapOptions};
use crate::value::Value;
use crate::xml::parser::{Config as ParserConfig, Parser as XmlParser};

/// Options for a single conversion
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub parser: ParserConfig,
    pub mapper: MapOptions,
}

/// Convert an XML document with default limits and mapping rules
pub fn convert(input: &str) -> Result<Value> {
    convert_with_options(input, &ConvertOptions::default())
}

/// Convert an XML document with options
///
/// Parsing completes before mapping starts, so a failure never yields a
/// partial value.
#[instrument(level = "debug", skip_all, fields(bytes = input.len()))]
pub fn convert_with_options(input: &str, options: &ConvertOptions) -> Result<Value> {
    let mut parser = XmlParser::with_config(input.as_bytes(), options.parser);
    let document = parser.parse().inspect_err(|err| {
        debug!(category = %err.category(), "xml rejected: {err}");
    })?;
    debug!(root = %document.root.name, "xml parsed");
    Ok(map::map_document(&document, &options.mapper))
}

/// Convert an XML document straight to JSON text
pub fn to_json_string(input: &str, options: &ConvertOptions, style: Style) -> Result<String> {
    let value = convert_with_options(input, options)?;
    Ok(json::to_string(&value, style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::map::Whitespace;
    use crate::xml::parser::Config;

    #[test]
    fn test_convert_simple() -> Result<()> {
        let value = convert("<root><name>test</name></root>")?;
        assert_eq!(
            value.get("root").and_then(|root| root.get("name")),
            Some(&Value::from("test"))
        );
        Ok(())
    }

    #[test]
    fn test_options_reach_parser_and_mapper() -> Result<()> {
        let options = ConvertOptions {
            parser: Config::new(1, 0),
            mapper: MapOptions {
                whitespace: Whitespace::Trim,
                ..MapOptions::default()
            },
        };
        assert_eq!(
            convert_with_options("<a>  x  </a>", &options)?.get("a"),
            Some(&Value::from("x"))
        );

        let err = convert_with_options("<a><b/></a>", &options).err();
        assert_eq!(
            err.as_ref().map(|e| e.kind()),
            Some(&ErrorKind::MaxDepthExceeded { max: 1 })
        );
        Ok(())
    }

    #[test]
    fn test_to_json_string() -> Result<()> {
        let json = to_json_string(
            "<data id=\"123\"/>",
            &ConvertOptions::default(),
            Style::Compact,
        )?;
        assert_eq!(json, r#"{"data":{"@id":"123"}}"#);
        Ok(())
    }
}
