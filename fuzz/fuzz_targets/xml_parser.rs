#![no_main]
use libfuzzer_sys::fuzz_target;
use xml2json::{ParserConfig, XmlParser};

fuzz_target!(|data: &[u8]| {
    let mut parser = XmlParser::with_config(data, ParserConfig::new(64, 1 << 20));
    let _ = parser.parse();
});
