#![no_main]
use libfuzzer_sys::fuzz_target;
use xml2json::{json, Style};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(value) = xml2json::convert(s) {
            let first = json::to_string(&value, Style::Compact);
            let second = xml2json::convert(s).map(|again| json::to_string(&again, Style::Compact));
            assert_eq!(second.ok(), Some(first));
        }
    }
});
