//! Deterministic JSON text output

use std::fmt::Write as _;

use crate::value::Value;

/// Output layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    /// No insignificant whitespace
    Compact,
    /// One entry per line, nested levels indented by `indent` spaces
    Pretty { indent: usize },
}

impl Default for Style {
    fn default() -> Self {
        Self::Pretty { indent: 2 }
    }
}

/// Serialize a value to JSON text
///
/// Object keys are written in insertion order, so equal values always
/// produce byte-identical output.
pub fn to_string(value: &Value, style: Style) -> String {
    let mut out = String::new();
    match style {
        Style::Compact => write_compact(value, &mut out),
        Style::Pretty { indent } => write_pretty(value, indent, 0, &mut out),
    }
    out
}

fn write_compact(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => write_string(s, out),
        Value::Array(arr) => {
            out.push('[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_compact(item, out);
            }
            out.push(']');
        }
        Value::Object(obj) => {
            out.push('{');
            for (i, (key, item)) in obj.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_compact(item, out);
            }
            out.push('}');
        }
    }
}

fn write_pretty(value: &Value, indent: usize, level: usize, out: &mut String) {
    match value {
        Value::String(s) => write_string(s, out),
        Value::Array(arr) if arr.is_empty() => out.push_str("[]"),
        Value::Array(arr) => {
            out.push('[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(indent, level + 1, out);
                write_pretty(item, indent, level + 1, out);
            }
            newline(indent, level, out);
            out.push(']');
        }
        Value::Object(obj) if obj.is_empty() => out.push_str("{}"),
        Value::Object(obj) => {
            out.push('{');
            for (i, (key, item)) in obj.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(indent, level + 1, out);
                write_string(key, out);
                out.push_str(": ");
                write_pretty(item, indent, level + 1, out);
            }
            newline(indent, level, out);
            out.push('}');
        }
    }
}

fn newline(indent: usize, level: usize, out: &mut String) {
    out.push('\n');
    out.extend(std::iter::repeat(' ').take(indent * level));
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c < '\u{20}' => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
