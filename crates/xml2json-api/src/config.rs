//! Service configuration from environment variables

use std::str::FromStr;

use thiserror::Error;
use xml2json::{ConvertOptions, MapOptions, ParserConfig, Style, Whitespace};

/// Where converted documents are written after a successful conversion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    None,
    Memory,
}

impl FromStr for StoreKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Ok(Self::None),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub max_depth: u16,
    pub max_size: usize,
    pub whitespace: Whitespace,
    /// Indentation of response bodies, 0 for compact output
    pub indent: usize,
    pub store: StoreKind,
    pub store_capacity: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let limits = ParserConfig::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_depth: limits.max_depth,
            max_size: limits.max_size,
            whitespace: Whitespace::Preserve,
            indent: 2,
            store: StoreKind::None,
            store_capacity: 10_000,
        }
    }
}

impl ApiConfig {
    /// Read `XML2JSON_*` variables from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, unset keys keep defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            host: lookup("XML2JSON_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "XML2JSON_PORT", defaults.port)?,
            max_depth: parse_var(&lookup, "XML2JSON_MAX_DEPTH", defaults.max_depth)?,
            max_size: parse_var(&lookup, "XML2JSON_MAX_SIZE", defaults.max_size)?,
            whitespace: parse_var(&lookup, "XML2JSON_WHITESPACE", defaults.whitespace)?,
            indent: parse_var(&lookup, "XML2JSON_INDENT", defaults.indent)?,
            store: parse_var(&lookup, "XML2JSON_STORE", defaults.store)?,
            store_capacity: parse_var(&lookup, "XML2JSON_STORE_CAPACITY", defaults.store_capacity)?,
        };
        if config.store == StoreKind::Memory && config.store_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "XML2JSON_STORE_CAPACITY",
                value: "0".to_string(),
            });
        }
        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            parser: ParserConfig::new(self.max_depth, self.max_size),
            mapper: MapOptions {
                whitespace: self.whitespace,
                ..MapOptions::default()
            },
        }
    }

    pub fn style(&self) -> Style {
        match self.indent {
            0 => Style::Compact,
            indent => Style::Pretty { indent },
        }
    }

    /// Largest request body accepted, leaving room for base64 expansion
    pub fn body_limit(&self) -> Option<usize> {
        match self.max_size {
            0 => None,
            max => Some(max.saturating_mul(4) / 3 + 4),
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { key, value }),
        },
    }
}
