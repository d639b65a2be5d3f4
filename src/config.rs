//! Codec and resolver settings.
//!
//! All settings have defaults, so an empty JSON object is a valid config:
//!
//! ```text
//! {
//!   "parser":     { "max_depth": 50, "max_xml_depth": 256 },
//!   "serializer": { "indent": 2, "producer": "my-app 1.0" },
//!   "resolver":   { "language": "en" }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiftConfig {
    pub parser: ParserConfig,
    pub serializer: SerializerConfig,
    pub resolver: ResolverConfig,
}

impl LiftConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a config from JSON; missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_serializer(mut self, serializer: SerializerConfig) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }
}

/// Limits applied while reading LIFT.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Deepest allowed nesting of `sense/subsense` and `reversal/main`.
    pub max_depth: usize,
    /// Deepest allowed raw element nesting in the input document.
    pub max_xml_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 50,
            max_xml_depth: 256,
        }
    }
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_xml_depth(mut self, max_xml_depth: usize) -> Self {
        self.max_xml_depth = max_xml_depth;
        self
    }
}

/// Output settings for the serializer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Spaces per nesting level; 0 writes everything on one line.
    pub indent: usize,
    /// Written as the `producer` attribute of the root `lift` element.
    pub producer: Option<String>,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            producer: None,
        }
    }
}

impl SerializerConfig {
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }
}

/// Display settings for resolved range elements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Preferred language when picking a label or abbreviation.
    pub language: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = LiftConfig::from_json_str("{}").unwrap();
        assert_eq!(config, LiftConfig::default());
        assert_eq!(config.parser.max_depth, 50);
        assert_eq!(config.resolver.language, "en");
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config =
            LiftConfig::from_json_str(r#"{"parser": {"max_depth": 5}, "serializer": {"producer": "x"}}"#)
                .unwrap();
        assert_eq!(config.parser.max_depth, 5);
        assert_eq!(config.parser.max_xml_depth, 256);
        assert_eq!(config.serializer.indent, 2);
        assert_eq!(config.serializer.producer.as_deref(), Some("x"));
    }
}
