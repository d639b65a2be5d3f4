//! LIFT 0.13 codec.
//!
//! ```text
//! ┌──────────────┐   parse / parse_all    ┌──────────────┐   to_json
//! │  LIFT XML    │ ─────────────────────▶ │    Entry     │ ─────────▶ JSON
//! │  (bytes)     │ ◀───────────────────── │  (model)     │ ◀─────────
//! └──────────────┘ serialize / serialize_all └────────────┘  from_json
//! ```
//!
//! Parsing and serializing are pure functions over their inputs; they do no
//! I/O and keep no state, so they can be called from any number of threads.
//!
//! ## Usage
//!
//! ```ignore
//! use lift::lift::{parse, serialize};
//!
//! let mut entry = parse(xml_bytes)?;
//! entry.lexical_unit.set("en", "cat");
//! let xml = serialize(&entry)?;
//! ```

mod error;
mod json;
mod reader;
mod writer;

pub use error::{JsonError, ParseError, SerializeError};
pub use json::{from_json, from_json_str, to_json, to_json_string};
pub use reader::{EntryFailure, LiftDocument, LiftReader};
pub use writer::LiftWriter;

pub(crate) use reader::forms;
pub(crate) use writer::{multitext_element, push_opt};

use tracing::debug;

use crate::config::{LiftConfig, ParserConfig, SerializerConfig};
use crate::model::Entry;

/// Parser and serializer settings bundled together.
#[derive(Clone, Debug, Default)]
pub struct LiftCodec {
    parser: ParserConfig,
    serializer: SerializerConfig,
}

impl LiftCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LiftConfig) -> Self {
        Self {
            parser: config.parser.clone(),
            serializer: config.serializer.clone(),
        }
    }

    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_serializer(mut self, serializer: SerializerConfig) -> Self {
        self.serializer = serializer;
        self
    }

    /// Parse one entry (an `entry` root, or the first entry of a `lift` root).
    pub fn parse(&self, input: &[u8]) -> Result<Entry, ParseError> {
        LiftReader::new(&self.parser).read_entry(input)
    }

    /// Parse every entry of a document. Entries that fail are logged and
    /// left out; use [`parse_document`](Self::parse_document) to see them.
    pub fn parse_all(&self, input: &[u8]) -> Result<Vec<Entry>, ParseError> {
        let document = self.parse_document(input)?;
        if !document.failures.is_empty() {
            debug!(
                parsed = document.entries.len(),
                failed = document.failures.len(),
                "parsed document with invalid entries"
            );
        }
        Ok(document.entries)
    }

    pub fn parse_document(&self, input: &[u8]) -> Result<LiftDocument, ParseError> {
        LiftReader::new(&self.parser).read_document(input)
    }

    pub fn serialize(&self, entry: &Entry) -> Result<String, SerializeError> {
        LiftWriter::new(&self.serializer).write_entry(entry)
    }

    pub fn serialize_all(&self, entries: &[Entry]) -> Result<String, SerializeError> {
        LiftWriter::new(&self.serializer).write_document(entries)
    }
}

/// [`LiftCodec::parse`] with default settings.
pub fn parse(input: &[u8]) -> Result<Entry, ParseError> {
    LiftCodec::default().parse(input)
}

/// [`LiftCodec::parse_all`] with default settings.
pub fn parse_all(input: &[u8]) -> Result<Vec<Entry>, ParseError> {
    LiftCodec::default().parse_all(input)
}

/// [`LiftCodec::parse_document`] with default settings.
pub fn parse_document(input: &[u8]) -> Result<LiftDocument, ParseError> {
    LiftCodec::default().parse_document(input)
}

/// [`LiftCodec::serialize`] with default settings.
pub fn serialize(entry: &Entry) -> Result<String, SerializeError> {
    LiftCodec::default().serialize(entry)
}

/// [`LiftCodec::serialize_all`] with default settings.
pub fn serialize_all(entries: &[Entry]) -> Result<String, SerializeError> {
    LiftCodec::default().serialize_all(entries)
}
