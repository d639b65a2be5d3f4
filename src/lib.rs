//! # lift-core
//!
//! LIFT 0.13 dictionary document model, XML codec and ranges resolver.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! store     → DocumentStore collaborator, EntryStore load/save
//!   ↓
//! ranges    → Range model, ranges XML, hierarchy resolver, cache
//!   ↓
//! lift      → LIFT parser/serializer, JSON projection
//!   ↓
//! model     → Entry, Sense, Relation, Variant, Reversal, ...
//!   ↓
//! base      → Multitext, Traits, Annotation, Extension, constants
//! ```
//!
//! Parsing, serializing and resolving are pure functions over their inputs
//! and can be called from any thread. The only shared mutable state is the
//! per-range cache inside [`ranges::RangeHost`].

// ============================================================================
// MODULES (dependency order: base → model → lift → ranges → store)
// ============================================================================

/// Foundation types: Multitext, trait bag, annotations, opaque extensions
pub mod base;

/// Settings for the codec and resolver
pub mod config;

/// Document model: entries, senses and everything hanging off them
pub mod model;

/// LIFT XML codec and JSON projection
pub mod lift;

/// Ranges: controlled vocabularies and their hierarchy
pub mod ranges;

/// Document store collaborator
pub mod store;

mod xml;

// Re-export commonly needed items
pub use base::{Annotation, Extension, Multitext, Trait, Traits};
pub use config::{LiftConfig, ParserConfig, ResolverConfig, SerializerConfig};
pub use lift::{
    JsonError, LiftCodec, LiftDocument, ParseError, SerializeError, from_json, parse, parse_all,
    parse_document, serialize, serialize_all, to_json,
};
pub use model::{Entry, Relation, Reversal, Sense, Variant};
pub use ranges::{
    Effective, FlatNode, Range, RangeElement, RangeHost, Ranges, RangesError, ResolvedNode,
    ResolvedTree, ResolverError, build_tree, parse_ranges, resolve_effective, serialize_ranges,
};
pub use store::{DocumentStore, EntryStore, MemoryStore, StoreError};
