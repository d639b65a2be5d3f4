//! LIFT ranges: controlled vocabularies with a parent hierarchy.
//!
//! ```text
//! lift-ranges XML ──parse_ranges──▶ Ranges (flat elements, parent ids)
//!                                      │
//!                                      ▼
//!                               Resolver ──▶ ResolvedTree ──▶ flatten(leaves_only)
//!                                      │          ▲
//!                                      │     RangeCache (per range id)
//!                                      ▼
//!                              resolve_effective ──▶ { label, abbrev }
//! ```
//!
//! [`RangeHost`] ties a loaded [`Ranges`] to its [`RangeCache`] and is the
//! usual entry point for UI and validation code.

mod cache;
mod error;
mod host;
mod model;
mod reader;
mod resolver;
mod writer;

pub use cache::RangeCache;
pub use error::{RangesError, ResolverError};
pub use host::RangeHost;
pub use model::{Range, RangeElement, Ranges};
pub use reader::{parse_ranges, parse_ranges_with};
pub use resolver::{
    Effective, FlatNode, ResolvedNode, ResolvedTree, Resolver, build_tree, resolve_effective,
    try_resolve_effective,
};
pub use writer::{serialize_ranges, serialize_ranges_with};
