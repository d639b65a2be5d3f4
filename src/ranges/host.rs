//! Owner of a document store's ranges and their resolution cache.
//!
//! ```ignore
//! let mut host = RangeHost::from_xml(ranges_xml)?;
//! for row in host.flatten("grammatical-info", true)? {
//!     println!("{}{}", "  ".repeat(row.depth), row.label);
//! }
//! host.update_range("grammatical-info", |r| r.elements.retain(|e| e.id != "Adv"))?;
//! ```
//!
//! Reads take `&self` and may run from many threads. Edits take `&mut self`
//! and invalidate the cached tree of the edited range (or all trees for
//! [`RangeHost::replace_ranges`]) before returning.

use std::sync::Arc;

use crate::config::{ParserConfig, ResolverConfig, SerializerConfig};
use crate::lift::SerializeError;

use super::{
    Effective, FlatNode, Range, RangeCache, Ranges, RangesError, ResolvedTree, Resolver,
    ResolverError, parse_ranges_with, serialize_ranges_with,
};

#[derive(Debug, Default)]
pub struct RangeHost {
    ranges: Ranges,
    cache: RangeCache,
    config: ResolverConfig,
}

impl RangeHost {
    pub fn new(ranges: Ranges) -> Self {
        Self {
            ranges,
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self.cache.clear();
        self
    }

    pub fn from_xml(input: &[u8]) -> Result<Self, RangesError> {
        Self::from_xml_with(input, &ParserConfig::default())
    }

    pub fn from_xml_with(input: &[u8], config: &ParserConfig) -> Result<Self, RangesError> {
        Ok(Self::new(parse_ranges_with(input, config)?))
    }

    pub fn to_xml(&self, config: &SerializerConfig) -> Result<String, SerializeError> {
        serialize_ranges_with(&self.ranges, config)
    }

    pub fn ranges(&self) -> &Ranges {
        &self.ranges
    }

    pub fn range(&self, id: &str) -> Result<&Range, ResolverError> {
        self.ranges
            .get(id)
            .ok_or_else(|| ResolverError::UnknownRange(id.to_string()))
    }

    /// Resolved tree of one range, from the cache when possible.
    pub fn tree(&self, id: &str) -> Result<Arc<ResolvedTree>, ResolverError> {
        let range = self.range(id)?;
        Ok(self.cache.get_or_build(range, &self.config))
    }

    pub fn flatten(&self, id: &str, leaves_only: bool) -> Result<Vec<FlatNode>, ResolverError> {
        Ok(self.tree(id)?.flatten(leaves_only))
    }

    /// Lenient effective values; only an unknown range is an error.
    pub fn effective(&self, range_id: &str, element_id: &str) -> Result<Effective, ResolverError> {
        let range = self.range(range_id)?;
        Ok(Resolver::new(range, &self.config).resolve_effective(element_id))
    }

    /// Edit one range in place and drop its cached tree.
    pub fn update_range<F>(&mut self, id: &str, edit: F) -> Result<(), ResolverError>
    where
        F: FnOnce(&mut Range),
    {
        let range = self
            .ranges
            .get_mut(id)
            .ok_or_else(|| ResolverError::UnknownRange(id.to_string()))?;
        edit(range);
        // The edit may have renamed the range.
        let new_id = range.id.clone();
        if new_id != id {
            if let Some(range) = self.ranges.remove(id) {
                self.ranges.insert(range);
            }
            self.cache.invalidate(&new_id);
        }
        self.cache.invalidate(id);
        Ok(())
    }

    /// Add or replace one range.
    pub fn insert_range(&mut self, range: Range) -> Option<Range> {
        self.cache.invalidate(&range.id);
        self.ranges.insert(range)
    }

    pub fn remove_range(&mut self, id: &str) -> Option<Range> {
        self.cache.invalidate(id);
        self.ranges.remove(id)
    }

    /// Swap in a freshly loaded set of ranges; every cached tree is dropped.
    pub fn replace_ranges(&mut self, ranges: Ranges) -> Ranges {
        self.cache.clear();
        std::mem::replace(&mut self.ranges, ranges)
    }
}
