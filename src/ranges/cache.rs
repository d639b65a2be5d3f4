//! Per-range cache of resolved trees.
//!
//! Trees are shared as `Arc<ResolvedTree>`, so readers keep a consistent
//! snapshot even if the entry is invalidated while they hold it. Entries are
//! only ever dropped whole, never patched.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::ResolverConfig;

use super::{Range, ResolvedTree, Resolver};

#[derive(Debug, Default)]
pub struct RangeCache {
    trees: RwLock<FxHashMap<String, Arc<ResolvedTree>>>,
}

impl RangeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, range_id: &str) -> Option<Arc<ResolvedTree>> {
        self.trees.read().get(range_id).cloned()
    }

    /// Cached tree for `range`, building it on a miss.
    ///
    /// The build runs without holding the lock. If two threads miss at once
    /// both build, and the first insert wins.
    pub fn get_or_build(&self, range: &Range, config: &ResolverConfig) -> Arc<ResolvedTree> {
        if let Some(tree) = self.get(&range.id) {
            return tree;
        }
        let tree = Arc::new(Resolver::new(range, config).build_tree());
        debug!(range = %range.id, nodes = tree.len(), "cached resolved tree");
        self.trees
            .write()
            .entry(range.id.clone())
            .or_insert(tree)
            .clone()
    }

    /// Drop the cached tree for one range. Returns whether one was cached.
    pub fn invalidate(&self, range_id: &str) -> bool {
        self.trees.write().remove(range_id).is_some()
    }

    pub fn clear(&self) {
        self.trees.write().clear();
    }

    pub fn len(&self) -> usize {
        self.trees.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.read().is_empty()
    }
}
