//! Flat range storage.
//!
//! A [`Range`] keeps its elements as a flat list with optional parent ids,
//! exactly as they appear in a ranges file. The hierarchy is computed on
//! demand by the resolver and never stored here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::base::Multitext;

/// All ranges of one document store, keyed by range id in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranges(IndexMap<String, Range>);

impl Ranges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a range, returning the one it replaced.
    pub fn insert(&mut self, range: Range) -> Option<Range> {
        self.0.insert(range.id.clone(), range)
    }

    pub fn with(mut self, range: Range) -> Self {
        self.insert(range);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Range> {
        self.0.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Range> {
        self.0.get_mut(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Range> {
        self.0.shift_remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Range> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Range> for Ranges {
    fn from_iter<I: IntoIterator<Item = Range>>(iter: I) -> Self {
        let mut ranges = Ranges::new();
        for range in iter {
            ranges.insert(range);
        }
        ranges
    }
}

/// A named controlled vocabulary (`grammatical-info`, `semantic-domain-ddp4`, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default)]
    pub labels: Multitext,
    #[serde(default)]
    pub descriptions: Multitext,
    #[serde(default)]
    pub elements: Vec<RangeElement>,
}

impl Range {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_element(mut self, element: RangeElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn element(&self, id: &str) -> Option<&RangeElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut RangeElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }
}

/// One value of a range. `parent` names another element of the same range;
/// a parent that does not exist there makes this element a root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeElement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub labels: Multitext,
    #[serde(default)]
    pub abbrevs: Multitext,
    #[serde(default)]
    pub descriptions: Multitext,
}

impl RangeElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_label(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.labels.set(lang, text);
        self
    }

    pub fn with_abbrev(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.abbrevs.set(lang, text);
        self
    }

    pub fn with_description(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.descriptions.set(lang, text);
        self
    }
}
