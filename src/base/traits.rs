//! Ordered trait bag.
//!
//! LIFT allows the same trait name to appear more than once on one owner
//! (two `usage-type` traits on a sense, say). [`Traits`] is therefore a list,
//! never a map: every lookup by name hands back *all* matches, and every
//! entry is written back as its own `trait` element.

use serde::{Deserialize, Serialize};

use super::Annotation;

/// A single `trait` element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Trait {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Ordered multiset of traits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Traits(Vec<Trait>);

impl Traits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trait. Existing traits with the same name are kept.
    pub fn push(&mut self, t: Trait) {
        self.0.push(t);
    }

    /// Builder form of [`push`](Self::push) for a plain name/value pair.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Trait::new(name, value));
        self
    }

    /// Every trait called `name`, in document order.
    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Trait> + 'a {
        self.0.iter().filter(move |t| t.name == name)
    }

    /// Values of every trait called `name`, in document order.
    pub fn values<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        self.all(name).map(|t| t.value.as_str()).collect()
    }

    /// The first of possibly several traits called `name`.
    pub fn first<'a>(&'a self, name: &'a str) -> Option<&'a Trait> {
        self.all(name).next()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|t| t.name == name)
    }

    /// Remove every trait called `name`; returns how many were removed.
    pub fn remove_all(&mut self, name: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|t| t.name != name);
        before - self.0.len()
    }

    /// Replace all traits called `name` with one trait per value, appended
    /// at the end in the given order.
    pub fn set_values<I, V>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.remove_all(name);
        for v in values {
            self.0.push(Trait::new(name, v));
        }
    }

    /// Remove and return the first trait matching `predicate`.
    pub fn take_first(&mut self, predicate: impl Fn(&Trait) -> bool) -> Option<Trait> {
        let index = self.0.iter().position(predicate)?;
        Some(self.0.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trait> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Trait>> for Traits {
    fn from(v: Vec<Trait>) -> Self {
        Self(v)
    }
}

impl FromIterator<Trait> for Traits {
    fn from_iter<I: IntoIterator<Item = Trait>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Traits {
    type Item = &'a Trait;
    type IntoIter = std::slice::Iter<'a, Trait>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Traits {
    type Item = Trait;
    type IntoIter = std::vec::IntoIter<Trait>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
