//! Language-keyed text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The same content in several languages, keyed by language code.
///
/// Languages keep insertion order, but order carries no meaning for
/// equality or for LIFT. An empty `Multitext` is a valid value and is
/// distinct from an absent field (`Option<Multitext>` where that matters).
///
/// Equality compares the language/text pairs regardless of order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multitext(IndexMap<String, String>);

impl Multitext {
    /// Create an empty multitext.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a multitext holding a single language.
    pub fn single(lang: impl Into<String>, text: impl Into<String>) -> Self {
        let mut mt = Self::new();
        mt.set(lang, text);
        mt
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.set(lang, text);
        self
    }

    /// Set the text for a language, replacing any previous value.
    pub fn set(&mut self, lang: impl Into<String>, text: impl Into<String>) {
        self.0.insert(lang.into(), text.into());
    }

    /// Text for a language.
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    /// Remove a language, returning its text.
    pub fn remove(&mut self, lang: &str) -> Option<String> {
        self.0.shift_remove(lang)
    }

    pub fn contains_lang(&self, lang: &str) -> bool {
        self.0.contains_key(lang)
    }

    /// No languages at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every language value is empty or whitespace (or there are none).
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|v| v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(lang, text)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn langs(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Text to display for `lang`: that language if non-empty, otherwise
    /// the first non-empty value in insertion order.
    pub fn display(&self, lang: &str) -> Option<&str> {
        self.get(lang)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.0.values().map(String::as_str).find(|t| !t.trim().is_empty()))
    }

    /// Copy languages from `other`; languages already present are overwritten.
    pub fn merge(&mut self, other: Multitext) {
        for (lang, text) in other.0 {
            self.0.insert(lang, text);
        }
    }
}

impl<L: Into<String>, T: Into<String>> FromIterator<(L, T)> for Multitext {
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        let mut mt = Self::new();
        for (lang, text) in iter {
            mt.set(lang, text);
        }
        mt
    }
}

impl<'a> IntoIterator for &'a Multitext {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
