//! Senses and the constructs that hang off them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::base::{Annotation, Extension, Multitext, Traits};

use super::entry::GrammaticalInfo;
use super::relation::Relation;

/// One meaning of an entry.
///
/// `order` is authoritative for output order. It can drift away from the
/// position in `Entry::senses` after inserts and deletes, and the
/// serializer follows `order`, not the list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammatical_info: Option<GrammaticalInfo>,
    #[serde(default)]
    pub glosses: Multitext,
    #[serde(default)]
    pub definitions: Multitext,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub notes: IndexMap<String, Multitext>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub reversals: Vec<Reversal>,
    #[serde(default)]
    pub traits: Traits,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsenses: Vec<Sense>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Sense {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_gloss(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.glosses.set(lang, text);
        self
    }

    pub fn with_definition(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.definitions.set(lang, text);
        self
    }

    pub fn with_trait(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.traits = self.traits.with(name, value);
        self
    }

    /// Give the sense a fresh id when it has none.
    pub fn ensure_id(&mut self) -> &str {
        if self.id.trim().is_empty() {
            self.id = uuid::Uuid::new_v4().to_string();
        }
        &self.id
    }

    /// This sense followed by all nested subsenses, depth first.
    pub fn descendants(&self) -> Vec<&Sense> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(sense) = stack.pop() {
            out.push(sense);
            stack.extend(sense.subsenses.iter().rev());
        }
        out
    }
}

/// An example sentence with its translations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub forms: Multitext,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub notes: IndexMap<String, Multitext>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Example {
    pub fn new(forms: Multitext) -> Self {
        Self {
            forms,
            ..Self::default()
        }
    }

    pub fn with_translation(mut self, translation: Translation) -> Self {
        self.translations.push(translation);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub translation_type: Option<String>,
    #[serde(default)]
    pub form: Multitext,
}

impl Translation {
    pub fn new(form: Multitext) -> Self {
        Self {
            translation_type: None,
            form,
        }
    }

    pub fn with_type(mut self, translation_type: impl Into<String>) -> Self {
        self.translation_type = Some(translation_type.into());
        self
    }
}

/// A sense's place in a reversal index.
///
/// `main` points at the broader reversal term this one sits under; nesting
/// has no fixed depth.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reversal {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub reversal_type: Option<String>,
    #[serde(default)]
    pub forms: Multitext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammatical_info: Option<GrammaticalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<Box<Reversal>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Reversal {
    pub fn new(forms: Multitext) -> Self {
        Self {
            forms,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, reversal_type: impl Into<String>) -> Self {
        self.reversal_type = Some(reversal_type.into());
        self
    }

    pub fn with_main(mut self, main: Reversal) -> Self {
        self.main = Some(Box::new(main));
        self
    }

    /// The chain from this term up through its `main` terms.
    pub fn path(&self) -> Vec<&Reversal> {
        let mut out = vec![self];
        let mut current = self;
        while let Some(main) = current.main.as_deref() {
            out.push(main);
            current = main;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_id_keeps_existing() {
        let mut sense = Sense::new("s1");
        assert_eq!(sense.ensure_id(), "s1");

        let mut blank = Sense::default();
        let generated = blank.ensure_id().to_string();
        assert!(!generated.is_empty());
        assert_eq!(blank.ensure_id(), generated);
    }

    #[test]
    fn test_descendants_are_depth_first() {
        let mut root = Sense::new("a");
        let mut b = Sense::new("b");
        b.subsenses.push(Sense::new("c"));
        root.subsenses.push(b);
        root.subsenses.push(Sense::new("d"));

        let ids: Vec<_> = root.descendants().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_reversal_path_walks_main_chain() {
        let rev = Reversal::new(Multitext::single("en", "cat")).with_main(
            Reversal::new(Multitext::single("en", "feline"))
                .with_main(Reversal::new(Multitext::single("en", "animal"))),
        );
        let path: Vec<_> = rev.path().iter().filter_map(|r| r.forms.get("en")).collect();
        assert_eq!(path, vec!["cat", "feline", "animal"]);
    }
}
