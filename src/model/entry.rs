//! The entry, top of the document model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::base::constants::{COMPONENT_LEXEME, VARIANT_TYPE_TRAIT};
use crate::base::{Annotation, Extension, Multitext, Traits};

use super::relation::{Relation, Variant, VariantLink};
use super::sense::Sense;

/// A dictionary entry.
///
/// An empty `id` means "not created yet" (the state the editing UI starts
/// from). Entries are never deleted through this type; an entry that is left
/// out of the next save is gone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default, rename = "dateCreated", skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default, rename = "dateModified", skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    /// Display disambiguator, written as the LIFT `order` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homograph_number: Option<u32>,
    #[serde(default)]
    pub lexical_unit: Multitext,
    #[serde(default)]
    pub citation_form: Multitext,
    #[serde(default)]
    pub pronunciations: Vec<Pronunciation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammatical_info: Option<GrammaticalInfo>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub etymologies: Vec<Etymology>,
    #[serde(default)]
    pub notes: IndexMap<String, Multitext>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub traits: Traits,
    #[serde(default)]
    pub senses: Vec<Sense>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Entry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_lexical_unit(mut self, lang: impl Into<String>, text: impl Into<String>) -> Self {
        self.lexical_unit.set(lang, text);
        self
    }

    /// Append a sense, numbering it after the current highest `order`
    /// (saturating at `u32::MAX`).
    pub fn with_sense(mut self, sense: Sense) -> Self {
        self.add_sense(sense);
        self
    }

    pub fn add_sense(&mut self, mut sense: Sense) -> &mut Sense {
        sense.order = self.senses.iter().map(|s| s.order.saturating_add(1)).max().unwrap_or(0);
        self.senses.push(sense);
        let last = self.senses.len() - 1;
        &mut self.senses[last]
    }

    pub fn headword(&self, lang: &str) -> Option<&str> {
        self.lexical_unit.display(lang)
    }

    pub fn sense(&self, id: &str) -> Option<&Sense> {
        self.senses.iter().find(|s| s.id == id)
    }

    pub fn sense_mut(&mut self, id: &str) -> Option<&mut Sense> {
        self.senses.iter_mut().find(|s| s.id == id)
    }

    /// Senses in `order` sequence; ties keep list position.
    pub fn sorted_senses(&self) -> Vec<&Sense> {
        let mut senses: Vec<&Sense> = self.senses.iter().collect();
        senses.sort_by_key(|s| s.order);
        senses
    }

    /// Sort senses by `order`, then rewrite `order` to match list position.
    pub fn renumber_senses(&mut self) {
        self.senses.sort_by_key(|s| s.order);
        for (i, sense) in self.senses.iter_mut().enumerate() {
            sense.order = i as u32;
        }
    }

    /// Both variant encodings: `variant` elements first, then
    /// `_component-lexeme` relations carrying a `variant-type` trait.
    pub fn variant_links(&self) -> Vec<VariantLink<'_>> {
        self.variants
            .iter()
            .map(VariantLink::Element)
            .chain(
                self.relations
                    .iter()
                    .filter(|r| r.is_variant_link())
                    .map(VariantLink::Relation),
            )
            .collect()
    }

    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty() || self.relations.iter().any(Relation::is_variant_link)
    }

    /// Record that this entry is a variant of `target`.
    ///
    /// New links are always written as a `_component-lexeme` relation with a
    /// `variant-type` trait; `variant` elements are still read.
    pub fn add_variant_of(&mut self, target: impl Into<String>, variant_type: impl Into<String>) {
        self.relations.push(
            Relation::new(COMPONENT_LEXEME, target).with_trait(VARIANT_TYPE_TRAIT, variant_type),
        );
    }

    /// Give the entry a fresh `<headword>_<uuid>` id when it has none.
    pub fn ensure_id(&mut self) -> &str {
        if self.id.trim().is_empty() {
            let uuid = uuid::Uuid::new_v4();
            self.id = match self.lexical_unit.display("") {
                Some(head) => format!("{}_{uuid}", head.trim()),
                None => uuid.to_string(),
            };
        }
        &self.id
    }

    /// Fields that keep this entry from being saved as-is.
    ///
    /// The entry parsed fine; these are gaps in the data, not parse errors.
    pub fn incomplete_fields(&self) -> Vec<Incomplete> {
        let mut gaps = Vec::new();
        if self.id.trim().is_empty() {
            gaps.push(Incomplete::MissingId);
        }
        if self.lexical_unit.is_blank() {
            gaps.push(Incomplete::EmptyLexicalUnit);
        }
        for sense in self.senses.iter().flat_map(Sense::descendants) {
            if sense.id.trim().is_empty() {
                gaps.push(Incomplete::SenseMissingId { order: sense.order });
            }
        }
        gaps
    }

    pub fn is_complete(&self) -> bool {
        self.incomplete_fields().is_empty()
    }
}

/// A gap reported by [`Entry::incomplete_fields`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Incomplete {
    MissingId,
    EmptyLexicalUnit,
    SenseMissingId { order: u32 },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pronunciation {
    #[serde(default)]
    pub form: Multitext,
    /// `href` of the `media` child (an audio file name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Pronunciation {
    pub fn new(form: Multitext) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn with_audio(mut self, href: impl Into<String>) -> Self {
        self.audio_ref = Some(href.into());
        self
    }
}

/// `grammatical-info`: a part-of-speech value plus sub-feature traits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammaticalInfo {
    pub value: String,
    #[serde(default, skip_serializing_if = "Traits::is_empty")]
    pub traits: Traits,
}

impl GrammaticalInfo {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            traits: Traits::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Etymology {
    #[serde(default)]
    pub source: String,
    #[serde(default, rename = "type")]
    pub etymology_type: String,
    #[serde(default)]
    pub form: Multitext,
    #[serde(default)]
    pub gloss: Multitext,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Etymology {
    pub fn new(etymology_type: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            etymology_type: etymology_type.into(),
            ..Self::default()
        }
    }
}
