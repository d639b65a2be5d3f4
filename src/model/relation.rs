//! Links between entries and senses.

use serde::{Deserialize, Serialize};

use crate::base::constants::{COMPONENT_LEXEME, TYPE_TRAIT, VARIANT_TYPE_TRAIT};
use crate::base::{Extension, Multitext, Traits};

use super::entry::Pronunciation;

/// A typed link to another entry or sense.
///
/// `ref_id` is whatever the document says; it is never checked against the
/// store, so a relation may point at something that does not exist yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(rename = "type")]
    pub relation_type: String,
    #[serde(rename = "ref")]
    pub ref_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Traits::is_empty")]
    pub traits: Traits,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Relation {
    pub fn new(relation_type: impl Into<String>, ref_id: impl Into<String>) -> Self {
        Self {
            relation_type: relation_type.into(),
            ref_id: ref_id.into(),
            ..Self::default()
        }
    }

    pub fn with_trait(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.traits = self.traits.with(name, value);
        self
    }

    /// A `_component-lexeme` relation carrying a `variant-type` trait is the
    /// relation encoding of "this entry is a variant of `ref_id`".
    pub fn is_variant_link(&self) -> bool {
        self.relation_type == COMPONENT_LEXEME && self.traits.contains(VARIANT_TYPE_TRAIT)
    }

    /// Values of every `variant-type` trait.
    pub fn variant_types(&self) -> Vec<&str> {
        self.traits.values(VARIANT_TYPE_TRAIT)
    }
}

/// A `variant` element: an alternative form of the entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Optional `ref` attribute naming the variant's own entry.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(default)]
    pub form: Multitext,
    /// Value of the `type` trait, if any.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub variant_type: Option<String>,
    /// Traits other than the one carried in `variant_type`.
    #[serde(default, skip_serializing_if = "Traits::is_empty")]
    pub traits: Traits,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pronunciations: Vec<Pronunciation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Relation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Variant {
    pub fn new(form: Multitext) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, variant_type: impl Into<String>) -> Self {
        self.variant_type = Some(variant_type.into());
        self
    }

    /// Move the first un-annotated `type` trait into `variant_type` when the
    /// field is unset. The writer emits `variant_type` as exactly such a
    /// trait, so only a normalized variant survives a write/read cycle
    /// unchanged; the reader always returns normalized variants.
    pub fn normalize(&mut self) {
        if self.variant_type.is_some() {
            return;
        }
        if let Some(t) = self
            .traits
            .take_first(|t| t.name == TYPE_TRAIT && t.annotations.is_empty())
        {
            self.variant_type = Some(t.value);
        }
    }

    /// The variant type from the dedicated field, or failing that from a
    /// `variant-type`/`type` trait left in the bag.
    pub fn effective_type(&self) -> Option<&str> {
        self.variant_type.as_deref().or_else(|| {
            self.traits
                .first(VARIANT_TYPE_TRAIT)
                .or_else(|| self.traits.first(TYPE_TRAIT))
                .map(|t| t.value.as_str())
        })
    }
}

/// One of the two LIFT encodings of a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariantLink<'a> {
    Element(&'a Variant),
    Relation(&'a Relation),
}

impl<'a> VariantLink<'a> {
    /// The variant type, whichever encoding carries it.
    pub fn variant_type(&self) -> Option<&'a str> {
        match self {
            Self::Element(v) => v.effective_type(),
            Self::Relation(r) => r.variant_types().into_iter().next(),
        }
    }

    /// The entry this variant points at, if the encoding names one.
    pub fn target(&self) -> Option<&'a str> {
        match self {
            Self::Element(v) => v.ref_id.as_deref(),
            Self::Relation(r) => Some(r.ref_id.as_str()),
        }
    }
}
