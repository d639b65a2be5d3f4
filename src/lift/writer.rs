//! LIFT writer: document model → XML text.
//!
//! Element order inside an entry is fixed:
//!
//! ```text
//! lexical-unit, citation, pronunciation*, variant*, grammatical-info,
//! relation*, note*, etymology*, annotation*, trait*, sense*, <extensions>
//! ```
//!
//! and inside a sense:
//!
//! ```text
//! grammatical-info, gloss*, definition, relation*, note*, example*,
//! reversal*, trait*, annotation*, subsense*, <extensions>
//! ```
//!
//! Every item of a list field becomes its own element. Nothing is merged,
//! deduplicated or joined, and `ref` values are written as they are.

use indexmap::IndexMap;

use crate::base::constants::{LIFT_NAMESPACE, LIFT_VERSION, NO_LANG, TYPE_TRAIT, tag};
use crate::base::{Annotation, Multitext, Trait};
use crate::config::SerializerConfig;
use crate::model::{
    Entry, Etymology, Example, GrammaticalInfo, Pronunciation, Relation, Reversal, Sense, Variant,
};
use crate::xml::XmlWriter;

use super::SerializeError;

/// Writes [`Entry`] values as LIFT XML.
pub struct LiftWriter<'c> {
    config: &'c SerializerConfig,
}

impl<'c> LiftWriter<'c> {
    pub fn new(config: &'c SerializerConfig) -> Self {
        Self { config }
    }

    /// A bare `entry` element, no declaration or namespace.
    pub fn write_entry(&self, entry: &Entry) -> Result<String, SerializeError> {
        let mut w = XmlWriter::new(self.config.indent);
        entry_element(&mut w, entry)?;
        w.finish()
    }

    /// A complete `lift` document.
    pub fn write_document(&self, entries: &[Entry]) -> Result<String, SerializeError> {
        let mut w = XmlWriter::new(self.config.indent);
        w.declaration()?;
        let mut attrs = vec![("xmlns", LIFT_NAMESPACE), ("version", LIFT_VERSION)];
        if let Some(producer) = self.config.producer.as_deref() {
            attrs.push(("producer", producer));
        }
        w.start(tag::LIFT, &attrs)?;
        for entry in entries {
            entry_element(&mut w, entry)?;
        }
        w.end(tag::LIFT)?;
        let mut out = w.finish()?;
        out.push('\n');
        Ok(out)
    }
}

// ============================================================================
// ENTRY / SENSE
// ============================================================================

fn entry_element(w: &mut XmlWriter, entry: &Entry) -> Result<(), SerializeError> {
    // Homograph numbers start at 1; zero means "none".
    let homograph = entry.homograph_number.filter(|&n| n > 0).map(|n| n.to_string());
    let mut attrs: Vec<(&str, &str)> = Vec::new();
    if !entry.id.is_empty() {
        attrs.push(("id", entry.id.as_str()));
    }
    push_opt(&mut attrs, "guid", entry.guid.as_deref());
    push_opt(&mut attrs, "dateCreated", entry.date_created.as_deref());
    push_opt(&mut attrs, "dateModified", entry.date_modified.as_deref());
    push_opt(&mut attrs, "order", homograph.as_deref());
    w.start(tag::ENTRY, &attrs)?;

    multitext_element(w, tag::LEXICAL_UNIT, &entry.lexical_unit)?;
    multitext_element(w, tag::CITATION, &entry.citation_form)?;
    for p in &entry.pronunciations {
        pronunciation(w, p)?;
    }
    for v in &entry.variants {
        variant(w, v)?;
    }
    if let Some(gi) = &entry.grammatical_info {
        grammatical_info(w, gi)?;
    }
    for r in &entry.relations {
        relation(w, r)?;
    }
    notes(w, &entry.notes)?;
    for e in &entry.etymologies {
        etymology(w, e)?;
    }
    for a in &entry.annotations {
        annotation(w, a)?;
    }
    for t in &entry.traits {
        trait_element(w, t)?;
    }
    for s in sorted(&entry.senses) {
        sense(w, s, tag::SENSE)?;
    }
    for ext in &entry.extensions {
        w.extension(ext)?;
    }

    w.end(tag::ENTRY)
}

fn sense(w: &mut XmlWriter, sense: &Sense, element: &str) -> Result<(), SerializeError> {
    let order = sense.order.to_string();
    let mut attrs: Vec<(&str, &str)> = Vec::new();
    if !sense.id.is_empty() {
        attrs.push(("id", sense.id.as_str()));
    }
    attrs.push(("order", order.as_str()));
    w.start(element, &attrs)?;

    if let Some(gi) = &sense.grammatical_info {
        grammatical_info(w, gi)?;
    }
    for (lang, text) in sense.glosses.iter() {
        form_like(w, tag::GLOSS, lang, text)?;
    }
    multitext_element(w, tag::DEFINITION, &sense.definitions)?;
    for r in &sense.relations {
        relation(w, r)?;
    }
    notes(w, &sense.notes)?;
    for ex in &sense.examples {
        example(w, ex)?;
    }
    for rev in &sense.reversals {
        reversal(w, rev, tag::REVERSAL)?;
    }
    for t in &sense.traits {
        trait_element(w, t)?;
    }
    for a in &sense.annotations {
        annotation(w, a)?;
    }
    for sub in sorted(&sense.subsenses) {
        self::sense(w, sub, tag::SUBSENSE)?;
    }
    for ext in &sense.extensions {
        w.extension(ext)?;
    }

    w.end(element)
}

fn sorted(senses: &[Sense]) -> Vec<&Sense> {
    let mut out: Vec<&Sense> = senses.iter().collect();
    out.sort_by_key(|s| s.order);
    out
}

// ============================================================================
// LEAF CONSTRUCTS
// ============================================================================

/// `<form lang><text>..</text></form>` for each language; the "no language"
/// key is written without a `lang` attribute.
fn forms(w: &mut XmlWriter, mt: &Multitext) -> Result<(), SerializeError> {
    for (lang, text) in mt.iter() {
        form_like(w, tag::FORM, lang, text)?;
    }
    Ok(())
}

fn form_like(w: &mut XmlWriter, element: &str, lang: &str, text: &str) -> Result<(), SerializeError> {
    if lang == NO_LANG {
        w.start(element, &[])?;
    } else {
        w.start(element, &[("lang", lang)])?;
    }
    w.text_element(tag::TEXT, &[], text)?;
    w.end(element)
}

/// Wrapper element around forms; an empty multitext writes nothing.
pub(crate) fn multitext_element(w: &mut XmlWriter, element: &str, mt: &Multitext) -> Result<(), SerializeError> {
    if mt.is_empty() {
        return Ok(());
    }
    w.start(element, &[])?;
    forms(w, mt)?;
    w.end(element)
}

/// One `note` per type. Notes are written even when empty so the type
/// survives a round trip.
fn notes(w: &mut XmlWriter, notes: &IndexMap<String, Multitext>) -> Result<(), SerializeError> {
    for (note_type, content) in notes {
        w.start(tag::NOTE, &[("type", note_type.as_str())])?;
        forms(w, content)?;
        w.end(tag::NOTE)?;
    }
    Ok(())
}

fn trait_element(w: &mut XmlWriter, t: &Trait) -> Result<(), SerializeError> {
    let attrs = [("name", t.name.as_str()), ("value", t.value.as_str())];
    if t.annotations.is_empty() {
        return w.empty(tag::TRAIT, &attrs);
    }
    w.start(tag::TRAIT, &attrs)?;
    for a in &t.annotations {
        annotation(w, a)?;
    }
    w.end(tag::TRAIT)
}

fn annotation(w: &mut XmlWriter, a: &Annotation) -> Result<(), SerializeError> {
    let mut attrs: Vec<(&str, &str)> = vec![("name", a.name.as_str())];
    push_opt(&mut attrs, "value", a.value.as_deref());
    push_opt(&mut attrs, "who", a.who.as_deref());
    push_opt(&mut attrs, "when", a.when.as_deref());
    if a.content.is_empty() {
        return w.empty(tag::ANNOTATION, &attrs);
    }
    w.start(tag::ANNOTATION, &attrs)?;
    forms(w, &a.content)?;
    w.end(tag::ANNOTATION)
}

fn grammatical_info(w: &mut XmlWriter, gi: &GrammaticalInfo) -> Result<(), SerializeError> {
    let attrs = [("value", gi.value.as_str())];
    if gi.traits.is_empty() {
        return w.empty(tag::GRAMMATICAL_INFO, &attrs);
    }
    w.start(tag::GRAMMATICAL_INFO, &attrs)?;
    for t in &gi.traits {
        trait_element(w, t)?;
    }
    w.end(tag::GRAMMATICAL_INFO)
}

fn relation(w: &mut XmlWriter, r: &Relation) -> Result<(), SerializeError> {
    let order = r.order.map(|o| o.to_string());
    let mut attrs: Vec<(&str, &str)> =
        vec![("type", r.relation_type.as_str()), ("ref", r.ref_id.as_str())];
    push_opt(&mut attrs, "order", order.as_deref());
    if r.traits.is_empty() && r.extensions.is_empty() {
        return w.empty(tag::RELATION, &attrs);
    }
    w.start(tag::RELATION, &attrs)?;
    for t in &r.traits {
        trait_element(w, t)?;
    }
    for ext in &r.extensions {
        w.extension(ext)?;
    }
    w.end(tag::RELATION)
}

fn pronunciation(w: &mut XmlWriter, p: &Pronunciation) -> Result<(), SerializeError> {
    w.start(tag::PRONUNCIATION, &[])?;
    forms(w, &p.form)?;
    if let Some(href) = p.audio_ref.as_deref() {
        w.empty(tag::MEDIA, &[("href", href)])?;
    }
    for ext in &p.extensions {
        w.extension(ext)?;
    }
    w.end(tag::PRONUNCIATION)
}

fn variant(w: &mut XmlWriter, v: &Variant) -> Result<(), SerializeError> {
    let mut attrs: Vec<(&str, &str)> = Vec::new();
    push_opt(&mut attrs, "ref", v.ref_id.as_deref());
    w.start(tag::VARIANT, &attrs)?;
    forms(w, &v.form)?;
    if let Some(variant_type) = v.variant_type.as_deref() {
        w.empty(tag::TRAIT, &[("name", TYPE_TRAIT), ("value", variant_type)])?;
    }
    for t in &v.traits {
        trait_element(w, t)?;
    }
    for p in &v.pronunciations {
        pronunciation(w, p)?;
    }
    for r in &v.relations {
        relation(w, r)?;
    }
    for ext in &v.extensions {
        w.extension(ext)?;
    }
    w.end(tag::VARIANT)
}

fn etymology(w: &mut XmlWriter, e: &Etymology) -> Result<(), SerializeError> {
    w.start(
        tag::ETYMOLOGY,
        &[("type", e.etymology_type.as_str()), ("source", e.source.as_str())],
    )?;
    forms(w, &e.form)?;
    for (lang, text) in e.gloss.iter() {
        form_like(w, tag::GLOSS, lang, text)?;
    }
    for ext in &e.extensions {
        w.extension(ext)?;
    }
    w.end(tag::ETYMOLOGY)
}

fn example(w: &mut XmlWriter, ex: &Example) -> Result<(), SerializeError> {
    let mut attrs: Vec<(&str, &str)> = Vec::new();
    push_opt(&mut attrs, "source", ex.source.as_deref());
    w.start(tag::EXAMPLE, &attrs)?;
    forms(w, &ex.forms)?;
    for tr in &ex.translations {
        let mut attrs: Vec<(&str, &str)> = Vec::new();
        push_opt(&mut attrs, "type", tr.translation_type.as_deref());
        w.start(tag::TRANSLATION, &attrs)?;
        forms(w, &tr.form)?;
        w.end(tag::TRANSLATION)?;
    }
    notes(w, &ex.notes)?;
    for ext in &ex.extensions {
        w.extension(ext)?;
    }
    w.end(tag::EXAMPLE)
}

fn reversal(w: &mut XmlWriter, rev: &Reversal, element: &str) -> Result<(), SerializeError> {
    let mut attrs: Vec<(&str, &str)> = Vec::new();
    push_opt(&mut attrs, "type", rev.reversal_type.as_deref());
    w.start(element, &attrs)?;
    forms(w, &rev.forms)?;
    if let Some(main) = rev.main.as_deref() {
        reversal(w, main, tag::MAIN)?;
    }
    if let Some(gi) = &rev.grammatical_info {
        grammatical_info(w, gi)?;
    }
    for ext in &rev.extensions {
        w.extension(ext)?;
    }
    w.end(element)
}

pub(crate) fn push_opt<'a>(attrs: &mut Vec<(&'a str, &'a str)>, key: &'a str, value: Option<&'a str>) {
    if let Some(v) = value {
        attrs.push((key, v));
    }
}
