//! LIFT reader: element tree → document model.

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::base::constants::{DEFAULT_NOTE_TYPE, NO_LANG, tag};
use crate::base::{Annotation, Extension, Multitext, Trait};
use crate::config::ParserConfig;
use crate::model::{
    Entry, Etymology, Example, GrammaticalInfo, Pronunciation, Relation, Reversal, Sense,
    Translation, Variant,
};
use crate::xml::{XmlNode, parse_tree};

use super::ParseError;

/// A whole `lift` document.
///
/// Entries that failed to convert are listed in `failures`; the rest of the
/// document is still returned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LiftDocument {
    pub version: Option<String>,
    pub producer: Option<String>,
    /// The `header` element, kept opaque.
    pub header: Option<Extension>,
    pub entries: Vec<Entry>,
    pub failures: Vec<EntryFailure>,
}

/// One `entry` element that could not be converted.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryFailure {
    /// Position among the document's `entry` elements.
    pub index: usize,
    /// The `id` attribute, if the element had one.
    pub id: Option<String>,
    pub error: ParseError,
}

/// Converts LIFT XML into [`Entry`] values.
pub struct LiftReader<'c> {
    config: &'c ParserConfig,
}

impl<'c> LiftReader<'c> {
    pub fn new(config: &'c ParserConfig) -> Self {
        Self { config }
    }

    /// Read a single entry. The root may be `entry`, or a `lift` document
    /// whose first entry is taken.
    pub fn read_entry(&self, input: &[u8]) -> Result<Entry, ParseError> {
        let root = parse_tree(input, self.config.max_xml_depth)?;
        if root.is(tag::ENTRY) {
            return self.entry(&root);
        }
        if root.is(tag::LIFT) {
            let first = root
                .child(tag::ENTRY)
                .ok_or_else(|| ParseError::invalid("lift document contains no entry"))?;
            return self.entry(first);
        }
        Err(ParseError::invalid(format!(
            "expected <entry> or <lift>, found <{}>",
            root.name
        )))
    }

    /// Read every entry of a document, isolating per-entry failures.
    pub fn read_document(&self, input: &[u8]) -> Result<LiftDocument, ParseError> {
        let root = parse_tree(input, self.config.max_xml_depth)?;
        if root.is(tag::ENTRY) {
            return Ok(LiftDocument {
                entries: vec![self.entry(&root)?],
                ..LiftDocument::default()
            });
        }
        if !root.is(tag::LIFT) {
            return Err(ParseError::invalid(format!(
                "expected <lift> root, found <{}>",
                root.name
            )));
        }

        let entry_nodes: Vec<&XmlNode> = root.children(tag::ENTRY).collect();
        let results: Vec<Result<Entry, ParseError>> =
            entry_nodes.par_iter().map(|node| self.entry(node)).collect();

        let mut document = LiftDocument {
            version: root.attr_non_empty("version"),
            producer: root.attr_non_empty("producer"),
            header: root.child("header").map(XmlNode::to_extension),
            ..LiftDocument::default()
        };
        for (index, (node, result)) in entry_nodes.iter().zip(results).enumerate() {
            match result {
                Ok(entry) => document.entries.push(entry),
                Err(error) => {
                    let id = node.attr_non_empty("id");
                    warn!(index, id = ?id, %error, "skipping invalid entry");
                    document.failures.push(EntryFailure { index, id, error });
                }
            }
        }
        Ok(document)
    }

    // ------------------------------------------------------------------
    // entry
    // ------------------------------------------------------------------

    fn entry(&self, node: &XmlNode) -> Result<Entry, ParseError> {
        if let Some(error) = &node.overflow {
            return Err(error.clone());
        }
        let mut entry = Entry {
            id: node.attr("id").map(str::trim).unwrap_or_default().to_string(),
            guid: node.attr_non_empty("guid"),
            date_created: node.attr_non_empty("dateCreated"),
            date_modified: node.attr_non_empty("dateModified"),
            homograph_number: node.attr("order").and_then(homograph_number),
            ..Entry::default()
        };

        let mut sense_position = 0u32;
        for child in node.elements() {
            match child.lift_name() {
                Some(tag::LEXICAL_UNIT) => entry.lexical_unit.merge(forms(child)),
                Some(tag::CITATION) => entry.citation_form.merge(forms(child)),
                Some(tag::PRONUNCIATION) => entry.pronunciations.push(pronunciation(child)),
                Some(tag::VARIANT) => entry.variants.push(variant(child)),
                Some(tag::GRAMMATICAL_INFO) if entry.grammatical_info.is_none() => {
                    entry.grammatical_info = Some(grammatical_info(child));
                }
                Some(tag::RELATION) => entry.relations.push(relation(child)),
                Some(tag::NOTE) => add_note(&mut entry.notes, child),
                Some(tag::ETYMOLOGY) => entry.etymologies.push(etymology(child)),
                Some(tag::ANNOTATION) => entry.annotations.push(annotation(child)),
                Some(tag::TRAIT) => entry.traits.push(trait_element(child)),
                Some(tag::SENSE) => {
                    entry.senses.push(self.sense(child, 1, sense_position)?);
                    sense_position += 1;
                }
                _ => entry.extensions.push(extension(child, "entry")),
            }
        }

        if entry.id.is_empty() && entry.lexical_unit.is_empty() {
            return Err(ParseError::invalid("entry has neither an id nor a lexical-unit"));
        }
        Ok(entry)
    }

    // ------------------------------------------------------------------
    // sense (recursive through subsense)
    // ------------------------------------------------------------------

    fn sense(&self, node: &XmlNode, depth: usize, position: u32) -> Result<Sense, ParseError> {
        if depth > self.config.max_depth {
            return Err(ParseError::recursion_limit(tag::SUBSENSE, self.config.max_depth));
        }
        let mut sense = Sense {
            id: node.attr("id").map(str::trim).unwrap_or_default().to_string(),
            order: order_attr(node, position),
            ..Sense::default()
        };

        let mut subsense_position = 0u32;
        for child in node.elements() {
            match child.lift_name() {
                Some(tag::GRAMMATICAL_INFO) if sense.grammatical_info.is_none() => {
                    sense.grammatical_info = Some(grammatical_info(child));
                }
                Some(tag::GLOSS) => {
                    let (lang, text) = form(child);
                    sense.glosses.set(lang, text);
                }
                Some(tag::DEFINITION) => sense.definitions.merge(forms(child)),
                Some(tag::RELATION) => sense.relations.push(relation(child)),
                Some(tag::NOTE) => add_note(&mut sense.notes, child),
                Some(tag::EXAMPLE) => sense.examples.push(example(child)),
                Some(tag::REVERSAL) => sense.reversals.push(self.reversal(child, 1)?),
                Some(tag::TRAIT) => sense.traits.push(trait_element(child)),
                Some(tag::ANNOTATION) => sense.annotations.push(annotation(child)),
                Some(tag::SUBSENSE) => {
                    sense
                        .subsenses
                        .push(self.sense(child, depth + 1, subsense_position)?);
                    subsense_position += 1;
                }
                _ => sense.extensions.push(extension(child, "sense")),
            }
        }
        Ok(sense)
    }

    // ------------------------------------------------------------------
    // reversal (recursive through main)
    // ------------------------------------------------------------------

    fn reversal(&self, node: &XmlNode, depth: usize) -> Result<Reversal, ParseError> {
        if depth > self.config.max_depth {
            return Err(ParseError::recursion_limit(tag::MAIN, self.config.max_depth));
        }
        let mut reversal = Reversal {
            reversal_type: node.attr_non_empty("type"),
            ..Reversal::default()
        };
        for child in node.elements() {
            match child.lift_name() {
                Some(tag::FORM) => {
                    let (lang, text) = form(child);
                    reversal.forms.set(lang, text);
                }
                Some(tag::GRAMMATICAL_INFO) if reversal.grammatical_info.is_none() => {
                    reversal.grammatical_info = Some(grammatical_info(child));
                }
                Some(tag::MAIN) if reversal.main.is_none() => {
                    reversal.main = Some(Box::new(self.reversal(child, depth + 1)?));
                }
                _ => reversal.extensions.push(extension(child, "reversal")),
            }
        }
        Ok(reversal)
    }
}

// ============================================================================
// LEAF CONSTRUCTS
// ============================================================================

/// A `form` (or form-like `gloss`) element: `lang` attribute plus `text` child.
fn form(node: &XmlNode) -> (String, String) {
    let lang = node.attr_non_empty("lang").unwrap_or_else(|| NO_LANG.to_string());
    let text = match node.child(tag::TEXT) {
        Some(text) => text.inner_text(),
        None => node.text().trim().to_string(),
    };
    (lang, text)
}

/// Every `form` child of a multitext element. `text` children that carry
/// their own `lang` (seen in ranges files) are accepted as well.
pub(crate) fn forms(node: &XmlNode) -> Multitext {
    let mut mt = Multitext::new();
    for child in node.elements() {
        match child.lift_name() {
            Some(tag::FORM) => {
                let (lang, text) = form(child);
                mt.set(lang, text);
            }
            Some(tag::TEXT) => {
                let lang = child.attr_non_empty("lang").unwrap_or_else(|| NO_LANG.to_string());
                mt.set(lang, child.inner_text());
            }
            _ => {}
        }
    }
    mt
}

fn add_note(notes: &mut IndexMap<String, Multitext>, node: &XmlNode) {
    let note_type = node
        .attr_non_empty("type")
        .unwrap_or_else(|| DEFAULT_NOTE_TYPE.to_string());
    let content = forms(node);
    match notes.get_mut(&note_type) {
        Some(existing) => {
            debug!(note_type = %note_type, "merging repeated note type");
            existing.merge(content);
        }
        None => {
            notes.insert(note_type, content);
        }
    }
}

fn trait_element(node: &XmlNode) -> Trait {
    Trait {
        name: node.attr("name").unwrap_or_default().to_string(),
        value: node.attr("value").unwrap_or_default().to_string(),
        annotations: node.children(tag::ANNOTATION).map(annotation).collect(),
    }
}

fn annotation(node: &XmlNode) -> Annotation {
    let name = node.attr("name").unwrap_or_default().to_string();
    if name.is_empty() {
        debug!("annotation without a name");
    }
    Annotation {
        name,
        value: node.attr_non_empty("value"),
        who: node.attr_non_empty("who"),
        when: node.attr_non_empty("when"),
        content: forms(node),
    }
}

fn grammatical_info(node: &XmlNode) -> GrammaticalInfo {
    GrammaticalInfo {
        value: node.attr("value").unwrap_or_default().to_string(),
        traits: node.children(tag::TRAIT).map(trait_element).collect(),
    }
}

fn relation(node: &XmlNode) -> Relation {
    let mut relation = Relation {
        relation_type: node.attr("type").unwrap_or_default().to_string(),
        ref_id: node.attr("ref").unwrap_or_default().to_string(),
        order: node.attr("order").and_then(|o| o.trim().parse().ok()),
        ..Relation::default()
    };
    for child in node.elements() {
        match child.lift_name() {
            Some(tag::TRAIT) => relation.traits.push(trait_element(child)),
            _ => relation.extensions.push(extension(child, "relation")),
        }
    }
    relation
}

fn pronunciation(node: &XmlNode) -> Pronunciation {
    let mut pron = Pronunciation::default();
    for child in node.elements() {
        match child.lift_name() {
            Some(tag::FORM) => {
                let (lang, text) = form(child);
                pron.form.set(lang, text);
            }
            Some(tag::MEDIA) if pron.audio_ref.is_none() && child.attr("href").is_some() => {
                pron.audio_ref = child.attr_non_empty("href");
            }
            _ => pron.extensions.push(extension(child, "pronunciation")),
        }
    }
    pron
}

fn variant(node: &XmlNode) -> Variant {
    let mut variant = Variant {
        ref_id: node.attr_non_empty("ref"),
        ..Variant::default()
    };
    for child in node.elements() {
        match child.lift_name() {
            Some(tag::FORM) => {
                let (lang, text) = form(child);
                variant.form.set(lang, text);
            }
            Some(tag::TRAIT) => variant.traits.push(trait_element(child)),
            Some(tag::PRONUNCIATION) => variant.pronunciations.push(pronunciation(child)),
            Some(tag::RELATION) => variant.relations.push(relation(child)),
            _ => variant.extensions.push(extension(child, "variant")),
        }
    }
    variant.normalize();
    variant
}

fn etymology(node: &XmlNode) -> Etymology {
    let mut etymology = Etymology {
        source: node.attr("source").unwrap_or_default().to_string(),
        etymology_type: node.attr("type").unwrap_or_default().to_string(),
        ..Etymology::default()
    };
    for child in node.elements() {
        match child.lift_name() {
            Some(tag::FORM) => {
                let (lang, text) = form(child);
                etymology.form.set(lang, text);
            }
            Some(tag::GLOSS) => {
                let (lang, text) = form(child);
                etymology.gloss.set(lang, text);
            }
            _ => etymology.extensions.push(extension(child, "etymology")),
        }
    }
    etymology
}

fn example(node: &XmlNode) -> Example {
    let mut example = Example {
        source: node.attr_non_empty("source"),
        ..Example::default()
    };
    for child in node.elements() {
        match child.lift_name() {
            Some(tag::FORM) => {
                let (lang, text) = form(child);
                example.forms.set(lang, text);
            }
            Some(tag::TRANSLATION) => example.translations.push(Translation {
                translation_type: child.attr_non_empty("type"),
                form: forms(child),
            }),
            Some(tag::NOTE) => add_note(&mut example.notes, child),
            _ => example.extensions.push(extension(child, "example")),
        }
    }
    example
}

fn extension(node: &XmlNode, owner: &'static str) -> Extension {
    debug!(owner, element = %node.name, "keeping unsupported element as extension");
    node.to_extension()
}

/// Entry `order`: a positive homograph number. Zero or junk is dropped.
fn homograph_number(raw: &str) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(_) => {
            warn!(value = raw, "ignoring unparsable homograph number");
            None
        }
    }
}

/// Sense `order`, falling back to the sense's position among its siblings.
fn order_attr(node: &XmlNode, position: u32) -> u32 {
    match node.attr("order").map(str::trim) {
        None | Some("") => position,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(value = raw, position, "unparsable sense order, using position");
            position
        }),
    }
}
