//! End-to-end tests for the LIFT codec through the public API.

#[path = "helpers/mod.rs"]
mod helpers;

use helpers::{CAT_ENTRY, document, entry_in_namespace};
use lift::config::ParserConfig;
use lift::lift::LiftCodec;
use lift::model::VariantLink;
use lift::{Entry, Multitext, ParseError, Sense, Trait, Variant, parse, parse_all, parse_document, serialize, serialize_all};
use rstest::rstest;

// =============================================================================
// Concrete scenario
// =============================================================================

#[test]
fn test_cat_entry_parses_and_writes_both_traits() {
    let entry = parse(CAT_ENTRY.as_bytes()).unwrap();
    assert_eq!(entry.id, "cat_1");
    assert_eq!(entry.lexical_unit.get("en"), Some("cat"));
    assert_eq!(entry.lexical_unit.len(), 1);
    assert_eq!(
        entry.senses[0].traits.iter().cloned().collect::<Vec<_>>(),
        vec![
            Trait::new("usage-type", "formal"),
            Trait::new("usage-type", "written"),
        ]
    );

    let xml = serialize(&entry).unwrap();
    assert!(xml.contains(r#"<trait name="usage-type" value="formal"/>"#));
    assert!(xml.contains(r#"<trait name="usage-type" value="written"/>"#));
    assert_eq!(xml.matches("<trait ").count(), 2);
}

// =============================================================================
// Round trips
// =============================================================================

#[test]
fn test_rich_entry_round_trip_is_stable() {
    let entry = parse(entry_in_namespace("nyumba_1", true).as_bytes()).unwrap();
    let xml = serialize(&entry).unwrap();
    let again = parse(xml.as_bytes()).unwrap();
    assert_eq!(again, entry);
    assert_eq!(serialize(&again).unwrap(), xml);
}

#[test]
fn test_rich_entry_fields() {
    let entry = parse(entry_in_namespace("nyumba_1", false).as_bytes()).unwrap();
    assert_eq!(entry.pronunciations[0].audio_ref.as_deref(), Some("nyumba.wav"));
    assert_eq!(entry.traits.values("morph-type"), vec!["stem"]);
    assert_eq!(entry.notes["encyclopedic"].get("en"), Some("Built of mud"));
    assert_eq!(entry.etymologies[0].source, "Swahili");

    let sense = &entry.senses[0];
    assert_eq!(sense.glosses.get("en"), Some("house"));
    assert_eq!(sense.definitions.get("en"), Some("a dwelling place"));
    assert_eq!(sense.grammatical_info.as_ref().unwrap().value, "Noun");
    assert_eq!(sense.examples[0].source.as_deref(), Some("field-notes"));
    assert_eq!(
        sense.examples[0].translations[0].translation_type.as_deref(),
        Some("Free translation")
    );
    let main = sense.reversals[0].main.as_deref().unwrap();
    assert_eq!(main.forms.get("en"), Some("building"));
    assert_eq!(sense.annotations[0].who.as_deref(), Some("editor"));
    assert_eq!(sense.subsenses[0].id, "house_s1_1");
    assert_eq!(sense.extensions[0].tag, "illustration");
}

#[test]
fn test_built_entry_round_trip() {
    let mut entry = Entry::new("dog_1").with_lexical_unit("en", "dog");
    entry.add_sense(Sense::new("d1").with_gloss("fr", "chien").with_trait("usage-type", "informal"));
    entry.add_sense(Sense::new("d2").with_definition("en", "a scoundrel"));
    entry.add_variant_of("dogge_1", "Archaic Form");

    let back = parse(serialize(&entry).unwrap().as_bytes()).unwrap();
    assert_eq!(back, entry);
}

#[rstest]
#[case(2)]
#[case(3)]
#[case(5)]
fn test_repeated_traits_survive(#[case] n: usize) {
    let mut sense = Sense::new("s");
    for i in 0..n {
        // Duplicates included.
        let value = if i % 2 == 0 { "formal" } else { "written" };
        sense = sense.with_trait("usage-type", value);
    }
    let entry = Entry::new("e").with_lexical_unit("en", "x").with_sense(sense.clone());
    let back = parse(serialize(&entry).unwrap().as_bytes()).unwrap();
    assert_eq!(back.senses[0].traits, sense.traits);
    assert_eq!(back.senses[0].traits.all("usage-type").count(), n);
}

// =============================================================================
// Tolerance
// =============================================================================

#[test]
fn test_dangling_refs_are_kept_verbatim() {
    let entry = parse(entry_in_namespace("nyumba_1", true).as_bytes()).unwrap();
    let synonym = entry
        .relations
        .iter()
        .find(|r| r.relation_type == "synonym")
        .unwrap();
    assert_eq!(synonym.ref_id, "does-not-exist");
    assert!(serialize(&entry).unwrap().contains(r#"ref="does-not-exist""#));
}

#[rstest]
#[case::default_namespace(true)]
#[case::no_namespace(false)]
fn test_namespace_tolerance(#[case] namespaced: bool) {
    let reference = parse(entry_in_namespace("nyumba_1", false).as_bytes()).unwrap();
    let entry = parse(entry_in_namespace("nyumba_1", namespaced).as_bytes()).unwrap();
    assert_eq!(entry, reference);
}

#[test]
fn test_prefixed_namespace_is_lift() {
    let xml = format!(
        r#"<lift:entry xmlns:lift="{}" id="p"><lift:lexical-unit><lift:form lang="en"><lift:text>p</lift:text></lift:form></lift:lexical-unit></lift:entry>"#,
        helpers::LIFT_NS
    );
    let entry = parse(xml.as_bytes()).unwrap();
    assert_eq!(entry.lexical_unit.get("en"), Some("p"));
}

#[test]
fn test_empty_form_text_round_trips_with_default_indent() {
    let mut entry = Entry::new("e1").with_lexical_unit("en", "cat");
    entry.citation_form.set("fr", "");
    let written = serialize(&entry).unwrap();
    assert_eq!(parse(written.as_bytes()).unwrap(), entry);
}

#[test]
fn test_homograph_zero_is_not_written() {
    let mut entry = Entry::new("e1").with_lexical_unit("en", "cat");
    entry.homograph_number = Some(0);
    let written = serialize(&entry).unwrap();
    assert!(!written.contains("order="));
    assert_eq!(parse(written.as_bytes()).unwrap().homograph_number, None);
}

#[test]
fn test_foreign_element_named_like_lift_stays_an_extension() {
    let xml = r#"<entry id="e1" xmlns:fw="urn:other">
        <lexical-unit><form lang="en"><text>cat</text></form></lexical-unit>
        <fw:sense id="not-a-sense"><fw:gloss>x</fw:gloss></fw:sense>
    </entry>"#;
    let entry = parse(xml.as_bytes()).unwrap();
    assert!(entry.senses.is_empty());
    assert_eq!(entry.extensions.len(), 1);
    assert_eq!(entry.extensions[0].namespace.as_deref(), Some("urn:other"));

    let back = parse(serialize(&entry).unwrap().as_bytes()).unwrap();
    assert!(back.senses.is_empty());
    assert_eq!(back, entry);
}

#[test]
fn test_variant_type_left_in_traits_is_normalized_on_read() {
    let mut variant = Variant::new(Multitext::single("en", "color"));
    variant.traits.push(Trait::new("type", "Spelling Variant"));
    let mut entry = Entry::new("colour_1").with_lexical_unit("en", "colour");
    entry.variants.push(variant.clone());

    let back = parse(serialize(&entry).unwrap().as_bytes()).unwrap();
    variant.normalize();
    assert_eq!(variant.variant_type.as_deref(), Some("Spelling Variant"));
    assert_eq!(back.variants, vec![variant]);
}

#[test]
fn test_both_variant_encodings_are_read() {
    let xml = r#"<entry id="colour_1">
        <lexical-unit><form lang="en"><text>colour</text></form></lexical-unit>
        <variant ref="color_1"><form lang="en"><text>color</text></form><trait name="type" value="Spelling Variant"/></variant>
        <relation type="_component-lexeme" ref="kolor_1"><trait name="variant-type" value="Dialectal Variant"/></relation>
    </entry>"#;
    let entry = parse(xml.as_bytes()).unwrap();
    let links = entry.variant_links();
    assert_eq!(links.len(), 2);
    assert!(matches!(links[0], VariantLink::Element(_)));
    assert_eq!(links[0].variant_type(), Some("Spelling Variant"));
    assert_eq!(links[1].target(), Some("kolor_1"));
}

// =============================================================================
// Documents and failures
// =============================================================================

#[test]
fn test_one_bad_entry_does_not_sink_the_batch() {
    let xml = document(&[
        CAT_ENTRY,
        r#"<entry><sense id="orphan"/></entry>"#,
        r#"<entry id="dog_1"><lexical-unit><form lang="en"><text>dog</text></form></lexical-unit></entry>"#,
    ]);

    let doc = parse_document(xml.as_bytes()).unwrap();
    assert_eq!(doc.version.as_deref(), Some("0.13"));
    assert_eq!(doc.producer.as_deref(), Some("test"));
    let ids: Vec<_> = doc.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["cat_1", "dog_1"]);
    assert_eq!(doc.failures.len(), 1);
    assert_eq!(doc.failures[0].index, 1);
    assert!(matches!(doc.failures[0].error, ParseError::Invalid { .. }));

    assert_eq!(parse_all(xml.as_bytes()).unwrap().len(), 2);
}

#[test]
fn test_document_round_trip() {
    let xml = document(&[CAT_ENTRY, &entry_in_namespace("nyumba_1", false)]);
    let entries = parse_all(xml.as_bytes()).unwrap();
    let written = serialize_all(&entries).unwrap();
    assert!(written.starts_with("<?xml"));
    assert!(written.contains(r#"version="0.13""#));
    assert_eq!(parse_all(written.as_bytes()).unwrap(), entries);
}

#[test]
fn test_one_overdeep_entry_does_not_sink_the_batch() {
    let deep = format!("{}{}", "<subsense>".repeat(300), "</subsense>".repeat(300));
    let bad = format!(r#"<entry id="deep_1"><sense id="s">{deep}</sense></entry>"#);
    let xml = document(&[CAT_ENTRY, &bad]);

    let doc = parse_document(xml.as_bytes()).unwrap();
    let ids: Vec<_> = doc.entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["cat_1"]);
    assert_eq!(doc.failures.len(), 1);
    assert_eq!(doc.failures[0].id.as_deref(), Some("deep_1"));
    assert!(matches!(
        doc.failures[0].error,
        ParseError::RecursionLimitExceeded { limit: 256, .. }
    ));
}

#[test]
fn test_malformed_input_reports_position() {
    let err = parse(b"<entry id=\"x\"><sense></entry>").unwrap_err();
    assert!(matches!(err, ParseError::Malformed { .. }));
}

#[test]
fn test_deep_subsenses_fail_closed() {
    let depth = 60;
    let mut xml = String::from(r#"<entry id="deep"><sense id="s0">"#);
    for i in 1..depth {
        xml.push_str(&format!(r#"<subsense id="s{i}">"#));
    }
    for _ in 1..depth {
        xml.push_str("</subsense>");
    }
    xml.push_str("</sense></entry>");

    let err = parse(xml.as_bytes()).unwrap_err();
    assert!(matches!(err, ParseError::RecursionLimitExceeded { .. }));

    let relaxed = LiftCodec::new().with_parser(ParserConfig::default().with_max_depth(100));
    let entry = relaxed.parse(xml.as_bytes()).unwrap();
    assert_eq!(entry.senses[0].descendants().len(), depth);
}

#[test]
fn test_hostile_xml_nesting_fails_closed() {
    let xml = format!("{}{}", "<x>".repeat(10_000), "</x>".repeat(10_000));
    let err = parse(xml.as_bytes()).unwrap_err();
    assert!(matches!(err, ParseError::RecursionLimitExceeded { .. }));
}
