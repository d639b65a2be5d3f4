//! Shared fixtures for the integration tests.

#![allow(dead_code)]

pub const LIFT_NS: &str = "http://fieldworks.sil.org/schemas/lift/0.13";

pub const CAT_ENTRY: &str = r#"<entry id="cat_1"><lexical-unit><form lang="en"><text>cat</text></form></lexical-unit><sense id="s1"><trait name="usage-type" value="formal"/><trait name="usage-type" value="written"/></sense></entry>"#;

/// A sense body covering most constructs, wrapped by [`entry_in_namespace`].
pub const RICH_ENTRY_BODY: &str = r#"
  <lexical-unit><form lang="seh"><text>nyumba</text></form></lexical-unit>
  <citation><form lang="seh"><text>nyumba</text></form></citation>
  <pronunciation><form lang="seh-fonipa"><text>ɲumba</text></form><media href="nyumba.wav"/></pronunciation>
  <relation type="_component-lexeme" ref="nyumba_variant_1"><trait name="variant-type" value="Spelling Variant"/></relation>
  <relation type="synonym" ref="does-not-exist"/>
  <note type="encyclopedic"><form lang="en"><text>Built of mud</text></form></note>
  <etymology type="borrowed" source="Swahili"><form lang="sw"><text>nyumba</text></form></etymology>
  <trait name="morph-type" value="stem"/>
  <sense id="house_s1" order="0">
    <grammatical-info value="Noun"><trait name="class" value="9"/></grammatical-info>
    <gloss lang="en"><text>house</text></gloss>
    <definition><form lang="en"><text>a <span lang="en">dwelling</span> place</text></form></definition>
    <example source="field-notes"><form lang="seh"><text>Nyumba yanga</text></form><translation type="Free translation"><form lang="en"><text>My house</text></form></translation></example>
    <reversal type="en"><form lang="en"><text>house</text></form><main><form lang="en"><text>building</text></form></main></reversal>
    <trait name="usage-type" value="formal"/>
    <trait name="usage-type" value="formal"/>
    <annotation name="reviewed" value="yes" who="editor" when="2024-01-01"/>
    <subsense id="house_s1_1" order="0"><gloss lang="en"><text>home</text></gloss></subsense>
    <illustration href="house.png"/>
  </sense>
"#;

pub fn entry_in_namespace(id: &str, namespaced: bool) -> String {
    let ns = if namespaced {
        format!(r#" xmlns="{LIFT_NS}""#)
    } else {
        String::new()
    };
    format!(r#"<entry{ns} id="{id}">{RICH_ENTRY_BODY}</entry>"#)
}

pub fn document(entries: &[&str]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><lift xmlns="{LIFT_NS}" version="0.13" producer="test">{}</lift>"#,
        entries.concat()
    )
}

pub const GRAMMATICAL_INFO_RANGES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<lift-ranges>
  <range id="grammatical-info">
    <range-element id="Noun">
      <label><form lang="en"><text>Noun</text></form></label>
      <abbrev><form lang="en"><text>n</text></form></abbrev>
      <range-element id="Proper Noun">
        <label><form lang="en"><text>Proper Noun</text></form></label>
      </range-element>
      <range-element id="Countable Noun">
        <abbrev><form lang="en"><text>n.count</text></form></abbrev>
      </range-element>
    </range-element>
    <range-element id="Verb">
      <label><form lang="en"><text>Verb</text></form></label>
      <abbrev><form lang="en"><text>v</text></form></abbrev>
    </range-element>
    <range-element id="Transitive" parent="Verb"/>
    <range-element id="Orphan" parent="Gone"/>
  </range>
  <range id="semantic-domain">
    <range-element id="X" parent="Y"/>
    <range-element id="Y" parent="X"/>
  </range>
</lift-ranges>
"#;
