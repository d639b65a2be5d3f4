//! `lift-ranges` reader.
//!
//! ```text
//! <lift-ranges>
//!   <range id="grammatical-info">
//!     <range-element id="Noun">
//!       <label><form lang="en"><text>Noun</text></form></label>
//!       <abbrev><form lang="en"><text>n</text></form></abbrev>
//!     </range-element>
//!     <range-element id="Proper Noun" parent="Noun"/>
//!   </range>
//! </lift-ranges>
//! ```
//!
//! `range-element`s nested inside another `range-element` are flattened into
//! the range with the enclosing element as their implied parent. An explicit
//! `parent` attribute always wins over nesting.

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::base::constants::tag;
use crate::config::ParserConfig;
use crate::lift::forms;
use crate::xml::{XmlNode, parse_tree};

use super::{Range, RangeElement, Ranges, RangesError};

/// Parse a ranges file with default limits.
pub fn parse_ranges(input: &[u8]) -> Result<Ranges, RangesError> {
    parse_ranges_with(input, &ParserConfig::default())
}

pub fn parse_ranges_with(input: &[u8], config: &ParserConfig) -> Result<Ranges, RangesError> {
    let root = parse_tree(input, config.max_xml_depth)?;
    if !root.is(tag::LIFT_RANGES) {
        return Err(RangesError::invalid(format!(
            "expected <{}> root, found <{}>",
            tag::LIFT_RANGES,
            root.name
        )));
    }

    let mut ranges = Ranges::new();
    for node in root.children(tag::RANGE) {
        let range = range(node)?;
        if ranges.contains(&range.id) {
            return Err(RangesError::DuplicateRange(range.id));
        }
        debug!(range = %range.id, elements = range.elements.len(), "loaded range");
        ranges.insert(range);
    }
    Ok(ranges)
}

fn range(node: &XmlNode) -> Result<Range, RangesError> {
    let id = node
        .attr_non_empty("id")
        .ok_or_else(|| RangesError::invalid("<range> without id"))?;

    let mut range = Range::new(id);
    range.guid = node.attr_non_empty("guid");
    if let Some(label) = node.child(tag::LABEL) {
        range.labels = forms(label);
    }
    if let Some(description) = node.child(tag::DESCRIPTION) {
        range.descriptions = forms(description);
    }

    let mut seen = FxHashSet::default();
    let mut stack: Vec<(&XmlNode, Option<String>)> = node
        .children(tag::RANGE_ELEMENT)
        .map(|child| (child, None))
        .collect();
    stack.reverse();

    while let Some((node, implied_parent)) = stack.pop() {
        let element = range_element(node, implied_parent.clone());
        let next_parent = match &element {
            Some(e) => Some(e.id.clone()),
            None => {
                warn!(range = %range.id, "skipping <range-element> without id");
                implied_parent
            }
        };

        let nested: Vec<_> = node.children(tag::RANGE_ELEMENT).collect();
        for child in nested.into_iter().rev() {
            stack.push((child, next_parent.clone()));
        }

        if let Some(element) = element {
            if seen.insert(element.id.clone()) {
                range.elements.push(element);
            } else {
                warn!(range = %range.id, element = %element.id, "duplicate range element id, keeping the first");
            }
        }
    }
    Ok(range)
}

fn range_element(node: &XmlNode, implied_parent: Option<String>) -> Option<RangeElement> {
    let mut element = RangeElement::new(node.attr_non_empty("id")?);
    element.guid = node.attr_non_empty("guid");
    element.parent = node.attr_non_empty("parent").or(implied_parent);
    for child in node.elements() {
        match child.lift_name() {
            Some(tag::LABEL) => element.labels.merge(forms(child)),
            Some(tag::ABBREV) => element.abbrevs.merge(forms(child)),
            Some(tag::DESCRIPTION) => element.descriptions.merge(forms(child)),
            _ => {}
        }
    }
    Some(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_elements_and_parent_attribute() {
        let xml = br#"<lift-ranges>
            <range id="grammatical-info">
              <label><form lang="en"><text>Part of speech</text></form></label>
              <range-element id="Noun">
                <label><form lang="en"><text>Noun</text></form></label>
                <abbrev><form lang="en"><text>n</text></form></abbrev>
              </range-element>
              <range-element id="Proper Noun" parent="Noun"/>
            </range>
        </lift-ranges>"#;
        let ranges = parse_ranges(xml).unwrap();
        let range = ranges.get("grammatical-info").unwrap();
        assert_eq!(range.labels.get("en"), Some("Part of speech"));
        assert_eq!(range.elements.len(), 2);
        assert_eq!(range.elements[0].abbrevs.get("en"), Some("n"));
        assert_eq!(range.elements[1].parent.as_deref(), Some("Noun"));
    }

    #[test]
    fn test_nested_elements_are_flattened_in_document_order() {
        let xml = br#"<lift-ranges><range id="r">
            <range-element id="a">
              <range-element id="b"><range-element id="c"/></range-element>
              <range-element id="d" parent="x"/>
            </range-element>
            <range-element id="e"/>
        </range></lift-ranges>"#;
        let range = parse_ranges(xml).unwrap().get("r").cloned().unwrap();
        let flat: Vec<_> = range
            .elements
            .iter()
            .map(|e| (e.id.as_str(), e.parent.as_deref()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("a", None),
                ("b", Some("a")),
                ("c", Some("b")),
                ("d", Some("x")),
                ("e", None),
            ]
        );
    }

    #[test]
    fn test_lang_on_text_node() {
        let xml = br#"<lift-ranges><range id="r"><range-element id="a">
            <label><text lang="fr">nom</text></label>
        </range-element></range></lift-ranges>"#;
        let ranges = parse_ranges(xml).unwrap();
        assert_eq!(ranges.get("r").unwrap().elements[0].labels.get("fr"), Some("nom"));
    }

    #[test]
    fn test_duplicate_range_is_rejected() {
        let xml = br#"<lift-ranges><range id="r"/><range id="r"/></lift-ranges>"#;
        assert_eq!(
            parse_ranges(xml),
            Err(RangesError::DuplicateRange("r".into()))
        );
    }

    #[test]
    fn test_duplicate_element_keeps_first() {
        let xml = br#"<lift-ranges><range id="r">
            <range-element id="a"><abbrev><form lang="en"><text>first</text></form></abbrev></range-element>
            <range-element id="a"><abbrev><form lang="en"><text>second</text></form></abbrev></range-element>
        </range></lift-ranges>"#;
        let ranges = parse_ranges(xml).unwrap();
        let range = ranges.get("r").unwrap();
        assert_eq!(range.elements.len(), 1);
        assert_eq!(range.elements[0].abbrevs.get("en"), Some("first"));
    }

    #[test]
    fn test_wrong_root_and_missing_range_id() {
        assert!(matches!(parse_ranges(b"<lift/>"), Err(RangesError::Invalid(_))));
        assert!(matches!(
            parse_ranges(b"<lift-ranges><range/></lift-ranges>"),
            Err(RangesError::Invalid(_))
        ));
        assert!(matches!(parse_ranges(b"<lift-ranges>"), Err(RangesError::Parse(_))));
    }
}
