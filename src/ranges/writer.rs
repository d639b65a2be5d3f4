//! `lift-ranges` writer. Elements are written flat, with `parent` attributes.

use crate::base::constants::tag;
use crate::config::SerializerConfig;
use crate::lift::{SerializeError, multitext_element, push_opt};
use crate::xml::XmlWriter;

use super::{Range, RangeElement, Ranges};

pub fn serialize_ranges(ranges: &Ranges) -> Result<String, SerializeError> {
    serialize_ranges_with(ranges, &SerializerConfig::default())
}

pub fn serialize_ranges_with(
    ranges: &Ranges,
    config: &SerializerConfig,
) -> Result<String, SerializeError> {
    let mut w = XmlWriter::new(config.indent);
    w.declaration()?;
    w.start(tag::LIFT_RANGES, &[])?;
    for r in ranges.iter() {
        range(&mut w, r)?;
    }
    w.end(tag::LIFT_RANGES)?;
    let mut out = w.finish()?;
    out.push('\n');
    Ok(out)
}

fn range(w: &mut XmlWriter, range: &Range) -> Result<(), SerializeError> {
    let mut attrs = vec![("id", range.id.as_str())];
    push_opt(&mut attrs, "guid", range.guid.as_deref());
    if range.labels.is_empty() && range.descriptions.is_empty() && range.elements.is_empty() {
        return w.empty(tag::RANGE, &attrs);
    }
    w.start(tag::RANGE, &attrs)?;
    multitext_element(w, tag::LABEL, &range.labels)?;
    multitext_element(w, tag::DESCRIPTION, &range.descriptions)?;
    for element in &range.elements {
        range_element(w, element)?;
    }
    w.end(tag::RANGE)
}

fn range_element(w: &mut XmlWriter, e: &RangeElement) -> Result<(), SerializeError> {
    let mut attrs = vec![("id", e.id.as_str())];
    push_opt(&mut attrs, "guid", e.guid.as_deref());
    push_opt(&mut attrs, "parent", e.parent.as_deref());
    if e.labels.is_empty() && e.abbrevs.is_empty() && e.descriptions.is_empty() {
        return w.empty(tag::RANGE_ELEMENT, &attrs);
    }
    w.start(tag::RANGE_ELEMENT, &attrs)?;
    multitext_element(w, tag::LABEL, &e.labels)?;
    multitext_element(w, tag::ABBREV, &e.abbrevs)?;
    multitext_element(w, tag::DESCRIPTION, &e.descriptions)?;
    w.end(tag::RANGE_ELEMENT)
}
