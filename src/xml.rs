//! Namespace-tolerant element tree and writer shared by the LIFT and
//! ranges codecs.
//!
//! Reading builds a small owned tree with `quick_xml::NsReader` (iteratively,
//! so hostile nesting fails with an error instead of overflowing the stack)
//! and then the codecs walk that tree. Element lookups accept both the LIFT
//! namespace and unqualified names: a child in the LIFT namespace wins, a
//! bare child is the fallback, and an element in some other namespace is
//! never mistaken for a LIFT one.

use std::borrow::Cow;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use crate::base::Extension;
use crate::base::constants::{LIFT_NAMESPACE, tag};
use crate::lift::{ParseError, SerializeError};

// ============================================================================
// TREE
// ============================================================================

/// Content of an element, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum XmlContent {
    Element(XmlNode),
    Text(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct XmlNode {
    /// Resolved namespace URI, if the element is in one.
    pub namespace: Option<String>,
    /// Local name, prefix removed.
    pub name: String,
    /// Prefix the element was written with, if any.
    pub prefix: Option<String>,
    /// Attributes as written (qualified keys), `xmlns` bindings excluded.
    pub attributes: Vec<(String, String)>,
    pub content: Vec<XmlContent>,
    /// Set on an `entry` of a `lift` document whose subtree nested past the
    /// depth limit; the overflowing part was skipped, not kept.
    pub overflow: Option<ParseError>,
}

impl XmlNode {
    /// Local name if this element belongs to LIFT (LIFT namespace or none).
    pub fn lift_name(&self) -> Option<&str> {
        match self.namespace.as_deref() {
            None => Some(&self.name),
            Some(ns) if ns == LIFT_NAMESPACE => Some(&self.name),
            Some(_) => None,
        }
    }

    pub fn is(&self, local: &str) -> bool {
        self.lift_name() == Some(local)
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlNode> {
        self.content.iter().filter_map(|c| match c {
            XmlContent::Element(e) => Some(e),
            XmlContent::Text(_) => None,
        })
    }

    /// First child called `local`, preferring the namespaced form.
    pub fn child(&self, local: &str) -> Option<&XmlNode> {
        self.elements()
            .find(|e| e.name == local && e.namespace.as_deref() == Some(LIFT_NAMESPACE))
            .or_else(|| self.elements().find(|e| e.name == local && e.namespace.is_none()))
    }

    /// Every LIFT child called `local`, namespaced or bare, in document order.
    pub fn children<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.elements().filter(move |e| e.is(local))
    }

    /// Attribute by exact key, falling back to a match on the local part
    /// (`xml:lang` answers a lookup for `lang` only when no plain `lang` exists).
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(k, _)| k.rsplit_once(':').is_some_and(|(_, local)| local == key))
            })
            .map(|(_, v)| v.as_str())
    }

    /// Attribute with surrounding whitespace removed; blank counts as absent.
    pub fn attr_non_empty(&self, key: &str) -> Option<String> {
        self.attr(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn has_element_children(&self) -> bool {
        self.elements().next().is_some()
    }

    /// Text directly inside this element.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for c in &self.content {
            if let XmlContent::Text(t) = c {
                out.push_str(t);
            }
        }
        out
    }

    /// All text in this element and its descendants, in document order.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<&XmlContent> = self.content.iter().rev().collect();
        while let Some(c) = stack.pop() {
            match c {
                XmlContent::Text(t) => out.push_str(t),
                XmlContent::Element(e) => stack.extend(e.content.iter().rev()),
            }
        }
        out
    }

    /// Opaque copy for elements the model has no field for. Elements outside
    /// LIFT keep their namespace and prefix so they are written back as such.
    pub fn to_extension(&self) -> Extension {
        let raw = self.text();
        let text = if self.has_element_children() {
            Some(raw.trim().to_string()).filter(|t| !t.is_empty())
        } else {
            Some(raw).filter(|t| !t.is_empty())
        };
        let foreign = self.lift_name().is_none();
        Extension {
            tag: self.name.clone(),
            namespace: self.namespace.clone().filter(|_| foreign),
            prefix: self.prefix.clone().filter(|_| foreign),
            attributes: self.attributes.clone(),
            text,
            children: self.elements().map(XmlNode::to_extension).collect(),
        }
    }
}

// ============================================================================
// READER
// ============================================================================

/// Parse a complete document into its root element.
///
/// Nesting past `max_depth` fails the whole parse, except inside an `entry`
/// of a `lift` document: there the overflowing subtree is skipped and the
/// entry is marked through [`XmlNode::overflow`], so one hostile entry does
/// not take its siblings down with it.
pub(crate) fn parse_tree(input: &[u8], max_depth: usize) -> Result<XmlNode, ParseError> {
    let mut reader = NsReader::from_reader(input);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;
    // Open elements still to close inside a skipped subtree.
    let mut skipping = 0usize;

    loop {
        let (namespace, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, event)) => (resolved_namespace(ns), event),
            Err(e) => return Err(ParseError::malformed(reader.error_position(), e.to_string())),
        };
        let position = reader.buffer_position();

        if skipping > 0 {
            match event {
                Event::Start(_) => skipping += 1,
                Event::End(_) => skipping -= 1,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
            continue;
        }

        match event {
            Event::Start(ref e) => {
                if stack.len() >= max_depth {
                    overflow(&mut stack, local_name(e, position)?, max_depth)?;
                    skipping = 1;
                } else {
                    stack.push(start_node(namespace, e, position)?);
                }
            }
            Event::Empty(ref e) => {
                if stack.len() >= max_depth {
                    overflow(&mut stack, local_name(e, position)?, max_depth)?;
                } else {
                    let node = start_node(namespace, e, position)?;
                    attach(&mut stack, &mut root, node, position)?;
                }
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| ParseError::malformed(position, "unexpected closing tag"))?;
                attach(&mut stack, &mut root, node, position)?;
            }
            Event::Text(ref t) => {
                if let Some(top) = stack.last_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| ParseError::malformed(position, e.to_string()))?;
                    push_text(top, text);
                }
            }
            Event::CData(ref c) => {
                if let Some(top) = stack.last_mut() {
                    push_text(top, String::from_utf8_lossy(c));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype.
            _ => {}
        }
        buf.clear();
    }

    if skipping > 0 {
        return Err(ParseError::malformed(reader.buffer_position(), "unclosed element"));
    }
    if let Some(open) = stack.last() {
        return Err(ParseError::malformed(
            reader.buffer_position(),
            format!("unclosed element <{}>", open.name),
        ));
    }
    root.ok_or_else(|| ParseError::malformed(reader.buffer_position(), "document has no root element"))
}

/// Record a depth overflow on the enclosing `lift/entry`, or fail the parse
/// when the overflow is anywhere else.
fn overflow(stack: &mut [XmlNode], element: String, max_depth: usize) -> Result<(), ParseError> {
    let error = ParseError::recursion_limit(element, max_depth);
    match stack {
        [root, entry, ..] if root.is(tag::LIFT) && entry.is(tag::ENTRY) => {
            if entry.overflow.is_none() {
                entry.overflow = Some(error);
            }
            Ok(())
        }
        _ => Err(error),
    }
}

fn resolved_namespace(ns: ResolveResult<'_>) -> Option<String> {
    match ns {
        ResolveResult::Bound(uri) => Some(String::from_utf8_lossy(uri.as_ref()).into_owned()),
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    }
}

fn local_name(e: &BytesStart<'_>, position: u64) -> Result<String, ParseError> {
    std::str::from_utf8(e.local_name().as_ref())
        .map(str::to_string)
        .map_err(|err| ParseError::malformed(position, format!("invalid tag name: {err}")))
}

fn start_node(
    namespace: Option<String>,
    e: &BytesStart<'_>,
    position: u64,
) -> Result<XmlNode, ParseError> {
    let mut attributes = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result
            .map_err(|err| ParseError::malformed(position, format!("attribute error: {err}")))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| ParseError::malformed(position, format!("attribute key error: {err}")))?;
        let value = attr
            .unescape_value()
            .map_err(|err| ParseError::malformed(position, format!("attribute value error: {err}")))?;
        attributes.push((key.to_string(), value.into_owned()));
    }
    let prefix = match e.name().prefix() {
        Some(p) => Some(
            std::str::from_utf8(p.as_ref())
                .map_err(|err| ParseError::malformed(position, format!("invalid prefix: {err}")))?
                .to_string(),
        ),
        None => None,
    };
    Ok(XmlNode {
        namespace,
        name: local_name(e, position)?,
        prefix,
        attributes,
        ..XmlNode::default()
    })
}

fn push_text(node: &mut XmlNode, text: Cow<'_, str>) {
    match node.content.last_mut() {
        Some(XmlContent::Text(prev)) => prev.push_str(&text),
        _ => node.content.push(XmlContent::Text(text.into_owned())),
    }
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
    position: u64,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.content.push(XmlContent::Element(node));
            Ok(())
        }
        None if root.is_some() => Err(ParseError::malformed(position, "multiple root elements")),
        None => {
            *root = Some(node);
            Ok(())
        }
    }
}

// ============================================================================
// WRITER
// ============================================================================

/// Thin wrapper over `quick_xml::Writer` writing into memory.
pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub fn new(indent: usize) -> Self {
        let inner = if indent == 0 {
            Writer::new(Vec::new())
        } else {
            Writer::new_with_indent(Vec::new(), b' ', indent)
        };
        Self { inner }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), SerializeError> {
        self.inner
            .write_event(event)
            .map_err(|e| SerializeError::xml(format!("Write error: {e}")))
    }

    pub fn declaration(&mut self) -> Result<(), SerializeError> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    pub fn start(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<(), SerializeError> {
        self.event(Event::Start(start_tag(tag, attrs)))
    }

    pub fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<(), SerializeError> {
        self.event(Event::Empty(start_tag(tag, attrs)))
    }

    pub fn end(&mut self, tag: &str) -> Result<(), SerializeError> {
        self.event(Event::End(BytesEnd::new(tag)))
    }

    pub fn text(&mut self, text: &str) -> Result<(), SerializeError> {
        if text.is_empty() {
            return Ok(());
        }
        self.event(Event::Text(BytesText::new(text)))
    }

    /// `<tag attrs>text</tag>`, or `<tag attrs/>` when `text` is empty so
    /// indentation cannot leak in as content.
    pub fn text_element(
        &mut self,
        tag: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), SerializeError> {
        if text.is_empty() {
            return self.empty(tag, attrs);
        }
        self.start(tag, attrs)?;
        self.text(text)?;
        self.end(tag)
    }

    pub fn extension(&mut self, ext: &Extension) -> Result<(), SerializeError> {
        self.extension_in(ext, None)
    }

    /// `default_ns` is the foreign default namespace an ancestor extension
    /// declared, if any.
    fn extension_in(&mut self, ext: &Extension, default_ns: Option<&str>) -> Result<(), SerializeError> {
        let tag = match (&ext.namespace, &ext.prefix) {
            (Some(_), Some(prefix)) => format!("{prefix}:{}", ext.tag),
            _ => ext.tag.clone(),
        };
        let prefix_binding = ext.prefix.as_ref().map(|p| format!("xmlns:{p}"));

        let mut attrs: Vec<(&str, &str)> = Vec::new();
        let mut scope = default_ns;
        match (ext.namespace.as_deref(), prefix_binding.as_deref()) {
            (Some(ns), Some(binding)) => attrs.push((binding, ns)),
            (Some(ns), None) => {
                if default_ns != Some(ns) {
                    attrs.push(("xmlns", ns));
                }
                scope = Some(ns);
            }
            (None, _) => {
                if default_ns.is_some() {
                    attrs.push(("xmlns", ""));
                }
                scope = None;
            }
        }
        attrs.extend(ext.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let text = ext.text.as_deref().filter(|t| !t.is_empty());
        if ext.children.is_empty() && text.is_none() {
            return self.empty(&tag, &attrs);
        }
        self.start(&tag, &attrs)?;
        if let Some(text) = text {
            self.text(text)?;
        }
        for child in &ext.children {
            self.extension_in(child, scope)?;
        }
        self.end(&tag)
    }

    pub fn finish(self) -> Result<String, SerializeError> {
        Ok(String::from_utf8(self.inner.into_inner())?)
    }
}

fn start_tag<'a>(tag: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(tag);
    for &(k, v) in attrs {
        start.push_attribute((k, v));
    }
    start
}
