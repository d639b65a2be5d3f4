use serde::{Deserialize, Serialize};

/// An XML element the document model has no typed field for.
///
/// Unknown children (custom `field`s, `illustration`, vendor elements) are
/// kept in this form and written back unchanged, so a parse/serialize cycle
/// does not lose them. Mixed content is reduced to the element's own
/// text plus its child elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    /// Local tag name (namespace prefix removed).
    pub tag: String,
    /// Namespace URI, for elements from outside LIFT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Prefix bound to `namespace`; `None` means it was the default namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Extension>,
}

impl Extension {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Extension) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// All extensions with the given tag.
pub fn by_tag<'a>(extensions: &'a [Extension], tag: &'a str) -> impl Iterator<Item = &'a Extension> + 'a {
    extensions.iter().filter(move |e| e.tag == tag)
}
