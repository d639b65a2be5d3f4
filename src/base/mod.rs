//! Foundation types shared by the document model, the codec, and the
//! ranges resolver:
//! - [`Multitext`] - language-keyed text
//! - [`Trait`], [`Traits`] - ordered name/value bag (repeated names allowed)
//! - [`Annotation`] - editorial name/value/who/when marker
//! - [`Extension`] - opaque XML kept for elements the model does not know
//! - [`constants`] - LIFT namespace, version and element names
//!
//! This module has NO dependencies on other lift modules.

mod annotation;
pub mod constants;
mod extension;
mod multitext;
mod traits;

pub use annotation::Annotation;
pub use extension::{Extension, by_tag as extensions_by_tag};
pub use multitext::Multitext;
pub use traits::{Trait, Traits};
