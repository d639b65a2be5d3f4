//! Typed LIFT document model.
//!
//! ```text
//! Entry
//! ├── lexical_unit, citation_form: Multitext
//! ├── pronunciations, variants, relations, etymologies
//! ├── notes: note-type → Multitext
//! ├── annotations, traits
//! └── senses (ordered by `order`)
//!     ├── glosses, definitions: Multitext
//!     ├── examples → translations
//!     ├── relations, reversals (→ main → main ...)
//!     ├── traits (repeated names allowed)
//!     └── subsenses (recursive)
//! ```
//!
//! Every element the model does not name is carried in an `extensions`
//! field instead of being dropped.

mod entry;
mod relation;
mod sense;

pub use entry::{Entry, Etymology, GrammaticalInfo, Incomplete, Pronunciation};
pub use relation::{Relation, Variant, VariantLink};
pub use sense::{Example, Reversal, Sense, Translation};
