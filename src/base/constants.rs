//! LIFT wire constants.

/// LIFT 0.13 namespace URI.
pub const LIFT_NAMESPACE: &str = "http://fieldworks.sil.org/schemas/lift/0.13";

/// Version written on the root `lift` element.
pub const LIFT_VERSION: &str = "0.13";

/// Multitext key used for `form`/`text` nodes that carry no `lang`.
pub const NO_LANG: &str = "none";

/// Note type assumed when a `note` element has no `type` attribute.
pub const DEFAULT_NOTE_TYPE: &str = "general";

/// Relation type FieldWorks uses for complex forms and variants.
pub const COMPONENT_LEXEME: &str = "_component-lexeme";

/// Trait name that marks a relation as a variant link.
pub const VARIANT_TYPE_TRAIT: &str = "variant-type";

/// Trait name carrying the type of a `variant` element.
pub const TYPE_TRAIT: &str = "type";

/// Element names.
pub mod tag {
    pub const LIFT: &str = "lift";
    pub const LIFT_RANGES: &str = "lift-ranges";
    pub const ENTRY: &str = "entry";
    pub const LEXICAL_UNIT: &str = "lexical-unit";
    pub const CITATION: &str = "citation";
    pub const PRONUNCIATION: &str = "pronunciation";
    pub const MEDIA: &str = "media";
    pub const VARIANT: &str = "variant";
    pub const GRAMMATICAL_INFO: &str = "grammatical-info";
    pub const RELATION: &str = "relation";
    pub const NOTE: &str = "note";
    pub const ETYMOLOGY: &str = "etymology";
    pub const ANNOTATION: &str = "annotation";
    pub const TRAIT: &str = "trait";
    pub const SENSE: &str = "sense";
    pub const SUBSENSE: &str = "subsense";
    pub const GLOSS: &str = "gloss";
    pub const DEFINITION: &str = "definition";
    pub const EXAMPLE: &str = "example";
    pub const TRANSLATION: &str = "translation";
    pub const REVERSAL: &str = "reversal";
    pub const MAIN: &str = "main";
    pub const FORM: &str = "form";
    pub const TEXT: &str = "text";
    pub const RANGE: &str = "range";
    pub const RANGE_ELEMENT: &str = "range-element";
    pub const LABEL: &str = "label";
    pub const ABBREV: &str = "abbrev";
    pub const DESCRIPTION: &str = "description";
}
