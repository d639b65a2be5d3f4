//! JSON projection of the document model for the form-binding layer.
//!
//! Field names follow the model (`lexical_unit`, `senses[].definitions`,
//! `senses[].reversals[].main`, ...). Multitexts are objects keyed by
//! language, trait bags are arrays of `{name, value}` objects.

use serde_json::Value;

use crate::model::Entry;

use super::JsonError;

pub fn to_json(entry: &Entry) -> Result<Value, JsonError> {
    Ok(serde_json::to_value(entry)?)
}

/// Missing fields take their empty defaults, so a partial form submission
/// yields a partially filled entry rather than an error.
pub fn from_json(value: Value) -> Result<Entry, JsonError> {
    Ok(serde_json::from_value(value)?)
}

pub fn to_json_string(entry: &Entry) -> Result<String, JsonError> {
    Ok(serde_json::to_string(entry)?)
}

pub fn from_json_str(json: &str) -> Result<Entry, JsonError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Multitext;
    use crate::model::{Reversal, Sense};
    use serde_json::json;

    #[test]
    fn test_field_names_follow_model() {
        let mut sense = Sense::new("s1").with_definition("en", "a small feline");
        sense.reversals.push(
            Reversal::new(Multitext::single("en", "cat"))
                .with_main(Reversal::new(Multitext::single("en", "feline"))),
        );
        let mut entry = Entry::new("cat_1").with_lexical_unit("en", "cat").with_sense(sense);
        entry.date_created = Some("2024-01-01T00:00:00Z".into());

        let value = to_json(&entry).unwrap();
        assert_eq!(value["lexical_unit"]["en"], "cat");
        assert_eq!(value["dateCreated"], "2024-01-01T00:00:00Z");
        assert_eq!(value["senses"][0]["definitions"]["en"], "a small feline");
        assert_eq!(value["senses"][0]["reversals"][0]["main"]["forms"]["en"], "feline");
    }

    #[test]
    fn test_traits_are_a_list_of_pairs() {
        let entry = Entry::new("e").with_sense(
            Sense::new("s")
                .with_trait("usage-type", "formal")
                .with_trait("usage-type", "written"),
        );
        let value = to_json(&entry).unwrap();
        assert_eq!(
            value["senses"][0]["traits"],
            json!([
                {"name": "usage-type", "value": "formal"},
                {"name": "usage-type", "value": "written"}
            ])
        );
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let entry = from_json(json!({
            "lexical_unit": {"en": "dog"},
            "senses": [{"glosses": {"fr": "chien"}}]
        }))
        .unwrap();
        assert!(entry.id.is_empty());
        assert_eq!(entry.lexical_unit.get("en"), Some("dog"));
        assert_eq!(entry.senses[0].glosses.get("fr"), Some("chien"));
        assert!(entry.senses[0].traits.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let mut entry = Entry::new("e").with_lexical_unit("en", "x");
        entry.add_variant_of("y", "Spelling");
        let back = from_json_str(&to_json_string(&entry).unwrap()).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_wrong_shape_is_an_error() {
        assert!(from_json(json!({"senses": "not a list"})).is_err());
    }
}
