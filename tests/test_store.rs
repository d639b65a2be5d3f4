//! Entry persistence through the document store collaborator.

#[path = "helpers/mod.rs"]
mod helpers;

use helpers::CAT_ENTRY;
use lift::{DocumentStore, Entry, EntryStore, MemoryStore, StoreError, from_json, parse, to_json};

#[test]
fn test_edit_cycle_through_store() {
    let raw = MemoryStore::new();
    raw.save_raw_xml("cat_1", CAT_ENTRY).unwrap();
    let store = EntryStore::new(raw);

    let mut entry = store.load_entry("cat_1").unwrap();
    entry.lexical_unit.set("fr", "chat");
    entry.senses[0].traits.push(lift::Trait::new("usage-type", "spoken"));
    store.save_entry(&entry).unwrap();

    let reloaded = store.load_entry("cat_1").unwrap();
    assert_eq!(reloaded, entry);
    assert_eq!(reloaded.senses[0].traits.values("usage-type"), vec!["formal", "written", "spoken"]);
}

#[test]
fn test_new_entry_from_json_needs_an_id() {
    let store = EntryStore::new(MemoryStore::new());
    let mut entry = from_json(serde_json::json!({
        "lexical_unit": {"en": "bird"},
        "senses": [{"glosses": {"en": "bird"}}]
    }))
    .unwrap();

    assert!(matches!(store.save_entry(&entry), Err(StoreError::MissingId)));
    assert!(!entry.is_complete());

    entry.ensure_id();
    for sense in &mut entry.senses {
        sense.ensure_id();
    }
    assert!(entry.is_complete());
    store.save_entry(&entry).unwrap();

    let loaded = store.load_entry(&entry.id).unwrap();
    assert_eq!(to_json(&loaded).unwrap(), to_json(&entry).unwrap());
}

#[test]
fn test_json_projection_of_parsed_entry() {
    let entry: Entry = parse(CAT_ENTRY.as_bytes()).unwrap();
    let json = to_json(&entry).unwrap();
    assert_eq!(json["id"], "cat_1");
    assert_eq!(json["lexical_unit"]["en"], "cat");
    assert_eq!(json["senses"][0]["traits"][1]["value"], "written");
    assert_eq!(from_json(json).unwrap(), entry);
}
