//! Test that record provenance is attached only when requested.

use std::path::PathBuf;

use crate::e2e_tests::helpers::*;
use crate::mapping::{CONTENT_URL, ENCODING_FORMAT, MappingEngine, MappingOptions, RecordSource};
use crate::store::GraphStore;

fn source() -> RecordSource {
    RecordSource {
        location: PathBuf::from("/data/records/p1.json"),
        encoding_format: "application/dicom+json".to_owned(),
    }
}

fn map_with(persistent_storage: bool) -> GraphStore {
    let schema = x_schema();
    let engine = MappingEngine::with_options(
        &schema,
        MappingOptions {
            persistent_storage,
            ..MappingOptions::default()
        },
    );
    let mut store = GraphStore::new();
    engine
        .map_record(&mut store, &x_record(), Some(&source()))
        .expect("map");
    store
}

#[test]
fn test_provenance_on_root() {
    let facts = map_with(true).facts();

    assert!(facts.contains(&Fact::literal(
        data("P1"),
        CONTENT_URL,
        "/data/records/p1.json"
    )));
    assert!(facts.contains(&Fact::literal(
        data("P1"),
        ENCODING_FORMAT,
        "application/dicom+json"
    )));
    assert_eq!(facts.len(), 5);
}

#[test]
fn test_no_provenance_without_persistent_storage() {
    let facts = map_with(false).facts();
    assert_eq!(facts.len(), 3);
    assert!(!facts.iter().any(|f| f.predicate == CONTENT_URL));
}
