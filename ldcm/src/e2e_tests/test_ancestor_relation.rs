//! Test that an owning class is materialized and linked to the root.

use crate::e2e_tests::helpers::*;
use crate::mapping::MappingError;

#[test]
fn test_study_owns_root() {
    let tree = x_record().with(text(0x0020, 0x000D, "UI", "S1"));
    let store = map_one(&x_schema_with_study(), &tree);

    let mut expected = x_root_facts("P1");
    expected.extend([
        Fact::literal(data("P1"), ldcm("T00101010"), "42"),
        Fact::entity(data("S1"), RDF_TYPE, ldcm("Study")),
        Fact::literal(data("S1"), ldcm("T0020000D"), "S1"),
        Fact::entity(data("S1"), ldcm("hasChild"), data("P1")),
    ]);

    assert_eq!(store.facts(), sorted(expected));
}

#[test]
fn test_two_roots_share_one_study() {
    let schema = x_schema_with_study();
    let engine = crate::mapping::MappingEngine::new(&schema);
    let mut store = crate::store::GraphStore::new();

    for patient in ["P1", "P2"] {
        let tree = AttributeTree::new()
            .with(text(0x0008, 0x0016, "UI", "X"))
            .with(text(0x0010, 0x0020, "LO", patient))
            .with(text(0x0020, 0x000D, "UI", "S1"));
        engine.map_record(&mut store, &tree, None).expect("map");
    }

    let facts = store.facts();
    let study_types = facts
        .iter()
        .filter(|f| f.subject == data("S1") && f.predicate == RDF_TYPE)
        .count();
    assert_eq!(study_types, 1);
    assert!(facts.contains(&Fact::entity(data("S1"), ldcm("hasChild"), data("P1"))));
    assert!(facts.contains(&Fact::entity(data("S1"), ldcm("hasChild"), data("P2"))));
}

#[test]
fn test_missing_study_key_aborts_record() {
    let schema = x_schema_with_study();
    let mut store = crate::store::GraphStore::new();

    let err = crate::mapping::MappingEngine::new(&schema)
        .map_record(&mut store, &x_record(), None)
        .expect_err("study key is missing");
    assert!(matches!(
        err,
        MappingError::MissingAttribute { tag } if tag == Tag::new(0x0020, 0x000D)
    ));
    assert!(store.is_empty());
}

#[test]
fn test_failed_record_keeps_earlier_records() {
    let schema = x_schema_with_study();
    let engine = crate::mapping::MappingEngine::new(&schema);
    let mut store = crate::store::GraphStore::new();

    let complete = x_record().with(text(0x0020, 0x000D, "UI", "S1"));
    engine
        .map_record(&mut store, &complete, None)
        .expect("complete record");
    let before = store.facts();

    let partial = AttributeTree::new()
        .with(text(0x0008, 0x0016, "UI", "X"))
        .with(text(0x0010, 0x0020, "LO", "P2"));
    engine
        .map_record(&mut store, &partial, None)
        .expect_err("study key is missing");

    assert_eq!(store.facts(), before);
    assert!(!store.exists(&crate::types::EntityId::new("data:P2")));
}
