//! Test that an exported graph loads back to the same facts.

use crate::e2e_tests::helpers::*;
use crate::store::{GraphFormat, GraphStore};
use crate::testing::{ct_record, fixture_schema};

#[test]
fn test_turtle_and_ntriples_round_trip() {
    let store = map_one(&fixture_schema(), &ct_record());
    let expected = store.facts();
    assert!(!expected.is_empty());

    for format in [GraphFormat::Turtle, GraphFormat::NTriples] {
        let bytes = store.export(format).expect("export");
        let mut reloaded = GraphStore::new();
        let added = reloaded.load(&bytes, format).expect("load");

        assert_eq!(added, expected.len(), "{format}");
        assert_eq!(reloaded.facts(), expected, "{format}");
    }
}

#[test]
fn test_percent_encoded_identifier_survives_round_trip() {
    let tree = AttributeTree::new()
        .with(text(0x0008, 0x0016, "UI", "X"))
        .with(text(0x0010, 0x0020, "LO", "Doe John"));
    let store = map_one(&x_schema(), &tree);

    let bytes = store.export(GraphFormat::Turtle).expect("export");
    let mut reloaded = GraphStore::new();
    reloaded.load(&bytes, GraphFormat::Turtle).expect("load");

    assert_eq!(reloaded.facts(), store.facts());
    assert!(
        reloaded
            .facts()
            .contains(&Fact::literal(data("Doe John"), ldcm("T00100020"), "Doe John"))
    );
}
