//! Test a keyed root with one literal attribute.

use crate::e2e_tests::helpers::*;

#[test]
fn test_literal_attribute_on_keyed_root() {
    let store = map_one(&x_schema(), &x_record());

    let mut expected = x_root_facts("P1");
    expected.push(Fact::literal(data("P1"), ldcm("T00101010"), "42"));

    assert_eq!(store.facts(), sorted(expected));
}

#[test]
fn test_mapping_same_record_twice_adds_nothing() {
    let schema = x_schema();
    let mut store = map_one(&schema, &x_record());
    let before = store.facts();

    crate::mapping::MappingEngine::new(&schema)
        .map_record(&mut store, &x_record(), None)
        .expect("map again");

    assert_eq!(store.facts(), before);
    assert_eq!(store.len(), 3);
}
