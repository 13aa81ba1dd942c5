//! Test a sequence attribute with two items.

use crate::e2e_tests::helpers::*;

fn item(uid: &str) -> AttributeTree {
    AttributeTree::new().with(text(0x0008, 0x1155, "UI", uid))
}

#[test]
fn test_container_with_two_items() {
    let tree = x_record().with(Element::sequence(
        Tag::new(0x0008, 0x1140),
        vec![item("1.1"), item("1.2")],
    ));
    let store = map_one(&x_schema(), &tree);

    let container = data("P1_00081140");
    let first = data("P1_00081140_0");
    let second = data("P1_00081140_1");

    let mut expected = x_root_facts("P1");
    expected.extend([
        Fact::literal(data("P1"), ldcm("T00101010"), "42"),
        Fact::entity(data("P1"), ldcm("R00081140"), &container),
        Fact::entity(&container, RDF_TYPE, ldcm("Item_Sequence")),
        Fact::entity(&container, ldcm("has_sequence_item"), &first),
        Fact::entity(&container, ldcm("has_sequence_item"), &second),
        Fact::entity(&first, RDF_TYPE, ldcm("Item")),
        Fact::entity(&second, RDF_TYPE, ldcm("Item")),
        Fact::literal(&first, ldcm("T00081155"), "1.1"),
        Fact::literal(&second, ldcm("T00081155"), "1.2"),
    ]);

    assert_eq!(store.facts(), sorted(expected));
}

#[test]
fn test_nested_sequence_hangs_off_item() {
    let nested = item("1.1").with(Element::sequence(
        Tag::new(0x0008, 0x1140),
        vec![item("2.1")],
    ));
    let tree = x_record().with(Element::sequence(Tag::new(0x0008, 0x1140), vec![nested]));
    let store = map_one(&x_schema(), &tree);

    let inner_item = data("P1_00081140_0_00081140_0");
    let facts = store.facts();
    assert!(facts.contains(&Fact::entity(
        data("P1_00081140_0"),
        ldcm("R00081140"),
        data("P1_00081140_0_00081140")
    )));
    assert!(facts.contains(&Fact::literal(&inner_item, ldcm("T00081155"), "2.1")));
}

#[test]
fn test_empty_sequence_creates_only_container() {
    let tree = x_record().with(Element::sequence(Tag::new(0x0008, 0x1140), vec![]));
    let store = map_one(&x_schema(), &tree);

    let facts = store.facts();
    assert!(facts.contains(&Fact::entity(
        data("P1_00081140"),
        RDF_TYPE,
        ldcm("Item_Sequence")
    )));
    assert!(
        !facts
            .iter()
            .any(|f| f.predicate == ldcm("has_sequence_item"))
    );
}
