//! Test that a schema where two classes own each other terminates.

use crate::e2e_tests::helpers::*;

#[test]
fn test_mutual_ownership_terminates() {
    let tree = x_record().with(text(0x0020, 0x000D, "UI", "S1"));
    let store = map_one(&x_schema_with_cycle(), &tree);

    let facts = store.facts();
    assert!(facts.contains(&Fact::entity(data("S1"), ldcm("hasChild"), data("P1"))));
    assert!(facts.contains(&Fact::entity(data("P1"), ldcm("hasParent"), data("S1"))));

    let study_types = facts
        .iter()
        .filter(|f| f.subject == data("S1") && f.predicate == RDF_TYPE)
        .count();
    assert_eq!(study_types, 1);
}
