//! Common helpers for end-to-end tests.

#![allow(clippy::expect_used)]

use crate::mapping::MappingEngine;
use crate::schema::OntologySchema;
use crate::store::GraphStore;
use crate::testing::schema_from_turtle;
pub use crate::testing::{ldcm, text};
pub use crate::types::{AttributeTree, Element, Fact, Tag};

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// A class `X` selected by type code "X" and keyed by (0010,0020), with
/// an `age` literal at (0010,1010) and a two-level sequence at (0008,1140).
const X_ONTOLOGY: &str = r#"
@prefix ldcm: <https://johanvansoest.nl/ontologies/LinkedDicom/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

ldcm:X a owl:Class ;
    ldcm:has_sop_class_uid "X" ;
    ldcm:has_unique_identifier ldcm:T00100020 .
ldcm:T00101010 a owl:DatatypeProperty ; ldcm:related_to_information_entity ldcm:X .

ldcm:R00081140 a owl:ObjectProperty ; ldcm:related_to_sequence ldcm:Item_Sequence .
ldcm:Item_Sequence a owl:Class .
ldcm:Item a owl:Class ;
    rdfs:subClassOf ldcm:Sequence_Item ;
    ldcm:related_to_sequence ldcm:Item_Sequence .
ldcm:T00081155 a owl:DatatypeProperty .
ldcm:has_sequence_item a owl:ObjectProperty .
"#;

/// `Study` owns `X` through `hasChild`.
const STUDY_ONTOLOGY: &str = r#"
@prefix ldcm: <https://johanvansoest.nl/ontologies/LinkedDicom/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

ldcm:Study a owl:Class ; ldcm:has_unique_identifier ldcm:T0020000D .
ldcm:hasChild a owl:ObjectProperty ; rdfs:domain ldcm:Study ; rdfs:range ldcm:X .
"#;

/// `X` and `Study` own each other.
const CYCLE_ONTOLOGY: &str = r#"
@prefix ldcm: <https://johanvansoest.nl/ontologies/LinkedDicom/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

ldcm:hasParent a owl:ObjectProperty ; rdfs:domain ldcm:X ; rdfs:range ldcm:Study .
"#;

pub fn x_schema() -> OntologySchema {
    schema_from_turtle(X_ONTOLOGY)
}

pub fn x_schema_with_study() -> OntologySchema {
    schema_from_turtle(&format!("{X_ONTOLOGY}{STUDY_ONTOLOGY}"))
}

pub fn x_schema_with_cycle() -> OntologySchema {
    schema_from_turtle(&format!("{X_ONTOLOGY}{STUDY_ONTOLOGY}{CYCLE_ONTOLOGY}"))
}

/// Type code "X", key "P1", age "42".
pub fn x_record() -> AttributeTree {
    AttributeTree::new()
        .with(text(0x0008, 0x0016, "UI", "X"))
        .with(text(0x0010, 0x0020, "LO", "P1"))
        .with(text(0x0010, 0x1010, "AS", "42"))
}

/// Full IRI of an instance.
pub fn data(local: &str) -> String {
    GraphStore::new().expand(&format!("data:{local}"))
}

/// Map one record into a fresh store.
pub fn map_one(schema: &OntologySchema, tree: &AttributeTree) -> GraphStore {
    let mut store = GraphStore::new();
    MappingEngine::new(schema)
        .map_record(&mut store, tree, None)
        .expect("map record");
    store
}

/// The facts every scenario with a keyed `X` root produces.
pub fn x_root_facts(key: &str) -> Vec<Fact> {
    vec![
        Fact::entity(data(key), RDF_TYPE, ldcm("X")),
        Fact::literal(data(key), ldcm("T00100020"), key),
    ]
}

/// Sort for order-insensitive comparison.
pub fn sorted(mut facts: Vec<Fact>) -> Vec<Fact> {
    facts.sort();
    facts
}
