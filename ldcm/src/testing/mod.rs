//! Shared fixtures: a small ontology in the LinkedDicom namespace and the
//! records that exercise it.

#![allow(clippy::expect_used)]

use oxigraph::io::RdfFormat;

use crate::schema::OntologySchema;
use crate::schema::vocab::DEFAULT_NAMESPACE;
use crate::types::{AttributeTree, Element, Tag};

/// Type code of the CT image class in the fixture ontology.
pub const CT_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.2";

/// Patient / Study / Series / CT image, with one referenced-image sequence
/// whose item class reaches `Sequence_Item` through an intermediate class.
pub const FIXTURE_ONTOLOGY: &str = r#"
@prefix ldcm: <https://johanvansoest.nl/ontologies/LinkedDicom/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

ldcm:Information_Object_Definition a owl:Class ;
    ldcm:has_unique_identifier ldcm:T00080018 .
ldcm:CT_Image_Storage a owl:Class ;
    rdfs:subClassOf ldcm:Information_Object_Definition ;
    ldcm:has_sop_class_uid "1.2.840.10008.5.1.4.1.1.2" .
ldcm:Series a owl:Class ; ldcm:has_unique_identifier ldcm:T0020000E .
ldcm:Study a owl:Class ; ldcm:has_unique_identifier ldcm:T0020000D .
ldcm:Patient a owl:Class ; ldcm:has_unique_identifier ldcm:T00100020 .

ldcm:has_image a owl:ObjectProperty ;
    rdfs:domain ldcm:Series ; rdfs:range ldcm:Information_Object_Definition .
ldcm:has_series a owl:ObjectProperty ;
    rdfs:domain ldcm:Study ; rdfs:range ldcm:Series .
ldcm:has_study a owl:ObjectProperty ;
    rdfs:domain ldcm:Patient ; rdfs:range ldcm:Study .

ldcm:T00080018 a owl:DatatypeProperty ;
    ldcm:related_to_information_entity ldcm:Information_Object_Definition .
ldcm:T0020000E a owl:DatatypeProperty ; ldcm:related_to_information_entity ldcm:Series .
ldcm:T0020000D a owl:DatatypeProperty ; ldcm:related_to_information_entity ldcm:Study .
ldcm:T00100020 a owl:DatatypeProperty ; ldcm:related_to_information_entity ldcm:Patient .
ldcm:T00100010 a owl:DatatypeProperty ; ldcm:related_to_information_entity ldcm:Patient .
ldcm:T00101010 a owl:DatatypeProperty ; ldcm:related_to_information_entity ldcm:Patient .
ldcm:T00080060 a owl:DatatypeProperty ; ldcm:related_to_information_entity ldcm:Series .

ldcm:T00081155 a owl:DatatypeProperty .
ldcm:R00081155 a owl:ObjectProperty .
ldcm:has_untyped rdfs:label "declared but neither literal nor object" .

ldcm:R00081140 a owl:ObjectProperty ;
    ldcm:related_to_sequence ldcm:Referenced_Image_Sequence .
ldcm:Referenced_Image_Sequence a owl:Class .
ldcm:Generic_Item rdfs:subClassOf ldcm:Sequence_Item .
ldcm:Referenced_Image_Item a owl:Class ;
    rdfs:subClassOf ldcm:Generic_Item ;
    ldcm:related_to_sequence ldcm:Referenced_Image_Sequence .
ldcm:has_sequence_item a owl:ObjectProperty .
"#;

/// Full IRI of a term in the LinkedDicom namespace.
#[must_use]
pub fn ldcm(local: &str) -> String {
    format!("{DEFAULT_NAMESPACE}{local}")
}

/// Parse a Turtle ontology.
pub fn schema_from_turtle(turtle: &str) -> OntologySchema {
    OntologySchema::from_bytes(turtle.as_bytes(), RdfFormat::Turtle).expect("fixture ontology")
}

/// The fixture ontology.
pub fn fixture_schema() -> OntologySchema {
    schema_from_turtle(FIXTURE_ONTOLOGY)
}

/// Shorthand for a text element.
#[must_use]
pub fn text(group: u16, element: u16, vr: &str, value: &str) -> Element {
    Element::text(Tag::new(group, element), vr, value)
}

/// A CT image record: patient P1, study 1.2, series 1.2.3, image 1.2.3.4,
/// referencing image 1.2.3.9.
#[must_use]
pub fn ct_record() -> AttributeTree {
    ct_record_for("P1", "1.2", "1.2.3", "1.2.3.4")
}

/// A CT image record with the given identifiers.
#[must_use]
pub fn ct_record_for(patient: &str, study: &str, series: &str, image: &str) -> AttributeTree {
    AttributeTree::new()
        .with(text(0x0008, 0x0016, "UI", CT_IMAGE_STORAGE))
        .with(text(0x0008, 0x0018, "UI", image))
        .with(text(0x0008, 0x0060, "CS", "CT"))
        .with(Element::sequence(
            Tag::new(0x0008, 0x1140),
            vec![AttributeTree::new().with(text(0x0008, 0x1155, "UI", "1.2.3.9"))],
        ))
        .with(text(0x0010, 0x0010, "PN", "Doe^John"))
        .with(text(0x0010, 0x0020, "LO", patient))
        .with(text(0x0020, 0x000D, "UI", study))
        .with(text(0x0020, 0x000E, "UI", series))
}

/// The DICOM JSON form of `ct_record_for`.
#[must_use]
pub fn ct_json(patient: &str, study: &str, series: &str, image: &str) -> String {
    format!(
        r#"{{
  "00080016": {{ "vr": "UI", "Value": ["{CT_IMAGE_STORAGE}"] }},
  "00080018": {{ "vr": "UI", "Value": ["{image}"] }},
  "00080060": {{ "vr": "CS", "Value": ["CT"] }},
  "00081140": {{ "vr": "SQ", "Value": [
    {{ "00081155": {{ "vr": "UI", "Value": ["1.2.3.9"] }} }}
  ] }},
  "00100010": {{ "vr": "PN", "Value": [{{ "Alphabetic": "Doe^John" }}] }},
  "00100020": {{ "vr": "LO", "Value": ["{patient}"] }},
  "0020000D": {{ "vr": "UI", "Value": ["{study}"] }},
  "0020000E": {{ "vr": "UI", "Value": ["{series}"] }}
}}"#
    )
}
