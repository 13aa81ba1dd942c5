//! Vocabulary the schema lookups and the mapping engine share.
//!
//! Standard RDF/RDFS/OWL terms are constants. Everything that lives in the
//! ontology's own namespace is derived from a `SchemaVocabulary`, so a schema
//! published under a different namespace only needs a different vocabulary
//! value.

use crate::types::{ClassIri, PropertyIri, Tag};

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";

/// Namespace of the LinkedDicom ontology.
pub const DEFAULT_NAMESPACE: &str = "https://johanvansoest.nl/ontologies/LinkedDicom/";

/// Property-name prefix for the literal-style encoding of a tag.
const LITERAL_MARKER: char = 'T';
/// Property-name prefix for the relation-style encoding of a tag.
const RELATION_MARKER: char = 'R';

/// Names inside the ontology namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaVocabulary {
    namespace: String,
}

impl Default for SchemaVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl SchemaVocabulary {
    /// Create a vocabulary rooted at `namespace` (including the trailing
    /// separator).
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn term(&self, local: &str) -> String {
        format!("{}{local}", self.namespace)
    }

    /// Annotation linking a property to the class its attribute belongs to.
    #[must_use]
    pub fn related_to_information_entity(&self) -> String {
        self.term("related_to_information_entity")
    }

    /// Annotation linking a sequence property (or item class) to its
    /// container class.
    #[must_use]
    pub fn related_to_sequence(&self) -> String {
        self.term("related_to_sequence")
    }

    /// Annotation naming a class's key property.
    #[must_use]
    pub fn has_unique_identifier(&self) -> String {
        self.term("has_unique_identifier")
    }

    /// Annotation mapping a class to an external type code.
    #[must_use]
    pub fn has_type_code(&self) -> String {
        self.term("has_sop_class_uid")
    }

    /// Root of all sequence item classes.
    #[must_use]
    pub fn sequence_item_class(&self) -> ClassIri {
        ClassIri::new(self.term("Sequence_Item"))
    }

    /// Class used when a type code has no mapping.
    #[must_use]
    pub fn information_object_class(&self) -> ClassIri {
        ClassIri::new(self.term("Information_Object_Definition"))
    }

    /// Relation from a sequence container to each of its items.
    #[must_use]
    pub fn has_sequence_item(&self) -> PropertyIri {
        PropertyIri::new(self.term("has_sequence_item"))
    }

    /// The two candidate properties for a tag: literal-style first, then
    /// relation-style. Both are always checked.
    #[must_use]
    pub fn candidate_properties(&self, tag: Tag) -> [PropertyIri; 2] {
        [
            PropertyIri::new(format!("{}{LITERAL_MARKER}{tag}", self.namespace)),
            PropertyIri::new(format!("{}{RELATION_MARKER}{tag}", self.namespace)),
        ]
    }

    /// Recover the tag a property was derived from, in either encoding.
    #[must_use]
    pub fn tag_for_property(&self, property: &PropertyIri) -> Option<Tag> {
        let local = property.as_str().strip_prefix(&self.namespace)?;
        let encoded = local
            .strip_prefix(LITERAL_MARKER)
            .or_else(|| local.strip_prefix(RELATION_MARKER))?;
        encoded.parse().ok()
    }
}
