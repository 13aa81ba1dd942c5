//! Schema lookups.
//!
//! The mapping engine never names a class or property itself. Everything it
//! needs to know (which tags are modeled, what kind of fact a tag produces,
//! which entity an attribute belongs to, how entities nest) is answered by a
//! `SchemaService`.
//!
//! # Contract
//!
//! - Every lookup is pure: same schema, same answer.
//! - "Not found" (`None`, `false`, empty) means "not modeled". Callers skip,
//!   they do not fail.
//! - Implementations are read-only after construction and shareable across
//!   threads.

pub mod graph;
mod ontology;
pub mod vocab;

use std::path::PathBuf;

pub use graph::SchemaGraph;
pub use ontology::OntologySchema;
pub use vocab::SchemaVocabulary;

use crate::types::{ClassIri, PropertyIri};

/// How a property's values are represented in the output graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// The value is written as a literal.
    Literal,
    /// The value is written as a reference to another entity.
    Object,
}

/// A relation that makes `owner` a container of some class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AncestorRelation {
    /// The class that owns the relation (its domain).
    pub owner: ClassIri,
    /// The relation linking an owner instance to the contained instance.
    pub relation: PropertyIri,
}

/// Read-only questions the mapping engine asks about the schema.
pub trait SchemaService: Send + Sync {
    /// Names inside the schema's namespace (tag encoding, item relation,
    /// fallback class).
    fn vocabulary(&self) -> &SchemaVocabulary;

    /// Whether the schema declares this property at all.
    fn property_exists(&self, property: &PropertyIri) -> bool;

    /// Literal or object. `None` when the property declares neither.
    fn property_kind(&self, property: &PropertyIri) -> Option<PropertyKind>;

    /// The class an attribute with this property attaches to when no entity
    /// is open yet.
    fn entity_type_for_property(&self, property: &PropertyIri) -> Option<ClassIri>;

    /// The class representing a whole sequence for a container-valued
    /// property.
    fn sequence_container_type(&self, property: &PropertyIri) -> Option<ClassIri>;

    /// The class of one item inside a container class.
    fn sequence_item_type(&self, container: &ClassIri) -> Option<ClassIri>;

    /// Every relation whose range is `class` or one of its superclasses,
    /// paired with the relation's owning class. No duplicates.
    fn ancestor_relations(&self, class: &ClassIri) -> Vec<AncestorRelation>;

    /// The property holding the natural identifier of `class`, inherited
    /// from the nearest superclass when not declared on the class itself.
    fn key_property(&self, class: &ClassIri) -> Option<PropertyIri>;

    /// The root class for an external type code. Never fails: unmapped codes
    /// resolve to the generic information object class.
    fn class_for_type_code(&self, code: &str) -> ClassIri;
}

/// Errors that can occur while loading a schema.
#[derive(Debug)]
pub enum SchemaError {
    /// The schema file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file extension does not name a supported RDF serialization.
    UnsupportedFormat(String),
    /// The schema document is not valid RDF.
    Parse(String),
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read schema {}: {source}", path.display())
            }
            Self::UnsupportedFormat(path) => {
                write!(f, "unsupported schema format: {path}")
            }
            Self::Parse(message) => write!(f, "failed to parse schema: {message}"),
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::UnsupportedFormat(_) | Self::Parse(_) => None,
        }
    }
}
