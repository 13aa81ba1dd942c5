//! Schema-driven mapping of attribute trees into the graph store.
//!
//! The engine walks one record at a time:
//! 1. Resolve the root entity from the record's type code and key.
//! 2. Materialize the chain of containing entities (series, study, ...).
//! 3. Sweep the attributes, attaching each modeled one to its entity.
//! 4. Recurse into sequences, creating container and item entities.
//!
//! Which classes and properties exist is decided entirely by the
//! `SchemaService`; anything it does not model is skipped.

mod engine;

use std::path::PathBuf;

pub use engine::MappingEngine;

use crate::store::GraphStoreError;
use crate::types::{ClassIri, PropertyIri, Tag};

/// Provenance predicate for the record's storage location.
pub const CONTENT_URL: &str = "https://schema.org/contentUrl";
/// Provenance predicate for the record's media type.
pub const ENCODING_FORMAT: &str = "https://schema.org/encodingFormat";

/// Knobs that change what a mapping run writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingOptions {
    /// Attach each record's location and encoding to its root entity.
    pub persistent_storage: bool,
    /// Attribute holding the record's type code.
    pub type_code_tag: Tag,
}

impl MappingOptions {
    /// SOP Class UID.
    pub const DEFAULT_TYPE_CODE_TAG: Tag = Tag::new(0x0008, 0x0016);
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            persistent_storage: false,
            type_code_tag: Self::DEFAULT_TYPE_CODE_TAG,
        }
    }
}

/// Where a record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSource {
    /// Absolute path of the record file.
    pub location: PathBuf,
    /// Media type of the record file.
    pub encoding_format: String,
}

/// Errors that abort the mapping of one record.
#[derive(Debug)]
pub enum MappingError {
    /// The record lacks an attribute the schema needs (a type code or an
    /// entity key).
    MissingAttribute { tag: Tag },
    /// A key property does not encode a tag, so its value cannot be read.
    UnencodedKey(PropertyIri),
    /// The record's root class declares no key, directly or inherited.
    MissingKeyProperty(ClassIri),
    /// The store rejected a write.
    Store(GraphStoreError),
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAttribute { tag } => write!(f, "record has no value for {tag}"),
            Self::UnencodedKey(property) => {
                write!(f, "key property {property} does not name an attribute")
            }
            Self::MissingKeyProperty(class) => write!(f, "class {class} has no key property"),
            Self::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for MappingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GraphStoreError> for MappingError {
    fn from(e: GraphStoreError) -> Self {
        Self::Store(e)
    }
}
