//! Identifier types for schema classes, schema properties and graph entities.
//!
//! This module provides newtype wrappers so a class IRI can never be passed
//! where a property IRI or an entity identifier is expected.

use std::fmt;

/// The IRI of a schema class (an entity type such as a study or a series).
///
/// # Invariants
///
/// - Always a full IRI as it appears in the schema graph, never a prefixed name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassIri(String);

impl ClassIri {
    /// Create a class IRI from a full IRI string.
    #[must_use]
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Get the IRI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassIri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClassIri {
    fn from(iri: &str) -> Self {
        Self::new(iri)
    }
}

/// The IRI of a schema property (a literal attribute or an object relation).
///
/// # Invariants
///
/// - Always a full IRI as it appears in the schema graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyIri(String);

impl PropertyIri {
    /// Create a property IRI from a full IRI string.
    #[must_use]
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Get the IRI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyIri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PropertyIri {
    fn from(iri: &str) -> Self {
        Self::new(iri)
    }
}

/// Identifier of an entity in the output graph.
///
/// Entity identifiers are kept in their short, prefixed form (`data:1.2.3`);
/// the graph store expands them to full IRIs when facts are written.
///
/// # Invariants
///
/// - Two entities are the same entity if and only if their identifiers are
///   byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    /// Create an entity identifier from its short form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive a structural child identifier: `<self>_<suffix>`.
    ///
    /// Used for sequence containers (suffix = tag string) and sequence items
    /// (suffix = positional index), which have no business key of their own.
    #[must_use]
    pub fn child(&self, suffix: impl fmt::Display) -> Self {
        Self(format!("{}_{suffix}", self.0))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
