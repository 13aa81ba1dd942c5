//! In-memory accumulator for the output graph.
//!
//! Entities are addressed by short identifiers (`data:<value>`) and expanded
//! through the store's prefix table when facts are written. The store is an
//! explicit handle: one per batch, or one per worker when mapping in
//! parallel.
//!
//! # Invariants
//!
//! - An entity exists once it is the subject of at least one fact.
//! - `create_or_get_instance` writes the type assertion and key literal only
//!   the first time an identifier is seen.
//! - Facts can only be attached to entities that exist.
//! - A failed `atomically` block leaves the store as it found it.

pub mod format;
pub mod namespace;

use std::path::{Path, PathBuf};

use oxigraph::io::{RdfParser, RdfSerializer};
use oxigraph::model::vocab::rdf;
use oxigraph::model::{Graph, Literal, NamedNode, NamedOrBlankNodeRef, TermRef, Triple, TripleRef};

pub use format::GraphFormat;
pub use namespace::NamespaceTable;

use crate::types::{ClassIri, EntityId, Fact, PropertyIri};

/// Prefix under which generated instances live.
pub const INSTANCE_PREFIX: &str = "data";

/// The output graph and the prefixes used to write it.
#[derive(Debug, Clone)]
pub struct GraphStore {
    graph: Graph,
    namespaces: NamespaceTable,
    /// Triples first inserted inside the running `atomically` block.
    journal: Option<Vec<Triple>>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    /// An empty store with the default prefix table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_namespaces(NamespaceTable::default())
    }

    /// An empty store with an explicit prefix table. The table must bind
    /// the instance prefix.
    #[must_use]
    pub fn with_namespaces(namespaces: NamespaceTable) -> Self {
        Self {
            graph: Graph::new(),
            namespaces,
            journal: None,
        }
    }

    #[must_use]
    pub const fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Return the entity for `identifier`, creating it if needed.
    ///
    /// Identifiers already carrying the instance prefix are used verbatim;
    /// anything else is prefixed. A new entity gets a type assertion to
    /// `class` and, when `key_property` is given, the raw identifier as its
    /// key literal. Calling this again with the same identifier writes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIri` if the class, key property or expanded identifier
    /// is not a valid IRI.
    pub fn create_or_get_instance(
        &mut self,
        class: &ClassIri,
        identifier: &str,
        key_property: Option<&PropertyIri>,
    ) -> Result<EntityId, GraphStoreError> {
        let id = if identifier
            .strip_prefix(INSTANCE_PREFIX)
            .is_some_and(|rest| rest.starts_with(':'))
        {
            EntityId::new(identifier)
        } else {
            EntityId::new(format!("{INSTANCE_PREFIX}:{identifier}"))
        };

        let subject = self.entity_node(&id)?;
        if self.has_subject(&subject) {
            return Ok(id);
        }

        let class = named_node(class.as_str())?;
        self.insert(Triple::new(subject.clone(), rdf::TYPE, class));
        if let Some(key) = key_property {
            let key = named_node(key.as_str())?;
            self.insert(Triple::new(
                subject,
                key,
                Literal::new_simple_literal(identifier),
            ));
        }
        tracing::trace!("created instance {id}");
        Ok(id)
    }

    /// Attach a literal value to an existing entity.
    ///
    /// # Errors
    ///
    /// Returns `MissingSubject` if the entity was never created.
    pub fn add_literal_fact(
        &mut self,
        subject: &EntityId,
        property: &PropertyIri,
        value: &str,
    ) -> Result<(), GraphStoreError> {
        let subject = self.existing_subject(subject)?;
        let predicate = named_node(property.as_str())?;
        self.insert(Triple::new(
            subject,
            predicate,
            Literal::new_simple_literal(value),
        ));
        Ok(())
    }

    /// Link an existing entity to another entity. The object need not exist.
    ///
    /// # Errors
    ///
    /// Returns `MissingSubject` if the subject was never created.
    pub fn add_object_fact(
        &mut self,
        subject: &EntityId,
        property: &PropertyIri,
        object: &EntityId,
    ) -> Result<(), GraphStoreError> {
        let subject = self.existing_subject(subject)?;
        let predicate = named_node(property.as_str())?;
        let object = self.entity_node(object)?;
        self.insert(Triple::new(subject, predicate, object));
        Ok(())
    }

    /// Run `f` against the store, keeping its writes only if it succeeds.
    ///
    /// Triples that were already present before `f` ran are never removed.
    /// Blocks may nest; an inner block's writes belong to the outer one once
    /// it succeeds.
    pub fn atomically<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let outer = self.journal.replace(Vec::new());
        let result = f(self);
        let written = std::mem::replace(&mut self.journal, outer).unwrap_or_default();
        if result.is_err() {
            let mut removed = 0;
            for triple in &written {
                if self.graph.remove(triple.as_ref()) {
                    removed += 1;
                }
            }
            tracing::debug!("rolled back {removed} triples");
        } else if let Some(outer) = self.journal.as_mut() {
            outer.extend(written);
        }
        result
    }

    /// Identifier for an attribute value used as the object of a relation.
    /// The value is percent-encoded once, when the identifier is expanded.
    #[must_use]
    #[allow(clippy::unused_self)] // Part of the store's identifier surface
    pub fn value_as_entity_reference(&self, value: &str) -> EntityId {
        EntityId::new(format!("{INSTANCE_PREFIX}:{value}"))
    }

    #[must_use]
    pub fn exists(&self, entity: &EntityId) -> bool {
        self.entity_node(entity)
            .is_ok_and(|node| self.has_subject(&node))
    }

    /// Expand a short identifier to a full IRI. Text without a known prefix
    /// is returned unchanged.
    #[must_use]
    pub fn expand(&self, short: &str) -> String {
        self.namespaces
            .expand(short)
            .unwrap_or_else(|| short.to_owned())
    }

    /// Shorten a full IRI with the prefix table. IRIs outside every known
    /// namespace are returned unchanged.
    #[must_use]
    pub fn shorten(&self, iri: &str) -> String {
        self.namespaces
            .shorten(iri)
            .unwrap_or_else(|| iri.to_owned())
    }

    /// Strip a known namespace or prefix, leaving the local name.
    #[must_use]
    pub fn remove_namespace(&self, text: &str) -> String {
        self.namespaces.remove_namespace(text)
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// All facts with full IRIs, sorted.
    #[must_use]
    pub fn facts(&self) -> Vec<Fact> {
        let mut facts: Vec<Fact> = self
            .graph
            .iter()
            .map(|triple| {
                let subject = match triple.subject {
                    NamedOrBlankNodeRef::NamedNode(node) => node.as_str().to_owned(),
                    NamedOrBlankNodeRef::BlankNode(node) => node.to_string(),
                };
                let predicate = triple.predicate.as_str();
                match triple.object {
                    TermRef::NamedNode(node) => Fact::entity(subject, predicate, node.as_str()),
                    TermRef::Literal(literal) => Fact::literal(subject, predicate, literal.value()),
                    other => Fact::entity(subject, predicate, other.to_string()),
                }
            })
            .collect();
        facts.sort();
        facts
    }

    /// Serialize the whole graph. Triples are written in a stable order and
    /// Turtle output declares every prefix in the table.
    ///
    /// # Errors
    ///
    /// Returns an error if a namespace is not a valid IRI or writing fails.
    pub fn export(&self, format: GraphFormat) -> Result<Vec<u8>, GraphStoreError> {
        let mut serializer = RdfSerializer::from_format(format.rdf_format());
        if format == GraphFormat::Turtle {
            for (prefix, namespace) in self.namespaces.iter() {
                serializer = serializer.with_prefix(prefix, namespace).map_err(|e| {
                    GraphStoreError::InvalidIri {
                        iri: namespace.to_owned(),
                        message: e.to_string(),
                    }
                })?;
            }
        }

        let mut triples: Vec<Triple> = self.graph.iter().map(TripleRef::into_owned).collect();
        triples.sort_by_cached_key(ToString::to_string);

        let mut writer = serializer.for_writer(Vec::new());
        for triple in &triples {
            writer.serialize_triple(triple.as_ref())?;
        }
        Ok(writer.finish()?)
    }

    /// Add every triple of a previously exported graph. Returns how many
    /// were new.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the input is not valid in `format`.
    pub fn load(&mut self, bytes: &[u8], format: GraphFormat) -> Result<usize, GraphStoreError> {
        let mut added = 0;
        for quad in RdfParser::from_format(format.rdf_format()).for_reader(bytes) {
            let quad = quad.map_err(|e| GraphStoreError::Parse(e.to_string()))?;
            let triple = Triple::new(quad.subject, quad.predicate, quad.object);
            if self.insert(triple) {
                added += 1;
            }
        }
        tracing::debug!("loaded {added} new triples ({format})");
        Ok(added)
    }

    /// Write the export to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path, format: GraphFormat) -> Result<(), GraphStoreError> {
        let bytes = self.export(format)?;
        std::fs::write(path, bytes).map_err(|source| GraphStoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("saved {} triples to {} ({format})", self.len(), path.display());
        Ok(())
    }

    fn insert(&mut self, triple: Triple) -> bool {
        let inserted = self.graph.insert(triple.as_ref());
        if inserted && let Some(journal) = self.journal.as_mut() {
            journal.push(triple);
        }
        inserted
    }

    fn entity_node(&self, entity: &EntityId) -> Result<NamedNode, GraphStoreError> {
        named_node(&self.expand(entity.as_str()))
    }

    fn existing_subject(&self, entity: &EntityId) -> Result<NamedNode, GraphStoreError> {
        let node = self.entity_node(entity)?;
        if self.has_subject(&node) {
            Ok(node)
        } else {
            Err(GraphStoreError::MissingSubject(entity.clone()))
        }
    }

    fn has_subject(&self, node: &NamedNode) -> bool {
        self.graph.triples_for_subject(node.as_ref()).next().is_some()
    }
}

fn named_node(iri: &str) -> Result<NamedNode, GraphStoreError> {
    NamedNode::new(iri).map_err(|e| GraphStoreError::InvalidIri {
        iri: iri.to_owned(),
        message: e.to_string(),
    })
}

/// Errors that can occur while writing to or serializing the store.
#[derive(Debug)]
pub enum GraphStoreError {
    /// A fact was attached to an entity that was never created.
    MissingSubject(EntityId),
    /// An identifier expanded to something that is not an IRI.
    InvalidIri { iri: String, message: String },
    /// Serialization failed.
    Serialize(std::io::Error),
    /// Loaded data is not valid in the declared format.
    Parse(String),
    /// The export could not be written to disk.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for GraphStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSubject(id) => write!(f, "instance {id} does not exist"),
            Self::InvalidIri { iri, message } => write!(f, "invalid IRI '{iri}': {message}"),
            Self::Serialize(e) => write!(f, "failed to serialize graph: {e}"),
            Self::Parse(message) => write!(f, "failed to parse graph: {message}"),
            Self::Io { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for GraphStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialize(e) | Self::Io { source: e, .. } => Some(e),
            Self::MissingSubject(_) | Self::InvalidIri { .. } | Self::Parse(_) => None,
        }
    }
}

impl From<std::io::Error> for GraphStoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Serialize(e)
    }
}
