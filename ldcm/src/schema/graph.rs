//! In-memory schema graph.
//!
//! Holds the ontology triples in document order together with subject,
//! predicate and object indexes. The query engine reads from this graph;
//! nothing writes to it after loading.
//!
//! # Invariants
//!
//! - Each distinct triple is stored once (set semantics).
//! - Index entries are positions into `triples`, kept in ascending order, so
//!   every index scan yields triples in document order.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{NamedOrBlankNode, Term as RdfTerm};

use super::SchemaError;

/// A node or literal in the schema graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A named node, by full IRI.
    Iri(String),
    /// A blank node, by its local label.
    Blank(String),
    /// A literal, by lexical form. Datatype and language are not kept.
    Literal(String),
}

impl Term {
    #[must_use]
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// The IRI if this term is a named node.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Blank(_) | Self::Literal(_) => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(label) => write!(f, "_:{label}"),
            Self::Literal(value) => write!(f, "{value:?}"),
        }
    }
}

/// One schema statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaTriple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl SchemaTriple {
    #[must_use]
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// Guess the RDF serialization of a schema file from its extension.
#[must_use]
pub fn format_for_path(path: &Path) -> Option<RdfFormat> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "owl" | "rdf" | "xml" => Some(RdfFormat::RdfXml),
        "ttl" => Some(RdfFormat::Turtle),
        "nt" => Some(RdfFormat::NTriples),
        "n3" => Some(RdfFormat::N3),
        _ => None,
    }
}

/// Read-only, indexed schema graph.
#[derive(Debug, Default)]
pub struct SchemaGraph {
    triples: Vec<SchemaTriple>,
    seen: HashSet<SchemaTriple>,
    by_subject: HashMap<Term, Vec<usize>>,
    by_predicate: HashMap<String, Vec<usize>>,
    by_object: HashMap<Term, Vec<usize>>,
}

impl SchemaGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a schema file, guessing its format from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, its extension is not a
    /// known RDF serialization, or its content does not parse.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let format = format_for_path(path)
            .ok_or_else(|| SchemaError::UnsupportedFormat(path.display().to_string()))?;
        let bytes = std::fs::read(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes, format)
    }

    /// Parse a schema document.
    ///
    /// # Errors
    ///
    /// Returns an error on the first syntax error in the document.
    pub fn from_bytes(bytes: &[u8], format: RdfFormat) -> Result<Self, SchemaError> {
        let mut graph = Self::new();
        for quad in RdfParser::from_format(format).for_reader(bytes) {
            let quad = quad.map_err(|e| SchemaError::Parse(e.to_string()))?;
            let subject = match quad.subject {
                NamedOrBlankNode::NamedNode(node) => Term::Iri(node.into_string()),
                NamedOrBlankNode::BlankNode(node) => Term::Blank(node.into_string()),
            };
            let object = match quad.object {
                RdfTerm::NamedNode(node) => Term::Iri(node.into_string()),
                RdfTerm::BlankNode(node) => Term::Blank(node.into_string()),
                RdfTerm::Literal(literal) => Term::Literal(literal.value().to_owned()),
                #[allow(unreachable_patterns)]
                _ => continue,
            };
            graph.insert(SchemaTriple::new(
                subject,
                quad.predicate.into_string(),
                object,
            ));
        }
        tracing::debug!("loaded schema graph with {} triples", graph.len());
        Ok(graph)
    }

    /// Insert a triple. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: SchemaTriple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        let position = self.triples.len();
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .push(position);
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .push(position);
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .push(position);
        self.seen.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Whether any triple has this subject.
    #[must_use]
    pub fn has_subject(&self, subject: &Term) -> bool {
        self.by_subject.contains_key(subject)
    }

    /// All triples, in document order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaTriple> {
        self.triples.iter()
    }

    /// Triples with the given subject, in document order.
    pub fn with_subject<'a>(
        &'a self,
        subject: &Term,
    ) -> impl Iterator<Item = &'a SchemaTriple> + use<'a> {
        self.lookup(self.by_subject.get(subject))
    }

    /// Triples with the given predicate, in document order.
    pub fn with_predicate<'a>(
        &'a self,
        predicate: &str,
    ) -> impl Iterator<Item = &'a SchemaTriple> + use<'a> {
        self.lookup(self.by_predicate.get(predicate))
    }

    /// Triples with the given object, in document order.
    pub fn with_object<'a>(
        &'a self,
        object: &Term,
    ) -> impl Iterator<Item = &'a SchemaTriple> + use<'a> {
        self.lookup(self.by_object.get(object))
    }

    fn lookup<'a>(
        &'a self,
        positions: Option<&'a Vec<usize>>,
    ) -> impl Iterator<Item = &'a SchemaTriple> + use<'a> {
        positions
            .into_iter()
            .flatten()
            .filter_map(|&position| self.triples.get(position))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}
