//! `SchemaService` backed by an ontology graph.
//!
//! Each lookup is one datalog query over the loaded ontology. When a query
//! has several solutions, the first one wins: schema document order for
//! direct declarations, nearest superclass first for inherited ones.

use std::collections::HashSet;
use std::path::Path;

use oxigraph::io::RdfFormat;

use super::graph::SchemaGraph;
use super::vocab::{
    OWL_DATATYPE_PROPERTY, OWL_OBJECT_PROPERTY, RDF_TYPE, RDFS_DOMAIN, RDFS_RANGE,
    RDFS_SUBCLASS_OF, SchemaVocabulary,
};
use super::{AncestorRelation, PropertyKind, SchemaError, SchemaService};
use crate::query::{Filter, Pattern, PatternElement, Query, QueryEngine, Term, Variable};
use crate::types::{ClassIri, PropertyIri};

/// Schema lookups answered from an in-memory ontology.
#[derive(Debug)]
pub struct OntologySchema {
    graph: SchemaGraph,
    vocabulary: SchemaVocabulary,
}

impl OntologySchema {
    /// Wrap an already loaded graph.
    #[must_use]
    pub const fn new(graph: SchemaGraph, vocabulary: SchemaVocabulary) -> Self {
        Self { graph, vocabulary }
    }

    /// Load an ontology file in the default namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. A mapper cannot
    /// run without its schema, so callers treat this as fatal.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let graph = SchemaGraph::from_path(path)?;
        tracing::info!(
            "loaded ontology {} ({} triples)",
            path.display(),
            graph.len()
        );
        Ok(Self::new(graph, SchemaVocabulary::default()))
    }

    /// Parse an ontology document in the default namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse.
    pub fn from_bytes(bytes: &[u8], format: RdfFormat) -> Result<Self, SchemaError> {
        Ok(Self::new(
            SchemaGraph::from_bytes(bytes, format)?,
            SchemaVocabulary::default(),
        ))
    }

    /// Replace the vocabulary, for ontologies published under another
    /// namespace.
    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: SchemaVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// The underlying graph.
    #[must_use]
    pub const fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    /// Run a query and return the first IRI bound to its first column.
    fn first_iri(&self, query: &Query) -> Option<String> {
        QueryEngine::new(&self.graph)
            .execute(query)
            .iris(0)
            .next()
            .map(str::to_owned)
    }

    /// `<subject> <annotation> ?class`, first solution.
    fn annotation_target(&self, subject: &str, annotation: String) -> Option<ClassIri> {
        let query = Query::new().find("class").where_pattern(Pattern::new(
            PatternElement::iri(subject),
            PatternElement::iri(annotation),
            PatternElement::var("class"),
        ));
        self.first_iri(&query).map(ClassIri::new)
    }
}

impl SchemaService for OntologySchema {
    fn vocabulary(&self) -> &SchemaVocabulary {
        &self.vocabulary
    }

    fn property_exists(&self, property: &PropertyIri) -> bool {
        self.graph.has_subject(&Term::iri(property.as_str()))
    }

    fn property_kind(&self, property: &PropertyIri) -> Option<PropertyKind> {
        let query = Query::new()
            .find("class")
            .where_pattern(Pattern::new(
                PatternElement::iri(property.as_str()),
                PatternElement::iri(RDF_TYPE),
                PatternElement::var("class"),
            ))
            .filter(Filter::iri_in(
                Variable::new("class"),
                &[OWL_DATATYPE_PROPERTY, OWL_OBJECT_PROPERTY],
            ));

        match self.first_iri(&query)?.as_str() {
            OWL_DATATYPE_PROPERTY => Some(PropertyKind::Literal),
            OWL_OBJECT_PROPERTY => Some(PropertyKind::Object),
            _ => None,
        }
    }

    fn entity_type_for_property(&self, property: &PropertyIri) -> Option<ClassIri> {
        self.annotation_target(
            property.as_str(),
            self.vocabulary.related_to_information_entity(),
        )
    }

    fn sequence_container_type(&self, property: &PropertyIri) -> Option<ClassIri> {
        self.annotation_target(property.as_str(), self.vocabulary.related_to_sequence())
    }

    fn sequence_item_type(&self, container: &ClassIri) -> Option<ClassIri> {
        let query = Query::new()
            .find("class")
            .where_pattern(Pattern::new(
                PatternElement::var("class"),
                PatternElement::iri(self.vocabulary.related_to_sequence()),
                PatternElement::iri(container.as_str()),
            ))
            .where_pattern(Pattern::zero_or_more(
                PatternElement::var("class"),
                RDFS_SUBCLASS_OF,
                PatternElement::iri(self.vocabulary.sequence_item_class().as_str()),
            ));
        self.first_iri(&query).map(ClassIri::new)
    }

    fn ancestor_relations(&self, class: &ClassIri) -> Vec<AncestorRelation> {
        // The zero-step path makes the class its own superclass, so this
        // covers relations ranging over the class directly as well.
        let query = Query::new()
            .find("predicate")
            .find("domain")
            .where_pattern(Pattern::zero_or_more(
                PatternElement::iri(class.as_str()),
                RDFS_SUBCLASS_OF,
                PatternElement::var("super"),
            ))
            .where_pattern(Pattern::new(
                PatternElement::var("predicate"),
                PatternElement::iri(RDFS_RANGE),
                PatternElement::var("super"),
            ))
            .where_pattern(Pattern::new(
                PatternElement::var("predicate"),
                PatternElement::iri(RDFS_DOMAIN),
                PatternElement::var("domain"),
            ));

        let result = QueryEngine::new(&self.graph).execute(&query);
        let mut seen = HashSet::new();
        let mut relations = Vec::new();
        for row in &result.rows {
            let (Some(Term::Iri(predicate)), Some(Term::Iri(domain))) = (&row[0], &row[1]) else {
                continue;
            };
            let relation = AncestorRelation {
                owner: ClassIri::new(domain.as_str()),
                relation: PropertyIri::new(predicate.as_str()),
            };
            if seen.insert(relation.clone()) {
                relations.push(relation);
            }
        }
        relations
    }

    fn key_property(&self, class: &ClassIri) -> Option<PropertyIri> {
        let query = Query::new()
            .find("key")
            .where_pattern(Pattern::zero_or_more(
                PatternElement::iri(class.as_str()),
                RDFS_SUBCLASS_OF,
                PatternElement::var("super"),
            ))
            .where_pattern(Pattern::new(
                PatternElement::var("super"),
                PatternElement::iri(self.vocabulary.has_unique_identifier()),
                PatternElement::var("key"),
            ));
        self.first_iri(&query).map(PropertyIri::new)
    }

    fn class_for_type_code(&self, code: &str) -> ClassIri {
        let query = Query::new().find("class").where_pattern(Pattern::new(
            PatternElement::var("class"),
            PatternElement::iri(self.vocabulary.has_type_code()),
            PatternElement::literal(code),
        ));
        self.first_iri(&query).map_or_else(
            || {
                tracing::debug!("no class for type code {code}, using the information object class");
                self.vocabulary.information_object_class()
            },
            ClassIri::new,
        )
    }
}
