//! Owned, comparable view of one fact in the output graph.

use std::fmt;

/// The object position of a fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactObject {
    /// Full IRI of another entity (or class, for type assertions).
    Entity(String),
    /// Lexical form of a literal value.
    Literal(String),
}

/// A subject–predicate–object statement with full IRIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fact {
    pub subject: String,
    pub predicate: String,
    pub object: FactObject,
}

impl Fact {
    /// A fact whose object is another node.
    #[must_use]
    pub fn entity(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: FactObject::Entity(object.into()),
        }
    }

    /// A fact whose object is a literal.
    #[must_use]
    pub fn literal(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: FactObject::Literal(value.into()),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object {
            FactObject::Entity(iri) => {
                write!(f, "<{}> <{}> <{iri}>", self.subject, self.predicate)
            }
            FactObject::Literal(value) => {
                write!(f, "<{}> <{}> {value:?}", self.subject, self.predicate)
            }
        }
    }
}
