//! Building blocks of a schema query.
//!
//! A `Query` names the variables it returns and lists triple patterns over
//! schema `Term`s. All patterns must match, and a pattern may follow its
//! predicate zero or more times (`rdfs:subClassOf*`).

#![allow(clippy::type_complexity)] // Boxed filter predicates

use std::fmt;

pub use crate::schema::graph::{SchemaTriple as Triple, Term};

/// A named hole in a pattern, written `?name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

/// One position of a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternElement {
    Term(Term),
    Variable(Variable),
}

impl PatternElement {
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(Variable::new(name))
    }

    #[must_use]
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Term(Term::iri(iri))
    }

    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Term(Term::literal(value))
    }
}

/// How many predicate steps a pattern spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathModifier {
    /// An ordinary triple pattern.
    #[default]
    One,
    /// `p*`. The zero-step solution binds the object to the subject itself.
    ZeroOrMore,
}

/// A triple pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub subject: PatternElement,
    /// Must be a concrete IRI for path patterns.
    pub predicate: PatternElement,
    pub object: PatternElement,
    pub path: PathModifier,
}

impl Pattern {
    #[must_use]
    pub const fn new(
        subject: PatternElement,
        predicate: PatternElement,
        object: PatternElement,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
            path: PathModifier::One,
        }
    }

    /// `subject predicate* object`.
    #[must_use]
    pub fn zero_or_more(
        subject: PatternElement,
        predicate: impl Into<String>,
        object: PatternElement,
    ) -> Self {
        Self {
            subject,
            predicate: PatternElement::iri(predicate),
            object,
            path: PathModifier::ZeroOrMore,
        }
    }
}

/// A row-level test on one variable's binding.
pub struct Filter {
    pub selector: Variable,
    test: Box<dyn Fn(Option<&Term>) -> bool + Send + Sync>,
}

impl Filter {
    pub fn new<F>(selector: Variable, test: F) -> Self
    where
        F: Fn(Option<&Term>) -> bool + Send + Sync + 'static,
    {
        Self {
            selector,
            test: Box::new(test),
        }
    }

    /// `FILTER (?v IN (<a>, <b>, ...))`.
    #[must_use]
    pub fn iri_in(selector: Variable, iris: &[&str]) -> Self {
        let allowed: Vec<String> = iris.iter().map(|iri| (*iri).to_owned()).collect();
        Self::new(selector, move |term| {
            term.and_then(Term::as_iri)
                .is_some_and(|iri| allowed.iter().any(|allowed| allowed == iri))
        })
    }

    #[must_use]
    pub fn apply(&self, term: Option<&Term>) -> bool {
        (self.test)(term)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

/// A complete query, built with the chained methods below.
///
/// Evaluation order: `where_patterns` left to right, then `filters`.
#[derive(Debug, Default)]
pub struct Query {
    pub find: Vec<Variable>,
    pub where_patterns: Vec<Pattern>,
    pub filters: Vec<Filter>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn find(mut self, var: impl Into<String>) -> Self {
        self.find.push(Variable::new(var));
        self
    }

    #[must_use]
    pub fn where_pattern(mut self, pattern: Pattern) -> Self {
        self.where_patterns.push(pattern);
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// One solution, one cell per `find` variable.
pub type QueryRow = Vec<Option<Term>>;

/// The solutions of a query, in evaluation order.
#[derive(Debug, Default)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<QueryRow>,
}

impl QueryResult {
    #[must_use]
    pub const fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: QueryRow) {
        self.rows.push(row);
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The IRIs bound in one column, row by row, skipping unbound cells and
    /// literals.
    pub fn iris(&self, column: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(column)?.as_ref()?.as_iri())
    }
}
