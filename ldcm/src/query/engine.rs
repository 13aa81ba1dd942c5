//! Query engine implementation.
//!
//! The `QueryEngine` evaluates datalog-style queries against a schema graph.
//! It supports:
//! - WHERE patterns (required matches, joined left to right)
//! - Zero-or-more path patterns (`rdfs:subClassOf*`)
//! - Filters (predicate functions)
//!
//! Solutions come out in a deterministic order: single-step patterns follow
//! schema document order, path patterns follow breadth-first distance from the
//! bound end. Callers that take "the first row" rely on this.

#![allow(clippy::unused_self)] // Methods take &self for API consistency

use std::collections::{HashSet, VecDeque};

use super::context::Bindings;
use super::types::{PathModifier, Pattern, PatternElement, Query, QueryResult, QueryRow, Term, Triple};
use crate::schema::graph::SchemaGraph;

/// The query engine evaluates queries against a schema graph.
pub struct QueryEngine<'a> {
    graph: &'a SchemaGraph,
}

impl<'a> QueryEngine<'a> {
    /// Create a new query engine for a schema graph.
    #[must_use]
    pub const fn new(graph: &'a SchemaGraph) -> Self {
        Self { graph }
    }

    /// Execute a query and return results.
    #[must_use]
    pub fn execute(&self, query: &Query) -> QueryResult {
        let columns: Vec<String> = query.find.iter().map(|v| v.name.clone()).collect();

        // One empty solution to extend
        let mut solutions = vec![Bindings::new()];

        for pattern in &query.where_patterns {
            solutions = self.match_pattern_all(pattern, solutions);
            if solutions.is_empty() {
                return QueryResult::with_columns(columns);
            }
        }

        for filter in &query.filters {
            solutions.retain(|bindings| filter.apply(bindings.get(&filter.selector)));
        }

        let mut result = QueryResult::with_columns(columns);
        for bindings in solutions {
            let row: QueryRow = query.find.iter().map(|var| bindings.get(var).cloned()).collect();
            result.push(row);
        }
        result
    }

    /// Match a pattern against the graph, extending each solution.
    fn match_pattern_all(&self, pattern: &Pattern, solutions: Vec<Bindings>) -> Vec<Bindings> {
        let mut extended = Vec::new();
        for bindings in solutions {
            extended.extend(self.match_any(pattern, &bindings));
        }
        extended
    }

    fn match_any(&self, pattern: &Pattern, bindings: &Bindings) -> Vec<Bindings> {
        match pattern.path {
            PathModifier::One => self.match_pattern(pattern, bindings),
            PathModifier::ZeroOrMore => self.match_path(pattern, bindings),
        }
    }

    /// Match a single-step pattern under the given bindings.
    fn match_pattern(&self, pattern: &Pattern, bindings: &Bindings) -> Vec<Bindings> {
        self.get_candidate_triples(pattern, bindings)
            .into_iter()
            .filter_map(|triple| self.try_match_triple(pattern, triple, bindings))
            .collect()
    }

    /// Get candidate triples based on pattern constraints, most selective
    /// index first.
    fn get_candidate_triples(&self, pattern: &Pattern, bindings: &Bindings) -> Vec<&'a Triple> {
        if let Some(subject) = resolve(&pattern.subject, bindings) {
            return self.graph.with_subject(subject).collect();
        }
        if let Some(object) = resolve(&pattern.object, bindings) {
            return self.graph.with_object(object).collect();
        }
        if let Some(Term::Iri(predicate)) = resolve(&pattern.predicate, bindings) {
            return self.graph.with_predicate(predicate).collect();
        }
        // Fall back to scanning all triples
        self.graph.iter().collect()
    }

    /// Try to match a triple against a pattern under the given bindings.
    /// Returns the extended bindings if the match succeeds.
    fn try_match_triple(
        &self,
        pattern: &Pattern,
        triple: &Triple,
        bindings: &Bindings,
    ) -> Option<Bindings> {
        let mut next = bindings.clone();
        let predicate = Term::Iri(triple.predicate.clone());

        if !bind(&pattern.subject, &triple.subject, &mut next)
            || !bind(&pattern.predicate, &predicate, &mut next)
            || !bind(&pattern.object, &triple.object, &mut next)
        {
            return None;
        }
        Some(next)
    }

    /// Match a zero-or-more path pattern.
    ///
    /// With a bound subject the walk goes forward along the predicate; with
    /// only a bound object it goes backward. When neither end is bound every
    /// term touching the predicate is used as a start node.
    fn match_path(&self, pattern: &Pattern, bindings: &Bindings) -> Vec<Bindings> {
        let Some(Term::Iri(predicate)) = resolve(&pattern.predicate, bindings) else {
            tracing::warn!("path pattern without a concrete predicate never matches");
            return Vec::new();
        };

        let mut results = Vec::new();
        if let Some(start) = resolve(&pattern.subject, bindings) {
            for reached in self.closure(start, predicate, Direction::Forward) {
                let mut next = bindings.clone();
                if bind(&pattern.object, &reached, &mut next) {
                    results.push(next);
                }
            }
            return results;
        }

        if let Some(end) = resolve(&pattern.object, bindings) {
            for reached in self.closure(end, predicate, Direction::Backward) {
                let mut next = bindings.clone();
                if bind(&pattern.subject, &reached, &mut next) {
                    results.push(next);
                }
            }
            return results;
        }

        let mut starts: Vec<&Term> = Vec::new();
        let mut seen = HashSet::new();
        for triple in self.graph.with_predicate(predicate) {
            for term in [&triple.subject, &triple.object] {
                if seen.insert(term) {
                    starts.push(term);
                }
            }
        }
        for start in starts {
            for reached in self.closure(start, predicate, Direction::Forward) {
                let mut next = bindings.clone();
                if bind(&pattern.subject, start, &mut next)
                    && bind(&pattern.object, &reached, &mut next)
                {
                    results.push(next);
                }
            }
        }
        results
    }

    /// Breadth-first reflexive-transitive closure from `start`.
    ///
    /// The start node comes first, then nodes in order of increasing
    /// distance. Each node is yielded once, so cycles terminate.
    fn closure(&self, start: &Term, predicate: &str, direction: Direction) -> Vec<Term> {
        let mut visited: HashSet<Term> = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::new();

        visited.insert(start.clone());
        queue.push_back(start.clone());

        while let Some(current) = queue.pop_front() {
            let next: Vec<&Term> = match direction {
                Direction::Forward => self
                    .graph
                    .with_subject(&current)
                    .filter(|t| t.predicate == predicate)
                    .map(|t| &t.object)
                    .collect(),
                Direction::Backward => self
                    .graph
                    .with_object(&current)
                    .filter(|t| t.predicate == predicate)
                    .map(|t| &t.subject)
                    .collect(),
            };
            for term in next {
                if visited.insert(term.clone()) {
                    queue.push_back(term.clone());
                }
            }
            order.push(current);
        }
        order
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// Resolve a pattern element to a concrete term, if it is one or is bound.
fn resolve<'c>(element: &'c PatternElement, bindings: &'c Bindings) -> Option<&'c Term> {
    match element {
        PatternElement::Term(term) => Some(term),
        PatternElement::Variable(var) => bindings.get(var),
    }
}

/// Match a pattern element against a term, binding a fresh variable.
fn bind(element: &PatternElement, term: &Term, bindings: &mut Bindings) -> bool {
    match element {
        PatternElement::Term(expected) => expected == term,
        PatternElement::Variable(var) => bindings.unify(var, term),
    }
}
