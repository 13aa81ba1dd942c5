//! Query engine for the schema graph.
//!
//! The schema lookups are expressed as small datalog-style queries rather
//! than hand-written graph walks. This module provides:
//! - Pattern matching with variables
//! - WHERE clauses (conjunction of patterns)
//! - Zero-or-more path patterns for class hierarchies
//! - Filters (predicate functions)
//!
//! # Datalog-style Query Example
//!
//! ```ignore
//! use query::{Query, Pattern, PatternElement, QueryEngine};
//!
//! let engine = QueryEngine::new(&schema_graph);
//!
//! // Every superclass of CT_Image, nearest first
//! let query = Query::new()
//!     .find("super")
//!     .where_pattern(Pattern::zero_or_more(
//!         PatternElement::iri(CT_IMAGE),
//!         RDFS_SUBCLASS_OF,
//!         PatternElement::var("super"),
//!     ));
//!
//! let result = engine.execute(&query);
//! for iri in result.iris(0) {
//!     println!("{iri}");
//! }
//! ```

pub mod context;
pub mod engine;
pub mod types;

pub use context::Bindings;
pub use engine::QueryEngine;
pub use types::{
    Filter, PathModifier, Pattern, PatternElement, Query, QueryResult, QueryRow, Term, Triple,
    Variable,
};
