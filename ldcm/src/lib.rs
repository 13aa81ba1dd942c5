// Life of a record:
// 1. A decoder turns a file into an attribute tree
// 2. The mapping engine asks the schema which entity the record is
//     - Resolve the root entity from its type code and key
//     - Create the containing entities (series, study, patient, ...)
//     - Attach every modeled attribute to its entity
//     - Recurse into sequences
// 3. Facts accumulate in the graph store
// 4. At the end of the batch the store is saved as Turtle or N-Triples
//
// System components:
//  - Schema service over an ontology, answered by a datalog query engine
//  - Graph store with a fixed prefix table
//  - Mapping engine
//  - Batch runner (sequential, or one store per worker then merged)

pub mod batch;
pub mod config;
pub mod decode;
pub mod mapping;
pub mod query;
pub mod schema;
pub mod store;
pub mod types;

#[cfg(test)]
mod e2e_tests;
#[cfg(test)]
mod testing;

pub use batch::{BatchOptions, BatchReport, BatchRunner};
pub use mapping::{MappingEngine, MappingOptions, RecordSource};
pub use schema::{OntologySchema, SchemaService};
pub use store::{GraphFormat, GraphStore};
