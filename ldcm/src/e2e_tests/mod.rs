//! End-to-end tests from attribute trees (or record files) to graph facts.
//!
//! Each test file covers a specific scenario, using small hand-written
//! ontologies and deterministic inputs.

#![cfg(test)]

mod helpers;

mod test_ancestor_relation;
mod test_batch_folder;
mod test_cycle_guard;
mod test_determinism;
mod test_dicom_folder;
mod test_literal_attribute;
mod test_parallel_batch;
mod test_provenance;
mod test_round_trip;
mod test_sequence_items;
