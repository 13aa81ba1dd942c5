//! Test a batch over a folder of record files with a processed list.

use std::path::Path;
use std::sync::Arc;

use crate::batch::{BatchOptions, BatchReport, BatchRunner};
use crate::decode::DicomJsonDecoder;
use crate::e2e_tests::helpers::*;
use crate::store::GraphStore;

fn x_json(patient: &str, age: &str) -> String {
    format!(
        r#"{{
  "00080016": {{ "vr": "UI", "Value": ["X"] }},
  "00100020": {{ "vr": "LO", "Value": ["{patient}"] }},
  "00101010": {{ "vr": "AS", "Value": ["{age}"] }}
}}"#
    )
}

fn runner(processed_list: &Path) -> BatchRunner {
    BatchRunner::new(
        Arc::new(x_schema()),
        Arc::new(DicomJsonDecoder::new()),
        BatchOptions {
            processed_list: Some(processed_list.to_path_buf()),
            ..BatchOptions::default()
        },
    )
}

#[test]
fn test_second_run_skips_processed_files() {
    let input = tempfile::tempdir().expect("tempdir");
    let state = tempfile::tempdir().expect("tempdir");
    let processed = state.path().join("processed.txt");

    std::fs::write(input.path().join("a.json"), x_json("P1", "42")).expect("write");
    std::fs::create_dir(input.path().join("nested")).expect("mkdir");
    std::fs::write(input.path().join("nested/b.json"), x_json("P2", "7")).expect("write");
    std::fs::write(input.path().join("broken.json"), "[]").expect("write");

    let mut store = GraphStore::new();
    let first = runner(&processed)
        .run(input.path(), &mut store)
        .expect("first run");
    assert_eq!(
        first,
        BatchReport {
            mapped: 2,
            failed: 1,
            skipped: 0
        }
    );
    assert!(
        store
            .facts()
            .contains(&Fact::literal(data("P2"), ldcm("T00101010"), "7"))
    );
    let after_first = store.facts();

    let second = runner(&processed)
        .run(input.path(), &mut store)
        .expect("second run");
    assert_eq!(
        second,
        BatchReport {
            mapped: 0,
            failed: 1,
            skipped: 2
        }
    );
    assert_eq!(store.facts(), after_first);

    let listed = std::fs::read_to_string(&processed).expect("read processed list");
    assert_eq!(listed.lines().count(), 2);
    assert!(!listed.contains("broken.json"));
}
