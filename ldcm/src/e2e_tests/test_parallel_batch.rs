//! Test that a parallel batch builds the same graph as a sequential one.

use std::sync::Arc;

use crate::batch::{BatchOptions, BatchRunner};
use crate::decode::DicomJsonDecoder;
use crate::store::{GraphFormat, GraphStore};
use crate::testing::{ct_json, fixture_schema};

fn runner(workers: usize) -> BatchRunner {
    BatchRunner::new(
        Arc::new(fixture_schema()),
        Arc::new(DicomJsonDecoder::new()),
        BatchOptions {
            workers,
            ..BatchOptions::default()
        },
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_matches_sequential() {
    let input = tempfile::tempdir().expect("tempdir");
    for series in 0..3 {
        for image in 0..3 {
            let series_uid = format!("1.2.{series}");
            let image_uid = format!("{series_uid}.{image}");
            std::fs::write(
                input.path().join(format!("s{series}i{image}.json")),
                ct_json("P1", "1.2", &series_uid, &image_uid),
            )
            .expect("write");
        }
    }

    let mut sequential = GraphStore::new();
    let seq_report = runner(1)
        .run(input.path(), &mut sequential)
        .expect("sequential run");

    let mut parallel = GraphStore::new();
    let par_report = runner(4)
        .run_parallel(input.path(), &mut parallel)
        .await
        .expect("parallel run");

    assert_eq!(seq_report, par_report);
    assert_eq!(par_report.mapped, 9);
    assert_eq!(parallel.facts(), sequential.facts());
    assert_eq!(
        parallel.export(GraphFormat::Turtle).expect("export"),
        sequential.export(GraphFormat::Turtle).expect("export")
    );
}
