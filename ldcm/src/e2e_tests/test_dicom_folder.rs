//! Test a batch over a folder of DICOM Part 10 files.

use std::path::Path;
use std::sync::Arc;

use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_object::InMemDicomObject;
use dicom_object::mem::InMemElement;
use dicom_object::meta::FileMetaTableBuilder;

use crate::batch::{BatchOptions, BatchReport, BatchRunner};
use crate::decode::InputFormat;
use crate::e2e_tests::helpers::*;
use crate::mapping::ENCODING_FORMAT;
use crate::store::GraphStore;

fn write_x_file(path: &Path, patient: &str, age: &str) {
    let element = |group, number, vr, value: &str| -> InMemElement {
        DataElement::new(dicom_core::Tag(group, number), vr, PrimitiveValue::from(value))
    };
    InMemDicomObject::from_element_iter([
        element(0x0008, 0x0016, VR::UI, "X"),
        element(0x0008, 0x0018, VR::UI, "1.2.3"),
        element(0x0010, 0x0020, VR::LO, patient),
        element(0x0010, 0x1010, VR::AS, age),
    ])
    .with_meta(
        FileMetaTableBuilder::new()
            .transfer_syntax("1.2.840.10008.1.2.1")
            .media_storage_sop_class_uid("X")
            .media_storage_sop_instance_uid("1.2.3"),
    )
    .expect("file meta")
    .write_to_file(path)
    .expect("write");
}

fn runner(persistent_storage: bool) -> BatchRunner {
    BatchRunner::new(
        Arc::new(x_schema()),
        InputFormat::Dicom.decoder(),
        BatchOptions {
            persistent_storage,
            ..BatchOptions::default()
        },
    )
}

#[test]
fn test_dcm_files_are_mapped() {
    let input = tempfile::tempdir().expect("tempdir");
    write_x_file(&input.path().join("IM0001.dcm"), "P1", "42");
    write_x_file(&input.path().join("IM0002.DCM"), "P2", "07");
    std::fs::write(input.path().join("broken.dcm"), "not DICOM").expect("write");
    std::fs::write(input.path().join("notes.json"), "{}").expect("write");

    let mut store = GraphStore::new();
    let report = runner(true).run(input.path(), &mut store).expect("run");
    assert_eq!(
        report,
        BatchReport {
            mapped: 2,
            failed: 1,
            skipped: 0
        }
    );

    let facts = store.facts();
    assert!(facts.contains(&Fact::literal(data("P1"), ldcm("T00101010"), "42")));
    assert!(facts.contains(&Fact::literal(data("P2"), ldcm("T00101010"), "07")));
    assert!(facts.contains(&Fact::literal(
        data("P1"),
        ENCODING_FORMAT,
        "application/dicom"
    )));
}
