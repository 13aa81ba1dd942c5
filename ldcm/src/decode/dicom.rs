//! Decoder for DICOM Part 10 files.
//!
//! Files are parsed with `dicom-object` up to the pixel data, which the
//! mapper never reads. Every element is rendered the way the JSON decoder
//! renders it: multi-valued elements are joined with `\` and sequences keep
//! their items as nested trees.

use std::path::Path;

use dicom_core::value::Value;
use dicom_object::{InMemDicomObject, OpenFileOptions};

use super::{DecodeError, RecordDecoder};
use crate::types::{AttributeTree, Element, Tag};

const PIXEL_DATA: dicom_core::Tag = dicom_core::Tag(0x7FE0, 0x0010);

/// Reads `.dcm` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct DicomFileDecoder;

impl DicomFileDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RecordDecoder for DicomFileDecoder {
    fn decode(&self, path: &Path) -> Result<AttributeTree, DecodeError> {
        let object = OpenFileOptions::new()
            .read_until(PIXEL_DATA)
            .open_file(path)
            .map_err(|source| DecodeError::Dicom {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(tree_from_object(&object))
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"))
    }

    fn encoding_format(&self) -> &'static str {
        "application/dicom"
    }
}

/// Walk a dataset in tag order. Pixel fragments carry nothing to map and
/// are left out.
fn tree_from_object(object: &InMemDicomObject) -> AttributeTree {
    object
        .iter()
        .filter_map(|element| {
            let header = element.header();
            let tag = Tag::new(header.tag.group(), header.tag.element());
            match element.value() {
                Value::Primitive(value) => {
                    let text = value.to_str();
                    Some(Element::text(
                        tag,
                        header.vr.to_string(),
                        text.trim_end_matches(['\0', ' ']),
                    ))
                }
                Value::Sequence(sequence) => Some(Element::sequence(
                    tag,
                    sequence.items().iter().map(tree_from_object).collect(),
                )),
                Value::PixelSequence(_) => {
                    tracing::trace!("skipping encapsulated pixel data in {tag}");
                    None
                }
            }
        })
        .collect()
}
