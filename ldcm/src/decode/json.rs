//! Decoder for the DICOM JSON model (PS3.18 F.2).
//!
//! Each dataset is an object keyed by `GGGGEEEE` tag strings. Values are
//! rendered to the text the mapper writes as literals: multi-valued elements
//! are joined with `\`, person names use their `Alphabetic` component, and
//! binary payloads keep their inline base64 or bulk data URI.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::{DecodeError, RecordDecoder};
use crate::types::{AttributeTree, Element, Tag};

const SEQUENCE_VR: &str = "SQ";
const PERSON_NAME_VR: &str = "PN";
const VALUE_SEPARATOR: &str = "\\";

#[derive(Debug, Deserialize)]
struct JsonAttribute {
    vr: String,
    #[serde(rename = "Value", default)]
    value: Option<Vec<Value>>,
    #[serde(rename = "InlineBinary", default)]
    inline_binary: Option<String>,
    #[serde(rename = "BulkDataURI", default)]
    bulk_data_uri: Option<String>,
}

type JsonDataset = BTreeMap<String, JsonAttribute>;

/// Reads `.json` files holding one DICOM JSON dataset, or an array whose
/// first entry is the dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct DicomJsonDecoder;

impl DicomJsonDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode a document already in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not JSON or do not follow the
    /// DICOM JSON model.
    pub fn decode_slice(&self, bytes: &[u8]) -> Result<AttributeTree, DecodeError> {
        let document: Value = serde_json::from_slice(bytes)?;
        let dataset = match document {
            Value::Array(mut entries) => {
                if entries.is_empty() {
                    return Err(DecodeError::Malformed("empty dataset array".to_owned()));
                }
                entries.swap_remove(0)
            }
            other => other,
        };
        tree_from_value(dataset)
    }
}

impl RecordDecoder for DicomJsonDecoder {
    fn decode(&self, path: &Path) -> Result<AttributeTree, DecodeError> {
        let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.decode_slice(&bytes)
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    }

    fn encoding_format(&self) -> &'static str {
        "application/dicom+json"
    }
}

fn tree_from_value(value: Value) -> Result<AttributeTree, DecodeError> {
    if !value.is_object() {
        return Err(DecodeError::Malformed(
            "dataset must be a JSON object".to_owned(),
        ));
    }
    let dataset: JsonDataset = serde_json::from_value(value)?;
    tree_from_dataset(dataset)
}

fn tree_from_dataset(dataset: JsonDataset) -> Result<AttributeTree, DecodeError> {
    let mut elements = Vec::with_capacity(dataset.len());
    for (key, attribute) in dataset {
        let tag: Tag = key
            .parse()
            .map_err(|e| DecodeError::Malformed(format!("{e}")))?;
        elements.push(element_from_attribute(tag, attribute)?);
    }
    // Keys may differ in hex case, so order by the parsed tag.
    elements.sort_by_key(|element| element.tag);
    Ok(elements.into_iter().collect())
}

fn element_from_attribute(tag: Tag, attribute: JsonAttribute) -> Result<Element, DecodeError> {
    if attribute.vr == SEQUENCE_VR {
        let items = attribute
            .value
            .unwrap_or_default()
            .into_iter()
            .map(tree_from_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DecodeError::Malformed(format!("sequence {tag}: {e}")))?;
        return Ok(Element::sequence(tag, items));
    }

    let text = if let Some(values) = &attribute.value {
        values
            .iter()
            .map(|value| render_value(&attribute.vr, value))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|message| DecodeError::Malformed(format!("element {tag}: {message}")))?
            .join(VALUE_SEPARATOR)
    } else if let Some(inline) = attribute.inline_binary {
        inline
    } else {
        attribute.bulk_data_uri.unwrap_or_default()
    };
    Ok(Element::text(tag, attribute.vr, text))
}

fn render_value(vr: &str, value: &Value) -> Result<String, String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Object(name) if vr == PERSON_NAME_VR => Ok(name
            .get("Alphabetic")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()),
        Value::Object(_) | Value::Array(_) => Err(format!("unexpected nested value for VR {vr}")),
    }
}
