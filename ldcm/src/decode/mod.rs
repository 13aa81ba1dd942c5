//! Record decoders.
//!
//! A decoder turns one file into an `AttributeTree`. Decoding failures are
//! per-record: the batch runner logs them and moves on to the next file.

pub mod dicom;
pub mod json;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

pub use dicom::DicomFileDecoder;
pub use json::DicomJsonDecoder;

use crate::types::AttributeTree;

/// Reads records of one serialization.
pub trait RecordDecoder: Send + Sync {
    /// Decode the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid record.
    fn decode(&self, path: &Path) -> Result<AttributeTree, DecodeError>;

    /// Whether this decoder handles the file, judged from its name.
    fn accepts(&self, path: &Path) -> bool;

    /// Media type recorded as provenance for decoded records.
    fn encoding_format(&self) -> &'static str;
}

/// Errors that can occur while decoding a record.
#[derive(Debug)]
pub enum DecodeError {
    /// The file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not a readable DICOM Part 10 file.
    Dicom {
        path: PathBuf,
        source: dicom_object::ReadError,
    },
    /// The file is not valid JSON.
    Json(serde_json::Error),
    /// The document is valid JSON but not a valid record.
    Malformed(String),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Dicom { path, source } => {
                write!(f, "failed to open DICOM file {}: {source}", path.display())
            }
            Self::Json(e) => write!(f, "invalid JSON: {e}"),
            Self::Malformed(message) => write!(f, "malformed record: {message}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Dicom { source, .. } => Some(source),
            Self::Json(e) => Some(e),
            Self::Malformed(_) => None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Input serializations a batch can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// DICOM Part 10 files (`.dcm`).
    #[default]
    Dicom,
    /// The DICOM JSON model (`.json`).
    DicomJson,
}

impl InputFormat {
    #[must_use]
    pub fn decoder(self) -> Arc<dyn RecordDecoder> {
        match self {
            Self::Dicom => Arc::new(DicomFileDecoder::new()),
            Self::DicomJson => Arc::new(DicomJsonDecoder::new()),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dicom => "dicom",
            Self::DicomJson => "dicom-json",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized input format name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownInputFormat(pub String);

impl fmt::Display for UnknownInputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown input format '{}' (expected dicom or dicom-json)", self.0)
    }
}

impl std::error::Error for UnknownInputFormat {}

impl FromStr for InputFormat {
    type Err = UnknownInputFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dicom" | "dcm" | "part10" => Ok(Self::Dicom),
            "dicom-json" | "dicom+json" | "json" => Ok(Self::DicomJson),
            _ => Err(UnknownInputFormat(s.to_owned())),
        }
    }
}
