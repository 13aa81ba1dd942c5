//! Mapper configuration module.
//!
//! This module loads the settings of one mapping run from environment
//! variables.
//!
//! # Environment Variables
//!
//! - `LDCM_ONTOLOGY_FILE`: Ontology describing classes and properties (required)
//! - `LDCM_INPUT_DIRECTORY`: Folder of record files to map (required)
//! - `LDCM_INPUT_FORMAT`: `dicom` for `.dcm` files or `dicom-json` for `.json`
//!   files (default: `dicom`)
//! - `LDCM_OUTPUT_FILE`: Where to save the graph (default: `<input>/linkeddicom.<ext>`)
//! - `LDCM_OUTPUT_FORMAT`: `turtle` or `ntriples` (default: taken from the
//!   output file extension, else `turtle`)
//! - `LDCM_PERSISTENT_STORAGE`: Record each file's location on its root entity (default: `false`)
//! - `LDCM_PROCESSED_LIST`: Manifest of files already mapped by earlier runs (optional)
//! - `LDCM_MAX_RECORDS`: Maximum number of records to map in this run (optional)
//! - `LDCM_WORKERS`: Number of parallel workers (default: `1`)
//!
//! # Invariants
//!
//! - `workers` is at least 1
//! - `max_records`, when set, is at least 1

use std::path::PathBuf;

use crate::batch::BatchOptions;
use crate::decode::InputFormat;
use crate::store::GraphFormat;

/// Mapper configuration.
///
/// # Post-conditions
///
/// When constructed via `from_env()`:
/// - `ontology_file` and `input_directory` are non-empty paths
/// - `output_file` is set, defaulted from the input directory if needed
/// - an output file named `.nt` or `.ttl` gets the matching format unless
///   `LDCM_OUTPUT_FORMAT` says otherwise; a defaulted file gets the
///   extension of the format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperConfig {
    pub ontology_file: PathBuf,
    pub input_directory: PathBuf,
    pub input_format: InputFormat,
    pub output_file: PathBuf,
    pub output_format: GraphFormat,
    pub persistent_storage: bool,
    pub processed_list: Option<PathBuf>,
    pub max_records: Option<usize>,
    pub workers: usize,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is missing.
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvVar(name) => {
                write!(f, "missing required environment variable: {name}")
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

const ONTOLOGY_FILE: &str = "LDCM_ONTOLOGY_FILE";
const INPUT_DIRECTORY: &str = "LDCM_INPUT_DIRECTORY";
const INPUT_FORMAT: &str = "LDCM_INPUT_FORMAT";
const OUTPUT_FILE: &str = "LDCM_OUTPUT_FILE";
const OUTPUT_FORMAT: &str = "LDCM_OUTPUT_FORMAT";
const PERSISTENT_STORAGE: &str = "LDCM_PERSISTENT_STORAGE";
const PROCESSED_LIST: &str = "LDCM_PROCESSED_LIST";
const MAX_RECORDS: &str = "LDCM_MAX_RECORDS";
const WORKERS: &str = "LDCM_WORKERS";

impl MapperConfig {
    /// Output file stem used inside the input directory.
    pub const DEFAULT_OUTPUT_FILE_STEM: &'static str = "linkeddicom";
    /// Default worker count.
    pub const DEFAULT_WORKERS: usize = 1;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `LDCM_ONTOLOGY_FILE` or `LDCM_INPUT_DIRECTORY` is not set or is empty
    /// - any optional variable is set to a value that does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as `from_env`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let ontology_file = PathBuf::from(required(&lookup, ONTOLOGY_FILE)?);
        let input_directory = PathBuf::from(required(&lookup, INPUT_DIRECTORY)?);
        let input_format = lookup(INPUT_FORMAT)
            .map(|value| {
                value.parse::<InputFormat>().map_err(|e| ConfigError::InvalidValue {
                    name: INPUT_FORMAT.to_owned(),
                    message: format!("{e}"),
                })
            })
            .transpose()?
            .unwrap_or_default();
        let explicit_file = lookup(OUTPUT_FILE)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let explicit_format = lookup(OUTPUT_FORMAT)
            .map(|value| {
                value.parse::<GraphFormat>().map_err(|e| ConfigError::InvalidValue {
                    name: OUTPUT_FORMAT.to_owned(),
                    message: format!("{e}"),
                })
            })
            .transpose()?;
        let output_format = explicit_format
            .or_else(|| explicit_file.as_deref().and_then(GraphFormat::from_path))
            .unwrap_or_default();
        let output_file = explicit_file.unwrap_or_else(|| {
            input_directory.join(format!(
                "{}.{}",
                Self::DEFAULT_OUTPUT_FILE_STEM,
                output_format.extension()
            ))
        });
        let persistent_storage = match lookup(PERSISTENT_STORAGE) {
            Some(value) => parse_bool(PERSISTENT_STORAGE, &value)?,
            None => false,
        };
        let processed_list = lookup(PROCESSED_LIST)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let max_records = lookup(MAX_RECORDS)
            .map(|value| parse_positive(MAX_RECORDS, &value))
            .transpose()?;
        let workers = lookup(WORKERS)
            .map(|value| parse_positive(WORKERS, &value))
            .transpose()?
            .unwrap_or(Self::DEFAULT_WORKERS);

        Ok(Self {
            ontology_file,
            input_directory,
            input_format,
            output_file,
            output_format,
            persistent_storage,
            processed_list,
            max_records,
            workers,
        })
    }

    /// The batch settings carried by this configuration.
    #[must_use]
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            persistent_storage: self.persistent_storage,
            processed_list: self.processed_list.clone(),
            max_records: self.max_records,
            workers: self.workers,
        }
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, ConfigError> {
    let value = lookup(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_owned()))?;
    if value.is_empty() {
        return Err(ConfigError::InvalidValue {
            name: name.to_owned(),
            message: "must not be empty".to_owned(),
        });
    }
    Ok(value)
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_owned(),
            message: format!("'{value}' is not a boolean"),
        }),
    }
}

fn parse_positive(name: &str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_owned(),
            message: format!("'{value}' is not a positive integer"),
        }),
    }
}
