//! Folder batch processing.
//!
//! A batch walks an input folder, decodes every record file the decoder
//! accepts, and maps it into one graph store. A record that fails to decode
//! or map is logged and counted; the batch carries on with the next file.
//!
//! # Parallel runs
//!
//! `run_parallel` splits the file list into one chunk per worker. Each
//! worker maps its chunk into its own store on a blocking thread, exports it
//! as N-Triples, and the chunks are loaded into the caller's store one after
//! another. Identity checks inside `create_or_get_instance` therefore never
//! race, and the merged graph is the union of the worker graphs.

mod manifest;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

pub use manifest::ProcessedManifest;

use crate::decode::{DecodeError, RecordDecoder};
use crate::mapping::{MappingEngine, MappingError, MappingOptions, RecordSource};
use crate::schema::SchemaService;
use crate::store::{GraphFormat, GraphStore, GraphStoreError};
use crate::types::EntityId;

/// Settings for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Attach each record's location and encoding to its root entity.
    pub persistent_storage: bool,
    /// Manifest of already processed files. Files listed there are skipped,
    /// and files mapped in this run are added to it.
    pub processed_list: Option<PathBuf>,
    /// Upper bound on the records attempted in this run.
    pub max_records: Option<usize>,
    /// Worker count for `run_parallel`.
    pub workers: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            persistent_storage: false,
            processed_list: None,
            max_records: None,
            workers: 1,
        }
    }
}

/// What happened to the files of one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Records mapped into the store.
    pub mapped: usize,
    /// Records that failed to decode or map.
    pub failed: usize,
    /// Accepted files left alone: already in the manifest, or past the
    /// record cap.
    pub skipped: usize,
}

/// Maps a folder of record files into a graph store.
pub struct BatchRunner {
    schema: Arc<dyn SchemaService>,
    decoder: Arc<dyn RecordDecoder>,
    options: BatchOptions,
}

/// Files selected for mapping, in walk order.
struct BatchPlan {
    files: Vec<PathBuf>,
    skipped: usize,
    manifest: ProcessedManifest,
}

#[derive(Default)]
struct WorkerOutcome {
    mapped: Vec<PathBuf>,
    failed: usize,
}

impl BatchRunner {
    #[must_use]
    pub fn new(
        schema: Arc<dyn SchemaService>,
        decoder: Arc<dyn RecordDecoder>,
        options: BatchOptions,
    ) -> Self {
        Self {
            schema,
            decoder,
            options,
        }
    }

    #[must_use]
    pub const fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Map every selected file under `dir` into `store`, one at a time.
    ///
    /// # Errors
    ///
    /// Returns an error only for batch-level failures: an unreadable input
    /// folder or manifest. Per-record failures are counted in the report.
    pub fn run(&self, dir: &Path, store: &mut GraphStore) -> Result<BatchReport, BatchError> {
        let plan = self.plan(dir)?;
        tracing::info!(
            "mapping {} records from {}",
            plan.files.len(),
            dir.display()
        );
        let outcome = map_files(
            self.schema.as_ref(),
            self.decoder.as_ref(),
            &self.options,
            &plan.files,
            store,
        );
        self.finish(plan, outcome)
    }

    /// Map the selected files with `options.workers` workers, each with its
    /// own store, then merge the results into `store`.
    ///
    /// # Errors
    ///
    /// Returns an error for batch-level failures, a worker that panicked, or
    /// a worker store that cannot be exported and merged.
    #[allow(clippy::disallowed_methods)] // Arc::clone shares the schema and decoder with workers
    pub async fn run_parallel(
        &self,
        dir: &Path,
        store: &mut GraphStore,
    ) -> Result<BatchReport, BatchError> {
        let workers = self.options.workers.max(1);
        let plan = self.plan(dir)?;
        if workers == 1 || plan.files.len() < 2 {
            let outcome = map_files(
                self.schema.as_ref(),
                self.decoder.as_ref(),
                &self.options,
                &plan.files,
                store,
            );
            return self.finish(plan, outcome);
        }

        let chunk_size = plan.files.len().div_ceil(workers);
        tracing::info!(
            "mapping {} records from {} with {workers} workers",
            plan.files.len(),
            dir.display()
        );

        let namespaces = store.namespaces().clone();
        let tasks = plan.files.chunks(chunk_size).map(|chunk| {
            let schema = Arc::clone(&self.schema);
            let decoder = Arc::clone(&self.decoder);
            let options = self.options.clone();
            let namespaces = namespaces.clone();
            let files = chunk.to_vec();
            tokio::task::spawn_blocking(move || {
                let mut worker_store = GraphStore::with_namespaces(namespaces);
                let outcome = map_files(
                    schema.as_ref(),
                    decoder.as_ref(),
                    &options,
                    &files,
                    &mut worker_store,
                );
                (outcome, worker_store.export(GraphFormat::NTriples))
            })
        });
        let results = futures::future::join_all(tasks).await;

        let mut combined = WorkerOutcome::default();
        for result in results {
            let (outcome, exported) = result.map_err(|e| BatchError::Worker(e.to_string()))?;
            let added = store.load(&exported?, GraphFormat::NTriples)?;
            tracing::debug!(
                "merged worker output: {} records, {added} new triples",
                outcome.mapped.len()
            );
            combined.mapped.extend(outcome.mapped);
            combined.failed += outcome.failed;
        }
        self.finish(plan, combined)
    }

    /// Walk `dir` and select the files to map.
    fn plan(&self, dir: &Path) -> Result<BatchPlan, BatchError> {
        if !dir.is_dir() {
            return Err(BatchError::InputDirectory(dir.to_path_buf()));
        }
        let manifest = match &self.options.processed_list {
            Some(path) => ProcessedManifest::read(path)?,
            None => ProcessedManifest::new(),
        };

        let mut files = Vec::new();
        let mut skipped = 0;
        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("skipping unreadable entry: {e}");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !self.decoder.accepts(path) {
                continue;
            }
            let capped = self
                .options
                .max_records
                .is_some_and(|max| files.len() >= max);
            if capped || manifest.contains(path) {
                skipped += 1;
                continue;
            }
            files.push(path.to_path_buf());
        }

        Ok(BatchPlan {
            files,
            skipped,
            manifest,
        })
    }

    /// Record the mapped files in the manifest and build the report.
    fn finish(&self, plan: BatchPlan, outcome: WorkerOutcome) -> Result<BatchReport, BatchError> {
        let BatchPlan {
            skipped,
            mut manifest,
            ..
        } = plan;
        let report = BatchReport {
            mapped: outcome.mapped.len(),
            failed: outcome.failed,
            skipped,
        };

        if let Some(path) = &self.options.processed_list {
            for file in outcome.mapped {
                manifest.insert(file);
            }
            manifest.save(path)?;
        }

        tracing::info!(
            "batch finished: {} mapped, {} failed, {} skipped",
            report.mapped,
            report.failed,
            report.skipped
        );
        Ok(report)
    }
}

/// Map `files` into `store`, isolating per-record failures.
fn map_files(
    schema: &dyn SchemaService,
    decoder: &dyn RecordDecoder,
    options: &BatchOptions,
    files: &[PathBuf],
    store: &mut GraphStore,
) -> WorkerOutcome {
    let engine = MappingEngine::with_options(
        schema,
        MappingOptions {
            persistent_storage: options.persistent_storage,
            ..MappingOptions::default()
        },
    );

    let mut outcome = WorkerOutcome::default();
    for path in files {
        match map_file(&engine, decoder, path, store) {
            Ok(root) => {
                tracing::debug!("{} -> {root}", path.display());
                outcome.mapped.push(path.clone());
            }
            Err(e) => {
                tracing::warn!("failed to map {}: {e}", path.display());
                outcome.failed += 1;
            }
        }
    }
    outcome
}

fn map_file(
    engine: &MappingEngine<'_, dyn SchemaService + '_>,
    decoder: &dyn RecordDecoder,
    path: &Path,
    store: &mut GraphStore,
) -> Result<EntityId, BatchError> {
    let tree = decoder.decode(path)?;
    let source = RecordSource {
        location: std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
        encoding_format: decoder.encoding_format().to_owned(),
    };
    Ok(engine.map_record(store, &tree, Some(&source))?)
}

/// Errors that can occur while running a batch.
#[derive(Debug)]
pub enum BatchError {
    /// The input path is not a directory.
    InputDirectory(PathBuf),
    /// The processed-files manifest could not be read or written.
    Manifest {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A record could not be decoded.
    Decode(DecodeError),
    /// A record could not be mapped.
    Mapping(MappingError),
    /// A worker store could not be exported or merged.
    Store(GraphStoreError),
    /// A worker task panicked or was cancelled.
    Worker(String),
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputDirectory(path) => {
                write!(f, "input directory {} does not exist", path.display())
            }
            Self::Manifest { path, source } => {
                write!(f, "processed list {}: {source}", path.display())
            }
            Self::Decode(e) => write!(f, "decode error: {e}"),
            Self::Mapping(e) => write!(f, "mapping error: {e}"),
            Self::Store(e) => write!(f, "store error: {e}"),
            Self::Worker(message) => write!(f, "worker failed: {message}"),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Manifest { source, .. } => Some(source),
            Self::Decode(e) => Some(e),
            Self::Mapping(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::InputDirectory(_) | Self::Worker(_) => None,
        }
    }
}

impl From<DecodeError> for BatchError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<MappingError> for BatchError {
    fn from(e: MappingError) -> Self {
        Self::Mapping(e)
    }
}

impl From<GraphStoreError> for BatchError {
    fn from(e: GraphStoreError) -> Self {
        Self::Store(e)
    }
}
