#![cfg_attr(test, allow(clippy::disallowed_methods))]
// No unwrap() outside tests. Bad records and schemas are reported as errors.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::sync::Arc;

use ldcm::config::MapperConfig;
use ldcm::{BatchRunner, GraphStore, OntologySchema};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ldcm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match MapperConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: ontology_file={}, input_directory={}, input_format={}, output_file={}",
        config.ontology_file.display(),
        config.input_directory.display(),
        config.input_format,
        config.output_file.display()
    );

    // The schema is required for every record; failing to load it is fatal.
    let schema = match OntologySchema::from_path(&config.ontology_file) {
        Ok(schema) => schema,
        Err(e) => {
            tracing::error!("Failed to load ontology: {e}");
            std::process::exit(1);
        }
    };

    let runner = BatchRunner::new(
        Arc::new(schema),
        config.input_format.decoder(),
        config.batch_options(),
    );
    let mut store = GraphStore::new();

    let result = if config.workers > 1 {
        runner
            .run_parallel(&config.input_directory, &mut store)
            .await
    } else {
        runner.run(&config.input_directory, &mut store)
    };
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Batch failed: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = store.save(&config.output_file, config.output_format) {
        tracing::error!("Failed to save results: {e}");
        std::process::exit(1);
    }

    tracing::info!(
        "Stored results in {} ({} records mapped, {} failed, {} skipped)",
        config.output_file.display(),
        report.mapped,
        report.failed,
        report.skipped
    );
}
