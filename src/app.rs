//! Core orchestrator for a cleanup run.
//!
//! Loads the split, builds the connector registry, scans every record and
//! writes the cleaned output.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::config::Config;
use crate::dataset::{self, DatasetScanner, IssueSummary, Split};
use crate::detect::Detector;
use crate::error::Result;
use crate::graph::{ConnectorFactory, SchemaCache};
use crate::llm::LlmClient;

/// What to clean and where to write it.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Dataset file, or directory holding `<split>.jsonl`.
    pub input: PathBuf,
    pub split: Split,
    pub output_dir: PathBuf,
    pub annotated: bool,
    pub limit: Option<usize>,
    pub show_progress: bool,
}

impl RunOptions {
    /// Options for `split` of `input`, output settings taken from `config`.
    pub fn new(input: impl Into<PathBuf>, split: Split, config: &Config) -> Self {
        Self {
            input: input.into(),
            split,
            output_dir: config.output.dir.clone(),
            annotated: config.output.annotated,
            limit: None,
            show_progress: false,
        }
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: IssueSummary,
    pub cleaned_path: PathBuf,
    pub cleaned_records: usize,
    pub annotated_path: Option<PathBuf>,
}

/// Runs a cleanup with the given collaborators.
///
/// Nothing is written if the scan halts.
pub async fn run_cleanup(
    options: &RunOptions,
    config: &Config,
    factory: &dyn ConnectorFactory,
    llm: Arc<dyn LlmClient>,
) -> Result<RunReport> {
    config.validate()?;
    let started = Instant::now();
    let input = dataset::resolve_input(&options.input, options.split);
    let mut records = dataset::load_records(&input)?;

    if let Some(limit) = options.limit {
        records.truncate(limit);
    }
    info!(
        "Cleaning {} records from the {} split",
        records.len(),
        options.split
    );

    let registry = DatasetScanner::registry_for(&records, factory)?;
    info!("Connected {} database aliases", registry.len());

    let detector = Detector::new(Arc::new(SchemaCache::new()), llm)
        .with_fail_on_llm_error(config.detection.fail_on_llm_error)
        .with_semantic_checks(config.detection.semantic_checks);

    let summary = DatasetScanner::new(&registry, &detector)
        .with_progress(options.show_progress)
        .scan(&mut records)
        .await?;

    let (cleaned_path, cleaned_records) =
        dataset::write_cleaned(&options.output_dir, options.split, &records)?;
    let annotated_path = if options.annotated {
        Some(dataset::write_annotated(&options.output_dir, options.split, &records)?.0)
    } else {
        None
    };

    info!("Run finished in {:?}", started.elapsed());
    Ok(RunReport {
        summary,
        cleaned_path,
        cleaned_records,
        annotated_path,
    })
}
