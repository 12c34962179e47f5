//! Drives every record through the detector.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use super::{IssueSummary, Record};
use crate::detect::Detector;
use crate::error::Result;
use crate::graph::{ConnectorFactory, ConnectorRegistry};

/// Scans records one at a time, in order.
pub struct DatasetScanner<'a> {
    registry: &'a ConnectorRegistry,
    detector: &'a Detector,
    show_progress: bool,
}

impl<'a> DatasetScanner<'a> {
    pub fn new(registry: &'a ConnectorRegistry, detector: &'a Detector) -> Self {
        Self {
            registry,
            detector,
            show_progress: false,
        }
    }

    /// Draws a progress bar on stderr while scanning.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Builds the registry for the distinct aliases in `records`.
    pub fn registry_for(
        records: &[Record],
        factory: &dyn ConnectorFactory,
    ) -> Result<ConnectorRegistry> {
        ConnectorRegistry::populate(records.iter().filter_map(Record::raw_alias), factory)
    }

    /// Classifies every record in place and returns the tag counts.
    ///
    /// Stops at the first error; records after it are left untouched.
    pub async fn scan(&self, records: &mut [Record]) -> Result<IssueSummary> {
        let bar = self.progress_bar(records.len() as u64);
        let mut summary = IssueSummary::new();

        for record in records.iter_mut() {
            bar.set_message(record.instance_id.clone());
            if let Err(e) = self.scan_record(record).await {
                error!("Halting at record {}: {}", record.instance_id, e);
                bar.abandon_with_message(format!("failed at {}", record.instance_id));
                return Err(e);
            }
            summary.record(record);
            bar.inc(1);
        }

        bar.finish_with_message("done");
        info!(
            "Scan finished: {} of {} records flagged",
            summary.flagged_records(),
            summary.total_records
        );
        Ok(summary)
    }

    async fn scan_record(&self, record: &mut Record) -> Result<()> {
        let executor = self.registry.executor_for(record.alias()?)?;
        self.detector.detect_issues(record, &executor).await
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        bar.set_style(bar_style());
        bar
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ")
}
