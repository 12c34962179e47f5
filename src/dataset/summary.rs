//! Per-tag issue counts for a scan.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::Record;
use crate::detect::IssueTag;

/// Counts of records scanned and issues found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub total_records: usize,
    pub clean_records: usize,
    /// Tag occurrences; a record tagged twice counts twice.
    pub counts: BTreeMap<IssueTag, usize>,
}

impl IssueSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one classified record.
    pub fn record(&mut self, record: &Record) {
        self.total_records += 1;
        if !record.has_issues() {
            self.clean_records += 1;
        }
        for tag in &record.issues {
            *self.counts.entry(*tag).or_insert(0) += 1;
        }
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut summary = Self::new();
        for record in records {
            summary.record(record);
        }
        summary
    }

    pub fn count(&self, tag: IssueTag) -> usize {
        self.counts.get(&tag).copied().unwrap_or(0)
    }

    pub fn flagged_records(&self) -> usize {
        self.total_records - self.clean_records
    }
}

impl fmt::Display for IssueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Scanned {} records: {} clean, {} flagged",
            self.total_records,
            self.clean_records,
            self.flagged_records()
        )?;
        if self.counts.is_empty() {
            return writeln!(f, "No issues found");
        }

        let width = self
            .counts
            .keys()
            .map(|tag| tag.as_str().len())
            .max()
            .unwrap_or(0);
        writeln!(f, "{:<width$}  count", "issue", width = width)?;
        writeln!(f, "{}  -----", "-".repeat(width))?;
        for (tag, count) in &self.counts {
            writeln!(f, "{:<width$}  {:>5}", tag.as_str(), count, width = width)?;
        }
        Ok(())
    }
}
