//! Per-record issue classification.
//!
//! Records with a database alias get the full check set: schema resolution,
//! language check, full execution, semantic checks. Records without one are
//! only planned with `EXPLAIN` against the fallback database.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{only_latin_characters, IssueTag};
use crate::dataset::Record;
use crate::error::Result;
use crate::graph::{
    DatabaseAlias, ExecutionOutcome, QueryExecutor, SchemaCache, DEPRECATION_MARKER,
    NO_DATA_MARKER,
};
use crate::llm::{classify, prompt, LlmClient, QueryFidelity, QuestionClarity};

/// Runs the issue checks on one record at a time.
pub struct Detector {
    schema_cache: Arc<SchemaCache>,
    llm: Arc<dyn LlmClient>,
    fail_on_llm_error: bool,
    semantic_checks: bool,
}

impl Detector {
    /// Creates a detector with semantic checks enabled and LLM failures tolerated.
    pub fn new(schema_cache: Arc<SchemaCache>, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            schema_cache,
            llm,
            fail_on_llm_error: false,
            semantic_checks: true,
        }
    }

    /// When set, a failed model call halts the run instead of being skipped.
    pub fn with_fail_on_llm_error(mut self, fail: bool) -> Self {
        self.fail_on_llm_error = fail;
        self
    }

    /// Enables or disables the model-driven checks.
    pub fn with_semantic_checks(mut self, enabled: bool) -> Self {
        self.semantic_checks = enabled;
        self
    }

    /// Appends every detected issue to `record.issues`.
    ///
    /// `executor` must be the record's alias executor, or the fallback
    /// executor when the record has no alias. Query failures become
    /// `syntax_error` tags; schema fetch failures and (in strict mode) model
    /// failures are returned.
    pub async fn detect_issues(&self, record: &mut Record, executor: &QueryExecutor) -> Result<()> {
        match record.alias()? {
            Some(alias) => {
                self.resolve_schema(record, alias, executor).await?;
                self.check_language(record);
                self.check_execution(record, executor).await;
            }
            None => {
                self.check_language(record);
                self.check_plan(record, executor).await;
            }
        }

        self.check_semantics(record).await
    }

    async fn resolve_schema(
        &self,
        record: &mut Record,
        alias: DatabaseAlias,
        executor: &QueryExecutor,
    ) -> Result<()> {
        self.schema_cache.apply(record, alias, executor).await
    }

    fn check_language(&self, record: &mut Record) {
        if !only_latin_characters(&record.question) {
            flag(record, IssueTag::NonEnglishCharacters);
        }
    }

    /// Runs the query and scans its notifications.
    async fn check_execution(&self, record: &mut Record, executor: &QueryExecutor) {
        let result = match executor.execute(&record.cypher_query, None).await {
            ExecutionOutcome::Failed(failure) => {
                debug!("{}: execution failed with {}", record.instance_id, failure.kind.name());
                flag(record, IssueTag::SyntaxError);
                return;
            }
            ExecutionOutcome::Completed(result) => result,
        };

        let mut deprecated = false;
        for notification in &result.notifications {
            if !deprecated && notification.contains(DEPRECATION_MARKER) {
                deprecated = true;
                flag(record, IssueTag::Deprecation);
            } else if notification == NO_DATA_MARKER {
                // Not deduplicated: one tag per notice.
                flag(record, IssueTag::EmptyResult);
            }
        }
    }

    /// Plans the query with `EXPLAIN`; only deprecations are reported.
    async fn check_plan(&self, record: &mut Record, executor: &QueryExecutor) {
        match executor.explain(&record.cypher_query).await {
            ExecutionOutcome::Failed(failure) => {
                debug!("{}: explain failed with {}", record.instance_id, failure.kind.name());
                flag(record, IssueTag::SyntaxError);
            }
            ExecutionOutcome::Completed(result) => {
                if result
                    .notifications
                    .iter()
                    .any(|n| n.contains(DEPRECATION_MARKER))
                {
                    flag(record, IssueTag::Deprecation);
                }
            }
        }
    }

    async fn check_semantics(&self, record: &mut Record) -> Result<()> {
        if !self.semantic_checks {
            return Ok(());
        }

        match self.judge(record).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_llm_failure() && !self.fail_on_llm_error => {
                warn!(
                    "{}: skipping semantic checks after model failure: {}",
                    record.instance_id, e
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Vague questions are not checked against their query.
    async fn judge(&self, record: &mut Record) -> Result<()> {
        let clarity: QuestionClarity = classify(
            self.llm.as_ref(),
            &prompt::clarity_instruction(&record.question),
        )
        .await?;

        if clarity == QuestionClarity::Vague {
            flag(record, IssueTag::AmbiguousQuestion);
            return Ok(());
        }

        let fidelity: QueryFidelity = classify(
            self.llm.as_ref(),
            &prompt::fidelity_instruction(
                &record.question,
                &record.cypher_query,
                record.schema.as_deref(),
            ),
        )
        .await?;

        if fidelity == QueryFidelity::DoesNotReflect {
            flag(record, IssueTag::InaccurateQuery);
        }
        Ok(())
    }
}

fn flag(record: &mut Record, tag: IssueTag) {
    info!("{}: {}", record.instance_id, tag);
    record.add_issue(tag);
}
