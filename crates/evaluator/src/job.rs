//! The evaluation job: read, classify, suggest, publish.

use alarm_core::{AlarmKind, IssueTag};
use chrono::{DateTime, Utc};
use report_store::{ReportStore, StoreError};
use thiserror::Error;
use tracing::info;

use crate::assembler::{Assembly, ReportAssembler};
use crate::source::{AlarmMetadataReader, AlarmSource, SourceError};

/// Errors that abort an evaluation run.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Reading alarms failed: {0}")]
    Source(#[from] SourceError),

    #[error("Publishing the report failed: {0}")]
    Store(#[from] StoreError),
}

/// What one run saw and published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub evaluated_at: DateTime<Utc>,
    pub metric_alarms: usize,
    pub composite_alarms: usize,
    /// Alarm count per tag, in [`IssueTag::ALL`] order.
    pub issue_counts: Vec<(IssueTag, usize)>,
    pub descriptions: usize,
    pub generated: usize,
    pub generation_failures: usize,
    /// False for dry runs.
    pub published: bool,
}

impl RunSummary {
    pub fn total_alarms(&self) -> usize {
        self.metric_alarms + self.composite_alarms
    }

    pub fn count(&self, tag: IssueTag) -> usize {
        self.issue_counts
            .iter()
            .find(|(t, _)| *t == tag)
            .map_or(0, |(_, count)| *count)
    }

    fn log(&self) {
        info!(
            total = self.total_alarms(),
            metric = self.metric_alarms,
            composite = self.composite_alarms,
            "Evaluated alarms"
        );
        for (tag, count) in &self.issue_counts {
            info!(tag = %tag, count, "Issue group");
        }
        info!(
            descriptions = self.descriptions,
            generated = self.generated,
            failed = self.generation_failures,
            published = self.published,
            "Description suggestions"
        );
    }
}

/// One evaluation run over an alarm source, publishing into a report store.
pub struct EvaluationJob<S, R> {
    reader: AlarmMetadataReader<S>,
    assembler: ReportAssembler,
    store: R,
    dry_run: bool,
}

impl<S: AlarmSource, R: ReportStore> EvaluationJob<S, R> {
    pub fn new(reader: AlarmMetadataReader<S>, assembler: ReportAssembler, store: R) -> Self {
        Self {
            reader,
            assembler,
            store,
            dry_run: false,
        }
    }

    /// Assemble the report without publishing it.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    /// Run against the current time.
    pub async fn run(&self) -> Result<RunSummary, EvaluationError> {
        self.run_at(Utc::now()).await
    }

    /// Run with the history window ending at `now`.
    ///
    /// A source failure aborts before anything is written, so the
    /// previously published report stays in place.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunSummary, EvaluationError> {
        let alarms = self.reader.read_all(now).await?;
        let assembly = self.assembler.assemble(&alarms).await;

        if !self.dry_run {
            self.store.replace_report(&assembly.report).await?;
        }

        let composite_alarms = alarms
            .iter()
            .filter(|alarm| alarm.kind == AlarmKind::Composite)
            .count();
        let summary = summarize(
            now,
            alarms.len() - composite_alarms,
            composite_alarms,
            &assembly,
            !self.dry_run,
        );
        summary.log();

        Ok(summary)
    }
}

fn summarize(
    evaluated_at: DateTime<Utc>,
    metric_alarms: usize,
    composite_alarms: usize,
    assembly: &Assembly,
    published: bool,
) -> RunSummary {
    RunSummary {
        evaluated_at,
        metric_alarms,
        composite_alarms,
        issue_counts: assembly
            .report
            .issue_groups
            .iter()
            .map(|group| (group.id, group.alarm_list.len()))
            .collect(),
        descriptions: assembly.report.descriptions.len(),
        generated: assembly.generated,
        generation_failures: assembly.generation_failures,
        published,
    }
}
