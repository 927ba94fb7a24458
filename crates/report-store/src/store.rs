//! The report store contract and its SQLite implementation.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::models::{DescriptionRecord, IssueGroupRecord, Report};
use crate::retry::with_retry;
use crate::{description, issue_group, ReportDatabase};

/// Persistence for the two report collections.
///
/// Writes are idempotent upserts keyed by `id`. Scans return every stored
/// record. `replace_report` swaps a whole run in at once so readers never
/// see records left over from an earlier run.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn put_issue_group(&self, record: &IssueGroupRecord) -> Result<()>;

    async fn put_description(&self, record: &DescriptionRecord) -> Result<()>;

    async fn scan_issue_groups(&self) -> Result<Vec<IssueGroupRecord>>;

    async fn scan_descriptions(&self) -> Result<Vec<DescriptionRecord>>;

    /// Replace both collections with the records of `report`.
    async fn replace_report(&self, report: &Report) -> Result<()>;
}

#[async_trait]
impl ReportStore for ReportDatabase {
    async fn put_issue_group(&self, record: &IssueGroupRecord) -> Result<()> {
        with_retry(self.retry(), "put_issue_group", || {
            issue_group::put_issue_group(self.pool(), record)
        })
        .await
    }

    async fn put_description(&self, record: &DescriptionRecord) -> Result<()> {
        with_retry(self.retry(), "put_description", || {
            description::put_description(self.pool(), record)
        })
        .await
    }

    async fn scan_issue_groups(&self) -> Result<Vec<IssueGroupRecord>> {
        issue_group::scan_issue_groups(self.pool()).await
    }

    async fn scan_descriptions(&self) -> Result<Vec<DescriptionRecord>> {
        description::scan_descriptions(self.pool()).await
    }

    async fn replace_report(&self, report: &Report) -> Result<()> {
        with_retry(self.retry(), "replace_report", || self.replace_once(report)).await?;

        info!(
            issue_groups = report.issue_groups.len(),
            descriptions = report.descriptions.len(),
            "Report published"
        );
        Ok(())
    }
}

impl ReportDatabase {
    /// Clear and rewrite both collections in a single transaction.
    async fn replace_once(&self, report: &Report) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        issue_group::delete_all_issue_groups(&mut *tx).await?;
        description::delete_all_descriptions(&mut *tx).await?;

        for group in &report.issue_groups {
            issue_group::put_issue_group(&mut *tx, group).await?;
        }
        for record in &report.descriptions {
            description::put_description(&mut *tx, record).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
